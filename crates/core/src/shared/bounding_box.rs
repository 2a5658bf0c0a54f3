use serde::{Deserialize, Serialize};

/// A face bounding box: top-left corner plus extent.
///
/// The unit (pixels or normalized) is whatever the track data uses; it only
/// has to be consistent across every position of every track. On the wire
/// a box is a four-element `[x, y, width, height]` array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Component-wise blend: `self * (1 - p) + other * p`.
    ///
    /// `p` is not clamped, so values outside `[0, 1]` extrapolate.
    pub fn lerp(&self, other: &BoundingBox, p: f64) -> BoundingBox {
        let a = self.to_array();
        let b = other.to_array();
        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = a[i] * (1.0 - p) + b[i] * p;
        }
        BoundingBox::from(out)
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}
