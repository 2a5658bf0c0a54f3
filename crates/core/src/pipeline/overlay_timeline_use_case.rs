use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::timeline_logger::TimelineLogger;
use crate::tracking::domain::face_track::{FaceTrack, VisibleFace};
use crate::tracking::domain::face_track_source::{FaceTrackSource, FaceTrackSourceError};
use crate::tracking::domain::face_tracker::{FaceVisibilityTracker, TrackerConfig};
use crate::tracking::domain::playback_state::PlaybackState;
use crate::tracking::domain::track_validator::{self, ValidationError, ValidationMode};

/// Tolerance so that `end` is still sampled when `(end - start) / step` lands
/// a hair under an integer.
const RANGE_EPSILON: f64 = 1e-9;

/// Upper bound on sampled positions per range; one hour at 1 ms steps is
/// still well under it.
pub const MAX_TICKS: usize = 10_000_000;

#[derive(Error, Debug)]
pub enum OverlayTimelineError {
    #[error(transparent)]
    Source(#[from] FaceTrackSourceError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid time range: {0}")]
    InvalidRange(String),
}

/// Evenly spaced playback positions in seconds, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeRange {
    start: f64,
    step: f64,
    ticks: usize,
}

impl TimeRange {
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, OverlayTimelineError> {
        if !(start.is_finite() && end.is_finite() && step.is_finite()) {
            return Err(OverlayTimelineError::InvalidRange(
                "bounds and step must be finite".into(),
            ));
        }
        if step <= 0.0 {
            return Err(OverlayTimelineError::InvalidRange(format!(
                "step must be positive, got {step}"
            )));
        }
        if end < start {
            return Err(OverlayTimelineError::InvalidRange(format!(
                "end {end} is before start {start}"
            )));
        }
        let intervals = ((end - start) / step + RANGE_EPSILON).floor();
        if !intervals.is_finite() || intervals >= MAX_TICKS as f64 {
            return Err(OverlayTimelineError::InvalidRange(format!(
                "{start}..{end} by {step} exceeds {MAX_TICKS} positions"
            )));
        }
        Ok(Self {
            start,
            step,
            ticks: intervals as usize + 1,
        })
    }

    pub fn len(&self) -> usize {
        self.ticks
    }

    pub fn is_empty(&self) -> bool {
        self.ticks == 0
    }

    /// Computed from the tick index so long ranges don't drift.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.start + i as f64 * self.step)
    }
}

/// Visible faces at one sampled playback position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub time: f64,
    pub faces: Vec<VisibleFace>,
}

/// Loads an asset's face tracks and samples which faces are on screen over a
/// sequence of playback positions, the way a player's time-update events
/// would drive the overlay.
pub struct OverlayTimelineUseCase {
    source: Box<dyn FaceTrackSource>,
    config: TrackerConfig,
    validation: ValidationMode,
    logger: Box<dyn TimelineLogger>,
}

impl OverlayTimelineUseCase {
    pub fn new(
        source: Box<dyn FaceTrackSource>,
        config: TrackerConfig,
        validation: ValidationMode,
        logger: Box<dyn TimelineLogger>,
    ) -> Self {
        Self {
            source,
            config,
            validation,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        asset_id: &str,
        range: TimeRange,
    ) -> Result<Vec<TimelineEntry>, OverlayTimelineError> {
        let times: Vec<f64> = range.times().collect();
        self.execute_at(asset_id, &times)
    }

    /// Samples the given playback positions, in the order given.
    pub fn execute_at(
        &mut self,
        asset_id: &str,
        times: &[f64],
    ) -> Result<Vec<TimelineEntry>, OverlayTimelineError> {
        let tracker = self.build_tracker(asset_id)?;
        let mut state = PlaybackState::new();
        let mut timeline = Vec::with_capacity(times.len());

        for (i, &time) in times.iter().enumerate() {
            let started = Instant::now();
            let faces = state.update_current_time(&tracker, time).to_vec();
            self.logger
                .timing("query", started.elapsed().as_secs_f64() * 1000.0);
            self.logger.metric("visible_faces", faces.len() as f64);

            timeline.push(TimelineEntry { time, faces });
            self.logger.progress(i + 1, times.len());
        }

        self.logger.summary();
        Ok(timeline)
    }

    fn build_tracker(&mut self, asset_id: &str) -> Result<FaceVisibilityTracker, OverlayTimelineError> {
        let started = Instant::now();
        let tracks: Vec<FaceTrack> = self.source.load(asset_id)?;
        self.logger
            .timing("load", started.elapsed().as_secs_f64() * 1000.0);

        track_validator::check(&tracks, self.validation)?;

        self.logger
            .info(&format!("Tracking {} faces in {asset_id}", tracks.len()));
        Ok(FaceVisibilityTracker::with_config(tracks, self.config))
    }
}
