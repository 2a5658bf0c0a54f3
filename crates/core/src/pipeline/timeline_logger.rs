use std::collections::HashMap;
use std::time::Instant;

/// Observer for overlay timeline runs.
///
/// Lets the CLI report progress and a closing summary through `log` while
/// tests and library callers stay silent.
pub trait TimelineLogger: Send {
    /// Report tick-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took, in milliseconds.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a per-tick sample, e.g. the number of visible faces.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

pub struct NullTimelineLogger;

impl TimelineLogger for NullTimelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Accumulates timings and metrics and writes them through the `log` crate.
///
/// Progress lines are emitted every `throttle_ticks` ticks and on the last.
pub struct LogTimelineLogger {
    throttle_ticks: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    started: Instant,
    total_ticks: usize,
}

impl LogTimelineLogger {
    pub fn new(throttle_ticks: usize) -> Self {
        Self {
            throttle_ticks: throttle_ticks.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            started: Instant::now(),
            total_ticks: 0,
        }
    }

    /// `None` until something has been recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Timeline summary ({} ticks, {:.1}ms total):",
            self.total_ticks, elapsed_ms
        )];

        for (stage, durations) in sorted(&self.timings) {
            let total: f64 = durations.iter().sum();
            let max = durations.iter().cloned().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:12}: avg {:7.3}ms  max {max:7.3}ms  total {total:8.1}ms",
                mean(durations)
            ));
        }

        for (name, values) in sorted(&self.metrics) {
            let peak = values.iter().cloned().fold(0.0, f64::max);
            lines.push(format!("  {name}: avg {:.1}  peak {peak:.0}", mean(values)));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for LogTimelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl TimelineLogger for LogTimelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_ticks = total;
        if total > 0 && (current % self.throttle_ticks == 0 || current == total) {
            log::info!("Sampled {current}/{total} ticks");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}

fn sorted(map: &HashMap<String, Vec<f64>>) -> Vec<(&String, &Vec<f64>)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_is_noop() {
        let mut logger = NullTimelineLogger;
        logger.progress(1, 10);
        logger.timing("query", 0.2);
        logger.metric("visible_faces", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_records_timings_per_stage() {
        let mut logger = LogTimelineLogger::new(10);
        logger.timing("query", 0.5);
        logger.timing("query", 1.5);
        logger.timing("load", 40.0);

        assert_eq!(logger.timings_for("query").unwrap(), &[0.5, 1.5]);
        assert_eq!(logger.timings_for("load").unwrap(), &[40.0]);
        assert!(logger.timings_for("missing").is_none());
    }

    #[test]
    fn test_records_metrics() {
        let mut logger = LogTimelineLogger::new(10);
        logger.metric("visible_faces", 2.0);
        logger.metric("visible_faces", 5.0);

        let values = logger.metrics_for("visible_faces").unwrap();
        assert_relative_eq!(mean(values), 3.5);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = LogTimelineLogger::new(10);
        logger.progress(4, 4);
        logger.timing("query", 0.25);
        logger.metric("visible_faces", 2.0);
        logger.metric("visible_faces", 6.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Timeline summary (4 ticks"));
        assert!(summary.contains("query"));
        assert!(summary.contains("visible_faces: avg 4.0  peak 6"));
    }

    #[test]
    fn test_empty_summary_is_none() {
        assert!(LogTimelineLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_total() {
        let mut logger = LogTimelineLogger::new(3);
        for i in 1..=7 {
            logger.progress(i, 7);
        }
        assert_eq!(logger.total_ticks, 7);
    }

    #[test]
    fn test_throttle_is_at_least_one() {
        assert_eq!(LogTimelineLogger::new(0).throttle_ticks, 1);
    }
}
