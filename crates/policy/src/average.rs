/// A rate sample: unix timestamp in seconds and a value in bytes/sec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Arithmetic mean of the samples whose timestamp falls within
/// `[now - horizon_secs, now]`.
///
/// Returns `None` when no sample falls inside the window. Callers must treat
/// `None` as "does not meet the threshold" so that missing data never leads
/// to an optimistic decision.
pub fn windowed_average(samples: &[Sample], horizon_secs: u64, now: f64) -> Option<f64> {
    let cutoff = now - horizon_secs as f64;

    let mut sum = 0.0;
    let mut count = 0u64;
    for sample in samples {
        if sample.timestamp >= cutoff && sample.timestamp <= now {
            sum += sample.value;
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_samples_inside_window() {
        let samples = vec![
            Sample::new(1000.0, 100.0),
            Sample::new(1060.0, 200.0),
            Sample::new(1120.0, 300.0),
        ];

        let avg = windowed_average(&samples, 300, 1200.0);
        assert_eq!(avg, Some(200.0));
    }

    #[test]
    fn excludes_samples_older_than_horizon() {
        let samples = vec![
            Sample::new(100.0, 9999.0),
            Sample::new(1100.0, 50.0),
            Sample::new(1150.0, 150.0),
        ];

        let avg = windowed_average(&samples, 200, 1200.0);
        assert_eq!(avg, Some(100.0));
    }

    #[test]
    fn excludes_samples_newer_than_now() {
        let samples = vec![Sample::new(1100.0, 50.0), Sample::new(1300.0, 500.0)];

        let avg = windowed_average(&samples, 200, 1200.0);
        assert_eq!(avg, Some(50.0));
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let samples = vec![Sample::new(1000.0, 10.0), Sample::new(1200.0, 30.0)];

        let avg = windowed_average(&samples, 200, 1200.0);
        assert_eq!(avg, Some(20.0));
    }

    #[test]
    fn empty_window_is_undefined() {
        assert_eq!(windowed_average(&[], 300, 1200.0), None);

        let stale = vec![Sample::new(100.0, 42.0)];
        assert_eq!(windowed_average(&stale, 300, 1200.0), None);
    }
}
