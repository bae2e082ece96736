//! Threshold classification of the peak grid.

use bloom_common::{BloomMask, PeakGrid};

/// Mark pixels whose peak value meets or exceeds the threshold.
///
/// The comparison is boundary-inclusive; NaN pixels never match.
pub fn classify(peak: &PeakGrid, threshold: f32) -> BloomMask {
    peak.map(|&value| value >= threshold)
}

/// True when at least one pixel passed the threshold.
pub fn any_detection(mask: &BloomMask) -> bool {
    mask.iter().any(|&hit| hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_threshold_is_inclusive() {
        let peak = array![[0.25, 0.2499], [0.26, f32::NAN]];
        let mask = classify(&peak, 0.25);
        assert!(mask[[0, 0]]);
        assert!(!mask[[0, 1]]);
        assert!(mask[[1, 0]]);
        assert!(!mask[[1, 1]]);
    }

    #[test]
    fn test_reference_scenario() {
        // Raw counts [[3000, 1000], [2600, 0]] at threshold 2500
        let peak = array![[0.3000, 0.1000], [0.2600, 0.0]];
        let mask = classify(&peak, 0.25);
        assert_eq!(mask, array![[true, false], [true, false]]);
    }

    #[test]
    fn test_any_detection() {
        let peak = array![[0.1, 0.2]];
        assert!(!any_detection(&classify(&peak, 0.25)));
        assert!(any_detection(&classify(&peak, 0.2)));
    }
}
