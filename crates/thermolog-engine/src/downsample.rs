//! Feature-preserving downsampling of reading series.
//!
//! Naive uniform-stride sampling silently discards spikes and dips, which on
//! a temperature dashboard is exactly the information a viewer needs. This
//! reduction instead guarantees that the global extrema and any single-step
//! jump above [`JUMP_THRESHOLD`] survive, at the cost of an approximate final
//! point count: when extrema and jump points alone exceed `max_points` the
//! bound is overshot rather than features dropped (a soft bound, covered by
//! `test_soft_bound_can_overshoot`).

use std::collections::HashSet;

use thermolog_types::Reading;
use tracing::debug;

/// Temperature delta above which a point is always retained.
pub const JUMP_THRESHOLD: f64 = 0.5;

/// Reduce an ascending reading series to approximately `max_points` points.
///
/// Input at or below `max_points` is returned unchanged. Otherwise the first
/// and last readings, the interior global max/min temperatures, every point
/// adjacent to a jump larger than [`JUMP_THRESHOLD`], and a uniform stride
/// over any remaining budget are retained, in chronological order.
///
/// The input must be ascending by timestamp; the output then is too. Never
/// fails for well-formed input: an empty slice yields an empty vec, and
/// `max_points == 0` is a caller-contract violation rejected at the
/// aggregator boundary, not here.
#[must_use]
pub fn downsample(readings: &[Reading], max_points: usize) -> Vec<Reading> {
    if readings.len() <= max_points {
        return readings.to_vec();
    }

    let len = readings.len();
    let last = len - 1;

    let mut retained: HashSet<usize> = HashSet::new();
    retained.insert(0);
    retained.insert(last);

    // Interior global extrema, first occurrence wins
    let mut max_idx: Option<usize> = None;
    let mut min_idx: Option<usize> = None;
    for i in 1..last {
        let temp = readings[i].temperature;
        if max_idx.is_none_or(|m| temp > readings[m].temperature) {
            max_idx = Some(i);
        }
        if min_idx.is_none_or(|m| temp < readings[m].temperature) {
            min_idx = Some(i);
        }
    }
    if let Some(i) = max_idx {
        retained.insert(i);
    }
    if let Some(i) = min_idx {
        retained.insert(i);
    }

    // Points adjacent to a sharp jump in either direction
    for i in 1..last {
        let delta_before = (readings[i].temperature - readings[i - 1].temperature).abs();
        let delta_after = (readings[i + 1].temperature - readings[i].temperature).abs();
        if delta_before > JUMP_THRESHOLD || delta_after > JUMP_THRESHOLD {
            retained.insert(i);
        }
    }

    // Uniform stride over whatever budget remains, one slot reserved for the
    // last point
    let remaining = max_points
        .saturating_sub(retained.len())
        .saturating_sub(1);
    if remaining > 0 {
        let step = ((len - 1) / remaining).max(1);
        let mut i = step;
        while i < last {
            retained.insert(i);
            i += step;
        }
    }

    let mut indices: Vec<usize> = retained.into_iter().collect();
    indices.sort_unstable();

    debug!(
        "Downsampled {} readings to {} (max_points={})",
        len,
        indices.len(),
        max_points
    );

    indices.into_iter().map(|i| readings[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    /// One reading per minute starting from a fixed instant.
    fn series(temps: &[f64]) -> Vec<Reading> {
        let base = datetime!(2025-06-01 00:00:00 +9);
        temps
            .iter()
            .enumerate()
            .map(|(i, &temperature)| Reading {
                id: i as i64 + 1,
                sensor_id: "s1".to_string(),
                sensor_name: "Unknown".to_string(),
                temperature,
                humidity: None,
                rssi: None,
                battery_mode: false,
                recorded_at: base + Duration::minutes(i as i64),
            })
            .collect()
    }

    fn temps_of(readings: &[Reading]) -> Vec<f64> {
        readings.iter().map(|r| r.temperature).collect()
    }

    fn is_chronological(readings: &[Reading]) -> bool {
        readings.windows(2).all(|w| w[0].recorded_at <= w[1].recorded_at)
    }

    #[test]
    fn test_empty_input() {
        assert!(downsample(&[], 100).is_empty());
    }

    #[test]
    fn test_identity_below_threshold() {
        let input = series(&[20.0, 20.1, 20.2]);
        let output = downsample(&input, 100);
        assert_eq!(output, input);
    }

    #[test]
    fn test_identity_at_exact_threshold() {
        let input = series(&[20.0, 21.0, 22.0, 23.0]);
        let output = downsample(&input, 4);
        assert_eq!(output, input);
    }

    #[test]
    fn test_endpoints_always_retained() {
        let temps: Vec<f64> = (0..50).map(|i| 20.0 + (i as f64) * 0.001).collect();
        let input = series(&temps);
        let output = downsample(&input, 10);

        assert_eq!(output.first().unwrap().id, input.first().unwrap().id);
        assert_eq!(output.last().unwrap().id, input.last().unwrap().id);
    }

    #[test]
    fn test_interior_extrema_retained() {
        // Flat series with a dip at 13 and a spike at 37
        let mut temps = vec![20.0; 60];
        temps[13] = 12.0;
        temps[37] = 31.0;
        let input = series(&temps);

        let output = downsample(&input, 8);
        let temps = temps_of(&output);
        assert!(temps.contains(&12.0));
        assert!(temps.contains(&31.0));
    }

    #[test]
    fn test_jump_points_retained() {
        // Smooth except one 0.6 step between indices 29 and 30
        let mut temps: Vec<f64> = (0..80).map(|i| 20.0 + (i as f64) * 0.001).collect();
        for t in temps.iter_mut().skip(30) {
            *t += 0.6;
        }
        let input = series(&temps);

        let output = downsample(&input, 10);
        let ids: Vec<i64> = output.iter().map(|r| r.id).collect();
        // Both sides of the step survive (ids are 1-based)
        assert!(ids.contains(&30));
        assert!(ids.contains(&31));
    }

    #[test]
    fn test_output_is_chronological() {
        let temps: Vec<f64> = (0..200)
            .map(|i| 22.0 + 4.0 * ((i as f64) * 0.3).sin())
            .collect();
        let input = series(&temps);

        let output = downsample(&input, 50);
        assert!(is_chronological(&output));
        // No duplicates
        let mut ids: Vec<i64> = output.iter().map(|r| r.id).collect();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_smooth_series_lands_near_budget() {
        // No jumps anywhere, so only endpoints + extrema + stride are kept.
        // The floor-division stride may land a handful of points past the
        // budget; here it retains 0, 1, 998, 999 plus every 10th interior
        // index, 103 points total.
        let temps: Vec<f64> = (0..1000).map(|i| 20.0 + (i as f64) * 0.0001).collect();
        let input = series(&temps);

        let output = downsample(&input, 100);
        assert_eq!(output.len(), 103);
    }

    #[test]
    fn test_soft_bound_can_overshoot() {
        // Every step is a 1.0 jump, so every interior point is "important".
        // The bound is best-effort by design: features win over the budget.
        let temps: Vec<f64> = (0..50)
            .map(|i| if i % 2 == 0 { 20.0 } else { 21.0 })
            .collect();
        let input = series(&temps);

        let output = downsample(&input, 10);
        assert_eq!(output.len(), 50);
    }

    #[test]
    fn test_two_points_survive_tiny_budget() {
        let input = series(&[20.0, 21.0]);
        let output = downsample(&input, 1);
        // First and last are always kept, even past the budget
        assert_eq!(temps_of(&output), vec![20.0, 21.0]);
    }

    #[test]
    fn test_extremum_ties_keep_first_occurrence() {
        let mut temps = vec![20.0; 40];
        temps[10] = 30.0;
        temps[20] = 30.0;
        let input = series(&temps);

        let output = downsample(&input, 6);
        let ids: Vec<i64> = output.iter().map(|r| r.id).collect();
        assert!(ids.contains(&11)); // index 10, 1-based id
    }

    #[test]
    fn test_spike_survives_heavy_reduction() {
        let mut temps: Vec<f64> = (0..1000)
            .map(|i| 22.0 + 4.0 * ((i as f64) * 0.01).sin())
            .collect();
        temps[500] = 40.0;
        let input = series(&temps);

        let output = downsample(&input, 100);
        assert!(output.len() < 1000);
        assert!(temps_of(&output).contains(&40.0));
        assert_eq!(output.first().unwrap().id, 1);
        assert_eq!(output.last().unwrap().id, 1000);
    }
}
