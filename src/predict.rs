use crate::models::{Prediction, ProgramStats, SemesterTarget, TrackSummary};

pub const MAX_SEMESTERS: usize = 5;
pub const SAFETY_MARGIN: f64 = 2.0;
pub const TARGET_DECAY: f64 = 0.5;

pub fn average_grade(grades: &[f64]) -> f64 {
    let filled: Vec<f64> = grades.iter().copied().filter(|grade| *grade > 0.0).collect();
    if filled.is_empty() {
        0.0
    } else {
        filled.iter().sum::<f64>() / filled.len() as f64
    }
}

pub fn filled_semesters(grades: &[f64]) -> usize {
    grades.iter().filter(|grade| **grade > 0.0).count()
}

pub fn track_chance(accepted: u32, applicants: u32) -> f64 {
    if applicants == 0 {
        0.0
    } else {
        f64::from(accepted) / f64::from(applicants) * 100.0
    }
}

/// Defined only while the average sits below the raw reference; the safety
/// margin widens the target, not the comparison.
pub fn required_increase(average: f64, reference: f64) -> Option<f64> {
    if average < reference {
        Some(reference + SAFETY_MARGIN - average)
    } else {
        None
    }
}

pub fn safe_target(reference: f64) -> f64 {
    reference + SAFETY_MARGIN
}

/// Splits the required increase across the remaining semesters with
/// exponentially decaying weights, so the nearest semester carries the
/// largest share. Targets are capped at 100 and the capped value carries
/// forward as the next baseline, which can leave a saturated plan short of
/// the full increase.
pub fn allocate_targets(required: f64, filled: usize, average: f64) -> Vec<SemesterTarget> {
    if filled >= MAX_SEMESTERS {
        return Vec::new();
    }
    let remaining = MAX_SEMESTERS - filled;
    let total_weight: f64 = (0..remaining).map(|i| TARGET_DECAY.powi(i as i32)).sum();

    let mut targets = Vec::with_capacity(remaining);
    let mut running = average;
    for i in 0..remaining {
        let increase = required * TARGET_DECAY.powi(i as i32) / total_weight;
        let target = (running + increase).min(100.0);
        targets.push(SemesterTarget {
            semester: filled + 1 + i,
            target,
        });
        running = target;
    }
    targets
}

pub fn predict(
    grades: &[f64],
    stats: Option<&ProgramStats>,
    manual_reference: Option<f64>,
) -> Prediction {
    let average = average_grade(grades);
    let filled = filled_semesters(grades);

    let (snbp, snbt, reference) = match stats {
        Some(stats) => {
            let snbp = TrackSummary {
                chance_percent: track_chance(stats.snbp_accepted, stats.snbp_applicants),
                applicants: stats.snbp_applicants,
                accepted: stats.snbp_accepted,
                selectivity: stats.snbp_selectivity,
                reference: stats.snbp_reference,
            };
            let snbt = TrackSummary {
                chance_percent: track_chance(stats.snbt_accepted, stats.snbt_applicants),
                applicants: stats.snbt_applicants,
                accepted: stats.snbt_accepted,
                selectivity: stats.snbt_selectivity,
                reference: stats.snbt_reference,
            };
            (Some(snbp), Some(snbt), Some(stats.snbp_reference))
        }
        None => (None, None, manual_reference),
    };

    let required = reference.and_then(|reference| required_increase(average, reference));
    let targets = match required {
        Some(required) => allocate_targets(required, filled, average),
        None => Vec::new(),
    };

    Prediction {
        average,
        filled_semesters: filled,
        snbp,
        snbt,
        reference,
        safe_target: reference.map(safe_target),
        required_increase: required,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> ProgramStats {
        ProgramStats {
            university: "Universitas Indonesia".to_string(),
            major: "Ilmu Komputer".to_string(),
            snbp_applicants: 100,
            snbp_accepted: 25,
            snbt_applicants: 0,
            snbt_accepted: 0,
            snbp_reference: 85.0,
            snbt_reference: 650.0,
            snbp_selectivity: 0.25,
            snbt_selectivity: 0.0,
        }
    }

    #[test]
    fn average_skips_unfilled_semesters() {
        assert_eq!(average_grade(&[0.0, 0.0, 0.0, 0.0, 0.0]), 0.0);
        assert!((average_grade(&[80.0, 82.0, 0.0, 0.0, 0.0]) - 81.0).abs() < 1e-9);
        assert!((average_grade(&[100.0; 5]) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn chance_handles_zero_applicants() {
        assert_eq!(track_chance(25, 0), 0.0);
        assert!((track_chance(25, 100) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn required_increase_uses_margin_on_target_side() {
        assert_eq!(required_increase(81.0, 85.0), Some(6.0));
        assert_eq!(required_increase(85.0, 85.0), None);
        assert_eq!(required_increase(86.5, 85.0), None);
        // An average inside the margin band still counts as passing.
        assert_eq!(required_increase(85.5, 85.0), None);
    }

    #[test]
    fn allocations_follow_normalized_decay_weights() {
        let targets = allocate_targets(10.0, 3, 70.0);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].semester, 4);
        assert_eq!(targets[1].semester, 5);
        // Weights [1, 0.5] normalize to [2/3, 1/3].
        assert!((targets[0].target - (70.0 + 10.0 * 2.0 / 3.0)).abs() < 1e-9);
        assert!((targets[1].target - (70.0 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn raw_allocations_sum_to_required_before_capping() {
        let required = 10.0;
        let remaining = 2;
        let total_weight: f64 = (0..remaining).map(|i| TARGET_DECAY.powi(i)).sum();
        let raw_sum: f64 = (0..remaining)
            .map(|i| required * TARGET_DECAY.powi(i) / total_weight)
            .sum();
        assert!((raw_sum - required).abs() < 1e-9);
    }

    #[test]
    fn capped_target_carries_forward_as_baseline() {
        let targets = allocate_targets(2.5, 3, 99.0);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].target, 100.0);
        assert_eq!(targets[1].target, 100.0);
    }

    #[test]
    fn no_targets_when_all_semesters_filled() {
        assert!(allocate_targets(6.0, 5, 81.0).is_empty());
    }

    #[test]
    fn end_to_end_table_prediction() {
        let grades = [80.0, 82.0, 0.0, 0.0, 0.0];
        let stats = sample_stats();
        let prediction = predict(&grades, Some(&stats), None);

        assert!((prediction.average - 81.0).abs() < 1e-9);
        assert_eq!(prediction.filled_semesters, 2);
        assert_eq!(prediction.required_increase, Some(6.0));
        assert_eq!(prediction.safe_target, Some(87.0));

        let snbp = prediction.snbp.as_ref().unwrap();
        assert!((snbp.chance_percent - 25.0).abs() < 1e-9);
        let snbt = prediction.snbt.as_ref().unwrap();
        assert_eq!(snbt.chance_percent, 0.0);

        assert_eq!(prediction.targets.len(), 3);
        let increases: Vec<f64> = prediction
            .targets
            .iter()
            .scan(prediction.average, |running, target| {
                let increase = target.target - *running;
                *running = target.target;
                Some(increase)
            })
            .collect();
        assert!(increases[0] > increases[1] && increases[1] > increases[2]);
        let last = prediction.targets.last().unwrap();
        assert!((last.target - 87.0).abs() < 1e-9);
        assert!(last.target <= 100.0);
    }

    #[test]
    fn manual_prediction_carries_no_track_summaries() {
        let prediction = predict(&[80.0, 82.0], None, Some(85.0));
        assert!(prediction.snbp.is_none());
        assert!(prediction.snbt.is_none());
        assert_eq!(prediction.reference, Some(85.0));
        assert_eq!(prediction.required_increase, Some(6.0));
        assert_eq!(prediction.targets.len(), 3);
    }

    #[test]
    fn missing_stats_and_reference_yield_full_sentinel() {
        let prediction = predict(&[80.0, 82.0], None, None);
        assert!(prediction.snbp.is_none());
        assert!(prediction.snbt.is_none());
        assert!(prediction.reference.is_none());
        assert!(prediction.safe_target.is_none());
        assert!(prediction.required_increase.is_none());
        assert!(prediction.targets.is_empty());
    }

    #[test]
    fn prediction_is_idempotent() {
        let grades = [80.0, 82.0, 0.0, 0.0, 0.0];
        let stats = sample_stats();
        let first = predict(&grades, Some(&stats), None);
        let second = predict(&grades, Some(&stats), None);
        assert_eq!(first, second);
    }
}
