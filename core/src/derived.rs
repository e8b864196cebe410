//! Derived-metrics calculators.
//!
//! Pure functions from raw fetched records to display-ready values. Nothing
//! here mutates state or talks to the network, so every function is
//! deterministic given its inputs.

use std::collections::BTreeMap;

use tracker_backend_client::{MetricEntry, MetricKind, MortgageSummary, Reminder, Summary};

/// At most this many reminder badges are shown, in server order.
pub const MAX_REMINDER_BADGES: usize = 6;

/// One charting row. Days with only one measurement leave the other field
/// `None`; charting treats absence as a gap, never as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessPoint {
    pub day: String,
    pub weight: Option<f64>,
    pub waist: Option<f64>,
}

/// Merges raw metric entries into one row per distinct day, ascending by
/// day. Day keys are fixed-format ISO dates, so lexicographic order is
/// chronological. When a day has several entries of the same kind, the
/// later entry in server order wins.
pub fn merge_fitness_series(metrics: &[MetricEntry]) -> Vec<FitnessPoint> {
    let mut by_day: BTreeMap<&str, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for entry in metrics {
        let slot = by_day.entry(entry.day.as_str()).or_default();
        match entry.kind {
            MetricKind::Weight => slot.0 = Some(entry.value),
            kind if kind.is_waist() => slot.1 = Some(entry.value),
            _ => {}
        }
    }
    by_day
        .into_iter()
        .map(|(day, (weight, waist))| FitnessPoint {
            day: day.to_string(),
            weight,
            waist,
        })
        .collect()
}

/// Fraction of the principal-paydown target achieved, clamped to `[0, 1]`.
///
/// `target_delta` falls back to `start - target` when the server did not
/// precompute it. A non-positive or non-finite delta yields 0 rather than
/// letting NaN or a negative ratio reach the UI.
pub fn progress_ratio(
    start_principal: f64,
    target_principal: f64,
    paid_extra_ytd: f64,
    precomputed_delta: Option<f64>,
) -> f64 {
    let target_delta = precomputed_delta.unwrap_or(start_principal - target_principal);
    if !target_delta.is_finite() || target_delta <= 0.0 {
        return 0.0;
    }
    let ratio = paid_extra_ytd / target_delta;
    if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 }
}

/// Ratio from a fetched mortgage summary.
pub fn mortgage_ratio(summary: &MortgageSummary) -> f64 {
    progress_ratio(
        summary.mortgage_start_principal,
        summary.mortgage_target_principal,
        summary.principal_paid_extra_ytd,
        summary.progress.as_ref().map(|p| p.target_delta),
    )
}

/// Integer-percent display for a progress ratio.
pub fn percent_label(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub label: &'static str,
    pub value: String,
}

/// The four fixed KPI slots, in display order. The count and order are part
/// of the dashboard contract, not data-driven.
pub fn top_kpis(summary: &Summary, mortgage_ratio: f64) -> [Kpi; 4] {
    [
        Kpi {
            label: "Wake streak",
            value: format!("{}d", summary.current_wakeup_streak),
        },
        Kpi {
            label: "Workout streak",
            value: format!("{}d", summary.current_workout_streak),
        },
        Kpi {
            label: "Videos this week",
            value: summary.week_video_count.to_string(),
        },
        Kpi {
            label: "Mortgage progress",
            value: percent_label(mortgage_ratio),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeClass {
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub area: String,
    pub message: String,
    pub class: BadgeClass,
}

/// First `MAX_REMINDER_BADGES` reminders in server order. Severity maps to
/// exactly two visual classes; anything unrecognized is informational.
pub fn reminder_badges(reminders: &[Reminder]) -> Vec<Badge> {
    reminders
        .iter()
        .take(MAX_REMINDER_BADGES)
        .map(|reminder| Badge {
            area: reminder.area.clone(),
            message: reminder.message.clone(),
            class: if reminder.severity == "warning" {
                BadgeClass::Warning
            } else {
                BadgeClass::Info
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn metric(day: &str, kind: MetricKind, value: f64) -> MetricEntry {
        MetricEntry {
            id: format!("{day}-{value}"),
            day: day.to_string(),
            kind,
            value,
            created_at: String::new(),
        }
    }

    #[test]
    fn merge_produces_one_row_per_day_ascending() {
        let series = merge_fitness_series(&[
            metric("2026-03-02", MetricKind::Weight, 168.5),
            metric("2026-03-01", MetricKind::Weight, 169.0),
            metric("2026-03-01", MetricKind::BodyFat, 34.0),
        ]);
        assert_eq!(
            series,
            vec![
                FitnessPoint {
                    day: "2026-03-01".to_string(),
                    weight: Some(169.0),
                    waist: Some(34.0),
                },
                FitnessPoint {
                    day: "2026-03-02".to_string(),
                    weight: Some(168.5),
                    waist: None,
                },
            ]
        );
    }

    #[test]
    fn merge_leaves_gaps_as_none_not_zero() {
        let series = merge_fitness_series(&[metric("2026-03-05", MetricKind::Waist, 33.5)]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].weight, None);
        assert_eq!(series[0].waist, Some(33.5));
    }

    #[test]
    fn merge_ignores_unknown_kinds() {
        let series = merge_fitness_series(&[metric("2026-03-05", MetricKind::Unknown, 12.0)]);
        assert_eq!(
            series,
            vec![FitnessPoint {
                day: "2026-03-05".to_string(),
                weight: None,
                waist: None,
            }]
        );
    }

    #[test]
    fn ratio_midpoint_scenario() {
        // start 330000, target 300000, paid 15000 -> delta 30000 -> 0.5 -> "50%"
        let ratio = progress_ratio(330_000.0, 300_000.0, 15_000.0, None);
        assert_eq!(ratio, 0.5);
        assert_eq!(percent_label(ratio), "50%");
    }

    #[test]
    fn ratio_prefers_precomputed_delta() {
        assert_eq!(progress_ratio(0.0, 0.0, 15_000.0, Some(30_000.0)), 0.5);
    }

    #[test]
    fn ratio_is_zero_for_non_positive_delta() {
        assert_eq!(progress_ratio(300_000.0, 300_000.0, 5_000.0, None), 0.0);
        assert_eq!(progress_ratio(300_000.0, 330_000.0, 5_000.0, None), 0.0);
        assert_eq!(progress_ratio(0.0, 0.0, -1.0, Some(0.0)), 0.0);
    }

    #[test]
    fn ratio_is_always_clamped() {
        assert_eq!(progress_ratio(330_000.0, 300_000.0, 90_000.0, None), 1.0);
        assert_eq!(progress_ratio(330_000.0, 300_000.0, -5_000.0, None), 0.0);
        assert_eq!(progress_ratio(f64::NAN, 0.0, 1.0, None), 0.0);
    }

    #[test]
    fn kpi_slots_are_fixed() {
        let summary = Summary {
            current_wakeup_streak: 3,
            current_workout_streak: 1,
            week_video_count: 2,
            ..Default::default()
        };
        let kpis = top_kpis(&summary, 0.5);
        assert_eq!(kpis.len(), 4);
        assert_eq!(kpis[0].value, "3d");
        assert_eq!(kpis[1].value, "1d");
        assert_eq!(kpis[2].value, "2");
        assert_eq!(kpis[3].value, "50%");
    }

    fn reminder(id: &str, severity: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            area: "Fitness".to_string(),
            message: format!("reminder {id}"),
            severity: severity.to_string(),
        }
    }

    #[test]
    fn badges_truncate_to_a_prefix_of_server_order() {
        let reminders: Vec<Reminder> = (0..9)
            .map(|i| reminder(&i.to_string(), "info"))
            .collect();
        let badges = reminder_badges(&reminders);
        assert_eq!(badges.len(), MAX_REMINDER_BADGES);
        for (i, badge) in badges.iter().enumerate() {
            assert_eq!(badge.message, format!("reminder {i}"));
        }
    }

    #[test]
    fn unknown_severity_defaults_to_info() {
        let badges = reminder_badges(&[
            reminder("a", "warning"),
            reminder("b", "info"),
            reminder("c", "critical-nonsense"),
        ]);
        assert_eq!(badges[0].class, BadgeClass::Warning);
        assert_eq!(badges[1].class, BadgeClass::Info);
        assert_eq!(badges[2].class, BadgeClass::Info);
    }
}
