//! Wire types for the tracker backend.
//!
//! These mirror the backend's response models field-for-field. The client
//! treats server-computed aggregates (`Summary`, `WeeklyReview`,
//! `MortgageSummary`) as opaque snapshots and never recomputes them locally.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One daily habit record. `day` is the natural key; the backend upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: String,
    pub day: String,
    pub wakeup_5am: bool,
    pub workout: bool,
    pub video_captured: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInUpsert {
    pub day: String,
    pub wakeup_5am: bool,
    pub workout: bool,
    pub video_captured: bool,
    pub notes: String,
}

/// Metric kind as the backend reports it. `body_fat` is the historical name
/// of the waist series (the write path is still `/api/fitness/body-fat`);
/// readers treat `body_fat` and the legacy `waist` as the same series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Weight,
    BodyFat,
    Waist,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub id: String,
    pub day: String,
    pub kind: MetricKind,
    pub value: f64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoEntry {
    pub id: String,
    pub day: String,
    pub filename: String,
    /// Server-relative URL; join with the resolved backend origin to display.
    pub url: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessLatest {
    #[serde(default)]
    pub weight_lbs: Option<f64>,
    #[serde(default)]
    pub body_fat_pct: Option<f64>,
}

/// Envelope returned by `GET /api/fitness/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessData {
    #[serde(default)]
    pub metrics: Vec<MetricEntry>,
    #[serde(default)]
    pub photos: Vec<PhotoEntry>,
    #[serde(default)]
    pub latest: FitnessLatest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MortgageEventKind {
    PrincipalPayment,
    BalanceCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageEvent {
    pub id: String,
    pub day: String,
    pub kind: MortgageEventKind,
    pub amount: f64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalPaymentCreate {
    pub day: String,
    pub amount: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceCheckCreate {
    pub day: String,
    pub principal_balance: f64,
    pub note: String,
}

/// Server-precomputed progress inputs, when the backend supplies them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageProgress {
    #[serde(default)]
    pub target_delta: f64,
    #[serde(default)]
    pub paid_extra_ytd: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageSummary {
    #[serde(default)]
    pub mortgage_start_principal: f64,
    #[serde(default)]
    pub mortgage_target_principal: f64,
    #[serde(default)]
    pub latest_principal_balance: Option<f64>,
    #[serde(default)]
    pub principal_paid_extra_ytd: f64,
    #[serde(default)]
    pub principal_paid_extra_month: f64,
    #[serde(default)]
    pub progress: Option<MortgageProgress>,
}

/// Current trip plan. `dates` is the legacy freeform field, kept because the
/// backend still round-trips it alongside the structured dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripState {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub adults_only: bool,
    #[serde(default)]
    pub lodging_booked: bool,
    #[serde(default)]
    pub childcare_confirmed: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripUpdate {
    pub start_date: String,
    pub end_date: String,
    pub dates: String,
    pub adults_only: bool,
    pub lodging_booked: bool,
    pub childcare_confirmed: bool,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripHistoryEntry {
    pub id: String,
    pub trip_id: String,
    pub created_at: String,
    pub snapshot: TripState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftCreate {
    pub day: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftEntry {
    pub id: String,
    pub day: String,
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub id: String,
    #[serde(default)]
    pub sendgrid_sender_email: String,
    #[serde(default)]
    pub reminder_recipient_email: String,
    pub weekly_review_day: String,
    pub weekly_review_hour_local: i32,
    pub monthly_gift_day: i32,
    pub email_enabled: bool,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub sendgrid_api_key: String,
    pub sendgrid_sender_email: String,
    pub reminder_recipient_email: String,
    pub weekly_review_day: String,
    pub weekly_review_hour_local: i32,
    pub monthly_gift_day: i32,
    pub email_enabled: bool,
}

impl Default for SettingsUpdate {
    fn default() -> Self {
        Self {
            sendgrid_api_key: String::new(),
            sendgrid_sender_email: String::new(),
            reminder_recipient_email: String::new(),
            weekly_review_day: "Sun".to_string(),
            weekly_review_hour_local: 9,
            monthly_gift_day: 1,
            email_enabled: false,
        }
    }
}

/// In-app reminder emitted by the summary endpoint. `severity` is an open
/// string set; anything the client does not recognize renders informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    #[serde(default)]
    pub area: String,
    pub message: String,
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub today: String,
    #[serde(default)]
    pub current_wakeup_streak: u32,
    #[serde(default)]
    pub current_workout_streak: u32,
    #[serde(default)]
    pub week_wakeup_count: u32,
    #[serde(default)]
    pub week_workout_count: u32,
    #[serde(default)]
    pub week_video_count: u32,
    #[serde(default)]
    pub latest_weight_lbs: Option<f64>,
    #[serde(default)]
    pub latest_waist_in: Option<f64>,
    #[serde(default)]
    pub mortgage_target_principal: f64,
    #[serde(default)]
    pub mortgage_start_principal: f64,
    #[serde(default)]
    pub latest_principal_balance: Option<f64>,
    #[serde(default)]
    pub principal_paid_extra_ytd: f64,
    #[serde(default)]
    pub principal_paid_extra_month: f64,
    #[serde(default)]
    pub trip_lodging_booked: bool,
    #[serde(default)]
    pub trip_childcare_confirmed: bool,
    #[serde(default)]
    pub gifts_this_month: u32,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReview {
    #[serde(default)]
    pub week_start: String,
    #[serde(default)]
    pub week_end: String,
    #[serde(default)]
    pub wakeups_ge_4: bool,
    #[serde(default)]
    pub workouts_completed_5: bool,
    #[serde(default)]
    pub captured_at_least_1_video: bool,
    #[serde(default)]
    pub mortgage_action_taken: bool,
    #[serde(default)]
    pub relationship_action_taken: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub app: String,
}

/// Receipt from the admin wipe. Settings survive; photo files on disk are
/// left behind by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetReceipt {
    pub ok: bool,
    #[serde(default)]
    pub deleted: HashMap<String, u64>,
    #[serde(default)]
    pub note: String,
}

impl MetricKind {
    /// Whether this wire kind belongs to the waist series.
    pub fn is_waist(self) -> bool {
        matches!(self, MetricKind::BodyFat | MetricKind::Waist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    #[expect(clippy::unwrap_used)]
    fn metric_kind_tolerates_unknown_values() {
        let entry: MetricEntry = serde_json::from_str(
            r#"{"id":"1","day":"2026-03-01","kind":"grip_strength","value":55.0,"created_at":""}"#,
        )
        .unwrap();
        assert_eq!(entry.kind, MetricKind::Unknown);
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn waist_aliases_map_to_waist_series() {
        let body_fat: MetricKind = serde_json::from_str("\"body_fat\"").unwrap();
        let waist: MetricKind = serde_json::from_str("\"waist\"").unwrap();
        assert!(body_fat.is_waist());
        assert!(waist.is_waist());
        assert!(!MetricKind::Weight.is_waist());
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn summary_deserializes_with_missing_fields() {
        let summary: Summary = serde_json::from_str(r#"{"today":"2026-03-01"}"#).unwrap();
        assert_eq!(summary.current_wakeup_streak, 0);
        assert!(summary.reminders.is_empty());
    }
}
