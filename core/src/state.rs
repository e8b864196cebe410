//! The single application-state structure.
//!
//! All mutable client state lives in [`DashboardState`] and changes only
//! through the transition methods here (`begin`, `apply`, `fail`), so every
//! transition is testable without rendering. Failures are non-destructive:
//! the last good payload is retained through `Loading` and `Failed`.

use chrono::{Datelike, Days, NaiveDate};
use tracker_backend_client::{
    CheckIn, FitnessData, GiftEntry, MortgageEvent, MortgageSummary, Settings, Summary,
    TripHistoryEntry, TripState, WeeklyReview,
};

use crate::derived::{
    Badge, FitnessPoint, Kpi, merge_fitness_series, mortgage_ratio, reminder_badges, top_kpis,
};
use crate::sync::{BULK_REFRESH, ReadEndpoint, ReadOutcome};

/// Lifecycle of one data group: `Unloaded -> Loading -> Ready`, with
/// `Failed` possible at any attempt. `Loading` and `Failed` keep the last
/// good payload so a failure never blanks the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Unloaded,
    Loading(Option<T>),
    Ready(T),
    Failed(Option<T>),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Unloaded
    }
}

impl<T> Loadable<T> {
    /// Last known payload, regardless of lifecycle position.
    pub fn data(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            Loadable::Loading(prev) | Loadable::Failed(prev) => prev.as_ref(),
            Loadable::Unloaded => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Loadable::Failed(_))
    }

    fn begin(&mut self) {
        *self = match std::mem::take(self) {
            Loadable::Ready(value) => Loadable::Loading(Some(value)),
            Loadable::Loading(prev) | Loadable::Failed(prev) => Loadable::Loading(prev),
            Loadable::Unloaded => Loadable::Loading(None),
        };
    }

    fn succeed(&mut self, value: T) {
        *self = Loadable::Ready(value);
    }

    fn fail(&mut self) {
        *self = match std::mem::take(self) {
            Loadable::Ready(value) => Loadable::Failed(Some(value)),
            Loadable::Loading(prev) | Loadable::Failed(prev) => Loadable::Failed(prev),
            Loadable::Unloaded => Loadable::Failed(None),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Query scopes for the range-filtered reads. Editing a range never
/// auto-refetches; the next explicit refresh uses whatever values are
/// current at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranges {
    pub fitness: DateRange,
    pub mortgage: DateRange,
    /// Gift listing is pinned to the calendar month of "today" at load.
    pub gift_year: i32,
    pub gift_month: u32,
    pub trip_history_limit: u32,
}

impl Ranges {
    pub fn for_today(today: NaiveDate, fitness_range_days: u32, trip_history_limit: u32) -> Self {
        let lookback = Days::new(u64::from(fitness_range_days.saturating_sub(1)));
        let fitness_start = today.checked_sub_days(lookback).unwrap_or(today);
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self {
            fitness: DateRange {
                start: fitness_start,
                end: today,
            },
            mortgage: DateRange {
                start: year_start,
                end: today,
            },
            gift_year: today.year(),
            gift_month: today.month(),
            trip_history_limit,
        }
    }
}

/// Values recomputed from raw state after every successful apply. Never
/// carried across refreshes, so two identical applies derive identical
/// values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedView {
    pub fitness_series: Vec<FitnessPoint>,
    pub mortgage_ratio: f64,
    pub kpis: Option<[Kpi; 4]>,
    pub badges: Vec<Badge>,
}

#[derive(Debug)]
pub struct DashboardState {
    /// "Today" as captured at load; anchors the weekly review and the gift
    /// month for the whole session.
    pub today: NaiveDate,
    /// Current range filters, used by the next explicit refresh.
    pub ranges: Ranges,

    pub summary: Loadable<Summary>,
    pub weekly_review: Loadable<WeeklyReview>,
    pub checkins: Loadable<Vec<CheckIn>>,
    pub fitness: Loadable<FitnessData>,
    pub mortgage_summary: Loadable<MortgageSummary>,
    pub mortgage_events: Loadable<Vec<MortgageEvent>>,
    pub trip: Loadable<TripState>,
    pub trip_history: Loadable<Vec<TripHistoryEntry>>,
    pub gifts: Loadable<Vec<GiftEntry>>,
    pub settings: Loadable<Settings>,

    pub derived: DerivedView,

    /// The single current error message. Replaced, never stacked; cleared
    /// implicitly by the next successful apply.
    pub error: Option<String>,
    /// Global indicator for the all-endpoint refresh.
    pub bulk_loading: bool,
}

impl DashboardState {
    pub fn new(today: NaiveDate, ranges: Ranges) -> Self {
        Self {
            today,
            ranges,
            summary: Loadable::Unloaded,
            weekly_review: Loadable::Unloaded,
            checkins: Loadable::Unloaded,
            fitness: Loadable::Unloaded,
            mortgage_summary: Loadable::Unloaded,
            mortgage_events: Loadable::Unloaded,
            trip: Loadable::Unloaded,
            trip_history: Loadable::Unloaded,
            gifts: Loadable::Unloaded,
            settings: Loadable::Unloaded,
            derived: DerivedView::default(),
            error: None,
            bulk_loading: false,
        }
    }

    /// Marks the given groups as loading. A plan covering the full bulk set
    /// also raises the global loading indicator.
    pub fn begin(&mut self, endpoints: &[ReadEndpoint]) {
        for endpoint in endpoints {
            self.slot_begin(*endpoint);
        }
        if BULK_REFRESH.iter().all(|e| endpoints.contains(e)) {
            self.bulk_loading = true;
        }
    }

    /// Applies a complete set of fetched outcomes, recomputes derived view
    /// values, and clears the error banner. Callers only reach this with the
    /// whole group fetched; partial application never happens.
    pub fn apply(&mut self, outcomes: Vec<ReadOutcome>) {
        for outcome in outcomes {
            match outcome {
                ReadOutcome::Summary(v) => self.summary.succeed(v),
                ReadOutcome::WeeklyReview(v) => self.weekly_review.succeed(v),
                ReadOutcome::CheckIns(v) => self.checkins.succeed(v),
                ReadOutcome::FitnessMetrics(v) => self.fitness.succeed(v),
                ReadOutcome::MortgageSummary(v) => self.mortgage_summary.succeed(v),
                ReadOutcome::MortgageEvents(v) => self.mortgage_events.succeed(v),
                ReadOutcome::Trip(v) => self.trip.succeed(v),
                ReadOutcome::TripHistory(v) => self.trip_history.succeed(v),
                ReadOutcome::Gifts(v) => self.gifts.succeed(v),
                ReadOutcome::Settings(v) => self.settings.succeed(v),
            }
        }
        self.recompute_derived();
        self.error = None;
        self.bulk_loading = false;
    }

    /// Records a failed refresh attempt: the touched groups keep their last
    /// good payload and the single error message is replaced.
    pub fn fail(&mut self, endpoints: &[ReadEndpoint], message: String) {
        for endpoint in endpoints {
            self.slot_fail(*endpoint);
        }
        self.set_error(message);
    }

    /// Replaces the current error message (mutation failures land here
    /// without any group transition).
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.bulk_loading = false;
    }

    fn slot_begin(&mut self, endpoint: ReadEndpoint) {
        match endpoint {
            ReadEndpoint::Summary => self.summary.begin(),
            ReadEndpoint::WeeklyReview => self.weekly_review.begin(),
            ReadEndpoint::CheckIns => self.checkins.begin(),
            ReadEndpoint::FitnessMetrics => self.fitness.begin(),
            ReadEndpoint::MortgageSummary => self.mortgage_summary.begin(),
            ReadEndpoint::MortgageEvents => self.mortgage_events.begin(),
            ReadEndpoint::Trip => self.trip.begin(),
            ReadEndpoint::TripHistory => self.trip_history.begin(),
            ReadEndpoint::Gifts => self.gifts.begin(),
            ReadEndpoint::Settings => self.settings.begin(),
        }
    }

    fn slot_fail(&mut self, endpoint: ReadEndpoint) {
        match endpoint {
            ReadEndpoint::Summary => self.summary.fail(),
            ReadEndpoint::WeeklyReview => self.weekly_review.fail(),
            ReadEndpoint::CheckIns => self.checkins.fail(),
            ReadEndpoint::FitnessMetrics => self.fitness.fail(),
            ReadEndpoint::MortgageSummary => self.mortgage_summary.fail(),
            ReadEndpoint::MortgageEvents => self.mortgage_events.fail(),
            ReadEndpoint::Trip => self.trip.fail(),
            ReadEndpoint::TripHistory => self.trip_history.fail(),
            ReadEndpoint::Gifts => self.gifts.fail(),
            ReadEndpoint::Settings => self.settings.fail(),
        }
    }

    fn recompute_derived(&mut self) {
        let ratio = self
            .mortgage_summary
            .data()
            .map(mortgage_ratio)
            .unwrap_or(0.0);
        self.derived = DerivedView {
            fitness_series: self
                .fitness
                .data()
                .map(|data| merge_fitness_series(&data.metrics))
                .unwrap_or_default(),
            mortgage_ratio: ratio,
            kpis: self.summary.data().map(|s| top_kpis(s, ratio)),
            badges: self
                .summary
                .data()
                .map(|s| reminder_badges(&s.reminders))
                .unwrap_or_default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracker_backend_client::{MetricEntry, MetricKind, MortgageProgress};

    #[expect(clippy::expect_used)]
    fn day(s: &str) -> NaiveDate {
        s.parse().expect("date")
    }

    fn test_state() -> DashboardState {
        DashboardState::new(day("2026-03-01"), Ranges::for_today(day("2026-03-01"), 90, 25))
    }

    fn sample_outcomes() -> Vec<ReadOutcome> {
        vec![
            ReadOutcome::Summary(Summary {
                current_wakeup_streak: 2,
                week_video_count: 1,
                ..Default::default()
            }),
            ReadOutcome::FitnessMetrics(FitnessData {
                metrics: vec![MetricEntry {
                    id: "m1".to_string(),
                    day: "2026-03-01".to_string(),
                    kind: MetricKind::Weight,
                    value: 169.0,
                    created_at: String::new(),
                }],
                ..Default::default()
            }),
            ReadOutcome::MortgageSummary(MortgageSummary {
                mortgage_start_principal: 330_000.0,
                mortgage_target_principal: 300_000.0,
                principal_paid_extra_ytd: 15_000.0,
                progress: Some(MortgageProgress {
                    target_delta: 30_000.0,
                    paid_extra_ytd: 15_000.0,
                }),
                ..Default::default()
            }),
        ]
    }

    #[test]
    fn ranges_for_today_pin_month_and_year() {
        let ranges = Ranges::for_today(day("2026-03-15"), 90, 25);
        assert_eq!(ranges.fitness.end, day("2026-03-15"));
        assert_eq!(ranges.fitness.start, day("2025-12-16"));
        assert_eq!(ranges.mortgage.start, day("2026-01-01"));
        assert_eq!(ranges.gift_year, 2026);
        assert_eq!(ranges.gift_month, 3);
        assert_eq!(ranges.trip_history_limit, 25);
    }

    #[test]
    #[expect(clippy::expect_used)]
    fn apply_recomputes_derived_and_clears_error() {
        let mut state = test_state();
        state.set_error("Failed to refresh dashboard".to_string());
        state.begin(&[
            ReadEndpoint::Summary,
            ReadEndpoint::FitnessMetrics,
            ReadEndpoint::MortgageSummary,
        ]);
        state.apply(sample_outcomes());

        assert_eq!(state.error, None);
        assert_eq!(state.derived.mortgage_ratio, 0.5);
        assert_eq!(state.derived.fitness_series.len(), 1);
        let kpis = state.derived.kpis.as_ref().expect("kpis after apply");
        assert_eq!(kpis[3].value, "50%");
    }

    #[test]
    fn double_apply_is_idempotent() {
        let mut state = test_state();
        state.apply(sample_outcomes());
        let first = state.derived.clone();
        state.apply(sample_outcomes());
        assert_eq!(state.derived, first);
    }

    #[test]
    fn failure_retains_last_good_payload() {
        let mut state = test_state();
        state.apply(sample_outcomes());

        state.begin(&[ReadEndpoint::Summary]);
        assert!(state.summary.is_loading());
        assert!(state.summary.data().is_some());

        state.fail(
            &[ReadEndpoint::Summary],
            "request timed out".to_string(),
        );
        assert!(state.summary.is_failed());
        assert_eq!(
            state
                .summary
                .data()
                .map(|s| s.current_wakeup_streak),
            Some(2)
        );
        assert_eq!(state.error.as_deref(), Some("request timed out"));
    }

    #[test]
    fn later_error_replaces_earlier_one() {
        let mut state = test_state();
        state.set_error("Failed to add weight".to_string());
        state.set_error("day is required".to_string());
        assert_eq!(state.error.as_deref(), Some("day is required"));
    }

    #[test]
    fn bulk_begin_raises_global_indicator_and_apply_lowers_it() {
        let mut state = test_state();
        state.begin(BULK_REFRESH);
        assert!(state.bulk_loading);
        assert!(state.gifts.is_loading());

        state.begin(&[ReadEndpoint::Summary]);
        state.apply(sample_outcomes());
        assert!(!state.bulk_loading);
    }

    #[test]
    fn scoped_begin_does_not_raise_global_indicator() {
        let mut state = test_state();
        state.begin(&[ReadEndpoint::FitnessMetrics, ReadEndpoint::Summary]);
        assert!(!state.bulk_loading);
        assert!(state.fitness.is_loading());
        assert!(!state.trip.is_loading());
    }
}
