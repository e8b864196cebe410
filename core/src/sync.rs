//! Refetch choreography.
//!
//! Every mutation invalidates a fixed set of read endpoints, declared once in
//! [`refetch_plan`] rather than hand-coded per handler. The synchronizer
//! executes a plan by fanning out all reads concurrently and joining on the
//! whole group: one failure fails the group, and no partial results are
//! applied to state.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use tracker_backend_client::{
    ApiClient, CheckIn, ClientError, FitnessData, GiftEntry, MortgageEvent, MortgageSummary,
    Settings, Summary, TripHistoryEntry, TripState, WeeklyReview,
};

use crate::state::Ranges;

/// One read operation the client knows how to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadEndpoint {
    Summary,
    WeeklyReview,
    CheckIns,
    FitnessMetrics,
    MortgageSummary,
    MortgageEvents,
    Trip,
    TripHistory,
    Gifts,
    Settings,
}

/// The full read set, fetched on load and on manual refresh.
pub const BULK_REFRESH: &[ReadEndpoint] = &[
    ReadEndpoint::Summary,
    ReadEndpoint::WeeklyReview,
    ReadEndpoint::CheckIns,
    ReadEndpoint::FitnessMetrics,
    ReadEndpoint::MortgageSummary,
    ReadEndpoint::MortgageEvents,
    ReadEndpoint::Trip,
    ReadEndpoint::TripHistory,
    ReadEndpoint::Gifts,
    ReadEndpoint::Settings,
];

/// Mutations the client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    UpsertCheckIn,
    AddWeight,
    AddWaist,
    AddPhoto,
    AddPrincipalPayment,
    AddBalanceCheck,
    SaveTrip,
    AddGift,
    SaveSettings,
    AdminReset,
}

/// Maps each mutation to the exact read endpoints whose data it can affect.
///
/// Weekly review counts check-ins, mortgage actions, and gifts, so those
/// mutations refetch it; fitness mutations do not. A trip save never touches
/// mortgage data, and vice versa.
pub fn refetch_plan(mutation: MutationKind) -> &'static [ReadEndpoint] {
    use ReadEndpoint::*;
    match mutation {
        MutationKind::UpsertCheckIn => &[CheckIns, Summary, WeeklyReview],
        MutationKind::AddWeight | MutationKind::AddWaist | MutationKind::AddPhoto => {
            &[FitnessMetrics, Summary]
        }
        MutationKind::AddPrincipalPayment | MutationKind::AddBalanceCheck => {
            &[MortgageSummary, MortgageEvents, Summary, WeeklyReview]
        }
        MutationKind::SaveTrip => &[Trip, TripHistory, Summary],
        MutationKind::AddGift => &[Gifts, Summary, WeeklyReview],
        MutationKind::SaveSettings => &[Settings],
        MutationKind::AdminReset => BULK_REFRESH,
    }
}

impl MutationKind {
    /// Fixed last-resort error phrase for this operation, used when a failure
    /// carries neither a server detail nor a transport message.
    pub fn fallback_phrase(self) -> &'static str {
        match self {
            MutationKind::UpsertCheckIn => "Failed to save check-in",
            MutationKind::AddWeight => "Failed to add weight",
            MutationKind::AddWaist => "Failed to add waist measurement",
            MutationKind::AddPhoto => "Failed to upload photo",
            MutationKind::AddPrincipalPayment => "Failed to add payment",
            MutationKind::AddBalanceCheck => "Failed to add balance check",
            MutationKind::SaveTrip => "Failed to save trip plan",
            MutationKind::AddGift => "Failed to add gift",
            MutationKind::SaveSettings => "Failed to save settings",
            MutationKind::AdminReset => "Failed to reset data",
        }
    }
}

/// Fallback phrase for refresh failures.
pub const REFRESH_FALLBACK: &str = "Failed to refresh dashboard";

/// Normalizes any failure into the single user-facing message: server detail
/// first, then the transport-level message, then the fixed fallback phrase.
pub fn normalize_error(fallback: &str, err: &ClientError) -> String {
    if let Some(detail) = err.server_detail() {
        return detail.to_string();
    }
    match err {
        ClientError::Timeout | ClientError::Network(_) => err.to_string(),
        _ => fallback.to_string(),
    }
}

/// A fetched read result, tagged by endpoint.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    Summary(Summary),
    WeeklyReview(WeeklyReview),
    CheckIns(Vec<CheckIn>),
    FitnessMetrics(FitnessData),
    MortgageSummary(MortgageSummary),
    MortgageEvents(Vec<MortgageEvent>),
    Trip(TripState),
    TripHistory(Vec<TripHistoryEntry>),
    Gifts(Vec<GiftEntry>),
    Settings(Settings),
}

/// Executes refetch plans against the transport client.
///
/// The synchronizer holds no state of its own; fetched outcomes are applied
/// to [`crate::DashboardState`] by the caller, so the fetch and the state
/// transition stay independently testable.
#[derive(Clone)]
pub struct Synchronizer {
    client: Arc<ApiClient>,
}

impl Synchronizer {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Fetches every endpoint in `endpoints` concurrently, all-or-nothing.
    ///
    /// Range-scoped reads use the values in `ranges` at call time; the weekly
    /// review is anchored on `today`. The first failure fails the whole
    /// group and no outcomes are returned.
    pub async fn fetch(
        &self,
        endpoints: &[ReadEndpoint],
        ranges: &Ranges,
        today: NaiveDate,
    ) -> Result<Vec<ReadOutcome>, ClientError> {
        try_join_all(
            endpoints
                .iter()
                .map(|endpoint| self.fetch_one(*endpoint, ranges, today)),
        )
        .await
    }

    async fn fetch_one(
        &self,
        endpoint: ReadEndpoint,
        ranges: &Ranges,
        today: NaiveDate,
    ) -> Result<ReadOutcome, ClientError> {
        let client = &self.client;
        match endpoint {
            ReadEndpoint::Summary => client.summary().await.map(ReadOutcome::Summary),
            ReadEndpoint::WeeklyReview => client
                .weekly_review(today)
                .await
                .map(ReadOutcome::WeeklyReview),
            ReadEndpoint::CheckIns => client
                .list_checkins(ranges.fitness.start, ranges.fitness.end)
                .await
                .map(ReadOutcome::CheckIns),
            ReadEndpoint::FitnessMetrics => client
                .fitness_metrics(ranges.fitness.start, ranges.fitness.end)
                .await
                .map(ReadOutcome::FitnessMetrics),
            ReadEndpoint::MortgageSummary => client
                .mortgage_summary()
                .await
                .map(ReadOutcome::MortgageSummary),
            ReadEndpoint::MortgageEvents => client
                .list_mortgage_events(ranges.mortgage.start, ranges.mortgage.end)
                .await
                .map(ReadOutcome::MortgageEvents),
            ReadEndpoint::Trip => client.trip().await.map(ReadOutcome::Trip),
            ReadEndpoint::TripHistory => client
                .trip_history(ranges.trip_history_limit)
                .await
                .map(ReadOutcome::TripHistory),
            ReadEndpoint::Gifts => client
                .list_gifts(ranges.gift_year, ranges.gift_month)
                .await
                .map(ReadOutcome::Gifts),
            ReadEndpoint::Settings => client.settings().await.map(ReadOutcome::Settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bulk_plan_covers_every_endpoint_once() {
        let mut seen = std::collections::HashSet::new();
        for endpoint in BULK_REFRESH {
            assert!(seen.insert(endpoint), "duplicate endpoint {endpoint:?}");
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn fitness_mutations_touch_only_fitness_and_summary() {
        for mutation in [
            MutationKind::AddWeight,
            MutationKind::AddWaist,
            MutationKind::AddPhoto,
        ] {
            assert_eq!(
                refetch_plan(mutation),
                &[ReadEndpoint::FitnessMetrics, ReadEndpoint::Summary],
            );
        }
    }

    #[test]
    fn trip_saves_never_refetch_mortgage_data() {
        let plan = refetch_plan(MutationKind::SaveTrip);
        assert!(!plan.contains(&ReadEndpoint::MortgageSummary));
        assert!(!plan.contains(&ReadEndpoint::MortgageEvents));
        assert_eq!(
            plan,
            &[
                ReadEndpoint::Trip,
                ReadEndpoint::TripHistory,
                ReadEndpoint::Summary
            ],
        );
    }

    #[test]
    fn weekly_review_refetched_for_checkin_mortgage_and_gift_mutations() {
        for mutation in [
            MutationKind::UpsertCheckIn,
            MutationKind::AddPrincipalPayment,
            MutationKind::AddBalanceCheck,
            MutationKind::AddGift,
        ] {
            assert!(refetch_plan(mutation).contains(&ReadEndpoint::WeeklyReview));
        }
        assert!(!refetch_plan(MutationKind::AddWeight).contains(&ReadEndpoint::WeeklyReview));
    }

    #[test]
    fn settings_saves_are_self_contained() {
        assert_eq!(
            refetch_plan(MutationKind::SaveSettings),
            &[ReadEndpoint::Settings]
        );
    }

    #[test]
    fn reset_invalidates_everything() {
        assert_eq!(refetch_plan(MutationKind::AdminReset), BULK_REFRESH);
    }

    #[test]
    fn normalize_prefers_server_detail() {
        let err = ClientError::Api {
            status: 400,
            detail: "day is required".to_string(),
        };
        assert_eq!(
            normalize_error(MutationKind::AddPrincipalPayment.fallback_phrase(), &err),
            "day is required"
        );
    }

    #[test]
    fn normalize_uses_transport_message_for_timeouts() {
        assert_eq!(
            normalize_error("Failed to add payment", &ClientError::Timeout),
            "request timed out"
        );
    }

    #[test]
    fn normalize_falls_back_to_operation_phrase() {
        let err = ClientError::Decode("truncated body".to_string());
        assert_eq!(
            normalize_error(MutationKind::AddPrincipalPayment.fallback_phrase(), &err),
            "Failed to add payment"
        );
    }
}
