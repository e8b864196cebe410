use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::load_app_password;
use crate::error::{ClientError, Result};
use crate::types::*;

/// Fallback origin when no backend address is configured. The hosted
/// deployment reverse-proxies `/api` on the app's own origin; the native
/// client's equivalent is a backend on the local machine.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

/// Fixed upper bound for every request. There is no retry; a timeout is
/// terminal for that action.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Header carrying the shared secret. Omitted entirely when no secret is
/// stored; the backend decides whether to reject unauthenticated calls.
const APP_PASSWORD_HEADER: &str = "x-app-password";

/// Resolves the backend origin once at startup: an explicitly configured
/// address wins, else the default local origin.
pub fn resolve_base_url(explicit: Option<&str>) -> Result<Url> {
    let raw = explicit.unwrap_or(DEFAULT_ORIGIN);
    Url::parse(raw).map_err(|err| ClientError::BaseUrl(format!("{raw}: {err}")))
}

/// Typed client for the tracker backend. One method per backend operation.
///
/// The shared secret is re-read from disk for every request, so it can change
/// between requests if updated externally.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    home: PathBuf,
}

impl ApiClient {
    pub fn new(base: Url, home: PathBuf) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::from_reqwest)?;
        Ok(Self { http, base, home })
    }

    /// Builds a client around an existing `reqwest::Client`. Used by tests.
    pub fn with_http(http: reqwest::Client, base: Url, home: PathBuf) -> Self {
        Self { http, base, home }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a server-relative asset path (photo links).
    pub fn asset_url(&self, relative: &str) -> String {
        match self.base.join(relative) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{relative}", self.base),
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base
            .join(path)
            .map_err(|err| ClientError::BaseUrl(format!("{path}: {err}")))?;
        let mut headers = HeaderMap::new();
        if let Some(password) = load_app_password(&self.home) {
            match HeaderValue::from_str(&password) {
                Ok(value) => {
                    headers.insert(APP_PASSWORD_HEADER, value);
                }
                Err(_) => {
                    tracing::warn!("stored app password is not a valid header value; omitting");
                }
            }
        }
        Ok(self.http.request(method, url).headers(headers))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(ClientError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response.text().await.ok()));
        }
        response.json::<T>().await.map_err(ClientError::from_reqwest)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.send(builder).await
    }

    // ---- reads ----

    pub async fn health(&self) -> Result<HealthStatus> {
        self.get_json("/api/health", &[]).await
    }

    pub async fn summary(&self) -> Result<Summary> {
        self.get_json("/api/summary", &[]).await
    }

    pub async fn weekly_review(&self, anchor_day: NaiveDate) -> Result<WeeklyReview> {
        self.get_json(
            "/api/review/weekly",
            &[("anchor_day", anchor_day.to_string())],
        )
        .await
    }

    pub async fn list_checkins(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CheckIn>> {
        self.get_json(
            "/api/checkins",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    pub async fn fitness_metrics(&self, start: NaiveDate, end: NaiveDate) -> Result<FitnessData> {
        self.get_json(
            "/api/fitness/metrics",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    pub async fn mortgage_summary(&self) -> Result<MortgageSummary> {
        self.get_json("/api/mortgage/summary", &[]).await
    }

    pub async fn list_mortgage_events(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MortgageEvent>> {
        self.get_json(
            "/api/mortgage/events",
            &[("start", start.to_string()), ("end", end.to_string())],
        )
        .await
    }

    pub async fn trip(&self) -> Result<TripState> {
        self.get_json("/api/relationship/trip", &[]).await
    }

    pub async fn trip_history(&self, limit: u32) -> Result<Vec<TripHistoryEntry>> {
        self.get_json("/api/relationship/trip/history", &[("limit", limit.to_string())])
            .await
    }

    pub async fn list_gifts(&self, year: i32, month: u32) -> Result<Vec<GiftEntry>> {
        self.get_json(
            "/api/relationship/gifts",
            &[("year", year.to_string()), ("month", month.to_string())],
        )
        .await
    }

    pub async fn settings(&self) -> Result<Settings> {
        self.get_json("/api/settings", &[]).await
    }

    // ---- writes ----

    pub async fn upsert_checkin(&self, payload: &CheckInUpsert) -> Result<CheckIn> {
        let builder = self.request(Method::POST, "/api/checkins/upsert")?.json(payload);
        self.send(builder).await
    }

    pub async fn add_weight(&self, day: NaiveDate, weight_lbs: f64) -> Result<MetricEntry> {
        let builder = self
            .request(Method::POST, "/api/fitness/weight")?
            .json(&serde_json::json!({ "day": day.to_string(), "weight_lbs": weight_lbs }));
        self.send(builder).await
    }

    /// Records a waist measurement. The backend's write path for this series
    /// is still the body-fat endpoint; only the client-side label changed.
    pub async fn add_waist(&self, day: NaiveDate, waist_in: f64) -> Result<MetricEntry> {
        let builder = self
            .request(Method::POST, "/api/fitness/body-fat")?
            .json(&serde_json::json!({ "day": day.to_string(), "body_fat_pct": waist_in }));
        self.send(builder).await
    }

    pub async fn upload_photo(
        &self,
        day: NaiveDate,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<PhotoEntry> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));
        let builder = self
            .request(Method::POST, "/api/fitness/photo")?
            .query(&[("day", day.to_string())])
            .multipart(form);
        self.send(builder).await
    }

    pub async fn add_principal_payment(
        &self,
        payload: &PrincipalPaymentCreate,
    ) -> Result<MortgageEvent> {
        let builder = self
            .request(Method::POST, "/api/mortgage/principal-payment")?
            .json(payload);
        self.send(builder).await
    }

    pub async fn add_balance_check(&self, payload: &BalanceCheckCreate) -> Result<MortgageEvent> {
        let builder = self
            .request(Method::POST, "/api/mortgage/balance-check")?
            .json(payload);
        self.send(builder).await
    }

    pub async fn update_trip(&self, payload: &TripUpdate) -> Result<TripState> {
        let builder = self.request(Method::PUT, "/api/relationship/trip")?.json(payload);
        self.send(builder).await
    }

    pub async fn add_gift(&self, payload: &GiftCreate) -> Result<GiftEntry> {
        let builder = self
            .request(Method::POST, "/api/relationship/gifts")?
            .json(payload);
        self.send(builder).await
    }

    pub async fn update_settings(&self, payload: &SettingsUpdate) -> Result<Settings> {
        let builder = self.request(Method::PUT, "/api/settings")?.json(payload);
        self.send(builder).await
    }

    /// Wipes all user-entered data. The backend requires the literal
    /// confirmation string `RESET`; callers collect it from the user.
    pub async fn admin_reset(&self, confirm: &str) -> Result<ResetReceipt> {
        let builder = self
            .request(Method::POST, "/api/admin/reset")?
            .query(&[("confirm", confirm.to_string())]);
        self.send(builder).await
    }
}

/// Maps a non-success response to `ClientError::Api`, preferring the
/// backend's `{"detail": ...}` body when present.
fn error_from_response(status: StatusCode, body: Option<String>) -> ClientError {
    let detail = body
        .as_deref()
        .and_then(extract_detail)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
    ClientError::Api {
        status: status.as_u16(),
        detail,
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        // Validation errors arrive as a structured list; keep it readable.
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    #[expect(clippy::expect_used)]
    fn resolve_base_url_prefers_explicit() {
        let url = resolve_base_url(Some("https://tracker.example.com")).expect("parse");
        assert_eq!(url.as_str(), "https://tracker.example.com/");
    }

    #[test]
    #[expect(clippy::expect_used)]
    fn resolve_base_url_falls_back_to_default_origin() {
        let url = resolve_base_url(None).expect("parse");
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn resolve_base_url_rejects_garbage() {
        assert!(resolve_base_url(Some("not a url")).is_err());
    }

    #[test]
    fn extract_detail_prefers_server_string() {
        assert_eq!(
            extract_detail(r#"{"detail":"day is required"}"#),
            Some("day is required".to_string())
        );
    }

    #[test]
    fn extract_detail_handles_non_json_bodies() {
        assert_eq!(extract_detail("<html>502</html>"), None);
    }

    #[test]
    fn error_from_response_falls_back_to_status_phrase() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, Some("<html></html>".to_string()));
        match err {
            ClientError::Api { status, detail } => {
                assert_eq!(status, 502);
                assert_eq!(detail, "request failed with status 502");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[expect(clippy::expect_used)]
    fn asset_url_joins_relative_paths() {
        let client = ApiClient::with_http(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:8000").expect("url"),
            PathBuf::from("/tmp/does-not-exist"),
        );
        assert_eq!(
            client.asset_url("/api/uploads/2026-03-01-abc.jpg"),
            "http://127.0.0.1:8000/api/uploads/2026-03-01-abc.jpg"
        );
    }
}
