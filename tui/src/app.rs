//! App state and event handling for the terminal client.
//!
//! The app owns the [`DashboardState`] and all form state. Background work
//! (mutations and refetches) runs on the tokio runtime and reports back
//! through the app-event channel; nothing here blocks on the network.

use std::future::Future;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum_macros::Display;
use tokio::runtime::Handle;
use tracker_backend_client::{
    ApiClient, BalanceCheckCreate, CheckInUpsert, GiftCreate, PrincipalPaymentCreate,
    SettingsUpdate, TripUpdate,
};
use tracker_core::sync::{REFRESH_FALLBACK, normalize_error, refetch_plan};
use tracker_core::{BULK_REFRESH, DashboardState, MutationKind, ReadEndpoint, Synchronizer};

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::forms::{self, Field, Form, FormAction, TabForms};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Tab {
    Dashboard,
    Fitness,
    Mortgage,
    Relationship,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Fitness,
        Tab::Mortgage,
        Tab::Relationship,
        Tab::Settings,
    ];

    fn next(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// Field indices, per form. Kept as constants so the submit handlers and the
// renderer agree on the layout.
pub mod field {
    pub mod checkin {
        pub const DAY: usize = 0;
        pub const WAKEUP: usize = 1;
        pub const WORKOUT: usize = 2;
        pub const VIDEO: usize = 3;
        pub const NOTES: usize = 4;
    }
    pub mod fitness_entry {
        pub const DAY: usize = 0;
        pub const KIND: usize = 1;
        pub const VALUE: usize = 2;
        pub const PHOTO_PATH: usize = 3;
    }
    pub mod range {
        pub const FROM: usize = 0;
        pub const TO: usize = 1;
    }
    pub mod mortgage_entry {
        pub const DAY: usize = 0;
        pub const KIND: usize = 1;
        pub const AMOUNT: usize = 2;
        pub const NOTE: usize = 3;
    }
    pub mod trip {
        pub const START: usize = 0;
        pub const END: usize = 1;
        pub const ADULTS_ONLY: usize = 2;
        pub const LODGING: usize = 3;
        pub const CHILDCARE: usize = 4;
        pub const NOTES: usize = 5;
    }
    pub mod gift {
        pub const DAY: usize = 0;
        pub const DESCRIPTION: usize = 1;
        pub const AMOUNT: usize = 2;
    }
    pub mod settings {
        pub const SENDER: usize = 0;
        pub const RECIPIENT: usize = 1;
        pub const REVIEW_DAY: usize = 2;
        pub const REVIEW_HOUR: usize = 3;
        pub const GIFT_DAY: usize = 4;
        pub const EMAIL_ENABLED: usize = 5;
        pub const API_KEY: usize = 6;
    }
    pub mod reset {
        pub const CONFIRM: usize = 0;
    }
}

const FITNESS_KINDS: &[&str] = &["weight", "waist", "photo"];
const MORTGAGE_KINDS: &[&str] = &["principal payment", "balance check"];
const WEEKDAYS: &[&str] = &["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const FITNESS_ONLY: &[ReadEndpoint] = &[ReadEndpoint::FitnessMetrics];
const MORTGAGE_EVENTS_ONLY: &[ReadEndpoint] = &[ReadEndpoint::MortgageEvents];

pub struct App {
    pub state: DashboardState,
    pub tab: Tab,
    pub backend_ok: Option<bool>,
    pub should_exit: bool,

    pub dashboard_forms: TabForms,
    pub fitness_forms: TabForms,
    pub mortgage_forms: TabForms,
    pub relationship_forms: TabForms,
    pub settings_forms: TabForms,

    sync: Synchronizer,
    sender: AppEventSender,
    runtime: Handle,
    trip_prefilled: bool,
    settings_prefilled: bool,
}

impl App {
    pub fn new(
        state: DashboardState,
        sync: Synchronizer,
        sender: AppEventSender,
        runtime: Handle,
    ) -> Self {
        let today = state.today.to_string();
        let ranges = state.ranges.clone();

        let dashboard_forms = TabForms::new(vec![Form::new(
            "Daily check-in",
            vec![
                Field::text_with("Day", &today),
                Field::toggle("Up at 5am", false),
                Field::toggle("Workout", false),
                Field::toggle("Video captured", false),
                Field::text("Notes"),
            ],
        )]);

        let fitness_forms = TabForms::new(vec![
            Form::new(
                "Log measurement",
                vec![
                    Field::text_with("Day", &today),
                    Field::choice("Kind", FITNESS_KINDS),
                    Field::text("Value"),
                    Field::text("Photo path"),
                ],
            ),
            Form::new(
                "Range (apply with Enter)",
                vec![
                    Field::text_with("From", &ranges.fitness.start.to_string()),
                    Field::text_with("To", &ranges.fitness.end.to_string()),
                ],
            ),
        ]);

        let mortgage_forms = TabForms::new(vec![
            Form::new(
                "Log mortgage event",
                vec![
                    Field::text_with("Day", &today),
                    Field::choice("Kind", MORTGAGE_KINDS),
                    Field::text("Amount"),
                    Field::text("Note"),
                ],
            ),
            Form::new(
                "Range (apply with Enter)",
                vec![
                    Field::text_with("From", &ranges.mortgage.start.to_string()),
                    Field::text_with("To", &ranges.mortgage.end.to_string()),
                ],
            ),
        ]);

        let relationship_forms = TabForms::new(vec![
            Form::new(
                "Trip plan",
                vec![
                    Field::text("Start date"),
                    Field::text("End date"),
                    Field::toggle("Adults only", true),
                    Field::toggle("Lodging booked", false),
                    Field::toggle("Childcare confirmed", false),
                    Field::text("Notes"),
                ],
            ),
            Form::new(
                "Log gift / gesture",
                vec![
                    Field::text_with("Day", &today),
                    Field::text("Description"),
                    Field::text("Amount"),
                ],
            ),
        ]);

        let settings_forms = TabForms::new(vec![
            Form::new(
                "Notification settings",
                vec![
                    Field::text("Sender email"),
                    Field::text("Recipient email"),
                    Field::choice("Weekly review day", WEEKDAYS),
                    Field::text("Review hour (local)"),
                    Field::text("Monthly gift day"),
                    Field::toggle("Email enabled", false),
                    Field::text("SendGrid API key"),
                ],
            ),
            Form::new(
                "Danger zone",
                vec![Field::text("Type RESET and press Enter to wipe data")],
            ),
        ]);

        Self {
            state,
            tab: Tab::Dashboard,
            backend_ok: None,
            should_exit: false,
            dashboard_forms,
            fitness_forms,
            mortgage_forms,
            relationship_forms,
            settings_forms,
            sync,
            sender,
            runtime,
            trip_prefilled: false,
            settings_prefilled: false,
        }
    }

    /// Kicks off the startup work: connectivity probe plus the initial bulk
    /// refresh of every read endpoint.
    pub fn start(&mut self) {
        let client = self.sync.client().clone();
        let tx = self.sender.clone();
        self.runtime.spawn(async move {
            let ok = client.health().await.is_ok();
            tx.send(AppEvent::HealthChecked(ok));
        });
        self.spawn_refresh(BULK_REFRESH);
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize => {}
            AppEvent::RefreshStarted(endpoints) => self.state.begin(endpoints),
            AppEvent::RefreshApplied(outcomes) => {
                self.state.apply(outcomes);
                self.prefill_forms();
            }
            AppEvent::RefreshFailed { endpoints, message } => self.state.fail(endpoints, message),
            AppEvent::MutationFailed { message } => self.state.set_error(message),
            AppEvent::HealthChecked(ok) => self.backend_ok = Some(ok),
            AppEvent::ExitRequest => self.should_exit = true,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_exit = true;
                    return;
                }
                KeyCode::Char('r') => {
                    self.spawn_refresh(BULK_REFRESH);
                    return;
                }
                _ => {}
            }
        }
        match key.code {
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Esc => self.state.error = None,
            _ => {
                let action = self.active_forms_mut().handle_key(key);
                if let FormAction::Submit(form) = action {
                    self.submit(form);
                }
            }
        }
    }

    fn active_forms_mut(&mut self) -> &mut TabForms {
        match self.tab {
            Tab::Dashboard => &mut self.dashboard_forms,
            Tab::Fitness => &mut self.fitness_forms,
            Tab::Mortgage => &mut self.mortgage_forms,
            Tab::Relationship => &mut self.relationship_forms,
            Tab::Settings => &mut self.settings_forms,
        }
    }

    /// Absolute link for a server-relative photo URL.
    pub fn photo_url(&self, relative: &str) -> String {
        self.sync.client().asset_url(relative)
    }

    pub fn backend_origin(&self) -> String {
        self.sync.client().base_url().to_string()
    }

    pub fn active_forms(&self) -> &TabForms {
        match self.tab {
            Tab::Dashboard => &self.dashboard_forms,
            Tab::Fitness => &self.fitness_forms,
            Tab::Mortgage => &self.mortgage_forms,
            Tab::Relationship => &self.relationship_forms,
            Tab::Settings => &self.settings_forms,
        }
    }

    fn submit(&mut self, form: usize) {
        let result = match (self.tab, form) {
            (Tab::Dashboard, 0) => self.submit_checkin(),
            (Tab::Fitness, 0) => self.submit_fitness_entry(),
            (Tab::Fitness, 1) => self.submit_fitness_range(),
            (Tab::Mortgage, 0) => self.submit_mortgage_entry(),
            (Tab::Mortgage, 1) => self.submit_mortgage_range(),
            (Tab::Relationship, 0) => self.submit_trip(),
            (Tab::Relationship, 1) => self.submit_gift(),
            (Tab::Settings, 0) => self.submit_settings(),
            (Tab::Settings, 1) => self.submit_reset(),
            _ => Ok(()),
        };
        if let Err(message) = result {
            self.state.set_error(message);
        }
    }

    fn submit_checkin(&mut self) -> Result<(), String> {
        use field::checkin::*;
        let form = &self.dashboard_forms.forms[0];
        let day = forms::parse_day(form.text_value(DAY))?;
        let payload = CheckInUpsert {
            day: day.to_string(),
            wakeup_5am: form.toggle_value(WAKEUP),
            workout: form.toggle_value(WORKOUT),
            video_captured: form.toggle_value(VIDEO),
            notes: form.text_value(NOTES).to_string(),
        };
        self.spawn_mutation(MutationKind::UpsertCheckIn, move |client| async move {
            client.upsert_checkin(&payload).await
        });
        Ok(())
    }

    fn submit_fitness_entry(&mut self) -> Result<(), String> {
        use field::fitness_entry::*;
        let form = &self.fitness_forms.forms[0];
        let day = forms::parse_day(form.text_value(DAY))?;
        match form.choice_value(KIND) {
            "weight" => {
                let value = forms::parse_amount(form.text_value(VALUE), "weight")?;
                self.spawn_mutation(MutationKind::AddWeight, move |client| async move {
                    client.add_weight(day, value).await
                });
            }
            "waist" => {
                let value = forms::parse_amount(form.text_value(VALUE), "waist")?;
                self.spawn_mutation(MutationKind::AddWaist, move |client| async move {
                    client.add_waist(day, value).await
                });
            }
            _ => {
                // Missing file fails here, before any request exists.
                let (filename, bytes) = forms::read_photo(form.text_value(PHOTO_PATH))?;
                self.spawn_mutation(MutationKind::AddPhoto, move |client| async move {
                    client.upload_photo(day, &filename, bytes).await
                });
            }
        }
        self.fitness_forms.forms[0].set_text(VALUE, "");
        self.fitness_forms.forms[0].set_text(PHOTO_PATH, "");
        Ok(())
    }

    fn submit_fitness_range(&mut self) -> Result<(), String> {
        use field::range::*;
        let form = &self.fitness_forms.forms[1];
        let start = forms::parse_day(form.text_value(FROM))?;
        let end = forms::parse_day(form.text_value(TO))?;
        self.state.ranges.fitness.start = start;
        self.state.ranges.fitness.end = end;
        self.spawn_refresh(FITNESS_ONLY);
        Ok(())
    }

    fn submit_mortgage_entry(&mut self) -> Result<(), String> {
        use field::mortgage_entry::*;
        let form = &self.mortgage_forms.forms[0];
        let day = forms::parse_day(form.text_value(DAY))?;
        let note = form.text_value(NOTE).to_string();
        if form.choice_value(KIND) == "principal payment" {
            let amount = forms::parse_amount(form.text_value(AMOUNT), "amount")?;
            let payload = PrincipalPaymentCreate {
                day: day.to_string(),
                amount,
                note,
            };
            self.spawn_mutation(MutationKind::AddPrincipalPayment, move |client| async move {
                client.add_principal_payment(&payload).await
            });
        } else {
            let balance = forms::parse_amount(form.text_value(AMOUNT), "balance")?;
            let payload = BalanceCheckCreate {
                day: day.to_string(),
                principal_balance: balance,
                note,
            };
            self.spawn_mutation(MutationKind::AddBalanceCheck, move |client| async move {
                client.add_balance_check(&payload).await
            });
        }
        self.mortgage_forms.forms[0].set_text(AMOUNT, "");
        self.mortgage_forms.forms[0].set_text(NOTE, "");
        Ok(())
    }

    fn submit_mortgage_range(&mut self) -> Result<(), String> {
        use field::range::*;
        let form = &self.mortgage_forms.forms[1];
        let start = forms::parse_day(form.text_value(FROM))?;
        let end = forms::parse_day(form.text_value(TO))?;
        self.state.ranges.mortgage.start = start;
        self.state.ranges.mortgage.end = end;
        self.spawn_refresh(MORTGAGE_EVENTS_ONLY);
        Ok(())
    }

    fn submit_trip(&mut self) -> Result<(), String> {
        use field::trip::*;
        let form = &self.relationship_forms.forms[0];
        let payload = TripUpdate {
            start_date: forms::parse_optional_day(form.text_value(START))?,
            end_date: forms::parse_optional_day(form.text_value(END))?,
            dates: String::new(),
            adults_only: form.toggle_value(ADULTS_ONLY),
            lodging_booked: form.toggle_value(LODGING),
            childcare_confirmed: form.toggle_value(CHILDCARE),
            notes: form.text_value(NOTES).to_string(),
        };
        self.spawn_mutation(MutationKind::SaveTrip, move |client| async move {
            client.update_trip(&payload).await
        });
        Ok(())
    }

    fn submit_gift(&mut self) -> Result<(), String> {
        use field::gift::*;
        let form = &self.relationship_forms.forms[1];
        let day = forms::parse_day(form.text_value(DAY))?;
        let description = form.text_value(DESCRIPTION).trim().to_string();
        if description.is_empty() {
            return Err("description required".to_string());
        }
        let amount_raw = form.text_value(AMOUNT).trim();
        let amount = if amount_raw.is_empty() {
            0.0
        } else {
            forms::parse_amount(amount_raw, "amount")?
        };
        let payload = GiftCreate {
            day: day.to_string(),
            description,
            amount,
        };
        self.spawn_mutation(MutationKind::AddGift, move |client| async move {
            client.add_gift(&payload).await
        });
        self.relationship_forms.forms[1].set_text(DESCRIPTION, "");
        self.relationship_forms.forms[1].set_text(AMOUNT, "");
        Ok(())
    }

    fn submit_settings(&mut self) -> Result<(), String> {
        use field::settings::*;
        let form = &self.settings_forms.forms[0];
        let review_hour = form
            .text_value(REVIEW_HOUR)
            .trim()
            .parse()
            .map_err(|_| "Invalid review hour".to_string())?;
        let gift_day = form
            .text_value(GIFT_DAY)
            .trim()
            .parse()
            .map_err(|_| "Invalid gift day".to_string())?;
        let payload = SettingsUpdate {
            sendgrid_api_key: form.text_value(API_KEY).to_string(),
            sendgrid_sender_email: form.text_value(SENDER).to_string(),
            reminder_recipient_email: form.text_value(RECIPIENT).to_string(),
            weekly_review_day: form.choice_value(REVIEW_DAY).to_string(),
            weekly_review_hour_local: review_hour,
            monthly_gift_day: gift_day,
            email_enabled: form.toggle_value(EMAIL_ENABLED),
        };
        self.spawn_mutation(MutationKind::SaveSettings, move |client| async move {
            client.update_settings(&payload).await
        });
        Ok(())
    }

    fn submit_reset(&mut self) -> Result<(), String> {
        use field::reset::*;
        let confirm = self.settings_forms.forms[1]
            .text_value(CONFIRM)
            .trim()
            .to_string();
        if confirm != "RESET" {
            return Err("Type RESET to confirm the wipe".to_string());
        }
        self.settings_forms.forms[1].set_text(CONFIRM, "");
        self.spawn_mutation(MutationKind::AdminReset, move |client| async move {
            client.admin_reset("RESET").await
        });
        Ok(())
    }

    /// Seeds the trip and settings forms from the first successful fetch, so
    /// saving without edits round-trips the current values.
    fn prefill_forms(&mut self) {
        if !self.trip_prefilled
            && let Some(trip) = self.state.trip.data()
        {
            use field::trip::*;
            let trip = trip.clone();
            let form = &mut self.relationship_forms.forms[0];
            form.set_text(START, &trip.start_date);
            form.set_text(END, &trip.end_date);
            form.set_toggle(ADULTS_ONLY, trip.adults_only);
            form.set_toggle(LODGING, trip.lodging_booked);
            form.set_toggle(CHILDCARE, trip.childcare_confirmed);
            form.set_text(NOTES, &trip.notes);
            self.trip_prefilled = true;
        }
        if !self.settings_prefilled
            && let Some(settings) = self.state.settings.data()
        {
            use field::settings::*;
            let settings = settings.clone();
            let form = &mut self.settings_forms.forms[0];
            form.set_text(SENDER, &settings.sendgrid_sender_email);
            form.set_text(RECIPIENT, &settings.reminder_recipient_email);
            form.set_choice(REVIEW_DAY, &settings.weekly_review_day);
            form.set_text(REVIEW_HOUR, &settings.weekly_review_hour_local.to_string());
            form.set_text(GIFT_DAY, &settings.monthly_gift_day.to_string());
            form.set_toggle(EMAIL_ENABLED, settings.email_enabled);
            self.settings_prefilled = true;
        }
    }

    /// Fetches `endpoints` in the background and applies the result through
    /// the event channel. Ranges are captured now, so a later edit does not
    /// retroactively change an in-flight refresh.
    fn spawn_refresh(&mut self, endpoints: &'static [ReadEndpoint]) {
        self.state.begin(endpoints);
        let sync = self.sync.clone();
        let tx = self.sender.clone();
        let ranges = self.state.ranges.clone();
        let today = self.state.today;
        self.runtime.spawn(async move {
            match sync.fetch(endpoints, &ranges, today).await {
                Ok(outcomes) => tx.send(AppEvent::RefreshApplied(outcomes)),
                Err(err) => tx.send(AppEvent::RefreshFailed {
                    endpoints,
                    message: normalize_error(REFRESH_FALLBACK, &err),
                }),
            }
        });
    }

    /// Runs a mutation in the background; on success the mutation's refetch
    /// plan is executed, on failure a normalized message lands in the error
    /// banner. There is no retry and no de-duplication of rapid submits.
    fn spawn_mutation<T, Fut>(
        &self,
        kind: MutationKind,
        op: impl FnOnce(Arc<ApiClient>) -> Fut + Send + 'static,
    ) where
        Fut: Future<Output = tracker_backend_client::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let sync = self.sync.clone();
        let tx = self.sender.clone();
        let ranges = self.state.ranges.clone();
        let today = self.state.today;
        self.runtime.spawn(async move {
            match op(sync.client().clone()).await {
                Ok(_) => {
                    let plan = refetch_plan(kind);
                    tx.send(AppEvent::RefreshStarted(plan));
                    match sync.fetch(plan, &ranges, today).await {
                        Ok(outcomes) => tx.send(AppEvent::RefreshApplied(outcomes)),
                        Err(err) => tx.send(AppEvent::RefreshFailed {
                            endpoints: plan,
                            message: normalize_error(REFRESH_FALLBACK, &err),
                        }),
                    }
                }
                Err(err) => tx.send(AppEvent::MutationFailed {
                    message: normalize_error(kind.fallback_phrase(), &err),
                }),
            }
        });
    }
}
