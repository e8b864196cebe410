//! Form state for the tab views.
//!
//! Forms are plain client-side state: nothing here talks to the network.
//! Validation that can fail before a request is built (unparsable dates,
//! missing photo file, empty gift description) happens in the submit
//! handlers in `app.rs`, using the parse helpers at the bottom of this file.

use chrono::NaiveDate;
use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

#[derive(Debug)]
pub enum Field {
    Text {
        label: &'static str,
        input: Input,
    },
    Toggle {
        label: &'static str,
        value: bool,
    },
    Choice {
        label: &'static str,
        options: &'static [&'static str],
        selected: usize,
    },
}

impl Field {
    pub fn text(label: &'static str) -> Self {
        Field::Text {
            label,
            input: Input::default(),
        }
    }

    pub fn text_with(label: &'static str, value: &str) -> Self {
        Field::Text {
            label,
            input: Input::new(value.to_string()),
        }
    }

    pub fn toggle(label: &'static str, value: bool) -> Self {
        Field::Toggle { label, value }
    }

    pub fn choice(label: &'static str, options: &'static [&'static str]) -> Self {
        Field::Choice {
            label,
            options,
            selected: 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Text { label, .. } | Field::Toggle { label, .. } | Field::Choice { label, .. } => {
                label
            }
        }
    }

    /// Display value for rendering.
    pub fn display(&self) -> String {
        match self {
            Field::Text { input, .. } => input.value().to_string(),
            Field::Toggle { value, .. } => if *value { "[x]" } else { "[ ]" }.to_string(),
            Field::Choice {
                options, selected, ..
            } => options.get(*selected).copied().unwrap_or("").to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Form {
    pub title: &'static str,
    pub fields: Vec<Field>,
}

impl Form {
    pub fn new(title: &'static str, fields: Vec<Field>) -> Self {
        Self { title, fields }
    }

    pub fn text_value(&self, index: usize) -> &str {
        match &self.fields[index] {
            Field::Text { input, .. } => input.value(),
            _ => "",
        }
    }

    pub fn toggle_value(&self, index: usize) -> bool {
        matches!(&self.fields[index], Field::Toggle { value: true, .. })
    }

    pub fn choice_value(&self, index: usize) -> &'static str {
        match &self.fields[index] {
            Field::Choice {
                options, selected, ..
            } => options.get(*selected).copied().unwrap_or(""),
            _ => "",
        }
    }

    pub fn set_text(&mut self, index: usize, value: &str) {
        if let Field::Text { input, .. } = &mut self.fields[index] {
            *input = Input::new(value.to_string());
        }
    }

    pub fn set_toggle(&mut self, index: usize, new_value: bool) {
        if let Field::Toggle { value, .. } = &mut self.fields[index] {
            *value = new_value;
        }
    }

    pub fn set_choice(&mut self, index: usize, option: &str) {
        if let Field::Choice {
            options, selected, ..
        } = &mut self.fields[index]
            && let Some(position) = options.iter().position(|o| *o == option)
        {
            *selected = position;
        }
    }

    /// Clears text fields, leaving toggles and choices as set.
    pub fn clear_text(&mut self) {
        for field in &mut self.fields {
            if let Field::Text { input, .. } = field {
                input.reset();
            }
        }
    }
}

/// What a key press did to the focused form group.
#[derive(Debug, PartialEq, Eq)]
pub enum FormAction {
    /// Submit the form with this index.
    Submit(usize),
    Consumed,
    Ignored,
}

/// The forms of one tab plus a single focus cursor walking all of their
/// fields in order.
#[derive(Debug)]
pub struct TabForms {
    pub forms: Vec<Form>,
    pub focus_form: usize,
    pub focus_field: usize,
}

impl TabForms {
    pub fn new(forms: Vec<Form>) -> Self {
        Self {
            forms,
            focus_form: 0,
            focus_field: 0,
        }
    }

    pub fn is_focused(&self, form: usize, field: usize) -> bool {
        self.focus_form == form && self.focus_field == field
    }

    fn focus_next(&mut self) {
        if self.focus_field + 1 < self.forms[self.focus_form].fields.len() {
            self.focus_field += 1;
        } else {
            self.focus_form = (self.focus_form + 1) % self.forms.len();
            self.focus_field = 0;
        }
    }

    fn focus_prev(&mut self) {
        if self.focus_field > 0 {
            self.focus_field -= 1;
        } else {
            self.focus_form = (self.focus_form + self.forms.len() - 1) % self.forms.len();
            self.focus_field = self.forms[self.focus_form].fields.len() - 1;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.forms.is_empty() {
            return FormAction::Ignored;
        }
        match key.code {
            KeyCode::Down => {
                self.focus_next();
                FormAction::Consumed
            }
            KeyCode::Up => {
                self.focus_prev();
                FormAction::Consumed
            }
            KeyCode::Enter => FormAction::Submit(self.focus_form),
            _ => {
                let field = &mut self.forms[self.focus_form].fields[self.focus_field];
                match field {
                    Field::Toggle { value, .. } if key.code == KeyCode::Char(' ') => {
                        *value = !*value;
                        FormAction::Consumed
                    }
                    Field::Choice {
                        options, selected, ..
                    } if matches!(key.code, KeyCode::Char(' ') | KeyCode::Right | KeyCode::Left) => {
                        if key.code == KeyCode::Left {
                            *selected = (*selected + options.len() - 1) % options.len();
                        } else {
                            *selected = (*selected + 1) % options.len();
                        }
                        FormAction::Consumed
                    }
                    Field::Text { input, .. } => {
                        if input.handle_event(&Event::Key(key)).is_some() {
                            FormAction::Consumed
                        } else {
                            FormAction::Ignored
                        }
                    }
                    _ => FormAction::Ignored,
                }
            }
        }
    }
}

// ---- submit-time parsing ----

pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("day is required (YYYY-MM-DD)".to_string());
    }
    trimmed
        .parse()
        .map_err(|_| format!("Invalid date: {trimmed}. Use YYYY-MM-DD"))
}

pub fn parse_amount(raw: &str, label: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} is required"));
    }
    trimmed
        .parse()
        .map_err(|_| format!("Invalid {label}: {trimmed}"))
}

pub fn parse_optional_day(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    parse_day(trimmed).map(|d| d.to_string())
}

/// Reads the photo file named in the form. An empty path fails here, before
/// any request is built, so no network call is ever issued for it.
pub fn read_photo(path: &str) -> Result<(String, Vec<u8>), String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err("Choose a photo file first".to_string());
    }
    let filename = std::path::Path::new(trimmed)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Invalid photo path: {trimmed}"))?
        .to_string();
    let bytes =
        std::fs::read(trimmed).map_err(|err| format!("Could not read {trimmed}: {err}"))?;
    Ok((filename, bytes))
}
