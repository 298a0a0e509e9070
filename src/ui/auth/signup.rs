// SPDX-License-Identifier: MPL-2.0
//! Signup screen.
//!
//! Username availability and password policy are checked remotely while the
//! user types. Each edit bumps a per-field generation counter and asks the
//! application to schedule a debounce timer; timers and responses that come
//! back with a stale generation are discarded, so a superseded in-flight
//! check can never overwrite newer state.

use super::{error_text, form_card, labeled_field, link_button, validation, FieldError};
use crate::api::auth::RegisterRequest;
use crate::api::ApiError;
use crate::i18n::I18n;
use crate::ui::design_tokens::spacing;
use iced::widget::{button, Column, Text};
use iced::{Element, Length};

/// Quiet period between the last edit and the remote check.
pub const DEBOUNCE_MS: u64 = 400;

#[derive(Debug, Clone)]
pub enum Message {
    UsernameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    ConfirmPasswordChanged(String),
    SubmitPressed,
    GoToLogin,
}

/// Outcome of a state update, consumed by the application update loop.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    /// Start a debounce timer for the username check.
    ScheduleUsernameCheck { generation: u64 },
    /// Start a debounce timer for the password check.
    SchedulePasswordCheck { generation: u64 },
    Submit(RegisterRequest),
    NavigateLogin,
}

#[derive(Debug, Default)]
pub struct State {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
    username_error: Option<FieldError>,
    email_error: Option<FieldError>,
    password_error: Option<FieldError>,
    confirm_error: Option<FieldError>,
    form_error: Option<FieldError>,
    submitting: bool,
    username_generation: u64,
    password_generation: u64,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::UsernameChanged(value) => {
                self.username = value;
                self.username_error = None;
                // Invalidate any in-flight check, then re-arm the debounce.
                self.username_generation += 1;
                if self.username.is_empty() || validation::username(&self.username).is_some() {
                    Event::None
                } else {
                    Event::ScheduleUsernameCheck {
                        generation: self.username_generation,
                    }
                }
            }
            Message::EmailChanged(value) => {
                self.email = value;
                self.email_error = None;
                Event::None
            }
            Message::PasswordChanged(value) => {
                self.password = value;
                self.password_error = None;
                self.password_generation += 1;
                if self.password.is_empty() {
                    Event::None
                } else {
                    Event::SchedulePasswordCheck {
                        generation: self.password_generation,
                    }
                }
            }
            Message::ConfirmPasswordChanged(value) => {
                self.confirm_password = value;
                self.confirm_error = None;
                Event::None
            }
            Message::SubmitPressed => self.submit(),
            Message::GoToLogin => Event::NavigateLogin,
        }
    }

    fn submit(&mut self) -> Event {
        if self.submitting {
            return Event::None;
        }

        self.form_error = None;
        self.username_error = validation::username(&self.username);
        self.email_error = validation::email(&self.email);
        self.password_error = validation::required(&self.password);
        self.confirm_error =
            validation::password_confirmation(&self.password, &self.confirm_password);

        if self.username_error.is_some()
            || self.email_error.is_some()
            || self.password_error.is_some()
            || self.confirm_error.is_some()
        {
            return Event::None;
        }

        self.submitting = true;
        Event::Submit(RegisterRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password1: self.password.clone(),
            password2: self.confirm_password.clone(),
        })
    }

    /// Called when a username debounce timer fires. Returns the value to
    /// check remotely, or `None` when the timer is stale.
    pub fn username_check_due(&self, generation: u64) -> Option<String> {
        if generation == self.username_generation && !self.username.is_empty() {
            Some(self.username.clone())
        } else {
            None
        }
    }

    /// Called when a password debounce timer fires.
    pub fn password_check_due(&self, generation: u64) -> Option<String> {
        if generation == self.password_generation && !self.password.is_empty() {
            Some(self.password.clone())
        } else {
            None
        }
    }

    /// Applies a username availability response, ignoring stale generations.
    /// Transport failures show the generic fallback, distinct from "taken".
    pub fn apply_username_check(&mut self, generation: u64, result: Result<bool, ApiError>) {
        if generation != self.username_generation {
            return;
        }
        match result {
            Ok(true) => {
                self.username_error = None;
            }
            Ok(false) => {
                self.username_error = Some(FieldError::Key("signup-username-taken"));
            }
            Err(error) => {
                log::warn!("username check failed: {}", error);
                self.form_error = Some(FieldError::Key("error-unexpected"));
            }
        }
    }

    /// Applies a password policy response, ignoring stale generations.
    pub fn apply_password_check(
        &mut self,
        generation: u64,
        result: Result<Option<Vec<String>>, ApiError>,
    ) {
        if generation != self.password_generation {
            return;
        }
        match result {
            Ok(None) => {
                self.password_error = None;
            }
            Ok(Some(violations)) => {
                self.password_error = Some(FieldError::Messages(violations));
            }
            Err(error) => {
                log::warn!("password check failed: {}", error);
                self.form_error = Some(FieldError::Key("error-unexpected"));
            }
        }
    }

    /// Maps a failed registration onto field and form errors. The service
    /// keys errors by its own field names.
    pub fn submit_failed(&mut self, error: &ApiError) {
        self.submitting = false;
        match error {
            ApiError::Fields(fields) => {
                for (key, messages) in fields {
                    let target = match key.as_str() {
                        "username" => &mut self.username_error,
                        "email" => &mut self.email_error,
                        "password1" | "password" => &mut self.password_error,
                        "password2" => &mut self.confirm_error,
                        _ => continue,
                    };
                    *target = Some(FieldError::Messages(messages.clone()));
                }
            }
            ApiError::Detail(detail) => {
                self.form_error = Some(FieldError::Server(detail.clone()));
            }
            _ => {
                self.form_error = Some(FieldError::Key("error-unexpected"));
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn form_error(&self) -> Option<&FieldError> {
        self.form_error.as_ref()
    }

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let mut body = Column::new()
            .spacing(spacing::MD)
            .push(labeled_field(
                i18n.tr("field-username"),
                i18n.tr("field-username-placeholder"),
                &self.username,
                false,
                Message::UsernameChanged,
                self.username_error.as_ref(),
                i18n,
            ))
            .push(labeled_field(
                i18n.tr("field-email"),
                i18n.tr("field-email-placeholder"),
                &self.email,
                false,
                Message::EmailChanged,
                self.email_error.as_ref(),
                i18n,
            ))
            .push(labeled_field(
                i18n.tr("field-password"),
                i18n.tr("field-password-placeholder"),
                &self.password,
                true,
                Message::PasswordChanged,
                self.password_error.as_ref(),
                i18n,
            ))
            .push(labeled_field(
                i18n.tr("field-confirm-password"),
                i18n.tr("field-confirm-password-placeholder"),
                &self.confirm_password,
                true,
                Message::ConfirmPasswordChanged,
                self.confirm_error.as_ref(),
                i18n,
            ));

        if let Some(error) = &self.form_error {
            body = body.push(error_text(error.resolve(i18n)));
        }

        let submit_label = if self.submitting {
            i18n.tr("signup-submitting")
        } else {
            i18n.tr("signup-submit")
        };
        let mut submit = button(Text::new(submit_label))
            .width(Length::Fill)
            .padding(spacing::XS)
            .style(button::primary);
        if !self.submitting {
            submit = submit.on_press(Message::SubmitPressed);
        }
        body = body.push(submit);

        let footer = Column::new().push(link_button(i18n.tr("signup-login-link"), Message::GoToLogin));

        form_card(
            i18n.tr("signup-title"),
            i18n.tr("signup-description"),
            body,
            footer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_state() -> State {
        let mut state = State::new();
        let _ = state.update(Message::UsernameChanged("ada".to_string()));
        let _ = state.update(Message::EmailChanged("ada@example.org".to_string()));
        let _ = state.update(Message::PasswordChanged("correct horse".to_string()));
        let _ = state.update(Message::ConfirmPasswordChanged("correct horse".to_string()));
        state
    }

    #[test]
    fn valid_input_emits_register_request() {
        let mut state = filled_state();
        match state.update(Message::SubmitPressed) {
            Event::Submit(request) => {
                assert_eq!(request.username, "ada");
                assert_eq!(request.password1, request.password2);
            }
            other => panic!("expected submit, got {:?}", other),
        }
    }

    #[test]
    fn mismatched_passwords_block_submission() {
        let mut state = filled_state();
        let _ = state.update(Message::ConfirmPasswordChanged("other".to_string()));

        match state.update(Message::SubmitPressed) {
            Event::None => {}
            other => panic!("expected no event, got {:?}", other),
        }
        assert_eq!(
            state.confirm_error,
            Some(FieldError::Key("validation-password-mismatch"))
        );
    }

    #[test]
    fn username_edit_schedules_debounced_check() {
        let mut state = State::new();
        match state.update(Message::UsernameChanged("ada".to_string())) {
            Event::ScheduleUsernameCheck { generation } => {
                assert_eq!(generation, 1);
                assert_eq!(state.username_check_due(generation).as_deref(), Some("ada"));
            }
            other => panic!("expected scheduled check, got {:?}", other),
        }
    }

    #[test]
    fn stale_debounce_timer_is_discarded() {
        let mut state = State::new();
        let first = match state.update(Message::UsernameChanged("ad".to_string())) {
            Event::ScheduleUsernameCheck { generation } => generation,
            other => panic!("expected scheduled check, got {:?}", other),
        };
        let _ = state.update(Message::UsernameChanged("ada".to_string()));

        assert_eq!(state.username_check_due(first), None);
    }

    #[test]
    fn stale_username_response_is_discarded() {
        let mut state = State::new();
        let _ = state.update(Message::UsernameChanged("ad".to_string()));
        let stale_generation = 1;
        let _ = state.update(Message::UsernameChanged("ada".to_string()));

        state.apply_username_check(stale_generation, Ok(false));

        assert_eq!(state.username_error, None);
    }

    #[test]
    fn taken_username_sets_field_error() {
        let mut state = State::new();
        let _ = state.update(Message::UsernameChanged("ada".to_string()));

        state.apply_username_check(2, Ok(false));
        // Generation 2 is stale (only one edit happened); nothing changes.
        assert_eq!(state.username_error, None);

        state.apply_username_check(1, Ok(false));
        assert_eq!(
            state.username_error,
            Some(FieldError::Key("signup-username-taken"))
        );
    }

    #[test]
    fn transport_failure_is_distinct_from_taken() {
        let mut state = State::new();
        let _ = state.update(Message::UsernameChanged("ada".to_string()));

        state.apply_username_check(1, Err(ApiError::Transport("boom".to_string())));

        assert_eq!(state.username_error, None);
        assert_eq!(state.form_error(), Some(&FieldError::Key("error-unexpected")));
    }

    #[test]
    fn password_violations_join_in_order() {
        let mut state = State::new();
        let _ = state.update(Message::PasswordChanged("weak".to_string()));

        state.apply_password_check(
            1,
            Ok(Some(vec![
                "This password is too short.".to_string(),
                "This password is too common.".to_string(),
            ])),
        );

        match &state.password_error {
            Some(FieldError::Messages(messages)) => {
                assert_eq!(messages[0], "This password is too short.");
                assert_eq!(messages[1], "This password is too common.");
            }
            other => panic!("expected messages, got {:?}", other),
        }
    }

    #[test]
    fn service_field_errors_map_onto_fields() {
        let mut state = filled_state();
        let _ = state.update(Message::SubmitPressed);

        state.submit_failed(&ApiError::Fields(vec![
            (
                "username".to_string(),
                vec!["A user with that username already exists.".to_string()],
            ),
            ("password1".to_string(), vec!["Too short.".to_string()]),
        ]));

        assert!(matches!(state.username_error, Some(FieldError::Messages(_))));
        assert!(matches!(state.password_error, Some(FieldError::Messages(_))));
        assert!(!state.is_submitting());
    }

    #[test]
    fn empty_username_invalidates_without_scheduling() {
        let mut state = State::new();
        let _ = state.update(Message::UsernameChanged("ada".to_string()));
        match state.update(Message::UsernameChanged(String::new())) {
            Event::None => {}
            other => panic!("expected no event, got {:?}", other),
        }
        // The earlier timer is stale now.
        assert_eq!(state.username_check_due(1), None);
    }
}
