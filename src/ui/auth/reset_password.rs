// SPDX-License-Identifier: MPL-2.0
//! Set-new-password screen.
//!
//! The reset email links to the service with a uid and token; since a
//! desktop client has no route parameters, both arrive here as inputs the
//! user pastes from that link.

use super::{error_text, form_card, labeled_field, link_button, validation, FieldError};
use crate::api::auth::PasswordResetConfirmRequest;
use crate::api::ApiError;
use crate::i18n::I18n;
use crate::ui::design_tokens::spacing;
use iced::widget::{button, Column, Text};
use iced::{Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    UidChanged(String),
    TokenChanged(String),
    PasswordChanged(String),
    ConfirmPasswordChanged(String),
    SubmitPressed,
    GoToLogin,
}

/// Outcome of a state update, consumed by the application update loop.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    Submit(PasswordResetConfirmRequest),
    NavigateLogin,
}

#[derive(Debug, Default)]
pub struct State {
    uid: String,
    token: String,
    password: String,
    confirm_password: String,
    uid_error: Option<FieldError>,
    token_error: Option<FieldError>,
    password_error: Option<FieldError>,
    confirm_error: Option<FieldError>,
    form_error: Option<FieldError>,
    submitting: bool,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::UidChanged(value) => {
                self.uid = value;
                self.uid_error = None;
                Event::None
            }
            Message::TokenChanged(value) => {
                self.token = value;
                self.token_error = None;
                Event::None
            }
            Message::PasswordChanged(value) => {
                self.password = value;
                self.password_error = None;
                Event::None
            }
            Message::ConfirmPasswordChanged(value) => {
                self.confirm_password = value;
                self.confirm_error = None;
                Event::None
            }
            Message::SubmitPressed => {
                if self.submitting {
                    return Event::None;
                }

                self.form_error = None;
                self.uid_error = validation::required(&self.uid);
                self.token_error = validation::required(&self.token);
                self.password_error = validation::required(&self.password);
                self.confirm_error =
                    validation::password_confirmation(&self.password, &self.confirm_password);

                if self.uid_error.is_some()
                    || self.token_error.is_some()
                    || self.password_error.is_some()
                    || self.confirm_error.is_some()
                {
                    return Event::None;
                }

                self.submitting = true;
                Event::Submit(PasswordResetConfirmRequest {
                    new_password1: self.password.clone(),
                    new_password2: self.confirm_password.clone(),
                    uid: self.uid.clone(),
                    token: self.token.clone(),
                })
            }
            Message::GoToLogin => Event::NavigateLogin,
        }
    }

    pub fn submit_failed(&mut self, error: &ApiError) {
        self.submitting = false;
        match error {
            ApiError::Fields(fields) => {
                for (key, messages) in fields {
                    let target = match key.as_str() {
                        "uid" => &mut self.uid_error,
                        "token" => &mut self.token_error,
                        "new_password1" => &mut self.password_error,
                        "new_password2" => &mut self.confirm_error,
                        _ => continue,
                    };
                    *target = Some(FieldError::Messages(messages.clone()));
                }
                if self.form_error.is_none() {
                    if let Some(message) = error.first_message() {
                        self.form_error = Some(FieldError::Server(message.to_string()));
                    }
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

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let mut body = Column::new()
            .spacing(spacing::MD)
            .push(labeled_field(
                i18n.tr("field-reset-uid"),
                i18n.tr("field-reset-uid-placeholder"),
                &self.uid,
                false,
                Message::UidChanged,
                self.uid_error.as_ref(),
                i18n,
            ))
            .push(labeled_field(
                i18n.tr("field-reset-token"),
                i18n.tr("field-reset-token-placeholder"),
                &self.token,
                false,
                Message::TokenChanged,
                self.token_error.as_ref(),
                i18n,
            ))
            .push(labeled_field(
                i18n.tr("field-new-password"),
                i18n.tr("field-new-password-placeholder"),
                &self.password,
                true,
                Message::PasswordChanged,
                self.password_error.as_ref(),
                i18n,
            ))
            .push(labeled_field(
                i18n.tr("field-confirm-new-password"),
                i18n.tr("field-confirm-new-password-placeholder"),
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
            i18n.tr("reset-submitting")
        } else {
            i18n.tr("reset-submit")
        };
        let mut submit = button(Text::new(submit_label))
            .width(Length::Fill)
            .padding(spacing::XS)
            .style(button::primary);
        if !self.submitting {
            submit = submit.on_press(Message::SubmitPressed);
        }
        body = body.push(submit);

        let footer = Column::new().push(link_button(i18n.tr("reset-login-link"), Message::GoToLogin));

        form_card(
            i18n.tr("reset-title"),
            i18n.tr("reset-description"),
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
        let _ = state.update(Message::UidChanged("Mg".to_string()));
        let _ = state.update(Message::TokenChanged("abc-def".to_string()));
        let _ = state.update(Message::PasswordChanged("new password".to_string()));
        let _ = state.update(Message::ConfirmPasswordChanged("new password".to_string()));
        state
    }

    #[test]
    fn valid_input_emits_confirm_request() {
        let mut state = filled_state();
        match state.update(Message::SubmitPressed) {
            Event::Submit(request) => {
                assert_eq!(request.uid, "Mg");
                assert_eq!(request.token, "abc-def");
                assert_eq!(request.new_password1, request.new_password2);
            }
            other => panic!("expected submit, got {:?}", other),
        }
    }

    #[test]
    fn missing_token_blocks_submission() {
        let mut state = filled_state();
        let _ = state.update(Message::TokenChanged(String::new()));

        match state.update(Message::SubmitPressed) {
            Event::None => {}
            other => panic!("expected no event, got {:?}", other),
        }
        assert_eq!(state.token_error, Some(FieldError::Key("validation-required")));
    }

    #[test]
    fn service_errors_map_onto_reset_fields() {
        let mut state = filled_state();
        let _ = state.update(Message::SubmitPressed);

        state.submit_failed(&ApiError::Fields(vec![(
            "token".to_string(),
            vec!["Invalid or expired token.".to_string()],
        )]));

        assert!(matches!(state.token_error, Some(FieldError::Messages(_))));
        assert!(!state.is_submitting());
    }
}
