// SPDX-License-Identifier: MPL-2.0
//! Login screen.

use super::{error_text, form_card, labeled_field, link_button, validation, FieldError};
use crate::api::ApiError;
use crate::i18n::I18n;
use crate::ui::design_tokens::spacing;
use iced::widget::{button, Column, Text};
use iced::{Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    UsernameChanged(String),
    PasswordChanged(String),
    SubmitPressed,
    GoToSignup,
    GoToForgotPassword,
}

/// Outcome of a state update, consumed by the application update loop.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    Submit { username: String, password: String },
    NavigateSignup,
    NavigateForgotPassword,
}

#[derive(Debug, Default)]
pub struct State {
    username: String,
    password: String,
    username_error: Option<FieldError>,
    password_error: Option<FieldError>,
    form_error: Option<FieldError>,
    submitting: bool,
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
                Event::None
            }
            Message::PasswordChanged(value) => {
                self.password = value;
                self.password_error = None;
                Event::None
            }
            Message::SubmitPressed => {
                if self.submitting {
                    return Event::None;
                }

                self.form_error = None;
                self.username_error = validation::required(&self.username).or_else(|| {
                    if self.username.chars().count() > validation::MAX_USERNAME_LEN {
                        Some(FieldError::Key("validation-username-too-long"))
                    } else {
                        None
                    }
                });
                self.password_error = validation::required(&self.password);

                if self.username_error.is_some() || self.password_error.is_some() {
                    return Event::None;
                }

                self.submitting = true;
                Event::Submit {
                    username: self.username.clone(),
                    password: self.password.clone(),
                }
            }
            Message::GoToSignup => Event::NavigateSignup,
            Message::GoToForgotPassword => Event::NavigateForgotPassword,
        }
    }

    /// Applies the outcome of the remote login call.
    ///
    /// The first failing key in the response body is what the user sees; a
    /// transport failure gets the generic fallback.
    pub fn submit_failed(&mut self, error: &ApiError) {
        self.submitting = false;
        self.form_error = Some(match error.first_message() {
            Some(message) => FieldError::Server(message.to_string()),
            None => FieldError::Key("error-unexpected"),
        });
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
                i18n.tr("field-password"),
                i18n.tr("field-password-placeholder"),
                &self.password,
                true,
                Message::PasswordChanged,
                self.password_error.as_ref(),
                i18n,
            ));

        if let Some(error) = &self.form_error {
            body = body.push(error_text(error.resolve(i18n)));
        }

        let submit_label = if self.submitting {
            i18n.tr("login-submitting")
        } else {
            i18n.tr("login-submit")
        };
        let mut submit = button(Text::new(submit_label))
            .width(Length::Fill)
            .padding(spacing::XS)
            .style(button::primary);
        if !self.submitting {
            submit = submit.on_press(Message::SubmitPressed);
        }
        body = body.push(submit);

        let footer = Column::new()
            .spacing(spacing::XXS)
            .push(link_button(i18n.tr("login-signup-link"), Message::GoToSignup))
            .push(link_button(
                i18n.tr("login-forgot-link"),
                Message::GoToForgotPassword,
            ));

        form_card(
            i18n.tr("login-title"),
            i18n.tr("login-description"),
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
        state.update(Message::UsernameChanged("ada".to_string()));
        state.update(Message::PasswordChanged("secret".to_string()));
        state
    }

    #[test]
    fn submit_with_empty_fields_stays_local() {
        let mut state = State::new();
        match state.update(Message::SubmitPressed) {
            Event::None => {}
            other => panic!("expected no event, got {:?}", other),
        }
        assert!(!state.is_submitting());
    }

    #[test]
    fn submit_with_credentials_emits_payload() {
        let mut state = filled_state();
        match state.update(Message::SubmitPressed) {
            Event::Submit { username, password } => {
                assert_eq!(username, "ada");
                assert_eq!(password, "secret");
            }
            other => panic!("expected submit, got {:?}", other),
        }
        assert!(state.is_submitting());
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut state = filled_state();
        let _ = state.update(Message::SubmitPressed);
        match state.update(Message::SubmitPressed) {
            Event::None => {}
            other => panic!("expected no event, got {:?}", other),
        }
    }

    #[test]
    fn detail_error_is_surfaced_verbatim() {
        let mut state = filled_state();
        let _ = state.update(Message::SubmitPressed);

        state.submit_failed(&ApiError::Detail("Invalid credentials".to_string()));

        assert_eq!(
            state.form_error(),
            Some(&FieldError::Server("Invalid credentials".to_string()))
        );
        assert!(!state.is_submitting());
    }

    #[test]
    fn transport_error_uses_generic_fallback() {
        let mut state = filled_state();
        let _ = state.update(Message::SubmitPressed);

        state.submit_failed(&ApiError::Transport("connection refused".to_string()));

        assert_eq!(state.form_error(), Some(&FieldError::Key("error-unexpected")));
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut state = State::new();
        let _ = state.update(Message::SubmitPressed);
        assert!(state.username_error.is_some());

        let _ = state.update(Message::UsernameChanged("a".to_string()));
        assert!(state.username_error.is_none());
    }
}
