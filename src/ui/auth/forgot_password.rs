// SPDX-License-Identifier: MPL-2.0
//! Forgot-password screen: requests a reset email.

use super::{error_text, form_card, labeled_field, link_button, validation, FieldError};
use crate::api::ApiError;
use crate::i18n::I18n;
use crate::ui::design_tokens::spacing;
use iced::widget::{button, Column, Text};
use iced::{Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    EmailChanged(String),
    SubmitPressed,
    GoToLogin,
    GoToSignup,
    GoToReset,
}

/// Outcome of a state update, consumed by the application update loop.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    Submit { email: String },
    NavigateLogin,
    NavigateSignup,
    /// Jump straight to the set-new-password screen (the user already has
    /// the uid and token from a reset email).
    NavigateReset,
}

#[derive(Debug, Default)]
pub struct State {
    email: String,
    email_error: Option<FieldError>,
    form_error: Option<FieldError>,
    submitting: bool,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::EmailChanged(value) => {
                self.email = value;
                self.email_error = None;
                Event::None
            }
            Message::SubmitPressed => {
                if self.submitting {
                    return Event::None;
                }

                self.form_error = None;
                self.email_error = validation::email(&self.email);
                if self.email_error.is_some() {
                    return Event::None;
                }

                self.submitting = true;
                Event::Submit {
                    email: self.email.clone(),
                }
            }
            Message::GoToLogin => Event::NavigateLogin,
            Message::GoToSignup => Event::NavigateSignup,
            Message::GoToReset => Event::NavigateReset,
        }
    }

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

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let mut body = Column::new().spacing(spacing::MD).push(labeled_field(
            i18n.tr("field-email"),
            i18n.tr("field-email-placeholder"),
            &self.email,
            false,
            Message::EmailChanged,
            self.email_error.as_ref(),
            i18n,
        ));

        if let Some(error) = &self.form_error {
            body = body.push(error_text(error.resolve(i18n)));
        }

        let submit_label = if self.submitting {
            i18n.tr("forgot-submitting")
        } else {
            i18n.tr("forgot-submit")
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
            .push(link_button(i18n.tr("forgot-login-link"), Message::GoToLogin))
            .push(link_button(i18n.tr("forgot-signup-link"), Message::GoToSignup))
            .push(link_button(i18n.tr("forgot-have-code-link"), Message::GoToReset));

        form_card(
            i18n.tr("forgot-title"),
            i18n.tr("forgot-description"),
            body,
            footer,
        )
    }
}
