// SPDX-License-Identifier: MPL-2.0
//! Authentication screens and their shared form scaffolding.
//!
//! Each screen is a self-contained component: its `State` consumes its own
//! `Message`s and reports outcomes upward as an `Event` the application
//! update loop acts on (submission payloads, navigation requests, debounce
//! scheduling). The screens never talk to the network themselves.

pub mod forgot_password;
pub mod login;
pub mod reset_password;
pub mod signup;
pub mod validation;

use crate::i18n::I18n;
use crate::ui::design_tokens::{border, palette, radius, shadow, sizing, spacing, typography};
use iced::widget::{button, container, text, text_input, Column, Container, Text};
use iced::{alignment, Element, Length, Theme};

/// An error attached to a form or one of its fields.
///
/// Local validation produces i18n keys; the service produces ready-made
/// strings that are surfaced verbatim (its policy violations arrive as an
/// ordered message list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Localized via an i18n key.
    Key(&'static str),
    /// Ordered list of server-provided messages (password policy style).
    Messages(Vec<String>),
    /// One server-provided string, shown as-is.
    Server(String),
}

impl FieldError {
    pub fn resolve(&self, i18n: &I18n) -> String {
        match self {
            FieldError::Key(key) => i18n.tr(key),
            FieldError::Messages(messages) => messages.join(" "),
            FieldError::Server(message) => message.clone(),
        }
    }
}

/// Centered card hosting a form, in the style every auth screen shares.
pub(crate) fn form_card<'a, M: 'a>(
    title: String,
    description: String,
    body: Column<'a, M>,
    footer: Column<'a, M>,
) -> Element<'a, M> {
    let card = Column::new()
        .spacing(spacing::LG)
        .push(
            Column::new()
                .spacing(spacing::XXS)
                .push(Text::new(title).size(typography::TITLE_LG))
                .push(Text::new(description).size(typography::BODY).style(
                    |theme: &Theme| text::Style {
                        color: Some(theme.extended_palette().background.strong.color),
                    },
                )),
        )
        .push(body)
        .push(footer.align_x(alignment::Horizontal::Center).width(Length::Fill));

    let card = Container::new(card)
        .width(Length::Fixed(sizing::FORM_CARD_WIDTH))
        .padding(spacing::LG)
        .style(card_style);

    Container::new(card)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
}

/// A labeled input with an optional inline error underneath.
pub(crate) fn labeled_field<'a, M: Clone + 'a>(
    label: String,
    placeholder: String,
    value: &str,
    secure: bool,
    on_input: impl Fn(String) -> M + 'a,
    error: Option<&FieldError>,
    i18n: &I18n,
) -> Column<'a, M> {
    let mut input = text_input(&placeholder, value)
        .on_input(on_input)
        .padding(spacing::XS)
        .size(typography::BODY);
    if secure {
        input = input.secure(true);
    }

    let mut field = Column::new()
        .spacing(spacing::XXS)
        .push(Text::new(label).size(typography::BODY_SM))
        .push(input);

    if let Some(error) = error {
        field = field.push(error_text(error.resolve(i18n)));
    }

    field
}

/// Small red text used for inline errors.
pub(crate) fn error_text<'a, M: 'a>(message: String) -> Element<'a, M> {
    Text::new(message)
        .size(typography::BODY_SM)
        .style(|_theme: &Theme| text::Style {
            color: Some(palette::ERROR_500),
        })
        .into()
}

/// Text-styled button used for footer navigation links.
pub(crate) fn link_button<'a, M: Clone + 'a>(label: String, message: M) -> Element<'a, M> {
    button(Text::new(label).size(typography::BODY_SM).style(
        |_theme: &Theme| text::Style {
            color: Some(palette::PRIMARY_500),
        },
    ))
    .on_press(message)
    .padding(0)
    .style(button::text)
    .into()
}

fn card_style(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(iced::Background::Color(
            theme.extended_palette().background.base.color,
        )),
        border: iced::Border {
            color: theme.extended_palette().background.weak.color,
            width: border::WIDTH_SM,
            radius: radius::LG.into(),
        },
        shadow: shadow::MD,
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}
