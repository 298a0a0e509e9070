// SPDX-License-Identifier: MPL-2.0
//! Screen dispatch and the toast overlay.

use super::{App, Message, Screen};
use crate::ui::gallery;
use crate::ui::notifications::Toast;
use iced::widget::stack;
use iced::Element;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let screen: Element<'_, Message> = match self.screen {
            Screen::Login => self.login.view(&self.i18n).map(Message::Login),
            Screen::Signup => self.signup.view(&self.i18n).map(Message::Signup),
            Screen::ForgotPassword => self
                .forgot_password
                .view(&self.i18n)
                .map(Message::ForgotPassword),
            Screen::ResetPassword => self
                .reset_password
                .view(&self.i18n)
                .map(Message::ResetPassword),
            Screen::Gallery => gallery::view(
                &self.gallery,
                &self.collection,
                &self.thumbnails,
                &self.i18n,
            )
            .map(Message::Gallery),
        };

        let toasts = Toast::view_overlay(&self.notifications, &self.i18n).map(Message::Notification);

        stack![screen, toasts].into()
    }
}
