// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Subscriptions are conditional on state: the tick only runs while toasts
//! are visible, and global pointer tracking only while a gallery drag press
//! is active (tiles report enter/leave themselves; engagement distance and
//! outside-release need window-level events).

use super::{App, Message, Screen};
use crate::ui::gallery;
use iced::{event, mouse, time, window, Subscription};
use std::time::Duration;

impl App {
    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();

        if self.notifications.has_notifications() {
            subscriptions.push(time::every(Duration::from_millis(250)).map(Message::Tick));
        }

        if self.screen == Screen::Gallery {
            // Files dropped on the window are uploads.
            subscriptions.push(event::listen_with(|event, _status, _window| {
                if let event::Event::Window(window::Event::FileDropped(path)) = event {
                    Some(Message::FileDropped(path))
                } else {
                    None
                }
            }));

            if self.gallery.has_active_press() {
                subscriptions.push(event::listen_with(|event, _status, _window| match event {
                    event::Event::Mouse(mouse::Event::CursorMoved { position }) => Some(
                        Message::Gallery(gallery::Message::PointerMoved(position)),
                    ),
                    event::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                        Some(Message::Gallery(gallery::Message::PointerReleased))
                    }
                    _ => None,
                }));
            }
        }

        Subscription::batch(subscriptions)
    }
}
