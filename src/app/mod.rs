// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the auth screens and the
//! gallery.
//!
//! The `App` struct wires together the domains (session, collection,
//! localization, notifications) and translates component events into side
//! effects like remote calls or screen switches. Policy decisions (window
//! sizing, session restore, where toasts come from) stay close to the main
//! update loop so user-facing behavior is easy to audit.

mod message;
pub mod paths;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::api::{ApiClient, FileSessionStore};
use crate::config;
use crate::gallery::{Collection, ThumbnailCache};
use crate::i18n::I18n;
use crate::ui::auth::{forgot_password, login, reset_password, signup};
use crate::ui::gallery;
use crate::ui::notifications;
use crate::ui::theming::ThemeMode;
use iced::{window, Task, Theme};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const WINDOW_DEFAULT_WIDTH: u32 = 900;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 650;
pub const MIN_WINDOW_WIDTH: u32 = 600;
pub const MIN_WINDOW_HEIGHT: u32 = 500;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    client: ApiClient,
    collection: Collection,
    thumbnails: ThumbnailCache,
    /// Records with a thumbnail download in flight, to avoid duplicates.
    pending_thumbnails: HashSet<i64>,
    notifications: notifications::Manager,
    theme_mode: ThemeMode,
    login: login::State,
    signup: signup::State,
    forgot_password: forgot_password::State,
    reset_password: reset_password::State,
    gallery: gallery::State,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("images", &self.collection.len())
            .finish()
    }
}

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Initializes application state, restoring a persisted session when one
    /// exists and kicking off the initial gallery load in that case.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);
        let theme_mode = config.general.theme_mode;

        let data_dir = paths::get_app_data_dir().unwrap_or_else(|| PathBuf::from("."));
        let session = Arc::new(FileSessionStore::open(&data_dir));
        let base_url = flags
            .server_url
            .unwrap_or_else(|| config.server.base_url.clone());
        let client =
            ApiClient::new(base_url, session).expect("Failed to initialize the HTTP client");

        let mut app = App {
            i18n,
            screen: Screen::Login,
            client,
            collection: Collection::new(),
            thumbnails: ThumbnailCache::new(),
            pending_thumbnails: HashSet::new(),
            notifications: notifications::Manager::new(),
            theme_mode,
            login: login::State::new(),
            signup: signup::State::new(),
            forgot_password: forgot_password::State::new(),
            reset_password: reset_password::State::new(),
            gallery: gallery::State::new(),
        };

        if let Some(key) = config_warning {
            app.notifications
                .push(notifications::Notification::warning(key));
        }

        let task = if app.client.has_session() {
            app.screen = Screen::Gallery;
            app.fetch_images()
        } else {
            Task::none()
        };

        (app, task)
    }

    fn title(&self) -> String {
        self.i18n.tr("app-title")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.theme()
    }
}
