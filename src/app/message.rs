// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::api::{ApiError, ImageRecord};
use crate::ui::auth::{forgot_password, login, reset_password, signup};
use crate::ui::gallery;
use crate::ui::notifications;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint;
/// the rest are completions of asynchronous work.
#[derive(Debug, Clone)]
pub enum Message {
    Login(login::Message),
    Signup(signup::Message),
    ForgotPassword(forgot_password::Message),
    ResetPassword(reset_password::Message),
    Gallery(gallery::Message),
    Notification(notifications::NotificationMessage),
    Tick(Instant), // Periodic tick for toast auto-dismiss

    // Account flows
    LoginCompleted(Result<(), ApiError>),
    RegisterCompleted(Result<(), ApiError>),
    ResetRequested(Result<(), ApiError>),
    ResetConfirmed(Result<(), ApiError>),

    // Debounced signup validators; generations identify the edit each timer
    // and response belong to, so stale ones can be discarded.
    UsernameDebounceElapsed {
        generation: u64,
    },
    PasswordDebounceElapsed {
        generation: u64,
    },
    UsernameChecked {
        generation: u64,
        result: Result<bool, ApiError>,
    },
    PasswordChecked {
        generation: u64,
        result: Result<Option<Vec<String>>, ApiError>,
    },

    // Gallery flows
    ImagesFetched(Result<Vec<ImageRecord>, ApiError>),
    ImageUploaded(Result<ImageRecord, ApiError>),
    OrderPersisted(Result<ImageRecord, ApiError>),
    ImageDeleted {
        id: i64,
        result: Result<(), ApiError>,
    },
    ImageEdited {
        id: i64,
        result: Result<ImageRecord, ApiError>,
    },
    ThumbnailFetched {
        id: i64,
        result: Result<Vec<u8>, ApiError>,
    },

    // File dialogs and window drops
    UploadFilesPicked(Option<Vec<PathBuf>>),
    ReplacementPicked(Option<PathBuf>),
    FileDropped(PathBuf),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Optional gallery service URL, overriding the configured one.
    pub server_url: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_GALLERY_CONFIG_DIR`.
    pub config_dir: Option<String>,
    /// Optional data directory override (for session.toml).
    /// Takes precedence over `ICED_GALLERY_DATA_DIR`.
    pub data_dir: Option<String>,
}
