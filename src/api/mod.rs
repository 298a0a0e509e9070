// SPDX-License-Identifier: MPL-2.0
//! Client for the remote gallery service's REST API.
//!
//! # Components
//!
//! - [`client`] - `ApiClient`, the authenticated HTTP layer
//! - [`auth`] - account endpoints (register, login, password reset, validators)
//! - [`images`] - gallery endpoints (list, upload, reorder, edit, delete)
//! - [`session`] - token persistence behind the [`SessionStore`] seam
//! - [`error`] - the `ApiError` taxonomy shared by every endpoint
//!
//! Every endpoint performs exactly one round-trip and reports failures
//! through [`ApiError`]; nothing here retries or panics.

pub mod auth;
pub mod client;
pub mod error;
pub mod images;
pub mod session;

pub use client::ApiClient;
pub use error::ApiError;
pub use images::ImageRecord;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, TokenPair};
