// SPDX-License-Identifier: MPL-2.0
//! `iced_gallery` is a desktop client for a remote image-gallery service,
//! built with the Iced GUI framework.
//!
//! It provides account management (signup, login, password reset) against the
//! service's REST API, and an ordered gallery of images that can be rearranged
//! by dragging tiles. Gallery mutations are applied optimistically and rolled
//! back when the server rejects them.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod gallery;
pub mod i18n;
pub mod ui;
