// SPDX-License-Identifier: MPL-2.0
//! Client-side state for the remote image collection.
//!
//! [`Collection`] owns the ordered sequence of records and the optimistic
//! reorder bookkeeping; [`cache`] holds decoded thumbnails so the grid does
//! not re-decode on every view pass.

pub mod cache;
pub mod collection;

pub use cache::ThumbnailCache;
pub use collection::{Collection, LoadStatus};
