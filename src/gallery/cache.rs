// SPDX-License-Identifier: MPL-2.0
//! Decoded thumbnail cache for the gallery grid.
//!
//! Fetched image bytes are decoded and downscaled once, then kept as iced
//! image handles keyed by record id. The cache is bounded; evicted entries
//! are simply re-fetched on demand.

use iced::widget::image::Handle;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Longest edge of a cached thumbnail, in pixels.
pub const THUMBNAIL_MAX_DIM: u32 = 512;

/// Default number of thumbnails kept in memory.
const DEFAULT_CAPACITY: usize = 128;

/// Bounded cache of decoded gallery thumbnails.
pub struct ThumbnailCache {
    entries: LruCache<i64, Handle>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, id: i64) -> Option<Handle> {
        self.entries.get(&id).cloned()
    }

    /// Read-only lookup that leaves the recency order untouched; used by
    /// view code, which only holds a shared reference.
    pub fn peek(&self, id: i64) -> Option<&Handle> {
        self.entries.peek(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains(&id)
    }

    pub fn insert(&mut self, id: i64, handle: Handle) {
        self.entries.put(id, handle);
    }

    /// Drops a single entry, e.g. after the record's content was replaced.
    pub fn invalidate(&mut self, id: i64) {
        self.entries.pop(&id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ThumbnailCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailCache")
            .field("len", &self.entries.len())
            .field("cap", &self.entries.cap())
            .finish()
    }
}

/// Decodes fetched bytes and downscales them to thumbnail size.
///
/// Returns `None` for bytes the decoder does not recognize; the tile then
/// shows its placeholder instead.
pub fn decode_thumbnail(bytes: &[u8]) -> Option<Handle> {
    let image = match image_rs::load_from_memory(bytes) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("failed to decode image content: {}", err);
            return None;
        }
    };

    let scaled = if image.width() > THUMBNAIL_MAX_DIM || image.height() > THUMBNAIL_MAX_DIM {
        image.thumbnail(THUMBNAIL_MAX_DIM, THUMBNAIL_MAX_DIM)
    } else {
        image
    };

    let rgba = scaled.to_rgba8();
    let (width, height) = rgba.dimensions();
    Some(Handle::from_rgba(width, height, rgba.into_raw()))
}
