// SPDX-License-Identifier: MPL-2.0
//! Gallery screen: the ordered image grid with drag-to-reorder, upload,
//! per-tile edit/delete, and the navbar.
//!
//! The component owns interaction state only (drag gesture, hover, the edit
//! dialog); the collection itself lives in the application state and is
//! passed into [`State::view`] read-only. Outcomes surface as [`Event`]s.

pub mod drag;
mod view;

use drag::DragState;
use iced::Point;
use std::path::PathBuf;

pub use view::view;

#[derive(Debug, Clone)]
pub enum Message {
    // Tile gestures
    TilePressed { id: i64, index: usize },
    TileEntered { index: usize },
    TileExited { index: usize },
    PointerMoved(Point),
    TileReleased { index: usize },
    PointerReleased,

    // Tile actions
    EditPressed { id: i64, title: String },
    DeletePressed { id: i64 },

    // Edit dialog
    EditTitleChanged(String),
    EditPickReplacement,
    EditSavePressed,
    EditCancelled,

    // Toolbar
    UploadPressed,
    RefreshPressed,
    LogoutPressed,
}

/// Outcome of a state update, consumed by the application update loop.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    /// Persist a new rank for a record (drag released over another tile).
    MoveImage { id: i64, new_order: i64 },
    /// Open the file picker for uploads.
    PickUploadFiles,
    /// Open the file picker for the edit dialog's replacement content.
    PickReplacement,
    /// Persist the edit dialog's changes.
    SaveEdit {
        id: i64,
        title: String,
        replacement: Option<PathBuf>,
    },
    Delete { id: i64 },
    Refresh,
    Logout,
}

/// The edit dialog's working copy.
#[derive(Debug, Clone)]
pub struct EditState {
    pub id: i64,
    pub title: String,
    pub replacement: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct State {
    drag: DragState,
    hovered_tile: Option<usize>,
    editing: Option<EditState>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::TilePressed { id, index } => {
                // No reordering underneath the edit dialog.
                if self.editing.is_none() {
                    self.drag.press(id, index);
                }
                Event::None
            }
            Message::TileEntered { index } => {
                self.hovered_tile = Some(index);
                self.drag.enter_tile(index);
                Event::None
            }
            Message::TileExited { index } => {
                if self.hovered_tile == Some(index) {
                    self.hovered_tile = None;
                }
                self.drag.exit_tile(index);
                Event::None
            }
            Message::PointerMoved(position) => {
                self.drag.motion(position);
                Event::None
            }
            Message::TileReleased { index } => {
                self.drag.enter_tile(index);
                match self.drag.release() {
                    Some((id, target_index)) => Event::MoveImage {
                        id,
                        new_order: target_index as i64,
                    },
                    None => Event::None,
                }
            }
            Message::PointerReleased => {
                // Window-level release. Over a tile this resolves exactly
                // like `TileReleased` (whichever arrives first wins, the
                // other becomes a no-op); outside any tile the gesture is
                // abandoned.
                match self.drag.release() {
                    Some((id, target_index)) => Event::MoveImage {
                        id,
                        new_order: target_index as i64,
                    },
                    None => Event::None,
                }
            }
            Message::EditPressed { id, title } => {
                self.drag.cancel();
                self.editing = Some(EditState {
                    id,
                    title,
                    replacement: None,
                });
                Event::None
            }
            Message::DeletePressed { id } => {
                self.drag.cancel();
                Event::Delete { id }
            }
            Message::EditTitleChanged(title) => {
                if let Some(editing) = self.editing.as_mut() {
                    editing.title = title;
                }
                Event::None
            }
            Message::EditPickReplacement => {
                if self.editing.is_some() {
                    Event::PickReplacement
                } else {
                    Event::None
                }
            }
            Message::EditSavePressed => match self.editing.take() {
                Some(editing) => Event::SaveEdit {
                    id: editing.id,
                    title: editing.title,
                    replacement: editing.replacement,
                },
                None => Event::None,
            },
            Message::EditCancelled => {
                self.editing = None;
                Event::None
            }
            Message::UploadPressed => Event::PickUploadFiles,
            Message::RefreshPressed => Event::Refresh,
            Message::LogoutPressed => Event::Logout,
        }
    }

    /// Attaches a picked replacement file to the open edit dialog.
    pub fn set_replacement(&mut self, path: PathBuf) {
        if let Some(editing) = self.editing.as_mut() {
            editing.replacement = Some(path);
        }
    }

    /// Whether a press is being tracked; drives the global pointer
    /// subscription.
    pub fn has_active_press(&self) -> bool {
        self.drag.is_pressed()
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    pub(crate) fn drag(&self) -> &DragState {
        &self.drag
    }

    pub(crate) fn hovered_tile(&self) -> Option<usize> {
        self.hovered_tile
    }
}
