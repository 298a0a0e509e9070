// SPDX-License-Identifier: MPL-2.0
//! Drag state for reordering gallery tiles.
//!
//! A press on a tile arms the state; the drag only engages once the cursor
//! has travelled past an activation threshold, so plain clicks on tile
//! actions never turn into accidental reorders. While engaged, the tile
//! under the cursor is the drop target; releasing over a different tile
//! yields the move.

use iced::Point;

/// Distance in logical pixels the cursor must travel before a press
/// becomes a drag.
pub const ACTIVATION_DISTANCE: f32 = 8.0;

#[derive(Debug, Clone)]
struct ActiveDrag {
    /// Record under the initial press.
    id: i64,
    /// Grid index the drag started from.
    source_index: usize,
    /// Where the press happened; `None` until the first motion reports a
    /// cursor position.
    origin: Option<Point>,
    /// Whether the activation threshold has been crossed.
    engaged: bool,
    /// Grid index currently under the cursor.
    hover_index: Option<usize>,
}

/// Manages press/drag/drop state for the gallery grid.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    active: Option<ActiveDrag>,
}

impl DragState {
    /// Arms the state from a press on the tile at `index`.
    pub fn press(&mut self, id: i64, index: usize) {
        self.active = Some(ActiveDrag {
            id,
            source_index: index,
            origin: None,
            engaged: false,
            hover_index: Some(index),
        });
    }

    /// Feeds a cursor position; engages the drag past the threshold.
    pub fn motion(&mut self, position: Point) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        match active.origin {
            None => active.origin = Some(position),
            Some(origin) => {
                if !active.engaged && origin.distance(position) > ACTIVATION_DISTANCE {
                    active.engaged = true;
                }
            }
        }
    }

    /// Tracks the tile under the cursor as the current drop target.
    pub fn enter_tile(&mut self, index: usize) {
        if let Some(active) = self.active.as_mut() {
            active.hover_index = Some(index);
        }
    }

    /// Clears the drop target when the cursor leaves it.
    pub fn exit_tile(&mut self, index: usize) {
        if let Some(active) = self.active.as_mut() {
            if active.hover_index == Some(index) {
                active.hover_index = None;
            }
        }
    }

    /// Finishes the gesture. Returns `Some((id, target_index))` when an
    /// engaged drag was released over a different tile; plain clicks and
    /// drops back onto the source return `None`.
    pub fn release(&mut self) -> Option<(i64, usize)> {
        let active = self.active.take()?;
        if !active.engaged {
            return None;
        }
        let target = active.hover_index?;
        if target == active.source_index {
            return None;
        }
        Some((active.id, target))
    }

    /// Abandons the gesture without producing a move.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Whether a press is being tracked (engaged or not).
    pub fn is_pressed(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the activation threshold has been crossed.
    pub fn is_dragging(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.engaged)
    }

    /// The record being dragged, once engaged.
    pub fn dragged_id(&self) -> Option<i64> {
        self.active
            .as_ref()
            .filter(|active| active.engaged)
            .map(|active| active.id)
    }

    /// The current drop target, once engaged.
    pub fn drop_target(&self) -> Option<usize> {
        self.active
            .as_ref()
            .filter(|active| active.engaged)
            .and_then(|active| active.hover_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engaged_drag() -> DragState {
        let mut state = DragState::default();
        state.press(7, 1);
        state.motion(Point::new(100.0, 100.0));
        state.motion(Point::new(100.0 + ACTIVATION_DISTANCE + 1.0, 100.0));
        state
    }

    #[test]
    fn default_state_is_idle() {
        let state = DragState::default();
        assert!(!state.is_pressed());
        assert!(!state.is_dragging());
        assert!(state.drop_target().is_none());
    }

    #[test]
    fn press_alone_does_not_engage() {
        let mut state = DragState::default();
        state.press(7, 1);

        assert!(state.is_pressed());
        assert!(!state.is_dragging());
    }

    #[test]
    fn small_motion_stays_a_click() {
        let mut state = DragState::default();
        state.press(7, 1);
        state.motion(Point::new(100.0, 100.0));
        state.motion(Point::new(103.0, 100.0));

        assert!(!state.is_dragging());
        assert_eq!(state.release(), None);
    }

    #[test]
    fn motion_past_threshold_engages() {
        let state = engaged_drag();
        assert!(state.is_dragging());
        assert_eq!(state.dragged_id(), Some(7));
    }

    #[test]
    fn release_over_other_tile_yields_move() {
        let mut state = engaged_drag();
        state.enter_tile(3);

        assert_eq!(state.release(), Some((7, 3)));
        assert!(!state.is_pressed());
    }

    #[test]
    fn release_over_source_tile_is_not_a_move() {
        let mut state = engaged_drag();
        state.enter_tile(1);

        assert_eq!(state.release(), None);
    }

    #[test]
    fn release_outside_any_tile_is_not_a_move() {
        let mut state = engaged_drag();
        state.enter_tile(3);
        state.exit_tile(3);

        assert_eq!(state.release(), None);
    }

    #[test]
    fn exit_of_stale_tile_keeps_target() {
        let mut state = engaged_drag();
        state.enter_tile(3);
        state.exit_tile(2);

        assert_eq!(state.drop_target(), Some(3));
    }

    #[test]
    fn cancel_clears_everything() {
        let mut state = engaged_drag();
        state.cancel();

        assert!(!state.is_pressed());
        assert_eq!(state.release(), None);
    }
}
