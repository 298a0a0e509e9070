// SPDX-License-Identifier: MPL-2.0
//! Ordered collection state with optimistic reorder reconciliation.
//!
//! Reordering is applied locally before the server confirms it: the caller
//! snapshots via [`Collection::begin_move`], persists the change remotely,
//! then either [`Collection::confirm_move`]s (re-applying the shift against
//! whatever the local state has become in the meantime) or
//! [`Collection::fail_move`]s (restoring the snapshot exactly).

use crate::api::ImageRecord;

/// Load state of the collection as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// The local mirror of the remote collection, kept sorted by rank.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Vec<ImageRecord>,
    status: LoadStatus,
    error: Option<String>,
    /// Rollback target for the reorder currently in flight.
    ///
    /// A single slot, overwritten by each new `begin_move`: two overlapping
    /// reorders share it, so only the most recent one can roll back cleanly.
    previous_items: Option<Vec<ImageRecord>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.items
    }

    pub fn record(&self, id: i64) -> Option<&ImageRecord> {
        self.items.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rank for a record appended at the end.
    pub fn next_order(&self) -> i64 {
        self.items.len() as i64
    }

    // --- load ---------------------------------------------------------------

    pub fn begin_load(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Replaces the whole sequence. The server sends it pre-sorted by rank;
    /// sorting again here keeps the invariant independent of that promise.
    pub fn load_succeeded(&mut self, mut items: Vec<ImageRecord>) {
        items.sort_by_key(|record| record.order);
        self.items = items;
        self.status = LoadStatus::Succeeded;
        self.error = None;
    }

    pub fn load_failed(&mut self, message: String) {
        self.status = LoadStatus::Failed;
        self.error = Some(message);
    }

    // --- reorder ------------------------------------------------------------

    /// Applies a move speculatively and snapshots the pre-move sequence.
    ///
    /// Returns `false` (and takes no snapshot) when `id` is unknown or the
    /// record already sits at `new_order`; callers skip the remote call in
    /// that case.
    pub fn begin_move(&mut self, id: i64, new_order: i64) -> bool {
        let Some(record) = self.record(id) else {
            log::debug!("ignoring move of unknown record {}", id);
            return false;
        };
        if record.order == new_order {
            return false;
        }

        self.previous_items = Some(self.items.clone());
        self.apply_shift(id, new_order);
        true
    }

    /// Reconciles the server's confirmed `(id, order)` pair by re-applying
    /// the shift against the then-current state. A no-op when the local
    /// state already matches; corrects drift when a concurrent change moved
    /// things since the optimistic application.
    pub fn confirm_move(&mut self, id: i64, order: i64) {
        self.apply_shift(id, order);
        self.previous_items = None;
    }

    /// Discards everything since the snapshot taken by `begin_move` and
    /// records the failure.
    pub fn fail_move(&mut self, message: String) {
        if let Some(previous) = self.previous_items.take() {
            self.items = previous;
        }
        self.error = Some(message);
    }

    /// Shifts the ranks of every other record to make room, assigns the new
    /// rank, and re-sorts. Ranks stay a dense permutation when they were one
    /// before.
    fn apply_shift(&mut self, id: i64, new_order: i64) {
        let Some(current_order) = self.record(id).map(|record| record.order) else {
            return;
        };
        if current_order == new_order {
            return;
        }

        for record in &mut self.items {
            if record.id == id {
                continue;
            }
            if new_order > current_order {
                if record.order > current_order && record.order <= new_order {
                    record.order -= 1;
                }
            } else if record.order >= new_order && record.order < current_order {
                record.order += 1;
            }
        }

        if let Some(record) = self.items.iter_mut().find(|record| record.id == id) {
            record.order = new_order;
        }

        self.items.sort_by_key(|record| record.order);
    }

    // --- record lifecycle ---------------------------------------------------

    /// Appends the server-confirmed record (uploads resolve with the final
    /// field values, including the assigned id).
    pub fn add_succeeded(&mut self, record: ImageRecord) {
        self.items.push(record);
    }

    /// Drops the record. Remaining ranks are not renumbered; the sequence
    /// stays sorted because only relative order matters between reorders.
    pub fn remove_succeeded(&mut self, id: i64) {
        self.items.retain(|record| record.id != id);
    }

    /// Wholesale-replaces the record with the server's representation.
    pub fn edit_succeeded(&mut self, record: ImageRecord) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == record.id) {
            *existing = record;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, order: i64) -> ImageRecord {
        ImageRecord {
            id,
            title: format!("image-{}", id),
            image: format!("/media/{}.jpg", id),
            order,
        }
    }

    fn loaded(n: i64) -> Collection {
        let mut collection = Collection::new();
        collection.begin_load();
        collection.load_succeeded((0..n).map(|i| record(i + 1, i)).collect());
        collection
    }

    fn orders(collection: &Collection) -> Vec<(i64, i64)> {
        collection
            .records()
            .iter()
            .map(|r| (r.id, r.order))
            .collect()
    }

    fn assert_dense(collection: &Collection) {
        let mut ranks: Vec<i64> = collection.records().iter().map(|r| r.order).collect();
        ranks.sort_unstable();
        let expected: Vec<i64> = (0..collection.len() as i64).collect();
        assert_eq!(ranks, expected, "ranks must be a dense permutation");
    }

    #[test]
    fn load_transitions_status() {
        let mut collection = Collection::new();
        assert_eq!(collection.status(), LoadStatus::Idle);

        collection.begin_load();
        assert_eq!(collection.status(), LoadStatus::Loading);

        collection.load_succeeded(vec![record(1, 0)]);
        assert_eq!(collection.status(), LoadStatus::Succeeded);
        assert!(collection.error().is_none());
    }

    #[test]
    fn load_failure_records_message() {
        let mut collection = Collection::new();
        collection.begin_load();
        collection.load_failed("connection refused".to_string());

        assert_eq!(collection.status(), LoadStatus::Failed);
        assert_eq!(collection.error(), Some("connection refused"));
    }

    #[test]
    fn load_sorts_by_rank_defensively() {
        let mut collection = Collection::new();
        collection.load_succeeded(vec![record(3, 2), record(1, 0), record(2, 1)]);

        assert_eq!(orders(&collection), vec![(1, 0), (2, 1), (3, 2)]);
    }

    #[test]
    fn move_forward_shifts_intermediate_ranks_down() {
        // [{1,0},{2,1},{3,2}], move(1, 2) => ranks {2:0, 3:1, 1:2}
        let mut collection = loaded(3);

        assert!(collection.begin_move(1, 2));

        assert_eq!(orders(&collection), vec![(2, 0), (3, 1), (1, 2)]);
        assert_dense(&collection);
    }

    #[test]
    fn move_backward_shifts_intermediate_ranks_up() {
        let mut collection = loaded(4);

        assert!(collection.begin_move(4, 1));

        assert_eq!(orders(&collection), vec![(1, 0), (4, 1), (2, 2), (3, 3)]);
        assert_dense(&collection);
    }

    #[test]
    fn move_to_current_order_is_a_noop() {
        let mut collection = loaded(3);
        let before = orders(&collection);

        assert!(!collection.begin_move(2, 1));

        assert_eq!(orders(&collection), before);
    }

    #[test]
    fn move_of_unknown_record_is_ignored() {
        let mut collection = loaded(3);
        let before = orders(&collection);

        assert!(!collection.begin_move(99, 0));

        assert_eq!(orders(&collection), before);
    }

    #[test]
    fn ranks_stay_dense_across_move_sequences() {
        let mut collection = loaded(5);
        let moves = [(1, 4), (3, 0), (5, 2), (2, 3), (4, 4), (1, 0)];

        for (id, target) in moves {
            collection.begin_move(id, target);
            collection.confirm_move(id, target);
            assert_dense(&collection);
        }
    }

    #[test]
    fn failed_move_restores_snapshot_exactly() {
        let mut collection = loaded(4);
        let before = collection.records().to_vec();

        assert!(collection.begin_move(2, 3));
        assert_ne!(collection.records(), before.as_slice());

        collection.fail_move("server rejected the move".to_string());

        assert_eq!(collection.records(), before.as_slice());
        assert_eq!(collection.error(), Some("server rejected the move"));
    }

    #[test]
    fn confirm_move_is_idempotent_when_state_matches() {
        let mut collection = loaded(3);
        collection.begin_move(1, 2);
        let after_optimistic = orders(&collection);

        collection.confirm_move(1, 2);

        assert_eq!(orders(&collection), after_optimistic);
    }

    #[test]
    fn confirm_move_corrects_drift_from_concurrent_changes() {
        let mut collection = loaded(3);
        collection.begin_move(1, 2);
        // A concurrent change lands before the confirmation arrives.
        collection.begin_move(3, 0);

        collection.confirm_move(1, 2);

        assert_eq!(
            collection.record(1).map(|r| r.order),
            Some(2),
            "confirmed rank wins over the interleaved change"
        );
        assert_dense(&collection);
    }

    #[test]
    fn add_appends_at_length_before_add() {
        let mut collection = loaded(2);
        let order = collection.next_order();
        assert_eq!(order, 2);

        collection.add_succeeded(record(10, order));

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.record(10).map(|r| r.order), Some(2));
        assert_dense(&collection);
    }

    #[test]
    fn remove_keeps_relative_order_and_tolerates_gaps() {
        let mut collection = loaded(4);

        collection.remove_succeeded(2);

        assert_eq!(collection.len(), 3);
        assert_eq!(orders(&collection), vec![(1, 0), (3, 2), (4, 3)]);

        // A later move over the gapped sequence still works and the record's
        // target rank is honored.
        collection.begin_move(4, 0);
        let ids: Vec<i64> = collection.records().iter().map(|r| r.id).collect();
        assert_eq!(ids[0], 4);
    }

    #[test]
    fn remove_of_unknown_id_changes_nothing() {
        let mut collection = loaded(3);
        collection.remove_succeeded(42);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn edit_replaces_record_wholesale() {
        let mut collection = loaded(2);
        let replacement = ImageRecord {
            id: 2,
            title: "Renamed".to_string(),
            image: "/media/new.png".to_string(),
            order: 1,
        };

        collection.edit_succeeded(replacement.clone());

        assert_eq!(collection.record(2), Some(&replacement));
    }

    #[test]
    fn second_move_overwrites_rollback_target() {
        let mut collection = loaded(3);

        collection.begin_move(1, 2);
        let after_first = collection.records().to_vec();
        collection.begin_move(2, 2);

        // The rollback target is now the state after the first optimistic
        // move, not the original sequence (the documented single-slot
        // limitation).
        collection.fail_move("rejected".to_string());
        assert_eq!(collection.records(), after_first.as_slice());
    }
}
