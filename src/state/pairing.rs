use chrono::Utc;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use super::data::{Pair, ScanId, ScanRecord};

/// Misuse of the pairing store by its caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The record is not in the unpaired pool (already pending, paired, or unknown)
    #[error("{0} is not an unpaired scan")]
    NotUnpaired(ScanId),
}

/// What a successful `select` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The record is now waiting for a partner
    Pending(ScanId),
    /// The pending record and this one formed a new pair
    Paired { first: ScanId, second: ScanId },
}

/// The PairingState owns every scan captured during this session.
///
/// Each record lives in exactly one place: the unpaired pool, the pending
/// selection, or one pair. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct PairingState {
    next_id: u64,
    /// Capture order
    unpaired: Vec<ScanRecord>,
    /// At most one record awaiting a partner
    pending: Option<ScanRecord>,
    /// Pairing completion order
    paired: Vec<Pair>,
}

impl PairingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a completed capture to the end of the unpaired pool.
    ///
    /// Cancelled or partial captures must be filtered out before this is called.
    pub fn add_scan(&mut self, photo: PathBuf, value: String) -> ScanId {
        let id = ScanId(self.next_id);
        self.next_id += 1;

        debug!("Adding {} ({:?}) from {}", id, value, photo.display());
        self.unpaired.push(ScanRecord {
            id,
            photo,
            value,
            captured_at: Utc::now(),
        });

        id
    }

    /// Select an unpaired record.
    ///
    /// The first selection becomes pending; the second completes a pair
    /// `(pending, record)`. Selecting anything that is not in the unpaired
    /// pool, including the pending record itself, leaves the state untouched.
    pub fn select(&mut self, id: ScanId) -> Result<Selection, StateError> {
        let index = self
            .unpaired
            .iter()
            .position(|record| record.id == id)
            .ok_or(StateError::NotUnpaired(id))?;

        let record = self.unpaired.remove(index);

        match self.pending.take() {
            None => {
                debug!("{} is pending", id);
                self.pending = Some(record);
                Ok(Selection::Pending(id))
            }
            Some(first) => {
                let first_id = first.id;
                debug!("Pairing {} with {}", first_id, id);
                self.paired.push(Pair {
                    first,
                    second: record,
                });
                Ok(Selection::Paired {
                    first: first_id,
                    second: id,
                })
            }
        }
    }

    /// Dissolve the pair made of exactly these two records.
    ///
    /// Both records go back to the end of the unpaired pool, first then
    /// second. Returns false (and changes nothing) when no such pair exists,
    /// so a repeated delete is harmless.
    pub fn delete_pair(&mut self, first: ScanId, second: ScanId) -> bool {
        let Some(index) = self
            .paired
            .iter()
            .position(|pair| pair.ids() == (first, second))
        else {
            debug!("No pair ({}, {}) to delete", first, second);
            return false;
        };

        let pair = self.paired.remove(index);
        self.unpaired.push(pair.first);
        self.unpaired.push(pair.second);
        debug!("Dissolved pair ({}, {})", first, second);

        true
    }

    pub fn unpaired(&self) -> &[ScanRecord] {
        &self.unpaired
    }

    pub fn pending(&self) -> Option<&ScanRecord> {
        self.pending.as_ref()
    }

    pub fn paired(&self) -> &[Pair] {
        &self.paired
    }

    /// Total number of records held, wherever they are
    pub fn len(&self) -> usize {
        self.unpaired.len() + self.paired.len() * 2 + usize::from(self.pending.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn add(state: &mut PairingState, value: &str) -> ScanId {
        state.add_scan(PathBuf::from(format!("/photos/{}.jpg", value)), value.to_string())
    }

    fn unpaired_values(state: &PairingState) -> Vec<&str> {
        state.unpaired().iter().map(|r| r.value.as_str()).collect()
    }

    /// Every record appears exactly once across the three containers
    fn assert_partition(state: &PairingState, expected: usize) {
        let mut seen = HashSet::new();
        let all = state
            .unpaired()
            .iter()
            .chain(state.pending())
            .chain(state.paired().iter().flat_map(|p| [&p.first, &p.second]));
        for record in all {
            assert!(seen.insert(record.id), "{} appears twice", record.id);
        }
        assert_eq!(seen.len(), expected);
        assert_eq!(state.len(), expected);
    }

    #[test]
    fn test_add_scan_keeps_capture_order() {
        let mut state = PairingState::new();
        let ids: Vec<ScanId> = ["one", "two", "three"]
            .iter()
            .map(|v| add(&mut state, v))
            .collect();

        let unpaired_ids: Vec<ScanId> = state.unpaired().iter().map(|r| r.id).collect();
        assert_eq!(unpaired_ids, ids);
        assert_eq!(unpaired_values(&state), vec!["one", "two", "three"]);
        assert!(state.paired().is_empty());
        assert!(state.pending().is_none());
        assert_partition(&state, 3);
    }

    #[test]
    fn test_single_select_becomes_pending() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        let _b = add(&mut state, "B");

        assert_eq!(state.select(a), Ok(Selection::Pending(a)));
        assert_eq!(state.pending().map(|r| r.id), Some(a));
        assert_eq!(unpaired_values(&state), vec!["B"]);
        assert!(state.paired().is_empty());
        assert_partition(&state, 2);
    }

    #[test]
    fn test_second_select_forms_pair_in_selection_order() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        let b = add(&mut state, "B");
        let c = add(&mut state, "C");

        state.select(b).unwrap();
        assert_eq!(
            state.select(a),
            Ok(Selection::Paired { first: b, second: a })
        );

        assert_eq!(state.paired().len(), 1);
        assert_eq!(state.paired()[0].ids(), (b, a));
        assert_eq!(state.paired()[0].values(), ("B", "A"));
        assert!(state.pending().is_none());
        assert_eq!(state.unpaired().iter().map(|r| r.id).collect::<Vec<_>>(), vec![c]);
        assert_partition(&state, 3);
    }

    #[test]
    fn test_reselecting_pending_is_rejected() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        state.select(a).unwrap();

        assert_eq!(state.select(a), Err(StateError::NotUnpaired(a)));
        assert_eq!(state.pending().map(|r| r.id), Some(a));
        assert_partition(&state, 1);
    }

    #[test]
    fn test_selecting_paired_record_is_rejected() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        let b = add(&mut state, "B");
        state.select(a).unwrap();
        state.select(b).unwrap();

        assert_eq!(state.select(b), Err(StateError::NotUnpaired(b)));
        assert!(state.pending().is_none());
        assert_partition(&state, 2);
    }

    #[test]
    fn test_duplicate_values_stay_distinct() {
        let mut state = PairingState::new();
        let first = add(&mut state, "same");
        let second = add(&mut state, "same");
        assert_ne!(first, second);

        state.select(second).unwrap();
        assert_eq!(state.unpaired()[0].id, first);
        state.select(first).unwrap();
        assert_eq!(state.paired()[0].ids(), (second, first));
    }

    #[test]
    fn test_delete_pair_appends_members_and_is_idempotent() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        let b = add(&mut state, "B");
        let _x = add(&mut state, "X");
        state.select(a).unwrap();
        state.select(b).unwrap();
        assert_eq!(unpaired_values(&state), vec!["X"]);

        assert!(state.delete_pair(a, b));
        assert_eq!(unpaired_values(&state), vec!["X", "A", "B"]);
        assert!(state.paired().is_empty());
        assert_partition(&state, 3);

        assert!(!state.delete_pair(a, b));
        assert_eq!(unpaired_values(&state), vec!["X", "A", "B"]);
        assert_partition(&state, 3);
    }

    #[test]
    fn test_delete_pair_matches_exact_members() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        let b = add(&mut state, "B");
        state.select(a).unwrap();
        state.select(b).unwrap();

        // Reversed order is a different pair
        assert!(!state.delete_pair(b, a));
        assert_eq!(state.paired().len(), 1);
    }

    #[test]
    fn test_delete_one_of_two_pairs() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        let b = add(&mut state, "B");
        let c = add(&mut state, "C");
        let d = add(&mut state, "D");
        for id in [a, b, c, d] {
            state.select(id).unwrap();
        }
        assert_eq!(state.paired().len(), 2);

        assert!(state.delete_pair(a, b));
        assert_eq!(unpaired_values(&state), vec!["A", "B"]);
        assert_eq!(state.paired().len(), 1);
        assert_eq!(state.paired()[0].ids(), (c, d));
        assert_partition(&state, 4);
    }

    #[test]
    fn test_pending_survives_pair_deletion() {
        let mut state = PairingState::new();
        let a = add(&mut state, "A");
        let b = add(&mut state, "B");
        let c = add(&mut state, "C");
        state.select(a).unwrap();
        state.select(b).unwrap();
        state.select(c).unwrap();

        assert!(state.delete_pair(a, b));
        assert_eq!(state.pending().map(|r| r.id), Some(c));

        // A restored record can complete the pending selection
        assert_eq!(
            state.select(b),
            Ok(Selection::Paired { first: c, second: b })
        );
        assert_partition(&state, 3);
    }

    #[test]
    fn test_empty_state() {
        let state = PairingState::new();
        assert!(state.is_empty());
        assert_eq!(state.len(), 0);
    }
}
