//! Sequence diff with move detection
//!
//! Computes an ordered edit script that turns an old child list into a new
//! one. Ops are positional: each index refers to the working sequence at the
//! moment the op is applied, so a consumer replays them in order.
//!
//! # Algorithm
//!
//! 1. **Removals.** Walk the old sequence. Each old item claims the first
//!    unclaimed equal item of the new sequence. Items that claim nothing are
//!    removed.
//! 2. **Adds and moves.** Walk the new sequence with a cursor `j`. Everything
//!    before the cursor already equals `new[..j]`. The first pending old item
//!    equal to `new[j]` is either already at `j` (no-op) or pulled back to `j`
//!    (move). Without a match, `new[j]` is inserted at `j`.
//!
//! Every move pulls an item backward to the cursor, so two items trading
//! places yield one `Move` and one `NoOp`, never two reciprocal moves.
//!
//! Duplicate equal items are matched greedily in encounter order.
//!
//! # Complexity
//!
//! - Time: O(n * m) comparisons
//! - Space: O(n + m)

// =============================================================================
// Public Types
// =============================================================================

/// Single edit in a sequence diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqOp {
    /// Remove the item at `index` (it was `old[old_idx]`)
    Remove { index: usize, old_idx: usize },
    /// Insert `new[index]` at `index`
    Add { index: usize },
    /// Move `old[old_idx]` from `from` to `to` (`to` is also its new index)
    Move { from: usize, to: usize, old_idx: usize },
    /// `old[old_idx]` already sits at `new_idx`
    NoOp { old_idx: usize, new_idx: usize },
}

impl SeqOp {
    /// Item this op is about
    ///
    /// Adds refer to the new sequence, every other op to the old one.
    pub fn item<'a, T>(&self, old: &'a [T], new: &'a [T]) -> &'a T {
        match *self {
            Self::Add { index } => &new[index],
            Self::Remove { old_idx, .. } | Self::Move { old_idx, .. } | Self::NoOp { old_idx, .. } => &old[old_idx],
        }
    }

    /// Index into the old sequence, if the op consumes an old item
    pub fn old_index(&self) -> Option<usize> {
        match *self {
            Self::Add { .. } => None,
            Self::Remove { old_idx, .. } | Self::Move { old_idx, .. } | Self::NoOp { old_idx, .. } => Some(old_idx),
        }
    }

    /// Index into the new sequence, if the op produces a new item
    pub fn new_index(&self) -> Option<usize> {
        match *self {
            Self::Remove { .. } => None,
            Self::Add { index } => Some(index),
            Self::Move { to, .. } => Some(to),
            Self::NoOp { new_idx, .. } => Some(new_idx),
        }
    }

    /// Check if this op leaves the working sequence unchanged
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp { .. })
    }
}

/// Result of a sequence diff
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqDiff {
    /// Ops in application order
    pub ops: Vec<SeqOp>,
    /// Statistics about the diff
    pub stats: SeqStats,
}

impl SeqDiff {
    /// Check if the sequences are equal
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Statistics from a sequence diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeqStats {
    /// Number of items kept in place
    pub kept: usize,
    /// Number of items added
    pub added: usize,
    /// Number of items removed
    pub removed: usize,
    /// Number of items moved
    pub moved: usize,
}

impl SeqStats {
    /// Total number of edit operations (not counting keeps)
    pub fn edit_count(&self) -> usize {
        self.added + self.removed + self.moved
    }

    /// Check if there are no changes
    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }
}

// =============================================================================
// Diff
// =============================================================================

/// Diff two sequences, comparing items with `==`
pub fn diff_sequence<T: PartialEq>(old: &[T], new: &[T]) -> SeqDiff {
    diff_sequence_by(old, new, |a, b| a == b)
}

/// Diff two sequences with a custom comparator.
///
/// `eq` is called as `eq(old_item, new_item)`. It should be an equivalence;
/// if it is not, applying the ops still yields a sequence of `new.len()`
/// items, but which old items survive is unspecified.
pub fn diff_sequence_by<T, F>(old: &[T], new: &[T], mut eq: F) -> SeqDiff
where
    F: FnMut(&T, &T) -> bool,
{
    let mut ops = Vec::with_capacity(old.len().max(new.len()));
    let mut stats = SeqStats::default();

    // Current position of each old item in the working sequence
    let mut pos: Vec<usize> = (0..old.len()).collect();
    // Old items still waiting for a new position
    let mut pending = vec![true; old.len()];

    // Phase 1: removals
    let mut claimed = vec![false; new.len()];
    for (i, item) in old.iter().enumerate() {
        match (0..new.len()).find(|&j| !claimed[j] && eq(item, &new[j])) {
            Some(j) => claimed[j] = true,
            None => {
                ops.push(SeqOp::Remove { index: pos[i], old_idx: i });
                stats.removed += 1;
                pending[i] = false;
                for p in &mut pos[i + 1..] {
                    *p -= 1;
                }
            }
        }
    }

    // Phase 2: adds and moves
    for (j, item) in new.iter().enumerate() {
        let found = (0..old.len()).find(|&i| pending[i] && eq(&old[i], item));

        let Some(i) = found else {
            ops.push(SeqOp::Add { index: j });
            stats.added += 1;
            shift_pending(&mut pos, &pending, 0..old.len());
            continue;
        };

        pending[i] = false;
        if pos[i] == j {
            ops.push(SeqOp::NoOp { old_idx: i, new_idx: j });
            stats.kept += 1;
        } else {
            debug_assert!(pos[i] > j, "pending item behind the cursor");
            ops.push(SeqOp::Move { from: pos[i], to: j, old_idx: i });
            stats.moved += 1;
            // Pending items before `i` sit in [j, pos[i]) and shift right
            shift_pending(&mut pos, &pending, 0..i);
        }
    }

    // Survivors of phase 1 that phase 2 never matched. Only reachable when
    // `eq` is not an equivalence; they trail the finished prefix.
    for i in 0..old.len() {
        if pending[i] {
            ops.push(SeqOp::Remove { index: new.len(), old_idx: i });
            stats.removed += 1;
        }
    }

    SeqDiff { ops, stats }
}

fn shift_pending(pos: &mut [usize], pending: &[bool], range: std::ops::Range<usize>) {
    for i in range {
        if pending[i] {
            pos[i] += 1;
        }
    }
}

// =============================================================================
// Apply
// =============================================================================

/// Replay `ops` on `seq`, taking added items from `new`.
///
/// Applying the diff of `old` and `new` to a copy of `old` yields a sequence
/// of `new.len()` items whose positions line up with `new`.
pub fn apply_ops<T: Clone>(seq: &mut Vec<T>, ops: &[SeqOp], new: &[T]) {
    for op in ops {
        match *op {
            SeqOp::Remove { index, .. } => {
                seq.remove(index);
            }
            SeqOp::Add { index } => seq.insert(index, new[index].clone()),
            SeqOp::Move { from, to, .. } => {
                let item = seq.remove(from);
                seq.insert(to, item);
            }
            SeqOp::NoOp { .. } => {}
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn round_trip(old: &[char], new: &[char]) -> SeqDiff {
        let diff = diff_sequence(old, new);
        let mut seq = old.to_vec();
        apply_ops(&mut seq, &diff.ops, new);
        assert_eq!(seq, new, "ops: {:?}", diff.ops);
        diff
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_identical() {
        let diff = round_trip(&chars("abc"), &chars("abc"));
        assert!(diff.is_empty());
        assert_eq!(
            diff.ops,
            [
                SeqOp::NoOp { old_idx: 0, new_idx: 0 },
                SeqOp::NoOp { old_idx: 1, new_idx: 1 },
                SeqOp::NoOp { old_idx: 2, new_idx: 2 },
            ]
        );
    }

    #[test]
    fn test_empty_sequences() {
        assert!(round_trip(&[], &[]).ops.is_empty());

        let diff = round_trip(&[], &chars("ab"));
        assert_eq!(diff.ops, [SeqOp::Add { index: 0 }, SeqOp::Add { index: 1 }]);

        let diff = round_trip(&chars("ab"), &[]);
        assert_eq!(
            diff.ops,
            [SeqOp::Remove { index: 0, old_idx: 0 }, SeqOp::Remove { index: 0, old_idx: 1 }]
        );
    }

    #[test]
    fn test_remove_shifts_positions() {
        let diff = round_trip(&chars("abcd"), &chars("ad"));
        assert_eq!(
            diff.ops,
            [
                SeqOp::Remove { index: 1, old_idx: 1 },
                SeqOp::Remove { index: 1, old_idx: 2 },
                SeqOp::NoOp { old_idx: 0, new_idx: 0 },
                SeqOp::NoOp { old_idx: 3, new_idx: 1 },
            ]
        );
        assert_eq!(diff.stats.removed, 2);
        assert_eq!(diff.stats.kept, 2);
    }

    #[test]
    fn test_insert_in_middle() {
        let diff = round_trip(&chars("ac"), &chars("abc"));
        assert_eq!(
            diff.ops,
            [
                SeqOp::NoOp { old_idx: 0, new_idx: 0 },
                SeqOp::Add { index: 1 },
                SeqOp::NoOp { old_idx: 1, new_idx: 2 },
            ]
        );
    }

    #[test]
    fn test_swap_is_single_move() {
        let diff = round_trip(&chars("ab"), &chars("ba"));
        assert_eq!(
            diff.ops,
            [SeqOp::Move { from: 1, to: 0, old_idx: 1 }, SeqOp::NoOp { old_idx: 0, new_idx: 1 }]
        );
        assert_eq!(diff.stats.moved, 1);
    }

    #[test]
    fn test_move_to_front() {
        let diff = round_trip(&chars("abcd"), &chars("dabc"));
        assert_eq!(diff.stats.moved, 1);
        assert_eq!(diff.stats.kept, 3);
        assert_eq!(diff.ops[0], SeqOp::Move { from: 3, to: 0, old_idx: 3 });
    }

    #[test]
    fn test_mixed_edits() {
        let diff = round_trip(&chars("abcde"), &chars("ecxa"));
        assert_eq!(diff.stats.removed, 2);
        assert_eq!(diff.stats.added, 1);
        assert_eq!(diff.stats.edit_count(), diff.ops.iter().filter(|op| !op.is_noop()).count());
    }

    #[test]
    fn test_duplicates_match_in_order() {
        let diff = round_trip(&chars("aab"), &chars("baa"));
        assert_eq!(
            diff.ops,
            [
                SeqOp::Move { from: 2, to: 0, old_idx: 2 },
                SeqOp::NoOp { old_idx: 0, new_idx: 1 },
                SeqOp::NoOp { old_idx: 1, new_idx: 2 },
            ]
        );
    }

    #[test]
    fn test_custom_comparator() {
        // Compare by first letter only
        let old = ["apple", "banana"];
        let new = ["blueberry", "avocado"];
        let diff = diff_sequence_by(&old, &new, |a, b| a.as_bytes()[0] == b.as_bytes()[0]);
        assert_eq!(diff.stats.moved, 1);
        assert_eq!(diff.stats.added, 0);

        let op = diff.ops[0];
        assert_eq!(op.item(&old, &new), &"banana");
        assert_eq!(op.new_index(), Some(0));
        assert_eq!(op.old_index(), Some(1));
    }

    #[test]
    fn test_inconsistent_comparator_keeps_length() {
        let mut calls = 0;
        let diff = diff_sequence_by(&[1], &[1], |a, b| {
            calls += 1;
            calls == 1 && a == b
        });
        assert_eq!(
            diff.ops,
            [SeqOp::Add { index: 0 }, SeqOp::Remove { index: 1, old_idx: 0 }]
        );

        let mut seq = vec![1];
        apply_ops(&mut seq, &diff.ops, &[1]);
        assert_eq!(seq, [1]);
    }

    fn arb_seq() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(0u8..6, 0..10)
    }

    proptest! {
        #[test]
        fn test_round_trip(old in arb_seq(), new in arb_seq()) {
            let diff = diff_sequence(&old, &new);
            let mut seq = old.clone();
            apply_ops(&mut seq, &diff.ops, &new);
            prop_assert_eq!(&seq, &new);

            // Every old item is consumed once, every new item produced once
            let mut old_seen: Vec<usize> = diff.ops.iter().filter_map(SeqOp::old_index).collect();
            old_seen.sort_unstable();
            prop_assert_eq!(old_seen, (0..old.len()).collect::<Vec<_>>());
            let mut new_seen: Vec<usize> = diff.ops.iter().filter_map(SeqOp::new_index).collect();
            new_seen.sort_unstable();
            prop_assert_eq!(new_seen, (0..new.len()).collect::<Vec<_>>());

            // Moves only pull items backward, so no two moves undo each other
            for op in &diff.ops {
                if let SeqOp::Move { from, to, .. } = *op {
                    prop_assert!(from > to);
                }
            }
        }

        #[test]
        fn test_round_trip_with_equivalence(old in arb_seq(), new in arb_seq()) {
            let diff = diff_sequence_by(&old, &new, |a, b| a / 2 == b / 2);
            let mut seq = old.clone();
            apply_ops(&mut seq, &diff.ops, &new);
            prop_assert_eq!(seq.len(), new.len());
            for (got, want) in seq.iter().zip(&new) {
                prop_assert_eq!(got / 2, want / 2);
            }
        }

        #[test]
        fn test_idempotence(seq in arb_seq()) {
            let diff = diff_sequence(&seq, &seq);
            let expected: Vec<SeqOp> = (0..seq.len()).map(|i| SeqOp::NoOp { old_idx: i, new_idx: i }).collect();
            prop_assert_eq!(diff.ops, expected);
        }

        #[test]
        fn test_swap_minimality(a in 0u8..100, b in 100u8..200) {
            let diff = diff_sequence(&[a, b], &[b, a]);
            prop_assert_eq!(diff.stats.moved, 1);
            prop_assert_eq!(diff.stats.kept, 1);
            prop_assert_eq!(diff.ops.len(), 2);
        }
    }
}
