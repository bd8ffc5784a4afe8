//! Pure reconciliation algorithms.
//!
//! - `slot`: node identity (`same_slot`, `SlotKey`, `Identity`)
//! - `map`: flat key-value diff for property maps and class sets
//! - `sequence`: child-list diff with move detection
//! - `hash`: stable hashing for content fingerprints
//!
//! Nothing here touches a host tree.

mod hash;
mod map;
mod sequence;
mod slot;

pub use hash::StableHasher;
pub use map::{diff_map, diff_set, MapDiff};
pub use sequence::{apply_ops, diff_sequence, diff_sequence_by, SeqDiff, SeqOp, SeqStats};
pub use slot::{same_slot, Identity, SlotKey};
