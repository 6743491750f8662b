//! Banker's Algorithm safety test
//!
//! Decides whether a resource-allocation state is safe: whether some order
//! exists in which every process can acquire its remaining need, run to
//! completion, and return its allocation, without any process becoming
//! permanently blocked.
//!
//! The test is a pure function over a snapshot of `(available, allocation,
//! need)`; it never mutates engine state. When several processes are
//! eligible in the same pass, the lowest index is always taken first, so
//! repeated calls on identical state return an identical sequence.

use crate::vector;
use serde::{Deserialize, Serialize};

/// Outcome of a safety test
///
/// `sequence` is a completion order covering every process when `safe` is
/// true, and empty when the state is unsafe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyVerdict {
    pub safe: bool,
    pub sequence: Vec<usize>,
}

impl SafetyVerdict {
    /// Verdict for an unsafe state
    pub fn unsafe_state() -> Self {
        SafetyVerdict {
            safe: false,
            sequence: Vec::new(),
        }
    }
}

/// Run the Banker's safety test on a state snapshot
///
/// # Arguments
///
/// * `available` - units of each resource not held by any process
/// * `allocation` - P×R matrix of units currently held
/// * `need` - P×R matrix of units each process may still request
///
/// # Returns
///
/// A [`SafetyVerdict`]: safe with a full completion sequence, or unsafe with
/// an empty one.
///
/// # Examples
///
/// ```
/// use banker_rs::safety::is_safe;
///
/// // One process holding nothing, needing less than what's available.
/// let verdict = is_safe(&[3, 2], &[vec![0, 0]], &[vec![1, 1]]);
/// assert!(verdict.safe);
/// assert_eq!(verdict.sequence, vec![0]);
/// ```
pub fn is_safe(available: &[u32], allocation: &[Vec<u32>], need: &[Vec<u32>]) -> SafetyVerdict {
    debug_assert_eq!(allocation.len(), need.len());

    let process_count = allocation.len();
    let mut work = available.to_vec();
    let mut finish = vec![false; process_count];
    let mut sequence = Vec::with_capacity(process_count);

    // Each pass admits the lowest-indexed unfinished process whose need fits
    // in `work`, then restarts the scan with the returned allocation added.
    loop {
        let mut advanced = false;

        for i in 0..process_count {
            if !finish[i] && vector::fits(&need[i], &work) {
                vector::add(&mut work, &allocation[i]);
                finish[i] = true;
                sequence.push(i);
                advanced = true;
                break;
            }
        }

        if !advanced {
            break;
        }
    }

    if finish.iter().all(|&f| f) {
        SafetyVerdict {
            safe: true,
            sequence,
        }
    } else {
        SafetyVerdict::unsafe_state()
    }
}
