//! Allocation engine
//!
//! An [`AllocationEngine`] owns one session's live state and is the only
//! component that mutates it. Requests are arbitrated with a
//! speculate-then-swap discipline: the candidate state is built as a copy,
//! checked with the safety test, and swapped in only on a safe verdict.
//! Denied requests therefore leave the visible state untouched by
//! construction; there is no undo path to get wrong.

use crate::config::SessionConfig;
use crate::error::{BankerError, Result};
use crate::history::{ActionKind, HistoryEntry, HistoryLog, COMPLETION_BONUS, PROCESS_POINTS};
use crate::safety::{self, SafetyVerdict};
use crate::vector;
use serde::{Deserialize, Serialize};

const REASON_GRANTED: &str = "granted; system remains in a safe state";
const REASON_EXCEEDS_NEED: &str = "request exceeds process maximum need";
const REASON_EXCEEDS_AVAILABLE: &str = "request exceeds available resources";
const REASON_UNSAFE: &str = "would violate safety";
const REASON_RELEASED: &str = "resources released";

/// Arbitration result for one resource request
///
/// `reason` is set on denials; `safety_check` carries the verdict of the
/// speculative state when the request got that far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome {
    pub granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_check: Option<SafetyVerdict>,
}

impl RequestOutcome {
    fn granted(verdict: SafetyVerdict) -> Self {
        RequestOutcome {
            granted: true,
            reason: None,
            safety_check: Some(verdict),
        }
    }

    fn denied(reason: &str, verdict: Option<SafetyVerdict>) -> Self {
        RequestOutcome {
            granted: false,
            reason: Some(reason.to_string()),
            safety_check: verdict,
        }
    }
}

/// Read-only projection of a session, shaped for the transport layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub processes: Vec<String>,
    pub resources: Vec<String>,
    pub total_resources: Vec<u32>,
    pub allocation: Vec<Vec<u32>>,
    pub max_demand: Vec<Vec<u32>>,
    pub need: Vec<Vec<u32>>,
    pub available: Vec<u32>,
    pub score: u32,
    pub completed: bool,
    pub history: Vec<HistoryEntry>,
}

/// Owns and arbitrates one session's allocation state
#[derive(Debug)]
pub struct AllocationEngine {
    /// Retained for `reset`
    config: SessionConfig,

    /// P×R units currently held, `allocation[i][j] <= max_demand[i][j]`
    allocation: Vec<Vec<u32>>,

    /// Units not held by any process; conservation against the totals holds
    /// after every operation
    available: Vec<u32>,

    /// First-completion latch per process, for scoring
    process_done: Vec<bool>,

    score: u32,
    completed: bool,
    history: HistoryLog,
}

impl AllocationEngine {
    /// Build a fresh engine from a validated configuration
    pub fn new(config: SessionConfig) -> Self {
        let allocation = config.initial_allocation().to_vec();
        let available = config.initial_available();

        // A process handed its full demand up front latches as done without
        // scoring; points are for driving a process to completion.
        let process_done: Vec<bool> = allocation
            .iter()
            .zip(config.max_demand())
            .map(|(alloc, max)| alloc == max)
            .collect();
        let completed = process_done.iter().all(|&d| d);

        AllocationEngine {
            config,
            allocation,
            available,
            process_done,
            score: 0,
            completed,
            history: HistoryLog::new(),
        }
    }

    /// Arbitrate a resource request for one process
    ///
    /// Checks, in order: process index, vector length, need bound, available
    /// bound, then the safety of the speculative post-grant state. The first
    /// two violations are hard errors; the rest produce structured denials
    /// that are recorded in history and leave state unchanged.
    pub fn request(&mut self, process: usize, request: &[u32]) -> Result<RequestOutcome> {
        self.check_process(process)?;
        self.check_vector(request)?;

        if !vector::fits(request, &self.need_row(process)) {
            return Ok(self.deny(process, request, REASON_EXCEEDS_NEED, None));
        }
        if !vector::fits(request, &self.available) {
            return Ok(self.deny(process, request, REASON_EXCEEDS_AVAILABLE, None));
        }

        // Speculative state: copy, apply, test. Committing is a swap of the
        // two vectors; nothing below can leave a partial mutation behind.
        let mut next_available = self.available.clone();
        let mut next_allocation = self.allocation.clone();
        vector::sub(&mut next_available, request);
        vector::add(&mut next_allocation[process], request);

        let next_need = Self::need_of(&self.config, &next_allocation);
        let verdict = safety::is_safe(&next_available, &next_allocation, &next_need);

        if !verdict.safe {
            return Ok(self.deny(process, request, REASON_UNSAFE, Some(verdict)));
        }

        self.available = next_available;
        self.allocation = next_allocation;
        self.history.record(HistoryEntry::new(
            process,
            ActionKind::Request,
            Some(request.to_vec()),
            true,
            REASON_GRANTED,
        ));
        self.settle_completion(process);

        Ok(RequestOutcome::granted(verdict))
    }

    /// Return a process's entire allocation to the pool
    ///
    /// Always succeeds for a valid index: releasing can only increase
    /// availability, so no safety test is needed. Score, the completion
    /// latch, and `completed` are unaffected.
    pub fn release(&mut self, process: usize) -> Result<()> {
        self.check_process(process)?;

        let released = std::mem::replace(
            &mut self.allocation[process],
            vec![0; self.config.resource_count()],
        );
        vector::add(&mut self.available, &released);

        self.history.record(HistoryEntry::new(
            process,
            ActionKind::Release,
            None,
            true,
            REASON_RELEASED,
        ));
        Ok(())
    }

    /// Run the safety test on the current live state, without mutating it
    pub fn check_safety(&self) -> SafetyVerdict {
        let need = Self::need_of(&self.config, &self.allocation);
        safety::is_safe(&self.available, &self.allocation, &need)
    }

    /// Rebuild the initial state from the original configuration, clearing
    /// history and score
    pub fn reset(&mut self) {
        *self = AllocationEngine::new(self.config.clone());
    }

    /// Full read-only projection of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            processes: self.config.processes().to_vec(),
            resources: self.config.resources().to_vec(),
            total_resources: self.config.totals().to_vec(),
            allocation: self.allocation.clone(),
            max_demand: self.config.max_demand().to_vec(),
            need: Self::need_of(&self.config, &self.allocation),
            available: self.available.clone(),
            score: self.score,
            completed: self.completed,
            history: self.history.entries().to_vec(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Export the audit trail as pretty-printed JSON
    pub fn export_history(&self) -> Result<String> {
        self.history.to_json()
    }

    fn check_process(&self, process: usize) -> Result<()> {
        let count = self.config.process_count();
        if process >= count {
            return Err(BankerError::InvalidProcess {
                index: process,
                count,
            });
        }
        Ok(())
    }

    fn check_vector(&self, request: &[u32]) -> Result<()> {
        let expected = self.config.resource_count();
        if request.len() != expected {
            return Err(BankerError::InvalidResourceVector {
                expected,
                got: request.len(),
            });
        }
        Ok(())
    }

    fn need_row(&self, process: usize) -> Vec<u32> {
        self.config.max_demand()[process]
            .iter()
            .zip(&self.allocation[process])
            .map(|(max, alloc)| max - alloc)
            .collect()
    }

    fn need_of(config: &SessionConfig, allocation: &[Vec<u32>]) -> Vec<Vec<u32>> {
        config
            .max_demand()
            .iter()
            .zip(allocation)
            .map(|(max_row, alloc_row)| {
                max_row
                    .iter()
                    .zip(alloc_row)
                    .map(|(max, alloc)| max - alloc)
                    .collect()
            })
            .collect()
    }

    fn deny(
        &mut self,
        process: usize,
        request: &[u32],
        reason: &str,
        verdict: Option<SafetyVerdict>,
    ) -> RequestOutcome {
        self.history.record(HistoryEntry::new(
            process,
            ActionKind::Request,
            Some(request.to_vec()),
            false,
            reason,
        ));
        RequestOutcome::denied(reason, verdict)
    }

    /// Latch first-time completion and advance the score after a grant
    fn settle_completion(&mut self, process: usize) {
        if self.process_done[process] || !vector::is_zero(&self.need_row(process)) {
            return;
        }

        self.process_done[process] = true;
        self.score += PROCESS_POINTS;

        if !self.completed && self.process_done.iter().all(|&d| d) {
            self.completed = true;
            self.score += COMPLETION_BONUS;
        }
    }
}
