//! Session configuration and validation
//!
//! A [`SessionConfig`] fixes everything about a round that never changes
//! while it is played: the resource types and their total counts, the
//! processes and their declared maximum demands, and the allocations the
//! round starts from. Construction validates every structural invariant up
//! front, so an engine built from a config can assume its dimensions and
//! bounds without re-checking.

use crate::error::{BankerError, Result};
use crate::vector;
use serde::{Deserialize, Serialize};

/// Immutable definition of one round
///
/// Retained by the engine for the lifetime of a session so `reset` can
/// rebuild the initial state exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    resources: Vec<String>,
    totals: Vec<u32>,
    processes: Vec<String>,
    max_demand: Vec<Vec<u32>>,
    initial_allocation: Vec<Vec<u32>>,
}

impl SessionConfig {
    /// Create a validated configuration
    ///
    /// `initial_allocation` defaults to the all-zero matrix when `None`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if any dimension mismatches, a max demand
    /// exceeds its resource total, an initial allocation exceeds its max
    /// demand, or the initial allocations of some resource sum past its
    /// total.
    pub fn new(
        resources: Vec<String>,
        totals: Vec<u32>,
        processes: Vec<String>,
        max_demand: Vec<Vec<u32>>,
        initial_allocation: Option<Vec<Vec<u32>>>,
    ) -> Result<Self> {
        if resources.is_empty() {
            return Err(BankerError::Configuration(
                "at least one resource type is required".to_string(),
            ));
        }
        if resources.len() != totals.len() {
            return Err(BankerError::Configuration(format!(
                "{} resource names but {} totals",
                resources.len(),
                totals.len()
            )));
        }
        if processes.is_empty() {
            return Err(BankerError::Configuration(
                "at least one process is required".to_string(),
            ));
        }
        if processes.len() != max_demand.len() {
            return Err(BankerError::Configuration(format!(
                "{} process names but {} max-demand rows",
                processes.len(),
                max_demand.len()
            )));
        }

        let resource_count = resources.len();
        for (i, row) in max_demand.iter().enumerate() {
            if row.len() != resource_count {
                return Err(BankerError::Configuration(format!(
                    "max-demand row for process {} has {} components, expected {}",
                    i,
                    row.len(),
                    resource_count
                )));
            }
            if !vector::fits(row, &totals) {
                return Err(BankerError::Configuration(format!(
                    "max demand of process {} exceeds a resource total",
                    i
                )));
            }
        }

        let initial_allocation = match initial_allocation {
            Some(rows) => rows,
            None => vec![vec![0; resource_count]; processes.len()],
        };

        if initial_allocation.len() != processes.len() {
            return Err(BankerError::Configuration(format!(
                "{} initial-allocation rows but {} processes",
                initial_allocation.len(),
                processes.len()
            )));
        }
        for (i, row) in initial_allocation.iter().enumerate() {
            if row.len() != resource_count {
                return Err(BankerError::Configuration(format!(
                    "initial-allocation row for process {} has {} components, expected {}",
                    i,
                    row.len(),
                    resource_count
                )));
            }
            if !vector::fits(row, &max_demand[i]) {
                return Err(BankerError::Configuration(format!(
                    "initial allocation of process {} exceeds its max demand",
                    i
                )));
            }
        }

        // Conservation: the column sums must leave a non-negative available
        // vector for every resource.
        for j in 0..resource_count {
            let allocated: u64 = initial_allocation.iter().map(|row| u64::from(row[j])).sum();
            if allocated > u64::from(totals[j]) {
                return Err(BankerError::Configuration(format!(
                    "initial allocations of resource '{}' sum to {}, exceeding its total {}",
                    resources[j], allocated, totals[j]
                )));
            }
        }

        Ok(SessionConfig {
            resources,
            totals,
            processes,
            max_demand,
            initial_allocation,
        })
    }

    /// The scenario the game boots with: five processes competing for three
    /// resource types, starting from a safe mid-game allocation.
    pub fn standard() -> Self {
        SessionConfig::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec![10, 5, 7],
            vec![
                "P0".to_string(),
                "P1".to_string(),
                "P2".to_string(),
                "P3".to_string(),
                "P4".to_string(),
            ],
            vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            Some(vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ]),
        )
        .expect("standard scenario is valid")
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    pub fn totals(&self) -> &[u32] {
        &self.totals
    }

    pub fn processes(&self) -> &[String] {
        &self.processes
    }

    pub fn max_demand(&self) -> &[Vec<u32>] {
        &self.max_demand
    }

    pub fn initial_allocation(&self) -> &[Vec<u32>] {
        &self.initial_allocation
    }

    /// Available vector implied by the conservation law at the start of a
    /// round: `total[j] − Σ_i initial_allocation[i][j]`.
    pub fn initial_available(&self) -> Vec<u32> {
        let mut available = self.totals.clone();
        for row in &self.initial_allocation {
            vector::sub(&mut available, row);
        }
        available
    }
}
