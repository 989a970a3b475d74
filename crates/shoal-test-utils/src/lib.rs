//! Test utilities and mock collaborators for Shoal development.
//!
//! Provides mock implementations of the collaborator traits
//! ([`LtlForcing`], [`Reporter`]) and, in [`fixtures`], small grids,
//! species presets and ready-to-run configurations.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use shoal_core::{
    CellId, ForcingError, LtlForcing, PeriodSnapshot, PlanktonGroupId, Reporter, SimTime,
};

/// One plankton group as seen by [`MockForcing`].
#[derive(Clone, Debug, PartialEq)]
pub struct MockGroup {
    pub size_range: (f64, f64),
    pub trophic_level: f64,
    /// Accessible biomass per cell, restored by every `advance`.
    pub biomass: Vec<f64>,
}

/// Calls observed by a [`MockForcing`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForcingLog {
    pub advanced: Vec<SimTime>,
    pub deductions: Vec<(PlanktonGroupId, CellId, f64)>,
}

/// Mock implementation of [`LtlForcing`].
///
/// Every `advance` restores the configured biomass and records the time.
/// Deductions are logged so tests can check what predators ate; clones
/// share the log, so a test can box one clone into a simulation and read
/// the log through another. Optionally fails from a given step onward.
#[derive(Clone, Debug, Default)]
pub struct MockForcing {
    groups: Vec<MockGroup>,
    current: Vec<Vec<f64>>,
    log: Rc<RefCell<ForcingLog>>,
    fail_from: Option<usize>,
}

impl MockForcing {
    pub fn new(groups: Vec<MockGroup>) -> Self {
        let current = groups.iter().map(|g| g.biomass.clone()).collect();
        Self {
            groups,
            current,
            ..Default::default()
        }
    }

    /// A forcing with no plankton at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Make `advance` fail once `n` advances have succeeded.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_from = Some(n);
        self
    }

    /// Copy of the shared call log.
    pub fn log(&self) -> ForcingLog {
        self.log.borrow().clone()
    }

    /// Total biomass deducted from `group` so far.
    pub fn deducted(&self, group: PlanktonGroupId) -> f64 {
        self.log
            .borrow()
            .deductions
            .iter()
            .filter(|(g, _, _)| *g == group)
            .map(|(_, _, a)| a)
            .sum()
    }
}

impl LtlForcing for MockForcing {
    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn accessible_biomass(&self, group: PlanktonGroupId, cell: CellId) -> f64 {
        self.current[group.index()][cell.index()]
    }

    fn trophic_level(&self, group: PlanktonGroupId) -> f64 {
        self.groups[group.index()].trophic_level
    }

    fn size_range(&self, group: PlanktonGroupId) -> (f64, f64) {
        self.groups[group.index()].size_range
    }

    fn deduct_biomass(&mut self, group: PlanktonGroupId, cell: CellId, amount: f64) {
        let v = &mut self.current[group.index()][cell.index()];
        *v = (*v - amount).max(0.0);
        self.log.borrow_mut().deductions.push((group, cell, amount));
    }

    fn advance(&mut self, time: SimTime) -> Result<(), ForcingError> {
        let mut log = self.log.borrow_mut();
        if self.fail_from.is_some_and(|n| log.advanced.len() >= n) {
            return Err(ForcingError::MissingStep {
                step: time.step,
                available: 0,
            });
        }
        for (cur, g) in self.current.iter_mut().zip(&self.groups) {
            cur.clone_from(&g.biomass);
        }
        log.advanced.push(time);
        Ok(())
    }
}

/// [`Reporter`] that keeps every snapshot it receives.
///
/// Clones share the same storage, so a test can hand one clone to the
/// simulation and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    snapshots: Rc<RefCell<Vec<PeriodSnapshot>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots received so far.
    pub fn snapshots(&self) -> Vec<PeriodSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Number of snapshots received so far.
    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, snapshot: &PeriodSnapshot) {
        self.snapshots.borrow_mut().push(snapshot.clone());
    }
}
