//! Per-step performance metrics for the simulation.
//!
//! [`StepMetrics`] captures wall-clock time per phase of a single step
//! together with a few population counters, for telemetry and profiling.

/// Timing and population counters collected during a single step.
///
/// All durations are in microseconds. The simulation fills these fields
/// after each `step()` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Stage updates, school placement and occupancy rebuild.
    pub distribution_us: u64,
    /// Additional and starvation mortality, including the purge that follows.
    pub mortality_us: u64,
    /// Forcing advance, occupancy sort and the predation pass.
    pub predation_us: u64,
    /// Somatic growth and trophic-level smoothing.
    pub growth_us: u64,
    /// Catchability update and fishing.
    pub fishing_us: u64,
    /// Spawning and the age-class shift.
    pub reproduction_us: u64,
    /// Indicator accumulation, period close and reporting.
    pub indicators_us: u64,
    /// Live schools at the end of the step.
    pub schools: usize,
    /// Predator schools that fed this step.
    pub predators: usize,
    /// Schools dropped by the age-class shift this step.
    pub senescent_schools: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.predation_us, 0);
        assert_eq!(m.schools, 0);
        assert_eq!(m.senescent_schools, 0);
    }
}
