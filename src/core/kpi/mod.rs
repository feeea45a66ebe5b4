//! KPI calculator.
//!
//! Pure functions over an already-filtered fact collection: the caller
//! queries the store once and hands the slice in. Every rate is a
//! percentage with one decimal place and is zero on an empty set.

pub mod breakdown;
pub mod clock;
pub mod rates;
pub mod trends;

pub use breakdown::{EmployeeRow, GroupMetrics, GroupRow, WeekRow};
pub use clock::{ClockBehavior, MethodUsage};
pub use rates::{ComplianceKpis, EfficiencyKpis, KpiSummary, Tally, VolumeKpis, percentage};
pub use trends::WeekTrend;

use crate::models::time_entry::TimeEntry;

pub struct KpiCalculator<'a> {
    entries: &'a [TimeEntry],
}

impl<'a> KpiCalculator<'a> {
    pub fn new(entries: &'a [TimeEntry]) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tally(&self) -> Tally {
        Tally::from_entries(self.entries)
    }

    pub fn compliance(&self) -> ComplianceKpis {
        ComplianceKpis::from_tally(&self.tally())
    }

    pub fn volume(&self) -> VolumeKpis {
        VolumeKpis::from_tally(&self.tally())
    }

    pub fn efficiency(&self) -> EfficiencyKpis {
        EfficiencyKpis::from_tally(&self.tally())
    }

    /// Compliance, volume and efficiency from a single pass.
    pub fn summary(&self) -> KpiSummary {
        let t = self.tally();
        KpiSummary {
            compliance: ComplianceKpis::from_tally(&t),
            volume: VolumeKpis::from_tally(&t),
            efficiency: EfficiencyKpis::from_tally(&t),
        }
    }

    pub fn by_office(&self) -> Vec<GroupRow> {
        breakdown::by_office(self.entries)
    }

    pub fn by_week(&self) -> Vec<WeekRow> {
        breakdown::by_week(self.entries)
    }

    pub fn by_employee(&self, limit: Option<usize>) -> Vec<EmployeeRow> {
        breakdown::by_employee(self.entries, limit)
    }

    pub fn by_department(&self) -> Vec<GroupRow> {
        breakdown::by_department(self.entries)
    }

    pub fn by_shift(&self) -> Vec<GroupRow> {
        breakdown::by_shift(self.entries)
    }

    pub fn trends(&self) -> Vec<WeekTrend> {
        trends::trends(&self.by_week())
    }

    pub fn clock_behavior(&self) -> ClockBehavior {
        clock::clock_behavior(self.entries)
    }
}
