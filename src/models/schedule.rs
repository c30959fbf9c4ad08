//! Schedule (solution) model.
//!
//! A schedule is a `time × processor` grid over one super-period. Each cell
//! holds at most one [`SchedulingDecision`].

use serde::{Deserialize, Serialize};

use super::{InstanceId, SchedulingDecision, Time};

/// Time × processor grid of scheduling decisions.
///
/// Rows are time units `0..super_period`, columns are processors
/// `0..processor_count`.
///
/// Deserialization rejects a cell list whose length is not
/// `super_period × processor_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleGrid")]
pub struct Schedule {
    super_period: Time,
    processor_count: usize,
    /// Row-major cells.
    cells: Vec<Option<SchedulingDecision>>,
}

/// Unchecked wire form of [`Schedule`].
#[derive(Deserialize)]
struct ScheduleGrid {
    super_period: Time,
    processor_count: usize,
    cells: Vec<Option<SchedulingDecision>>,
}

impl TryFrom<ScheduleGrid> for Schedule {
    type Error = String;

    fn try_from(grid: ScheduleGrid) -> Result<Self, Self::Error> {
        let expected = (grid.super_period as usize).checked_mul(grid.processor_count);
        if expected != Some(grid.cells.len()) {
            return Err(format!(
                "schedule of {} time units on {} processors cannot hold {} cells",
                grid.super_period,
                grid.processor_count,
                grid.cells.len()
            ));
        }
        Ok(Self {
            super_period: grid.super_period,
            processor_count: grid.processor_count,
            cells: grid.cells,
        })
    }
}

impl Schedule {
    /// Creates an empty grid.
    pub fn new(super_period: Time, processor_count: usize) -> Self {
        Self {
            super_period,
            processor_count,
            cells: vec![None; super_period as usize * processor_count],
        }
    }

    /// Number of rows (time units).
    pub fn super_period(&self) -> Time {
        self.super_period
    }

    /// Number of columns (processors).
    pub fn processor_count(&self) -> usize {
        self.processor_count
    }

    /// The decision at a cell, if any. Out-of-range cells are empty.
    pub fn get(&self, time: Time, processor: usize) -> Option<&SchedulingDecision> {
        self.index(time, processor)
            .and_then(|i| self.cells[i].as_ref())
    }

    /// All cells for one time unit. Empty for an out-of-range time.
    pub fn row(&self, time: Time) -> &[Option<SchedulingDecision>] {
        if time >= self.super_period {
            return &[];
        }
        let start = time as usize * self.processor_count;
        &self.cells[start..start + self.processor_count]
    }

    /// Places a decision. Returns `false` (leaving the grid unchanged) if the
    /// cell is out of range or already occupied.
    pub fn place(&mut self, time: Time, processor: usize, decision: SchedulingDecision) -> bool {
        match self.index(time, processor) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(decision);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut SchedulingDecision> {
        self.cells.iter_mut().flatten()
    }

    /// Occupied cells for one time unit.
    pub fn occupied_at(&self, time: Time) -> usize {
        self.row(time).iter().filter(|c| c.is_some()).count()
    }

    /// All decisions in time order, then processor order.
    pub fn decisions(&self) -> impl Iterator<Item = &SchedulingDecision> {
        self.cells.iter().flatten()
    }

    /// Decisions of one instance, in time order.
    pub fn decisions_for(&self, instance: InstanceId) -> Vec<&SchedulingDecision> {
        self.decisions()
            .filter(|d| d.instance == instance)
            .collect()
    }

    /// Decisions of all instances of one task, in time order.
    pub fn decisions_for_task(&self, task: usize) -> Vec<&SchedulingDecision> {
        self.decisions()
            .filter(|d| d.instance.task == task)
            .collect()
    }

    /// Total occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.decisions().count()
    }

    /// Total cells (`super_period × processor_count`).
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Busy time units on one processor.
    pub fn busy_on(&self, processor: usize) -> usize {
        if processor >= self.processor_count {
            return 0;
        }
        (0..self.super_period)
            .filter(|&t| self.get(t, processor).is_some())
            .count()
    }

    fn index(&self, time: Time, processor: usize) -> Option<usize> {
        (time < self.super_period && processor < self.processor_count)
            .then(|| time as usize * self.processor_count + processor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(task: usize, time: Time) -> SchedulingDecision {
        SchedulingDecision::new(InstanceId::new(task, 0), time)
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new(4, 2);
        assert!(s.place(0, 0, decision(0, 0)));
        assert!(s.place(0, 1, decision(1, 0)));
        assert!(s.place(2, 0, decision(0, 2)));
        s
    }

    #[test]
    fn test_schedule_dimensions() {
        let s = sample_schedule();
        assert_eq!(s.super_period(), 4);
        assert_eq!(s.processor_count(), 2);
        assert_eq!(s.capacity(), 8);
        assert_eq!(s.row(1).len(), 2);
        assert!(s.row(4).is_empty());
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let mut s = sample_schedule();
        assert!(!s.place(0, 0, decision(2, 0)));
        assert!(!s.place(4, 0, decision(2, 4)));
        assert!(!s.place(1, 2, decision(2, 1)));
        assert_eq!(s.get(0, 0).unwrap().instance.task, 0);
        assert_eq!(s.occupied_count(), 3);
    }

    #[test]
    fn test_occupancy_queries() {
        let s = sample_schedule();
        assert_eq!(s.occupied_at(0), 2);
        assert_eq!(s.occupied_at(1), 0);
        assert_eq!(s.occupied_at(2), 1);
        assert_eq!(s.occupied_at(9), 0);
        assert_eq!(s.busy_on(0), 2);
        assert_eq!(s.busy_on(1), 1);
        assert_eq!(s.busy_on(7), 0);
    }

    #[test]
    fn test_decisions_order_and_filters() {
        let s = sample_schedule();
        let times: Vec<Time> = s.decisions().map(|d| d.time).collect();
        assert_eq!(times, vec![0, 0, 2]);

        assert_eq!(s.decisions_for(InstanceId::new(0, 0)).len(), 2);
        assert_eq!(s.decisions_for_task(1).len(), 1);
        assert!(s.decisions_for_task(5).is_empty());
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new(0, 3);
        assert_eq!(s.capacity(), 0);
        assert_eq!(s.occupied_count(), 0);
        assert!(s.get(0, 0).is_none());
    }

    #[test]
    fn test_schedule_serde() {
        let s = sample_schedule();
        let json = serde_json::to_string(&s).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        pretty_assertions::assert_eq!(s, back);
    }

    #[test]
    fn test_schedule_deserialize_rejects_wrong_cell_count() {
        let short = r#"{"super_period":4,"processor_count":2,"cells":[]}"#;
        let err = serde_json::from_str::<Schedule>(short).unwrap_err();
        assert!(err.to_string().contains("cannot hold 0 cells"));

        let exact = r#"{"super_period":1,"processor_count":2,"cells":[null,null]}"#;
        let ok: Schedule = serde_json::from_str(exact).unwrap();
        assert_eq!(ok.occupied_at(0), 0);
    }
}
