//! Fixed-capacity task slot table
//!
//! Slots are scanned lowest-index-first both when allocating and when
//! looking for ready work, so a freed low slot is the next one reused.
//! The table is only ever touched by the single active context, so it
//! carries no locks.

use crate::error::{AbbeyError, AbbeyResult};
use crate::id::SlotIndex;
use crate::state::SlotState;

/// One slot of the task table
#[derive(Debug)]
pub struct TaskEntry<W> {
    state: SlotState,

    /// Pending work; taken out by `claim` while the task runs
    work: Option<W>,
}

impl<W> TaskEntry<W> {
    const fn free() -> Self {
        Self {
            state: SlotState::Free,
            work: None,
        }
    }

    #[inline]
    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Ready and not yet claimed by a worker
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state.is_ready() && self.work.is_some()
    }
}

/// Task table of fixed capacity
pub struct TaskTable<W> {
    slots: Vec<TaskEntry<W>>,

    /// Number of Ready slots
    ready: usize,
}

impl<W> TaskTable<W> {
    /// Create a table with `capacity` Free slots
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, TaskEntry::free);
        Self { slots, ready: 0 }
    }

    /// Install work in the first Free slot and mark it Ready
    ///
    /// Fails with `AbbeyError::Full` when every slot is Ready.
    pub fn allocate(&mut self, work: W) -> AbbeyResult<SlotIndex> {
        let index = self
            .slots
            .iter()
            .position(|entry| entry.state.is_free())
            .ok_or(AbbeyError::Full)?;

        let entry = &mut self.slots[index];
        entry.work = Some(work);
        entry.state = SlotState::Ready;
        self.ready += 1;
        self.verify();

        Ok(SlotIndex::new(index as u32))
    }

    /// First Ready slot whose work has not been claimed yet
    pub fn take_ready(&self) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(TaskEntry::is_pending)
            .map(|index| SlotIndex::new(index as u32))
    }

    /// Move the work out of a Ready slot so it can run
    ///
    /// The slot stays Ready (and keeps counting against capacity) until
    /// `release` is called after the work completes.
    ///
    /// # Panics
    ///
    /// If the slot is not Ready or its work was already claimed.
    pub fn claim(&mut self, slot: SlotIndex) -> W {
        let entry = self.entry_mut(slot);
        assert!(
            entry.state.is_ready(),
            "claim of {} which is not Ready",
            slot
        );
        match entry.work.take() {
            Some(work) => work,
            None => panic!("task in {} executed twice", slot),
        }
    }

    /// Return an executed slot to Free
    ///
    /// # Panics
    ///
    /// On double release, or on release of a slot whose work never ran.
    pub fn release(&mut self, slot: SlotIndex) {
        let entry = self.entry_mut(slot);
        assert!(entry.state.is_ready(), "double release of {}", slot);
        assert!(
            entry.work.is_none(),
            "release of {} before its task executed",
            slot
        );
        entry.state = SlotState::Free;
        self.ready -= 1;
        self.verify();
    }

    /// State of a slot, `None` when out of range
    #[inline]
    pub fn state(&self, slot: SlotIndex) -> Option<SlotState> {
        self.slots.get(slot.as_usize()).map(TaskEntry::state)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of Ready slots, including one currently executing
    #[inline]
    pub fn ready_count(&self) -> usize {
        self.ready
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.slots.len() - self.ready
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ready == self.slots.len()
    }

    /// Iterate slot states in index order
    pub fn states(&self) -> impl Iterator<Item = SlotState> + '_ {
        self.slots.iter().map(TaskEntry::state)
    }

    fn entry_mut(&mut self, slot: SlotIndex) -> &mut TaskEntry<W> {
        let capacity = self.slots.len();
        match self.slots.get_mut(slot.as_usize()) {
            Some(entry) => entry,
            None => panic!("{} out of range for table of {} slots", slot, capacity),
        }
    }

    #[inline]
    fn verify(&self) {
        verify_ready_count(&self.slots, self.ready);
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "debug-assertions")] {
        fn verify_ready_count<W>(slots: &[TaskEntry<W>], ready: usize) {
            let counted = slots.iter().filter(|e| e.state.is_ready()).count();
            assert_eq!(counted, ready, "ready counter out of sync");
            assert!(ready <= slots.len());
        }
    } else {
        #[inline(always)]
        fn verify_ready_count<W>(slots: &[TaskEntry<W>], ready: usize) {
            debug_assert!(ready <= slots.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_lowest_first() {
        let mut table = TaskTable::new(4);

        assert_eq!(table.allocate("a").unwrap(), SlotIndex::new(0));
        assert_eq!(table.allocate("b").unwrap(), SlotIndex::new(1));
        assert_eq!(table.allocate("c").unwrap(), SlotIndex::new(2));
        assert_eq!(table.ready_count(), 3);
        assert_eq!(table.free_count(), 1);
    }

    #[test]
    fn test_allocate_full() {
        let mut table = TaskTable::new(2);
        table.allocate(1).unwrap();
        table.allocate(2).unwrap();

        assert!(table.is_full());
        assert_eq!(table.allocate(3), Err(AbbeyError::Full));
        assert_eq!(table.ready_count(), 2);
    }

    #[test]
    fn test_claim_release_reuse() {
        let mut table = TaskTable::new(3);
        let s0 = table.allocate(10).unwrap();
        let s1 = table.allocate(11).unwrap();

        assert_eq!(table.take_ready(), Some(s0));
        assert_eq!(table.claim(s0), 10);

        // Claimed but unreleased: still Ready, no longer offered
        assert_eq!(table.state(s0), Some(SlotState::Ready));
        assert_eq!(table.take_ready(), Some(s1));
        assert_eq!(table.ready_count(), 2);

        table.release(s0);
        assert_eq!(table.state(s0), Some(SlotState::Free));

        // Freed low slot is reused first
        assert_eq!(table.allocate(12).unwrap(), s0);
    }

    #[test]
    fn test_take_ready_empty() {
        let table: TaskTable<()> = TaskTable::new(4);
        assert_eq!(table.take_ready(), None);
        assert!(table.states().all(|s| s.is_free()));
    }

    #[test]
    fn test_state_out_of_range() {
        let table: TaskTable<()> = TaskTable::new(1);
        assert_eq!(table.state(SlotIndex::new(5)), None);
    }

    #[test]
    #[should_panic(expected = "double release")]
    fn test_double_release_panics() {
        let mut table = TaskTable::new(1);
        let slot = table.allocate(()).unwrap();
        table.claim(slot);
        table.release(slot);
        table.release(slot);
    }

    #[test]
    #[should_panic(expected = "executed twice")]
    fn test_double_claim_panics() {
        let mut table = TaskTable::new(1);
        let slot = table.allocate(()).unwrap();
        table.claim(slot);
        table.claim(slot);
    }

    #[test]
    #[should_panic(expected = "before its task executed")]
    fn test_release_before_claim_panics() {
        let mut table = TaskTable::new(1);
        let slot = table.allocate(()).unwrap();
        table.release(slot);
    }

    #[test]
    fn test_capacity_invariant_under_churn() {
        let mut table = TaskTable::new(5);
        let mut seed: u32 = 0x2545_f491;

        for _ in 0..2000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;

            if seed % 3 != 0 {
                let was_full = table.is_full();
                match table.allocate(seed) {
                    Ok(_) => assert!(!was_full),
                    Err(AbbeyError::Full) => assert!(was_full),
                    Err(e) => panic!("unexpected error {}", e),
                }
            } else if let Some(slot) = table.take_ready() {
                table.claim(slot);
                table.release(slot);
            }

            assert!(table.ready_count() <= table.capacity());
            let counted = table.states().filter(|s| s.is_ready()).count();
            assert_eq!(counted, table.ready_count());
        }
    }
}
