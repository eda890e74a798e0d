//! Patient-wide beam number allocation
//!
//! Numbers are handed out consecutively after a baseline, with no gaps and
//! no reuse.

use crate::error::NormalizationError;
use plancopy_model::{BeamNumber, PatientRecord};

/// Consecutive number allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberAllocator {
    baseline: BeamNumber,
    last: BeamNumber,
}

impl NumberAllocator {
    /// Allocator whose first number is `baseline + 1`
    #[inline]
    #[must_use]
    pub fn after(baseline: BeamNumber) -> Self {
        Self {
            baseline,
            last: baseline,
        }
    }

    /// Allocator above every number currently held in the record
    #[inline]
    #[must_use]
    pub fn above_record(record: &PatientRecord) -> Self {
        Self::after(record.max_beam_number())
    }

    /// Baseline the allocator started from
    #[inline]
    #[must_use]
    pub fn baseline(&self) -> BeamNumber {
        self.baseline
    }

    /// Numbers handed out so far
    #[inline]
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.last.get() - self.baseline.get()
    }

    /// Reserve `count` numbers up front
    ///
    /// # Errors
    /// Returns [`NormalizationError::NumberSpaceExhausted`] if the range would
    /// overflow
    pub fn ensure_capacity(&self, count: usize) -> Result<(), NormalizationError> {
        let exhausted = || NormalizationError::NumberSpaceExhausted {
            after: self.baseline,
            needed: count,
        };
        let count = u32::try_from(count).map_err(|_| exhausted())?;
        self.last.get().checked_add(count).ok_or_else(exhausted)?;
        Ok(())
    }

    /// Next number
    ///
    /// # Errors
    /// Returns [`NormalizationError::NumberSpaceExhausted`] on overflow
    pub fn next_number(&mut self) -> Result<BeamNumber, NormalizationError> {
        let next = self
            .last
            .checked_next()
            .ok_or(NormalizationError::NumberSpaceExhausted {
                after: self.baseline,
                needed: self.allocated() as usize + 1,
            })?;
        self.last = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plancopy_model::{Beam, BeamSet, Plan};

    #[test]
    fn numbers_follow_baseline() {
        let mut alloc = NumberAllocator::after(BeamNumber(7));
        assert_eq!(alloc.next_number().unwrap(), BeamNumber(8));
        assert_eq!(alloc.next_number().unwrap(), BeamNumber(9));
        assert_eq!(alloc.allocated(), 2);
        assert_eq!(alloc.baseline(), BeamNumber(7));
    }

    #[test]
    fn empty_record_starts_at_one() {
        let mut alloc = NumberAllocator::above_record(&PatientRecord::new());
        assert_eq!(alloc.next_number().unwrap(), BeamNumber(1));
    }

    #[test]
    fn record_baseline_includes_every_plan() {
        let mut record = PatientRecord::new();
        record.add_plan(Plan::new("A").with_beam_set(BeamSet::new("A").with_beam(Beam::setup(12, "SB1_1"))));
        record.add_plan(Plan::new("B").with_beam_set(BeamSet::new("B").with_beam(Beam::treatment(3, "3"))));
        assert_eq!(NumberAllocator::above_record(&record).baseline(), BeamNumber(12));
    }

    #[test]
    fn overflow_is_reported() {
        let mut alloc = NumberAllocator::after(BeamNumber(u32::MAX - 1));
        assert!(alloc.ensure_capacity(1).is_ok());
        assert!(matches!(
            alloc.ensure_capacity(2),
            Err(NormalizationError::NumberSpaceExhausted { needed: 2, .. })
        ));
        assert_eq!(alloc.next_number().unwrap(), BeamNumber(u32::MAX));
        assert!(alloc.next_number().is_err());
    }
}
