//! Error types for plan copy normalization
//!
//! Provides error handling for:
//! - Copies that do not mirror their source
//! - Host writes refused during commit
//! - Beam number space exhaustion
//! - Copy name selection

use plancopy_model::{BeamNumber, EntityRef, HostError, PlanId};

/// Main normalization error type
#[derive(Debug, thiserror::Error)]
pub enum NormalizationError {
    /// Source or copy plan not in the patient record
    #[error("plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Copy is not a structural mirror of the source
    #[error("structural mismatch: {0}")]
    StructuralMismatch(#[from] Mismatch),

    /// Host refused a write
    #[error("host rejected write to {entity}: {source}")]
    HostRejected {
        /// Entity whose field was being written
        entity: EntityRef,
        /// Host error
        #[source]
        source: HostError,
    },

    /// Numbers after `after` cannot cover every beam of the copy
    #[error("beam numbers exhausted: {needed} numbers needed after {after}")]
    NumberSpaceExhausted {
        /// Baseline number
        after: BeamNumber,
        /// Beams to number
        needed: usize,
    },

    /// Host refused the copy itself
    #[error("copy failed: {0}")]
    CopyFailed(#[source] HostError),

    /// Every candidate copy name was taken
    #[error("no free copy name for {plan:?} after {attempts} attempts")]
    CopyNameExhausted {
        /// Source plan name
        plan: String,
        /// Names tried
        attempts: u32,
    },
}

impl NormalizationError {
    /// Check if the caller may retry after resolving a host-side condition
    ///
    /// Structural mismatches need a fresh copy and are never retryable.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::HostRejected { .. })
    }

    /// Entity named by the error, if any
    #[inline]
    #[must_use]
    pub fn entity(&self) -> Option<EntityRef> {
        match self {
            Self::HostRejected { entity, .. } => Some(*entity),
            _ => None,
        }
    }

    /// Create host rejection error
    #[inline]
    pub fn host_rejected(entity: EntityRef, source: HostError) -> Self {
        Self::HostRejected { entity, source }
    }
}

/// How a copy differs from its source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    /// Source and copy are the same plan
    #[error("source and copy are the same plan {0}")]
    SamePlan(PlanId),

    /// Beam set counts differ
    #[error("source has {source_count} beam sets, copy has {copy_count}")]
    BeamSetCount {
        /// Beam sets in source
        source_count: usize,
        /// Beam sets in copy
        copy_count: usize,
    },

    /// Isocenter counts differ
    #[error("source has {source_count} isocenters, copy has {copy_count}")]
    IsocenterCount {
        /// Isocenters in source
        source_count: usize,
        /// Isocenters in copy
        copy_count: usize,
    },

    /// Beam counts differ within a beam set
    #[error("beam set {beam_set}: source has {source_count} beams, copy has {copy_count}")]
    BeamCount {
        /// Position of the beam set
        beam_set: usize,
        /// Beams in source set
        source_count: usize,
        /// Beams in copy set
        copy_count: usize,
    },

    /// A beam is a setup beam on one side only
    #[error("beam set {beam_set}, beam {beam}: setup flag differs (source {source_setup}, copy {copy_setup})")]
    SetupFlag {
        /// Position of the beam set
        beam_set: usize,
        /// Position of the beam in the set
        beam: usize,
        /// Source beam is a setup beam
        source_setup: bool,
        /// Copy beam is a setup beam
        copy_setup: bool,
    },
}
