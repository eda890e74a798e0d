//! Host data-model interface
//!
//! The planning host owns the patient record. Callers read it as a whole and
//! write one field at a time; every write can be refused independently.

use crate::ids::{BeamId, BeamNumber, BeamSetId, EntityRef, IsocenterId, PlanId};
use crate::record::PatientRecord;

/// Read and write access to a host-owned patient record
pub trait PlanHost {
    /// Current state of the patient record
    fn patient(&self) -> &PatientRecord;

    /// Rename a beam set
    ///
    /// # Errors
    /// Returns error if the host refuses the write
    fn set_beam_set_name(&mut self, id: BeamSetId, name: &str) -> Result<(), HostError>;

    /// Rename an isocenter
    ///
    /// # Errors
    /// Returns error if the host refuses the write
    fn set_isocenter_name(&mut self, id: IsocenterId, name: &str) -> Result<(), HostError>;

    /// Rename a beam
    ///
    /// # Errors
    /// Returns error if the host refuses the write
    fn set_beam_name(&mut self, id: BeamId, name: &str) -> Result<(), HostError>;

    /// Renumber a beam
    ///
    /// # Errors
    /// Returns error if the host refuses the write, e.g. the number is held
    /// by another beam of the patient
    fn set_beam_number(&mut self, id: BeamId, number: BeamNumber) -> Result<(), HostError>;

    /// Copy a plan under a new name
    ///
    /// The copy mirrors the source structure. Its names and numbers are host
    /// defaults.
    ///
    /// # Errors
    /// Returns [`HostError::PlanNameTaken`] if the name exists, or another
    /// error if the host refuses the copy
    fn copy_plan(&mut self, source: PlanId, new_name: &str) -> Result<PlanId, HostError>;
}

/// Errors raised by the host on reads and writes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Plan not in the record
    #[error("plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Entity not in the record
    #[error("{0} not found")]
    EntityNotFound(EntityRef),

    /// Plan name already used in the record
    #[error("plan name already taken: {0:?}")]
    PlanNameTaken(String),

    /// Beam number held by another beam of the patient
    #[error("beam number {number} already in use by beam {holder}")]
    NumberInUse {
        /// Requested number
        number: BeamNumber,
        /// Beam currently holding it
        holder: BeamId,
    },

    /// Beam number outside the valid range
    #[error("invalid beam number: {0}")]
    InvalidNumber(BeamNumber),

    /// Name refused by host validation
    #[error("invalid name {name:?}: {reason}")]
    InvalidName {
        /// Offered name
        name: String,
        /// Validation rule that failed
        reason: String,
    },

    /// Write refused by a host-side rule
    #[error("write to {entity} rejected: {reason}")]
    Rejected {
        /// Target of the write
        entity: EntityRef,
        /// Host explanation
        reason: String,
    },
}

impl HostError {
    /// Create rejection error
    #[inline]
    pub fn rejected(entity: EntityRef, reason: impl Into<String>) -> Self {
        Self::Rejected {
            entity,
            reason: reason.into(),
        }
    }

    /// Check if the error is a plan name collision
    #[inline]
    #[must_use]
    pub fn is_name_taken(&self) -> bool {
        matches!(self, Self::PlanNameTaken(_))
    }
}
