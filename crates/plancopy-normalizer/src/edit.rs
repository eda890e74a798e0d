//! Identity edits and their commit
//!
//! A [`NormalizationPlan`] is an ordered list of single-field writes computed
//! without touching the host. Committing applies them one at a time through
//! [`PlanHost`] and stops at the first refusal.

use crate::error::NormalizationError;
use plancopy_model::{BeamId, BeamNumber, BeamSetId, EntityRef, IsocenterId, PlanHost};
use std::fmt::{self, Display, Formatter};

/// One identity field write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEdit {
    /// Set a beam set name
    RenameBeamSet {
        /// Target
        id: BeamSetId,
        /// New name
        name: String,
    },
    /// Set an isocenter name
    RenameIsocenter {
        /// Target
        id: IsocenterId,
        /// New name
        name: String,
    },
    /// Set a beam number
    Renumber {
        /// Target
        id: BeamId,
        /// New number
        number: BeamNumber,
    },
    /// Set a beam name
    RenameBeam {
        /// Target
        id: BeamId,
        /// New name
        name: String,
    },
}

impl IdentityEdit {
    /// Entity written by this edit
    #[inline]
    #[must_use]
    pub fn target(&self) -> EntityRef {
        match self {
            Self::RenameBeamSet { id, .. } => EntityRef::BeamSet(*id),
            Self::RenameIsocenter { id, .. } => EntityRef::Isocenter(*id),
            Self::Renumber { id, .. } | Self::RenameBeam { id, .. } => EntityRef::Beam(*id),
        }
    }

    /// Apply to host
    ///
    /// # Errors
    /// Returns [`NormalizationError::HostRejected`] naming the target
    pub fn apply<H: PlanHost + ?Sized>(&self, host: &mut H) -> Result<(), NormalizationError> {
        let result = match self {
            Self::RenameBeamSet { id, name } => host.set_beam_set_name(*id, name),
            Self::RenameIsocenter { id, name } => host.set_isocenter_name(*id, name),
            Self::Renumber { id, number } => host.set_beam_number(*id, *number),
            Self::RenameBeam { id, name } => host.set_beam_name(*id, name),
        };
        result.map_err(|e| NormalizationError::host_rejected(self.target(), e))
    }
}

impl Display for IdentityEdit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameBeamSet { id, name } => write!(f, "rename beam set {id} to {name:?}"),
            Self::RenameIsocenter { id, name } => write!(f, "rename isocenter {id} to {name:?}"),
            Self::Renumber { id, number } => write!(f, "renumber beam {id} to {number}"),
            Self::RenameBeam { id, name } => write!(f, "rename beam {id} to {name:?}"),
        }
    }
}

/// Computed edits for one copied plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationPlan {
    edits: Vec<IdentityEdit>,
    baseline: BeamNumber,
}

impl NormalizationPlan {
    /// Create plan from edits in commit order
    #[inline]
    #[must_use]
    pub fn new(edits: Vec<IdentityEdit>, baseline: BeamNumber) -> Self {
        Self { edits, baseline }
    }

    /// Edits in commit order
    #[inline]
    #[must_use]
    pub fn edits(&self) -> &[IdentityEdit] {
        &self.edits
    }

    /// Highest number held before allocation
    #[inline]
    #[must_use]
    pub fn baseline(&self) -> BeamNumber {
        self.baseline
    }

    /// Numbers assigned, in enumeration order
    pub fn assigned_numbers(&self) -> impl Iterator<Item = BeamNumber> + '_ {
        self.edits.iter().filter_map(|e| match e {
            IdentityEdit::Renumber { number, .. } => Some(*number),
            _ => None,
        })
    }

    /// Summary of what committing will change
    #[must_use]
    pub fn report(&self) -> NormalizationReport {
        let mut report = NormalizationReport {
            baseline: self.baseline,
            ..NormalizationReport::default()
        };
        for edit in &self.edits {
            match edit {
                IdentityEdit::RenameBeamSet { .. } => report.beam_sets_renamed += 1,
                IdentityEdit::RenameIsocenter { .. } => report.isocenters_renamed += 1,
                IdentityEdit::Renumber { number, .. } => {
                    report.beams_renumbered += 1;
                    report.first_number.get_or_insert(*number);
                    report.last_number = Some(*number);
                }
                IdentityEdit::RenameBeam { .. } => {}
            }
        }
        report
    }

    /// Apply every edit in order
    ///
    /// Writes applied before a refusal stay in place; the host has no
    /// rollback.
    ///
    /// # Errors
    /// Returns the first [`NormalizationError::HostRejected`]
    pub fn commit<H: PlanHost + ?Sized>(
        &self,
        host: &mut H,
    ) -> Result<NormalizationReport, NormalizationError> {
        for (applied, edit) in self.edits.iter().enumerate() {
            tracing::trace!("Applying {}", edit);
            if let Err(e) = edit.apply(host) {
                tracing::error!(applied, total = self.edits.len(), "Commit stopped: {}", e);
                return Err(e);
            }
        }
        Ok(self.report())
    }
}

/// Outcome of a successful normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Highest number held before allocation
    pub baseline: BeamNumber,
    /// Beam sets renamed
    pub beam_sets_renamed: usize,
    /// Isocenters renamed
    pub isocenters_renamed: usize,
    /// Beams renumbered and renamed
    pub beams_renumbered: usize,
    /// First assigned number
    pub first_number: Option<BeamNumber>,
    /// Last assigned number
    pub last_number: Option<BeamNumber>,
}

impl NormalizationReport {
    /// Source had no beams to renumber
    #[inline]
    #[must_use]
    pub fn is_exhausted_input(&self) -> bool {
        self.beams_renumbered == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plancopy_model::{Beam, BeamSet, InMemoryHost, PatientRecord, Plan};

    fn host() -> (InMemoryHost, BeamSetId, BeamId) {
        let beam = Beam::treatment(1, "1");
        let beam_id = beam.id;
        let set = BeamSet::new("A").with_beam(beam);
        let set_id = set.id;
        let mut record = PatientRecord::new();
        record.add_plan(Plan::new("A").with_beam_set(set));
        (InMemoryHost::new(record), set_id, beam_id)
    }

    #[test]
    fn report_counts_edits() {
        let (_, set, beam) = host();
        let plan = NormalizationPlan::new(
            vec![
                IdentityEdit::RenameBeamSet { id: set, name: "B".into() },
                IdentityEdit::Renumber { id: beam, number: BeamNumber(5) },
                IdentityEdit::RenameBeam { id: beam, name: "5".into() },
            ],
            BeamNumber(4),
        );
        let report = plan.report();
        assert_eq!(report.beam_sets_renamed, 1);
        assert_eq!(report.beams_renumbered, 1);
        assert_eq!(report.first_number, Some(BeamNumber(5)));
        assert_eq!(report.last_number, Some(BeamNumber(5)));
        assert!(!report.is_exhausted_input());
        assert_eq!(plan.assigned_numbers().collect::<Vec<_>>(), vec![BeamNumber(5)]);
    }

    #[test]
    fn commit_applies_in_order() {
        let (mut host, set, beam) = host();
        let plan = NormalizationPlan::new(
            vec![
                IdentityEdit::RenameBeamSet { id: set, name: "B".into() },
                IdentityEdit::Renumber { id: beam, number: BeamNumber(2) },
                IdentityEdit::RenameBeam { id: beam, name: "2".into() },
            ],
            BeamNumber(1),
        );
        plan.commit(&mut host).unwrap();

        let record = host.patient();
        assert_eq!(record.plans[0].beam_sets[0].name, "B");
        assert_eq!(record.beam(beam).map(|b| b.number), Some(BeamNumber(2)));
        assert_eq!(record.beam(beam).map(|b| b.name.as_str()), Some("2"));
    }

    #[test]
    fn commit_stops_at_first_refusal() {
        let (mut host, set, beam) = host();
        host.reject_writes_to(EntityRef::Beam(beam));
        let plan = NormalizationPlan::new(
            vec![
                IdentityEdit::RenameBeamSet { id: set, name: "B".into() },
                IdentityEdit::Renumber { id: beam, number: BeamNumber(2) },
                IdentityEdit::RenameBeam { id: beam, name: "2".into() },
            ],
            BeamNumber(1),
        );
        let err = plan.commit(&mut host).unwrap_err();

        assert_eq!(err.entity(), Some(EntityRef::Beam(beam)));
        assert_eq!(host.write_count(), 1);
        assert_eq!(host.patient().plans[0].beam_sets[0].name, "B");
    }

    #[test]
    fn edit_display() {
        let id = BeamId::new();
        let edit = IdentityEdit::Renumber { id, number: BeamNumber(9) };
        assert_eq!(edit.to_string(), format!("renumber beam {id} to 9"));
        assert_eq!(edit.target(), EntityRef::Beam(id));
    }
}
