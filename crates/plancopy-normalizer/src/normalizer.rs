//! Plan copy identity normalizer
//!
//! Restores the source plan's naming pattern on a freshly copied plan and
//! renumbers every beam of the copy above every number held by the patient.
//!
//! # Workflow
//! 1. Check the copy mirrors the source structure
//! 2. Derive beam set and isocenter names from the source, rooted at the copy
//! 3. Allocate beam numbers consecutively above the patient's highest number
//! 4. Compose beam names from the new number and any old context
//! 5. Commit edits through the host

use crate::config::NormalizerConfig;
use crate::edit::{IdentityEdit, NormalizationPlan, NormalizationReport};
use crate::error::{Mismatch, NormalizationError};
use crate::naming;
use crate::numbering::NumberAllocator;
use plancopy_model::{PatientRecord, Plan, PlanHost, PlanId};

/// Check that `copy` has the structure of `source`
///
/// # Errors
/// Returns the first [`Mismatch`] found
pub fn check_mirror(source: &Plan, copy: &Plan) -> Result<(), Mismatch> {
    if source.id == copy.id {
        return Err(Mismatch::SamePlan(source.id));
    }
    if source.beam_sets.len() != copy.beam_sets.len() {
        return Err(Mismatch::BeamSetCount {
            source_count: source.beam_sets.len(),
            copy_count: copy.beam_sets.len(),
        });
    }
    if source.isocenters.len() != copy.isocenters.len() {
        return Err(Mismatch::IsocenterCount {
            source_count: source.isocenters.len(),
            copy_count: copy.isocenters.len(),
        });
    }
    for (i, (src_set, copy_set)) in source.beam_sets.iter().zip(&copy.beam_sets).enumerate() {
        if src_set.beams.len() != copy_set.beams.len() {
            return Err(Mismatch::BeamCount {
                beam_set: i,
                source_count: src_set.beams.len(),
                copy_count: copy_set.beams.len(),
            });
        }
        for (j, (src_beam, copy_beam)) in src_set.beams.iter().zip(&copy_set.beams).enumerate() {
            if src_beam.is_setup != copy_beam.is_setup {
                return Err(Mismatch::SetupFlag {
                    beam_set: i,
                    beam: j,
                    source_setup: src_beam.is_setup,
                    copy_setup: copy_beam.is_setup,
                });
            }
        }
    }
    Ok(())
}

/// Compute every identity edit for `copy` without touching the host
///
/// Beams are enumerated beam set by beam set, in the source's own order with
/// setup beams left where the source lists them.
///
/// # Errors
/// Returns [`NormalizationError::StructuralMismatch`] if `copy` does not
/// mirror `source`, or [`NormalizationError::NumberSpaceExhausted`] if the
/// numbers would overflow
pub fn plan_normalization(
    source: &Plan,
    copy: &Plan,
    patient: &PatientRecord,
    config: &NormalizerConfig,
) -> Result<NormalizationPlan, NormalizationError> {
    check_mirror(source, copy)?;

    let mut numbers = NumberAllocator::above_record(patient);
    numbers.ensure_capacity(copy.beam_count())?;

    let mut edits = Vec::with_capacity(
        copy.beam_sets.len() + copy.isocenters.len() + 2 * copy.beam_count(),
    );

    for (src_set, copy_set) in source.beam_sets.iter().zip(&copy.beam_sets) {
        edits.push(IdentityEdit::RenameBeamSet {
            id: copy_set.id,
            name: naming::beam_set_name(&src_set.name, &source.name, &copy.name),
        });
    }

    for (i, (src_iso, copy_iso)) in source.isocenters.iter().zip(&copy.isocenters).enumerate() {
        edits.push(IdentityEdit::RenameIsocenter {
            id: copy_iso.id,
            name: naming::isocenter_name(&src_iso.name, i, &source.name, &copy.name, config),
        });
    }

    for (src_set, copy_set) in source.beam_sets.iter().zip(&copy.beam_sets) {
        let mut setup_ordinal = 0;
        for (src_beam, copy_beam) in src_set.beams.iter().zip(&copy_set.beams) {
            if src_beam.is_setup {
                setup_ordinal += 1;
            }
            let number = numbers.next_number()?;
            let context = naming::old_context(src_beam, setup_ordinal, config);
            edits.push(IdentityEdit::Renumber {
                id: copy_beam.id,
                number,
            });
            edits.push(IdentityEdit::RenameBeam {
                id: copy_beam.id,
                name: naming::beam_name(number, context, config),
            });
        }
    }

    Ok(NormalizationPlan::new(edits, numbers.baseline()))
}

/// Identity normalizer bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create normalizer
    #[inline]
    #[must_use]
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Compute edits for a copy held by `host`
    ///
    /// # Errors
    /// See [`plan_normalization`]; also [`NormalizationError::PlanNotFound`]
    pub fn plan<H: PlanHost + ?Sized>(
        &self,
        host: &H,
        source: PlanId,
        copy: PlanId,
    ) -> Result<NormalizationPlan, NormalizationError> {
        let patient = host.patient();
        let source = patient
            .plan(source)
            .ok_or(NormalizationError::PlanNotFound(source))?;
        let copy = patient
            .plan(copy)
            .ok_or(NormalizationError::PlanNotFound(copy))?;
        plan_normalization(source, copy, patient, &self.config)
    }

    /// Normalize the identities of `copy` after it was copied from `source`
    ///
    /// On failure the copy is left with whatever writes succeeded before the
    /// refusal and must not be used as is.
    ///
    /// # Errors
    /// - [`NormalizationError::PlanNotFound`] if either plan is missing
    /// - [`NormalizationError::StructuralMismatch`] if the copy does not mirror the source
    /// - [`NormalizationError::HostRejected`] if the host refuses a write
    /// - [`NormalizationError::NumberSpaceExhausted`] if numbers would overflow
    pub fn normalize<H: PlanHost + ?Sized>(
        &self,
        host: &mut H,
        source: PlanId,
        copy: PlanId,
    ) -> Result<NormalizationReport, NormalizationError> {
        let plan = match self.plan(host, source, copy) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(%source, %copy, "Normalization refused: {}", e);
                return Err(e);
            }
        };
        tracing::debug!(
            %copy,
            baseline = %plan.baseline(),
            edits = plan.edits().len(),
            "Computed normalization"
        );

        let report = plan.commit(host)?;
        if report.is_exhausted_input() {
            tracing::info!(%copy, "Source has no beams; only names normalized");
        } else {
            tracing::info!(
                %copy,
                beams = report.beams_renumbered,
                first = ?report.first_number,
                last = ?report.last_number,
                "Normalized copied plan"
            );
        }
        Ok(report)
    }
}

/// Normalize with default configuration
///
/// # Errors
/// See [`Normalizer::normalize`]
pub fn normalize<H: PlanHost + ?Sized>(
    host: &mut H,
    source: PlanId,
    copy: PlanId,
) -> Result<NormalizationReport, NormalizationError> {
    Normalizer::default().normalize(host, source, copy)
}
