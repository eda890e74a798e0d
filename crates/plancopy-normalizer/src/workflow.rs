//! Copy-and-normalize workflow
//!
//! Copies a plan under the first free name `"<plan> (<n>)"` and normalizes
//! the copy straight away, before anything else can use it.

use crate::config::NormalizerConfig;
use crate::edit::NormalizationReport;
use crate::error::NormalizationError;
use crate::normalizer::Normalizer;
use plancopy_model::{PlanHost, PlanId};

/// Result of a copy-and-normalize run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOutcome {
    /// New plan
    pub plan: PlanId,
    /// Name the host accepted
    pub name: String,
    /// Normalization summary
    pub report: NormalizationReport,
}

/// Copy name for attempt `n`
#[inline]
#[must_use]
pub fn copy_name(plan_name: &str, n: u32) -> String {
    format!("{plan_name} ({n})")
}

/// Copy `source` and normalize the copy
///
/// Only name collisions are retried; any other host refusal ends the run.
///
/// # Errors
/// - [`NormalizationError::PlanNotFound`] if `source` is missing
/// - [`NormalizationError::CopyNameExhausted`] if every candidate name is taken
/// - [`NormalizationError::CopyFailed`] if the host refuses the copy
/// - any error of [`Normalizer::normalize`]
pub fn copy_and_normalize<H: PlanHost + ?Sized>(
    host: &mut H,
    source: PlanId,
    config: &NormalizerConfig,
) -> Result<CopyOutcome, NormalizationError> {
    let plan_name = host
        .patient()
        .plan(source)
        .map(|p| p.name.clone())
        .ok_or(NormalizationError::PlanNotFound(source))?;

    let (plan, name) = copy_with_free_name(host, source, &plan_name, config)?;
    tracing::info!(source = %plan_name, copy = %name, "Copied plan");

    let report = Normalizer::new(config.clone()).normalize(host, source, plan)?;
    Ok(CopyOutcome { plan, name, report })
}

fn copy_with_free_name<H: PlanHost + ?Sized>(
    host: &mut H,
    source: PlanId,
    plan_name: &str,
    config: &NormalizerConfig,
) -> Result<(PlanId, String), NormalizationError> {
    let candidates = (config.copy_suffix_start..).take(config.max_copy_attempts as usize);
    for n in candidates {
        let name = copy_name(plan_name, n);
        match host.copy_plan(source, &name) {
            Ok(plan) => return Ok((plan, name)),
            Err(e) if e.is_name_taken() => {
                tracing::debug!("Copy name {:?} taken", name);
            }
            Err(e) => return Err(NormalizationError::CopyFailed(e)),
        }
    }
    Err(NormalizationError::CopyNameExhausted {
        plan: plan_name.to_string(),
        attempts: config.max_copy_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plancopy_model::{Beam, BeamSet, HostError, InMemoryHost, PatientRecord, Plan};

    fn host_with(names: &[&str]) -> (InMemoryHost, PlanId) {
        let mut record = PatientRecord::new();
        let source = record.add_plan(
            Plan::new(names[0]).with_beam_set(BeamSet::new(names[0]).with_beam(Beam::treatment(1, "1"))),
        );
        for name in &names[1..] {
            record.add_plan(Plan::new(*name));
        }
        (InMemoryHost::new(record), source)
    }

    #[test]
    fn copy_name_format() {
        assert_eq!(copy_name("Plan 1", 2), "Plan 1 (2)");
    }

    #[test]
    fn first_free_suffix_is_used() {
        let (mut host, source) = host_with(&["Plan 1", "Plan 1 (1)", "Plan 1 (2)"]);
        let outcome = copy_and_normalize(&mut host, source, &NormalizerConfig::default()).unwrap();

        assert_eq!(outcome.name, "Plan 1 (3)");
        let copy = host.patient().plan(outcome.plan).unwrap();
        assert_eq!(copy.beam_sets[0].name, "Plan 1 (3)");
        assert_eq!(copy.beam_sets[0].beams[0].name, "2");
    }

    #[test]
    fn attempts_are_bounded() {
        let (mut host, source) = host_with(&["P", "P (1)", "P (2)"]);
        let config = NormalizerConfig::default().with_max_copy_attempts(2);
        let err = copy_and_normalize(&mut host, source, &config).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::CopyNameExhausted { attempts: 2, .. }
        ));
        assert_eq!(host.patient().plans.len(), 3);
    }

    #[test]
    fn unknown_source_is_reported() {
        let (mut host, _) = host_with(&["P"]);
        let missing = PlanId::new();
        assert!(matches!(
            copy_and_normalize(&mut host, missing, &NormalizerConfig::default()),
            Err(NormalizationError::PlanNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn other_copy_failures_are_not_retried() {
        let long = "x".repeat(70);
        let (mut host, source) = host_with(&[long.as_str()]);
        let err = copy_and_normalize(&mut host, source, &NormalizerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::CopyFailed(HostError::InvalidName { .. })
        ));
    }
}
