//! Plan Copy Identity Normalizer
//!
//! Restores the naming conventions of a source treatment plan on a freshly
//! copied plan and gives every beam of the copy a number that is unique
//! across the whole patient record.
//!
//! # Core Concepts
//!
//! - [`Normalizer`]: Normalizes a copy held by a [`PlanHost`](plancopy_model::PlanHost)
//! - [`plan_normalization`]: Pure computation of the edits for a copy
//! - [`NormalizationPlan`]: Ordered [`IdentityEdit`]s, committed one field at a time
//! - [`NumberAllocator`]: Consecutive beam numbers above a baseline
//! - [`copy_and_normalize`]: Copy under a free name, then normalize
//!
//! # Example
//!
//! ```rust
//! use plancopy_model::{Beam, BeamSet, InMemoryHost, PatientRecord, Plan, PlanHost};
//! use plancopy_normalizer::Normalizer;
//!
//! let mut record = PatientRecord::new();
//! let source = record.add_plan(
//!     Plan::new("Plan 1")
//!         .with_beam_set(BeamSet::new("Plan 1").with_beam(Beam::treatment(1, "1")))
//!         .with_beam_set(BeamSet::new("Plan 1_2").with_beam(Beam::treatment(2, "Boost"))),
//! );
//!
//! let mut host = InMemoryHost::new(record);
//! let copy = host.copy_plan(source, "Plan 1 (1)").unwrap();
//! let report = Normalizer::default().normalize(&mut host, source, copy).unwrap();
//!
//! let plan = host.patient().plan(copy).unwrap();
//! assert_eq!(plan.beam_sets[1].name, "Plan 1 (1)_2");
//! assert_eq!(plan.beam_sets[1].beams[0].name, "4 Boost");
//! assert_eq!(report.beams_renumbered, 2);
//! ```

#![warn(unreachable_pub)]

mod config;
mod edit;
mod error;
pub mod naming;
mod normalizer;
mod numbering;
mod workflow;

pub use config::{ConfigError, NormalizerConfig};
pub use edit::{IdentityEdit, NormalizationPlan, NormalizationReport};
pub use error::{Mismatch, NormalizationError};
pub use normalizer::{check_mirror, normalize, plan_normalization, Normalizer};
pub use numbering::NumberAllocator;
pub use workflow::{copy_and_normalize, copy_name, CopyOutcome};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for normalizing copied plans
    pub use crate::{
        copy_and_normalize, NormalizationError, NormalizationReport, Normalizer, NormalizerConfig,
    };
    pub use plancopy_model::{InMemoryHost, PatientRecord, PlanHost, PlanId};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
