//! Plan Copy Model
//!
//! Patient record entities and the host data-model interface used by the
//! plan copy identity normalizer.
//!
//! # Core Concepts
//!
//! - [`PatientRecord`]: Owning container of every [`Plan`] of one patient
//! - [`Plan`], [`BeamSet`], [`Isocenter`], [`Beam`]: Host-owned entities
//! - [`BeamNumber`]: Patient-wide beam number
//! - [`PlanHost`]: Read the record, write one identity field at a time
//! - [`InMemoryHost`]: Host over an owned record with host-side validation
//!
//! # Example
//!
//! ```rust
//! use plancopy_model::{Beam, BeamSet, InMemoryHost, PatientRecord, Plan, PlanHost};
//!
//! let mut record = PatientRecord::new();
//! let plan = record.add_plan(
//!     Plan::new("Plan 1").with_beam_set(BeamSet::new("Plan 1").with_beam(Beam::treatment(1, "1"))),
//! );
//!
//! let mut host = InMemoryHost::new(record);
//! let copy = host.copy_plan(plan, "Plan 1 (1)").unwrap();
//! assert_eq!(host.patient().plans.len(), 2);
//! assert!(host.patient().plan(copy).is_some());
//! ```

#![warn(unreachable_pub)]

mod host;
mod ids;
mod memory;
mod record;

pub use host::{HostError, PlanHost};
pub use ids::{BeamId, BeamNumber, BeamSetId, EntityRef, IsocenterId, PlanId};
pub use memory::{HostRules, InMemoryHost};
pub use record::{Beam, BeamSet, Isocenter, PatientRecord, Plan};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
