//! Stable identifiers for host-owned entities
//!
//! Every entity in a [`PatientRecord`](crate::PatientRecord) is addressed by a
//! ULID newtype rather than a shared handle.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use ulid::Ulid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Ulid);

        impl $name {
            /// Generate new identifier
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique plan identifier
    PlanId
);
entity_id!(
    /// Unique beam set identifier
    BeamSetId
);
entity_id!(
    /// Unique isocenter identifier
    IsocenterId
);
entity_id!(
    /// Unique beam identifier
    BeamId
);

/// Patient-wide beam number
///
/// Committed numbers are unique across every plan of a patient record and
/// are never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeamNumber(pub u32);

impl BeamNumber {
    /// Zero, the baseline for a record without beams
    pub const ZERO: Self = Self(0);

    /// Raw value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Next number, or `None` on overflow
    #[inline]
    #[must_use]
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Decimal rendering, the host's number-as-name convention
    #[inline]
    #[must_use]
    pub fn as_name(self) -> String {
        self.0.to_string()
    }
}

impl Display for BeamNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BeamNumber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Reference to any entity whose identity fields can be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    /// A beam set
    BeamSet(BeamSetId),
    /// An isocenter
    Isocenter(IsocenterId),
    /// A treatment or setup beam
    Beam(BeamId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeamSet(id) => write!(f, "beam set {id}"),
            Self::Isocenter(id) => write!(f, "isocenter {id}"),
            Self::Beam(id) => write!(f, "beam {id}"),
        }
    }
}
