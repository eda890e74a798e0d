//! Patient record entities
//!
//! The record is a tree of owning containers:
//! `PatientRecord` → `Plan` → `BeamSet` → `Beam`, and `Plan` → `Isocenter`.
//! Entities are created and removed only by the host; the normalizer edits
//! names and numbers in place.

use crate::ids::{BeamId, BeamNumber, BeamSetId, IsocenterId, PlanId};
use serde::{Deserialize, Serialize};

/// All plans of one patient
///
/// # Invariants
/// Committed beam numbers are unique across every plan in the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Plans in creation order
    pub plans: Vec<Plan>,
}

impl PatientRecord {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add plan, returning its id
    pub fn add_plan(&mut self, plan: Plan) -> PlanId {
        let id = plan.id;
        self.plans.push(plan);
        id
    }

    /// Plan by id
    #[must_use]
    pub fn plan(&self, id: PlanId) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Plan by name
    #[must_use]
    pub fn plan_by_name(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.name == name)
    }

    /// Check whether a plan name is taken
    #[inline]
    #[must_use]
    pub fn has_plan_named(&self, name: &str) -> bool {
        self.plan_by_name(name).is_some()
    }

    /// Every beam in the record, in plan, beam set, beam order
    pub fn beams(&self) -> impl Iterator<Item = &Beam> + '_ {
        self.plans.iter().flat_map(|p| p.beams())
    }

    /// Every beam number currently held
    pub fn beam_numbers(&self) -> impl Iterator<Item = BeamNumber> + '_ {
        self.beams().map(|b| b.number)
    }

    /// Highest beam number in the record, zero when there are no beams
    #[must_use]
    pub fn max_beam_number(&self) -> BeamNumber {
        self.beam_numbers().max().unwrap_or(BeamNumber::ZERO)
    }

    /// Highest beam number outside one plan, zero when there are none
    #[must_use]
    pub fn max_beam_number_excluding(&self, excluded: PlanId) -> BeamNumber {
        self.plans
            .iter()
            .filter(|p| p.id != excluded)
            .flat_map(|p| p.beams())
            .map(|b| b.number)
            .max()
            .unwrap_or(BeamNumber::ZERO)
    }

    /// Beam by id
    #[must_use]
    pub fn beam(&self, id: BeamId) -> Option<&Beam> {
        self.beams().find(|b| b.id == id)
    }

    /// Mutable beam by id
    pub fn beam_mut(&mut self, id: BeamId) -> Option<&mut Beam> {
        self.plans
            .iter_mut()
            .flat_map(|p| p.beam_sets.iter_mut())
            .flat_map(|bs| bs.beams.iter_mut())
            .find(|b| b.id == id)
    }

    /// Mutable beam set by id
    pub fn beam_set_mut(&mut self, id: BeamSetId) -> Option<&mut BeamSet> {
        self.plans
            .iter_mut()
            .flat_map(|p| p.beam_sets.iter_mut())
            .find(|bs| bs.id == id)
    }

    /// Mutable isocenter by id
    pub fn isocenter_mut(&mut self, id: IsocenterId) -> Option<&mut Isocenter> {
        self.plans
            .iter_mut()
            .flat_map(|p| p.isocenters.iter_mut())
            .find(|iso| iso.id == id)
    }

    /// Load record from a JSON snapshot
    ///
    /// # Errors
    /// Returns error if the JSON does not describe a record
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Render record as pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A treatment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Stable id
    pub id: PlanId,
    /// Plan name, unique within the record by host convention
    pub name: String,
    /// Beam sets in order
    #[serde(default)]
    pub beam_sets: Vec<BeamSet>,
    /// Isocenters in creation order
    #[serde(default)]
    pub isocenters: Vec<Isocenter>,
}

impl Plan {
    /// Create empty plan
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlanId::new(),
            name: name.into(),
            beam_sets: Vec::new(),
            isocenters: Vec::new(),
        }
    }

    /// With beam set appended
    #[must_use]
    pub fn with_beam_set(mut self, beam_set: BeamSet) -> Self {
        self.beam_sets.push(beam_set);
        self
    }

    /// With isocenter appended
    #[must_use]
    pub fn with_isocenter(mut self, isocenter: Isocenter) -> Self {
        self.isocenters.push(isocenter);
        self
    }

    /// Beams of every beam set, in order
    pub fn beams(&self) -> impl Iterator<Item = &Beam> + '_ {
        self.beam_sets.iter().flat_map(|bs| bs.beams.iter())
    }

    /// Total number of beams including setup beams
    #[must_use]
    pub fn beam_count(&self) -> usize {
        self.beam_sets.iter().map(|bs| bs.beams.len()).sum()
    }
}

/// A named group of beams within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSet {
    /// Stable id
    pub id: BeamSetId,
    /// Beam set name
    pub name: String,
    /// Treatment and setup beams, interleaved as listed by the host
    #[serde(default)]
    pub beams: Vec<Beam>,
}

impl BeamSet {
    /// Create empty beam set
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BeamSetId::new(),
            name: name.into(),
            beams: Vec::new(),
        }
    }

    /// With beam appended
    #[must_use]
    pub fn with_beam(mut self, beam: Beam) -> Self {
        self.beams.push(beam);
        self
    }

    /// Setup beams only
    pub fn setup_beams(&self) -> impl Iterator<Item = &Beam> + '_ {
        self.beams.iter().filter(|b| b.is_setup)
    }
}

/// Named spatial reference point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Isocenter {
    /// Stable id
    pub id: IsocenterId,
    /// Isocenter name
    pub name: String,
}

impl Isocenter {
    /// Create isocenter
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: IsocenterId::new(),
            name: name.into(),
        }
    }
}

/// Treatment or setup beam
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    /// Stable id
    pub id: BeamId,
    /// Patient-wide beam number
    pub number: BeamNumber,
    /// Beam name
    pub name: String,
    /// Free-text description, never edited by normalization
    #[serde(default)]
    pub description: String,
    /// Setup imaging beam rather than a treatment field
    #[serde(default)]
    pub is_setup: bool,
}

impl Beam {
    /// Treatment beam
    #[must_use]
    pub fn treatment(number: u32, name: impl Into<String>) -> Self {
        Self {
            id: BeamId::new(),
            number: BeamNumber(number),
            name: name.into(),
            description: String::new(),
            is_setup: false,
        }
    }

    /// Setup beam
    #[must_use]
    pub fn setup(number: u32, name: impl Into<String>) -> Self {
        Self {
            is_setup: true,
            ..Self::treatment(number, name)
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> (PatientRecord, PlanId, PlanId) {
        let mut record = PatientRecord::new();
        let a = record.add_plan(
            Plan::new("A").with_beam_set(
                BeamSet::new("A")
                    .with_beam(Beam::treatment(1, "1"))
                    .with_beam(Beam::setup(4, "SB1_1")),
            ),
        );
        let b = record.add_plan(
            Plan::new("B").with_beam_set(BeamSet::new("B").with_beam(Beam::treatment(7, "7"))),
        );
        (record, a, b)
    }

    #[test]
    fn max_beam_number_counts_setup_beams() {
        let (record, a, b) = record();
        assert_eq!(record.max_beam_number(), BeamNumber(7));
        assert_eq!(record.max_beam_number_excluding(b), BeamNumber(4));
        assert_eq!(record.max_beam_number_excluding(a), BeamNumber(7));
    }

    #[test]
    fn empty_record_max_is_zero() {
        assert_eq!(PatientRecord::new().max_beam_number(), BeamNumber::ZERO);
    }

    #[test]
    fn lookup_by_name_and_id() {
        let (record, a, _) = record();
        assert_eq!(record.plan_by_name("A").map(|p| p.id), Some(a));
        assert!(record.has_plan_named("B"));
        assert!(!record.has_plan_named("C"));
        assert_eq!(record.plan(a).map(Plan::beam_count), Some(2));
    }

    #[test]
    fn json_snapshot_restores_record() {
        let (record, _, _) = record();
        let json = record.to_json().unwrap();
        let restored = PatientRecord::from_json(&json).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn setup_beams_filtered() {
        let (record, a, _) = record();
        let plan = record.plan(a).unwrap();
        let names: Vec<_> = plan.beam_sets[0].setup_beams().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["SB1_1"]);
    }
}
