//! Testing utilities for the plan copy workspace
//!
//! Shared fixtures, host setup, and proptest strategies.

#![allow(missing_docs)]

use plancopy_model::{
    Beam, BeamNumber, BeamSet, InMemoryHost, Isocenter, PatientRecord, Plan, PlanHost, PlanId,
};
use proptest::prelude::*;

/// Beam shape used by fixtures: (is_setup, name)
pub type BeamShape = (bool, String);

/// Record holding `Plan 1` from the worked example plus an unrelated plan
/// whose highest beam number is 7.
///
/// `Plan 1` has beam sets `Plan 1` (beams 1 and 2 named after their numbers)
/// and `Plan 1_2` (beam 3 named "Boost").
pub fn example_record() -> (PatientRecord, PlanId) {
    let mut record = PatientRecord::new();
    let source = record.add_plan(
        Plan::new("Plan 1")
            .with_beam_set(
                BeamSet::new("Plan 1")
                    .with_beam(Beam::treatment(1, "1"))
                    .with_beam(Beam::treatment(2, "2")),
            )
            .with_beam_set(BeamSet::new("Plan 1_2").with_beam(Beam::treatment(3, "Boost")))
            .with_isocenter(Isocenter::new("Plan 1 1"))
            .with_isocenter(Isocenter::new("Plan 1 2")),
    );
    record.add_plan(
        Plan::new("Other").with_beam_set(
            BeamSet::new("Other")
                .with_beam(Beam::treatment(6, "6"))
                .with_beam(Beam::setup(7, "SB1_1")),
        ),
    );
    (record, source)
}

/// Host over [`example_record`]
pub fn example_host() -> (InMemoryHost, PlanId) {
    let (record, source) = example_record();
    (InMemoryHost::new(record), source)
}

/// Copy `source` on `host` under `name`, panicking on failure
pub fn copy(host: &mut InMemoryHost, source: PlanId, name: &str) -> PlanId {
    host.copy_plan(source, name).unwrap()
}

/// Plan named `name` with one beam set per entry of `sets`
///
/// Beam set i is named `name` for i = 0 and `name_<i+1>` otherwise; beams
/// are numbered consecutively from `first_number`.
pub fn plan_with_sets(name: &str, sets: &[Vec<BeamShape>], first_number: u32) -> Plan {
    let mut number = first_number;
    let mut plan = Plan::new(name);
    for (i, beams) in sets.iter().enumerate() {
        let set_name = if i == 0 {
            name.to_string()
        } else {
            format!("{name}_{}", i + 1)
        };
        let mut set = BeamSet::new(set_name);
        for (is_setup, beam_name) in beams {
            let beam = if *is_setup {
                Beam::setup(number, beam_name.clone())
            } else {
                Beam::treatment(number, beam_name.clone())
            };
            set = set.with_beam(beam);
            number += 1;
        }
        plan = plan.with_beam_set(set).with_isocenter(Isocenter::new(format!("{name} {}", i + 1)));
    }
    plan
}

/// Numbers of every beam in `plan`, in enumeration order
pub fn numbers(record: &PatientRecord, plan: PlanId) -> Vec<u32> {
    record
        .plan(plan)
        .map(|p| p.beams().map(|b| b.number.get()).collect())
        .unwrap_or_default()
}

/// Names of every beam in `plan`, in enumeration order
pub fn beam_names(record: &PatientRecord, plan: PlanId) -> Vec<String> {
    record
        .plan(plan)
        .map(|p| p.beams().map(|b| b.name.clone()).collect())
        .unwrap_or_default()
}

/// Highest number outside `plan`
pub fn max_outside(record: &PatientRecord, plan: PlanId) -> BeamNumber {
    record.max_beam_number_excluding(plan)
}

/// Beam name: either the default number-as-name marker or free text
pub fn beam_name_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        2 => Just(None),
        1 => " ?[A-Za-z][A-Za-z ]{0,8}[A-Za-z] ?".prop_map(Some),
    ]
}

/// Beam sets with 0..4 beams each, mixing setup and treatment beams
///
/// A `None` name is replaced by the beam's number when the plan is built.
pub fn beam_sets_strategy() -> impl Strategy<Value = Vec<Vec<(bool, Option<String>)>>> {
    prop::collection::vec(
        prop::collection::vec((any::<bool>(), beam_name_strategy()), 0..4),
        1..4,
    )
}

/// Build a plan from generated beam sets, naming unnamed beams by number
pub fn plan_from_generated(
    name: &str,
    sets: &[Vec<(bool, Option<String>)>],
    first_number: u32,
) -> Plan {
    let mut number = first_number;
    let shapes: Vec<Vec<BeamShape>> = sets
        .iter()
        .map(|beams| {
            beams
                .iter()
                .map(|(is_setup, name)| {
                    let name = name.clone().unwrap_or_else(|| number.to_string());
                    number += 1;
                    (*is_setup, name)
                })
                .collect()
        })
        .collect();
    plan_with_sets(name, &shapes, first_number)
}
