use plancopy_model::{InMemoryHost, PatientRecord, Plan, PlanHost, PlanId};
use plancopy_normalizer::{normalize, Normalizer, NormalizerConfig};
use plancopy_test_utils::{beam_sets_strategy, max_outside, numbers, plan_from_generated};
use proptest::prelude::*;
use std::collections::HashSet;

fn host_with(source: Plan, others: Vec<Plan>) -> (InMemoryHost, PlanId) {
    let mut record = PatientRecord::new();
    let source = record.add_plan(source);
    for plan in others {
        record.add_plan(plan);
    }
    (InMemoryHost::new(record), source)
}

fn relative_names(plan: &Plan) -> Vec<String> {
    plan.beam_sets
        .iter()
        .map(|bs| bs.name.clone())
        .chain(plan.isocenters.iter().map(|i| i.name.clone()))
        .map(|name| name.replacen(&plan.name, "<root>", 1))
        .collect()
}

proptest! {
    #[test]
    fn prop_numbers_start_after_existing_and_are_contiguous(
        sets in beam_sets_strategy(),
        other in beam_sets_strategy(),
        other_start in 1..500u32,
    ) {
        let source = plan_from_generated("Plan A", &sets, 1);
        let other = plan_from_generated("Other", &other, other_start);
        let (mut host, source) = host_with(source, vec![other]);
        let copy = host.copy_plan(source, "Plan A (1)").unwrap();
        let existing: HashSet<u32> = host.patient().beam_numbers().map(|n| n.get()).collect();
        let baseline = max_outside(host.patient(), copy).get();

        let report = normalize(&mut host, source, copy).unwrap();

        let assigned = numbers(host.patient(), copy);
        let expected: Vec<u32> = (1..=assigned.len() as u32).map(|k| baseline + k).collect();
        prop_assert_eq!(&assigned, &expected);
        prop_assert!(assigned.iter().all(|n| !existing.contains(n)));
        prop_assert_eq!(report.beams_renumbered, assigned.len());
    }

    #[test]
    fn prop_old_context_survives_as_suffix(sets in beam_sets_strategy()) {
        let source_plan = plan_from_generated("Plan A", &sets, 1);
        let (mut host, source) = host_with(source_plan.clone(), Vec::new());
        let copy = host.copy_plan(source, "Plan A (1)").unwrap();

        normalize(&mut host, source, copy).unwrap();

        let copied = host.patient().plan(copy).unwrap();
        for (old, new) in source_plan.beams().zip(copied.beams()) {
            let number = new.number.as_name();
            if old.name == old.number.as_name() {
                prop_assert_eq!(&new.name, &number);
            } else {
                prop_assert_eq!(new.name.clone(), format!("{number} {}", old.name));
            }
        }
    }

    #[test]
    fn prop_naming_is_positional(sets in beam_sets_strategy(), root_b in "[A-Z][a-z]{1,6}") {
        let plan_a = plan_from_generated("Plan A", &sets, 1);
        let plan_b = plan_from_generated(&root_b, &sets, 100);
        let (mut host, a) = host_with(plan_a, vec![plan_b]);
        let b = host.patient().plans[1].id;

        let copy_a = host.copy_plan(a, "Plan A (1)").unwrap();
        let copy_b = host.copy_plan(b, &format!("{root_b} (1)")).unwrap();
        let normalizer = Normalizer::new(NormalizerConfig::default());
        normalizer.normalize(&mut host, a, copy_a).unwrap();
        normalizer.normalize(&mut host, b, copy_b).unwrap();

        let record = host.patient();
        prop_assert_eq!(
            relative_names(record.plan(copy_a).unwrap()),
            relative_names(record.plan(copy_b).unwrap())
        );
    }

    #[test]
    fn prop_repeat_invocation_advances(sets in beam_sets_strategy()) {
        let source = plan_from_generated("Plan A", &sets, 1);
        let (mut host, source) = host_with(source, Vec::new());
        let copy = host.copy_plan(source, "Plan A (1)").unwrap();

        normalize(&mut host, source, copy).unwrap();
        let first = numbers(host.patient(), copy);
        normalize(&mut host, source, copy).unwrap();
        let second = numbers(host.patient(), copy);

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            prop_assert!(b > a);
        }
    }
}
