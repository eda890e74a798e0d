//! Name pattern derivation
//!
//! Copy names are derived positionally from the source: the source plan name
//! is treated as a root, and whatever follows it in a beam set or isocenter
//! name is carried over onto the copy's root. The copy's host-assigned names
//! are never read.

use crate::config::NormalizerConfig;
use plancopy_model::{Beam, BeamNumber};

/// Replace `source_root` at the start of `name` with `copy_root`
///
/// Returns `None` when `name` does not start with `source_root`.
#[must_use]
pub fn reroot(name: &str, source_root: &str, copy_root: &str) -> Option<String> {
    name.strip_prefix(source_root)
        .map(|suffix| format!("{copy_root}{suffix}"))
}

/// New name for a copied beam set
///
/// A source name without the source root has nothing to substitute and is
/// kept as is.
#[must_use]
pub fn beam_set_name(source_name: &str, source_root: &str, copy_root: &str) -> String {
    reroot(source_name, source_root, copy_root).unwrap_or_else(|| source_name.to_string())
}

/// New name for the isocenter at `index` of a copied plan
///
/// Falls back to the positional convention `"<copy root><sep><index + 1>"`.
#[must_use]
pub fn isocenter_name(
    source_name: &str,
    index: usize,
    source_root: &str,
    copy_root: &str,
    config: &NormalizerConfig,
) -> String {
    reroot(source_name, source_root, copy_root).unwrap_or_else(|| {
        format!("{copy_root}{}{}", config.isocenter_separator, index + 1)
    })
}

/// Old name of a source beam, when it says more than the host defaults
///
/// The name is compared and returned exactly as stored, surrounding
/// whitespace included. `setup_ordinal` is the 1-based position of the beam among the setup beams
/// of its set; it is ignored for treatment beams.
#[must_use]
pub fn old_context<'a>(
    beam: &'a Beam,
    setup_ordinal: usize,
    config: &NormalizerConfig,
) -> Option<&'a str> {
    let name = beam.name.as_str();
    if name.is_empty() || name == beam.number.as_name() {
        return None;
    }
    if beam.is_setup && name == config.default_setup_beam_name(setup_ordinal) {
        return None;
    }
    Some(name)
}

/// Compose a renumbered beam's name
#[must_use]
pub fn beam_name(number: BeamNumber, context: Option<&str>, config: &NormalizerConfig) -> String {
    match context {
        Some(context) => format!("{number}{}{context}", config.context_separator),
        None => number.as_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NormalizerConfig {
        NormalizerConfig::default()
    }

    #[test]
    fn reroot_substitutes_prefix() {
        assert_eq!(reroot("Plan 1_2", "Plan 1", "Plan 1 (1)").as_deref(), Some("Plan 1 (1)_2"));
        assert_eq!(reroot("Plan 1", "Plan 1", "Copy").as_deref(), Some("Copy"));
        assert_eq!(reroot("Boost", "Plan 1", "Copy"), None);
    }

    #[test]
    fn reroot_matches_raw_prefix() {
        // "Plan 10" starts with "Plan 1"; the trailing "0" is the suffix.
        assert_eq!(reroot("Plan 10", "Plan 1", "Plan 1 (1)").as_deref(), Some("Plan 1 (1)0"));
        assert_eq!(beam_set_name("Plan 10", "Plan 1", "Copy"), "Copy0");
    }

    #[test]
    fn beam_set_without_root_is_kept() {
        assert_eq!(beam_set_name("Boost", "Plan 1", "Copy"), "Boost");
        assert_eq!(beam_set_name("Plan 1_2", "Plan 1", "Copy"), "Copy_2");
    }

    #[test]
    fn isocenter_falls_back_to_position() {
        let config = config();
        assert_eq!(isocenter_name("Plan 1 2", 1, "Plan 1", "Copy", &config), "Copy 2");
        assert_eq!(isocenter_name("Iso", 2, "Plan 1", "Copy", &config), "Copy 3");
    }

    #[test]
    fn numeric_name_has_no_context() {
        let config = config();
        assert_eq!(old_context(&Beam::treatment(3, "3"), 0, &config), None);
        assert_eq!(old_context(&Beam::treatment(3, ""), 0, &config), None);
        assert_eq!(old_context(&Beam::treatment(3, "Boost"), 0, &config), Some("Boost"));
        assert_eq!(old_context(&Beam::treatment(3, "4"), 0, &config), Some("4"));
    }

    #[test]
    fn context_keeps_surrounding_whitespace() {
        let config = config();
        assert_eq!(old_context(&Beam::treatment(1, "Boost "), 0, &config), Some("Boost "));
        assert_eq!(old_context(&Beam::treatment(2, "2 "), 0, &config), Some("2 "));
        assert_eq!(old_context(&Beam::setup(3, " SB1_1"), 1, &config), Some(" SB1_1"));
        assert_eq!(beam_name(BeamNumber(3), Some("Boost "), &config), "3 Boost ");
    }

    #[test]
    fn setup_default_name_has_no_context() {
        let config = config();
        assert_eq!(old_context(&Beam::setup(5, "SB1_2"), 2, &config), None);
        assert_eq!(old_context(&Beam::setup(5, "5"), 1, &config), None);
        assert_eq!(old_context(&Beam::setup(5, "SB1_2"), 1, &config), Some("SB1_2"));
        assert_eq!(old_context(&Beam::setup(5, "CBCT"), 1, &config), Some("CBCT"));
    }

    #[test]
    fn setup_default_only_applies_to_setup_beams() {
        let config = config();
        assert_eq!(old_context(&Beam::treatment(5, "SB1_1"), 1, &config), Some("SB1_1"));
    }

    #[test]
    fn beam_name_appends_context() {
        let config = config();
        assert_eq!(beam_name(BeamNumber(10), Some("Boost"), &config), "10 Boost");
        assert_eq!(beam_name(BeamNumber(8), None, &config), "8");
    }
}
