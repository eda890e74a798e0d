//! In-memory host
//!
//! [`InMemoryHost`] owns a [`PatientRecord`] and applies the host-side
//! validation rules a planning system enforces on identity writes.

use crate::host::{HostError, PlanHost};
use crate::ids::{BeamId, BeamNumber, BeamSetId, EntityRef, IsocenterId, PlanId};
use crate::record::{Beam, BeamSet, Isocenter, PatientRecord, Plan};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation rules applied to identity writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRules {
    /// Maximum name length in characters
    pub max_name_len: usize,
}

impl Default for HostRules {
    fn default() -> Self {
        Self { max_name_len: 64 }
    }
}

impl HostRules {
    /// With maximum name length
    #[inline]
    #[must_use]
    pub fn with_max_name_len(mut self, max: usize) -> Self {
        self.max_name_len = max;
        self
    }

    fn check_name(&self, name: &str) -> Result<(), HostError> {
        if name.trim().is_empty() {
            return Err(HostError::InvalidName {
                name: name.to_string(),
                reason: "name is empty".to_string(),
            });
        }
        let len = name.chars().count();
        if len > self.max_name_len {
            return Err(HostError::InvalidName {
                name: name.to_string(),
                reason: format!("{len} characters exceeds limit of {}", self.max_name_len),
            });
        }
        Ok(())
    }
}

/// Host over an owned patient record
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    record: PatientRecord,
    rules: HostRules,
    rejected: HashSet<EntityRef>,
    writes: usize,
}

impl InMemoryHost {
    /// Create host over a record with default rules
    #[inline]
    #[must_use]
    pub fn new(record: PatientRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    /// With validation rules
    #[inline]
    #[must_use]
    pub fn with_rules(mut self, rules: HostRules) -> Self {
        self.rules = rules;
        self
    }

    /// Refuse every subsequent write to `entity`
    pub fn reject_writes_to(&mut self, entity: EntityRef) {
        self.rejected.insert(entity);
    }

    /// Number of successful field writes
    #[inline]
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Release the record
    #[inline]
    #[must_use]
    pub fn into_record(self) -> PatientRecord {
        self.record
    }

    fn check_writable(&self, entity: EntityRef) -> Result<(), HostError> {
        if self.rejected.contains(&entity) {
            return Err(HostError::rejected(entity, "locked by host validation"));
        }
        Ok(())
    }

    fn mirror(source: &Plan, new_name: &str) -> Plan {
        let mut treatment = 0usize;
        let beam_sets = source
            .beam_sets
            .iter()
            .map(|bs| {
                let mut setup = 0usize;
                BeamSet {
                    id: BeamSetId::new(),
                    name: format!("{} copy", bs.name),
                    beams: bs
                        .beams
                        .iter()
                        .map(|b| {
                            let name = if b.is_setup {
                                setup += 1;
                                format!("SB1_{setup}")
                            } else {
                                treatment += 1;
                                treatment.to_string()
                            };
                            Beam {
                                id: BeamId::new(),
                                name,
                                ..b.clone()
                            }
                        })
                        .collect(),
                }
            })
            .collect();
        let isocenters = (1..=source.isocenters.len())
            .map(|i| Isocenter::new(format!("Iso {i}")))
            .collect();
        Plan {
            id: PlanId::new(),
            name: new_name.to_string(),
            beam_sets,
            isocenters,
        }
    }
}

impl PlanHost for InMemoryHost {
    fn patient(&self) -> &PatientRecord {
        &self.record
    }

    fn set_beam_set_name(&mut self, id: BeamSetId, name: &str) -> Result<(), HostError> {
        let entity = EntityRef::BeamSet(id);
        self.check_writable(entity)?;
        self.rules.check_name(name)?;
        let beam_set = self
            .record
            .beam_set_mut(id)
            .ok_or(HostError::EntityNotFound(entity))?;
        beam_set.name = name.to_string();
        self.writes += 1;
        Ok(())
    }

    fn set_isocenter_name(&mut self, id: IsocenterId, name: &str) -> Result<(), HostError> {
        let entity = EntityRef::Isocenter(id);
        self.check_writable(entity)?;
        self.rules.check_name(name)?;
        let isocenter = self
            .record
            .isocenter_mut(id)
            .ok_or(HostError::EntityNotFound(entity))?;
        isocenter.name = name.to_string();
        self.writes += 1;
        Ok(())
    }

    fn set_beam_name(&mut self, id: BeamId, name: &str) -> Result<(), HostError> {
        let entity = EntityRef::Beam(id);
        self.check_writable(entity)?;
        self.rules.check_name(name)?;
        let beam = self
            .record
            .beam_mut(id)
            .ok_or(HostError::EntityNotFound(entity))?;
        beam.name = name.to_string();
        self.writes += 1;
        Ok(())
    }

    fn set_beam_number(&mut self, id: BeamId, number: BeamNumber) -> Result<(), HostError> {
        let entity = EntityRef::Beam(id);
        self.check_writable(entity)?;
        if number == BeamNumber::ZERO {
            return Err(HostError::InvalidNumber(number));
        }
        if let Some(holder) = self
            .record
            .beams()
            .find(|b| b.number == number && b.id != id)
        {
            return Err(HostError::NumberInUse {
                number,
                holder: holder.id,
            });
        }
        let beam = self
            .record
            .beam_mut(id)
            .ok_or(HostError::EntityNotFound(entity))?;
        beam.number = number;
        self.writes += 1;
        Ok(())
    }

    fn copy_plan(&mut self, source: PlanId, new_name: &str) -> Result<PlanId, HostError> {
        if self.record.has_plan_named(new_name) {
            return Err(HostError::PlanNameTaken(new_name.to_string()));
        }
        self.rules.check_name(new_name)?;
        let source = self
            .record
            .plan(source)
            .ok_or(HostError::PlanNotFound(source))?;
        let copy = Self::mirror(source, new_name);
        Ok(self.record.add_plan(copy))
    }
}
