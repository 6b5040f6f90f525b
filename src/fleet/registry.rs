use std::collections::HashSet;
use std::ops::Index;

use crate::error::FleetError;

use super::MAX_UNITS;
use super::unit::GeneratingUnit;

/// Immutable, validated set of generating units.
///
/// Insertion order is the canonical unit index: priority orders,
/// commitments and per-unit outputs all refer to units by this index.
#[derive(Debug, Clone)]
pub struct Fleet {
    units: Vec<GeneratingUnit>,
}

impl Fleet {
    /// Validates `units` and freezes them into a fleet.
    ///
    /// # Errors
    ///
    /// Returns a `FleetError` if the list is empty, exceeds [`MAX_UNITS`],
    /// contains a duplicate id, or any unit has invalid bounds or a
    /// non-convex cost curve.
    pub fn new(units: Vec<GeneratingUnit>) -> Result<Self, FleetError> {
        if units.is_empty() {
            return Err(FleetError::Empty);
        }
        if units.len() > MAX_UNITS {
            return Err(FleetError::TooManyUnits(units.len()));
        }

        let mut seen = HashSet::with_capacity(units.len());
        for unit in &units {
            unit.validate().map_err(|message| FleetError::InvalidUnit {
                id: unit.id.clone(),
                message,
            })?;
            if !seen.insert(unit.id.as_str()) {
                return Err(FleetError::DuplicateId(unit.id.clone()));
            }
        }

        Ok(Self { units })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[GeneratingUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratingUnit> {
        self.units.iter()
    }

    /// Index of the unit with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    /// Sum of `p_min` across the whole fleet (MW).
    pub fn total_p_min(&self) -> f64 {
        self.units.iter().map(|u| u.p_min).sum()
    }

    /// Sum of `p_max` across the whole fleet (MW).
    pub fn total_p_max(&self) -> f64 {
        self.units.iter().map(|u| u.p_max).sum()
    }
}

impl Index<usize> for Fleet {
    type Output = GeneratingUnit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.units[index]
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a GeneratingUnit;
    type IntoIter = std::slice::Iter<'a, GeneratingUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}
