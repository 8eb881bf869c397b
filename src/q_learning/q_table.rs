//! Q-table implementation for temporal difference learning

use std::collections::{HashMap, hash_map};

use crate::{Result, env::Observation, error::Error};

/// Q-table mapping observations to one value per action.
///
/// Keys are exact observations. A key that has never been seen gets a vector
/// of zeros the first time it is looked up through [`QTable::values_mut`].
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: HashMap<Observation, Vec<f64>>,
    action_space_size: usize,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new(action_space_size: usize) -> Self {
        Self {
            values: HashMap::new(),
            action_space_size,
        }
    }

    /// Seed a table from an existing mapping.
    ///
    /// # Errors
    ///
    /// Returns `ActionSpaceMismatch` if any vector does not have exactly
    /// `action_space_size` entries.
    pub fn from_map(
        values: HashMap<Observation, Vec<f64>>,
        action_space_size: usize,
    ) -> Result<Self> {
        if let Some(bad) = values.values().find(|v| v.len() != action_space_size) {
            return Err(Error::ActionSpaceMismatch {
                expected: action_space_size,
                got: bad.len(),
            });
        }
        Ok(Self {
            values,
            action_space_size,
        })
    }

    pub fn action_space_size(&self) -> usize {
        self.action_space_size
    }

    /// Values for `obs`, inserting zeros if the key is new
    pub fn values_mut(&mut self, obs: &Observation) -> &mut Vec<f64> {
        let n = self.action_space_size;
        self.values.entry(*obs).or_insert_with(|| vec![0.0; n])
    }

    /// Values for `obs` without materializing a missing key
    pub fn get(&self, obs: &Observation) -> Option<&[f64]> {
        self.values.get(obs).map(Vec::as_slice)
    }

    /// Largest value stored for `obs`
    pub fn max_value(&mut self, obs: &Observation) -> f64 {
        self.values_mut(obs)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every action whose value equals the maximum for `obs`
    pub fn greedy_actions(&mut self, obs: &Observation) -> Vec<usize> {
        let values = self.values_mut(obs);
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == best)
            .map(|(action, _)| action)
            .collect()
    }

    /// Number of observations with a stored vector
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Observation, Vec<f64>> {
        self.values.iter()
    }

    pub fn as_map(&self) -> &HashMap<Observation, Vec<f64>> {
        &self.values
    }

    pub fn into_map(self) -> HashMap<Observation, Vec<f64>> {
        self.values
    }
}
