use std::collections::HashMap;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::runtime::{CancelFlag, Cancelled};

use super::error::{DomainError, DomainResult};
use super::variable::VariableDomain;

/// How per-variable sequences are combined into tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TupleMode {
    /// Cartesian product, last-declared variable varying fastest.
    Grid,
    /// Pointwise zip of equal-length sequences.
    List,
}

/// Resolves a variable name to its slot in a tuple.
pub trait VariableLookup {
    fn variable_index(&self, name: &str) -> Option<usize>;
}

impl VariableLookup for HashMap<String, usize> {
    fn variable_index(&self, name: &str) -> Option<usize> {
        self.get(name).copied()
    }
}

/// Generated value sequences for every declared variable, in declaration
/// order. The position of a variable here is its slot in every tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSet {
    index: HashMap<String, usize>,
    columns: Vec<Vec<f64>>,
}

impl DomainSet {
    /// Generates every domain's values. `limit` caps the number of values
    /// across all domains together and is checked before anything is
    /// generated.
    pub fn build(
        domains: &[VariableDomain],
        limit: usize,
        cancel: &CancelFlag,
    ) -> DomainResult<Self> {
        let mut index = HashMap::with_capacity(domains.len());
        let mut total = 0usize;
        for (slot, domain) in domains.iter().enumerate() {
            let name = domain.name().to_string();
            if index.insert(name.clone(), slot).is_some() {
                return Err(DomainError::DuplicateVariable(name));
            }
            let estimated = domain.estimated_len();
            if estimated > limit {
                return Err(DomainError::TooLarge { name, limit });
            }
            total = total.saturating_add(estimated);
            if total > limit {
                return Err(DomainError::TotalTooLarge { limit });
            }
        }

        let columns = domains
            .iter()
            .map(|domain| domain.values(limit, cancel))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self { index, columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of tuples `mode` would produce, without producing them.
    pub fn tuple_count(&self, mode: TupleMode) -> DomainResult<usize> {
        match mode {
            TupleMode::Grid => {
                if self.columns.iter().any(Vec::is_empty) {
                    return Ok(0);
                }
                self.columns
                    .iter()
                    .try_fold(1usize, |acc, column| acc.checked_mul(column.len()))
                    .ok_or(DomainError::TooManyTuples)
            }
            TupleMode::List => {
                let len = self.columns.first().map_or(0, Vec::len);
                if self.columns.iter().any(|column| column.len() != len) {
                    return Err(DomainError::UnequalLengths);
                }
                Ok(len)
            }
        }
    }

    /// Lazy cursor over the tuples of `mode`.
    pub fn tuples(&self, mode: TupleMode) -> DomainResult<Tuples<'_>> {
        let total = self.tuple_count(mode)?;
        Ok(Tuples {
            columns: &self.columns,
            mode,
            total,
            emitted: 0,
            cursor: vec![0; self.columns.len()],
            buffer: vec![0.0; self.columns.len()],
        })
    }
}

impl VariableLookup for DomainSet {
    fn variable_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Tuples are produced one at a time into a reused buffer, so a huge grid
/// never exists in memory at once.
#[derive(Debug)]
pub struct Tuples<'a> {
    columns: &'a [Vec<f64>],
    mode: TupleMode,
    total: usize,
    emitted: usize,
    cursor: Vec<usize>,
    buffer: Vec<f64>,
}

impl Tuples<'_> {
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Next tuple, positionally aligned with the declaration order.
    pub fn next_tuple(&mut self) -> Option<&[f64]> {
        if self.emitted == self.total {
            return None;
        }

        match self.mode {
            TupleMode::Grid => {
                if self.emitted > 0 {
                    self.advance_odometer();
                }
                for (slot, (column, &i)) in self.columns.iter().zip(&self.cursor).enumerate() {
                    self.buffer[slot] = column[i];
                }
            }
            TupleMode::List => {
                let row = self.emitted;
                for (slot, column) in self.columns.iter().enumerate() {
                    self.buffer[slot] = column[row];
                }
            }
        }

        self.emitted += 1;
        Some(&self.buffer)
    }

    /// Like [`Self::next_tuple`], but stops with an error once `cancel` is set.
    pub fn next_checked(&mut self, cancel: &CancelFlag) -> Result<Option<&[f64]>, Cancelled> {
        cancel.check()?;
        Ok(self.next_tuple())
    }

    fn advance_odometer(&mut self) {
        for slot in (0..self.cursor.len()).rev() {
            self.cursor[slot] += 1;
            if self.cursor[slot] < self.columns[slot].len() {
                return;
            }
            self.cursor[slot] = 0;
        }
    }
}
