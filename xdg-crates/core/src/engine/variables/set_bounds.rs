use std::fmt::Display;

use crate::basic_types::VariableError;
use crate::containers::IntSet;

/// The bounds of a set variable: `lower ⊆ value ⊆ upper` and `lcard ≤ |value| ≤ ucard`.
///
/// Bounds are always kept in normal form: `|lower| ≤ lcard ≤ ucard ≤ |upper|`, and when the
/// cardinality forces it, `lower` is lifted to `upper` (or `upper` dropped to `lower`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetBounds {
    lower: IntSet,
    upper: IntSet,
    lcard: u32,
    ucard: u32,
}

impl SetBounds {
    pub fn new(
        lower: IntSet,
        upper: IntSet,
        lcard: u32,
        ucard: u32,
    ) -> Result<SetBounds, VariableError> {
        let mut bounds = SetBounds {
            lower,
            upper,
            lcard,
            ucard,
        };
        bounds.normalise()?;
        Ok(bounds)
    }

    /// Bounds whose cardinality is only limited by the set bounds themselves.
    pub fn between(lower: IntSet, upper: IntSet) -> Result<SetBounds, VariableError> {
        let ucard = upper.len() as u32;
        SetBounds::new(lower, upper, 0, ucard)
    }

    pub fn determined(value: IntSet) -> SetBounds {
        let card = value.len() as u32;
        SetBounds {
            lower: value.clone(),
            upper: value,
            lcard: card,
            ucard: card,
        }
    }

    pub fn lower(&self) -> &IntSet {
        &self.lower
    }

    pub fn upper(&self) -> &IntSet {
        &self.upper
    }

    pub fn lcard(&self) -> u32 {
        self.lcard
    }

    pub fn ucard(&self) -> u32 {
        self.ucard
    }

    pub fn is_determined(&self) -> bool {
        self.lower == self.upper
    }

    pub fn value(&self) -> Option<&IntSet> {
        self.is_determined().then_some(&self.lower)
    }

    /// The elements that are neither required nor excluded.
    pub fn undecided(&self) -> IntSet {
        self.upper.difference(&self.lower)
    }

    /// Add `values` to the lower bound.
    pub fn strengthen_lower(&mut self, values: &IntSet) -> Result<bool, VariableError> {
        if values.is_subset(&self.lower) {
            return Ok(false);
        }
        if !values.is_subset(&self.upper) {
            return Err(VariableError::LowerNotInUpper);
        }
        self.lower.union_with(values);
        self.normalise()?;
        Ok(true)
    }

    /// Intersect the upper bound with `values`.
    pub fn strengthen_upper(&mut self, values: &IntSet) -> Result<bool, VariableError> {
        if self.upper.is_subset(values) {
            return Ok(false);
        }
        if !self.lower.is_subset(values) {
            return Err(VariableError::LowerNotInUpper);
        }
        self.upper.intersect_with(values);
        self.normalise()?;
        Ok(true)
    }

    /// Remove `values` from the upper bound.
    pub fn discard_upper(&mut self, values: &IntSet) -> Result<bool, VariableError> {
        if self.upper.is_disjoint(values) {
            return Ok(false);
        }
        if self.lower.intersects(values) {
            return Err(VariableError::LowerNotInUpper);
        }
        self.upper.difference_with(values);
        self.normalise()?;
        Ok(true)
    }

    pub fn strengthen_lower_card(&mut self, lcard: u32) -> Result<bool, VariableError> {
        if lcard <= self.lcard {
            return Ok(false);
        }
        if lcard > self.ucard {
            return Err(VariableError::CardinalityViolation);
        }
        self.lcard = lcard;
        self.normalise()?;
        Ok(true)
    }

    pub fn strengthen_upper_card(&mut self, ucard: u32) -> Result<bool, VariableError> {
        if ucard >= self.ucard {
            return Ok(false);
        }
        if ucard < self.lcard {
            return Err(VariableError::CardinalityViolation);
        }
        self.ucard = ucard;
        self.normalise()?;
        Ok(true)
    }

    pub fn determine(&mut self, value: &IntSet) -> Result<bool, VariableError> {
        let lowered = self.strengthen_upper(value)?;
        let raised = self.strengthen_lower(value)?;
        Ok(lowered || raised)
    }

    fn normalise(&mut self) -> Result<(), VariableError> {
        loop {
            if !self.lower.is_subset(&self.upper) {
                return Err(VariableError::LowerNotInUpper);
            }
            self.lcard = self.lcard.max(self.lower.len() as u32);
            self.ucard = self.ucard.min(self.upper.len() as u32);
            if self.lcard > self.ucard {
                return Err(VariableError::CardinalityViolation);
            }

            if self.upper.len() as u32 == self.lcard && self.lower != self.upper {
                self.lower = self.upper.clone();
                continue;
            }
            if self.lower.len() as u32 == self.ucard && self.lower != self.upper {
                self.upper = self.lower.clone();
                continue;
            }
            return Ok(());
        }
    }
}

impl Display for SetBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_determined() {
            write!(f, "{}", self.lower)
        } else {
            write!(
                f,
                "{}..{} #{}..{}",
                self.lower, self.upper, self.lcard, self.ucard
            )
        }
    }
}
