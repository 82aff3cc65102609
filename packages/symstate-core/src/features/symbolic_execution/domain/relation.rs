//! Binary Relations Between Symbolic Values
//!
//! A relation is an immutable recorded fact `(operator, left, right)`
//! relating two symbolic values, learned from comparisons along the
//! explored path. Strict equality is privileged: the owning program state
//! uses it to propagate constraints between proven-equal values.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::symbolic_value::SymbolicValue;
use crate::shared::models::SymbolId;

/// Comparison operator recorded by a relation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RelationOperator {
    /// Loose equality (==)
    Equal,
    /// Loose inequality (!=)
    NotEqual,
    /// Strict equality (===)
    StrictEqual,
    /// Strict inequality (!==)
    StrictNotEqual,
    /// Less than (<)
    LessThan,
    /// Greater than (>)
    GreaterThan,
    /// Less than or equal (<=)
    LessOrEqual,
    /// Greater than or equal (>=)
    GreaterOrEqual,
}

impl RelationOperator {
    /// Operator holding on the branch where this one does not
    pub fn negated(self) -> RelationOperator {
        match self {
            Self::Equal => Self::NotEqual,
            Self::NotEqual => Self::Equal,
            Self::StrictEqual => Self::StrictNotEqual,
            Self::StrictNotEqual => Self::StrictEqual,
            Self::LessThan => Self::GreaterOrEqual,
            Self::GreaterOrEqual => Self::LessThan,
            Self::GreaterThan => Self::LessOrEqual,
            Self::LessOrEqual => Self::GreaterThan,
        }
    }

    /// Operator holding with the operands swapped
    pub fn flipped(self) -> RelationOperator {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::GreaterThan => Self::LessThan,
            Self::LessOrEqual => Self::GreaterOrEqual,
            Self::GreaterOrEqual => Self::LessOrEqual,
            symmetric => symmetric,
        }
    }
}

impl fmt::Display for RelationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
        };
        write!(f, "{symbol}")
    }
}

/// Immutable binary fact relating two symbolic values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    operator: RelationOperator,
    left: SymbolicValue,
    right: SymbolicValue,
}

impl Relation {
    pub fn new(operator: RelationOperator, left: SymbolicValue, right: SymbolicValue) -> Self {
        Self {
            operator,
            left,
            right,
        }
    }

    pub fn operator(&self) -> RelationOperator {
        self.operator
    }

    pub fn left_operand(&self) -> &SymbolicValue {
        &self.left
    }

    pub fn right_operand(&self) -> &SymbolicValue {
        &self.right
    }

    /// True iff `value` is one of the two operands
    pub fn involves(&self, value: &SymbolicValue) -> bool {
        self.left == *value || self.right == *value
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

/// A relation re-expressed over the symbols denoting its operands
///
/// This is the unit of the identifier-erasing state comparison: raw
/// value identities differ across independently explored paths, symbol
/// names do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationOnSymbols {
    operator: RelationOperator,
    left: SymbolId,
    right: SymbolId,
}

impl RelationOnSymbols {
    pub fn new(operator: RelationOperator, left: SymbolId, right: SymbolId) -> Self {
        Self {
            operator,
            left,
            right,
        }
    }
}

impl fmt::Display for RelationOnSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}
