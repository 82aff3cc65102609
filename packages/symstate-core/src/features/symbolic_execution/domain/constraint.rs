//! Constraint Lattice
//!
//! A constraint narrows what an abstract runtime value could be. The
//! lattice is a bitmask over eleven atomic facts partitioning the
//! JavaScript value space (nullability, truthiness, primitive category),
//! so intersection and incompatibility are single bit operations.
//!
//! # Lattice structure
//! - Top: [`Constraint::ANY_VALUE`] (no information yet)
//! - Bottom: the empty mask (no possible value; a contradiction)
//! - `and` is bit intersection, `or` is union, `not` is complement
//!   within the value universe

use serde::{Deserialize, Serialize};
use std::fmt;

// Atomic facts. Together they cover every runtime value exactly once.
const NULL: u16 = 1 << 0;
const UNDEFINED: u16 = 1 << 1;
const NAN: u16 = 1 << 2;
const ZERO: u16 = 1 << 3;
const EMPTY_STRING: u16 = 1 << 4;
const FALSE: u16 = 1 << 5;
const TRUE: u16 = 1 << 6;
const NONZERO_NUMBER: u16 = 1 << 7;
const NONEMPTY_STRING: u16 = 1 << 8;
const FUNCTION: u16 = 1 << 9;
const OTHER_OBJECT: u16 = 1 << 10;

const UNIVERSE: u16 = (1 << 11) - 1;

const ATOM_NAMES: [(u16, &str); 11] = [
    (NULL, "NULL"),
    (UNDEFINED, "UNDEFINED"),
    (NAN, "NAN"),
    (ZERO, "ZERO"),
    (EMPTY_STRING, "EMPTY_STRING"),
    (FALSE, "FALSE"),
    (TRUE, "TRUE"),
    (NONZERO_NUMBER, "NONZERO_NUMBER"),
    (NONEMPTY_STRING, "NONEMPTY_STRING"),
    (FUNCTION, "FUNCTION"),
    (OTHER_OBJECT, "OTHER_OBJECT"),
];

/// Immutable lattice fact about the possible nature of an abstract value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint(u16);

impl Constraint {
    /// Top element: no information about the value yet
    pub const ANY_VALUE: Constraint = Constraint(UNIVERSE);

    /// Exactly `null`
    pub const NULL: Constraint = Constraint(NULL);

    /// Exactly `undefined`
    pub const UNDEFINED: Constraint = Constraint(UNDEFINED);

    /// `null` or `undefined`
    pub const NULL_OR_UNDEFINED: Constraint = Constraint(NULL | UNDEFINED);

    /// Anything but `null` or `undefined`
    pub const NOT_NULLY: Constraint = Constraint(UNIVERSE & !(NULL | UNDEFINED));

    /// Every falsy value
    pub const FALSY: Constraint = Constraint(NULL | UNDEFINED | NAN | ZERO | EMPTY_STRING | FALSE);

    /// Every truthy value
    pub const TRUTHY: Constraint =
        Constraint(TRUE | NONZERO_NUMBER | NONEMPTY_STRING | FUNCTION | OTHER_OBJECT);

    /// Exactly `true`
    pub const TRUE: Constraint = Constraint(TRUE);

    /// Exactly `false`
    pub const FALSE: Constraint = Constraint(FALSE);

    /// A number primitive (including `NaN`)
    pub const NUMBER_PRIMITIVE: Constraint = Constraint(NAN | ZERO | NONZERO_NUMBER);

    /// A string primitive
    pub const STRING_PRIMITIVE: Constraint = Constraint(EMPTY_STRING | NONEMPTY_STRING);

    /// A boolean primitive
    pub const BOOLEAN_PRIMITIVE: Constraint = Constraint(TRUE | FALSE);

    /// A callable object
    pub const FUNCTION: Constraint = Constraint(FUNCTION);

    /// A non-callable object
    pub const OTHER_OBJECT: Constraint = Constraint(OTHER_OBJECT);

    /// Any object, callable or not
    pub const OBJECT: Constraint = Constraint(FUNCTION | OTHER_OBJECT);

    /// `NaN`
    pub const NAN: Constraint = Constraint(NAN);

    /// Intersection of two constraints
    ///
    /// Associative, commutative, idempotent. An empty result is the
    /// bottom element and means the two facts contradict each other.
    pub fn and(self, other: Constraint) -> Constraint {
        Constraint(self.0 & other.0)
    }

    /// Union of two constraints (conservative join at merge points)
    pub fn or(self, other: Constraint) -> Constraint {
        Constraint(self.0 | other.0)
    }

    /// Complement within the value universe
    pub fn not(self) -> Constraint {
        Constraint(UNIVERSE & !self.0)
    }

    /// True iff the intersection with `other` is empty
    ///
    /// A `true` result on a code path means the path cannot occur.
    pub fn is_incompatible_with(self, other: Constraint) -> bool {
        self.0 & other.0 == 0
    }

    /// True iff every value admitted by `self` is admitted by `other`
    pub fn is_stricter_or_equal_to(self, other: Constraint) -> bool {
        self.0 & other.0 == self.0
    }

    /// Classify this constraint against the truthy/falsy partition
    pub fn truthiness(self) -> Truthiness {
        if self.is_stricter_or_equal_to(Constraint::TRUTHY) {
            Truthiness::Truthy
        } else if self.is_stricter_or_equal_to(Constraint::FALSY) {
            Truthiness::Falsy
        } else {
            Truthiness::Unknown
        }
    }
}

/// Truthiness classification of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Truthiness {
    /// Only truthy values are possible
    Truthy,
    /// Only falsy values are possible
    Falsy,
    /// Both truthy and falsy values remain possible
    Unknown,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == UNIVERSE {
            return write!(f, "ANY_VALUE");
        }
        if self.0 == 0 {
            return write!(f, "NO_POSSIBLE_VALUE");
        }
        let mut first = true;
        for (bit, name) in ATOM_NAMES {
            if self.0 & bit != 0 {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}
