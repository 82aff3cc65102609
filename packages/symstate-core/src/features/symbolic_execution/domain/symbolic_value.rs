//! Symbolic Values
//!
//! A symbolic value is an opaque identity standing in for a runtime
//! value without computing it concretely. The closed set of kinds:
//! - `Fresh`: unconstrained value minted by a state transition, identified
//!   by the owning state's monotonic counter
//! - `Function`: value known to be a given function, wrapping its syntax
//! - `BuiltIn`: well-known global singleton (`Math`, `JSON`, constructors)
//! - `Not`: result of logical negation, owning its negated operand
//! - `Unknown`: sentinel used when the analysis cannot determine a value
//!
//! Each kind may contribute an intrinsic constraint (`base_constraint`)
//! and may react to a constraint newly applied to itself by deriving
//! constraints for values it owns (`constrain_dependencies`).

use std::fmt;

use super::constraint::{Constraint, Truthiness};
use super::program_state::ProgramState;
use crate::features::symbolic_execution::infrastructure::BuiltInValue;
use crate::shared::models::FunctionRef;

/// Opaque identity for an abstract runtime value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolicValue {
    /// Fresh value minted by a state transition
    Fresh(u32),

    /// Value bound to a known function's syntax
    Function(FunctionRef),

    /// Well-known global singleton
    BuiltIn(BuiltInValue),

    /// Result of logical negation of the wrapped operand
    Not(Box<SymbolicValue>),

    /// Sentinel for values the analysis cannot determine
    Unknown,
}

impl SymbolicValue {
    /// Logical negation of `operand`
    pub fn negation_of(operand: SymbolicValue) -> SymbolicValue {
        SymbolicValue::Not(Box::new(operand))
    }

    /// Intrinsic constraint contributed by this value's kind
    ///
    /// Holds regardless of anything learned along the path; callers
    /// intersect it with the stored constraint when reading facts.
    pub fn base_constraint(&self, state: &ProgramState) -> Constraint {
        match self {
            SymbolicValue::Fresh(_) | SymbolicValue::Unknown => Constraint::ANY_VALUE,
            SymbolicValue::Function(_) => Constraint::FUNCTION,
            SymbolicValue::BuiltIn(built_in) => built_in.base_constraint(),
            SymbolicValue::Not(operand) => {
                // Negation always yields a boolean; a known operand
                // truthiness pins down which one.
                match state.get_constraint(Some(operand.as_ref())).truthiness() {
                    Truthiness::Truthy => Constraint::FALSE,
                    Truthiness::Falsy => Constraint::TRUE,
                    Truthiness::Unknown => Constraint::BOOLEAN_PRIMITIVE,
                }
            }
        }
    }

    /// Derive constraints for values this one structurally owns
    ///
    /// Called by the state right after `constraint` was applied to this
    /// value. The default is identity. Returns `None` if a derived
    /// constraint contradicts the state, which makes the whole path
    /// infeasible.
    pub fn constrain_dependencies(
        &self,
        state: ProgramState,
        constraint: Constraint,
    ) -> Option<ProgramState> {
        match self {
            SymbolicValue::Not(operand) => match constraint.truthiness() {
                Truthiness::Truthy => {
                    state.constrain(Some(operand.as_ref()), Some(Constraint::FALSY))
                }
                Truthiness::Falsy => {
                    state.constrain(Some(operand.as_ref()), Some(Constraint::TRUTHY))
                }
                Truthiness::Unknown => Some(state),
            },
            _ => Some(state),
        }
    }
}

impl fmt::Display for SymbolicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicValue::Fresh(id) => write!(f, "SV_{id}"),
            SymbolicValue::Function(function) => write!(f, "{function}"),
            SymbolicValue::BuiltIn(built_in) => write!(f, "{built_in}"),
            SymbolicValue::Not(operand) => write!(f, "!{operand}"),
            SymbolicValue::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
