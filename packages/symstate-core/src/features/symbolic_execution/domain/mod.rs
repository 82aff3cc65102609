//! Symbolic Execution Domain Models
//!
//! The persistent program-state representation and its value types:
//! constraints, relations, symbolic values, the operand stack, and the
//! immutable program state composing them.

pub mod constraint;
pub mod expression_stack;
pub mod program_state;
pub mod relation;
pub mod symbolic_value;

pub use constraint::{Constraint, Truthiness};
pub use expression_stack::ExpressionStack;
pub use program_state::ProgramState;
pub use relation::{Relation, RelationOnSymbols, RelationOperator};
pub use symbolic_value::SymbolicValue;
