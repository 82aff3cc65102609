/*
 * Symstate Core - Persistent Program State for Symbolic Execution
 *
 * Feature-First Hexagonal Architecture:
 * - shared/   : Common models (SymbolId, NodeRef, FunctionRef)
 * - features/ : Vertical slices (symbolic_execution)
 *
 * The crate is the state core of a path-sensitive static analysis: an
 * immutable snapshot of abstract interpreter state per control-flow
 * point, with sound constraint propagation, eager garbage collection of
 * unreachable facts, and an identifier-insensitive equivalence that lets
 * loop analysis detect fixpoints. Parsing, CFG construction, and the
 * rule engine are external collaborators reached through ports.
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // Constraint::not is the lattice complement, not ops::Not

pub mod errors;
pub mod features;
pub mod shared;

pub use errors::{Result, StateError};

pub use features::symbolic_execution::{
    BuiltInRegistry, BuiltInValue, Constraint, ExpressionStack, OperandEvaluator, ProgramState,
    Relation, RelationOnSymbols, RelationOperator, StateSet, SymbolResolver, SymbolicValue,
    Truthiness,
};

pub use shared::models::{FunctionRef, NodeRef, SymbolId};
