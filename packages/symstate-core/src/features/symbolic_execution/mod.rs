/*
 * Path-Sensitive Symbolic Execution State
 *
 * Persistent program-state representation for path-sensitive analysis
 * over a control-flow graph:
 * - Immutable snapshots: every transition returns a new state
 * - Constraint propagation across values proven strictly equal
 * - Construction-time garbage collection of unreachable facts
 * - Identifier-insensitive equivalence for fixpoint termination
 *
 * Architecture:
 * - Domain: Constraint, Relation, SymbolicValue, ExpressionStack,
 *   ProgramState
 * - Application: StateSet (fixpoint deduplication)
 * - Infrastructure: built-in value registry
 * - Ports: SymbolResolver, OperandEvaluator traits
 *
 * Error model:
 * - Path infeasibility: constraining operations return no state; the
 *   driver abandons the path
 * - Internal-consistency violations: StateError results; the driver
 *   aborts the analysis invocation
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-export main types
pub use domain::{
    Constraint, ExpressionStack, ProgramState, Relation, RelationOnSymbols, RelationOperator,
    SymbolicValue, Truthiness,
};

pub use application::StateSet;

pub use infrastructure::{BuiltInRegistry, BuiltInValue};

pub use ports::{OperandEvaluator, SymbolResolver};
