/*
 * Symbolic Execution Ports
 *
 * Interfaces for external collaborators.
 */

use crate::features::symbolic_execution::domain::{ExpressionStack, ProgramState};
use crate::shared::models::{NodeRef, SymbolId};

/// Scope resolution trait
///
/// Implemented by the external symbol table: resolves an identifier
/// occurrence to a tracked binding, or to nothing if the identifier is
/// not a variable the analysis tracks.
pub trait SymbolResolver {
    /// Tracked binding for `identifier`, if any
    fn tracked_variable(&self, identifier: &str) -> Option<SymbolId>;
}

/// Operand evaluation trait
///
/// Implemented by the external per-expression-kind semantics table:
/// given an expression node and the current state, returns the operand
/// stack reflecting that expression's push/pop effects.
pub trait OperandEvaluator {
    /// Stack after evaluating `expression` in `state`
    fn evaluate(
        &self,
        expression: NodeRef,
        state: &ProgramState,
        stack: &ExpressionStack,
    ) -> ExpressionStack;
}
