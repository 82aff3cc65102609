// Symbolic Execution State - Scenario Test Suite
//
// End-to-end scenarios exercising the public surface the analysis driver
// uses:
// 1. Constraining and path infeasibility
// 2. Strict-equality constraint propagation
// 3. Identifier-insensitive state equivalence (fixpoint detection)
// 4. Statement walks through the evaluator and resolver ports
// 5. Scope-end projection and garbage collection
// 6. Error-channel separation (infeasible path vs invariant violation)

use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use symstate_core::{
    Constraint, ExpressionStack, FunctionRef, NodeRef, OperandEvaluator, ProgramState, Relation,
    RelationOperator, StateError, StateSet, SymbolId, SymbolResolver, SymbolicValue, Truthiness,
};

const X: SymbolId = SymbolId(1);
const Y: SymbolId = SymbolId(2);

// ============================================================
// Test Helpers
// ============================================================

fn hash_of(state: &ProgramState) -> u64 {
    let mut hasher = DefaultHasher::new();
    state.hash(&mut hasher);
    hasher.finish()
}

/// Symbol table stub: a fixed identifier → symbol mapping
struct TableResolver {
    vars: FxHashMap<&'static str, SymbolId>,
}

impl TableResolver {
    fn new(vars: &[(&'static str, SymbolId)]) -> Self {
        Self {
            vars: vars.iter().copied().collect(),
        }
    }
}

impl SymbolResolver for TableResolver {
    fn tracked_variable(&self, identifier: &str) -> Option<SymbolId> {
        self.vars.get(identifier).copied()
    }
}

/// Evaluator stub for a single identifier expression: pushes the
/// resolved value, or the unknown sentinel when nothing resolves.
struct IdentifierExpression {
    name: &'static str,
    resolver: TableResolver,
}

impl OperandEvaluator for IdentifierExpression {
    fn evaluate(
        &self,
        _expression: NodeRef,
        state: &ProgramState,
        stack: &ExpressionStack,
    ) -> ExpressionStack {
        let value = state
            .resolve_identifier(self.name, &self.resolver)
            .unwrap_or(SymbolicValue::Unknown);
        stack.push(value)
    }
}

// ============================================================
// 1. Constraining and path infeasibility
// ============================================================

#[test]
fn test_constrain_then_contradict() {
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, None)
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();

    // Learning "x is null" succeeds and is visible through the symbol.
    let state = state
        .constrain(Some(&vx), Some(Constraint::NULL_OR_UNDEFINED))
        .unwrap();
    assert_eq!(
        state.get_symbol_constraint(X),
        Constraint::NULL_OR_UNDEFINED
    );

    // Learning "x is not null" on the same path is a contradiction.
    assert!(state
        .constrain(Some(&vx), Some(Constraint::NOT_NULLY))
        .is_none());
}

#[test]
fn test_initial_constraint_recorded_at_binding() {
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, Some(Constraint::NOT_NULLY))
        .unwrap();
    assert_eq!(state.get_symbol_constraint(X), Constraint::NOT_NULLY);
    assert_eq!(
        state.get_symbol_constraint(X).truthiness(),
        Truthiness::Unknown
    );
}

#[test]
fn test_constraining_unknown_is_not_a_contradiction() {
    let state = ProgramState::empty_state();
    let result = state
        .constrain(Some(&SymbolicValue::Unknown), Some(Constraint::NULL))
        .unwrap();
    assert_eq!(result, state);
}

// ============================================================
// 2. Strict-equality constraint propagation
// ============================================================

#[test]
fn test_truthiness_propagates_across_strict_equality() {
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, None)
        .unwrap()
        .new_symbolic_value(Y, None)
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();
    let vy = state.get_symbolic_value(Y).unwrap().clone();

    let state = state.add_relation(Relation::new(
        RelationOperator::StrictEqual,
        vx.clone(),
        vy,
    ));
    let state = state
        .constrain(Some(&vx), Some(Constraint::TRUTHY))
        .unwrap();

    assert_eq!(state.get_symbol_constraint(X), Constraint::TRUTHY);
    assert_eq!(state.get_symbol_constraint(Y), Constraint::TRUTHY);
}

#[test]
fn test_propagation_contradiction_kills_the_path() {
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, None)
        .unwrap()
        .new_symbolic_value(Y, Some(Constraint::FALSY))
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();
    let vy = state.get_symbolic_value(Y).unwrap().clone();

    let state = state.add_relation(Relation::new(RelationOperator::StrictEqual, vx.clone(), vy));

    // x === y with y falsy: x cannot be truthy on this path.
    assert!(state
        .constrain(Some(&vx), Some(Constraint::TRUTHY))
        .is_none());
}

// ============================================================
// 3. Identifier-insensitive state equivalence
// ============================================================

#[test]
fn test_equivalence_ignores_fresh_value_numbering() {
    // Same facts, reached in opposite binding order, so the raw fresh
    // ids backing x and y are swapped between the two states.
    let build = |first: SymbolId, second: SymbolId| -> ProgramState {
        let state = ProgramState::empty_state()
            .new_symbolic_value(first, None)
            .unwrap()
            .new_symbolic_value(second, None)
            .unwrap();
        let vx = state.get_symbolic_value(X).unwrap().clone();
        let vy = state.get_symbolic_value(Y).unwrap().clone();
        let state = state.add_relation(Relation::new(RelationOperator::StrictEqual, vx.clone(), vy));
        state.constrain(Some(&vx), Some(Constraint::TRUTHY)).unwrap()
    };

    let forward = build(X, Y);
    let backward = build(Y, X);

    assert_eq!(forward, backward);
    assert_eq!(hash_of(&forward), hash_of(&backward));
}

#[test]
fn test_equivalence_distinguishes_alias_partitions() {
    // x and y aliasing one value is a different state from x and y
    // bound to two values, even with identical per-symbol constraints.
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, None)
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();
    let aliased = state.assign(Y, vx);

    let separate = state.new_symbolic_value(Y, None).unwrap();

    assert_ne!(aliased, separate);
}

#[test]
fn test_equivalence_tracks_bound_functions() {
    let function_at_3 = FunctionRef(NodeRef::new(10, 3));
    let function_at_9 = FunctionRef(NodeRef::new(20, 9));

    let base = ProgramState::empty_state();
    let first = base.new_function_symbolic_value(X, function_at_3);
    let same = base.new_function_symbolic_value(X, function_at_3);
    let other = base.new_function_symbolic_value(X, function_at_9);

    assert_eq!(first, same);
    assert_eq!(hash_of(&first), hash_of(&same));
    assert_ne!(first, other);
}

#[test]
fn test_state_set_detects_loop_fixpoint() {
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, Some(Constraint::NOT_NULLY))
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();

    let mut visited = StateSet::new();
    let mut current = state;
    let mut iterations = 0;
    loop {
        iterations += 1;
        if !visited.insert(current.clone()) {
            break; // nothing new learned: fixpoint
        }
        // Loop body re-learns a fact that is already known.
        current = current
            .constrain(Some(&vx), Some(Constraint::NOT_NULLY))
            .unwrap();
    }

    assert_eq!(iterations, 2);
    assert_eq!(visited.len(), 1);
}

// ============================================================
// 4. Statement walks through the ports
// ============================================================

#[test]
fn test_assignment_statement_from_built_in() {
    // Models `x = Math;` where "Math" is not a tracked variable, so the
    // identifier resolves through the built-in registry.
    let expression = NodeRef::new(1, 5);
    let evaluator = IdentifierExpression {
        name: "Math",
        resolver: TableResolver::new(&[("x", X)]),
    };

    let state = ProgramState::empty_state()
        .execute(expression, &evaluator)
        .assign_from_stack(X)
        .unwrap()
        .clear_stack(expression)
        .unwrap();

    state.assert_empty_stack(expression).unwrap();
    assert_eq!(
        state.get_symbol_constraint(X),
        Constraint::OTHER_OBJECT
    );
    assert_eq!(
        state.get_symbol_constraint(X).truthiness(),
        Truthiness::Truthy
    );
}

#[test]
fn test_assignment_statement_from_unresolved_identifier() {
    // Models `y = mystery;` where nothing resolves: the unknown sentinel
    // is pushed, and assignment manifests a fresh value in its place.
    let expression = NodeRef::new(2, 8);
    let evaluator = IdentifierExpression {
        name: "mystery",
        resolver: TableResolver::new(&[("y", Y)]),
    };

    let state = ProgramState::empty_state()
        .execute(expression, &evaluator)
        .assign_from_stack(Y)
        .unwrap();

    let bound = state.get_symbolic_value(Y).unwrap().clone();
    assert!(matches!(bound, SymbolicValue::Fresh(_)));
    assert_eq!(state.peek_stack(), Some(&bound));
    assert_eq!(state.get_symbol_constraint(Y), Constraint::ANY_VALUE);

    let state = state.clear_stack(expression).unwrap();
    state.assert_empty_stack(expression).unwrap();
}

#[test]
fn test_tracked_identifier_resolves_to_binding() {
    let resolver = TableResolver::new(&[("x", X)]);
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, None)
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();

    assert_eq!(state.resolve_identifier("x", &resolver), Some(vx));
    assert_eq!(
        state.resolve_identifier("JSON", &resolver).map(|v| v.to_string()),
        Some("JSON".to_string())
    );
    assert_eq!(state.resolve_identifier("nope", &resolver), None);
}

// ============================================================
// 5. Scope-end projection and garbage collection
// ============================================================

#[test]
fn test_scope_end_drops_facts_of_unbound_values() {
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, Some(Constraint::TRUTHY))
        .unwrap()
        .new_symbolic_value(Y, None)
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();
    let vy = state.get_symbolic_value(Y).unwrap().clone();
    let state = state.add_relation(Relation::new(
        RelationOperator::StrictEqual,
        vx.clone(),
        vy,
    ));

    // y's scope ends; only x survives.
    let keep: rustc_hash::FxHashSet<SymbolId> = [X].into_iter().collect();
    let state = state.remove_symbols(&keep);

    assert_eq!(state.values().len(), 1);
    assert!(state.relations().is_empty());
    assert_eq!(state.get_constraint(Some(&vx)), Constraint::TRUTHY);
}

// ============================================================
// 6. Error-channel separation
// ============================================================

#[test]
fn test_infeasible_path_is_not_an_error() {
    let state = ProgramState::empty_state()
        .new_symbolic_value(X, Some(Constraint::NULL))
        .unwrap();
    let vx = state.get_symbolic_value(X).unwrap().clone();

    // Absence of a result, not a StateError: the driver prunes the path.
    assert!(state
        .constrain(Some(&vx), Some(Constraint::TRUTHY))
        .is_none());
}

#[test]
fn test_stack_shape_violations_are_errors() {
    let node = NodeRef::new(3, 11);
    let state = ProgramState::empty_state();

    assert!(matches!(
        state.clear_stack(node),
        Err(StateError::StackNotSingleton { line: 11, .. })
    ));
    assert_eq!(state.remove_last_value(), Err(StateError::EmptyStack));

    let state = state.push_to_stack(SymbolicValue::Unknown);
    assert!(matches!(
        state.assert_empty_stack(node),
        Err(StateError::StackNotEmpty { line: 11, .. })
    ));
}
