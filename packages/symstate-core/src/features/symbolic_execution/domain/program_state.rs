//! Program State
//!
//! Immutable snapshot of the abstract interpreter state at one
//! control-flow point: variable bindings, constraints on symbolic values,
//! recorded relations, and the pending expression operand stack. The same
//! state may be valid for several program points, and one program point
//! may hold several states depending on the execution path.
//!
//! Every transition returns a new state; nothing is ever mutated in
//! place, so concurrent exploration paths can share predecessors freely.
//!
//! # Garbage collection
//! The invariant-restoring constructor prunes facts about values that are
//! no longer reachable (bound by a symbol or sitting on top of the
//! stack), keeping a live state's footprint proportional to its reachable
//! bindings rather than to the history of the path that produced it.
//!
//! # Fixpoint equivalence
//! `Eq`/`Hash` implement a structural, identifier-insensitive comparison:
//! fresh value ids minted along different paths are erased by comparing
//! symbol co-reference groups, per-symbol constraints, and relations
//! projected onto symbols. Loop analysis terminates because
//! independently-derived equal states actually compare equal.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, trace};

use super::constraint::Constraint;
use super::expression_stack::ExpressionStack;
use super::relation::{Relation, RelationOnSymbols, RelationOperator};
use super::symbolic_value::SymbolicValue;
use crate::errors::{Result, StateError};
use crate::features::symbolic_execution::infrastructure::BuiltInRegistry;
use crate::features::symbolic_execution::ports::{OperandEvaluator, SymbolResolver};
use crate::shared::models::{FunctionRef, NodeRef, SymbolId};

/// Immutable snapshot of abstract interpreter state
#[derive(Debug, Clone)]
pub struct ProgramState {
    values: FxHashMap<SymbolId, SymbolicValue>,
    constraints: FxHashMap<SymbolicValue, Constraint>,
    relations: FxHashSet<Relation>,
    stack: ExpressionStack,
    counter: u32,
}

impl ProgramState {
    /// Invariant-restoring constructor: drops constraints on unreachable
    /// values and relations with an unreachable operand.
    ///
    /// Reachable = bound by some symbol, or equal to the stack top. Lower
    /// stack slots intentionally do not keep values alive.
    fn new(
        values: FxHashMap<SymbolId, SymbolicValue>,
        constraints: FxHashMap<SymbolicValue, Constraint>,
        relations: FxHashSet<Relation>,
        stack: ExpressionStack,
        counter: u32,
    ) -> Self {
        let mut reachable: FxHashSet<&SymbolicValue> = values.values().collect();
        if let Some(top) = stack.peek() {
            reachable.insert(top);
        }

        let kept_constraints: FxHashMap<SymbolicValue, Constraint> = constraints
            .iter()
            .filter(|(value, _)| reachable.contains(value))
            .map(|(value, constraint)| (value.clone(), *constraint))
            .collect();

        let kept_relations: FxHashSet<Relation> = relations
            .iter()
            .filter(|relation| {
                reachable.contains(relation.left_operand())
                    && reachable.contains(relation.right_operand())
            })
            .cloned()
            .collect();

        let dropped = (constraints.len() - kept_constraints.len())
            + (relations.len() - kept_relations.len());
        if dropped > 0 {
            trace!(dropped, "pruned facts about unreachable values");
        }

        Self {
            values,
            constraints: kept_constraints,
            relations: kept_relations,
            stack,
            counter,
        }
    }

    /// The unique starting state: nothing bound, nothing known
    pub fn empty_state() -> Self {
        Self {
            values: FxHashMap::default(),
            constraints: FxHashMap::default(),
            relations: FxHashSet::default(),
            stack: ExpressionStack::empty(),
            counter: 0,
        }
    }

    fn next_value(&self) -> (SymbolicValue, u32) {
        (SymbolicValue::Fresh(self.counter), self.counter + 1)
    }

    /// Bind `symbol` to a brand-new fresh value, recording `constraint`
    /// for it if one is supplied.
    ///
    /// Recording an initial constraint for a value that already has one
    /// is an internal-consistency violation.
    pub fn new_symbolic_value(
        &self,
        symbol: SymbolId,
        constraint: Option<Constraint>,
    ) -> Result<ProgramState> {
        let (value, counter) = self.next_value();

        let mut values = self.values.clone();
        values.insert(symbol, value.clone());
        let state = Self::new(
            values,
            self.constraints.clone(),
            self.relations.clone(),
            self.stack.clone(),
            counter,
        );

        match constraint {
            Some(constraint) => state.add_initial_constraint(&value, constraint),
            None => Ok(state),
        }
    }

    /// Bind `symbol` to a value known to be the function `function`
    ///
    /// No constraint is stored; the intrinsic one is derived lazily from
    /// the value's kind.
    pub fn new_function_symbolic_value(
        &self,
        symbol: SymbolId,
        function: FunctionRef,
    ) -> ProgramState {
        let mut values = self.values.clone();
        values.insert(symbol, SymbolicValue::Function(function));
        Self::new(
            values,
            self.constraints.clone(),
            self.relations.clone(),
            self.stack.clone(),
            self.counter,
        )
    }

    // Records the very first constraint for a value. Only ever valid for
    // values nobody has constrained yet.
    fn add_initial_constraint(
        &self,
        value: &SymbolicValue,
        constraint: Constraint,
    ) -> Result<ProgramState> {
        if self.constraints.contains_key(value) {
            return Err(StateError::DuplicateInitialConstraint {
                value: value.to_string(),
            });
        }
        let mut constraints = self.constraints.clone();
        constraints.insert(value.clone(), constraint);
        Ok(Self::new(
            self.values.clone(),
            constraints,
            self.relations.clone(),
            self.stack.clone(),
            self.counter,
        ))
    }

    /// Apply `constraint` to `value`, propagating the result to every
    /// value proven strictly equal to it.
    ///
    /// Returns `None` when the new fact contradicts what is already known
    /// (directly, through a dependency, or through an equivalent value):
    /// the path being modeled cannot occur. A missing value or constraint
    /// and the unknown sentinel are deliberate no-ops, not contradictions.
    pub fn constrain(
        &self,
        value: Option<&SymbolicValue>,
        constraint: Option<Constraint>,
    ) -> Option<ProgramState> {
        let (Some(target), Some(applied)) = (value, constraint) else {
            return Some(self.clone());
        };
        if *target == SymbolicValue::Unknown {
            return Some(self.clone());
        }

        let state = self.constrain_without_equivalent(target, applied)?;

        // Propagate the constraint actually stored, not the caller's raw
        // input, one hop across strict-equality relations.
        let resulting = state.get_constraint(Some(target));
        let mut state = state;
        for equivalent in self.equivalent_values(target) {
            state = state.constrain_without_equivalent(&equivalent, resulting)?;
        }
        Some(state)
    }

    fn constrain_without_equivalent(
        &self,
        value: &SymbolicValue,
        constraint: Constraint,
    ) -> Option<ProgramState> {
        if *value == SymbolicValue::Unknown {
            return Some(self.clone());
        }

        let existing = self.get_constraint(Some(value));
        if existing.is_incompatible_with(constraint) {
            debug!(value = %value, existing = %existing, applied = %constraint,
                "contradiction: path infeasible");
            return None;
        }

        let mut constraints = self.constraints.clone();
        constraints.insert(value.clone(), existing.and(constraint));
        let state = Self::new(
            self.values.clone(),
            constraints,
            self.relations.clone(),
            self.stack.clone(),
            self.counter,
        );
        value.constrain_dependencies(state, constraint)
    }

    // Values connected to `value` by a strict-equality relation. One hop
    // only; no transitive closure beyond relations already recorded.
    fn equivalent_values(&self, value: &SymbolicValue) -> FxHashSet<SymbolicValue> {
        let mut equivalents = FxHashSet::default();
        for relation in &self.relations {
            if relation.operator() != RelationOperator::StrictEqual {
                continue;
            }
            if relation.left_operand() == value {
                equivalents.insert(relation.right_operand().clone());
            } else if relation.right_operand() == value {
                equivalents.insert(relation.left_operand().clone());
            }
        }
        equivalents
    }

    /// Everything known about `value`: the stored constraint (or top if
    /// none) intersected with the value's intrinsic constraint.
    pub fn get_constraint(&self, value: Option<&SymbolicValue>) -> Constraint {
        match value {
            None => Constraint::ANY_VALUE,
            Some(value) => {
                let stored = self
                    .constraints
                    .get(value)
                    .copied()
                    .unwrap_or(Constraint::ANY_VALUE);
                stored.and(value.base_constraint(self))
            }
        }
    }

    /// Constraint on the value currently bound to `symbol`
    pub fn get_symbol_constraint(&self, symbol: SymbolId) -> Constraint {
        self.get_constraint(self.get_symbolic_value(symbol))
    }

    /// Value currently bound to `symbol`, if any
    pub fn get_symbolic_value(&self, symbol: SymbolId) -> Option<&SymbolicValue> {
        self.values.get(&symbol)
    }

    /// Resolve an identifier occurrence: a tracked binding's value if the
    /// scope resolver knows it, otherwise a well-known built-in by name.
    pub fn resolve_identifier(
        &self,
        identifier: &str,
        resolver: &dyn SymbolResolver,
    ) -> Option<SymbolicValue> {
        match resolver.tracked_variable(identifier) {
            Some(symbol) => self.get_symbolic_value(symbol).cloned(),
            None => BuiltInRegistry::find(identifier),
        }
    }

    /// New state with `value` pushed onto the operand stack
    pub fn push_to_stack(&self, value: SymbolicValue) -> ProgramState {
        Self::new(
            self.values.clone(),
            self.constraints.clone(),
            self.relations.clone(),
            self.stack.push(value),
            self.counter,
        )
    }

    /// New state without the stack top
    pub fn remove_last_value(&self) -> Result<ProgramState> {
        let stack = self.stack.remove_last_value().ok_or(StateError::EmptyStack)?;
        Ok(Self::new(
            self.values.clone(),
            self.constraints.clone(),
            self.relations.clone(),
            stack,
            self.counter,
        ))
    }

    /// New state whose stack reflects evaluating `expression`
    ///
    /// The per-expression-kind semantics are the evaluator's business.
    pub fn execute(&self, expression: NodeRef, evaluator: &dyn OperandEvaluator) -> ProgramState {
        let stack = evaluator.evaluate(expression, self, &self.stack);
        Self::new(
            self.values.clone(),
            self.constraints.clone(),
            self.relations.clone(),
            stack,
            self.counter,
        )
    }

    /// New state with the given operand stack
    pub fn with_stack(&self, stack: ExpressionStack) -> ProgramState {
        Self::new(
            self.values.clone(),
            self.constraints.clone(),
            self.relations.clone(),
            stack,
            self.counter,
        )
    }

    /// Empty the stack after a full statement was evaluated
    ///
    /// Defensive precondition: the stack must hold exactly the statement's
    /// one result value. Anything else means the state machinery's
    /// invariants were violated by the caller.
    pub fn clear_stack(&self, node: NodeRef) -> Result<ProgramState> {
        if self.stack.size() != 1 {
            return Err(StateError::StackNotSingleton {
                line: node.line,
                stack: self.stack.to_string(),
            });
        }
        Ok(Self::new(
            self.values.clone(),
            self.constraints.clone(),
            self.relations.clone(),
            ExpressionStack::empty(),
            self.counter,
        ))
    }

    /// Defensive check that no operands are pending; no state change
    pub fn assert_empty_stack(&self, node: NodeRef) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(StateError::StackNotEmpty {
                line: node.line,
                stack: self.stack.to_string(),
            });
        }
        Ok(())
    }

    /// Top of the operand stack
    pub fn peek_stack(&self) -> Option<&SymbolicValue> {
        self.stack.peek()
    }

    /// Value `n` slots below the top (`0` is the top)
    pub fn peek_stack_n(&self, n: usize) -> Option<&SymbolicValue> {
        self.stack.peek_n(n)
    }

    /// Bind `symbol` to the current stack top
    ///
    /// An unknown top is first replaced on the stack by a freshly minted
    /// value, so the assigned variable has a concrete identity to attach
    /// constraints to.
    pub fn assign_from_stack(&self, symbol: SymbolId) -> Result<ProgramState> {
        let top = self.stack.peek().ok_or(StateError::EmptyStack)?.clone();

        let (value, stack, counter) = if top == SymbolicValue::Unknown {
            let (fresh, counter) = self.next_value();
            let stack = self
                .stack
                .remove_last_value()
                .ok_or(StateError::EmptyStack)?
                .push(fresh.clone());
            (fresh, stack, counter)
        } else {
            (top, self.stack.clone(), self.counter)
        };

        let mut values = self.values.clone();
        values.insert(symbol, value);
        Ok(Self::new(
            values,
            self.constraints.clone(),
            self.relations.clone(),
            stack,
            counter,
        ))
    }

    /// Bind `symbol` directly to `value`, bypassing the stack
    pub fn assign(&self, symbol: SymbolId, value: SymbolicValue) -> ProgramState {
        let mut values = self.values.clone();
        values.insert(symbol, value);
        Self::new(
            values,
            self.constraints.clone(),
            self.relations.clone(),
            self.stack.clone(),
            self.counter,
        )
    }

    /// New state additionally knowing `relation`
    pub fn add_relation(&self, relation: Relation) -> ProgramState {
        let mut relations = self.relations.clone();
        relations.insert(relation);
        Self::new(
            self.values.clone(),
            self.constraints.clone(),
            relations,
            self.stack.clone(),
            self.counter,
        )
    }

    /// Project the bindings down to `symbols_to_keep` (a lexical scope
    /// ended); facts about values that become unreachable are dropped.
    pub fn remove_symbols(&self, symbols_to_keep: &FxHashSet<SymbolId>) -> ProgramState {
        let values: FxHashMap<SymbolId, SymbolicValue> = self
            .values
            .iter()
            .filter(|(symbol, _)| symbols_to_keep.contains(*symbol))
            .map(|(symbol, value)| (*symbol, value.clone()))
            .collect();
        Self::new(
            values,
            self.constraints.clone(),
            self.relations.clone(),
            self.stack.clone(),
            self.counter,
        )
    }

    /// Current variable bindings
    pub fn values(&self) -> &FxHashMap<SymbolId, SymbolicValue> {
        &self.values
    }

    /// Recorded relations
    pub fn relations(&self) -> &FxHashSet<Relation> {
        &self.relations
    }

    /// Pending operand stack
    pub fn stack(&self) -> &ExpressionStack {
        &self.stack
    }

    // ------------------------------------------------------------------
    // Structural equivalence, erasing fresh value identities
    // ------------------------------------------------------------------

    // Groups of symbols currently aliasing the same value. Singleton
    // groups carry no aliasing information and are excluded.
    fn symbol_overlaps(&self) -> FxHashSet<BTreeSet<SymbolId>> {
        let mut by_value: FxHashMap<&SymbolicValue, BTreeSet<SymbolId>> = FxHashMap::default();
        for (symbol, value) in &self.values {
            by_value.entry(value).or_default().insert(*symbol);
        }
        by_value
            .into_values()
            .filter(|group| group.len() > 1)
            .collect()
    }

    fn constraints_by_symbol(&self) -> BTreeMap<SymbolId, Constraint> {
        self.values
            .iter()
            .map(|(symbol, value)| (*symbol, self.get_constraint(Some(value))))
            .collect()
    }

    fn functions_by_symbol(&self) -> BTreeMap<SymbolId, FunctionRef> {
        self.values
            .iter()
            .filter_map(|(symbol, value)| match value {
                SymbolicValue::Function(function) => Some((*symbol, *function)),
                _ => None,
            })
            .collect()
    }

    // Relations projected onto every symbol pair denoting their operands.
    // Relations whose operands no symbol denotes (e.g. the stack top) do
    // not participate in the comparison.
    fn relations_on_symbols(&self) -> BTreeSet<RelationOnSymbols> {
        let mut symbols_by_value: FxHashMap<&SymbolicValue, Vec<SymbolId>> = FxHashMap::default();
        for (symbol, value) in &self.values {
            symbols_by_value.entry(value).or_default().push(*symbol);
        }

        let mut projected = BTreeSet::new();
        for relation in &self.relations {
            let Some(lefts) = symbols_by_value.get(relation.left_operand()) else {
                continue;
            };
            let Some(rights) = symbols_by_value.get(relation.right_operand()) else {
                continue;
            };
            for &left in lefts {
                for &right in rights {
                    projected.insert(RelationOnSymbols::new(relation.operator(), left, right));
                }
            }
        }
        projected
    }

    fn constraint_on_peek(&self) -> Option<Constraint> {
        self.stack.peek().map(|top| self.get_constraint(Some(top)))
    }
}

impl PartialEq for ProgramState {
    /// Structural, identifier-insensitive comparison used for fixpoint
    /// termination: which symbols co-refer, what each symbol is
    /// constrained to, the operand stack and its top constraint, bound
    /// functions, and relations over symbols. Raw fresh ids never decide
    /// the outcome of the symbol-level comparisons.
    fn eq(&self, other: &Self) -> bool {
        self.symbol_overlaps() == other.symbol_overlaps()
            && self.constraints_by_symbol() == other.constraints_by_symbol()
            && self.stack == other.stack
            && self.constraint_on_peek() == other.constraint_on_peek()
            && self.functions_by_symbol() == other.functions_by_symbol()
            && self.relations_on_symbols() == other.relations_on_symbols()
    }
}

impl Eq for ProgramState {}

impl Hash for ProgramState {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        // Only order-independent reductions of the compared components,
        // so equal states hash equal.
        for (symbol, constraint) in self.constraints_by_symbol() {
            symbol.hash(hasher);
            constraint.hash(hasher);
        }
        self.stack.hash(hasher);
        self.constraint_on_peek().hash(hasher);
        for relation in self.relations_on_symbols() {
            relation.hash(hasher);
        }
        for (symbol, function) in self.functions_by_symbol() {
            symbol.hash(hasher);
            function.hash(hasher);
        }
    }
}

impl fmt::Display for ProgramState {
    /// Diagnostic rendering for humans; the format is not contractual.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bindings: Vec<String> = self
            .values
            .iter()
            .map(|(symbol, value)| format!("{symbol}={value}"))
            .collect();
        bindings.sort();

        let mut constraints: Vec<String> = self
            .constraints
            .iter()
            .map(|(value, constraint)| format!("{value}:{constraint}"))
            .collect();
        constraints.sort();

        let mut relations: Vec<String> =
            self.relations.iter().map(|r| r.to_string()).collect();
        relations.sort();

        write!(
            f,
            "[{{{}}}; {{{}}}; {}; {{{}}}]",
            bindings.join(", "),
            constraints.join(", "),
            self.stack,
            relations.join(", ")
        )
    }
}
