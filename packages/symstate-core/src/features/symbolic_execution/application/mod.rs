/*
 * Symbolic Execution Application Layer
 *
 * Driver-facing use cases built on the domain model.
 */

mod state_set;

pub use state_set::StateSet;
