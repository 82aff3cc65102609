/*
 * Symbolic Execution Infrastructure
 *
 * Built-in value definitions and their name registry.
 */

mod built_in;

pub use built_in::{BuiltInRegistry, BuiltInValue};
