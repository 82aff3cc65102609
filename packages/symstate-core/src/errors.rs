//! Error types for symstate-core
//!
//! Provides the internal-consistency failure channel. These errors mean a
//! caller violated the state machinery's own invariants; a driver must
//! abort the analysis invocation on them. They are kept strictly apart
//! from path infeasibility, which constraining operations signal by
//! returning no state at all.

use thiserror::Error;

/// Internal-consistency violation raised by a defensive state check
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// An initial constraint was recorded for a value that already has one
    #[error("initial constraint recorded twice for {value}")]
    DuplicateInitialConstraint {
        /// Rendering of the offending value
        value: String,
    },

    /// The operand stack must hold exactly one element before being cleared
    #[error("stack should contain only one element before being cleaned at line {line}: {stack}")]
    StackNotSingleton {
        /// Line of the syntax node being executed
        line: u32,
        /// Rendering of the offending stack
        stack: String,
    },

    /// The operand stack was expected to be empty
    #[error("stack should be empty at line {line}: {stack}")]
    StackNotEmpty {
        /// Line of the syntax node being executed
        line: u32,
        /// Rendering of the offending stack
        stack: String,
    },

    /// An operation needed an operand on the stack and found none
    #[error("expression stack is empty")]
    EmptyStack,
}

/// Result type alias for operations with defensive preconditions
pub type Result<T> = std::result::Result<T, StateError>;
