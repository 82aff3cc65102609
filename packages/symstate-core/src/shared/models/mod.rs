//! Shared models

mod symbol;
mod syntax;

pub use symbol::SymbolId;
pub use syntax::{FunctionRef, NodeRef};
