//! Syntax handles
//!
//! The AST lives outside this crate. States only carry opaque handles to
//! syntax nodes: function-bound values keep one so later calls can be
//! modeled, and defensive checks report the node's line on violation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an external syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    /// Node id in the external AST
    pub id: u32,

    /// Source line, carried for diagnostics only
    pub line: u32,
}

impl NodeRef {
    pub fn new(id: u32, line: u32) -> Self {
        Self { id, line }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}@L{}", self.id, self.line)
    }
}

/// Handle to a function's syntax, wrapped by function-bound values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionRef(pub NodeRef);

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn@L{}", self.0.line)
    }
}
