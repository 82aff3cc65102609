//! Symbol identities
//!
//! Symbols are owned by an external symbol table; this crate only maps
//! them to symbolic values and never creates or destroys them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a source-level variable or binding
///
/// Issued by the external scope resolver. Program states key their
/// variable bindings by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym#{}", self.0)
    }
}
