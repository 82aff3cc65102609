//! Built-in Values
//!
//! Well-known global singletons an identifier may resolve to when the
//! scope resolver does not track it as a variable. These are pluggable
//! value kinds: they contribute their intrinsic constraints but are not
//! part of the state machinery itself.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::symbolic_execution::domain::{Constraint, SymbolicValue};

/// Well-known global singleton value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltInValue {
    /// `Object` constructor
    Object,
    /// `Function` constructor
    Function,
    /// `Array` constructor
    Array,
    /// `String` constructor
    String,
    /// `Number` constructor
    Number,
    /// `Boolean` constructor
    Boolean,
    /// `Date` constructor
    Date,
    /// `RegExp` constructor
    RegExp,
    /// `Math` namespace object
    Math,
    /// `JSON` namespace object
    Json,
}

impl BuiltInValue {
    /// Global name this value is looked up by
    pub fn name(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Function => "Function",
            Self::Array => "Array",
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::RegExp => "RegExp",
            Self::Math => "Math",
            Self::Json => "JSON",
        }
    }

    /// Intrinsic constraint: constructors are callables, namespaces are
    /// plain objects; all of them are truthy and never nully.
    pub fn base_constraint(self) -> Constraint {
        match self {
            Self::Math | Self::Json => Constraint::OTHER_OBJECT,
            _ => Constraint::FUNCTION,
        }
    }
}

impl fmt::Display for BuiltInValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const ALL: [BuiltInValue; 10] = [
    BuiltInValue::Object,
    BuiltInValue::Function,
    BuiltInValue::Array,
    BuiltInValue::String,
    BuiltInValue::Number,
    BuiltInValue::Boolean,
    BuiltInValue::Date,
    BuiltInValue::RegExp,
    BuiltInValue::Math,
    BuiltInValue::Json,
];

static REGISTRY: Lazy<FxHashMap<&'static str, BuiltInValue>> = Lazy::new(|| {
    ALL.iter().map(|built_in| (built_in.name(), *built_in)).collect()
});

/// Name lookup over the built-in singletons
pub struct BuiltInRegistry;

impl BuiltInRegistry {
    /// Singleton value for `name`, if it names a known built-in
    pub fn find(name: &str) -> Option<SymbolicValue> {
        REGISTRY.get(name).map(|built_in| SymbolicValue::BuiltIn(*built_in))
    }
}
