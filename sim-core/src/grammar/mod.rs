//! Parametric L-system: symbol parsing and generation rewriting.

mod rules;
mod symbol;

pub use rules::{RuleSet, Successor, TransformFn, rewrite};
pub use symbol::{Symbol, SymbolString, parse};
