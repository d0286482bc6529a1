use super::symbol::{Symbol, SymbolString, parse};
use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A pure function from a predecessor symbol to one successor symbol.
pub type TransformFn = Arc<dyn Fn(&Symbol) -> Symbol + Send + Sync>;

/// One element of a production's right-hand side.
#[derive(Clone)]
pub enum Successor {
    /// Copied verbatim into the output.
    Literal(Symbol),
    /// Called with the symbol being rewritten.
    Transform(TransformFn),
}

impl Successor {
    pub fn transform(f: impl Fn(&Symbol) -> Symbol + Send + Sync + 'static) -> Self {
        Self::Transform(Arc::new(f))
    }

    pub fn produce(&self, predecessor: &Symbol) -> Symbol {
        match self {
            Successor::Literal(symbol) => symbol.clone(),
            Successor::Transform(f) => f(predecessor),
        }
    }
}

impl fmt::Debug for Successor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Successor::Literal(symbol) => f.debug_tuple("Literal").field(symbol).finish(),
            Successor::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

impl From<Symbol> for Successor {
    fn from(symbol: Symbol) -> Self {
        Successor::Literal(symbol)
    }
}

/// Production table keyed by tag.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: HashMap<char, Vec<Successor>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the production for `tag`.
    pub fn with_rule(mut self, tag: char, successors: Vec<Successor>) -> Self {
        self.insert(tag, successors);
        self
    }

    pub fn insert(&mut self, tag: char, successors: Vec<Successor>) {
        self.rules.insert(tag, successors);
    }

    /// Adds a literal-only production parsed from `text`.
    pub fn insert_literal(&mut self, tag: char, text: &str) -> Result<()> {
        let successors = parse(text)?.iter().cloned().map(Successor::Literal).collect();
        self.insert(tag, successors);
        Ok(())
    }

    pub fn get(&self, tag: char) -> Option<&[Successor]> {
        self.rules.get(&tag).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rewrites `axiom` for exactly `iterations` generations.
///
/// Each generation is a single context-free pass: a symbol whose tag has a
/// production is replaced by that production's successors, anything else
/// is copied. Transforms see only the symbol of the previous generation.
///
/// ### Parameters
/// - `axiom` - Starting string; left untouched.
/// - `rules` - Productions by tag.
/// - `iterations` - Number of generations; `0` returns a copy of `axiom`.
///
/// ### Returns
/// A fresh [`SymbolString`] for the final generation.
pub fn rewrite(axiom: &SymbolString, rules: &RuleSet, iterations: usize) -> SymbolString {
    let mut current = axiom.clone();

    for generation in 0..iterations {
        let mut next = Vec::with_capacity(current.len() * 2);
        for symbol in &current {
            match rules.get(symbol.tag()) {
                Some(successors) => {
                    next.extend(successors.iter().map(|s| s.produce(symbol)));
                }
                None => next.push(symbol.clone()),
            }
        }
        current = SymbolString::new(next);
        tracing::debug!(generation = generation + 1, len = current.len(), "rewrote generation");
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn growth_rules() -> RuleSet {
        RuleSet::new().with_rule(
            'F',
            vec![
                Symbol::new('F', vec![1.0]).into(),
                Successor::transform(|s| s.map_first(|p| p + 1.0)),
            ],
        )
    }

    #[test]
    fn rewrite_without_rules_is_identity() {
        let axiom = parse("F(1)[+(30)F(2)L]A").unwrap();
        let rules = RuleSet::new();
        for n in 0..4 {
            assert_eq!(rewrite(&axiom, &rules, n), axiom);
        }
    }

    #[test]
    fn growth_rule_matches_closed_form() {
        let axiom = parse("F(1)").unwrap();
        let rules = growth_rules();

        let params = |n| -> Vec<f32> {
            rewrite(&axiom, &rules, n)
                .iter()
                .map(|s| s.params()[0])
                .collect()
        };

        assert_eq!(params(0), vec![1.0]);
        assert_eq!(params(1), vec![1.0, 2.0]);
        assert_eq!(params(2), vec![1.0, 2.0, 1.0, 3.0]);
        assert_eq!(rewrite(&axiom, &rules, 5).len(), 32);
    }

    #[test]
    fn rules_observe_only_previous_generation() {
        let rules = RuleSet::new()
            .with_rule('A', vec![Symbol::bare('B').into()])
            .with_rule('B', vec![Symbol::bare('A').into()]);
        let axiom = parse("AB").unwrap();

        assert_eq!(rewrite(&axiom, &rules, 1).to_string(), "BA");
        assert_eq!(rewrite(&axiom, &rules, 2).to_string(), "AB");
    }

    #[test]
    fn unmatched_symbols_keep_their_position() {
        let mut rules = RuleSet::new();
        rules.insert_literal('X', "F[X]").unwrap();
        let axiom = parse("+X-").unwrap();

        assert_eq!(rewrite(&axiom, &rules, 1).to_string(), "+F[X]-");
        assert_eq!(rewrite(&axiom, &rules, 2).to_string(), "+F[F[X]]-");
    }

    #[test]
    fn literal_rule_with_bad_text_fails() {
        let mut rules = RuleSet::new();
        assert!(rules.insert_literal('X', "F(").is_err());
        assert!(rules.is_empty());
    }

    #[test]
    fn axiom_is_not_mutated() {
        let axiom = parse("F(1)").unwrap();
        let before = axiom.clone();
        let _ = rewrite(&axiom, &growth_rules(), 3);
        assert_eq!(axiom, before);
    }
}
