//! Ready-made plant grammars and config-driven grammar sources.
//!
//! Presets read their seed lengths, angles and growth factors from
//! [`PlantParams`], so one record drives both rewriting and drawing.

use crate::config::PlantParams;
use crate::error::{Result, SimError};
use crate::grammar::{RuleSet, Successor, Symbol, SymbolString, parse, rewrite};
use crate::turtle::{Primitive, Turtle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Three branches per node with the 94.74° / 132.62° divergence
    /// angles; older segments lengthen and thicken every generation.
    #[default]
    TernaryTree,
    /// Planar fern driven by an `X` placeholder.
    Fern,
    /// Two branches per node, each rolled by a random angle.
    Bush,
}

impl Preset {
    /// Builds the axiom and production table for this preset.
    pub fn build(self, params: &PlantParams) -> Result<(SymbolString, RuleSet)> {
        let l = params.length;
        let w = params.thickness;
        let a = params.branch_angle;
        let leaf = format!("[^({})L]", params.leaf_angle);

        let (axiom, rules) = match self {
            Preset::TernaryTree => {
                let branch = format!("[&({a})F({l}){leaf}A]");
                let axiom = parse(&format!("!({w})F({l})/(45)A"))?;
                let mut rules = growth_rules(params);
                rules.insert_literal(
                    'A',
                    &format!("!({w})F({l}){branch}/(94.74){branch}/(132.62){branch}"),
                )?;
                (axiom, rules)
            }
            Preset::Fern => {
                let axiom = parse(&format!("!({w})X"))?;
                let mut rules = growth_rules(params);
                rules.insert_literal(
                    'X',
                    &format!("F({l})-({a})[[X]+({a})X]+({a})F({l})[+({a})F({l}){leaf}X]-({a})X"),
                )?;
                (axiom, rules)
            }
            Preset::Bush => {
                let branch = format!("[&({a})F({l}){leaf}A]");
                let axiom = parse(&format!("!({w})F({l})A"))?;
                let mut rules = growth_rules(params);
                rules.insert_literal('A', &format!("!({w})?{branch}?{branch}"))?;
                (axiom, rules)
            }
        };
        Ok((axiom, rules))
    }
}

/// `F(l) -> F(l * length_scale)` and `!(w) -> !(w * thickness_scale)`.
fn growth_rules(params: &PlantParams) -> RuleSet {
    let length_scale = params.length_scale;
    let thickness_scale = params.thickness_scale;
    RuleSet::new()
        .with_rule(
            'F',
            vec![Successor::transform(move |s: &Symbol| {
                s.map_first(|l| l * length_scale)
            })],
        )
        .with_rule(
            '!',
            vec![Successor::transform(move |s: &Symbol| {
                s.map_first(|w| w * thickness_scale)
            })],
        )
}

/// Where a plant's grammar comes from in a scene configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrammarSource {
    Preset { preset: Preset },
    /// A hand-written axiom with literal productions keyed by a
    /// one-character tag.
    Custom {
        axiom: String,
        #[serde(default)]
        rules: BTreeMap<String, String>,
    },
}

impl Default for GrammarSource {
    fn default() -> Self {
        GrammarSource::Preset {
            preset: Preset::default(),
        }
    }
}

impl GrammarSource {
    pub fn build(&self, params: &PlantParams) -> Result<(SymbolString, RuleSet)> {
        match self {
            GrammarSource::Preset { preset } => preset.build(params),
            GrammarSource::Custom { axiom, rules } => {
                let axiom = parse(axiom)?;
                let mut table = RuleSet::new();
                for (key, successors) in rules {
                    let mut chars = key.chars();
                    let tag = match (chars.next(), chars.next()) {
                        (Some(tag), None) => tag,
                        _ => {
                            return Err(SimError::InvalidParameter {
                                name: "rules",
                                reason: format!("rule key `{key}` must be a single character"),
                            });
                        }
                    };
                    table.insert_literal(tag, successors)?;
                }
                Ok((axiom, table))
            }
        }
    }
}

/// Full plant pipeline: validate, build the grammar, rewrite
/// `params.iterations` times and walk the result with a fresh turtle.
pub fn grow(source: &GrammarSource, params: PlantParams) -> Result<Vec<Primitive>> {
    let turtle = Turtle::new(params)?;
    let (axiom, rules) = source.build(&params)?;
    let symbols = rewrite(&axiom, &rules, params.iterations);

    let mut primitives = Vec::new();
    turtle.run(&symbols, &mut primitives)?;
    tracing::debug!(
        symbols = symbols.len(),
        primitives = primitives.len(),
        "plant grown"
    );
    Ok(primitives)
}
