use crate::error::{Result, SimError};
use std::fmt;
use std::str::FromStr;

/// A single grammar symbol: a tag and its numeric parameters.
///
/// Symbols are immutable once built; rules produce new symbols instead
/// of editing existing ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    tag: char,
    params: Vec<f32>,
}

impl Symbol {
    pub fn new(tag: char, params: impl Into<Vec<f32>>) -> Self {
        Self {
            tag,
            params: params.into(),
        }
    }

    /// A symbol without parameters.
    pub fn bare(tag: char) -> Self {
        Self {
            tag,
            params: Vec::new(),
        }
    }

    pub fn tag(&self) -> char {
        self.tag
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    pub fn param(&self, index: usize) -> Option<f32> {
        self.params.get(index).copied()
    }

    /// Returns a copy with the first parameter replaced by `f(old)`.
    ///
    /// A symbol without parameters is returned unchanged.
    pub fn map_first(&self, f: impl FnOnce(f32) -> f32) -> Self {
        let mut params = self.params.clone();
        if let Some(first) = params.first_mut() {
            *first = f(*first);
        }
        Self {
            tag: self.tag,
            params,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{p:.3}")?;
        }
        f.write_str(")")
    }
}

/// An ordered sequence of symbols; the unit rewritten by the grammar and
/// walked by the turtle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolString {
    symbols: Vec<Symbol>,
}

impl SymbolString {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of symbols carrying `tag`.
    pub fn count(&self, tag: char) -> usize {
        self.symbols.iter().filter(|s| s.tag == tag).count()
    }
}

impl FromIterator<Symbol> for SymbolString {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SymbolString {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}

impl fmt::Display for SymbolString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.symbols {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl FromStr for SymbolString {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parses `text` into a [`SymbolString`].
///
/// Every non-whitespace character is a tag. A tag immediately followed by
/// `(` takes the comma-separated numbers up to the next `)` as parameters.
///
/// ### Errors
/// [`SimError::MalformedParameterList`] when a group is unterminated or
/// empty, holds a non-numeric token, or when a parenthesis appears without
/// a tag. Nothing is returned on failure.
pub fn parse(text: &str) -> Result<SymbolString> {
    let chars: Vec<char> = text.chars().collect();
    let mut symbols = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let tag = chars[i];
        if tag.is_whitespace() {
            i += 1;
            continue;
        }
        if tag == '(' || tag == ')' {
            return Err(malformed(tag, i, "parenthesis without a preceding tag"));
        }

        if chars.get(i + 1) == Some(&'(') {
            let open = i + 1;
            let close = chars[open + 1..]
                .iter()
                .position(|&c| c == ')')
                .map(|offset| open + 1 + offset)
                .ok_or_else(|| malformed(tag, open, "unterminated parameter list"))?;

            let group: String = chars[open + 1..close].iter().collect();
            let params = parse_group(tag, open, &group)?;
            symbols.push(Symbol::new(tag, params));
            i = close + 1;
        } else {
            symbols.push(Symbol::bare(tag));
            i += 1;
        }
    }

    Ok(SymbolString::new(symbols))
}

fn parse_group(tag: char, position: usize, group: &str) -> Result<Vec<f32>> {
    if group.trim().is_empty() {
        return Err(malformed(tag, position, "empty parameter list"));
    }
    group
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| malformed(tag, position, format!("`{token}` is not a number")))
        })
        .collect()
}

fn malformed(tag: char, position: usize, reason: impl Into<String>) -> SimError {
    SimError::MalformedParameterList {
        tag,
        position,
        reason: reason.into(),
    }
}
