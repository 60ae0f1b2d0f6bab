//! Attribute patterns and the token helpers shared by extraction, rewriting and merging.
//!
//! Every pattern built here uses named capture groups, and the operations in
//! [`crate::extract`], [`crate::rewrite`] and [`crate::merge`] read captures by
//! name:
//!
//! * `lead`  - the whitespace (or start of text) preceding the attribute
//! * `dq`    - a double-quoted value
//! * `sq`    - a single-quoted value
//! * `expr`  - the inside of a brace-delimited expression value
//! * `chain` - the modifier chain of a modifier attribute (`sm:hover`)

use regex::{Captures, Regex};

use crate::error::{Error, Result};

/// Default number of single-modifier variants emitted for a nested chain.
///
/// `class:a:b:c:d:e="x"` yields `a:b:c:d:e:x` plus `a:x`, `b:x`, `c:x`, `d:x`.
pub const MAX_MODIFIER_DEPTH: usize = 4;

/// Brace expression body, allowing two levels of nested braces
/// (`{clsx({ active })}`, ``{`a ${b}`}``).
pub(crate) const BRACE_BODY: &str = r"(?:[^{}]|\{(?:[^{}]|\{[^{}]*\})*\})*";

/// The pair of patterns for one standard attribute name.
#[derive(Debug, Clone)]
pub struct AttributePatterns {
    name: String,
    style: Regex,
    modifier: Regex,
}

impl AttributePatterns {
    /// Build the patterns for `name` (`class`, `className`, ...).
    ///
    /// # Errors
    ///
    /// * If `name` is not a plain attribute name
    /// * If the generated pattern fails to compile
    pub fn new(name: &str) -> Result<Self> {
        if !is_attribute_name(name) {
            return Err(Error::AttributeName(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            style: style_pattern(name)?,
            modifier: modifier_pattern(name)?,
        })
    }

    /// The standard attribute name the rewriter emits.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matches `name="..."`, `name='...'` and `name={...}`.
    pub fn style(&self) -> &Regex {
        &self.style
    }

    /// Matches `name:<chain>="..."` and `name:<chain>='...'`.
    pub fn modifier(&self) -> &Regex {
        &self.modifier
    }
}

/// Pattern for the standard attribute `name` with a quoted or brace-delimited value.
///
/// # Errors
///
/// * If the generated pattern fails to compile
pub fn style_pattern(name: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r#"(?P<lead>^|\s){}=(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|\{{(?P<expr>{body})\}})"#,
        regex::escape(name),
        body = BRACE_BODY,
    ))?)
}

/// Pattern for the modifier attribute `name:<chain>` with a quoted value.
///
/// The chain may be empty (`class:="..."`) so that the rewriter can leave
/// such attributes untouched instead of skipping past them.
///
/// # Errors
///
/// * If the generated pattern fails to compile
pub fn modifier_pattern(name: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r#"(?P<lead>^|\s){}:(?P<chain>[^\s="'<>{{}}]*)=(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#,
        regex::escape(name),
    ))?)
}

/// The attribute name another markup convention uses for the same purpose.
pub fn attribute_alias(name: &str) -> Option<&'static str> {
    match name {
        "class" => Some("className"),
        "className" => Some("class"),
        _ => None,
    }
}

pub(crate) fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// The quoted value of a match, if the attribute was quoted.
pub(crate) fn quoted_value<'h>(caps: &Captures<'h>) -> Option<&'h str> {
    caps.name("dq")
        .or_else(|| caps.name("sq"))
        .map(|m| m.as_str())
}

/// The non-empty parts of a modifier chain, in order.
pub(crate) fn chain_parts(chain: &str) -> Vec<&str> {
    chain
        .split(':')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Expand one value token against a modifier chain.
///
/// The fully-chained token comes first, followed by one single-modifier
/// variant per part (at most `max_depth` of them) when the chain is nested.
pub(crate) fn expand_token(parts: &[&str], token: &str, max_depth: usize) -> Vec<String> {
    let mut expanded = Vec::with_capacity(1 + parts.len().min(max_depth));
    expanded.push(format!("{}:{token}", parts.join(":")));

    if parts.len() > 1 {
        expanded.extend(
            parts
                .iter()
                .take(max_depth)
                .map(|part| format!("{part}:{token}")),
        );
    }

    expanded
}

/// The body of a template literal expression (`` `...` ``), without the backticks.
///
/// This is a prefix/suffix check only; an expression that merely starts and
/// ends with a backtick is treated as a template literal.
pub(crate) fn template_literal_body(expr: &str) -> Option<&str> {
    let expr = expr.trim();
    if expr.len() >= 2 && expr.starts_with('`') && expr.ends_with('`') {
        Some(&expr[1..expr.len() - 1])
    } else {
        None
    }
}
