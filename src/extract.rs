//! Collects the style tokens present in one source file.

use std::collections::BTreeSet;

use regex::Regex;

use crate::patterns::{self, MAX_MODIFIER_DEPTH};

/// Populate `all` with every style token in `source` and `modifiers` with
/// the tokens that come from modifier attributes only.
///
/// Both sets are cleared first. `style` and `modifier` are the patterns of
/// [`crate::AttributePatterns`] (or any pattern with the same named groups).
pub fn extract(
    source: &str,
    all: &mut BTreeSet<String>,
    modifiers: &mut BTreeSet<String>,
    style: &Regex,
    modifier: &Regex,
) {
    extract_with_depth(source, all, modifiers, style, modifier, MAX_MODIFIER_DEPTH);
}

/// [`extract`] with an explicit bound on single-modifier variants per token.
pub fn extract_with_depth(
    source: &str,
    all: &mut BTreeSet<String>,
    modifiers: &mut BTreeSet<String>,
    style: &Regex,
    modifier: &Regex,
    max_depth: usize,
) {
    all.clear();
    modifiers.clear();

    for caps in style.captures_iter(source) {
        let literal = match (patterns::quoted_value(&caps), caps.name("expr")) {
            (Some(value), _) => value,
            // Only the static head of a template literal is knowable.
            (None, Some(expr)) => match patterns::template_literal_body(expr.as_str()) {
                Some(body) => body.split("${").next().unwrap_or_default(),
                None => continue,
            },
            (None, None) => continue,
        };

        all.extend(literal.split_whitespace().map(str::to_string));
    }

    for caps in modifier.captures_iter(source) {
        let parts = caps
            .name("chain")
            .map(|chain| patterns::chain_parts(chain.as_str()))
            .unwrap_or_default();
        if parts.is_empty() {
            continue;
        }

        let value = patterns::quoted_value(&caps).unwrap_or_default();
        for token in value.split_whitespace() {
            for class in patterns::expand_token(&parts, token, max_depth) {
                all.insert(class.clone());
                modifiers.insert(class);
            }
        }
    }
}
