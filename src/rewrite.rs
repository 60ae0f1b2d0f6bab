//! Rewrites modifier attributes (`class:hover="a b"`) into the standard
//! attribute with prefixed tokens (`class="hover:a hover:b"`).

use std::collections::BTreeSet;

use regex::{Captures, Regex};

use crate::patterns::{self, MAX_MODIFIER_DEPTH};

/// Replace every modifier attribute matched by `modifier` with `attr_name="..."`.
///
/// Registry-visible tokens are added to `produced`. Matches with an empty
/// modifier chain are left exactly as written. A class produced twice for one
/// attribute (`class:hover:hover="x"`) is rendered once, at its first position.
pub fn rewrite_modifiers(
    source: &str,
    produced: &mut BTreeSet<String>,
    modifier: &Regex,
    attr_name: &str,
) -> String {
    rewrite_modifiers_with_depth(source, produced, modifier, attr_name, MAX_MODIFIER_DEPTH)
}

/// [`rewrite_modifiers`] with an explicit bound on single-modifier variants per token.
pub fn rewrite_modifiers_with_depth(
    source: &str,
    produced: &mut BTreeSet<String>,
    modifier: &Regex,
    attr_name: &str,
    max_depth: usize,
) -> String {
    modifier
        .replace_all(source, |caps: &Captures| {
            let parts = caps
                .name("chain")
                .map(|chain| patterns::chain_parts(chain.as_str()))
                .unwrap_or_default();
            if parts.is_empty() {
                log::debug!("leaving modifier attribute without a chain: {}", &caps[0]);
                return caps[0].to_string();
            }

            let value = patterns::quoted_value(caps).unwrap_or_default();
            let mut classes: Vec<String> = Vec::new();

            // Single-space split on purpose: tabs and newlines stay inside a token.
            for token in value.split(' ').map(str::trim).filter(|t| !t.is_empty()) {
                for class in patterns::expand_token(&parts, token, max_depth) {
                    if is_registry_visible(&class, token) {
                        produced.insert(class.clone());
                    }
                    if !classes.contains(&class) {
                        classes.push(class);
                    }
                }
            }

            let lead = caps.name("lead").map_or("", |m| m.as_str());
            format!("{lead}{attr_name}=\"{}\"", classes.join(" "))
        })
        .into_owned()
}

/// Whether a produced class belongs in the registry.
///
/// Classes ending in `:` come from malformed chains, and single-quoted value
/// tokens are stray literal quotes. Both are still rendered.
fn is_registry_visible(class: &str, token: &str) -> bool {
    let quoted = token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'');
    !class.ends_with(':') && !quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributePatterns;
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str) -> (String, BTreeSet<String>) {
        let patterns = AttributePatterns::new("class").unwrap();
        let mut produced = BTreeSet::new();
        let output = rewrite_modifiers(source, &mut produced, patterns.modifier(), "class");
        (output, produced)
    }

    #[test]
    fn test_single_modifier() {
        let (output, produced) = rewrite(r#"<p class:hover="text-blue-500 bg-gray-100">"#);
        assert_eq!(output, r#"<p class="hover:text-blue-500 hover:bg-gray-100">"#);
        assert_eq!(produced.len(), 2);
    }

    #[test]
    fn test_nested_chain_order() {
        let (output, produced) = rewrite(r#"<p class:sm:hover="text-blue-500">"#);
        assert_eq!(
            output,
            r#"<p class="sm:hover:text-blue-500 sm:text-blue-500 hover:text-blue-500">"#
        );
        assert!(produced.contains("sm:hover:text-blue-500"));
        assert!(produced.contains("sm:text-blue-500"));
        assert!(produced.contains("hover:text-blue-500"));
    }

    #[test]
    fn test_empty_chain_is_untouched() {
        let source = r#"<p class:="text-blue-500">"#;
        let (output, produced) = rewrite(source);
        assert_eq!(output, source);
        assert!(produced.is_empty());
    }

    #[test]
    fn test_no_match_is_identity() {
        let source = "<p class=\"a\" class={b}>\n  text: with colons\n</p>";
        let (output, produced) = rewrite(source);
        assert_eq!(output, source);
        assert!(produced.is_empty());
    }

    #[test]
    fn test_repeated_spaces_are_dropped() {
        let (output, _) = rewrite(r#"<p class:focus="a  b ">"#);
        assert_eq!(output, r#"<p class="focus:a focus:b">"#);
    }

    #[test]
    fn test_tab_stays_inside_token() {
        let (output, _) = rewrite("<p class:focus=\"a\tb\">");
        assert_eq!(output, "<p class=\"focus:a\tb\">");
    }

    #[test]
    fn test_malformed_tokens_render_but_are_not_registered() {
        let (output, produced) = rewrite(r#"<p class:hover="'x' y:">"#);
        assert_eq!(output, r#"<p class="hover:'x' hover:y:">"#);
        assert!(produced.is_empty());
    }

    #[test]
    fn test_output_name_is_standard_attribute() {
        let patterns = AttributePatterns::new("className").unwrap();
        let mut produced = BTreeSet::new();
        let output = rewrite_modifiers(
            r#"<p className:md="grid">"#,
            &mut produced,
            patterns.modifier(),
            "className",
        );
        assert_eq!(output, r#"<p className="md:grid">"#);
    }

    #[test]
    fn test_multiple_attributes_on_one_element() {
        let (output, produced) = rewrite(r#"<p class="a" class:hover="b" class:focus="c">"#);
        assert_eq!(output, r#"<p class="a" class="hover:b" class="focus:c">"#);
        assert_eq!(produced.len(), 2);
    }

    #[test]
    fn test_duplicate_partials_render_once() {
        let (output, _) = rewrite(r#"<p class:hover:hover="x">"#);
        assert_eq!(output, r#"<p class="hover:hover:x hover:x">"#);
    }

    #[test]
    fn test_custom_depth() {
        let patterns = AttributePatterns::new("class").unwrap();
        let mut produced = BTreeSet::new();
        let output = rewrite_modifiers_with_depth(
            r#"<p class:a:b:c="x">"#,
            &mut produced,
            patterns.modifier(),
            "class",
            2,
        );
        assert_eq!(output, r#"<p class="a:b:c:x a:x b:x">"#);
    }
}
