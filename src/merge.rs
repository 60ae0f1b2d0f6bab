//! Collapses runs of adjacent standard attributes on one element into a single attribute.
//!
//! A run is two or more occurrences of the attribute (or its alias) separated
//! only by whitespace, each with a quoted value or a brace-delimited
//! expression. Static values are concatenated in order; at most one dynamic
//! expression survives. The choice of expression is a heuristic:
//!
//! 1. a function call (`name(...)`) wins over any other expression,
//! 2. among calls the last one wins,
//! 3. otherwise the first non-empty expression wins.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::patterns::{self, BRACE_BODY};

lazy_static! {
    static ref FUNCTION_CALL: Regex = Regex::new(r"^[A-Za-z_$][\w$.]*\s*\(").unwrap();
}

/// Merges runs of one attribute name (plus its alias).
#[derive(Debug, Clone)]
pub struct AttributeMerger {
    name: String,
    run: Regex,
    occurrence: Regex,
}

impl AttributeMerger {
    /// # Errors
    ///
    /// * If `name` is not a plain attribute name
    /// * If the generated pattern fails to compile
    pub fn new(name: &str) -> Result<Self> {
        if !patterns::is_attribute_name(name) {
            return Err(Error::AttributeName(name.to_string()));
        }

        let mut names = vec![regex::escape(name)];
        if let Some(alias) = patterns::attribute_alias(name) {
            names.push(regex::escape(alias));
        }
        // Longest first so `className` is never cut short at `class`.
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));
        let names = names.join("|");

        let value = format!(r#"(?:"[^"]*"|'[^']*'|\{{{body}\}})"#, body = BRACE_BODY);
        let run = format!(r"(?P<lead>^|\s)(?:{names})={value}(?:\s+(?:{names})={value})+");
        let occurrence = format!(
            r#"(?:{names})=(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|\{{(?P<expr>{body})\}})"#,
            body = BRACE_BODY,
        );

        Ok(Self {
            name: name.to_string(),
            run: Regex::new(&run)?,
            occurrence: Regex::new(&occurrence)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Merge every run in `source`. Text without runs is returned unchanged.
    pub fn merge(&self, source: &str) -> String {
        self.run
            .replace_all(source, |caps: &regex::Captures| {
                let lead = caps.name("lead").map_or("", |m| m.as_str());
                match self.merge_run(&caps[0]) {
                    Some(attribute) => format!("{lead}{attribute}"),
                    None => String::new(),
                }
            })
            .into_owned()
    }

    fn merge_run(&self, run: &str) -> Option<String> {
        let mut statics: Vec<&str> = Vec::new();
        let mut call: Option<&str> = None;
        let mut other: Option<&str> = None;

        for caps in self.occurrence.captures_iter(run) {
            let literal = match (patterns::quoted_value(&caps), caps.name("expr")) {
                (Some(value), _) => value,
                (None, Some(expr)) => {
                    let expr = expr.as_str().trim();
                    if let Some(body) = patterns::template_literal_body(expr) {
                        body
                    } else {
                        if FUNCTION_CALL.is_match(expr) {
                            call = Some(expr);
                        } else if other.is_none() && !expr.is_empty() {
                            other = Some(expr);
                        }
                        continue;
                    }
                }
                (None, None) => continue,
            };

            let literal = literal.trim();
            if !literal.is_empty() {
                statics.push(literal);
            }
        }

        let name = &self.name;
        let dynamic = call.or(other);

        if statics.is_empty() {
            return dynamic.map(|expr| format!("{name}={{{expr}}}"));
        }

        let static_classes = statics.join(" ");
        let Some(expr) = dynamic else {
            return Some(static_attribute(name, &static_classes));
        };

        if call.is_some() {
            if let Some(injected) = inject_argument(expr, &static_classes) {
                return Some(format!("{name}={{{injected}}}"));
            }
            log::warn!("no closing parenthesis in `{expr}`, combining as a template literal");
        }

        Some(format!("{name}={{`{static_classes} ${{{expr}}}`}}"))
    }
}

/// Render merged static classes with a quote style that keeps the markup valid.
///
/// Interpolations from a template literal must stay live, and text holding
/// both quote characters can only be carried by a template literal.
fn static_attribute(name: &str, classes: &str) -> String {
    let double = classes.contains('"');
    if classes.contains("${") || (double && classes.contains('\'')) {
        format!("{name}={{`{classes}`}}")
    } else if double {
        format!("{name}='{classes}'")
    } else {
        format!("{name}=\"{classes}\"")
    }
}

/// Add `` `literal` `` as the last argument of a call expression.
fn inject_argument(call: &str, literal: &str) -> Option<String> {
    let open = call.find('(')?;
    let close = call.rfind(')')?;
    if close < open {
        return None;
    }

    let head = call[..close].trim_end();
    let separator = if head.ends_with('(') {
        ""
    } else if head.ends_with(',') {
        " "
    } else {
        ", "
    };

    Some(format!("{head}{separator}`{literal}`{}", &call[close..]))
}

/// Merge runs of `attr_name` (and its alias) in `source`.
///
/// An invalid attribute name leaves the text unchanged.
pub fn merge_attributes(source: &str, attr_name: &str) -> String {
    match AttributeMerger::new(attr_name) {
        Ok(merger) => merger.merge(source),
        Err(e) => {
            log::warn!("not merging attributes: {e}");
            source.to_string()
        }
    }
}
