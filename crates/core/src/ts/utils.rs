//! Common utilities for TypeScript code generation.
//!
//! This module provides shared helper functions used across rendering and printing.

/// Check if an identifier needs bracket notation (or quoting) for property/key access.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in JavaScript/TypeScript string literals.
/// Escapes backslashes and double quotes.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Serialize a string as a double-quoted literal with JSON escaping.
pub fn quote_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", escape_js_string(s)))
}

/// Quote a string if needed for use as a property key or enum key.
/// Returns the name quoted with escaped special characters if needed,
/// or the original name if it's a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        quote_string(name)
    } else {
        name.to_string()
    }
}

/// Format a member access expression (e.g., `Status.ACTIVE` or `Status["not-ok"]`).
pub fn format_member_access(obj: &str, prop: &str) -> String {
    if needs_bracket_notation(prop) {
        format!("{obj}[{}]", quote_string(prop))
    } else {
        format!("{obj}.{prop}")
    }
}

/// Whether `text` is a bare identifier, optionally followed by `[]` suffixes.
pub fn is_bare_array_item(text: &str) -> bool {
    let base = text.trim_end_matches("[]");
    !needs_bracket_notation(base)
}

/// Keep comment text from terminating the surrounding block comment.
pub fn sanitize_comment(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Split a docstring into display lines.
///
/// The first line is trimmed; the common indentation of the remaining lines
/// is removed; leading and trailing blank lines are dropped.
pub fn doc_lines(doc: &str) -> Vec<String> {
    let mut raw = doc.lines();
    let first = raw.next().map(str::trim).unwrap_or_default();
    let rest: Vec<&str> = raw.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut lines = vec![first.to_string()];
    lines.extend(rest.iter().map(|line| {
        if line.trim().is_empty() {
            String::new()
        } else {
            line.get(indent..)
                .unwrap_or_else(|| line.trim_start())
                .trim_end()
                .to_string()
        }
    }));

    while lines.first().is_some_and(String::is_empty) {
        lines.remove(0);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.iter().map(|line| sanitize_comment(line)).collect()
}

/// Render a doc comment at the given indentation. Empty docs render as nothing.
pub fn format_doc_comment(doc: &str, indent: &str) -> String {
    let lines = doc_lines(doc);
    match lines.as_slice() {
        [] => String::new(),
        [line] => format!("{indent}/** {line} */\n"),
        _ => {
            let mut out = format!("{indent}/**\n");
            for line in &lines {
                if line.is_empty() {
                    out.push_str(&format!("{indent} *\n"));
                } else {
                    out.push_str(&format!("{indent} * {line}\n"));
                }
            }
            out.push_str(&format!("{indent} */\n"));
            out
        }
    }
}
