//! `{{column}}` placeholder substitution.
//!
//! Substitution is literal find/replace applied one column at a time, in
//! column order. Placeholders without a matching column are left as-is and
//! columns without a placeholder are ignored.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid")
});

/// The literal token for a column: `{{name}}`.
pub fn placeholder(column: &str) -> String {
    format!("{{{{{}}}}}", column)
}

/// Replace `{{column}}` with its value for every (column, value) pair.
///
/// # Example
/// ```ignore
/// let filled = fill_template("Hi {{name}}", &[("name".into(), "Alice".into())]);
/// assert_eq!(filled, "Hi Alice");
/// ```
pub fn fill_template(template: &str, fields: &[(String, String)]) -> String {
    fields
        .iter()
        .fold(template.to_string(), |filled, (column, value)| {
            filled.replace(&placeholder(column), value)
        })
}

/// Placeholder names in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for capture in PLACEHOLDER.captures_iter(template) {
        let name = &capture[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Placeholders of `template` that none of `columns` would fill.
pub fn unresolved_placeholders(template: &str, columns: &[String]) -> Vec<String> {
    placeholders(template)
        .into_iter()
        .filter(|name| !columns.iter().any(|c| c == name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_simple_fill() {
        assert_eq!(fill_template("Hi {{name}}", &fields(&[("name", "Alice")])), "Hi Alice");
    }

    #[test]
    fn test_repeated_placeholder() {
        let filled = fill_template("{{x}} and {{x}}", &fields(&[("x", "1")]));
        assert_eq!(filled, "1 and 1");
    }

    #[test]
    fn test_unmatched_placeholder_untouched() {
        let filled = fill_template("Hi {{name}} from {{city}}", &fields(&[("name", "Bob"), ("age", "3")]));
        assert_eq!(filled, "Hi Bob from {{city}}");
    }

    #[test]
    fn test_malformed_tokens_kept() {
        let filled = fill_template("{name} {{name} {{ name }}", &fields(&[("name", "Z")]));
        assert_eq!(filled, "{name} {{name} {{ name }}");
    }

    #[test]
    fn test_value_without_braces_not_resubstituted() {
        let filled = fill_template("{{a}}{{b}}", &fields(&[("a", "b"), ("b", "c")]));
        assert_eq!(filled, "bc");
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(placeholders("{{b}} {{a}} {{b}} {x}"), vec!["b", "a"]);
        assert!(placeholders("no tokens").is_empty());
    }

    #[test]
    fn test_unresolved() {
        let columns = vec!["name".to_string()];
        assert_eq!(unresolved_placeholders("{{name}} {{city}}", &columns), vec!["city"]);
    }
}
