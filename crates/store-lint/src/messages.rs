//! Message templates.
//!
//! Templates use `{{name}}` placeholders, filled in by [`render`].

/// Reported for each in-place array mutation on store state inside a getter.
pub const NO_ARRAY_MUTATIONS_ON_STATE: &str = "Avoid calling `{{method}}()` on store state inside a getter: it mutates the array in place. Copy it first, e.g. with structuredClone().";

/// Substitutes every `{{key}}` in `template` with its value from `data`.
///
/// Placeholders without a value are left as written.
pub fn render(template: &str, data: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in data {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_method() {
        let msg = render(NO_ARRAY_MUTATIONS_ON_STATE, &[("method", "copyWithin")]);
        assert!(msg.starts_with("Avoid calling `copyWithin()` on store state"));
        assert!(!msg.contains("{{"));
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{a}} and {{b}}", &[("a", "x")]), "x and {{b}}");
    }
}
