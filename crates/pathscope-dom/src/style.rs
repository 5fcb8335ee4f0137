//! Inline style declarations.
//!
//! [CSSOM § 6.7 CSSStyleDeclaration](https://drafts.csswg.org/cssom/#the-cssstyledeclaration-interface)
//!
//! An element's `style` attribute, parsed into an ordered list of
//! property/value pairs. Only the flat `property: value` grammar is handled;
//! values are kept verbatim and never validated.

use std::fmt;

/// The declarations of one `style` attribute, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse the text of a `style` attribute.
    ///
    /// Declarations are split on `;` outside quoted strings and parentheses,
    /// so values such as `url(data:image/png;base64,...)` stay whole. Property
    /// names are ASCII-lowercased, except custom properties (`--name`), which
    /// are case-sensitive. Declarations without a colon or with an empty value
    /// are dropped. A later declaration of the same property replaces the
    /// earlier one.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut style = Self::default();
        for declaration in split_declarations(text) {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            style.set(property, value);
        }
        style
    }

    /// [CSSOM getPropertyValue](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-getpropertyvalue)
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = normalize_name(property);
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// [CSSOM setProperty](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-setproperty)
    ///
    /// Replaces an existing declaration in place, otherwise appends.
    pub fn set(&mut self, property: &str, value: &str) {
        let property = normalize_name(property);
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => value.clone_into(existing),
            None => self.declarations.push((property, value.to_string())),
        }
    }

    /// [CSSOM removeProperty](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-removeproperty)
    ///
    /// Returns the removed value, if the property was set.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = normalize_name(property);
        let index = self
            .declarations
            .iter()
            .position(|(name, _)| *name == property)?;
        Some(self.declarations.remove(index).1)
    }

    /// True when no declarations are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate over `(property, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Custom properties keep their case; every other name is ASCII-lowercased.
fn normalize_name(property: &str) -> String {
    if property.starts_with("--") {
        property.to_string()
    } else {
        property.to_ascii_lowercase()
    }
}

/// Split a declaration list on the `;` that are not inside a quoted string
/// or a parenthesized block.
fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// [CSSOM § 6.7 serialize a CSS declaration block](https://drafts.csswg.org/cssom/#serialize-a-css-declaration-block)
impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}: {value};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_malformed_declarations() {
        let style = InlineStyle::parse("color: red;; bogus; width:10px ;height:");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("width"), Some("10px"));
        assert_eq!(style.get("height"), None);
        assert_eq!(style.iter().count(), 2);
    }

    #[test]
    fn test_property_names_are_case_insensitive() {
        let mut style = InlineStyle::parse("OUTLINE: 1px solid red");
        assert_eq!(style.get("outline"), Some("1px solid red"));
        style.set("Outline", "none");
        assert_eq!(style.get("outline"), Some("none"));
        assert_eq!(style.iter().count(), 1);
    }

    #[test]
    fn test_set_keeps_declaration_order() {
        let mut style = InlineStyle::parse("a: 1; b: 2");
        style.set("a", "3");
        style.set("c", "4");
        assert_eq!(style.to_string(), "a: 3; b: 2; c: 4;");
    }

    #[test]
    fn test_remove_returns_old_value() {
        let mut style = InlineStyle::parse("outline: 2px solid blue; color: red");
        assert_eq!(style.remove("outline").as_deref(), Some("2px solid blue"));
        assert_eq!(style.remove("outline"), None);
        assert_eq!(style.to_string(), "color: red;");
    }

    #[test]
    fn test_empty_style_serializes_to_empty_string() {
        let style = InlineStyle::parse("   ");
        assert!(style.is_empty());
        assert_eq!(style.to_string(), "");
    }

    #[test]
    fn test_semicolons_inside_url_and_strings_are_kept() {
        let text = r#"background-image: url(data:image/png;base64,AAAA); content: "a;b"; color: red"#;
        let mut style = InlineStyle::parse(text);

        assert_eq!(
            style.get("background-image"),
            Some("url(data:image/png;base64,AAAA)")
        );
        assert_eq!(style.get("content"), Some(r#""a;b""#));
        assert_eq!(style.get("color"), Some("red"));

        style.set("outline", "2px solid blue");
        let _ = style.remove("outline");
        assert_eq!(
            style.to_string(),
            r#"background-image: url(data:image/png;base64,AAAA); content: "a;b"; color: red;"#
        );
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let style = InlineStyle::parse(r#"content: "x\";y"; color: red"#);
        assert_eq!(style.get("content"), Some(r#""x\";y""#));
        assert_eq!(style.get("color"), Some("red"));
    }

    #[test]
    fn test_custom_property_names_keep_case() {
        let mut style = InlineStyle::parse("--Main-Color: red; --main-color: blue");
        assert_eq!(style.get("--Main-Color"), Some("red"));
        assert_eq!(style.get("--main-color"), Some("blue"));
        assert_eq!(style.iter().count(), 2);

        assert_eq!(style.remove("--MAIN-COLOR"), None);
        assert_eq!(style.to_string(), "--Main-Color: red; --main-color: blue;");
    }
}
