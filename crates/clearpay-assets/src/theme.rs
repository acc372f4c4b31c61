//! Themes and template rendering

use serde::{Deserialize, Serialize};

/// Token replaced with a theme slug in asset templates
pub const THEME_PLACEHOLDER: &str = "[THEME]";

/// Colour variants of the product page logo
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoTheme {
    #[default]
    Colour,
    Black,
    White,
}

impl LogoTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Colour => "colour",
            Self::Black => "black",
            Self::White => "white",
        }
    }

    /// Unknown themes render in colour.
    pub fn parse(s: &str) -> Self {
        match s {
            "black" => Self::Black,
            "white" => Self::White,
            _ => Self::Colour,
        }
    }
}

impl std::fmt::Display for LogoTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitute every `[THEME]` token in `template`. The theme is inserted
/// as-is; escape it first when it did not come from a trusted source.
pub fn render_template(template: &str, theme: &str) -> String {
    template.replace(THEME_PLACEHOLDER, theme)
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Attribute values get the same treatment as text.
pub fn escape_attr(s: &str) -> String {
    escape_html(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_theme_parse() {
        assert_eq!(LogoTheme::parse("black"), LogoTheme::Black);
        assert_eq!(LogoTheme::parse("white"), LogoTheme::White);
        assert_eq!(LogoTheme::parse("colour"), LogoTheme::Colour);
        assert_eq!(LogoTheme::parse("mint"), LogoTheme::Colour);
        assert_eq!(LogoTheme::parse("Black"), LogoTheme::Colour);
        assert_eq!(LogoTheme::parse(""), LogoTheme::Colour);
    }

    #[test]
    fn test_render_template_replaces_all() {
        let out = render_template("a/[THEME].svg b/[THEME].png", "black-on-mint");
        assert_eq!(out, "a/black-on-mint.svg b/black-on-mint.png");
        assert_eq!(render_template("no token", "x"), "no token");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
