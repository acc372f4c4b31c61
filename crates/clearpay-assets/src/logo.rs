//! Logo rendering
//!
//! Provider-hosted images come in 1x/2x/3x densities next to each other.

use serde::Serialize;

use crate::theme::{LogoTheme, escape_attr};

/// Image URLs at each pixel density
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceSet {
    pub x1: String,
    pub x2: String,
    pub x3: String,
}

impl SourceSet {
    /// `srcset` attribute value
    pub fn srcset(&self) -> String {
        format!("{} 1x, {} 2x, {} 3x", self.x1, self.x2, self.x3)
    }
}

pub fn generate_source_sets(static_url: &str, image_path: &str, extension: &str) -> SourceSet {
    let base = static_url.trim_end_matches('/');
    let path = image_path.trim_start_matches('/');
    SourceSet {
        x1: format!("{base}/{path}.{extension}"),
        x2: format!("{base}/{path}@2x.{extension}"),
        x3: format!("{base}/{path}@3x.{extension}"),
    }
}

/// `<img>` tag for the product page logo
pub fn render_product_logo(static_url: &str, theme: LogoTheme) -> String {
    let image_path = format!("integration/product-page/logo-clearpay-{theme}");
    let logo = generate_source_sets(static_url, &image_path, "png");

    format!(
        r#"<img style="vertical-align:middle;" src="{}" srcset="{}" width="110" height="21" alt="Clearpay" />"#,
        escape_attr(&logo.x1),
        escape_attr(&logo.srcset()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_source_sets() {
        let set = generate_source_sets("https://static.afterpay.com/", "logo/x", "png");
        assert_eq!(set.x1, "https://static.afterpay.com/logo/x.png");
        assert_eq!(set.x2, "https://static.afterpay.com/logo/x@2x.png");
        assert_eq!(set.x3, "https://static.afterpay.com/logo/x@3x.png");
    }

    #[test]
    fn test_render_product_logo_uses_theme() {
        let html = render_product_logo("https://static.afterpay.com", LogoTheme::White);
        assert!(html.contains(
            r#"src="https://static.afterpay.com/integration/product-page/logo-clearpay-white.png""#
        ));
        assert!(html.contains("logo-clearpay-white@3x.png 3x"));
        assert!(html.contains(r#"width="110" height="21" alt="Clearpay""#));
    }
}
