//! HTML page templates for the preview
//!
//! Every page produced for the preview or for export is one of these
//! templates: the themed document wrapper, the placeholder shown for an
//! empty document, or the error page shown when no renderer succeeded.

use crate::theme::Theme;

/// Text of the page shown while the document is empty
pub const PLACEHOLDER_MESSAGE: &str = "Preview will appear here...";

const BASE_FONT: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif";
const MONO_FONT: &str = "'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, monospace";

struct DocColors {
    text: &'static str,
    background: Option<&'static str>,
    heading: Option<&'static str>,
    rule: &'static str,
    muted: &'static str,
    link: &'static str,
    quote_border: &'static str,
    code_bg: &'static str,
    pre_bg: &'static str,
    table_border: &'static str,
    img_shadow: &'static str,
    img_bg: Option<&'static str>,
    hr: &'static str,
}

const LIGHT: DocColors = DocColors {
    text: "#333",
    background: None,
    heading: None,
    rule: "#eaecef",
    muted: "#6a737d",
    link: "#0366d6",
    quote_border: "#dfe2e5",
    code_bg: "rgba(27, 31, 35, 0.05)",
    pre_bg: "#f6f8fa",
    table_border: "#dfe2e5",
    img_shadow: "rgba(0,0,0,0.1)",
    img_bg: None,
    hr: "#e1e4e8",
};

const DARK: DocColors = DocColors {
    text: "#e1e4e8",
    background: Some("#24292e"),
    heading: Some("#f0f6fc"),
    rule: "#373e47",
    muted: "#8b949e",
    link: "#58a6ff",
    quote_border: "#3b434b",
    code_bg: "rgba(110, 118, 129, 0.4)",
    pre_bg: "#2d333b",
    table_border: "#3b434b",
    img_shadow: "rgba(0,0,0,0.3)",
    img_bg: Some("#fff"),
    hr: "#3b434b",
};

// Pygments short class names and their styles, light then dark.
const HIGHLIGHT_LIGHT: &[(&str, &str)] = &[
    ("c", "color: #999988; font-style: italic"),
    ("err", "color: #a61717; background-color: #e3d2d2"),
    ("k", "color: #000000; font-weight: bold"),
    ("o", "color: #000000; font-weight: bold"),
    ("cm", "color: #999988; font-style: italic"),
    ("cp", "color: #999999; font-weight: bold"),
    ("c1", "color: #999988; font-style: italic"),
    ("cs", "color: #999999; font-weight: bold; font-style: italic"),
    ("gd", "color: #000000; background-color: #ffdddd"),
    ("ge", "color: #000000; font-style: italic"),
    ("gr", "color: #aa0000"),
    ("gh", "color: #999999"),
    ("gi", "color: #000000; background-color: #ddffdd"),
    ("go", "color: #888888"),
    ("gp", "color: #555555"),
    ("gs", "font-weight: bold"),
    ("gu", "color: #aaaaaa"),
    ("gt", "color: #aa0000"),
    ("kc", "color: #000000; font-weight: bold"),
    ("kd", "color: #000000; font-weight: bold"),
    ("kn", "color: #000000; font-weight: bold"),
    ("kp", "color: #000000; font-weight: bold"),
    ("kr", "color: #000000; font-weight: bold"),
    ("kt", "color: #445588; font-weight: bold"),
    ("m", "color: #009999"),
    ("s", "color: #d14"),
    ("na", "color: #008080"),
    ("nb", "color: #0086B3"),
    ("nc", "color: #445588; font-weight: bold"),
    ("no", "color: #008080"),
    ("ni", "color: #800080"),
    ("ne", "color: #990000; font-weight: bold"),
    ("nf", "color: #990000; font-weight: bold"),
    ("nn", "color: #555555"),
    ("nt", "color: #000080"),
    ("nv", "color: #008080"),
    ("ow", "color: #000000; font-weight: bold"),
    ("w", "color: #bbbbbb"),
    ("mf", "color: #009999"),
    ("mh", "color: #009999"),
    ("mi", "color: #009999"),
    ("mo", "color: #009999"),
    ("sb", "color: #d14"),
    ("sc", "color: #d14"),
    ("sd", "color: #d14"),
    ("s2", "color: #d14"),
    ("se", "color: #d14"),
    ("sh", "color: #d14"),
    ("si", "color: #d14"),
    ("sx", "color: #d14"),
    ("sr", "color: #009926"),
    ("s1", "color: #d14"),
    ("ss", "color: #990073"),
    ("bp", "color: #999999"),
    ("vc", "color: #008080"),
    ("vg", "color: #008080"),
    ("vi", "color: #008080"),
    ("il", "color: #009999"),
];

const HIGHLIGHT_DARK: &[(&str, &str)] = &[
    ("c", "color: #6a737d"),
    ("err", "color: #f85149"),
    ("k", "color: #ff7b72"),
    ("o", "color: #ff7b72"),
    ("cm", "color: #6a737d"),
    ("cp", "color: #ff7b72"),
    ("c1", "color: #6a737d"),
    ("cs", "color: #6a737d"),
    ("gd", "color: #ffd7d5"),
    ("ge", "font-style: italic"),
    ("gr", "color: #f85149"),
    ("gh", "color: #79c0ff"),
    ("gi", "color: #56d364"),
    ("go", "color: #8b949e"),
    ("gp", "color: #8b949e"),
    ("gs", "font-weight: bold"),
    ("gu", "color: #79c0ff"),
    ("gt", "color: #f85149"),
    ("kc", "color: #ff7b72"),
    ("kd", "color: #ff7b72"),
    ("kn", "color: #ff7b72"),
    ("kp", "color: #ff7b72"),
    ("kr", "color: #ff7b72"),
    ("kt", "color: #ff7b72"),
    ("m", "color: #79c0ff"),
    ("s", "color: #a5d6ff"),
    ("na", "color: #ffa657"),
    ("nb", "color: #ffa657"),
    ("nc", "color: #d2a8ff"),
    ("no", "color: #ffa657"),
    ("nd", "color: #d2a8ff"),
    ("ni", "color: #ffa657"),
    ("ne", "color: #f85149"),
    ("nf", "color: #d2a8ff"),
    ("nl", "color: #ffa657"),
    ("nn", "color: #ff7b72"),
    ("nt", "color: #7ee787"),
    ("nv", "color: #ffa657"),
    ("ow", "color: #ff7b72"),
    ("w", "color: #6e7681"),
    ("mf", "color: #79c0ff"),
    ("mh", "color: #79c0ff"),
    ("mi", "color: #79c0ff"),
    ("mo", "color: #79c0ff"),
    ("sb", "color: #a5d6ff"),
    ("sc", "color: #a5d6ff"),
    ("sd", "color: #6e7681"),
    ("s2", "color: #a5d6ff"),
    ("se", "color: #ffa657"),
    ("sh", "color: #a5d6ff"),
    ("si", "color: #ffa657"),
    ("sx", "color: #a5d6ff"),
    ("sr", "color: #7ee787"),
    ("s1", "color: #a5d6ff"),
    ("ss", "color: #7ee787"),
    ("bp", "color: #ffa657"),
    ("vc", "color: #ffa657"),
    ("vg", "color: #ffa657"),
    ("vi", "color: #ffa657"),
    ("il", "color: #79c0ff"),
];

/// Document stylesheet for a theme, including code highlighting rules
pub fn css(theme: Theme) -> String {
    let c = match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    };

    let mut css = String::with_capacity(6 * 1024);

    css.push_str(&format!(
        "body {{ font-family: {BASE_FONT}; font-size: 16px; line-height: 1.6; color: {}; \
         max-width: 900px; margin: 0 auto; padding: 20px;{} }}\n",
        c.text,
        c.background
            .map(|bg| format!(" background-color: {bg};"))
            .unwrap_or_default()
    ));
    css.push_str(&format!(
        "h1, h2, h3, h4, h5, h6 {{ margin-top: 24px; margin-bottom: 16px; font-weight: 600; \
         line-height: 1.25;{} }}\n",
        c.heading
            .map(|h| format!(" color: {h};"))
            .unwrap_or_default()
    ));
    css.push_str(&format!(
        "h1 {{ font-size: 2em; border-bottom: 1px solid {0}; padding-bottom: 0.3em; }}\n\
         h2 {{ font-size: 1.5em; border-bottom: 1px solid {0}; padding-bottom: 0.3em; }}\n\
         h3 {{ font-size: 1.25em; }}\n\
         h4 {{ font-size: 1em; }}\n\
         h5 {{ font-size: 0.875em; }}\n\
         h6 {{ font-size: 0.85em; color: {1}; }}\n\
         p {{ margin-bottom: 16px; }}\n",
        c.rule, c.muted
    ));
    css.push_str(&format!(
        "a {{ color: {}; text-decoration: none; }}\n\
         a:hover {{ text-decoration: underline; }}\n\
         blockquote {{ padding: 0 1em; color: {}; border-left: 0.25em solid {}; margin: 0 0 16px 0; }}\n",
        c.link, c.muted, c.quote_border
    ));
    css.push_str(&format!(
        "code {{ padding: 0.2em 0.4em; margin: 0; font-size: 85%; background-color: {}; \
         border-radius: 3px; font-family: {MONO_FONT}; }}\n\
         pre {{ padding: 16px; overflow: auto; font-size: 85%; line-height: 1.45; \
         background-color: {}; border-radius: 6px; margin-bottom: 16px; }}\n\
         pre code {{ padding: 0; margin: 0; font-size: 100%; background-color: transparent; border-radius: 0; }}\n",
        c.code_bg, c.pre_bg
    ));
    css.push_str(&format!(
        "table {{ border-spacing: 0; border-collapse: collapse; margin-bottom: 16px; width: 100%; }}\n\
         table th, table td {{ padding: 6px 13px; border: 1px solid {0}; }}\n\
         table th {{ font-weight: 600; background-color: {1}; }}\n\
         table tr:nth-child(2n) {{ background-color: {1}; }}\n",
        c.table_border, c.pre_bg
    ));
    css.push_str(&format!(
        "img {{ max-width: 100%; height: auto; box-shadow: 0 1px 5px {}; border-radius: 4px; \
         margin: 10px 0;{} }}\n\
         hr {{ height: 0.25em; padding: 0; margin: 24px 0; background-color: {}; border: 0; }}\n",
        c.img_shadow,
        c.img_bg
            .map(|bg| format!(" background-color: {bg};"))
            .unwrap_or_default(),
        c.hr
    ));
    css.push_str(
        "ul, ol { padding-left: 2em; margin-bottom: 16px; }\n\
         li { margin-bottom: 0.25em; }\n\
         .task-list-item { list-style-type: none; }\n\
         .task-list-item input { margin-right: 0.5em; }\n",
    );

    css.push_str(".highlight { margin-bottom: 16px; }\n");
    css.push_str(".highlight pre { margin-bottom: 0; word-wrap: normal; }\n");
    let rules = match theme {
        Theme::Light => HIGHLIGHT_LIGHT,
        Theme::Dark => HIGHLIGHT_DARK,
    };
    for (class, style) in rules {
        css.push_str(&format!(".highlight .{class} {{ {style} }}\n"));
    }

    css
}

/// Wrap an HTML body fragment in the themed document
pub fn page(body: &str, theme: Theme) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        css(theme),
        body
    )
}

/// Simple page carrying a single message, used for the empty document
pub fn message_page(message: &str, theme: Theme) -> String {
    let body_style = match theme {
        Theme::Light => format!("font-family: {BASE_FONT}; padding: 20px; color: #666;"),
        Theme::Dark => format!(
            "font-family: {BASE_FONT}; padding: 20px; color: #e1e4e8; background-color: #24292e;"
        ),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\nbody {{ {} }}\n</style>\n</head>\n<body><p>{}</p></body>\n</html>\n",
        body_style,
        escape_html(message)
    )
}

/// The page shown for the empty document
pub fn placeholder_page(theme: Theme) -> String {
    message_page(PLACEHOLDER_MESSAGE, theme)
}

/// Static page reporting a conversion failure
pub fn error_page(error: &str, theme: Theme) -> String {
    let (body_style, error_style) = match theme {
        Theme::Light => (
            "font-family: sans-serif; padding: 20px;",
            "color: #d73a49; background: #ffeef0; padding: 10px; border-radius: 4px;",
        ),
        Theme::Dark => (
            "font-family: sans-serif; padding: 20px; color: #e1e4e8; background-color: #24292e;",
            "color: #f85149; background: #3d2228; padding: 10px; border-radius: 4px;",
        ),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\nbody {{ {} }}\n.error {{ {} }}\n</style>\n</head>\n<body>\n<div class=\"error\"><strong>Error:</strong> {}</div>\n</body>\n</html>\n",
        body_style,
        error_style,
        escape_html(error)
    )
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_theme_css() {
        let light = page("<p>x</p>", Theme::Light);
        assert!(light.contains("color: #333;"));
        assert!(light.contains("<p>x</p>"));
        assert!(!light.contains("#24292e"));

        let dark = page("<p>x</p>", Theme::Dark);
        assert!(dark.contains("background-color: #24292e;"));
        assert!(dark.contains(".highlight .k { color: #ff7b72 }"));
    }

    #[test]
    fn test_placeholder_page() {
        let html = placeholder_page(Theme::Light);
        assert!(html.contains("<p>Preview will appear here...</p>"));
        assert!(html.contains("color: #666;"));
        assert!(placeholder_page(Theme::Dark).contains("#24292e"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page("bad <tag> & \"quote\"", Theme::Light);
        assert!(html.contains("bad &lt;tag&gt; &amp; &quot;quote&quot;"));
        assert!(html.contains("#ffeef0"));
        assert!(error_page("x", Theme::Dark).contains("#3d2228"));
    }

    #[test]
    fn test_css_is_stable() {
        assert_eq!(css(Theme::Dark), css(Theme::Dark));
        assert_ne!(css(Theme::Light), css(Theme::Dark));
    }
}
