//! Formatting toolbar actions
//!
//! Each action turns the current selection (if any) into the text that
//! replaces it. Wrapping actions without a selection insert an empty pair
//! and leave the cursor between the markers.

/// A toolbar formatting or insert action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatAction {
    Bold,
    Italic,
    Code,
    Link,
    BulletList,
    NumberedList,
    Quote,
    HorizontalRule,
}

/// Text to put in place of the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    /// Characters to move the cursor back after inserting `text`
    pub cursor_back: usize,
}

impl Insertion {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor_back: 0,
        }
    }
}

impl FormatAction {
    pub const ALL: [FormatAction; 8] = [
        FormatAction::Bold,
        FormatAction::Italic,
        FormatAction::Code,
        FormatAction::Link,
        FormatAction::BulletList,
        FormatAction::NumberedList,
        FormatAction::Quote,
        FormatAction::HorizontalRule,
    ];

    /// Toolbar button label
    pub fn label(&self) -> &'static str {
        match self {
            FormatAction::Bold => "B",
            FormatAction::Italic => "I",
            FormatAction::Code => "`",
            FormatAction::Link => "🔗 Link",
            FormatAction::BulletList => "• List",
            FormatAction::NumberedList => "1. Num List",
            FormatAction::Quote => "> Quote",
            FormatAction::HorizontalRule => "--- Rule",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            FormatAction::Bold => "Bold (Ctrl+B)",
            FormatAction::Italic => "Italic (Ctrl+I)",
            FormatAction::Code => "Code",
            FormatAction::Link => "Insert link",
            FormatAction::BulletList => "Insert bulleted list",
            FormatAction::NumberedList => "Insert numbered list",
            FormatAction::Quote => "Quote selection",
            FormatAction::HorizontalRule => "Insert horizontal rule",
        }
    }

    /// Compute the replacement for `selection`
    pub fn apply(&self, selection: Option<&str>) -> Insertion {
        let selection = selection.filter(|s| !s.is_empty());

        match self {
            FormatAction::Bold => wrap("**", "**", selection),
            FormatAction::Italic => wrap("*", "*", selection),
            FormatAction::Code => wrap("`", "`", selection),
            FormatAction::Link => match selection {
                Some(text) => Insertion::plain(format!("[{}](https://)", text)),
                None => Insertion::plain("[link text](https://)"),
            },
            FormatAction::BulletList => Insertion::plain("- Item 1\n- Item 2\n- Item 3\n"),
            FormatAction::NumberedList => Insertion::plain("1. Item 1\n2. Item 2\n3. Item 3\n"),
            FormatAction::Quote => match selection {
                Some(text) => Insertion::plain(
                    text.split('\n')
                        .map(|line| format!("> {}", line))
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
                None => Insertion::plain("> Quote text here\n"),
            },
            FormatAction::HorizontalRule => Insertion::plain("\n---\n"),
        }
    }
}

fn wrap(before: &str, after: &str, selection: Option<&str>) -> Insertion {
    match selection {
        Some(text) => Insertion::plain(format!("{}{}{}", before, text, after)),
        None => Insertion {
            text: format!("{}{}", before, after),
            cursor_back: after.chars().count(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_selection() {
        assert_eq!(FormatAction::Bold.apply(Some("word")), Insertion::plain("**word**"));
        assert_eq!(FormatAction::Code.apply(Some("x")), Insertion::plain("`x`"));
    }

    #[test]
    fn test_wrap_without_selection_places_cursor_inside() {
        let insertion = FormatAction::Bold.apply(None);
        assert_eq!(insertion.text, "****");
        assert_eq!(insertion.cursor_back, 2);

        let insertion = FormatAction::Italic.apply(Some(""));
        assert_eq!(insertion.text, "**");
        assert_eq!(insertion.cursor_back, 1);
    }

    #[test]
    fn test_link() {
        assert_eq!(FormatAction::Link.apply(Some("docs")).text, "[docs](https://)");
        assert_eq!(FormatAction::Link.apply(None).text, "[link text](https://)");
    }

    #[test]
    fn test_quote_prefixes_every_line() {
        assert_eq!(FormatAction::Quote.apply(Some("a\nb")).text, "> a\n> b");
        assert_eq!(FormatAction::Quote.apply(None).text, "> Quote text here\n");
    }

    #[test]
    fn test_fixed_insertions() {
        assert_eq!(FormatAction::HorizontalRule.apply(Some("ignored")).text, "\n---\n");
        assert_eq!(
            FormatAction::NumberedList.apply(None).text,
            "1. Item 1\n2. Item 2\n3. Item 3\n"
        );
    }
}
