//! Drag-and-drop validation
//!
//! Only local markdown files are accepted. Remote URLs and files with any
//! other extension are rejected before a load is attempted.

use crate::utils::path::is_markdown;
use std::path::PathBuf;
use url::Url;

/// A single item dropped onto the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropItem {
    /// A path delivered directly by the windowing system
    Path(PathBuf),
    /// A URI from a `text/uri-list` payload
    Uri(String),
}

impl DropItem {
    /// Parse one line of a `text/uri-list` payload
    pub fn from_uri_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some(DropItem::Uri(line.to_string()))
    }

    /// The local filesystem path this item refers to, if any
    pub fn local_path(&self) -> Option<PathBuf> {
        match self {
            DropItem::Path(path) => Some(path.clone()),
            DropItem::Uri(uri) => file_uri_to_path(uri),
        }
    }
}

/// Whether the drop should be accepted at all
pub fn accepts(items: &[DropItem]) -> bool {
    items.iter().any(|item| markdown_path(item).is_some())
}

/// Local markdown paths among the dropped items, in drop order
pub fn markdown_paths(items: &[DropItem]) -> Vec<PathBuf> {
    items.iter().filter_map(markdown_path).collect()
}

fn markdown_path(item: &DropItem) -> Option<PathBuf> {
    item.local_path().filter(|p| is_markdown(p))
}

/// Convert a `file://` URI to a path; every other scheme yields `None`
///
/// Only an empty host or `localhost` is local. Escapes are decoded.
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let url = Url::parse(uri.trim()).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok().filter(|path| path.is_absolute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_local_markdown_paths() {
        let items = vec![DropItem::Path(PathBuf::from("/home/u/notes.md"))];
        assert!(accepts(&items));
        assert_eq!(markdown_paths(&items), vec![PathBuf::from("/home/u/notes.md")]);

        let items = vec![DropItem::Path(PathBuf::from("/home/u/README.Markdown"))];
        assert!(accepts(&items));
    }

    #[test]
    fn test_rejects_non_markdown() {
        let items = vec![
            DropItem::Path(PathBuf::from("/home/u/photo.png")),
            DropItem::Path(PathBuf::from("/home/u/notes.txt")),
            DropItem::Path(PathBuf::from("/home/u/md")),
        ];
        assert!(!accepts(&items));
        assert!(markdown_paths(&items).is_empty());
    }

    #[test]
    fn test_rejects_remote_urls() {
        let items = vec![
            DropItem::Uri("https://example.com/readme.md".to_string()),
            DropItem::Uri("file://server.example/share/readme.md".to_string()),
        ];
        assert!(!accepts(&items));
    }

    #[test]
    fn test_decodes_file_uris() {
        let item = DropItem::from_uri_line("file:///home/u/My%20Notes/a%C3%A9.md\r").unwrap();
        assert_eq!(
            item.local_path(),
            Some(PathBuf::from("/home/u/My Notes/aé.md"))
        );
        assert!(accepts(&[item]));

        let localhost = DropItem::Uri("FILE://localhost/tmp/x.md".to_string());
        assert_eq!(localhost.local_path(), Some(PathBuf::from("/tmp/x.md")));
    }

    #[test]
    fn test_uri_list_comments() {
        assert!(DropItem::from_uri_line("# comment").is_none());
        assert!(DropItem::from_uri_line("   ").is_none());
    }

    #[test]
    fn test_non_ascii_and_malformed_uris() {
        assert_eq!(file_uri_to_path("€€€"), None);
        assert_eq!(file_uri_to_path("fïle:///tmp/a.md"), None);
        assert_eq!(
            file_uri_to_path("file:///tmp/€.md"),
            Some(PathBuf::from("/tmp/€.md"))
        );
        assert!(!accepts(&[DropItem::Uri("€€€ notes.md".to_string())]));
    }

    #[test]
    fn test_mixed_drop_keeps_markdown_only() {
        let items = vec![
            DropItem::Path(PathBuf::from("/a/pic.jpg")),
            DropItem::Uri("file:///a/b.md".to_string()),
        ];
        assert_eq!(markdown_paths(&items), vec![PathBuf::from("/a/b.md")]);
    }
}
