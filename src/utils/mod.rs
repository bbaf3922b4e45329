//! Utilities module for Cosmic MdEdit
//!
//! Shared helpers:
//! - Debouncing of preview renders
//! - Path utilities

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Identifies one scheduling of a [`Debouncer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Single-shot restartable timer
///
/// Every call to [`schedule`](Debouncer::schedule) supersedes the previous
/// one. Only the ticket of the latest scheduling fires, and only once.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: bool,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: false,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Stop any pending fire and start the timer again
    pub fn schedule(&mut self) -> Ticket {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        Ticket(self.generation)
    }

    /// Consume the pending fire if `ticket` is the latest one
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.pending && ticket.0 == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Future that resolves to `ticket` once the delay has elapsed
    pub fn wait(&self, ticket: Ticket) -> impl Future<Output = Ticket> + Send + 'static {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            ticket
        }
    }
}

/// Path utilities
pub mod path {
    use super::*;

    /// Get the file name without extension
    pub fn file_stem(path: &Path) -> Option<String> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
    }

    /// File name for display, falling back to the whole path
    pub fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Check if path has a markdown extension
    pub fn is_markdown(path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                crate::file_handler::MARKDOWN_EXTENSIONS
                    .iter()
                    .any(|m| ext.eq_ignore_ascii_case(m))
            })
            .unwrap_or(false)
    }

    /// Lexical relative path from directory `base` to `path`
    ///
    /// Both paths must be absolute. Returns `None` when they live on
    /// different roots (e.g. different Windows drives).
    pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
        if !path.is_absolute() || !base.is_absolute() {
            return None;
        }

        let path = normalize(path);
        let base = normalize(base);
        let path_parts: Vec<Component> = path.components().collect();
        let base_parts: Vec<Component> = base.components().collect();

        if path_parts.first() != base_parts.first() {
            return None;
        }

        let common = path_parts
            .iter()
            .zip(base_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = PathBuf::new();
        for _ in common..base_parts.len() {
            result.push("..");
        }
        for part in &path_parts[common..] {
            result.push(part.as_os_str());
        }
        Some(result)
    }

    /// Resolve `.` and `..` components without touching the filesystem
    pub fn normalize(path: &Path) -> PathBuf {
        let mut out = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !out.pop() {
                        out.push("..");
                    }
                }
                other => out.push(other.as_os_str()),
            }
        }
        out
    }

    /// Path rendered with forward slashes, as used in markdown links
    pub fn to_link(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debouncer_latest_ticket_wins() {
        let mut debouncer = Debouncer::from_millis(300);
        let first = debouncer.schedule();
        let second = debouncer.schedule();
        assert!(debouncer.is_pending());
        assert!(!debouncer.fire(first));
        assert!(debouncer.fire(second));
        assert!(!debouncer.fire(second));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_debouncer_cancel() {
        let mut debouncer = Debouncer::from_millis(300);
        let ticket = debouncer.schedule();
        debouncer.cancel();
        assert!(!debouncer.fire(ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_wait_respects_delay() {
        let mut debouncer = Debouncer::from_millis(300);
        let ticket = debouncer.schedule();
        let start = tokio::time::Instant::now();
        let fired = debouncer.wait(ticket).await;
        assert_eq!(fired, ticket);
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(debouncer.fire(fired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_burst_fires_once() {
        let mut debouncer = Debouncer::from_millis(300);
        let mut waits = Vec::new();
        for _ in 0..5 {
            let ticket = debouncer.schedule();
            waits.push(tokio::spawn(debouncer.wait(ticket)));
            tokio::time::advance(Duration::from_millis(50)).await;
        }

        let mut fired = 0;
        for handle in waits {
            let ticket = handle.await.unwrap();
            if debouncer.fire(ticket) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_is_markdown() {
        assert!(path::is_markdown(Path::new("test.md")));
        assert!(path::is_markdown(Path::new("test.markdown")));
        assert!(path::is_markdown(Path::new("TEST.MD")));
        assert!(!path::is_markdown(Path::new("test.txt")));
        assert!(!path::is_markdown(Path::new("md")));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            path::relative_to(Path::new("/docs/img/a.png"), Path::new("/docs")),
            Some(PathBuf::from("img/a.png"))
        );
        assert_eq!(
            path::relative_to(Path::new("/home/u/Pictures/a.png"), Path::new("/home/u/docs")),
            Some(PathBuf::from("../Pictures/a.png"))
        );
        assert_eq!(
            path::relative_to(Path::new("/docs/./img/../a.png"), Path::new("/docs")),
            Some(PathBuf::from("a.png"))
        );
        assert_eq!(path::relative_to(Path::new("img/a.png"), Path::new("/docs")), None);
    }

    #[test]
    fn test_to_link_uses_forward_slashes() {
        assert_eq!(path::to_link(Path::new("../img/a.png")), "../img/a.png");
        assert_eq!(path::to_link(Path::new("/abs/a.png")), "/abs/a.png");
        assert_eq!(path::to_link(Path::new(r"img\a.png")), "img/a.png");
        assert_eq!(
            path::to_link(Path::new(r"C:\Users\me\img\a.png")),
            "C:/Users/me/img/a.png"
        );
        assert_eq!(
            path::to_link(Path::new(r"\\server\share\a.png")),
            "//server/share/a.png"
        );
    }
}
