//! One-shot scroll hints handed to a diff view on navigation.

use super::HighlightRange;

/// Target file and optional line range for a deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollHint {
    /// Repository-relative path, no leading separator.
    pub file: String,
    pub lines: Option<HighlightRange>,
}

impl ScrollHint {
    /// Hint for a whole file. Empty paths produce no hint.
    pub fn for_file(path: &str) -> Option<Self> {
        let file = path.trim().trim_start_matches('/');
        if file.is_empty() {
            return None;
        }
        Some(Self {
            file: file.to_string(),
            lines: None,
        })
    }

    pub fn with_lines(mut self, range: HighlightRange) -> Self {
        self.lines = Some(range);
        self
    }

    /// Build a hint from the two raw strings a writer provides.
    ///
    /// A missing file means no hint at all; a malformed range keeps the file.
    pub fn from_raw(file: Option<&str>, range_text: Option<&str>) -> Option<Self> {
        let hint = Self::for_file(file?)?;
        Some(match range_text.and_then(HighlightRange::from_anchor) {
            Some(range) => hint.with_lines(range),
            None => hint,
        })
    }
}

/// Single-slot mailbox carrying a hint across one navigation.
///
/// `take` empties the slot, so a hint is delivered at most once.
#[derive(Debug, Default)]
pub struct HintMailbox {
    slot: Option<ScrollHint>,
}

impl HintMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a hint, replacing one that was never consumed.
    pub fn post(&mut self, hint: ScrollHint) {
        if let Some(previous) = self.slot.replace(hint) {
            log::debug!("Dropping unconsumed scroll hint for {}", previous.file);
        }
    }

    pub fn take(&mut self) -> Option<ScrollHint> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_raw() {
        let hint = ScrollHint::from_raw(Some("/src/a.ts"), Some("Line 7")).unwrap();
        assert_eq!(hint.file, "src/a.ts");
        assert_eq!(hint.lines, Some(HighlightRange::single(7)));

        let hint = ScrollHint::from_raw(Some("src/a.ts"), Some("garbage")).unwrap();
        assert_eq!(hint.lines, None);

        assert_eq!(ScrollHint::from_raw(None, Some("Line 7")), None);
        assert_eq!(ScrollHint::from_raw(Some("/"), None), None);
    }

    #[test]
    fn test_mailbox_delivers_once() {
        let mut mailbox = HintMailbox::new();
        assert!(mailbox.take().is_none());

        mailbox.post(ScrollHint::for_file("a.rs").unwrap());
        mailbox.post(ScrollHint::for_file("b.rs").unwrap());
        assert!(!mailbox.is_empty());

        assert_eq!(mailbox.take().map(|h| h.file), Some("b.rs".to_string()));
        assert!(mailbox.take().is_none());
        assert!(mailbox.is_empty());
    }
}
