//! Search hit type.

use serde::{Deserialize, Serialize};

/// A search match with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page number (1-indexed)
    pub page: u32,

    /// Context window around the match, newlines flattened
    pub snippet: String,

    /// The window was clipped before the start of the page text
    pub truncated_left: bool,

    /// The window was clipped before the end of the page text
    pub truncated_right: bool,
}

impl std::fmt::Display for SearchHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Page {}] {}{}{}",
            self.page,
            if self.truncated_left { "..." } else { "" },
            self.snippet,
            if self.truncated_right { "..." } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_ellipses() {
        let hit = SearchHit {
            page: 4,
            snippet: "the attention mechanism".to_string(),
            truncated_left: true,
            truncated_right: false,
        };
        assert_eq!(hit.to_string(), "[Page 4] ...the attention mechanism");
    }
}
