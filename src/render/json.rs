//! JSON rendering of navigation results.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any result type to JSON.
///
/// Image bytes are not serialized; callers that ship images encode them
/// separately.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::PageImages;
    use crate::model::{OutlineEntry, Toc, TocSource};

    #[test]
    fn test_to_json_pretty() {
        let toc = Toc::new(vec![OutlineEntry::new(1, "Intro", 1)], TocSource::Native);
        let json = to_json(&toc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Intro\""));
        assert!(json.contains("\"source\": \"native\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&PageImages::NoImages { page: 3 }, JsonFormat::Compact).unwrap();
        assert_eq!(json, r#"{"status":"no_images","page":3}"#);
    }
}
