//! Path resolution and PDF validation.
//!
//! Every path-based operation funnels through [`resolve_pdf_path`], which
//! yields the canonical absolute path used as the document cache key.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Resolve a user-supplied path to the canonical path of an existing PDF.
///
/// Fails with [`Error::NotFound`] when nothing exists at the path and with
/// [`Error::InvalidFormat`] when the file lacks a `.pdf` extension or a PDF
/// header.
///
/// # Example
/// ```no_run
/// use pdfnav::detect::resolve_pdf_path;
///
/// let path = resolve_pdf_path("papers/attention.pdf").unwrap();
/// assert!(path.is_absolute());
/// ```
pub fn resolve_pdf_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let resolved = path
        .canonicalize()
        .map_err(|_| Error::NotFound(absolute_display(path)))?;

    if !has_pdf_extension(&resolved) {
        return Err(Error::InvalidFormat(resolved.display().to_string()));
    }

    match detect_format_from_path(&resolved) {
        Ok(_) => Ok(resolved),
        Err(Error::Io(_)) | Err(Error::UnknownFormat) => {
            Err(Error::InvalidFormat(resolved.display().to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Best-effort absolute form of a path that may not exist, for messages.
fn absolute_display(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Check for a case-insensitive `.pdf` extension.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Detect PDF format from a file path by reading its header.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 16];
    let read = file.read(&mut header)?;
    detect_format_from_bytes(&header[..read])
}

/// Detect PDF format from the leading bytes of a file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_valid_pdf() {
        let format = detect_format_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_detect_invalid_header() {
        assert!(matches!(
            detect_format_from_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            detect_format_from_bytes(b"%PDF"),
            Err(Error::UnknownFormat)
        ));
        assert!(!is_pdf_bytes(b""));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.4"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("x.y"));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(has_pdf_extension(Path::new("paper.PDF")));
        assert!(has_pdf_extension(Path::new("dir/paper.pdf")));
        assert!(!has_pdf_extension(Path::new("paper.txt")));
        assert!(!has_pdf_extension(Path::new("paper")));
    }

    #[test]
    fn test_resolve_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_pdf_path(dir.path().join("nope.pdf"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_resolve_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();
        assert!(matches!(
            resolve_pdf_path(&path),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_resolve_fake_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"hello, not a pdf").unwrap();
        assert!(matches!(
            resolve_pdf_path(&path),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_resolve_valid_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();
        let resolved = resolve_pdf_path(&path).unwrap();
        assert!(resolved.is_absolute());
    }
}
