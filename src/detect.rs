//! PDF format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

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

/// MIME type accepted as input.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Detect PDF format from a file path.
///
/// # Example
/// ```no_run
/// use bandfilter::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("schedules.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let read = reader.read(&mut header)?;
    detect_format_from_bytes(&header[..read])
}

/// Detect PDF format from the leading bytes of a file.
///
/// Fails with [`Error::Validation`] when the data does not start with a
/// `%PDF-x.y` header.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::Validation(
            "Please select a valid PDF file.".to_string(),
        ));
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::Validation(format!(
            "unsupported PDF version header: {}",
            version
        )));
    }

    Ok(PdfFormat { version })
}

/// Check that a declared MIME type names a PDF.
pub fn check_mime_type(mime: &str) -> Result<()> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(PDF_MIME_TYPE) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "expected {}, got {}",
            PDF_MIME_TYPE, mime
        )))
    }
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

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_format_from_bytes(b"%PDF");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_detect_bad_version() {
        let result = detect_format_from_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
        assert!(!is_pdf_bytes(b""));
    }

    #[test]
    fn test_mime_type() {
        assert!(check_mime_type("application/pdf").is_ok());
        assert!(check_mime_type("Application/PDF; charset=binary").is_ok());
        assert!(check_mime_type("text/html").is_err());
    }

    #[test]
    fn test_detect_from_path() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.5\n").unwrap();
        assert_eq!(detect_format_from_path(file.path()).unwrap().version, "1.5");
    }
}
