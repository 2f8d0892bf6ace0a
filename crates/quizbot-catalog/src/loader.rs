//! Reading and decoding quiz source files.

use std::path::Path;

use encoding_rs::Encoding;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::parser::parse_catalog;

/// Encoding of the trivia database exports the bot was built around.
pub const DEFAULT_ENCODING: &str = "koi8-r";

/// Loads a catalog from `path`, decoding it with the encoding named by
/// `encoding_label` (any WHATWG label, e.g. `koi8-r`, `utf-8`,
/// `windows-1251`).
///
/// # Errors
///
/// Returns `CatalogError::UnknownEncoding` for an unrecognised label,
/// `CatalogError::Io` if the file cannot be read, `CatalogError::Encoding`
/// if the bytes are malformed for the encoding, and any parse error from
/// [`parse_catalog`].
pub fn load_catalog(path: &Path, encoding_label: &str) -> Result<Catalog, CatalogError> {
    let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
        .ok_or_else(|| CatalogError::UnknownEncoding(encoding_label.to_owned()))?;

    let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = decode_catalog(&bytes, encoding)?;
    info!(
        path = %path.display(),
        encoding = encoding.name(),
        entries = catalog.len(),
        "quiz catalog loaded"
    );
    Ok(catalog)
}

/// Decodes raw source bytes and parses them.
///
/// # Errors
///
/// Returns `CatalogError::Encoding` if the bytes are malformed for
/// `encoding`, and any parse error from [`parse_catalog`].
pub fn decode_catalog(bytes: &[u8], encoding: &'static Encoding) -> Result<Catalog, CatalogError> {
    let text = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(CatalogError::Encoding {
            encoding: encoding.name(),
        })?;
    parse_catalog(&text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use encoding_rs::{KOI8_R, UTF_8};

    use super::*;

    const SOURCE: &str = "Вопрос 1:\nСколько будет\nдва плюс два?\n\nОтвет:\nЧетыре\n\n";

    fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "quizbot-catalog-{}-{name}",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_decode_catalog_reads_koi8r_bytes() {
        // Arrange
        let (bytes, _, had_errors) = KOI8_R.encode(SOURCE);
        assert!(!had_errors);

        // Act
        let catalog = decode_catalog(&bytes, KOI8_R).unwrap();

        // Assert
        assert_eq!(catalog.get("Сколько будет два плюс два?"), Some("Четыре"));
    }

    #[test]
    fn test_decode_catalog_rejects_malformed_utf8() {
        let result = decode_catalog(&[0x56, 0xff, 0xfe, 0x0a], UTF_8);

        assert!(matches!(
            result,
            Err(CatalogError::Encoding { encoding: "UTF-8" })
        ));
    }

    #[test]
    fn test_load_catalog_reads_file_with_default_encoding() {
        // Arrange
        let (bytes, _, _) = KOI8_R.encode(SOURCE);
        let path = temp_file("default.txt", &bytes);

        // Act
        let catalog = load_catalog(&path, DEFAULT_ENCODING).unwrap();

        // Assert
        assert_eq!(catalog.len(), 1);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_catalog_rejects_unknown_encoding_label() {
        let result = load_catalog(Path::new("/nonexistent"), "klingon");

        assert!(matches!(result, Err(CatalogError::UnknownEncoding(label)) if label == "klingon"));
    }

    #[test]
    fn test_load_catalog_reports_missing_file() {
        let result = load_catalog(Path::new("/nonexistent/quiz.txt"), DEFAULT_ENCODING);

        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
