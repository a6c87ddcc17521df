use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::analyzer::Language;

/// Upload formats carried over from the original tool. `.txt` is
/// accepted but carries no language of its own.
pub const SUPPORTED_EXTENSIONS: [&str; 8] = ["py", "cpp", "java", "js", "ts", "go", "rs", "txt"];

#[derive(Debug)]
pub struct SourceFile {
    pub code: String,
    /// Inferred from the extension; `None` for `.txt`, in which case
    /// the caller must name the language explicitly.
    pub language: Option<Language>,
}

/// Reads a source file for analysis: extension must be one of the
/// supported set, contents must be UTF-8. No other validation.
pub fn load_source(path: &Path) -> Result<SourceFile> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        bail!(
            "Unsupported file type '{}' (expected one of: {})",
            path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        );
    }

    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))?;
    let code = String::from_utf8(bytes)
        .with_context(|| format!("File {} is not valid UTF-8 text", path.display()))?;

    Ok(SourceFile {
        code,
        language: Language::from_extension(&extension),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn loads_source_and_infers_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "snippet.py", b"print(1)\n");

        let source = load_source(&path).unwrap();
        assert_eq!(source.code, "print(1)\n");
        assert_eq!(source.language, Some(Language::Python));
    }

    #[test]
    fn txt_files_load_without_a_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", b"SELECT 1;\n");

        let source = load_source(&path).unwrap();
        assert_eq!(source.language, None);
    }

    #[test]
    fn rejects_unsupported_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "binary.exe", b"\x00\x01");

        let err = load_source(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file type"));
    }

    #[test]
    fn rejects_non_utf8_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.py", &[0xff, 0xfe, 0x00]);

        let err = load_source(&path).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
