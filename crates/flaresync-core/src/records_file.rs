// ── Records and restrictions files ──
//
// Declared records live in a JSON array of `{ description, repo, owner,
// record }` entries; restrictions in `{ "restricted_subdomain": [...] }`.
// Files are written tab-indented so diffs in review stay readable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::model::DeclaredRecord;
use crate::restrict::RestrictionList;

/// On-disk layout of a restrictions file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionsFile {
    #[serde(default)]
    pub restricted_subdomain: Vec<String>,
}

fn read(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|source| CoreError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a declared-records file.
pub fn load_entries(path: &Path) -> Result<Vec<DeclaredRecord>, CoreError> {
    load_entries_with_text(path).map(|(entries, _)| entries)
}

/// Read a declared-records file, also returning its text as read.
pub fn load_entries_with_text(path: &Path) -> Result<(Vec<DeclaredRecord>, String), CoreError> {
    let raw = read(path)?;
    let entries: Vec<DeclaredRecord> =
        serde_json::from_str(&raw).map_err(|source| CoreError::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), count = entries.len(), "loaded declared records");
    Ok((entries, raw))
}

/// Serialize entries as tab-indented JSON with a trailing newline.
pub fn render_entries(entries: &[DeclaredRecord]) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    // Only string keys and plain values: serializing into a Vec is infallible.
    if entries.serialize(&mut ser).is_err() {
        return String::from("[]\n");
    }
    let mut out = String::from_utf8_lossy(&buf).into_owned();
    out.push('\n');
    out
}

/// Overwrite `path` with `entries`.
pub fn write_entries(path: &Path, entries: &[DeclaredRecord]) -> Result<(), CoreError> {
    std::fs::write(path, render_entries(entries)).map_err(|source| CoreError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = entries.len(), "wrote declared records");
    Ok(())
}

/// Read the raw restriction patterns. No file means no restrictions.
pub fn load_patterns(path: Option<&Path>) -> Result<Vec<String>, CoreError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = read(path)?;
    let file: RestrictionsFile =
        serde_json::from_str(&raw).map_err(|source| CoreError::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file.restricted_subdomain)
}

/// Write a restrictions file holding `patterns`.
pub fn write_patterns(path: &Path, patterns: &[String]) -> Result<(), CoreError> {
    let file = RestrictionsFile {
        restricted_subdomain: patterns.to_vec(),
    };
    let write_err = |source: std::io::Error| CoreError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    let mut raw = serde_json::to_string_pretty(&file).map_err(|e| write_err(e.into()))?;
    raw.push('\n');
    std::fs::write(path, raw).map_err(write_err)
}

/// Read and compile a restrictions file.
pub fn load_restrictions(path: Option<&Path>, anchored: bool) -> Result<RestrictionList, CoreError> {
    RestrictionList::compile(&load_patterns(path)?, anchored)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DnsRecord;

    #[test]
    fn entries_written_with_tabs_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let entries = vec![DeclaredRecord::from(
            DnsRecord::new("CNAME", "www", "example.com").proxied(true),
        )];

        write_entries(&path, &entries).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n\t{\n\t\t\"record\""));
        assert!(raw.ends_with("]\n"));
        assert_eq!(load_entries(&path).unwrap(), entries);
    }

    #[test]
    fn loaded_text_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let raw = r#"[ { "record": { "type": "A", "name": "@", "content": "1.2.3.4" } } ]"#;
        std::fs::write(&path, raw).unwrap();

        let (entries, text) = load_entries_with_text(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(text, raw);
    }

    #[test]
    fn missing_records_file_names_the_path() {
        let err = load_entries(Path::new("/nonexistent/records.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/records.json"));
    }

    #[test]
    fn malformed_records_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_entries(&path).unwrap_err(),
            CoreError::ParseFile { .. }
        ));
    }

    #[test]
    fn written_patterns_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restricted.json");
        let patterns = vec!["ww([0-9]+)".to_owned(), "api".to_owned()];

        write_patterns(&path, &patterns).unwrap();
        assert_eq!(load_patterns(Some(&path)).unwrap(), patterns);
    }

    #[test]
    fn restrictions_file_is_optional() {
        assert!(load_restrictions(None, false).unwrap().is_empty());
    }

    #[test]
    fn restrictions_loaded_and_compiled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restricted.json");
        std::fs::write(&path, r#"{ "restricted_subdomain": ["^mail$", "api"] }"#).unwrap();

        let list = load_restrictions(Some(&path), false).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_restricted("mail.example.com", "example.com"));

        std::fs::write(&path, r#"{ "restricted_subdomain": ["[bad"] }"#).unwrap();
        assert!(matches!(
            load_restrictions(Some(&path), false).unwrap_err(),
            CoreError::InvalidPattern { .. }
        ));
    }
}
