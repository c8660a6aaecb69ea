//! Opening the input: a bare JSON export or a Takeout .zip bundle

use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Name of the location history entry inside a Takeout archive
pub const RECORDS_ENTRY: &str = "Records.json";

/// Open `path` and hand a reader over the location history JSON to `f`.
///
/// `.zip` archives are searched for a `Records.json` entry at any depth,
/// which is streamed without extracting it to disk.
pub fn with_input<T>(path: &str, f: impl FnOnce(&mut dyn Read) -> Result<T>) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open input: {}", path))?;

    let is_zip = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return f(&mut BufReader::new(file));
    }

    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("failed to read zip archive: {}", path))?;
    let entry_name = find_records_entry(archive.file_names())
        .ok_or_else(|| anyhow!("file '{}' not found in '{}'", RECORDS_ENTRY, path))?;
    tracing::info!(archive = %path, entry = %entry_name, "reading location history from archive");
    let mut entry = archive
        .by_name(&entry_name)
        .with_context(|| format!("failed to open {} in {}", entry_name, path))?;
    f(&mut entry)
}

fn find_records_entry<'a>(mut names: impl Iterator<Item = &'a str>) -> Option<String> {
    names
        .find(|name| {
            *name == RECORDS_ENTRY
                || name
                    .rsplit_once('/')
                    .is_some_and(|(_, file)| file == RECORDS_ENTRY)
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_find_records_entry() {
        let names = ["Takeout/archive_browser.html", "Takeout/Location History/Records.json"];
        assert_eq!(
            find_records_entry(names.into_iter()).as_deref(),
            Some("Takeout/Location History/Records.json")
        );
        assert_eq!(find_records_entry(["Records.json"].into_iter()).as_deref(), Some("Records.json"));
        assert_eq!(find_records_entry(["Takeout/OldRecords.json"].into_iter()), None);
    }

    #[test]
    fn test_reads_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, br#"{"locations": []}"#).unwrap();

        let content = with_input(path.to_str().unwrap(), |r| {
            let mut s = String::new();
            r.read_to_string(&mut s)?;
            Ok(s)
        })
        .unwrap();
        assert_eq!(content, r#"{"locations": []}"#);
    }

    #[test]
    fn test_reads_records_from_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("takeout.zip");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("Takeout/index.html", options).unwrap();
        zip.write_all(b"<html></html>").unwrap();
        zip.start_file("Takeout/Location History/Records.json", options).unwrap();
        zip.write_all(br#"{"locations": []}"#).unwrap();
        zip.finish().unwrap();

        let content = with_input(path.to_str().unwrap(), |r| {
            let mut s = String::new();
            r.read_to_string(&mut s)?;
            Ok(s)
        })
        .unwrap();
        assert_eq!(content, r#"{"locations": []}"#);
    }

    #[test]
    fn test_zip_without_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("takeout.zip");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("Takeout/index.html", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<html></html>").unwrap();
        zip.finish().unwrap();

        let err = with_input(path.to_str().unwrap(), |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("Records.json"));
    }

    #[test]
    fn test_missing_file() {
        let err = with_input("/nonexistent/export.json", |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("failed to open input"));
    }
}
