//! Whole-file CSV table I/O.
//!
//! Every operation loads a table completely and rewrites it completely.
//! Rewrites go through a sibling temp file and a rename, so a reader never
//! sees a half-written table.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{Project, ProjectTrack, Track};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Missing header row in {0}")]
    MissingHeader(String),
}

impl TableError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.display().to_string(),
            source,
        }
    }
}

/// A row type persisted as one CSV table.
pub trait TableRow: Serialize + DeserializeOwned {
    /// File name of the table inside the data directory.
    const FILE_NAME: &'static str;
    /// Header columns, in the order the struct's fields serialize.
    const HEADERS: &'static [&'static str];
}

impl TableRow for Track {
    const FILE_NAME: &'static str = "tracks.csv";
    const HEADERS: &'static [&'static str] = &[
        "id",
        "track_title",
        "track_description",
        "bpm",
        "duration",
        "album_title",
        "library_name",
        "composer",
        "genre",
        "additional_genres",
        "apm_release_date",
        "has_stems",
    ];
}

impl TableRow for Project {
    const FILE_NAME: &'static str = "projects.csv";
    const HEADERS: &'static [&'static str] = &[
        "project_id",
        "name",
        "description",
        "for_field",
        "keywords",
        "created_on",
        "modified_on",
        "status",
        "deadline",
        "collaborators",
    ];
}

impl TableRow for ProjectTrack {
    const FILE_NAME: &'static str = "project_tracks.csv";
    const HEADERS: &'static [&'static str] =
        &["project_id", "track_id", "added_date", "position", "notes"];
}

/// Options for [`write_table`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Copy the previous contents to a timestamped `.bak` file first.
    pub backup: bool,
}

/// Load every row of a table.
///
/// Unlike lookups over external data, a malformed row is an error here:
/// the caller is about to rewrite the file, and skipping a row would
/// silently delete it. Rows may omit trailing optional cells (spreadsheet
/// exports often drop an empty last column); those fields take their
/// defaults.
pub fn read_table<T: TableRow>(path: &Path) -> Result<Vec<T>, TableError> {
    let file = fs::File::open(path).map_err(|e| TableError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| TableError::csv(path, e))?;
    if headers.is_empty() {
        return Err(TableError::MissingHeader(path.display().to_string()));
    }

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| TableError::csv(path, e))?;
    log::debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Rewrite a table with the given rows, header first.
///
/// Returns the backup path when one was written.
pub fn write_table<T: TableRow>(
    path: &Path,
    rows: &[T],
    options: WriteOptions,
) -> Result<Option<PathBuf>, TableError> {
    let backup = if options.backup && path.exists() {
        let bak = unused_backup_path(path, Local::now().naive_local());
        fs::copy(path, &bak).map_err(|e| TableError::io(&bak, e))?;
        log::debug!("Backed up {} to {}", path.display(), bak.display());
        Some(bak)
    } else {
        None
    };

    let tmp = tmp_path(path);
    let written = write_rows(&tmp, rows)
        .and_then(|()| fs::rename(&tmp, path).map_err(|e| TableError::io(path, e)));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
        }
        return Err(e);
    }
    log::debug!("Wrote {} rows to {}", rows.len(), path.display());

    Ok(backup)
}

/// Create an empty (header-only) table if the file does not exist yet.
///
/// Returns `true` if the file was created.
pub fn init_table<T: TableRow>(path: &Path) -> Result<bool, TableError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TableError::io(parent, e))?;
    }
    write_table::<T>(path, &[], WriteOptions::default())?;
    Ok(true)
}

/// Backup location for a table: `projects.csv` becomes
/// `projects.csv.20250107-093000.bak`.
pub fn backup_path(path: &Path, at: NaiveDateTime) -> PathBuf {
    let stamp = at.format("%Y%m%d-%H%M%S");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.{stamp}.bak")),
        None => path.with_extension(format!("{stamp}.bak")),
    }
}

/// [`backup_path`], suffixed `-1`, `-2`, ... when an earlier backup from
/// the same second already exists.
fn unused_backup_path(path: &Path, at: NaiveDateTime) -> PathBuf {
    let first = backup_path(path, at);
    if !first.exists() {
        return first;
    }
    let stem = first.with_extension("");
    (1u32..)
        .map(|n| PathBuf::from(format!("{}-{n}.bak", stem.display())))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn tmp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}

fn write_rows<T: TableRow>(tmp: &Path, rows: &[T]) -> Result<(), TableError> {
    // Headers are written by hand: serde-derived headers only appear once
    // a first row is serialized, and an empty table still needs its header.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(tmp)
        .map_err(|e| TableError::csv(tmp, e))?;
    writer
        .write_record(T::HEADERS)
        .map_err(|e| TableError::csv(tmp, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| TableError::csv(tmp, e))?;
    }
    writer.flush().map_err(|e| TableError::io(tmp, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn backup_path_keeps_extension() {
        let at = NaiveDate::from_ymd_opt(2025, 1, 7)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            backup_path(Path::new("/data/projects.csv"), at),
            PathBuf::from("/data/projects.csv.20250107-093000.bak")
        );
        assert_eq!(
            backup_path(Path::new("/data/projects"), at),
            PathBuf::from("/data/projects.20250107-093000.bak")
        );
    }

    #[test]
    fn unused_backup_path_counts_past_taken_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        let table = tmp.path().join("projects.csv");
        let at = NaiveDate::from_ymd_opt(2025, 1, 7)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        let first = unused_backup_path(&table, at);
        assert_eq!(first, tmp.path().join("projects.csv.20250107-093000.bak"));
        fs::write(&first, "old").unwrap();

        let second = unused_backup_path(&table, at);
        assert_eq!(second, tmp.path().join("projects.csv.20250107-093000-1.bak"));
        fs::write(&second, "older").unwrap();

        assert_eq!(
            unused_backup_path(&table, at),
            tmp.path().join("projects.csv.20250107-093000-2.bak")
        );
    }

    #[test]
    fn tmp_path_is_sibling() {
        assert_eq!(
            tmp_path(Path::new("/data/tracks.csv")),
            PathBuf::from("/data/tracks.csv.tmp")
        );
    }
}
