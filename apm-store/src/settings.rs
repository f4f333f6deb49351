//! Shared settings: where the catalog tables live and whether rewrites
//! keep backups.
//!
//! The settings file is `~/.config/apm-agent/settings.toml`:
//!
//! ```toml
//! [data]
//! dir = "/srv/apm/data"
//! backup = true
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "APM_DATA_DIR";

/// Data directory used when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Canonical path to the settings file: `~/.config/apm-agent/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("apm-agent").join("settings.toml")
}

/// Where the resolved data directory came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDirSource {
    CommandLine,
    EnvVar(&'static str),
    SettingsFile,
    Default,
}

impl fmt::Display for DataDirSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::SettingsFile => write!(f, "settings file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub data_dir_source: DataDirSource,
    pub backup: bool,
}

/// Resolve settings using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. `$APM_DATA_DIR`
/// 3. `data.dir` in `settings.toml`
/// 4. `./data`
///
/// Backups are on if either the CLI flag or `data.backup` asks for them.
pub fn resolve_settings(cli_data_dir: Option<PathBuf>, cli_backup: bool) -> Settings {
    let env_dir = std::env::var(DATA_DIR_ENV).ok();
    let doc = load_settings_doc(&settings_path());
    resolve_with(cli_data_dir, cli_backup, env_dir, doc.as_ref())
}

fn resolve_with(
    cli_data_dir: Option<PathBuf>,
    cli_backup: bool,
    env_dir: Option<String>,
    doc: Option<&toml::Value>,
) -> Settings {
    let data = doc.and_then(|d| d.get("data"));
    let file_dir = data
        .and_then(|d| d.get("dir"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());
    let file_backup = data
        .and_then(|d| d.get("backup"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let (data_dir, data_dir_source) = if let Some(dir) = cli_data_dir {
        (dir, DataDirSource::CommandLine)
    } else if let Some(dir) = env_dir.filter(|s| !s.is_empty()) {
        (PathBuf::from(dir), DataDirSource::EnvVar(DATA_DIR_ENV))
    } else if let Some(dir) = file_dir {
        (PathBuf::from(dir), DataDirSource::SettingsFile)
    } else {
        (PathBuf::from(DEFAULT_DATA_DIR), DataDirSource::Default)
    };

    Settings {
        data_dir,
        data_dir_source,
        backup: cli_backup || file_backup,
    }
}

fn load_settings_doc(path: &Path) -> Option<toml::Value> {
    let contents = std::fs::read_to_string(path).ok()?;
    match contents.parse::<toml::Value>() {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
            None
        }
    }
}

/// Save (or clear) `data.dir` in `settings.toml`. Returns the file written.
pub fn save_data_dir(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = settings_path();
    save_data_dir_at(&path, dir)?;
    Ok(path)
}

/// The current settings document for an update, or an empty one if the
/// file does not exist. A file that exists but does not parse is an error:
/// rewriting it would drop whatever the user had in it.
fn settings_doc_for_update(settings: &Path) -> io::Result<toml::Value> {
    let contents = match std::fs::read_to_string(settings) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(toml::Value::Table(toml::Table::new()));
        }
        Err(e) => return Err(e),
    };
    contents.parse::<toml::Value>().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is not valid TOML: {e}", settings.display()),
        )
    })
}

/// Uses `toml::Value` for a surgical update so unrelated keys survive.
fn save_data_dir_at(settings: &Path, dir: Option<&Path>) -> io::Result<()> {
    let mut doc = settings_doc_for_update(settings)?;
    let data = data_section(&mut doc, settings)?;
    match dir {
        Some(dir) => {
            let value = toml::Value::String(dir.to_string_lossy().into_owned());
            data.insert("dir".to_string(), value);
        }
        None => {
            data.remove("dir");
        }
    }
    write_settings_doc(settings, &doc)
}

/// The `[data]` table of a settings document, created if absent.
fn data_section<'a>(doc: &'a mut toml::Value, settings: &Path) -> io::Result<&'a mut toml::Table> {
    let not_a_table = |what: &str| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{what} in {} is not a table", settings.display()),
        )
    };
    doc.as_table_mut()
        .ok_or_else(|| not_a_table("document root"))?
        .entry("data")
        .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| not_a_table("[data]"))
}

/// Replace the settings file through a sibling temp file.
fn write_settings_doc(settings: &Path, doc: &toml::Value) -> io::Result<()> {
    let serialized = toml::to_string_pretty(doc).map_err(io::Error::other)?;
    if let Some(dir) = settings.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, serialized)?;
    std::fs::rename(&tmp, settings).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp);
    })
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let doc = load_settings_doc(&settings_path())?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(s: &str) -> toml::Value {
        s.parse().unwrap()
    }

    #[test]
    fn cli_override_wins() {
        let file = doc("[data]\ndir = \"/from/file\"\n");
        let s = resolve_with(
            Some(PathBuf::from("/from/cli")),
            false,
            Some("/from/env".to_string()),
            Some(&file),
        );
        assert_eq!(s.data_dir, PathBuf::from("/from/cli"));
        assert_eq!(s.data_dir_source, DataDirSource::CommandLine);
    }

    #[test]
    fn env_beats_settings_file() {
        let file = doc("[data]\ndir = \"/from/file\"\n");
        let s = resolve_with(None, false, Some("/from/env".to_string()), Some(&file));
        assert_eq!(s.data_dir, PathBuf::from("/from/env"));
        assert_eq!(s.data_dir_source, DataDirSource::EnvVar(DATA_DIR_ENV));
    }

    #[test]
    fn settings_file_then_default() {
        let file = doc("[data]\ndir = \"/from/file\"\nbackup = true\n");
        let s = resolve_with(None, false, None, Some(&file));
        assert_eq!(s.data_dir, PathBuf::from("/from/file"));
        assert_eq!(s.data_dir_source, DataDirSource::SettingsFile);
        assert!(s.backup);

        let s = resolve_with(None, false, Some(String::new()), None);
        assert_eq!(s.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(s.data_dir_source, DataDirSource::Default);
        assert!(!s.backup);
    }

    #[test]
    fn cli_backup_flag_enables_backup() {
        let s = resolve_with(None, true, None, None);
        assert!(s.backup);
    }

    #[test]
    fn save_data_dir_preserves_other_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("apm-agent").join("settings.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[data]\nbackup = true\n\n[ui]\ncolor = false\n").unwrap();

        save_data_dir_at(&path, Some(Path::new("/srv/apm"))).unwrap();
        let saved = load_settings_doc(&path).unwrap();
        assert_eq!(saved["data"]["dir"].as_str(), Some("/srv/apm"));
        assert_eq!(saved["data"]["backup"].as_bool(), Some(true));
        assert_eq!(saved["ui"]["color"].as_bool(), Some(false));

        save_data_dir_at(&path, None).unwrap();
        let cleared = load_settings_doc(&path).unwrap();
        assert!(cleared["data"].get("dir").is_none());
    }

    #[test]
    fn save_data_dir_refuses_unparseable_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        let broken = "[data\nbackup = true\n[ui]\ncolor = false\n";
        std::fs::write(&path, broken).unwrap();

        let err = save_data_dir_at(&path, Some(Path::new("/srv/apm"))).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
        assert!(!tmp.path().join("settings.toml.tmp").exists());
    }

    #[test]
    fn save_data_dir_creates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("apm-agent").join("settings.toml");

        save_data_dir_at(&path, Some(Path::new("/srv/apm"))).unwrap();
        let saved = load_settings_doc(&path).unwrap();
        assert_eq!(saved["data"]["dir"].as_str(), Some("/srv/apm"));
    }
}
