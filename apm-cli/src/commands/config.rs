use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use apm_catalog::{Project, ProjectTrack, TableRow, Track};
use apm_store::Settings;

use crate::CliError;

use super::log_success;

/// Show resolved settings and their sources.
pub(crate) fn run_config_show(settings: &Settings) {
    let path = apm_store::settings_path();

    log::info!(
        "{}",
        "apm-agent Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let source = format!("[{}]", settings.data_dir_source);
    log::info!(
        "  data_dir: {} {}",
        settings.data_dir.display(),
        source.if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("  backup:   {}", settings.backup);

    for name in [Track::FILE_NAME, Project::FILE_NAME, ProjectTrack::FILE_NAME] {
        let table = settings.data_dir.join(name);
        let status = if table.exists() {
            "ok".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "missing".if_supports_color(Stdout, |t| t.red()).to_string()
        };
        log::info!("    {:<20} {}", name, status);
    }

    if let Some(contents) = apm_store::load_settings_string() {
        crate::log_blank();
        log::info!("{}", "Settings file contents:".if_supports_color(Stdout, |t| t.bold()));
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", apm_store::settings_path().display());
}

/// Save or clear the default data directory.
pub(crate) fn run_config_set_data_dir(dir: Option<PathBuf>) -> Result<(), CliError> {
    let dir = match dir {
        Some(d) if d.is_relative() => Some(
            std::env::current_dir()
                .map_err(|e| CliError::config(format!("Cannot resolve {}: {}", d.display(), e)))?
                .join(d),
        ),
        other => other,
    };

    let path = apm_store::save_data_dir(dir.as_deref())?;

    match &dir {
        Some(d) => log_success(&format!("Data directory set to {}", d.display())),
        None => log_success("Saved data directory cleared"),
    }
    log::info!("  Settings file: {}", path.display());
    Ok(())
}
