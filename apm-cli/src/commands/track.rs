use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use apm_store::{CatalogStore, StoreError, UNKNOWN_TITLE};

use crate::CliError;

use super::{log_success, or_none};

/// Display title for a track, tolerating tracks missing from the catalog.
fn track_title(store: &CatalogStore, track_id: &str) -> Result<String, CliError> {
    match store.get_track(track_id) {
        Ok(track) => Ok(track.track_title),
        Err(StoreError::TrackNotFound(_)) => Ok(UNKNOWN_TITLE.to_string()),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn run_add_track(
    store: &CatalogStore,
    project_id: &str,
    track_id: &str,
    notes: &str,
) -> Result<(), CliError> {
    let row = store.add_track(project_id, track_id, notes)?;
    let title = track_title(store, track_id)?;

    log_success(&format!(
        "Added track to {} at position {}",
        project_id, row.position
    ));
    log::info!("  Track: {} ({})", title, track_id);
    if !notes.is_empty() {
        log::info!("  Notes: {}", notes);
    }

    Ok(())
}

pub(crate) fn run_remove_track(
    store: &CatalogStore,
    project_id: &str,
    track_id: &str,
) -> Result<(), CliError> {
    store.remove_track(project_id, track_id)?;
    let title = track_title(store, track_id)?;

    log_success(&format!("Removed track from {}", project_id));
    log::info!("  Track: {} ({})", title, track_id);

    Ok(())
}

pub(crate) fn run_list_tracks(
    store: &CatalogStore,
    project_id: &str,
    stems_only: bool,
) -> Result<(), CliError> {
    let project = store.get_project(project_id)?;
    let mut tracks = store.list_tracks(project_id)?;
    if stems_only {
        tracks.retain(|t| t.has_stems);
    }

    log::info!(
        "Project: {} ({})",
        project.name.if_supports_color(Stdout, |t| t.bold()),
        project_id,
    );
    if stems_only {
        log::info!("Tracks with stems: {}", tracks.len());
    } else {
        log::info!("Tracks: {}", tracks.len());
    }
    log::info!("{}", "-".repeat(60));

    for t in &tracks {
        let notes = if t.notes.is_empty() {
            String::new()
        } else {
            format!(" - {}", t.notes)
        };
        let stems = if t.has_stems {
            format!(" {}", "[stems]".if_supports_color(Stdout, |s| s.green()))
        } else {
            String::new()
        };
        log::info!("  {}. {}{}", t.position, t.title, stems);
        log::info!(
            "     {} (added {}){}",
            t.track_id.if_supports_color(Stdout, |s| s.dimmed()),
            t.added_date,
            notes,
        );
    }

    Ok(())
}

pub(crate) fn run_show_track(store: &CatalogStore, track_id: &str) -> Result<(), CliError> {
    let track = store.get_track(track_id)?;

    log::info!(
        "{} ({})",
        track.track_title.if_supports_color(Stdout, |t| t.bold()),
        track.id,
    );
    log::info!("  Description: {}", or_none(&track.track_description));
    log::info!("  Album:       {}", or_none(&track.album_title));
    log::info!("  Library:     {}", or_none(&track.library_name));
    log::info!("  Composer:    {}", or_none(&track.composer));
    log::info!("  BPM:         {}", or_none(&track.bpm));
    log::info!("  Duration:    {}", or_none(&track.duration));
    log::info!("  Genre:       {}", or_none(&track.genre));
    log::info!(
        "  Also:        {}",
        or_none(&track.additional_genres().join(", ")),
    );
    log::info!("  Released:    {}", or_none(&track.apm_release_date));
    log::info!(
        "  Stems:       {}",
        if track.has_stems {
            "yes".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "no".to_string()
        },
    );

    Ok(())
}
