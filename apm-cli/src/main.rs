//! apm-agent CLI
//!
//! Command-line interface for managing projects and their track lists in
//! the CSV-backed APM catalog.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use apm_store::{CatalogStore, NewProject, ProjectUpdate, Settings, StoreOptions};

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet, cli.verbose);

    let settings = apm_store::resolve_settings(cli.data_dir, cli.backup);
    log::debug!(
        "Data directory: {} ({})",
        settings.data_dir.display(),
        settings.data_dir_source,
    );

    if let Err(e) = run(cli.command, &settings) {
        log::error!("{} {}", "✗ Error:".if_supports_color(Stdout, |t| t.red()), e);
        if let Some(hint) = e.hint() {
            log::info!("  Data directory: {}", settings.data_dir.display());
            log::info!("  {hint}");
        }
        std::process::exit(1);
    }
}

fn open_store(settings: &Settings) -> CatalogStore {
    CatalogStore::with_options(
        &settings.data_dir,
        StoreOptions {
            backup: settings.backup,
            fixed_date: None,
        },
    )
}

fn run(command: Commands, settings: &Settings) -> Result<(), CliError> {
    match command {
        Commands::CreateProject {
            name,
            description,
            for_field,
            keywords,
            deadline,
            collaborators,
        } => commands::project::run_create_project(
            &open_store(settings),
            NewProject {
                name,
                description,
                for_field,
                keywords,
                deadline,
                collaborators,
            },
        ),
        Commands::AddTrack {
            project,
            track,
            notes,
        } => commands::track::run_add_track(
            &open_store(settings),
            &project.project_id,
            &track.track_id,
            &notes,
        ),
        Commands::RemoveTrack { project, track } => commands::track::run_remove_track(
            &open_store(settings),
            &project.project_id,
            &track.track_id,
        ),
        Commands::ListTracks {
            project,
            stems_only,
        } => commands::track::run_list_tracks(
            &open_store(settings),
            &project.project_id,
            stems_only,
        ),
        Commands::ListProjects => commands::project::run_list_projects(&open_store(settings)),
        Commands::ShowProject { project } => {
            commands::project::run_show_project(&open_store(settings), &project.project_id)
        }
        Commands::UpdateProject {
            project,
            name,
            description,
            for_field,
            keywords,
            status,
            deadline,
            collaborators,
        } => commands::project::run_update_project(
            &open_store(settings),
            &project.project_id,
            ProjectUpdate {
                name,
                description,
                for_field,
                keywords,
                status,
                deadline,
                collaborators,
            },
        ),
        Commands::ShowTrack { track } => {
            commands::track::run_show_track(&open_store(settings), &track.track_id)
        }
        Commands::Init => commands::init::run_init(&open_store(settings)),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(settings);
                Ok(())
            }
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::SetDataDir { dir } => commands::config::run_config_set_data_dir(Some(dir)),
            ConfigAction::ClearDataDir => commands::config::run_config_set_data_dir(None),
        },
    }
}
