use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use apm_catalog::Project;
use apm_store::{CatalogStore, NewProject, ProjectUpdate};

use crate::CliError;

use super::{log_success, or_none};

pub(crate) fn run_create_project(store: &CatalogStore, new: NewProject) -> Result<(), CliError> {
    let project_id = store.create_project(&new)?;

    log_success(&format!("Created project {}: {}", project_id, new.name));
    log::info!("  Description: {}", new.description);
    log::info!("  For: {}", new.for_field);
    log::info!("  Deadline: {}", new.deadline);

    Ok(())
}

pub(crate) fn run_list_projects(store: &CatalogStore) -> Result<(), CliError> {
    let projects = store.list_projects()?;

    if projects.is_empty() {
        log::info!("No projects yet.");
        log::info!("Run 'apm-agent create-project --help' to create one.");
        return Ok(());
    }

    let header = format!("Projects: {}", projects.len());
    log::info!("{}", header.if_supports_color(Stdout, |t| t.bold()));
    log::info!("{}", "-".repeat(60));
    for project in &projects {
        log::info!(
            "  {}  {} [{}]",
            project
                .project_id
                .if_supports_color(Stdout, |t| t.cyan()),
            project.name,
            project.status,
        );
        log::info!(
            "        for {} | due {} | modified {}",
            or_none(&project.for_field),
            or_none(&project.deadline),
            project.modified_on,
        );
    }

    Ok(())
}

pub(crate) fn run_show_project(store: &CatalogStore, project_id: &str) -> Result<(), CliError> {
    let project = store.get_project(project_id)?;
    let track_count = store.list_tracks(project_id)?.len();
    print_project(&project);
    log::info!("  Tracks:        {}", track_count);
    Ok(())
}

pub(crate) fn run_update_project(
    store: &CatalogStore,
    project_id: &str,
    update: ProjectUpdate,
) -> Result<(), CliError> {
    if update.is_empty() {
        log::warn!("Nothing to update for {}.", project_id);
        log::info!("Pass at least one of --name, --description, --for-field, --keywords,");
        log::info!("--status, --deadline or --collaborators.");
        // Still surfaces NotFound for a bad ID.
        store.get_project(project_id)?;
        return Ok(());
    }

    let project = store.update_project(project_id, &update)?;
    log_success(&format!("Updated project {}", project.project_id));
    print_project(&project);
    Ok(())
}

fn print_project(project: &Project) {
    log::info!(
        "{} ({})",
        project.name.if_supports_color(Stdout, |t| t.bold()),
        project.project_id,
    );
    log::info!("  Description:   {}", or_none(&project.description));
    log::info!("  For:           {}", or_none(&project.for_field));
    log::info!("  Status:        {}", or_none(&project.status));
    log::info!("  Deadline:      {}", or_none(&project.deadline));
    log::info!("  Created:       {}", project.created_on);
    log::info!("  Modified:      {}", project.modified_on);
    log::info!("  Keywords:      {}", or_none(&project.keywords().join(", ")));
    log::info!(
        "  Collaborators: {}",
        or_none(&project.collaborators().join(", ")),
    );
}
