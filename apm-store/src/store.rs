//! Project lifecycle and track membership operations.
//!
//! Each call is independent: it loads the tables it needs from the data
//! directory, checks its preconditions, and rewrites whole tables. Nothing
//! is cached between calls and there is no locking, so two processes
//! mutating the same directory at once can lose one of the writes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use apm_catalog::{
    Project, ProjectId, ProjectTrack, STATUS_ACTIVE, TableRow, Track, WriteOptions, format_date,
    init_table, read_table, write_table,
};
use chrono::{Local, NaiveDate};

use crate::error::StoreError;

/// Title shown for memberships whose track has left the catalog.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Options for a [`CatalogStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Keep a timestamped `.bak` copy of each table before rewriting it.
    pub backup: bool,
    /// Use this date instead of the local calendar date.
    pub fixed_date: Option<NaiveDate>,
}

/// Fields for [`CatalogStore::create_project`].
///
/// `keywords` and `collaborators` are `;`-joined lists. Dates are stored
/// as given.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub for_field: String,
    pub keywords: String,
    pub deadline: String,
    pub collaborators: String,
}

/// Replacement values for [`CatalogStore::update_project`]. `None` keeps
/// the current value.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub for_field: Option<String>,
    pub keywords: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub collaborators: Option<String>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.for_field.is_none()
            && self.keywords.is_none()
            && self.status.is_none()
            && self.deadline.is_none()
            && self.collaborators.is_none()
    }

    fn apply(&self, project: &mut Project) {
        let fields = [
            (&self.name, &mut project.name),
            (&self.description, &mut project.description),
            (&self.for_field, &mut project.for_field),
            (&self.keywords, &mut project.keywords),
            (&self.status, &mut project.status),
            (&self.deadline, &mut project.deadline),
            (&self.collaborators, &mut project.collaborators),
        ];
        for (new, current) in fields {
            if let Some(value) = new {
                current.clone_from(value);
            }
        }
    }
}

/// One entry of [`CatalogStore::list_tracks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedTrack {
    pub position: u32,
    pub track_id: String,
    /// [`UNKNOWN_TITLE`] when the track is no longer in the catalog.
    pub title: String,
    pub added_date: String,
    pub notes: String,
    pub has_stems: bool,
}

/// CSV-backed store for projects and their track lists.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    data_dir: PathBuf,
    options: StoreOptions,
}

impl CatalogStore {
    /// Open a store over the tables in `data_dir`. Nothing is read until
    /// an operation runs.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_options(data_dir, StoreOptions::default())
    }

    pub fn with_options(data_dir: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            data_dir: data_dir.into(),
            options,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the table holding rows of type `T`.
    pub fn table_path<T: TableRow>(&self) -> PathBuf {
        self.data_dir.join(T::FILE_NAME)
    }

    /// Create any missing table as a header-only file.
    ///
    /// Returns the paths that were created; existing tables are untouched.
    pub fn init(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut created = Vec::new();
        self.init_one::<Track>(&mut created)?;
        self.init_one::<Project>(&mut created)?;
        self.init_one::<ProjectTrack>(&mut created)?;
        Ok(created)
    }

    // ── Projects ────────────────────────────────────────────────────────────

    /// Create a project with the next sequential ID and status `Active`.
    pub fn create_project(&self, new: &NewProject) -> Result<ProjectId, StoreError> {
        let mut projects = self.load::<Project>()?;
        let project_id = next_project_id(&projects)?;
        let today = self.today();

        projects.push(Project {
            project_id: project_id.to_string(),
            name: new.name.clone(),
            description: new.description.clone(),
            for_field: new.for_field.clone(),
            keywords: new.keywords.clone(),
            created_on: today.clone(),
            modified_on: today,
            status: STATUS_ACTIVE.to_string(),
            deadline: new.deadline.clone(),
            collaborators: new.collaborators.clone(),
        });
        self.save(&projects)?;

        log::debug!("Created project {} ({})", project_id, new.name);
        Ok(project_id)
    }

    /// All projects, ordered by ID. Rows with malformed IDs sort first.
    pub fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let mut projects = self.load::<Project>()?;
        projects.sort_by_key(|p| p.id().ok());
        Ok(projects)
    }

    pub fn get_project(&self, project_id: &str) -> Result<Project, StoreError> {
        self.load::<Project>()?
            .into_iter()
            .find(|p| p.project_id == project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))
    }

    /// Replace the given fields of a project and bump `modified_on`.
    ///
    /// An empty update changes nothing and writes nothing.
    pub fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<Project, StoreError> {
        let mut projects = self.load::<Project>()?;
        let today = self.today();
        let project = projects
            .iter_mut()
            .find(|p| p.project_id == project_id)
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;

        if update.is_empty() {
            return Ok(project.clone());
        }

        update.apply(project);
        project.modified_on = today;
        let updated = project.clone();
        self.save(&projects)?;

        log::debug!("Updated project {}", project_id);
        Ok(updated)
    }

    // ── Tracks ──────────────────────────────────────────────────────────────

    /// Look up a track in the catalog.
    pub fn get_track(&self, track_id: &str) -> Result<Track, StoreError> {
        self.load::<Track>()?
            .into_iter()
            .find(|t| t.id == track_id)
            .ok_or_else(|| StoreError::TrackNotFound(track_id.to_string()))
    }

    /// Append a track to the end of a project's list.
    ///
    /// Checks, in order: the project exists, the track exists, the track is
    /// not already in the project. On success the project's `modified_on`
    /// is bumped in a second write; if that write fails the membership is
    /// kept and only the timestamp is stale.
    pub fn add_track(
        &self,
        project_id: &str,
        track_id: &str,
        notes: &str,
    ) -> Result<ProjectTrack, StoreError> {
        if !self.project_exists(project_id)? {
            return Err(StoreError::ProjectNotFound(project_id.to_string()));
        }
        if !self.load::<Track>()?.iter().any(|t| t.id == track_id) {
            return Err(StoreError::TrackNotFound(track_id.to_string()));
        }

        let mut memberships = self.load::<ProjectTrack>()?;
        if memberships.iter().any(|m| m.matches(project_id, track_id)) {
            return Err(StoreError::DuplicateMembership {
                project_id: project_id.to_string(),
                track_id: track_id.to_string(),
            });
        }

        let position = memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .map(|m| m.position)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| StoreError::PositionsExhausted(project_id.to_string()))?;

        let row = ProjectTrack {
            project_id: project_id.to_string(),
            track_id: track_id.to_string(),
            added_date: self.today(),
            position,
            notes: notes.to_string(),
        };
        memberships.push(row.clone());
        self.save(&memberships)?;
        self.touch_project(project_id)?;

        log::debug!(
            "Added {} to {} at position {}",
            track_id,
            project_id,
            position
        );
        Ok(row)
    }

    /// Remove a track from a project. Remaining positions are not renumbered.
    pub fn remove_track(&self, project_id: &str, track_id: &str) -> Result<(), StoreError> {
        let mut memberships = self.load::<ProjectTrack>()?;
        let before = memberships.len();
        memberships.retain(|m| !m.matches(project_id, track_id));

        if memberships.len() == before {
            return Err(StoreError::MembershipNotFound {
                project_id: project_id.to_string(),
                track_id: track_id.to_string(),
            });
        }

        self.save(&memberships)?;
        self.touch_project(project_id)?;

        log::debug!("Removed {} from {}", track_id, project_id);
        Ok(())
    }

    /// A project's tracks, ordered by position.
    ///
    /// Tracks missing from the catalog are listed with the title
    /// [`UNKNOWN_TITLE`] rather than failing.
    pub fn list_tracks(&self, project_id: &str) -> Result<Vec<ListedTrack>, StoreError> {
        if !self.project_exists(project_id)? {
            return Err(StoreError::ProjectNotFound(project_id.to_string()));
        }

        let catalog = self.load::<Track>()?;
        let by_id: HashMap<&str, &Track> = catalog.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut listed: Vec<ListedTrack> = self
            .load::<ProjectTrack>()?
            .into_iter()
            .filter(|m| m.project_id == project_id)
            .map(|m| {
                let track = by_id.get(m.track_id.as_str());
                if track.is_none() {
                    log::warn!(
                        "Track {} in project {} is not in the catalog",
                        m.track_id,
                        project_id
                    );
                }
                ListedTrack {
                    position: m.position,
                    title: track
                        .map(|t| t.track_title.clone())
                        .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                    has_stems: track.is_some_and(|t| t.has_stems),
                    track_id: m.track_id,
                    added_date: m.added_date,
                    notes: m.notes,
                }
            })
            .collect();

        listed.sort_by_key(|t| t.position);
        Ok(listed)
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn today(&self) -> String {
        format_date(
            self.options
                .fixed_date
                .unwrap_or_else(|| Local::now().date_naive()),
        )
    }

    fn load<T: TableRow>(&self) -> Result<Vec<T>, StoreError> {
        Ok(read_table(&self.table_path::<T>())?)
    }

    fn save<T: TableRow>(&self, rows: &[T]) -> Result<(), StoreError> {
        let options = WriteOptions {
            backup: self.options.backup,
        };
        if let Some(bak) = write_table(&self.table_path::<T>(), rows, options)? {
            log::debug!("Backup written to {}", bak.display());
        }
        Ok(())
    }

    fn init_one<T: TableRow>(&self, created: &mut Vec<PathBuf>) -> Result<(), StoreError> {
        let path = self.table_path::<T>();
        if init_table::<T>(&path)? {
            log::debug!("Created empty table {}", path.display());
            created.push(path);
        }
        Ok(())
    }

    fn project_exists(&self, project_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .load::<Project>()?
            .iter()
            .any(|p| p.project_id == project_id))
    }

    /// Set a project's `modified_on` to today. A missing project is left alone.
    fn touch_project(&self, project_id: &str) -> Result<(), StoreError> {
        let mut projects = self.load::<Project>()?;
        let today = self.today();
        match projects.iter_mut().find(|p| p.project_id == project_id) {
            Some(project) => project.modified_on = today,
            None => {
                log::debug!("Project {} vanished before modified_on update", project_id);
                return Ok(());
            }
        }
        self.save(&projects)
    }
}

/// One past the highest existing project number, or `P001` for an empty table.
fn next_project_id(projects: &[Project]) -> Result<ProjectId, StoreError> {
    let mut max: Option<ProjectId> = None;
    for project in projects {
        let id = project.id()?;
        max = max.max(Some(id));
    }
    match max {
        None => Ok(ProjectId::first()),
        Some(last) => last
            .next()
            .ok_or_else(|| StoreError::ProjectIdsExhausted(last.to_string())),
    }
}
