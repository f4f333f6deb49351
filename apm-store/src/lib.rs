//! Project/track catalog store over flat CSV tables.
//!
//! [`CatalogStore`] owns the `projects` and `project_tracks` tables and
//! checks references against the read-only `tracks` table. Every operation
//! loads the tables it needs, validates, and rewrites whole files.

pub mod error;
pub mod settings;
pub mod store;

pub use error::StoreError;
pub use settings::{
    DataDirSource, Settings, load_settings_string, resolve_settings, save_data_dir, settings_path,
};
pub use store::{
    CatalogStore, ListedTrack, NewProject, ProjectUpdate, StoreOptions, UNKNOWN_TITLE,
};
