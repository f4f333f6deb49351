//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "apm-agent")]
#[command(about = "Manage projects and their track lists in the APM catalog", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding tracks.csv, projects.csv and project_tracks.csv
    /// (defaults to $APM_DATA_DIR, then the settings file, then ./data)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep a timestamped .bak copy of each table before rewriting it
    #[arg(long, global = true)]
    pub backup: bool,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Project selector shared by project-scoped commands.
#[derive(Args, Clone)]
pub(crate) struct ProjectArg {
    /// Project ID (e.g., P001)
    #[arg(long, alias = "project_id")]
    pub project_id: String,
}

/// Track selector shared by track-scoped commands.
#[derive(Args, Clone)]
pub(crate) struct TrackArg {
    /// Track ID (e.g., NFL_NFL_0036_01901)
    #[arg(long, alias = "track_id")]
    pub track_id: String,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create a new project
    CreateProject {
        /// Project name
        #[arg(long)]
        name: String,

        /// Project description
        #[arg(long)]
        description: String,

        /// What the project is for (e.g., TV Commercial)
        #[arg(long, alias = "for_field")]
        for_field: String,

        /// Keywords separated by semicolons
        #[arg(long, default_value = "")]
        keywords: String,

        /// Deadline date (YYYY-MM-DD)
        #[arg(long)]
        deadline: String,

        /// Collaborators separated by semicolons
        #[arg(long, default_value = "")]
        collaborators: String,
    },

    /// Add a track to the end of a project
    AddTrack {
        #[command(flatten)]
        project: ProjectArg,

        #[command(flatten)]
        track: TrackArg,

        /// Optional notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Remove a track from a project
    RemoveTrack {
        #[command(flatten)]
        project: ProjectArg,

        #[command(flatten)]
        track: TrackArg,
    },

    /// List tracks in a project
    ListTracks {
        #[command(flatten)]
        project: ProjectArg,

        /// Only show tracks that have stems available
        #[arg(long)]
        stems_only: bool,
    },

    /// List all projects
    ListProjects,

    /// Show a project's details
    ShowProject {
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Change a project's details
    UpdateProject {
        #[command(flatten)]
        project: ProjectArg,

        /// New project name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New "for" classification (e.g., TV Commercial)
        #[arg(long, alias = "for_field")]
        for_field: Option<String>,

        /// New keywords, separated by semicolons
        #[arg(long)]
        keywords: Option<String>,

        /// New status label (e.g., Active, Archived)
        #[arg(long)]
        status: Option<String>,

        /// New deadline date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// New collaborators, separated by semicolons
        #[arg(long)]
        collaborators: Option<String>,
    },

    /// Show a catalog track's details
    ShowTrack {
        #[command(flatten)]
        track: TrackArg,
    },

    /// Create any missing tables in the data directory
    Init,

    /// Manage apm-agent settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where they came from
    Show,

    /// Print the settings file path
    Path,

    /// Save the default data directory in the settings file
    SetDataDir {
        /// Directory holding the catalog tables
        dir: PathBuf,
    },

    /// Remove the saved data directory from the settings file
    ClearDataDir,
}
