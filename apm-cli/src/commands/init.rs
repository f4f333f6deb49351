use apm_catalog::{TableRow, Track};
use apm_store::CatalogStore;

use crate::CliError;

use super::log_success;

/// Create any missing tables, header only.
pub(crate) fn run_init(store: &CatalogStore) -> Result<(), CliError> {
    let created = store.init()?;

    if created.is_empty() {
        log::info!(
            "All tables already present in {}",
            store.data_dir().display()
        );
        return Ok(());
    }

    for path in &created {
        log_success(&format!("Created {}", path.display()));
    }
    if created.iter().any(|p| p.ends_with(Track::FILE_NAME)) {
        log::warn!(
            "{} is empty; load the catalog export into it before adding tracks.",
            Track::FILE_NAME,
        );
    }
    Ok(())
}
