pub mod app;
pub mod layout;

pub use app::modify_app;
pub use layout::ProjectLayout;

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Create `path` (and parents) if missing; existing directories are left alone
pub fn create_folder(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    tracing::debug!("Creating {}", path.display());
    fs::create_dir_all(path)?;
    Ok(())
}
