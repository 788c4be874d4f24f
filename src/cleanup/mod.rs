//! Removal of generated playbooks

use crate::config::Settings;
use crate::output::writer::playbook_dir;
use crate::utils::error::{ArchbookError, Result};
use crate::utils::prompt::warn_confirm;
use crate::utils::validation::validate_playbook_name;
use std::fs;
use tracing::info;

/// Cleanup utility
pub struct Cleaner {
    dry_run: bool,
}

impl Cleaner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Delete the playbook directory `name`
    ///
    /// Asks for confirmation unless `assume_yes` is set.
    pub fn clean(&self, settings: &Settings, name: &str, assume_yes: bool) -> Result<()> {
        validate_playbook_name(name)?;

        let dir = playbook_dir(settings, name);
        if !dir.is_dir() {
            return Err(ArchbookError::PlaybookNotFound(dir.display().to_string()));
        }

        if !assume_yes && !warn_confirm(&format!("{} will be removed", dir.display()))? {
            return Err(ArchbookError::UserCancelled);
        }

        if self.dry_run {
            println!("  [dry-run] rm -rf {}", dir.display());
            return Ok(());
        }

        info!("Removing playbook {}", dir.display());
        fs::remove_dir_all(&dir)?;
        info!("The playbook {} has been removed", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &std::path::Path) -> Settings {
        Settings {
            playbooks_dir: dir.to_path_buf(),
            ..Settings::default()
        }
    }

    #[test]
    fn removes_existing_playbook() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("lab/roles/main/tasks");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.yaml"), "---\n").unwrap();

        Cleaner::new(false).clean(&settings_in(tmp.path()), "lab", true).unwrap();
        assert!(!tmp.path().join("lab").exists());
    }

    #[test]
    fn missing_playbook_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Cleaner::new(false)
            .clean(&settings_in(tmp.path()), "ghost", true)
            .unwrap_err();
        assert!(matches!(err, ArchbookError::PlaybookNotFound(_)));
    }

    #[test]
    fn empty_and_traversing_names_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let cleaner = Cleaner::new(false);
        assert!(matches!(
            cleaner.clean(&settings_in(tmp.path()), "", true),
            Err(ArchbookError::InvalidInput(_))
        ));
        assert!(matches!(
            cleaner.clean(&settings_in(tmp.path()), "..", true),
            Err(ArchbookError::InvalidInput(_))
        ));
    }

    #[test]
    fn dry_run_keeps_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("lab")).unwrap();
        Cleaner::new(true).clean(&settings_in(tmp.path()), "lab", true).unwrap();
        assert!(tmp.path().join("lab").exists());
    }
}
