//! Playbook directory writer

use crate::config::Settings;
use crate::render::Artifact;
use crate::utils::error::{ArchbookError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory of one playbook under the configured playbooks dir
pub fn playbook_dir(settings: &Settings, name: &str) -> PathBuf {
    settings.playbooks_dir.join(name)
}

/// Fail if a playbook of that name already exists
pub fn ensure_available(settings: &Settings, name: &str) -> Result<()> {
    let dir = playbook_dir(settings, name);
    if dir.exists() {
        return Err(ArchbookError::DestinationExists(dir.display().to_string()));
    }
    Ok(())
}

/// Writes artifacts below a fresh playbook directory
pub struct PlaybookWriter {
    root: PathBuf,
    dry_run: bool,
}

impl PlaybookWriter {
    /// Target a new playbook directory; refuses existing ones
    pub fn new(settings: &Settings, name: &str, dry_run: bool) -> Result<Self> {
        ensure_available(settings, name)?;
        Ok(Self {
            root: playbook_dir(settings, name),
            dry_run,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `content` at `relative_path`, creating parent directories
    pub fn write(&self, relative_path: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(relative_path);

        if self.dry_run {
            println!("  [dry-run] Would write {} ({} bytes)", path.display(), content.len());
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        debug!("Wrote {}", path.display());

        Ok(path)
    }

    /// Write a rendered artifact set
    pub fn write_all(&self, artifacts: &[Artifact]) -> Result<()> {
        info!("Writing {} files to {}", artifacts.len(), self.root.display());

        for artifact in artifacts {
            self.write(artifact.path(), &artifact.content)?;
        }

        Ok(())
    }
}
