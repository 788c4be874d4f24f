//! Process-wide generator settings

use crate::config::ArtifactSet;
use crate::utils::error::{ArchbookError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Values shared by every artifact of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding one sub-directory per generated playbook
    #[serde(default = "default_playbooks_dir")]
    pub playbooks_dir: PathBuf,
    /// Inventory group targeted by the playbook
    #[serde(default = "default_host_group")]
    pub host_group: String,
    /// Distribution name shown in the play title
    #[serde(default = "default_distribution")]
    pub distribution: String,
    /// Where the new system is mounted on the live host
    #[serde(default = "default_mount_root")]
    pub mount_root: String,
    #[serde(default)]
    pub artifact_set: ArtifactSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playbooks_dir: default_playbooks_dir(),
            host_group: default_host_group(),
            distribution: default_distribution(),
            mount_root: default_mount_root(),
            artifact_set: ArtifactSet::default(),
        }
    }
}

impl Settings {
    /// Mount point of the new system without a trailing slash
    pub fn mount_root(&self) -> &str {
        self.mount_root.trim_end_matches('/')
    }

    /// The mount root must be an absolute directory other than `/`
    pub fn validate(&self) -> Result<()> {
        if !self.mount_root.starts_with('/') || self.mount_root().is_empty() {
            return Err(ArchbookError::InvalidInput(format!(
                "mount_root must be an absolute path other than /: {:?}",
                self.mount_root
            )));
        }
        Ok(())
    }
}

fn default_playbooks_dir() -> PathBuf {
    PathBuf::from("playbooks")
}

fn default_host_group() -> String {
    "archlinux_server".to_string()
}

fn default_distribution() -> String {
    "ArchLinux".to_string()
}

fn default_mount_root() -> String {
    "/mnt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_root_drops_trailing_slash() {
        let settings = Settings {
            mount_root: "/target/".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.mount_root(), "/target");
        assert!(settings.validate().is_ok());
        assert_eq!(Settings::default().mount_root(), "/mnt");
    }

    #[test]
    fn filesystem_root_is_rejected_as_mount_root() {
        for root in ["/", "//", "", "mnt"] {
            let settings = Settings {
                mount_root: root.to_string(),
                ..Settings::default()
            };
            assert!(matches!(settings.validate(), Err(ArchbookError::InvalidInput(_))), "{root:?}");
        }
    }
}
