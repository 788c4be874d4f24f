//! Artifact rendering
//!
//! Turns a partition plan plus the remaining validated answers into the text
//! of every file of a playbook. Nothing here touches the filesystem.

pub mod configure;
pub mod inventory;
pub mod partition;
pub mod playbook;
pub mod roles;
pub mod tasks;

use crate::config::{ArtifactSet, GeneratorConfig, NvramPolicy, Settings};
use crate::disk::layouts::PartitionPlan;
use crate::utils::error::{ArchbookError, Result};
use configure::ConfigureValues;
use tracing::debug;

/// Files making up a playbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Inventory,
    MainTasks,
    PartitionVars,
    PartitionTasks,
    InstallationTasks,
    ConfigureVars,
    ConfigureTasks,
    Playbook,
}

impl ArtifactKind {
    /// Path relative to the playbook directory
    pub fn path(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory.ini",
            Self::MainTasks => "roles/main/tasks/main.yaml",
            Self::PartitionVars => "roles/partition/vars/main.yaml",
            Self::PartitionTasks => "roles/partition/tasks/main.yaml",
            Self::InstallationTasks => "roles/installation/tasks/main.yaml",
            Self::ConfigureVars => "roles/configure/vars/main.yaml",
            Self::ConfigureTasks => "roles/configure/tasks/main.yaml",
            Self::Playbook => "playbook.yaml",
        }
    }

    /// Kinds emitted for an artifact set, in write order
    pub fn for_set(set: ArtifactSet) -> Vec<ArtifactKind> {
        let mut kinds = vec![
            Self::Inventory,
            Self::MainTasks,
            Self::PartitionVars,
            Self::PartitionTasks,
            Self::InstallationTasks,
        ];
        if set == ArtifactSet::Full {
            kinds.push(Self::ConfigureVars);
            kinds.push(Self::ConfigureTasks);
        }
        kinds.push(Self::Playbook);
        kinds
    }
}

/// Rendered file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub content: String,
}

impl Artifact {
    pub fn path(&self) -> &'static str {
        self.kind.path()
    }
}

/// Validated scalar answers other than the disk layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFields {
    pub playbook_name: String,
    pub ip: String,
    pub user: String,
    pub key_path: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub locale: Option<String>,
    pub keymap: Option<String>,
    pub hostname: Option<String>,
    pub root_password: Option<String>,
    pub bootloader_target: Option<String>,
    pub nvram: NvramPolicy,
}

impl RenderFields {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let system = config.system.clone().unwrap_or_default();
        Self {
            playbook_name: config.name.clone(),
            ip: config.inventory.ip.clone(),
            user: config.inventory.user.clone(),
            key_path: config.inventory.key_path.clone(),
            region: system.region,
            city: system.city,
            locale: system.locale,
            keymap: system.keymap,
            hostname: system.hostname,
            root_password: system.root_password,
            bootloader_target: system.bootloader_target,
            nvram: system.nvram,
        }
    }

    fn check_base(&self) -> Result<()> {
        let required = [
            ("name", &self.playbook_name),
            ("inventory.ip", &self.ip),
            ("inventory.user", &self.user),
            ("inventory.key_path", &self.key_path),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ArchbookError::MissingField(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Render one artifact
pub fn render_artifact(
    kind: ArtifactKind,
    plan: &PartitionPlan,
    fields: &RenderFields,
    settings: &Settings,
) -> Result<Artifact> {
    let content = match kind {
        ArtifactKind::Inventory => inventory::render(fields, settings),
        ArtifactKind::MainTasks => roles::render_main(),
        ArtifactKind::PartitionVars => partition::render_vars(plan),
        ArtifactKind::PartitionTasks => partition::render_tasks_file(plan, settings),
        ArtifactKind::InstallationTasks => roles::render_installation(settings),
        ArtifactKind::ConfigureVars => {
            let values = ConfigureValues::resolve(fields, plan.mode())?;
            configure::render_vars(plan, &values)
        }
        ArtifactKind::ConfigureTasks => {
            ConfigureValues::resolve(fields, plan.mode())?;
            configure::render_tasks_file(plan, settings)
        }
        ArtifactKind::Playbook => playbook::render(&fields.playbook_name, settings),
    };

    Ok(Artifact { kind, content })
}

/// Render every artifact of the configured set
///
/// Fails before producing anything if a required field is missing.
pub fn render_playbook(plan: &PartitionPlan, fields: &RenderFields, settings: &Settings) -> Result<Vec<Artifact>> {
    fields.check_base()?;
    if settings.artifact_set == ArtifactSet::Full {
        ConfigureValues::resolve(fields, plan.mode())?;
    }

    let artifacts = ArtifactKind::for_set(settings.artifact_set)
        .into_iter()
        .map(|kind| render_artifact(kind, plan, fields, settings))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Rendered {} artifacts ({} set) for {}",
        artifacts.len(),
        settings.artifact_set,
        fields.playbook_name
    );
    Ok(artifacts)
}
