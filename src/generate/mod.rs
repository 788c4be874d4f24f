//! Playbook generation orchestrator

use crate::config::GeneratorConfig;
use crate::disk::layouts::{plan, print_layout_summary, PartitionPlan};
use crate::output::PlaybookWriter;
use crate::render::{render_playbook, Artifact, RenderFields};
use crate::utils::error::Result;
use std::path::PathBuf;
use tracing::info;

/// Runs one generation attempt from validated answers
pub struct Generator {
    config: GeneratorConfig,
    dry_run: bool,
    quiet: bool,
}

impl Generator {
    pub fn new(config: GeneratorConfig, dry_run: bool) -> Self {
        Self {
            config,
            dry_run,
            quiet: false,
        }
    }

    /// Skip the layout summary on stdout
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Plan the disk and render every artifact, without writing anything
    pub fn prepare(&self) -> Result<(PartitionPlan, Vec<Artifact>)> {
        let disk = &self.config.disk;
        let plan = plan(&disk.device, disk.layout, disk.efi_size()?, disk.swap_size()?)?;
        let fields = RenderFields::from_config(&self.config);
        let artifacts = render_playbook(&plan, &fields, &self.config.settings)?;
        Ok((plan, artifacts))
    }

    /// Validate, plan, render, then write the playbook directory
    pub fn run(self) -> Result<PathBuf> {
        info!(
            "Generating playbook {} for {} ({} layout, {} set)",
            self.config.name, self.config.disk.device, self.config.disk.layout, self.config.settings.artifact_set
        );

        self.config.validate()?;

        // Collisions abort before anything is rendered or written
        let writer = PlaybookWriter::new(&self.config.settings, &self.config.name, self.dry_run)?;

        let (plan, artifacts) = self.prepare()?;
        if !self.quiet {
            print_layout_summary(&plan);
        }

        writer.write_all(&artifacts)?;

        info!("Playbook {} generated in {}", self.config.name, writer.root().display());
        Ok(writer.root().to_path_buf())
    }
}
