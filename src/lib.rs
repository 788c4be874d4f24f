//! archbook library - Ansible playbook generation for unattended Arch Linux installs

pub mod cleanup;
pub mod config;
pub mod disk;
pub mod generate;
pub mod output;
pub mod render;
pub mod utils;

pub use config::GeneratorConfig;
pub use disk::layouts::{plan, PartitionPlan};
pub use utils::error::ArchbookError;
