//! Error types for archbook

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchbookError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid layout mode: {0} (expected uefi or bios)")]
    InvalidMode(String),

    #[error("Invalid size: {0} (sizes must be non-negative and fit in a 64-bit byte offset)")]
    InvalidSize(i64),

    #[error("Inconsistent size: EFI size must be 0 in BIOS mode, got {efi_size_mib}MiB")]
    InconsistentSize { efi_size_mib: u64 },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Destination already exists: {0}")]
    DestinationExists(String),

    #[error("Playbook not found: {0}")]
    PlaybookNotFound(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ArchbookError>;
