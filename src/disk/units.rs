//! Size units and byte-offset conversion
//!
//! Offsets are kept in bytes and rendered as literal KiB strings, so the
//! generated variable files never carry arithmetic for Ansible to evaluate.

use crate::utils::error::{ArchbookError, Result};

pub const KIB: u64 = 1024;
pub const MIB: u64 = 1024 * KIB;
pub const GIB: u64 = 1024 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    MiB,
    GiB,
}

impl SizeUnit {
    pub fn bytes(&self) -> u64 {
        match self {
            Self::MiB => MIB,
            Self::GiB => GIB,
        }
    }
}

impl std::fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MiB => write!(f, "MiB"),
            Self::GiB => write!(f, "GiB"),
        }
    }
}

/// A non-negative magnitude paired with its unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    magnitude: u64,
    unit: SizeUnit,
}

impl SizeSpec {
    /// Build a size, rejecting negative magnitudes
    pub fn new(magnitude: i64, unit: SizeUnit) -> Result<Self> {
        let magnitude = u64::try_from(magnitude).map_err(|_| ArchbookError::InvalidSize(magnitude))?;
        Ok(Self { magnitude, unit })
    }

    pub fn mib(magnitude: u64) -> Self {
        Self {
            magnitude,
            unit: SizeUnit::MiB,
        }
    }

    pub fn gib(magnitude: u64) -> Self {
        Self {
            magnitude,
            unit: SizeUnit::GiB,
        }
    }

    pub fn magnitude(&self) -> u64 {
        self.magnitude
    }

    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0
    }

    /// Size in bytes, rejecting magnitudes that do not fit in a `u64`
    pub fn to_bytes(&self) -> Result<u64> {
        self.magnitude
            .checked_mul(self.unit.bytes())
            .ok_or_else(|| self.overflow())
    }

    pub(crate) fn overflow(&self) -> ArchbookError {
        ArchbookError::InvalidSize(i64::try_from(self.magnitude).unwrap_or(i64::MAX))
    }
}

impl std::fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// Render a byte offset as a KiB-qualified string (`524288KiB`)
///
/// Offsets produced by the planner are always whole MiB, so the division
/// is exact.
pub fn kib_string(bytes: u64) -> String {
    format!("{}KiB", bytes / KIB)
}

/// Human readable form used in layout summaries
pub fn human_size(bytes: u64) -> String {
    if bytes >= GIB && bytes % GIB == 0 {
        format!("{} GiB", bytes / GIB)
    } else {
        format!("{} MiB", bytes / MIB)
    }
}
