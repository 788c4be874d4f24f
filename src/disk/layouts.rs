//! Partition layout planning
//!
//! Computes the EFI / swap / root layout for a target disk. Partitions are
//! laid out back to back from offset 0 and root always takes the remainder.

use crate::config::LayoutMode;
use crate::disk::naming::partition_path;
use crate::disk::units::{human_size, kib_string, SizeSpec};
use crate::utils::error::{ArchbookError, Result};
use tracing::debug;

/// Role a partition plays in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionRole {
    Efi,
    Swap,
    Root,
}

impl PartitionRole {
    /// Filesystem created on the partition
    pub fn filesystem(&self) -> &'static str {
        match self {
            Self::Efi => "vfat",
            Self::Swap => "swap",
            Self::Root => "ext4",
        }
    }

    /// Partition table flag set by parted
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Efi => "esp",
            Self::Swap => "swap",
            Self::Root => "boot",
        }
    }

    /// Key fragment used in generated variable names (`efi_number`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Self::Efi => "efi",
            Self::Swap => "swap",
            Self::Root => "root",
        }
    }
}

impl std::fmt::Display for PartitionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Efi => write!(f, "EFI"),
            Self::Swap => write!(f, "SWAP"),
            Self::Root => write!(f, "ROOT"),
        }
    }
}

/// Start or end of a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Absolute offset in bytes from the start of the disk
    Offset(u64),
    /// Everything up to the end of the disk
    Remainder,
}

impl Boundary {
    /// Value as written into partition variables
    pub fn render(&self) -> String {
        match self {
            Self::Offset(bytes) => kib_string(*bytes),
            Self::Remainder => "100%".to_string(),
        }
    }
}

/// A single planned partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSpec {
    pub role: PartitionRole,
    /// Partition number (1-based)
    pub number: u32,
    pub start: Boundary,
    pub end: Boundary,
}

impl PartitionSpec {
    pub fn filesystem(&self) -> &'static str {
        self.role.filesystem()
    }

    pub fn flag(&self) -> &'static str {
        self.role.flag()
    }
}

/// Computed partition layout for one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    device: String,
    mode: LayoutMode,
    efi: Option<PartitionSpec>,
    swap: PartitionSpec,
    root: PartitionSpec,
    efi_size: SizeSpec,
    swap_size: SizeSpec,
}

impl PartitionPlan {
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn efi(&self) -> Option<&PartitionSpec> {
        self.efi.as_ref()
    }

    pub fn swap(&self) -> &PartitionSpec {
        &self.swap
    }

    pub fn root(&self) -> &PartitionSpec {
        &self.root
    }

    /// Requested EFI size (zero in BIOS mode)
    pub fn efi_size(&self) -> SizeSpec {
        self.efi_size
    }

    pub fn swap_size(&self) -> SizeSpec {
        self.swap_size
    }

    /// Device node of a planned partition (`/dev/nvme0n1p2`)
    pub fn partition_path(&self, spec: &PartitionSpec) -> String {
        partition_path(&self.device, spec.number)
    }

    /// Partitions in on-disk order
    pub fn partitions(&self) -> impl Iterator<Item = &PartitionSpec> {
        self.efi.iter().chain([&self.swap, &self.root])
    }
}

/// Compute the partition layout for a device
///
/// `efi_size` is taken in MiB and must be zero in BIOS mode; `swap_size` is
/// taken in GiB and may be zero.
pub fn plan(device: &str, mode: LayoutMode, efi_size: SizeSpec, swap_size: SizeSpec) -> Result<PartitionPlan> {
    if device.is_empty() {
        return Err(ArchbookError::MissingField("device".to_string()));
    }

    if mode == LayoutMode::Bios && !efi_size.is_zero() {
        return Err(ArchbookError::InconsistentSize {
            efi_size_mib: efi_size.magnitude(),
        });
    }

    let (efi, swap_start, first_number) = match mode {
        LayoutMode::Uefi => {
            let end = efi_size.to_bytes()?;
            let efi = PartitionSpec {
                role: PartitionRole::Efi,
                number: 1,
                start: Boundary::Offset(0),
                end: Boundary::Offset(end),
            };
            (Some(efi), end, 2)
        }
        LayoutMode::Bios => (None, 0, 1),
    };

    let swap_end = swap_start
        .checked_add(swap_size.to_bytes()?)
        .ok_or_else(|| swap_size.overflow())?;
    let swap = PartitionSpec {
        role: PartitionRole::Swap,
        number: first_number,
        start: Boundary::Offset(swap_start),
        end: Boundary::Offset(swap_end),
    };

    let root = PartitionSpec {
        role: PartitionRole::Root,
        number: first_number + 1,
        start: Boundary::Offset(swap_end),
        end: Boundary::Remainder,
    };

    debug!(
        "Planned {} layout on {}: swap {}..{}, root from {}",
        mode,
        device,
        swap.start.render(),
        swap.end.render(),
        root.start.render()
    );

    Ok(PartitionPlan {
        device: device.to_string(),
        mode,
        efi,
        swap,
        root,
        efi_size,
        swap_size,
    })
}

/// Print layout summary
pub fn print_layout_summary(plan: &PartitionPlan) {
    println!("\nPartition layout for {} ({}):", plan.device(), plan.mode());
    println!("{:<6} {:<6} {:>10} {:>12} {:<6}", "NUM", "NAME", "START", "END", "FS");
    println!("{}", "-".repeat(46));

    for part in plan.partitions() {
        let start = match part.start {
            Boundary::Offset(bytes) => human_size(bytes),
            Boundary::Remainder => "-".to_string(),
        };
        let end = match part.end {
            Boundary::Offset(bytes) => human_size(bytes),
            Boundary::Remainder => "remainder".to_string(),
        };

        println!(
            "{:<6} {:<6} {:>10} {:>12} {:<6}",
            part.number,
            part.role,
            start,
            end,
            part.filesystem()
        );
    }
    println!();
}
