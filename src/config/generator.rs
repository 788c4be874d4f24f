//! Generator configuration (answers file and interactive wizard)

use crate::config::Settings;
use crate::disk::layouts::{self, print_layout_summary, PartitionPlan};
use crate::disk::units::{SizeSpec, SizeUnit};
use crate::output::writer::ensure_available;
use crate::utils::error::{ArchbookError, Result};
use crate::utils::prompt::*;
use crate::utils::validation;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Everything needed to generate one playbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Playbook name, also the output directory name
    pub name: String,
    pub inventory: InventoryConfig,
    pub disk: DiskConfig,
    /// Configure role answers (required when the full artifact set is emitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemConfig>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Target server IP address
    pub ip: String,
    /// SSH user on the target
    pub user: String,
    /// Path to the SSH private key
    pub key_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Target device path (e.g., /dev/sda)
    pub device: String,
    /// Boot layout mode
    #[serde(default)]
    pub layout: LayoutMode,
    /// EFI partition size in MiB (must be 0 for BIOS)
    #[serde(default)]
    pub efi_size_mib: i64,
    /// Swap partition size in GiB
    #[serde(default)]
    pub swap_size_gib: i64,
}

impl DiskConfig {
    pub fn efi_size(&self) -> Result<SizeSpec> {
        SizeSpec::new(self.efi_size_mib, SizeUnit::MiB)
    }

    pub fn swap_size(&self) -> Result<SizeSpec> {
        SizeSpec::new(self.swap_size_gib, SizeUnit::GiB)
    }

    /// Check the device name, then plan the layout
    pub fn plan(&self) -> Result<PartitionPlan> {
        validation::validate_device(&self.device)?;
        layouts::plan(&self.device, self.layout, self.efi_size()?, self.swap_size()?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Timezone region (e.g., "Europe")
    pub region: Option<String>,
    /// Timezone city (e.g., "Paris")
    pub city: Option<String>,
    /// Locale (e.g., "en_US.UTF-8")
    #[serde(default = "default_locale")]
    pub locale: Option<String>,
    /// Console keyboard layout
    #[serde(default = "default_keymap")]
    pub keymap: Option<String>,
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_password: Option<String>,
    /// GRUB target; derived from the layout mode when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootloader_target: Option<String>,
    #[serde(default)]
    pub nvram: NvramPolicy,
}

// Enums for configuration options

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LayoutMode {
    /// GPT with an EFI system partition
    #[default]
    Uefi,
    /// Legacy boot, no EFI partition
    Bios,
}

impl LayoutMode {
    /// GRUB `--target` used when none is configured
    pub fn default_bootloader_target(&self) -> &'static str {
        match self {
            Self::Uefi => "x86_64-efi",
            Self::Bios => "i386-pc",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Uefi => "UEFI (EFI, Swap, Root)",
            Self::Bios => "BIOS (Swap, Root)",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uefi => write!(f, "uefi"),
            Self::Bios => write!(f, "bios"),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = ArchbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uefi" => Ok(Self::Uefi),
            "bios" => Ok(Self::Bios),
            _ => Err(ArchbookError::InvalidMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for LayoutMode {
    type Error = ArchbookError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Whether grub-install may write EFI boot entries to NVRAM
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NvramPolicy {
    #[default]
    Enabled,
    Disabled,
}

impl NvramPolicy {
    /// Extra grub-install argument
    pub fn grub_argument(&self) -> &'static str {
        match self {
            Self::Enabled => "",
            Self::Disabled => "--no-nvram",
        }
    }
}

/// Which artifacts a generation run emits
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactSet {
    /// main, partition and installation roles
    Base,
    /// Base plus the configure role
    #[default]
    Full,
}

impl std::fmt::Display for ArtifactSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Full => write!(f, "full"),
        }
    }
}

// Default value functions

fn default_locale() -> Option<String> {
    Some("en_US.UTF-8".to_string())
}

fn default_keymap() -> Option<String> {
    Some("us".to_string())
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse an answers file; an unknown `disk.layout` is reported as `InvalidMode`
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        if let Some(layout) = table
            .get("disk")
            .and_then(|disk| disk.get("layout"))
            .and_then(|layout| layout.as_str())
        {
            layout.parse::<LayoutMode>()?;
        }
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Serialize as an answers file
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Create configuration interactively
    pub fn from_wizard(name: Option<String>, settings: Settings) -> Result<Self> {
        print_title("Welcome to the ArchLinux playbook generator!");

        let name = match name {
            Some(n) => n,
            None => prompt_validated("Name of your playbook", None, |n| {
                validation::validate_playbook_name(n)?;
                ensure_available(&settings, n)
            })?,
        };

        print_title("Inventory configuration");
        let ip = prompt_validated("IP address of your server", None, validation::validate_ip)?;
        let user = prompt_validated("User name of your server", None, validation::validate_user)?;
        let key_path = prompt_validated("SSH private key path", None, validation::validate_key_path)?;

        print_title("Partition role configuration");
        let device = prompt_validated("Device", Some("/dev/sda"), validation::validate_device)?;
        let modes = [LayoutMode::Uefi, LayoutMode::Bios];
        let labels: Vec<&str> = modes.iter().map(|m| m.description()).collect();
        let layout = modes[prompt_select("Layout", &labels, 0)?];

        let efi_size_mib = match layout {
            LayoutMode::Uefi => prompt_size("Size of your EFI partition in MiB", "512")?,
            LayoutMode::Bios => {
                println!("  EFI partition: none (BIOS layout)");
                0
            }
        };
        let swap_size_gib = prompt_size("Size of your swap partition in GiB", "4")?;

        let disk = DiskConfig {
            device,
            layout,
            efi_size_mib,
            swap_size_gib,
        };

        let plan = disk.plan()?;
        print_layout_summary(&plan);

        let mut settings = settings;
        let system = if prompt_confirm("Generate the configure role (locale, hostname, bootloader)?", true)? {
            settings.artifact_set = ArtifactSet::Full;
            Some(Self::system_wizard(layout)?)
        } else {
            settings.artifact_set = ArtifactSet::Base;
            None
        };

        Ok(GeneratorConfig {
            name,
            inventory: InventoryConfig { ip, user, key_path },
            disk,
            system,
            settings,
        })
    }

    fn system_wizard(layout: LayoutMode) -> Result<SystemConfig> {
        print_title("Configure role configuration");

        let region = prompt_input("Timezone region", Some("Europe"))?;
        let city = prompt_input("Timezone city", Some("Paris"))?;
        let locale = prompt_input("Locale", Some("en_US.UTF-8"))?;
        let keymap = prompt_input("Keyboard layout", Some("us"))?;
        let hostname = prompt_validated("Hostname", Some("archlinux"), validation::validate_hostname)?;
        let root_password = prompt_password("Root password", true)?;

        let nvram = if layout == LayoutMode::Uefi
            && !prompt_confirm("Let grub-install write boot entries to NVRAM?", true)?
        {
            NvramPolicy::Disabled
        } else {
            NvramPolicy::Enabled
        };

        Ok(SystemConfig {
            region: Some(region),
            city: Some(city),
            locale: Some(locale),
            keymap: Some(keymap),
            hostname: Some(hostname),
            root_password: Some(root_password),
            bootloader_target: None,
            nvram,
        })
    }

    /// Generate a sample configuration
    pub fn sample() -> Self {
        GeneratorConfig {
            name: "archlinux-server".to_string(),
            inventory: InventoryConfig {
                ip: "192.168.1.50".to_string(),
                user: "root".to_string(),
                key_path: "~/.ssh/id_ed25519".to_string(),
            },
            disk: DiskConfig {
                device: "/dev/sda".to_string(),
                layout: LayoutMode::Uefi,
                efi_size_mib: 512,
                swap_size_gib: 4,
            },
            system: Some(SystemConfig {
                region: Some("Europe".to_string()),
                city: Some("Paris".to_string()),
                locale: default_locale(),
                keymap: default_keymap(),
                hostname: Some("archlinux".to_string()),
                root_password: Some("changeme".to_string()),
                bootloader_target: None,
                nvram: NvramPolicy::Enabled,
            }),
            settings: Settings::default(),
        }
    }

    /// Validate the field syntax
    ///
    /// Cross-field consistency (EFI size vs layout) is left to the planner.
    pub fn validate(&self) -> Result<()> {
        validation::validate_playbook_name(&self.name)?;
        validation::validate_ip(&self.inventory.ip)?;
        validation::validate_user(&self.inventory.user)?;
        validation::validate_key_path(&self.inventory.key_path)?;
        validation::validate_device(&self.disk.device)?;
        self.disk.efi_size()?;
        self.disk.swap_size()?;
        self.settings.validate()?;

        if let Some(hostname) = self.system.as_ref().and_then(|s| s.hostname.as_deref()) {
            validation::validate_hostname(hostname)?;
        }

        Ok(())
    }
}

/// Ask for a non-negative integer size
fn prompt_size(prompt: &str, default: &str) -> Result<i64> {
    let value = prompt_validated(prompt, Some(default), validation::validate_size)?;
    value
        .trim()
        .parse()
        .map_err(|_| ArchbookError::InvalidInput(format!("Bad formatting of size, expected [0-9]+: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_mode_parses_case_insensitively() {
        assert_eq!("uefi".parse::<LayoutMode>().unwrap(), LayoutMode::Uefi);
        assert_eq!("BIOS".parse::<LayoutMode>().unwrap(), LayoutMode::Bios);
    }

    #[test]
    fn unknown_layout_mode_is_invalid() {
        let err = "gpt".parse::<LayoutMode>().unwrap_err();
        assert!(matches!(err, ArchbookError::InvalidMode(ref m) if m == "gpt"));
    }

    #[test]
    fn unknown_layout_in_answers_file_is_invalid_mode() {
        let text = r#"
name = "lab"

[inventory]
ip = "10.0.0.2"
user = "root"
key_path = "/tmp/key"

[disk]
device = "/dev/vda"
layout = "gpt"
swap_size_gib = 2
"#;
        let err = GeneratorConfig::from_toml(text).unwrap_err();
        assert!(matches!(err, ArchbookError::InvalidMode(ref m) if m == "gpt"));

        // plain serde deserialization goes through the same parser
        let err = toml::from_str::<GeneratorConfig>(text).unwrap_err();
        assert!(err.to_string().contains("Invalid layout mode: gpt"));

        let config = GeneratorConfig::from_toml(&text.replace("gpt", "UEFI")).unwrap();
        assert_eq!(config.disk.layout, LayoutMode::Uefi);
    }

    #[test]
    fn disk_plan_checks_device_name() {
        let mut disk = GeneratorConfig::sample().disk;
        let plan = disk.plan().unwrap();
        assert_eq!(plan.device(), "/dev/sda");
        assert_eq!(plan.root().number, 3);

        disk.device = "foo".to_string();
        assert!(matches!(disk.plan(), Err(ArchbookError::InvalidInput(_))));
    }

    #[test]
    fn nvram_policy_argument() {
        assert_eq!(NvramPolicy::Enabled.grub_argument(), "");
        assert_eq!(NvramPolicy::Disabled.grub_argument(), "--no-nvram");
    }

    #[test]
    fn sample_round_trips_through_toml() {
        let sample = GeneratorConfig::sample();
        let text = sample.to_toml().unwrap();
        let parsed: GeneratorConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.name, sample.name);
        assert_eq!(parsed.disk.layout, LayoutMode::Uefi);
        assert_eq!(parsed.settings.artifact_set, ArtifactSet::Full);
    }

    #[test]
    fn minimal_file_uses_defaults() {
        let text = r#"
name = "lab"

[inventory]
ip = "10.0.0.2"
user = "root"
key_path = "/tmp/key"

[disk]
device = "/dev/vda"
layout = "bios"
swap_size_gib = 2

[system]
hostname = "lab"
"#;
        let config = GeneratorConfig::from_toml(text).unwrap();
        assert_eq!(config.disk.layout, LayoutMode::Bios);
        assert_eq!(config.disk.efi_size_mib, 0);
        let system = config.system.unwrap();
        assert_eq!(system.locale.as_deref(), Some("en_US.UTF-8"));
        assert_eq!(system.keymap.as_deref(), Some("us"));
        assert!(system.region.is_none());
        assert_eq!(system.nvram, NvramPolicy::Enabled);
        assert_eq!(config.settings.host_group, "archlinux_server");
    }

    #[test]
    fn negative_sizes_fail_validation() {
        let mut config = GeneratorConfig::sample();
        config.inventory.key_path = std::env::temp_dir().display().to_string();
        config.disk.swap_size_gib = -4;
        assert!(matches!(config.validate(), Err(ArchbookError::InvalidSize(-4))));
    }

    #[test]
    fn filesystem_root_mount_fails_validation() {
        let mut config = GeneratorConfig::sample();
        config.inventory.key_path = std::env::temp_dir().display().to_string();
        assert!(config.validate().is_ok());
        config.settings.mount_root = "/".to_string();
        assert!(matches!(config.validate(), Err(ArchbookError::InvalidInput(_))));
    }

    #[test]
    fn malformed_ip_fails_validation() {
        let mut config = GeneratorConfig::sample();
        config.inventory.ip = "192.168.1".to_string();
        assert!(matches!(config.validate(), Err(ArchbookError::InvalidInput(_))));
    }
}
