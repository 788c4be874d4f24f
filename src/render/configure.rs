//! Configure role: timezone, locale, hostname, root password, bootloader

use crate::config::{LayoutMode, NvramPolicy, Settings};
use crate::disk::layouts::PartitionPlan;
use crate::render::tasks::{quote, render_tasks, Task, WHEN_BIOS, WHEN_UEFI};
use crate::render::RenderFields;
use crate::utils::error::{ArchbookError, Result};

/// Configure role answers with every required field present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureValues<'a> {
    pub region: &'a str,
    pub city: &'a str,
    pub locale: &'a str,
    pub keymap: &'a str,
    pub hostname: &'a str,
    pub root_password: &'a str,
    pub bootloader_target: &'a str,
    pub nvram: NvramPolicy,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ArchbookError::MissingField(format!("system.{}", name))),
    }
}

impl<'a> ConfigureValues<'a> {
    pub fn resolve(fields: &'a RenderFields, mode: LayoutMode) -> Result<Self> {
        Ok(Self {
            region: required(&fields.region, "region")?,
            city: required(&fields.city, "city")?,
            locale: required(&fields.locale, "locale")?,
            keymap: required(&fields.keymap, "keymap")?,
            hostname: required(&fields.hostname, "hostname")?,
            root_password: required(&fields.root_password, "root_password")?,
            bootloader_target: fields
                .bootloader_target
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| mode.default_bootloader_target()),
            nvram: fields.nvram,
        })
    }
}

/// `roles/configure/vars/main.yaml`
pub fn render_vars(plan: &PartitionPlan, values: &ConfigureValues) -> String {
    let mut out = String::new();
    out.push_str(&format!("device: {}\n", plan.device()));
    out.push_str(&format!("layout: {}\n", plan.mode()));
    // free-text answers are always double-quoted scalars
    out.push_str(&format!("region: {}\n", quote(values.region)));
    out.push_str(&format!("city: {}\n", quote(values.city)));
    out.push_str(&format!("locale: {}\n", quote(values.locale)));
    out.push_str(&format!("keymap: {}\n", quote(values.keymap)));
    out.push_str(&format!("hostname: {}\n", quote(values.hostname)));
    out.push_str(&format!("root_password: {}\n", quote(values.root_password)));
    out.push_str(&format!("bootloader_target: {}\n", quote(values.bootloader_target)));
    out.push_str(&format!("no_nvram: {}\n", quote(values.nvram.grub_argument())));
    out
}

/// Ordered configure steps, run inside the new system through arch-chroot
pub fn tasks(plan: &PartitionPlan, settings: &Settings) -> Vec<Task> {
    let root = settings.mount_root();
    let chroot = |cmd: &str| format!("arch-chroot {} {}", root, cmd);

    let mut tasks = vec![
        Task::shell(
            "Set timezone",
            chroot("ln -sf /usr/share/zoneinfo/{{ region }}/{{ city }} /etc/localtime"),
        ),
        Task::shell("Sync hardware clock", chroot("hwclock --systohc")),
        Task::new("Enable locale", "ansible.builtin.lineinfile")
            .param("path", format!("{}/etc/locale.gen", root))
            .param("regexp", quote("^#?{{ locale }} "))
            .param("line", quote("{{ locale }} UTF-8")),
        Task::shell("Generate locales", chroot("locale-gen")),
        Task::new("Set system language", "ansible.builtin.copy")
            .param("dest", format!("{}/etc/locale.conf", root))
            .param("content", "LANG={{ locale }}\n"),
        Task::new("Set console keymap", "ansible.builtin.copy")
            .param("dest", format!("{}/etc/vconsole.conf", root))
            .param("content", "KEYMAP={{ keymap }}\n"),
        Task::new("Set hostname", "ansible.builtin.copy")
            .param("dest", format!("{}/etc/hostname", root))
            .param("content", "{{ hostname }}\n"),
        Task::new("Configure hosts", "ansible.builtin.copy")
            .param("dest", format!("{}/etc/hosts", root))
            .param(
                "content",
                "127.0.0.1 localhost\n::1 localhost\n127.0.1.1 {{ hostname }}.localdomain {{ hostname }}\n",
            ),
        Task::shell("Set root password", chroot("chpasswd"))
            .param("stdin", quote("root:{{ root_password }}")),
    ];

    match plan.mode() {
        LayoutMode::Uefi => {
            tasks.push(
                Task::shell(
                    "Install bootloader packages",
                    format!("pacstrap {} grub efibootmgr", root),
                )
                .when(WHEN_UEFI),
            );
            tasks.push(
                Task::shell(
                    "Install GRUB (UEFI)",
                    chroot("grub-install --target={{ bootloader_target }} --efi-directory=/boot --bootloader-id=GRUB {{ no_nvram }}"),
                )
                .when(WHEN_UEFI),
            );
        }
        LayoutMode::Bios => {
            tasks.push(
                Task::shell("Install bootloader packages", format!("pacstrap {} grub", root))
                    .when(WHEN_BIOS),
            );
            tasks.push(
                Task::shell(
                    "Install GRUB (BIOS)",
                    chroot("grub-install --target={{ bootloader_target }} {{ device }}"),
                )
                .when(WHEN_BIOS),
            );
        }
    }

    tasks.push(Task::shell(
        "Generate GRUB configuration",
        chroot("grub-mkconfig -o /boot/grub/grub.cfg"),
    ));

    tasks
}

/// `roles/configure/tasks/main.yaml`
pub fn render_tasks_file(plan: &PartitionPlan, settings: &Settings) -> String {
    render_tasks(&tasks(plan, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::layouts::plan;
    use crate::disk::units::SizeSpec;
    use crate::render::tests::sample_fields;

    fn uefi_plan() -> PartitionPlan {
        plan("/dev/sda", LayoutMode::Uefi, SizeSpec::mib(512), SizeSpec::gib(8)).unwrap()
    }

    fn bios_plan() -> PartitionPlan {
        plan("/dev/sda", LayoutMode::Bios, SizeSpec::mib(0), SizeSpec::gib(4)).unwrap()
    }

    #[test]
    fn nvram_disabled_surfaces_flag() {
        let mut fields = sample_fields();
        fields.nvram = NvramPolicy::Disabled;
        let values = ConfigureValues::resolve(&fields, LayoutMode::Uefi).unwrap();
        let vars = render_vars(&uefi_plan(), &values);
        assert!(vars.contains("no_nvram: \"--no-nvram\"\n"));
    }

    #[test]
    fn nvram_enabled_surfaces_empty_argument() {
        let fields = sample_fields();
        let values = ConfigureValues::resolve(&fields, LayoutMode::Uefi).unwrap();
        let vars = render_vars(&uefi_plan(), &values);
        assert!(vars.contains("no_nvram: \"\"\n"));
        assert!(!vars.contains("--no-nvram"));
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let mut fields = sample_fields();
        fields.hostname = None;
        let err = ConfigureValues::resolve(&fields, LayoutMode::Uefi).unwrap_err();
        assert!(matches!(err, ArchbookError::MissingField(ref f) if f == "system.hostname"));

        fields.hostname = Some("  ".to_string());
        assert!(ConfigureValues::resolve(&fields, LayoutMode::Uefi).is_err());
    }

    #[test]
    fn bootloader_target_defaults_by_mode() {
        let mut fields = sample_fields();
        fields.bootloader_target = None;
        let uefi = ConfigureValues::resolve(&fields, LayoutMode::Uefi).unwrap();
        assert_eq!(uefi.bootloader_target, "x86_64-efi");
        let bios = ConfigureValues::resolve(&fields, LayoutMode::Bios).unwrap();
        assert_eq!(bios.bootloader_target, "i386-pc");
    }

    #[test]
    fn root_password_is_quoted() {
        let mut fields = sample_fields();
        fields.root_password = Some("p\"ss: word".to_string());
        let values = ConfigureValues::resolve(&fields, LayoutMode::Uefi).unwrap();
        let vars = render_vars(&uefi_plan(), &values);
        assert!(vars.contains("root_password: \"p\\\"ss: word\"\n"));
    }

    #[test]
    fn free_text_values_are_quoted() {
        let mut fields = sample_fields();
        fields.keymap = Some("no".to_string());
        fields.locale = Some("en_US.UTF-8 # trailing".to_string());
        let values = ConfigureValues::resolve(&fields, LayoutMode::Uefi).unwrap();
        let vars = render_vars(&uefi_plan(), &values);
        assert!(vars.contains("keymap: \"no\"\n"));
        assert!(vars.contains("locale: \"en_US.UTF-8 # trailing\"\n"));
        assert!(vars.contains("region: \"Europe\"\ncity: \"Paris\"\n"));
        assert!(vars.contains("hostname: \"archlinux\"\n"));
        assert!(vars.contains("bootloader_target: \"x86_64-efi\"\n"));
    }

    #[test]
    fn uefi_bootloader_steps_are_guarded() {
        let text = render_tasks_file(&uefi_plan(), &Settings::default());
        assert!(text.contains("--efi-directory=/boot --bootloader-id=GRUB {{ no_nvram }}\n  when: layout == \"uefi\"\n"));
        assert!(text.contains("pacstrap /mnt grub efibootmgr\n  when: layout == \"uefi\"\n"));
        assert!(!text.contains("layout == \"bios\""));
    }

    #[test]
    fn bios_bootloader_installs_to_device() {
        let text = render_tasks_file(&bios_plan(), &Settings::default());
        assert!(text.contains("grub-install --target={{ bootloader_target }} {{ device }}\n  when: layout == \"bios\"\n"));
        assert!(!text.contains("efibootmgr"));
        assert!(!text.contains("no_nvram"));
    }

    #[test]
    fn steps_run_inside_chroot() {
        let tasks = tasks(&uefi_plan(), &Settings::default());
        assert_eq!(tasks.first().unwrap().name, "Set timezone");
        assert_eq!(tasks.last().unwrap().name, "Generate GRUB configuration");
        let text = render_tasks(&tasks);
        assert!(text.contains("cmd: arch-chroot /mnt ln -sf /usr/share/zoneinfo/{{ region }}/{{ city }} /etc/localtime\n"));
        assert!(text.contains("cmd: arch-chroot /mnt grub-mkconfig -o /boot/grub/grub.cfg\n"));
    }
}
