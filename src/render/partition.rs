//! Partition role: variables and disk-mutating tasks

use crate::config::Settings;
use crate::disk::layouts::{PartitionPlan, PartitionRole, PartitionSpec};
use crate::render::tasks::{render_tasks, var, Task, WHEN_UEFI};

/// `roles/partition/vars/main.yaml`
///
/// All offsets are literal KiB values computed by the planner.
pub fn render_vars(plan: &PartitionPlan) -> String {
    let mut out = String::new();
    out.push_str(&format!("device: {}\n", plan.device()));
    out.push_str(&format!("layout: {}\n", plan.mode()));
    if plan.efi().is_some() {
        out.push_str(&format!("efi_size_mib: {}\n", plan.efi_size().magnitude()));
    }
    out.push_str(&format!("swap_size_gib: {}\n", plan.swap_size().magnitude()));

    for part in plan.partitions() {
        let key = part.role.key();
        out.push_str(&format!("{}_number: {}\n", key, part.number));
        out.push_str(&format!("{}_partition: {}\n", key, plan.partition_path(part)));
        out.push_str(&format!("part_start_{}: {}\n", key, part.start.render()));
        out.push_str(&format!("part_end_{}: {}\n", key, part.end.render()));
    }

    out
}

fn guard(role: PartitionRole) -> Option<&'static str> {
    match role {
        PartitionRole::Efi => Some(WHEN_UEFI),
        PartitionRole::Swap | PartitionRole::Root => None,
    }
}

fn create_task(part: &PartitionSpec) -> Task {
    let key = part.role.key();
    Task::new(
        format!("Create {} partition", role_label(part.role)),
        "community.general.parted",
    )
    .param("device", var("device"))
    .param("number", var(&format!("{}_number", key)))
    .param("state", "present")
    .param("label", "gpt")
    .param("flags", format!("[{}]", part.flag()))
    .param("part_start", var(&format!("part_start_{}", key)))
    .param("part_end", var(&format!("part_end_{}", key)))
    .when_opt(guard(part.role))
}

fn format_task(part: &PartitionSpec) -> Task {
    Task::new(
        format!("Format {} partition", role_label(part.role)),
        "community.general.filesystem",
    )
    .param("fstype", part.filesystem())
    .param("dev", var(&format!("{}_partition", part.role.key())))
    .param("force", "true")
    .when_opt(guard(part.role))
}

fn role_label(role: PartitionRole) -> &'static str {
    match role {
        PartitionRole::Efi => "EFI",
        PartitionRole::Swap => "swap",
        PartitionRole::Root => "root",
    }
}

/// Ordered partition steps for a plan
///
/// EFI steps are only emitted when the plan has an EFI partition, and each
/// of them is still guarded on the layout variable.
pub fn tasks(plan: &PartitionPlan, settings: &Settings) -> Vec<Task> {
    let mount_root = settings.mount_root();
    let boot_dir = format!("{}/boot", mount_root);
    let mut tasks = Vec::new();

    for part in plan.partitions() {
        tasks.push(create_task(part));
        tasks.push(format_task(part));
    }

    tasks.push(
        Task::new("Mount root partition", "ansible.posix.mount")
            .param("path", mount_root)
            .param("src", var("root_partition"))
            .param("state", "mounted")
            .param("fstype", plan.root().filesystem()),
    );

    if let Some(efi) = plan.efi() {
        tasks.push(
            Task::new(format!("Create {} directory", boot_dir), "ansible.builtin.file")
                .param("path", boot_dir.as_str())
                .param("state", "directory")
                .param("mode", "\"0755\"")
                .param("owner", "root")
                .param("group", "root")
                .when(WHEN_UEFI),
        );
        tasks.push(
            Task::new("Mount EFI partition", "ansible.posix.mount")
                .param("path", boot_dir.as_str())
                .param("src", var("efi_partition"))
                .param("state", "mounted")
                .param("fstype", efi.filesystem())
                .when(WHEN_UEFI),
        );
    }

    tasks.push(Task::shell(
        "Swapon swap partition",
        "swapon {{ swap_partition }}",
    ));

    tasks
}

/// `roles/partition/tasks/main.yaml`
pub fn render_tasks_file(plan: &PartitionPlan, settings: &Settings) -> String {
    render_tasks(&tasks(plan, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutMode;
    use crate::disk::layouts::plan;
    use crate::disk::units::SizeSpec;

    fn uefi_plan() -> PartitionPlan {
        plan("/dev/sda", LayoutMode::Uefi, SizeSpec::mib(512), SizeSpec::gib(8)).unwrap()
    }

    fn bios_plan() -> PartitionPlan {
        plan("/dev/sda", LayoutMode::Bios, SizeSpec::mib(0), SizeSpec::gib(4)).unwrap()
    }

    #[test]
    fn uefi_vars_are_precomputed() {
        assert_eq!(
            render_vars(&uefi_plan()),
            "device: /dev/sda
layout: uefi
efi_size_mib: 512
swap_size_gib: 8
efi_number: 1
efi_partition: /dev/sda1
part_start_efi: 0KiB
part_end_efi: 524288KiB
swap_number: 2
swap_partition: /dev/sda2
part_start_swap: 524288KiB
part_end_swap: 8912896KiB
root_number: 3
root_partition: /dev/sda3
part_start_root: 8912896KiB
part_end_root: 100%
"
        );
    }

    #[test]
    fn bios_vars_have_no_efi_keys() {
        let vars = render_vars(&bios_plan());
        assert!(!vars.contains("efi"));
        assert!(vars.contains("swap_number: 1\n"));
        assert!(vars.contains("part_start_swap: 0KiB\n"));
        assert!(vars.contains("part_end_swap: 4194304KiB\n"));
        assert!(vars.contains("root_number: 2\n"));
        assert!(vars.contains("part_start_root: 4194304KiB\n"));
    }

    #[test]
    fn uefi_task_order() {
        let names: Vec<String> = tasks(&uefi_plan(), &Settings::default())
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Create EFI partition",
                "Format EFI partition",
                "Create swap partition",
                "Format swap partition",
                "Create root partition",
                "Format root partition",
                "Mount root partition",
                "Create /mnt/boot directory",
                "Mount EFI partition",
                "Swapon swap partition",
            ]
        );
    }

    #[test]
    fn every_efi_step_is_guarded() {
        for task in tasks(&uefi_plan(), &Settings::default()) {
            let efi_dependent = task.name.contains("EFI") || task.name.contains("/boot");
            assert_eq!(
                task.when.is_some(),
                efi_dependent,
                "unexpected guard on {:?}",
                task.name
            );
            if efi_dependent {
                assert_eq!(task.when.as_deref(), Some(WHEN_UEFI));
            }
        }
    }

    #[test]
    fn bios_tasks_skip_efi_steps() {
        let tasks = tasks(&bios_plan(), &Settings::default());
        assert_eq!(tasks.len(), 6);
        assert!(tasks.iter().all(|t| t.when.is_none()));
        assert!(!tasks.iter().any(|t| t.name.contains("EFI")));
    }

    #[test]
    fn format_steps_always_force() {
        let formats: Vec<_> = tasks(&uefi_plan(), &Settings::default())
            .into_iter()
            .filter(|t| t.module == "community.general.filesystem")
            .collect();
        assert_eq!(formats.len(), 3);
        for task in formats {
            assert!(task.params.contains(&("force".to_string(), "true".to_string())));
        }
    }

    #[test]
    fn mount_root_follows_settings() {
        let settings = Settings {
            mount_root: "/target/".to_string(),
            ..Settings::default()
        };
        let text = render_tasks_file(&uefi_plan(), &settings);
        assert!(text.contains("    path: /target\n"));
        assert!(text.contains("- name: Create /target/boot directory\n"));
    }
}
