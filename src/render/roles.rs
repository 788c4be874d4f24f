//! Fixed boilerplate roles: main and installation

use crate::config::Settings;
use crate::render::tasks::{render_tasks, Task};

/// Pre-flight checks on the live environment
pub fn main_tasks() -> Vec<Task> {
    vec![
        Task::shell("Verify ping", "ping -c 3 archlinux.org"),
        Task::shell(
            "Verify GPG key",
            "gpg --auto-key-locate clear,wkd -v --locate-external-key pierre@archlinux.org",
        ),
        Task::new("Update pacman database", "community.general.pacman").param("update_cache", "true"),
        Task::shell("Update the system clock", "timedatectl set-ntp true"),
    ]
}

/// Base system install and fstab generation
pub fn installation_tasks(settings: &Settings) -> Vec<Task> {
    let mount_root = settings.mount_root();
    vec![
        Task::shell(
            "Install base, linux, linux-firmware",
            format!("pacstrap -K {} base linux linux-firmware", mount_root),
        ),
        Task::shell(
            "Generate fstab",
            format!("genfstab -U {0} > {0}/etc/fstab", mount_root),
        ),
    ]
}

/// `roles/main/tasks/main.yaml`
pub fn render_main() -> String {
    render_tasks(&main_tasks())
}

/// `roles/installation/tasks/main.yaml`
pub fn render_installation(settings: &Settings) -> String {
    render_tasks(&installation_tasks(settings))
}
