//! Top-level `playbook.yaml`

use crate::config::{ArtifactSet, Settings};

/// Roles in the order the play runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Main,
    Partition,
    Installation,
    Configure,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Partition => "partition",
            Self::Installation => "installation",
            Self::Configure => "configure",
        }
    }

    /// Variable file shipped with the role, if any
    pub fn vars_file(&self) -> Option<&'static str> {
        match self {
            Self::Partition => Some("roles/partition/vars/main.yaml"),
            Self::Configure => Some("roles/configure/vars/main.yaml"),
            Self::Main | Self::Installation => None,
        }
    }

    /// Roles taking part in a run
    pub fn for_set(set: ArtifactSet) -> Vec<Role> {
        let mut roles = vec![Self::Main, Self::Partition, Self::Installation];
        if set == ArtifactSet::Full {
            roles.push(Self::Configure);
        }
        roles
    }

    fn manifest_entry(&self) -> String {
        match self.vars_file() {
            Some(vars) => format!(
                "{{ role: {}, vars_files: [{}], tags: {} }}",
                self.name(),
                vars,
                self.name()
            ),
            None => format!("{{ role: {}, tags: {} }}", self.name(), self.name()),
        }
    }
}

pub fn render(name: &str, settings: &Settings) -> String {
    let mut out = String::from("---\n\n");
    out.push_str(&format!("- name: Install {} - {}\n", settings.distribution, name));
    out.push_str(&format!("  hosts: {}\n", settings.host_group));
    out.push_str("  connection: ssh\n");
    out.push_str("  become: true\n");
    out.push_str("  roles:\n");
    for role in Role::for_set(settings.artifact_set) {
        out.push_str(&format!("    - {}\n", role.manifest_entry()));
    }
    out
}
