//! Minimal model of an Ansible task list and its YAML form

/// Guard attached to every step that only applies to UEFI layouts
pub const WHEN_UEFI: &str = r#"layout == "uefi""#;
/// Guard attached to BIOS-only steps
pub const WHEN_BIOS: &str = r#"layout == "bios""#;

/// One named step of a task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    /// Fully qualified module name (e.g., `community.general.parted`)
    pub module: String,
    pub params: Vec<(String, String)>,
    pub when: Option<String>,
}

impl Task {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            params: Vec::new(),
            when: None,
        }
    }

    /// Shell command step
    pub fn shell(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self::new(name, "ansible.builtin.shell").param("cmd", cmd)
    }

    /// Add a module parameter; the value is emitted verbatim
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.when = Some(condition.into());
        self
    }

    /// Same as `when`, skipped when `condition` is `None`
    pub fn when_opt(self, condition: Option<&str>) -> Self {
        match condition {
            Some(c) => self.when(c),
            None => self,
        }
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&format!("- name: {}\n", self.name));
        out.push_str(&format!("  {}:\n", self.module));

        for (key, value) in &self.params {
            if value.contains('\n') {
                out.push_str(&format!("    {}: |\n", key));
                for line in value.lines() {
                    out.push_str(&format!("      {}\n", line));
                }
            } else {
                out.push_str(&format!("    {}: {}\n", key, value));
            }
        }

        if let Some(ref condition) = self.when {
            out.push_str(&format!("  when: {}\n", condition));
        }
    }
}

/// Render a task file: document marker then one blank line between steps
pub fn render_tasks(tasks: &[Task]) -> String {
    let mut out = String::from("---\n");
    for task in tasks {
        out.push('\n');
        task.render_into(&mut out);
    }
    out
}

/// Double-quoted YAML scalar
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Quoted Jinja reference to a variable (`"{{ device }}"`)
pub fn var(name: &str) -> String {
    format!("\"{{{{ {} }}}}\"", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_params_and_guard() {
        let task = Task::new("Create EFI partition", "community.general.parted")
            .param("device", var("device"))
            .param("state", "present")
            .when(WHEN_UEFI);

        assert_eq!(
            render_tasks(&[task]),
            "---\n\n- name: Create EFI partition\n  community.general.parted:\n    device: \"{{ device }}\"\n    state: present\n  when: layout == \"uefi\"\n"
        );
    }

    #[test]
    fn multiline_values_use_block_scalars() {
        let task = Task::new("Write hosts", "ansible.builtin.copy").param("content", "a\nb\n");
        let out = render_tasks(&[task]);
        assert!(out.contains("    content: |\n      a\n      b\n"));
    }

    #[test]
    fn when_opt_skips_missing_condition() {
        let task = Task::shell("Swapon", "swapon /dev/sda2").when_opt(None);
        assert!(task.when.is_none());
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote(r#"pa"ss\word"#), r#""pa\"ss\\word""#);
        assert_eq!(quote(""), "\"\"");
    }
}
