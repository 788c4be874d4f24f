//! `inventory.ini`

use crate::config::Settings;
use crate::render::RenderFields;

pub fn render(fields: &RenderFields, settings: &Settings) -> String {
    format!(
        "[{}]\n{} ansible_user={} ansible_ssh_private_key_file={}\n",
        settings.host_group, fields.ip, fields.user, fields.key_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_fields;

    #[test]
    fn single_host_stanza() {
        let text = render(&sample_fields(), &Settings::default());
        assert_eq!(
            text,
            "[archlinux_server]\n192.168.1.50 ansible_user=root ansible_ssh_private_key_file=/home/op/.ssh/id_ed25519\n"
        );
    }

    #[test]
    fn host_group_comes_from_settings() {
        let settings = Settings {
            host_group: "lab".to_string(),
            ..Settings::default()
        };
        assert!(render(&sample_fields(), &settings).starts_with("[lab]\n"));
    }
}
