//! Block device partition naming

/// Get the partition naming prefix for a device
/// e.g., /dev/sda -> /dev/sda, /dev/nvme0n1 -> /dev/nvme0n1p
pub fn partition_prefix(device: &str) -> String {
    let ends_with_digit = device.chars().last().is_some_and(|c| c.is_ascii_digit());
    if ends_with_digit && (device.contains("nvme") || device.contains("mmcblk") || device.contains("loop")) {
        format!("{}p", device)
    } else {
        device.to_string()
    }
}

/// Get partition path for a device and partition number
pub fn partition_path(device: &str, partition_num: u32) -> String {
    format!("{}{}", partition_prefix(device), partition_num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sata_disks_append_number() {
        assert_eq!(partition_path("/dev/sda", 1), "/dev/sda1");
        assert_eq!(partition_path("/dev/vdb", 3), "/dev/vdb3");
    }

    #[test]
    fn nvme_and_mmc_use_p_separator() {
        assert_eq!(partition_path("/dev/nvme0n1", 2), "/dev/nvme0n1p2");
        assert_eq!(partition_path("/dev/mmcblk0", 1), "/dev/mmcblk0p1");
    }
}
