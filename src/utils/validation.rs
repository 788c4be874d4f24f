//! Syntactic validation of operator input
//!
//! Every check returns `InvalidInput` with a message suitable for re-prompting.

use crate::utils::error::{ArchbookError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static IP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,3}(\.[0-9]{1,3}){3}$").unwrap());
static USER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_-]*\$?$").unwrap());
static DEVICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/dev/[a-z][a-z0-9]*$").unwrap());
static SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static HOSTNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").unwrap());

fn invalid(message: impl Into<String>) -> ArchbookError {
    ArchbookError::InvalidInput(message.into())
}

/// Dotted-quad IPv4 address
pub fn validate_ip(ip: &str) -> Result<()> {
    let octets_ok = ip.split('.').all(|o| o.parse::<u16>().map(|v| v <= 255).unwrap_or(false));
    if !IP_RE.is_match(ip) || !octets_ok {
        return Err(invalid(format!(
            "Bad formatting of IP address, expected XXX.XXX.XXX.XXX: {}",
            ip
        )));
    }
    Ok(())
}

pub fn validate_user(user: &str) -> Result<()> {
    if !USER_RE.is_match(user) {
        return Err(invalid(format!(
            "Bad formatting of user name, expected [a-z_][a-z0-9_-]*[$]?: {}",
            user
        )));
    }
    Ok(())
}

/// The key file must exist on the machine running the generator
pub fn validate_key_path(path: &str) -> Result<()> {
    if path.is_empty() || !expand_home(path).exists() {
        return Err(invalid(format!("The private key file does not exist: {}", path)));
    }
    Ok(())
}

pub fn validate_device(device: &str) -> Result<()> {
    if !DEVICE_RE.is_match(device) {
        return Err(invalid(format!(
            "Bad formatting of device name, expected /dev/[a-z][a-z0-9]*: {}",
            device
        )));
    }
    Ok(())
}

/// Numeric size as typed at a prompt
pub fn validate_size(size: &str) -> Result<()> {
    if !SIZE_RE.is_match(size.trim()) || size.trim().parse::<i64>().is_err() {
        return Err(invalid(format!("Bad formatting of size, expected [0-9]+: {}", size)));
    }
    Ok(())
}

pub fn validate_hostname(hostname: &str) -> Result<()> {
    if !HOSTNAME_RE.is_match(hostname) {
        return Err(invalid(format!("Bad formatting of hostname: {}", hostname)));
    }
    Ok(())
}

/// Playbook names become a single directory component
pub fn validate_playbook_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid("The playbook name is empty"));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(invalid(format!(
            "The playbook name must be a plain directory name: {}",
            name
        )));
    }
    Ok(())
}

/// Expand a leading `~/` using `$HOME`
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(path),
    }
}
