//! User prompt utilities using dialoguer

use crate::utils::error::{ArchbookError, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

/// Prompt for text input
pub fn prompt_input(prompt: &str, default: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::with_theme(&theme).with_prompt(prompt);

    if let Some(d) = default {
        input = input.default(d.to_string());
    }

    input
        .interact_text()
        .map_err(|_| ArchbookError::UserCancelled)
}

/// Prompt for text input, asking again until `validate` accepts it
pub fn prompt_validated<F>(prompt: &str, default: Option<&str>, validate: F) -> Result<String>
where
    F: Fn(&str) -> Result<()>,
{
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .validate_with(|value: &String| -> std::result::Result<(), String> {
            validate(value.as_str()).map_err(|e| e.to_string())
        });

    if let Some(d) = default {
        input = input.default(d.to_string());
    }

    input
        .interact_text()
        .map_err(|_| ArchbookError::UserCancelled)
}

/// Prompt for password (hidden input)
pub fn prompt_password(prompt: &str, confirm: bool) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut password = Password::with_theme(&theme).with_prompt(prompt);

    if confirm {
        password = password.with_confirmation("Confirm password", "Passwords do not match");
    }

    password
        .interact()
        .map_err(|_| ArchbookError::UserCancelled)
}

/// Prompt for yes/no confirmation
pub fn prompt_confirm(prompt: &str, default: bool) -> Result<bool> {
    let theme = ColorfulTheme::default();
    Confirm::with_theme(&theme)
        .with_prompt(prompt)
        .default(default)
        .interact_opt()
        .map_err(|e| ArchbookError::Io(std::io::Error::other(e.to_string())))?
        .ok_or(ArchbookError::UserCancelled)
}

/// Prompt for selection from a list
pub fn prompt_select<T: ToString>(prompt: &str, items: &[T], default: usize) -> Result<usize> {
    let theme = ColorfulTheme::default();
    Select::with_theme(&theme)
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()
        .map_err(|e| ArchbookError::Io(std::io::Error::other(e.to_string())))?
        .ok_or(ArchbookError::UserCancelled)
}

/// Display a warning and ask for confirmation
pub fn warn_confirm(warning: &str) -> Result<bool> {
    println!("\n⚠️  WARNING: {}\n", warning);
    prompt_confirm("Continue?", false)
}

/// Print a section banner
pub fn print_title(title: &str) {
    let rule = "=".repeat(43);
    println!("{}", style(&rule).dim());
    println!("{}", style(title).bold());
    println!("{}", style(&rule).dim());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}
