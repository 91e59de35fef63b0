use anyhow::Context;

use crate::error::LedgerError;

/// Environment variable that supplies the admin password without a prompt
pub const ENV_ADMIN_PASSWORD_VAR: &str = "HOLDEM_LEDGER_ADMIN_PASSWORD";

/// Check for the admin password in the HOLDEM_LEDGER_ADMIN_PASSWORD environment variable.
/// Returns Some(password) if the env var is set and non-empty, None otherwise.
pub fn get_password_from_env() -> Option<String> {
    match std::env::var(ENV_ADMIN_PASSWORD_VAR) {
        Ok(val) if !val.trim().is_empty() => Some(val.trim().to_string()),
        _ => None,
    }
}

/// Compare a supplied password with the configured one. Surrounding
/// whitespace is ignored on both sides.
pub fn verify_password(supplied: &str, expected: &str) -> Result<(), LedgerError> {
    if supplied.trim() == expected.trim() {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized)
    }
}

/// Gate an admin action: read the password from the environment or a hidden
/// prompt and check it against `expected`.
pub fn require_admin(expected: &str) -> anyhow::Result<()> {
    let supplied = match get_password_from_env() {
        Some(pw) => pw,
        None => rpassword::prompt_password("Admin password: ")
            .context("Failed to read admin password")?,
    };
    verify_password(&supplied, expected)?;
    log::info!("Admin password accepted");
    Ok(())
}
