//! User management commands.

use lotus_core::UserRole;

use lotus_api::services::AuthService;

use super::{CommandError, connect};

/// Create a user with an explicit role.
///
/// If no password was passed on the command line, one is read from stdin.
///
/// # Errors
///
/// Returns `CommandError::Invalid` for a bad role, email, or password.
pub async fn create(
    email: &str,
    name: &str,
    password: Option<&str>,
    role: &str,
) -> Result<(), CommandError> {
    let role = role
        .parse::<UserRole>()
        .map_err(CommandError::Invalid)?;

    let password = match password {
        Some(p) => p.to_string(),
        None => prompt_password()?,
    };

    let pool = connect().await?;
    let auth = AuthService::new(&pool);

    let user = auth
        .create_user(name, email, &password, "", role)
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "user created");
    Ok(())
}

/// Read a password from stdin.
fn prompt_password() -> Result<String, CommandError> {
    #[allow(clippy::print_stderr)]
    {
        eprint!("Password: ");
    }

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| CommandError::Invalid(format!("failed to read password: {e}")))?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
