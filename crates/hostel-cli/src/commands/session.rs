//! Login and logout

use anyhow::{Context, Result};

use hostel_core::{Role, Store};

use crate::output::Output;

/// Log in as an owner or student
pub fn login(
    store: &mut Store,
    role: Role,
    username: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let result = store
        .login(role, &username, password.as_deref().unwrap_or_default())
        .context("Failed to log in")?;
    output.print_result(&result, &format!("Logged in as {} {}", role, username))
}

/// Log out
pub fn logout(store: &mut Store, output: &Output) -> Result<()> {
    store.logout().context("Failed to log out")?;
    output.success("Logged out");
    Ok(())
}

/// Show the current session
pub fn whoami(store: &Store, output: &Output) -> Result<()> {
    let session = store.current_user()?;
    output.print_session(session.as_ref());
    Ok(())
}
