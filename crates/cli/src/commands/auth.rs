//! `login`, `register`, `logout`.

use std::io::Write;

use tiffin_client::App;
use tiffin_core::Registration;

use super::{CliError, Identity, check};

pub async fn login(app: &App, identity: &Identity, out: &mut impl Write) -> Result<(), CliError> {
    identity.sign_in(app).await?;
    if let Some(user) = app.auth.snapshot().await.user {
        writeln!(out, "Signed in as {} ({})", user.display_name(), user.role)?;
    }
    Ok(())
}

pub async fn register(
    app: &App,
    identity: &Identity,
    name: &str,
    confirm: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let registration = Registration {
        name: name.to_owned(),
        email: identity.email()?,
        password: identity.password()?,
        confirm_password: confirm.to_owned(),
    };
    registration.validate()?;

    app.auth.register(&registration).await;
    let state = app.auth.snapshot().await;
    check(state.error)?;
    if let Some(user) = state.user {
        writeln!(out, "Welcome, {}! Account {} created.", user.display_name(), user.id)?;
    }
    Ok(())
}

pub async fn logout(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.auth.logout().await;
    writeln!(out, "Signed out")?;
    Ok(())
}
