//! `profile show|update|addresses|add-address`.

use std::io::Write;

use tiffin_client::App;
use tiffin_core::{AddressDetails, Email, UserPatch};

use super::{CliError, check};
use crate::render;

pub async fn show(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.profile.fetch_profile().await;
    app.profile.fetch_addresses().await;
    let state = app.profile.snapshot().await;
    check(state.error.clone())?;
    if let Some(user) = &state.profile {
        render::profile(out, user)?;
    }
    render::addresses(out, &state.addresses)?;
    Ok(())
}

/// Build a profile change from the given flags.
pub fn user_patch(name: Option<String>, email: Option<&str>) -> Result<UserPatch, CliError> {
    if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(CliError::InvalidArgument("name cannot be empty".to_owned()));
    }
    let patch = UserPatch {
        name,
        email: email.map(Email::parse).transpose()?,
    };
    if patch.name.is_none() && patch.email.is_none() {
        return Err(CliError::InvalidArgument("nothing to change".to_owned()));
    }
    Ok(patch)
}

pub async fn update(app: &App, patch: &UserPatch, out: &mut impl Write) -> Result<(), CliError> {
    app.profile.update_profile(patch).await;
    let state = app.profile.snapshot().await;
    check(state.error.clone())?;
    if let Some(user) = &state.profile {
        render::profile(out, user)?;
    }
    Ok(())
}

pub async fn addresses(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.profile.fetch_addresses().await;
    let state = app.profile.snapshot().await;
    check(state.error.clone())?;
    render::addresses(out, &state.addresses)?;
    Ok(())
}

/// Check that every address line is filled in.
pub fn address_details(details: AddressDetails) -> Result<AddressDetails, CliError> {
    let lines = [
        ("street", &details.street),
        ("city", &details.city),
        ("state", &details.state),
        ("zip", &details.zip_code),
        ("country", &details.country),
    ];
    if let Some((field, _)) = lines.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(CliError::InvalidArgument(format!("{field} cannot be empty")));
    }
    Ok(details)
}

pub async fn add_address(
    app: &App,
    details: AddressDetails,
    out: &mut impl Write,
) -> Result<(), CliError> {
    app.profile.add_address(details).await;
    let state = app.profile.snapshot().await;
    check(state.error.clone())?;
    render::addresses(out, &state.addresses)?;
    Ok(())
}
