//! Command implementations.
//!
//! Each command drives one or more store actions and prints the resulting
//! snapshot. A store error becomes a [`CliError::Store`] so the process exits
//! non-zero.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod menu;
pub mod orders;
pub mod profile;
pub mod reviews;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tiffin_client::{App, GatewayError};
use tiffin_core::{
    Credentials, Email, EmailError, ParseStatusError, PriceError, RatingError, RegistrationError,
};

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The client could not be set up.
    #[error("Client error: {0}")]
    Gateway(#[from] GatewayError),

    /// A command that needs a user was run without credentials.
    #[error("Email and password are required (--email and --password, or TIFFIN_PASSWORD)")]
    MissingCredentials,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error(transparent)]
    Status(#[from] ParseStatusError),

    #[error("{0}")]
    InvalidArgument(String),

    /// A store action recorded an error.
    #[error("{0}")]
    Store(String),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turn a store's recorded error into a command failure.
pub fn check(error: Option<String>) -> Result<(), CliError> {
    error.map_or(Ok(()), |message| Err(CliError::Store(message)))
}

/// Credentials given on the command line or in the environment.
pub struct Identity {
    email: Option<String>,
    password: Option<SecretString>,
}

impl Identity {
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        Self {
            email,
            password: password.map(SecretString::from),
        }
    }

    /// The account email, validated.
    pub fn email(&self) -> Result<Email, CliError> {
        let raw = self.email.as_deref().ok_or(CliError::MissingCredentials)?;
        Ok(Email::parse(raw)?)
    }

    /// The password in plain text, for building a request payload.
    pub fn password(&self) -> Result<String, CliError> {
        self.password
            .as_ref()
            .map(|p| p.expose_secret().to_owned())
            .ok_or(CliError::MissingCredentials)
    }

    pub fn credentials(&self) -> Result<Credentials, CliError> {
        Ok(Credentials::new(self.email()?, self.password()?))
    }

    /// Sign in through the auth store so user-scoped stores have an identity.
    pub async fn sign_in(&self, app: &App) -> Result<(), CliError> {
        let credentials = self.credentials()?;
        app.auth.login(&credentials).await;
        check(app.auth.snapshot().await.error)
    }
}
