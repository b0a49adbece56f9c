//! Authentication and account management
//!
//! Registration is a two-step flow: `register` creates the account and sends
//! a one-time passcode to the user's email; `verify_otp` exchanges the code
//! for a session. The session's bearer token is then attached to every
//! authenticated request by the shared context.

mod session;
mod types;

pub use session::{Session, SessionStore};
pub use types::*;

use std::collections::HashMap;

use crate::context::Context;
use crate::error::Error;
use crate::response::{unwrap_object, ApiEnvelope};

/// Client for the auth endpoints
pub struct Auth {
    ctx: Context,
}

impl Auth {
    pub(crate) fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Register a new account; the backend mails an OTP for verification
    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthUser, Error> {
        let envelope = self
            .ctx
            .post("/auth/register")
            .json(&payload)?
            .execute_api()
            .await?;
        unwrap_object(&envelope, "user")
    }

    /// Exchange the emailed OTP for a session and store it
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Session, Error> {
        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("otp".to_string(), otp.to_string());

        let envelope = self
            .ctx
            .post("/auth/verify-otp")
            .json(&body)?
            .execute_api()
            .await?;
        let session: Session = unwrap_object(&envelope, "session")?;
        self.ctx.session.set(session.clone());
        Ok(session)
    }

    /// Ask the backend to send a fresh OTP
    pub async fn resend_otp(&self, email: &str) -> Result<(), Error> {
        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());

        self.ctx
            .post("/auth/resend-otp")
            .json(&body)?
            .execute_api()
            .await?;
        Ok(())
    }

    /// Sign in with email and password, storing the returned session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());

        let envelope = self
            .ctx
            .post("/auth/login")
            .json(&body)?
            .execute_api()
            .await?;
        let session: Session = unwrap_object(&envelope, "session")?;
        self.ctx.session.set(session.clone());
        Ok(session)
    }

    /// Start the password-reset flow for an email address
    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());

        self.ctx
            .post("/auth/forgot-password")
            .json(&body)?
            .execute_api()
            .await?;
        Ok(())
    }

    /// Update profile fields or the password of a user
    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<AuthUser, Error> {
        let envelope: ApiEnvelope = self
            .ctx
            .put(&format!("/users/{}", id))
            .json(&update)?
            .execute_api()
            .await?;
        unwrap_object(&envelope, "user")
    }

    /// Drop the stored session
    pub fn sign_out(&self) {
        self.ctx.session.clear();
    }

    /// The current session, if signed in
    pub fn session(&self) -> Option<Session> {
        self.ctx.session.get()
    }
}
