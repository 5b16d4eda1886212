//! Implements AuthPort using the grammers Client.
//!
//! Holds a client clone (same session as the gateway). The login and 2FA
//! tokens grammers hands out between steps live in one guarded slot, so an
//! out-of-order call fails loudly instead of panicking.

use crate::domain::{DomainError, SignInResult};
use crate::ports::AuthPort;
use async_trait::async_trait;
use grammers_client::client::{LoginToken, PasswordToken};
use grammers_client::Client;
use tokio::sync::Mutex;

/// In-flight state of the login conversation.
#[derive(Default)]
enum FlowState {
    #[default]
    Idle,
    /// request_login_code succeeded; waiting for sign_in.
    CodeSent(LoginToken),
    /// sign_in hit 2FA; waiting for check_password.
    PasswordPending(PasswordToken),
}

/// Auth adapter. Wraps the grammers Client for login/2FA.
pub struct GrammersAuthAdapter {
    client: Client,
    state: Mutex<FlowState>,
}

impl GrammersAuthAdapter {
    /// Create adapter with a client clone (shares the gateway's session).
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Mutex::new(FlowState::Idle),
        }
    }
}

#[async_trait]
impl AuthPort for GrammersAuthAdapter {
    async fn is_authenticated(&self) -> Result<bool, DomainError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))
    }

    async fn request_login_code(&self, phone: &str, api_hash: &str) -> Result<(), DomainError> {
        let token = self
            .client
            .request_login_code(phone, api_hash)
            .await
            .map_err(|e| DomainError::Auth(format!("request_login_code: {}", e)))?;
        *self.state.lock().await = FlowState::CodeSent(token);
        Ok(())
    }

    async fn sign_in(&self, code: &str) -> Result<SignInResult, DomainError> {
        let FlowState::CodeSent(token) = std::mem::take(&mut *self.state.lock().await) else {
            return Err(DomainError::Auth(
                "request_login_code must be called before sign_in".into(),
            ));
        };
        match self.client.sign_in(&token, code).await {
            Ok(_user) => Ok(SignInResult::Success),
            Err(grammers_client::SignInError::PasswordRequired(pt)) => {
                let hint = pt.hint().map(String::from);
                *self.state.lock().await = FlowState::PasswordPending(pt);
                Ok(SignInResult::PasswordRequired { hint })
            }
            Err(grammers_client::SignInError::InvalidCode) => Err(DomainError::Auth(
                "Invalid login code. Run again and enter the correct code.".into(),
            )),
            Err(grammers_client::SignInError::SignUpRequired) => Err(DomainError::Auth(
                "Sign-up required. Create an account with the official Telegram app first.".into(),
            )),
            Err(e) => Err(DomainError::Auth(format!("sign in: {}", e))),
        }
    }

    async fn check_password(&self, password: &[u8]) -> Result<(), DomainError> {
        let FlowState::PasswordPending(pt) = std::mem::take(&mut *self.state.lock().await) else {
            return Err(DomainError::Auth(
                "sign_in must return PasswordRequired before check_password".into(),
            ));
        };
        self.client
            .check_password(pt, password)
            .await
            .map_err(|e| DomainError::Auth(format!("check_password: {}", e)))?;
        Ok(())
    }
}
