use std::sync::Arc;

use follower_core::{Credential, Token};
use scrape_logging::{scrape_info, scrape_warn};

use crate::{AuthError, CredentialProvider};

/// Holds the current token for one collection run and mediates refresh.
pub struct AuthSession {
    credential: Credential,
    provider: Arc<dyn CredentialProvider>,
    token: Token,
    manual: bool,
}

impl AuthSession {
    /// A non-empty manual token is used verbatim; otherwise the provider runs.
    pub async fn initialize(
        credential: Credential,
        provider: Arc<dyn CredentialProvider>,
    ) -> Result<Self, AuthError> {
        if let Some(token) = credential.manual_token.clone().filter(|t| !t.is_empty()) {
            scrape_info!("Using manually supplied token");
            return Ok(Self {
                credential,
                provider,
                token,
                manual: true,
            });
        }

        let token = provider
            .acquire_token(&credential)
            .await
            .map_err(AuthError::InitialAcquisition)?;
        Ok(Self {
            credential,
            provider,
            token,
            manual: false,
        })
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// True while the held token is the manual override.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Runs the provider end-to-end and replaces the held token.
    ///
    /// On failure the previous token is kept.
    pub async fn refresh(&mut self) -> Result<Token, AuthError> {
        scrape_info!("Refreshing access token");
        match self.provider.acquire_token(&self.credential).await {
            Ok(token) => {
                self.token = token.clone();
                self.manual = false;
                Ok(token)
            }
            Err(err) => {
                scrape_warn!("Token refresh failed: {}", err);
                Err(AuthError::Refresh(err))
            }
        }
    }
}
