use follower_core::{Credential, Token};
use reqwest::StatusCode;
use scrape_logging::{scrape_debug, scrape_info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ProviderError, ServiceEndpoints};

/// Produces a fresh bearer token from stored secrets.
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire_token(&self, credential: &Credential) -> Result<Token, ProviderError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HandshakeRequest {
    subject: String,
    checkbox_captcha: bool,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    subject: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    access_token: Option<String>,
}

/// Two-phase login: an anonymous handshake yields a public token, which then
/// authorizes the credentialed login request.
///
/// Every call redoes both phases; nothing from a previous session is reused.
#[derive(Debug, Clone)]
pub struct HandshakeLoginProvider {
    client: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl HandshakeLoginProvider {
    pub fn new(client: reqwest::Client, endpoints: ServiceEndpoints) -> Self {
        Self { client, endpoints }
    }

    async fn handshake(&self) -> Result<Token, ProviderError> {
        let body = HandshakeRequest {
            subject: Uuid::new_v4().to_string(),
            checkbox_captcha: false,
        };
        let response = self
            .client
            .post(&self.endpoints.handshake_url)
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Handshake(err.to_string()))?;

        read_access_token(response)
            .await
            .map_err(ProviderError::Handshake)
    }

    async fn login(
        &self,
        public_token: &Token,
        identity: &str,
        secret: &str,
    ) -> Result<Token, ProviderError> {
        let body = LoginRequest {
            email: identity,
            password: secret,
            subject: Uuid::new_v4().to_string(),
        };
        let response = self
            .client
            .post(&self.endpoints.login_url)
            .bearer_auth(public_token.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Login(err.to_string()))?;

        read_access_token(response).await.map_err(ProviderError::Login)
    }
}

#[async_trait::async_trait]
impl CredentialProvider for HandshakeLoginProvider {
    async fn acquire_token(&self, credential: &Credential) -> Result<Token, ProviderError> {
        let (identity, secret) = credential
            .login_pair()
            .ok_or(ProviderError::MissingCredentials)?;

        scrape_debug!("Requesting handshake token");
        let public_token = self.handshake().await?;
        scrape_debug!("Handshake ok, logging in");
        let token = self.login(&public_token, identity, secret).await?;
        scrape_info!("Obtained a fresh access token");
        Ok(token)
    }
}

async fn read_access_token(response: reqwest::Response) -> Result<Token, String> {
    let status = response.status();
    if !status.is_success() {
        return Err(describe_status(status));
    }
    let payload: AccessTokenResponse = response
        .json()
        .await
        .map_err(|err| format!("undecodable response: {err}"))?;

    match payload.access_token {
        Some(token) if !token.is_empty() => Ok(Token::new(token)),
        _ => Err("response carried no access token".to_string()),
    }
}

fn describe_status(status: StatusCode) -> String {
    format!("http status {}", status.as_u16())
}
