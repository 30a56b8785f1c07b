use thiserror::Error;

/// Failure of a credential provider to produce a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("identity and secret are not configured")]
    MissingCredentials,
    #[error("handshake rejected: {0}")]
    Handshake(String),
    #[error("login rejected: {0}")]
    Login(String),
}

/// No usable token could be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("initial token acquisition failed: {0}")]
    InitialAcquisition(#[source] ProviderError),
    #[error("token refresh failed: {0}")]
    Refresh(#[source] ProviderError),
}

impl AuthError {
    pub fn provider_error(&self) -> &ProviderError {
        match self {
            AuthError::InitialAcquisition(err) | AuthError::Refresh(err) => err,
        }
    }
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("No initial token: no credential path available (set a manual token or identity and secret)")]
    NoCredentialPath,
    #[error("No initial token: provider rejected credentials ({0})")]
    CredentialsRejected(#[source] AuthError),
    #[error("could not build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl OrchestratorError {
    pub fn http_status(&self) -> u16 {
        500
    }
}

impl From<AuthError> for OrchestratorError {
    fn from(err: AuthError) -> Self {
        match err.provider_error() {
            ProviderError::MissingCredentials => OrchestratorError::NoCredentialPath,
            _ => OrchestratorError::CredentialsRejected(err),
        }
    }
}
