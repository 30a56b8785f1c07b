use std::fmt;

/// Opaque bearer credential presented on every page request.
///
/// Replaced wholesale on refresh, never mutated in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} bytes>)", self.0.len())
    }
}

/// Login material supplied at startup.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub identity: Option<String>,
    pub secret: Option<String>,
    pub manual_token: Option<Token>,
}

impl Credential {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: Some(identity.into()),
            secret: Some(secret.into()),
            manual_token: None,
        }
    }

    pub fn with_manual_token(mut self, token: impl Into<String>) -> Self {
        self.manual_token = Some(Token::new(token));
        self
    }

    /// Identity and secret, when both are present and non-empty.
    pub fn login_pair(&self) -> Option<(&str, &str)> {
        match (self.identity.as_deref(), self.secret.as_deref()) {
            (Some(identity), Some(secret)) if !identity.is_empty() && !secret.is_empty() => {
                Some((identity, secret))
            }
            _ => None,
        }
    }

    pub fn can_login(&self) -> bool {
        self.login_pair().is_some()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identity", &self.identity)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("manual_token", &self.manual_token)
            .finish()
    }
}
