use std::env;

use serde_json::Value;

use crate::error::{AdaptiveError, Result};

/// PayPal API caller credential (the classic three-token credential).
///
/// The `Debug` implementation redacts `password` and `signature` to
/// prevent accidental leakage in logs.
#[derive(Clone)]
pub struct Credential {
    pub user_id: String,
    pub password: String,
    pub signature: String,
}

impl Credential {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
            signature: signature.into(),
        }
    }

    /// All three fields must be present for any call to authenticate.
    pub(crate) fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("userId", &self.user_id),
            ("password", &self.password),
            ("signature", &self.signature),
        ] {
            if value.is_empty() {
                return Err(AdaptiveError::Config(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("password", &"****")
            .field("signature", &"****")
            .finish()
    }
}

/// A delegated (token, token secret) pair authorizing a call on a third
/// party's behalf.
///
/// The pair is consumed once per call to compute the authorization header
/// and never appears in the outgoing request body.
#[derive(Clone)]
pub struct TokenCredential {
    pub token: String,
    pub token_secret: String,
}

impl TokenCredential {
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }

    /// Removes the `token`/`tokenSecret` fields from a payload, returning
    /// the pair when both were present as strings. A payload carrying
    /// only one of the two is left untouched.
    pub(crate) fn take_from(payload: &mut Value) -> Option<Self> {
        let map = payload.as_object_mut()?;
        let token = map.get("token")?.as_str()?.to_owned();
        let token_secret = map.get("tokenSecret")?.as_str()?.to_owned();
        map.remove("token");
        map.remove("tokenSecret");
        Some(Self {
            token,
            token_secret,
        })
    }
}

impl std::fmt::Debug for TokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCredential")
            .field("token", &self.token)
            .field("token_secret", &"****")
            .finish()
    }
}

/// Resolves a [`Credential`] from a specific source.
pub trait CredentialProvider {
    /// Attempt to resolve a credential from this provider.
    fn resolve(&self) -> Result<Credential>;
}

/// Provides a credential from explicitly specified values.
pub struct StaticProvider {
    credential: Credential,
}

impl StaticProvider {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            credential: Credential::new(user_id, password, signature),
        }
    }
}

impl CredentialProvider for StaticProvider {
    fn resolve(&self) -> Result<Credential> {
        Ok(self.credential.clone())
    }
}

/// Provides a credential from environment variables.
///
/// Reads `PAYPAL_USER_ID`, `PAYPAL_PASSWORD` and `PAYPAL_SIGNATURE`.
pub struct EnvProvider;

impl CredentialProvider for EnvProvider {
    fn resolve(&self) -> Result<Credential> {
        let user_id = env::var("PAYPAL_USER_ID")
            .map_err(|_| AdaptiveError::Config("PAYPAL_USER_ID not set".into()))?;
        let password = env::var("PAYPAL_PASSWORD")
            .map_err(|_| AdaptiveError::Config("PAYPAL_PASSWORD not set".into()))?;
        let signature = env::var("PAYPAL_SIGNATURE")
            .map_err(|_| AdaptiveError::Config("PAYPAL_SIGNATURE not set".into()))?;

        let credential = Credential {
            user_id,
            password,
            signature,
        };
        credential.validate()?;
        Ok(credential)
    }
}
