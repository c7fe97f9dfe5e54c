use std::fmt;

use crate::params::ParameterBag;
use crate::{
    ConfigError, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_VERSION_KEY,
};

pub(crate) const CONSUMER_KEY_ENV: &str = "ALIYUN_OAUTH_CONSUMER_KEY";
pub(crate) const CONSUMER_SECRET_ENV: &str = "ALIYUN_OAUTH_CONSUMER_SECRET";

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";

/// Consumer key and secret identifying the calling application.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
}

impl Credentials {
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        Credentials {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Load credentials from the environment.
    ///
    /// Required environment variables:
    /// - `ALIYUN_OAUTH_CONSUMER_KEY`
    /// - `ALIYUN_OAUTH_CONSUMER_SECRET`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let consumer_key =
            lookup(CONSUMER_KEY_ENV).ok_or(ConfigError::MissingVariable(CONSUMER_KEY_ENV))?;
        let consumer_secret = lookup(CONSUMER_SECRET_ENV)
            .ok_or(ConfigError::MissingVariable(CONSUMER_SECRET_ENV))?;
        Ok(Credentials::new(consumer_key, consumer_secret))
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// The five parameters every signed request carries.
    pub fn base_params(&self, nonce: &str, timestamp: u64) -> ParameterBag {
        ParameterBag::new()
            .with(OAUTH_CONSUMER_KEY, &self.consumer_key)
            .with(OAUTH_NONCE_KEY, nonce)
            .with(OAUTH_TIMESTAMP_KEY, timestamp)
            .with(OAUTH_SIGNATURE_METHOD_KEY, SIGNATURE_METHOD)
            .with(OAUTH_VERSION_KEY, VERSION)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}
