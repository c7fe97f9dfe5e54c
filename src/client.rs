use reqwest::Client as ReqwestClient;
use url::Url;

use crate::encode::encode;
use crate::params::ParameterBag;
use crate::request::OAuthRequest;
use crate::response::{Payload, TokenResponse};
use crate::transport::{NonceSource, Transport, UuidNonce};
use crate::{
    CallerError, ConfigError, Credentials, Result, OAUTH_CALLBACK_KEY, OAUTH_TOKEN_KEY,
    OAUTH_VERIFIER_KEY,
};

/// Default service prefix.
pub const DEFAULT_PREFIX: &str = "https://account.aliyun.com/";

pub(crate) const PREFIX_ENV: &str = "ALIYUN_OAUTH_PREFIX";

const REQUEST_TOKEN_PATH: &str = "oauth/request_token";
const ACCESS_TOKEN_PATH: &str = "oauth/access_token";
const AUTHORIZE_PATH: &str = "oauth/authorize";
const LOAD_PATH: &str = "openapi/id/load";
const KEY_PAIR_PATH: &str = "openapi/id/aliyunid_kp";
const TIMESTAMP_PATH: &str = "openapi/util/timestamp";
const CHECK_PATH: &str = "openapi/id/check";

const ACCESS_KEY_ID_KEY: &str = "access_key_id";

/// OAuth 1.0a client for the account service.
///
/// Holds only immutable state, so one instance can serve concurrent calls.
/// The client does not track which phase of the authorization dance a
/// caller is in; obtaining a verified token before calling the
/// authenticated endpoints is up to the caller.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestClient, N = UuidNonce> {
    credentials: Credentials,
    prefix: Url,
    transport: T,
    nonce_source: N,
}

impl Client<ReqwestClient, UuidNonce> {
    /// Constructs a new `Client`.
    ///
    /// This method calls reqwest::Client::new() internally.
    pub fn new(credentials: Credentials) -> Self {
        Client::new_with_client(credentials, ReqwestClient::new())
    }

    /// Constructs a `Client` from the environment.
    ///
    /// Reads the credentials (see [`Credentials::from_env`]) and the optional
    /// `ALIYUN_OAUTH_PREFIX` override.
    pub fn from_env() -> Result<Self> {
        let client = Client::new(Credentials::from_env()?);
        match std::env::var(PREFIX_ENV) {
            Ok(prefix) => client.with_prefix(&prefix),
            Err(std::env::VarError::NotPresent) => Ok(client),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(ConfigError::NotUnicode(PREFIX_ENV).into())
            }
        }
    }
}

impl<T> Client<T, UuidNonce> {
    /// Constructs a new `Client` with specifying the transport, usually a
    /// preconfigured `reqwest::Client`.
    pub fn new_with_client(credentials: Credentials, transport: T) -> Self {
        Client {
            credentials,
            prefix: default_prefix(),
            transport,
            nonce_source: UuidNonce,
        }
    }
}

fn default_prefix() -> Url {
    Url::parse(DEFAULT_PREFIX).unwrap_or_else(|_| unreachable!("default prefix is a valid url"))
}

impl<T, N> Client<T, N> {
    /// Replace the service prefix, e.g. to target a staging host.
    ///
    /// A trailing `/` is added when missing so endpoint paths are appended
    /// rather than substituted.
    pub fn with_prefix(self, prefix: &str) -> Result<Self> {
        let normalized = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };
        let prefix = Url::parse(&normalized)
            .map_err(|e| CallerError::InvalidUrl(prefix.to_string(), e))?;
        Ok(Client { prefix, ..self })
    }

    /// Replace the nonce generator.
    pub fn nonce_source<M>(self, nonce_source: M) -> Client<T, M> {
        Client {
            credentials: self.credentials,
            prefix: self.prefix,
            transport: self.transport,
            nonce_source,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// URL the user must visit to approve `token`.
    ///
    /// Pure string construction; no request is sent.
    pub fn get_authorize_url(&self, token: &str) -> String {
        format!(
            "{}{}?{}={}",
            self.prefix.as_str(),
            AUTHORIZE_PATH,
            OAUTH_TOKEN_KEY,
            token
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.prefix
            .join(path)
            .map_err(|e| CallerError::InvalidUrl(path.to_string(), e).into())
    }
}

impl<T, N> Client<T, N>
where
    T: Transport,
    N: NonceSource,
{
    /// Sign and send a `GET` to `path` (relative to the prefix) carrying
    /// `extra` on top of the standard parameters.
    pub async fn execute(
        &self,
        path: &str,
        extra: ParameterBag,
        token_secret: Option<&str>,
    ) -> Result<Payload> {
        let url = self.endpoint(path)?;
        let mut request = OAuthRequest::new(&self.credentials, url).parameters(extra);
        if let Some(secret) = token_secret {
            request = request.token_secret(secret);
        }
        request.send(&self.transport, &self.nonce_source).await
    }

    /// Step 1: obtain a request token and its secret.
    ///
    /// `callback_url` is where the service redirects after approval, or
    /// `oob`.
    ///
    /// The reply is narrowed to a [`TokenResponse`]: a successful reply that
    /// lacks `oauth_token` or `oauth_token_secret` fails with
    /// [`ParseError::TokenKeyNotFound`](crate::ParseError::TokenKeyNotFound).
    /// Use [`Client::execute`] to get the raw [`Payload`] instead.
    pub async fn request_token(&self, callback_url: &str) -> Result<TokenResponse> {
        // the service expects the callback encoded once more than the others
        let extra = ParameterBag::new().with(OAUTH_CALLBACK_KEY, encode(callback_url));
        let payload = self.execute(REQUEST_TOKEN_PATH, extra, None).await?;
        Ok(TokenResponse::try_from(payload)?)
    }

    /// Step 3: exchange the approved request token and its verifier for an
    /// access token.
    ///
    /// Narrowed to a [`TokenResponse`] like [`Client::request_token`].
    pub async fn get_access_token(
        &self,
        token: &str,
        verifier: &str,
        token_secret: &str,
    ) -> Result<TokenResponse> {
        require(OAUTH_VERIFIER_KEY, verifier)?;
        let extra = token_params(token, token_secret)?.with(OAUTH_VERIFIER_KEY, verifier);
        let payload = self
            .execute(ACCESS_TOKEN_PATH, extra, Some(token_secret))
            .await?;
        Ok(TokenResponse::try_from(payload)?)
    }

    /// Profile of the user behind the access token.
    pub async fn load(&self, token: &str, token_secret: &str) -> Result<Payload> {
        self.execute(LOAD_PATH, token_params(token, token_secret)?, Some(token_secret))
            .await
    }

    /// Access key pair bound to the user behind the access token.
    pub async fn get_key_pair(&self, token: &str, token_secret: &str) -> Result<Payload> {
        self.execute(
            KEY_PAIR_PATH,
            token_params(token, token_secret)?,
            Some(token_secret),
        )
        .await
    }

    /// Server time, useful to detect clock skew before signing.
    pub async fn get_timestamp(&self, token_secret: Option<&str>) -> Result<Payload> {
        self.execute(TIMESTAMP_PATH, ParameterBag::new(), token_secret)
            .await
    }

    /// Verify the access token is still valid.
    pub async fn check(&self, token: &str, token_secret: &str) -> Result<Payload> {
        self.execute(CHECK_PATH, token_params(token, token_secret)?, Some(token_secret))
            .await
    }

    /// Verify the access token is still valid and bound to `access_key_id`.
    pub async fn check_access_token_key_pair(
        &self,
        token: &str,
        token_secret: &str,
        access_key_id: &str,
    ) -> Result<Payload> {
        require(ACCESS_KEY_ID_KEY, access_key_id)?;
        let extra = token_params(token, token_secret)?.with(ACCESS_KEY_ID_KEY, access_key_id);
        self.execute(CHECK_PATH, extra, Some(token_secret)).await
    }
}

fn require(name: &'static str, value: &str) -> std::result::Result<(), CallerError> {
    if value.is_empty() {
        Err(CallerError::MissingParameter(name))
    } else {
        Ok(())
    }
}

fn token_params(token: &str, token_secret: &str) -> std::result::Result<ParameterBag, CallerError> {
    require(OAUTH_TOKEN_KEY, token)?;
    require("oauth_token_secret", token_secret)?;
    Ok(ParameterBag::new().with(OAUTH_TOKEN_KEY, token))
}
