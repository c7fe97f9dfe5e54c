use std::fmt::Display;

use tracing::{debug, warn};
use url::Url;

use crate::encode::encode;
use crate::params::{normalize, ParameterBag};
use crate::response::{interpret, Payload};
use crate::signer::{build_auth_header, sign};
use crate::transport::{unix_timestamp, NonceSource, Transport};
use crate::{CallerError, Credentials, Error, Result, OAUTH_KEY_PREFIX, OAUTH_SIGNATURE_KEY};

/// All signed requests are `GET`.
const METHOD: &str = "GET";

/// A request to be signed with the consumer secret and, optionally, a
/// token secret.
///
/// Call-specific parameters are merged with the standard `oauth_*` set at
/// signing time. Parameters whose name does not contain `oauth_` are
/// signed and also sent as the query string; the others travel in the
/// `Authorization` header only.
#[derive(Debug, Clone)]
pub struct OAuthRequest<'a> {
    credentials: &'a Credentials,
    url: Url,
    params: ParameterBag,
    token_secret: Option<&'a str>,
}

/// Outcome of signing: where to send the request and the header to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Base URL plus the parameters left out of the header, as query string.
    pub url: Url,
    /// `Authorization` header value.
    pub authorization: String,
}

impl<'a> OAuthRequest<'a> {
    pub fn new(credentials: &'a Credentials, url: Url) -> Self {
        OAuthRequest {
            credentials,
            url,
            params: ParameterBag::new(),
            token_secret: None,
        }
    }

    /// Add a call-specific parameter.
    pub fn parameter<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Display,
    {
        self.params.insert(key, value);
        self
    }

    /// Replace the call-specific parameters.
    pub fn parameters(self, params: ParameterBag) -> Self {
        OAuthRequest { params, ..self }
    }

    pub fn token_secret(self, token_secret: &'a str) -> Self {
        OAuthRequest {
            token_secret: Some(token_secret),
            ..self
        }
    }

    /// Sign the request with the given nonce and timestamp.
    ///
    /// # Errors
    ///
    /// Fails when the URL carries a query string or fragment, or when a
    /// call-specific parameter collides with a standard `oauth_*` one.
    pub fn authorize(&self, nonce: &str, timestamp: u64) -> Result<SignedRequest> {
        if self.url.query().is_some() || self.url.fragment().is_some() {
            return Err(CallerError::QueryInUrl(self.url.to_string()).into());
        }

        let mut params = self.credentials.base_params(nonce, timestamp);
        params.merge(self.params.clone())?;

        let mut normalized = normalize(&params);
        let signature = sign(
            self.url.as_str(),
            METHOD,
            &normalized,
            self.credentials.consumer_secret(),
            self.token_secret,
        )?;
        normalized.push((OAUTH_SIGNATURE_KEY.to_string(), encode(&signature)));

        Ok(SignedRequest {
            url: self.dispatch_url(),
            authorization: build_auth_header(&normalized),
        })
    }

    fn dispatch_url(&self) -> Url {
        let mut url = self.url.clone();
        let mut query: Vec<(&String, &String)> = self
            .params
            .iter()
            .filter(|(k, _)| !k.contains(OAUTH_KEY_PREFIX))
            .collect();
        if !query.is_empty() {
            query.sort();
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Sign the request, send it and interpret the response.
    ///
    /// # Errors
    ///
    /// See [`Error`]: caller errors are raised before anything is sent,
    /// transport errors are passed through, the body may fail to parse or
    /// carry a vendor error.
    pub async fn send<T, N>(self, transport: &T, nonce_source: &N) -> Result<Payload>
    where
        T: Transport + ?Sized,
        N: NonceSource + ?Sized,
    {
        let nonce = nonce_source.nonce();
        let signed = self.authorize(&nonce, unix_timestamp())?;

        debug!(url = %signed.url, nonce = %nonce, "sending signed request");
        let response = transport
            .get(signed.url.clone(), signed.authorization)
            .await?;
        debug!(
            url = %signed.url,
            status = %response.status,
            bytes = response.body.len(),
            "received response"
        );

        interpret(response.content_type(), &response.body).map_err(|err| {
            match &err {
                Error::Api { code, message } => {
                    warn!(url = %signed.url, code = %code, message = %message, "vendor error")
                }
                other => warn!(url = %signed.url, error = %other, "unreadable response"),
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("consumer", "secret")
    }

    fn endpoint(path: &str) -> Url {
        Url::parse("https://account.aliyun.com/")
            .unwrap()
            .join(path)
            .unwrap()
    }

    #[test]
    fn authorize_request_token() {
        let credentials = credentials();
        let signed = OAuthRequest::new(&credentials, endpoint("oauth/request_token"))
            .parameter("oauth_callback", encode("http://localhost/cb"))
            .authorize("nonce-1", 1_700_000_000)
            .unwrap();

        assert_eq!(
            signed.url.as_str(),
            "https://account.aliyun.com/oauth/request_token"
        );
        assert_eq!(
            signed.authorization,
            "OAuth oauth_callback=\"http%253A%252F%252Flocalhost%252Fcb\", \
             oauth_consumer_key=\"consumer\", oauth_nonce=\"nonce-1\", \
             oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000\", \
             oauth_version=\"1.0\", oauth_signature=\"9FERxjO2HYSwbIg166M8r65Y%2B80%3D\""
        );
    }

    #[test]
    fn authorize_with_token_secret() {
        let credentials = credentials();
        let signed = OAuthRequest::new(&credentials, endpoint("oauth/access_token"))
            .parameter("oauth_token", "tok")
            .parameter("oauth_verifier", "ver")
            .token_secret("tsecret")
            .authorize("nonce-2", 1_700_000_001)
            .unwrap();

        assert_eq!(
            signed.authorization,
            "OAuth oauth_consumer_key=\"consumer\", oauth_nonce=\"nonce-2\", \
             oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000001\", \
             oauth_token=\"tok\", oauth_verifier=\"ver\", oauth_version=\"1.0\", \
             oauth_signature=\"OJQqBXHeuBV41fsq22kubTVIegw%3D\""
        );
    }

    #[test]
    fn authorize_is_deterministic() {
        let credentials = credentials();
        let request = OAuthRequest::new(&credentials, endpoint("openapi/id/load"))
            .parameter("oauth_token", "tok")
            .token_secret("tsecret");
        assert_eq!(
            request.authorize("n", 1).unwrap(),
            request.authorize("n", 1).unwrap()
        );
        assert_ne!(
            request.authorize("n", 1).unwrap(),
            request.authorize("m", 1).unwrap()
        );
    }

    #[test]
    fn non_oauth_parameters_go_to_query() {
        let credentials = credentials();
        let signed = OAuthRequest::new(&credentials, endpoint("openapi/id/check"))
            .parameter("oauth_token", "tok")
            .parameter("b", "2 3")
            .parameter("a", 1)
            .authorize("n", 1)
            .unwrap();
        assert_eq!(
            signed.url.as_str(),
            "https://account.aliyun.com/openapi/id/check?a=1&b=2+3"
        );
        assert!(!signed.authorization.contains("a=\""));
        assert!(signed.authorization.contains("oauth_token=\"tok\""));
    }

    #[test]
    fn embedded_oauth_key_is_sent_once() {
        let credentials = credentials();
        let signed = OAuthRequest::new(&credentials, endpoint("openapi/id/check"))
            .parameter("oauth_token", "tok")
            .parameter("x_oauth_flag", 1)
            .parameter("plain", "p")
            .authorize("n", 1)
            .unwrap();

        let in_query = signed.url.query_pairs().any(|(k, _)| k == "x_oauth_flag");
        let in_header = signed.authorization.contains("x_oauth_flag=\"1\"");
        assert!(in_header);
        assert!(!in_query);
        assert_eq!(
            signed.url.as_str(),
            "https://account.aliyun.com/openapi/id/check?plain=p"
        );
    }

    #[test]
    fn query_in_url_is_rejected() {
        let credentials = credentials();
        let url = Url::parse("https://account.aliyun.com/openapi/id/load?x=1").unwrap();
        let err = OAuthRequest::new(&credentials, url)
            .authorize("n", 1)
            .unwrap_err();
        assert!(matches!(err, Error::Caller(CallerError::QueryInUrl(_))));
    }

    #[test]
    fn colliding_parameter_is_rejected() {
        let credentials = credentials();
        let err = OAuthRequest::new(&credentials, endpoint("openapi/util/timestamp"))
            .parameter("oauth_nonce", "mine")
            .authorize("n", 1)
            .unwrap_err();
        match err {
            Error::Caller(CallerError::DuplicateParameter(key)) => assert_eq!(key, "oauth_nonce"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
