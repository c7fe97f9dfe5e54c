/*!
aliyun-oauth1: OAuth 1.0a (HMAC-SHA1) client for the Aliyun account service.

# Overview

This library signs `GET` requests with OAuth 1.0a and exposes the account
service endpoints on top of them: request-token issuance, access-token
exchange, and the authenticated profile and utility calls.

The signing pieces are usable on their own:

- [`encode`]: RFC 3986 percent-encoding as OAuth requires it.
- [`normalize`]: sort and encode a parameter set.
- [`sign`]: HMAC-SHA1 over the signature base string.
- [`build_auth_header`]: render the `Authorization: OAuth ...` value.

HTTP goes through the [`Transport`] trait, implemented for
`reqwest::Client`. Token persistence is left to the caller.

# How to use

## Acquiring an access token

```rust,no_run
use aliyun_oauth1::{Client, Credentials};

# async fn run() -> aliyun_oauth1::Result<()> {
let client = Client::new(Credentials::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]"));

// step 1: acquire request token & token secret
let request_token = client.request_token("https://example.com/callback").await?;

// step 2: send the user to the authorize page, the verifier comes back on the callback
println!(
    "please access to: {}",
    client.get_authorize_url(&request_token.oauth_token)
);
let verifier = "[VERIFIER]";

// step 3: acquire access token
let access = client
    .get_access_token(
        &request_token.oauth_token,
        verifier,
        &request_token.oauth_token_secret,
    )
    .await?;

// authenticated calls
let profile = client
    .load(&access.oauth_token, &access.oauth_token_secret)
    .await?;
println!("{:?}", profile.get("uid"));
# Ok(())
# }
```

## Signing by hand

```rust
use aliyun_oauth1::{build_auth_header, encode, normalize, sign, Credentials};

let credentials = Credentials::new("consumer", "secret");
let url = "https://account.aliyun.com/openapi/util/timestamp";

let params = credentials.base_params("a-unique-nonce", 1_700_000_000);
let mut normalized = normalize(&params);
let signature = sign(url, "GET", &normalized, credentials.consumer_secret(), None).unwrap();
normalized.push(("oauth_signature".to_string(), encode(&signature)));

let header = build_auth_header(&normalized);
assert!(header.starts_with("OAuth oauth_consumer_key=\"consumer\""));
```
*/
mod client;
mod encode;
mod error;
mod params;
mod request;
mod response;
mod secrets;
mod signer;
mod transport;

// exposed to external program
pub use client::{Client, DEFAULT_PREFIX};
pub use encode::encode;
pub use error::{
    CallerError, ConfigError, Error, ParseError, Result, SignError, SignResult, TransportError,
};
pub use params::{normalize, NormalizedParameters, ParameterBag};
pub use request::{OAuthRequest, SignedRequest};
pub use response::{Payload, TokenResponse};
pub use secrets::Credentials;
pub use signer::{build_auth_header, sign, signature_base_string};
pub use transport::{unix_timestamp, NonceSource, Transport, TransportResponse, UuidNonce};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_consumer_key`.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_signature_method`.
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_token`.
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
