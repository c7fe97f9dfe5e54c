use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::encode::encode;
use crate::{SignError, SignResult, OAUTH_KEY_PREFIX};

type HmacSha1 = Hmac<Sha1>;

/// Build `METHOD&encode(url)&encode(k1=v1&k2=v2...)`.
///
/// `params` must already be normalized; the joined parameter block is
/// percent-encoded a second time as a whole.
pub fn signature_base_string<K, V>(method: &str, url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let joined = params
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&joined)
    )
}

/// Compute the base64 HMAC-SHA1 signature of a request.
///
/// The returned value is not percent-encoded yet.
pub fn sign<K, V>(
    url: &str,
    method: &str,
    params: &[(K, V)],
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> SignResult<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let base_string = signature_base_string(method, url, params);
    tracing::trace!(base_string = %base_string, "signature base string");

    let key = format!(
        "{}&{}",
        encode(consumer_secret),
        encode(token_secret.unwrap_or_default())
    );
    hmac_sha1_base64(&base_string, &key)
}

fn hmac_sha1_base64(data: &str, key: &str) -> SignResult<String> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| SignError::InvalidKey(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Render `OAuth k1="v1", k2="v2"` from the `oauth_` pairs of `params`.
///
/// Values are emitted as given; callers pass already-encoded pairs.
pub fn build_auth_header<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let fields = params
        .iter()
        .filter(|(k, _)| k.as_ref().contains(OAUTH_KEY_PREFIX))
        .map(|(k, v)| format!("{}=\"{}\"", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>();
    format!("OAuth {}", fields.join(", "))
}
