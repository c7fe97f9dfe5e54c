use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved characters `A-Z a-z 0-9 - . _ ~`.
///
/// Compared with a generic URI component encoder this additionally escapes
/// `!`, `'`, `(`, `)` and `*`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string the way OAuth 1.0a requires for parameter names,
/// values, URLs and secrets.
pub fn encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &str) -> String {
        percent_encoding::percent_decode_str(input)
            .decode_utf8()
            .unwrap()
            .into_owned()
    }

    #[test]
    fn encode_multibyte() {
        assert_eq!(encode("中文"), "%E4%B8%AD%E6%96%87");
        assert_eq!(decode(&encode("中文")), "中文");
    }

    #[test]
    fn encode_sub_delims() {
        let encoded = encode("a!b'c(d)e*f");
        assert_eq!(encoded, "a%21b%27c%28d%29e%2Af");
        for c in ['!', '\'', '(', ')', '*'] {
            assert!(!encoded.contains(c), "{} left unescaped", c);
        }
    }

    #[test]
    fn encode_keeps_unreserved() {
        let safe = "ABCxyz019-._~";
        assert_eq!(encode(safe), safe);
        assert_eq!(encode(&encode(safe)), safe);
    }

    #[test]
    fn encode_reserved() {
        assert_eq!(
            encode("Hello Ladies + Gentlemen, a signed OAuth request!"),
            "Hello%20Ladies%20%2B%20Gentlemen%2C%20a%20signed%20OAuth%20request%21"
        );
        assert_eq!(
            encode("https://account.aliyun.com/oauth/request_token"),
            "https%3A%2F%2Faccount.aliyun.com%2Foauth%2Frequest_token"
        );
        assert_eq!(encode("%"), "%25");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn encode_reversible() {
        for sample in &[
            "plain",
            "with space",
            "a=b&c=d",
            "~tilde/slash?query#frag",
            "終末旅行",
            "emoji 🦀",
        ] {
            assert_eq!(&decode(&encode(sample)), sample);
        }
    }
}
