use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, ParseError, Result, OAUTH_TOKEN_KEY};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";

const ERROR_CODE_KEY: &str = "errorCode";

const ERROR_MSG_KEY: &str = "errorMsg";

/// Successfully interpreted response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `application/x-www-form-urlencoded` key/value pairs.
    Form(HashMap<String, String>),
    /// Any other body, parsed as JSON.
    Json(Value),
}

impl Payload {
    /// Look up a top-level value that is a string.
    ///
    /// JSON numbers, booleans and nested values yield `None`; read those
    /// through [`Payload::into_json`].
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Payload::Form(map) => map.get(key).map(String::as_str),
            Payload::Json(value) => value.get(key).and_then(Value::as_str),
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            Payload::Form(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect::<Map<String, Value>>(),
            ),
            Payload::Json(value) => value,
        }
    }

    /// Deserialize the payload into a typed structure.
    pub fn deserialize<T: DeserializeOwned>(self) -> std::result::Result<T, ParseError> {
        Ok(serde_json::from_value(self.into_json())?)
    }
}

/// Represents response of token acquisition.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

impl TryFrom<Payload> for TokenResponse {
    type Error = ParseError;

    fn try_from(payload: Payload) -> std::result::Result<Self, ParseError> {
        let map = match payload {
            Payload::Form(map) => map,
            Payload::Json(Value::Object(object)) => object
                .into_iter()
                .map(|(k, v)| match v {
                    Value::String(s) => (k, s),
                    other => (k, other.to_string()),
                })
                .collect(),
            Payload::Json(_) => {
                return Err(ParseError::TokenKeyNotFound(
                    OAUTH_TOKEN_KEY,
                    "<non-object json>".to_string(),
                ))
            }
        };
        read_oauth_token(map)
    }
}

fn read_oauth_token(
    mut destructured: HashMap<String, String>,
) -> std::result::Result<TokenResponse, ParseError> {
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(ParseError::TokenKeyNotFound(
            OAUTH_TOKEN_KEY,
            describe_keys(&destructured),
        )),
        (_, _) => Err(ParseError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            describe_keys(&destructured),
        )),
    }
}

// values may carry secrets, so errors only list the keys
fn describe_keys(map: &HashMap<String, String>) -> String {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    format!("[{}]", keys.join(", "))
}

/// Interpret a response body according to its content type.
///
/// Form-encoded bodies become a key/value map. Everything else is parsed as
/// JSON; a JSON object carrying a truthy `errorCode` becomes `Error::Api`.
pub(crate) fn interpret(content_type: &str, body: &[u8]) -> Result<Payload> {
    if content_type.contains(FORM_CONTENT_TYPE) {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(ParseError::from)?;
        return Ok(Payload::Form(pairs.into_iter().collect()));
    }

    let json: Value = serde_json::from_slice(body).map_err(ParseError::from)?;
    if let Some(code) = json.get(ERROR_CODE_KEY).filter(|c| is_truthy(c)) {
        let code = match code {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let message = match json.get(ERROR_MSG_KEY) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        return Err(Error::Api { code, message });
    }
    Ok(Payload::Json(json))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
