//! Session-token claim decoding.
//!
//! Reads the payload segment of a `header.payload.signature` token WITHOUT
//! verifying the signature. The result is a display hint for the dashboard
//! (who is signed in, which menu to show) and must never be used to decide
//! trust; the upstream API verifies the token on every call.

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::{Map, Value};
use tracing::debug;

// Tokens are base64url without padding, but hand-made or legacy tokens show up
// padded and/or with the standard alphabet.
const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Claims decoded from a session token.
///
/// Every recognized field is optional and extracted leniently; the full
/// decoded object is kept in `raw` so no key/value pair is lost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    pub sub: Option<String>,
    pub role: Option<String>,
    pub roles: Vec<String>,
    pub groups: Vec<String>,
    pub organization_id: Option<String>,
    pub employee_id: Option<String>,
    pub exp: Option<i64>,
    raw: Map<String, Value>,
}

impl Claims {
    pub fn from_map(raw: Map<String, Value>) -> Self {
        Self {
            sub: raw.get("sub").and_then(string_claim),
            role: raw.get("role").and_then(string_claim),
            roles: raw.get("roles").map(list_claim).unwrap_or_default(),
            groups: raw.get("groups").map(list_claim).unwrap_or_default(),
            organization_id: raw.get("organizationId").and_then(string_claim),
            employee_id: raw.get("employeeId").and_then(string_claim),
            exp: raw.get("exp").and_then(Value::as_i64),
            raw,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

fn string_claim(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Arrays keep their string elements in order. A bare string is accepted too,
// split on commas (some issuers flatten `groups` that way).
fn list_claim(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(segment)
        .or_else(|_| STANDARD_LENIENT.decode(segment))
        .ok()
}

/// Decode the payload of a three-part token.
///
/// Returns `None` for anything that is not exactly three dot-separated parts
/// or whose middle part is not base64-encoded JSON object text.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        debug!(parts = parts.len(), "token is not a three-part JWT");
        return None;
    }

    let Some(bytes) = decode_segment(parts[1]) else {
        debug!("token payload is not valid base64");
        return None;
    };

    match serde_json::from_slice::<Map<String, Value>>(&bytes) {
        Ok(map) => Some(Claims::from_map(map)),
        Err(err) => {
            debug!(error = %err, "token payload is not a JSON object");
            None
        }
    }
}
