//! Redeem code and submission validation.
//!
//! Everything here is pure: no storage access, no logging, no clock. The
//! format check is advisory on the client and repeated here at the server
//! boundary; whether a code was already consumed is decided only by the
//! submission repository.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use redfinger_common::error::ValidationError;
use redfinger_common::models::{
    CloudType, CodeDuration, NewRedeemSubmission, Server, SubmissionRequest, SystemVersion,
};

/// Canonical redeem code: three groups of four uppercase alphanumerics.
pub const REDEEM_CODE_PATTERN: &str = r"^[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}$";

/// Characters per hyphen-separated group.
const GROUP_LEN: usize = 4;

static REDEEM_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(REDEEM_CODE_PATTERN).expect("redeem code pattern compiles"));

/// Uppercases `code` and drops everything outside `[A-Z0-9]`.
pub fn normalize(code: &str) -> String {
    code.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Normalizes `code` and regroups it with hyphens after the 4th and 8th
/// characters, the same way the submission form formats input as it is
/// typed. Nothing is truncated, so overlong input stays malformed.
pub fn format_code(code: &str) -> String {
    let raw = normalize(code);
    // `raw` is pure ASCII, byte offsets are char offsets.
    match raw.len() {
        0..=GROUP_LEN => raw,
        n if n <= 2 * GROUP_LEN => format!("{}-{}", &raw[..GROUP_LEN], &raw[GROUP_LEN..]),
        _ => format!(
            "{}-{}-{}",
            &raw[..GROUP_LEN],
            &raw[GROUP_LEN..2 * GROUP_LEN],
            &raw[2 * GROUP_LEN..]
        ),
    }
}

/// True iff `code` is exactly `XXXX-XXXX-XXXX` with `X` in `[A-Z0-9]`.
pub fn is_well_formed(code: &str) -> bool {
    REDEEM_CODE_RE.is_match(code)
}

/// Looks up a field that must be a non-empty JSON string. Content is not
/// inspected beyond that: whitespace counts as a value.
fn required<'a>(
    value: &'a Option<Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(v)) if v.is_empty() => Err(ValidationError::MissingField(field)),
        Some(Value::String(v)) => Ok(v),
        Some(_) => Err(ValidationError::NotAString(field)),
    }
}

fn choice<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidChoice {
        field,
        value: value.to_string(),
    })
}

/// Checks a raw submission and turns it into a storable one.
///
/// Fail-fast: the first problem found is returned. Presence of every field
/// is checked before anything else, then the redeem code format, then the
/// closed provisioning choices. Email and password are opaque and kept
/// exactly as sent.
pub fn validate_submission(
    request: &SubmissionRequest,
) -> Result<NewRedeemSubmission, ValidationError> {
    let email = required(&request.email, "email")?;
    let password = required(&request.password, "password")?;
    let redeem_code = required(&request.redeem_code, "redeemCode")?;
    let server = required(&request.server, Server::FIELD)?;
    let system_version = required(&request.system_version, SystemVersion::FIELD)?;
    let cloud_type = required(&request.cloud_type, CloudType::FIELD)?;
    let duration = required(&request.duration, CodeDuration::FIELD)?;

    let redeem_code = format_code(redeem_code);
    if !is_well_formed(&redeem_code) {
        return Err(ValidationError::MalformedCode(redeem_code));
    }

    Ok(NewRedeemSubmission {
        email: email.to_string(),
        password: password.to_string(),
        redeem_code,
        server: choice(server, Server::FIELD)?,
        system_version: choice(system_version, SystemVersion::FIELD)?,
        cloud_type: choice(cloud_type, CloudType::FIELD)?,
        duration: choice(duration, CodeDuration::FIELD)?,
    })
}
