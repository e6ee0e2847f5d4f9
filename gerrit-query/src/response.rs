use serde_json::Value;

use crate::error::{Error, Result};

/// Return the JSON payload of a Gerrit REST response.
///
/// Gerrit prefixes JSON bodies with a `)]}'` line against cross-site script
/// inclusion. The first line is dropped unconditionally and the second line
/// is the payload; a body without a second line is rejected.
pub fn strip_xssi_prefix(body: &str) -> Result<&str> {
    const LINE_BREAK: [char; 2] = ['\r', '\n'];

    let first_break = body.find(LINE_BREAK).ok_or(Error::MissingPayload)?;
    let rest = &body[first_break..];
    let rest = rest.strip_prefix("\r\n").unwrap_or(&rest[1..]);

    if rest.trim_start_matches(LINE_BREAK).is_empty() {
        return Err(Error::MissingPayload);
    }

    let payload = match rest.find(LINE_BREAK) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Ok(payload)
}

/// Decode a full response body into the elements of its JSON array, in order.
pub fn parse_change_array(body: &str) -> Result<Vec<Value>> {
    let payload = strip_xssi_prefix(body)?;
    Ok(serde_json::from_str(payload)?)
}
