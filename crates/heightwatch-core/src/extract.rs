//! Best-effort height scan over pool stats payloads.
//!
//! Pool stats endpoints are not guaranteed to serve clean JSON, so the
//! height is located with a text scan rather than a schema.

use std::sync::LazyLock;

use regex::Regex;

static HEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""height"\s*:\s*(\d+)"#).expect("height pattern is valid"));

/// Extract the height from a stats body.
///
/// Uses the first line that carries a `"height":<digits>` token; when that
/// line holds several, the last one wins. Returns `None` when no token is
/// present or the digits do not fit in a `u64`.
pub fn extract_height(body: &str) -> Option<u64> {
    let captures = body
        .lines()
        .find_map(|line| HEIGHT_RE.captures_iter(line).last())?;
    captures.get(1)?.as_str().parse().ok()
}
