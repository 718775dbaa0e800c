//! Upload session key extraction.

use url::Url;

const KEY_PARAM: &str = "key";

/// Placeholder base for resolving relative session locations such as
/// `/upload?key=123`. Only the query component is read.
const RELATIVE_BASE: &str = "http://localhost/";

/// Returns the first non-empty `key` query parameter of `uri`.
///
/// Accepts absolute and relative URIs. Returns `None` for an empty string,
/// a missing key, or anything that does not parse.
pub fn extract_key(uri: &str) -> Option<String> {
    if uri.is_empty() {
        return None;
    }

    let parsed = match Url::parse(uri) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(uri).ok()?
        }
        Err(_) => return None,
    };

    parsed
        .query_pairs()
        .find(|(k, v)| k == KEY_PARAM && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}
