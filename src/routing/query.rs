//! Query string decoding.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::error::RouterError;
use crate::routing::Params;

/// Decode a query string (without the leading `?`) into a flat mapping.
///
/// Pairs are split on the first `=`; a key without `=` maps to `""`. Keys and
/// values are percent-decoded strictly: a pair with a malformed escape or
/// invalid UTF-8 is skipped and logged. Later duplicates overwrite earlier ones.
pub fn parse_query<'a>(query_string: impl Into<Option<&'a str>>) -> Params {
    let mut query = Params::new();
    let Some(query_string) = query_string.into() else {
        return query;
    };

    for pair in query_string.split('&') {
        if pair.is_empty() {
            continue;
        }
        match decode_pair(pair) {
            Ok(Some((key, value))) => {
                query.insert(key, value);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Error parsing query string"),
        }
    }

    query
}

fn decode_pair(pair: &str) -> Result<Option<(String, String)>, RouterError> {
    let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
    if raw_key.is_empty() {
        return Ok(None);
    }

    let malformed = || RouterError::MalformedQueryPair(pair.to_string());
    let key = decode_component(raw_key).ok_or_else(malformed)?;
    let value = decode_component(raw_value).ok_or_else(malformed)?;
    Ok(Some((key.into_owned(), value.into_owned())))
}

/// Strict percent-decoding: every `%` must introduce two hex digits and the
/// decoded bytes must be UTF-8. `+` is left untouched.
pub(crate) fn decode_component(raw: &str) -> Option<Cow<'_, str>> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(raw).decode_utf8().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(parse_query("").is_empty());
        assert!(parse_query(None).is_empty());
    }

    #[test]
    fn test_simple_pairs() {
        let query = parse_query("a=1&b=2");
        assert_eq!(query.len(), 2);
        assert_eq!(query["a"], "1");
        assert_eq!(query["b"], "2");
    }

    #[test]
    fn test_key_without_value() {
        let query = parse_query("a");
        assert_eq!(query["a"], "");
        assert_eq!(parse_query("flag=")["flag"], "");
    }

    #[test]
    fn test_split_on_first_equals() {
        assert_eq!(parse_query("expr=a=b")["expr"], "a=b");
    }

    #[test]
    fn test_percent_decoding() {
        let query = parse_query("name=John%20Doe&q%26=x%2Fy&plus=a+b");
        assert_eq!(query["name"], "John Doe");
        assert_eq!(query["q&"], "x/y");
        assert_eq!(query["plus"], "a+b");
    }

    #[test]
    fn test_malformed_pair_is_skipped() {
        let query = parse_query("a=1&bad=%zz&c=%E0%A4&d=4");
        assert_eq!(query.len(), 2);
        assert_eq!(query["a"], "1");
        assert_eq!(query["d"], "4");
    }

    #[test]
    fn test_truncated_escape_is_malformed() {
        assert!(parse_query("a=%2").is_empty());
    }

    #[test]
    fn test_last_duplicate_wins() {
        assert_eq!(parse_query("a=1&a=2")["a"], "2");
    }

    #[test]
    fn test_empty_pairs_and_keys_ignored() {
        let query = parse_query("&&=orphan&x=1&");
        assert_eq!(query.len(), 1);
        assert_eq!(query["x"], "1");
    }
}
