//! Query string dictionary for URL-encoded form data.
//!
//! [`QueryDict`] wraps [`MultiValueDict`] to provide a read-only dictionary
//! for query string and `application/x-www-form-urlencoded` parameters.

use formbind_core::utils::MultiValueDict;
use formbind_core::{BindError, BindResult};

/// A read-only dictionary for query string and form data.
///
/// # Examples
///
/// ```
/// use formbind_http::QueryDict;
///
/// let qd = QueryDict::parse("color=red&color=blue&size=large");
/// assert_eq!(qd.get("color"), Some("red"));
/// assert_eq!(qd.get_list("color"), Some(&["red".to_string(), "blue".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    data: MultiValueDict<String, String>,
}

impl QueryDict {
    /// Creates a new, empty `QueryDict`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL query string (e.g., `"key1=val1&key2=val2"`), tolerating
    /// malformed escapes by leaving them undecoded.
    ///
    /// Handles percent-encoding, `+` as space, and multiple values per key.
    pub fn parse(query_string: &str) -> Self {
        let data = pairs(query_string)
            .map(|(key, value)| (percent_decode(key), percent_decode(value)))
            .collect();
        Self { data }
    }

    /// Parses a URL query string, rejecting malformed input.
    ///
    /// A `%` not followed by two hex digits, or a `;` inside a pair, is an
    /// error. The first offending pair is reported.
    pub fn try_parse(query_string: &str) -> BindResult<Self> {
        let mut data = MultiValueDict::new();

        for (key, value) in pairs(query_string) {
            if key.contains(';') || value.contains(';') {
                return Err(BindError::PayloadParse(
                    "invalid semicolon separator in query".to_string(),
                ));
            }
            validate_escapes(key)?;
            validate_escapes(value)?;
            data.append(percent_decode(key), percent_decode(value));
        }

        Ok(Self { data })
    }

    /// Builds a `QueryDict` from `(key, value)` pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let data = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { data }
    }

    /// Returns the first value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.first(key).map(String::as_str)
    }

    /// Returns all values for the given key, or `None` if not present.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.data.get_list(key)
    }

    /// Appends every value of `other` after the values already held here.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.data.merge(other.data);
        self
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `QueryDict` contains no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }
}

/// Splits a query string into raw `(key, value)` pairs, skipping empty ones.
fn pairs(query_string: &str) -> impl Iterator<Item = (&str, &str)> {
    query_string
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

fn validate_escapes(raw: &str) -> BindResult<()> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let escape: String = raw[i..].chars().take(3).collect();
                return Err(BindError::PayloadParse(format!(
                    "invalid URL escape {escape:?}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Decodes a percent-encoded string.
fn percent_decode(input: &str) -> String {
    // Replace + with space (form encoding), then decode percent sequences
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let qd = QueryDict::new();
        assert!(qd.is_empty());
        assert_eq!(qd.len(), 0);
    }

    #[test]
    fn test_parse_multiple_values_keeps_order() {
        let qd = QueryDict::parse("color=red&color=blue&color=green");
        assert_eq!(qd.get("color"), Some("red"));
        assert_eq!(
            qd.get_list("color"),
            Some(&["red".to_string(), "blue".to_string(), "green".to_string()][..])
        );
    }

    #[test]
    fn test_parse_no_value() {
        let qd = QueryDict::parse("key");
        assert_eq!(qd.get("key"), Some(""));
    }

    #[test]
    fn test_parse_percent_encoded_and_plus() {
        let qd = QueryDict::parse("name=hello%20world&city=New+York&contact.phone=555");
        assert_eq!(qd.get("name"), Some("hello world"));
        assert_eq!(qd.get("city"), Some("New York"));
        assert_eq!(qd.get("contact.phone"), Some("555"));
    }

    #[test]
    fn test_parse_skips_empty_pairs() {
        let qd = QueryDict::parse("a=1&&b=2&");
        assert_eq!(qd.len(), 2);
    }

    #[test]
    fn test_parse_is_lossy_on_bad_escape() {
        let qd = QueryDict::parse("a=%zz");
        assert_eq!(qd.get("a"), Some("%zz"));
    }

    #[test]
    fn test_try_parse_accepts_valid_input() {
        let qd = QueryDict::try_parse("profile=%7B%22age%22%3A30%7D&tags=a&tags=b").unwrap();
        assert_eq!(qd.get("profile"), Some("{\"age\":30}"));
        assert_eq!(qd.get_list("tags").map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_try_parse_rejects_bad_escape() {
        let err = QueryDict::try_parse("a=1&b=%zz").unwrap_err();
        assert!(matches!(err, BindError::PayloadParse(_)));
        assert!(err.to_string().contains("invalid URL escape"));
    }

    #[test]
    fn test_try_parse_rejects_truncated_escape() {
        assert!(QueryDict::try_parse("a=100%").is_err());
        assert!(QueryDict::try_parse("a=%4").is_err());
    }

    #[test]
    fn test_try_parse_rejects_semicolon() {
        let err = QueryDict::try_parse("a=1;b=2").unwrap_err();
        assert!(err.to_string().contains("semicolon"));
    }

    #[test]
    fn test_merged_appends_values() {
        let body = QueryDict::parse("a=body");
        let query = QueryDict::parse("a=query&b=2");
        let merged = body.merged(query);
        assert_eq!(
            merged.get_list("a"),
            Some(&["body".to_string(), "query".to_string()][..])
        );
        assert_eq!(merged.get("b"), Some("2"));
    }

    #[test]
    fn test_from_pairs_keeps_value_order() {
        let qd = QueryDict::from_pairs([("tag", "b"), ("name", "hello world"), ("tag", "a")]);
        assert_eq!(qd.get("name"), Some("hello world"));
        assert_eq!(
            qd.get_list("tag"),
            Some(&["b".to_string(), "a".to_string()][..])
        );
    }

    #[test]
    fn test_contains_key() {
        let qd = QueryDict::parse("key=value");
        assert!(qd.contains_key("key"));
        assert!(!qd.contains_key("missing"));
    }

    #[test]
    fn test_keys() {
        let qd = QueryDict::parse("a=1&b=2&c=3");
        let mut keys: Vec<_> = qd.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
