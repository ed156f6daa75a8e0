//! Query string decoding
//!
//! Follows `application/x-www-form-urlencoded` rules: `+` is a space and
//! `%XX` escapes are decoded. Invalid UTF-8 after decoding is replaced
//! rather than rejected.

use std::borrow::Cow;

/// Decoded query parameters, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse the raw query (without the leading `?`)
    ///
    /// # Examples
    /// ```
    /// use maths_server::http::query::QueryParams;
    /// let params = QueryParams::parse(Some("op=+&x=1&y=%32"));
    /// assert_eq!(params.get("op"), Some(" "));
    /// assert_eq!(params.get("y"), Some("2"));
    /// ```
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .unwrap_or_default()
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    /// Build from already-decoded pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Value of the first occurrence of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_decodes_to_space() {
        let params = QueryParams::parse(Some("op=+&x=1&y=2"));
        assert_eq!(params.get("op"), Some(" "));
        assert_eq!(params.get("x"), Some("1"));
    }

    #[test]
    fn test_percent_escapes() {
        let params = QueryParams::parse(Some("op=%2B&op2=%25&n=%2D5"));
        assert_eq!(params.get("op"), Some("+"));
        assert_eq!(params.get("op2"), Some("%"));
        assert_eq!(params.get("n"), Some("-5"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let params = QueryParams::parse(Some("x=1&x=2"));
        assert_eq!(params.get("x"), Some("1"));
    }

    #[test]
    fn test_empty_and_bare_keys() {
        assert_eq!(QueryParams::parse(None), QueryParams::default());
        assert_eq!(QueryParams::parse(Some("&&")), QueryParams::default());

        let params = QueryParams::parse(Some("op&&x="));
        assert_eq!(params.get("op"), Some(""));
        assert_eq!(params.get("x"), Some(""));
        assert_eq!(params.get("y"), None);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let params = QueryParams::parse(Some("x=%FF"));
        assert_eq!(params.get("x"), Some("\u{FFFD}"));
    }
}
