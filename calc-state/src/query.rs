use std::fmt;

use tracing::warn;

/// An ordered list of decoded query parameters.
///
/// Order is kept as found so that rewriting one calculator's parameters does
/// not reshuffle anyone else's. Displaying a `QueryString` percent-encodes
/// every key and value; parsing that output gives back the same pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .ok()
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, with or without its leading `?`.
    ///
    /// Never fails. A pair whose key or value does not decode to UTF-8 is
    /// skipped, as is a pair with an empty key. A pair without `=` has an
    /// empty value.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut pairs = Vec::new();

        for segment in raw.split('&').filter(|segment| !segment.is_empty()) {
            let (raw_key, raw_value) = segment.split_once('=').unwrap_or((segment, ""));
            let (Some(key), Some(value)) = (decode_component(raw_key), decode_component(raw_value))
            else {
                warn!(segment, "ignoring undecodable query parameter");
                continue;
            };
            if key.is_empty() {
                warn!(segment, "ignoring query parameter without a name");
                continue;
            }
            pairs.push((key, value));
        }

        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Sets `key` in place of its first occurrence, dropping any repeats, or
    /// appends it.
    pub fn set(
        &mut self,
        key: &str,
        value: &str,
    ) {
        match self.position(|name| name == key) {
            Some(index) => {
                self.pairs[index].1 = value.to_string();
                let mut seen = false;
                self.pairs.retain(|(name, _)| {
                    if name != key {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.push(key, value),
        }
    }

    pub fn push(
        &mut self,
        key: &str,
        value: &str,
    ) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    /// Inserts a pair at `index`, clamped to the end.
    pub fn insert(
        &mut self,
        index: usize,
        key: &str,
        value: &str,
    ) {
        let index = index.min(self.pairs.len());
        self.pairs
            .insert(index, (key.to_string(), value.to_string()));
    }

    /// Removes every pair named `key`.
    pub fn remove(
        &mut self,
        key: &str,
    ) {
        self.pairs.retain(|(name, _)| name != key);
    }

    /// Removes every pair whose key starts with `prefix`, returning the index
    /// the first of them occupied.
    pub fn remove_prefixed(
        &mut self,
        prefix: &str,
    ) -> Option<usize> {
        let first = self.position(|name| name.starts_with(prefix));
        self.pairs.retain(|(name, _)| !name.starts_with(prefix));
        first
    }

    pub fn position(
        &self,
        predicate: impl Fn(&str) -> bool,
    ) -> Option<usize> {
        self.pairs.iter().position(|(name, _)| predicate(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for QueryString {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}={}", urlencoding::encode(key), urlencoding::encode(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn parse_keeps_order_and_strips_question_mark() {
        let query = QueryString::parse("?in=emi&emi_loanAmount=500000&rd_amount=2000");

        let keys: Vec<_> = query.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["in", "emi_loanAmount", "rd_amount"]);
        assert_eq!(query.get("emi_loanAmount"), Some("500000"));
    }

    #[test]
    fn parse_decodes_plus_and_percent_escapes() {
        let query = QueryString::parse("note=home+loan%20plan&sym=%2B5");

        assert_eq!(query.get("note"), Some("home loan plan"));
        assert_eq!(query.get("sym"), Some("+5"));
    }

    #[test]
    fn parse_tolerates_malformed_pairs() {
        let query = QueryString::parse("&&=orphan&flag&bad=%FF&ok=1");

        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("bad"), None);
        assert_eq!(query.get("ok"), Some("1"));
        assert_eq!(query.len(), 2);
    }

    // =========================================================================
    // mutation tests
    // =========================================================================

    #[test]
    fn set_replaces_in_place_and_drops_repeats() {
        let mut query = QueryString::parse("a=1&b=2&a=3&c=4");

        query.set("a", "9");

        assert_eq!(query.to_string(), "a=9&b=2&c=4");
    }

    #[test]
    fn remove_prefixed_reports_first_position() {
        let mut query = QueryString::parse("in=emi&emi_a=1&rd_a=2&emi_b=3");

        let position = query.remove_prefixed("emi_");

        assert_eq!(position, Some(1));
        assert_eq!(query.to_string(), "in=emi&rd_a=2");
    }

    #[test]
    fn insert_clamps_to_end() {
        let mut query = QueryString::parse("a=1");

        query.insert(10, "b", "2");
        query.insert(0, "in", "emi");

        assert_eq!(query.to_string(), "in=emi&a=1&b=2");
    }

    // =========================================================================
    // Display tests
    // =========================================================================

    #[test]
    fn display_encodes_reserved_characters() {
        let mut query = QueryString::new();
        query.push("note", "a&b=c d+e");

        assert_eq!(query.to_string(), "note=a%26b%3Dc%20d%2Be");
    }

    #[test]
    fn display_output_parses_back_to_same_pairs() {
        let mut query = QueryString::new();
        query.push("emi_loanAmount", "1,00,000");
        query.push("note", "50% off + tax");

        let reparsed = QueryString::parse(&query.to_string());

        assert_eq!(reparsed, query);
        assert_eq!(reparsed.to_string(), query.to_string());
    }
}
