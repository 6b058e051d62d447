//! Convenience builder for HTTP query strings.
//!
//! Option types translate their set fields into `(wire name, value)` pairs
//! through [`QueryParams`]; unset fields never reach the wire.

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render the pairs as a form-encoded query string.
    ///
    /// The result carries the leading `?`, or is empty when nothing was
    /// pushed, so it can be appended to a URL as is.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("?{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("name", Option::<String>::None);
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
    }

    #[test]
    fn push_opt_keeps_explicit_zero() {
        let mut params = QueryParams::new();
        params.push_opt("limit", Some(0u32));
        assert_eq!(params.into_pairs(), vec![("limit", "0".to_string())]);
    }

    #[test]
    fn query_string_keeps_push_order() {
        let mut params = QueryParams::new();
        params.push_opt("name", Some("lb1"));
        params.push_opt("admin_state_up", Some(false));
        params.push_opt("limit", Some(10));
        assert_eq!(
            params.to_query_string(),
            "?name=lb1&admin_state_up=false&limit=10"
        );
    }

    #[test]
    fn query_string_encodes_reserved_characters() {
        let mut params = QueryParams::new();
        params.push_opt("description", Some("web & api=front/end"));
        assert_eq!(
            params.to_query_string(),
            "?description=web+%26+api%3Dfront%2Fend"
        );
    }
}
