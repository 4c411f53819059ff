use url::form_urlencoded::byte_serialize;

/// Appends `params` to `url` as a query string.
///
/// Joins with `&` when `url` already carries a query, `?` otherwise. Values are
/// percent-encoded, keys are used as given.
pub fn build_target_url<K, V>(url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if params.is_empty() {
        return url.to_string();
    }

    let query = params
        .iter()
        .map(|(k, v)| {
            let value = byte_serialize(v.as_ref().as_bytes()).collect::<String>();
            format!("{}={}", k.as_ref(), value)
        })
        .collect::<Vec<_>>()
        .join("&");

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_query_string_with_question_mark() {
        let url = build_target_url(
            "https://www.google.com/travel/flights/search",
            &[("tfs", "abc"), ("hl", "en")],
        );
        assert_eq!(url, "https://www.google.com/travel/flights/search?tfs=abc&hl=en");
    }

    #[test]
    fn test_appends_to_existing_query_string() {
        let url = build_target_url(
            "https://www.google.com/travel/search?q=London",
            &[("brd_currency", "USD")],
        );
        assert_eq!(url, "https://www.google.com/travel/search?q=London&brd_currency=USD");
    }

    #[test]
    fn test_empty_params_leave_url_untouched() {
        let params: [(&str, &str); 0] = [];
        assert_eq!(build_target_url("https://example.com/a", &params), "https://example.com/a");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let url = build_target_url(
            "https://example.com",
            &[("brd_dates", "2025-04-22,2025-05-01")],
        );
        assert_eq!(url, "https://example.com?brd_dates=2025-04-22%2C2025-05-01");
    }
}
