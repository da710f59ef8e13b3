//! `Cookie` request header parsing.

use ::cookie::Cookie;

use crate::message::CookieParams;

/// Parse a `Cookie` header into a name → value mapping.
///
/// Pairs are separated by `;`, values are percent-decoded and stripped of
/// surrounding double quotes. Malformed pairs are skipped. When a name occurs
/// more than once, the first value wins.
pub fn parse_cookies(header: &str) -> CookieParams {
    let mut params = CookieParams::new();

    for cookie in Cookie::split_parse_encoded(header).flatten() {
        params
            .entry(cookie.name().to_string())
            .or_insert_with(|| cookie.value_trimmed().to_string());
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_list() {
        let params = parse_cookies("name=value; name2=value2; name3=value3");

        assert_eq!(params.len(), 3);
        assert_eq!(params["name"], "value");
        assert_eq!(params["name2"], "value2");
        assert_eq!(params["name3"], "value3");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let params = parse_cookies("id=first; id=second");
        assert_eq!(params["id"], "first");
    }

    #[test]
    fn test_percent_decoding_and_quotes() {
        let params = parse_cookies("greeting=hello%20world; quoted=\"abc\"");

        assert_eq!(params["greeting"], "hello world");
        assert_eq!(params["quoted"], "abc");
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let params = parse_cookies("novalue; ; ok=1");

        assert_eq!(params.len(), 1);
        assert_eq!(params["ok"], "1");
    }
}
