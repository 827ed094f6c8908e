// Course identifier resolution
// Accepts a numeric courseId, a full Classroom URL (?courseid=... or /c/<token>)
// or the bare base64url token that Classroom puts after /c/.

use base64::{
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

/// Standard alphabet that ignores non-zero trailing bits, so tokens from
/// lenient encoders (`MTJ`) still decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);
use url::Url;

/// Resolves user input into the numeric course id expected by the Classroom API.
///
/// Returns `None` when no form yields an all-digit id.
pub fn resolve_course_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let decoded = urlencoding::decode(trimmed)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| trimmed.to_string());

    if is_numeric(&decoded) {
        return Some(decoded);
    }

    match Url::parse(&decoded) {
        Ok(url) => resolve_from_url(&url),
        Err(_) => decode_base64url_token(&decoded).filter(|d| is_numeric(d)),
    }
}

fn resolve_from_url(url: &Url) -> Option<String> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case("courseid"))
        .map(|(_, value)| value.into_owned())
        .filter(|value| is_numeric(value));

    if from_query.is_some() {
        return from_query;
    }

    let segments: Vec<&str> = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .collect();

    let idx = segments.iter().position(|segment| *segment == "c")?;
    let token = segments.get(idx + 1)?;

    if is_numeric(token) {
        return Some(token.to_string());
    }

    decode_base64url_token(token).filter(|d| is_numeric(d))
}

/// Decodes a base64url token (unpadded) into trimmed text.
///
/// Length mod 4 == 1 is never a valid encoding.
pub fn decode_base64url_token(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let mut b64 = token.replace('-', "+").replace('_', "/");
    match b64.len() % 4 {
        0 => {}
        2 => b64.push_str("=="),
        3 => b64.push('='),
        _ => return None,
    }

    let bytes = LENIENT.decode(b64.as_bytes()).ok()?;
    Some(String::from_utf8_lossy(&bytes).trim().to_string())
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(id: &str) -> String {
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(id)
    }

    #[test]
    fn test_numeric_input_is_returned_unchanged() {
        assert_eq!(resolve_course_id("123"), Some("123".to_string()));
        assert_eq!(resolve_course_id("000987654321"), Some("000987654321".to_string()));
    }

    #[test]
    fn test_query_parameter() {
        assert_eq!(
            resolve_course_id("https://classroom.google.com/u/0/h?courseid=123&foo=bar"),
            Some("123".to_string())
        );
        // courseid wins over a /c/ segment
        let url = format!("https://classroom.google.com/c/{}?courseid=123", token_for("456"));
        assert_eq!(resolve_course_id(&url), Some("123".to_string()));
    }

    #[test]
    fn test_non_numeric_query_falls_back_to_path() {
        let url = format!("https://classroom.google.com/c/{}?courseid=abc", token_for("456"));
        assert_eq!(resolve_course_id(&url), Some("456".to_string()));
    }

    #[test]
    fn test_c_segment_token() {
        let url = format!("https://classroom.google.com/u/1/c/{}", token_for("456"));
        assert_eq!(resolve_course_id(&url), Some("456".to_string()));

        assert_eq!(
            resolve_course_id("https://classroom.google.com/c/789/details"),
            Some("789".to_string())
        );
    }

    #[test]
    fn test_url_without_course_fails() {
        assert_eq!(resolve_course_id("https://classroom.google.com/h"), None);
        assert_eq!(resolve_course_id("https://classroom.google.com/c/"), None);
        assert_eq!(
            resolve_course_id(&format!("https://classroom.google.com/c/{}", token_for("abc"))),
            None
        );
    }

    #[test]
    fn test_percent_encoded_url() {
        let encoded = urlencoding::encode("https://classroom.google.com/h?courseid=321").into_owned();
        assert_eq!(resolve_course_id(&encoded), Some("321".to_string()));
    }

    #[test]
    fn test_opaque_token() {
        assert_eq!(resolve_course_id(&token_for("789")), Some("789".to_string()));
        assert_eq!(resolve_course_id(&token_for("hello")), None);
    }

    #[test]
    fn test_padding_rules() {
        // "12" -> "MTI" (len 3), "1" -> "MQ" (len 2), "123" -> "MTIz" (len 4)
        assert_eq!(decode_base64url_token("MTI"), Some("12".to_string()));
        assert_eq!(decode_base64url_token("MQ"), Some("1".to_string()));
        assert_eq!(decode_base64url_token("MTIz"), Some("123".to_string()));
        assert_eq!(decode_base64url_token("MTIzN"), None);
    }

    #[test]
    fn test_non_canonical_trailing_bits() {
        assert_eq!(decode_base64url_token("MTJ"), Some("12".to_string()));
        assert_eq!(decode_base64url_token("MR"), Some("1".to_string()));
        assert_eq!(resolve_course_id("MTJ"), Some("12".to_string()));
    }

    #[test]
    fn test_whitespace_around_decoded_content_is_trimmed() {
        assert_eq!(resolve_course_id(&token_for(" 42\n")), Some("42".to_string()));
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(resolve_course_id(""), None);
        assert_eq!(resolve_course_id("   "), None);
    }
}
