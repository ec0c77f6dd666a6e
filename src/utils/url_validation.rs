//! Destination URL validation.

use url::Url;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS URLs can be tracked, got '{0}'")]
    UnsupportedScheme(String),

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute http/https URL with a host.
///
/// The input is not rewritten: the tracker redirects to exactly what was
/// registered.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_destination_url("https://example.com/page").is_ok());
/// assert!(validate_destination_url("").is_err());
/// assert!(validate_destination_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_destination_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_url() {
        assert!(validate_destination_url("https://example.com/page").is_ok());
    }

    #[test]
    fn test_accepts_query_and_fragment() {
        assert!(validate_destination_url("https://example.com/search?q=rust&page=2#top").is_ok());
    }

    #[test]
    fn test_accepts_ip_and_port() {
        assert!(validate_destination_url("http://192.168.1.1:8080/api").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_destination_url(""), Err(UrlValidationError::Empty));
        assert_eq!(validate_destination_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_destination_url("example.com/page"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            validate_destination_url("not a valid url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in [
            "ftp://example.com/file.txt",
            "javascript:alert('xss')",
            "mailto:test@example.com",
            "data:text/plain,Hello",
        ] {
            assert!(
                matches!(
                    validate_destination_url(input),
                    Err(UrlValidationError::UnsupportedScheme(_))
                ),
                "{input} should be rejected"
            );
        }
    }
}
