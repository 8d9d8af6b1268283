//! PII redaction for log output.
//!
//! Raw database errors and auth failures can carry emails and tokens;
//! everything routed through `Redacted` gets masked before it hits a sink.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

fn email_pattern() -> &'static Regex {
    static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
    });
    &EMAIL
}

fn token_pattern() -> &'static Regex {
    // JWT segments and other opaque base64/hex runs of 16+ chars. Underscore
    // is left out so snake_case identifiers in error text survive.
    static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}\b").unwrap()
    });
    &TOKEN
}

/// Masks emails (keep first char of the local part and the domain) and
/// replaces opaque token runs with `[REDACTED_TOKEN]`. Emails first so
/// their local parts are not half-eaten by the token pass.
pub fn redact(input: &str) -> String {
    let email_redacted = email_pattern().replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.find('@') {
            Some(at_pos) if at_pos > 0 => {
                let first_char = &full_match[..1];
                let domain = &full_match[at_pos..];
                format!("{first_char}***{domain}")
            }
            _ => full_match.to_string(),
        }
    });

    token_pattern()
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that applies PII redaction whenever the value is formatted.
pub struct Redacted<'a>(pub &'a str);

impl<'a> fmt::Display for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl<'a> fmt::Debug for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_emails_keeping_domain() {
        assert_eq!(redact("user@example.com"), "u***@example.com");
        assert_eq!(redact("a@test.org"), "a***@test.org");
        assert_eq!(
            redact("Contact user@example.com or admin@test.org"),
            "Contact u***@example.com or a***@test.org"
        );
    }

    #[test]
    fn replaces_token_runs() {
        assert_eq!(
            redact("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"),
            "[REDACTED_TOKEN]"
        );
        assert_eq!(
            redact("token a1b2c3d4e5f67890123456 expired"),
            "token [REDACTED_TOKEN] expired"
        );
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        assert_eq!(
            redact("UNIQUE constraint failed: users.email"),
            "UNIQUE constraint failed: users.email"
        );
    }

    #[test]
    fn redacted_wrapper_formats_masked() {
        let wrapped = Redacted("user@example.com tried to log in");
        assert_eq!(format!("{wrapped}"), "u***@example.com tried to log in");
    }
}
