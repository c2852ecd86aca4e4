//! External-login URI detection.
//!
//! Login links (`spendx://login/<lobby-id>`) short-circuit the scan pipeline:
//! they are recognized before the wallet parser ever runs and hand control to
//! the external login service. Parsing the lobby payload itself is that
//! service's business, not ours.
//!
//! The scheme check is deliberately forgiving about the things QR encoders
//! and URL builders get wrong: scheme case, `:` vs `://`, extra slashes.

const LOGIN_SCHEME: &str = "spendx";

/// Extract the path after `spendx:` / `spendx://`, case-insensitive, with
/// any run of leading slashes stripped.
fn after_scheme(raw: &str) -> Option<&str> {
    let s = raw.trim();
    if let Some(pos) = s.find("://") {
        if s[..pos].eq_ignore_ascii_case(LOGIN_SCHEME) {
            return Some(s[pos + 3..].trim_start_matches('/'));
        }
    } else if let Some((scheme, rest)) = s.split_once(':') {
        if scheme.eq_ignore_ascii_case(LOGIN_SCHEME) {
            return Some(rest.trim_start_matches('/'));
        }
    }
    None
}

/// True if the scanned text is an external-login link.
pub fn is_login_uri(text: &str) -> bool {
    login_lobby_id(text).is_some()
}

/// The lobby identifier carried by a login link, with query and fragment
/// stripped. `None` if the text is not a login link or carries no id.
pub fn login_lobby_id(text: &str) -> Option<&str> {
    let rest = after_scheme(text)?;
    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    if !segments.next()?.eq_ignore_ascii_case("login") {
        return None;
    }
    let id = segments.next()?;
    let id = id.split(['?', '#']).next().unwrap_or("");
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_login_links() {
        assert!(is_login_uri("spendx://login/AbC123"));
        assert_eq!(login_lobby_id("spendx://login/AbC123"), Some("AbC123"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert!(is_login_uri("SPENDX://login/xyz"));
        assert!(is_login_uri("SpendX://LOGIN/xyz"));
    }

    #[test]
    fn tolerates_slash_variants() {
        assert!(is_login_uri("spendx:/login/xyz"));
        assert!(is_login_uri("spendx:login/xyz"));
        assert!(is_login_uri("spendx:////login/xyz"));
    }

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(
            login_lobby_id("spendx://login/xyz?utm=1#frag"),
            Some("xyz")
        );
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_login_uri("bitcoin:1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2"));
        assert!(!is_login_uri("spendx://pay/abc"));
        assert!(!is_login_uri("spendx://login/"));
        assert!(!is_login_uri("spendx://login"));
        assert!(!is_login_uri(""));
        assert!(!is_login_uri("https://spendx.example/login/abc"));
    }
}
