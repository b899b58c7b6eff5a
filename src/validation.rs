//! Stateless payload-shape predicates.
//!
//! These run before any external call is made; a violation fails the request
//! fast with a field-specific message and no side effects.

/// `local@domain.tld` shape: exactly one `@`, no whitespace, and a dot with
/// non-empty parts on both sides in the domain.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Exactly 10 ASCII digits.
pub fn is_valid_mobile(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@studio.example.in"));
        assert!(is_valid_email("x@y.z"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_valid_mobile() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("0000000000"));
    }

    #[test]
    fn test_invalid_mobiles() {
        assert!(!is_valid_mobile("12345"));
        assert!(!is_valid_mobile("12345678901"));
        assert!(!is_valid_mobile("12345abcde"));
        assert!(!is_valid_mobile("98765 4321"));
        assert!(!is_valid_mobile(""));
    }
}
