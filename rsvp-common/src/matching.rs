//! Name normalization and guest lookup
//!
//! Matching is exact equality after normalization. There is no typo tolerance
//! (no edit distance or phonetic matching): "Jon Smith" does not match
//! "John Smith".

use crate::models::Guest;

/// Lowercase and trim a name for comparison
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Two names refer to the same guest
pub fn matches(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// First guest whose name normalizes equal to `name`
pub fn find_guest<'a>(name: &str, directory: &'a [Guest]) -> Option<&'a Guest> {
    let wanted = normalize(name);
    directory.iter().find(|guest| normalize(&guest.name) == wanted)
}

/// Text before the first space of the trimmed name, or the whole name when
/// it has none
pub fn first_name(full_name: &str) -> &str {
    let full_name = full_name.trim();
    full_name.split(' ').next().unwrap_or(full_name)
}

/// Basic shape check for a contact email address
///
/// 3-254 characters, exactly one `@`, non-empty local part, and a domain
/// containing a dot.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.len() < 3 || email.len() > 254 {
        return false;
    }

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        _ => false,
    }
}
