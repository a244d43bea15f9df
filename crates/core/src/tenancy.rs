//! Tenant subdomain derivation.

/// Maximum DNS label length.
pub const MAX_SUBDOMAIN_LEN: usize = 63;

/// Fallback label when a business name has no usable characters.
const FALLBACK_SUBDOMAIN: &str = "business";

/// Derive a booking-page subdomain from a business name.
///
/// Keeps lower-case ASCII alphanumerics, collapses every other run of
/// characters into a single hyphen and trims hyphens from both ends.
pub fn subdomain_from_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    out.truncate(MAX_SUBDOMAIN_LEN);
    let trimmed = out.trim_end_matches('-');

    if trimmed.is_empty() {
        FALLBACK_SUBDOMAIN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Append a numeric suffix, shortening the base so the result stays a
/// valid label.
pub fn with_suffix(base: &str, n: u32) -> String {
    let suffix = format!("-{n}");
    let keep = MAX_SUBDOMAIN_LEN.saturating_sub(suffix.len()).min(base.len());
    format!("{}{suffix}", base[..keep].trim_end_matches('-'))
}
