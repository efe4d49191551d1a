//! Shared utility functions.

use uuid::Uuid;

/// Exclusive upper bound of generated nonces (nine decimal digits).
const NONCE_MODULUS: u128 = 1_000_000_000;

/// Generates a random decimal nonce below 10^9, used to correlate an
/// outbound interaction with the gateway event that acknowledges it.
pub fn random_nonce() -> String {
    (Uuid::new_v4().as_u128() % NONCE_MODULUS).to_string()
}

/// Formats a 24-bit RGB integer as a `#rrggbb` CSS colour.
pub fn format_hex_color(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}
