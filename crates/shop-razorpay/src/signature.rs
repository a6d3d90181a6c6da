//! # Signatures
//!
//! Razorpay signs two things with HMAC-SHA256, hex encoded:
//!
//! - the checkout callback, over `"{order_id}|{payment_id}"` with the key secret
//! - webhook deliveries, over the raw request body with the webhook secret

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Message signed for the checkout callback
pub fn payment_message(order_id: &str, payment_id: &str) -> String {
    format!("{}|{}", order_id, payment_id)
}

/// Hex HMAC-SHA256 of `message` under `secret`
pub fn sign(secret: &str, message: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(message);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a hex signature.
///
/// The signature must equal the lowercase hex digest exactly: no padding,
/// no uppercase.
pub fn verify(secret: &str, message: &[u8], signature_hex: &str) -> bool {
    match sign(secret, message) {
        Some(expected) => constant_time_compare(signature_hex, &expected),
        None => false,
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_is_hex_sha256() {
        let sig = sign("secret", b"order_1|pay_1").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let sig = sign("Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify() {
        let message = payment_message("order_1", "pay_1");
        let sig = sign("secret", message.as_bytes()).unwrap();

        assert!(verify("secret", message.as_bytes(), &sig));
        assert!(!verify("secret", message.as_bytes(), &sig.to_uppercase()));
        assert!(!verify("secret", message.as_bytes(), &format!(" {} ", sig)));
        assert!(!verify("other", message.as_bytes(), &sig));
        assert!(!verify("secret", b"order_1|pay_2", &sig));
        assert!(!verify("secret", message.as_bytes(), "not-hex"));
        assert!(!verify("secret", message.as_bytes(), ""));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
