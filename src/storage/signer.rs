//! Signed download links.
//!
//! A link is valid for a key-time window `{start};{end}` (unix seconds).
//! The signature is derived in two stages: the secret signs the key time,
//! and the resulting key signs a digest of the request description, so a
//! signature is only valid for its own window.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};

type HmacSha1 = Hmac<Sha1>;

/// Signature for one object path and key-time window
pub struct SignedLink {
    pub key_time: String,
    pub signature: String,
}

/// Link signer
#[derive(Clone)]
pub struct LinkSigner {
    secret: String,
}

impl LinkSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Sign `object_path` for the next `valid_seconds`
    pub fn sign(&self, object_path: &str, valid_seconds: i64) -> SignedLink {
        let start = Utc::now().timestamp();
        let end = start + valid_seconds;
        let key_time = format!("{};{}", start, end);
        let signature = self.signature_for(object_path, &key_time);

        SignedLink {
            key_time,
            signature,
        }
    }

    /// Check a presented signature against `object_path` and its window
    pub fn verify(&self, object_path: &str, key_time: &str, signature: &str) -> bool {
        let Some((start, end)) = parse_key_time(key_time) else {
            return false;
        };

        let now = Utc::now().timestamp();
        if now < start || now > end {
            return false;
        }

        self.signature_for(object_path, key_time) == signature
    }

    fn signature_for(&self, object_path: &str, key_time: &str) -> String {
        let sign_key = hmac_hex(&self.secret, key_time);
        let string_to_sign = [
            "sha1".to_string(),
            key_time.to_string(),
            sha1_hex(&format!("get\n{}\n", object_path)),
        ]
        .join("\n")
            + "\n";
        hmac_hex(&sign_key, &string_to_sign)
    }
}

fn parse_key_time(key_time: &str) -> Option<(i64, i64)> {
    let (start, end) = key_time.split_once(';')?;
    let start: i64 = start.parse().ok()?;
    let end: i64 = end.parse().ok()?;
    if end < start {
        return None;
    }
    Some((start, end))
}

fn hmac_hex(key: &str, data: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    let result = mac.finalize();
    hex_encode(&result.into_bytes())
}

fn sha1_hex(data: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|x| format!("{:02x}", x))
        .collect::<Vec<String>>()
        .join("")
}
