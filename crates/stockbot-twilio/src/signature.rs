// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `X-Twilio-Signature` computation and verification.
//!
//! The signed string is the full webhook URL followed by every POST
//! parameter as `key + value`, sorted by key. The signature is the base64
//! HMAC-SHA1 of that string keyed with the account auth token.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

pub const SIGNATURE_HEADER: &str = "x-twilio-signature";

type HmacSha1 = Hmac<Sha1>;

fn signed_payload(url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();
    let mut data = url.to_string();
    for (key, value) in sorted {
        data.push_str(key);
        data.push_str(value);
    }
    data
}

fn mac_for(auth_token: &str, url: &str, params: &[(String, String)]) -> Option<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(signed_payload(url, params).as_bytes());
    Some(mac)
}

/// Expected signature for a request, base64 encoded.
pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> Option<String> {
    mac_for(auth_token, url, params).map(|mac| STANDARD.encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a received signature.
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    signature: &str,
) -> bool {
    let Ok(received) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    mac_for(auth_token, url, params).is_some_and(|mac| mac.verify_slice(&received).is_ok())
}
