// src/security/mod.rs

use secrecy::{ExposeSecret, Secret};
use tracing::warn;

/// Constant-time string comparison to prevent timing attacks.
pub fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }
    result == 0
}

/// Verifies the shared secret carried by heartbeats.
pub struct PulseAuthenticator {
    secret: Option<Secret<String>>,
}

impl PulseAuthenticator {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.map(Secret::new),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// `false` for every input when no secret is configured.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.secret {
            Some(expected) => secure_compare(provided, expected.expose_secret()),
            None => {
                warn!("Heartbeat rejected: no secret configured");
                false
            }
        }
    }
}

impl std::fmt::Debug for PulseAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulseAuthenticator")
            .field("configured", &self.is_configured())
            .finish()
    }
}
