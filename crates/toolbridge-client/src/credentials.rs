//! Encrypted credential storage seam.
//!
//! Credentials usually arrive encrypted at rest. The client does not own the
//! key material; the hosting application plugs in a [`CredentialStore`] that
//! turns an opaque blob into the plain credentials mapping.

use std::collections::HashMap;

use toolbridge_protocol::Result;

/// Decrypts stored credentials for a user.
pub trait CredentialStore: Send + Sync {
    /// Decrypt `blob` stored for `user_id` into a credentials mapping
    /// (`api_key`, `bearer_token`, `username`, ...).
    ///
    /// # Errors
    ///
    /// Implementations should return [`Error::Configuration`](toolbridge_protocol::Error::Configuration)
    /// when the blob cannot be decrypted.
    fn decrypt(&self, user_id: &str, blob: &[u8]) -> Result<HashMap<String, String>>;
}
