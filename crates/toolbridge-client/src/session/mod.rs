//! Protocol-session reuse across client instances.

mod cache;
mod clock;
mod key;

pub use cache::{CachedSession, SESSION_TTL, SessionCache, SessionCacheStats};
pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{FINGERPRINT_LEN, auth_fingerprint, derive_cache_key};
