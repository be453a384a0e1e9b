//! Application Configuration
//!
//! Configuration for the challenge gate application layer.

use crate::domain::value_objects::{Level, Pin};
use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Challenge gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Per-level PIN secrets, levels 0 through 3
    pub pins: [Pin; 4],
    /// Random bytes per challenge token (rendered as twice as many hex chars)
    pub token_bytes_len: usize,
    /// Random bytes per session identifier
    pub session_id_bytes_len: usize,
    /// Cookie name carrying the session identifier
    pub session_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            pins: std::array::from_fn(|_| Pin::new("0000")),
            token_bytes_len: 10,
            session_id_bytes_len: 10,
            session_cookie_name: "session_id".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl GateConfig {
    /// Config with random per-level PINs, so no artifact ships a solution
    pub fn with_random_pins() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        Self {
            pins: std::array::from_fn(|_| {
                Pin::new(format!("{:04}", rng.random_range(0..10_000u16)))
            }),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, random PINs)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_pins()
        }
    }

    /// The PIN secret guarding a level
    pub fn pin(&self, level: Level) -> &Pin {
        &self.pins[level.index()]
    }

    /// Rendered token length in characters
    pub fn token_len(&self) -> usize {
        self.token_bytes_len * 2
    }

    /// Rendered session identifier length in characters.
    /// A presented cookie of any other length is treated as absent.
    pub fn session_id_len(&self) -> usize {
        self.session_id_bytes_len * 2
    }

    /// Cookie settings for the session identifier
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}
