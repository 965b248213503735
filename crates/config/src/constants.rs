//! Centralized constants for the voice relay
//!
//! Single source of truth for defaults used by settings, the speech
//! pipeline and the server.

/// HTTP server defaults
pub mod server {
    /// Port the relay listens on unless `PORT` or settings override it
    pub const DEFAULT_PORT: u16 = 8888;

    /// Loopback only: the relay serves a single local user
    pub const DEFAULT_HOST: &str = "127.0.0.1";

    /// The only origin allowed by CORS
    pub const CORS_ORIGIN: &str = "http://localhost";
}

/// Fixed-window rate limiting
pub mod rate_limit {
    /// Requests allowed per identity per window
    pub const MAX_REQUESTS: u32 = 10;

    /// Window length in milliseconds
    pub const WINDOW_MS: u64 = 60_000;

    /// How often stale identities are evicted
    pub const SWEEP_INTERVAL_SECS: u64 = 300;

    /// Header carrying the originating address
    pub const IDENTITY_HEADER: &str = "x-forwarded-for";

    /// Shared identity for callers without the header
    pub const FALLBACK_IDENTITY: &str = "localhost";
}

/// ElevenLabs text-to-speech
pub mod elevenlabs {
    pub const API_BASE_URL: &str = "https://api.elevenlabs.io";

    /// Monolingual English model, cheapest per character
    pub const MODEL_ID: &str = "eleven_monolingual_v1";

    pub const DEFAULT_VOICE_ID: &str = "s3TPKV1kjDlVtZbl4Ksh";

    /// Lower stability and similarity use fewer credits
    pub const STABILITY: f32 = 0.35;
    pub const SIMILARITY_BOOST: f32 = 0.35;

    /// Legacy environment variables read as defaults
    pub const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";
    pub const VOICE_ID_ENV: &str = "ELEVENLABS_VOICE_ID";
}

/// Text shortening before it is sent to the provider
pub mod truncation {
    /// Fraction of the original length kept
    pub const FACTOR: f64 = 0.7;

    /// Lower clamp for the kept length, in characters
    pub const MIN_CHARS: usize = 30;

    /// Upper clamp for the kept length, in characters
    pub const MAX_CHARS: usize = 100;

    /// Appended when text is cut
    pub const ELLIPSIS: &str = "...";
}

/// Provider usage estimate: about 1.1 credits per character
pub const COST_PER_CHAR: f64 = 1.1;
