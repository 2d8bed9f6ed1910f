/// Version reported by the health endpoint
pub const API_VERSION: &str = "1.0.0";

/// Lifetime of an issued identity token (7 days)
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Minimum length of a signing secret outside development
pub const MIN_SECRET_LEN: usize = 32;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Display name stored for anonymous comments
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Stage label given to ideas created without one
pub const DEFAULT_IDEA_STATUS: &str = "ideation";

/// Default and maximum size of the activity feed
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 10;
pub const MAX_ACTIVITY_LIMIT: u32 = 100;

/// Progress bounds (inclusive)
pub const MIN_PROGRESS: i64 = 0;
pub const MAX_PROGRESS: i64 = 100;

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Rate limit: requests allowed per window, and the window length
pub const RATE_LIMIT_MAX: u32 = 100;
pub const RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
