//! Shared constants used across the application.

/// User agent string used for browser sessions and media downloads.
pub const ARCHIVAL_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upper bound on carousel advances for a single post.
pub const MAX_ITERATIONS: usize = 10;

/// Pretty-printed manifest filename inside the output directory.
pub const MANIFEST_FILENAME: &str = "instagram-posts.json";

/// Minified manifest filename inside the output directory.
pub const MANIFEST_MIN_FILENAME: &str = "instagram-posts.min.json";

/// Extension given to every stored media artifact.
pub const MEDIA_EXTENSION: &str = "jpg";
