//! API constants

/// Prefix of the clip endpoints
pub const CLIPS_PATH: &str = "/api/clips";

/// Where the OpenAPI document is served
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Default page size for clip listings
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Largest page size a client may request
pub const MAX_PAGE_LIMIT: i64 = 100;
