//! Default values shared across the configuration surface.

/// Token value shipped in operator templates; never a usable credential.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_STRAPI_API_TOKEN_HERE";
/// Default API base URL when none is supplied.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:1337";
/// Default upload interval in milliseconds.
pub const DEFAULT_UPLOAD_INTERVAL_MS: u64 = 500;
/// Default delete interval in milliseconds.
pub const DEFAULT_DELETE_INTERVAL_MS: u64 = 300;
/// Default folder/move interval in milliseconds.
pub const DEFAULT_ORGANIZE_INTERVAL_MS: u64 = 300;
/// Default purge interval in milliseconds.
pub const DEFAULT_PURGE_INTERVAL_MS: u64 = 200;
/// Root folder receiving files whose name mentions a logo.
pub const LOGOS_FOLDER: &str = "Logos";
/// Root folder receiving files whose name mentions a banner.
pub const BANNERS_FOLDER: &str = "Banners";
/// Root folder receiving everything without a more specific rule.
pub const GENERAL_FOLDER: &str = "General";
/// Root folder grouping the product buckets.
pub const PRODUCT_IMAGES_FOLDER: &str = "Product Images";
