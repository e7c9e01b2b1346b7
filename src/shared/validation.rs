use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating attachment MIME types in `type/subtype` form
    /// - Valid: "image/jpeg", "video/mp4", "audio/x-wav", "image/svg+xml"
    /// - Invalid: "image", "Image/JPEG", "image/", "/jpeg", "image/jpeg; q=1"
    pub static ref MIME_TYPE_REGEX: Regex = Regex::new(r"^[a-z]+/[a-z0-9\-\+\.]+$").unwrap();
}
