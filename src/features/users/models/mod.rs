mod user;

pub use user::{User, UserAgeBucket, UserRole};
