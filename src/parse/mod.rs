//! Parsers for the request parts that carry structured parameters.
//!
//! Both parsers are pure and never fail: malformed pieces are skipped or kept
//! literally, the way browsers and common web frameworks treat them.

pub mod cookie;
pub mod query;

pub use self::cookie::parse_cookies;
pub use self::query::parse_query;
