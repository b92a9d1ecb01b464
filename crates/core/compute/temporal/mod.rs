//! Calendar-aware lookups: exact-hour point queries and hourly or daily
//! range queries.

pub mod predicate;
mod resolver;

pub use predicate::HourPredicate;
pub use resolver::Resolver;
