// Matcher module: scoring supplier items against the store catalog.

pub mod engine;
pub mod similarity;

pub use engine::{Matcher, MatchingEngine};
pub use similarity::BrandCleanCache;
