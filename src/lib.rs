#![doc = include_str!("../README.md")]
pub mod digits;
mod rank;

pub use rank::next_bucket;
pub use rank::prev_bucket;
pub use rank::Bucket;
pub use rank::ConfigurationError;
pub use rank::LexoRank;
pub use rank::RankError;
pub use rank::RankRef;
pub use rank::Settings;
