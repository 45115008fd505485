mod bucket;
mod config;
mod lexorank;
mod parsers;

pub use bucket::next_bucket;
pub use bucket::prev_bucket;
pub use bucket::Bucket;
pub use config::ConfigurationError;
pub use config::Settings;
pub use lexorank::LexoRank;
pub use lexorank::RankError;
pub use lexorank::RankRef;
