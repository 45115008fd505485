use super::lexorank::RankError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three ordering namespaces a rank lives in
///
/// Ranks from different buckets are not comparable with each other. Moving a
/// whole list to the next bucket lets an application renumber it without
/// ever holding two interleaved generations in the same namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Bucket {
    #[default]
    Zero,
    One,
    Two,
}

impl Bucket {
    /// All buckets in rotation order
    pub const ALL: [Bucket; 3] = [Bucket::Zero, Bucket::One, Bucket::Two];

    pub fn as_char(self) -> char {
        match self {
            Bucket::Zero => '0',
            Bucket::One => '1',
            Bucket::Two => '2',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Zero => "0",
            Bucket::One => "1",
            Bucket::Two => "2",
        }
    }

    /// Returns the following bucket, wrapping from 2 back to 0
    pub fn next(self) -> Self {
        match self {
            Bucket::Zero => Bucket::One,
            Bucket::One => Bucket::Two,
            Bucket::Two => Bucket::Zero,
        }
    }

    /// Returns the preceding bucket, wrapping from 0 back to 2
    pub fn prev(self) -> Self {
        match self {
            Bucket::Zero => Bucket::Two,
            Bucket::One => Bucket::Zero,
            Bucket::Two => Bucket::One,
        }
    }
}

impl TryFrom<char> for Bucket {
    type Error = RankError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '0' => Ok(Bucket::Zero),
            '1' => Ok(Bucket::One),
            '2' => Ok(Bucket::Two),
            _ => Err(RankError::InvalidBucket(c.to_string())),
        }
    }
}

impl FromStr for Bucket {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Bucket::try_from(c).map_err(|_| RankError::InvalidBucket(s.to_string()))
            }
            _ => Err(RankError::InvalidBucket(s.to_string())),
        }
    }
}

impl TryFrom<String> for Bucket {
    type Error = RankError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Bucket> for String {
    fn from(bucket: Bucket) -> Self {
        bucket.as_str().to_string()
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the bucket following the textual bucket `bucket`
pub fn next_bucket(bucket: &str) -> Result<Bucket, RankError> {
    Ok(bucket.parse::<Bucket>()?.next())
}

/// Returns the bucket preceding the textual bucket `bucket`
pub fn prev_bucket(bucket: &str) -> Result<Bucket, RankError> {
    Ok(bucket.parse::<Bucket>()?.prev())
}
