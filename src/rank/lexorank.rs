use super::parsers;
use super::Bucket;
use crate::digits;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors returned when building or combining ranks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    #[error("invalid rank value \"{0}\"")]
    InvalidValue(String),
    #[error("invalid rank bucket \"{0}\"")]
    InvalidBucket(String),
    #[error("invalid rank string \"{0}\"")]
    MalformedRankString(String),
    #[error("rank buckets must be the same: {before} and {after}")]
    BucketMismatch { before: String, after: String },
    #[error("{before} is not less than {after}")]
    OrderingViolation { before: String, after: String },
    #[error("at least one bound is required")]
    MissingBound,
    #[error("rank value \"{0}\" has no predecessor")]
    Unrepresentable(String),
}

/// A position in a user-ordered list
///
/// A rank is made of a [`Bucket`] and a base-36 value. Within a bucket, ranks
/// are ordered by comparing their values digit by digit, a value that is a
/// prefix of another one sorting first. Because the value alphabet is sorted
/// in byte order, the canonical `bucket|value` strings can be stored and
/// sorted as plain text.
///
/// A new rank can always be generated between two existing ones without
/// touching any other rank:
///
/// ```rust
/// use lexorank::LexoRank;
///
/// let first: LexoRank = "0|1".parse().unwrap();
/// let second: LexoRank = "0|2".parse().unwrap();
///
/// let middle = LexoRank::between(Some(&first), Some(&second)).unwrap();
/// assert_eq!(middle.to_string(), "0|11");
/// assert!(first < middle && middle < second);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LexoRank {
    value: String,
    bucket: Bucket,
}

/// Either a rank or its textual representation
///
/// Operations taking another rank accept both forms, text being parsed on
/// the fly.
#[derive(Debug, Clone, Copy)]
pub enum RankRef<'a> {
    Rank(&'a LexoRank),
    Text(&'a str),
}

impl<'a> RankRef<'a> {
    /// Get the referenced rank, parsing it if needed
    pub fn resolve(self) -> Result<Cow<'a, LexoRank>, RankError> {
        match self {
            RankRef::Rank(r) => Ok(Cow::Borrowed(r)),
            RankRef::Text(s) => s.parse().map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a LexoRank> for RankRef<'a> {
    fn from(r: &'a LexoRank) -> Self {
        RankRef::Rank(r)
    }
}

impl<'a> From<&'a str> for RankRef<'a> {
    fn from(s: &'a str) -> Self {
        RankRef::Text(s)
    }
}

impl<'a> From<&'a String> for RankRef<'a> {
    fn from(s: &'a String) -> Self {
        RankRef::Text(s.as_str())
    }
}

/// Compare two rank values digit by digit, the longer value winning when one
/// is a prefix of the other
fn cmp_values(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());

    for idx in 0..a.len().max(b.len()) {
        match (a.get(idx), b.get(idx)) {
            (Some(ca), Some(cb)) if ca != cb => return ca.cmp(cb),
            (Some(_), Some(_)) => continue,
            (None, _) => return Ordering::Less,
            (_, None) => return Ordering::Greater,
        }
    }

    Ordering::Equal
}

impl LexoRank {
    /// Create a rank from a value and a textual bucket
    pub fn new(value: impl Into<String>, bucket: &str) -> Result<Self, RankError> {
        let value = value.into();
        Self::validate_value(&value)?;
        let bucket = bucket.parse()?;

        Ok(Self { value, bucket })
    }

    /// Create a rank from a value in the given bucket
    pub fn with_bucket(value: impl Into<String>, bucket: Bucket) -> Result<Self, RankError> {
        let value = value.into();
        Self::validate_value(&value)?;

        Ok(Self { value, bucket })
    }

    /// Create a rank from a value in the default bucket
    pub fn from_value(value: impl Into<String>) -> Result<Self, RankError> {
        Self::with_bucket(value, Bucket::default())
    }

    /// Parse a rank from its canonical `bucket|value` representation
    pub fn parse(s: &str) -> Result<Self, RankError> {
        s.parse()
    }

    /// Get an owned rank from either a rank or its textual representation
    pub fn from_any<'a>(source: impl Into<RankRef<'a>>) -> Result<Self, RankError> {
        let source: RankRef = source.into();
        source.resolve().map(Cow::into_owned)
    }

    fn validate_value(value: &str) -> Result<(), RankError> {
        if digits::is_valid_value(value) {
            Ok(())
        } else {
            Err(RankError::InvalidValue(value.to_string()))
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    /// Returns whether this rank sorts strictly before `other`
    ///
    /// Buckets are not taken into account.
    pub fn less_than<'a>(&self, other: impl Into<RankRef<'a>>) -> Result<bool, RankError> {
        let other: RankRef = other.into();
        let other = other.resolve()?;
        Ok(self.is_before(&other))
    }

    fn is_before(&self, other: &LexoRank) -> bool {
        cmp_values(&self.value, &other.value) == Ordering::Less
    }

    /// Returns the smallest rank following this one that has the same length
    /// or, if the value only contains `z`s, the value followed by `1`
    pub fn increment(&self) -> LexoRank {
        let bumped = self
            .value
            .char_indices()
            .rev()
            .find_map(|(idx, c)| digits::succ(c).map(|next| (idx, next)));

        let value = match bumped {
            Some((idx, next)) => {
                let mut value = self.value[..idx].to_string();
                value.push(next);
                value
            }
            None => format!("{}1", self.value),
        };

        LexoRank {
            value,
            bucket: self.bucket,
        }
    }

    /// Returns a rank sorting before this one
    ///
    /// The first significant digit is lowered and the rest of the value is
    /// dropped. A leading `1` cannot be lowered without producing a trailing
    /// `0` so a `0` is prepended to the prefix ending with it instead.
    pub fn decrement(&self) -> Result<LexoRank, RankError> {
        let unrepresentable = || RankError::Unrepresentable(self.value.clone());

        let (idx, c) = self
            .value
            .char_indices()
            .find(|&(_, c)| c != digits::MIN_DIGIT)
            .ok_or_else(unrepresentable)?;

        let value = match digits::pred(c) {
            Some(digits::MIN_DIGIT) => format!("{}{}", digits::MIN_DIGIT, &self.value[..=idx]),
            Some(prev) => format!("{}{}", &self.value[..idx], prev),
            None => return Err(unrepresentable()),
        };

        Ok(LexoRank {
            value,
            bucket: self.bucket,
        })
    }

    fn append(&self, suffix: &str) -> LexoRank {
        LexoRank {
            value: format!("{}{}", self.value, suffix),
            bucket: self.bucket,
        }
    }

    /// Compute a rank sorting strictly between `before` and `after`
    ///
    /// When `after` is missing, the result is `before` incremented. When
    /// `before` is missing, it is `after` decremented. Bounds can be given as
    /// ranks or as strings:
    ///
    /// ```rust
    /// use lexorank::LexoRank;
    ///
    /// let r = LexoRank::between(Some("1|1"), Some("1|2")).unwrap();
    /// assert_eq!(r.to_string(), "1|11");
    ///
    /// let last = LexoRank::between(Some("0|z"), None::<&str>).unwrap();
    /// assert_eq!(last.to_string(), "0|z1");
    /// ```
    pub fn between<'a, 'b, A, B>(before: Option<A>, after: Option<B>) -> Result<LexoRank, RankError>
    where
        A: Into<RankRef<'a>>,
        B: Into<RankRef<'b>>,
    {
        let before = before.map(|r| RankRef::resolve(r.into())).transpose()?;
        let after = after.map(|r| RankRef::resolve(r.into())).transpose()?;

        match (before, after) {
            (None, None) => Err(RankError::MissingBound),
            (None, Some(after)) => after.decrement(),
            (Some(before), None) => Ok(before.increment()),
            (Some(before), Some(after)) => Self::between_bounds(&before, &after),
        }
    }

    fn between_bounds(before: &LexoRank, after: &LexoRank) -> Result<LexoRank, RankError> {
        if before.bucket != after.bucket {
            return Err(RankError::BucketMismatch {
                before: before.to_string(),
                after: after.to_string(),
            });
        }

        if !before.is_before(after) {
            return Err(RankError::OrderingViolation {
                before: before.value.clone(),
                after: after.value.clone(),
            });
        }

        let incremented = before.increment();
        if incremented.is_before(after) {
            return Ok(incremented);
        }

        debug!(
            "no room between {} and {} at length {}, extending",
            before,
            after,
            before.value.len()
        );

        // before < after guarantees that some amount of padding fits
        let mut padding = String::from("1");
        loop {
            let candidate = before.append(&padding);
            if candidate.is_before(after) {
                return Ok(candidate);
            }
            padding.insert(0, digits::MIN_DIGIT);
            trace!("widening padding after {} to {}", before, padding);
        }
    }

    /// Generate `count` increasing ranks between two optional bounds
    ///
    /// Each rank is inserted right after the previous one, as happens when
    /// appending items one at a time.
    pub fn spread(
        before: Option<&LexoRank>,
        after: Option<&LexoRank>,
        count: usize,
    ) -> Result<Vec<LexoRank>, RankError> {
        let mut ranks: Vec<LexoRank> = Vec::with_capacity(count);

        for _ in 0..count {
            let prev = ranks.last().or(before);
            let next = Self::between(prev, after)?;
            ranks.push(next);
        }

        Ok(ranks)
    }

    /// Returns an endless iterator over the successive increments of this rank
    pub fn successors(&self) -> impl Iterator<Item = LexoRank> {
        std::iter::successors(Some(self.increment()), |r| Some(r.increment()))
    }

    /// Returns the same value in another bucket
    pub fn in_bucket(&self, bucket: Bucket) -> LexoRank {
        LexoRank {
            value: self.value.clone(),
            bucket,
        }
    }

    /// Returns the same value in the next bucket
    pub fn next_bucket(&self) -> LexoRank {
        self.in_bucket(self.bucket.next())
    }

    /// Returns the same value in the previous bucket
    pub fn prev_bucket(&self) -> LexoRank {
        self.in_bucket(self.bucket.prev())
    }
}

impl PartialOrd for LexoRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LexoRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bucket
            .cmp(&other.bucket)
            .then_with(|| cmp_values(&self.value, &other.value))
    }
}

impl FromStr for LexoRank {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bucket, value) = parsers::parse_rank(s)?;
        Self::with_bucket(value, bucket)
    }
}

impl TryFrom<&str> for LexoRank {
    type Error = RankError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for LexoRank {
    type Error = RankError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LexoRank> for String {
    fn from(r: LexoRank) -> Self {
        r.to_string()
    }
}

impl fmt::Display for LexoRank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}|{}", self.bucket, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(value: &str, bucket: &str) -> LexoRank {
        LexoRank::new(value, bucket).unwrap()
    }

    fn between(a: &str, b: &str) -> Result<String, RankError> {
        LexoRank::between(Some(a), Some(b)).map(|r| r.to_string())
    }

    #[test]
    fn test_invalid_construction() {
        assert_eq!(
            LexoRank::new("0", "0"),
            Err(RankError::InvalidValue("0".to_string()))
        );
        assert!(matches!(
            LexoRank::new("a90", "1"),
            Err(RankError::InvalidValue(_))
        ));
        assert!(matches!(
            LexoRank::from_value("12A"),
            Err(RankError::InvalidValue(_))
        ));
        assert!(matches!(
            LexoRank::from_value(""),
            Err(RankError::InvalidValue(_))
        ));
        assert_eq!(
            LexoRank::new("22a", "3"),
            Err(RankError::InvalidBucket("3".to_string()))
        );
        assert!(matches!(
            LexoRank::new("22a", "01"),
            Err(RankError::InvalidBucket(_))
        ));
        // value is checked first
        assert!(matches!(
            LexoRank::new("220", "3"),
            Err(RankError::InvalidValue(_))
        ));

        for invalid in ["13b", "0|C", "1|12A", "4|12a"] {
            assert_eq!(
                LexoRank::parse(invalid),
                Err(RankError::MalformedRankString(invalid.to_string()))
            );
        }
    }

    #[test]
    fn test_valid_construction() {
        assert_eq!(LexoRank::from_value("01").unwrap().to_string(), "0|01");
        assert_eq!(LexoRank::from_value("12a").unwrap().to_string(), "0|12a");
        assert_eq!(LexoRank::parse("0|c").unwrap(), rank("c", "0"));

        let r: LexoRank = "1|a909".parse().unwrap();
        assert_eq!(r.value(), "a909");
        assert_eq!(r.bucket(), Bucket::One);
        assert_eq!(LexoRank::parse(&r.to_string()).unwrap(), r);
    }

    #[test]
    fn test_from_any() {
        let r = rank("a909", "1");
        assert_eq!(LexoRank::from_any(&r).unwrap(), r);
        assert_eq!(LexoRank::from_any("1|a909").unwrap(), r);
        assert_eq!(LexoRank::from_any(&"1|a909".to_string()).unwrap(), r);
        assert!(LexoRank::from_any("a909").is_err());
    }

    #[test]
    fn test_less_than_single_chars() {
        let lt = |a: &str, b: &str| LexoRank::from_value(a).unwrap().less_than(b).unwrap();

        assert!(lt("1", "2|9"));
        assert!(!lt("8", "1|2"));
        assert!(!lt("8", "0|8"));
        assert!(lt("a", "0|z"));
        assert!(!lt("w", "0|d"));
        assert!(!lt("w", "0|w"));
        assert!(lt("9", "0|a"));
        assert!(!lt("c", "0|5"));
    }

    #[test]
    fn test_less_than_multiple_chars() {
        let a = rank("1324", "0");
        assert!(!a.less_than(&rank("1322", "2")).unwrap());
        assert!(!rank("1322", "0").less_than(&rank("1322", "0")).unwrap());
        assert!(rank("1a22", "0").less_than(&rank("1b22", "0")).unwrap());
        assert!(rank("1522", "0").less_than(&rank("1b11", "0")).unwrap());
        assert!(rank("z4", "0").less_than(&rank("z41", "0")).unwrap());
        assert!(!rank("z41", "0").less_than(&rank("z4", "0")).unwrap());
        assert!(rank("z", "0").less_than("0|z01").unwrap());

        assert!(matches!(
            a.less_than("1324"),
            Err(RankError::MalformedRankString(_))
        ));
    }

    #[test]
    fn test_ord() {
        let mut ranks: Vec<LexoRank> = ["1|1", "0|z", "0|1", "0|11", "2|0001", "0|01"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ranks.sort();

        assert_eq!(
            ranks.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            vec!["0|01", "0|1", "0|11", "0|z", "1|1", "2|0001"]
        );
    }

    #[test]
    fn test_increment_single_char() {
        let inc = |s: &str| LexoRank::parse(s).unwrap().increment().to_string();

        assert_eq!(LexoRank::from_value("1").unwrap().increment().to_string(), "0|2");
        assert_eq!(inc("1|8"), "1|9");
        assert_eq!(inc("0|9"), "0|a");
        assert_eq!(inc("2|a"), "2|b");
        assert_eq!(inc("2|y"), "2|z");
        assert_eq!(inc("0|z"), "0|z1");
    }

    #[test]
    fn test_increment_multiple_chars() {
        let inc = |s: &str| LexoRank::parse(s).unwrap().increment().to_string();

        assert_eq!(inc("2|11"), "2|12");
        assert_eq!(inc("0|2b"), "0|2c");
        assert_eq!(inc("2|109"), "2|10a");
        assert_eq!(inc("1|abz"), "1|ac");
        assert_eq!(inc("0|yzz"), "0|z");
        assert_eq!(inc("0|y2wzz"), "0|y2x");
        assert_eq!(inc("1|zzz"), "1|zzz1");
    }

    /// Every canonical value of one or two digits
    fn short_ranks() -> Vec<LexoRank> {
        let alphabet = || digits::ALPHABET.iter().map(|&d| char::from(d));
        let significant = || alphabet().filter(|&d| d != digits::MIN_DIGIT);

        significant()
            .map(String::from)
            .chain(alphabet().flat_map(|first| {
                significant().map(move |last| format!("{first}{last}"))
            }))
            .map(|value| LexoRank::from_value(value).unwrap())
            .collect()
    }

    #[test]
    fn test_increment_is_tightest() {
        let ranks = short_ranks();
        assert_eq!(ranks.len(), 35 + 36 * 35);

        for rank in &ranks {
            let next = rank.increment();
            for candidate in ranks
                .iter()
                .filter(|c| c.value().len() <= next.value().len())
            {
                assert!(
                    !(rank < candidate && candidate < &next),
                    "{candidate} sorts between {rank} and {next}"
                );
            }
        }
    }

    #[test]
    fn test_decrement() {
        let dec = |s: &str| LexoRank::parse(s).unwrap().decrement().unwrap().to_string();

        assert_eq!(dec("0|2"), "0|1");
        assert_eq!(dec("1|a"), "1|9");
        assert_eq!(dec("2|z"), "2|y");
        assert_eq!(dec("0|1"), "0|01");
        assert_eq!(dec("0|01"), "0|001");
        assert_eq!(dec("0|15"), "0|01");
        assert_eq!(dec("0|a5"), "0|9");
        assert_eq!(dec("0|00b3"), "0|00a");
        assert_eq!(dec("1|001z"), "1|0001");
    }

    #[test]
    fn test_decrement_unrepresentable() {
        let zeros = LexoRank {
            value: "000".to_string(),
            bucket: Bucket::Zero,
        };
        assert_eq!(
            zeros.decrement(),
            Err(RankError::Unrepresentable("000".to_string()))
        );
    }

    #[test]
    fn test_between_invalid_input() {
        match between("1|3", "1|1") {
            Err(e) => assert_eq!(e.to_string(), "3 is not less than 1"),
            r => panic!("Expected OrderingViolation, got {r:?}"),
        }
        match between("1|3a", "1|34") {
            Err(e) => assert_eq!(e.to_string(), "3a is not less than 34"),
            r => panic!("Expected OrderingViolation, got {r:?}"),
        }
        assert_eq!(
            between("1|z4", "1|z4"),
            Err(RankError::OrderingViolation {
                before: "z4".to_string(),
                after: "z4".to_string()
            })
        );

        assert!(matches!(
            between("1|z4", "2|z4"),
            Err(RankError::BucketMismatch { .. })
        ));
        assert!(matches!(
            LexoRank::between(Some(&rank("a", "0")), Some("2|z4")),
            Err(RankError::BucketMismatch { .. })
        ));

        assert_eq!(
            LexoRank::between(None::<&str>, None::<&str>),
            Err(RankError::MissingBound)
        );
        assert!(matches!(
            between("1|1", "1|20"),
            Err(RankError::MalformedRankString(_))
        ));
    }

    #[test]
    fn test_between_single_char() {
        assert_eq!(between("0|1", "0|3").unwrap(), "0|2");
        assert_eq!(between("1|1", "1|9").unwrap(), "1|2");
        assert_eq!(between("1|9", "1|c").unwrap(), "1|a");
        assert_eq!(
            LexoRank::between(Some(&rank("a", "2")), Some("2|z"))
                .unwrap()
                .to_string(),
            "2|b"
        );
        assert_eq!(
            LexoRank::between(Some("1|1"), Some(&rank("2", "1")))
                .unwrap()
                .to_string(),
            "1|11"
        );
        assert_eq!(
            LexoRank::between(Some(&rank("a", "0")), Some(&rank("b", "0")))
                .unwrap()
                .to_string(),
            "0|a1"
        );
    }

    #[test]
    fn test_between_multiple_chars() {
        assert_eq!(between("1|12", "1|1a").unwrap(), "1|13");
        assert_eq!(between("0|101", "0|123").unwrap(), "0|102");
        assert_eq!(between("0|11", "0|12").unwrap(), "0|111");
        assert_eq!(between("2|az", "2|b").unwrap(), "2|az1");
        assert_eq!(between("1|1a1", "1|1a11").unwrap(), "1|1a101");
        assert_eq!(
            LexoRank::between(Some("0|z4"), Some(&rank("z41", "0")))
                .unwrap()
                .to_string(),
            "0|z401"
        );
        assert_eq!(
            LexoRank::between(Some(&rank("z4", "2")), Some("2|z401"))
                .unwrap()
                .to_string(),
            "2|z4001"
        );
        assert_eq!(
            LexoRank::between(Some(&rank("z401", "2")), Some(&rank("z40100001", "2")))
                .unwrap()
                .to_string(),
            "2|z401000001"
        );
    }

    #[test]
    fn test_between_open_bounds() {
        let r = rank("y2wzz", "1");
        assert_eq!(
            LexoRank::between(Some(&r), None::<&str>).unwrap(),
            r.increment()
        );
        assert_eq!(
            LexoRank::between(None::<&str>, Some(&r)).unwrap(),
            r.decrement().unwrap()
        );
        assert_eq!(
            LexoRank::between(None::<&str>, Some("0|1")).unwrap().to_string(),
            "0|01"
        );
    }

    #[test]
    fn test_spread() {
        let before = rank("1", "0");
        let after = rank("2", "0");
        let ranks = LexoRank::spread(Some(&before), Some(&after), 3).unwrap();
        assert_eq!(
            ranks.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            vec!["0|11", "0|12", "0|13"]
        );

        let ranks = LexoRank::spread(None, Some(&after), 3).unwrap();
        assert_eq!(
            ranks.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            vec!["0|1", "0|11", "0|12"]
        );

        let ranks = LexoRank::spread(Some(&rank("y", "1")), None, 3).unwrap();
        assert_eq!(
            ranks.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            vec!["1|z", "1|z1", "1|z2"]
        );

        assert!(LexoRank::spread(None, None, 0).unwrap().is_empty());
        assert_eq!(LexoRank::spread(None, None, 1), Err(RankError::MissingBound));
    }

    #[test]
    fn test_successors() {
        let r = rank("zy", "0");
        assert_eq!(
            r.successors()
                .take(3)
                .map(|r| r.to_string())
                .collect::<Vec<_>>(),
            vec!["0|zz", "0|zz1", "0|zz2"]
        );
    }

    #[test]
    fn test_bucket_rotation() {
        let r = rank("abc", "2");
        assert_eq!(r.next_bucket().to_string(), "0|abc");
        assert_eq!(r.prev_bucket().to_string(), "1|abc");
        assert_eq!(r.in_bucket(Bucket::Two), r);
    }

    #[test]
    fn test_serde() {
        let r = rank("a909", "1");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"1|a909\"");
        assert_eq!(serde_json::from_str::<LexoRank>(&json).unwrap(), r);
        assert!(serde_json::from_str::<LexoRank>("\"1|a90\"").is_err());
    }
}
