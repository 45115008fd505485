use super::lexorank::RankError;
use super::Bucket;
use crate::digits;
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, one_of},
    combinator::{all_consuming, map_res, verify},
    sequence::separated_pair,
    IResult,
};

fn bucket(i: &str) -> IResult<&str, Bucket> {
    map_res(one_of("012"), Bucket::try_from)(i)
}

fn value(i: &str) -> IResult<&str, &str> {
    verify(take_while1(digits::is_digit), |v: &str| {
        !v.ends_with(digits::MIN_DIGIT)
    })(i)
}

fn rank(i: &str) -> IResult<&str, (Bucket, &str)> {
    all_consuming(separated_pair(bucket, char('|'), value))(i)
}

/// Split a canonical `bucket|value` string into its components
pub(crate) fn parse_rank(i: &str) -> Result<(Bucket, &str), RankError> {
    rank(i)
        .map(|(_, r)| r)
        .map_err(|_| RankError::MalformedRankString(i.to_string()))
}
