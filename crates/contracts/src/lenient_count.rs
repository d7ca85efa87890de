//! Non-negative whole counts read from documents that may carry any JSON number.
//! Fractions are floored and negatives clamp to zero.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountInput {
        Whole(u64),
        Signed(i64),
        Fractional(f64),
    }

    match CountInput::deserialize(deserializer)? {
        CountInput::Whole(count) => Ok(count),
        CountInput::Signed(count) => Ok(count.max(0) as u64),
        CountInput::Fractional(count) if count.is_finite() => Ok(count.max(0.0).floor() as u64),
        CountInput::Fractional(count) => Err(D::Error::custom(format!(
            "count must be a finite number, got {count}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Tally {
        #[serde(deserialize_with = "super::deserialize")]
        count: u64,
    }

    fn read(raw: &str) -> Result<u64, serde_json::Error> {
        serde_json::from_str::<Tally>(raw).map(|tally| tally.count)
    }

    #[test]
    fn any_json_number_becomes_a_whole_count() {
        assert_eq!(read(r#"{"count":42}"#).expect("integer"), 42);
        assert_eq!(read(r#"{"count":45231.5}"#).expect("fraction"), 45_231);
        assert_eq!(read(r#"{"count":-7}"#).expect("negative"), 0);
        assert_eq!(read(r#"{"count":-0.5}"#).expect("negative fraction"), 0);
        assert_eq!(read(&format!(r#"{{"count":{}}}"#, u64::MAX)).expect("large"), u64::MAX);
    }

    #[test]
    fn non_numbers_are_rejected() {
        assert!(read(r#"{"count":"12"}"#).is_err());
        assert!(read(r#"{"count":null}"#).is_err());
    }
}
