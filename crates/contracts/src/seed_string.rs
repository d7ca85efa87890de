//! Seeds travel as JSON strings so browsers never round them through `f64`.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(seed: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(seed)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SeedInput {
        Text(String),
        Number(u64),
    }

    match SeedInput::deserialize(deserializer)? {
        SeedInput::Text(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|err| D::Error::custom(format!("invalid seed {raw:?}: {err}"))),
        SeedInput::Number(seed) => Ok(seed),
    }
}
