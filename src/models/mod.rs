// Domain records persisted as CSV collections

pub mod like;
pub mod post;
pub mod user;

pub use like::Like;
pub use post::Post;
pub use user::User;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Record kinds, one per persisted collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Post,
    Like,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Post => "post",
            RecordKind::Like => "like",
        }
    }
}

/// A row type stored in its own CSV file with a fixed header.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: RecordKind;
    const FILE_NAME: &'static str;
    /// Column order; must match the struct's field order.
    const HEADERS: &'static [&'static str];

    fn id(&self) -> i64;
}

/// Local wall-clock time at the precision the CSV files keep.
pub fn now() -> chrono::NaiveDateTime {
    use chrono::SubsecRound;
    chrono::Local::now().naive_local().trunc_subsecs(6)
}

/// Field codecs shared by the record types.
pub(crate) mod fields {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    /// ISO-8601 with microseconds, omitted when zero
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
    pub const TIMESTAMP_FORMAT_WHOLE_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let format = if ts.nanosecond() / 1_000 == 0 {
            TIMESTAMP_FORMAT_WHOLE_SECONDS
        } else {
            TIMESTAMP_FORMAT
        };
        serializer.collect_str(&ts.format(format))
    }

    pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse::<NaiveDateTime>()
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
    }

    /// Accepts `true`/`True`/`TRUE`; anything else is false.
    pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.trim().eq_ignore_ascii_case("true"))
    }

    /// Empty or non-numeric values map to `None`.
    pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| value.trim().parse::<i64>().ok()))
    }
}
