//! Index timestamps travel as epoch milliseconds. Older snapshots carry RFC 3339 strings instead,
//! so both are accepted on the way in.

use serde::{Deserialize, Deserializer, Serializer};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
	Millis(i64),
	Float(f64),
	Text(String),
}

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_i64(to_millis(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = RawTimestamp::deserialize(deserializer)?;

	from_raw(raw).map_err(serde::de::Error::custom)
}

pub fn to_millis(value: OffsetDateTime) -> i64 {
	(value.unix_timestamp_nanos() / 1_000_000) as i64
}

pub fn from_millis(millis: i64) -> Option<OffsetDateTime> {
	OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).ok()
}

pub mod option {
	use serde::{Deserialize as _, Deserializer, Serializer};
	use time::OffsetDateTime;

	use super::RawTimestamp;

	pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(value) => super::serialize(value, serializer),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = Option::<RawTimestamp>::deserialize(deserializer)?;

		match raw {
			Some(raw) => super::from_raw(raw).map(Some).map_err(serde::de::Error::custom),
			None => Ok(None),
		}
	}
}

fn from_raw(raw: RawTimestamp) -> Result<OffsetDateTime, String> {
	match raw {
		RawTimestamp::Millis(millis) =>
			from_millis(millis).ok_or_else(|| format!("Timestamp {millis} is out of range.")),
		RawTimestamp::Float(millis) => from_millis(millis as i64)
			.ok_or_else(|| format!("Timestamp {millis} is out of range.")),
		RawTimestamp::Text(text) =>
			OffsetDateTime::parse(text.trim(), &Rfc3339).map_err(|err| err.to_string()),
	}
}
