//! Serde adapters for the backend's naive UTC timestamps and calendar dates.
//!
//! The backend writes `datetime.utcnow()` values without an offset, with or
//! without fractional seconds (`2024-03-01T09:15:00.123456`), and plain
//! `YYYY-MM-DD` dates. A trailing `Z` is tolerated on input.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

const DATETIME: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_datetime(raw: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    let trimmed = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix("+00:00"))
        .unwrap_or(raw);
    PrimitiveDateTime::parse(trimmed, DATETIME)
}

pub fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw, DATE)
}

pub fn format_date(date: Date) -> String {
    date.format(DATE).unwrap_or_else(|_| date.to_string())
}

pub mod naive_datetime {
    use super::*;

    pub fn serialize<S: Serializer>(value: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = value.format(DATETIME).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PrimitiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use super::super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<PrimitiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<PrimitiveDateTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|raw| parse_datetime(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}

pub mod calendar_date {
    use super::*;

    pub mod option {
        use super::super::*;

        pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(date) => serializer.serialize_str(&format_date(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|raw| parse_date(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}
