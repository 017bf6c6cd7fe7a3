use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::text_utils::parse_date_time;

/// A front matter date. YAML has no native timestamp in serde_yaml, so the value arrives as a string.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PublishDate(pub DateTime<FixedOffset>);

impl<'de> Deserialize<'de> for PublishDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let value = String::deserialize(deserializer)?;
        let date = PublishDate::from_str(&value).map_err(Error::custom)?;
        Ok(date)
    }
}

impl Serialize for PublishDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl FromStr for PublishDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(parse_date_time(s)?))
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    pub struct Dates {
        pub created: PublishDate,
    }

    #[test]
    fn test_date_from_yaml() {
        let yaml_str = "created: 2024-04-22\n";
        let dates: Dates = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(dates.created.0.date_naive(), NaiveDate::from_ymd_opt(2024, 04, 22).unwrap());
        assert_eq!(dates.created.0.hour(), 0);
    }

    #[test]
    fn test_spaced_offset_from_yaml() {
        let dates: Dates = serde_yaml::from_str("created: 2024-05-01 09:30:00 +02:00\n").unwrap();
        assert_eq!(dates.created.0.hour(), 9);
        assert_eq!(dates.created.to_string(), "2024-05-01T09:30:00+02:00");
    }

    #[test]
    fn test_display_round_trip() {
        let date = PublishDate::from_str("2024-04-22 18:30:05.250").unwrap();
        assert_eq!(date.to_string(), "2024-04-22T18:30:05.250+00:00");
        assert_eq!(PublishDate::from_str(&date.to_string()).unwrap(), date);
    }
}
