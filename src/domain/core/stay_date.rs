use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use derive_more::{Display, Error, From};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// 宿泊日の書式（例: "Jan 02, 2025"）
pub const STAY_DATE_FORMAT: &str = "%b %d, %Y";

/// 宿泊日
///
/// 文字列としては常に `"Mon DD, YYYY"` の形でやり取りする。
/// 解析した入力を書式に戻したとき元の文字列と一致しないものは受け付けない。
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    From,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct StayDate(NaiveDate);

impl StayDate {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `other` までの日数（`other` が前なら負）
    pub fn days_until(&self, other: &StayDate) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }
}

impl FromStr for StayDate {
    type Err = StayDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, STAY_DATE_FORMAT)
            .map(StayDate)
            .map_err(|_| StayDateError::Malformed(s.to_owned()))?;
        // chrono accepts full month names, lowercase and single-digit days
        if date.to_string() != s {
            return Err(StayDateError::Malformed(s.to_owned()));
        }
        Ok(date)
    }
}

impl fmt::Display for StayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(STAY_DATE_FORMAT))
    }
}

/// 宿泊日エラー
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum StayDateError {
    /// 書式が不正です
    #[display(fmt = "Malformed date {:?}, expected e.g. \"Jan 02, 2025\"", _0)]
    Malformed(#[error(not(source))] String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> StayDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let parsed = date("Jan 02, 2025");
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(parsed.to_string(), "Jan 02, 2025");
        assert_eq!(date("Dec 29, 2077").to_string(), "Dec 29, 2077");
    }

    #[test]
    fn test_rejects_malformed_dates() {
        for input in [
            "",
            "2025-01-02",
            "Jan 2, 2025",
            "jan 02, 2025",
            "JAN 02, 2025",
            "January 02, 2025",
            "Jan 02 2025",
            "Jan 02, 25",
            " Jan 02, 2025",
            "Jan 02, 2025 ",
            "Feb 30, 2025",
            "Foo 02, 2025",
        ] {
            assert_eq!(
                input.parse::<StayDate>(),
                Err(StayDateError::Malformed(input.to_owned())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_days_until_uses_calendar() {
        let start = date("Jan 02, 2025");
        assert_eq!(start.days_until(&date("Jan 09, 2025")), 7);
        assert_eq!(start.days_until(&date("Feb 02, 2025")), 31);
        assert_eq!(start.days_until(&date("Jan 02, 2026")), 365);
        assert_eq!(start.days_until(&date("Jan 02, 2029")), 1461);
        assert_eq!(date("Feb 28, 2028").days_until(&date("Mar 01, 2028")), 2);
        assert_eq!(start.days_until(&start), 0);
        assert_eq!(date("Jan 09, 2025").days_until(&start), -7);
    }

    #[test]
    fn test_serializes_as_display_string() {
        let json = serde_json::to_string(&date("Jul 29, 2077")).unwrap();
        assert_eq!(json, "\"Jul 29, 2077\"");
        assert_eq!(serde_json::from_str::<StayDate>(&json).unwrap(), date("Jul 29, 2077"));
        assert!(serde_json::from_str::<StayDate>("\"2077-07-29\"").is_err());
    }
}
