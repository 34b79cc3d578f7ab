use std::{convert::Infallible, fmt, str::FromStr};

use derive_more::{Display, Error};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use super::{Currency, Money};

/// 部屋の種類
///
/// どんなラベルでも受け付けるが、料金表にあるのは `NormalRoom`・`RoomWView`・`RoomWBath` だけ。
/// それ以外は `Unrecognized` として保持し、料金を求めた時点でエラーになる。
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub enum RoomType {
    #[default]
    NormalRoom,
    RoomWView,
    RoomWBath,
    Unrecognized(String),
}

impl RoomType {
    pub fn label(&self) -> &str {
        match self {
            Self::NormalRoom => "NormalRoom",
            Self::RoomWView => "RoomWView",
            Self::RoomWBath => "RoomWBath",
            Self::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// 一泊あたりの料金
    pub fn nightly_price(&self) -> Result<Money, RoomTypeError> {
        match self {
            Self::NormalRoom => Ok(Money::from_major(125, Currency::USD)),
            Self::RoomWView => Ok(Money::from_major(175, Currency::USD)),
            Self::RoomWBath => Ok(Money::from_major(200, Currency::USD)),
            Self::Unrecognized(label) => Err(RoomTypeError::Unknown(label.clone())),
        }
    }
}

impl FromStr for RoomType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "NormalRoom" => Self::NormalRoom,
            "RoomWView" => Self::RoomWView,
            "RoomWBath" => Self::RoomWBath,
            other => Self::Unrecognized(other.to_owned()),
        })
    }
}

impl From<&str> for RoomType {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(room_type) => room_type,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 部屋の種類のエラー
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum RoomTypeError {
    /// 料金表にない部屋の種類です
    #[display(fmt = "Unknown room type {:?}", _0)]
    Unknown(#[error(not(source))] String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_table() {
        assert_eq!(
            RoomType::NormalRoom.nightly_price(),
            Ok(Money::from_major(125, Currency::USD))
        );
        assert_eq!(
            RoomType::RoomWView.nightly_price(),
            Ok(Money::from_major(175, Currency::USD))
        );
        assert_eq!(
            RoomType::RoomWBath.nightly_price(),
            Ok(Money::from_major(200, Currency::USD))
        );
    }

    #[test]
    fn test_unknown_label_is_kept_until_priced() {
        let suite = RoomType::from("Suite");
        assert_eq!(suite, RoomType::Unrecognized("Suite".to_owned()));
        assert_eq!(suite.to_string(), "Suite");
        assert!(!suite.is_recognized());
        assert_eq!(
            suite.nightly_price(),
            Err(RoomTypeError::Unknown("Suite".to_owned()))
        );
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(RoomType::from("RoomWBath"), RoomType::RoomWBath);
        assert!(!RoomType::from("normalroom").is_recognized());
        assert!(!RoomType::from("‘NormalRoom’").is_recognized());
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&RoomType::RoomWView).unwrap();
        assert_eq!(json, "\"RoomWView\"");
        let parsed: RoomType = serde_json::from_str("\"Penthouse\"").unwrap();
        assert_eq!(parsed.label(), "Penthouse");
    }
}
