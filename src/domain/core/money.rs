use std::fmt;

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// 通貨
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    JPY,
}

impl Currency {
    /// 補助単位の桁数
    pub fn decimal_places(&self) -> u32 {
        match self {
            Self::USD | Self::EUR => 2,
            Self::JPY => 0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::JPY => "¥",
        }
    }

    fn minor_per_major(&self) -> i64 {
        10i64.pow(self.decimal_places())
    }
}

/// 金額（補助単位で保持する）
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// 主単位の金額から作る（補助単位に換算して `i64` に収まらない場合はパニックする）
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        Self::new(amount * currency.minor_per_major(), currency)
    }

    /// 補助単位での金額
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// `quantity` 倍の金額（桁あふれした場合は `None`）
    pub fn times(self, quantity: i64) -> Option<Self> {
        self.amount
            .checked_mul(quantity)
            .map(|amount| Self::new(amount, self.currency))
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    pub fn to_f64(&self) -> f64 {
        self.amount as f64 / self.currency.minor_per_major() as f64
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let scale = self.currency.minor_per_major().unsigned_abs();
        let major = (abs / scale).to_formatted_string(&Locale::en);
        match self.currency.decimal_places() {
            0 => write!(f, "{}{}{}", sign, self.currency.symbol(), major),
            places => write!(
                f,
                "{}{}{}.{:0width$}",
                sign,
                self.currency.symbol(),
                major,
                abs % scale,
                width = places as usize
            ),
        }
    }
}
