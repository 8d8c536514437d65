use serde::{Deserialize, Serialize};

/// Salary currencies found in vacancy exports. The set is closed: any other
/// code is rejected when a record is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Azn,
    Byr,
    Eur,
    Gel,
    Kgs,
    Kzt,
    Rur,
    Uah,
    Usd,
    Uzs,
}

impl Currency {
    /// The reference currency all salary bounds are stored in.
    pub const REFERENCE: Currency = Currency::Rur;

    pub const ALL: [Currency; 10] = [
        Currency::Azn,
        Currency::Byr,
        Currency::Eur,
        Currency::Gel,
        Currency::Kgs,
        Currency::Kzt,
        Currency::Rur,
        Currency::Uah,
        Currency::Usd,
        Currency::Uzs,
    ];

    /// Multiplier converting one unit of this currency into roubles.
    pub fn to_rub_rate(&self) -> f64 {
        match self {
            Currency::Azn => 35.68,
            Currency::Byr => 23.91,
            Currency::Eur => 59.9,
            Currency::Gel => 21.74,
            Currency::Kgs => 0.76,
            Currency::Kzt => 0.13,
            Currency::Rur => 1.0,
            Currency::Uah => 1.64,
            Currency::Usd => 60.66,
            Currency::Uzs => 0.0055,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Azn => "AZN",
            Currency::Byr => "BYR",
            Currency::Eur => "EUR",
            Currency::Gel => "GEL",
            Currency::Kgs => "KGS",
            Currency::Kzt => "KZT",
            Currency::Rur => "RUR",
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Uzs => "UZS",
        }
    }

    /// Human-readable name, as shown in vacancy tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Azn => "Манаты",
            Currency::Byr => "Белорусские рубли",
            Currency::Eur => "Евро",
            Currency::Gel => "Грузинский лари",
            Currency::Kgs => "Киргизский сом",
            Currency::Kzt => "Тенге",
            Currency::Rur => "Рубли",
            Currency::Uah => "Гривны",
            Currency::Usd => "Доллары",
            Currency::Uzs => "Узбекский сум",
        }
    }

    /// Convert an amount in this currency into the reference currency.
    /// Reference amounts pass through untouched.
    pub fn convert_to_reference(&self, amount: f64) -> f64 {
        if *self == Currency::REFERENCE {
            amount
        } else {
            amount * self.to_rub_rate()
        }
    }

    /// Match either the code (`USD`) or the display name (`Доллары`).
    pub fn matches(&self, text: &str) -> bool {
        self.code() == text || self.display_name() == text
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| format!("Unknown currency: {}", s))
    }
}
