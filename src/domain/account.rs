//! Money holders shown on the account overview.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Icon choice attached to an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AccountIcon {
    #[default]
    Cash,
    CreditCard,
    Bank,
    Wallet,
}

impl AccountIcon {
    pub const ALL: [AccountIcon; 4] = [
        AccountIcon::Cash,
        AccountIcon::CreditCard,
        AccountIcon::Bank,
        AccountIcon::Wallet,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            AccountIcon::Cash => "cash",
            AccountIcon::CreditCard => "credit-card",
            AccountIcon::Bank => "bank",
            AccountIcon::Wallet => "wallet",
        }
    }
}

impl fmt::Display for AccountIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AccountIcon {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        AccountIcon::ALL
            .into_iter()
            .find(|icon| icon.slug() == needle)
            .ok_or_else(|| format!("unknown icon `{value}`"))
    }
}

/// Display currency with an illustrative conversion rate relative to NT$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayCurrency {
    pub symbol: &'static str,
    pub rate: f64,
}

/// Conversion table used for the overview total. Rates are not authoritative.
pub const DISPLAY_CURRENCIES: [DisplayCurrency; 3] = [
    DisplayCurrency {
        symbol: "NT$",
        rate: 1.0,
    },
    DisplayCurrency {
        symbol: "USD$",
        rate: 0.033,
    },
    DisplayCurrency {
        symbol: "JPY¥",
        rate: 3.65,
    },
];

impl DisplayCurrency {
    pub fn find(symbol: &str) -> Option<DisplayCurrency> {
        let needle = symbol.trim();
        DISPLAY_CURRENCIES
            .into_iter()
            .find(|currency| currency.symbol.eq_ignore_ascii_case(needle))
    }

    pub fn convert(&self, amount: f64) -> f64 {
        amount * self.rate
    }
}

impl Default for DisplayCurrency {
    fn default() -> Self {
        DISPLAY_CURRENCIES[0]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,
    #[serde(default)]
    pub icon: AccountIcon,
    pub currency: String,
}

impl Account {
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance,
            credit_limit: None,
            icon: AccountIcon::default(),
            currency: DisplayCurrency::default().symbol.to_string(),
        }
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.name, self.icon)
    }
}

/// Raw form input for creating or editing an account.
#[derive(Debug, Clone, Default)]
pub struct AccountDraft {
    pub name: String,
    pub balance: String,
    pub credit_limit: String,
    pub icon: AccountIcon,
    pub currency: Option<String>,
}
