//! Position field identifiers.
//!
//! The form tracks ten interrelated numbers. `FieldId` is the closed set of
//! them, in the order the form lays them out.

use crate::domain::error::CalcError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    EntryPrice,
    SlPrice,
    SlPercent,
    RiskAmount,
    PositionAmount,
    Quantity,
    TargetPercent,
    TargetPrice,
    RiskReward,
    ProfitAmount,
}

/// What values a field accepts from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDomain {
    /// Any value `>= 0`.
    NonNegative,
    /// A percentage in `[0, 100]`.
    Percent,
    /// Any finite value.
    Unrestricted,
}

impl FieldId {
    pub const COUNT: usize = 10;

    pub const ALL: [FieldId; Self::COUNT] = [
        FieldId::EntryPrice,
        FieldId::SlPrice,
        FieldId::SlPercent,
        FieldId::RiskAmount,
        FieldId::PositionAmount,
        FieldId::Quantity,
        FieldId::TargetPercent,
        FieldId::TargetPrice,
        FieldId::RiskReward,
        FieldId::ProfitAmount,
    ];

    /// Position of this field in [`FieldId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Camel-case identifier used on the command line and in edit scripts.
    pub fn id(self) -> &'static str {
        match self {
            FieldId::EntryPrice => "entryPrice",
            FieldId::SlPrice => "slPrice",
            FieldId::SlPercent => "slPercent",
            FieldId::RiskAmount => "riskAmount",
            FieldId::PositionAmount => "positionAmount",
            FieldId::Quantity => "quantity",
            FieldId::TargetPercent => "targetPercent",
            FieldId::TargetPrice => "targetPrice",
            FieldId::RiskReward => "riskReward",
            FieldId::ProfitAmount => "profitAmount",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::EntryPrice => "Entry Price",
            FieldId::SlPrice => "SL Price",
            FieldId::SlPercent => "SL %",
            FieldId::RiskAmount => "Risk Amount",
            FieldId::PositionAmount => "Position Amount",
            FieldId::Quantity => "Quantity",
            FieldId::TargetPercent => "Target %",
            FieldId::TargetPrice => "Target Price",
            FieldId::RiskReward => "Risk : Reward",
            FieldId::ProfitAmount => "Profit Amount",
        }
    }

    pub fn input_domain(self) -> InputDomain {
        match self {
            FieldId::SlPercent => InputDomain::Percent,
            FieldId::RiskReward => InputDomain::Unrestricted,
            _ => InputDomain::NonNegative,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FieldId {
    type Err = CalcError;

    /// Accepts `entryPrice`, `entry_price` or `entry-price`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        FieldId::ALL
            .into_iter()
            .find(|f| f.id().to_lowercase() == wanted)
            .ok_or_else(|| CalcError::UnknownField {
                name: s.trim().to_string(),
            })
    }
}
