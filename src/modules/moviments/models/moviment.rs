use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single dated ledger entry against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moviment {
    pub id: Uuid,
    /// Always non-negative; direction comes from `moviment_type`
    pub value: Decimal,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub moviment_type: MovimentType,
    pub account_id: Uuid,
    pub user_id: Uuid,
    /// Effective date of the entry
    pub created_on: DateTime<Utc>,
}

impl Moviment {
    pub fn new(
        value: Decimal,
        description: String,
        category: Category,
        moviment_type: MovimentType,
        account_id: Uuid,
        user_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            description,
            category,
            moviment_type,
            account_id,
            user_id,
            created_on: Utc::now(),
        }
    }

    /// Replace the generated id, used for deterministic posting ids
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Move the effective date, e.g. to a future installment month
    pub fn override_created_date(&mut self, date: DateTime<Utc>) {
        self.created_on = date;
    }

    /// Value with the sign it contributes to the account balance
    pub fn signed_value(&self) -> Decimal {
        match self.moviment_type {
            MovimentType::Credit => self.value,
            MovimentType::Debit => -self.value,
        }
    }
}

/// Whether a moviment adds to or takes from the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovimentType {
    Debit,
    Credit,
}

impl MovimentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl std::fmt::Display for MovimentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for MovimentType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Invalid moviment type: {}", value)),
        }
    }
}

/// Spending / income category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Housing,
    Transport,
    Health,
    Education,
    Leisure,
    Shopping,
    Salary,
    Investment,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Housing => "housing",
            Self::Transport => "transport",
            Self::Health => "health",
            Self::Education => "education",
            Self::Leisure => "leisure",
            Self::Shopping => "shopping",
            Self::Salary => "salary",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "food" => Ok(Self::Food),
            "housing" => Ok(Self::Housing),
            "transport" => Ok(Self::Transport),
            "health" => Ok(Self::Health),
            "education" => Ok(Self::Education),
            "leisure" => Ok(Self::Leisure),
            "shopping" => Ok(Self::Shopping),
            "salary" => Ok(Self::Salary),
            "investment" => Ok(Self::Investment),
            "other" => Ok(Self::Other),
            _ => Err(format!("Invalid category: {}", value)),
        }
    }
}
