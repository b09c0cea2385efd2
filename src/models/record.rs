use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Expense,
    Income,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" | "e" => Some(Self::Expense),
            "income" | "incomes" | "i" => Some(Self::Income),
            _ => None,
        }
    }

    pub fn all() -> &'static [RecordKind] {
        &[Self::Expense, Self::Income]
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A single expense or income entry.
///
/// Amounts are stored unsigned; the kind decides which side of the balance
/// the record lands on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyRecord {
    pub id: Option<i64>,
    pub owner_id: i64,
    pub kind: RecordKind,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub occurred_on: NaiveDate,
    pub created_at: String,
}

impl MoneyRecord {
    pub fn new(
        owner_id: i64,
        kind: RecordKind,
        title: String,
        amount: Decimal,
        category: String,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            owner_id,
            kind,
            title,
            amount,
            category,
            occurred_on,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == RecordKind::Income
    }

    /// Signed contribution to the owner's balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            RecordKind::Expense => -self.amount,
            RecordKind::Income => self.amount,
        }
    }
}

impl std::fmt::Display for MoneyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}
