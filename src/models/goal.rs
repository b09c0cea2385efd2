use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub id: Option<i64>,
    pub owner_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: String,
}

impl Goal {
    pub fn new(owner_id: i64, name: String, target_amount: Decimal) -> Self {
        Self {
            id: None,
            owner_id,
            name,
            target_amount,
            current_amount: Decimal::ZERO,
            due_date: None,
            completed: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// `current / target * 100`, or zero when there is no positive target.
    pub fn progress_percentage(&self) -> Decimal {
        if self.target_amount > Decimal::ZERO {
            self.current_amount / self.target_amount * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }

    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
