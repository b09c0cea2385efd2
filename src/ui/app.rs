use anyhow::Result;
use chrono::NaiveDate;

use crate::analytics::dashboard::{self, Dashboard, DashboardRequest};
use crate::analytics::DateRange;
use crate::db::Database;
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
    Income,
    Goals,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Expenses, Self::Income, Self::Goals]
    }

    /// The record kind listed on this screen, if it lists records.
    pub(crate) fn record_kind(&self) -> Option<RecordKind> {
        match self {
            Self::Expenses => Some(RecordKind::Expense),
            Self::Income => Some(RecordKind::Income),
            Self::Dashboard | Self::Goals => None,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Income => write!(f, "Income"),
            Self::Goals => write!(f, "Goals"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteRecord { id: i64, title: String },
    DeleteGoal { id: i64, name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    // Whose data is on screen
    pub(crate) owner: Owner,

    // Raw date bounds as typed; parsed on every refresh
    pub(crate) start_input: Option<String>,
    pub(crate) end_input: Option<String>,

    pub(crate) dashboard: Option<Dashboard>,

    // Expenses / Income
    pub(crate) records: Vec<MoneyRecord>,
    pub(crate) record_index: usize,
    pub(crate) record_scroll: usize,

    // Goals
    pub(crate) goals: Vec<Goal>,
    pub(crate) goal_index: usize,
    pub(crate) goal_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(owner: Owner, today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            owner,

            start_input: None,
            end_input: None,

            dashboard: None,

            records: Vec::new(),
            record_index: 0,
            record_scroll: 0,

            goals: Vec::new(),
            goal_index: 0,
            goal_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// The effective filter, after invalid bounds have been dropped.
    pub(crate) fn range(&self) -> DateRange {
        self.dashboard.as_ref().map(|d| d.range).unwrap_or_default()
    }

    /// Rebuild the dashboard. Validation messages replace the status line.
    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let req = DashboardRequest {
            owner_id: self.owner.id,
            start_date: self.start_input.as_deref(),
            end_date: self.end_input.as_deref(),
            today: self.today,
        };
        let dash = dashboard::build(db, &req)?;
        if !dash.messages.is_empty() {
            self.status_message = dash.messages.join(" ");
        }
        self.dashboard = Some(dash);
        Ok(())
    }

    /// Move to a new calendar day, rebuilding the dashboard when it changes.
    pub(crate) fn set_today(&mut self, today: NaiveDate, db: &Database) -> Result<()> {
        if today == self.today {
            return Ok(());
        }
        tracing::debug!(from = %self.today, to = %today, "Date changed");
        self.today = today;
        self.refresh_dashboard(db)
    }

    pub(crate) fn refresh_records(&mut self, db: &Database) -> Result<()> {
        let kind = self.screen.record_kind().unwrap_or(RecordKind::Expense);
        self.records = db.find_records(self.owner.id, kind, &self.range())?;
        if self.record_index >= self.records.len() {
            self.record_index = self.records.len().saturating_sub(1);
        }
        if self.record_scroll > self.record_index {
            self.record_scroll = self.record_index;
        }
        Ok(())
    }

    pub(crate) fn refresh_goals(&mut self, db: &Database) -> Result<()> {
        self.goals = db.get_goals(self.owner.id)?;
        if self.goal_index >= self.goals.len() {
            self.goal_index = self.goals.len().saturating_sub(1);
        }
        if self.goal_scroll > self.goal_index {
            self.goal_scroll = self.goal_index;
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?; // records read the parsed range from here
        self.refresh_records(db)?;
        self.refresh_goals(db)?;
        Ok(())
    }

    pub(crate) fn switch_owner(&mut self, owner: Owner, db: &Database) -> Result<()> {
        self.owner = owner;
        self.record_index = 0;
        self.record_scroll = 0;
        self.goal_index = 0;
        self.goal_scroll = 0;
        self.refresh_all(db)
    }

    pub(crate) fn selected_record(&self) -> Option<&MoneyRecord> {
        if self.screen.record_kind().is_none() {
            return None;
        }
        self.records.get(self.record_index)
    }

    pub(crate) fn selected_goal(&self) -> Option<&Goal> {
        if self.screen != Screen::Goals {
            return None;
        }
        self.goals.get(self.goal_index)
    }

    /// Rows available to a bordered table with a header line.
    pub(crate) fn table_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
