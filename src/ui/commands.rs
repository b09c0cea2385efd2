use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::access::{self, Action};
use crate::db::Database;
use crate::forms;
use crate::models::{Goal, MoneyRecord, RecordKind};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("quit", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("i", "Go to Income", cmd_income, r);
    register_command!("income", "Go to Income", cmd_income, r);
    register_command!("g", "Go to Goals", cmd_goals, r);
    register_command!("goals", "Go to Goals", cmd_goals, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add-expense",
        "Add expense (e.g. :add-expense 2024-01-15 4.50 Food Coffee)",
        cmd_add_expense,
        r
    );
    register_command!("ae", "Add expense", cmd_add_expense, r);
    register_command!(
        "add-income",
        "Add income (e.g. :add-income 2500 Salary March pay)",
        cmd_add_income,
        r
    );
    register_command!("ai", "Add income", cmd_add_income, r);
    register_command!(
        "add-goal",
        "Add savings goal (e.g. :add-goal 1000 New bike)",
        cmd_add_goal,
        r
    );
    register_command!("rename", "Rename selected record or goal", cmd_rename, r);
    register_command!(
        "recat",
        "Change category of selected record (e.g. :recat Groceries)",
        cmd_recat,
        r
    );
    register_command!(
        "amount",
        "Change amount of selected record (e.g. :amount 12.50)",
        cmd_amount,
        r
    );
    register_command!(
        "date",
        "Change date of selected record (e.g. :date 2024-02-01)",
        cmd_date,
        r
    );
    register_command!(
        "save",
        "Add to selected goal's saved amount (e.g. :save 50)",
        cmd_save,
        r
    );
    register_command!(
        "target",
        "Change selected goal's target (e.g. :target 1500)",
        cmd_target,
        r
    );
    register_command!(
        "due",
        "Set selected goal's due date, or clear it (e.g. :due 2024-12-31)",
        cmd_due,
        r
    );
    register_command!("complete", "Toggle selected goal completed", cmd_complete, r);
    register_command!("delete", "Delete selected record or goal", cmd_delete, r);
    register_command!(
        "from",
        "Only count records on or after a date (e.g. :from 2024-01-01)",
        cmd_from,
        r
    );
    register_command!(
        "to",
        "Only count records on or before a date (e.g. :to 2024-03-31)",
        cmd_to,
        r
    );
    register_command!(
        "range",
        "Set both bounds, or clear them with no arguments",
        cmd_range,
        r
    );
    register_command!("user", "Switch to another user (e.g. :user alice)", cmd_user, r);
    register_command!(
        "export",
        "Export records in range to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2) // skip short aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Ownership ────────────────────────────────────────────────

/// Re-read the selected record and check it belongs to the active user.
/// Problems are reported on the status line and yield `None`.
pub(crate) fn owned_selected_record(
    app: &mut App,
    db: &Database,
    action: Action,
) -> anyhow::Result<Option<MoneyRecord>> {
    let Some((id, kind)) = app
        .selected_record()
        .and_then(|r| r.id.map(|id| (id, r.kind)))
    else {
        app.set_status("Go to Expenses or Income and select a record first");
        return Ok(None);
    };
    let found = db.get_record(id)?;
    match access::authorize_found(app.owner.id, found, kind.as_str(), id, action) {
        Ok(rec) => Ok(Some(rec)),
        Err(e) => {
            app.set_status(e.to_string());
            Ok(None)
        }
    }
}

pub(crate) fn owned_selected_goal(
    app: &mut App,
    db: &Database,
    action: Action,
) -> anyhow::Result<Option<Goal>> {
    let Some(id) = app.selected_goal().and_then(|g| g.id) else {
        app.set_status("Go to Goals and select one first");
        return Ok(None);
    };
    let found = db.get_goal(id)?;
    match access::authorize_found(app.owner.id, found, "goal", id, action) {
        Ok(goal) => Ok(Some(goal)),
        Err(e) => {
            app.set_status(e.to_string());
            Ok(None)
        }
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

pub(crate) fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> anyhow::Result<()> {
    let kind_changed = screen.record_kind() != app.screen.record_kind();
    app.screen = screen;
    if kind_changed && screen.record_kind().is_some() {
        app.record_index = 0;
        app.record_scroll = 0;
    }
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db)?,
        Screen::Expenses | Screen::Income => app.refresh_records(db)?,
        Screen::Goals => app.refresh_goals(db)?,
    }
    app.set_status(format!("{screen}"));
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Dashboard)
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Expenses)
}

fn cmd_income(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Income)
}

fn cmd_goals(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Goals)
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add_expense(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    add_record(args, RecordKind::Expense, app, db)
}

fn cmd_add_income(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    add_record(args, RecordKind::Income, app, db)
}

fn add_record(args: &str, kind: RecordKind, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!(
            "Usage: :add-{} [YYYY-MM-DD] <amount> <category> <title>",
            kind.as_str()
        ));
        return Ok(());
    }

    let form = match forms::parse_record_args(args, app.today) {
        Ok(f) => f,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    let rec = MoneyRecord::new(
        app.owner.id,
        kind,
        form.title,
        form.amount,
        form.category,
        form.occurred_on,
    );
    db.insert_record(&rec)?;

    let screen = match kind {
        RecordKind::Expense => Screen::Expenses,
        RecordKind::Income => Screen::Income,
    };
    if app.screen != screen {
        switch_screen(app, db, screen)?;
    }
    app.refresh_all(db)?;
    app.set_status(format!(
        "Added {}: {} ${:.2} ({})",
        kind.as_str(),
        rec.title,
        rec.amount,
        rec.category
    ));
    Ok(())
}

fn cmd_add_goal(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :add-goal <target> <name>");
        return Ok(());
    }

    let form = match forms::parse_goal_args(args) {
        Ok(f) => f,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    let mut goal = Goal::new(app.owner.id, form.name, form.target_amount);
    goal.current_amount = form.current_amount;
    goal.completed = form.completed;
    db.insert_goal(&goal)?;
    if app.screen != Screen::Goals {
        switch_screen(app, db, Screen::Goals)?;
    }
    app.refresh_goals(db)?;
    app.set_status(format!("Added goal: {} (${:.2})", goal.name, goal.target_amount));
    Ok(())
}

fn cmd_rename(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        // Enter editing mode for inline rename
        let current = match app.screen {
            Screen::Goals => app.selected_goal().map(|g| g.name.clone()),
            _ => app.selected_record().map(|r| r.title.clone()),
        };
        match current {
            Some(text) => {
                app.command_input = text;
                app.input_mode = InputMode::Editing;
                app.set_status("Type new name, press Enter to confirm");
            }
            None => app.set_status("Select a record or goal first"),
        }
        return Ok(());
    }
    rename_selected(args, app, db)
}

/// Apply a new title (records) or name (goals) to the selected row.
pub(crate) fn rename_selected(text: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let field = if app.screen == Screen::Goals { "Name" } else { "Title" };
    let text = match forms::validate_text(field, text) {
        Ok(t) => t,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    if app.screen == Screen::Goals {
        if let Some(mut goal) = owned_selected_goal(app, db, Action::Edit)? {
            goal.name = text.clone();
            db.update_goal(&goal)?;
            app.refresh_goals(db)?;
            app.set_status(format!("Renamed goal to: {text}"));
        }
    } else if let Some(mut rec) = owned_selected_record(app, db, Action::Edit)? {
        rec.title = text.clone();
        db.update_record(&rec)?;
        app.refresh_all(db)?;
        app.set_status(format!("Renamed to: {text}"));
    }
    Ok(())
}

fn cmd_recat(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let category = match forms::validate_text("Category", args) {
        Ok(c) => c,
        Err(_) => {
            app.set_status("Usage: :recat <category>");
            return Ok(());
        }
    };
    if let Some(mut rec) = owned_selected_record(app, db, Action::Edit)? {
        rec.category = category.clone();
        db.update_record(&rec)?;
        app.refresh_all(db)?;
        app.set_status(format!("Categorized as: {category}"));
    }
    Ok(())
}

fn cmd_amount(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let amount = match forms::parse_amount("Amount", args) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    if let Some(mut rec) = owned_selected_record(app, db, Action::Edit)? {
        rec.amount = amount;
        db.update_record(&rec)?;
        app.refresh_all(db)?;
        app.set_status(format!("Amount set to ${amount:.2}"));
    }
    Ok(())
}

fn cmd_date(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let date = match forms::parse_form_date(args) {
        Ok(d) => d,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    if let Some(mut rec) = owned_selected_record(app, db, Action::Edit)? {
        rec.occurred_on = date;
        db.update_record(&rec)?;
        app.refresh_all(db)?;
        app.set_status(format!("Date set to {date}"));
    }
    Ok(())
}

fn cmd_save(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let amount = match forms::parse_amount("Amount", args) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    if let Some(mut goal) = owned_selected_goal(app, db, Action::Edit)? {
        goal.current_amount = match forms::check_amount("Saved amount", goal.current_amount + amount) {
            Ok(total) => total,
            Err(e) => {
                app.set_status(e.to_string());
                return Ok(());
            }
        };
        db.update_goal(&goal)?;
        app.refresh_goals(db)?;
        app.set_status(format!(
            "{}: ${:.2} of ${:.2} saved ({:.0}%)",
            goal.name,
            goal.current_amount,
            goal.target_amount,
            goal.progress_percentage()
        ));
    }
    Ok(())
}

fn cmd_target(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let amount = match forms::parse_amount("Target amount", args) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    if let Some(mut goal) = owned_selected_goal(app, db, Action::Edit)? {
        goal.target_amount = amount;
        db.update_goal(&goal)?;
        app.refresh_goals(db)?;
        app.set_status(format!("Target set to ${amount:.2}"));
    }
    Ok(())
}

fn cmd_due(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let due = if args.is_empty() {
        None
    } else {
        match forms::parse_form_date(args) {
            Ok(d) => Some(d),
            Err(e) => {
                app.set_status(e.to_string());
                return Ok(());
            }
        }
    };
    if let Some(mut goal) = owned_selected_goal(app, db, Action::Edit)? {
        goal.due_date = due;
        db.update_goal(&goal)?;
        app.refresh_goals(db)?;
        match due {
            Some(d) => app.set_status(format!("Due date set to {d}")),
            None => app.set_status("Due date cleared"),
        }
    }
    Ok(())
}

fn cmd_complete(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if let Some(mut goal) = owned_selected_goal(app, db, Action::Edit)? {
        goal.completed = !goal.completed;
        db.update_goal(&goal)?;
        app.refresh_goals(db)?;
        let state = if goal.completed { "completed" } else { "open" };
        app.set_status(format!("{} marked {state}", goal.name));
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen == Screen::Goals {
        if let Some((id, name)) = app
            .selected_goal()
            .and_then(|g| g.id.map(|id| (id, g.name.clone())))
        {
            app.confirm_message = format!("Delete goal '{name}'?");
            app.pending_action = Some(PendingAction::DeleteGoal { id, name });
            app.input_mode = InputMode::Confirm;
        } else {
            app.set_status("No goal selected");
        }
        return Ok(());
    }

    if let Some((id, title)) = app
        .selected_record()
        .and_then(|r| r.id.map(|id| (id, r.title.clone())))
    {
        app.confirm_message = format!("Delete '{title}'?");
        app.pending_action = Some(PendingAction::DeleteRecord { id, title });
        app.input_mode = InputMode::Confirm;
    } else {
        app.set_status("Go to Expenses or Income and select a record first");
    }
    Ok(())
}

/// Carry out a confirmed deletion. Ownership is re-checked against the
/// stored row, not the copy on screen.
pub(crate) fn confirm_pending(action: PendingAction, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match action {
        PendingAction::DeleteRecord { id, title } => {
            let found = db.get_record(id)?;
            let kind = found.as_ref().map_or("record", |r| r.kind.as_str());
            match access::authorize_found(app.owner.id, found, kind, id, Action::Delete) {
                Ok(_) => {
                    db.delete_record(id)?;
                    app.refresh_all(db)?;
                    app.set_status(format!("Deleted: {title}"));
                }
                Err(e) => app.set_status(e.to_string()),
            }
        }
        PendingAction::DeleteGoal { id, name } => {
            let found = db.get_goal(id)?;
            match access::authorize_found(app.owner.id, found, "goal", id, Action::Delete) {
                Ok(_) => {
                    db.delete_goal(id)?;
                    app.refresh_goals(db)?;
                    app.set_status(format!("Deleted goal: {name}"));
                }
                Err(e) => app.set_status(e.to_string()),
            }
        }
    }
    Ok(())
}

fn cmd_from(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.start_input = non_empty(args);
    apply_range(app, db)
}

fn cmd_to(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.end_input = non_empty(args);
    apply_range(app, db)
}

fn cmd_range(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    app.start_input = parts.next().map(str::to_string);
    app.end_input = parts.next().map(str::to_string);
    apply_range(app, db)
}

fn non_empty(args: &str) -> Option<String> {
    let trimmed = args.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn apply_range(app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.status_message.clear();
    app.record_index = 0;
    app.record_scroll = 0;
    app.refresh_all(db)?;
    // Validation messages from the refresh take precedence
    if app.status_message.is_empty() {
        let range = app.range();
        app.set_status(format!("Showing: {range}"));
    }
    Ok(())
}

fn cmd_user(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let names: Vec<String> = db.get_owners()?.into_iter().map(|o| o.name).collect();
        app.set_status(format!(
            "Current user: {}. Known users: {}",
            app.owner.name,
            names.join(", ")
        ));
        return Ok(());
    }

    let owner = db.ensure_owner(args)?;
    let name = owner.name.clone();
    app.switch_owner(owner, db)?;
    app.set_status(format!("Switched to user: {name}"));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        default_export_path(&app.owner.name)
    } else {
        PathBuf::from(crate::export::shellexpand(args))
    };

    let records = records_in_range(db, app.owner.id, &app.range())?;
    let count = match crate::export::export_records(&path, &records) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!("Export failed: {e:#}");
            app.set_status(format!("Export failed: {e:#}"));
            return Ok(());
        }
    };
    if count == 0 {
        app.set_status("No records to export");
    } else {
        app.set_status(format!("Exported {count} records to {}", path.display()));
    }
    Ok(())
}

/// Expenses and income together, newest first.
pub(crate) fn records_in_range(
    db: &Database,
    owner_id: i64,
    range: &crate::analytics::DateRange,
) -> anyhow::Result<Vec<MoneyRecord>> {
    let mut records = Vec::new();
    for &kind in RecordKind::all() {
        records.extend(db.find_records(owner_id, kind, range)?);
    }
    records.sort_by(|a, b| b.occurred_on.cmp(&a.occurred_on).then(b.id.cmp(&a.id)));
    Ok(records)
}

pub(crate) fn default_export_path(owner: &str) -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(format!("expensetui-export-{owner}.csv"))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
