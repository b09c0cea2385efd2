#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::analytics::DateRange;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> (App, Database) {
    let db = Database::open_in_memory().unwrap();
    let owner = db.ensure_owner("alice").unwrap();
    let mut app = App::new(owner, date("2024-03-15"));
    app.refresh_all(&db).unwrap();
    (app, db)
}

fn run(input: &str, app: &mut App, db: &mut Database) {
    handle_command(input, app, db).unwrap();
}

fn all_expenses(db: &Database, owner_id: i64) -> Vec<MoneyRecord> {
    db.find_records(owner_id, RecordKind::Expense, &DateRange::all())
        .unwrap()
}

// ── Registry ──────────────────────────────────────────────────

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("same", "same"), 0);
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut db) = setup();
    run("add-expens 5 Food x", &mut app, &mut db);
    assert_eq!(
        app.status_message,
        "Unknown command: :add-expens. Did you mean :add-expense?"
    );
}

#[test]
fn test_quit() {
    let (mut app, mut db) = setup();
    run("q", &mut app, &mut db);
    assert!(!app.running);
}

// ── Adding ────────────────────────────────────────────────────

#[test]
fn test_add_expense() {
    let (mut app, mut db) = setup();
    run("add-expense 2024-03-01 12.50 Food Lunch out", &mut app, &mut db);

    assert_eq!(app.screen, Screen::Expenses);
    assert_eq!(app.records.len(), 1);
    let rec = &app.records[0];
    assert_eq!(rec.title, "Lunch out");
    assert_eq!(rec.amount, dec!(12.50));
    assert_eq!(rec.occurred_on, date("2024-03-01"));
    assert_eq!(app.dashboard.as_ref().unwrap().total_spent, dec!(12.50));
}

#[test]
fn test_add_income_defaults_to_today() {
    let (mut app, mut db) = setup();
    run("ai 2500 Salary March pay", &mut app, &mut db);

    assert_eq!(app.screen, Screen::Income);
    assert_eq!(app.records[0].occurred_on, date("2024-03-15"));
    let dash = app.dashboard.as_ref().unwrap();
    assert_eq!(dash.today_income, dec!(2500));
    assert_eq!(dash.balance, dec!(2500));
}

#[test]
fn test_add_expense_invalid_amount_reports() {
    let (mut app, mut db) = setup();
    run("add-expense 1.234 Food Snack", &mut app, &mut db);
    assert_eq!(
        app.status_message,
        "Ensure that there are no more than 2 decimal places."
    );
    assert!(all_expenses(&db, app.owner.id).is_empty());
}

#[test]
fn test_add_goal_and_save() {
    let (mut app, mut db) = setup();
    run("add-goal 200 New bike", &mut app, &mut db);
    assert_eq!(app.screen, Screen::Goals);
    assert_eq!(app.goals.len(), 1);

    run("save 50", &mut app, &mut db);
    assert_eq!(app.goals[0].current_amount, dec!(50));
    assert_eq!(app.status_message, "New bike: $50.00 of $200.00 saved (25%)");

    run("complete", &mut app, &mut db);
    assert!(app.goals[0].completed);
}

#[test]
fn test_save_past_digit_limit_is_refused() {
    let (mut app, mut db) = setup();
    run("add-goal 99999999.99 Big", &mut app, &mut db);
    run("save 99999999.99", &mut app, &mut db);
    run("save 99999999.99", &mut app, &mut db);

    assert_eq!(
        app.status_message,
        "Ensure that there are no more than 10 digits in total."
    );
    let stored = db.get_goals(app.owner.id).unwrap();
    assert_eq!(stored[0].current_amount, dec!(99999999.99));
}

// ── Editing ───────────────────────────────────────────────────

#[test]
fn test_recat_and_amount() {
    let (mut app, mut db) = setup();
    run("ae 10 Food Groceries", &mut app, &mut db);
    run("recat Household", &mut app, &mut db);
    run("amount 11.25", &mut app, &mut db);

    let stored = &all_expenses(&db, app.owner.id)[0];
    assert_eq!(stored.category, "Household");
    assert_eq!(stored.amount, dec!(11.25));
}

#[test]
fn test_rename_without_args_enters_edit_mode() {
    let (mut app, mut db) = setup();
    run("ae 10 Food Groceries", &mut app, &mut db);
    run("rename", &mut app, &mut db);
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.command_input, "Groceries");
}

#[test]
fn test_edit_requires_selection() {
    let (mut app, mut db) = setup();
    run("recat Food", &mut app, &mut db);
    assert_eq!(
        app.status_message,
        "Go to Expenses or Income and select a record first"
    );
}

#[test]
fn test_editing_foreign_record_is_denied() {
    let (mut app, mut db) = setup();
    let bob = db.ensure_owner("bob").unwrap();
    let theirs = MoneyRecord::new(
        bob.id,
        RecordKind::Expense,
        "Rent".into(),
        dec!(900),
        "Housing".into(),
        date("2024-03-01"),
    );
    let id = db.insert_record(&theirs).unwrap();

    // A stale row on screen that belongs to someone else
    app.screen = Screen::Expenses;
    app.records = vec![db.get_record(id).unwrap().unwrap()];
    app.record_index = 0;

    run("rename Hacked", &mut app, &mut db);
    assert_eq!(
        app.status_message,
        "You are not authorized to edit this expense."
    );
    assert_eq!(db.get_record(id).unwrap().unwrap().title, "Rent");

    confirm_pending(
        PendingAction::DeleteRecord {
            id,
            title: "Rent".into(),
        },
        &mut app,
        &mut db,
    )
    .unwrap();
    assert_eq!(
        app.status_message,
        "You are not authorized to delete this expense."
    );
    assert!(db.get_record(id).unwrap().is_some());
}

// ── Deleting ──────────────────────────────────────────────────

#[test]
fn test_delete_asks_for_confirmation() {
    let (mut app, mut db) = setup();
    run("ae 10 Food Groceries", &mut app, &mut db);
    run("delete", &mut app, &mut db);

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete 'Groceries'?");
    assert_eq!(all_expenses(&db, app.owner.id).len(), 1);

    let action = app.pending_action.take().unwrap();
    confirm_pending(action, &mut app, &mut db).unwrap();
    assert!(all_expenses(&db, app.owner.id).is_empty());
    assert!(app.records.is_empty());
}

#[test]
fn test_delete_missing_goal_reports_not_found() {
    let (mut app, mut db) = setup();
    confirm_pending(
        PendingAction::DeleteGoal {
            id: 77,
            name: "Gone".into(),
        },
        &mut app,
        &mut db,
    )
    .unwrap();
    assert_eq!(app.status_message, "No goal with id 77.");
}

// ── Date range ────────────────────────────────────────────────

#[test]
fn test_from_and_to_filter_records() {
    let (mut app, mut db) = setup();
    run("ae 2024-01-10 5 Food A", &mut app, &mut db);
    run("ae 2024-02-10 7 Food B", &mut app, &mut db);
    run("ae 2024-03-10 9 Food C", &mut app, &mut db);

    run("from 2024-02-01", &mut app, &mut db);
    assert_eq!(app.records.len(), 2);
    run("to 2024-02-10", &mut app, &mut db);
    assert_eq!(app.records.len(), 1);
    assert_eq!(app.status_message, "Showing: 2024-02-01 to 2024-02-10");
    assert_eq!(app.dashboard.as_ref().unwrap().total_spent, dec!(7));

    run("range", &mut app, &mut db);
    assert!(app.range().is_unbounded());
    assert_eq!(app.records.len(), 3);
}

#[test]
fn test_invalid_from_shows_message_and_stays_open() {
    let (mut app, mut db) = setup();
    run("ae 2024-01-10 5 Food A", &mut app, &mut db);
    run("from 2024-13-40", &mut app, &mut db);

    assert_eq!(
        app.status_message,
        "Invalid start date format. Please use YYYY-MM-DD."
    );
    assert_eq!(app.range().start, None);
    assert_eq!(app.dashboard.as_ref().unwrap().total_spent, dec!(5));
}

// ── Users ─────────────────────────────────────────────────────

#[test]
fn test_switching_user_isolates_data() {
    let (mut app, mut db) = setup();
    run("ae 40 Food Dinner", &mut app, &mut db);
    run("user bob", &mut app, &mut db);

    assert_eq!(app.owner.name, "bob");
    assert!(app.records.is_empty());
    assert_eq!(app.dashboard.as_ref().unwrap().total_spent, dec!(0));

    run("user alice", &mut app, &mut db);
    assert_eq!(app.dashboard.as_ref().unwrap().total_spent, dec!(40));
}

#[test]
fn test_export_writes_owner_records() {
    let (mut app, mut db) = setup();
    run("ae 2024-01-10 5 Food A", &mut app, &mut db);
    run("ai 2024-01-11 100 Salary Pay", &mut app, &mut db);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    run(&format!("export {}", path.display()), &mut app, &mut db);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "2024-01-11,Income,Pay,Salary,100.00");
    assert_eq!(lines[2], "2024-01-10,Expense,A,Food,5.00");
}

#[test]
fn test_export_to_missing_directory_reports_and_continues() {
    let (mut app, mut db) = setup();
    run("ae 2024-01-10 5 Food A", &mut app, &mut db);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.csv");
    run(&format!("export {}", path.display()), &mut app, &mut db);

    assert!(app.running);
    assert!(app.status_message.starts_with("Export failed: Failed to create export file"));
    assert!(!path.exists());
}

// ── Date rollover ─────────────────────────────────────────────

#[test]
fn test_new_day_refreshes_today_panel() {
    let (mut app, mut db) = setup();
    run("ae 2024-03-16 7 Food Breakfast", &mut app, &mut db);
    assert_eq!(app.dashboard.as_ref().unwrap().today_spent, dec!(0));

    app.set_today(date("2024-03-16"), &db).unwrap();
    let dash = app.dashboard.as_ref().unwrap();
    assert_eq!(dash.today_spent, dec!(7));
    assert!(dash.week.iter().any(|d| d.is_today && d.day == 16));

    run("ae 3 Food Snack", &mut app, &mut db);
    let snack = all_expenses(&db, app.owner.id)
        .into_iter()
        .find(|r| r.title == "Snack")
        .unwrap();
    assert_eq!(snack.occurred_on, date("2024-03-16"));
}
