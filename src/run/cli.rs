use anyhow::Result;
use std::path::PathBuf;

use crate::access::{self, Action, AccessError};
use crate::analytics::dashboard::{self, Dashboard, DashboardRequest};
use crate::analytics::dates::{parse_range, DATE_FORMAT};
use crate::db::Database;
use crate::forms;
use crate::models::{Goal, MoneyRecord, Owner, RecordKind};
use crate::ui::commands::{default_export_path, records_in_range};
use crate::ui::util::{fill_ratio, format_amount, forecast_text, progress_bar, truncate};

/// Flags that consume the following argument.
const VALUE_FLAGS: [&str; 4] = ["--from", "--to", "--due", "--user"];

pub(crate) fn as_cli(args: &[String], db: &mut Database, owner: &Owner) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db, owner),
        "forecast" | "f" => cli_forecast(&args[2..], db, owner),
        "add-expense" => cli_add_record(&args[2..], RecordKind::Expense, db, owner),
        "add-income" => cli_add_record(&args[2..], RecordKind::Income, db, owner),
        "add-goal" => cli_add_goal(&args[2..], db, owner),
        "list" | "ls" => cli_list(&args[2..], db, owner),
        "goals" => cli_goals(db, owner),
        "delete" | "rm" => cli_delete(&args[2..], db, owner),
        "export" => cli_export(&args[2..], db, owner),
        "users" => cli_users(db, owner),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expensetui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ExpenseTUI: local expense, income and savings tracker");
    println!();
    println!("Usage: expensetui [--user <name>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                               Launch interactive TUI");
    println!("  summary [--from D] [--to D] [--json] Totals, categories, months and forecast");
    println!("  forecast [--json]                    Predict next month's spending");
    println!("  add-expense [D] <amount> <category> <title...>");
    println!("  add-income  [D] <amount> <category> <title...>");
    println!("  add-goal <target> <name...> [--due D]");
    println!("  list [expenses|income] [--from D] [--to D]");
    println!("  goals                                List savings goals");
    println!("  delete <expense|income|goal> <id>    Delete one of your entries");
    println!("  export [path] [--from D] [--to D]    Export records to CSV");
    println!("  users                                List known users");
    println!("  --help, -h                           Show this help");
    println!("  --version, -V                        Show version");
    println!();
    println!("Dates (D) use YYYY-MM-DD.");
}

// ── Argument helpers ─────────────────────────────────────────

pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor flag values.
pub(crate) fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

/// Rejoin shell words for the form parser. Words that held spaces are
/// re-quoted, except the last one, which the parser takes verbatim.
pub(crate) fn join_words(words: &[&str]) -> String {
    let last = words.len().saturating_sub(1);
    words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            if i < last && w.contains(char::is_whitespace) {
                format!("\"{w}\"")
            } else {
                w.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove `--user <name>` from the arguments, returning the name.
pub(crate) fn take_user_flag(args: &mut Vec<String>) -> Option<String> {
    let pos = args.iter().position(|a| a == "--user")?;
    if pos + 1 >= args.len() {
        args.remove(pos);
        return None;
    }
    let name = args.remove(pos + 1);
    args.remove(pos);
    Some(name)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn build_dashboard(args: &[String], db: &Database, owner: &Owner) -> Result<Dashboard> {
    let req = DashboardRequest {
        owner_id: owner.id,
        start_date: flag_value(args, "--from"),
        end_date: flag_value(args, "--to"),
        today: today(),
    };
    let dash = dashboard::build(db, &req)?;
    for msg in &dash.messages {
        eprintln!("Warning: {msg}");
    }
    Ok(dash)
}

// ── Commands ─────────────────────────────────────────────────

fn cli_summary(args: &[String], db: &mut Database, owner: &Owner) -> Result<()> {
    let dash = build_dashboard(args, db, owner)?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&dash)?);
        return Ok(());
    }

    println!("ExpenseTUI | {} | {}", owner.name, dash.range);
    println!("{}", "─".repeat(44));
    println!("  Spent:      {:>16}  ({} expenses)", format_amount(dash.total_spent), dash.expense_count);
    println!("  Income:     {:>16}  ({} entries)", format_amount(dash.total_income), dash.income_count);
    println!("  Balance:    {:>16}", format_amount(dash.balance));
    println!("  Forecast:   {}", forecast_text(&dash.forecast));

    if !dash.category_totals.is_empty() {
        println!();
        println!("Spending by Category:");
        for ct in &dash.category_totals {
            println!("  {:<24} {:>14}", truncate(&ct.category, 24), format_amount(ct.total));
        }
    }

    if !dash.month_totals.is_empty() {
        println!();
        println!("Spending by Month:");
        for mt in &dash.month_totals {
            println!("  {:<24} {:>14}", mt.month, format_amount(mt.total));
        }
    }

    Ok(())
}

fn cli_forecast(args: &[String], db: &mut Database, owner: &Owner) -> Result<()> {
    let dash = build_dashboard(&[], db, owner)?;

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&dash.forecast)?);
        return Ok(());
    }

    match dash.forecast.amount() {
        Some(_) => println!("Next month: {}", forecast_text(&dash.forecast)),
        None => println!("{}", forecast_text(&dash.forecast)),
    }
    Ok(())
}

fn cli_add_record(args: &[String], kind: RecordKind, db: &mut Database, owner: &Owner) -> Result<()> {
    let words = positional(args);
    if words.is_empty() {
        anyhow::bail!(
            "Usage: expensetui add-{} [YYYY-MM-DD] <amount> <category> <title...>",
            kind.as_str()
        );
    }

    let form = forms::parse_record_args(&join_words(&words), today())?;
    let rec = MoneyRecord::new(
        owner.id,
        kind,
        form.title,
        form.amount,
        form.category,
        form.occurred_on,
    );
    let id = db.insert_record(&rec)?;
    tracing::info!(owner = %owner, id, kind = kind.as_str(), "Record added from CLI");
    println!(
        "Added {} #{id}: {} {} ({}, {})",
        kind.as_str(),
        rec.title,
        format_amount(rec.amount),
        rec.category,
        rec.occurred_on.format(DATE_FORMAT)
    );
    Ok(())
}

fn cli_add_goal(args: &[String], db: &mut Database, owner: &Owner) -> Result<()> {
    let words = positional(args);
    if words.is_empty() {
        anyhow::bail!("Usage: expensetui add-goal <target> <name...> [--due YYYY-MM-DD]");
    }

    let mut form = forms::parse_goal_args(&join_words(&words))?;
    if let Some(raw) = flag_value(args, "--due") {
        form.due_date = Some(forms::parse_form_date(raw)?);
    }

    let mut goal = Goal::new(owner.id, form.name, form.target_amount);
    goal.current_amount = form.current_amount;
    goal.due_date = form.due_date;
    goal.completed = form.completed;
    let id = db.insert_goal(&goal)?;
    println!(
        "Added goal #{id}: {} (target {})",
        goal.name,
        format_amount(goal.target_amount)
    );
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database, owner: &Owner) -> Result<()> {
    let words = positional(args);
    let kind = match words.first() {
        None => None,
        Some(w) => match RecordKind::parse(w) {
            Some(k) => Some(k),
            None => anyhow::bail!("Unknown record kind: {w}. Use expenses or income"),
        },
    };

    let (range, errors) = parse_range(flag_value(args, "--from"), flag_value(args, "--to"));
    for err in &errors {
        eprintln!("Warning: {err}");
    }

    let records = match kind {
        Some(k) => db.find_records(owner.id, k, &range)?,
        None => records_in_range(db, owner.id, &range)?,
    };

    if records.is_empty() {
        if range.is_unbounded() {
            println!("No records yet. Add one with: expensetui add-expense <amount> <category> <title>");
        } else {
            println!("No records for {range}");
        }
        return Ok(());
    }

    println!(
        "{:<6} {:<10} {:<8} {:<28} {:<16} {:>14}",
        "ID", "Date", "Kind", "Title", "Category", "Amount"
    );
    println!("{}", "─".repeat(87));
    for rec in &records {
        println!(
            "{:<6} {:<10} {:<8} {:<28} {:<16} {:>14}",
            rec.id.unwrap_or(0),
            rec.occurred_on.format(DATE_FORMAT).to_string(),
            rec.kind.to_string(),
            truncate(&rec.title, 28),
            truncate(&rec.category, 16),
            format_amount(rec.amount),
        );
    }
    Ok(())
}

fn cli_goals(db: &mut Database, owner: &Owner) -> Result<()> {
    let goals = db.get_goals(owner.id)?;
    if goals.is_empty() {
        println!("No goals");
        return Ok(());
    }

    let today = today();
    for goal in &goals {
        let ratio = fill_ratio(goal.current_amount, goal.target_amount);
        let status = if goal.completed {
            "done".to_string()
        } else if goal.is_overdue(today) {
            "overdue".to_string()
        } else {
            let left = format!("{} to go", format_amount(goal.remaining()));
            match goal.due_date {
                Some(d) => format!("{left}, due {d}"),
                None => left,
            }
        };
        println!(
            "{:<4} {:<24} {} {:>5.1}%  {} / {}  {status}",
            goal.id.unwrap_or(0),
            truncate(&goal.name, 24),
            progress_bar(ratio, 20),
            goal.progress_percentage(),
            format_amount(goal.current_amount),
            format_amount(goal.target_amount),
        );
    }
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database, owner: &Owner) -> Result<()> {
    let words = positional(args);
    let (Some(kind_raw), Some(id_raw)) = (words.first(), words.get(1)) else {
        anyhow::bail!("Usage: expensetui delete <expense|income|goal> <id>");
    };
    let id: i64 = id_raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid id: {id_raw}"))?;

    let outcome = match *kind_raw {
        "goal" | "goals" => delete_goal(id, db, owner)?,
        other => match RecordKind::parse(other) {
            Some(kind) => delete_record(id, kind, db, owner)?,
            None => anyhow::bail!("Unknown kind: {other}. Use expense, income or goal"),
        },
    };

    match outcome {
        Ok(label) => println!("Deleted {label}"),
        Err(e) => eprintln!("Warning: {e}"),
    }
    Ok(())
}

/// Outer error is infrastructure, inner is a refused or missing item.
fn delete_record(
    id: i64,
    kind: RecordKind,
    db: &mut Database,
    owner: &Owner,
) -> Result<std::result::Result<String, AccessError>> {
    let found = db.get_record(id)?.filter(|r| r.kind == kind);
    match access::authorize_found(owner.id, found, kind.as_str(), id, Action::Delete) {
        Ok(rec) => {
            db.delete_record(id)?;
            Ok(Ok(format!("{} #{id}: {}", kind.as_str(), rec.title)))
        }
        Err(e) => Ok(Err(e)),
    }
}

fn delete_goal(
    id: i64,
    db: &mut Database,
    owner: &Owner,
) -> Result<std::result::Result<String, AccessError>> {
    let found = db.get_goal(id)?;
    match access::authorize_found(owner.id, found, "goal", id, Action::Delete) {
        Ok(goal) => {
            db.delete_goal(id)?;
            Ok(Ok(format!("goal #{id}: {}", goal.name)))
        }
        Err(e) => Ok(Err(e)),
    }
}

fn cli_export(args: &[String], db: &mut Database, owner: &Owner) -> Result<()> {
    let output_path = positional(args)
        .first()
        .map(|a| PathBuf::from(crate::export::shellexpand(a)))
        .unwrap_or_else(|| default_export_path(&owner.name));

    let (range, errors) = parse_range(flag_value(args, "--from"), flag_value(args, "--to"));
    for err in &errors {
        eprintln!("Warning: {err}");
    }

    let records = records_in_range(db, owner.id, &range)?;
    let count = crate::export::export_records(&output_path, &records)?;
    if count == 0 {
        println!("No records for {range}");
    } else {
        println!("Exported {count} records to {}", output_path.display());
    }
    Ok(())
}

fn cli_users(db: &mut Database, owner: &Owner) -> Result<()> {
    for o in db.get_owners()? {
        let marker = if o.id == owner.id { "*" } else { " " };
        let count = db.get_record_count(o.id)?;
        println!("{marker} {:<20} {count} records", o.name);
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
