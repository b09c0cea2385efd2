use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::analytics::dates::DATE_FORMAT;
use crate::models::RecordKind;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let kind = app.screen.record_kind().unwrap_or(RecordKind::Expense);
    let range = app.range();

    if app.records.is_empty() {
        let hint = match kind {
            RecordKind::Expense => "Add one with :add-expense <amount> <category> <title>",
            RecordKind::Income => "Add one with :add-income <amount> <category> <title>",
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No {} for {}", app.screen.to_string().to_lowercase(), range),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        let block = theme::panel(format!("{} (0)", app.screen));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header = Row::new(
        ["Date", "Title", "Category", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let amount_style = match kind {
        RecordKind::Expense => theme::expense_style(),
        RecordKind::Income => theme::income_style(),
    };

    let rows: Vec<Row> = app
        .records
        .iter()
        .enumerate()
        .skip(app.record_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, rec)| {
            Row::new(vec![
                Cell::from(rec.occurred_on.format(DATE_FORMAT).to_string()),
                Cell::from(truncate(&rec.title, 40)),
                Cell::from(truncate(&rec.category, 18)),
                Cell::from(Span::styled(format_amount(rec.amount), amount_style)),
            ])
            .style(theme::row_style(i, app.record_index))
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(16),
    ];

    let total: Decimal = app.records.iter().map(|r| r.amount).sum();
    let title = format!(
        "{} ({}) | {} | {}",
        app.screen,
        app.records.len(),
        range,
        format_amount(total)
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(title));

    f.render_widget(table, area);
}
