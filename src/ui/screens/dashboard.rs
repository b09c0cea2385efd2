use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph, Sparkline},
    Frame,
};
use rust_decimal::Decimal;

use crate::analytics::forecast::MIN_MONTHS;
use crate::analytics::{Dashboard, Forecast};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(dash) = app.dashboard.as_ref() else {
        f.render_widget(
            Paragraph::new("Loading…")
                .centered()
                .block(theme::panel("Dashboard")),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(8),    // Category chart + today
            Constraint::Length(3), // Monthly spending sparkline
        ])
        .split(area);

    render_summary_cards(f, chunks[0], dash);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);
    render_category_chart(f, middle[0], dash);
    render_today(f, middle[1], dash);

    render_month_sparkline(f, chunks[2], dash);
}

fn render_summary_cards(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    render_card(
        f,
        cards[0],
        "Spent",
        format_amount(dash.total_spent),
        theme::RED,
        format!("{} expenses", dash.expense_count),
    );
    render_card(
        f,
        cards[1],
        "Income",
        format_amount(dash.total_income),
        theme::GREEN,
        format!("{} entries", dash.income_count),
    );
    render_card(
        f,
        cards[2],
        "Balance",
        format_amount(dash.balance),
        if dash.balance >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        dash.range.to_string(),
    );

    let (value, subtitle) = match &dash.forecast {
        Forecast::Predicted(p) => (format_amount(p.amount), format!("forecast for {}", p.month)),
        Forecast::InsufficientData { months_observed } => (
            "n/a".to_string(),
            format!("{months_observed} of {MIN_MONTHS} months needed"),
        ),
    };
    render_card(f, cards[3], "Next Month", value, theme::MAUVE, subtitle);
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: String) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(theme::panel(title));

    f.render_widget(text, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let block = theme::panel("Spending by Category");
    if dash.category_chart.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses in this range. Add one with :add-expense",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = dash
        .category_chart
        .labels
        .iter()
        .zip(&dash.category_chart.data)
        .take(12)
        .map(|(label, value)| {
            Bar::default()
                .value(value.max(0.0).round() as u64)
                .label(Line::from(truncate(label, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_today(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let mut week_spans = Vec::new();
    for day in &dash.week {
        let style = if day.is_today {
            theme::selected_style().add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        week_spans.push(Span::styled(format!(" {} {:>2} ", day.name, day.day), style));
    }

    let mut lines = vec![
        Line::from(Span::styled(dash.month_label.clone(), theme::section_style())),
        Line::from(week_spans),
        Line::from(""),
        Line::from(vec![
            Span::styled("Spent today   ", theme::dim_style()),
            Span::styled(format_amount(dash.today_spent), theme::expense_style()),
        ]),
        Line::from(vec![
            Span::styled("Earned today  ", theme::dim_style()),
            Span::styled(format_amount(dash.today_income), theme::income_style()),
        ]),
        Line::from(""),
    ];

    if dash.today_records.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing recorded today",
            theme::dim_style(),
        )));
    }
    for rec in &dash.today_records {
        let style = if rec.is_income() {
            theme::income_style()
        } else {
            theme::expense_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<18}", truncate(&rec.title, 17)), theme::normal_style()),
            Span::styled(format_amount(rec.signed_amount()), style),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(theme::panel("Today")), area);
}

fn render_month_sparkline(f: &mut Frame, area: Rect, dash: &Dashboard) {
    let data: Vec<u64> = dash
        .month_chart
        .data
        .iter()
        .map(|v| v.max(0.0).round() as u64)
        .collect();

    let title = match (dash.month_chart.labels.first(), dash.month_chart.labels.last()) {
        (Some(first), Some(last)) if first != last => format!("Monthly Spending {first} to {last}"),
        _ => "Monthly Spending".to_string(),
    };

    let sparkline = Sparkline::default()
        .block(theme::panel(title))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));

    f.render_widget(sparkline, area);
}
