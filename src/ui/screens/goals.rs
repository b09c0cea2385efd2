use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{fill_ratio, format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.goals.is_empty() {
        render_empty(f, area);
        return;
    }

    let items: Vec<ListItem> = app
        .goals
        .iter()
        .enumerate()
        .skip(app.goal_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, goal)| {
            let ratio = fill_ratio(goal.current_amount, goal.target_amount);
            let color = if goal.completed {
                theme::GREEN
            } else if goal.is_overdue(app.today) {
                theme::RED
            } else if ratio >= 0.5 {
                theme::YELLOW
            } else {
                theme::ACCENT
            };

            let due = match goal.due_date {
                Some(d) if goal.is_overdue(app.today) => format!("overdue {d}"),
                Some(d) => format!("due {d}"),
                None => String::new(),
            };
            let mark = if goal.completed { "✓" } else { " " };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{mark} {:<20}", truncate(&goal.name, 19)),
                    theme::row_style(i, app.goal_index),
                ),
                Span::styled(
                    format!(
                        " {}/{} ",
                        format_amount(goal.current_amount),
                        format_amount(goal.target_amount)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(ratio, 20), Style::default().fg(color)),
                Span::styled(
                    format!(" {:.0}% ", goal.progress_percentage()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(due, theme::dim_style()),
            ]))
        })
        .collect();

    let open = app.goals.iter().filter(|g| !g.completed).count();
    let list = List::new(items).block(theme::panel(format!(
        "Goals ({open} open of {})",
        app.goals.len()
    )));
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No savings goals yet", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Use :add-goal <target> <name> to start one",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(theme::panel("Goals"));
    f.render_widget(msg, area);
}
