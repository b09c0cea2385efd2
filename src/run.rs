mod cli;
mod tui;

pub(crate) use cli::{as_cli, take_user_flag};
pub(crate) use tui::as_tui;
