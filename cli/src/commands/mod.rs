mod calendar;
mod day;
mod entry;
mod helpers;
mod search;
mod shell;

pub(crate) use calendar::{cmd_month, cmd_year};
pub(crate) use day::{cmd_breakdown, cmd_day};
pub(crate) use entry::{cmd_add, cmd_delete};
pub(crate) use search::cmd_search;
pub(crate) use shell::cmd_shell;
