use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use std::io::{self, BufRead, Write};

use crate::edamam::EdamamClient;
use nibble_core::models::{MealType, validate_meal_type};
use nibble_core::session::{Session, View};

use super::calendar::{write_month, write_year};
use super::day::write_day;
use super::entry::{lookup_failure_message, resolve_food};
use super::helpers::parse_date_str;

const HELP: &str = "\
Commands:
  list                         show the selected day
  calendar                     show the displayed month
  view                         switch between list and calendar
  day <date>                   select a day (YYYY-MM-DD, today, yesterday)
  prev | next | today          move the displayed month
  pick <date>                  highlight a day of the displayed month
  year                         show the last 365 days
  add <meal> <food...>         look up a food and log it
  manual <meal> <kcal> <name...>
                               log a food with a known calorie value
  delete <id>                  remove an entry
  theme                        toggle light/dark
  help                         show this help
  quit                         leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Help,
    List,
    Calendar,
    ToggleView,
    Day(NaiveDate),
    PreviousMonth,
    NextMonth,
    Today,
    Pick(NaiveDate),
    Year,
    Add {
        meal_type: MealType,
        food: String,
    },
    Manual {
        meal_type: MealType,
        calories: u32,
        name: String,
    },
    Delete(String),
    Theme,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match cmd.to_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "list" => Self::List,
            "calendar" | "cal" => Self::Calendar,
            "view" => Self::ToggleView,
            "day" => Self::Day(parse_date_str(single_arg(&rest, "day <date>")?)?),
            "prev" => Self::PreviousMonth,
            "next" => Self::NextMonth,
            "today" => Self::Today,
            "pick" => Self::Pick(parse_date_str(single_arg(&rest, "pick <date>")?)?),
            "year" => Self::Year,
            "add" => {
                let [meal, food @ ..] = rest.as_slice() else {
                    bail!("Usage: add <meal> <food...>");
                };
                if food.is_empty() {
                    bail!("Usage: add <meal> <food...>");
                }
                Self::Add {
                    meal_type: validate_meal_type(meal)?,
                    food: food.join(" "),
                }
            }
            "manual" => {
                let [meal, calories, name @ ..] = rest.as_slice() else {
                    bail!("Usage: manual <meal> <kcal> <name...>");
                };
                if name.is_empty() {
                    bail!("Usage: manual <meal> <kcal> <name...>");
                }
                Self::Manual {
                    meal_type: validate_meal_type(meal)?,
                    calories: calories
                        .parse()
                        .with_context(|| format!("Invalid calorie value '{calories}'"))?,
                    name: name.join(" "),
                }
            }
            "delete" | "rm" => Self::Delete(single_arg(&rest, "delete <id>")?.to_string()),
            "theme" => Self::Theme,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("Unknown command '{other}'. Type 'help' for a list"),
        };
        Ok(Some(command))
    }
}

fn single_arg<'a>(args: &[&'a str], usage: &str) -> Result<&'a str> {
    match args {
        [arg] => Ok(arg),
        _ => bail!("Usage: {usage}"),
    }
}

fn render(out: &mut impl Write, session: &Session) -> Result<()> {
    match session.view() {
        View::List => write_day(out, &session.day_summary())?,
        View::Calendar => write_month(
            out,
            &session.month_grid()?,
            Local::now().date_naive(),
            session.highlighted_day(),
            session.theme(),
        )?,
    }
    Ok(())
}

/// Apply one command. Returns `false` when the shell should exit.
async fn apply(
    command: ShellCommand,
    session: &mut Session,
    client: &EdamamClient,
    out: &mut impl Write,
) -> Result<bool> {
    let today = Local::now().date_naive();
    match command {
        ShellCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(true);
        }
        ShellCommand::Quit => return Ok(false),
        ShellCommand::List => session.set_view(View::List),
        ShellCommand::Calendar => session.set_view(View::Calendar),
        ShellCommand::ToggleView => session.set_view(match session.view() {
            View::List => View::Calendar,
            View::Calendar => View::List,
        }),
        ShellCommand::Day(date) => session.select_day(date),
        ShellCommand::PreviousMonth => {
            session.previous_month()?;
            session.set_view(View::Calendar);
        }
        ShellCommand::NextMonth => {
            session.next_month()?;
            session.set_view(View::Calendar);
        }
        ShellCommand::Today => {
            session.go_to_today(today)?;
            session.set_view(View::Calendar);
        }
        ShellCommand::Pick(date) => {
            session.set_view(View::Calendar);
            if !session.toggle_highlight(date) {
                writeln!(out, "{date} is not in the displayed month")?;
                return Ok(true);
            }
        }
        ShellCommand::Year => {
            write_year(out, &session.year_grid(today), session.theme())?;
            return Ok(true);
        }
        ShellCommand::Add { meal_type, food } => {
            log_food(session, client, out, meal_type, &food, None).await?;
        }
        ShellCommand::Manual {
            meal_type,
            calories,
            name,
        } => {
            log_food(session, client, out, meal_type, &name, Some(calories)).await?;
        }
        ShellCommand::Delete(id) => {
            if session.delete_entry(&id)? {
                writeln!(out, "Deleted entry {id}")?;
            } else {
                writeln!(out, "Entry {id} not found")?;
                return Ok(true);
            }
        }
        ShellCommand::Theme => {
            let theme = session.toggle_theme();
            writeln!(out, "Theme: {theme:?}")?;
        }
    }
    render(out, session)?;
    Ok(true)
}

async fn log_food(
    session: &mut Session,
    client: &EdamamClient,
    out: &mut impl Write,
    meal_type: MealType,
    food: &str,
    calories: Option<u32>,
) -> Result<()> {
    match resolve_food(client, food, calories).await {
        Ok(resolution) => {
            if resolution.transport_error.is_some() {
                writeln!(
                    out,
                    "Note: nutrition service unavailable, using the built-in value"
                )?;
            }
            let entry = session.add_food(&resolution.food, meal_type, &Local::now())?;
            session.set_view(View::List);
            let (name, cal) = (&entry.food_name, entry.calories);
            writeln!(out, "Logged: {name} for {meal_type} — {cal} kcal")?;
        }
        Err(e) => writeln!(out, "{}", lookup_failure_message(&e))?,
    }
    Ok(())
}

pub(crate) async fn cmd_shell(session: &mut Session, client: &EdamamClient) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();

    writeln!(out, "nibble shell. Type 'help' for commands.\n")?;
    render(&mut out, session)?;

    loop {
        write!(out, "\nnibble> ")?;
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e:#}")?;
                continue;
            }
        };

        match apply(command, session, client, &mut out).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "shell command failed");
                writeln!(out, "Error: {e:#}")?;
            }
        }
    }

    Ok(())
}
