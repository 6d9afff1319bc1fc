//! Typed commands of the terminal front-end.
//!
//! Each command stands in for one interaction with the page (typing into
//! the new-todo field, double-clicking a title, pressing Escape, ...) and
//! maps onto the matching `App` intent.

use std::str::FromStr;

use thiserror::Error;
use todo_core::view::UnknownFilter;
use todo_core::{App, Effect, Filter, TodoId};

pub const HELP: &str = "\
commands:
  add <title>          type a title into the new-todo field and submit
  draft <text>         type into the new-todo field
  submit               submit the new-todo field
  toggle <id>          flip an item's checkbox
  toggle-all           complete everything, or reopen everything
  edit <id>            open the title editor (double click)
  type <id> <text>     type into an open title editor
  save <id>            submit the title editor (Enter / blur)
  escape <id>          close the title editor without saving
  rename <id> <title>  edit + type + save in one go
  delete <id>          delete an item
  clear                clear completed items
  filter <name>        all | active | completed
  dismiss              hide the error message
  show                 redraw
  help                 this text
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Draft(String),
    Submit,
    Toggle(TodoId),
    ToggleAll,
    Edit(TodoId),
    Type(TodoId, String),
    Save(TodoId),
    Escape(TodoId),
    Rename(TodoId, String),
    Delete(TodoId),
    Clear,
    Filter(Filter),
    Dismiss,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("`{0}` needs a todo id")]
    MissingId(&'static str),

    #[error("`{0}` is not a todo id")]
    BadId(String),

    #[error(transparent)]
    BadFilter(#[from] UnknownFilter),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };

        let command = match name {
            "" => return Err(CommandError::Empty),
            "add" => Command::Add(rest.to_string()),
            "draft" => Command::Draft(rest.to_string()),
            "submit" => Command::Submit,
            "toggle" => Command::Toggle(parse_id("toggle", rest)?.0),
            "toggle-all" => Command::ToggleAll,
            "edit" => Command::Edit(parse_id("edit", rest)?.0),
            "type" => {
                let (id, text) = parse_id("type", rest)?;
                Command::Type(id, text.to_string())
            }
            "save" => Command::Save(parse_id("save", rest)?.0),
            "escape" | "esc" => Command::Escape(parse_id("escape", rest)?.0),
            "rename" => {
                let (id, title) = parse_id("rename", rest)?;
                Command::Rename(id, title.to_string())
            }
            "delete" | "rm" => Command::Delete(parse_id("delete", rest)?.0),
            "clear" => Command::Clear,
            "filter" => Command::Filter(rest.parse()?),
            "dismiss" => Command::Dismiss,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Split a leading id off `rest`, returning the id and the text after it.
fn parse_id<'a>(command: &'static str, rest: &'a str) -> Result<(TodoId, &'a str), CommandError> {
    let (id, tail) = match rest.split_once(char::is_whitespace) {
        Some((id, tail)) => (id, tail),
        None => (rest, ""),
    };
    if id.is_empty() {
        return Err(CommandError::MissingId(command));
    }
    let id = id.parse::<u64>().map_err(|_| CommandError::BadId(id.to_string()))?;
    Ok((TodoId(id), tail))
}

impl Command {
    /// Perform the command against `app`. `Show`, `Help` and `Quit` are
    /// front-end concerns and do nothing here.
    pub fn apply(self, app: &mut App) -> Vec<Effect> {
        match self {
            Command::Add(title) => {
                app.set_draft(&title);
                app.submit()
            }
            Command::Draft(text) => {
                app.set_draft(&text);
                Vec::new()
            }
            Command::Submit => app.submit(),
            Command::Toggle(id) => app.toggle(id),
            Command::ToggleAll => app.toggle_all(),
            Command::Edit(id) => app.begin_edit(id),
            Command::Type(id, text) => {
                app.edit_title(id, &text);
                Vec::new()
            }
            Command::Save(id) => app.commit_edit(id),
            Command::Escape(id) => {
                app.cancel_edit(id);
                Vec::new()
            }
            Command::Rename(id, title) => {
                let mut effects = app.begin_edit(id);
                app.edit_title(id, &title);
                effects.extend(app.commit_edit(id));
                effects
            }
            Command::Delete(id) => app.delete(id),
            Command::Clear => app.clear_completed(),
            Command::Filter(filter) => {
                app.set_filter(filter);
                Vec::new()
            }
            Command::Dismiss => app.dismiss_error(),
            Command::Show | Command::Help | Command::Quit => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_titles_with_spaces() {
        assert_eq!("add buy oat milk".parse(), Ok(Command::Add("buy oat milk".to_string())));
        assert_eq!(
            "rename 4 call   mom".parse(),
            Ok(Command::Rename(TodoId(4), "call   mom".to_string()))
        );
    }

    #[test]
    fn type_keeps_blank_text_for_clearing_a_title() {
        assert_eq!("type 2".parse(), Ok(Command::Type(TodoId(2), String::new())));
    }

    #[test]
    fn id_errors_are_reported() {
        assert_eq!("toggle".parse::<Command>(), Err(CommandError::MissingId("toggle")));
        assert_eq!(
            "delete x1".parse::<Command>(),
            Err(CommandError::BadId("x1".to_string()))
        );
    }

    #[test]
    fn filters_and_unknowns() {
        assert_eq!("filter active".parse(), Ok(Command::Filter(Filter::Active)));
        assert!(matches!("filter done".parse::<Command>(), Err(CommandError::BadFilter(_))));
        assert_eq!("fly".parse::<Command>(), Err(CommandError::Unknown("fly".to_string())));
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
    }

    #[test]
    fn rename_on_unknown_item_does_nothing() {
        let mut app = App::new(todo_core::TodoClient::new("http://api.test", 1));
        assert!(Command::Rename(TodoId(3), "x".to_string()).apply(&mut app).is_empty());
    }

    #[test]
    fn add_with_blank_title_reports_validation_error() {
        let mut app = App::new(todo_core::TodoClient::new("http://api.test", 1));
        let effects = Command::Add("  ".to_string()).apply(&mut app);
        assert!(effects.iter().all(|effect| effect.ticket().is_none()));
        assert_eq!(app.error(), Some(todo_core::ErrorMessage::EmptyTitle));
    }
}
