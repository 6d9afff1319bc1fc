//! Plain-text rendering of an `AppView`.

use std::fmt;

use todo_core::{AppView, Filter, TodoView};

use crate::session::Focus;

pub struct Page<'a> {
    pub view: &'a AppView,
    pub focus: Option<Focus>,
}

impl<'a> Page<'a> {
    pub fn new(view: &'a AppView, focus: Option<Focus>) -> Self {
        Self { view, focus }
    }
}

impl fmt::Display for Page<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;
        writeln!(f, "todos")?;

        let toggle_all = match view.toggle_all {
            Some(toggle) if toggle.active => "[v] ",
            Some(_) => "[ ] ",
            None => "    ",
        };
        let cursor = if self.focus == Some(Focus::NewTodo) { '>' } else { ' ' };
        let input = if view.input.draft.is_empty() {
            "What needs to be done?"
        } else {
            view.input.draft.as_str()
        };
        let disabled = if view.input.disabled { " (saving)" } else { "" };
        writeln!(f, "{toggle_all}{cursor} {input}{disabled}")?;

        for row in &view.items {
            self.row(f, row)?;
        }
        if let Some(placeholder) = &view.placeholder {
            self.row(f, placeholder)?;
        }

        if let Some(footer) = &view.footer {
            write!(f, "{} |", footer.items_left)?;
            for filter in Filter::ALL {
                if filter == footer.filter {
                    write!(f, " [{filter}]")?;
                } else {
                    write!(f, " {filter}")?;
                }
            }
            let clear = if footer.clear_completed_enabled {
                "clear completed"
            } else {
                "-"
            };
            writeln!(f, " | {clear}")?;
        }

        if !view.notification.hidden {
            writeln!(f, "! {}", view.notification.message)?;
        }
        Ok(())
    }
}

impl Page<'_> {
    fn row(&self, f: &mut fmt::Formatter<'_>, row: &TodoView) -> fmt::Result {
        let check = if row.completed { "[x]" } else { "[ ]" };
        let id = if row.id.is_placeholder() {
            "-".to_string()
        } else {
            row.id.to_string()
        };
        let busy = if row.is_busy { " ..." } else { "" };
        match &row.editing {
            Some(draft) => {
                let cursor = if self.focus == Some(Focus::TitleField(row.id)) { "|" } else { "" };
                writeln!(f, "  {check} {id:>3}  edit: {draft}{cursor}{busy}")
            }
            None => writeln!(f, "  {check} {id:>3}  {}{busy}", row.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::{FooterView, InputView, NotificationView, TodoId, ToggleAllView};

    fn row(id: u64, title: &str, completed: bool) -> TodoView {
        TodoView {
            id: TodoId(id),
            title: title.to_string(),
            completed,
            is_busy: false,
            editing: None,
        }
    }

    #[test]
    fn renders_rows_footer_and_error() {
        let view = AppView {
            input: InputView {
                draft: String::new(),
                disabled: true,
            },
            toggle_all: Some(ToggleAllView { active: false }),
            items: vec![row(1, "milk", false), row(2, "bread", true)],
            placeholder: Some(TodoView {
                is_busy: true,
                ..row(0, "eggs", false)
            }),
            footer: Some(FooterView {
                items_left: "1 items left".to_string(),
                filter: Filter::Active,
                clear_completed_enabled: true,
            }),
            notification: NotificationView {
                message: "Unable to add a todo".to_string(),
                hidden: false,
            },
        };
        let text = Page::new(&view, Some(Focus::NewTodo)).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "[ ] > What needs to be done? (saving)");
        assert_eq!(lines[2], "  [ ]   1  milk");
        assert_eq!(lines[3], "  [x]   2  bread");
        assert_eq!(lines[4], "  [ ]   -  eggs ...");
        assert_eq!(lines[5], "1 items left | All [Active] Completed | clear completed");
        assert_eq!(lines[6], "! Unable to add a todo");
    }

    #[test]
    fn empty_page_hides_footer_and_banner() {
        let view = AppView {
            input: InputView {
                draft: "typed".to_string(),
                disabled: false,
            },
            toggle_all: None,
            items: Vec::new(),
            placeholder: None,
            footer: None,
            notification: NotificationView {
                message: String::new(),
                hidden: true,
            },
        };
        let text = Page::new(&view, None).to_string();
        assert_eq!(text, "todos\n      typed\n");
    }
}
