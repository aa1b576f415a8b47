//! Interactive shell
//!
//! A long-running session over the library. The active filter lives in an
//! in-process history, so `back` and `forward` step through earlier filters
//! the way a browser's history would.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::debug;

use readstack_core::navigation::{filter_from_query, filter_param, query_for};
use readstack_core::{
    BookDraft, Category, Filter, MemoryHistory, NavigationSync, Presenter, Session, Severity,
    Slot, Status,
};

use super::{resolve_id, LibraryStore};
use crate::output::Output;

const HELP: &str = "\
Commands:
  list                                   Show books under the active filter
  filter <all|to-read|reading|finished>  Change the active filter
  back | forward                         Step through filter history
  add <title> <author> [category] [status] [notes]
  edit <id> <title> <author> [notes]
  status <id> <to-read|reading|finished>
  delete <id>
  stats                                  Show totals and progress
  location                               Show the current location
  help                                   Show this help
  quit                                   Leave the shell

Quote values containing spaces: add \"The Hobbit\" \"J.R.R. Tolkien\" fantasy";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Filter(String),
    Back,
    Forward,
    Add(BookDraft),
    Edit {
        id: String,
        title: String,
        author: String,
        notes: String,
    },
    Status {
        id: String,
        status: Status,
    },
    Delete(String),
    Stats,
    Location,
    Help,
    Quit,
}

/// Whether the shell keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Run the shell on stdin
pub fn run(store: LibraryStore, location: Option<String>, output: Output) -> Result<()> {
    if let Some(location) = location.as_deref() {
        if filter_param(location).is_some() && filter_from_query(location).is_none() {
            output.notice(
                &format!("Ignoring unrecognized filter in '{}'", location),
                Severity::Warning,
            );
        }
    }

    let mut nav = NavigationSync::new(MemoryHistory::new(location.as_deref()));
    nav.subscribe(Box::new(|filter| debug!(filter = %filter, "view changed")));

    let mut session = Session::new(store, nav, output);
    session.start();

    let show_prompt = !output.is_quiet() && !output.is_json();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if show_prompt {
            print!("readstack> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            if show_prompt {
                println!();
            }
            break;
        };
        let line = line?;

        if execute_line(&mut session, &line) == Flow::Exit {
            break;
        }
    }

    Ok(())
}

/// Parse and run one line of input
pub fn execute_line<S: Slot, P: Presenter>(
    session: &mut Session<S, MemoryHistory, P>,
    line: &str,
) -> Flow {
    if line.trim().is_empty() {
        return Flow::Continue;
    }

    match parse_line(line) {
        Ok(command) => execute(session, command),
        Err(message) => {
            session.presenter_mut().notify(&message, Severity::Error);
            Flow::Continue
        }
    }
}

/// Run a parsed command
pub fn execute<S: Slot, P: Presenter>(
    session: &mut Session<S, MemoryHistory, P>,
    command: ShellCommand,
) -> Flow {
    match command {
        ShellCommand::List => session.refresh(),
        ShellCommand::Filter(value) => match Filter::parse(&value) {
            Some(filter) => session.set_filter(filter),
            None => session.presenter_mut().notify(
                &format!("Unknown filter '{}'. Use all, to-read, reading or finished.", value),
                Severity::Error,
            ),
        },
        ShellCommand::Back => {
            let restored = session
                .navigation_mut()
                .state_mut()
                .back()
                .map(str::to_string);
            navigate(session, restored, "Already at the oldest entry.");
        }
        ShellCommand::Forward => {
            let restored = session
                .navigation_mut()
                .state_mut()
                .forward()
                .map(str::to_string);
            navigate(session, restored, "Already at the newest entry.");
        }
        ShellCommand::Add(draft) => {
            let _ = session.add(&draft);
        }
        ShellCommand::Edit {
            id,
            title,
            author,
            notes,
        } => {
            if let Some(id) = lookup(session, &id) {
                let _ = session.edit(&id, &title, &author, &notes);
            }
        }
        ShellCommand::Status { id, status } => {
            if let Some(id) = lookup(session, &id) {
                let _ = session.set_status(&id, status);
            }
        }
        ShellCommand::Delete(id) => {
            if let Some(id) = lookup(session, &id) {
                let _ = session.delete(&id);
            }
        }
        ShellCommand::Stats => {
            let stats = session.view().statistics;
            let message = format!(
                "Total books: {}  Finished: {}  Progress: {}%",
                stats.total, stats.finished, stats.completion_percent
            );
            session.presenter_mut().notify(&message, Severity::Info);
        }
        ShellCommand::Location => {
            let location = session.navigation().state().location();
            let message = if location.is_empty() {
                query_for(session.navigation().current())
            } else {
                location
            };
            session.presenter_mut().notify(&message, Severity::Info);
        }
        ShellCommand::Help => {
            let message = format!("{}\n\nCategories: {}", HELP, category_names().join(", "));
            session.presenter_mut().notify(&message, Severity::Info);
        }
        ShellCommand::Quit => return Flow::Exit,
    }

    Flow::Continue
}

fn navigate<S: Slot, P: Presenter>(
    session: &mut Session<S, MemoryHistory, P>,
    restored: Option<String>,
    at_edge: &str,
) {
    match restored {
        Some(state) => {
            // A blank entry predates any filter choice; show the view as is
            if !session.on_history_navigate(Some(&state)) {
                session.refresh();
            }
        }
        None => session.presenter_mut().notify(at_edge, Severity::Info),
    }
}

fn lookup<S: Slot, P: Presenter>(
    session: &mut Session<S, MemoryHistory, P>,
    id: &str,
) -> Option<readstack_core::BookId> {
    match resolve_id(session.store(), id) {
        Ok(id) => Some(id),
        Err(e) => {
            session.presenter_mut().notify(&e.to_string(), Severity::Error);
            None
        }
    }
}

/// Parse one line into a command
pub fn parse_line(line: &str) -> std::result::Result<ShellCommand, String> {
    let args = split_args(line)?;
    let Some((name, rest)) = args.split_first() else {
        return Err("Empty command".to_string());
    };

    let command = match (name.to_ascii_lowercase().as_str(), rest) {
        ("list" | "ls", []) => ShellCommand::List,
        ("filter", [value]) => ShellCommand::Filter(value.clone()),
        ("back", []) => ShellCommand::Back,
        ("forward", []) => ShellCommand::Forward,
        ("add", [title, author, extra @ ..]) if extra.len() <= 3 => {
            let mut draft = BookDraft::new(title.clone(), author.clone());
            if let Some(category) = extra.first() {
                draft = draft.category(category.parse::<Category>().map_err(|e| format!("{}", e))?);
            }
            if let Some(status) = extra.get(1) {
                draft = draft.status(status.parse::<Status>().map_err(|e| format!("{}", e))?);
            }
            if let Some(notes) = extra.get(2) {
                draft = draft.notes(notes.clone());
            }
            ShellCommand::Add(draft)
        }
        ("edit", [id, title, author, notes @ ..]) if notes.len() <= 1 => ShellCommand::Edit {
            id: id.clone(),
            title: title.clone(),
            author: author.clone(),
            notes: notes.first().cloned().unwrap_or_default(),
        },
        ("status", [id, status]) => ShellCommand::Status {
            id: id.clone(),
            status: status.parse::<Status>().map_err(|e| format!("{}", e))?,
        },
        ("delete" | "rm", [id]) => ShellCommand::Delete(id.clone()),
        ("stats", []) => ShellCommand::Stats,
        ("location", []) => ShellCommand::Location,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", []) => ShellCommand::Quit,
        (other, _) => {
            return Err(format!(
                "Invalid command or arguments: '{}'. Type `help` for usage.",
                other
            ))
        }
    };

    Ok(command)
}

/// Split a line into arguments, honoring single and double quotes
fn split_args(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote".to_string());
    }
    if in_arg {
        args.push(current);
    }

    Ok(args)
}

/// Categories accepted by `add`, for help output
pub fn category_names() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use readstack_core::storage::DEFAULT_SLOT;
    use readstack_core::{MemorySlot, Store, View};

    #[derive(Default)]
    struct Capture {
        views: Vec<(Filter, usize)>,
        notes: Vec<(String, Severity)>,
    }

    impl Presenter for Capture {
        fn render(&mut self, view: &View<'_>) {
            self.views.push((view.filter, view.books.len()));
        }

        fn notify(&mut self, message: &str, severity: Severity) {
            self.notes.push((message.to_string(), severity));
        }
    }

    fn shell() -> Session<MemorySlot, MemoryHistory, Capture> {
        let store = Store::open(MemorySlot::new(DEFAULT_SLOT));
        let nav = NavigationSync::new(MemoryHistory::new(None));
        Session::new(store, nav, Capture::default())
    }

    #[test]
    fn test_split_args() {
        assert_eq!(
            split_args(r#"add "The Hobbit" 'J.R.R. Tolkien' fantasy"#).unwrap(),
            vec!["add", "The Hobbit", "J.R.R. Tolkien", "fantasy"]
        );
        assert_eq!(split_args(r#"edit abc "" Author"#).unwrap(), vec!["edit", "abc", "", "Author"]);
        assert!(split_args(r#"add "unterminated"#).is_err());
        assert!(split_args("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_add() {
        let cmd = parse_line(r#"add Dune "Frank Herbert" fiction reading "Spice""#).unwrap();
        assert_eq!(
            cmd,
            ShellCommand::Add(
                BookDraft::new("Dune", "Frank Herbert")
                    .category(Category::Fiction)
                    .status(Status::Reading)
                    .notes("Spice")
            )
        );

        assert!(parse_line("add Dune").is_err());
        assert!(parse_line("add Dune Herbert poetry").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_line("ls").unwrap(), ShellCommand::List);
        assert_eq!(parse_line("FILTER reading").unwrap(), ShellCommand::Filter("reading".into()));
        assert_eq!(parse_line("rm abc").unwrap(), ShellCommand::Delete("abc".into()));
        assert!(matches!(
            parse_line("status abc finished").unwrap(),
            ShellCommand::Status { status: Status::Finished, .. }
        ));
        assert!(parse_line("status abc shelved").is_err());
        assert!(parse_line("frobnicate").is_err());
        assert_eq!(parse_line("exit").unwrap(), ShellCommand::Quit);
    }

    #[test]
    fn test_session_flow() {
        let mut s = shell();

        execute_line(&mut s, r#"add Dune "Frank Herbert""#);
        execute_line(&mut s, r#"add Cosmos "Carl Sagan" science reading"#);
        assert_eq!(s.store().len(), 2);

        execute_line(&mut s, "filter reading");
        assert_eq!(s.presenter().views.last(), Some(&(Filter::Reading, 1)));

        execute_line(&mut s, "filter finished");
        execute_line(&mut s, "back");
        assert_eq!(s.navigation().current(), Filter::Reading);

        execute_line(&mut s, "forward");
        assert_eq!(s.navigation().current(), Filter::Finished);

        execute_line(&mut s, "forward");
        assert_eq!(s.presenter().notes.last().unwrap().1, Severity::Info);

        execute_line(&mut s, "filter sideways");
        assert_eq!(s.navigation().current(), Filter::Finished);
        assert_eq!(s.presenter().notes.last().unwrap().1, Severity::Error);

        let id = s.store().books()[0].id.to_string();
        execute_line(&mut s, &format!("status {} finished", id));
        assert_eq!(s.presenter().views.last(), Some(&(Filter::Finished, 1)));

        execute_line(&mut s, &format!("delete {}", id));
        assert_eq!(s.store().len(), 1);

        assert_eq!(execute_line(&mut s, "quit"), Flow::Exit);
    }

    #[test]
    fn test_unknown_id_reported() {
        let mut s = shell();
        assert_eq!(execute_line(&mut s, "delete nothing"), Flow::Continue);
        assert_eq!(s.presenter().notes.last().unwrap().1, Severity::Error);
    }

    #[test]
    fn test_category_names() {
        let names = category_names();
        assert_eq!(names.len(), 13);
        assert!(names.contains(&"Self-Help"));
    }
}
