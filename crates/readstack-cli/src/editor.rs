//! Interactive input
//!
//! Notes are edited in the user's editor with a short header naming the
//! book; header lines are dropped again when the file is read back. The
//! prompts below read single answers from stdin.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

use readstack_core::Book;

/// Lines starting with this are editor instructions, not notes
const HEADER_PREFIX: &str = "#:";

/// Editors tried when neither $VISUAL nor $EDITOR is set
const FALLBACK_EDITORS: [&str; 4] = ["nano", "vim", "vi", "notepad"];

/// Edit the notes of `book` in the user's editor
pub fn edit_notes(book: &Book) -> Result<String> {
    let editor = editor_command()?;
    let edited = run_editor(&editor, &notes_template(book))?;
    Ok(strip_header(&edited))
}

/// The file content handed to the editor
fn notes_template(book: &Book) -> String {
    format!(
        "{p} Notes for \"{}\" by {} ({})\n\
         {p} Lines starting with '{p}' are ignored. Save and quit to keep your changes.\n\
         \n\
         {}\n",
        book.title,
        book.author,
        book.id.short(),
        book.notes,
        p = HEADER_PREFIX,
    )
}

/// Drop header lines and surrounding blank space
fn strip_header(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with(HEADER_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Open `content` in `editor` and return what was saved
fn run_editor(editor: &str, content: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("readstack-notes-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create a scratch file for the editor")?;
    fs::write(file.path(), content)
        .with_context(|| format!("Failed to write {:?}", file.path()))?;

    let status = Command::new(editor)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;
    if !status.success() {
        bail!("Editor '{}' exited with {}; notes left unchanged", editor, status);
    }

    fs::read_to_string(file.path())
        .with_context(|| format!("Failed to read back {:?}", file.path()))
}

/// The editor to launch: $VISUAL, then $EDITOR, then the first fallback on PATH
fn editor_command() -> Result<String> {
    let configured = ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty());
    if let Some(editor) = configured {
        return Ok(editor);
    }

    FALLBACK_EDITORS
        .into_iter()
        .find(|name| on_path(name))
        .map(str::to_string)
        .context("No editor found. Set $EDITOR, for example: export EDITOR=nano")
}

fn on_path(program: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| is_program(&dir.join(program)))
}

fn is_program(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Whether stdin is attached to a terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Ask a yes/no question; anything but "y" or "yes" is a no, as is a
/// missing terminal
pub fn confirm(question: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }

    let answer = ask(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Ask for a field value, keeping `current` when the answer is empty
pub fn prompt_with_default(field: &str, current: &str) -> Result<String> {
    let question = if current.is_empty() {
        format!("{}: ", field)
    } else {
        format!("{} [{}]: ", field, current)
    };

    let answer = ask(&question)?;
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}

fn ask(question: &str) -> Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
