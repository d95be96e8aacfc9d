//! Maps keys and terminal lines to session intents.

use crate::image::ImageFormat;
use crate::session::Intent;
use std::path::PathBuf;

/// A key the prompt editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Backspace.
    Backspace,
    /// A printable character.
    Char(char),
}

/// A key press with its shift modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Whether Shift was held.
    pub shift: bool,
}

impl KeyPress {
    /// A key without modifiers.
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// A key with Shift held.
    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// Handles a key in the prompt editor.
///
/// Plain Enter submits, Shift+Enter inserts a newline. The editor is disabled
/// while busy, so every key is ignored then.
pub fn prompt_key(prompt: &str, press: KeyPress, busy: bool) -> Option<Intent> {
    if busy {
        return None;
    }
    match press.key {
        Key::Enter if !press.shift => Some(Intent::Submit),
        Key::Enter => Some(Intent::EditPrompt(format!("{prompt}\n"))),
        Key::Char(c) => Some(Intent::EditPrompt(format!("{prompt}{c}"))),
        Key::Backspace => {
            let mut text = prompt.to_string();
            text.pop()?;
            Some(Intent::EditPrompt(text))
        }
    }
}

/// One line of REPL input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// `:open <path>`, the browse action.
    Open(PathBuf),
    /// A path dropped onto the terminal.
    Drop(PathBuf),
    /// `:save <path>`, writes the result image.
    Save(PathBuf),
    /// `:show`, re-renders the view.
    Show,
    /// `:help`.
    Help,
    /// `:quit` / `:q`.
    Quit,
    /// Prompt text. `submit` is false when the line ended with `\`.
    Prompt {
        /// The line without its continuation marker.
        text: String,
        /// True for a plain Enter.
        submit: bool,
    },
    /// A `:` command that needs an argument it did not get, or is unknown.
    Invalid(String),
}

/// REPL usage text.
pub const HELP: &str = "\
Commands:
  :open <path>   choose an image (or drop a file onto the terminal)
  :save <path>   write the generated image to disk
  :show          redraw the editor
  :help          show this help
  :quit          exit
Anything else is the editing prompt. Enter submits; an empty line resubmits the
current prompt; end a line with \\ to continue on the next line. Start a prompt
with :: to begin it with a literal colon.";

/// Classifies one REPL line.
///
/// `::` at the start escapes a prompt that begins with `:`. A `:` followed by
/// something other than a command word (`:)`, `:-D`) is prompt text too.
pub fn parse_line(line: &str) -> LineCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut text = line;

    if let Some(escaped) = line.trim_start().strip_prefix("::") {
        text = &line[line.len() - escaped.len() - 1..];
    } else if let Some(command) = line.trim_start().strip_prefix(':') {
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map(|(n, a)| (n, a.trim()))
            .unwrap_or((command.trim(), ""));
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()) {
            return match (name, arg) {
                ("open" | "o", "") | ("save" | "s", "") => {
                    LineCommand::Invalid(format!(":{name} needs a path"))
                }
                ("open" | "o", path) => LineCommand::Open(PathBuf::from(unquote(path))),
                ("save" | "s", path) => LineCommand::Save(PathBuf::from(unquote(path))),
                ("show", _) => LineCommand::Show,
                ("help" | "h", _) => LineCommand::Help,
                ("quit" | "q" | "exit", _) => LineCommand::Quit,
                _ => LineCommand::Invalid(format!("unknown command :{name}")),
            };
        }
    } else if let Some(path) = dropped_path(line) {
        return LineCommand::Drop(path);
    }

    match text.strip_suffix('\\') {
        Some(text) => LineCommand::Prompt {
            text: text.to_string(),
            submit: false,
        },
        None => LineCommand::Prompt {
            text: text.to_string(),
            submit: true,
        },
    }
}

/// Recognizes a file path pasted by a terminal drag-and-drop or typed by hand.
///
/// Terminals paste dropped files as a path, sometimes quoted or as a
/// `file://` URL. Only paths with an accepted image extension qualify, and an
/// unquoted line with unescaped spaces is prompt text, not a path.
pub fn dropped_path(line: &str) -> Option<PathBuf> {
    let trimmed = line.trim();
    let unquoted = unquote(trimmed);
    let quoted = unquoted.len() != trimmed.len();
    let raw = unquoted.strip_prefix("file://").unwrap_or(unquoted);

    if !quoted && raw.replace("\\ ", "").contains(char::is_whitespace) {
        return None;
    }
    let raw = raw.replace("\\ ", " ");
    let path = match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()?.join(rest),
        None => PathBuf::from(raw),
    };

    path.extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
        .map(|_| path)
}

/// Prompt text assembled across REPL lines.
#[derive(Debug, Default)]
pub struct PromptDraft {
    pending: Option<String>,
}

impl PromptDraft {
    /// Turns one prompt line into the intents it stands for.
    ///
    /// A continued line (Shift+Enter) only edits the prompt. A plain Enter
    /// edits and submits; on a blank line with nothing pending it resubmits
    /// the prompt already in the session, like Enter in an unchanged editor.
    pub fn feed(&mut self, text: &str, submit: bool) -> Vec<Intent> {
        let mut full = self.pending.take().unwrap_or_default();
        full.push_str(text);

        if !submit {
            full.push('\n');
            self.pending = Some(full.clone());
            return vec![Intent::EditPrompt(full)];
        }
        if full.is_empty() {
            return vec![Intent::Submit];
        }
        vec![Intent::EditPrompt(full), Intent::Submit]
    }

    /// True while a continued prompt is waiting for its final line.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn unquote(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}
