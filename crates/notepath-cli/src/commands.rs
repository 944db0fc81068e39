//! Line commands for the terminal pad.
//!
//! Anything that isn't a `:command` is text appended to the document.
//! A leading `::` escapes a literal line starting with `:`.

use notepath_kernel::SaveStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a line of text.
    Append(String),
    /// Replace the whole document.
    Set(String),
    /// Empty the document.
    Clear,
    /// Navigate to another path.
    Go(String),
    Show,
    Status,
    Flush,
    Retry,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        if let Some(literal) = line.strip_prefix("::") {
            return Command::Append(format!(":{literal}"));
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Append(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg),
            None => (rest, ""),
        };
        match name {
            "go" | "g" => Command::Go(arg.to_string()),
            "set" => Command::Set(arg.to_string()),
            "clear" => Command::Clear,
            "show" | "s" => Command::Show,
            "status" => Command::Status,
            "flush" | "w" => Command::Flush,
            "retry" => Command::Retry,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Content after appending `line` to `content`.
pub fn append_line(content: &str, line: &str) -> String {
    if content.is_empty() {
        line.to_string()
    } else {
        format!("{content}\n{line}")
    }
}

/// Human-readable status line.
pub fn describe_status(status: SaveStatus) -> String {
    match status {
        SaveStatus::Loading => "Loading...".to_string(),
        SaveStatus::Idle(Some(at)) => format!("Last saved: {}", format_clock(at)),
        SaveStatus::Idle(None) => "Not saved yet".to_string(),
        SaveStatus::PendingSave => "Unsaved changes".to_string(),
        SaveStatus::Saving => "Saving...".to_string(),
        SaveStatus::SaveFailed => "Save failed (edit again or :retry)".to_string(),
    }
}

/// Warning printed on exit when edits would be dropped.
pub fn exit_warning(status: SaveStatus) -> Option<&'static str> {
    match status {
        SaveStatus::SaveFailed => Some("warning: last save failed; unsaved edits are discarded"),
        s if s.has_unsaved_changes() => {
            Some("warning: edits not yet saved are discarded (use :flush or --flush-on-exit)")
        }
        _ => None,
    }
}

/// `HH:MM:SS UTC` for a Unix-millisecond timestamp.
fn format_clock(millis: u64) -> String {
    let secs = (millis / 1000) % 86_400;
    format!("{:02}:{:02}:{:02} UTC", secs / 3600, (secs / 60) % 60, secs % 60)
}

pub const HELP: &str = r#"Type lines to append them to the document. It saves itself.

COMMANDS:
    :go <path>      Open another document (blank path is ignored)
    :set <text>     Replace the whole document
    :clear          Empty the document
    :show           Print the document
    :status         Print the save status
    :flush          Save now instead of waiting
    :retry          Retry after a failed save
    :help           Show this help
    :quit           Leave (unsaved edits from the last second are dropped)
    ::text          Append a line that starts with ':'
"#;
