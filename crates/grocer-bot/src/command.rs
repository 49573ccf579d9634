// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command parsing.

/// A recognized chat command with its argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Add(String),
    List,
    /// Empty argument opens the remove picker.
    Remove(String),
    RemoveAll(String),
    Clear,
    Suggest,
    Recipe(String),
    Help,
    Unknown(String),
}

impl Command {
    /// Label used for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Add(_) => "add",
            Command::List => "list",
            Command::Remove(_) => "remove",
            Command::RemoveAll(_) => "removeall",
            Command::Clear => "clear",
            Command::Suggest => "suggest",
            Command::Recipe(_) => "recipe",
            Command::Help => "help",
            Command::Unknown(_) => "unknown",
        }
    }
}

/// Parses `/cmd[@botname] [args]`. Text that is not a command yields `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    let body = text.strip_prefix('/')?;
    let (head, args) = match body.find(char::is_whitespace) {
        Some(at) => (&body[..at], body[at..].trim()),
        None => (body, ""),
    };
    let name = head.split('@').next().unwrap_or(head).to_lowercase();
    let args = args.to_string();

    Some(match name.as_str() {
        "start" => Command::Start,
        "add" => Command::Add(args),
        "list" => Command::List,
        "remove" => Command::Remove(args),
        "removeall" => Command::RemoveAll(args),
        "clear" => Command::Clear,
        "suggest" => Command::Suggest,
        "recipe" => Command::Recipe(args),
        "help" => Command::Help,
        _ => Command::Unknown(name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("milk please"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn arguments_are_trimmed() {
        assert_eq!(
            parse_command("/add   eggs, milk  "),
            Some(Command::Add("eggs, milk".into()))
        );
        assert_eq!(parse_command("/add"), Some(Command::Add(String::new())));
    }

    #[test]
    fn bot_suffix_and_case_are_ignored() {
        assert_eq!(parse_command("/List@grocer_bot"), Some(Command::List));
        assert_eq!(
            parse_command("/recipe@grocer_bot https://x.test/pie"),
            Some(Command::Recipe("https://x.test/pie".into()))
        );
    }

    #[test]
    fn multiline_arguments_are_kept() {
        assert_eq!(
            parse_command("/add\nmilk\nbread"),
            Some(Command::Add("milk\nbread".into()))
        );
    }

    #[test]
    fn removeall_is_not_remove() {
        assert_eq!(
            parse_command("/removeall rice"),
            Some(Command::RemoveAll("rice".into()))
        );
        assert_eq!(parse_command("/remove"), Some(Command::Remove(String::new())));
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(parse_command("/frobnicate now"), Some(Command::Unknown("frobnicate".into())));
        assert_eq!(Command::Unknown("x".into()).name(), "unknown");
    }
}
