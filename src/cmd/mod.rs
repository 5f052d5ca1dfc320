//! Slash-command parsing
//!
//! Turns the raw command text into either a help request or a create-poll
//! request: positional tokens (question + responses) plus a typed options
//! record extracted from `--flag` arguments.

pub mod duration;
pub mod tokenizer;

pub use duration::parse_duration;
pub use tokenizer::tokenize;

/// Errors produced while interpreting a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The command carried fewer than a question and two responses.
    #[error("not enough values to create the poll")]
    InsufficientTokens,

    /// The `--expires` value is not a valid duration expression.
    #[error("invalid duration expression: {0}")]
    InvalidDuration(String),

    /// An unknown flag, or a flag whose value is missing or unparsable.
    #[error("cannot interpret flag: {0}")]
    InvalidFlag(String),
}

/// Poll options parsed from command flags.
///
/// Defaults: no vote limit, never expires, voter names shown, anonymous
/// notice shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOptions {
    /// Max responses one user may vote for; `0` means unlimited.
    pub limit: u32,
    /// Raw duration expression; empty means the poll never expires.
    pub expires: String,
    /// Hide voter names in the rendered poll.
    pub anonymous: bool,
    /// Suppress the trailing "anonymous poll" notice.
    pub hide_anonymous_notice: bool,
}

/// A fully parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `--help` was present anywhere in the command.
    Help,
    /// Create a poll from positional tokens and options.
    Create {
        /// Question followed by response texts, in input order.
        tokens: Vec<String>,
        options: PollOptions,
    },
}

/// Parse raw command text into a [`Command`].
///
/// Tokens starting with `--` are consumed as flags (`--flag value` and
/// `--flag=value` forms); everything else stays positional in order.
pub fn parse(text: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(text);
    let mut positional = Vec::new();
    let mut options = PollOptions::default();

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        let Some(flag) = token.strip_prefix("--") else {
            positional.push(token);
            continue;
        };

        let (name, inline_value) = match flag.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (flag.to_string(), None),
        };

        match name.as_str() {
            "help" => return Ok(Command::Help),
            "anonymous" => options.anonymous = true,
            "no-anonymous-label" => options.hide_anonymous_notice = true,
            "limit" => {
                let value = take_value(inline_value, &mut iter, &token)?;
                options.limit = value
                    .parse()
                    .map_err(|_| CommandError::InvalidFlag(format!("--limit {value}")))?;
            }
            "expires" => {
                options.expires = take_value(inline_value, &mut iter, &token)?;
            }
            _ => return Err(CommandError::InvalidFlag(token)),
        }
    }

    Ok(Command::Create { tokens: positional, options })
}

/// Resolve a flag's value from `--flag=value` or the following token.
fn take_value(
    inline: Option<String>,
    iter: &mut std::vec::IntoIter<String>,
    flag: &str,
) -> Result<String, CommandError> {
    if let Some(value) = inline {
        return Ok(value);
    }
    match iter.next() {
        Some(value) if !value.starts_with("--") => Ok(value),
        _ => Err(CommandError::InvalidFlag(flag.to_string())),
    }
}

/// Usage text sent as an ephemeral reply to `--help`.
pub fn help_text() -> String {
    [
        "To create a simple poll, give a question and at least two responses:",
        "```",
        "/tally Drink? Beer Water",
        "```",
        "Wrap values containing spaces in double quotes:",
        "```",
        "/tally \"What ya wanna drink?\" Wine \"IPA Beer\"",
        "```",
        "Use `@label{...}` inside a response to pick the part shown on its button:",
        "```",
        "/tally \"What ya wanna drink?\" \"@label{IPA} Beer\" \"Milk @label{Stout}\"",
        "```",
        "",
        "*--limit N*",
        "Max number of responses one user can vote for. `0` (the default) means no limit.",
        "",
        "*--expires DURATION*",
        "Close voting after the given time, e.g. `--expires \"1d 2h\"` or `--expires 30min`.",
        "",
        "*--anonymous*",
        "Do not show voter names on the poll.",
        "",
        "*--no-anonymous-label*",
        "With `--anonymous`, also hide the trailing `anonymous poll` notice.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_command_has_default_options() {
        let parsed = parse("Drink? Beer Water").unwrap();
        assert_eq!(
            parsed,
            Command::Create {
                tokens: vec!["Drink?".into(), "Beer".into(), "Water".into()],
                options: PollOptions::default(),
            }
        );
    }

    #[test]
    fn flags_are_consumed_in_both_forms() {
        let Command::Create { tokens, options } =
            parse("Drink? Beer Water --limit 2 --expires=1h --anonymous").unwrap()
        else {
            panic!("expected create command");
        };
        assert_eq!(tokens, vec!["Drink?", "Beer", "Water"]);
        assert_eq!(options.limit, 2);
        assert_eq!(options.expires, "1h");
        assert!(options.anonymous);
        assert!(!options.hide_anonymous_notice);
    }

    #[test]
    fn quoted_expires_value_survives_tokenizing() {
        let Command::Create { options, .. } =
            parse("Drink? Beer Water --expires \"1d 2h\"").unwrap()
        else {
            panic!("expected create command");
        };
        assert_eq!(options.expires, "1d 2h");
    }

    #[test]
    fn help_flag_wins_regardless_of_position() {
        assert_eq!(parse("--help").unwrap(), Command::Help);
        assert_eq!(parse("Drink? --help Beer").unwrap(), Command::Help);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(matches!(
            parse("Drink? Beer Water --frobnicate"),
            Err(CommandError::InvalidFlag(_))
        ));
    }

    #[test]
    fn limit_requires_a_numeric_value() {
        assert!(matches!(
            parse("Drink? Beer Water --limit lots"),
            Err(CommandError::InvalidFlag(_))
        ));
        assert!(matches!(
            parse("Drink? Beer Water --limit"),
            Err(CommandError::InvalidFlag(_))
        ));
    }
}
