//! Helper functions for the menu-driven CLI
//!
//! They read from any `BufRead` and write to any `Write`, so a session
//! can run on stdin/stdout or on a scripted buffer.

use crate::cli::constants::*;
use crate::errors::AMOUNT_NOT_VALID_MSG;
use crate::types::Amount;
use std::io::{self, BufRead, Write};

/// **One line of user input**
#[derive(Debug, PartialEq)]
pub enum Input {
    /// A non-blank line, trimmed
    Line(String),

    /// The user just pressed Enter
    Blank,

    /// Input is closed (end of file), or unreadable
    Closed,
}

/// **Contains the menu, one entry per command.**
///
/// Kept separate from printing so we can unit-test the contents,
/// so that we don't forget to include a newly-added command in the menu.
pub fn help_contents() -> String {
    format!(
        "\nMenu:\n\
         1. Register client ({REGISTER}, r)\n\
         2. Search client ({SEARCH}, s)\n\
         3. List clients ({LIST}, l)\n\
         4. Deposit ({DEPOSIT}, d)\n\
         5. Withdraw ({WITHDRAW}, w)\n\
         6. Transfer ({TRANSFER}, t)\n\
         7. Session ledger ({LEDGER}, g)\n\
         8. Help ({HELP}, h)\n\
         0. Exit ({QUIT}, q)"
    )
}

/// **Reads one line from `reader`.**
pub fn read_line_from<R: BufRead>(reader: &mut R) -> Input {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => Input::Closed,
        Ok(_) => {
            let line = line.trim();
            if line.is_empty() {
                Input::Blank
            } else {
                Input::Line(line.to_string())
            }
        }
        Err(err) => {
            log::error!("failed to read line: {}", err);
            Input::Closed
        }
    }
}

/// **Writes `label` and reads the answer.**
///
/// # Errors
/// Fails if `label` can't be written to `out`, or if `out` can't be flushed.
pub fn read_labeled<R: BufRead, W: Write>(
    reader: &mut R,
    out: &mut W,
    label: &str,
) -> io::Result<Input> {
    write!(out, "{label}")?;
    out.flush()?;

    Ok(read_line_from(reader))
}

/// **Asks for a single value.**
///
/// A blank answer is returned as an empty string, so validation can reject it;
/// `None` means input is closed.
pub fn prompt<R: BufRead, W: Write>(
    reader: &mut R,
    out: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    Ok(match read_labeled(reader, out, label)? {
        Input::Line(line) => Some(line),
        Input::Blank => Some(String::new()),
        Input::Closed => None,
    })
}

/// Parses an amount typed by the user.
///
/// Accepts a comma as the decimal separator, too.
/// Rejects NaN and infinities.
pub fn parse_amount(word: &str) -> Option<Amount> {
    match word.trim().replace(',', ".").parse::<Amount>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => None,
    }
}

/// An error message about not being able to parse an amount,
/// more informative than the standard library's "invalid float literal".
pub fn cannot_parse_number(word: &str) -> String {
    format!("{}; you provided '{}'.", AMOUNT_NOT_VALID_MSG, word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_help_contents() {
        let menu = help_contents();
        for cmd in [
            REGISTER, SEARCH, LIST, DEPOSIT, WITHDRAW, TRANSFER, LEDGER, HELP, QUIT,
        ] {
            assert!(menu.contains(cmd), "menu is missing {cmd}");
        }
    }

    #[test]
    fn test_read_line_from() {
        let mut input = Cursor::new("  pf \n\n");
        assert_eq!(Input::Line("pf".to_string()), read_line_from(&mut input));
        assert_eq!(Input::Blank, read_line_from(&mut input));
        assert_eq!(Input::Closed, read_line_from(&mut input));
    }

    #[test]
    fn test_prompt_writes_label() {
        let mut input = Cursor::new("Alice\n\n");
        let mut out = Vec::new();

        let name = prompt(&mut input, &mut out, NAME_PROMPT).unwrap();
        assert_eq!(Some("Alice".to_string()), name);

        let blank = prompt(&mut input, &mut out, EMAIL_PROMPT).unwrap();
        assert_eq!(Some(String::new()), blank);

        assert_eq!(None, prompt(&mut input, &mut out, NAME_PROMPT).unwrap());
        assert_eq!(
            format!("{NAME_PROMPT}{EMAIL_PROMPT}{NAME_PROMPT}"),
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(Some(100.0), parse_amount("100"));
        assert_eq!(Some(40.5), parse_amount(" 40.5 "));
        assert_eq!(Some(12.25), parse_amount("12,25"));
        assert_eq!(Some(-3.0), parse_amount("-3"));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(None, parse_amount("ten"));
        assert_eq!(None, parse_amount(""));
        assert_eq!(None, parse_amount("NaN"));
        assert_eq!(None, parse_amount("inf"));
    }

    #[test]
    fn test_cannot_parse_number() {
        assert!(cannot_parse_number("ten").ends_with("you provided 'ten'."));
    }
}
