//! Command-text tokenizer
//!
//! Splits a raw slash-command string into ordered tokens. Tokens are
//! separated by runs of whitespace; a token wrapped in straight (`"`) or
//! curly (`“` / `”`) double quotes may contain embedded whitespace, and a
//! doubled quote inside a quoted token unescapes to a single literal quote.

use std::iter::Peekable;
use std::str::Chars;

/// Tokenize `raw` into ordered tokens.
///
/// Empty input yields no tokens, and repeated delimiters never produce
/// empty tokens. An unterminated quote is not an error: the remainder of
/// the input becomes the content of the open token.
pub fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(&c) = chars.peek() {
        if is_delimiter(c) {
            chars.next();
        } else if is_quote(c) {
            chars.next();
            tokens.push(read_quoted(&mut chars));
        } else {
            tokens.push(read_bare(&mut chars));
        }
    }

    tokens
}

/// Read a quoted token body, consuming the closing quote.
///
/// Two consecutive quote characters inside the body collapse into one
/// literal `"`. Opening and closing quote styles may be mixed.
fn read_quoted(chars: &mut Peekable<Chars>) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next() {
        if is_quote(c) {
            if chars.peek().copied().is_some_and(is_quote) {
                out.push('"');
                chars.next();
            } else {
                break;
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Read a maximal run of non-delimiter, non-quote characters.
fn read_bare(chars: &mut Peekable<Chars>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if is_delimiter(c) || is_quote(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n' | '\t')
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}')
}
