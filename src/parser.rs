//! Command-line tokenization
//!
//! Turns one raw input line into a [`Command`]: an argument vector, optional
//! stdin/stdout redirection targets and a background flag. Pure functions,
//! no shared state; every malformed line is rejected whole, so a parse error
//! never yields a partial command.
//!
//! Grammar, in brief: tokens are separated by spaces and tabs. A token
//! beginning with `>` (`<`) names the stdout (stdin) redirection target,
//! either glued to the operator (`>out.txt`) or as the following token
//! (`> out.txt`). A trailing token that is exactly `&` detaches the command
//! into the background. Everything else is an argument.

use std::fmt;
use std::path::PathBuf;

/// Length bounds enforced during tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum accepted input line length in bytes (newline excluded)
    pub max_line_len: usize,
    /// Any single token at or beyond this length is rejected
    pub max_token_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_len: 512,
            max_token_len: 256,
        }
    }
}

/// One parsed command line, ready for the launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    /// Program name followed by its arguments; empty only for a blank line
    pub argv: Vec<String>,
    /// Redirect the child's standard input from this file
    pub stdin_redirect: Option<PathBuf>,
    /// Redirect the child's standard output into this file (create/truncate)
    pub stdout_redirect: Option<PathBuf>,
    /// Detach into the background instead of waiting
    pub background: bool,
}

impl Command {
    /// True when the line held nothing to execute (blank, or a lone `&`).
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }

    /// The program name, when present.
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

/// Tokenization failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A redirect operator with no path after it
    MissingRedirectPath { op: char },
    /// A single token reached the per-token length bound
    TokenTooLong { len: usize, max: usize },
    /// The whole line exceeded the input length bound
    LineTooLong { len: usize, max: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRedirectPath { op } => {
                write!(f, "missing path after '{}' operator", op)
            }
            ParseError::TokenTooLong { len, max } => {
                write!(f, "argument too long ({} bytes, limit {})", len, max)
            }
            ParseError::LineTooLong { len, max } => {
                write!(f, "input line too long ({} bytes, limit {})", len, max)
            }
        }
    }
}

impl std::error::Error for ParseError {}

fn check_token(tok: &str, limits: &Limits) -> Result<(), ParseError> {
    if tok.len() >= limits.max_token_len {
        return Err(ParseError::TokenTooLong {
            len: tok.len(),
            max: limits.max_token_len,
        });
    }
    Ok(())
}

/// Parse one input line into a [`Command`].
///
/// A blank line (whitespace only) parses successfully to an empty command;
/// callers treat that as a no-op. A lone `&` does the same; the background
/// flag without a program is deliberately not an error.
pub fn parse(line: &str, limits: &Limits) -> Result<Command, ParseError> {
    if line.len() > limits.max_line_len {
        return Err(ParseError::LineTooLong {
            len: line.len(),
            max: limits.max_line_len,
        });
    }

    let tokens: Vec<&str> = line.split([' ', '\t']).filter(|t| !t.is_empty()).collect();

    let mut cmd = Command::default();

    // A trailing `&`, whitespace-separated, detaches the command; it is not
    // an argument. Anywhere else `&` is an ordinary token.
    let mut end = tokens.len();
    if tokens.last() == Some(&"&") {
        cmd.background = true;
        end -= 1;
    }

    let mut i = 0;
    while i < end {
        let tok = tokens[i];
        let op = match tok.as_bytes().first() {
            Some(b'>') => Some('>'),
            Some(b'<') => Some('<'),
            _ => None,
        };

        match op {
            Some(op) => {
                let rest = &tok[1..];
                let path = if !rest.is_empty() {
                    rest
                } else {
                    // Bare operator: the next token is the path. A dangling
                    // operator, or one chased by another operator token, has
                    // no path.
                    i += 1;
                    match tokens.get(i) {
                        Some(&next)
                            if i < end && !next.starts_with('>') && !next.starts_with('<') =>
                        {
                            next
                        }
                        _ => return Err(ParseError::MissingRedirectPath { op }),
                    }
                };
                check_token(path, limits)?;
                // A repeated redirect of the same direction: last one wins.
                if op == '>' {
                    cmd.stdout_redirect = Some(PathBuf::from(path));
                } else {
                    cmd.stdin_redirect = Some(PathBuf::from(path));
                }
            }
            None => {
                check_token(tok, limits)?;
                cmd.argv.push(tok.to_string());
            }
        }
        i += 1;
    }

    Ok(cmd)
}
