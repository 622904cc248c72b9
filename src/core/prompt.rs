//! Interactive confirmation capability
//!
//! Branch-mismatch confirmation, the commit message, and the final go/no-go
//! are human-in-the-loop decision points. They go through the `Prompter`
//! trait so headless invocations (`--yes`, tests) supply deterministic
//! answers instead of blocking on a terminal.

use crate::core::error::ReleaseResult;
use std::io::{BufRead, Write};

/// Supplies answers to the pipeline's decision points
pub trait Prompter {
  /// Yes/no question; `default` is used on an empty answer
  fn confirm(&mut self, question: &str, default: bool) -> ReleaseResult<bool>;

  /// Free-form question; `default` is used on an empty answer
  fn prompt_line(&mut self, question: &str, default: &str) -> ReleaseResult<String>;
}

/// Reads answers from stdin
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
  fn confirm(&mut self, question: &str, default: bool) -> ReleaseResult<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    print!("{} [{}] ", question, hint);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    Ok(match answer.trim().to_lowercase().as_str() {
      "" => default,
      "y" | "yes" => true,
      _ => false,
    })
  }

  fn prompt_line(&mut self, question: &str, default: &str) -> ReleaseResult<String> {
    print!("{} [{}] ", question, default);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    let answer = answer.trim();
    Ok(if answer.is_empty() {
      default.to_string()
    } else {
      answer.to_string()
    })
  }
}

/// Headless prompter: every question resolves to its default
pub struct AssumeDefaults;

impl Prompter for AssumeDefaults {
  fn confirm(&mut self, _question: &str, default: bool) -> ReleaseResult<bool> {
    Ok(default)
  }

  fn prompt_line(&mut self, _question: &str, default: &str) -> ReleaseResult<String> {
    Ok(default.to_string())
  }
}
