mod checks;
mod commands;
mod core;
mod ui;

use crate::core::error::print_error;
use crate::core::version::BumpKind;
use clap::{Parser, Subcommand};

/// Release automation for the Quarterdeck terminal
#[derive(Parser)]
#[command(name = "deckhand")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Cut a release: bump, commit, tag, push, watch CI, verify artifacts
  Release {
    /// Version component to bump
    #[arg(value_enum, default_value_t = BumpKind::Patch)]
    bump: BumpKind,
    /// Answer every confirmation with its default (headless use)
    #[arg(short, long)]
    yes: bool,
    /// Stop after pushing; don't wait for CI or verify artifacts
    #[arg(long)]
    no_monitor: bool,
    /// Commit message (default: "Release v<version>")
    #[arg(short, long)]
    message: Option<String>,
  },
  /// Show current version, tag, CI and release state
  Status {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Watch the CI run for a release tag, then verify its artifacts
  Monitor {
    /// Release tag (default: v<manifest version>)
    tag: Option<String>,
  },
  /// Verify the published artifacts of a release
  Check {
    /// Release tag (default: v<manifest version>)
    tag: Option<String>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Release {
      bump,
      yes,
      no_monitor,
      message,
    } => commands::run_release(&commands::release::ReleaseOptions {
      bump,
      assume_yes: yes,
      no_monitor,
      message,
    }),
    Commands::Status { json } => commands::run_status(json),
    Commands::Monitor { tag } => commands::run_monitor(tag),
    Commands::Check { tag } => commands::run_check(tag),
  };

  if let Err(err) = result {
    print_error(&err);
    std::process::exit(1);
  }
}
