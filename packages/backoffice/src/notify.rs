//! One-line status messages on stderr.
//!
//! Stdout carries command output (tables, JSON) so it can be piped;
//! everything addressed to the person at the terminal goes to stderr.

use colored::Colorize as _;

pub fn success(message: impl AsRef<str>) {
    eprintln!("{} {}", "✔".green().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    eprintln!("{} {}", "!".yellow().bold(), message.as_ref());
}

pub fn failure(message: impl AsRef<str>) {
    eprintln!("{} {}", "✘".red().bold(), message.as_ref());
}

pub fn info(message: impl AsRef<str>) {
    eprintln!("{}", message.as_ref().dimmed());
}
