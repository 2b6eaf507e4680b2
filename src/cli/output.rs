//! Shared CLI output formatting, matching the teacher corpus's
//! colorized-label style (`owo-colors`) rather than hand-rolled ANSI codes.

use std::fmt::Display;

use owo_colors::OwoColorize;

pub fn header(version: &str) {
    println!("{} {}", "arbiscan".bold(), version.dimmed());
    println!();
}

pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
}

pub fn field(label: &str, value: impl Display) {
    println!("  {:<16} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    println!("  {} {}", "\u{2713}".green(), message);
}

pub fn warning(message: &str) {
    println!("  {} {}", "\u{26a0}".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("  {} {}", "\u{d7}".red(), message);
}

pub fn positive(value: impl Display) -> String {
    format!("{}", value.to_string().green())
}

pub fn negative(value: impl Display) -> String {
    format!("{}", value.to_string().red())
}

pub fn muted(value: impl Display) -> String {
    format!("{}", value.to_string().dimmed())
}

pub fn note(message: impl Display) {
    println!("  {}", message.to_string().dimmed());
}
