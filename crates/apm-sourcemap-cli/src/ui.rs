//! Status messages for terminal output.

use console::style;

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Print one list item to stdout, so listings can be piped
pub fn item(message: &str) {
    println!("  {}", message);
}

/// Apply `--no-color` and environment overrides to `console` styling.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}
