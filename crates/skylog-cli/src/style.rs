//! Visual styling utilities for the CLI.

use owo_colors::OwoColorize;

/// Outdoor temperature thresholds (Celsius).
pub mod temperature {
    pub const FREEZING: f64 = 0.0; // Cyan: <= 0°C
    pub const HOT: f64 = 30.0; // Orange: >= 30°C
}

/// Color a pre-formatted temperature by its Celsius value.
pub fn format_temp_colored(text: &str, celsius: f64, no_color: bool) -> String {
    if no_color {
        return text.to_string();
    }

    if celsius <= temperature::FREEZING {
        format!("{}", text.cyan())
    } else if celsius >= temperature::HOT {
        // Orange color (RGB: 255, 165, 0)
        format!("{}", text.truecolor(255, 165, 0))
    } else {
        format!("{}", text.yellow())
    }
}

/// Format a city name.
pub fn format_city(city: &str, no_color: bool) -> String {
    if no_color {
        city.to_string()
    } else {
        format!("{}", city.cyan())
    }
}

/// Dim secondary text such as timestamps.
pub fn format_dimmed(text: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("{}", text.dimmed())
    }
}

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".yellow(), message)
    }
}

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    let rule = "━".repeat(title.chars().count());
    if no_color {
        format!("{}\n{}", title, rule)
    } else {
        format!("{}\n{}", title.bold(), rule.dimmed())
    }
}

/// Apply the table style used for all tabular output.
pub fn apply_table_style(table: &mut tabled::Table, no_color: bool) {
    use tabled::settings::Style;
    if no_color {
        table.with(Style::ascii());
    } else {
        table.with(Style::rounded());
    }
}
