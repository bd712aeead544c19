//! Terminal colors for rendered diagnostics

use std::env;
use std::io::{self, IsTerminal};

/// Console output handler with color support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Console {
    color_enabled: bool,
}

impl Console {
    /// Colors when stderr is a terminal and `NO_COLOR` is unset
    pub fn new() -> Self {
        Self {
            color_enabled: io::stderr().is_terminal() && env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Create a console with colors disabled
    pub fn no_colors() -> Self {
        Self {
            color_enabled: false,
        }
    }

    /// Create a console that always emits ANSI colors
    pub fn colored() -> Self {
        Self {
            color_enabled: true,
        }
    }

    pub fn is_color_enabled(&self) -> bool {
        self.color_enabled
    }

    /// Colorize text with the specified color
    pub fn colorize(&self, text: &str, color: Color) -> String {
        if !self.color_enabled || text.is_empty() {
            return text.to_string();
        }

        match color {
            Color::Red => format!("\x1b[31m{text}\x1b[0m"),
            Color::Yellow => format!("\x1b[33m{text}\x1b[0m"),
            Color::Blue => format!("\x1b[34m{text}\x1b[0m"),
            Color::Cyan => format!("\x1b[36m{text}\x1b[0m"),
            Color::Dim => format!("\x1b[2m{text}\x1b[0m"),
            Color::Bold => format!("\x1b[1m{text}\x1b[0m"),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// ANSI color codes for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Cyan,
    Dim,
    Bold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_colors() {
        let console = Console::no_colors();
        assert!(!console.is_color_enabled());
        assert_eq!(console.colorize("test", Color::Red), "test");
    }

    #[test]
    fn test_colored() {
        let console = Console::colored();
        assert_eq!(console.colorize("x", Color::Red), "\x1b[31mx\x1b[0m");
        assert_eq!(console.colorize("", Color::Bold), "");
    }
}
