//! Terminal colours for light and dark mode.

use crate::app::domain::palette::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalTheme {
    pub text: Rgb,
    pub muted: Rgb,
    /// Whether to emit ANSI escapes at all
    pub ansi: bool,
}

impl TerminalTheme {
    pub fn new(is_dark: bool, ansi: bool) -> Self {
        if is_dark {
            Self {
                text: Rgb(220, 220, 220),
                muted: Rgb(150, 150, 150),
                ansi,
            }
        } else {
            Self {
                text: Rgb(30, 30, 30),
                muted: Rgb(100, 100, 100),
                ansi,
            }
        }
    }

    /// Wrap `text` in a 24-bit foreground colour escape.
    pub fn paint(&self, colour: Rgb, text: &str) -> String {
        if !self.ansi {
            return text.to_string();
        }
        let Rgb(r, g, b) = colour;
        format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, text)
    }
}
