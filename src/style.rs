//! Style: 256-color escape sequences for pre-styled cell content.
//!
//! Styling is pure string construction. Callers build styled text here and
//! then place it in a cell; the renderer writes cell content verbatim.
//!
//! ```text
//! style_text("hi", Color::Red, Color::Black, true)
//!   => ESC[38;5;9m ESC[48;5;0m hi ESC[0m
//! ```

use bitflags::bitflags;
use std::fmt::{self, Write};
use std::str::FromStr;

/// Reset all attributes.
pub const RESET: &str = "\x1b[0m";
/// Prefix of an 8-bit foreground select (`ESC[38;5;{n}m`).
pub const FG_PREFIX: &str = "\x1b[38;5;";
/// Prefix of an 8-bit background select (`ESC[48;5;{n}m`).
pub const BG_PREFIX: &str = "\x1b[48;5;";

/// The 16 named palette colors.
///
/// Ordinals follow the standard xterm palette, so the escape code of a
/// color is its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    /// Palette 0.
    Black = 0,
    /// Palette 1.
    DarkRed,
    /// Palette 2.
    DarkGreen,
    /// Palette 3.
    DarkYellow,
    /// Palette 4.
    DarkBlue,
    /// Palette 5.
    DarkMagenta,
    /// Palette 6.
    DarkCyan,
    /// Palette 7.
    Gray,
    /// Palette 8.
    DarkGray,
    /// Palette 9.
    Red,
    /// Palette 10.
    Green,
    /// Palette 11.
    Yellow,
    /// Palette 12.
    Blue,
    /// Palette 13.
    Magenta,
    /// Palette 14.
    Cyan,
    /// Palette 15.
    White,
}

impl Color {
    /// Every color, in palette order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::DarkRed,
        Self::DarkGreen,
        Self::DarkYellow,
        Self::DarkBlue,
        Self::DarkMagenta,
        Self::DarkCyan,
        Self::Gray,
        Self::DarkGray,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// The 8-bit palette code (`ordinal mod 256`).
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The color's name as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::DarkRed => "dark-red",
            Self::DarkGreen => "dark-green",
            Self::DarkYellow => "dark-yellow",
            Self::DarkBlue => "dark-blue",
            Self::DarkMagenta => "dark-magenta",
            Self::DarkCyan => "dark-cyan",
            Self::Gray => "gray",
            Self::DarkGray => "dark-gray",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A color name that is not in the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color: {:?}", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    /// Case-insensitive; `_`, `-` and spaces are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|color| color.name().replace('-', "") == wanted)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use tickscreen::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::UNDERLINE;
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Blinking text
        const BLINK = 0b0001_0000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
        /// Hidden/invisible text
        const HIDDEN = 0b0100_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b1000_0000;
    }
}

impl Modifiers {
    /// SGR parameter for each modifier, in emission order.
    const SGR: [(Self, u8); 8] = [
        (Self::BOLD, 1),
        (Self::DIM, 2),
        (Self::ITALIC, 3),
        (Self::UNDERLINE, 4),
        (Self::BLINK, 5),
        (Self::REVERSED, 7),
        (Self::HIDDEN, 8),
        (Self::STRIKETHROUGH, 9),
    ];
}

/// Wrap `text` in foreground and background color selects.
///
/// When `append_reset` is false the caller is responsible for resetting,
/// otherwise the styling bleeds into whatever is written next.
pub fn style_text(text: &str, fg: Color, bg: Color, append_reset: bool) -> String {
    let mut out = String::with_capacity(text.len() + 24);
    push_colors(&mut out, fg, bg);
    out.push_str(text);
    if append_reset {
        out.push_str(RESET);
    }
    out
}

fn push_colors(out: &mut String, fg: Color, bg: Color) {
    let _ = write!(out, "{FG_PREFIX}{}m{BG_PREFIX}{}m", fg.code(), bg.code());
}

/// A reusable foreground/background/modifier combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Extra attributes.
    pub modifiers: Modifiers,
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Color::White, Color::Black)
    }
}

impl Style {
    /// Create a style with no modifiers.
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            modifiers: Modifiers::empty(),
        }
    }

    /// Builder: set the foreground.
    #[must_use]
    pub const fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Builder: set the background.
    #[must_use]
    pub const fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Builder: add modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.union(modifiers);
        self
    }

    /// Styled text followed by a reset.
    pub fn paint(&self, text: &str) -> String {
        self.render(text, true)
    }

    /// Styled text without a trailing reset.
    pub fn paint_open(&self, text: &str) -> String {
        self.render(text, false)
    }

    fn render(&self, text: &str, append_reset: bool) -> String {
        if self.modifiers.is_empty() {
            return style_text(text, self.fg, self.bg, append_reset);
        }
        let mut out = String::with_capacity(text.len() + 32);
        push_colors(&mut out, self.fg, self.bg);
        for (flag, code) in Modifiers::SGR {
            if self.modifiers.contains(flag) {
                let _ = write!(out, "\x1b[{code}m");
            }
        }
        out.push_str(text);
        if append_reset {
            out.push_str(RESET);
        }
        out
    }
}
