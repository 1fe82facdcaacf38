use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// An sRGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string. The leading `#` is optional; an alpha
    /// suffix (`#rrggbbaa`) is accepted and ignored.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("invalid color: {s}"))
    }
}

/// Line colors handed out to exercises, in assignment order.
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(0x3b, 0x82, 0xf6), // blue
    Color::rgb(0xef, 0x44, 0x44), // red
    Color::rgb(0xf5, 0x9e, 0x0b), // amber
    Color::rgb(0x10, 0xb9, 0x81), // emerald
    Color::rgb(0x8b, 0x5c, 0xf6), // violet
    Color::rgb(0xec, 0x48, 0x99), // pink
    Color::rgb(0xf9, 0x73, 0x16), // orange
    Color::rgb(0x14, 0xb8, 0xa6), // teal
];

/// Marker color for personal record points.
pub const PR_COLOR: Color = Color::rgb(0x07, 0x60, 0x28);

/// Assigns each exercise a display color that stays fixed for the session.
///
/// The mapping is filled lazily and never shrinks. Once every palette entry
/// is taken, new exercises share the first palette color.
#[derive(Debug, Clone)]
pub struct ExerciseColorizer {
    palette: Vec<Color>,
    assigned: HashMap<String, Color>,
}

impl Default for ExerciseColorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseColorizer {
    pub fn new() -> Self {
        Self::with_palette(DEFAULT_PALETTE.to_vec())
    }

    /// Use a custom palette. An empty palette falls back to
    /// [`DEFAULT_PALETTE`].
    pub fn with_palette(palette: Vec<Color>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    pub fn color_for(&mut self, exercise: &str) -> Color {
        if let Some(c) = self.assigned.get(exercise) {
            return *c;
        }
        let color = self
            .palette
            .iter()
            .copied()
            .find(|c| !self.assigned.values().any(|used| used == c))
            .unwrap_or(self.palette[0]);
        log::debug!("Assigned color {color} to {exercise}");
        self.assigned.insert(exercise.to_string(), color);
        color
    }

    /// Look up a color without assigning one.
    pub fn peek(&self, exercise: &str) -> Option<Color> {
        self.assigned.get(exercise).copied()
    }
}
