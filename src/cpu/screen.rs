// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's framebuffer

use owo_colors::{OwoColorize, Style};
use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;
/// Total number of pixels on the screen
pub const PIXELS: usize = WIDTH * HEIGHT;

/// A 64x32 monochrome framebuffer, one byte (`0` or `1`) per pixel, row-major.
///
/// The dirty flag is raised whenever the screen is cleared or drawn to, and
/// is lowered by the host once it has consumed the frame.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ScreenSnapshot"))]
pub struct Screen {
    pixels: Vec<u8>,
    dirty: bool,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ScreenSnapshot {
    pixels: Vec<u8>,
    dirty: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<ScreenSnapshot> for Screen {
    type Error = crate::error::Error;

    fn try_from(snapshot: ScreenSnapshot) -> crate::error::Result<Self> {
        let ScreenSnapshot { pixels, dirty } = snapshot;
        if pixels.len() != PIXELS {
            return Err(crate::error::Error::InvalidSnapshot {
                reason: format!("screen has {} pixels, expected {PIXELS}", pixels.len()),
            });
        }
        // flip() relies on every pixel being exactly 0 or 1
        if pixels.iter().any(|&pixel| pixel > 1) {
            return Err(crate::error::Error::InvalidSnapshot {
                reason: "screen pixels must be 0 or 1".to_string(),
            });
        }
        Ok(Screen { pixels, dirty })
    }
}

impl Screen {
    /// Creates a blank, clean screen
    pub fn new() -> Self {
        Screen {
            pixels: vec![0; PIXELS],
            dirty: false,
        }
    }

    /// Gets the raw pixel buffer
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Gets the pixel at (x, y), if it's on screen
    /// # Examples
    /// ```rust
    /// # use chip8_core::prelude::*;
    /// let screen = Screen::new();
    /// assert_eq!(Some(false), screen.get(63, 31));
    /// assert_eq!(None, screen.get(64, 0));
    /// ```
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        Some(self.pixels[y * WIDTH + x] != 0)
    }

    /// Zeroes every pixel, and marks the screen dirty
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.dirty = true;
    }

    /// XORs a lit pixel into the buffer at `index`, modulo the buffer size.
    ///
    /// Returns true if the pixel was already lit (a collision).
    pub(crate) fn flip(&mut self, index: usize) -> bool {
        let pixel = &mut self.pixels[index % PIXELS];
        let collision = *pixel == 1;
        *pixel ^= 1;
        collision
    }

    /// Reports whether the screen has changed since the host last consumed it
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Raises the dirty flag
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Lowers the dirty flag
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Screen")
            .field("lit", &self.pixels.iter().filter(|&&p| p != 0).count())
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Draws the screen two rows per line of text, using half-block characters
impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let term: Style = Style::new().green().on_black();
        for rows in self.pixels.chunks_exact(WIDTH * 2) {
            let (top, bottom) = rows.split_at(WIDTH);
            let line: String = top
                .iter()
                .zip(bottom)
                .map(|(&top, &bottom)| match (top, bottom) {
                    (0, 0) => ' ',
                    (_, 0) => '▀',
                    (0, _) => '▄',
                    _ => '█',
                })
                .collect();
            writeln!(f, "{}", line.style(term))?;
        }
        Ok(())
    }
}
