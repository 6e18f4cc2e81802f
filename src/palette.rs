//! This module contains the distance gradient used to color the projected samples. The palette is
//! a fixed ramp from green (near) to red (far), built once and then only read.

use serde::{Deserialize, Serialize};

/// A linear RGBA color with channels in the range [0, 1]
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Quantize the color channels to 8 bits, dropping alpha
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// An immutable, ordered ramp of colors spanning the sensor's detection range. Entry `i` of a
/// palette with `n` steps has a red channel of `i / n` and a green channel of `1 - i / n`, so the
/// first entry is pure green and the entries move towards red as the index grows.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette with the given number of steps. The alpha channel of every entry is taken
    /// from `base`. A step count of zero is treated as one so that the palette can always be
    /// indexed.
    ///
    /// # Arguments
    ///
    /// * `steps`: the number of colors in the ramp
    /// * `base`: the color the palette entries are derived from
    ///
    /// returns: Palette
    pub fn new(steps: usize, base: &Color) -> Self {
        let steps = steps.max(1);
        let colors = (0..steps)
            .map(|i| {
                let t = i as f32 / steps as f32;
                Color::new(t, 1.0 - t, 0.0, base.a)
            })
            .collect();

        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Map a normalized distance in [0, 1] to a palette index. Exactly zero maps to index 0, and
    /// every other value maps to `ceil(normalized * (steps - 2))`. The result is clamped into the
    /// palette, which only matters for palettes of one or two steps and for inputs outside of
    /// [0, 1].
    ///
    /// Note that the ceiling uses `steps - 2`, so a normalized distance of 1.0 lands on the second
    /// to last entry and the last entry is never selected by in-range input.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_projection::{Color, Palette};
    /// let palette = Palette::new(25, &Color::WHITE);
    /// assert_eq!(palette.index_for(0.0), 0);
    /// assert_eq!(palette.index_for(0.5), 12);
    /// assert_eq!(palette.index_for(1.0), 23);
    /// ```
    pub fn index_for(&self, normalized: f64) -> usize {
        if normalized == 0.0 || normalized.is_nan() {
            return 0;
        }

        let steps = self.colors.len() as f64;
        let index = (normalized * (steps - 2.0)).ceil();
        let last = self.colors.len() - 1;

        if index <= 0.0 {
            0
        } else {
            (index as usize).min(last)
        }
    }

    /// Look up the color for a normalized distance, see `index_for`
    pub fn color_for(&self, normalized: f64) -> Color {
        self.colors[self.index_for(normalized)]
    }
}
