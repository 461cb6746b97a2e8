//! Colour types and conversions.
//!
//! `Rgb` is the 8-bit sRGB colour that crosses the pipeline boundary. `Lab`
//! is the CIE L*a*b* (D65) space all statistics and projections are computed
//! in; it never leaves the crate's intermediate computations except through
//! the low-level API.

pub mod convert;
pub mod robust;

pub use convert::{lab_to_rgb, rgb_to_lab};
pub use robust::robust_color;

/// 8-bit sRGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure black, also the sentinel for "no samples".
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Creates a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats the colour as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(value: Rgb) -> Self {
        [value.r, value.g, value.b]
    }
}

/// CIE L*a*b* colour relative to the D65 white point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Lab {
    /// Lightness, nominally in `[0, 100]`.
    pub l: f64,
    /// Green–red opponent axis.
    pub a: f64,
    /// Blue–yellow opponent axis.
    pub b: f64,
}

impl Lab {
    /// Creates a Lab colour from its components.
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Returns the components as `[l, a, b]`.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }
}

impl From<[f64; 3]> for Lab {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}
