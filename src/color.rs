//! Color model with exact, reversible RGB and HSV conversion.
//!
//! A [`Color`] always carries both representations: components built from RGB get
//! their HSV triple computed, components built from HSV get their RGB computed, and
//! the triple you passed in is kept exactly as given. That last point matters for
//! arithmetic: adding, subtracting and dividing colors works on the HSV triple only,
//! so per-tick increments (which are usually not valid colors on their own) survive
//! accumulation without being squeezed through RGB.
//!
//! Two colors compare equal when their packed 24-bit forms match, which is coarser
//! than comparing components.

use core::fmt::{self, Write};
use core::ops::{Add, Div, Sub};

use palette::Srgb;

/// Spread between the largest and smallest channel below which a color is treated
/// as achromatic, regardless of its brightness.
pub const ACHROMATIC_EPSILON: f32 = 1e-5;

/// Hue reported for achromatic colors whose maximum channel is not positive.
pub const UNDEFINED_HUE: f32 = -1.0;

/// Hue in degrees, saturation and value as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Degrees in `[0, 360)`, or [`UNDEFINED_HUE`].
    pub hue: f32,
    /// Fraction in `[0, 1]`.
    pub saturation: f32,
    /// Fraction in `[0, 1]`.
    pub value: f32,
}

impl Hsv {
    /// Creates an HSV triple without normalizing it.
    #[inline]
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Returns true if the hue carries the undefined sentinel.
    pub fn is_hue_undefined(&self) -> bool {
        self.hue == UNDEFINED_HUE && self.saturation == 0.0
    }
}

/// Converts RGB fractions to HSV.
pub fn rgb_to_hsv(rgb: Srgb) -> Hsv {
    let (r, g, b) = (rgb.red, rgb.green, rgb.blue);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta <= ACHROMATIC_EPSILON {
        return Hsv::new(0.0, 0.0, max);
    }
    if max <= 0.0 {
        return Hsv::new(UNDEFINED_HUE, 0.0, max);
    }

    let sector = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    let hue = sector * 60.0;
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    Hsv::new(hue, delta / max, max)
}

/// Converts HSV to RGB fractions.
///
/// Hue outside `[0, 360)` is wrapped, saturation and value are clamped into
/// `[0, 1]`. The input triple itself is not touched.
pub fn hsv_to_rgb(hsv: Hsv) -> Srgb {
    let s = hsv.saturation.clamp(0.0, 1.0);
    let v = hsv.value.clamp(0.0, 1.0);

    if s == 0.0 {
        return Srgb::new(v, v, v);
    }

    let sector = wrap_hue(hsv.hue) / 60.0;
    let i = libm::floorf(sector);
    let f = sector - i;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match (i as u32) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Srgb::new(r, g, b)
}

/// Wraps a hue in degrees into `[0, 360)`.
pub fn wrap_hue(hue: f32) -> f32 {
    if (0.0..360.0).contains(&hue) {
        return hue;
    }
    let wrapped = hue % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// An immutable color holding both its RGB and HSV representation.
#[derive(Debug, Clone, Copy)]
pub struct Color {
    rgb: Srgb,
    hsv: Hsv,
}

impl Color {
    pub const BLACK: Color = Color::constant(Srgb::new(0.0, 0.0, 0.0), Hsv::new(0.0, 0.0, 0.0));
    pub const WHITE: Color = Color::constant(Srgb::new(1.0, 1.0, 1.0), Hsv::new(0.0, 0.0, 1.0));
    pub const RED: Color = Color::constant(Srgb::new(1.0, 0.0, 0.0), Hsv::new(0.0, 1.0, 1.0));
    pub const GREEN: Color = Color::constant(Srgb::new(0.0, 1.0, 0.0), Hsv::new(120.0, 1.0, 1.0));
    pub const BLUE: Color = Color::constant(Srgb::new(0.0, 0.0, 1.0), Hsv::new(240.0, 1.0, 1.0));
    pub const GREY: Color = Color::constant(
        Srgb::new(166.0 / 255.0, 166.0 / 255.0, 166.0 / 255.0),
        Hsv::new(0.0, 0.0, 166.0 / 255.0),
    );

    /// Pairs a precomputed RGB and HSV; callers keep them consistent.
    const fn constant(rgb: Srgb, hsv: Hsv) -> Self {
        Self { rgb, hsv }
    }

    /// Creates a color from RGB fractions in `[0, 1]`.
    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        let rgb = Srgb::new(red, green, blue);
        Self {
            rgb,
            hsv: rgb_to_hsv(rgb),
        }
    }

    /// Creates a color from hue in degrees and saturation/value fractions.
    ///
    /// The triple is stored as given; only the derived RGB is normalized.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let hsv = Hsv::new(hue, saturation, value);
        Self {
            rgb: hsv_to_rgb(hsv),
            hsv,
        }
    }

    /// Creates a color from 8-bit channels.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgb(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
        )
    }

    /// Creates a color from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub fn from_packed(packed: u32) -> Self {
        Self::from_rgb8(
            ((packed >> 16) & 0xFF) as u8,
            ((packed >> 8) & 0xFF) as u8,
            (packed & 0xFF) as u8,
        )
    }

    #[inline]
    pub fn rgb(&self) -> Srgb {
        self.rgb
    }

    #[inline]
    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    #[inline]
    pub fn hue(&self) -> f32 {
        self.hsv.hue
    }

    #[inline]
    pub fn saturation(&self) -> f32 {
        self.hsv.saturation
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.hsv.value
    }

    /// Packed `0xRRGGBB` form as sent to the pixel strip.
    ///
    /// Each channel is snapped to the nearest 1/100 before scaling to 0-255.
    pub fn packed(&self) -> u32 {
        (pack_channel(self.rgb.red) << 16)
            | (pack_channel(self.rgb.green) << 8)
            | pack_channel(self.rgb.blue)
    }

    /// 8-bit channels of the packed form.
    pub fn rgb8(&self) -> (u8, u8, u8) {
        let packed = self.packed();
        (
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        )
    }

    /// Packed form as six uppercase hex digits, for diagnostics.
    pub fn hex(&self) -> heapless::String<6> {
        let mut s = heapless::String::new();
        // Six digits always fit.
        let _ = write!(s, "{:06X}", self.packed());
        s
    }

    /// Same hue and saturation with a different value.
    pub fn with_value(&self, value: f32) -> Self {
        Self::from_hsv(self.hsv.hue, self.hsv.saturation, value)
    }

    /// True if the packed form is pure black.
    pub fn is_black(&self) -> bool {
        self.packed() == 0
    }
}

fn pack_channel(component: f32) -> u32 {
    let stepped = libm::roundf(component.clamp(0.0, 1.0) * 100.0) / 100.0;
    libm::roundf(stepped * 255.0) as u32
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.packed() == other.packed()
    }
}

impl Eq for Color {}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::from_hsv(
            self.hsv.hue + rhs.hsv.hue,
            self.hsv.saturation + rhs.hsv.saturation,
            self.hsv.value + rhs.hsv.value,
        )
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        Color::from_hsv(
            self.hsv.hue - rhs.hsv.hue,
            self.hsv.saturation - rhs.hsv.saturation,
            self.hsv.value - rhs.hsv.value,
        )
    }
}

impl Div<f32> for Color {
    type Output = Color;

    fn div(self, rhs: f32) -> Color {
        Color::from_hsv(
            self.hsv.hue / rhs,
            self.hsv.saturation / rhs,
            self.hsv.value / rhs,
        )
    }
}

impl From<Srgb> for Color {
    fn from(rgb: Srgb) -> Self {
        Color::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}

impl From<Color> for Srgb {
    fn from(color: Color) -> Self {
        color.rgb
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.packed())
    }
}
