//! Colour values and ARGB packing.
//!
//! Surfaces carry a [`Color`] with three 8-bit channels. Everything written to
//! the frame buffer is packed ARGB8888 with alpha fixed at 255.

/// An opaque RGB colour, channels in `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts a diffuse triple in `[0, 1]` to 8-bit channels.
    ///
    /// Channels are truncated, not rounded, so `1.0` maps to 255 and `0.999`
    /// to 254.
    pub fn from_unit_rgb(rgb: [f32; 3]) -> Self {
        let channel = |c: f32| (c * 255.0).clamp(0.0, 255.0) as u8;
        Self::new(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
    }

    /// Packs the colour as ARGB8888 with full alpha.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        pack_color(self.r, self.g, self.b)
    }

    /// Multiplies every channel by `factor`, clamped to `[0, 1]`.
    pub fn scaled(self, factor: f32) -> Self {
        let factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        };
        let channel = |c: u8| (c as f32 * factor).round() as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Packs 8-bit channels into ARGB8888 with alpha fixed at 255.
#[inline]
pub const fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits an ARGB8888 value into its RGB channels; alpha is dropped.
#[inline]
pub const fn unpack_color(argb: u32) -> Color {
    Color::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
}

pub const BACKGROUND: u32 = pack_color(0, 0, 0);
pub const WIREFRAME: u32 = pack_color(255, 255, 255);
/// Surface colour for faces without a resolvable material.
pub const DEFAULT_SURFACE: Color = Color::WHITE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_with_opaque_alpha() {
        assert_eq!(pack_color(0x12, 0x34, 0x56), 0xFF12_3456);
        assert_eq!(Color::BLACK.to_argb(), 0xFF00_0000);
    }

    #[test]
    fn unpack_inverts_pack() {
        let c = Color::new(200, 100, 7);
        assert_eq!(unpack_color(c.to_argb()), c);
    }

    #[test]
    fn unit_rgb_truncates() {
        assert_eq!(Color::from_unit_rgb([1.0, 0.5, 0.0]), Color::new(255, 127, 0));
        assert_eq!(Color::from_unit_rgb([2.0, -1.0, 0.999]), Color::new(255, 0, 254));
    }

    #[test]
    fn scaling_clamps_factor() {
        let c = Color::new(200, 100, 50);
        assert_eq!(c.scaled(0.5), Color::new(100, 50, 25));
        assert_eq!(c.scaled(3.0), c);
        assert_eq!(c.scaled(-1.0), Color::BLACK);
        assert_eq!(c.scaled(f32::NAN), Color::BLACK);
    }
}
