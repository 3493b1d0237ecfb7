//! A signed 24.8 fixed-point number used in the wayland protocol.

#[cfg(test)]
mod tests;

use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// A signed 24.8 fixed-point number used in the wayland protocol.
///
/// This is a signed decimal type which offers a sign bit, 23 bits of integer
/// precision and 8 bits of decimal precision. It is the wire representation of
/// sub-pixel coordinates such as pointer positions.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default)]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// The largest [`Fixed`].
    pub const MAX: Self = Self(i32::MAX);

    /// The smallest [`Fixed`].
    pub const MIN: Self = Self(i32::MIN);

    /// The 0 [`Fixed`].
    pub const ZERO: Self = Self(0);

    /// The 1 [`Fixed`].
    pub const ONE: Self = Self(256);

    /// The smallest positive [`Fixed`].
    pub const EPSILON: Self = Self(1);

    /// Creates a [`Fixed`] from the raw bits that appear in the wire protocol.
    #[inline]
    pub const fn from_wire(val: i32) -> Self {
        Self(val)
    }

    /// Converts this [`Fixed`] to the bits that should be set in the wire protocol.
    #[inline]
    pub const fn to_wire(self) -> i32 {
        self.0
    }

    /// Converts this [`Fixed`] to an `f64`.
    ///
    /// This conversion is lossless.
    #[inline]
    pub const fn to_f64(self) -> f64 {
        self.0 as f64 / 256.0
    }

    /// Creates a [`Fixed`] from an `f64`.
    ///
    /// If the value cannot be represented exactly, the behavior is as when an
    /// `f64` is cast to an integer: values are rounded towards 0, `NaN` returns
    /// [`Fixed::ZERO`], and out-of-range values are clamped to [`Fixed::MIN`]
    /// and [`Fixed::MAX`].
    #[inline]
    pub const fn from_f64_lossy(val: f64) -> Self {
        Self((val * 256.0) as i32)
    }

    /// Creates a [`Fixed`] from an `i32`.
    ///
    /// Values outside of the representable range are clamped to [`Fixed::MIN`]
    /// and [`Fixed::MAX`].
    #[inline]
    pub const fn from_i32_saturating(val: i32) -> Self {
        Self(val.saturating_mul(256))
    }

    /// Converts this [`Fixed`] to an `i32`, rounding towards minus infinity.
    #[inline]
    pub const fn to_i32_floor(self) -> i32 {
        self.0 >> 8
    }

    /// Converts this [`Fixed`] to an `i32`, rounding towards zero.
    #[inline]
    pub const fn to_i32_round_towards_zero(self) -> i32 {
        (self.0 as i64 / 256) as i32
    }
}

impl From<Fixed> for f64 {
    #[inline]
    fn from(value: Fixed) -> Self {
        value.to_f64()
    }
}

impl From<i16> for Fixed {
    #[inline]
    fn from(value: i16) -> Self {
        Self(value as i32 * 256)
    }
}

impl From<u16> for Fixed {
    #[inline]
    fn from(value: u16) -> Self {
        Self(value as i32 * 256)
    }
}

impl Debug for Fixed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.to_f64(), f)
    }
}

impl Display for Fixed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.to_f64(), f)
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Fixed(self.0 + rhs.0)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Fixed(self.0 - rhs.0)
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Self::Output {
        Fixed(-self.0)
    }
}
