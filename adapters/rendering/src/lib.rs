#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Clash and Conquer adapters.

mod button;

use clash_conquer_core::{ProjectileSnapshot, WorldPoint};
use glam::Vec2;
use std::{error::Error, fmt};

pub use button::{
    ButtonStyle, ButtonVisual, DrawKind, DrawRect, HighlightButton, DEFAULT_BORDER_THICKNESS,
    DEFAULT_HIGHLIGHT_MARGIN,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the default button border.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Converts a world position into the vector type used by renderers.
#[must_use]
pub fn to_screen(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Unit vector pointing along the projectile's direction of travel.
#[must_use]
pub fn projectile_heading(snapshot: &ProjectileSnapshot) -> Vec2 {
    Vec2::from_angle(snapshot.heading_radians)
}

/// Sprite rotation for a projectile, in degrees clockwise from the positive x
/// axis in a y-down screen space.
#[must_use]
pub fn projectile_rotation_degrees(snapshot: &ProjectileSnapshot) -> f32 {
    snapshot.heading_radians.to_degrees()
}

/// Errors that can occur when constructing presentation descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Button dimensions must be positive and finite.
    InvalidButtonSize {
        /// Provided size that failed validation.
        size: Vec2,
    },
    /// The border must leave room for the button's interior.
    BorderTooThick {
        /// Requested border thickness in pixels.
        border_thickness: u32,
        /// Button size the border was applied to.
        size: Vec2,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidButtonSize { size } => {
                write!(
                    f,
                    "button size must be positive and finite (received {}x{})",
                    size.x, size.y
                )
            }
            Self::BorderTooThick {
                border_thickness,
                size,
            } => {
                write!(
                    f,
                    "border of {border_thickness}px leaves no interior in a {}x{} button",
                    size.x, size.y
                )
            }
        }
    }
}

impl Error for RenderingError {}
