use glam::Vec2;

use crate::{Color, RenderingError};

/// Pixels added to every side of a button while it is highlighted.
pub const DEFAULT_HIGHLIGHT_MARGIN: f32 = 2.0;

/// Border thickness, in pixels, used unless a style overrides it.
pub const DEFAULT_BORDER_THICKNESS: u32 = 2;

/// Colors and border settings shared by both visuals of a button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonStyle {
    /// Color drawn inside the border.
    pub fill: Color,
    /// Color of the border rings.
    pub border: Color,
    /// Number of one-pixel rings that make up the border.
    pub border_thickness: u32,
    /// When set, only the border is drawn and the interior stays empty.
    pub transparent: bool,
}

impl ButtonStyle {
    /// Creates an opaque style with a white two-pixel border.
    #[must_use]
    pub const fn new(fill: Color) -> Self {
        Self {
            fill,
            border: Color::WHITE,
            border_thickness: DEFAULT_BORDER_THICKNESS,
            transparent: false,
        }
    }

    /// Replaces the border color.
    #[must_use]
    pub const fn with_border(self, border: Color) -> Self {
        Self { border, ..self }
    }

    /// Replaces the border thickness.
    #[must_use]
    pub const fn with_border_thickness(self, border_thickness: u32) -> Self {
        Self {
            border_thickness,
            ..self
        }
    }

    /// Skips the interior fill so only the border is drawn.
    #[must_use]
    pub const fn transparent(self) -> Self {
        Self {
            transparent: true,
            ..self
        }
    }
}

/// Whether a rectangle is stroked or filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    /// One-pixel outline.
    Outline,
    /// Solid fill.
    Fill,
}

/// Rectangle draw operation in the visual's local pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRect {
    /// Top-left corner relative to the visual's own top-left corner.
    pub origin: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
    /// Color to draw with.
    pub color: Color,
    /// Outline or fill.
    pub kind: DrawKind,
}

/// Pre-rendered button image described as an ordered list of draw operations.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonVisual {
    size: Vec2,
    operations: Vec<DrawRect>,
}

impl ButtonVisual {
    /// Renders a visual of the provided size.
    ///
    /// Border rings are emitted outermost first, followed by the interior fill
    /// unless the style is transparent.
    #[must_use]
    pub fn render(size: Vec2, style: &ButtonStyle) -> Self {
        let mut operations = Vec::new();

        for ring in 0..style.border_thickness {
            let inset = ring as f32;
            let ring_size = size - Vec2::splat(1.0 + inset * 2.0);
            if ring_size.cmplt(Vec2::ZERO).any() {
                break;
            }
            operations.push(DrawRect {
                origin: Vec2::splat(inset),
                size: ring_size,
                color: style.border,
                kind: DrawKind::Outline,
            });
        }

        if !style.transparent {
            let border = style.border_thickness as f32;
            operations.push(DrawRect {
                origin: Vec2::splat(border),
                size: (size - Vec2::splat(border * 2.0)).max(Vec2::ZERO),
                color: style.fill,
                kind: DrawKind::Fill,
            });
        }

        Self { size, operations }
    }

    /// Overall width and height of the visual.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Draw operations in painting order.
    #[must_use]
    pub fn operations(&self) -> &[DrawRect] {
        &self.operations
    }
}

/// Button that swaps to an enlarged visual while the cursor hovers over it.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightButton {
    center: Vec2,
    style: ButtonStyle,
    normal: ButtonVisual,
    highlighted: ButtonVisual,
    is_highlighted: bool,
}

impl HighlightButton {
    /// Creates a button centred on `center` using the default highlight margin.
    pub fn new(center: Vec2, size: Vec2, style: ButtonStyle) -> Result<Self, RenderingError> {
        Self::with_margin(center, size, style, DEFAULT_HIGHLIGHT_MARGIN)
    }

    /// Creates a button whose highlighted visual grows by `margin` on every side.
    pub fn with_margin(
        center: Vec2,
        size: Vec2,
        style: ButtonStyle,
        margin: f32,
    ) -> Result<Self, RenderingError> {
        if !size.is_finite() || size.cmple(Vec2::ZERO).any() {
            return Err(RenderingError::InvalidButtonSize { size });
        }
        if style.border_thickness as f32 * 2.0 >= size.min_element() {
            return Err(RenderingError::BorderTooThick {
                border_thickness: style.border_thickness,
                size,
            });
        }

        let margin = if margin.is_finite() {
            margin.max(0.0)
        } else {
            DEFAULT_HIGHLIGHT_MARGIN
        };

        Ok(Self {
            center,
            style,
            normal: ButtonVisual::render(size, &style),
            highlighted: ButtonVisual::render(size + Vec2::splat(margin * 2.0), &style),
            is_highlighted: false,
        })
    }

    /// Selects the visual shown for this tick.
    pub fn update(&mut self, hovered: bool) {
        self.is_highlighted = hovered;
    }

    /// Hit-tests the cursor against the current visual and updates the
    /// highlight accordingly. Returns whether the button is now highlighted.
    pub fn track_cursor(&mut self, cursor: Option<Vec2>) -> bool {
        let hovered = cursor.is_some_and(|cursor| self.contains(cursor));
        self.update(hovered);
        hovered
    }

    /// Reports whether the cursor lies within the currently shown visual.
    ///
    /// The left and top edges are inside the button, the right and bottom
    /// edges are not.
    #[must_use]
    pub fn contains(&self, cursor: Vec2) -> bool {
        let min = self.top_left();
        let max = min + self.current().size();
        cursor.cmpge(min).all() && cursor.cmplt(max).all()
    }

    /// Visual to draw this tick.
    #[must_use]
    pub const fn current(&self) -> &ButtonVisual {
        if self.is_highlighted {
            &self.highlighted
        } else {
            &self.normal
        }
    }

    /// Screen position of the current visual's top-left corner.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        self.center - self.current().size() * 0.5
    }

    /// Whether the enlarged visual is shown.
    #[must_use]
    pub const fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }

    /// Position the button is centred on.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Style shared by both visuals.
    #[must_use]
    pub const fn style(&self) -> &ButtonStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::from_rgb_u8(200, 40, 40);

    fn rect(origin: f32, size: f32, color: Color, kind: DrawKind) -> DrawRect {
        DrawRect {
            origin: Vec2::splat(origin),
            size: Vec2::splat(size),
            color,
            kind,
        }
    }

    fn button() -> HighlightButton {
        HighlightButton::new(
            Vec2::new(100.0, 100.0),
            Vec2::splat(20.0),
            ButtonStyle::new(RED),
        )
        .expect("valid button")
    }

    #[test]
    fn normal_visual_draws_border_rings_then_fill() {
        let button = button();

        assert_eq!(button.current().size(), Vec2::splat(20.0));
        assert_eq!(
            button.current().operations(),
            &[
                rect(0.0, 19.0, Color::WHITE, DrawKind::Outline),
                rect(1.0, 17.0, Color::WHITE, DrawKind::Outline),
                rect(2.0, 16.0, RED, DrawKind::Fill),
            ]
        );
    }

    #[test]
    fn highlighted_visual_is_enlarged_by_margin() {
        let mut button = button();
        button.update(true);

        assert!(button.is_highlighted());
        assert_eq!(button.current().size(), Vec2::splat(24.0));
        assert_eq!(
            button.current().operations(),
            &[
                rect(0.0, 23.0, Color::WHITE, DrawKind::Outline),
                rect(1.0, 21.0, Color::WHITE, DrawKind::Outline),
                rect(2.0, 20.0, RED, DrawKind::Fill),
            ]
        );
        assert_eq!(button.top_left(), Vec2::splat(88.0));

        button.update(false);
        assert_eq!(button.current().size(), Vec2::splat(20.0));
    }

    #[test]
    fn hit_test_follows_current_visual() {
        let mut button = button();
        let edge = Vec2::new(111.0, 100.0);

        assert!(button.contains(Vec2::new(90.0, 90.0)));
        assert!(!button.contains(Vec2::new(110.0, 100.0)));
        assert!(!button.contains(edge));

        button.update(true);
        assert!(button.contains(edge));
    }

    #[test]
    fn tracking_cursor_keeps_highlight_within_enlarged_bounds() {
        let mut button = button();

        assert!(button.track_cursor(Some(Vec2::new(105.0, 105.0))));
        assert!(button.track_cursor(Some(Vec2::new(111.0, 100.0))));
        assert!(!button.track_cursor(Some(Vec2::new(130.0, 100.0))));
        assert!(!button.track_cursor(None));
        assert!(!button.is_highlighted());
    }

    #[test]
    fn transparent_style_draws_border_only() {
        let style = ButtonStyle::new(RED)
            .with_border(Color::BLACK)
            .with_border_thickness(1)
            .transparent();
        let visual = ButtonVisual::render(Vec2::new(30.0, 10.0), &style);

        assert_eq!(
            visual.operations(),
            &[DrawRect {
                origin: Vec2::ZERO,
                size: Vec2::new(29.0, 9.0),
                color: Color::BLACK,
                kind: DrawKind::Outline,
            }]
        );
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let style = ButtonStyle::new(RED);

        assert_eq!(
            HighlightButton::new(Vec2::ZERO, Vec2::new(0.0, 10.0), style),
            Err(RenderingError::InvalidButtonSize {
                size: Vec2::new(0.0, 10.0),
            })
        );
        assert_eq!(
            HighlightButton::new(Vec2::ZERO, Vec2::splat(4.0), style),
            Err(RenderingError::BorderTooThick {
                border_thickness: 2,
                size: Vec2::splat(4.0),
            })
        );
    }
}
