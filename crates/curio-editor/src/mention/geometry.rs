//! Dropdown placement math.
//!
//! The editing surface is a plain textarea, so the caret position is
//! estimated rather than measured: line index from newline counts, column
//! width from a monospace approximation of the font size. The host feeds
//! in the surface's measured geometry and scroll offsets; the result is
//! clamped so the dropdown never leaves the viewport.

/// Horizontal margin the dropdown keeps from the viewport edges.
pub const VIEWPORT_MARGIN: f64 = 10.0;

/// Estimated glyph width as a fraction of the font size.
pub const CHAR_WIDTH_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Measured geometry of the editable element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    /// Viewport coordinates of the element's top-left corner.
    pub left: f64,
    pub top: f64,
    /// Computed inner padding.
    pub padding: f64,
    /// Computed line height.
    pub line_height: f64,
    /// Computed font size; glyph width is estimated from it.
    pub font_size: f64,
    /// The element's own scroll offsets.
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl SurfaceMetrics {
    pub fn char_width(&self) -> f64 {
        self.font_size * CHAR_WIDTH_RATIO
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropdownSize {
    pub width: f64,
    pub height: f64,
}

/// Estimates the on-screen anchor for a dropdown attached to the character
/// at `index`: just below the caret's line, at the caret's column.
pub fn caret_anchor(text: &str, index: usize, metrics: &SurfaceMetrics) -> Point {
    let before = text.get(..index).unwrap_or(text);
    let line = before.matches('\n').count();
    let column = match before.rfind('\n') {
        Some(newline_pos) => before[newline_pos + 1..].chars().count(),
        None => before.chars().count(),
    };

    Point {
        x: metrics.left + metrics.padding + column as f64 * metrics.char_width() - metrics.scroll_x,
        y: metrics.top + metrics.padding + (line as f64 + 1.0) * metrics.line_height
            - metrics.scroll_y,
    }
}

/// Keeps the dropdown inside the viewport: flips above the caret when it
/// would overflow the bottom edge, and clamps horizontally inside a
/// [`VIEWPORT_MARGIN`] gutter.
pub fn clamp_to_viewport(
    anchor: Point,
    dropdown: DropdownSize,
    viewport: ViewportSize,
    metrics: &SurfaceMetrics,
) -> Point {
    let max_x = viewport.width - dropdown.width - VIEWPORT_MARGIN;
    let x = anchor.x.min(max_x).max(VIEWPORT_MARGIN);

    let y = if anchor.y + dropdown.height > viewport.height {
        anchor.y - metrics.line_height - dropdown.height
    } else {
        anchor.y
    };

    Point { x, y }
}
