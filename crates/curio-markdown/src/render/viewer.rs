//! Image zoom overlay state and per-image load status.
//!
//! The host renders images bounded-height and lazy-loaded; clicking one
//! opens the full-screen zoom overlay this state machine models. All
//! transitions are safe to fire in any state: a stray Escape or a second
//! close is a no-op, not an error.

use serde::Serialize;

/// Text the host shows in place of an image that failed to load.
pub const LOAD_FAILURE_PLACEHOLDER: &str = "Image failed to load";

/// The click-to-zoom overlay. One per page, toggling between `Closed` and
/// `Open`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageViewer {
    #[default]
    Closed,
    Open {
        src: String,
        fullscreen: bool,
    },
}

impl ImageViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the overlay on `src`. Re-opening while open switches the image
    /// and drops back out of fullscreen.
    pub fn open(&mut self, src: impl Into<String>) {
        *self = ImageViewer::Open {
            src: src.into(),
            fullscreen: false,
        };
    }

    /// Fullscreen toggle; no-op while closed.
    pub fn toggle_fullscreen(&mut self) {
        if let ImageViewer::Open { fullscreen, .. } = self {
            *fullscreen = !*fullscreen;
        }
    }

    /// The Escape / backdrop-click path. Idempotent.
    pub fn close(&mut self) {
        *self = ImageViewer::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ImageViewer::Open { .. })
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(
            self,
            ImageViewer::Open {
                fullscreen: true,
                ..
            }
        )
    }

    pub fn src(&self) -> Option<&str> {
        match self {
            ImageViewer::Open { src, .. } => Some(src),
            ImageViewer::Closed => None,
        }
    }
}

/// Load status the host reports back per rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    #[default]
    Loading,
    Loaded,
    Failed,
}

impl ImageStatus {
    /// Whether the host should swap the image element for the inline
    /// failure placeholder.
    pub fn shows_placeholder(&self) -> bool {
        matches!(self, ImageStatus::Failed)
    }
}
