use crate::compositor::types::Resolved;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine placement anchors for a watermark inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::CenterLeft,
        Position::Center,
        Position::CenterRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::TopCenter => "top-center",
            Position::TopRight => "top-right",
            Position::CenterLeft => "center-left",
            Position::Center => "center",
            Position::CenterRight => "center-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomCenter => "bottom-center",
            Position::BottomRight => "bottom-right",
        }
    }

    /// Lenient parse. Unrecognized strings resolve to `bottom-right` with a
    /// fallback diagnostic instead of failing the run.
    pub fn parse(s: &str) -> Resolved<Position> {
        let normalized = s.trim().to_lowercase();
        let parsed = match normalized.as_str() {
            "top-left" => Some(Position::TopLeft),
            "top-center" => Some(Position::TopCenter),
            "top-right" => Some(Position::TopRight),
            "center-left" => Some(Position::CenterLeft),
            "center" => Some(Position::Center),
            "center-right" => Some(Position::CenterRight),
            "bottom-left" => Some(Position::BottomLeft),
            "bottom-center" => Some(Position::BottomCenter),
            "bottom-right" => Some(Position::BottomRight),
            // Older template files name the center row "middle".
            "middle-left" => Some(Position::CenterLeft),
            "middle-right" => Some(Position::CenterRight),
            _ => None,
        };
        match parsed {
            Some(position) => Resolved::exact(position),
            None => Resolved::defaulted(Position::BottomRight, s, "unknown position name"),
        }
    }

    /// Top-left coordinate for an `item`-sized watermark inside `container`,
    /// with `margin` honored on the edges this position touches. Centered
    /// axes ignore the margin. Signed so an oversized item lands partly
    /// outside the container instead of panicking.
    pub fn anchor(
        &self,
        container: (u32, u32),
        item: (u32, u32),
        margin: (u32, u32),
    ) -> (i64, i64) {
        let (cw, ch) = (i64::from(container.0), i64::from(container.1));
        let (iw, ih) = (i64::from(item.0), i64::from(item.1));
        let (mx, my) = (i64::from(margin.0), i64::from(margin.1));
        match self {
            Position::TopLeft => (mx, my),
            Position::TopCenter => ((cw - iw) / 2, my),
            Position::TopRight => (cw - iw - mx, my),
            Position::CenterLeft => (mx, (ch - ih) / 2),
            Position::Center => ((cw - iw) / 2, (ch - ih) / 2),
            Position::CenterRight => (cw - iw - mx, (ch - ih) / 2),
            Position::BottomLeft => (mx, ch - ih - my),
            Position::BottomCenter => ((cw - iw) / 2, ch - ih - my),
            Position::BottomRight => (cw - iw - mx, ch - ih - my),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
