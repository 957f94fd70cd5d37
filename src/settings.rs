//! Snap toggles and query parameters passed explicitly to entity queries

use crate::types::Point;
use std::fmt;

/// Kind of snap candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    /// Segment or curve end point
    End,
    /// Segment midpoint
    Mid,
    /// Circle, arc or ellipse centre
    Centre,
    /// Point on the boundary nearest to the cursor
    Nearest,
    /// 0°, 90°, 180° and 270° points of circular shapes
    Quadrant,
}

impl SnapKind {
    /// Short command-line style name
    pub fn shortcut(&self) -> &'static str {
        match self {
            SnapKind::End => "END",
            SnapKind::Mid => "MID",
            SnapKind::Centre => "CEN",
            SnapKind::Nearest => "NEA",
            SnapKind::Quadrant => "QUA",
        }
    }
}

impl fmt::Display for SnapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shortcut())
    }
}

/// A snap candidate reported by an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub point: Point,
    pub kind: SnapKind,
    /// Distance from the cursor position the query was made with
    pub distance: f64,
}

impl SnapPoint {
    pub fn new(point: Point, kind: SnapKind, mouse: Point) -> Self {
        SnapPoint {
            point,
            kind,
            distance: point.distance(&mouse),
        }
    }
}

/// Which snap kinds are active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapSettings {
    pub end: bool,
    pub mid: bool,
    pub centre: bool,
    pub nearest: bool,
    pub quadrant: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        SnapSettings {
            end: true,
            mid: true,
            centre: true,
            nearest: true,
            quadrant: true,
        }
    }
}

impl SnapSettings {
    /// Every snap kind switched off
    pub fn none() -> Self {
        SnapSettings {
            end: false,
            mid: false,
            centre: false,
            nearest: false,
            quadrant: false,
        }
    }

    /// Only the given kind switched on
    pub fn only(kind: SnapKind) -> Self {
        let mut settings = SnapSettings::none();
        match kind {
            SnapKind::End => settings.end = true,
            SnapKind::Mid => settings.mid = true,
            SnapKind::Centre => settings.centre = true,
            SnapKind::Nearest => settings.nearest = true,
            SnapKind::Quadrant => settings.quadrant = true,
        }
        settings
    }

    pub fn allows(&self, kind: SnapKind) -> bool {
        match kind {
            SnapKind::End => self.end,
            SnapKind::Mid => self.mid,
            SnapKind::Centre => self.centre,
            SnapKind::Nearest => self.nearest,
            SnapKind::Quadrant => self.quadrant,
        }
    }
}

/// Parameters of estimated geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuerySettings {
    /// Character width as a fraction of text height
    pub text_width_factor: f64,
    /// Number of samples taken along a spline
    pub spline_samples: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        QuerySettings {
            text_width_factor: 0.6,
            spline_samples: 100,
        }
    }
}

/// Collects snap candidates, dropping kinds the settings switch off
pub(crate) struct SnapCollector<'a> {
    settings: &'a SnapSettings,
    mouse: Point,
    delta: f64,
    points: Vec<SnapPoint>,
}

impl<'a> SnapCollector<'a> {
    pub(crate) fn new(mouse: Point, delta: f64, settings: &'a SnapSettings) -> Self {
        SnapCollector {
            settings,
            mouse,
            delta,
            points: Vec::new(),
        }
    }

    /// Add a candidate if its kind is enabled and it lies within `delta`
    pub(crate) fn push(&mut self, kind: SnapKind, point: Point) {
        if !self.settings.allows(kind) {
            return;
        }
        let candidate = SnapPoint::new(point, kind, self.mouse);
        if candidate.distance <= self.delta {
            self.points.push(candidate);
        }
    }

    pub(crate) fn mouse(&self) -> Point {
        self.mouse
    }

    pub(crate) fn wants(&self, kind: SnapKind) -> bool {
        self.settings.allows(kind)
    }

    pub(crate) fn finish(self) -> Vec<SnapPoint> {
        self.points
    }
}
