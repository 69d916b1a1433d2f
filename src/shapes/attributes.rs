//! Shape catalog and randomized per-instance attribute generation
//!
//! Every shape instance gets a fresh, internally consistent attribute set.
//! Bounding boxes are built from two independent coordinate draws sorted
//! per axis, and stroke widths and radii shrink with the density divisor so
//! that visual weight tracks canvas size.

use crate::io::configuration::{MIN_STROKE_BOUND, ROUNDED_CORNER_ATTEMPTS};
use crate::io::error::{PoisonError, Result};
use crate::math::probability::{uniform, uniform_inclusive};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Pixel coordinate pair `(x, y)`
pub type Vertex = (i32, i32);

/// Drawing primitives available to the renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Elliptic arc stroke
    Arc,
    /// Ellipse segment cut by a chord
    Chord,
    /// Circle around a centre point
    Circle,
    /// Poly-line with rounded joints
    Curve,
    /// Axis-aligned ellipse
    Ellipse,
    /// Straight thick segment
    Line,
    /// Ellipse sector
    PieSlice,
    /// Scattered single pixels
    Point,
    /// Closed polygon
    Polygon,
    /// Axis-aligned rectangle
    Rectangle,
    /// Equilateral polygon inscribed in a circle
    RegularPolygon,
    /// Rectangle with selectively rounded corners
    RoundedRectangle,
}

impl ShapeKind {
    /// The full built-in catalog
    pub const ALL: [Self; 12] = [
        Self::Arc,
        Self::Chord,
        Self::Circle,
        Self::Curve,
        Self::Ellipse,
        Self::Line,
        Self::PieSlice,
        Self::Point,
        Self::Polygon,
        Self::Rectangle,
        Self::RegularPolygon,
        Self::RoundedRectangle,
    ];

    /// Catalog name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arc => "arc",
            Self::Chord => "chord",
            Self::Circle => "circle",
            Self::Curve => "curve",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::PieSlice => "pieslice",
            Self::Point => "point",
            Self::Polygon => "polygon",
            Self::Rectangle => "rectangle",
            Self::RegularPolygon => "regular_polygon",
            Self::RoundedRectangle => "rounded_rectangle",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = PoisonError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = match normalized.as_str() {
            "pie_slice" => "pieslice",
            "regularpolygon" => "regular_polygon",
            "roundedrectangle" => "rounded_rectangle",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| PoisonError::UnsupportedShape {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned box with `x0 <= x1` and `y0 <= y1`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    /// Left edge (inclusive)
    pub x0: i32,
    /// Top edge (inclusive)
    pub y0: i32,
    /// Right edge (inclusive)
    pub x1: i32,
    /// Bottom edge (inclusive)
    pub y1: i32,
}

impl BoundingBox {
    /// Build a box from two corners in any order
    pub fn from_corners(a: Vertex, b: Vertex) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    /// Whether both axes are ordered
    pub const fn is_well_formed(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }
}

/// Box-defined shape with a stroke width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxAttributes {
    /// Bounds of the shape
    pub bbox: BoundingBox,
    /// Outline width in pixels
    pub width: u32,
}

/// Arc, chord and pie slice attributes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcAttributes {
    /// Bounds of the full ellipse
    pub bbox: BoundingBox,
    /// Start angle in degrees, clockwise from 3 o'clock
    pub start: f32,
    /// End angle in degrees
    pub end: f32,
    /// Stroke width in pixels
    pub width: u32,
}

/// Circle attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircleAttributes {
    /// Centre of the circle
    pub center: Vertex,
    /// Radius in pixels
    pub radius: u32,
    /// Outline width in pixels
    pub width: u32,
}

/// Two-point segment attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineAttributes {
    /// First endpoint
    pub start: Vertex,
    /// Second endpoint
    pub end: Vertex,
    /// Stroke width in pixels
    pub width: u32,
}

/// Multi-vertex path attributes shared by curves and polygons
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathAttributes {
    /// Vertices in drawing order
    pub vertices: Vec<Vertex>,
    /// Stroke width shared by every segment
    pub width: u32,
}

/// Scattered pixel attributes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointAttributes {
    /// Pixels to set
    pub vertices: Vec<Vertex>,
}

/// Regular polygon attributes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegularPolygonAttributes {
    /// Centre of the bounding circle
    pub center: Vertex,
    /// Radius of the bounding circle
    pub radius: u32,
    /// Number of sides
    pub sides: usize,
    /// Rotation in degrees
    pub rotation: f32,
    /// Outline width in pixels
    pub width: u32,
}

/// Rounded rectangle attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundedRectangleAttributes {
    /// Bounds of the rectangle
    pub bbox: BoundingBox,
    /// Corner radius; 0 when the box could not fit any rounding
    pub radius: u32,
    /// Outline width in pixels
    pub width: u32,
    /// Which corners are rounded: top-left, top-right, bottom-right, bottom-left
    pub corners: [bool; 4],
}

/// One shape instance with its kind-specific attributes
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeSpec {
    /// Elliptic arc stroke
    Arc(ArcAttributes),
    /// Chord-cut ellipse segment
    Chord(ArcAttributes),
    /// Circle
    Circle(CircleAttributes),
    /// Poly-line with rounded joints
    Curve(PathAttributes),
    /// Ellipse
    Ellipse(BoxAttributes),
    /// Thick segment
    Line(LineAttributes),
    /// Ellipse sector
    PieSlice(ArcAttributes),
    /// Scattered pixels
    Point(PointAttributes),
    /// Closed polygon
    Polygon(PathAttributes),
    /// Rectangle
    Rectangle(BoxAttributes),
    /// Regular polygon
    RegularPolygon(RegularPolygonAttributes),
    /// Rounded rectangle
    RoundedRectangle(RoundedRectangleAttributes),
}

impl ShapeSpec {
    /// Kind of this instance
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Arc(_) => ShapeKind::Arc,
            Self::Chord(_) => ShapeKind::Chord,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Curve(_) => ShapeKind::Curve,
            Self::Ellipse(_) => ShapeKind::Ellipse,
            Self::Line(_) => ShapeKind::Line,
            Self::PieSlice(_) => ShapeKind::PieSlice,
            Self::Point(_) => ShapeKind::Point,
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::RegularPolygon(_) => ShapeKind::RegularPolygon,
            Self::RoundedRectangle(_) => ShapeKind::RoundedRectangle,
        }
    }

    /// Sample attributes for one instance of `kind`
    ///
    /// `points` sets the vertex count of curves, polygons, point clouds and
    /// the side count of regular polygons. `density` divides the smaller
    /// canvas side to bound stroke widths and radii.
    pub fn sample<R: Rng + ?Sized>(
        kind: ShapeKind,
        height: u32,
        width: u32,
        points: usize,
        density: u32,
        rng: &mut R,
    ) -> Self {
        let sampler = AttributeSampler {
            height,
            width,
            density,
        };

        match kind {
            ShapeKind::Arc => Self::Arc(sampler.arc(rng)),
            ShapeKind::Chord => Self::Chord(sampler.arc(rng)),
            ShapeKind::PieSlice => Self::PieSlice(sampler.arc(rng)),
            ShapeKind::Circle => Self::Circle(CircleAttributes {
                center: sampler.vertex(rng),
                radius: sampler.stroke_width(rng),
                width: sampler.stroke_width(rng),
            }),
            ShapeKind::Curve => Self::Curve(sampler.path(points, rng)),
            ShapeKind::Polygon => Self::Polygon(sampler.path(points, rng)),
            ShapeKind::Ellipse => Self::Ellipse(sampler.boxed(rng)),
            ShapeKind::Rectangle => Self::Rectangle(sampler.boxed(rng)),
            ShapeKind::Line => Self::Line(LineAttributes {
                start: sampler.vertex(rng),
                end: sampler.vertex(rng),
                width: sampler.stroke_width(rng),
            }),
            ShapeKind::Point => Self::Point(PointAttributes {
                vertices: (0..points).map(|_| sampler.vertex(rng)).collect(),
            }),
            ShapeKind::RegularPolygon => Self::RegularPolygon(RegularPolygonAttributes {
                center: sampler.vertex(rng),
                radius: sampler.stroke_width(rng),
                sides: points.max(3),
                rotation: uniform(rng, 0.0, 360.0) as f32,
                width: sampler.stroke_width(rng),
            }),
            ShapeKind::RoundedRectangle => Self::RoundedRectangle(sampler.rounded_rectangle(rng)),
        }
    }
}

/// Upper bound for stroke widths and radii on a canvas
///
/// `max(min(height, width) / density, 2)`, so small canvases and large
/// divisors still leave room for a visible stroke.
pub fn stroke_bound(height: u32, width: u32, density: u32) -> u32 {
    (height.min(width) / density.max(1)).max(MIN_STROKE_BOUND)
}

struct AttributeSampler {
    height: u32,
    width: u32,
    density: u32,
}

impl AttributeSampler {
    fn stroke_width<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        uniform_inclusive(rng, 1, stroke_bound(self.height, self.width, self.density))
    }

    fn coordinate<R: Rng + ?Sized>(rng: &mut R, extent: u32) -> i32 {
        uniform_inclusive(rng, 0, extent.saturating_sub(1)) as i32
    }

    fn vertex<R: Rng + ?Sized>(&self, rng: &mut R) -> Vertex {
        (
            Self::coordinate(rng, self.width),
            Self::coordinate(rng, self.height),
        )
    }

    // Two independent draws, sorted so the lower one comes first
    fn axis<R: Rng + ?Sized>(rng: &mut R, extent: u32) -> (i32, i32) {
        let a = Self::coordinate(rng, extent);
        let b = Self::coordinate(rng, extent);
        (a.min(b), a.max(b))
    }

    fn bbox<R: Rng + ?Sized>(&self, rng: &mut R) -> BoundingBox {
        let (x0, x1) = Self::axis(rng, self.width);
        let (y0, y1) = Self::axis(rng, self.height);
        BoundingBox { x0, y0, x1, y1 }
    }

    fn boxed<R: Rng + ?Sized>(&self, rng: &mut R) -> BoxAttributes {
        BoxAttributes {
            bbox: self.bbox(rng),
            width: self.stroke_width(rng),
        }
    }

    fn arc<R: Rng + ?Sized>(&self, rng: &mut R) -> ArcAttributes {
        ArcAttributes {
            bbox: self.bbox(rng),
            start: uniform(rng, 0.0, 360.0) as f32,
            end: uniform(rng, 0.0, 360.0) as f32,
            width: self.stroke_width(rng),
        }
    }

    fn path<R: Rng + ?Sized>(&self, points: usize, rng: &mut R) -> PathAttributes {
        PathAttributes {
            vertices: (0..points).map(|_| self.vertex(rng)).collect(),
            width: self.stroke_width(rng),
        }
    }

    fn rounded_rectangle<R: Rng + ?Sized>(&self, rng: &mut R) -> RoundedRectangleAttributes {
        let mut radius = self.stroke_width(rng);
        let width = self.stroke_width(rng);
        let corners = [
            rng.random_bool(0.5),
            rng.random_bool(0.5),
            rng.random_bool(0.5),
            rng.random_bool(0.5),
        ];

        let (x0, x1) = Self::fitted_axis(rng, self.width, radius);
        let (y0, y1) = Self::fitted_axis(rng, self.height, radius);

        // Clamp the radius when either axis ran out of attempts
        radius = radius.min(corner_fit(x0, x1)).min(corner_fit(y0, y1));

        RoundedRectangleAttributes {
            bbox: BoundingBox { x0, y0, x1, y1 },
            radius,
            width,
            corners,
        }
    }

    fn fitted_axis<R: Rng + ?Sized>(rng: &mut R, extent: u32, radius: u32) -> (i32, i32) {
        let mut best = Self::axis(rng, extent);
        for _ in 0..ROUNDED_CORNER_ATTEMPTS {
            if corner_fit(best.0, best.1) >= radius {
                return best;
            }
            let candidate = Self::axis(rng, extent);
            if candidate.1 - candidate.0 > best.1 - best.0 {
                best = candidate;
            }
        }
        best
    }
}

/// Largest corner radius `r` with `lo + r + 1 <= hi - r - 1`, or 0
pub fn corner_fit(lo: i32, hi: i32) -> u32 {
    let span = i64::from(hi) - i64::from(lo) - 2;
    if span < 0 { 0 } else { (span / 2) as u32 }
}
