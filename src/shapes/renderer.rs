//! Draws shape instances onto the canvas through `vello_cpu`
//!
//! Fill, outline and stroke colors are drawn from the palette separately for
//! every geometric element, so a single shape usually ends up multi-colored.
//! Shapes are recorded into an anti-aliased layer that is blended over the
//! canvas on [`ShapePainter::composite`].

use crate::canvas::Palette;
use crate::io::error::{Result, invalid_configuration};
use crate::shapes::attributes::{ArcAttributes, BoundingBox, ShapeSpec, Vertex};
use image::{Rgb, RgbImage};
use rand::Rng;
use vello_cpu::kurbo::{
    Arc, BezPath, Circle, Ellipse, Join, Line, Point, Rect, RoundedRect, RoundedRectRadii, Shape,
    Stroke, Vec2,
};
use vello_cpu::peniko::{Color, Fill};
use vello_cpu::{Pixmap, RenderContext};

/// Flattening tolerance for curved outlines, in pixels
const TOLERANCE: f64 = 0.1;

/// Records shapes for one canvas and blends them over it on demand
pub struct ShapePainter {
    ctx: RenderContext,
    layer: Pixmap,
    pending: usize,
}

impl std::fmt::Debug for ShapePainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapePainter")
            .field("width", &self.layer.width())
            .field("height", &self.layer.height())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl ShapePainter {
    /// Painter for a `width` by `height` canvas
    ///
    /// # Errors
    ///
    /// Returns an invalid configuration error when either side exceeds
    /// `u16::MAX`
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let size = |side: u32| {
            u16::try_from(side).map_err(|e| {
                invalid_configuration("size", &format!("{width}x{height}"), &e)
            })
        };
        let (w, h) = (size(width)?, size(height)?);

        Ok(Self {
            ctx: RenderContext::new(w, h),
            layer: Pixmap::new(w, h),
            pending: 0,
        })
    }

    /// Shapes recorded since the last composite
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Record exactly one draw operation for `spec`
    pub fn draw<R: Rng + ?Sized>(&mut self, spec: &ShapeSpec, palette: &Palette, rng: &mut R) {
        self.pending += 1;
        match spec {
            ShapeSpec::Arc(arc) => {
                let outline = elliptic_arc(arc, stroke_inset(arc.width));
                self.stroke(&outline.to_path(TOLERANCE), arc.width, palette.choose(rng));
            }
            ShapeSpec::Chord(arc) => {
                self.fill(&chord_path(&elliptic_arc(arc, 0.0)), palette.choose(rng));
                let outline = chord_path(&elliptic_arc(arc, stroke_inset(arc.width)));
                self.stroke(&outline, arc.width, palette.choose(rng));
            }
            ShapeSpec::PieSlice(arc) => {
                self.fill(&pie_path(&elliptic_arc(arc, 0.0)), palette.choose(rng));
                let outline = pie_path(&elliptic_arc(arc, stroke_inset(arc.width)));
                self.stroke(&outline, arc.width, palette.choose(rng));
            }
            ShapeSpec::Circle(circle) => {
                let center = pixel_center(circle.center);
                let radius = f64::from(circle.radius) + 0.5;
                self.fill(&Circle::new(center, radius).to_path(TOLERANCE), palette.choose(rng));
                let outline = Circle::new(center, radius - stroke_inset(circle.width));
                self.stroke(&outline.to_path(TOLERANCE), circle.width, palette.choose(rng));
            }
            ShapeSpec::Ellipse(ellipse) => {
                let rect = pixel_rect(ellipse.bbox);
                self.fill(&Ellipse::from_rect(rect).to_path(TOLERANCE), palette.choose(rng));
                let outline = Ellipse::from_rect(rect.inset(-stroke_inset(ellipse.width)));
                self.stroke(&outline.to_path(TOLERANCE), ellipse.width, palette.choose(rng));
            }
            ShapeSpec::Curve(path) => {
                let polyline = polyline(path.vertices.iter().copied().map(pixel_center), false);
                self.stroke(&polyline, path.width, palette.choose(rng));
            }
            ShapeSpec::Line(line) => {
                let segment = Line::new(pixel_center(line.start), pixel_center(line.end));
                self.stroke(&segment.to_path(TOLERANCE), line.width.max(1), palette.choose(rng));
            }
            ShapeSpec::Point(points) => {
                for &(x, y) in &points.vertices {
                    let (x, y) = (f64::from(x), f64::from(y));
                    let dot = Rect::new(x, y, x + 1.0, y + 1.0);
                    self.ctx.set_paint(paint(palette.choose(rng)));
                    self.ctx.fill_rect(&dot);
                }
            }
            ShapeSpec::Polygon(path) => {
                let outline = polyline(path.vertices.iter().copied().map(pixel_center), true);
                self.fill(&outline, palette.choose(rng));
                self.stroke(&outline, path.width, palette.choose(rng));
            }
            ShapeSpec::Rectangle(rect) => {
                let area = pixel_rect(rect.bbox);
                self.ctx.set_paint(paint(palette.choose(rng)));
                self.ctx.fill_rect(&area);
                let outline = area.inset(-stroke_inset(rect.width));
                self.stroke(&outline.to_path(TOLERANCE), rect.width, palette.choose(rng));
            }
            ShapeSpec::RegularPolygon(polygon) => {
                let vertices = regular_polygon_vertices(
                    pixel_center(polygon.center),
                    f64::from(polygon.radius),
                    polygon.sides,
                    f64::from(polygon.rotation),
                );
                let outline = polyline(vertices, true);
                self.fill(&outline, palette.choose(rng));
                self.stroke(&outline, polygon.width, palette.choose(rng));
            }
            ShapeSpec::RoundedRectangle(rounded) => {
                let area = pixel_rect(rounded.bbox);
                let radius = f64::from(rounded.radius);
                let [tl, tr, br, bl] = rounded.corners.map(|on| if on { radius } else { 0.0 });
                let radii = RoundedRectRadii::new(tl, tr, br, bl);
                let body = RoundedRect::from_rect(area, radii);
                self.fill(&body.to_path(TOLERANCE), palette.choose(rng));
                let inset = stroke_inset(rounded.width);
                let outline = RoundedRect::from_rect(area.inset(-inset), radii);
                self.stroke(&outline.to_path(TOLERANCE), rounded.width, palette.choose(rng));
            }
        }
    }

    /// Blend every recorded shape over `canvas` and start a fresh layer
    ///
    /// Canvas pixels beyond the painter's size are left alone.
    pub fn composite(&mut self, canvas: &mut RgbImage) {
        if self.pending == 0 {
            return;
        }

        clear_layer(&mut self.layer);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.layer);

        let width = usize::from(self.layer.width());
        let source = self.layer.data_as_u8_slice();
        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            if x as usize >= width {
                continue;
            }
            let offset = (y as usize * width + x as usize) * 4;
            if let Some(&[r, g, b, a]) = source.get(offset..offset + 4) {
                let [dr, dg, db] = pixel.0;
                pixel.0 = [over(r, dr, a), over(g, dg, a), over(b, db, a)];
            }
        }

        tracing::trace!(shapes = self.pending, "composited shape layer");
        self.ctx.reset();
        self.pending = 0;
    }

    fn fill(&mut self, path: &BezPath, color: Rgb<u8>) {
        self.ctx.set_fill_rule(Fill::EvenOdd);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(path);
    }

    fn stroke(&mut self, path: &BezPath, width: u32, color: Rgb<u8>) {
        if width == 0 {
            return;
        }
        self.ctx.set_stroke(Stroke::new(f64::from(width)).with_join(Join::Round));
        self.ctx.set_paint(paint(color));
        self.ctx.stroke_path(path);
    }
}

/// Draw `spec` straight onto `canvas`
///
/// # Errors
///
/// Returns an invalid configuration error when the canvas is too large for
/// the renderer
pub fn render_shape<R: Rng + ?Sized>(
    canvas: &mut RgbImage,
    spec: &ShapeSpec,
    palette: &Palette,
    rng: &mut R,
) -> Result<()> {
    let mut painter = ShapePainter::new(canvas.width(), canvas.height())?;
    painter.draw(spec, palette, rng);
    painter.composite(canvas);
    Ok(())
}

/// Vertices of a regular polygon, first vertex straight up before rotation
pub fn regular_polygon_vertices(
    center: Point,
    radius: f64,
    sides: usize,
    rotation: f64,
) -> Vec<Point> {
    let sides = sides.max(3);
    let step = 360.0 / sides as f64;
    (0..sides)
        .map(|i| {
            let theta = (i as f64).mul_add(step, rotation - 90.0).to_radians();
            center + Vec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

fn paint(color: Rgb<u8>) -> Color {
    let [r, g, b] = color.0;
    Color::from_rgba8(r, g, b, 255)
}

// Premultiplied source over an opaque destination
fn over(source: u8, destination: u8, alpha: u8) -> u8 {
    let kept = (u16::from(destination) * u16::from(255 - alpha) + 127) / 255;
    u8::try_from((u16::from(source) + kept).min(255)).unwrap_or(u8::MAX)
}

fn clear_layer(layer: &mut Pixmap) {
    layer.data_as_u8_slice_mut().fill(0);
}

fn pixel_center((x, y): Vertex) -> Point {
    Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
}

// Inclusive pixel bounds cover whole pixels
fn pixel_rect(bbox: BoundingBox) -> Rect {
    Rect::new(
        f64::from(bbox.x0),
        f64::from(bbox.y0),
        f64::from(bbox.x1) + 1.0,
        f64::from(bbox.y1) + 1.0,
    )
}

// Outlines stay inside the filled area
fn stroke_inset(width: u32) -> f64 {
    f64::from(width) / 2.0
}

/// Arc of the ellipse inscribed in `arc.bbox`, clockwise from `start` to `end`
fn elliptic_arc(arc: &ArcAttributes, inset: f64) -> Arc {
    let rect = pixel_rect(arc.bbox);
    let radii = Vec2::new(
        (rect.width() / 2.0 - inset).max(0.0),
        (rect.height() / 2.0 - inset).max(0.0),
    );
    let sweep = f64::from(arc.end - arc.start).rem_euclid(360.0);
    Arc {
        center: rect.center(),
        radii,
        start_angle: f64::from(arc.start).to_radians(),
        sweep_angle: sweep.to_radians(),
        x_rotation: 0.0,
    }
}

fn arc_start(arc: &Arc) -> Point {
    let (sin, cos) = arc.start_angle.sin_cos();
    arc.center + Vec2::new(arc.radii.x * cos, arc.radii.y * sin)
}

fn chord_path(arc: &Arc) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(arc_start(arc));
    path.extend(arc.append_iter(TOLERANCE));
    path.close_path();
    path
}

fn pie_path(arc: &Arc) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(arc.center);
    path.line_to(arc_start(arc));
    path.extend(arc.append_iter(TOLERANCE));
    path.close_path();
    path
}

fn polyline(vertices: impl IntoIterator<Item = Point>, closed: bool) -> BezPath {
    let mut path = BezPath::new();
    for (i, vertex) in vertices.into_iter().enumerate() {
        if i == 0 {
            path.move_to(vertex);
        } else {
            path.line_to(vertex);
        }
    }
    if closed {
        path.close_path();
    }
    path
}
