//! Output sinks for projected segments.
//!
//! The SVG sink draws the clock face with midnight at the top and time
//! running clockwise. Nothing but the segments is drawn: no grid, ticks or
//! axes. Segments are drawn in the order given, so later arcs cover earlier
//! ones.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use bt_core::{Segment, SegmentKind};
use serde::{Deserialize, Serialize};

/// Plot appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Stroke width of every arc.
    /// Default: 0.5.
    pub line_width: f64,

    /// Color of asleep arcs.
    /// Default: `#264794`.
    pub color_asleep: String,

    /// Color of awake arcs.
    /// Default: `#d1c580`.
    pub color_awake: String,

    /// Width and height of the image in pixels.
    /// Default: 800.
    pub size: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            line_width: 0.5,
            color_asleep: "#264794".to_string(),
            color_awake: "#d1c580".to_string(),
            size: 800,
        }
    }
}

impl RenderStyle {
    /// Stroke color for a segment kind.
    pub fn color(&self, kind: SegmentKind) -> &str {
        match kind {
            SegmentKind::Asleep => &self.color_asleep,
            SegmentKind::Awake => &self.color_awake,
        }
    }
}

/// Consumes the full, ordered segment list of one subject.
pub trait SegmentSink {
    fn write_segments(&mut self, segments: &[Segment]) -> Result<()>;
}

/// Writes one JSON object per segment.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> SegmentSink for JsonLinesSink<W> {
    fn write_segments(&mut self, segments: &[Segment]) -> Result<()> {
        for segment in segments {
            let json = serde_json::to_string(segment)?;
            writeln!(self.writer, "{json}")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a standalone SVG polar plot.
pub struct SvgSink<W: Write> {
    writer: W,
    style: RenderStyle,
    /// Radius mapped to the edge of the image.
    outer_radius: f64,
}

/// Blank border around the plot, as a fraction of half the image size.
const MARGIN: f64 = 0.05;

impl<W: Write> SvgSink<W> {
    /// `outer_radius` is the largest radius the projection produces
    /// (`r_max`); it is scaled to the edge of the image.
    pub const fn new(writer: W, style: RenderStyle, outer_radius: f64) -> Self {
        Self {
            writer,
            style,
            outer_radius,
        }
    }

    /// Converts a polar sample to image coordinates: angle 0 points up and
    /// increases clockwise.
    fn to_xy(&self, angle: f64, radius: f64) -> (f64, f64) {
        let half = f64::from(self.style.size) / 2.0;
        let scale = half * (1.0 - MARGIN) / self.outer_radius;
        let r = radius * scale;
        (r.mul_add(angle.sin(), half), (-r).mul_add(angle.cos(), half))
    }

    fn polyline(&self, segment: &Segment) -> String {
        let mut points = String::new();
        for (idx, point) in segment.points.iter().enumerate() {
            let (x, y) = self.to_xy(point.angle, point.radius);
            if idx > 0 {
                points.push(' ');
            }
            write!(points, "{x:.2},{y:.2}").unwrap();
        }

        format!(
            r#"  <polyline fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" points="{points}"/>"#,
            self.style.color(segment.kind),
            self.style.line_width,
        )
    }
}

impl<W: Write> SegmentSink for SvgSink<W> {
    fn write_segments(&mut self, segments: &[Segment]) -> Result<()> {
        let size = self.style.size;
        writeln!(
            self.writer,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        )?;
        for segment in segments {
            let line = self.polyline(segment);
            writeln!(self.writer, "{line}")?;
        }
        writeln!(self.writer, "</svg>")?;
        self.writer.flush()?;
        Ok(())
    }
}
