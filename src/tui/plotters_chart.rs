//! Plotters-powered chart widgets for Ratatui.
//!
//! Plotters gives us axis/mesh rendering for free; its output is drawn into the
//! Ratatui buffer through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Hotspot;
use crate::data::hotspots::marker_size;

/// One coloured line of the footfall chart.
#[derive(Debug, Clone)]
pub struct LineData {
    pub points: Vec<(f64, f64)>,
    pub rgb: (u8, u8, u8),
}

/// Daily footfall per day label over time.
///
/// All series and bounds are computed before rendering; `render()` only draws.
pub struct FlowChart<'a> {
    pub lines: &'a [LineData],
    /// X bounds (days since CE, see `tui::date_axis_value`).
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for FlowChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !render_area_ok(area, buf) || !bounds_ok(self.x_bounds, self.y_bounds) {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are coarse, keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for line in self.lines {
                let (r, g, b) = line.rgb;
                let color = RGBColor(r, g, b);
                chart.draw_series(LineSeries::new(line.points.iter().copied(), &color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Hotspot scatter over a lon/lat plane.
///
/// Markers are crosses of pixels whose arm length grows with the hotspot flux.
/// `Circle` is avoided: the backend maps circle radii to canvas units and
/// produces oversized circles.
pub struct HotspotMap<'a> {
    pub hotspots: &'a [Hotspot],
    /// Longitude bounds.
    pub x_bounds: [f64; 2],
    /// Latitude bounds.
    pub y_bounds: [f64; 2],
    /// Longest marker arm, in canvas dots.
    pub max_marker: u32,
    pub color_for: fn(&Hotspot) -> (u8, u8, u8),
}

impl<'a> Widget for HotspotMap<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !render_area_ok(area, buf) || !bounds_ok(self.x_bounds, self.y_bounds) {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        // Braille canvas resolution is 2x4 dots per cell.
        let dx = (x1 - x0) / (f64::from(area.width) * 2.0);
        let dy = (y1 - y0) / (f64::from(area.height) * 4.0);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(3)
                .y_labels(3)
                .x_label_formatter(&|v| format!("{v:.4}"))
                .y_label_formatter(&|v| format!("{v:.4}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            for h in self.hotspots {
                let (r, g, b) = (self.color_for)(h);
                let color = RGBColor(r, g, b);
                let arm = marker_size(h, self.hotspots, self.max_marker) as i32;

                let mut dots = Vec::with_capacity((arm as usize) * 4 + 1);
                for k in -arm..=arm {
                    let k = f64::from(k);
                    dots.push((h.lon + k * dx, h.lat));
                    dots.push((h.lon, h.lat + k * dy));
                }
                chart.draw_series(dots.into_iter().map(|p| Pixel::new(p, color)))?;

                chart.draw_series(std::iter::once(Text::new(
                    h.name,
                    (h.lon + 2.0 * dx, h.lat + 2.0 * dy),
                    ("sans-serif", 10).into_font().color(&color),
                )))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn render_area_ok(area: Rect, buf: &mut Buffer) -> bool {
    // Plotters may fail to lay out a tiny chart; show a hint instead of panicking.
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return false;
    }
    true
}

fn bounds_ok(x: [f64; 2], y: [f64; 2]) -> bool {
    x.iter().chain(y.iter()).all(|v| v.is_finite()) && x[1] > x[0] && y[1] > y[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_bounds_are_rejected() {
        assert!(bounds_ok([0.0, 1.0], [0.0, 1.0]));
        assert!(!bounds_ok([1.0, 1.0], [0.0, 1.0]));
        assert!(!bounds_ok([0.0, 1.0], [f64::NAN, 1.0]));
    }

    #[test]
    fn tiny_area_renders_hint() {
        let area = Rect::new(0, 0, 50, 4);
        let mut buf = Buffer::empty(area);
        let lines: Vec<LineData> = Vec::new();
        FlowChart {
            lines: &lines,
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 1.0],
            x_label: "date",
            y_label: "voyageurs",
            fmt_x: |v| v.to_string(),
            fmt_y: |v| v.to_string(),
        }
        .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }
}
