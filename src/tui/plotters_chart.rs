//! Plotters-powered line chart widget for Ratatui.
//!
//! Used for the per-year series (donations, beneficiaries). Plotters gives us
//! axis and tick rendering that Ratatui's built-in `Chart` leaves to the caller.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct YearLineChart<'a> {
    /// `(year, value)` pairs in ascending year order.
    pub series: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
    pub fmt_y: fn(f64) -> String,
    pub color: RGBColor,
}

impl<'a> YearLineChart<'a> {
    pub fn new(series: &'a [(f64, f64)], y_label: &'a str, fmt_y: fn(f64) -> String) -> Self {
        let (x_bounds, y_bounds) = series_bounds(series);
        Self {
            series,
            x_bounds,
            y_bounds,
            y_label,
            fmt_y,
            color: RGBColor(0, 255, 255),
        }
    }
}

impl<'a> Widget for YearLineChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.series.is_empty() {
            buf.set_string(area.x, area.y, "No data.", Style::default().fg(Color::Yellow));
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{:.0}", v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(LineSeries::new(self.series.iter().copied(), &self.color))?;

            // Colored pixels rather than `Circle`: the backend maps circle radii
            // into canvas units and draws them far too large.
            chart.draw_series(self.series.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Axis bounds for a year series: half a year of padding on x, zero-based y
/// with 10% headroom. Degenerate inputs get a unit range.
pub fn series_bounds(series: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (0.0_f64, f64::NEG_INFINITY);
    for &(x, y) in series {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let x_bounds = if x_min.is_finite() && x_max.is_finite() {
        [x_min - 0.5, x_max + 0.5]
    } else {
        [0.0, 1.0]
    };

    let y_bounds = if y_max.is_finite() && y_max > y_min {
        [y_min, y_max + (y_max - y_min) * 0.1]
    } else {
        [y_min, y_min + 1.0]
    };

    (x_bounds, y_bounds)
}
