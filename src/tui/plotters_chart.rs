//! Plotters-powered chart widgets for Ratatui.
//!
//! Plotters output is rendered into the Ratatui buffer using
//! `plotters-ratatui-backend`. Category charts map label index `i` to x = i,
//! so the axis labels are drawn by the caller from the same label list.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{ChartData, DisplayHints, Rgb, ScatterChart};

/// Line chart over a category axis. Gaps (`None`) break the line; series
/// with a dash hint are drawn dashed; series with a point radius get markers.
pub struct CategoryLineChart<'a> {
    pub chart: &'a ChartData,
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for CategoryLineChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) {
            return;
        }

        let x_bounds = category_bounds(self.chart.labels.len());
        let [y0, y1] = self.y_bounds;
        if !valid_bounds(x_bounds, self.y_bounds) {
            return;
        }
        let period = (x_bounds[1] - x_bounds[0]) / DASH_PERIODS;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(x_bounds[0]..x_bounds[1], y0..y1)?;

            // Tick labels are drawn by the caller in terminal cells.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            for dataset in &self.chart.datasets {
                let color = plot_color(dataset.color);
                for run in line_runs(&dataset.values) {
                    match dataset.hints.dash {
                        Some([on, off]) => {
                            let total = f64::from(on) + f64::from(off);
                            let on_len = period * f64::from(on) / total.max(1.0);
                            let off_len = period * f64::from(off) / total.max(1.0);
                            chart.draw_series(
                                dash_segments(&run, on_len, off_len)
                                    .into_iter()
                                    .map(|seg| PathElement::new(seg.to_vec(), color)),
                            )?;
                        }
                        None => {
                            chart.draw_series(LineSeries::new(run.iter().copied(), &color))?;
                        }
                    }

                    // `Circle` radii are mis-scaled by the ratatui backend; a
                    // colored pixel gives a reliable marker.
                    if needs_markers(run.len(), &dataset.hints) {
                        chart.draw_series(run.iter().map(|&p| Pixel::new(p, color)))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// XY scatter with one colored series per dataset.
pub struct ScatterPlot<'a> {
    pub chart: &'a ScatterChart,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for ScatterPlot<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) || !valid_bounds(self.x_bounds, self.y_bounds) {
            return;
        }
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            for dataset in &self.chart.datasets {
                let color = plot_color(dataset.color);
                chart.draw_series(dataset.points.iter().map(|p| Pixel::new((p.x, p.y), color)))?;
            }
            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Number of dash periods across the full x range.
const DASH_PERIODS: f64 = 24.0;

fn too_small(area: Rect, buf: &mut Buffer) -> bool {
    // Plotters may fail to build a chart in a tiny area; show a hint instead.
    if area.width < 20 || area.height < 6 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}

fn valid_bounds(x: [f64; 2], y: [f64; 2]) -> bool {
    x.iter().chain(y.iter()).all(|v| v.is_finite()) && x[1] > x[0] && y[1] > y[0]
}

pub fn plot_color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// X range for `n` category labels placed at 0..n-1, with half a slot of
/// padding on each side.
pub fn category_bounds(n: usize) -> [f64; 2] {
    let last = n.saturating_sub(1) as f64;
    [-0.5, last + 0.5]
}

/// A lone point has no segment to draw, so it always gets a marker.
pub fn needs_markers(run_len: usize, hints: &DisplayHints) -> bool {
    run_len == 1 || hints.point_radius.is_some()
}

/// Split a gappy series into contiguous `(index, value)` runs.
pub fn line_runs(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((i as f64, *v)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Cut a polyline into visible dash segments, `on` drawn then `off` skipped,
/// measured along x. The pattern phase carries across vertices.
pub fn dash_segments(points: &[(f64, f64)], on: f64, off: f64) -> Vec<[(f64, f64); 2]> {
    if points.len() < 2 {
        return Vec::new();
    }
    if on <= 0.0 || off <= 0.0 {
        return points.windows(2).map(|w| [w[0], w[1]]).collect();
    }

    let mut out = Vec::new();
    let mut drawing = true;
    let mut left = on;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let dx = b.0 - a.0;
        if dx <= 0.0 {
            continue;
        }
        let lerp = |t: f64| (a.0 + dx * t, a.1 + (b.1 - a.1) * t);

        let mut t = 0.0;
        while t < dx {
            let step = left.min(dx - t);
            if drawing {
                out.push([lerp(t / dx), lerp((t + step) / dx)]);
            }
            t += step;
            left -= step;
            if left <= 1e-12 {
                drawing = !drawing;
                left = if drawing { on } else { off };
            }
        }
    }
    out
}

/// Pad a `(min, max)` range by 5% (or 1.0 when flat) so lines don't sit on
/// the frame.
pub fn padded(range: (f64, f64)) -> [f64; 2] {
    let (lo, hi) = range;
    let span = hi - lo;
    let pad = if span.abs() < 1e-12 { 1.0 } else { span * 0.05 };
    [lo - pad, hi + pad]
}

/// Padded x and y bounds of every scatter point.
pub fn scatter_bounds(chart: &ScatterChart) -> Option<([f64; 2], [f64; 2])> {
    let mut points = chart.datasets.iter().flat_map(|d| d.points.iter());
    let first = points.next()?;
    let init = ((first.x, first.x), (first.y, first.y));
    let ((x0, x1), (y0, y1)) = points.fold(init, |((x0, x1), (y0, y1)), p| {
        ((x0.min(p.x), x1.max(p.x)), (y0.min(p.y), y1.max(p.y)))
    });
    Some((padded((x0, x1)), padded((y0, y1))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScatterDataset, ScatterPoint};
    use pretty_assertions::assert_eq;

    #[test]
    fn gaps_split_runs() {
        let runs = line_runs(&[Some(1.0), Some(2.0), None, Some(4.0), None, None]);
        assert_eq!(runs, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(3.0, 4.0)]]);
        assert!(line_runs(&[None, None]).is_empty());
    }

    #[test]
    fn isolated_points_get_markers_without_a_radius() {
        let plain = DisplayHints::default();
        let runs = line_runs(&[Some(1.0), None, Some(3.0), Some(4.0)]);
        let marked: Vec<bool> = runs.iter().map(|r| needs_markers(r.len(), &plain)).collect();
        assert_eq!(marked, vec![true, false]);

        let dotted = DisplayHints::default().with_point_radius(3.0);
        assert!(needs_markers(2, &dotted));
    }

    #[test]
    fn dashes_alternate_along_x() {
        let segs = dash_segments(&[(0.0, 0.0), (4.0, 0.0)], 1.0, 1.0);
        assert_eq!(segs, vec![[(0.0, 0.0), (1.0, 0.0)], [(2.0, 0.0), (3.0, 0.0)]]);
    }

    #[test]
    fn dash_phase_carries_across_vertices() {
        let segs = dash_segments(&[(0.0, 0.0), (1.5, 0.0), (3.0, 3.0)], 1.0, 1.0);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], [(0.0, 0.0), (1.0, 0.0)]);
        // Second dash starts at x = 2 on the rising segment.
        let close = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9;
        assert!(close(segs[1][0], (2.0, 1.0)), "{:?}", segs[1]);
        assert!(close(segs[1][1], (3.0, 3.0)), "{:?}", segs[1]);
    }

    #[test]
    fn solid_when_no_gap() {
        let segs = dash_segments(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)], 1.0, 0.0);
        assert_eq!(segs.len(), 2);
        assert!(dash_segments(&[(0.0, 0.0)], 1.0, 1.0).is_empty());
    }

    #[test]
    fn category_bounds_pad_half_a_slot() {
        assert_eq!(category_bounds(3), [-0.5, 2.5]);
        assert_eq!(category_bounds(1), [-0.5, 0.5]);
    }

    #[test]
    fn flat_ranges_still_have_height() {
        assert_eq!(padded((5.0, 5.0)), [4.0, 6.0]);
        assert_eq!(padded((0.0, 10.0)), [-0.5, 10.5]);
    }

    #[test]
    fn scatter_bounds_cover_all_series() {
        let dataset = |label: &str, points: Vec<ScatterPoint>| ScatterDataset {
            label: label.into(),
            points,
            color: Rgb(0, 0, 0),
            hints: DisplayHints::default(),
        };
        let chart = ScatterChart {
            datasets: vec![
                dataset("a", vec![ScatterPoint { x: 0.0, y: 10.0 }]),
                dataset("b", vec![ScatterPoint { x: 20.0, y: 30.0 }]),
            ],
        };
        assert_eq!(scatter_bounds(&chart), Some(([-1.0, 21.0], [9.0, 31.0])));
        assert_eq!(scatter_bounds(&ScatterChart::default()), None);
    }
}
