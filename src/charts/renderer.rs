//! Static Chart Renderer
//! Draws the email charts onto any plotters backend.
//!
//! Figures:
//! 1. Scatter: emails by time of day per year
//! 2. Per-day bars: average emails per day across the years
//! 3. Per-hour bars or smoothed curve: average emails per hour of day
//! 4. Time of day: smoothed weekday curves for starters, replies and forwards
//! 5. Triple plot: the scatter with per-hour (right) and per-day (top) marginals

use crate::charts::axis::{hour_label, hour_ticks};
use crate::charts::palette::{Palette, SCATTER_INDEX, TRIPLE_INDEX};
use crate::charts::series::{
    avg_per_day, avg_per_hour, time_vs_year, Curve, HourOptions, HourSeries, HourWeights,
    Orientation, ScatterSeries, SeriesError, WeekdayCurves,
};
use crate::data::EmailTable;
use crate::stats::Histogram;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

const FONT: &str = "sans-serif";
const CAPTION_SIZE: u32 = 18;
const LABEL_SIZE: u32 = 13;

// Layout (pixels)
const MARGIN: u32 = 12;
const X_LABEL_AREA: u32 = 55;
const Y_LABEL_AREA: u32 = 70;

// Dash patterns in curve samples: (on, off, on, off, ...)
const DASHED: [usize; 2] = [150, 100];
const DASH_DOT: [usize; 4] = [150, 80, 30, 80];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Unsupported output format '{0}', expected .png or .svg")]
    UnsupportedFormat(String),
    #[error("Pixel buffer does not match a {0}x{1} image")]
    Buffer(u32, u32),
}

pub(crate) fn drawing_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

/// Something that can be drawn onto a plotters drawing area.
pub trait Figure {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError>;
}

/// Line pattern for smoothed curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
}

/// Fill style for scatter markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterStyle {
    pub color: RGBColor,
    pub alpha: f64,
    /// Marker area, matplotlib `s` units.
    pub marker_size: f64,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        Self {
            color: Palette::default().get(SCATTER_INDEX),
            alpha: 0.6,
            marker_size: 0.5,
        }
    }
}

/// Stroke and fill style for bars and curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub alpha: f64,
    pub width: u32,
    pub line: LineStyle,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: Palette::default().get(TRIPLE_INDEX),
            alpha: 0.8,
            width: 2,
            line: LineStyle::Solid,
        }
    }
}

impl SeriesStyle {
    fn fill(&self) -> ShapeStyle {
        self.color.mix(self.alpha).filled()
    }

    fn stroke(&self) -> ShapeStyle {
        self.color.mix(self.alpha).stroke_width(self.width)
    }
}

fn grid_style() -> ShapeStyle {
    BLACK.mix(0.2).stroke_width(1)
}

fn marker_radius(marker_size: f64) -> u32 {
    marker_size.sqrt().ceil().max(1.0) as u32
}

fn padded(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    if hi > lo {
        let pad = (hi - lo) * fraction;
        (lo - pad, hi + pad)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

fn value_ceiling(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

/// Number of hour tick labels on a `[0, 24]` axis.
fn hour_label_count() -> usize {
    hour_ticks().len()
}

fn on_hour_axis(hours: f64) -> bool {
    (0.0..=24.0).contains(&hours)
}

/// The part of `[lo, hi]` visible on a `[0, 24]` hour axis.
fn clip_to_hours(lo: f64, hi: f64) -> Option<(f64, f64)> {
    let (lo, hi) = (lo.max(0.0), hi.min(24.0));
    (lo < hi).then_some((lo, hi))
}

fn year_label(year: f64, span: f64) -> String {
    if span < 3.0 {
        format!("{:.1}", year)
    } else {
        format!("{:.0}", year)
    }
}

/// Split a sampled polyline into dash segments following `pattern`.
pub fn dash_segments(points: &[(f64, f64)], pattern: &[usize]) -> Vec<Vec<(f64, f64)>> {
    if pattern.is_empty() || pattern.iter().all(|&p| p == 0) {
        return vec![points.to_vec()];
    }

    let mut segments = Vec::new();
    let mut start = 0;
    for (i, &len) in pattern.iter().cycle().enumerate() {
        if start >= points.len() {
            break;
        }
        let end = (start + len).min(points.len());
        // even entries draw, odd entries skip
        if i % 2 == 0 && end > start + 1 {
            // overlap by one sample so the dash reaches its boundary
            segments.push(points[start..(end + 1).min(points.len())].to_vec());
        }
        start = end;
    }
    segments
}

/// Draw `(year, time of day)` points with the hour axis fixed to `[0, 24]`.
pub fn plot_time_vs_year<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &ScatterSeries,
    style: &ScatterStyle,
    title: &str,
) -> Result<(), RenderError> {
    let (lo, hi) = series.year_range;
    let (x_lo, x_hi) = padded(lo, hi, 0.02);
    let span = hi - lo;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA);
    if !title.is_empty() {
        builder.caption(title, (FONT, CAPTION_SIZE));
    }
    let mut chart = builder
        .build_cartesian_2d(x_lo..x_hi, 0f64..24f64)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE.mix(0.0))
        .bold_line_style(grid_style())
        .x_label_style((FONT, LABEL_SIZE).into_font().transform(FontTransform::Rotate90))
        .x_label_formatter(&|v| year_label(*v, span))
        .y_labels(hour_label_count())
        .y_label_formatter(&|v| hour_label(*v))
        .draw()
        .map_err(drawing_error)?;

    let radius = marker_radius(style.marker_size);
    let fill = style.color.mix(style.alpha).filled();
    chart
        .draw_series(
            series
                .points
                .iter()
                .filter(|&&(_, t)| on_hour_axis(t))
                .map(|&(x, y)| Circle::new((x, y), radius, fill)),
        )
        .map_err(drawing_error)?;

    Ok(())
}

/// Average-per-day bars over the year axis.
///
/// `year_range` pins the x axis (the triple plot aligns it with the scatter);
/// `show_year_labels` hides the tick labels when the axis is shared.
pub fn plot_avg_per_day<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    hist: &Histogram,
    style: &SeriesStyle,
    year_range: Option<(f64, f64)>,
    show_year_labels: bool,
    y_desc: &str,
) -> Result<(), RenderError> {
    let (lo, hi) = match year_range {
        Some((lo, hi)) => padded(lo, hi, 0.02),
        None => hist.range(),
    };
    let span = hi - lo;

    let mut chart = ChartBuilder::on(area)
        .margin(MARGIN)
        .x_label_area_size(if show_year_labels { X_LABEL_AREA } else { 10 })
        .y_label_area_size(Y_LABEL_AREA)
        .build_cartesian_2d(lo..hi, 0f64..value_ceiling(hist.max_count()))
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE.mix(0.0))
        .bold_line_style(grid_style())
        .x_label_formatter(&|v| {
            if show_year_labels {
                year_label(*v, span)
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|v| format!("{:.2}", v))
        .y_desc(y_desc)
        .draw()
        .map_err(drawing_error)?;

    let fill = style.fill();
    chart
        .draw_series(
            hist.bars()
                .map(|(left, right, height)| Rectangle::new([(left, 0.0), (right, height)], fill)),
        )
        .map_err(drawing_error)?;

    Ok(())
}

/// Per-hour bars or curve, hours along x (`Vertical`) or y (`Horizontal`).
pub fn plot_avg_per_hour<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &HourSeries,
    style: &SeriesStyle,
    orientation: Orientation,
    show_hour_labels: bool,
    value_desc: &str,
) -> Result<(), RenderError> {
    let ceiling = value_ceiling(series.max_value());
    let hour_formatter = |v: &f64| {
        if show_hour_labels {
            hour_label(*v)
        } else {
            String::new()
        }
    };

    match orientation {
        Orientation::Vertical => {
            let mut chart = ChartBuilder::on(area)
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(Y_LABEL_AREA)
                .build_cartesian_2d(0f64..24f64, 0f64..ceiling)
                .map_err(drawing_error)?;

            chart
                .configure_mesh()
                .light_line_style(WHITE.mix(0.0))
                .bold_line_style(grid_style())
                .x_labels(hour_label_count())
                .x_label_formatter(&hour_formatter)
                .y_label_formatter(&|v| format!("{:.3}", v))
                .y_desc(value_desc)
                .draw()
                .map_err(drawing_error)?;

            match series {
                HourSeries::Bars(hist) => {
                    let fill = style.fill();
                    chart
                        .draw_series(hist.bars().filter_map(|(left, right, height)| {
                            let (left, right) = clip_to_hours(left, right)?;
                            Some(Rectangle::new([(left, 0.0), (right, height)], fill))
                        }))
                        .map_err(drawing_error)?;
                }
                HourSeries::Curve(curve) => {
                    let points: Vec<(f64, f64)> =
                        curve.points().filter(|&(x, _)| on_hour_axis(x)).collect();
                    draw_line(&mut chart, &points, style)?;
                }
            }
        }
        Orientation::Horizontal => {
            let mut chart = ChartBuilder::on(area)
                .margin(MARGIN)
                .x_label_area_size(X_LABEL_AREA)
                .y_label_area_size(if show_hour_labels { Y_LABEL_AREA } else { 10 })
                .build_cartesian_2d(0f64..ceiling, 0f64..24f64)
                .map_err(drawing_error)?;

            chart
                .configure_mesh()
                .light_line_style(WHITE.mix(0.0))
                .bold_line_style(grid_style())
                .x_labels(4)
                .x_label_formatter(&|v| format!("{:.2}", v))
                .y_labels(hour_label_count())
                .y_label_formatter(&hour_formatter)
                .x_desc(value_desc)
                .draw()
                .map_err(drawing_error)?;

            match series {
                HourSeries::Bars(hist) => {
                    let fill = style.fill();
                    chart
                        .draw_series(hist.bars().filter_map(|(low, high, value)| {
                            let (low, high) = clip_to_hours(low, high)?;
                            Some(Rectangle::new([(0.0, low), (value, high)], fill))
                        }))
                        .map_err(drawing_error)?;
                }
                HourSeries::Curve(curve) => {
                    let points: Vec<(f64, f64)> = curve
                        .points()
                        .filter(|&(x, _)| on_hour_axis(x))
                        .map(|(x, y)| (y, x))
                        .collect();
                    draw_line(&mut chart, &points, style)?;
                }
            }
        }
    }

    Ok(())
}

fn draw_line<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    points: &[(f64, f64)],
    style: &SeriesStyle,
) -> Result<(), RenderError>
where
    DB: DrawingBackend + 'a,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let stroke = style.stroke();
    match style.line {
        LineStyle::Solid => {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), stroke))
                .map_err(drawing_error)?;
        }
        LineStyle::Dashed | LineStyle::DashDot => {
            let pattern: &[usize] = if style.line == LineStyle::Dashed {
                &DASHED
            } else {
                &DASH_DOT
            };
            chart
                .draw_series(
                    dash_segments(points, pattern)
                        .into_iter()
                        .map(|segment| PathElement::new(segment, stroke)),
                )
                .map_err(drawing_error)?;
        }
    }
    Ok(())
}

/// Scatter of emails by time of day per year.
pub struct ScatterFigure {
    pub series: ScatterSeries,
    pub style: ScatterStyle,
    pub title: String,
}

impl Figure for ScatterFigure {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        plot_time_vs_year(area, &self.series, &self.style, &self.title)
    }
}

/// Average emails per day across the years.
pub struct PerDayFigure {
    pub hist: Histogram,
    pub style: SeriesStyle,
}

impl Figure for PerDayFigure {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        plot_avg_per_day(
            area,
            &self.hist,
            &self.style,
            None,
            true,
            "Average number of emails per day",
        )
    }
}

/// Average emails per hour of day.
pub struct PerHourFigure {
    pub series: HourSeries,
    pub style: SeriesStyle,
    pub orientation: Orientation,
}

impl Figure for PerHourFigure {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        plot_avg_per_hour(
            area,
            &self.series,
            &self.style,
            self.orientation,
            true,
            "Average number of emails per hour",
        )
    }
}

/// Smoothed weekday curves of starters (solid), replies (dashed) and
/// forwards (dash-dot), with a weekday legend on the right.
pub struct TimeOfDayFigure {
    pub curves: Vec<WeekdayCurves>,
    pub palette: Palette,
    pub ylabel: String,
}

impl TimeOfDayFigure {
    fn ceiling(&self) -> f64 {
        let max = self
            .curves
            .iter()
            .flat_map(|c| [&c.starters, &c.replies, &c.forwards])
            .flatten()
            .map(Curve::max_y)
            .fold(0.0, f64::max);
        value_ceiling(max)
    }

    fn draw_legend<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<(), RenderError> {
        let box_size = 14i32;
        let row_h = 24i32;
        let x = 10i32;
        let mut y = MARGIN as i32 + 10;

        area.draw(&Text::new("Legend", (x, y), (FONT, LABEL_SIZE + 1).into_font()))
            .map_err(drawing_error)?;
        y += row_h;

        for (i, weekday) in self.curves.iter().map(|c| &c.weekday).enumerate() {
            let color = self.palette.get(i);
            area.draw(&Rectangle::new(
                [(x, y), (x + box_size, y + box_size)],
                color.filled(),
            ))
            .map_err(drawing_error)?;
            area.draw(&Text::new(
                format!("{weekday}s"),
                (x + box_size + 6, y),
                (FONT, LABEL_SIZE).into_font(),
            ))
            .map_err(drawing_error)?;
            y += row_h;
        }
        Ok(())
    }
}

impl Figure for TimeOfDayFigure {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let (w, _) = area.dim_in_pixel();
        let (plot_area, legend_area) = area.split_horizontally((w * 4 / 5) as i32);

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(0f64..24f64, 0f64..self.ceiling())
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .light_line_style(WHITE.mix(0.0))
            .bold_line_style(grid_style())
            .x_labels(hour_label_count())
            .x_label_formatter(&|v| hour_label(*v))
            .y_label_formatter(&|v| format!("{:.3}", v))
            .y_desc(format!("Fraction of weekly emails per hour {}", self.ylabel))
            .draw()
            .map_err(drawing_error)?;

        for (i, day) in self.curves.iter().enumerate() {
            let color = self.palette.get(i);
            let lines = [
                (&day.starters, 3, LineStyle::Solid),
                (&day.replies, 2, LineStyle::Dashed),
                (&day.forwards, 2, LineStyle::DashDot),
            ];
            for (curve, width, line) in lines {
                let Some(curve) = curve else { continue };
                let style = SeriesStyle {
                    color,
                    alpha: 0.8,
                    width,
                    line,
                };
                let points: Vec<(f64, f64)> =
                    curve.points().filter(|&(x, _)| on_hour_axis(x)).collect();
                draw_line(&mut chart, &points, &style)?;
            }
        }

        self.draw_legend(&legend_area)
    }
}

/// Parameters of [`TriplePlot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripleStyle {
    pub color: RGBColor,
    pub alpha: f64,
    pub marker_size: f64,
    /// Per-day bin width in years.
    pub yr_bin: f64,
    /// Per-hour bin width in hours.
    pub hr_bin: f64,
}

impl Default for TripleStyle {
    fn default() -> Self {
        Self {
            color: Palette::default().get(TRIPLE_INDEX),
            alpha: 0.8,
            marker_size: 0.5,
            yr_bin: 0.1,
            hr_bin: 0.5,
        }
    }
}

/// Scatter of time of day against year, with the per-hour histogram on its
/// right (sharing the hour axis) and the per-day histogram above it.
///
/// The figure is a 6x6 grid: scatter at rows 2-6 / columns 0-4, per-hour at
/// rows 2-6 / columns 4-6, per-day at rows 0-2 / columns 0-4.
pub struct TriplePlot {
    scatter: ScatterSeries,
    per_hour: HourSeries,
    per_day: Histogram,
    style: TripleStyle,
}

impl TriplePlot {
    pub fn new(table: &EmailTable, style: TripleStyle) -> Result<Self, SeriesError> {
        let per_hour = avg_per_hour(
            table,
            &HourOptions {
                dt: style.hr_bin,
                smooth: None,
                weights: HourWeights::Average,
                orientation: Orientation::Horizontal,
            },
        )?;
        Ok(Self {
            scatter: time_vs_year(table)?,
            per_hour,
            per_day: avg_per_day(table, style.yr_bin)?,
            style,
        })
    }

    pub fn scatter(&self) -> &ScatterSeries {
        &self.scatter
    }

    pub fn per_hour(&self) -> &HourSeries {
        &self.per_hour
    }

    pub fn per_day(&self) -> &Histogram {
        &self.per_day
    }
}

impl Figure for TriplePlot {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        let (top, bottom) = area.split_vertically((h * 2 / 6) as i32);
        let (per_day_area, _corner) = top.split_horizontally((w * 4 / 6) as i32);
        let (scatter_area, per_hour_area) = bottom.split_horizontally((w * 4 / 6) as i32);

        let scatter_style = ScatterStyle {
            color: self.style.color,
            alpha: 0.6,
            marker_size: self.style.marker_size,
        };
        let bar_style = SeriesStyle {
            color: self.style.color,
            alpha: self.style.alpha,
            ..SeriesStyle::default()
        };

        plot_time_vs_year(&scatter_area, &self.scatter, &scatter_style, "")?;
        plot_avg_per_hour(
            &per_hour_area,
            &self.per_hour,
            &bar_style,
            Orientation::Horizontal,
            false,
            "Average number of emails per hour",
        )?;
        plot_avg_per_day(
            &per_day_area,
            &self.per_day,
            &bar_style,
            Some(self.scatter.year_range),
            false,
            "Average number of emails per day",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<(f64, f64)> {
        (0..n).map(|i| (i as f64, 0.0)).collect()
    }

    #[test]
    fn dashes_alternate_on_and_off() {
        let segments = dash_segments(&ramp(10), &[3, 2]);
        let starts: Vec<f64> = segments.iter().map(|s| s[0].0).collect();
        assert_eq!(starts, vec![0.0, 5.0]);
        // each dash overlaps one sample into the gap
        assert_eq!(segments[0].len(), 4);
        assert_eq!(segments[1].len(), 4);
    }

    #[test]
    fn dash_dot_pattern_cycles() {
        let segments = dash_segments(&ramp(400), &DASH_DOT);
        let starts: Vec<f64> = segments.iter().map(|s| s[0].0).collect();
        assert_eq!(starts, vec![0.0, 230.0, 340.0]);
    }

    #[test]
    fn empty_pattern_draws_solid() {
        assert_eq!(dash_segments(&ramp(5), &[]), vec![ramp(5)]);
    }

    #[test]
    fn marker_radius_is_at_least_one_pixel() {
        assert_eq!(marker_radius(0.5), 1);
        assert_eq!(marker_radius(9.0), 3);
    }

    #[test]
    fn hour_axis_hides_out_of_range_times() {
        assert!(on_hour_axis(0.0) && on_hour_axis(24.0));
        assert!(!on_hour_axis(26.0) && !on_hour_axis(-0.5));
        assert_eq!(clip_to_hours(23.0, 25.0), Some((23.0, 24.0)));
        assert_eq!(clip_to_hours(-1.0, 0.5), Some((0.0, 0.5)));
        assert_eq!(clip_to_hours(24.0, 25.0), None);
        assert_eq!(clip_to_hours(26.0, 27.0), None);
    }

    #[test]
    fn hour_axis_labels_every_tick() {
        assert_eq!(hour_label_count(), 5);
    }

    #[test]
    fn year_labels_gain_a_decimal_on_short_spans() {
        assert_eq!(year_label(2001.26, 1.5), "2001.3");
        assert_eq!(year_label(2001.26, 8.0), "2001");
    }

    #[test]
    fn triple_plot_computes_its_marginals() {
        let table = EmailTable::from_columns(
            (0..100).map(|i| 2000.0 + i as f64 / 25.0).collect(),
            (0..100).map(|i| (i as f64 * 5.1) % 24.0).collect(),
            (0..100).map(|_| "Monday".to_string()).collect(),
        )
        .unwrap();

        let plot = TriplePlot::new(&table, TripleStyle::default()).unwrap();
        assert_eq!(plot.scatter().points.len(), 100);
        // year span 3.96 / 0.1 -> 39 bins
        assert_eq!(plot.per_day().bins(), 39);
        assert!(matches!(plot.per_hour(), HourSeries::Bars(h) if h.bins() >= 40));
    }
}
