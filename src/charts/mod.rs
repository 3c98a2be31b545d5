//! Charts module - series computation and rendering

mod axis;
mod output;
mod palette;
mod renderer;
mod series;

pub use axis::{hour_label, hour_ticks, max_n_ticks};
pub use output::{render_png_bytes, render_svg_string, save, OutputFormat};
pub use palette::{parse_hex_color, ColorError, Palette, PALETTE_HEX, SCATTER_INDEX, TRIPLE_INDEX};
pub use renderer::{
    dash_segments, plot_avg_per_day, plot_avg_per_hour, plot_time_vs_year, Figure, LineStyle,
    PerDayFigure, PerHourFigure, RenderError, ScatterFigure, ScatterStyle, SeriesStyle,
    TimeOfDayFigure, TriplePlot, TripleStyle,
};
pub use series::{
    avg_per_day, avg_per_hour, smooth_histogram, time_of_day, time_vs_year, Curve, HourOptions,
    HourSeries, HourWeights, Orientation, ScatterSeries, SeriesError, Smoothing, WeekdayCurves,
    DAYS_PER_YEAR,
};
