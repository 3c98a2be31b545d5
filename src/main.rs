//! Email Timeplots - command line entry point
//!
//! Renders one chart per invocation from CSV email tables. Set `RUST_LOG=info`
//! (or `debug`) for progress output.

use anyhow::{Context, Result};
use clap::Parser;
use email_timeplots::charts::{
    self, avg_per_day, avg_per_hour, time_of_day, time_vs_year, HourOptions, HourWeights,
    Orientation, PerDayFigure, PerHourFigure, ScatterFigure, ScatterStyle, SeriesStyle,
    Smoothing, TimeOfDayFigure, TriplePlot, SCATTER_INDEX,
};
use email_timeplots::cli::{Args, BinKind, Command};
use email_timeplots::config::PlotSettings;
use email_timeplots::data::{EmailLoader, EmailTable};
use log::info;
use std::path::Path;

fn main() {
    env_logger::init();
    std::process::exit(match run(Args::parse()) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    });
}

fn load(loader: &EmailLoader, path: &Path) -> Result<EmailTable> {
    loader
        .load_csv(path)
        .with_context(|| format!("Failed to load emails from {}", path.display()))
}

fn run(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => PlotSettings::load(path)?,
        None => PlotSettings::default(),
    };
    let loader = EmailLoader::new(settings.columns.clone());
    let palette = settings.palette()?;
    let size = settings.size();

    match args.command {
        Command::Scatter {
            input,
            output,
            title,
        } => {
            let table = load(&loader, &input)?;
            let figure = ScatterFigure {
                series: time_vs_year(&table)?,
                style: ScatterStyle {
                    color: palette.get(SCATTER_INDEX),
                    ..ScatterStyle::default()
                },
                title,
            };
            charts::save(&figure, &output, size)?;
        }
        Command::PerDay { input, output, dt } => {
            let table = load(&loader, &input)?;
            let figure = PerDayFigure {
                hist: avg_per_day(&table, dt.unwrap_or(settings.day_bin))?,
                style: SeriesStyle {
                    color: palette.get(SCATTER_INDEX),
                    ..SeriesStyle::default()
                },
            };
            charts::save(&figure, &output, size)?;
        }
        Command::PerHour {
            input,
            output,
            dt,
            smooth,
            horizontal,
        } => {
            let table = load(&loader, &input)?;
            let orientation = if horizontal {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let options = HourOptions {
                dt: dt.unwrap_or(settings.hour_bin),
                smooth: smooth.then(|| Smoothing::from(&settings.smoothing)),
                weights: HourWeights::Average,
                orientation,
            };
            let figure = PerHourFigure {
                series: avg_per_hour(&table, &options)?,
                style: SeriesStyle {
                    color: palette.get(SCATTER_INDEX),
                    ..SeriesStyle::default()
                },
                orientation,
            };
            charts::save(&figure, &output, size)?;
        }
        Command::Triple { input, output } => {
            let table = load(&loader, &input)?;
            let figure = TriplePlot::new(&table, settings.triple_style()?)?;
            charts::save(&figure, &output, size)?;
        }
        Command::TimeOfDay {
            starters,
            replies,
            forwards,
            all,
            output,
            ylabel,
        } => {
            let starters = load(&loader, &starters)?;
            let replies = load(&loader, &replies)?;
            let forwards = load(&loader, &forwards)?;
            let all = all.map(|path| load(&loader, &path)).transpose()?;

            let curves = time_of_day(
                all.as_ref(),
                &starters,
                &replies,
                &forwards,
                settings.hour_bin,
                Smoothing::from(&settings.smoothing),
            )?;
            info!("computed time-of-day curves for {} weekdays", curves.len());

            let figure = TimeOfDayFigure {
                curves,
                palette,
                ylabel: ylabel.unwrap_or_else(|| settings.time_of_day_label.clone()),
            };
            charts::save(&figure, &output, size)?;
        }
        Command::Bins {
            input,
            kind,
            dt,
            smooth,
        } => {
            let table = load(&loader, &input)?;
            let json = match kind {
                BinKind::Day => {
                    let hist = avg_per_day(&table, dt.unwrap_or(settings.day_bin))?;
                    serde_json::to_string_pretty(&hist)?
                }
                BinKind::Hour => {
                    let options = HourOptions {
                        dt: dt.unwrap_or(settings.hour_bin),
                        smooth: smooth.then(|| Smoothing::from(&settings.smoothing)),
                        ..HourOptions::default()
                    };
                    serde_json::to_string_pretty(&avg_per_hour(&table, &options)?)?
                }
            };
            println!("{json}");
        }
    }

    Ok(())
}
