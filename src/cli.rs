//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "email-timeplots",
    about = "Chart email timestamps by time of day, year and weekday",
    after_help = "\
EXAMPLES:
    email-timeplots triple --input emails.csv --output triple.png
    email-timeplots per-hour --input emails.csv --output hours.svg --smooth
    email-timeplots time-of-day --starters s.csv --replies r.csv --forwards f.csv --output week.png
    email-timeplots bins --input emails.csv --kind day --dt 0.5"
)]
pub struct Args {
    /// JSON settings file (sizes, columns, palette, bin widths)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Emails by time of day per year
    Scatter {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Average number of emails per day across the years
    PerDay {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Bin width in years
        #[arg(long, value_parser = parse_bin_width)]
        dt: Option<f64>,
    },
    /// Average number of emails per hour of day
    PerHour {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Bin width in hours
        #[arg(long, value_parser = parse_bin_width)]
        dt: Option<f64>,
        /// Draw a smoothed curve instead of bars
        #[arg(long)]
        smooth: bool,
        /// Put the hours on the vertical axis
        #[arg(long)]
        horizontal: bool,
    },
    /// Scatter with per-hour and per-day marginals
    Triple {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Weekday curves of conversation starters, replies and forwards
    TimeOfDay {
        #[arg(long)]
        starters: PathBuf,
        #[arg(long)]
        replies: PathBuf,
        #[arg(long)]
        forwards: PathBuf,
        /// Table whose weekday order is used (defaults to all three combined)
        #[arg(long)]
        all: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        /// Appended to the Y axis description
        #[arg(long)]
        ylabel: Option<String>,
    },
    /// Print the binned series as JSON
    Bins {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = BinKind::Hour)]
        kind: BinKind,
        #[arg(long, value_parser = parse_bin_width)]
        dt: Option<f64>,
        #[arg(long)]
        smooth: bool,
    },
}

/// Bin widths must be positive and finite.
fn parse_bin_width(value: &str) -> Result<f64, String> {
    let dt: f64 = value
        .parse()
        .map_err(|e| format!("'{value}' is not a number: {e}"))?;
    if dt > 0.0 && dt.is_finite() {
        Ok(dt)
    } else {
        Err(format!("bin width must be positive, got {value}"))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinKind {
    Day,
    Hour,
}
