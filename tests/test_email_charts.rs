//! End-to-end checks: CSV on disk -> email table -> chart series -> image.

use email_timeplots::charts::{
    avg_per_day, avg_per_hour, render_png_bytes, render_svg_string, save, time_of_day,
    time_vs_year, HourOptions, HourSeries, Palette, PerHourFigure, ScatterFigure, ScatterSeries,
    ScatterStyle, SeriesStyle, Smoothing, TimeOfDayFigure, TriplePlot, TripleStyle,
    DAYS_PER_YEAR,
};
use email_timeplots::config::PlotSettings;
use email_timeplots::data::{EmailLoader, EmailTable};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Write `n` synthetic emails over three years; `offset` shifts the hours so
/// categories differ.
fn write_mailbox(dir: &Path, name: &str, n: usize, offset: f64) -> PathBuf {
    let mut csv = String::from("year,time_of_day,day_of_week,from\n");
    for i in 0..n {
        let year = 2001.0 + 3.0 * i as f64 / n as f64;
        let hour = (offset + i as f64 * 3.7) % 24.0;
        let day = WEEKDAYS[(i / 3) % WEEKDAYS.len()];
        writeln!(csv, "{year:.5},{hour:.3},{day},someone@example.com").unwrap();
    }
    let path = dir.join(name);
    fs::write(&path, csv).unwrap();
    path
}

fn load(path: &Path) -> EmailTable {
    EmailLoader::default().load_csv(path).unwrap()
}

#[test]
fn per_day_and_per_hour_totals_follow_their_weights() {
    let dir = TempDir::new().unwrap();
    let table = load(&write_mailbox(dir.path(), "all.csv", 2_000, 0.0));
    assert_eq!(table.height(), 2_000);

    let per_day = avg_per_day(&table, 0.3).unwrap();
    let expected = 2_000.0 / (0.3 * DAYS_PER_YEAR);
    assert!((per_day.total() - expected).abs() < 1e-6);

    let HourSeries::Bars(per_hour) = avg_per_hour(&table, &HourOptions::default()).unwrap() else {
        panic!("expected bars");
    };
    let years = table.years().unwrap();
    let span = years[years.len() - 1] - years[0];
    let expected = 2_000.0 / (span * DAYS_PER_YEAR);
    assert!((per_hour.total() - expected).abs() < 1e-6);
}

#[test]
fn weekday_curves_cover_the_week_in_file_order() {
    let dir = TempDir::new().unwrap();
    let starters = load(&write_mailbox(dir.path(), "starters.csv", 1_400, 0.0));
    let replies = load(&write_mailbox(dir.path(), "replies.csv", 700, 2.0));
    let forwards = load(&write_mailbox(dir.path(), "forwards.csv", 350, 5.0));

    let curves = time_of_day(
        Some(&starters),
        &starters,
        &replies,
        &forwards,
        1.0,
        Smoothing::default(),
    )
    .unwrap();

    let order: Vec<&str> = curves.iter().map(|c| c.weekday.as_str()).collect();
    assert_eq!(order, WEEKDAYS);
    for day in &curves {
        for curve in [&day.starters, &day.replies, &day.forwards] {
            let curve = curve.as_ref().unwrap();
            assert_eq!(curve.x.len(), 10_000);
            assert!(curve.x[0] >= 0.0 && curve.x[9_999] <= 24.0);
        }
    }
}

#[test]
fn series_serialize_to_json() {
    let table = EmailTable::from_columns(
        vec![2001.0, 2001.5, 2002.0, 2002.5],
        vec![1.0, 5.0, 9.0, 13.0],
        vec!["Monday".into(); 4],
    )
    .unwrap();

    let json = serde_json::to_value(avg_per_hour(&table, &HourOptions::default()).unwrap()).unwrap();
    assert_eq!(json["kind"], "bars");
    assert_eq!(json["counts"].as_array().unwrap().len(), 12);

    let scatter = serde_json::to_value(time_vs_year(&table).unwrap()).unwrap();
    assert_eq!(scatter["points"][1][1], 5.0);
}

#[test]
fn settings_file_drives_the_loader() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("renamed.csv");
    fs::write(&csv, "when,hour,weekday\n2005.1,8.5,Monday\n2005.9,17.0,Friday\n").unwrap();
    let config = dir.path().join("plots.json");
    fs::write(
        &config,
        r#"{ "columns": { "year": "when", "time_of_day": "hour", "day_of_week": "weekday" } }"#,
    )
    .unwrap();

    let settings = PlotSettings::load(&config).unwrap();
    let table = EmailLoader::new(settings.columns).load_csv(&csv).unwrap();
    assert_eq!(table.unique_weekdays().unwrap(), vec!["Monday", "Friday"]);
}

// The tests below rasterize text and need a system sans-serif font.

#[test]
#[ignore = "needs a system sans-serif font"]
fn triple_plot_renders_png_and_svg_files() {
    let dir = TempDir::new().unwrap();
    let table = load(&write_mailbox(dir.path(), "all.csv", 3_000, 0.0));
    let figure = TriplePlot::new(&table, TripleStyle::default()).unwrap();

    let png = dir.path().join("out/triple.png");
    let svg = dir.path().join("out/triple.svg");
    save(&figure, &png, (900, 900)).unwrap();
    save(&figure, &svg, (900, 900)).unwrap();

    assert!(fs::metadata(&png).unwrap().len() > 0);
    assert!(fs::read_to_string(&svg).unwrap().contains("<svg"));
}

#[test]
#[ignore = "needs a system sans-serif font"]
fn in_memory_outputs() {
    let dir = TempDir::new().unwrap();
    let table = load(&write_mailbox(dir.path(), "all.csv", 500, 0.0));

    let scatter = ScatterFigure {
        series: time_vs_year(&table).unwrap(),
        style: ScatterStyle::default(),
        title: "Emails".into(),
    };
    let png = render_png_bytes(&scatter, (640, 480)).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let per_hour = PerHourFigure {
        series: avg_per_hour(
            &table,
            &HourOptions {
                smooth: Some(Smoothing::default()),
                ..HourOptions::default()
            },
        )
        .unwrap(),
        style: SeriesStyle::default(),
        orientation: Default::default(),
    };
    let svg = render_svg_string(&per_hour, (640, 480)).unwrap();
    assert!(svg.contains("12 AM"));
}

#[test]
#[ignore = "needs a system sans-serif font"]
fn time_of_day_figure_lists_weekdays() {
    let dir = TempDir::new().unwrap();
    let starters = load(&write_mailbox(dir.path(), "s.csv", 1_400, 0.0));
    let curves = time_of_day(
        None,
        &starters,
        &starters,
        &starters,
        1.0,
        Smoothing::default(),
    )
    .unwrap();

    let figure = TimeOfDayFigure {
        curves,
        palette: Palette::default(),
        ylabel: "(overall)".into(),
    };
    let svg = render_svg_string(&figure, (1000, 600)).unwrap();
    assert!(svg.contains("Mondays"));
    assert!(svg.contains("Legend"));
}

#[test]
#[ignore = "needs a system sans-serif font"]
fn times_past_midnight_are_not_drawn() {
    let figure = ScatterFigure {
        series: ScatterSeries {
            points: vec![(2001.0, 12.0), (2001.5, 24.0), (2002.0, 30.0)],
            year_range: (2001.0, 2002.0),
        },
        style: ScatterStyle::default(),
        title: String::new(),
    };
    let svg = render_svg_string(&figure, (640, 480)).unwrap();
    assert_eq!(svg.matches("<circle").count(), 2);
}
