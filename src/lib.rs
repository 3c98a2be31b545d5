//! Email Timeplots - charts of email timestamp data
//!
//! Loads email tables (fractional year, time of day, weekday) from CSV and
//! renders scatter plots, per-day and per-hour histograms and smoothed
//! weekday curves as PNG or SVG images.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod stats;
