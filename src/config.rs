//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::timer::TimerOptions;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "precision-timer")]
#[command(about = "Drift-free, pausable interval timer with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Fire period in milliseconds (0 runs a stopwatch)
    #[arg(short, long, default_value = "1000")]
    pub delay: i64,

    /// Stop after the first fire
    #[arg(long)]
    pub run_once: bool,

    /// Fire as soon as the timer starts
    #[arg(long)]
    pub fire_immediately: bool,

    /// Start the timer at launch instead of waiting for POST /start
    #[arg(long)]
    pub start_immediately: bool,

    /// Invoke the callback once per missed period when running late
    #[arg(long)]
    pub fire_overdue_callbacks: bool,

    /// Re-arm in milliseconds when deferring an odd overdue count (0 disables)
    #[arg(long, default_value = "20")]
    pub overdue_relief: i64,

    /// Snapshot refresh period in milliseconds (0 disables)
    #[arg(long, default_value = "1000")]
    pub refresh: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timer configuration described by the flags
    pub fn timer_options(&self) -> TimerOptions {
        TimerOptions::interval(self.delay)
            .run_once(self.run_once)
            .fire_immediately(self.fire_immediately)
            .start_immediately(self.start_immediately)
            .fire_overdue_callbacks(self.fire_overdue_callbacks)
            .overdue_relief((self.overdue_relief != 0).then_some(self.overdue_relief))
    }

    /// Snapshot refresh period, if enabled
    pub fn refresh_period(&self) -> Option<Duration> {
        (self.refresh > 0).then(|| Duration::from_millis(self.refresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["precision-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.refresh_period(), Some(Duration::from_millis(1000)));

        let options = config.timer_options();
        assert_eq!(options.delay, 1000);
        assert_eq!(options.overdue_relief, Some(20));
        assert!(!options.start_immediately);
    }

    #[test]
    fn flags_map_onto_timer_options() {
        let config = Config::try_parse_from([
            "precision-timer",
            "--delay",
            "250",
            "--run-once",
            "--fire-overdue-callbacks",
            "--overdue-relief",
            "0",
            "--refresh",
            "0",
            "-v",
        ])
        .unwrap();

        let options = config.timer_options();
        assert_eq!(options.delay, 250);
        assert!(options.run_once);
        assert!(options.fire_overdue_callbacks);
        assert_eq!(options.overdue_relief, None);
        assert_eq!(config.refresh_period(), None);
        assert_eq!(config.log_level(), "debug");
    }
}
