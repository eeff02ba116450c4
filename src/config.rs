use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::ViewerResult;
use crate::filter::state::{default_range, ALL_WEEKDAYS};
use crate::filter::{validate_filters, FilterRequest, FilterState};

#[derive(Parser, Debug)]
#[command(name = "room-availability", version, about = "Room reservation availability viewer")]
pub struct Cli {
    /// Seed for the mock availability data (random when omitted)
    #[arg(long, global = true, env = "ROOMVIEW_SEED")]
    pub seed: Option<u64>,

    /// Number of days of data to generate
    #[arg(
        long,
        global = true,
        env = "ROOMVIEW_DAYS",
        default_value_t = 14,
        value_parser = clap::value_parser!(u32).range(1..=366)
    )]
    pub days: u32,

    /// First generated date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    pub first_date: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the interactive grid over HTTP
    Web {
        #[arg(long, env = "ROOMVIEW_PORT", default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
    /// Print the grid to the terminal (or a file)
    Print {
        #[command(flatten)]
        filters: FilterArgs,
        /// Dates run down, rooms across
        #[arg(long)]
        transpose: bool,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Export the grouped slots of the visible cells as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First date to show (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// Last date to show (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
    /// Weekdays to show, 0 = Sunday .. 6 = Saturday
    #[arg(long, value_delimiter = ',')]
    pub weekdays: Option<Vec<u8>>,
    /// Only rooms the current user can book
    #[arg(long)]
    pub reservable_only: bool,
}

impl FilterArgs {
    /// Converts the flags into a form request; unset dates fall back to the
    /// default window over `dates`.
    pub fn to_request(&self, dates: &[NaiveDate]) -> FilterRequest {
        let (default_start, default_end) = default_range(dates);
        let date_or = |value: &Option<String>, fallback: Option<NaiveDate>| {
            value
                .clone()
                .or_else(|| fallback.map(|d| d.to_string()))
                .unwrap_or_default()
        };
        FilterRequest {
            start_date: date_or(&self.start, default_start),
            end_date: date_or(&self.end, default_end),
            weekdays: self.weekdays.clone().unwrap_or_else(|| ALL_WEEKDAYS.to_vec()),
            reservable_only: self.reservable_only,
        }
    }

    /// CLI flags go through the same validation as the web form
    pub fn resolve(&self, dates: &[NaiveDate]) -> ViewerResult<FilterState> {
        validate_filters(&self.to_request(dates))
    }
}

/// Settings for the mock data source
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub seed: Option<u64>,
    pub days: u32,
    pub first_date: NaiveDate,
}

impl DataConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        DataConfig {
            seed: cli.seed,
            days: cli.days,
            first_date: cli.first_date.unwrap_or_else(|| Local::now().date_naive()),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
