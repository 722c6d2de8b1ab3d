use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use dashboard_core::{
    Config, Coordinate, Dashboard, FileLocationCache, FixedLocator, LocateOptions, Notice,
    OpenWeatherProvider, SearchLocation, WeatherService, provider_from_config,
};
use inquire::{Password, PasswordDisplayMode, Select};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show current weather, air quality and the 5-day forecast.
    Show(ShowArgs),

    /// List places matching a name.
    Search {
        /// City or place name.
        query: String,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Latitude of the device position.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the device position.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Search for a city instead of using a position.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,

    /// Include the hourly breakdown for each forecast day.
    #[arg(long)]
    hourly: bool,

    /// Print the normalized weather as JSON.
    #[arg(long)]
    json: bool,

    /// Seconds to wait for a position before falling back to the cached one.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    locate_timeout: u64,
}

impl ShowArgs {
    fn locate_options(&self) -> LocateOptions {
        LocateOptions {
            timeout: Duration::from_secs(self.locate_timeout),
            ..LocateOptions::default()
        }
    }
}

type CliDashboard = Dashboard<OpenWeatherProvider, FileLocationCache>;

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show(args) => show(args).await,
            Command::Search { query } => search(&query).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get a free key at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(&key)?;
    let path = config.save()?;

    println!("API key saved to {}", path.display());
    Ok(())
}

fn open_dashboard(locate: LocateOptions) -> anyhow::Result<CliDashboard> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let cache = FileLocationCache::default_location()?;
    tracing::debug!(cache = %cache.path().display(), "opening dashboard");
    Ok(Dashboard::new(WeatherService::new(provider), cache).with_locate_options(locate))
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let dashboard = open_dashboard(args.locate_options())?;

    let notice = match (&args.city, args.lat.zip(args.lon)) {
        (Some(query), _) => {
            let Some(place) = pick_place(&dashboard, query).await? else {
                return Ok(());
            };
            dashboard.select_location(&place).await
        }
        (None, Some((lat, lon))) => {
            let here = Coordinate::try_new(lat, lon)?;
            dashboard.load_current_location(&FixedLocator::new(here)).await
        }
        (None, None) => {
            dashboard
                .load_current_location(&FixedLocator::unavailable())
                .await
        }
    };

    report(&notice);

    let state = dashboard.state();
    let Some(weather) = state.weather else {
        bail!("{}", notice.description);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&weather)?);
    } else {
        print!("{}", render::weather(&weather, state.theme, args.hourly));
    }

    Ok(())
}

async fn search(query: &str) -> anyhow::Result<()> {
    let dashboard = open_dashboard(LocateOptions::default())?;
    report_search(dashboard.search(query).await)?;

    for place in dashboard.search_results() {
        println!("{}", render::search_result(&place));
    }
    Ok(())
}

/// Search and let the user choose when more than one place matches.
async fn pick_place(dashboard: &CliDashboard, query: &str) -> anyhow::Result<Option<SearchLocation>> {
    report_search(dashboard.search(query).await)?;

    let mut results = dashboard.search_results();
    match results.len() {
        0 => Ok(None),
        1 => Ok(results.pop()),
        _ => {
            let labels: Vec<String> = results.iter().map(render::search_result).collect();
            let chosen = Select::new("Which one?", labels.clone())
                .prompt()
                .context("No location selected")?;
            let index = labels.iter().position(|l| *l == chosen).unwrap_or(0);
            Ok(Some(results.swap_remove(index)))
        }
    }
}

fn report(notice: &Notice) {
    eprintln!("{}", render::notice(notice));
}

/// An empty result set is only informational; a failed lookup is fatal.
fn report_search(notice: Option<Notice>) -> anyhow::Result<()> {
    if let Some(notice) = notice {
        report(&notice);
        if notice.is_error() {
            bail!("{}", notice.description);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dashboard_core::NoticeKind;

    use super::*;

    fn notice(kind: NoticeKind, title: &str) -> Notice {
        Notice {
            kind,
            title: title.into(),
            description: format!("{title} description"),
            cause: None,
        }
    }

    #[test]
    fn no_matches_is_not_a_failure() {
        assert!(report_search(None).is_ok());
        assert!(report_search(Some(notice(NoticeKind::Info, "No results"))).is_ok());
    }

    #[test]
    fn failed_lookup_fails_the_command() {
        let err = report_search(Some(notice(NoticeKind::Error, "Search failed"))).unwrap_err();
        assert_eq!(err.to_string(), "Search failed description");
    }

    #[test]
    fn locate_timeout_flag_sets_the_wait() {
        let cli = Cli::try_parse_from(["weather-dashboard", "show", "--locate-timeout", "3"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        let options = args.locate_options();
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert!(options.high_accuracy);

        let cli = Cli::try_parse_from(["weather-dashboard", "show"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.locate_options(), LocateOptions::default());
    }
}
