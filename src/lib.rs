pub mod address_book;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod parsing;
pub mod render;
mod utils;

use anyhow::Context;
use log::info;

pub use address_book::AddressBook;
pub use calendar::ChorusCalendar;
pub use config::AppConfig;
pub use error::{CalendarError, Result};
pub use fetch::WebcalFetcher;
pub use models::Event;
pub use parsing::IcalParser;

/// Validate `url`, download the feed and parse it in the configured time zone.
pub fn from_webcal(url: &str, config: &AppConfig) -> Result<ChorusCalendar> {
    fetch::validate_webcal_url(url)?;
    let tz = config.tz()?;
    let ical_txt = WebcalFetcher::from_config(config)?.fetch(url)?;
    IcalParser::new(tz).parse(&ical_txt)
}

pub fn run() -> anyhow::Result<()> {
    let args = cli::parse(std::env::args().skip(1).collect());

    let mut config = AppConfig::load();
    if let Some(zone) = args.time_zone.clone() {
        config.time_zone = zone;
    }
    logging::init(&config)?;

    let calendar = from_webcal(&args.url, &config)
        .with_context(|| format!("unable to load calendar from {}", args.url))?;

    if args.list {
        println!("Seasons: {}", calendar.seasons_pretty());
        let groups = calendar.groups().into_iter().collect::<Vec<_>>();
        println!("Groups: {}", groups.join(", "));
        return Ok(());
    }

    let seasons: Vec<String> = if args.seasons.is_empty() {
        calendar.seasons().into_iter().collect()
    } else {
        args.seasons.clone()
    };
    let groups: Vec<String> = if args.all_groups {
        calendar.groups().into_iter().collect()
    } else {
        args.groups.clone()
    };

    let customized = calendar.customize(&seasons, &groups);
    info!(
        "rendering {} of {} events for seasons [{}]",
        customized.events().len(),
        calendar.events().len(),
        seasons.join(", ")
    );

    if args.json {
        println!("{}", render::to_json(&customized)?);
    } else {
        print!("{}", render::to_text(&customized));
    }
    Ok(())
}
