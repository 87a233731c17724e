// Week Planner
// Prints the lane layout of one week as JSON

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use directories::ProjectDirs;
use serde::Serialize;

use week_planner::planner::{
    week_gutter, DayGutter, GridConfig, GridLayoutEngine, GridMetrics, WeekLayout,
};
use week_planner::services::database::Database;
use week_planner::services::settings::{default_config_path, load_config};
use week_planner::services::store::{BlockFilter, BlockStore};
use week_planner::utils::date::WeekRange;

const USAGE: &str = "usage: week-planner [--db PATH] [--config PATH] [YYYY-MM-DD]";

/// JSON printed to stdout: the week layout plus its time gutter.
#[derive(Serialize)]
struct WeekOutput<'a> {
    #[serde(flatten)]
    layout: &'a WeekLayout,
    gutter: Vec<DayGutter>,
}

struct Args {
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    date: Option<NaiveDate>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        db_path: None,
        config_path: None,
        date: None,
    };

    let mut raw = std::env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--db" => {
                let value = raw.next().ok_or_else(|| anyhow!("--db needs a path\n{}", USAGE))?;
                args.db_path = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = raw
                    .next()
                    .ok_or_else(|| anyhow!("--config needs a path\n{}", USAGE))?;
                args.config_path = Some(PathBuf::from(value));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            value => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .with_context(|| format!("Invalid date {:?}\n{}", value, USAGE))?;
                args.date = Some(date);
            }
        }
    }

    Ok(args)
}

fn default_db_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("com", "WeekPlanner", "WeekPlanner") {
        let data_dir = dirs.data_dir();
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            log::warn!("Failed to create data directory {}: {}", data_dir.display(), e);
        }
        data_dir.join("planner.db")
    } else {
        log::warn!("Unable to resolve project directory; using current dir for the database");
        PathBuf::from("planner.db")
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let config = match args.config_path.or_else(default_config_path) {
        Some(path) => load_config(&path)?,
        None => Default::default(),
    };
    let grid = GridConfig::new(&config, GridMetrics::default())?;

    let db_path = args.db_path.unwrap_or_else(default_db_path);
    let db = Database::open(&db_path.to_string_lossy())?;
    let store = db.blocks();

    let week = match args.date {
        Some(date) => WeekRange::containing(date, grid.zone),
        None => WeekRange::containing_instant(Utc::now(), grid.zone),
    };
    log::info!(
        "Laying out week of {} ({}) from {}",
        week.first_day,
        grid.zone.name(),
        db_path.display()
    );

    let blocks = store.get_blocks(week.start, week.end, &BlockFilter::default())?;
    let layout = GridLayoutEngine::layout_week(&blocks, week.first_day, &grid);

    let output = WeekOutput {
        gutter: week_gutter(&layout.range, &grid),
        layout: &layout,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
