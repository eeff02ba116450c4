mod availability;
mod cell;
mod config;
mod display;
mod error;
mod export;
mod filter;
mod grid;
mod viewer;
mod web;

use std::fs::File;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use availability::{MockSchedule, SlotSource};
use cell::TooltipSize;
use config::{Cli, Command, DataConfig, FilterArgs};
use display::{print_grid, write_grid_to_file};
use export::export_groups_to_csv;
use viewer::Viewer;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();
    let data = DataConfig::from_cli(&cli);

    let mut rng = data.rng();
    let source = MockSchedule::generate(data.first_date, data.days, &mut rng);
    let mut viewer = Viewer::new(source, TooltipSize::default());

    match cli.command {
        Some(Command::Web { port, bind }) => {
            println!("Access the site at http://localhost:{}", port);
            web::start_server(&bind, port, web::AppState::new(viewer, rng)).await?;
        }
        Some(Command::Export { filters, output }) => {
            let filter = filters.resolve(viewer.source().dates())?;
            let layout = viewer.visible(&filter, false);
            let records = export_groups_to_csv(&mut viewer, &layout, File::create(&output)?)?;
            info!(records, path = %output.display(), "exported slot groups");
            println!("Exported {} groups to {}", records, output.display());
        }
        Some(Command::Print { filters, transpose, output }) => {
            let filter = filters.resolve(viewer.source().dates())?;
            let grid = viewer.grid(&filter, transpose)?;
            match output {
                Some(path) => {
                    write_grid_to_file(&grid, &path)?;
                    println!("Grid saved to {}", path.display());
                }
                None => print_grid(&grid)?,
            }
        }
        None => {
            let filter = FilterArgs::default().resolve(viewer.source().dates())?;
            let grid = viewer.grid(&filter, false)?;
            print_grid(&grid)?;
        }
    }

    Ok(())
}
