use std::sync::Arc;

use anyhow::Context;
use trip_planner::{TravelPlannerConfig, TripPlanner, logging, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TravelPlannerConfig::load()?;
    logging::init(&config.logging)?;

    let planner = TripPlanner::from_config(&config).context("Failed to set up the trip planner")?;
    tracing::info!(
        "Loaded {} cities, default currency {}",
        planner.catalog().len(),
        config.planner.currency
    );

    web::run(config.server.port, Arc::new(planner)).await?;
    Ok(())
}
