use anyhow::{anyhow, Context};
use expansion_goals_lib::models::FilterSelection;
use expansion_goals_lib::{init_tracing, Dashboard};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let app_data_dir = std::env::var_os("EXPANSION_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&app_data_dir)
        .with_context(|| format!("cannot create data dir {}", app_data_dir.display()))?;
    init_tracing(&app_data_dir).map_err(|error| anyhow!(error))?;

    let dashboard = Dashboard::new(app_data_dir).context("failed to open goal table")?;
    let view = dashboard.view(&FilterSelection::default())?;
    tracing::info!(
        records = view.kpis.record_count,
        cities = view.kpis.active_city_count,
        "dashboard snapshot built"
    );

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
