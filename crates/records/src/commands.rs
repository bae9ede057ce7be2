//! CLI command implementations.

use crate::config::RecordsConfig;
use crate::infra::Database;
use crate::naming::TableNamer;
use common::AppResult;

/// Execute the ping command
pub async fn ping(config: &RecordsConfig) -> AppResult<()> {
    let db = Database::connect(&config.database).await?;
    db.ping().await?;
    tracing::info!("Database is reachable");
    println!("ok");
    Ok(())
}

/// Execute the table-name command
pub fn table_name(config: &RecordsConfig, module: &str, types: &[String]) -> AppResult<()> {
    let namer = TableNamer::from_config(&config.naming);
    tracing::debug!(excluded = ?namer.excluded(), "Deriving table names");

    for (type_name, table) in derive_all(&namer, module, types) {
        println!("{}: {}", type_name, table);
    }
    Ok(())
}

fn derive_all<'a>(
    namer: &TableNamer,
    module: &str,
    types: &'a [String],
) -> Vec<(&'a str, String)> {
    types
        .iter()
        .map(|type_name| (type_name.as_str(), namer.derive(module, type_name)))
        .collect()
}
