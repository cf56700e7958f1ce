use std::io::Write;

use crate::services::search_service::{self, SearchOutcome};
use crate::services::Dashboard;

pub async fn execute(dashboard: &mut Dashboard, out: &mut dyn Write, input: &str) -> Result<(), String> {
    tracing::info!("🔍 Search called with input: {:?}", input.trim());

    let outcome = search_service::submit_search(dashboard, input).await;
    if outcome == SearchOutcome::Rejected {
        return Ok(());
    }

    writeln!(out, "{}", dashboard.render().await).map_err(|e| e.to_string())
}
