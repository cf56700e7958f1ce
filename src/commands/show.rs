use std::io::Write;

use crate::services::Dashboard;

/// Print the current panel without fetching anything
pub async fn execute(dashboard: &Dashboard, out: &mut dyn Write) -> Result<(), String> {
    writeln!(out, "{}", dashboard.render().await).map_err(|e| e.to_string())
}
