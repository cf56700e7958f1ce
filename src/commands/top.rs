use std::io::Write;

use crate::services::Dashboard;

pub async fn execute(dashboard: &mut Dashboard, out: &mut dyn Write) -> Result<(), String> {
    if !dashboard.refresh_top().await {
        writeln!(out, "⚠️ Top markets unavailable, showing the previous table").map_err(|e| e.to_string())?;
    }

    writeln!(out, "{}", dashboard.render().await).map_err(|e| e.to_string())
}
