use std::io::Write;

use crate::services::Dashboard;

pub async fn execute(dashboard: &mut Dashboard, out: &mut dyn Write) -> Result<(), String> {
    let theme = dashboard.toggle_theme().await;
    let (icon, name) = if theme.is_dark() { ("🌙", "dark") } else { ("☀️", "light") };

    writeln!(out, "{} Switched to {} theme, new charts follow it", icon, name).map_err(|e| e.to_string())
}
