pub mod help;
pub mod search;
pub mod show;
pub mod theme;
pub mod top;

use std::io::Write;
use std::ops::ControlFlow;
use tracing::debug;

use crate::services::Dashboard;

/// Handle one line of terminal input.
///
/// Lines starting with `$` are session commands; anything else is search input,
/// blank lines included.
pub async fn handle_line(dashboard: &mut Dashboard, out: &mut dyn Write, line: &str) -> ControlFlow<()> {
    let content = line.trim();
    if !content.starts_with('$') {
        let result = search::execute(dashboard, out, line).await;
        report(out, "search", result);
        return ControlFlow::Continue(());
    }

    // Parse command and arguments
    let (command, rest) = match content.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest),
        None => (content, ""),
    };
    let command = command.to_lowercase();
    debug!("Command {} with args {:?}", command, rest);

    let result = match command.as_str() {
        "$search" | "$s" => search::execute(dashboard, out, rest).await,
        "$theme" | "$t" => theme::execute(dashboard, out).await,
        "$top" => top::execute(dashboard, out).await,
        "$show" | "$view" => show::execute(dashboard, out).await,
        "$help" | "$h" => help::execute(out),
        "$quit" | "$exit" | "$q" => return ControlFlow::Break(()),
        _ => writeln!(out, "❓ Unknown command {}. Type $help for the list.", command).map_err(|e| e.to_string()),
    };

    report(out, &command, result);
    ControlFlow::Continue(())
}

fn report(out: &mut dyn Write, command: &str, result: Result<(), String>) {
    if let Err(e) = result {
        tracing::error!("Error executing command {}: {}", command, e);
        let _ = writeln!(out, "❌ {}", e);
    }
}
