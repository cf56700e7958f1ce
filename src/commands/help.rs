use std::io::Write;

const HELP: &str = "\
📖 cryptodash commands

🔍 Search
  <name or symbol>       Search a coin, e.g. `btc`, `Ethereum`, `shiba inu`
  $search <query>        Same as above ($s)

📊 Dashboard
  $top                   Refresh the top 5 coins by market cap
  $show                  Print the dashboard again ($view)
  $theme                 Toggle light/dark charts ($t)

🎯 General
  $help                  Show this help message ($h)
  $quit                  Leave the dashboard ($exit, $q)

Charts are written as PNG files to the chart output directory.
The global market panel refreshes every 2 minutes.";

pub fn execute(out: &mut dyn Write) -> Result<(), String> {
    writeln!(out, "{}", HELP).map_err(|e| e.to_string())
}
