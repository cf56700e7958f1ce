/// Fixed-width text table for the terminal panels
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| display_width(h)).collect();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Add a row; cells beyond the header count are dropped
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        let row_strings: Vec<String> = row
            .iter()
            .take(self.col_widths.len())
            .map(|s| s.as_ref().to_string())
            .collect();

        for (i, col) in row_strings.iter().enumerate() {
            self.col_widths[i] = self.col_widths[i].max(display_width(col));
        }

        self.rows.push(row_strings);
    }

    /// Render header, separator and rows, one line each
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = row
            .iter()
            .zip(&self.col_widths)
            .map(|(col, &width)| {
                let pad = width.saturating_sub(display_width(col));
                format!("{}{}", col, " ".repeat(pad))
            })
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

/// Width in chars, so `₹` and `⭐` count once
fn display_width(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(vec!["Coin", "Price"]);
        table.add_row(&["Bitcoin (BTC)", "$65,000"]);
        table.add_row(&["Ether (ETH)", "$3,100.5"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Coin          | Price");
        assert_eq!(lines[1], "--------------+---------");
        assert!(lines[2].starts_with("Bitcoin (BTC) | $65,000"));
    }

    #[test]
    fn test_multibyte_cells_align() {
        let mut table = Table::new(vec!["Target", "Value"]);
        table.add_row(&["coin-price", "₹1,500.000"]);
        table.add_row(&["x", "y"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "coin-price | ₹1,500.000");
        assert_eq!(lines[3], "x          | y");
    }
}
