use console::Style;

use crate::report::Report;
use crate::types::BalanceRow;

const INDEX_WIDTH: usize = 4;
const ADDRESS_WIDTH: usize = 44;
const BALANCE_WIDTH: usize = 20;

/// Accent style for an endpoint, cycled by menu position so a network keeps
/// its color across runs.
pub fn network_style(index: usize) -> Style {
    match index % 6 {
        0 => Style::new().cyan(),
        1 => Style::new().green(),
        2 => Style::new().magenta(),
        3 => Style::new().blue(),
        4 => Style::new().red(),
        _ => Style::new().white(),
    }
}

struct Cell {
    text: String,
    style: Style,
}

impl Cell {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::new())
    }
}

/// Render the report as a bordered fixed-width table.
pub fn render(report: &Report, accent: &Style) -> String {
    let mut widths = vec![INDEX_WIDTH, ADDRESS_WIDTH, BALANCE_WIDTH];
    widths.extend(std::iter::repeat(BALANCE_WIDTH).take(report.columns.len()));

    let border = Style::new().yellow();
    let mut out = String::new();

    out.push_str(&rule(&widths, '╔', '═', '╤', '╗', &border));
    out.push_str(&line(&header_cells(report), &widths, &border));
    out.push_str(&rule(&widths, '╟', '─', '┼', '╢', &border));
    for row in &report.rows {
        out.push_str(&line(&row_cells(row, report.columns.len(), accent), &widths, &border));
    }
    out.push_str(&rule(&widths, '╚', '═', '╧', '╝', &border));
    out
}

fn header_cells(report: &Report) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new("No", Style::new().yellow().bold()),
        Cell::new("Wallet", Style::new().white().bold()),
        Cell::new(
            format!("{} Balance", report.network),
            Style::new().cyan().bold(),
        ),
    ];
    for contract in &report.columns {
        cells.push(Cell::new(
            contract.name.clone(),
            Style::new().magenta().bold(),
        ));
    }
    cells
}

fn row_cells(row: &BalanceRow, token_columns: usize, accent: &Style) -> Vec<Cell> {
    match row {
        BalanceRow::Account {
            index,
            address,
            native,
            tokens,
        } => {
            let mut cells = vec![
                Cell::plain((index + 1).to_string()),
                Cell::new(address.clone(), Style::new().green()),
                native_cell(*native, accent),
            ];
            for amount in tokens {
                cells.push(token_cell(*amount));
            }
            cells
        }
        BalanceRow::InvalidKey { index } => {
            let mut cells = vec![
                Cell::plain((index + 1).to_string()),
                Cell::new("Invalid PK", Style::new().red()),
                Cell::plain("Error"),
            ];
            cells.extend((0..token_columns).map(|_| Cell::plain("")));
            cells
        }
    }
}

fn native_cell(native: Option<f64>, accent: &Style) -> Cell {
    match native {
        Some(v) if v > 0.0 => Cell::new(format!("{v:.4}"), accent.clone()),
        Some(_) => Cell::new("0", Style::new().dim()),
        None => Cell::new("Error", Style::new().red()),
    }
}

fn token_cell(amount: Option<f64>) -> Cell {
    match amount {
        Some(v) if v > 0.0 => Cell::new(format!("{v:.4}"), Style::new().green()),
        Some(_) => Cell::new("0", Style::new().dim()),
        None => Cell::plain(""),
    }
}

/// A horizontal border line; each segment is two wider than its column to
/// cover the cell padding.
fn rule(widths: &[usize], left: char, fill: char, mid: char, right: char, style: &Style) -> String {
    let mut s = String::new();
    s.push(left);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            s.push(mid);
        }
        s.extend(std::iter::repeat(fill).take(width + 2));
    }
    s.push(right);
    format!("{}\n", style.apply_to(s))
}

fn line(cells: &[Cell], widths: &[usize], border: &Style) -> String {
    let outer = border.apply_to('║').to_string();
    let inner = border.apply_to('│').to_string();

    let mut s = String::new();
    s.push_str(&outer);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            s.push_str(&inner);
        }
        let text = cells
            .get(i)
            .map(|c| pad(&c.text, *width))
            .unwrap_or_else(|| pad("", *width));
        let styled = match cells.get(i) {
            Some(cell) => cell.style.apply_to(text).to_string(),
            None => text,
        };
        s.push(' ');
        s.push_str(&styled);
        s.push(' ');
    }
    s.push_str(&outer);
    s.push('\n');
    s
}

/// Left-align into `width` display columns, truncating overlong content.
fn pad(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenContract;
    use console::strip_ansi_codes;

    fn sample_report() -> Report {
        Report {
            network: "Sepolia".to_string(),
            columns: vec![TokenContract {
                name: "USDC".to_string(),
                address: "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238".to_string(),
            }],
            rows: vec![
                BalanceRow::Account {
                    index: 0,
                    address: "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".to_string(),
                    native: Some(1.23456),
                    tokens: vec![Some(42.0)],
                },
                BalanceRow::Account {
                    index: 1,
                    address: "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF".to_string(),
                    native: Some(0.0),
                    tokens: vec![None],
                },
                BalanceRow::InvalidKey { index: 2 },
            ],
        }
    }

    fn rendered_lines(report: &Report) -> Vec<String> {
        let out = render(report, &Style::new());
        out.lines()
            .map(|l| strip_ansi_codes(l).to_string())
            .collect()
    }

    #[test]
    fn test_render_shape() {
        let lines = rendered_lines(&sample_report());
        // top border, header, separator, 3 rows, bottom border
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with('╔'));
        assert!(lines[0].ends_with('╗'));
        assert!(lines[6].starts_with('╚'));
        // all lines are equally wide
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_render_header_and_columns() {
        let lines = rendered_lines(&sample_report());
        assert!(lines[1].contains("Sepolia Balance"));
        assert!(lines[1].contains("USDC"));
        // 4 columns means 3 inner separators per content line
        assert_eq!(lines[1].matches('│').count(), 3);
    }

    #[test]
    fn test_render_row_content() {
        let lines = rendered_lines(&sample_report());
        assert!(lines[3].contains("1.2346"));
        assert!(lines[3].contains("42.0000"));
        // zero native balance renders as 0, failed token read as empty
        assert!(lines[4].contains(" 0 "));
        assert!(lines[5].contains("Invalid PK"));
        assert!(lines[5].contains("Error"));
    }

    #[test]
    fn test_token_cells() {
        assert_eq!(token_cell(Some(1.5)).text, "1.5000");
        assert_eq!(token_cell(Some(0.0)).text, "0");
        assert_eq!(token_cell(None).text, "");
    }

    #[test]
    fn test_render_without_token_columns() {
        let mut report = sample_report();
        report.columns.clear();
        report.rows = vec![BalanceRow::Account {
            index: 0,
            address: "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".to_string(),
            native: None,
            tokens: vec![],
        }];
        let lines = rendered_lines(&report);
        assert!(!lines[1].contains("USDC"));
        assert_eq!(lines[1].matches('│').count(), 2);
        assert!(lines[3].contains("Error"));
    }

    #[test]
    fn test_pad_truncates() {
        assert_eq!(pad("abcdef", 4), "abcd");
        assert_eq!(pad("ab", 4), "ab  ");
    }

    #[test]
    fn test_network_style_cycles() {
        // same palette slot every 6 endpoints
        assert_eq!(
            format!("{:?}", network_style(0)),
            format!("{:?}", network_style(6))
        );
    }
}
