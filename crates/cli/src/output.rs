//! Plain-text table for `podcheck show`.

use chrono::NaiveDate;
use podcheck_core::Record;

/// Aligned `#`, identifier, day, status, link table. The day is filled in
/// for date identifiers only, and links are only shown for available records.
pub fn render_table(records: &[Record]) -> String {
    if records.is_empty() {
        return "no records\n".to_string();
    }

    let rows: Vec<[String; 5]> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let day = NaiveDate::parse_from_str(&r.identifier, "%Y-%m-%d")
                .map(|d| d.format("%A").to_string())
                .unwrap_or_default();
            let link = if r.status.is_available() { r.url.clone() } else { "-".to_string() };
            [i.to_string(), r.identifier.clone(), day, r.status.to_string(), link]
        })
        .collect();

    let header = ["#", "IDENTIFIER", "DAY", "STATUS", "LINK"].map(String::from);
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(widths).take(4) {
            line.push_str(&format!("{cell:<width$}  "));
        }
        line.push_str(&row[4]);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcheck_core::Status;

    #[test]
    fn test_empty_table() {
        assert_eq!(render_table(&[]), "no records\n");
    }

    #[test]
    fn test_table_rows() {
        let records = vec![
            Record::new("2024-03-09", "https://a.example.com/9.mp3", Status::Available),
            Record::new("2024-03-08", "https://a.example.com/8.mp3", Status::NotAvailable),
        ];
        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#  IDENTIFIER  DAY       STATUS         LINK");
        assert_eq!(lines[1], "0  2024-03-09  Saturday  Available      https://a.example.com/9.mp3");
        assert_eq!(lines[2], "1  2024-03-08  Friday    Not Available  -");
    }

    #[test]
    fn test_day_blank_for_numbered_identifiers() {
        let records = vec![
            Record::new("Episode 2", "https://cdn.example.com/ep2.mp3", Status::Available).with_sequence(2),
            Record::new("Episode 1", "https://cdn.example.com/ep1.mp3", Status::Available).with_sequence(1),
        ];
        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "#  IDENTIFIER  DAY  STATUS     LINK");
        assert_eq!(lines[1], "0  Episode 2        Available  https://cdn.example.com/ep2.mp3");
    }
}
