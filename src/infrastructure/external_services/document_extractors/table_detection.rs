use regex::Regex;
use std::sync::LazyLock;

/// Tabs or runs of two or more spaces separate columns in extracted text.
static COLUMN_GAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\t|\s{2,}").unwrap_or_else(|_| unreachable!("static pattern"))
});

const MIN_COLUMNS: usize = 2;
const MIN_ROWS: usize = 2;

pub fn split_columns(line: &str) -> Vec<String> {
    COLUMN_GAP
        .split(line.trim())
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Finds runs of consecutive lines that split into the same number of
/// columns. Each run becomes one table, header row first.
pub fn detect_tables<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<Vec<String>>> {
    let mut tables = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    for line in lines {
        let cells = split_columns(line.as_ref());

        let continues = cells.len() >= MIN_COLUMNS
            && current.first().is_none_or(|first| first.len() == cells.len());

        if continues {
            current.push(cells);
            continue;
        }

        flush(&mut current, &mut tables);
        if cells.len() >= MIN_COLUMNS {
            current.push(cells);
        }
    }

    flush(&mut current, &mut tables);
    tables
}

fn flush(current: &mut Vec<Vec<String>>, tables: &mut Vec<Vec<Vec<String>>>) {
    if current.len() >= MIN_ROWS {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_columns() {
        assert_eq!(split_columns("City    AQI\tCategory"), vec!["City", "AQI", "Category"]);
        assert_eq!(split_columns("A normal sentence here."), vec!["A normal sentence here."]);
    }

    #[test]
    fn test_detects_aligned_block() {
        let lines = [
            "Daily readings",
            "City     AQI    Category",
            "Delhi    180    Moderate",
            "Pune     62     Satisfactory",
            "Values are provisional.",
        ];

        let tables = detect_tables(&lines);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 3);
        assert_eq!(tables[0][0], vec!["City", "AQI", "Category"]);
        assert_eq!(tables[0][2], vec!["Pune", "62", "Satisfactory"]);
    }

    #[test]
    fn test_column_change_starts_new_table() {
        let lines = [
            "a  b",
            "1  2",
            "x  y  z",
            "4  5  6",
            "lonely  row  here  now",
        ];

        let tables = detect_tables(&lines);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[1][0], vec!["x", "y", "z"]);
    }

    #[test]
    fn test_single_row_is_not_a_table() {
        assert!(detect_tables(&["Name  Value", "plain text"]).is_empty());
        assert!(detect_tables::<&str>(&[]).is_empty());
    }
}
