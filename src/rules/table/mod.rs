//! Rules for error tables

pub mod error_table_columns;
pub mod error_table_status_code_format;

pub use error_table_columns::ErrorTableColumns;
pub use error_table_status_code_format::ErrorTableStatusCodeFormat;

use crate::parser::ast::Table;

/// Required leading columns of an error table, lowercased
const REQUIRED_COLUMNS: [&str; 3] = ["status code", "error", "reason"];
const OPTIONAL_COLUMN: &str = "reason code";

/// Header cell text without emphasis markers, lowercased
fn normalize_header(cell: &str) -> String {
    cell.replace(['*', '_'], "").trim().to_lowercase()
}

/// Whether the table header is the error table header set
pub(crate) fn is_error_table(table: &Table) -> bool {
    let header: Vec<String> = table.header.cells.iter().map(|c| normalize_header(c)).collect();
    match header.len() {
        3 => header.iter().zip(REQUIRED_COLUMNS).all(|(h, r)| h == r),
        4 => header.iter().zip(REQUIRED_COLUMNS).all(|(h, r)| h == r) && header[3] == OPTIONAL_COLUMN,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Section;
    use crate::parser::parse_string;

    fn first_table(source: &str) -> Table {
        parse_string(source)
            .sections
            .into_iter()
            .find_map(|s| match s {
                Section::Table(t) => Some(t),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_error_table_headers() {
        assert!(is_error_table(&first_table(
            "| Status Code | Error | Reason |\n|---|---|---|\n"
        )));
        assert!(is_error_table(&first_table(
            "| **Status Code** | **Error** | **Reason** | **Reason Code** |\n|---|---|---|---|\n"
        )));
        assert!(is_error_table(&first_table(
            "| status code | error | reason |\n|---|---|---|\n"
        )));
    }

    #[test]
    fn test_other_tables() {
        assert!(!is_error_table(&first_table("| Field | Type |\n|---|---|\n")));
        assert!(!is_error_table(&first_table(
            "| Status Code | Error | Reason | Notes |\n|---|---|---|---|\n"
        )));
    }
}
