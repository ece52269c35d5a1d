//! Row-span replay for intensity tables.
//!
//! The bulletin tables express hierarchical grouping by giving the first
//! cell of a group a `rowspan` and omitting it from the following rows.
//! [`walk_rows`] reconstructs a flat logical record per row by replaying the
//! still-spanning values for the leading "spanning columns" — one for the
//! region table (intensity), two for the city table (prefecture, then
//! intensity).

/// A table cell as extracted from the page: its text and its `rowspan`
/// attribute (`1` when absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedCell {
    pub text: String,
    pub row_span: u32,
}

impl SpannedCell {
    #[must_use]
    pub fn new(text: impl Into<String>, row_span: u32) -> Self {
        Self {
            text: text.into(),
            row_span: row_span.max(1),
        }
    }

    /// A plain cell with no vertical span.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, 1)
    }
}

#[derive(Debug, Default, Clone)]
struct ColumnState {
    value: String,
    remaining: u32,
}

/// Flattens `rows` into logical records, replaying the first
/// `spanning_columns` columns across their row spans.
///
/// Each output record is `[spanning values in column order, remaining cells
/// of the row]`. Rows with zero cells are separator/header artifacts: they
/// are skipped entirely and do not advance any span counter. A row too short
/// to refresh an exhausted spanning column is malformed and skipped the same
/// way.
#[must_use]
pub fn walk_rows(rows: &[Vec<SpannedCell>], spanning_columns: usize) -> Vec<Vec<String>> {
    let mut states = vec![ColumnState::default(); spanning_columns];
    let mut records = Vec::new();

    'rows: for row in rows {
        if row.is_empty() {
            continue;
        }

        let mut cells = row.iter();
        let mut record = Vec::with_capacity(row.len() + spanning_columns);

        for state in &mut states {
            if state.remaining == 0 {
                let Some(cell) = cells.next() else {
                    continue 'rows;
                };
                state.value = cell.text.clone();
                state.remaining = cell.row_span;
            }
            record.push(state.value.clone());
        }

        record.extend(cells.map(|cell| cell.text.clone()));
        records.push(record);

        for state in &mut states {
            state.remaining = state.remaining.saturating_sub(1);
        }
    }

    records
}
