//! Aligned output tables
//!
//! Numeric columns (times, lengths, codes) are right-aligned so values line
//! up by magnitude; names and vectors stay left-aligned.

use prettytable::format::{Alignment, consts::FORMAT_NO_LINESEP_WITH_TITLE};
use prettytable::{Cell, Row, Table};

/// One column of an output table
#[derive(Debug, Clone, Copy)]
pub struct Column {
    title: &'static str,
    align: Alignment,
}

impl Column {
    /// Left-aligned text column
    pub const fn text(title: &'static str) -> Self {
        Self {
            title,
            align: Alignment::LEFT,
        }
    }

    /// Right-aligned numeric column
    pub const fn number(title: &'static str) -> Self {
        Self {
            title,
            align: Alignment::RIGHT,
        }
    }

    /// Bold title, aligned like the column's values
    fn title_spec(self) -> &'static str {
        match self.align {
            Alignment::RIGHT => "br",
            _ => "bl",
        }
    }
}

/// Table whose rows follow the alignment of its columns
pub struct AlignedTable {
    table: Table,
    alignments: Vec<Alignment>,
}

impl AlignedTable {
    /// Append a row; cells beyond the declared columns are left-aligned
    pub fn add_row(&mut self, cells: Vec<String>) {
        let row_cells: Vec<Cell> = cells
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let align = self.alignments.get(i).copied().unwrap_or(Alignment::LEFT);
                Cell::new_align(text, align)
            })
            .collect();
        self.table.add_row(Row::new(row_cells));
    }

    /// Print to stdout
    pub fn printstd(&self) {
        self.table.printstd();
    }
}

/// Create a table with bold titles
pub fn create_table(columns: &[Column]) -> AlignedTable {
    let mut table = Table::new();
    table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        columns
            .iter()
            .map(|column| Cell::new(column.title).style_spec(column.title_spec()))
            .collect(),
    ));

    AlignedTable {
        table,
        alignments: columns.iter().map(|column| column.align).collect(),
    }
}

impl std::fmt::Display for AlignedTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table)
    }
}
