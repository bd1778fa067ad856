//! Command-line interface implementations
use std::fmt::Write;

use color_eyre::eyre::Result;
use comfy_table::{CellAlignment, Table};
use itertools::Itertools;
use rand::Rng;

use crate::dice::DiceSet;
use crate::distribution::FrequencyTable;

/// A column of the frequency table view
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Column {
    Sum,
    Occurrences,
    Probability,
    Graph,
}

impl Column {
    /// All columns, in display order
    pub const ALL: [Column; 4] = [
        Column::Sum,
        Column::Occurrences,
        Column::Probability,
        Column::Graph,
    ];

    /// The header text of this column
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sum => "Sum",
            Self::Occurrences => "Occurrences",
            Self::Probability => "Probability",
            Self::Graph => "Graph",
        }
    }

    fn alignment(&self) -> CellAlignment {
        match self {
            Self::Graph => CellAlignment::Left,
            _ => CellAlignment::Right,
        }
    }
}

/// The set of requested optional columns
///
/// The sum column is always included.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Columns {
    pub occurrences: bool,
    pub probability: bool,
    pub graph: bool,
}

impl Columns {
    /// Whether the given column should be displayed
    pub fn includes(&self, column: Column) -> bool {
        match column {
            Column::Sum => true,
            Column::Occurrences => self.occurrences,
            Column::Probability => self.probability,
            Column::Graph => self.graph,
        }
    }

    /// Whether no optional column was requested
    pub fn is_empty(&self) -> bool {
        !(self.occurrences || self.probability || self.graph)
    }

    /// Whether the graph is the only requested column
    pub fn is_graph_only(&self) -> bool {
        self.graph && !self.occurrences && !self.probability
    }

    /// Iterate over the displayed columns, in display order
    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL
            .into_iter()
            .filter(|column| self.includes(*column))
    }
}

/// Generate a `Table` containing the given frequency `table`
///
/// This function generates a [comfy-table] `Table` containing one row per
/// achievable sum, restricted to the requested `columns`.
///
/// [comfy-table]: https://docs.rs/comfy-table/latest/comfy_table/
pub fn list_sums(table: &FrequencyTable, columns: Columns) -> Table {
    let mut view = Table::new();
    view.set_header(columns.iter().map(|column| column.name()).collect_vec());
    for (idx, column) in columns.iter().enumerate() {
        if let Some(view_column) = view.column_mut(idx) {
            view_column.set_cell_alignment(column.alignment());
        }
    }
    table.entries().iter().fold(view, |mut view, entry| {
        view.add_row(
            columns
                .iter()
                .map(|column| match column {
                    Column::Sum => entry.sum.to_string(),
                    Column::Occurrences => entry.count.to_string(),
                    Column::Probability => format!("{:.6}", entry.probability),
                    Column::Graph => entry.graph.clone(),
                })
                .collect_vec(),
        );
        view
    })
}

/// Draw the graph-only view of the given frequency `table`
///
/// Unlike [`list_sums`], the sum column is right-aligned to the widest sum
/// and every bar is followed by its raw count.
pub fn graph_sums(table: &FrequencyTable) -> String {
    let width = table.max_sum().to_string().len().max(4);
    std::iter::once(format!("{:>width$} | Graph", "Sums"))
        .chain(
            table
                .entries()
                .iter()
                .map(|entry| format!("{:>width$} | {} {}", entry.sum, entry.graph, entry.count)),
        )
        .join("\n")
}

/// Generate the full report for `dice`
///
/// The report starts with a blank line, followed by the requested view of
/// the distribution (if any), the total number of combinations (unless only
/// a roll was requested), and finally the sum of a single roll if an RNG was
/// given. Each section is terminated by a blank line.
pub fn report<R: Rng>(dice: &DiceSet, columns: Columns, roll: Option<&mut R>) -> Result<String> {
    let mut out = String::from("\n");
    if !columns.is_empty() || roll.is_none() {
        let table = FrequencyTable::new(dice)?;
        if columns.is_graph_only() {
            writeln!(out, "{}\n", graph_sums(&table))?;
        } else if !columns.is_empty() {
            writeln!(
                out,
                "{}\n",
                format_table(list_sums(&table, columns)).trim_fmt()
            )?;
        }
        writeln!(out, "Total combinations: {}\n", table.total())?;
    }
    if let Some(rng) = roll {
        let outcome = dice.roll(rng);
        log::debug!("Rolled {:?} with {dice}", outcome.faces());
        writeln!(out, "Your Roll is: {}\n", outcome.sum())?;
    }
    Ok(out)
}

// Apply formatting to the given table
fn format_table(mut table: Table) -> Table {
    use comfy_table::presets::UTF8_HORIZONTAL_ONLY;
    use comfy_table::ContentArrangement;
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Disabled);
    table
}
