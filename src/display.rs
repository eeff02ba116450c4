use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::cell::CellView;
use crate::viewer::GridResponse;

/// Draws a cell as one glyph per slot, e.g. "..##@.."
pub fn format_cell(view: &CellView) -> String {
    view.segments
        .iter()
        .map(|segment| segment.status.glyph().to_string().repeat(segment.slot_count))
        .collect()
}

/// Writes the grid as plain text: legend, header, then one line per row
pub fn write_grid<W: Write>(out: &mut W, grid: &GridResponse) -> io::Result<()> {
    let legend: Vec<String> = grid
        .legend
        .iter()
        .map(|entry| format!("{} {}", entry.status.glyph(), entry.label))
        .collect();
    writeln!(out, "Legend: {}", legend.join("   "))?;

    let layout = &grid.layout;
    if layout.rows.is_empty() || layout.column_headers.is_empty() {
        writeln!(out, "(no rooms or dates match the current filters)")?;
        return Ok(());
    }

    let label_width = layout
        .rows
        .iter()
        .map(|row| row.label.len())
        .chain(std::iter::once(layout.corner_label.len()))
        .max()
        .unwrap_or(0);
    let cell_width = grid
        .cells
        .iter()
        .map(|view| format_cell(view).len())
        .chain(layout.column_headers.iter().map(|h| h.len()))
        .max()
        .unwrap_or(0);

    write!(out, "{:<width$}", layout.corner_label, width = label_width)?;
    for header in &layout.column_headers {
        write!(out, " | {:<width$}", header, width = cell_width)?;
    }
    writeln!(out)?;

    let columns = layout.column_headers.len();
    for (row, views) in layout.rows.iter().zip(grid.cells.chunks(columns)) {
        write!(out, "{:<width$}", row.label, width = label_width)?;
        for view in views {
            write!(out, " | {:<width$}", format_cell(view), width = cell_width)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Prints the grid to stdout
pub fn print_grid(grid: &GridResponse) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_grid(&mut out, grid)
}

/// Writes the grid to a file
pub fn write_grid_to_file(grid: &GridResponse, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_grid(&mut file, grid)
}
