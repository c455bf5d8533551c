// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Formats and prints group statistics to the console.

use comfy_table::{Cell, CellAlignment, Table};

use crate::stats::{kilobytes, CountFlag, EntrySnapshot};

/// Print one summary line per group, in the given order.
pub fn print_stats(entries: &[EntrySnapshot]) {
    for entry in entries {
        println!("{}", entry.pretty());
    }
}

/// Create a table with the default preset styling.
fn default_table_preset() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

fn count_cell(entry: &EntrySnapshot) -> Cell {
    let cell = Cell::new(entry.total_count).set_alignment(CellAlignment::Right);
    match entry.count_flag() {
        CountFlag::Normal => cell.fg(comfy_table::Color::Green),
        CountFlag::Many => cell.fg(comfy_table::Color::Red),
    }
}

/// Create a table showing files and size per group, with a total row.
#[must_use]
pub fn summary_table(entries: &[EntrySnapshot]) -> Table {
    let mut table = default_table_preset();
    table.set_header(vec![
        Cell::new("Group").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Files").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Size (KB)").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            count_cell(entry),
            Cell::new(kilobytes(entry.total_size)).set_alignment(CellAlignment::Right),
        ]);
    }

    let files: u64 = entries.iter().map(|e| e.total_count).sum();
    let bytes: u64 = entries.iter().map(|e| e.total_size).sum();
    table.add_row(vec![
        Cell::new("Total").add_attribute(comfy_table::Attribute::Bold),
        Cell::new(files)
            .add_attribute(comfy_table::Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new(kilobytes(bytes))
            .add_attribute(comfy_table::Attribute::Bold)
            .set_alignment(CellAlignment::Right),
    ]);
    table
}
