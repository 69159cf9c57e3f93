use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use configurator_catalog::DoctorReport;
use configurator_engine::{Admissible, CascadeController};
use configurator_model::{CatalogEntry, DependentSlot, DriverField, SizeClass};

use crate::commands::ReplayResult;

pub fn print_doctor(report: &DoctorReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("Catalog: {}", report.source.as_deref().unwrap_or("-"));

    let mut files = Table::new();
    files.set_header(vec![
        header_cell("Role"),
        header_cell("Path"),
        header_cell("SHA-256"),
        header_cell("Pinned"),
    ]);
    apply_table_style(&mut files);
    align_column(&mut files, 3, CellAlignment::Center);
    for file in &report.files {
        files.add_row(vec![
            Cell::new(file.role.as_str()),
            Cell::new(&file.path),
            dim_cell(short_sha(&file.sha256)),
            flag_cell(file.pinned),
        ]);
    }
    println!("{files}");

    let mut counts = Table::new();
    counts.set_header(vec![header_cell("Kind"), header_cell("Entries")]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    for (kind, count) in &report.counts {
        counts.add_row(vec![Cell::new(kind), count_cell(*count)]);
    }
    println!("{counts}");

    for duplicate in &report.duplicates {
        println!(
            "duplicate {} id {} listed {} times (first wins)",
            duplicate.kind, duplicate.id, duplicate.occurrences
        );
    }
    for id in &report.unsized_openings {
        println!("opening {id} has no derivable size class");
    }
    if report.is_healthy() {
        println!("Catalog is healthy.");
    }
    Ok(())
}

pub fn print_admissible(controller: &CascadeController, json: bool) -> Result<()> {
    let admissible = controller.admissible();
    if json {
        println!("{}", serde_json::to_string_pretty(admissible)?);
        return Ok(());
    }

    let drivers = controller.drivers();
    let mut header = Table::new();
    header.set_header(vec![header_cell("Driver"), header_cell("Value")]);
    apply_table_style(&mut header);
    for field in DriverField::ALL {
        header.add_row(vec![
            Cell::new(field.as_str()),
            value_cell(drivers.display_value(field)),
        ]);
    }
    header.add_row(vec![
        Cell::new("wall block").add_attribute(Attribute::Italic),
        value_cell(admissible.height_size_class.map(size_text)),
    ]);
    header.add_row(vec![
        Cell::new("floor block").add_attribute(Attribute::Italic),
        value_cell(admissible.width_size_class.map(size_text)),
    ]);
    println!("{header}");

    let mut dimensions = Table::new();
    dimensions.set_header(vec![
        header_cell("Kind"),
        header_cell("Value"),
        header_cell("Label"),
        header_cell("Wall depth"),
        header_cell("Size"),
    ]);
    apply_table_style(&mut dimensions);
    for entry in &admissible.dimensions {
        dimensions.add_row(vec![
            Cell::new(entry.kind.as_str()),
            Cell::new(entry.id.as_str()).add_attribute(Attribute::Bold),
            Cell::new(entry.label()),
            Cell::new(entry.wall_depth.as_str()),
            value_cell(entry.derived_size_class().map(size_text)),
        ]);
    }
    println!("{dimensions}");

    println!("{}", openings_table(admissible));
    println!("{}", materials_table(admissible));
    Ok(())
}

fn openings_table(admissible: &Admissible) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Slot"),
        header_cell("Id"),
        header_cell("Label"),
        header_cell("Wall depth"),
        header_cell("Size"),
        header_cell("Roof"),
    ]);
    apply_table_style(&mut table);
    for slot in [
        DependentSlot::Windows,
        DependentSlot::Doors,
        DependentSlot::Skylights,
    ] {
        if !admissible.is_visible(slot) {
            table.add_row(vec![slot_cell(slot), dim_cell("hidden")]);
            continue;
        }
        let entries = admissible.entries(slot);
        if entries.is_empty() {
            table.add_row(vec![slot_cell(slot), dim_cell("none admissible")]);
        }
        for entry in entries {
            table.add_row(vec![
                slot_cell(slot),
                Cell::new(entry.id.as_str()).add_attribute(Attribute::Bold),
                Cell::new(entry.label()),
                Cell::new(entry.wall_depth.as_str()),
                value_cell(entry.derived_size_class().map(size_text)),
                value_cell(entry.roof_type.map(|roof| roof.as_str().to_string())),
            ]);
        }
    }
    table
}

fn materials_table(admissible: &Admissible) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Slot"),
        header_cell("Id"),
        header_cell("Label"),
        header_cell("Price"),
        header_cell("Standard"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for slot in [DependentSlot::Cladding, DependentSlot::Roofing] {
        for entry in admissible.entries(slot) {
            table.add_row(vec![
                slot_cell(slot),
                Cell::new(entry.id.as_str()).add_attribute(Attribute::Bold),
                Cell::new(entry.label()),
                price_cell(entry),
                flag_cell(admissible.is_standard(entry.id.as_str())),
            ]);
        }
    }
    table
}

pub fn print_replay(result: &ReplayResult, form: bool) -> Result<()> {
    if form {
        for (key, value) in result.submission.to_form_fields()? {
            println!("{key}={value}");
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&result.submission)?);
    }
    if result.outcome.rejected.is_empty() {
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Operation"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for rejected in &result.outcome.rejected {
        table.add_row(vec![
            Cell::new(rejected.index),
            Cell::new(&rejected.step),
            Cell::new(&rejected.error).fg(Color::Red),
        ]);
    }
    eprintln!("Rejected steps:");
    eprintln!("{table}");
    Ok(())
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn slot_cell(slot: DependentSlot) -> Cell {
    Cell::new(slot.as_str()).fg(Color::Blue)
}

fn value_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(Color::Yellow)
    }
}

fn flag_cell(set: bool) -> Cell {
    if set {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn price_cell(entry: &CatalogEntry) -> Cell {
    match entry.details.price {
        Some(price) => Cell::new(format!("{price:.2}")),
        None => dim_cell("-"),
    }
}

fn size_text(class: SizeClass) -> String {
    class.as_str().to_string()
}

fn short_sha(sha: &str) -> String {
    sha.chars().take(12).collect()
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
