//! Text and JSON rendering for CLI output.

use std::fmt::Write;

use hangar_core::Ship;
use serde::Serialize;

const HEADERS: [&str; 9] = [
    "ID", "NAME", "PLANET", "TYPE", "PROD DATE", "USED", "SPEED", "CREW", "RATING",
];

/// Render a payload as pretty-printed JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn ship_cells(ship: &Ship) -> [String; 9] {
    [
        ship.id.to_string(),
        ship.name.clone(),
        ship.planet.clone(),
        ship.ship_type.to_string(),
        ship.prod_date.format("%Y-%m-%d").to_string(),
        if ship.is_used { "yes" } else { "no" }.to_string(),
        format!("{:.2}", ship.speed),
        ship.crew_size.to_string(),
        format!("{:.2}", ship.rating),
    ]
}

/// Render ships as an aligned table.
pub fn render_ship_table(ships: &[Ship]) -> String {
    if ships.is_empty() {
        return "No ships found.\n".to_string();
    }
    let rows: Vec<[String; 9]> = ships.iter().map(ship_cells).collect();
    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    append_row(&mut output, &widths, HEADERS.iter().copied());
    for row in &rows {
        append_row(&mut output, &widths, row.iter().map(String::as_str));
    }
    output
}

fn append_row<'a>(output: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(output, "{}", line.trim_end());
}
