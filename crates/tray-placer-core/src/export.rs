use crate::model::PlacementReport;
use serde_json::{Value, json};

/// Serialize a report as `{ board, trays, occupancy, meta }`.
///
/// Each tray carries its key, origin (`null` when it was not placed), bounding size,
/// mask rows and attempt count. Rendering layers place a placed tray at `(x, 0, y)`.
pub fn to_json<K: ToString>(report: &PlacementReport<K>) -> Value {
    let trays: Vec<Value> = report
        .placements
        .iter()
        .map(|p| {
            let origin = match p.outcome.origin() {
                Some((x, y)) => json!({"x": x, "y": y}),
                None => Value::Null,
            };
            json!({
                "key": p.key.to_string(),
                "placed": p.outcome.is_placed(),
                "origin": origin,
                "size": {"w": p.mask.width(), "h": p.mask.height()},
                "shape": p.mask.rows(),
                "attempts": p.attempts,
            })
        })
        .collect();
    json!({
        "board": {"w": report.board_width, "h": report.board_height},
        "trays": trays,
        "occupancy": report.occupancy,
        "stats": report.stats(),
        "meta": &report.meta,
    })
}

/// Label for the n-th placed tray: `A`..`Z`, then `a`..`z`, then `#`.
fn label(n: usize) -> char {
    match n {
        0..=25 => (b'A' + n as u8) as char,
        26..=51 => (b'a' + (n - 26) as u8) as char,
        _ => '#',
    }
}

/// Render the board as text, one line per row (`y` growing downwards).
///
/// Free cells are `.`; each placed tray gets a letter in placement order, so holes in a
/// mask show the cell underneath. Cells that are occupied but not attributable to a
/// placement (not produced by the pipeline) are drawn as `?`.
pub fn to_ascii<K>(report: &PlacementReport<K>) -> String {
    let w = report.board_width as usize;
    let h = report.board_height as usize;
    let mut board: Vec<Vec<char>> = (0..h)
        .map(|y| {
            (0..w)
                .map(|x| {
                    let occupied = report
                        .occupancy
                        .get(y)
                        .and_then(|row| row.get(x))
                        .copied()
                        .unwrap_or(false);
                    if occupied { '?' } else { '.' }
                })
                .collect()
        })
        .collect();

    let placed = report
        .placements
        .iter()
        .filter_map(|p| p.outcome.origin().map(|o| (p, o)));
    for (n, (p, (ox, oy))) in placed.enumerate() {
        let c = label(n);
        for (x, y) in p.mask.occupied_cells() {
            let (ax, ay) = ((ox + x) as usize, (oy + y) as usize);
            if let Some(cell) = board.get_mut(ay).and_then(|row| row.get_mut(ax)) {
                *cell = c;
            }
        }
    }

    let mut out = String::with_capacity((w + 1) * h);
    for row in board {
        out.extend(row);
        out.push('\n');
    }
    out
}
