use crate::config::{PlacerConfig, SelectionMode};
use crate::error::Result;
use crate::grid::PlacementGrid;
use crate::model::{PlacementReport, ReportMeta};
use crate::placer::{TrayPlacement, TrayPlacer};
use crate::random::{RandomSource, RngSource};
use crate::shape::ShapeMask;
use tracing::{debug, info, instrument};

#[instrument(skip_all)]
/// Runs a full placement session described by `cfg`, drawing from `rng`.
///
/// Notes:
/// - The config is validated first; construction errors are the only failures.
/// - In `in_order` mode every tray is attempted once in list order.
/// - In `random_draw` mode each slot first draws a tray index from `rng`, then attempts
///   that tray, so draws interleave with placement attempts.
/// - `cfg.seed` is recorded in the report but not used; see [`place_trays_seeded`].
pub fn place_trays<R: RandomSource + ?Sized>(
    cfg: &PlacerConfig,
    rng: &mut R,
) -> Result<PlacementReport> {
    cfg.validate()?;

    let catalog: Vec<(String, ShapeMask)> = cfg
        .trays
        .iter()
        .enumerate()
        .map(|(i, t)| t.to_mask().map(|m| (t.key(i), m)))
        .collect::<Result<_>>()?;

    let grid = PlacementGrid::new(cfg.board_width, cfg.board_height)?;
    let mut placer = TrayPlacer::new(grid, cfg.max_attempts)?;

    let placements: Vec<TrayPlacement> = match cfg.selection {
        SelectionMode::InOrder => placer.place_all(&catalog, rng),
        SelectionMode::RandomDraw => {
            let last = (catalog.len() - 1) as u32;
            (0..cfg.slot_count())
                .map(|_| {
                    let idx = rng.next_in_range(0, last) as usize;
                    let (key, mask) = &catalog[idx];
                    debug!(slot_key = %key, "drew tray from catalog");
                    placer.place(key.clone(), mask, rng)
                })
                .collect()
        }
    };

    let report = build_report(cfg, placer.grid(), placements);
    info!(
        placed = report.stats().num_placed,
        trays = report.placements.len(),
        "placement session finished"
    );
    Ok(report)
}

/// Like [`place_trays`], with a source seeded from `cfg.seed` (or entropy when unset).
pub fn place_trays_seeded(cfg: &PlacerConfig) -> Result<PlacementReport> {
    let mut rng = match cfg.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    place_trays(cfg, &mut rng)
}

fn build_report(
    cfg: &PlacerConfig,
    grid: &PlacementGrid,
    placements: Vec<TrayPlacement>,
) -> PlacementReport {
    let selection = match cfg.selection {
        SelectionMode::InOrder => "in_order",
        SelectionMode::RandomDraw => "random_draw",
    };
    PlacementReport {
        board_width: grid.width(),
        board_height: grid.height(),
        placements,
        occupancy: grid.rows(),
        meta: ReportMeta {
            schema_version: "1".into(),
            app: "tray-placer".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            max_attempts: cfg.max_attempts,
            seed: cfg.seed,
            selection: selection.into(),
        },
    }
}
