use std::collections::VecDeque;
use tray_placer_core::prelude::*;

/// Counts draws made through the wrapped source.
struct Counting<S> {
    inner: S,
    draws: usize,
}

impl<S: RandomSource> RandomSource for Counting<S> {
    fn next_in_range(&mut self, min: u32, max: u32) -> u32 {
        self.draws += 1;
        self.inner.next_in_range(min, max)
    }
}

/// Replays fixed values, clamped into the requested range.
struct Scripted(VecDeque<u32>);

impl RandomSource for Scripted {
    fn next_in_range(&mut self, min: u32, max: u32) -> u32 {
        let v = self.0.pop_front().expect("script exhausted");
        v.clamp(min, max)
    }
}

fn placer(w: u32, h: u32, attempts: u32) -> TrayPlacer<String> {
    TrayPlacer::new(PlacementGrid::new(w, h).unwrap(), attempts).unwrap()
}

#[test]
fn single_cell_on_empty_board_is_placed() {
    for seed in 0..20 {
        let mut p = placer(4, 4, 10);
        let dot = ShapeMask::filled(1, 1).unwrap();
        let r = p.place("dot".into(), &dot, &mut RngSource::seeded(seed));
        let (x, y) = r.outcome.origin().expect("placed");
        assert!(x < 4 && y < 4);
        assert_eq!(r.attempts, 1);
        assert_eq!(p.grid().occupied_count(), 1);
        assert!(p.grid().is_occupied(x, y).unwrap());
    }
}

#[test]
fn second_full_board_tray_fails() {
    let mut p = placer(2, 2, 100);
    let full = ShapeMask::filled(2, 2).unwrap();
    let trays = vec![("a".to_string(), full.clone()), ("b".to_string(), full)];
    let mut rng = Counting {
        inner: RngSource::seeded(3),
        draws: 0,
    };
    let out = p.place_all(&trays, &mut rng);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].key, "a");
    assert_eq!(out[0].outcome, PlacementOutcome::Placed { x: 0, y: 0 });
    assert_eq!(out[1].key, "b");
    assert_eq!(out[1].outcome, PlacementOutcome::Failed);
    assert_eq!(out[1].attempts, 100);
    // two draws per attempt: 1 attempt for a, 100 for b
    assert_eq!(rng.draws, 2 + 200);
    assert_eq!(p.grid().occupied_count(), 4);
}

#[test]
fn oversized_tray_fails_without_drawing() {
    let mut p = placer(3, 3, 50);
    let big = ShapeMask::filled(4, 4).unwrap();
    let mut rng = Counting {
        inner: RngSource::seeded(1),
        draws: 0,
    };
    let r = p.place("big".into(), &big, &mut rng);
    assert_eq!(r.outcome, PlacementOutcome::Failed);
    assert_eq!(r.attempts, 0);
    assert_eq!(rng.draws, 0);
    assert_eq!(p.grid().occupied_count(), 0);

    // Taller-only and wider-only masks are rejected the same way.
    for mask in [ShapeMask::filled(1, 4).unwrap(), ShapeMask::filled(4, 1).unwrap()] {
        let r = p.place("thin".into(), &mask, &mut rng);
        assert_eq!((r.outcome, r.attempts), (PlacementOutcome::Failed, 0));
    }
    assert_eq!(rng.draws, 0);
}

#[test]
fn holes_leave_cells_for_later_trays() {
    let mut p = placer(3, 3, 10);
    let tip = ShapeMask::new(2, 1, Some(vec![true, false])).unwrap();
    // Force origin (0, 0) for the tip, then (1, 0) for a single cell.
    let mut rng = Scripted(VecDeque::from(vec![0, 0, 1, 0]));
    let a = p.place("tip".into(), &tip, &mut rng);
    assert_eq!(a.outcome, PlacementOutcome::Placed { x: 0, y: 0 });
    assert!(p.grid().is_occupied(0, 0).unwrap());
    assert!(!p.grid().is_occupied(1, 0).unwrap());
    assert_eq!(p.grid().occupied_count(), 1);

    let dot = ShapeMask::filled(1, 1).unwrap();
    let b = p.place("dot".into(), &dot, &mut rng);
    assert_eq!(b.outcome, PlacementOutcome::Placed { x: 1, y: 0 });
    assert_eq!(p.grid().occupied_count(), 2);
}

#[test]
fn draws_x_then_y_and_retries_until_fit() {
    let mut p = placer(3, 1, 5);
    let dot = ShapeMask::filled(1, 1).unwrap();
    // occupy x = 0 and x = 1
    let mut rng = Scripted(VecDeque::from(vec![0, 0, 1, 0, 0, 0, 1, 0, 2, 0]));
    p.place("a".into(), &dot, &mut rng);
    p.place("b".into(), &dot, &mut rng);
    let c = p.place("c".into(), &dot, &mut rng);
    assert_eq!(c.outcome, PlacementOutcome::Placed { x: 2, y: 0 });
    assert_eq!(c.attempts, 3);
    assert!(rng.0.is_empty());
}

#[test]
fn failed_tray_does_not_stop_the_session() {
    let mut p = placer(4, 4, 30);
    let trays = vec![
        ("wide".to_string(), ShapeMask::filled(5, 1).unwrap()),
        ("block".to_string(), ShapeMask::filled(2, 2).unwrap()),
        ("tall".to_string(), ShapeMask::filled(1, 9).unwrap()),
        ("dot".to_string(), ShapeMask::filled(1, 1).unwrap()),
    ];
    let out = p.place_all(&trays, &mut RngSource::seeded(11));
    let keys: Vec<&str> = out.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["wide", "block", "tall", "dot"]);
    assert!(!out[0].outcome.is_placed());
    assert!(out[1].outcome.is_placed());
    assert!(!out[2].outcome.is_placed());
    assert!(out[3].outcome.is_placed());
    assert_eq!(p.grid().occupied_count(), 5);
    assert_eq!(p.placed().len(), 2);
}

#[test]
fn placed_footprints_never_overlap() {
    let shapes = [
        ShapeMask::filled(2, 2).unwrap(),
        ShapeMask::from_rows(&[vec![true, true, true], vec![true, false, false]]).unwrap(),
        ShapeMask::from_rows(&[vec![false, true], vec![true, true], vec![false, true]]).unwrap(),
        ShapeMask::filled(1, 3).unwrap(),
        ShapeMask::filled(1, 1).unwrap(),
    ];
    for seed in 0..50u64 {
        let mut p = placer(6, 6, 100);
        let trays: Vec<(String, ShapeMask)> = (0..12)
            .map(|i| (format!("t{}", i), shapes[i % shapes.len()].clone()))
            .collect();
        let out = p.place_all(&trays, &mut RngSource::seeded(seed));
        let expected: usize = out
            .iter()
            .filter(|r| r.outcome.is_placed())
            .map(|r| r.mask.cell_count())
            .sum();
        assert_eq!(p.grid().occupied_count(), expected, "seed {}", seed);
    }
}

#[test]
fn zero_attempts_is_rejected() {
    let grid = PlacementGrid::new(2, 2).unwrap();
    assert!(matches!(
        TrayPlacer::<String>::new(grid, 0),
        Err(TrayPlacerError::InvalidConfig(_))
    ));
}

#[test]
fn evict_frees_space_for_new_trays() {
    let mut p = placer(2, 2, 100);
    let full = ShapeMask::filled(2, 2).unwrap();
    let mut rng = RngSource::seeded(5);
    assert!(p.place("a".into(), &full, &mut rng).outcome.is_placed());
    assert!(!p.place("b".into(), &full, &mut rng).outcome.is_placed());

    assert!(!p.evict(&"b".to_string()));
    assert!(p.evict(&"a".to_string()));
    assert_eq!(p.grid().occupied_count(), 0);
    assert!(p.placed().is_empty());

    assert!(p.place("c".into(), &full, &mut rng).outcome.is_placed());
    assert_eq!(p.placed()[0].key, "c");
}

#[test]
fn reset_starts_a_fresh_session() {
    let mut p = placer(3, 3, 20);
    let mut rng = RngSource::seeded(9);
    p.place("a".into(), &ShapeMask::filled(3, 3).unwrap(), &mut rng);
    assert_eq!(p.grid().occupied_count(), 9);
    p.reset();
    assert_eq!(p.grid().occupied_count(), 0);
    assert!(p.placed().is_empty());
    assert!(p
        .place("b".into(), &ShapeMask::filled(3, 3).unwrap(), &mut rng)
        .outcome
        .is_placed());
}

#[test]
fn evict_keeps_tray_when_footprint_was_freed_elsewhere() {
    let mut p = placer(2, 2, 10);
    let full = ShapeMask::filled(2, 2).unwrap();
    let mut rng = RngSource::seeded(3);
    assert!(p.place("a".into(), &full, &mut rng).outcome.is_placed());

    p.grid_mut().clear();
    assert!(!p.evict(&"a".to_string()));
    assert_eq!(p.placed().len(), 1);
    assert_eq!(p.placed()[0].key, "a");
    assert_eq!(p.grid().occupied_count(), 0);
}

#[test]
fn blocked_attempts_leave_grid_unchanged() {
    let mut p = placer(3, 2, 3);
    let ell = ShapeMask::from_rows(&[vec![true, false], vec![true, true]]).unwrap();
    let mut rng = Scripted(VecDeque::from(vec![0, 0]));
    p.place("ell".into(), &ell, &mut rng);
    let before = p.grid().rows();

    // every origin overlaps the ell's column at x = 0 or its foot at x = 1
    let bar = ShapeMask::filled(2, 2).unwrap();
    let mut rng = Scripted(VecDeque::from(vec![0, 0, 1, 0, 0, 0]));
    let b = p.place("bar".into(), &bar, &mut rng);
    assert_eq!(b.outcome, PlacementOutcome::Failed);
    assert_eq!(b.attempts, 3);
    assert_eq!(p.grid().rows(), before);
    assert_eq!(p.placed().len(), 1);
}
