// Integration tests for the road-split and small-area absorption passes.

mod common;

use common::*;
use polymerge::{PassLimits, Partition};

#[test]
fn five_small_triangles_converge_to_one_polygon() {
    let mut partition = five_triangles();
    let ledger = partition.ledger();

    let report = partition.absorb_small_areas(50.0, &limits());

    assert!(report.converged);
    assert_eq!(report.merges, 4);
    assert_eq!(partition.len(), 1);

    let survivor = partition.records().next().unwrap();
    assert_eq!(survivor.origin_ids.as_slice(), &[1, 2, 3, 4, 5]);
    assert!((survivor.area - 50.0).abs() < 50.0 * 1e-6);
    assert!(survivor.geometry.interiors().is_empty());
    partition.check_invariants(&ledger).unwrap();
}

#[test]
fn road_split_fragment_is_absorbed_by_its_only_neighbor() {
    let mut partition = Partition::new([
        road_record(1, rect(0.0, 0.0, 10.0, 20.0)),
        record(2, rect(10.0, 0.0, 30.0, 20.0)),
    ]).unwrap();
    let ledger = partition.ledger();

    let report = partition.absorb_road_splits(300.0, &limits());

    assert_eq!(report.merges, 1);
    assert_eq!(partition.ids(), vec![2]);
    let survivor = partition.get(2).unwrap();
    assert!(survivor.is_road_split);
    assert!((survivor.area - 600.0).abs() < 1e-6);
    assert_eq!(survivor.origin_ids.as_slice(), &[1, 2]);
    partition.check_invariants(&ledger).unwrap();
}

#[test]
fn road_split_chain_keeps_collapsing() {
    let mut partition = Partition::new([
        road_record(1, rect(0.0, 0.0, 1.0, 10.0)),
        road_record(2, rect(1.0, 0.0, 2.0, 10.0)),
        record(3, rect(2.0, 0.0, 20.0, 10.0)),
    ]).unwrap();

    let report = partition.absorb_road_splits(25.0, &limits());

    // 1 folds into 2, and the grown fragment (still a road split, area 20)
    // folds into 3.
    assert_eq!(report.merges, 2);
    assert_eq!(partition.ids(), vec![3]);
    assert!(partition.get(3).unwrap().is_road_split);
}

#[test]
fn road_pass_ignores_small_records_without_road_flag() {
    let mut partition = Partition::new([
        record(1, rect(0.0, 0.0, 1.0, 1.0)),
        record(2, rect(1.0, 0.0, 5.0, 1.0)),
    ]).unwrap();

    let report = partition.absorb_road_splits(100.0, &limits());

    assert_eq!(report.iterations, 0);
    assert_eq!(partition.len(), 2);
}

#[test]
fn small_area_pass_keeps_survivor_road_flag() {
    let mut partition = Partition::new([
        road_record(1, rect(0.0, 0.0, 1.0, 1.0)),
        record(2, rect(1.0, 0.0, 5.0, 1.0)),
    ]).unwrap();

    partition.absorb_small_areas(2.0, &limits());

    assert_eq!(partition.ids(), vec![2]);
    assert!(!partition.get(2).unwrap().is_road_split);
}

#[test]
fn isolated_square_is_left_unchanged() {
    let mut partition = Partition::new([
        road_record(1, rect(0.0, 0.0, 1.0, 1.0)),
        record(2, rect(10.0, 10.0, 12.0, 12.0)),
    ]).unwrap();
    let before = snapshot(&partition);

    let road = partition.absorb_road_splits(1e9, &limits());
    let small = partition.absorb_small_areas(1e9, &limits());

    assert_eq!(road.isolated, 1);
    assert_eq!(small.isolated, 2);
    assert_eq!(snapshot(&partition), before);
}

#[test]
fn zero_thresholds_leave_partition_unchanged() {
    let mut partition = five_triangles();
    let before = snapshot(&partition);

    let road = partition.absorb_road_splits(0.0, &limits());
    let small = partition.absorb_small_areas(0.0, &limits());

    assert_eq!(road.iterations + small.iterations, 0);
    assert_eq!(snapshot(&partition), before);
}

#[test]
fn runs_are_deterministic() {
    let run = || {
        let mut partition = five_triangles();
        partition.absorb_small_areas(25.0, &limits());
        snapshot(&partition)
    };
    assert_eq!(run(), run());
}

#[test]
fn record_count_never_grows() {
    for threshold in [0.0, 5.0, 15.0, 25.0, 35.0, 100.0] {
        let mut partition = five_triangles();
        let ledger = partition.ledger();
        let before = partition.len();

        let report = partition.absorb_small_areas(threshold, &limits());

        assert_eq!(partition.len(), before - report.merges);
        assert!(partition.len() <= before);
        partition.check_invariants(&ledger).unwrap();
    }
}

#[test]
fn iteration_budget_returns_partial_result() {
    let mut partition = five_triangles();
    let ledger = partition.ledger();
    let limits = PassLimits { max_iterations: 2, ..limits() };

    let report = partition.absorb_small_areas(50.0, &limits);

    assert!(!report.converged);
    assert_eq!(report.iterations, 2);
    assert_eq!(partition.len(), 3);
    partition.check_invariants(&ledger).unwrap();
}

#[test]
fn fragment_across_narrow_gap_is_absorbed() {
    let mut partition = Partition::new([
        record(1, rect(0.0, 0.0, 1.0, 1.0)),
        record(2, rect(1.0002, 0.0, 3.0, 1.0)),
    ]).unwrap();
    let ledger = partition.ledger();
    assert_eq!(partition.neighbors_of(1, TOLERANCE).len(), 1);

    let report = partition.absorb_small_areas(1.5, &limits());

    assert_eq!(report.merges, 1);
    assert_eq!(report.rejected, 0);
    assert_eq!(partition.ids(), vec![2]);
    let survivor = partition.get(2).unwrap();
    assert_eq!(survivor.origin_ids.as_slice(), &[1, 2]);
    assert!((survivor.area - 3.0002).abs() < 1e-5);
    assert!((partition.bridged_area() - 0.0002).abs() < 1e-5);
    partition.check_invariants(&ledger).unwrap();
}

#[test]
fn gap_wider_than_tolerance_is_not_bridged() {
    let mut partition = Partition::new([
        record(1, rect(0.0, 0.0, 1.0, 1.0)),
        record(2, rect(1.01, 0.0, 3.0, 1.0)),
    ]).unwrap();
    let before = snapshot(&partition);

    let report = partition.absorb_small_areas(1.5, &limits());

    assert_eq!(report.isolated, 1);
    assert_eq!(snapshot(&partition), before);
    assert_eq!(partition.bridged_area(), 0.0);
}
