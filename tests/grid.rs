mod common;

use common::{CountingLambert, FixedStates, approx, pair};
use mission_planner::constants::{AU_KM, MU_SUN_KM3_S2};
use mission_planner::ephemeris::{EphemerisError, KeplerianEphemeris};
use mission_planner::impulsive::{HohmannTransfer, PathType};
use mission_planner::transfer::{Cell, GridError, GridRequest, GridSolver};
use mission_planner::{Body, DateRange, get_range};

fn request<'a>(departure: &'a DateRange, arrival: &'a DateRange) -> GridRequest<'a> {
    GridRequest {
        mu_km3_s2: MU_SUN_KM3_S2,
        departure_body: Body::Earth,
        arrival_body: Body::Mars,
        departure,
        arrival,
    }
}

#[test]
fn grid_shape_follows_date_ranges() {
    let departure = get_range("2022-07-01", "2022-07-05", 2).unwrap();
    let arrival = get_range("2023-01-01", "2023-01-01", 2).unwrap();
    let ephemeris = FixedStates::earth_and_mars();
    let lambert = CountingLambert::always(pair([0.0, 30.0, 0.0], [24.0, 0.0, 0.0]));

    let grid = GridSolver::new(&ephemeris, &lambert)
        .solve(&request(&departure, &arrival))
        .expect("grid");

    assert_eq!(grid.shape(), (1, 3));
    let tof: Vec<f64> = grid.tof_days.row(0).iter().filter_map(|c| c.value()).collect();
    assert_eq!(tof, vec![184.0, 182.0, 180.0]);
    for path in PathType::ALL {
        let grids = grid.path(path);
        for cells in [&grids.c3, &grids.v_infinity, &grids.delta_v] {
            assert_eq!((cells.rows(), cells.cols()), (1, 3));
            assert_eq!(cells.solved_count(), 3);
        }
    }
    // One batch call per body, two solves per cell.
    assert_eq!(ephemeris.calls(), 2);
    assert_eq!(lambert.calls(), 6);
}

#[test]
fn non_positive_flight_times_are_unsolved_without_solving() {
    let departure = get_range("2023-01-01", "2023-01-03", 1).unwrap();
    let arrival = get_range("2023-01-02", "2023-01-02", 1).unwrap();
    let ephemeris = FixedStates::earth_and_mars();
    let lambert = CountingLambert::always(pair([0.0, 30.0, 0.0], [24.0, 0.0, 0.0]));

    let grid = GridSolver::new(&ephemeris, &lambert)
        .solve(&request(&departure, &arrival))
        .expect("grid");

    assert_eq!(grid.tof_days.row(0), &[Cell::Solved(1.0), Cell::Solved(0.0), Cell::Solved(-1.0)]);
    for path in PathType::ALL {
        let grids = grid.path(path);
        assert!(grids.delta_v.get(0, 0).unwrap().is_solved());
        for departure in 1..3 {
            assert_eq!(grids.c3.get(0, departure), Some(Cell::Unsolved));
            assert_eq!(grids.v_infinity.get(0, departure), Some(Cell::Unsolved));
            assert_eq!(grids.delta_v.get(0, departure), Some(Cell::Unsolved));
        }
    }
    assert_eq!(lambert.calls(), 2);
}

#[test]
fn hohmann_geometry_reproduces_closed_form_quantities() {
    let r1 = AU_KM;
    let r2 = 1.524 * AU_KM;
    let hohmann = HohmannTransfer::between(r1, r2, MU_SUN_KM3_S2).unwrap();
    let ephemeris = FixedStates::new()
        .with(Body::Earth, [r1, 0.0, 0.0], [0.0, hohmann.departure_circular_km_s, 0.0])
        .with(Body::Mars, [-r2, 0.0, 0.0], [0.0, -hohmann.arrival_circular_km_s, 0.0]);
    let lambert = CountingLambert::always(pair(
        [0.0, hohmann.departure_transfer_km_s, 0.0],
        [0.0, -hohmann.arrival_transfer_km_s, 0.0],
    ));
    let departure = get_range("2022-07-01", "2022-07-01", 1).unwrap();
    let arrival = get_range("2023-03-17", "2023-03-17", 1).unwrap();

    let grid = GridSolver::new(&ephemeris, &lambert)
        .solve(&request(&departure, &arrival))
        .expect("grid");

    for path in PathType::ALL {
        let grids = grid.path(path);
        let c3 = grids.c3.get(0, 0).and_then(Cell::value).unwrap();
        let v_infinity = grids.v_infinity.get(0, 0).and_then(Cell::value).unwrap();
        let delta_v = grids.delta_v.get(0, 0).and_then(Cell::value).unwrap();
        assert!(approx(c3, hohmann.c3_km2_s2(), 1e-6), "c3 {c3}");
        assert!(approx(v_infinity, hohmann.arrival_excess_km_s(), 1e-6), "vinf {v_infinity}");
        assert!(approx(delta_v, hohmann.delta_v_km_s(), 1e-6), "dv {delta_v}");
    }
}

#[test]
fn one_failed_path_leaves_the_other_solved() {
    let departure = get_range("2022-07-01", "2022-07-03", 1).unwrap();
    let arrival = get_range("2023-01-01", "2023-01-02", 1).unwrap();
    let ephemeris = FixedStates::earth_and_mars();
    let lambert = CountingLambert::new(Some(pair([0.0, 30.0, 0.0], [24.0, 0.0, 0.0])), None);

    let grid = GridSolver::new(&ephemeris, &lambert)
        .solve(&request(&departure, &arrival))
        .expect("grid");

    assert_eq!(grid.short.delta_v.solved_count(), 6);
    assert_eq!(grid.long.delta_v.solved_count(), 0);
    assert_eq!(grid.long.c3.min(), None);
    assert_eq!(grid.tof_days.solved_count(), 6);
}

#[test]
fn metrics_follow_excess_velocity_convention() {
    let ephemeris = FixedStates::new()
        .with(Body::Earth, [AU_KM, 0.0, 0.0], [0.0, 0.0, 0.0])
        .with(Body::Mars, [0.0, AU_KM, 0.0], [0.0, 0.0, 0.0]);
    let lambert = CountingLambert::always(pair([3.0, 0.0, 0.0], [0.0, 4.0, 0.0]));
    let departure = get_range("2022-07-01", "2022-07-01", 1).unwrap();
    let arrival = get_range("2022-12-01", "2022-12-01", 1).unwrap();

    let grid = GridSolver::new(&ephemeris, &lambert)
        .solve(&request(&departure, &arrival))
        .expect("grid");

    assert_eq!(grid.short.c3.get(0, 0), Some(Cell::Solved(9.0)));
    assert_eq!(grid.short.v_infinity.get(0, 0), Some(Cell::Solved(4.0)));
    assert_eq!(grid.short.delta_v.get(0, 0), Some(Cell::Solved(7.0)));
}

#[test]
fn ephemeris_failures_abort_the_grid() {
    let departure = get_range("1799-12-01", "1799-12-05", 2).unwrap();
    let arrival = get_range("2000-01-01", "2000-01-01", 1).unwrap();
    let lambert = CountingLambert::never();

    let err = GridSolver::new(KeplerianEphemeris::new(), &lambert)
        .solve(&request(&departure, &arrival))
        .expect_err("outside coverage");

    match err {
        GridError::Ephemeris {
            body,
            source: EphemerisError::OutOfRange { date, .. },
        } => {
            assert_eq!(body, Body::Earth);
            assert_eq!(date, "1799-12-01");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(lambert.calls(), 0);
}

#[test]
fn missing_body_is_an_ephemeris_error() {
    let departure = get_range("2022-07-01", "2022-07-01", 1).unwrap();
    let arrival = get_range("2023-01-01", "2023-01-01", 1).unwrap();
    let ephemeris = FixedStates::new().with(Body::Earth, [AU_KM, 0.0, 0.0], [0.0, 29.8, 0.0]);
    let lambert = CountingLambert::never();

    let err = GridSolver::new(&ephemeris, &lambert)
        .solve(&request(&departure, &arrival))
        .expect_err("no Mars states");
    assert!(matches!(
        err,
        GridError::Ephemeris {
            body: Body::Mars,
            source: EphemerisError::MissingSegment { .. }
        }
    ));
}

#[test]
fn invalid_gravitational_parameter_is_rejected() {
    let departure = get_range("2022-07-01", "2022-07-01", 1).unwrap();
    let arrival = get_range("2023-01-01", "2023-01-01", 1).unwrap();
    let ephemeris = FixedStates::earth_and_mars();
    let lambert = CountingLambert::never();
    let mut req = request(&departure, &arrival);
    req.mu_km3_s2 = 0.0;

    let err = GridSolver::new(&ephemeris, &lambert).solve(&req).expect_err("k = 0");
    assert!(matches!(err, GridError::InvalidGravitationalParameter(_)));
    assert_eq!(ephemeris.calls(), 0);
}

#[test]
fn keplerian_grid_has_a_plausible_mars_minimum() {
    let departure = get_range("2022-08-01", "2022-11-01", 10).unwrap();
    let arrival = get_range("2023-05-01", "2023-10-01", 10).unwrap();

    let grid = GridSolver::new(KeplerianEphemeris::new(), mission_planner::impulsive::BateLambert::default())
        .solve(&request(&departure, &arrival))
        .expect("grid");

    let (_, _, best) = grid.short.delta_v.min().expect("some short solutions");
    assert!((4.0..10.0).contains(&best), "best dv {best}");
    let (_, _, best_c3) = grid.short.c3.min().expect("some c3");
    assert!(best_c3 > 5.0 && best_c3 < 40.0, "best c3 {best_c3}");
}
