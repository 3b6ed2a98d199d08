//! End-to-end planning scenarios.

use aqmaps_core::{
    AStarPather, AcoConfig, AntColonySolver, DistanceMatrix, FlightArea, FlightSimulator,
    Heading, Location, Mission, Pathfinder, PlannerConfig, Reading, Tour, TourSolver, Waypoint,
    ZoneIndex,
};

fn area(west: f64, south: f64, size: f64) -> PlannerConfig {
    PlannerConfig::with_area(FlightArea {
        north: south + size,
        south,
        west,
        east: west + size,
    })
}

fn rectangle(west: f64, south: f64, east: f64, north: f64) -> Vec<Location> {
    vec![
        Location::new(west, south),
        Location::new(east, south),
        Location::new(east, north),
        Location::new(west, north),
        Location::new(west, south),
    ]
}

#[test]
fn cardinal_leg_is_four_locations_on_one_heading() {
    let config = area(0.0, 0.0, 0.01);
    let pather = AStarPather::new(&config, ZoneIndex::default());
    let start = Location::new(0.002, 0.005);
    let end = Location::new(0.0029, 0.005);

    let path = pather.find_path(start, end, 0.0002).unwrap();

    assert_eq!(path.len(), 4);
    assert!(path
        .moves()
        .iter()
        .all(|step| step.heading == Heading::new(0)));
    assert!(path.end().distance_to(end) < 0.0002);
}

#[test]
fn colony_finds_optimum_on_five_points() {
    let points = [(0i64, 0i64), (4, 0), (4, 3), (1, 5), (-2, 2)];
    let rows: Vec<Vec<u32>> = points
        .iter()
        .map(|&(ax, ay)| {
            points
                .iter()
                .map(|&(bx, by)| {
                    let d = (((ax - bx).pow(2) + (ay - by).pow(2)) as f64).sqrt();
                    if d == 0.0 {
                        0
                    } else {
                        d.ceil() as u32 + 1
                    }
                })
                .collect()
        })
        .collect();
    let matrix = DistanceMatrix::from_rows(rows).unwrap();

    let mut best = u64::MAX;
    for a in 1..5 {
        for b in 1..5 {
            for c in 1..5 {
                for d in 1..5 {
                    let order = [0, a, b, c, d];
                    let mut seen = order.to_vec();
                    seen.sort_unstable();
                    seen.dedup();
                    if seen.len() == 5 {
                        best = best.min(matrix.cycle_cost(&order));
                    }
                }
            }
        }
    }

    for seed in [1, 2, 3] {
        let solution = AntColonySolver::new(AcoConfig::default(), seed)
            .solve(&matrix, 0)
            .unwrap();
        assert_eq!(solution.refined_cost, best, "seed {seed}");
        assert_eq!(solution.tour.cost(&matrix), best);
    }
}

#[test]
fn tight_budget_truncates_first_leg() {
    let config = PlannerConfig {
        step_budget: 3,
        ..area(-0.005, -0.005, 0.01)
    };
    let pather = AStarPather::new(&config, ZoneIndex::default());
    let waypoints = vec![
        Waypoint::start(Location::new(0.0, 0.0)),
        Waypoint::new("far.away.sensor", Location::new(0.0015, 0.0), 70.0, Reading::Value(55.0)),
    ];

    let report = FlightSimulator::new(&config, &pather)
        .fly(&waypoints, &Tour::new(vec![0, 1]))
        .unwrap();

    assert_eq!(report.steps, 3);
    assert_eq!(report.records.len(), 4);
    assert!(report.budget_exhausted);
    assert_eq!(report.unreached, vec![1]);
    assert!(report.reached.is_empty());
}

#[test]
fn wall_next_to_target_makes_costs_asymmetric() {
    let config = area(-0.003, -0.003, 0.006);
    let zones = ZoneIndex::from_rings(vec![rectangle(0.00085, -0.001, 0.00087, 0.001)]).unwrap();
    let pather = AStarPather::new(&config, zones);
    let points = [Location::new(0.0, 0.0), Location::new(0.0009, 0.0)];

    let matrix = DistanceMatrix::build(&pather, &points, 0.0002).unwrap();

    assert_eq!(matrix.cost(0, 0), 0);
    assert_eq!(matrix.cost(1, 1), 0);
    assert!(matrix.cost(0, 1) < matrix.cost(1, 0));
    assert_eq!(matrix.asymmetric_pairs(), 1);
}

#[test]
fn mission_never_loses_to_identity_order() {
    let config = area(-0.003, -0.003, 0.006);
    let zones =
        ZoneIndex::from_rings(vec![rectangle(-0.0004, 0.0004, 0.0004, 0.0006)]).unwrap();
    let waypoints = vec![
        Waypoint::start(Location::new(0.0, 0.0)),
        Waypoint::new("north.side.one", Location::new(0.0, 0.0012), 60.0, Reading::Value(120.0)),
        Waypoint::new("east.side.two", Location::new(0.0015, 0.0003), 60.0, Reading::Value(90.0)),
        Waypoint::new("south.side.three", Location::new(0.0003, -0.0012), 5.0, Reading::NotANumber),
        Waypoint::new("west.side.four", Location::new(-0.0012, 0.0), 60.0, Reading::Null),
    ];
    let mission = Mission::new(config, zones, waypoints).unwrap();

    let report = mission.run(99).unwrap();

    let identity = Tour::identity(mission.waypoints().len());
    assert!(report.refined_cost <= identity.cost(&report.matrix));
    assert_eq!(report.tour.first(), Some(mission.start()));
    assert_eq!(report.flight.reached.len(), 4);
    assert!(!report.flight.budget_exhausted);
    for pair in report.flight.records.windows(2) {
        assert!(!mission
            .pather()
            .zones()
            .is_obstructed(pair[0].location, pair[1].location));
    }
}
