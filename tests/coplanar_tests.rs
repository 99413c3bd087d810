//! Coplanar routing end to end: route, cap, draw, merge and flush holes

use std::f64::consts::PI;

use copperline::{
    Arrow, Bend, CoplanarTrace, Curve, Direction, EndCap, EndKind, EuroCircuits, HoleLedger,
    HoleList, LayeredRecorder, Line, Location, Side, Tolerance, TraceEnd, ViaSkips,
    assert_almost_eq, defaults,
};

const TOL: Tolerance = Tolerance::DEFAULT;

fn east() -> Arrow {
    Arrow::new(Location::ORIGIN, Direction::E)
}

#[test]
fn straight_run_snapshot() {
    let mut trace = CoplanarTrace::new(east(), 1.0, 0.2);
    trace.append(Line::new(4.0));
    // Vias over the whole length
    trace.set_via_end_offset(0.0);

    let mut conductor = LayeredRecorder::new();
    let mut mask = LayeredRecorder::new();
    let mut ledger = HoleLedger::new();
    trace.draw(&mut conductor, Some(&mut mask), Some(&mut ledger), &ViaSkips::none());

    let copper = conductor.recorded(defaults::COPPER_LAYER).unwrap();
    insta::assert_snapshot!(
        copper.to_string(),
        @"outline L(0.000, -0.500) L(4.000, -0.500) L(4.000, 0.500) L(0.000, 0.500)"
    );
    let clearance = conductor.recorded(defaults::CLEARANCE_LAYER).unwrap();
    insta::assert_snapshot!(
        clearance.to_string(),
        @"outline L(0.000, -0.700) L(4.000, -0.700) L(4.000, 0.700) L(0.000, 0.700)"
    );
    let opening = mask.recorded(defaults::MASK_LAYER).unwrap();
    insta::assert_snapshot!(
        opening.to_string(),
        @"outline L(0.000, -1.300) L(4.000, -1.300) L(4.000, 1.300) L(0.000, 1.300)"
    );

    let mut drill = HoleList::new();
    assert_eq!(ledger.flush(&mut drill), 6);
    insta::assert_snapshot!(drill.to_string(), @r"
    (0.000, 1.000) ⌀0.150
    (0.000, -1.000) ⌀0.150
    (2.000, 1.000) ⌀0.150
    (2.000, -1.000) ⌀0.150
    (4.000, 1.000) ⌀0.150
    (4.000, -1.000) ⌀0.150
    ");
}

#[test]
fn appended_paths_stay_clear_of_vias() {
    let mut trace = CoplanarTrace::new(east(), 1.0, 0.2);
    trace.append(Line::new(10.0));
    trace.set_via_end_offset(0.0);
    // A stub added later keeps its vias off
    trace.append(Line::new(3.0));
    assert_almost_eq!(trace.via_end_offset(), 3.0, TOL);
    assert_almost_eq!(*trace.via_stations().last().unwrap(), 10.0, TOL);
}

#[test]
fn neighbouring_traces_share_vias() {
    // Two parallel runs whose facing rails coincide
    let lower = {
        let mut t = CoplanarTrace::new(east(), 1.0, 0.2).with_via_end_offset(-10.0);
        t.append(Line::new(10.0));
        t
    };
    let upper = {
        let start = Arrow::new(Location::new(0.0, lower.via_span()), Direction::E);
        let mut t = CoplanarTrace::new(start, 1.0, 0.2).with_via_end_offset(-10.0);
        t.append(Line::new(10.0));
        t
    };

    let mut conductor = LayeredRecorder::new();
    let mut ledger = HoleLedger::new();
    lower.draw(&mut conductor, None, Some(&mut ledger), &ViaSkips::none());
    upper.draw(&mut conductor, None, Some(&mut ledger), &ViaSkips::none());

    // 6 stations per rail, 4 rails, the shared rail merged
    assert_eq!(ledger.fixed().len(), 6);
    assert_eq!(ledger.loose().len(), 12);
}

#[test]
fn bend_keeps_vias_on_the_rails() {
    let mut trace = CoplanarTrace::new(east(), 1.0, 0.2).with_via_pitch(1.0);
    trace.append(Bend::new(5.0 * PI, 5.0).unwrap());
    trace.set_via_end_offset(0.0);
    let center = Location::new(0.0, 5.0);
    for site in trace.via_sites(&ViaSkips::none()) {
        let radius = match site.side {
            Side::Left => 4.0,
            Side::Right => 6.0,
        };
        assert_almost_eq!(site.location.distance(center), radius, TOL);
    }
}

#[test]
fn fed_line_with_caps() {
    let class = EuroCircuits::class_6c();
    let mut trace = CoplanarTrace::for_classification(east(), 0.8, 0.25, 0.25, false, &class);
    trace.append(Line::new(6.0));
    let open = EndCap::attach(EndKind::Open { gap: 0.5 }, TraceEnd::End, &mut trace);
    let short = EndCap::attach(EndKind::Short, TraceEnd::Start, &mut trace);

    let stations = trace.via_stations();
    assert_almost_eq!(stations[0], -0.3, TOL);
    assert_almost_eq!(*stations.last().unwrap(), 6.8, TOL);
    // 7.1 mm at a 0.5 mm pitch: 14 intervals
    assert_eq!(stations.len(), 15);

    let mut conductor = LayeredRecorder::new();
    let mut mask = LayeredRecorder::new();
    let mut ledger = HoleLedger::new();
    trace.draw(&mut conductor, Some(&mut mask), Some(&mut ledger), &ViaSkips::none());
    open.draw(&trace, &mut conductor, Some(&mut mask), &mut ledger);
    short.draw(&trace, &mut conductor, Some(&mut mask), &mut ledger);

    let end_vias: Vec<Location> = ledger.fixed().iter().map(|h| h.location).collect();
    assert_almost_eq!(end_vias, vec![Location::new(6.8, 0.0), Location::new(-0.3, 0.0)], TOL);
    assert_eq!(mask.recorded(defaults::MASK_LAYER).unwrap().outlines().count(), 3);
    assert_eq!(conductor.recorded(defaults::CLEARANCE_LAYER).unwrap().outlines().count(), 2);
    assert_almost_eq!(trace.length(), 6.0, TOL);
}
