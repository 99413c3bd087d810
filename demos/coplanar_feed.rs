//! A grounded coplanar feed line: straight launch, a 90° bend, an open end.
//!
//! Prints the recorded layers and the merged drill list. Run with
//! `RUST_LOG=copperline=debug` and the `tracing` feature to see the kernel's
//! decisions.

use std::f64::consts::FRAC_PI_2;

use copperline::{
    Arrow, Bend, ClosedContour, CoplanarTrace, Curve, Direction, EndCap, EndKind, EuroCircuits,
    HoleLedger, HoleList, LayeredRecorder, Line, Location, Rectangle, Tolerance, TraceEnd,
    ViaSkips, defaults, mil,
};

fn main() -> miette::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let tolerance = Tolerance::DEFAULT;
    let class = EuroCircuits::class_6c();
    let launch = Arrow::new(Location::new(0.0, 5.0), Direction::E);

    let mut feed =
        CoplanarTrace::for_classification(launch, mil(40.0), mil(8.0), 0.25, false, &class);
    feed.append(Line::new(8.0))
        .append(Bend::new(3.0 * FRAC_PI_2, 3.0)?)
        .append(Line::new(6.0));
    // Leave the connector pads at the launch free of vias
    feed.set_via_start_offset(1.5);
    let open = EndCap::attach(EndKind::Open { gap: 0.5 }, TraceEnd::End, &mut feed);
    tracing::info!(length = feed.length(), stations = feed.via_stations().len(), "routed feed");

    let mut conductor = LayeredRecorder::new();
    let mut mask = LayeredRecorder::new();
    let mut ledger = HoleLedger::new();
    feed.draw(&mut conductor, Some(&mut mask), Some(&mut ledger), &ViaSkips::new([0], []));
    open.draw(&feed, &mut conductor, Some(&mut mask), &mut ledger);

    // Board outline: a body with a tab under the launch connector
    let body = Rectangle::from_corners(Location::ORIGIN, Location::new(20.0, 20.0)).outline();
    let tab = Rectangle::centered(launch, 4.0, 6.0).outline();
    let outline: ClosedContour = body.union(&tab, tolerance)?.outset(0.2, tolerance)?;

    for (name, layers) in [("conductor", &conductor), ("solder mask", &mask)] {
        for index in 0..layers.layer_count() {
            if let Some(layer) = layers.recorded(index) {
                println!("# {name} layer {index}");
                print!("{layer}");
            }
        }
    }
    println!("# outline\n{outline}");

    let mut drill = HoleList::new();
    let count = ledger.flush(&mut drill);
    println!("# drill ({count} holes, copper on layer {})", defaults::COPPER_LAYER);
    print!("{drill}");
    Ok(())
}
