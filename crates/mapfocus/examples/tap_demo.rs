//! Tap a seeded block of buildings and print what gets focused.
//!
//! cargo run -p mapfocus --example tap_demo

use mapfocus::api::{
    draw_block, BuildingClassifier, BuildingFocus, Coord, FocusCfg, FocusOutcome, FootprintCfg,
    LocalFrame, MemorySource, PressEvent, ReplayToken, SpatialQuery, Viewport,
};

fn main() {
    let origin = Coord::new(34.4949, 49.5440);
    let frame = LocalFrame::new(origin);
    let block = draw_block(
        &FootprintCfg::default(),
        &frame,
        3,
        3,
        40.0,
        ReplayToken::new(1, 0),
    );
    let source = MemorySource::new(block, Viewport::new(origin, 18.0, 800.0, 800.0));
    let mut focus = BuildingFocus::new(
        BuildingClassifier::default(),
        FocusCfg::default(),
        vec!["building".into()],
    );

    // one tap on a footprint, one between two of them
    for (x, y) in [(0.0, 0.0), (20.0, 3.0)] {
        let at = frame.unproject([x, y].into());
        let Ok(point) = source.to_screen(at) else {
            continue;
        };
        let ticket = focus.begin_press();
        let event = PressEvent {
            screen_point: Some(point),
            coordinate: Some(at),
            ..Default::default()
        };
        match focus.handle_press(ticket, &event, &source) {
            FocusOutcome::Selected(f) => println!(
                "tap ({x}, {y}) m -> building {:?}, {:.1} m away, center {:?}",
                f.feature.id, f.distance_m.unwrap_or(0.0), f.center
            ),
            other => println!("tap ({x}, {y}) m -> {other:?}"),
        }
    }
}
