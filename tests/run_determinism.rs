use scrollscene::{
    FixedClock, FramePump, Page, RecordingBackend, Session, SessionOptions, Viewport,
};

fn home_page() -> Page {
    serde_json::from_str(include_str!("data/home.json")).unwrap()
}

fn inside_page() -> Page {
    serde_json::from_str(include_str!("data/inside.json")).unwrap()
}

fn scripted_run() -> String {
    let mut session = Session::new(
        home_page(),
        SessionOptions::new(Viewport::new(800.0, 600.0).unwrap()),
    )
    .unwrap();
    let mut backend = RecordingBackend::new();
    let mut clock = FixedClock::new(0.05);
    let mut pump = FramePump::new();

    session.scroll_by(300.0);
    session.click("img-2");
    pump.run_frames(&mut session, &mut backend, &mut clock, 30)
        .unwrap();

    session.navigate(inside_page()).unwrap();
    pump.run_until(&mut session, &mut backend, &mut clock, &mut |s: &Session| {
        s.is_settled()
    })
    .unwrap();
    pump.run_frames(&mut session, &mut backend, &mut clock, 10)
        .unwrap();

    serde_json::to_string(backend.frames()).unwrap()
}

#[test]
fn scripted_runs_are_bit_identical() {
    assert_eq!(scripted_run(), scripted_run());
}
