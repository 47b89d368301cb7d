use scrollscene::{NullBackend, Page, RetriggerPolicy, Session, SessionOptions, Viewport};

fn home_page() -> Page {
    serde_json::from_str(include_str!("data/home.json")).unwrap()
}

fn session(policy: RetriggerPolicy) -> Session {
    let mut opts = SessionOptions::new(Viewport::new(800.0, 600.0).unwrap());
    opts.retrigger = policy;
    Session::new(home_page(), opts).unwrap()
}

fn corners(session: &Session, element: &str) -> [f32; 4] {
    let image = session
        .images()
        .iter()
        .find(|i| i.element == element)
        .unwrap();
    session
        .scene()
        .quad(image.quad)
        .unwrap()
        .uniforms
        .corners
        .to_array()
}

#[test]
fn wipe_staggers_and_completes_by_seven_tenths() {
    let mut session = session(RetriggerPolicy::AllowRetrigger);
    let mut backend = NullBackend;
    assert!(session.click("img-1"));

    // 0.2 time-units in: x is moving, w has not started.
    session.tick(0.1, &mut backend).unwrap();
    session.tick(0.1, &mut backend).unwrap();
    let c = corners(&session, "img-1");
    assert!(c[0] > 0.0);
    assert_eq!(c[3], 0.0);

    // 0.7 time-units in: all four components fully revealed.
    for _ in 0..5 {
        session.tick(0.1, &mut backend).unwrap();
    }
    for (i, v) in corners(&session, "img-1").into_iter().enumerate() {
        assert!((v - 1.0).abs() < 1e-6, "component {i} at {v}");
    }

    // Untouched images stay unrevealed.
    assert_eq!(corners(&session, "img-2"), [0.0; 4]);
}

#[test]
fn components_start_in_declared_order() {
    let mut session = session(RetriggerPolicy::AllowRetrigger);
    let mut backend = NullBackend;
    session.click("img-2");

    let mut first_motion = [f64::INFINITY; 4];
    let mut elapsed = 0.0;
    for _ in 0..20 {
        session.tick(0.05, &mut backend).unwrap();
        elapsed += 0.05;
        for (i, v) in corners(&session, "img-2").into_iter().enumerate() {
            if v > 0.0 && first_motion[i].is_infinite() {
                first_motion[i] = elapsed;
            }
        }
    }
    assert!(first_motion[0] < first_motion[1]);
    assert!(first_motion[1] < first_motion[2]);
    assert!(first_motion[2] < first_motion[3]);
}

#[test]
fn corners_never_decrease_across_re_clicks() {
    let mut session = session(RetriggerPolicy::AllowRetrigger);
    let mut backend = NullBackend;
    session.click("img-1");

    let mut prev = [0.0f32; 4];
    for frame in 0..30 {
        if frame == 5 {
            // Mid-flight re-click enqueues more tweens, no de-duplication.
            assert!(session.click("img-1"));
        }
        session.tick(0.05, &mut backend).unwrap();
        let c = corners(&session, "img-1");
        for i in 0..4 {
            assert!(c[i] >= prev[i] - 1e-6, "component {i} decreased");
        }
        prev = c;
    }
    assert_eq!(prev, [1.0; 4]);
}

#[test]
fn ignore_while_revealed_policy_swallows_re_clicks() {
    let mut session = session(RetriggerPolicy::IgnoreWhileRevealed);
    let mut backend = NullBackend;
    assert!(session.click("img-1"));
    assert!(!session.click("img-1"));

    for _ in 0..20 {
        session.tick(0.05, &mut backend).unwrap();
    }
    assert!(!session.click("img-1"));
    assert_eq!(corners(&session, "img-1"), [1.0; 4]);
}
