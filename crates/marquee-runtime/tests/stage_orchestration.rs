//! End-to-end frame loop scenarios driven through the simulator.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use marquee_core::animation::Keyframes;
use marquee_core::event::InputEvent;
use marquee_core::geometry::SectionBounds;
use marquee_runtime::{
    BootEvent, BootPhase, DampingProfile, ManualIntro, ProgressSource, SceneRenderer, Stage,
    StageConfig, StageSimulator, StoreAction, TimedIntro, ViewOutput, VisualValue,
};
use pretty_assertions::assert_eq;

const FRAME: Duration = Duration::from_millis(10);

#[derive(Clone, Default)]
struct SharedRenderer(Rc<RefCell<Vec<Vec<f32>>>>);

impl SceneRenderer for SharedRenderer {
    fn present(&mut self, angles: &[f32]) {
        self.0.borrow_mut().push(angles.to_vec());
    }
}

fn simulator(intro_ms: u64) -> StageSimulator {
    let stage = Stage::new(&StageConfig::default())
        .unwrap()
        .with_boot_visual(TimedIntro::new(Duration::from_millis(intro_ms)), None);
    let mut sim = StageSimulator::with_interval(stage, FRAME);
    sim.send(InputEvent::Resize {
        viewport_height: 800.0,
        document_height: 4800.0,
    });
    sim
}

#[test]
fn nothing_is_visible_or_scrollable_until_boot_completes() {
    let mut sim = simulator(200);
    sim.send(InputEvent::wheel(1000.0));
    sim.run_frames(19);
    for snap in sim.snapshots() {
        assert_eq!(snap.boot_phase, BootPhase::Running);
        assert_eq!(snap.view, ViewOutput::Withheld);
        assert_eq!(snap.content.opacity, 0.0);
        assert!(snap.content.exposure.is_inert());
        assert_eq!(snap.boot_visual_opacity, 1.0);
    }
    let snap = sim.step().clone();
    assert_eq!(snap.boot_phase, BootPhase::Completed);
    assert_eq!(snap.events, vec![BootEvent::Completed]);
    assert_eq!(snap.scroll.unwrap().raw_offset, 0.0);
}

#[test]
fn crossfade_is_monotonic_in_both_directions() {
    let mut sim = simulator(50);
    sim.run_until_revealed(500).unwrap();
    let completed_at = sim
        .snapshots()
        .iter()
        .position(|s| s.boot_phase == BootPhase::Completed)
        .unwrap();
    let after = &sim.snapshots()[completed_at..];
    for pair in after.windows(2) {
        assert!(pair[1].content.opacity >= pair[0].content.opacity);
        assert!(pair[1].boot_visual_opacity <= pair[0].boot_visual_opacity);
    }
    let last = sim.last_snapshot().unwrap();
    assert_eq!(last.content.opacity, 1.0);
    assert_eq!(last.boot_visual_opacity, 0.0);
    assert!(!last.boot_visual_mounted);
}

#[test]
fn repeated_completion_signals_reveal_once() {
    let stage = Stage::new(&StageConfig::default())
        .unwrap()
        .with_boot_visual(ManualIntro, None);
    let mut sim = StageSimulator::with_interval(stage, FRAME);
    assert!(sim.stage_mut().complete_boot());
    sim.run_frames(10);
    assert!(!sim.stage_mut().complete_boot());
    sim.run_frames(100);
    assert_eq!(sim.event_count(BootEvent::Completed), 1);
    assert_eq!(sim.event_count(BootEvent::Revealed), 1);
    let full = sim
        .snapshots()
        .windows(2)
        .filter(|w| w[0].content.opacity < 1.0 && w[1].content.opacity == 1.0)
        .count();
    assert_eq!(full, 1);
}

#[test]
fn bindings_read_the_offset_of_the_same_frame() {
    let mut sim = simulator(10);
    let stage = sim.stage_mut();
    stage.binder_mut().bind_fill_reveal(
        "headline.fill",
        ProgressSource::Global,
        Keyframes::new([(0.0, 0.0), (1.0, 100.0)]).unwrap(),
    );
    stage.binder_mut().bind_scalar(
        "manifesto.opacity",
        ProgressSource::Section(SectionBounds::new(1600.0, 800.0)),
        Keyframes::new([(0.0, 0.0), (0.5, 1.0)]).unwrap(),
    );
    sim.run_frames(2);
    sim.send(InputEvent::wheel(2500.0));
    sim.run_frames(40);

    for snap in sim.snapshots().iter().filter(|s| s.scroll.is_some()) {
        let scroll = snap.scroll.unwrap();
        let fill = &snap.bindings[0];
        assert_eq!(fill.label, "headline.fill");
        match fill.value {
            VisualValue::Reveal { percent, clip } => {
                assert!((percent - scroll.smoothed_fraction * 100.0).abs() < 1e-3);
                assert!((clip.bottom - (100.0 - percent)).abs() < 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }
        let section = SectionBounds::new(1600.0, 800.0)
            .progress(scroll.smoothed_offset, scroll.viewport_height);
        let expected = (section * 2.0).clamp(0.0, 1.0);
        assert!((snap.bindings[1].value.scalar() - expected).abs() < 1e-3);
    }
}

#[test]
fn scrolling_back_reverses_reveal() {
    let mut sim = simulator(10);
    sim.stage_mut().binder_mut().bind_fill_reveal(
        "fill",
        ProgressSource::Global,
        Keyframes::new([(0.0, 0.0), (1.0, 100.0)]).unwrap(),
    );
    sim.run_frames(2);
    sim.send(InputEvent::wheel(4000.0));
    sim.run_frames(300);
    let forward = sim.last_snapshot().unwrap().bindings[0].value.scalar();
    sim.send(InputEvent::wheel(-4000.0));
    sim.run_frames(300);
    let back = sim.last_snapshot().unwrap().bindings[0].value.scalar();
    assert!(forward > 50.0);
    assert!(back < 1.0);
}

#[test]
fn archive_route_switches_to_ultra_friction_continuously() {
    let mut sim = simulator(10);
    sim.run_frames(2);
    sim.send(InputEvent::wheel(2000.0));
    sim.run_frames(10);
    let before = sim.last_snapshot().unwrap().scroll.unwrap();
    sim.send(InputEvent::navigate("/archive/1998"));
    let engine = sim.stage().scroll_engine().unwrap();
    assert_eq!(engine.profile(), DampingProfile::ULTRA_FRICTION);
    let next = sim.step().scroll.unwrap();
    let expected =
        before.smoothed_offset + (before.raw_offset - before.smoothed_offset) * 0.02;
    assert!((next.smoothed_offset - expected).abs() < 1e-2);
}

#[test]
fn signed_out_viewer_never_sees_protected_route() {
    let mut sim = simulator(10);
    sim.run_frames(2);
    sim.send(InputEvent::navigate("/nexus"));
    sim.run_frames(20);
    for snap in sim.snapshots() {
        if snap.route.starts_with("/nexus") {
            assert_ne!(snap.view, ViewOutput::Route { path: snap.route.clone() });
        }
    }
    assert_eq!(sim.stage().route(), "/login");
    assert_eq!(
        sim.navigation_log().requests(),
        ["/nexus".to_string(), "/login".to_string()]
    );
}

#[test]
fn external_logout_on_protected_route_redirects_once() {
    let mut sim = simulator(10);
    sim.run_frames(2);
    sim.dispatch(StoreAction::Login { name: "ada".into() });
    sim.send(InputEvent::navigate("/nexus/graph"));
    let snap = sim.step().clone();
    assert_eq!(snap.view, ViewOutput::Route { path: "/nexus/graph".into() });

    sim.dispatch(StoreAction::Logout);
    assert_eq!(sim.stage().view(), ViewOutput::Empty);
    let snap = sim.step().clone();
    assert!(!snap.authenticated);
    assert_eq!(snap.route, "/login");
    sim.run_frames(10);
    let landings = sim
        .navigation_log()
        .requests()
        .iter()
        .filter(|p| *p == "/login")
        .count();
    assert_eq!(landings, 1);
    assert_eq!(sim.stage().guard().redirect_count(), 1);
}

#[test]
fn renderer_sees_rotation_every_frame() {
    let renderer = SharedRenderer::default();
    let frames = Rc::clone(&renderer.0);
    let stage = Stage::new(&StageConfig::default())
        .unwrap()
        .with_boot_visual(ManualIntro, None)
        .with_renderer(renderer);
    let mut sim = StageSimulator::with_interval(stage, FRAME);
    sim.run_frames(3);
    sim.send(InputEvent::PointerMove { x: 0.0, y: 0.0 });
    sim.send(InputEvent::PointerMove { x: 300.0, y: 400.0 });
    sim.run_frames(1);

    let frames = frames.borrow();
    assert_eq!(frames.len(), 4);
    assert!(frames[1][0] > frames[0][0]);
    let idle_step = frames[2][0] - frames[1][0];
    let driven_step = frames[3][0] - frames[2][0];
    assert!(driven_step > idle_step);
}

#[test]
fn snapshots_serialize_as_json_lines() {
    let mut sim = simulator(10);
    sim.run_frames(3);
    for snap in sim.snapshots() {
        let line = serde_json::to_string(snap).unwrap();
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value["angles"].is_array());
    }
}
