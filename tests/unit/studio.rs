use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn studio() -> Studio {
    Studio::seeded(Canvas::new(64, 48).unwrap(), 11).unwrap()
}

fn recorder(studio: &mut Studio) -> Rc<RefCell<Vec<StudioEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    studio.subscribe(move |e| sink.borrow_mut().push(e.clone()));
    events
}

#[test]
fn generate_draws_and_records_an_entry() {
    let mut s = studio();
    let events = recorder(&mut s);
    assert!(s.scene().is_none());

    let items = s.generate().unwrap().items.len();
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.history().active_index(), Some(0));
    assert!(s.history().active().unwrap().snapshot.is_none());

    let id = s.history().active().unwrap().id;
    assert_eq!(events.borrow()[0], StudioEvent::Generated { id, items });
    // The background is opaque, so every pixel is covered.
    assert!(s.raster().data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn snapshots_attach_to_their_entry() {
    let mut s = studio();
    let events = recorder(&mut s);
    s.generate().unwrap();
    s.generate().unwrap();
    s.wait_for_snapshots(Duration::from_secs(10));
    assert_eq!(s.pump_snapshots(), 0);
    for entry in s.history().iter() {
        let thumb = entry.snapshot.as_ref().unwrap();
        assert_eq!((thumb.width, thumb.height), (13, 10));
    }
    let snapshot_events = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, StudioEvent::SnapshotAttached { .. }))
        .count();
    assert_eq!(snapshot_events, 2);
}

#[test]
fn navigation_redraws_the_selected_scene() {
    let mut s = studio();
    s.generate().unwrap();
    let first = s.raster();
    s.generate().unwrap();
    assert!(s.navigate(-1).unwrap().is_none());
    assert!(s.navigate(2).unwrap().is_none());
    assert_eq!(s.history().active_index(), Some(1));

    let events = recorder(&mut s);
    assert!(s.navigate_previous().unwrap().is_some());
    assert_eq!(s.history().active_index(), Some(0));
    assert_eq!(s.raster(), first);
    assert!(matches!(
        events.borrow()[0],
        StudioEvent::Navigated { index: 0, .. }
    ));
}

#[test]
fn keep_current_colors_reuses_the_active_palette() {
    let mut s = studio();
    let base = s.generate().unwrap().base_color;
    s.set_setting("keepCurrentColors", SettingValue::Boolean(true))
        .unwrap();
    let next = s.generate().unwrap();
    assert_eq!(next.base_color, base);
}

#[test]
fn tick_only_draws_while_animating() {
    let mut s = studio();
    assert!(!s.tick(30.0).unwrap());
    s.generate().unwrap();
    assert!(!s.tick(30.0).unwrap());

    assert!(s.toggle_animation());
    assert!(s.tick(30.0).unwrap());
    assert!((s.renderer().wave_offset() - 1.0 / 30.0).abs() < 1e-9);
    assert!(!s.toggle_animation());
}

#[test]
fn setting_changes_are_validated_and_announced() {
    let mut s = studio();
    let events = recorder(&mut s);
    s.set_setting("rectangleCount.max", SettingValue::Number(5.0))
        .unwrap();
    assert!(matches!(
        s.set_setting("rectangleCount.min", SettingValue::Number(9.0)),
        Err(AbstraktError::InvalidRange { .. })
    ));
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(
        s.settings().get("rectangleCount.max"),
        Some(SettingValue::Number(5.0))
    );
}

#[test]
fn unreadable_font_keeps_the_previous_setting() {
    let mut s = studio();
    let err = s
        .set_setting("font", SettingValue::Text("/no/such/font.ttf".into()))
        .unwrap_err();
    assert!(matches!(err, AbstraktError::Render(_)));
    assert_eq!(s.settings().text("font"), Some(""));
    assert!(s.renderer().font().is_none());
}

#[test]
fn json_overrides_emit_one_event_per_changed_path() {
    let mut s = studio();
    let events = recorder(&mut s);
    s.apply_settings_json(&serde_json::json!({
        "circleCount.max": 3,
        "applyRandomFilter": true,
    }))
    .unwrap();
    assert_eq!(events.borrow().len(), 2);
    assert_eq!(s.settings().flag("applyRandomFilter"), Some(true));
}
