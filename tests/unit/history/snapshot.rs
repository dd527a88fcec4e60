use super::*;

fn solid(width: u32, height: u32) -> FrameRGBA {
    FrameRGBA::from_premul(width, height, vec![200; width as usize * height as usize * 4]).unwrap()
}

#[test]
fn capture_reports_a_scaled_thumbnail_for_its_entry() {
    let mut worker = SnapshotWorker::new(SNAPSHOT_SCALE).unwrap();
    worker.capture(EntryId(7), solid(100, 50));
    assert_eq!(worker.pending(), 1);

    let done = worker.wait(Duration::from_secs(10));
    assert_eq!(done.len(), 1);
    let (id, result) = &done[0];
    assert_eq!(*id, EntryId(7));
    let thumb = result.as_ref().unwrap();
    assert_eq!((thumb.width, thumb.height), (20, 10));
    assert_eq!(thumb.pixel(5, 5), Some([200, 200, 200, 200]));
    assert_eq!(worker.pending(), 0);
}

#[test]
fn every_capture_comes_back_once() {
    let mut worker = SnapshotWorker::new(0.5).unwrap();
    for i in 0..5 {
        worker.capture(EntryId(i), solid(8, 8));
    }
    let mut ids: Vec<u64> = worker
        .wait(Duration::from_secs(10))
        .into_iter()
        .map(|(id, r)| {
            assert!(r.is_ok());
            id.0
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert!(worker.drain().is_empty());
}

#[test]
fn drain_on_an_idle_worker_is_empty() {
    let mut worker = SnapshotWorker::new(SNAPSHOT_SCALE).unwrap();
    assert!(worker.drain().is_empty());
    assert!(worker.wait(Duration::from_millis(1)).is_empty());
}

#[test]
fn non_positive_scale_is_rejected() {
    for bad in [0.0, -1.0, f64::NAN] {
        assert!(matches!(
            SnapshotWorker::new(bad),
            Err(AbstraktError::Snapshot(_))
        ));
    }
}
