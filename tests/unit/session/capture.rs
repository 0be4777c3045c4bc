use super::*;

fn shot(v: u8) -> Bitmap {
    Bitmap::solid(4, 3, [v, v, v, 255])
}

#[test]
fn sequence_requires_exact_count() {
    assert!(FrameSequence::new(vec![shot(1), shot(2)], 3).is_err());
    assert!(FrameSequence::new(vec![shot(1), shot(2), shot(3), shot(4)], 3).is_err());
    let seq = FrameSequence::new(vec![shot(1), shot(2), shot(3)], 3).unwrap();
    assert_eq!(seq.len(), 3);
    assert_eq!(seq.dimensions(), Some((4, 3)));
}

#[test]
fn sequence_requires_matching_dimensions() {
    let odd = Bitmap::solid(3, 4, [0, 0, 0, 255]);
    let err = FrameSequence::new(vec![shot(1), odd, shot(3)], 3).unwrap_err();
    assert!(err.to_string().contains("frame 1"));
}

#[test]
fn sequence_keeps_capture_order() {
    let seq = FrameSequence::new(vec![shot(10), shot(20), shot(30)], 3).unwrap();
    let firsts: Vec<u8> = seq.iter().map(|b| b.data()[0]).collect();
    assert_eq!(firsts, vec![10, 20, 30]);
}

#[test]
fn session_counts_shots_and_completes() {
    let mut s = CaptureSession::new(3).unwrap();
    assert_eq!(s.current_shot(), 1);
    s.push(shot(1)).unwrap();
    s.push(shot(2)).unwrap();
    assert_eq!(s.current_shot(), 3);
    assert!(!s.is_complete());
    s.push(shot(3)).unwrap();
    assert!(s.is_complete());
    assert_eq!(s.current_shot(), 3);
    assert!(s.push(shot(4)).is_err());

    let seq = s.finish().unwrap();
    assert_eq!(seq.frames()[2].data()[0], 3);
}

#[test]
fn session_rejects_mismatched_shot() {
    let mut s = CaptureSession::new(2).unwrap();
    s.push(shot(1)).unwrap();
    assert!(s.push(Bitmap::solid(8, 8, [0, 0, 0, 255])).is_err());
    assert_eq!(s.captured(), 1);
}

#[test]
fn unfinished_session_cannot_finish() {
    let mut s = CaptureSession::new(3).unwrap();
    s.push(shot(1)).unwrap();
    assert!(s.clone().finish().is_err());
    s.reset();
    assert_eq!(s.captured(), 0);
    assert!(CaptureSession::new(0).is_err());
}
