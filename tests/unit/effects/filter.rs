use super::*;
use crate::random::sampling::seeded_rng;

#[test]
fn display_uses_css_syntax() {
    assert_eq!(Filter::None.to_string(), "none");
    assert_eq!(Filter::Blur { px: 4.0 }.to_string(), "blur(4px)");
    assert_eq!(Filter::HueRotate { deg: 90.0 }.to_string(), "hue-rotate(90deg)");
    assert_eq!(Filter::Sepia(0.5).to_string(), "sepia(0.5)");
}

#[test]
fn parse_accepts_percentages_and_bare_zero() {
    assert_eq!(parse_filter("sepia(50%)").unwrap(), Filter::Sepia(0.5));
    assert_eq!(parse_filter(" BLUR(0) ").unwrap(), Filter::Blur { px: 0.0 });
    assert_eq!(parse_filter("").unwrap(), Filter::None);
}

#[test]
fn parse_rejects_malformed_input() {
    for bad in [
        "glow(1)",
        "blur(4)",
        "hue-rotate(10px)",
        "sepia(-1)",
        "sepia(abc)",
        "sepia 0.5",
        "sepia(0.5",
        "blur(1000000000px)",
        "blur(100.5px)",
    ] {
        assert!(
            matches!(parse_filter(bad), Err(AbstraktError::Validation(_))),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn random_filters_round_trip_through_text() {
    let mut rng = seeded_rng(31);
    for _ in 0..500 {
        let f = Filter::random(&mut rng);
        assert!(!f.is_none());
        assert_eq!(parse_filter(&f.to_string()).unwrap(), f);
    }
}

#[test]
fn random_magnitudes_stay_in_their_ranges() {
    let mut rng = seeded_rng(8);
    for _ in 0..2_000 {
        match Filter::random(&mut rng) {
            Filter::Blur { px } => assert!((0.0..=10.0).contains(&px) && px.fract() == 0.0),
            Filter::HueRotate { deg } => assert!((0.0..=360.0).contains(&deg)),
            Filter::None => panic!("random never picks none"),
            Filter::Brightness(v)
            | Filter::Contrast(v)
            | Filter::Grayscale(v)
            | Filter::Invert(v)
            | Filter::Opacity(v)
            | Filter::Saturate(v)
            | Filter::Sepia(v) => assert!((0.0..1.0).contains(&v)),
        }
    }
}

#[test]
fn serde_uses_css_text() {
    let json = serde_json::to_string(&Filter::Blur { px: 3.0 }).unwrap();
    assert_eq!(json, "\"blur(3px)\"");
    let back: Filter = serde_json::from_str("\"invert(0.25)\"").unwrap();
    assert_eq!(back, Filter::Invert(0.25));
}

#[test]
fn none_apply_is_a_copy() {
    let frame = FrameRGBA::from_premul(1, 1, vec![1, 2, 3, 4]).unwrap();
    assert_eq!(Filter::None.apply(&frame).unwrap(), frame);
    let inverted = Filter::Invert(1.0).apply(&frame).unwrap();
    assert_ne!(inverted, frame);
}

#[test]
fn blur_radius_is_bounded() {
    assert_eq!(
        parse_filter("blur(100px)").unwrap(),
        Filter::Blur { px: MAX_BLUR_PX }
    );
    let err = serde_json::from_str::<Filter>("\"blur(1e9px)\"").unwrap_err();
    assert!(err.to_string().contains("exceeds"), "{err}");

    // Constructed directly, an oversized blur is clamped rather than sizing a huge kernel.
    let frame = FrameRGBA::from_premul(4, 4, vec![255; 64]).unwrap();
    let out = Filter::Blur { px: 1.0e9 }.apply(&frame).unwrap();
    assert_eq!((out.width, out.height), (4, 4));
}
