use super::*;
use crate::random::sampling::seeded_rng;

fn canvas() -> Canvas {
    Canvas::new(400, 300).unwrap()
}

fn fixed_counts(rects: i64, circles: i64, texts: i64, waves: i64) -> GeneratorSettings {
    GeneratorSettings {
        rectangle_count: IntRange::fixed(rects),
        circle_count: IntRange::fixed(circles),
        text_count: IntRange::fixed(texts),
        wave_count: IntRange::fixed(waves),
        ..GeneratorSettings::empty()
    }
}

#[test]
fn counts_follow_fixed_ranges() {
    let mut rng = seeded_rng(1);
    let scene = Generator::new(canvas()).generate(&fixed_counts(3, 2, 4, 5), None, &mut rng);
    assert_eq!(scene.count_of("rectangle"), 3);
    assert_eq!(scene.count_of("circle"), 2);
    assert_eq!(scene.count_of("text"), 4);
    assert_eq!(scene.count_of("wave"), 5);
    assert_eq!(scene.items.len(), 14);
    assert!(scene.grids.is_empty());
}

#[test]
fn color_counts_match_render_kind() {
    let mut rng = seeded_rng(2);
    let settings = GeneratorSettings {
        blob_count: IntRange::fixed(20),
        ..fixed_counts(40, 40, 40, 10)
    };
    let scene = Generator::new(canvas()).generate(&settings, None, &mut rng);
    for item in &scene.items {
        let n = item.colors().len();
        match (item, item.render_kind()) {
            (ShapeDescriptor::Blob { .. }, RenderKind::Gradient) => assert!((2..=3).contains(&n)),
            (ShapeDescriptor::Blob { .. }, kind) => {
                assert_eq!(kind, RenderKind::Fill);
                assert_eq!(n, 1);
            }
            (_, RenderKind::Gradient) => assert!((2..=5).contains(&n)),
            _ => assert_eq!(n, 1),
        }
    }
}

#[test]
fn waves_are_stroke_only_and_weighted() {
    let mut rng = seeded_rng(3);
    let settings = GeneratorSettings {
        wave_weight: IntRange { min: 2, max: 4 },
        ..fixed_counts(0, 0, 0, 30)
    };
    let scene = Generator::new(canvas()).generate(&settings, None, &mut rng);
    for item in &scene.items {
        match item {
            ShapeDescriptor::Wave {
                render_kind,
                weight,
                ..
            } => {
                assert_eq!(*render_kind, RenderKind::Stroke);
                assert!((2.0..=4.0).contains(weight));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn stroke_weight_only_on_stroke_items() {
    let mut rng = seeded_rng(4);
    let scene = Generator::new(canvas()).generate(&fixed_counts(30, 30, 30, 0), None, &mut rng);
    for item in &scene.items {
        let weight = match item {
            ShapeDescriptor::Rectangle { weight, .. }
            | ShapeDescriptor::Circle { weight, .. }
            | ShapeDescriptor::Text { weight, .. } => *weight,
            _ => continue,
        };
        assert_eq!(weight.is_some(), item.render_kind() == RenderKind::Stroke);
    }
}

#[test]
fn sizes_are_percent_of_shorter_edge() {
    let mut rng = seeded_rng(5);
    let settings = GeneratorSettings {
        rectangle_width: IntRange::fixed(10),
        rectangle_height: IntRange::fixed(20),
        circle_radius: IntRange::fixed(50),
        text_size: IntRange::fixed(5),
        ..fixed_counts(5, 5, 5, 0)
    };
    let scene = Generator::new(canvas()).generate(&settings, None, &mut rng);
    for item in &scene.items {
        match item {
            ShapeDescriptor::Rectangle { width, height, .. } => {
                assert_eq!((*width, *height), (30.0, 60.0));
            }
            ShapeDescriptor::Circle { radius, .. } => assert_eq!(*radius, 75.0),
            ShapeDescriptor::Text { size, text, .. } => {
                assert_eq!(*size, 15.0);
                assert!((1..=10).contains(&text.chars().count()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn grid_population_never_exceeds_capacity() {
    let mut rng = seeded_rng(6);
    let settings = GeneratorSettings {
        grid_count: IntRange::fixed(2),
        grid_size: IntRange::fixed(2),
        ..fixed_counts(50, 50, 0, 0)
    };
    for _ in 0..20 {
        let scene = Generator::new(canvas()).generate(&settings, None, &mut rng);
        assert_eq!(scene.grids.len(), 2);
        let placed: usize = scene.grids.iter().map(|g| g.items.len()).sum();
        for g in &scene.grids {
            assert!(g.items.len() <= g.capacity());
        }
        // 100 items with a 1/2 chance each fill two 2x2 grids almost surely.
        assert_eq!(placed, 8);
        assert_eq!(scene.items.len(), 100);
    }
}

#[test]
fn keep_colors_reuses_palette() {
    let mut rng = seeded_rng(7);
    let generator = Generator::new(canvas());
    let first = generator.generate(&fixed_counts(2, 0, 0, 0), None, &mut rng);
    let settings = GeneratorSettings {
        keep_current_colors: true,
        ..fixed_counts(2, 0, 0, 0)
    };
    let second = generator.generate(&settings, Some(&first), &mut rng);
    assert_eq!(second.base_color, first.base_color);
    assert_eq!(second.variation, first.variation);
}

#[test]
fn keep_items_keeps_geometry_and_recolors() {
    let mut rng = seeded_rng(8);
    let generator = Generator::new(canvas());
    let base = GeneratorSettings {
        hue_variation: IntRange::fixed(360),
        saturation_variation: IntRange::fixed(100),
        lightness_variation: IntRange::fixed(100),
        grid_count: IntRange::fixed(1),
        grid_size: IntRange::fixed(3),
        ..fixed_counts(20, 10, 5, 5)
    };
    let first = generator.generate(&base, None, &mut rng);
    let keep = GeneratorSettings {
        keep_current_items: true,
        ..base
    };
    let second = generator.generate(&keep, Some(&first), &mut rng);

    assert_eq!(second.items.len(), first.items.len());
    let mut any_color_changed = false;
    for (a, b) in first.items.iter().zip(&second.items) {
        assert_eq!(a.shape_name(), b.shape_name());
        assert_eq!(a.render_kind(), b.render_kind());
        assert_eq!(a.colors().len(), b.colors().len());
        any_color_changed |= a.colors() != b.colors();
        let mut a_geom = a.clone();
        *a_geom.colors_mut() = b.colors().to_vec();
        assert_eq!(&a_geom, b);
    }
    assert!(any_color_changed);
    assert_eq!(second.grids.len(), first.grids.len());
    for (ga, gb) in first.grids.iter().zip(&second.grids) {
        assert_eq!((ga.x, ga.y, ga.items.len()), (gb.x, gb.y, gb.items.len()));
    }
}

#[test]
fn keep_modes_without_previous_fall_back_to_sampling() {
    let mut rng = seeded_rng(9);
    let settings = GeneratorSettings {
        keep_current_items: true,
        keep_current_colors: true,
        keep_current_filter: true,
        apply_random_filter: true,
        ..fixed_counts(3, 0, 0, 0)
    };
    let scene = Generator::new(canvas()).generate(&settings, None, &mut rng);
    assert_eq!(scene.count_of("rectangle"), 3);
    assert!(!scene.filter.is_none());
}

#[test]
fn filter_modes() {
    let mut rng = seeded_rng(10);
    let generator = Generator::new(canvas());

    let off = generator.generate(&GeneratorSettings::empty(), None, &mut rng);
    assert_eq!(off.filter, Filter::None);

    let on = GeneratorSettings {
        apply_random_filter: true,
        ..GeneratorSettings::empty()
    };
    let first = generator.generate(&on, None, &mut rng);
    assert!(!first.filter.is_none());

    let keep = GeneratorSettings {
        keep_current_filter: true,
        ..on
    };
    let second = generator.generate(&keep, Some(&first), &mut rng);
    assert_eq!(second.filter, first.filter);
}

#[test]
fn background_is_opaque_with_one_or_two_colors() {
    let mut rng = seeded_rng(11);
    let settings = GeneratorSettings {
        transparency: IntRange::fixed(90),
        ..GeneratorSettings::empty()
    };
    for _ in 0..50 {
        let scene = Generator::new(canvas()).generate(&settings, None, &mut rng);
        let bg = &scene.background;
        let expected = match bg.render_kind {
            RenderKind::Fill => 1,
            RenderKind::Gradient => 2,
            RenderKind::Stroke => panic!("background is never stroked"),
        };
        assert_eq!(bg.colors.len(), expected);
        assert!(bg.colors.iter().all(|c| c.transparency == 0.0));
    }
}

#[test]
fn blobs_cluster_around_a_center() {
    let mut rng = seeded_rng(12);
    let settings = GeneratorSettings {
        blob_count: IntRange::fixed(4),
        blob_nodes: IntRange { min: 3, max: 5 },
        blob_spread: IntRange::fixed(10),
        ..GeneratorSettings::empty()
    };
    let scene = Generator::new(canvas()).generate(&settings, None, &mut rng);
    assert_eq!(scene.count_of("blob"), 4);
    for item in &scene.items {
        let ShapeDescriptor::Blob { nodes, .. } = item else {
            panic!("unexpected {item:?}");
        };
        assert!((3..=5).contains(&nodes.len()));
        // Any two nodes are within twice the spread (30px per axis) of each other.
        for a in nodes {
            for b in nodes {
                assert!((a.x - b.x).abs() <= 60.0 && (a.y - b.y).abs() <= 60.0);
            }
            assert!(a.radius >= 1.0);
        }
    }
}

#[test]
fn seeded_generation_is_reproducible() {
    let settings = GeneratorSettings::default();
    let generator = Generator::new(canvas());
    let a = generator.generate(&settings, None, &mut seeded_rng(99));
    let b = generator.generate(&settings, None, &mut seeded_rng(99));
    assert_eq!(a, b);
}
