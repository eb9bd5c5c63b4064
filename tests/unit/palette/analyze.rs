use std::collections::HashSet;

use image::RgbaImage;

use super::*;
use crate::foundation::core::Palette;

fn frame_with(colors: Vec<Color>) -> Frame {
    let palette = Arc::new(Palette::new(colors).unwrap());
    Frame::indexed(1, 1, vec![0], palette).unwrap()
}

fn gray_ramp(start: u16, count: u16) -> Vec<Color> {
    (start..start + count)
        .map(|i| Color::opaque((i % 256) as u8, (i / 256) as u8, 7))
        .collect()
}

#[test]
fn bounded_set_reports_exceeded_past_cap() {
    let mut set = BoundedColorSet::new(2);
    assert!(!set.insert(Color::opaque(1, 0, 0)));
    assert!(!set.insert(Color::opaque(1, 0, 0)));
    assert!(!set.insert(Color::opaque(2, 0, 0)));
    assert!(set.insert(Color::opaque(3, 0, 0)));
    assert!(set.insert(Color::opaque(4, 0, 0)));
    assert_eq!(set.len(), 3);
}

#[test]
fn exactly_256_distinct_colors_is_within_budget() {
    let frames = vec![frame_with(gray_ramp(0, 128)), frame_with(gray_ramp(128, 128))];
    assert!(!exceeds_color_budget(&frames));
}

#[test]
fn colors_spread_across_frames_can_exceed_budget() {
    let frames = vec![
        frame_with(gray_ramp(0, 200)),
        frame_with(gray_ramp(100, 100)),
        frame_with(gray_ramp(200, 57)),
    ];
    assert!(exceeds_color_budget(&frames));
}

#[test]
fn duplicate_colors_across_frames_count_once() {
    let frames: Vec<Frame> = (0..10).map(|_| frame_with(gray_ramp(0, 200))).collect();
    assert!(!exceeds_color_budget(&frames));
}

#[test]
fn early_exit_agrees_with_full_count() {
    let cases: Vec<Vec<Frame>> = vec![
        vec![frame_with(gray_ramp(0, 256)), frame_with(gray_ramp(255, 1))],
        vec![frame_with(gray_ramp(0, 256)), frame_with(gray_ramp(256, 1))],
        vec![frame_with(gray_ramp(0, 150)), frame_with(gray_ramp(150, 150))],
        vec![frame_with(gray_ramp(10, 5))],
    ];
    for frames in cases {
        let full: HashSet<Color> = frames
            .iter()
            .flat_map(|f| f.palette().unwrap().colors().to_vec())
            .collect();
        assert_eq!(exceeds_color_budget(&frames), full.len() > 256);
    }
}

#[test]
fn explicit_frames_count_pixel_colors() {
    let mut img = RgbaImage::new(20, 15);
    for (i, px) in img.pixels_mut().enumerate() {
        px.0 = [i as u8, (i / 256) as u8, 0, 255];
    }
    let frames = vec![Frame::explicit(img).unwrap()];
    assert!(exceeds_color_budget(&frames));
}

#[test]
fn identical_palettes_need_no_unification() {
    let colors = vec![Color::transparent(), Color::opaque(9, 9, 9)];
    let frames = vec![frame_with(colors.clone()), frame_with(colors)];
    assert!(!needs_unification(&frames));
}

#[test]
fn length_mismatch_needs_unification() {
    let frames = vec![
        frame_with(vec![Color::transparent(), Color::opaque(9, 9, 9)]),
        frame_with(vec![Color::transparent()]),
    ];
    assert!(needs_unification(&frames));
}

#[test]
fn same_length_different_entry_needs_unification() {
    let frames = vec![
        frame_with(vec![Color::transparent(), Color::opaque(255, 0, 0)]),
        frame_with(vec![Color::transparent(), Color::opaque(255, 0, 0)]),
        frame_with(vec![Color::transparent(), Color::opaque(0, 0, 255)]),
    ];
    assert!(needs_unification(&frames));
}

#[test]
fn alpha_difference_needs_unification() {
    let frames = vec![
        frame_with(vec![Color::rgba(0, 0, 0, 0)]),
        frame_with(vec![Color::rgba(0, 0, 0, 255)]),
    ];
    assert!(needs_unification(&frames));
}

#[test]
fn trivial_inputs_need_no_unification() {
    assert!(!needs_unification(&[]));
    assert!(!needs_unification(&[frame_with(vec![Color::transparent()])]));
}
