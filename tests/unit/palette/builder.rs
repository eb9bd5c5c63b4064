use super::*;

fn full_builder() -> PaletteBuilder {
    // 256 distinct entries: red ramp in the first 128, blue ramp in the rest.
    let colors: Vec<Color> = (0..256u16)
        .map(|i| {
            if i < 128 {
                Color::opaque((i * 2) as u8, 0, 0)
            } else {
                Color::opaque(0, 0, ((i - 128) * 2) as u8)
            }
        })
        .collect();
    PaletteBuilder::seeded(&Palette::new(colors).unwrap())
}

#[test]
fn distance_is_sum_of_squared_channel_differences() {
    let a = Color::rgba(10, 20, 30, 40);
    let b = Color::rgba(13, 16, 30, 41);
    assert_eq!(color_distance(a, b), 9 + 16 + 0 + 1);
    assert_eq!(color_distance(a, a), 0);
    assert_eq!(
        color_distance(Color::rgba(0, 0, 0, 0), Color::rgba(255, 255, 255, 255)),
        4 * 255 * 255
    );
}

#[test]
fn insert_reuses_existing_then_appends() {
    let mut b = PaletteBuilder::seeded(
        &Palette::new(vec![Color::transparent(), Color::opaque(255, 0, 0)]).unwrap(),
    );
    assert_eq!(b.insert(Color::opaque(255, 0, 0)), Slot::Existing(1));
    assert_eq!(b.insert(Color::opaque(0, 0, 255)), Slot::Appended(2));
    assert_eq!(b.insert(Color::opaque(0, 0, 255)), Slot::Existing(2));
    assert_eq!(b.len(), 3);
}

#[test]
fn full_builder_falls_back_to_nearest_entry() {
    let mut b = full_builder();
    assert!(b.is_full());

    let missing = Color::opaque(101, 0, 0);
    let slot = b.insert(missing);
    assert!(matches!(slot, Slot::Approximated(_)));
    assert_eq!(b.len(), 256);

    let chosen = slot.index();
    let palette = b.clone().finish();
    let best = palette
        .colors()
        .iter()
        .map(|&c| color_distance(c, missing))
        .min()
        .unwrap();
    assert_eq!(
        color_distance(palette.get(chosen).unwrap(), missing),
        best
    );
    // 100 and 102 are equally close; the lower index wins.
    assert_eq!(chosen, 50);
}

#[test]
fn nearest_considers_alpha() {
    let b = PaletteBuilder::seeded(
        &Palette::new(vec![Color::rgba(0, 0, 0, 255), Color::rgba(0, 0, 0, 0)]).unwrap(),
    );
    assert_eq!(b.nearest(Color::rgba(0, 0, 0, 10)), Some(1));
    assert_eq!(PaletteBuilder::default().nearest(Color::transparent()), None);
}

#[test]
fn finish_preserves_insertion_order() {
    let mut b = PaletteBuilder::default();
    b.insert(Color::opaque(3, 3, 3));
    b.insert(Color::opaque(1, 1, 1));
    let p = b.finish();
    assert_eq!(
        p.colors(),
        &[Color::opaque(3, 3, 3), Color::opaque(1, 1, 1)]
    );
}
