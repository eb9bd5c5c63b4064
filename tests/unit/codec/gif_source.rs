use std::borrow::Cow;

use super::*;
use crate::animation::model::Pixels;

fn encode_gif(frames: &[gif::Frame<'_>], repeat: Option<gif::Repeat>) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut bytes, 8, 8, &[]).unwrap();
        if let Some(repeat) = repeat {
            enc.set_repeat(repeat).unwrap();
        }
        for f in frames {
            enc.write_frame(f).unwrap();
        }
    }
    bytes
}

fn block(
    width: u16,
    height: u16,
    indices: &[u8],
    palette: &[u8],
    transparent: Option<u8>,
) -> gif::Frame<'static> {
    gif::Frame {
        width,
        height,
        buffer: Cow::Owned(indices.to_vec()),
        palette: Some(palette.to_vec()),
        transparent,
        ..gif::Frame::default()
    }
}

#[test]
fn decodes_frames_palettes_and_timing() {
    let mut first = block(2, 1, &[1, 0], &[0, 0, 0, 255, 0, 0], Some(0));
    first.delay = 7;
    first.dispose = gif::DisposalMethod::Background;
    let mut second = block(1, 2, &[0, 1], &[10, 20, 30, 0, 0, 255], None);
    second.left = 3;
    second.top = 4;
    second.delay = 12;
    second.dispose = gif::DisposalMethod::Previous;

    let bytes = encode_gif(&[first, second], Some(gif::Repeat::Finite(2)));
    let anim = GifSource.decode(&mut bytes.as_slice()).unwrap();

    assert_eq!(anim.frames.len(), 2);
    assert_eq!(anim.loop_count, LoopCount::Finite(2));

    let f0 = &anim.frames[0];
    assert_eq!((f0.width(), f0.height()), (2, 1));
    assert_eq!(f0.delay, Delay::hundredths(7));
    assert_eq!(f0.disposal, DisposalMode::Background);
    let p0 = f0.palette().unwrap();
    assert_eq!(p0.get(0), Some(Color::transparent()));
    assert_eq!(p0.get(1), Some(Color::opaque(255, 0, 0)));
    let Pixels::Indexed { indices, .. } = f0.pixels() else {
        panic!("decoded frames are indexed");
    };
    assert_eq!(indices, &vec![1, 0]);

    let f1 = &anim.frames[1];
    assert_eq!((f1.x, f1.y), (3, 4));
    assert_eq!(f1.delay, Delay::hundredths(12));
    assert_eq!(f1.disposal, DisposalMode::Previous);
    assert_eq!(f1.palette().unwrap().get(0), Some(Color::opaque(10, 20, 30)));
}

#[test]
fn infinite_repeat_maps_to_infinite_loop() {
    let bytes = encode_gif(
        &[block(1, 1, &[0], &[1, 2, 3, 4, 5, 6], None)],
        Some(gif::Repeat::Infinite),
    );
    let anim = GifSource.decode(&mut bytes.as_slice()).unwrap();
    assert_eq!(anim.loop_count, LoopCount::Infinite);
    assert_eq!(anim.frames[0].disposal, DisposalMode::None);
}

#[test]
fn malformed_input_is_a_decode_error() {
    let err = GifSource
        .decode(&mut b"not a gif at all".as_slice())
        .unwrap_err();
    assert!(matches!(err, GifSquareError::Decode(_)));
}

#[test]
fn palette_from_table_marks_transparent_entry() {
    let p = palette_from_table(&[1, 2, 3, 4, 5, 6, 7], Some(1)).unwrap();
    assert_eq!(p.colors(), &[Color::opaque(1, 2, 3), Color::transparent()]);

    let p = palette_from_table(&[1, 2, 3], None).unwrap();
    assert_eq!(p.colors(), &[Color::opaque(1, 2, 3)]);
}

#[test]
fn transparent_index_past_the_table_grows_the_palette() {
    let palette = palette_from_table(&[255, 0, 0, 0, 255, 0], Some(3)).unwrap();
    assert_eq!(palette.len(), 4);
    assert_eq!(palette.get(0), Some(Color::opaque(255, 0, 0)));
    assert_eq!(palette.get(1), Some(Color::opaque(0, 255, 0)));
    assert_eq!(palette.get(2), Some(Color::transparent()));
    assert_eq!(palette.get(3), Some(Color::transparent()));

    let frame = Frame::indexed(2, 1, vec![0, 3], Arc::new(palette)).unwrap();
    assert_eq!(frame.to_rgba().get_pixel(1, 0).0, [0, 0, 0, 0]);
}

#[test]
fn transparent_index_at_the_top_caps_the_palette() {
    let palette = palette_from_table(&[1, 2, 3], Some(255)).unwrap();
    assert_eq!(palette.len(), 256);
    assert_eq!(palette.get(255), Some(Color::transparent()));
}
