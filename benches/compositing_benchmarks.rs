//! Benchmarks for compositing, decoding and sheet layout.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! Fixtures are generated in memory, so no files are needed.

use std::borrow::Cow;
use std::hint::black_box;

use criterion::Criterion;
use flipbook::{
    AcceptedContainer, CompositeOptions, FrameRecord, OverlayMode, SheetOptions, composite,
    composite_with_options, decode,
};
use gif::{Encoder, Frame};

const CANVAS: u32 = 320;

/// A full background followed by small patches drifting across the canvas,
/// the shape of a typical optimised GIF.
fn drifting_patches(count: u32) -> Vec<FrameRecord> {
    let mut frames = vec![FrameRecord::solid(0, 0, CANVAS, CANVAS, [255, 255, 255, 255])];
    frames.extend((0..count).map(|index| {
        let offset = (index * 7) % (CANVAS - 32);
        FrameRecord::solid(offset, offset / 2, 32, 32, [0, 0, 255, 255])
    }));
    frames
}

fn encoded_animation(count: u16) -> Vec<u8> {
    let palette = [255, 255, 255, 0, 0, 255];
    let size = CANVAS as u16;
    let mut bytes = Vec::new();
    {
        let mut encoder = Encoder::new(&mut bytes, size, size, &palette).unwrap();
        encoder
            .write_frame(&Frame {
                width: size,
                height: size,
                buffer: Cow::Owned(vec![0; usize::from(size) * usize::from(size)]),
                ..Frame::default()
            })
            .unwrap();
        for index in 0..count {
            let offset = (index * 7) % (size - 32);
            encoder
                .write_frame(&Frame {
                    left: offset,
                    top: offset / 2,
                    width: 32,
                    height: 32,
                    buffer: Cow::Owned(vec![1; 32 * 32]),
                    ..Frame::default()
                })
                .unwrap();
        }
    }
    bytes
}

fn benchmark_compositing(criterion: &mut Criterion) {
    let frames = drifting_patches(60);

    criterion.bench_function("composite 60 patches (replace)", |bencher| {
        bencher.iter(|| composite(CANVAS, CANVAS, black_box(&frames)).unwrap());
    });

    let options = CompositeOptions::new().with_overlay_mode(OverlayMode::SkipTransparent);
    criterion.bench_function("composite 60 patches (skip transparent)", |bencher| {
        bencher.iter(|| composite_with_options(CANVAS, CANVAS, black_box(&frames), &options).unwrap());
    });
}

fn benchmark_decoding(criterion: &mut Criterion) {
    let bytes = encoded_animation(60);

    criterion.bench_function("decode 60 frame GIF", |bencher| {
        bencher.iter(|| decode(black_box(&bytes)).unwrap());
    });

    criterion.bench_function("decode + composite lazily", |bencher| {
        let container = AcceptedContainer::from_bytes(bytes.clone()).unwrap();
        bencher.iter(|| {
            for frame in container.frame_iter(&CompositeOptions::new()).unwrap() {
                black_box(frame.unwrap());
            }
        });
    });
}

fn benchmark_sheets(criterion: &mut Criterion) {
    let flipbook = decode(&encoded_animation(24))
        .unwrap()
        .composite()
        .unwrap();

    criterion.bench_function("lay out 25 frames on 3x4 sheets", |bencher| {
        bencher.iter(|| flipbook.sheets(&SheetOptions::new(3, 4)).unwrap());
    });

    criterion.bench_function("lay out 25 frames scaled to 160px", |bencher| {
        let options = SheetOptions::new(3, 4).with_cell_width(160);
        bencher.iter(|| flipbook.sheets(&options).unwrap());
    });
}

criterion::criterion_group!(
    benches,
    benchmark_compositing,
    benchmark_decoding,
    benchmark_sheets,
);
criterion::criterion_main!(benches);
