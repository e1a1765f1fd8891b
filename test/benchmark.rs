use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tiltstack::{MrcStack, TiltImage};

const HEADER_SIZE: usize = 1024;
const EXT_RECORD_SIZE: usize = 128;

/// Synthetic tilt series: `nz` planes of `n`×`n` signed samples with a
/// mix of negative and positive intensities.
fn synthetic_stack(n: i32, nz: i32) -> Vec<u8> {
    let mut bytes = vec![0u8; HEADER_SIZE];
    bytes[0..4].copy_from_slice(&n.to_le_bytes());
    bytes[4..8].copy_from_slice(&n.to_le_bytes());
    bytes[8..12].copy_from_slice(&nz.to_le_bytes());
    bytes[12..16].copy_from_slice(&1i32.to_le_bytes());
    bytes[92..96].copy_from_slice(&((nz as usize * EXT_RECORD_SIZE) as i32).to_le_bytes());
    bytes[130..132].copy_from_slice(&32i16.to_le_bytes()); // numfloats

    for i in 0..nz {
        let mut rec = [0u8; EXT_RECORD_SIZE];
        rec[0..4].copy_from_slice(&(i as f32).to_le_bytes()); // a_tilt
        rec[44..48].copy_from_slice(&0.01f32.to_le_bytes()); // pixel_size
        bytes.extend_from_slice(&rec);
    }

    for _ in 0..nz {
        for s in 0..(n as i64 * n as i64) {
            let sample = (s % 1021) as i16 - 256;
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
    }
    bytes
}

fn bench_decode(c: &mut Criterion) {
    let small = synthetic_stack(128, 8);
    let large = synthetic_stack(512, 32);

    c.bench_function("decode_128x128x8", |b| {
        b.iter(|| {
            let stack = MrcStack::from_reader(Cursor::new(black_box(&small[..]))).unwrap();
            let mut images: Vec<TiltImage> = Vec::new();
            stack.decode_into(&mut images).unwrap();
            black_box(images)
        })
    });

    c.bench_function("decode_512x512x32", |b| {
        b.iter(|| {
            let stack = MrcStack::from_reader(Cursor::new(black_box(&large[..]))).unwrap();
            let mut images: Vec<TiltImage> = Vec::new();
            stack.decode_into(&mut images).unwrap();
            black_box(images)
        })
    });
}

fn bench_headers_only(c: &mut Criterion) {
    let data = synthetic_stack(256, 64);

    c.bench_function("read_headers_256x256x64", |b| {
        b.iter(|| {
            let stack = MrcStack::from_reader(Cursor::new(black_box(&data[..]))).unwrap();
            black_box(stack.ext_headers().len())
        })
    });
}

criterion_group!(benches, bench_decode, bench_headers_only);
criterion_main!(benches);
