use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use image::{Rgba, RgbaImage};
use responsive_sprite_core::compositing::composite;
use responsive_sprite_core::prelude::*;
use responsive_sprite_core::{DecodedImage, pack, transparent_png};

fn generate_sizes(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("icon_{}.png", i), w, h)
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for count in [50, 200, 1000] {
        let sizes = generate_sizes(count, 16, 128);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("pack_layout", count), &sizes, |b, sizes| {
            let cfg = SpriteConfig::builder().padding(2).reduce_artifacts(true).build();
            b.iter(|| black_box(pack_layout(sizes.clone(), &cfg).expect("layout")));
        });
    }
    group.finish();
}

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    for count in [20, 100] {
        let decoded: Vec<DecodedImage> = generate_sizes(count, 16, 96)
            .into_iter()
            .map(|(name, w, h)| DecodedImage {
                source: SourceImage::new(name, w, h, ImageFormat::Png, true),
                rgba: RgbaImage::from_pixel(w, h, Rgba([90, 120, 200, 255])),
            })
            .collect();
        let catalog: Vec<SourceImage> = decoded.iter().map(|d| d.source.clone()).collect();
        let layout = pack(&catalog, &SpriteConfig::default()).expect("pack");
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("edge_extended", count), &layout, |b, layout| {
            b.iter(|| black_box(composite(layout, &decoded, true).expect("composite")));
        });
    }
    group.finish();
}

fn bench_placeholder(c: &mut Criterion) {
    c.bench_function("transparent_png_1024x768", |b| {
        b.iter(|| black_box(transparent_png(black_box(1024), black_box(768))))
    });
}

criterion_group!(benches, bench_layout, bench_composite, bench_placeholder);
criterion_main!(benches);
