use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pagercache::PageCellCache;

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_window_hit", |b| {
        let mut cache = PageCellCache::new(3).unwrap();
        cache.focus(Some(1));
        for index in 0..3 {
            cache.put(index, vec![0u8; 64]);
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(cache.get(counter % 3).is_some());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_sequential_paging(c: &mut Criterion) {
    let mut group = c.benchmark_group("paging");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("scroll_forward_cap3", |b| {
        let mut cache = PageCellCache::new(3).unwrap();

        // Each step focuses the next page and materializes it on a miss
        let mut page = 0usize;
        b.iter(|| {
            black_box(cache.focus(Some(page)));
            if cache.get(page).is_none() {
                black_box(cache.put(page, vec![0u8; 64]));
            }
            page += 1;
        });
    });

    group.finish();
}

fn bench_invalidate_from(c: &mut Criterion) {
    let mut group = c.benchmark_group("invalidate");
    group.sample_size(50);

    group.bench_function("invalidate_from_half_of_64", |b| {
        b.iter(|| {
            let mut cache = PageCellCache::new(64).unwrap();
            for index in 0..64 {
                cache.put(index, index);
            }
            black_box(cache.invalidate_from(32));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cached_get,
    bench_sequential_paging,
    bench_invalidate_from
);
criterion_main!(benches);
