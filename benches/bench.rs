use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use phastdsp::dotprod::{Cccf, Crcf, DotProd, Rrrf};
use phastdsp::kernels::{DefaultKernel, Kernel, Scalar, Unrolled};
use phastdsp::planner::{is_supported, Direction, FftPlan, SUPPORTED_SIZES};
use phastdsp::scramble::{scramble_data, scramble_data_soft, unscramble_data};
use phastdsp::sumsq::sumsqcf;
use utilities::rustfft::num_complex::Complex32;
use utilities::rustfft::FftPlanner;
use utilities::{gen_random_bytes, gen_random_complex, gen_random_reals};

const TAP_COUNTS: &[usize] = &[4, 16, 63, 64, 256, 1024];

fn bench_rrrf<K: Kernel>(c: &mut Criterion) {
    let mut group = c.benchmark_group("dotprod rrrf");

    for &n in TAP_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        let q = DotProd::<Rrrf, K>::create(&gen_random_reals(n, 1)).unwrap();
        let x = gen_random_reals(n, 2);

        group.bench_with_input(BenchmarkId::new(K::NAME, n), &x, |b, x| {
            b.iter(|| q.execute(black_box(x)));
        });
    }
    group.finish();
}

fn bench_crcf<K: Kernel>(c: &mut Criterion) {
    let mut group = c.benchmark_group("dotprod crcf");

    for &n in TAP_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        let q = DotProd::<Crcf, K>::create(&gen_random_reals(n, 3)).unwrap();
        let x = gen_random_complex(n, 4);

        group.bench_with_input(BenchmarkId::new(K::NAME, n), &x, |b, x| {
            b.iter(|| q.execute(black_box(x)));
        });
    }
    group.finish();
}

fn bench_cccf<K: Kernel>(c: &mut Criterion) {
    let mut group = c.benchmark_group("dotprod cccf");

    for &n in TAP_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        let q = DotProd::<Cccf, K>::create(&gen_random_complex(n, 5)).unwrap();
        let x = gen_random_complex(n, 6);

        group.bench_with_input(BenchmarkId::new(K::NAME, n), &x, |b, x| {
            b.iter(|| q.execute(black_box(x)));
        });
    }
    group.finish();
}

fn benchmark_dotprod(c: &mut Criterion) {
    bench_rrrf::<Scalar>(c);
    bench_rrrf::<Unrolled>(c);
    bench_crcf::<Scalar>(c);
    bench_crcf::<Unrolled>(c);
    bench_cccf::<Scalar>(c);
    bench_cccf::<Unrolled>(c);

    // the SIMD backend, when one is compiled in
    if DefaultKernel::NAME != Scalar::NAME && DefaultKernel::NAME != Unrolled::NAME {
        bench_rrrf::<DefaultKernel>(c);
        bench_crcf::<DefaultKernel>(c);
        bench_cccf::<DefaultKernel>(c);
    }
}

fn benchmark_sumsq(c: &mut Criterion) {
    let mut group = c.benchmark_group("sumsqcf");

    for &n in TAP_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        let v = gen_random_complex(n, 7);
        group.bench_with_input(BenchmarkId::new(DefaultKernel::NAME, n), &v, |b, v| {
            b.iter(|| sumsqcf(black_box(v)));
        });
    }
    group.finish();
}

fn benchmark_scramble(c: &mut Criterion) {
    let mut group = c.benchmark_group("scramble");

    for n in [31, 256, 4096] {
        group.throughput(Throughput::Bytes(n as u64));
        let data = gen_random_bytes(n, 8);

        group.bench_function(BenchmarkId::new("hard round trip", n), |b| {
            b.iter_batched(
                || data.clone(),
                |mut data| {
                    scramble_data(&mut data);
                    unscramble_data(&mut data);
                    data
                },
                BatchSize::SmallInput,
            );
        });

        let soft = gen_random_bytes(8 * n, 9);
        group.bench_function(BenchmarkId::new("soft", n), |b| {
            b.iter_batched(
                || soft.clone(),
                |mut soft| {
                    scramble_data_soft(&mut soft);
                    soft
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn benchmark_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft forward");

    for size in SUPPORTED_SIZES.into_iter().filter(|&s| is_supported(s)) {
        group.throughput(Throughput::Elements(size as u64));
        let input = gen_random_complex(size, size as u64);

        group.bench_function(BenchmarkId::new("phastdsp plan", size), |b| {
            let mut output = vec![Complex32::default(); size];
            let mut plan = FftPlan::create(size, &input, &mut output, Direction::Forward, 0).unwrap();
            b.iter(|| plan.execute());
        });

        group.bench_function(BenchmarkId::new("rustfft", size), |b| {
            let fft = FftPlanner::<f32>::new().plan_fft_forward(size);
            let mut scratch = vec![Complex32::default(); fft.get_inplace_scratch_len()];
            b.iter_batched(
                || input.clone(),
                |mut buf| {
                    fft.process_with_scratch(&mut buf, &mut scratch);
                    buf
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_dotprod,
    benchmark_sumsq,
    benchmark_scramble,
    benchmark_fft
);
criterion_main!(benches);
