//! Benchmarks for the FEC blocks
//!
//! Run with: cargo bench -p r4w-fec --bench fec_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use r4w_fec::fec::ber::hard_to_llr;
use r4w_fec::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PAYLOAD_SIZES: [usize; 3] = [256, 1024, 4096];

fn random_bits(len: usize) -> Vec<bool> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..len).map(|_| rng.gen()).collect()
}

// ============================================================================
// Encoder
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("conv_encode");

    for (name, config) in [
        ("k7_r12", ConvCodeConfig::nasa_k7_rate_half()),
        ("k9_r13", ConvCodeConfig::k9_rate_third()),
    ] {
        let encoder = ConvolutionalEncoder::new(&config).unwrap();
        for &size in &PAYLOAD_SIZES {
            let data = random_bits(size);
            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), &data, |b, data| {
                b.iter(|| encoder.encode(black_box(data)))
            });
        }
    }

    group.finish();
}

// ============================================================================
// Viterbi
// ============================================================================

fn bench_viterbi(c: &mut Criterion) {
    let mut group = c.benchmark_group("viterbi_decode");
    group.sample_size(20);

    let config = ConvCodeConfig::nasa_k7_rate_half();
    let encoder = ConvolutionalEncoder::new(&config).unwrap();
    let decoder = ViterbiDecoder::new(&config).unwrap();

    for &size in &PAYLOAD_SIZES {
        let mut coded = encoder.encode(&random_bits(size));
        for i in (7..coded.len()).step_by(50) {
            coded[i] = !coded[i];
        }
        let llr = hard_to_llr(&coded, 2.0);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("hard", size), &coded, |b, coded| {
            b.iter(|| decoder.decode_hard(black_box(coded)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("soft", size), &llr, |b, llr| {
            b.iter(|| decoder.decode_soft(black_box(llr)).unwrap())
        });
    }

    group.finish();
}

// ============================================================================
// Interleaver
// ============================================================================

fn bench_interleave(c: &mut Criterion) {
    let mut group = c.benchmark_group("interleave");

    for (rows, cols) in [(8, 6), (12, 16), (64, 64)] {
        let il = BlockInterleaver::new(rows, cols).unwrap();
        let data = random_bits(il.block_size() * 16);
        let label = format!("{}x{}", rows, cols);

        group.throughput(Throughput::Elements(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("apply_blocks", &label), &data, |b, data| {
            b.iter(|| il.apply_blocks(black_box(data)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("deapply_blocks", &label), &data, |b, data| {
            b.iter(|| il.deapply_blocks(black_box(data)).unwrap())
        });
    }

    group.finish();
}

// ============================================================================
// Full chain
// ============================================================================

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fec_chain");
    group.sample_size(20);

    let chain = FecChain::new(&ConvCodeConfig::nasa_k7_rate_half(), Termination::ZeroTail)
        .unwrap()
        .with_interleaver(12, 16)
        .unwrap();
    let data = random_bits(1024);
    let tx = chain.transmit(&data).unwrap();

    group.throughput(Throughput::Elements(data.len() as u64));
    group.bench_function("transmit_1024", |b| {
        b.iter(|| chain.transmit(black_box(&data)).unwrap())
    });
    group.bench_function("receive_hard_1024", |b| {
        b.iter(|| chain.receive_hard(black_box(&tx), data.len()).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_viterbi, bench_interleave, bench_chain);
criterion_main!(benches);
