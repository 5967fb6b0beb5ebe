use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rsa_stream::rsa::{encrypt_bytes, generate_keypair, pow_mod, KeygenConfig, RandState};

fn bench_pow_mod(c: &mut Criterion) {
    let mut group = c.benchmark_group("pow_mod");
    let mut state = RandState::new(1);

    for bits in [256u64, 512, 1024] {
        let modulus = state.random_bits(bits) | num_bigint::BigUint::from(1u8);
        let base = state.random_below(&modulus);
        let exp = state.random_bits(bits);

        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |b, _| {
            b.iter(|| pow_mod(black_box(&base), black_box(&exp), black_box(&modulus)))
        });
    }
    group.finish();
}

fn bench_encrypt_stream(c: &mut Criterion) {
    let config = KeygenConfig::default().with_bits(512).with_iters(20).with_seed(42);
    let keypair = generate_keypair(&config, "bench", &mut config.rand_state()).unwrap();
    let message = vec![0x5au8; 4096];

    let mut group = c.benchmark_group("encrypt_stream");
    group.throughput(Throughput::Bytes(message.len() as u64));
    group.bench_function("512-bit", |b| {
        b.iter(|| encrypt_bytes(black_box(&message), &keypair.public_key).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_pow_mod, bench_encrypt_stream);
criterion_main!(benches);
