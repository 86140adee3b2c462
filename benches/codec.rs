use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use loralink::{Cipher, DeviceId, MessageId, PacketCodec};

fn codec() -> PacketCodec {
    PacketCodec::new("P:", Cipher::new("SecureLoraComms1").unwrap()).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = codec();
    let sender = DeviceId::new("BigNode").unwrap();

    // Short chat line
    let short = b"im alive";
    group.throughput(Throughput::Bytes(short.len() as u64));
    group.bench_function("encode_data_8b", |b| {
        b.iter(|| {
            black_box(codec.encode_data(&sender, MessageId::new(42), black_box(short)));
        });
    });

    // Near the LoRa payload ceiling once hex-expanded
    let long = vec![b'x'; 100];
    group.throughput(Throughput::Bytes(long.len() as u64));
    group.bench_function("encode_data_100b", |b| {
        b.iter(|| {
            black_box(codec.encode_data(&sender, MessageId::new(42), black_box(&long)));
        });
    });

    group.bench_function("encode_ack", |b| {
        b.iter(|| {
            black_box(codec.encode_ack(&sender, MessageId::new(42)));
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let codec = codec();
    let sender = DeviceId::new("PhoneNode").unwrap();

    let data = codec.encode_data(&sender, MessageId::new(7), &[b'x'; 100]);
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("decode_open_100b", |b| {
        b.iter(|| {
            let packet = codec.decode(black_box(data.as_bytes())).packet().unwrap();
            black_box(codec.open(&packet));
        });
    });

    let ack = codec.encode_ack(&sender, MessageId::new(7));
    group.bench_function("decode_ack", |b| {
        b.iter(|| {
            black_box(codec.decode(black_box(ack.as_bytes())));
        });
    });

    let foreign = b"Weather:T:21.5C;H:40%";
    group.bench_function("decode_foreign", |b| {
        b.iter(|| {
            black_box(codec.decode(black_box(foreign)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
