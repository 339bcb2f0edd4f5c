use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fseq::{decode_header, decode_var_record, SequenceLayout};

fn sample_sequence(ranges: u8, variables: usize) -> Vec<u8> {
    let mut tables = Vec::new();
    for i in 0..u32::from(ranges) {
        tables.extend_from_slice(&(i * 512).to_le_bytes()[..3]);
        tables.extend_from_slice(&512u32.to_le_bytes()[..3]);
    }
    let mut vars = Vec::new();
    for _ in 0..variables {
        vars.extend_from_slice(&20u16.to_le_bytes());
        vars.extend_from_slice(b"mf");
        vars.extend_from_slice(&b"media/show-0001.mp3\0"[..16]);
    }

    let var_start = 32 + tables.len();
    let data_start = (var_start + vars.len()) as u16;
    let mut buf = vec![0u8; 32];
    buf[0..4].copy_from_slice(b"PSEQ");
    buf[4..6].copy_from_slice(&data_start.to_le_bytes());
    buf[7] = 2;
    buf[8..10].copy_from_slice(&(var_start as u16).to_le_bytes());
    buf[10..14].copy_from_slice(&512u32.to_le_bytes());
    buf[14..18].copy_from_slice(&64u32.to_le_bytes());
    buf[18] = 25;
    buf[22] = ranges;
    buf.extend(tables);
    buf.extend(vars);
    buf.extend(vec![0u8; 512 * 64]);
    buf
}

fn bench_header(c: &mut Criterion) {
    let buf = sample_sequence(0, 0);
    c.bench_function("decode_header", |b| b.iter(|| decode_header(black_box(&buf))));
}

fn bench_var_record(c: &mut Criterion) {
    let buf = sample_sequence(0, 1);
    let mut value = [0u8; 64];
    c.bench_function("decode_var_record_copy", |b| {
        b.iter(|| decode_var_record(black_box(&buf[32..]), Some(&mut value)))
    });
}

fn bench_layout(c: &mut Criterion) {
    let buf = sample_sequence(64, 32);
    c.bench_function("layout_64_ranges_32_vars", |b| {
        b.iter(|| SequenceLayout::parse(black_box(&buf)).unwrap())
    });
}

criterion_group!(benches, bench_header, bench_var_record, bench_layout);
criterion_main!(benches);
