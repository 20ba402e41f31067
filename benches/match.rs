use criterion::{criterion_group, criterion_main, Criterion};
use hostregex::{Context, Flags, HostValue, Regex, Registers};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("compile", |b| {
        b.iter(|| Regex::new(black_box(r"(\d{1,2})/(\d{1,2})/(\d{4})")).unwrap())
    });

    let re = Regex::new(r"\d+").unwrap();
    let mut regs = Registers::new();
    c.bench_function("match", |b| {
        b.iter(|| re.search(black_box("Price: $123"), 0, &mut regs).unwrap())
    });

    let re = Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap();
    c.bench_function("complex match", |b| {
        b.iter(|| {
            re.search(
                black_box("Born on 12/25/1990 and graduated on 5/15/2012"),
                0,
                &mut regs,
            )
            .unwrap()
        })
    });

    let re = Regex::with_flags("(a|ab)(c|bcd)(d*)", Flags::EXTENDED).unwrap();
    c.bench_function("leftmost longest", |b| {
        b.iter(|| re.search(black_box("xxxabcdddd"), 0, &mut regs).unwrap())
    });

    let haystack = "lorem ipsum dolor sit amet ".repeat(200) + "needle";
    let re = Regex::new("needle").unwrap();
    c.bench_function("literal scan", |b| {
        b.iter(|| re.search(black_box(&haystack), 0, &mut regs).unwrap())
    });

    let re = Regex::new(r"(\w+)@(\w+)").unwrap();
    let mut cx = Context::new();
    let subject: HostValue = "mail bob@example".into();
    c.bench_function("context search", |b| {
        b.iter(|| cx.search(&re, black_box(&subject)).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
