use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vm::{chip8::ChipSet, resources::Rom};

const ROM_NAME: &str = "BENCH";

/// draws every glyph of the font across the screen, over and over again
const ROM_DATA: [u8; 28] = [
    0x00, 0xE0, // 0x200: clear
    0x60, 0x00, // 0x202: V0 = 0 (x)
    0x61, 0x00, // 0x204: V1 = 0 (y)
    0x62, 0x00, // 0x206: V2 = 0 (glyph)
    0xF2, 0x29, // 0x208: I = font(V2)
    0xD0, 0x15, // 0x20A: draw
    0x70, 0x05, // 0x20C: V0 += 5
    0x72, 0x01, // 0x20E: V2 += 1
    0x32, 0x10, // 0x210: skip if V2 == 16
    0x12, 0x08, // 0x212: next glyph
    0x71, 0x06, // 0x214: V1 += 6
    0x60, 0x00, // 0x216: V0 = 0
    0x62, 0x00, // 0x218: V2 = 0
    0x12, 0x00, // 0x21A: start over
];

static BASE_ROM: once_cell::sync::Lazy<Rom> =
    once_cell::sync::Lazy::new(|| Rom::new(ROM_NAME, &ROM_DATA[..]));

fn get_base() -> Rom {
    BASE_ROM.clone()
}

/// will setup the default configured chip
fn get_default_chip() -> ChipSet {
    ChipSet::new(get_base()).expect("The rom fits into memory.")
}

pub fn cycle_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    c.bench_function("cycle_bench", |b| {
        b.iter(|| {
            let _ = black_box(chip.next());
        });
    });
}

pub fn print_bench(c: &mut Criterion) {
    let mut chip = get_default_chip();
    for _ in 0..100 {
        let _ = chip.next();
    }
    c.bench_function("print_bench", |b| {
        b.iter(|| {
            let _ = black_box(format!("{}", chip));
        });
    });
}

criterion_group!(benches, cycle_bench, print_bench);
criterion_main!(benches);
