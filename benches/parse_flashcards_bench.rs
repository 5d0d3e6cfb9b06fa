use std::fs;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use flashdeck::card::Flashcard;
use flashdeck::parser::{flashcard_files, format_flashcard, parse};

fn bench_parse(c: &mut Criterion) {
    let card = Flashcard::new(
        "Operating Systems",
        "What does the scheduler do\nwhen a process blocks on I/O?",
        "It moves the process to the wait queue\n\nand picks another runnable process.",
    );
    let contents = format_flashcard(&card);

    c.bench_function("parse_flashcard", |b| {
        b.iter(|| black_box(parse(black_box(&contents))))
    });
}

fn bench_flashcard_files(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let folder = dir.path().join("Deck");
    fs::create_dir_all(&folder).expect("failed to create deck folder");
    let contents = format_flashcard(&Flashcard::new("Bench", "Question?", "Answer."));
    for i in 0..200 {
        fs::write(folder.join(format!("card_{i}.txt")), &contents).expect("failed to write card");
    }

    c.bench_function("flashcard_files", |b| {
        b.iter(|| black_box(flashcard_files(&folder).expect("failed to list cards")))
    });
}

criterion_group!(benches, bench_parse, bench_flashcard_files);
criterion_main!(benches);
