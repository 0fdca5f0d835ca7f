//! Translator benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mochi_conhost::console::MemoryConsole;
use mochi_conhost::core::Coord;
use mochi_conhost::{AnsiTranslator, Command, EraseMode};

/// A colored prompt redraw, roughly what a shell emits per keystroke
fn prompt_redraw() -> Vec<Command> {
    vec![
        Command::SaveCursor,
        Command::CursorToColumn { col: 1 },
        Command::EraseLine {
            mode: EraseMode::ToEnd,
        },
        Command::from_sgr(1),
        Command::from_sgr(32),
        Command::from_sgr(0),
        Command::from_sgr(34),
        Command::from_sgr(49),
        Command::ResetAttributes,
        Command::RestoreCursor,
    ]
}

fn bench_attributes(c: &mut Criterion) {
    let mut group = c.benchmark_group("translator");

    let commands: Vec<Command> = (30..38)
        .chain(40..48)
        .chain(90..98)
        .chain([1, 22, 7, 27, 39, 49, 0])
        .map(Command::from_sgr)
        .collect();
    group.throughput(Throughput::Elements(commands.len() as u64));

    group.bench_function("sgr", |b| {
        let mut t = AnsiTranslator::new(MemoryConsole::new(80, 25)).unwrap();
        b.iter(|| {
            for command in &commands {
                t.apply(black_box(*command)).unwrap();
            }
            t.console_mut().clear_calls();
        })
    });

    group.finish();
}

fn bench_cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("translator");

    group.bench_function("prompt_redraw", |b| {
        let console = MemoryConsole::new(120, 300)
            .with_window(250, 50)
            .with_cursor(Coord::new(40, 280));
        let mut t = AnsiTranslator::new(console).unwrap();
        let commands = prompt_redraw();
        b.iter(|| {
            for command in &commands {
                t.apply(black_box(*command)).unwrap();
            }
            t.console_mut().clear_calls();
        })
    });

    group.finish();
}

fn bench_full_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("translator");

    // Clear, then repaint every row of a 50 row window
    let mut commands = vec![
        Command::EraseScreen {
            mode: EraseMode::All,
        },
        Command::CursorTo { row: 1, col: 1 },
    ];
    for _ in 0..50 {
        commands.push(Command::from_sgr(33));
        commands.push(Command::EraseLine {
            mode: EraseMode::All,
        });
        commands.push(Command::CursorDownLine { count: 1 });
    }
    commands.push(Command::ScrollUp { count: 10 });

    group.bench_function("full_redraw", |b| {
        let console = MemoryConsole::new(120, 300).with_window(250, 50);
        let mut t = AnsiTranslator::new(console).unwrap();
        b.iter(|| {
            for command in &commands {
                t.apply(*command).unwrap();
            }
            t.console_mut().clear_calls();
            black_box(t.console().cursor())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_attributes, bench_cursor, bench_full_redraw);

criterion_main!(benches);
