//! Benchmarks for the sequencer tick and the mixer.
//!
//! Run with: cargo bench --bench engine_bench -p mt-engine

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mt_engine::{advance_tick, ChannelState, Mixer, TransportState};
use mt_ir::{EventSink, FormatTag, Note, Pattern, Song};
use std::hint::black_box;
use std::sync::Arc;

/// Eight channels, a note with a volume effect on every cell.
fn busy_song() -> Song {
    let mut song = Song::new("bench", FormatTag::EightChn);
    let mut pattern = Pattern::new(8);
    for row in 0..64 {
        for channel in 0..8 {
            if let Some(note) = pattern.note_mut(row, channel) {
                *note = Note { sample: 1, period: 428, command: 0xC, param: 40 };
            }
        }
    }
    song.patterns = vec![pattern];
    song.samples[0].volume = 64;
    song.samples[0].length = 4096;
    song.samples[0].loop_start = 0;
    song.samples[0].loop_length = 4096;
    song.samples[0].data = (0..4096).map(|i| ((i % 64) as f32 / 32.0) - 1.0).collect();
    song
}

fn bench_advance_tick(c: &mut Criterion) {
    let song = busy_song();
    let mut transport = TransportState { ticks_per_row: 1, ..Default::default() };
    let mut channels = ChannelState::for_channels(8);

    c.bench_function("advance_tick/row", |b| {
        b.iter(|| black_box(advance_tick(&song, &mut transport, &mut channels)));
    });
}

fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixer");
    let song = Arc::new(busy_song());

    for frames in [256usize, 4410].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(frames), frames, |b, &frames| {
            let mut mixer = Mixer::new(44100);
            mixer.set_song(Some(Arc::clone(&song)));
            let mut transport = TransportState::default();
            let mut channels = ChannelState::for_channels(8);
            for event in advance_tick(&song, &mut transport, &mut channels) {
                mixer.handle(event);
            }
            let mut out = vec![mt_engine::Frame::silence(); frames];
            b.iter(|| {
                mixer.render_into(&mut out);
                black_box(&out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_advance_tick, bench_mixer);
criterion_main!(benches);
