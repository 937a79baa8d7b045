//! Tick sequencer: advances tick → row → position and interprets effects.

use heapless::Vec as HVec;
use mt_ir::{Effect, LoopRegion, Note, PlaybackEvent, Song, ROWS_PER_PATTERN};

use crate::channel::{ChannelState, LastNote};
use crate::frequency::period_to_frequency;
use crate::state::TransportState;

/// Upper bound on events from one tick: a NoteOn and a VolumeChange per channel.
pub const MAX_TICK_EVENTS: usize = 16;

/// Events produced by a single tick, in channel order.
pub type TickEvents = HVec<PlaybackEvent, MAX_TICK_EVENTS>;

/// Run one tick of the song.
///
/// On tick 0 the current row is read and every channel, in ascending order,
/// gets its note triggered and then its effect applied. A later channel's
/// position jump overwrites an earlier one. The tick counter then advances,
/// and on wrap the row and position move on unless the row already jumped.
pub fn advance_tick(
    song: &Song,
    transport: &mut TransportState,
    channels: &mut [ChannelState],
) -> TickEvents {
    let mut events = TickEvents::new();

    if transport.tick == 0 {
        let row = song.row_at(transport.position, transport.row);
        for (index, (note, channel)) in row.iter().zip(channels.iter_mut()).enumerate() {
            let index = index as u8;
            channel.command = note.command;
            channel.param = note.param;
            if note.has_pitch() {
                if let Some(event) = trigger_note(song, index, note, channel) {
                    push(&mut events, event);
                }
            }
            if let Some(event) = apply_effect(song, transport, index, note.effect(), channel) {
                push(&mut events, event);
            }
        }
    }

    step(song, transport);
    events
}

/// Set pitch (and sample/volume when given) and build the NoteOn.
fn trigger_note(
    song: &Song,
    index: u8,
    note: &Note,
    channel: &mut ChannelState,
) -> Option<PlaybackEvent> {
    channel.period = note.period;
    if let Some(sample) = song.sample(note.sample) {
        channel.sample = note.sample;
        channel.volume = sample.volume;
    }

    let sample = song.sample(channel.sample).filter(|s| !s.is_empty())?;
    channel.last_note = Some(LastNote {
        sample: channel.sample,
        period: channel.period,
    });

    Some(PlaybackEvent::NoteOn {
        channel: index,
        sample: channel.sample,
        frequency: period_to_frequency(channel.period, sample.finetune),
        volume: channel.volume,
        pan: channel.pan,
        looping: sample.loop_range().map(|r| LoopRegion {
            start: r.start as u32,
            end: r.end as u32,
        }),
    })
}

fn apply_effect(
    song: &Song,
    transport: &mut TransportState,
    index: u8,
    effect: Effect,
    channel: &mut ChannelState,
) -> Option<PlaybackEvent> {
    let song_length = song.song_length().max(1);
    match effect {
        Effect::PositionJump(target) => {
            let target = target as usize;
            transport.position = if target < song_length {
                target
            } else {
                log::trace!("jump target {} past song end, restarting", target);
                0
            };
            transport.row = 0;
            transport.row_jumped = true;
        }
        Effect::PatternBreak(_) => {
            transport.position = (transport.position + 1) % song_length;
            transport.row = 0;
            transport.row_jumped = true;
        }
        Effect::SetVolume(volume) if volume <= 64 => {
            channel.volume = volume;
            return Some(PlaybackEvent::VolumeChange {
                channel: index,
                volume,
            });
        }
        Effect::SetSpeed(0) => log::trace!("ignoring speed 0 on channel {}", index),
        Effect::SetSpeed(speed) => transport.ticks_per_row = speed,
        Effect::SetTempo(tempo) => {
            log::trace!("tempo {} -> {}", transport.tempo, tempo);
            transport.tempo = tempo;
        }
        _ => {}
    }
    None
}

/// Advance the tick counter, carrying into row and position.
fn step(song: &Song, transport: &mut TransportState) {
    let ticks_per_row = transport.ticks_per_row.max(1);
    transport.tick = (transport.tick + 1) % ticks_per_row;
    if transport.tick != 0 {
        return;
    }
    if transport.row_jumped {
        transport.row_jumped = false;
        return;
    }
    transport.row += 1;
    if transport.row >= ROWS_PER_PATTERN {
        transport.row = 0;
        transport.position = (transport.position + 1) % song.song_length().max(1);
    }
}

fn push(events: &mut TickEvents, event: PlaybackEvent) {
    if events.push(event).is_err() {
        log::warn!("tick event buffer full, dropping {:?}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt_ir::{FormatTag, Pattern};

    fn song_with_patterns(count: usize, table: &[u8]) -> Song {
        let mut song = Song::new("seq", FormatTag::MK);
        song.patterns = (0..count).map(|_| Pattern::new(4)).collect();
        song.pattern_table = table.to_vec();
        song.samples[0].volume = 48;
        song.samples[0].length = 64;
        song.samples[0].data = vec![0.25; 64];
        song
    }

    fn set(song: &mut Song, pattern: usize, row: usize, channel: usize, note: Note) {
        *song.patterns[pattern].note_mut(row, channel).unwrap() = note;
    }

    fn effect(command: u8, param: u8) -> Note {
        Note { sample: 0, period: 0, command, param }
    }

    fn run_ticks(song: &Song, transport: &mut TransportState, channels: &mut [ChannelState], n: usize) {
        for _ in 0..n {
            advance_tick(song, transport, channels);
        }
    }

    #[test]
    fn rows_advance_every_ticks_per_row() {
        let song = song_with_patterns(1, &[0]);
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        run_ticks(&song, &mut transport, &mut channels, 5);
        assert_eq!((transport.row, transport.tick), (0, 5));
        run_ticks(&song, &mut transport, &mut channels, 1);
        assert_eq!((transport.row, transport.tick), (1, 0));
    }

    #[test]
    fn song_loops_over_pattern_table() {
        let song = song_with_patterns(2, &[0, 1]);
        let mut transport = TransportState { ticks_per_row: 1, ..Default::default() };
        let mut channels = ChannelState::for_channels(4);

        let mut seen = Vec::new();
        for _ in 0..(64 * 5) {
            advance_tick(&song, &mut transport, &mut channels);
            assert!(transport.position < 2);
            if transport.row == 0 {
                seen.push(transport.position);
            }
        }
        assert_eq!(seen, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn set_speed_keeps_tempo() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, effect(0xF, 0x14));
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        assert_eq!(transport.ticks_per_row, 20);
        assert_eq!(transport.tempo, 125);
    }

    #[test]
    fn set_tempo_keeps_speed() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, effect(0xF, 0x90));
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        assert_eq!(transport.tempo, 144);
        assert_eq!(transport.ticks_per_row, 6);
    }

    #[test]
    fn speed_zero_is_ignored() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, effect(0xF, 0x00));
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        assert_eq!(transport.ticks_per_row, 6);
    }

    #[test]
    fn volume_slide_and_unhandled_effects_do_nothing() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, effect(0xA, 0x37));
        set(&mut song, 0, 0, 1, effect(0x4, 0x37));
        set(&mut song, 0, 0, 2, effect(0xE, 0x37));
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);
        let volumes: Vec<u8> = channels.iter().map(|c| c.volume).collect();

        let events = advance_tick(&song, &mut transport, &mut channels);
        assert!(events.is_empty());
        assert_eq!((transport.position, transport.row, transport.tick), (0, 0, 1));
        assert_eq!((transport.ticks_per_row, transport.tempo), (6, 125));
        assert!(!transport.row_jumped);
        assert_eq!(channels.iter().map(|c| c.volume).collect::<Vec<_>>(), volumes);
    }

    #[test]
    fn pattern_break_wraps_at_song_end() {
        let mut song = song_with_patterns(1, &[0, 0, 0]);
        set(&mut song, 0, 10, 1, effect(0xD, 0x00));
        let mut transport = TransportState { position: 2, row: 10, ..Default::default() };
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        assert_eq!((transport.position, transport.row), (0, 0));

        // Finishing the row does not skip row 0 of the new position.
        run_ticks(&song, &mut transport, &mut channels, 5);
        assert_eq!((transport.position, transport.row, transport.tick), (0, 0, 0));
    }

    #[test]
    fn later_channel_jump_wins() {
        let mut song = song_with_patterns(1, &[0, 0, 0, 0]);
        set(&mut song, 0, 0, 0, effect(0xB, 1));
        set(&mut song, 0, 0, 2, effect(0xB, 3));
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        assert_eq!(transport.position, 3);
        assert_eq!(transport.row, 0);
    }

    #[test]
    fn jump_past_song_end_restarts() {
        let mut song = song_with_patterns(1, &[0, 0]);
        set(&mut song, 0, 0, 0, effect(0xB, 9));
        let mut transport = TransportState { position: 1, ..Default::default() };
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        assert_eq!(transport.position, 0);
    }

    #[test]
    fn jump_with_single_tick_rows_lands_on_row_zero() {
        let mut song = song_with_patterns(1, &[0, 0]);
        set(&mut song, 0, 5, 0, effect(0xB, 1));
        let mut transport = TransportState { row: 5, ticks_per_row: 1, ..Default::default() };
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        assert_eq!((transport.position, transport.row, transport.tick), (1, 0, 0));
        assert!(!transport.row_jumped);
    }

    #[test]
    fn note_triggers_with_sample_volume() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 1, Note { sample: 1, period: 428, command: 0, param: 0 });
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        let events = advance_tick(&song, &mut transport, &mut channels);
        assert_eq!(events.len(), 1);
        match events[0] {
            PlaybackEvent::NoteOn { channel, sample, volume, pan, looping, frequency } => {
                assert_eq!(channel, 1);
                assert_eq!(sample, 1);
                assert_eq!(volume, 48);
                assert_eq!(pan, crate::RIGHT_PAN);
                assert!(looping.is_none());
                assert!(frequency > 8000.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(channels[1].period, 428);
        assert_eq!(channels[1].last_note, Some(LastNote { sample: 1, period: 428 }));
    }

    #[test]
    fn note_without_sample_reuses_channel_sample() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, Note { sample: 1, period: 428, command: 0, param: 0 });
        set(&mut song, 0, 1, 0, Note { sample: 0, period: 214, command: 0, param: 0 });
        let mut transport = TransportState { ticks_per_row: 1, ..Default::default() };
        let mut channels = ChannelState::for_channels(4);

        advance_tick(&song, &mut transport, &mut channels);
        let events = advance_tick(&song, &mut transport, &mut channels);
        assert!(matches!(events[0], PlaybackEvent::NoteOn { sample: 1, .. }));
        assert_eq!(channels[0].period, 214);
    }

    #[test]
    fn empty_or_missing_sample_is_silent() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, Note { sample: 0, period: 428, command: 0, param: 0 });
        set(&mut song, 0, 0, 1, Note { sample: 2, period: 428, command: 0, param: 0 });
        set(&mut song, 0, 0, 2, Note { sample: 31, period: 428, command: 0, param: 0 });
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        let events = advance_tick(&song, &mut transport, &mut channels);
        assert!(events.is_empty());
        assert_eq!(channels[0].period, 428);
        assert!(channels.iter().all(|c| c.last_note.is_none()));
    }

    #[test]
    fn set_volume_emits_change_and_ignores_overflow() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, effect(0xC, 0x20));
        set(&mut song, 0, 0, 1, effect(0xC, 0x41));
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        let events = advance_tick(&song, &mut transport, &mut channels);
        assert_eq!(
            events.as_slice(),
            &[PlaybackEvent::VolumeChange { channel: 0, volume: 32 }]
        );
        assert_eq!(channels[0].volume, 32);
        assert_eq!(channels[1].volume, 0);
    }

    #[test]
    fn volume_effect_follows_note_on() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, Note { sample: 1, period: 428, command: 0xC, param: 10 });
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        let events = advance_tick(&song, &mut transport, &mut channels);
        assert!(matches!(events[0], PlaybackEvent::NoteOn { volume: 48, .. }));
        assert_eq!(events[1], PlaybackEvent::VolumeChange { channel: 0, volume: 10 });
    }

    #[test]
    fn rows_are_only_read_on_tick_zero() {
        let mut song = song_with_patterns(1, &[0]);
        set(&mut song, 0, 0, 0, Note { sample: 1, period: 428, command: 0, param: 0 });
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        assert_eq!(advance_tick(&song, &mut transport, &mut channels).len(), 1);
        for _ in 1..6 {
            assert!(advance_tick(&song, &mut transport, &mut channels).is_empty());
        }
    }

    #[test]
    fn looped_sample_reports_clamped_region() {
        let mut song = song_with_patterns(1, &[0]);
        song.samples[0].loop_start = 32;
        song.samples[0].loop_length = 100;
        set(&mut song, 0, 0, 0, Note { sample: 1, period: 428, command: 0, param: 0 });
        let mut transport = TransportState::default();
        let mut channels = ChannelState::for_channels(4);

        let events = advance_tick(&song, &mut transport, &mut channels);
        assert!(matches!(
            events[0],
            PlaybackEvent::NoteOn { looping: Some(LoopRegion { start: 32, end: 64 }), .. }
        ));
    }
}
