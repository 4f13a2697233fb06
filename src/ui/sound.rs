/// Sound engine: procedural chiptune effects via rodio.
///
/// Buffers are synthesized once at startup; playback is fire-and-forget.
/// Without the "sound" feature the stub SoundEngine does nothing.

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_boat: Arc<Vec<u8>>,
        sfx_treasure: Arc<Vec<u8>>,
        sfx_win: Arc<Vec<u8>>,
        sfx_lose: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("audio output unavailable: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_boat: Arc::new(make_wav(&gen_boat())),
                sfx_treasure: Arc::new(make_wav(&gen_treasure())),
                sfx_win: Arc::new(make_wav(&gen_win())),
                sfx_lose: Arc::new(make_wav(&gen_lose())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_boat(&self) { self.play(&self.sfx_boat); }
        pub fn play_treasure(&self) { self.play(&self.sfx_treasure); }
        pub fn play_win(&self) { self.play(&self.sfx_win); }
        pub fn play_lose(&self) { self.play(&self.sfx_lose); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — mono f32 samples
    // ════════════════════════════════════════════════════════════

    /// Sequence of (frequency, seconds) notes with a per-note decay.
    fn notes(seq: &[(f32, f32)], volume: f32, harmonic: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in seq {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.7);
                let wave = (t * freq * TAU).sin() * (1.0 - harmonic)
                    + (t * freq * 2.0 * TAU).sin() * harmonic;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Boat: rolling two-tone swell, like a horn.
    fn gen_boat() -> Vec<f32> {
        let duration = 0.35;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let p = i as f32 / n as f32;
                let wobble = 1.0 + 0.02 * (t * 6.0 * TAU).sin();
                let env = (p * 4.0).min(1.0) * (1.0 - p);
                ((t * 196.0 * wobble * TAU).sin() * 0.6 + (t * 294.0 * TAU).sin() * 0.4)
                    * env
                    * 0.35
            })
            .collect()
    }

    /// Treasure: sparkly ascending triad.
    fn gen_treasure() -> Vec<f32> {
        notes(&[(1319.0, 0.05), (1568.0, 0.05), (2093.0, 0.09)], 0.25, 0.3)
    }

    /// Win: fanfare C5-E5-G5 then a held C6.
    fn gen_win() -> Vec<f32> {
        notes(
            &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.35)],
            0.3,
            0.3,
        )
    }

    /// Lose: sagging minor descent.
    fn gen_lose() -> Vec<f32> {
        notes(&[(392.0, 0.14), (349.0, 0.14), (311.0, 0.14), (262.0, 0.3)], 0.3, 0.1)
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — 16-bit PCM mono
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_size = samples.len() as u32 * 2;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
        buf.extend_from_slice(&2u16.to_le_bytes()); // block align
        buf.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_boat(&self) {}
    pub fn play_treasure(&self) {}
    pub fn play_win(&self) {}
    pub fn play_lose(&self) {}
}

/// Play the effect for each event, in order.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let Some(sfx) = sound else { return };
    for event in events {
        match event {
            GameEvent::BoatCollected => sfx.play_boat(),
            GameEvent::TreasureCollected { .. } => sfx.play_treasure(),
            GameEvent::Won(_) => sfx.play_win(),
            GameEvent::Lost(_) => sfx.play_lose(),
        }
    }
}
