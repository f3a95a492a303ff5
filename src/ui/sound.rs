/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = 2.0 * std::f32::consts::PI;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_double_jump: Arc<Vec<u8>>,
        sfx_dodge: Arc<Vec<u8>>,
        sfx_slash: Arc<Vec<u8>>,
        sfx_hit: Arc<Vec<u8>>,
        sfx_shield_break: Arc<Vec<u8>>,
        sfx_spring: Arc<Vec<u8>>,
        sfx_collect: Arc<Vec<u8>>,
        sfx_shoot: Arc<Vec<u8>>,
        sfx_explosion: Arc<Vec<u8>>,
        sfx_enemy_die: Arc<Vec<u8>>,
        sfx_boss_alarm: Arc<Vec<u8>>,
        sfx_boss_die: Arc<Vec<u8>>,
        sfx_no_stamina: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: Arc::new(make_wav(&gen_sweep(250.0, 520.0, 0.09, 0.25))),
                sfx_double_jump: Arc::new(make_wav(&gen_sweep(350.0, 750.0, 0.09, 0.25))),
                sfx_dodge: Arc::new(make_wav(&gen_whoosh())),
                sfx_slash: Arc::new(make_wav(&gen_slash())),
                sfx_hit: Arc::new(make_wav(&gen_hit())),
                sfx_shield_break: Arc::new(make_wav(&gen_shield_break())),
                sfx_spring: Arc::new(make_wav(&gen_sweep(200.0, 900.0, 0.14, 0.3))),
                sfx_collect: Arc::new(make_wav(&gen_collect())),
                sfx_shoot: Arc::new(make_wav(&gen_shoot())),
                sfx_explosion: Arc::new(make_wav(&gen_explosion(0.5, 0.4))),
                sfx_enemy_die: Arc::new(make_wav(&gen_explosion(0.18, 0.3))),
                sfx_boss_alarm: Arc::new(make_wav(&gen_boss_alarm())),
                sfx_boss_die: Arc::new(make_wav(&gen_explosion(0.9, 0.45))),
                sfx_no_stamina: Arc::new(make_wav(&gen_buzz())),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_double_jump(&self) { self.play(&self.sfx_double_jump); }
        pub fn play_dodge(&self) { self.play(&self.sfx_dodge); }
        pub fn play_slash(&self) { self.play(&self.sfx_slash); }
        pub fn play_hit(&self) { self.play(&self.sfx_hit); }
        pub fn play_shield_break(&self) { self.play(&self.sfx_shield_break); }
        pub fn play_spring(&self) { self.play(&self.sfx_spring); }
        pub fn play_collect(&self) { self.play(&self.sfx_collect); }
        pub fn play_shoot(&self) { self.play(&self.sfx_shoot); }
        pub fn play_explosion(&self) { self.play(&self.sfx_explosion); }
        pub fn play_enemy_die(&self) { self.play(&self.sfx_enemy_die); }
        pub fn play_boss_alarm(&self) { self.play(&self.sfx_boss_alarm); }
        pub fn play_boss_die(&self) { self.play(&self.sfx_boss_die); }
        pub fn play_no_stamina(&self) { self.play(&self.sfx_no_stamina); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Rising (or falling) frequency sweep with linear fade out.
    fn gen_sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = from + (to - from) * t;
                phase += freq * TAU / SAMPLE_RATE as f32;
                let env = 1.0 - t;
                phase.sin() * env * volume
            })
            .collect()
    }

    /// Dodge: filtered noise burst, wide and airy.
    fn gen_whoosh() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.12) as usize;
        let mut rng: u32 = 7;
        let mut prev = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // one-pole lowpass, opening then closing
                let cutoff = 0.15 + (1.0 - (2.0 * t - 1.0).abs()) * 0.5;
                prev += (noise - prev) * cutoff;
                prev * (1.0 - t) * 0.35
            })
            .collect()
    }

    /// Melee swing: bright noise snap over a falling square tone.
    fn gen_slash() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.08) as usize;
        let mut rng: u32 = 99;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let freq = 900.0 - t * 500.0;
                let square = if (ti * freq * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (square * 0.3 + noise * 0.7) * (1.0 - t).powf(1.5) * 0.3
            })
            .collect()
    }

    /// Player hurt: harsh low thud.
    fn gen_hit() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.15) as usize;
        let mut rng: u32 = 555;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * (120.0 - t * 60.0) * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (tone * 0.7 + noise * 0.3) * (1.0 - t).powf(0.7) * 0.4
            })
            .collect()
    }

    /// Shield pop: glassy descending two-tone.
    fn gen_shield_break() -> Vec<f32> {
        let notes = [1568.0_f32, 784.0];
        let note_dur = 0.07;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                let wave = (t * freq * TAU).sin() * 0.6 + (t * freq * 2.5 * TAU).sin() * 0.4;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Item pickup: quick ascending arpeggio C6→E6→G6.
    fn gen_collect() -> Vec<f32> {
        let notes = [1047.0_f32, 1319.0, 1568.0];
        let note_dur = 0.045;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Enemy fire: tiny descending zap.
    fn gen_shoot() -> Vec<f32> {
        gen_sweep(700.0, 220.0, 0.06, 0.2)
    }

    /// Noise boom with a pitch floor; duration scales from enemy pop
    /// to boss demise.
    fn gen_explosion(duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 31337;
        let mut prev = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                prev += (noise - prev) * (0.6 - t * 0.45);
                let ti = i as f32 / SAMPLE_RATE as f32;
                let rumble = (ti * 55.0 * TAU).sin() * 0.4;
                (prev + rumble) * (1.0 - t).powf(1.2) * volume
            })
            .collect()
    }

    /// Boss arrival: two slow descending alarm tones.
    fn gen_boss_alarm() -> Vec<f32> {
        let mut samples = gen_sweep(880.0, 440.0, 0.25, 0.3);
        samples.extend(gen_sweep(880.0, 440.0, 0.25, 0.3));
        samples
    }

    /// Refused action: short low buzz.
    fn gen_buzz() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.1) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let square = if (ti * 110.0 * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                square * (1.0 - t) * 0.15
            })
            .collect()
    }

    /// Run over: sad descending four-note line.
    fn gen_game_over() -> Vec<f32> {
        let notes = [440.0_f32, 370.0, 311.0, 261.0];
        let note_dur = 0.14;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                samples.push((t * freq * TAU).sin() * env * 0.3);
            }
        }
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            let ratio = (total - i) as f32 / fade_len as f32;
            samples[i] *= ratio;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
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
    pub fn play_jump(&self) {}
    pub fn play_double_jump(&self) {}
    pub fn play_dodge(&self) {}
    pub fn play_slash(&self) {}
    pub fn play_hit(&self) {}
    pub fn play_shield_break(&self) {}
    pub fn play_spring(&self) {}
    pub fn play_collect(&self) {}
    pub fn play_shoot(&self) {}
    pub fn play_explosion(&self) {}
    pub fn play_enemy_die(&self) {}
    pub fn play_boss_alarm(&self) {}
    pub fn play_boss_die(&self) {}
    pub fn play_no_stamina(&self) {}
    pub fn play_game_over(&self) {}
}
