//! Drop Catch headless demo
//!
//! Runs the simulation core without any rendering or audio backend: a
//! scripted collector sweeps along the bottom of the field while the rain
//! controller spawns drops. Useful for eyeballing the spawn/curse behavior
//! from the log output.

use drop_catch::consts::*;
use drop_catch::sim::{Bounds, DropTextures, Rain, TickOutcome};
use drop_catch::{AudioOutput, Collector, MusicHandle, SoundHandle, TextureHandle};

/// Collector that sweeps left-right along the bottom edge
struct SweepCollector {
    x: f32,
    dir: f32,
    lives: u32,
    score: u32,
}

impl SweepCollector {
    const WIDTH: f32 = 96.0;
    const HEIGHT: f32 = 64.0;
    const SPEED: f32 = 220.0;

    fn new() -> Self {
        Self {
            x: 0.0,
            dir: 1.0,
            lives: 3,
            score: 0,
        }
    }

    fn advance(&mut self, dt: f32) {
        self.x += self.dir * Self::SPEED * dt;
        if self.x <= 0.0 || self.x + Self::WIDTH >= FIELD_WIDTH {
            self.x = self.x.clamp(0.0, FIELD_WIDTH - Self::WIDTH);
            self.dir = -self.dir;
        }
    }
}

impl Collector for SweepCollector {
    fn area(&self) -> Bounds {
        Bounds::new(self.x, 0.0, Self::WIDTH, Self::HEIGHT)
    }

    fn apply_damage(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::warn!("ouch! lives left: {}", self.lives);
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    fn lives(&self) -> u32 {
        self.lives
    }
}

/// Audio backend that just logs what it would play
struct LogAudio;

impl AudioOutput for LogAudio {
    fn play_sound(&mut self, sound: SoundHandle) {
        log::debug!("sound {} played", sound.0);
    }

    fn play_music(&mut self, music: MusicHandle, looping: bool) {
        log::info!("music {} started (looping: {looping})", music.0);
    }

    fn stop_music(&mut self, music: MusicHandle) {
        log::info!("music {} stopped", music.0);
    }

    fn release_sound(&mut self, sound: SoundHandle) {
        log::debug!("sound {} released", sound.0);
    }

    fn release_music(&mut self, music: MusicHandle) {
        log::debug!("music {} released", music.0);
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42u64);
    log::info!("Drop Catch headless demo, seed {seed}");

    let textures = DropTextures {
        good: TextureHandle(1),
        bad: TextureHandle(2),
        cleanup: TextureHandle(3),
        curse: TextureHandle(4),
    };
    let mut rain = Rain::new(textures, SoundHandle(10), MusicHandle(11), seed)
        .expect("default drop configuration is valid");
    let mut collector = SweepCollector::new();
    let mut audio = LogAudio;

    rain.initialize(&mut audio).expect("initialize");

    let dt = 1.0 / 60.0;
    let mut elapsed = 0.0;
    while elapsed < 120.0 {
        collector.advance(dt);
        match rain.tick(dt, &mut collector, &mut audio).expect("tick") {
            TickOutcome::Continue => {}
            TickOutcome::GameOver => {
                log::info!("game over after {elapsed:.1}s");
                break;
            }
        }
        elapsed += dt;

        // Once a second, report the scene
        if (elapsed / dt) as u64 % 60 == 0 {
            log::info!(
                "t={elapsed:.0}s score={} lives={} drops={} curse={}",
                collector.score,
                collector.lives,
                rain.active_drops(),
                if rain.curse_active() {
                    format!("{:.1}s", rain.curse_remaining())
                } else {
                    "off".into()
                }
            );
        }
    }

    rain.shutdown(&mut audio);
    println!("final score: {} (lives left: {})", collector.score, collector.lives);
}
