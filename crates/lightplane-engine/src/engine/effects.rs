use rand::Rng;

use crate::{Particle, Vec2};

/// Number of colors in the rainbow palette (red through violet).
pub const PALETTE_LEN: usize = 7;
/// Palette index used for kill bursts (yellow).
pub const KILL_COLOR: usize = 2;

const KILL_BURST: usize = 10;
const KILL_PARTICLE_LIFE: u32 = 40;
const EGG_BURST: usize = 20;
const EGG_PARTICLE_LIFE: u32 = 60;
const EGG_EFFECT_FRAMES: u32 = 300;
const RAINBOW_FRAMES: u32 = 180;
const RAINBOW_EVERY_LEVELS: u32 = 3;
const RAINBOW_STEP_FRAMES: u64 = 10;

/// Result of triggering the easter egg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EasterEggTrigger {
    pub level: u32,
    pub rainbow: bool,
}

/// Cosmetic state: particles and easter-egg timers.
///
/// Nothing here affects collisions or scoring.
#[derive(Debug, Default, Clone)]
pub struct Effects {
    particles: Vec<Particle>,
    egg_level: u32,
    egg_timer: u32,
    rainbow_timer: u32,
    rainbow_index: usize,
    frame: u64,
}

impl Effects {
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn egg_level(&self) -> u32 {
        self.egg_level
    }

    /// Frames left on the current easter-egg effect.
    #[must_use]
    pub fn egg_timer(&self) -> u32 {
        self.egg_timer
    }

    #[must_use]
    pub fn is_rainbow(&self) -> bool {
        self.rainbow_timer > 0
    }

    /// Current palette index of the rainbow cycle.
    #[must_use]
    pub fn rainbow_index(&self) -> usize {
        self.rainbow_index
    }

    pub(crate) fn kill_burst<R>(&mut self, rng: &mut R, at: Vec2)
    where
        R: Rng + ?Sized,
    {
        self.burst(rng, at, KILL_BURST, KILL_PARTICLE_LIFE, |_| KILL_COLOR);
    }

    pub(crate) fn trigger_easter_egg<R>(&mut self, rng: &mut R, at: Vec2) -> EasterEggTrigger
    where
        R: Rng + ?Sized,
    {
        self.egg_level += 1;
        self.egg_timer = EGG_EFFECT_FRAMES;
        let rainbow = self.egg_level % RAINBOW_EVERY_LEVELS == 0;
        if rainbow {
            self.rainbow_timer = RAINBOW_FRAMES;
        }
        self.burst(rng, at, EGG_BURST, EGG_PARTICLE_LIFE, |i| i % PALETTE_LEN);
        EasterEggTrigger {
            level: self.egg_level,
            rainbow,
        }
    }

    fn burst<R, F>(&mut self, rng: &mut R, at: Vec2, count: usize, life: u32, color: F)
    where
        R: Rng + ?Sized,
        F: Fn(usize) -> usize,
    {
        self.particles.extend((0..count).map(|i| Particle {
            position: at,
            velocity: Vec2::new(rng.random_range(-3.0..=3.0), rng.random_range(-3.0..=3.0)),
            life,
            color_index: color(i),
        }));
    }

    /// Ages particles and ticks every timer by one frame.
    pub(crate) fn update(&mut self) {
        self.frame += 1;
        for particle in &mut self.particles {
            particle.position += particle.velocity;
            particle.life = particle.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);

        self.egg_timer = self.egg_timer.saturating_sub(1);
        if self.rainbow_timer > 0 {
            self.rainbow_timer -= 1;
            if self.frame % RAINBOW_STEP_FRAMES == 0 {
                self.rainbow_index = (self.rainbow_index + 1) % PALETTE_LEN;
            }
        }
    }
}
