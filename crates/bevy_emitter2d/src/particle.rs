//! Particle records and the fixed-capacity pool that holds them.

use bevy::prelude::*;

/// Smallest lifespan a spawned particle may receive. `life == 0` marks a free
/// slot, so sampled lifespans are clamped away from zero.
pub const MIN_PARTICLE_LIFE: f32 = 1.0e-4;

/// A single simulated particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// Position when spawned.
    pub origin: Vec2,
    /// Normalized direction of travel, fixed at spawn.
    pub direction: Vec2,
    /// Current position.
    pub position: Vec2,
    /// Initial size.
    pub size: f32,
    /// Initial speed.
    pub speed: f32,
    /// Current age in seconds.
    pub time: f32,
    /// Total lifespan in seconds. `0.0` means the slot is free.
    pub life: f32,
    /// Spawn angle in degrees, kept for directional rotation.
    pub angle: f32,
    /// Frame of a multi-frame texture picked at spawn.
    pub texture_index: usize,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life != 0.0
    }

    /// Alive but past its lifespan; reclaimed on the next update.
    pub fn is_expired(&self) -> bool {
        self.is_alive() && self.time >= self.life
    }

    pub fn remaining(&self) -> f32 {
        self.life - self.time
    }

    /// Age as a fraction of the lifespan, clamped to `[0, 1]`.
    pub fn age_fraction(&self) -> f32 {
        if self.life > 0.0 {
            (self.time / self.life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Fixed-capacity particle storage.
///
/// Slots are never reallocated: a slot whose `life` is zero is free and gets
/// reused by the next spawn scan. Resizing means building a new pool.
#[derive(Clone, Debug)]
pub struct ParticlePool {
    slots: Box<[Particle]>,
    alive: usize,
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity].into_boxed_slice(),
            alive: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live particles.
    pub fn alive(&self) -> usize {
        self.alive
    }

    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// All slots, free ones included, in storage order.
    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn iter_alive(&self) -> impl DoubleEndedIterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.is_alive())
    }

    /// Free every slot.
    pub fn clear(&mut self) {
        self.slots.fill(Particle::default());
        self.alive = 0;
    }

    /// Fill up to `max` free slots, scanning from the start, with particles
    /// produced by `make`. Returns how many were spawned.
    pub fn spawn_into_dead(&mut self, max: usize, mut make: impl FnMut() -> Particle) -> usize {
        if max == 0 {
            return 0;
        }

        let mut spawned = 0;
        for slot in self.slots.iter_mut().filter(|p| !p.is_alive()) {
            let mut particle = make();
            particle.life = particle.life.max(MIN_PARTICLE_LIFE);
            *slot = particle;
            spawned += 1;
            if spawned >= max {
                break;
            }
        }
        self.alive += spawned;
        spawned
    }

    /// One update scan over the pool.
    ///
    /// Expired particles are reclaimed, live ones are handed to `integrate`.
    /// After integrating, a particle is swapped with its predecessor when the
    /// predecessor has more life left, so over many frames the pool drifts
    /// toward ascending remaining life. Returns how many were integrated.
    pub(crate) fn step(&mut self, mut integrate: impl FnMut(&mut Particle)) -> usize {
        let mut updated = 0;

        for i in 0..self.slots.len() {
            if self.alive == 0 {
                break;
            }
            if !self.slots[i].is_alive() {
                continue;
            }

            if self.slots[i].is_expired() {
                self.slots[i].life = 0.0;
                self.alive = self.alive.saturating_sub(1);
                continue;
            }

            integrate(&mut self.slots[i]);

            if i > 0 {
                let prev = &self.slots[i - 1];
                if prev.is_alive() && prev.remaining() > self.slots[i].remaining() {
                    self.slots.swap(i - 1, i);
                }
            }
            updated += 1;
        }

        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(life: f32) -> Particle {
        Particle {
            life,
            ..default()
        }
    }

    #[test]
    fn fresh_pool_is_all_free() {
        let pool = ParticlePool::with_capacity(16);
        assert_eq!(pool.capacity(), 16);
        assert_eq!(pool.alive(), 0);
        assert_eq!(pool.iter_alive().count(), 0);
    }

    #[test]
    fn spawn_fills_free_slots_from_the_start() {
        let mut pool = ParticlePool::with_capacity(8);
        assert_eq!(pool.spawn_into_dead(3, || particle(1.0)), 3);
        assert!(pool.slots()[..3].iter().all(Particle::is_alive));
        assert!(pool.slots()[3..].iter().all(|p| !p.is_alive()));

        // Capacity is the hard limit.
        assert_eq!(pool.spawn_into_dead(100, || particle(1.0)), 5);
        assert_eq!(pool.alive(), 8);
        assert_eq!(pool.spawn_into_dead(1, || particle(1.0)), 0);
    }

    #[test]
    fn zero_life_is_clamped_so_the_slot_stays_taken() {
        let mut pool = ParticlePool::with_capacity(2);
        pool.spawn_into_dead(1, || particle(0.0));
        assert!(pool.slots()[0].is_alive());
        assert_eq!(pool.slots()[0].life, MIN_PARTICLE_LIFE);
    }

    #[test]
    fn expired_particles_are_reclaimed_and_reused() {
        let mut pool = ParticlePool::with_capacity(4);
        pool.spawn_into_dead(4, || particle(1.0));

        let updated = pool.step(|p| p.time += 0.6);
        assert_eq!(updated, 4);
        pool.step(|p| p.time += 0.6);

        // Everyone is now past their life and gets reclaimed.
        let updated = pool.step(|p| p.time += 0.6);
        assert_eq!(updated, 0);
        assert_eq!(pool.alive(), 0);

        assert_eq!(pool.spawn_into_dead(2, || particle(2.0)), 2);
        assert_eq!(pool.alive(), 2);
    }

    #[test]
    fn pool_drifts_toward_ascending_remaining_life() {
        let mut pool = ParticlePool::with_capacity(5);
        let mut lives = [5.0, 4.0, 3.0, 2.0, 1.5].into_iter();
        pool.spawn_into_dead(5, || particle(lives.next().unwrap()));

        for _ in 0..5 {
            pool.step(|p| p.time += 0.01);
        }

        let remaining: Vec<f32> = pool.iter_alive().map(Particle::remaining).collect();
        assert!(remaining.windows(2).all(|w| w[0] <= w[1]), "{:?}", remaining);
    }

    #[test]
    fn clear_frees_everything() {
        let mut pool = ParticlePool::with_capacity(3);
        pool.spawn_into_dead(3, || particle(1.0));
        pool.clear();
        assert_eq!(pool.alive(), 0);
        assert!(pool.slots().iter().all(|p| !p.is_alive()));
    }
}
