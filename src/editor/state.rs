use bevy::prelude::*;
use bevy_emitter2d::{
    DrawStats, Emitter, EmitterConfig, Force, Gradient, Particle, ParticleRenderer, ParticleStats,
    Ramp, RandomSource, ValueRange,
};

use crate::constants::limits::{MAX_EMITTERS, MAX_NAME_LEN, MAX_PARTICLES};
use crate::constants::{GOLDEN_RATIO_CONJUGATE, emitter_defaults};

/// The editing context: every emitter of the effect being edited plus the
/// selection, clipboard and frame counters.
#[derive(Resource)]
pub struct ParticleEditor {
    name: String,
    emitters: Vec<Emitter>,
    /// Stable display ids, permuted along with reordering.
    ids: [usize; MAX_EMITTERS],
    active: Option<usize>,
    clipboard: Option<Emitter>,
    stats: ParticleStats,
}

impl Default for ParticleEditor {
    fn default() -> Self {
        Self {
            name: String::from("untitled"),
            emitters: Vec::with_capacity(MAX_EMITTERS),
            ids: std::array::from_fn(|i| i),
            active: None,
            clipboard: None,
            stats: ParticleStats::default(),
        }
    }
}

impl ParticleEditor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = sanitize_name(name);
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn emitters_mut(&mut self) -> &mut [Emitter] {
        &mut self.emitters
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.emitters.len() >= MAX_EMITTERS
    }

    /// Display id of the emitter at `index`.
    pub fn id(&self, index: usize) -> Option<usize> {
        (index < self.emitters.len()).then(|| self.ids[index])
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_emitter(&self) -> Option<&Emitter> {
        self.active.and_then(|i| self.emitters.get(i))
    }

    pub fn active_emitter_mut(&mut self) -> Option<&mut Emitter> {
        self.active.and_then(|i| self.emitters.get_mut(i))
    }

    pub fn clipboard(&self) -> Option<&Emitter> {
        self.clipboard.as_ref()
    }

    pub fn stats(&self) -> ParticleStats {
        self.stats
    }

    /// One-line summary of the last frame's counters and memory use.
    pub fn status_line(&self) -> String {
        format!(
            "updated {} | drawn {} | pixels {} | memory {} KiB",
            self.stats.updated,
            self.stats.drawn,
            self.stats.pixels,
            self.memory_usage() / 1024
        )
    }

    /// Rough heap and inline footprint of the emitters and clipboard.
    pub fn memory_usage(&self) -> usize {
        self.emitters
            .iter()
            .chain(self.clipboard.iter())
            .map(|e| {
                std::mem::size_of::<Emitter>()
                    + e.capacity() * std::mem::size_of::<Particle>()
                    + e.config.gradient.colors.capacity() * std::mem::size_of::<Srgba>()
                    + e.config.forces.capacity() * std::mem::size_of::<Force>()
            })
            .sum()
    }

    // -----------------------------------------------------------------------
    // Emitter list
    // -----------------------------------------------------------------------

    /// Append a new emitter with the editor defaults at `position`. Returns
    /// its index, or `None` when the effect already has the maximum.
    pub fn add_emitter(&mut self, position: Vec2, rng: &mut impl RandomSource) -> Option<usize> {
        self.push_emitter(default_emitter(position, rng))
    }

    /// Append an existing emitter. Pools over the editor's particle limit are
    /// rebuilt at the limit; smaller pools are kept.
    pub fn push_emitter(&mut self, emitter: Emitter) -> Option<usize> {
        if self.is_full() {
            warn!("Emitter limit of {} reached", MAX_EMITTERS);
            return None;
        }
        let emitter = if emitter.capacity() > MAX_PARTICLES {
            emitter.resized(MAX_PARTICLES)
        } else {
            emitter
        };
        self.emitters.push(emitter);
        Some(self.emitters.len() - 1)
    }

    /// Remove the last emitter. The selection moves up if it pointed there.
    pub fn remove_emitter(&mut self) -> Option<Emitter> {
        let removed = self.emitters.pop()?;
        let last = self.emitters.len();
        if self.active == Some(last) {
            self.active = last.checked_sub(1);
        }
        Some(removed)
    }

    /// Drop every emitter and reset ids and selection. The clipboard stays.
    pub fn clear(&mut self) {
        self.emitters.clear();
        self.ids = std::array::from_fn(|i| i);
        self.active = None;
    }

    /// Swap the active emitter with the one before it.
    pub fn move_up(&mut self) -> bool {
        match self.active {
            Some(i) if i > 0 => {
                self.swap(i, i - 1);
                self.active = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Swap the active emitter with the one after it.
    pub fn move_down(&mut self) -> bool {
        match self.active {
            Some(i) if i + 1 < self.emitters.len() => {
                self.swap(i, i + 1);
                self.active = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.emitters.swap(a, b);
        self.ids.swap(a, b);
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.emitters.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn deselect(&mut self) {
        self.active = None;
    }

    /// Select the next emitter, wrapping around; selects the first when
    /// nothing is selected.
    pub fn cycle_active(&mut self) {
        self.active = match (self.active, self.emitters.len()) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some((i + 1) % len),
        };
    }

    /// Index of the emitter closest to `point` within `radius`.
    pub fn pick(&self, point: Vec2, radius: f32) -> Option<usize> {
        self.emitters
            .iter()
            .enumerate()
            .map(|(i, e)| (i, e.position.distance(point)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    // -----------------------------------------------------------------------
    // Clipboard
    // -----------------------------------------------------------------------

    /// Copy the active emitter's settings to the clipboard.
    pub fn copy(&mut self) -> bool {
        let Some(active) = self.active_emitter() else {
            return false;
        };
        self.clipboard = Some(active.resized(0));
        true
    }

    /// Overwrite the active emitter with the clipboard settings, keeping its
    /// pool.
    pub fn paste(&mut self) -> bool {
        let Some(source) = self.clipboard.take() else {
            return false;
        };
        let pasted = match self.active_emitter_mut() {
            Some(target) => {
                target.copy_settings_from(&source);
                true
            }
            None => false,
        };
        self.clipboard = Some(source);
        pasted
    }

    // -----------------------------------------------------------------------
    // Per-frame
    // -----------------------------------------------------------------------

    /// Restart every emitter so they run in lockstep.
    pub fn sync(&mut self) {
        for emitter in &mut self.emitters {
            emitter.restart();
        }
    }

    /// Step every emitter; returns the number of particles integrated.
    pub fn update(&mut self, dt: f32, rng: &mut impl RandomSource) -> usize {
        self.stats.updated = self
            .emitters
            .iter_mut()
            .map(|e| e.update(dt, rng))
            .sum();
        self.stats.updated
    }

    /// Draw every emitter in list order.
    pub fn draw(&mut self, cull: Option<Rect>, renderer: &mut impl ParticleRenderer) -> DrawStats {
        let mut total = DrawStats::default();
        for emitter in &self.emitters {
            total += emitter.draw(cull, renderer);
        }
        self.stats.drawn = total.drawn;
        self.stats.pixels = total.pixels;
        total
    }
}

/// Replace spaces with underscores and cut to the name length limit.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_NAME_LEN - 1)
        .collect()
}

/// A pleasant random color: a golden-ratio hue spread at fixed saturation
/// and value.
pub fn random_pastel(rng: &mut impl RandomSource) -> Srgba {
    let hue = rng.index(361) as f32;
    let hue = (hue + hue * GOLDEN_RATIO_CONJUGATE) % 360.0;
    Srgba::from(Hsva::new(
        hue,
        emitter_defaults::COLOR_SATURATION,
        emitter_defaults::COLOR_VALUE,
        1.0,
    ))
}

/// The emitter a fresh "add" produces.
pub fn default_emitter(position: Vec2, rng: &mut impl RandomSource) -> Emitter {
    let (size_min, size_max) = emitter_defaults::SIZE;
    let (angle_min, angle_max) = emitter_defaults::ANGLE;
    Emitter::new(MAX_PARTICLES)
        .with_config(EmitterConfig {
            emission: emitter_defaults::EMISSION,
            size: ValueRange::new(size_min, size_max),
            scale: Ramp::constant(1.0),
            age: ValueRange::constant(emitter_defaults::AGE),
            speed: ValueRange::constant(emitter_defaults::SPEED),
            angle: ValueRange::new(angle_min, angle_max),
            gradient: Gradient::constant(random_pastel(rng)),
            ..default()
        })
        .with_position(position)
        .with_life(emitter_defaults::LIFE)
}
