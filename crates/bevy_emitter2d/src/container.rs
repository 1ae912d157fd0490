//! Spawn geometry: where a new particle starts and which way it heads.

use bevy::prelude::*;

use crate::config::Container;
use crate::random::RandomSource;

/// Container-local spawn sample, before offset jitter and emitter translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub origin: Vec2,
    /// Unit direction of travel (zero for fully degenerate rectangles).
    pub direction: Vec2,
    /// Spawn angle in degrees. Negated for particles leaving the inner edge
    /// of a ring.
    pub angle: f32,
}

/// Wrap `angle` (degrees) into `[0, 360)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Rotate `point` around `center` by `degrees`, counter-clockwise.
pub fn rotate_point(center: Vec2, point: Vec2, degrees: f32) -> Vec2 {
    center + Vec2::from_angle(degrees.to_radians()).rotate(point - center)
}

/// One of eight 45 degree octants, counter-clockwise from +X.
fn octant(angle: f32) -> usize {
    (normalize_angle(angle) / 45.0) as usize % 8
}

impl Container {
    /// Sample a spawn point for a particle launched at `angle` degrees.
    pub fn sample(&self, angle: f32, spawn_inside: bool, rng: &mut impl RandomSource) -> SpawnPoint {
        let unit = Vec2::from_angle(angle.to_radians());

        match *self {
            Self::Point => SpawnPoint {
                origin: Vec2::ZERO,
                direction: unit,
                angle,
            },

            Self::Rect { width, height } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                let origin = if spawn_inside {
                    Vec2::new(rng.range(-hw, hw), rng.range(-hh, hh))
                } else {
                    rect_edge_point(hw, hh, angle)
                };
                SpawnPoint {
                    origin,
                    direction: (unit * Vec2::new(width, height)).normalize_or_zero(),
                    angle,
                }
            }

            Self::Circle { radius } => {
                let distance = if spawn_inside {
                    rng.range(0.0, radius)
                } else {
                    radius
                };
                SpawnPoint {
                    origin: unit * distance,
                    direction: unit,
                    angle,
                }
            }

            Self::Ring { inner, outer } => {
                let (inner, outer) = if inner > outer {
                    (outer, inner)
                } else {
                    (inner, outer)
                };

                if spawn_inside {
                    SpawnPoint {
                        origin: unit * rng.range(inner, outer),
                        direction: unit,
                        angle,
                    }
                } else if rng.next_f32() >= 0.5 {
                    SpawnPoint {
                        origin: unit * outer,
                        direction: unit,
                        angle,
                    }
                } else {
                    SpawnPoint {
                        origin: unit * inner,
                        direction: -unit,
                        angle: -angle,
                    }
                }
            }
        }
    }
}

/// Point on the rectangle outline for `angle`.
///
/// The angle is split into 45 degree octants and the octant-local progress
/// interpolates between the two adjacent corner coordinates. This is not a
/// true ray/rectangle intersection; spawn patterns depend on it as is.
fn rect_edge_point(hw: f32, hh: f32, angle: f32) -> Vec2 {
    let q = octant(angle);
    let pc = normalize_angle(angle) % 45.0 / 45.0;

    let xs = [
        hw,
        hw * (1.0 - pc),
        -hw * pc,
        -hw,
        -hw,
        -hw * (1.0 - pc),
        hw * pc,
        hw,
    ];
    let ys = [
        hh * pc,
        hh,
        hh,
        hh * (1.0 - pc),
        -hh * pc,
        -hh,
        -hh,
        -hh * (1.0 - pc),
    ];

    Vec2::new(xs[q], ys[q])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> fastrand::Rng {
        fastrand::Rng::with_seed(0x5eed)
    }

    #[test]
    fn point_spawns_at_origin_along_angle() {
        let s = Container::Point.sample(180.0, false, &mut rng());
        assert_eq!(s.origin, Vec2::ZERO);
        assert!((s.direction - Vec2::NEG_X).length() < 1e-5);
    }

    #[test]
    fn circle_outline_spawns_at_radius() {
        let mut rng = rng();
        let circle = Container::Circle { radius: 25.0 };
        for _ in 0..200 {
            let angle = rng.range(0.0, 360.0);
            let s = circle.sample(angle, false, &mut rng);
            assert!((s.origin.length() - 25.0).abs() < 1e-3);
            assert!((s.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn circle_inside_stays_within_radius() {
        let mut rng = rng();
        let circle = Container::Circle { radius: 10.0 };
        for _ in 0..200 {
            let angle = rng.range(0.0, 360.0);
            let s = circle.sample(angle, true, &mut rng);
            assert!(s.origin.length() <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn ring_outline_splits_between_edges() {
        let mut rng = rng();
        // Radii given in the wrong order on purpose.
        let ring = Container::Ring { inner: 40.0, outer: 10.0 };
        let trials = 4000;
        let mut inner_hits = 0;
        for _ in 0..trials {
            let s = ring.sample(30.0, false, &mut rng);
            let r = s.origin.length();
            if (r - 10.0).abs() < 1e-3 {
                inner_hits += 1;
                // Inner spawns head back toward the center.
                assert!(s.direction.dot(s.origin) < 0.0);
                assert_eq!(s.angle, -30.0);
            } else {
                assert!((r - 40.0).abs() < 1e-3);
                assert!(s.direction.dot(s.origin) > 0.0);
            }
        }
        let ratio = inner_hits as f32 / trials as f32;
        assert!((0.45..0.55).contains(&ratio), "inner ratio {}", ratio);
    }

    #[test]
    fn ring_inside_stays_between_radii() {
        let mut rng = rng();
        let ring = Container::Ring { inner: 5.0, outer: 15.0 };
        for _ in 0..200 {
            let r = ring.sample(rng.range(0.0, 360.0), true, &mut rng).origin.length();
            assert!((5.0 - 1e-3..=15.0 + 1e-3).contains(&r));
        }
    }

    #[test]
    fn rect_outline_lands_on_perimeter() {
        let mut rng = rng();
        let rect = Container::Rect { width: 40.0, height: 20.0 };
        for _ in 0..500 {
            let s = rect.sample(rng.range(-720.0, 720.0), false, &mut rng);
            let on_vertical = (s.origin.x.abs() - 20.0).abs() < 1e-3 && s.origin.y.abs() <= 10.0 + 1e-3;
            let on_horizontal = (s.origin.y.abs() - 10.0).abs() < 1e-3 && s.origin.x.abs() <= 20.0 + 1e-3;
            assert!(on_vertical || on_horizontal, "{:?} not on outline", s.origin);
        }
    }

    #[test]
    fn rect_octants_interpolate_corners() {
        let rect = Container::Rect { width: 40.0, height: 20.0 };
        let mut rng = rng();
        let at = |a: f32, rng: &mut fastrand::Rng| rect.sample(a, false, rng).origin;

        assert_eq!(at(0.0, &mut rng), Vec2::new(20.0, 0.0));
        assert_eq!(at(45.0, &mut rng), Vec2::new(20.0, 10.0));
        assert_eq!(at(90.0, &mut rng), Vec2::new(0.0, 10.0));
        assert_eq!(at(22.5, &mut rng), Vec2::new(20.0, 5.0));
        assert_eq!(at(-90.0, &mut rng), Vec2::new(0.0, -10.0));
    }

    #[test]
    fn rect_direction_is_stretched_by_shape() {
        let rect = Container::Rect { width: 100.0, height: 1.0 };
        let s = rect.sample(45.0, false, &mut rng());
        assert!((s.direction.length() - 1.0).abs() < 1e-5);
        assert!(s.direction.x > 0.99);
    }

    #[test]
    fn rect_inside_stays_in_bounds() {
        let mut rng = rng();
        let rect = Container::Rect { width: 8.0, height: 4.0 };
        for _ in 0..200 {
            let o = rect.sample(0.0, true, &mut rng).origin;
            assert!(o.x.abs() <= 4.0 && o.y.abs() <= 2.0);
        }
    }

    #[test]
    fn rotate_point_quarter_turn() {
        let p = rotate_point(Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0), 90.0);
        assert!((p - Vec2::new(1.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn normalize_angle_wraps() {
        assert_eq!(normalize_angle(370.0), 10.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(360.0), 0.0);
    }
}
