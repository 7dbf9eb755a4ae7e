//! Planar math and the eight compass facings

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector in logical arena units (screen space, +y points south)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, 0 = east, clockwise on screen)
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Angle of the segment from `self` to `other`, in radians
    pub fn angle_to(self, other: Vec2) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON {
            Self::ZERO
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// One of the eight compass facings.
///
/// Declaration order is `[e, se, s, sw, w, nw, n, ne]` and must not change:
/// animation frame banks are indexed by [`Facing::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    N,
    Ne,
}

impl Facing {
    /// All facings in frame-bank order
    pub const ALL: [Facing; 8] = [
        Facing::E,
        Facing::Se,
        Facing::S,
        Facing::Sw,
        Facing::W,
        Facing::Nw,
        Facing::N,
        Facing::Ne,
    ];

    /// Frame-bank index
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bin an angle (radians) into the facing whose 45° sector contains it.
    ///
    /// Sector boundaries sit at ±22.5° around each compass point; the lower
    /// boundary is inclusive.
    pub fn from_angle(angle: f32) -> Self {
        let degrees = angle.to_degrees();
        let sector = ((degrees + 22.5).rem_euclid(360.0) / 45.0).floor() as usize;
        Self::ALL[sector % 8]
    }

    /// Center angle of this facing, in radians
    pub fn angle(self) -> f32 {
        self.index() as f32 * (PI / 4.0)
    }

    /// Unit vector for this facing
    pub fn unit(self) -> Vec2 {
        Vec2::from_angle(self.angle())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facing::E => "e",
            Facing::Se => "se",
            Facing::S => "s",
            Facing::Sw => "sw",
            Facing::W => "w",
            Facing::Nw => "nw",
            Facing::N => "n",
            Facing::Ne => "ne",
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shortest signed difference `to - from` in degrees, wrapped into `[-180, 180)`
pub fn shortest_angle_deg(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Axis-aligned rectangle that keeps combatants inside the arena walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Clamp a body of radius `radius` centered at `point` inside the bounds
    pub fn clamp(&self, point: Vec2, radius: f32) -> Vec2 {
        let lo_x = self.min.x + radius;
        let hi_x = (self.max.x - radius).max(lo_x);
        let lo_y = self.min.y + radius;
        let hi_y = (self.max.y - radius).max(lo_y);
        Vec2::new(point.x.clamp(lo_x, hi_x), point.y.clamp(lo_y, hi_y))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Vec2::new(135.0, 165.0), Vec2::new(1368.0, 818.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_order_is_frame_bank_order() {
        let names: Vec<&str> = Facing::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, ["e", "se", "s", "sw", "w", "nw", "n", "ne"]);
        assert_eq!(Facing::Nw.index(), 5);
    }

    #[test]
    fn test_facing_from_angle_sector_edges() {
        assert_eq!(Facing::from_angle(0.0), Facing::E);
        assert_eq!(Facing::from_angle(22.5f32.to_radians()), Facing::Se);
        assert_eq!(Facing::from_angle((-22.5f32).to_radians()), Facing::E);
        assert_eq!(Facing::from_angle(90f32.to_radians()), Facing::S);
        assert_eq!(Facing::from_angle(PI), Facing::W);
        assert_eq!(Facing::from_angle(-PI), Facing::W);
        assert_eq!(Facing::from_angle((-157.5f32).to_radians()), Facing::Nw);
        assert_eq!(Facing::from_angle((-90f32).to_radians()), Facing::N);
        assert_eq!(Facing::from_angle((-45f32).to_radians()), Facing::Ne);
    }

    #[test]
    fn test_facing_angle_roundtrips_through_bins() {
        for facing in Facing::ALL {
            assert_eq!(Facing::from_angle(facing.angle()), facing);
        }
    }

    #[test]
    fn test_shortest_angle_wraps() {
        assert!((shortest_angle_deg(170.0, -170.0) - 20.0).abs() < 1e-4);
        assert!((shortest_angle_deg(-170.0, 170.0) + 20.0).abs() < 1e-4);
        assert!((shortest_angle_deg(0.0, 45.0) - 45.0).abs() < 1e-4);
        assert!(shortest_angle_deg(90.0, 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_clamp_respects_radius() {
        let bounds = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let p = bounds.clamp(Vec2::new(-50.0, 500.0), 10.0);
        assert_eq!(p, Vec2::new(10.0, 90.0));
    }
}
