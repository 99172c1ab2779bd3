//! Spherical quadrangle, the single tile shape of a paving.

use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four corners of a quadrangle, in clockwise order.
///
/// The angle at a corner sits at the start of the side with the same index:
/// `Alpha` is between sides `d` and `a`, `Beta` between `a` and `b`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    Alpha,
    Beta,
    Gamma,
    Delta,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Alpha, Corner::Beta, Corner::Gamma, Corner::Delta];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Corner at `index`, taken modulo 4.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// The next corner clockwise.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The previous corner clockwise.
    pub fn prev(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Corner::Alpha => "alpha",
            Corner::Beta => "beta",
            Corner::Gamma => "gamma",
            Corner::Delta => "delta",
        };
        f.write_str(name)
    }
}

/// A spherical quadrangle given by its four side lengths and four corner
/// angles, all in radians.
///
/// Both arrays run clockwise: sides `[a, b, c, d]`, angles
/// `[alpha, beta, gamma, delta]`. Nothing is derived from anything else, so
/// the caller is responsible for supplying a consistent shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrangle {
    sides: [f64; 4],
    angles: [f64; 4],
}

impl Quadrangle {
    pub fn new(sides: [f64; 4], angles: [f64; 4]) -> Self {
        Self { sides, angles }
    }

    /// All four sides equal and all four angles equal.
    pub fn regular(side: f64, angle: f64) -> Self {
        Self::new([side; 4], [angle; 4])
    }

    pub fn a(&self) -> f64 { self.sides[0] }
    pub fn b(&self) -> f64 { self.sides[1] }
    pub fn c(&self) -> f64 { self.sides[2] }
    pub fn d(&self) -> f64 { self.sides[3] }

    pub fn alpha(&self) -> f64 { self.angles[0] }
    pub fn beta(&self) -> f64 { self.angles[1] }
    pub fn gamma(&self) -> f64 { self.angles[2] }
    pub fn delta(&self) -> f64 { self.angles[3] }

    pub fn sides(&self) -> &[f64; 4] {
        &self.sides
    }

    pub fn angles(&self) -> &[f64; 4] {
        &self.angles
    }

    /// Length of side `index`, taken modulo 4 (`0` is `a`).
    pub fn side(&self, index: usize) -> f64 {
        self.sides[index % 4]
    }

    pub fn angle(&self, corner: Corner) -> f64 {
        self.angles[corner.index()]
    }

    /// Side on the left of `corner` when looking into the quadrangle,
    /// i.e. the side that ends there.
    pub fn left_side(&self, corner: Corner) -> f64 {
        self.sides[corner.prev().index()]
    }

    /// Side on the right of `corner`, i.e. the side that starts there.
    pub fn right_side(&self, corner: Corner) -> f64 {
        self.sides[corner.index()]
    }

    /// Relabel the quadrangle so that side `k` becomes `a` and corner `k`
    /// becomes `alpha`. `rotate(4)` is the identity.
    pub fn rotate(&self, k: usize) -> Self {
        let mut sides = self.sides;
        let mut angles = self.angles;
        sides.rotate_left(k % 4);
        angles.rotate_left(k % 4);
        Self { sides, angles }
    }

    /// Spherical excess: sum of the angles minus a full turn.
    pub fn area(&self) -> f64 {
        self.angles.iter().sum::<f64>() - TAU
    }
}
