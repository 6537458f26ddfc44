//! Atom identifiers and the dimensionless register.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Unique identifier for an atom within a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AtomId(pub u32);

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

impl From<u32> for AtomId {
    fn from(id: u32) -> Self {
        AtomId(id)
    }
}

/// A set of atoms placed at dimensionless 2D coordinates.
///
/// Positions are unit-free: the compiler multiplies them by the distance
/// scale of the chosen converter to obtain micrometres. Atom order is kept
/// as given so that physical registers list atoms in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(AtomId, [f64; 2])>", into = "Vec<(AtomId, [f64; 2])>")]
pub struct Register {
    atoms: Vec<(AtomId, [f64; 2])>,
}

impl Register {
    /// Create a register from explicit ids and coordinates.
    ///
    /// Fails on duplicate ids, non-finite coordinates, or coincident atoms.
    pub fn new(atoms: Vec<(AtomId, [f64; 2])>) -> IrResult<Self> {
        let mut seen = FxHashSet::default();
        for &(id, [x, y]) in &atoms {
            if !x.is_finite() || !y.is_finite() {
                return Err(IrError::NonFiniteCoordinate(id));
            }
            if !seen.insert(id) {
                return Err(IrError::DuplicateAtom(id));
            }
        }

        let register = Self { atoms };
        if let Some(((first, _), (second, _), _)) = register
            .pairs()
            .find(|(_, _, distance)| *distance == 0.0)
        {
            return Err(IrError::CoincidentAtoms { first, second });
        }
        Ok(register)
    }

    /// Create a register from coordinates, numbering atoms `0..n`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_coordinates(coords: impl IntoIterator<Item = [f64; 2]>) -> IrResult<Self> {
        let atoms = coords
            .into_iter()
            .enumerate()
            .map(|(i, c)| (AtomId(i as u32), c))
            .collect();
        Self::new(atoms)
    }

    /// A register without atoms.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of atoms.
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Check if the register has no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Atoms and their dimensionless coordinates, in insertion order.
    pub fn atoms(&self) -> &[(AtomId, [f64; 2])] {
        &self.atoms
    }

    /// Coordinates of one atom.
    pub fn position(&self, id: AtomId) -> Option<[f64; 2]> {
        self.atoms.iter().find(|(a, _)| *a == id).map(|(_, c)| *c)
    }

    /// Smallest distance between any two atoms.
    ///
    /// `None` for registers with fewer than two atoms, where no spacing
    /// constraint applies.
    pub fn min_pairwise_distance(&self) -> Option<f64> {
        self.pairs().map(|(_, _, d)| d).reduce(f64::min)
    }

    /// All pairwise distances as `(a, b, distance)` with `a` before `b`.
    pub fn distances(&self) -> Vec<(AtomId, AtomId, f64)> {
        self.pairs().map(|((a, _), (b, _), d)| (a, b, d)).collect()
    }

    /// Largest distance of any atom from the origin.
    pub fn max_radial_distance(&self) -> f64 {
        self.atoms
            .iter()
            .map(|(_, [x, y])| x.hypot(*y))
            .fold(0.0, f64::max)
    }

    /// Coordinates multiplied by `factor`, e.g. a distance scale.
    pub fn scaled(&self, factor: f64) -> Vec<(AtomId, [f64; 2])> {
        self.atoms
            .iter()
            .map(|&(id, [x, y])| (id, [x * factor, y * factor]))
            .collect()
    }

    fn pairs(&self) -> impl Iterator<Item = ((AtomId, [f64; 2]), (AtomId, [f64; 2]), f64)> + '_ {
        self.atoms.iter().enumerate().flat_map(move |(i, &a)| {
            self.atoms[i + 1..].iter().map(move |&b| {
                let distance = (a.1[0] - b.1[0]).hypot(a.1[1] - b.1[1]);
                (a, b, distance)
            })
        })
    }
}

impl TryFrom<Vec<(AtomId, [f64; 2])>> for Register {
    type Error = IrError;

    fn try_from(atoms: Vec<(AtomId, [f64; 2])>) -> IrResult<Self> {
        Self::new(atoms)
    }
}

impl From<Register> for Vec<(AtomId, [f64; 2])> {
    fn from(register: Register) -> Self {
        register.atoms
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register(n_atoms = {})", self.n_atoms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coordinates_assigns_ids() {
        let reg = Register::from_coordinates([[0.0, 0.0], [1.0, 0.0], [0.0, 2.0]]).unwrap();
        assert_eq!(reg.n_atoms(), 3);
        assert_eq!(reg.atoms()[2].0, AtomId(2));
        assert_eq!(reg.position(AtomId(1)), Some([1.0, 0.0]));
    }

    #[test]
    fn test_min_pairwise_distance() {
        let reg = Register::from_coordinates([[0.0, 0.0], [3.0, 4.0], [0.0, 1.5]]).unwrap();
        assert!((reg.min_pairwise_distance().unwrap() - 1.5).abs() < 1e-12);
        assert_eq!(reg.distances().len(), 3);
    }

    #[test]
    fn test_min_distance_needs_two_atoms() {
        assert_eq!(Register::empty().min_pairwise_distance(), None);
        let single = Register::from_coordinates([[2.0, 2.0]]).unwrap();
        assert_eq!(single.min_pairwise_distance(), None);
    }

    #[test]
    fn test_rejects_coincident_atoms() {
        let err = Register::from_coordinates([[1.0, 1.0], [0.0, 0.0], [1.0, 1.0]]).unwrap_err();
        assert!(matches!(
            err,
            IrError::CoincidentAtoms {
                first: AtomId(0),
                second: AtomId(2)
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids_and_nan() {
        let dup = Register::new(vec![(AtomId(1), [0.0, 0.0]), (AtomId(1), [1.0, 0.0])]);
        assert!(matches!(dup, Err(IrError::DuplicateAtom(AtomId(1)))));

        let nan = Register::from_coordinates([[f64::NAN, 0.0]]);
        assert!(matches!(nan, Err(IrError::NonFiniteCoordinate(_))));
    }

    #[test]
    fn test_scaled_and_radial() {
        let reg = Register::from_coordinates([[0.0, 0.0], [3.0, 4.0]]).unwrap();
        assert!((reg.max_radial_distance() - 5.0).abs() < 1e-12);
        let scaled = reg.scaled(2.0);
        assert_eq!(scaled[1].1, [6.0, 8.0]);
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"[[0, [0.0, 0.0]], [1, [0.0, 0.0]]]"#;
        let parsed: Result<Register, _> = serde_json::from_str(json);
        assert!(parsed.is_err());

        let json = r#"[[0, [0.0, 0.0]], [1, [1.0, 0.0]]]"#;
        let reg: Register = serde_json::from_str(json).unwrap();
        assert_eq!(reg.n_atoms(), 2);
    }
}
