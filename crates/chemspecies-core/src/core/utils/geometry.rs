use crate::core::models::atom::Atom;
use nalgebra::{Point3, Vector3};

/// Unweighted geometric center of `atoms`, or `None` for an empty slice.
pub fn centroid(atoms: &[Atom]) -> Option<Point3<f64>> {
    if atoms.is_empty() {
        return None;
    }
    let sum = atoms
        .iter()
        .fold(Vector3::zeros(), |acc, atom| acc + atom.position().coords);
    Some(Point3::from(sum / atoms.len() as f64))
}

/// A new atom displaced by `offset`, otherwise identical to `atom`.
pub fn translate(atom: &Atom, offset: &Vector3<f64>) -> Atom {
    atom.with_position(atom.position() + offset)
}

pub fn distance(a: &Atom, b: &Atom) -> f64 {
    nalgebra::distance(a.position(), b.position())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::Element;

    #[test]
    fn centroid_averages_positions() {
        let atoms = vec![
            Atom::new(Element::C, Point3::new(0.0, 0.0, 0.0)),
            Atom::new(Element::C, Point3::new(2.0, 4.0, -6.0)),
        ];
        assert_eq!(centroid(&atoms), Some(Point3::new(1.0, 2.0, -3.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn translate_creates_a_moved_copy() {
        let atom = Atom::builder(Element::N, Point3::new(1.0, 1.0, 1.0))
            .charge(-0.5)
            .build();
        let moved = translate(&atom, &Vector3::new(1.0, 0.0, -1.0));

        assert_eq!(moved.position(), &Point3::new(2.0, 1.0, 0.0));
        assert_eq!(moved.charge(), Some(-0.5));
        assert_ne!(moved, atom);
        assert!((distance(&atom, &moved) - 2f64.sqrt()).abs() < 1e-12);
    }
}
