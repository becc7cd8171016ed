/// Energy returned for coincident atoms.
const OVERLAP_PENALTY: f64 = 1e10;

#[inline]
pub fn lennard_jones_12_6(dist: f64, r_min: f64, well_depth: f64) -> f64 {
    if dist < 1e-6 {
        return OVERLAP_PENALTY;
    }
    let rho = r_min / dist;
    let rho6 = rho.powi(6);
    let rho12 = rho6 * rho6;
    well_depth * (rho12 - 2.0 * rho6)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn minimum_is_minus_well_depth_at_r_min() {
        assert!((lennard_jones_12_6(3.5, 3.5, 0.2) + 0.2).abs() < TOLERANCE);
    }

    #[test]
    fn repulsive_inside_and_attractive_outside() {
        assert!(lennard_jones_12_6(3.0, 3.5, 0.2) > -0.2);
        assert!(lennard_jones_12_6(2.0, 3.5, 0.2) > 0.0);
        let far = lennard_jones_12_6(10.0, 3.5, 0.2);
        assert!(far < 0.0 && far > -0.01);
    }

    #[test]
    fn coincident_atoms_are_penalized() {
        assert_eq!(lennard_jones_12_6(0.0, 3.5, 0.2), OVERLAP_PENALTY);
    }
}
