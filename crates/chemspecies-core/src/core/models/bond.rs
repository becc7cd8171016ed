use super::atom::Atom;
use super::error::SpeciesError;
use super::ids::{AtomId, BondId, Identified};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Bond type label, using the Tripos vocabulary where one applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BondType {
    #[default]
    Single,
    Double,
    Triple,
    Amide,
    Aromatic,
    Dummy,
    Unknown,
    NotConnected,
    /// Any other non-empty label, kept verbatim.
    Other(String),
}

impl BondType {
    /// How many times a bond of this type is listed in connectivity records
    /// that encode order by repetition (PDB `CONECT`).
    pub fn multiplicity(&self) -> usize {
        match self {
            Self::Double => 2,
            Self::Triple => 3,
            _ => 1,
        }
    }

    /// The bond type encoded by `count` repeated listings.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of listings; zero is treated as one and anything
    ///   above three as three.
    pub fn from_multiplicity(count: usize) -> Self {
        match count {
            0 | 1 => Self::Single,
            2 => Self::Double,
            _ => Self::Triple,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Bond type label must not be empty")]
pub struct ParseBondTypeError;

impl FromStr for BondType {
    type Err = ParseBondTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseBondTypeError);
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "1" | "s" | "single" => Self::Single,
            "2" | "d" | "double" => Self::Double,
            "3" | "t" | "triple" => Self::Triple,
            "am" | "amide" => Self::Amide,
            "ar" | "aromatic" => Self::Aromatic,
            "du" | "dummy" => Self::Dummy,
            "un" | "unknown" => Self::Unknown,
            "nc" => Self::NotConnected,
            _ => Self::Other(trimmed.to_string()),
        })
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "1",
            Self::Double => "2",
            Self::Triple => "3",
            Self::Amide => "am",
            Self::Aromatic => "ar",
            Self::Dummy => "du",
            Self::Unknown => "un",
            Self::NotConnected => "nc",
            Self::Other(label) => label,
        })
    }
}

#[derive(Debug)]
struct BondData {
    id: BondId,
    atoms: [Atom; 2],
    bond_type: BondType,
}

/// A bond between two distinct atoms.
///
/// Like [`Atom`], a `Bond` is a shared handle with its own identity
/// ([`Bond::id`]). Equality (`==`) compares the unordered atom pair and the
/// bond type, which is what format exporters and tests usually want; use
/// [`Bond::ptr_eq`] or the id to ask whether two handles are the same bond.
#[derive(Clone)]
pub struct Bond(Arc<BondData>);

impl Bond {
    /// Creates a bond between `atom1` and `atom2`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesError::SelfBond`] if both arguments are the same atom.
    pub fn new(atom1: Atom, atom2: Atom, bond_type: BondType) -> Result<Self, SpeciesError> {
        if atom1 == atom2 {
            return Err(SpeciesError::SelfBond(atom1.id()));
        }
        Ok(Self(Arc::new(BondData {
            id: BondId::fresh(),
            atoms: [atom1, atom2],
            bond_type,
        })))
    }

    /// The identity minted when this bond was constructed.
    pub fn id(&self) -> BondId {
        self.0.id
    }

    pub fn bond_type(&self) -> &BondType {
        &self.0.bond_type
    }

    /// The origin atom, as passed first to [`Bond::new`].
    pub fn atom1(&self) -> &Atom {
        &self.0.atoms[0]
    }

    /// The target atom, as passed second to [`Bond::new`].
    pub fn atom2(&self) -> &Atom {
        &self.0.atoms[1]
    }

    /// The two atoms in construction order (origin, target).
    pub fn to_atom_pair(&self) -> (Atom, Atom) {
        (self.0.atoms[0].clone(), self.0.atoms[1].clone())
    }

    /// The atom identities ordered so that `(a, b)` and `(b, a)` bonds share
    /// one key.
    pub fn atom_pair_key(&self) -> (AtomId, AtomId) {
        let a = self.0.atoms[0].id();
        let b = self.0.atoms[1].id();
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Whether `atom` is one of the two bonded atoms.
    ///
    /// # Arguments
    ///
    /// * `atom` - The atom to look for, compared by identity.
    pub fn contains(&self, atom: &Atom) -> bool {
        self.0.atoms[0] == *atom || self.0.atoms[1] == *atom
    }

    /// The partner of `atom` across this bond, if `atom` is part of it.
    pub fn other(&self, atom: &Atom) -> Option<&Atom> {
        if self.0.atoms[0] == *atom {
            Some(&self.0.atoms[1])
        } else if self.0.atoms[1] == *atom {
            Some(&self.0.atoms[0])
        } else {
            None
        }
    }

    /// Whether both bonds join the same two atoms, ignoring type and direction.
    pub fn shares_atom_pair(&self, other: &Bond) -> bool {
        self.atom_pair_key() == other.atom_pair_key()
    }

    /// Whether `a` and `b` are handles to the same bond.
    ///
    /// # Return
    ///
    /// `true` only for shared identity; two bonds built separately over the
    /// same atoms are `==` but not `ptr_eq`.
    pub fn ptr_eq(a: &Bond, b: &Bond) -> bool {
        a.0.id == b.0.id
    }
}

impl Identified for Bond {
    type Id = BondId;

    fn id(&self) -> BondId {
        self.0.id
    }
}

impl PartialEq for Bond {
    fn eq(&self, other: &Self) -> bool {
        self.atom_pair_key() == other.atom_pair_key() && self.0.bond_type == other.0.bond_type
    }
}

impl Eq for Bond {}

impl Hash for Bond {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.atom_pair_key().hash(state);
        self.0.bond_type.hash(state);
    }
}

impl fmt::Debug for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bond")
            .field("id", &self.0.id)
            .field("atom1", &self.0.atoms[0].id())
            .field("atom2", &self.0.atoms[1].id())
            .field("bond_type", &self.0.bond_type)
            .finish()
    }
}
