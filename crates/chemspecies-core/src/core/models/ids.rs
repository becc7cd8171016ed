use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

fn next_identity() -> u64 {
    NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed)
}

macro_rules! identity_type {
    ($($(#[$meta:meta])* $vis:vis struct $name:ident => $label:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            $vis struct $name(u64);

            impl $name {
                pub(crate) fn fresh() -> Self {
                    Self(next_identity())
                }

                /// Returns the raw sequence number behind this identity.
                pub fn raw(self) -> u64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($label, "#{}"), self.0)
                }
            }
        )*
    };
}

identity_type! {
    /// Identity of an [`Atom`](super::atom::Atom) instance.
    pub struct AtomId => "atom";
    /// Identity of a [`Bond`](super::bond::Bond) instance.
    pub struct BondId => "bond";
    /// Identity of an [`Island`](super::island::Island).
    pub struct IslandId => "island";
}

// Atoms and molecules draw from one counter, so an atom island can reuse its
// atom's number without colliding with any molecule.
impl From<AtomId> for IslandId {
    fn from(id: AtomId) -> Self {
        IslandId(id.0)
    }
}

/// Something that carries a referential identity.
///
/// Two values are the "same" entity exactly when their identities are equal,
/// regardless of how similar their attributes look.
pub trait Identified {
    type Id: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display;

    fn id(&self) -> Self::Id;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_identities_are_unique_and_increasing() {
        let a = AtomId::fresh();
        let b = AtomId::fresh();
        let c = BondId::fresh();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
        assert!(c.raw() > b.raw());
    }

    #[test]
    fn island_id_from_atom_id_keeps_sequence_number() {
        let atom = AtomId::fresh();
        let island = IslandId::from(atom);
        assert_eq!(island.raw(), atom.raw());
    }

    #[test]
    fn display_includes_kind_and_number() {
        let id = AtomId(42);
        assert_eq!(id.to_string(), "atom#42");
        assert_eq!(IslandId(7).to_string(), "island#7");
    }
}
