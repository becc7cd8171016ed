use super::element::Element;
use super::ids::{AtomId, Identified};
use super::island::AtomIsland;
use nalgebra::Point3;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct AtomData {
    id: AtomId,
    element: Element,
    position: Point3<f64>,
    charge: Option<f64>,
    tag: Option<String>,
}

/// An atom with referential identity.
///
/// `Atom` is a cheap handle: cloning it yields another reference to the *same*
/// atom, while every call to a constructor (including the `with_*`
/// copy-with-modification helpers) creates a distinct atom. Equality and
/// hashing follow identity, never attribute values, so two atoms at the same
/// position with the same element are still different entities.
///
/// Atoms are immutable; islands and supermolecules are derived from them and
/// hold no cached state that could go stale.
#[derive(Clone)]
pub struct Atom(Arc<AtomData>);

impl Atom {
    /// Creates a new atom without charge or tag.
    ///
    /// # Arguments
    ///
    /// * `element` - The chemical element of the atom.
    /// * `position` - Cartesian coordinates in Angstroms.
    pub fn new(element: Element, position: Point3<f64>) -> Self {
        AtomBuilder::new(element, position).build()
    }

    /// Starts building an atom with optional attributes.
    pub fn builder(element: Element, position: Point3<f64>) -> AtomBuilder {
        AtomBuilder::new(element, position)
    }

    /// The identity minted when this atom was constructed.
    pub fn id(&self) -> AtomId {
        self.0.id
    }

    pub fn element(&self) -> Element {
        self.0.element
    }

    /// Cartesian coordinates in Angstroms.
    pub fn position(&self) -> &Point3<f64> {
        &self.0.position
    }

    /// The partial charge in elementary charge units, `None` when unknown.
    pub fn charge(&self) -> Option<f64> {
        self.0.charge
    }

    /// An opaque label carried through transformations, such as a force field
    /// atom type.
    pub fn tag(&self) -> Option<&str> {
        self.0.tag.as_deref()
    }

    /// Returns a builder pre-filled with this atom's attributes.
    ///
    /// The atom produced by the builder is a new entity with its own identity.
    pub fn to_builder(&self) -> AtomBuilder {
        AtomBuilder {
            element: self.0.element,
            position: self.0.position,
            charge: self.0.charge,
            tag: self.0.tag.clone(),
        }
    }

    /// Copies this atom to a new position.
    ///
    /// # Arguments
    ///
    /// * `position` - Cartesian coordinates of the copy, in Angstroms.
    ///
    /// # Return
    ///
    /// A new atom with its own identity and the remaining attributes unchanged.
    pub fn with_position(&self, position: Point3<f64>) -> Atom {
        self.to_builder().position(position).build()
    }

    /// Copies this atom with a different partial charge; `None` clears it.
    ///
    /// # Return
    ///
    /// A new atom with its own identity.
    pub fn with_charge(&self, charge: Option<f64>) -> Atom {
        let mut builder = self.to_builder();
        builder.charge = charge;
        builder.build()
    }

    /// Copies this atom with a different tag; `None` clears it.
    ///
    /// # Return
    ///
    /// A new atom with its own identity.
    pub fn with_tag(&self, tag: Option<String>) -> Atom {
        let mut builder = self.to_builder();
        builder.tag = tag;
        builder.build()
    }

    /// The island consisting of this atom alone.
    ///
    /// Atom islands take their identity from the atom, so every call returns
    /// the same island.
    pub fn island(&self) -> AtomIsland {
        AtomIsland::new(self.clone())
    }
}

impl Identified for Atom {
    type Id = AtomId;

    fn id(&self) -> AtomId {
        self.0.id
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("id", &self.0.id)
            .field("element", &self.0.element)
            .field("position", &self.0.position)
            .field("charge", &self.0.charge)
            .field("tag", &self.0.tag)
            .finish()
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.0.element, self.0.id)
    }
}

/// Builder for [`Atom`] values with optional charge and tag.
#[derive(Debug, Clone)]
pub struct AtomBuilder {
    element: Element,
    position: Point3<f64>,
    charge: Option<f64>,
    tag: Option<String>,
}

impl AtomBuilder {
    pub fn new(element: Element, position: Point3<f64>) -> Self {
        Self {
            element,
            position,
            charge: None,
            tag: None,
        }
    }

    pub fn element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn position(mut self, position: Point3<f64>) -> Self {
        self.position = position;
        self
    }

    pub fn charge(mut self, charge: f64) -> Self {
        self.charge = Some(charge);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Finalizes the atom, assigning it a fresh identity.
    pub fn build(self) -> Atom {
        Atom(Arc::new(AtomData {
            id: AtomId::fresh(),
            element: self.element,
            position: self.position,
            charge: self.charge,
            tag: self.tag,
        }))
    }
}
