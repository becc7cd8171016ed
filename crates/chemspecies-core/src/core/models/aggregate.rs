use super::error::SpeciesError;
use super::ids::Identified;
use std::collections::{HashMap, HashSet};

/// An ordered collection of referentially distinct members.
///
/// Membership is decided by [`Identified::id`], so two members that look alike
/// are both kept while the same member listed twice is rejected.
#[derive(Debug, Clone)]
pub struct Aggregate<S: Identified> {
    members: Vec<S>,
    index: HashMap<S::Id, usize>,
}

impl<S: Identified> Aggregate<S> {
    /// # Errors
    ///
    /// Returns [`SpeciesError::DuplicateMember`] if a member occurs twice.
    pub fn new(members: impl IntoIterator<Item = S>) -> Result<Self, SpeciesError> {
        let members: Vec<S> = members.into_iter().collect();
        let mut index = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            if index.insert(member.id(), position).is_some() {
                return Err(SpeciesError::DuplicateMember(member.id().to_string()));
            }
        }
        Ok(Self { members, index })
    }

    pub fn members(&self) -> &[S] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: &S) -> bool {
        self.index.contains_key(&member.id())
    }

    pub fn position(&self, id: S::Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: S::Id) -> Option<&S> {
        self.position(id).map(|position| &self.members[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.members.iter()
    }
}

impl<S: Identified + Clone> Aggregate<S> {
    /// Returns a new aggregate without the given members, keeping the order
    /// of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesError::MemberNotFound`] if any of `removed` is not a
    /// member.
    pub fn minus(&self, removed: &[S]) -> Result<Self, SpeciesError> {
        let mut doomed = HashSet::with_capacity(removed.len());
        for member in removed {
            if !self.contains(member) {
                return Err(SpeciesError::MemberNotFound(member.id().to_string()));
            }
            doomed.insert(member.id());
        }
        let members: Vec<S> = self
            .members
            .iter()
            .filter(|member| !doomed.contains(&member.id()))
            .cloned()
            .collect();
        let index = members
            .iter()
            .enumerate()
            .map(|(position, member)| (member.id(), position))
            .collect();
        Ok(Self { members, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use nalgebra::Point3;

    fn atom() -> Atom {
        Atom::new(Element::O, Point3::origin())
    }

    #[test]
    fn aggregate_accepts_distinct_members() {
        let (a, b) = (atom(), atom());
        let aggregate = Aggregate::new([a.clone(), b.clone()]).unwrap();

        assert_eq!(aggregate.len(), 2);
        assert!(aggregate.contains(&a));
        assert_eq!(aggregate.position(b.id()), Some(1));
        assert_eq!(aggregate.get(a.id()), Some(&a));
        assert!(!aggregate.contains(&atom()));
    }

    #[test]
    fn aggregate_rejects_repeated_member() {
        let a = atom();
        let result = Aggregate::new([a.clone(), a.clone()]);
        assert_eq!(
            result.unwrap_err(),
            SpeciesError::DuplicateMember(a.id().to_string())
        );
    }

    #[test]
    fn minus_removes_by_identity_and_keeps_order() {
        let (a, b, c) = (atom(), atom(), atom());
        let aggregate = Aggregate::new([a.clone(), b.clone(), c.clone()]).unwrap();

        let rest = aggregate.minus(std::slice::from_ref(&b)).unwrap();
        assert_eq!(rest.members(), &[a.clone(), c.clone()]);
        assert_eq!(rest.position(c.id()), Some(1));
        assert!(!rest.contains(&b));
        assert_eq!(aggregate.len(), 3);
    }

    #[test]
    fn minus_fails_for_unknown_member() {
        let aggregate = Aggregate::new([atom()]).unwrap();
        let stranger = atom();
        assert_eq!(
            aggregate.minus(&[stranger.clone()]).unwrap_err(),
            SpeciesError::MemberNotFound(stranger.id().to_string())
        );
    }
}
