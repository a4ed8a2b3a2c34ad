//! Cyclic turn order.
//!
//! A [`Chain`] remembers every member it has ever held, in seating order,
//! each flagged active or inactive. Removing a member only deactivates it, so
//! adding it back restores its original seat instead of appending it. This
//! covers players who drop out for good as well as players skipped for a
//! round.
//!
//! ```
//! use tabletop_engine::chain::Chain;
//!
//! let mut order = Chain::new(["a", "b", "c"]);
//! order.remove(&"b");
//! assert_eq!(order.next(&"a"), Some(&"c"));
//! order.add("b");
//! assert_eq!(order.next(&"a"), Some(&"b"));
//! ```

use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Seat<T> {
    member: T,
    active: bool,
}

/// Ordered ring of unique members with activation flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain<T> {
    seats: Vec<Seat<T>>,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self { seats: Vec::new() }
    }
}

impl<T: PartialEq> Chain<T> {
    /// Build a chain with every member active. Repeated members are kept once.
    pub fn new(members: impl IntoIterator<Item = T>) -> Self {
        let mut chain = Self::default();
        for member in members {
            chain.add(member);
        }
        chain
    }

    fn position(&self, member: &T) -> Option<usize> {
        self.seats.iter().position(|seat| seat.member == *member)
    }

    /// The first active member after `current`, wrapping around.
    ///
    /// Works even if `current` has been removed. Returns `None` if `current`
    /// was never in the chain or no member is active.
    #[must_use]
    pub fn next(&self, current: &T) -> Option<&T> {
        let start = self.position(current)?;
        let n = self.seats.len();
        (1..=n)
            .map(|step| &self.seats[(start + step) % n])
            .find(|seat| seat.active)
            .map(|seat| &seat.member)
    }

    /// The first active member before `current`, wrapping around.
    #[must_use]
    pub fn prev(&self, current: &T) -> Option<&T> {
        let start = self.position(current)?;
        let n = self.seats.len();
        (1..=n)
            .map(|step| &self.seats[(start + n - step) % n])
            .find(|seat| seat.active)
            .map(|seat| &seat.member)
    }

    /// Deactivate a member, keeping its seat. Returns `false` if unknown.
    pub fn remove(&mut self, member: &T) -> bool {
        match self.position(member) {
            Some(i) => {
                self.seats[i].active = false;
                true
            }
            None => false,
        }
    }

    /// Reactivate a member in its old seat, or seat it at the end.
    pub fn add(&mut self, member: T) {
        match self.position(&member) {
            Some(i) => self.seats[i].active = true,
            None => self.seats.push(Seat {
                member,
                active: true,
            }),
        }
    }

    /// Whether `member` is currently active.
    #[must_use]
    pub fn contains(&self, member: &T) -> bool {
        self.position(member).is_some_and(|i| self.seats[i].active)
    }

    /// Reorder every seat, active or not.
    pub fn sort_by(&mut self, mut compare: impl FnMut(&T, &T) -> Ordering) {
        self.seats.sort_by(|a, b| compare(&a.member, &b.member));
    }

    /// The first active member in seating order.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Active members in seating order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.seats
            .iter()
            .filter(|seat| seat.active)
            .map(|seat| &seat.member)
    }

    /// Number of active members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}
