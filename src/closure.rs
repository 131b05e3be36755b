// Copyright (c) 2018 Fabian Schuiki

//! Least fixpoint computation over a growing set.
//!
//! Most of the grammar analyses boil down to the same loop: start with a set
//! of known facts, derive new facts from the ones found in the previous
//! round, and stop once a round yields nothing new. The `closure` function
//! implements that loop once.

use std::hash::Hash;
use indexmap::IndexSet;

/// Grow `seed` until `step` produces no new members.
///
/// The step function is called with the set of all members known so far and
/// the members added in the previous round (the seed in the first round). It
/// returns candidates, which may include members that are already known.
/// Members are kept in the order they were discovered.
pub fn closure<T, F, I>(seed: IndexSet<T>, mut step: F) -> IndexSet<T>
where
    T: Hash + Eq + Clone,
    F: FnMut(&IndexSet<T>, &IndexSet<T>) -> I,
    I: IntoIterator<Item = T>,
{
    let mut known = seed;
    let mut frontier = known.clone();
    let mut round = 0;

    loop {
        let new_members: IndexSet<T> = step(&known, &frontier)
            .into_iter()
            .filter(|member| !known.contains(member))
            .collect();
        round += 1;
        trace!(
            "closure round {}: {} known, {} new",
            round,
            known.len(),
            new_members.len()
        );
        if new_members.is_empty() {
            break;
        }
        known.extend(new_members.iter().cloned());
        frontier = new_members;
    }

    known
}
