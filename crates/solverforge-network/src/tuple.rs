//! Tuples flowing between network nodes.
//!
//! A tuple is an ordered group of 1 to 5 facts plus a [`TupleId`] that stays
//! stable from insert to retract. Updates replace the facts in place.

use std::fmt::{self, Debug};

use crate::api::analysis::EntityRef;

/// Any value the network can carry.
///
/// The network never compares facts itself. It only hands them to the
/// extractor, mapping and predicate functions supplied at build time.
pub trait Fact: Clone + Debug + Send + Sync + 'static {}

impl<T: Clone + Debug + Send + Sync + 'static> Fact for T {}

/// Stable handle of one tuple on one edge of the network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleId(u64);

impl TupleId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        TupleId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Debug for TupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for TupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-node allocator of output tuple ids.
#[derive(Debug, Default)]
pub struct TupleIds {
    next: u64,
}

impl TupleIds {
    pub fn next_id(&mut self) -> TupleId {
        let id = TupleId(self.next);
        self.next += 1;
        id
    }
}

/// A tuple of facts with a stable identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Tuple<F> {
    id: TupleId,
    facts: F,
}

impl<F> Tuple<F> {
    #[inline]
    pub fn new(id: TupleId, facts: F) -> Self {
        Self { id, facts }
    }

    #[inline]
    pub fn id(&self) -> TupleId {
        self.id
    }

    #[inline]
    pub fn facts(&self) -> &F {
        &self.facts
    }

    /// Swaps in new facts, keeping the id, and returns the old facts.
    pub fn replace_facts(&mut self, facts: F) -> F {
        std::mem::replace(&mut self.facts, facts)
    }

    pub fn into_facts(self) -> F {
        self.facts
    }
}

impl<F: Debug> Debug for Tuple<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tuple{}{:?}", self.id, self.facts)
    }
}

/// Fact groups of arity 1 to 5.
pub trait Facts: Fact {
    const ARITY: usize;

    /// References to every fact, in position order, for match analysis.
    fn entity_refs(&self) -> Vec<EntityRef>;
}

/// Type-level concatenation of a fact group with one more fact.
pub trait Append<R: Fact>: Facts {
    type Output: Facts;

    fn append(&self, right: &R) -> Self::Output;
}

/// Replacement of the last fact of a group of arity 2 or more.
pub trait ReplaceLast<V: Fact>: Facts {
    type Output: Facts;

    fn replace_last(&self, value: V) -> Self::Output;
}

macro_rules! impl_facts {
    ($arity:literal; $($t:ident $v:ident),+) => {
        impl<$($t: Fact),+> Facts for ($($t,)+) {
            const ARITY: usize = $arity;

            fn entity_refs(&self) -> Vec<EntityRef> {
                let ($($v,)+) = self;
                vec![$(EntityRef::new($v)),+]
            }
        }
    };
}

impl_facts!(1; A a);
impl_facts!(2; A a, B b);
impl_facts!(3; A a, B b, C c);
impl_facts!(4; A a, B b, C c, D d);
impl_facts!(5; A a, B b, C c, D d, E e);

macro_rules! impl_append {
    ($($t:ident $v:ident),+) => {
        impl<$($t: Fact,)+ R: Fact> Append<R> for ($($t,)+) {
            type Output = ($($t,)+ R);

            #[inline]
            fn append(&self, right: &R) -> Self::Output {
                let ($($v,)+) = self;
                ($($v.clone(),)+ right.clone())
            }
        }
    };
}

impl_append!(A a);
impl_append!(A a, B b);
impl_append!(A a, B b, C c);
impl_append!(A a, B b, C c, D d);

macro_rules! impl_replace_last {
    ($($t:ident $v:ident),+; $last:ident) => {
        impl<$($t: Fact,)+ $last: Fact, V: Fact> ReplaceLast<V> for ($($t,)+ $last) {
            type Output = ($($t,)+ V);

            #[inline]
            fn replace_last(&self, value: V) -> Self::Output {
                let ($($v,)+ _) = self;
                ($($v.clone(),)+ value)
            }
        }
    };
}

impl_replace_last!(A a; B);
impl_replace_last!(A a, B b; C);
impl_replace_last!(A a, B b, C c; D);
impl_replace_last!(A a, B b, C c, D d; E);
