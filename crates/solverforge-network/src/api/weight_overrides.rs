// Constraint weight overrides.
//
// An override replaces the weight a terminal was defined with. The factory
// applies them once, in `build`, and rejects names matching no constraint.

use std::collections::BTreeMap;
use std::fmt;

use solverforge_core::Score;

// Weight magnitudes keyed by constraint full name.
#[derive(Clone)]
pub struct ConstraintWeightOverrides<Sc: Score> {
    weights: BTreeMap<String, Sc>,
}

impl<Sc: Score> fmt::Debug for ConstraintWeightOverrides<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(&self.weights).finish()
    }
}

impl<Sc: Score> Default for ConstraintWeightOverrides<Sc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Sc: Score> ConstraintWeightOverrides<Sc> {
    pub fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    // Later pairs replace earlier ones with the same name.
    pub fn from_pairs<I, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, Sc)>,
        N: Into<String>,
    {
        let mut overrides = Self::new();
        for (name, weight) in pairs {
            overrides.put(name, weight);
        }
        overrides
    }

    pub fn put<N: Into<String>>(&mut self, name: N, weight: Sc) {
        self.weights.insert(name.into(), weight);
    }

    pub fn get(&self, name: &str) -> Option<&Sc> {
        self.weights.get(name)
    }

    // Overridden constraint names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    // Adds every override of `other`, replacing weights already present.
    pub fn extend(&mut self, other: ConstraintWeightOverrides<Sc>) {
        self.weights.extend(other.weights);
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
