//! Constraint identity and impact classification.

use std::fmt;

use crate::score::Score;

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use solverforge_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("scheduling", "NoOverlap");
/// assert_eq!(cr.full_name(), "scheduling/NoOverlap");
///
/// let parsed = ConstraintRef::parse("scheduling/NoOverlap");
/// assert_eq!(parsed, cr);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintRef {
    /// Package/module containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Splits a full name at its last `/`; a name without one has no package.
    pub fn parse(full_name: &str) -> Self {
        match full_name.rsplit_once('/') {
            Some((package, name)) => Self::new(package, name),
            None => Self::new("", full_name),
        }
    }

    /// Returns the fully qualified name.
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

impl fmt::Display for ConstraintRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.package, self.name)
        }
    }
}

impl From<&str> for ConstraintRef {
    fn from(full_name: &str) -> Self {
        ConstraintRef::parse(full_name)
    }
}

/// Type of impact a constraint has on the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactType {
    /// Penalize (subtract from score).
    Penalty,
    /// Reward (add to score).
    Reward,
}

impl ImpactType {
    /// Signs a non-negative impact: penalties subtract, rewards add.
    #[inline]
    pub fn apply<Sc: Score>(self, impact: Sc) -> Sc {
        match self {
            ImpactType::Penalty => -impact,
            ImpactType::Reward => impact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimpleScore;

    #[test]
    fn test_constraint_ref_full_name() {
        let cr = ConstraintRef::new("my.package", "TestConstraint");
        assert_eq!(cr.full_name(), "my.package/TestConstraint");
        assert_eq!(cr.to_string(), "my.package/TestConstraint");
    }

    #[test]
    fn test_constraint_ref_empty_package() {
        let cr = ConstraintRef::parse("Simple");
        assert_eq!(cr, ConstraintRef::new("", "Simple"));
        assert_eq!(cr.full_name(), "Simple");
    }

    #[test]
    fn test_impact_sign() {
        let impact = SimpleScore::of(4);
        assert_eq!(ImpactType::Penalty.apply(impact), SimpleScore::of(-4));
        assert_eq!(ImpactType::Reward.apply(impact), SimpleScore::of(4));
    }
}
