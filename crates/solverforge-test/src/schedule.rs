//! Employee scheduling facts.
//!
//! # Example
//!
//! ```
//! use solverforge_test::schedule::Shift;
//!
//! let early = Shift::new(0, 8, 12).assigned_to(1);
//! let late = Shift::new(1, 11, 16).assigned_to(1);
//! assert!(early.overlaps(&late));
//! assert_eq!(early.overlap_hours(&late), 1);
//! ```

/// A shift over the half-open hour interval `[start, end)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shift {
    pub id: usize,
    pub start: i64,
    pub end: i64,
    pub employee: Option<usize>,
    pub required_skill: Option<String>,
}

impl Shift {
    pub fn new(id: usize, start: i64, end: i64) -> Self {
        Self {
            id,
            start,
            end,
            employee: None,
            required_skill: None,
        }
    }

    pub fn assigned_to(mut self, employee: usize) -> Self {
        self.employee = Some(employee);
        self
    }

    pub fn requiring(mut self, skill: impl Into<String>) -> Self {
        self.required_skill = Some(skill.into());
        self
    }

    pub fn hours(&self) -> i64 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Shift) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Length of the common interval, zero if disjoint.
    pub fn overlap_hours(&self, other: &Shift) -> i64 {
        (self.end.min(other.end) - self.start.max(other.start)).max(0)
    }
}

/// An employee with skills and the hours they cannot work.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Employee {
    pub id: usize,
    pub name: String,
    pub skills: Vec<String>,
}

impl Employee {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            skills: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}
