//! Choice-paths: the sequence of branch decisions from the root to a node.

use std::fmt;
use std::ops::Index;

/// A single branch decision at an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Answer "yes", continue at the left child
    Left,
    /// Answer "no", continue at the right child
    Right,
}

impl Branch {
    /// Returns the branch taken for the given answer.
    pub fn from_answer(yes: bool) -> Self {
        if yes { Branch::Left } else { Branch::Right }
    }

    /// Returns whether this branch affirms the question it was taken at.
    pub fn is_affirmative(self) -> bool {
        self == Branch::Left
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Left => write!(f, "yes"),
            Branch::Right => write!(f, "no"),
        }
    }
}

// =#========================================================================#=
// CHOICE PATH
// =#========================================================================#=
/// Ordered branch decisions recorded from the root to some node.
///
/// Two paths sharing a common prefix denote two objects sharing the
/// properties encoded by the questions along that prefix, see
/// [divergence](ChoicePath::divergence).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ChoicePath {
    steps: Vec<Branch>,
}

impl ChoicePath {
    /// Creates an empty path, denoting the root itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a branch decision.
    pub fn push(&mut self, branch: Branch) {
        self.steps.push(branch);
    }

    /// Removes and returns the last branch decision.
    pub fn pop(&mut self) -> Option<Branch> {
        self.steps.pop()
    }

    /// Shortens the path to its first `len` decisions.
    pub fn truncate(&mut self, len: usize) {
        self.steps.truncate(len);
    }

    /// Number of branch decisions.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn as_slice(&self) -> &[Branch] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Branch> {
        self.steps.iter()
    }

    /// Returns the length of the longest common prefix of both paths.
    ///
    /// # Example
    /// ```
    /// use twentyq::model::{Branch, ChoicePath};
    ///
    /// let dog = ChoicePath::from(vec![Branch::Left, Branch::Left]);
    /// let cat = ChoicePath::from(vec![Branch::Left, Branch::Right]);
    /// assert_eq!(dog.divergence(&cat), 1);
    /// ```
    pub fn divergence(&self, other: &ChoicePath) -> usize {
        self.steps
            .iter()
            .zip(other.steps.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl From<Vec<Branch>> for ChoicePath {
    fn from(steps: Vec<Branch>) -> Self {
        ChoicePath { steps }
    }
}

impl Index<usize> for ChoicePath {
    type Output = Branch;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

impl<'a> IntoIterator for &'a ChoicePath {
    type Item = &'a Branch;
    type IntoIter = std::slice::Iter<'a, Branch>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for ChoicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.steps.iter().map(|b| b.to_string()).collect();
        write!(f, "[{}]", steps.join(", "))
    }
}
