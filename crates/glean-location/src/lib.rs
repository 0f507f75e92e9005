//! Locations of definition nodes inside a source file. Nodes carry absolute positions as [Byte]
//! and [ByteRange], which diagnostics print as `start~end`.

use core::fmt;
use std::fmt::Display;

/// Byte position in a source file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Byte(pub usize);

/// Two byte positions inside a source file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteRange(pub Byte, pub Byte);

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self(Byte(start), Byte(end))
    }
}

impl Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.0 .0, self.1 .0)
    }
}

/// A node together with the place in the source where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub location: ByteRange,
    pub data: T,
}

impl<T: Display> Display for Located<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data)
    }
}

impl<T> Located<T> {
    /// Wraps a node that has no source, e.g. one built by hand or by a desugaring step.
    pub fn synthetic(data: T) -> Self {
        Self {
            location: ByteRange::default(),
            data,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ranges_print_start_and_end() {
        assert_eq!(ByteRange::new(3, 14).to_string(), "3~14");
    }

    #[test]
    fn synthetic_nodes_start_at_zero() {
        let node = Located::synthetic("pass");
        assert_eq!(node.location, ByteRange::new(0, 0));
        assert_eq!(node.to_string(), "pass");
    }
}
