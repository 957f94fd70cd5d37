//! Handles for records in a written DXF document

use std::fmt;

/// Identifier of a table, entity or object record in a written document.
///
/// Handle 0 is reserved as the owner of top-level tables and is never
/// allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(u64);

impl Handle {
    /// The null handle (0)
    pub const NULL: Handle = Handle(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl fmt::UpperHex for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// Monotonically increasing handle counter owned by one write call
#[derive(Debug, Clone)]
pub struct HandleSeed {
    next: u64,
}

impl HandleSeed {
    /// Start a counter at `first`; values below 1 start at 1
    pub fn new(first: u64) -> Self {
        HandleSeed { next: first.max(1) }
    }

    /// Allocate the next handle
    pub fn allocate(&mut self) -> Handle {
        let handle = Handle(self.next);
        self.next += 1;
        handle
    }

    /// The next handle that would be allocated ($HANDSEED)
    pub fn peek(&self) -> Handle {
        Handle(self.next)
    }
}

impl Default for HandleSeed {
    fn default() -> Self {
        HandleSeed::new(1)
    }
}
