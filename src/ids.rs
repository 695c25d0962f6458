//! Typed, zero-cost identifier wrappers for the two graph levels.
//!
//! Both ids are `Copy + Ord + Hash` so they drop straight into the
//! `indexmap`/`HashSet` machinery in [`crate::graph`] without ceremony. The
//! inner integer is `pub` for direct indexing when a caller wants it, but
//! prefer `.index()`.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Index of a node in the full street-level graph (`G_full`).
    pub struct RawNodeId(u32);
}

typed_id! {
    /// Index of a junction in the condensed graph (`G_jct`). A `JunctionId`
    /// always corresponds to a `RawNodeId` whose raw node has
    /// `is_junction == true`.
    pub struct JunctionId(u32);
}
