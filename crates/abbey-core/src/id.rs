//! Worker and task slot identifiers

use core::fmt;

use crate::constants::ID_NONE;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $short:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel value meaning "none"
            pub const NONE: $name = $name(ID_NONE);

            /// Create from a raw value
            #[inline]
            pub const fn new(id: u32) -> Self {
                $name(id)
            }

            /// Get the raw u32 value
            #[inline]
            pub const fn as_u32(self) -> u32 {
                self.0
            }

            /// Get as usize for indexing
            #[inline]
            pub const fn as_usize(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn is_none(self) -> bool {
                self.0 == ID_NONE
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_none() {
                    write!(f, concat!(stringify!($name), "(NONE)"))
                } else {
                    write!(f, concat!(stringify!($name), "({})"), self.0)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_none() {
                    write!(f, "none")
                } else {
                    write!(f, concat!($short, "{}"), self.0)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::NONE
            }
        }
    };
}

define_id!(
    /// Identifier of a worker ("monk") in the pool, `0..N-1`.
    WorkerId,
    "w"
);

define_id!(
    /// Index of a slot in the task table, `0..C-1`.
    SlotIndex,
    "s"
);

impl WorkerId {
    /// Next id in round-robin order over a pool of `count` workers
    #[inline]
    pub const fn next_in(self, count: usize) -> WorkerId {
        debug_assert!(count > 0);
        if self.is_none() {
            WorkerId(0)
        } else {
            WorkerId(((self.0 as usize + 1) % count) as u32)
        }
    }
}
