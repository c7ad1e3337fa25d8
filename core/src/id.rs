//! Identifiers.

use core::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[repr(C)]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32, u16, u16, [u8; 8]);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> $name {
                let uuid = Uuid::new_v4();
                let (a, b, c, d) = uuid.as_fields();
                $name(a, b, c, *d)
            }

            /// Returns the identifier as a UUID.
            pub fn as_uuid(&self) -> Uuid {
                let mut bytes = [0; 16];
                bytes[..4].copy_from_slice(&self.0.to_be_bytes());
                bytes[4..6].copy_from_slice(&self.1.to_be_bytes());
                bytes[6..8].copy_from_slice(&self.2.to_be_bytes());
                bytes[8..].copy_from_slice(&self.3);
                Uuid::from_bytes(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_uuid())
            }
        }
    };
}

uuid_id! {
    /// Identifies one side menu controller.
    ///
    /// (this is just a UUID)
    ControllerId
}

uuid_id! {
    /// Identifies a renderable surface owned by the host, e.g. the content or the menu.
    SurfaceId
}

/// Identifies an observer registered with a controller.
///
/// Sequential per controller; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub(crate) u64);
