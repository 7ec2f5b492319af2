use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by every id kind. Ids compare in O(1).
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Counter behind generated ids. Shared across kinds so generated ids never collide.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Move the counter past `s` when it has the `{prefix}_{n}` shape of a
/// generated id, so ids read back from a file are never generated again.
fn reserve(prefix: &str, s: &str) {
    let n = s
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|n| n.parse::<u64>().ok());
    if let Some(n) = n {
        COUNTER.fetch_max(n.saturating_add(1), Ordering::Relaxed);
    }
}

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing one.
            pub fn intern(s: &str) -> Self {
                $name(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a fresh id such as `layer_7`.
            pub fn generate() -> Self {
                let n = COUNTER.fetch_add(1, Ordering::Relaxed);
                Self::intern(&format!("{}_{n}", $prefix))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                reserve($prefix, &s);
                Ok($name::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identifier of a project.
    ProjectId,
    "project"
);

interned_id!(
    /// Identifier of a slide within a project.
    SlideId,
    "slide"
);

interned_id!(
    /// Identifier of a layer within a slide.
    LayerId,
    "layer"
);
