//! Type Keys
//!
//! Every piece of data flowing through a reactor is addressed by its Rust type.
//! A [`TypeKey`] is the runtime tag for such a type: it is what the data store
//! is indexed by and what subscription lists are filed under.
//!
//! Ordered lists of types (the trigger list and the with list of a
//! subscription) are expressed as tuples implementing [`DataSet`]. A tuple
//! turns into a plain `SmallVec` of keys at registration time, so everything
//! downstream of `on` iterates over ordinary runtime lists.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

/// Marker for types that can be published into a data store.
///
/// Blanket-implemented for every `Any + Send + Sync` type.
pub trait Data: Any + Send + Sync {}

impl<T> Data for T where T: Any + Send + Sync {}

/// A type-erased, shared data value as held by the store.
pub type ErasedData = Arc<dyn Any + Send + Sync>;

/// Inline capacity for key lists. Most subscriptions name a handful of types.
pub type KeyList = SmallVec<[TypeKey; 4]>;

/// Stable identifier for a data type.
///
/// Two keys are equal iff they were built from the same type. The type name
/// is carried only for diagnostics and does not take part in comparisons.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for `T`.
    pub fn of<T: Data>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name of the type, for logs and errors.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Whether this key denotes `T`.
    pub fn is<T: Data>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// An ordered list of data types, written as a tuple.
///
/// `()` is the empty list, `(Camera,)` a single type, `(Camera, Motor)` two.
pub trait DataSet: 'static {
    /// Number of types in the list.
    const LEN: usize;

    /// The keys of the listed types, in declaration order.
    fn keys() -> KeyList;
}

impl DataSet for () {
    const LEN: usize = 0;

    fn keys() -> KeyList {
        SmallVec::new()
    }
}

macro_rules! impl_data_set {
    ($len:expr; $($ty:ident),+) => {
        impl<$($ty: Data),+> DataSet for ($($ty,)+) {
            const LEN: usize = $len;

            fn keys() -> KeyList {
                smallvec![$(TypeKey::of::<$ty>()),+]
            }
        }
    };
}

impl_data_set!(1; A);
impl_data_set!(2; A, B);
impl_data_set!(3; A, B, C);
impl_data_set!(4; A, B, C, D);
