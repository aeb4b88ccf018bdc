//! Erased keys produced by joiner extractors.

use std::sync::Arc;

/// A hashable, totally ordered key produced by a joiner extractor.
///
/// Extractors may return any type with an `Into<IndexKey>` conversion.
/// Equality levels hash the key; ordering levels compare it. Every integer
/// width widens to [`IndexKey::Int`], so signed and unsigned keys compare by
/// value. Keys of other different variants order by variant, so one level
/// should always produce one variant on both sides.
///
/// ```
/// use solverforge_network::joiner::IndexKey;
///
/// assert_eq!(IndexKey::from(3u8), IndexKey::Int(3));
/// assert_eq!(IndexKey::from(3usize), IndexKey::from(3i64));
/// assert!(IndexKey::from(-1i64) < IndexKey::from(2u32));
/// assert_eq!(IndexKey::from(Some("a")), IndexKey::Opt(Some(Box::new(IndexKey::from("a")))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    Unit,
    Bool(bool),
    Int(i128),
    Char(char),
    Str(Arc<str>),
    Opt(Option<Box<IndexKey>>),
    List(Vec<IndexKey>),
}

impl From<()> for IndexKey {
    fn from(_: ()) -> Self {
        IndexKey::Unit
    }
}

impl From<bool> for IndexKey {
    fn from(value: bool) -> Self {
        IndexKey::Bool(value)
    }
}

impl From<char> for IndexKey {
    fn from(value: char) -> Self {
        IndexKey::Char(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),+) => {
        $(impl From<$t> for IndexKey {
            #[inline]
            fn from(value: $t) -> Self {
                IndexKey::Int(i128::from(value))
            }
        })+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<isize> for IndexKey {
    #[inline]
    fn from(value: isize) -> Self {
        IndexKey::Int(value as i128)
    }
}

impl From<usize> for IndexKey {
    #[inline]
    fn from(value: usize) -> Self {
        IndexKey::Int(value as i128)
    }
}

impl From<&str> for IndexKey {
    fn from(value: &str) -> Self {
        IndexKey::Str(Arc::from(value))
    }
}

impl From<String> for IndexKey {
    fn from(value: String) -> Self {
        IndexKey::Str(Arc::from(value))
    }
}

impl From<Arc<str>> for IndexKey {
    fn from(value: Arc<str>) -> Self {
        IndexKey::Str(value)
    }
}

impl<T: Into<IndexKey>> From<Option<T>> for IndexKey {
    fn from(value: Option<T>) -> Self {
        IndexKey::Opt(value.map(|v| Box::new(v.into())))
    }
}

impl<T: Into<IndexKey>> From<Vec<T>> for IndexKey {
    fn from(values: Vec<T>) -> Self {
        IndexKey::List(values.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<IndexKey>, B: Into<IndexKey>> From<(A, B)> for IndexKey {
    fn from((a, b): (A, B)) -> Self {
        IndexKey::List(vec![a.into(), b.into()])
    }
}

impl<A: Into<IndexKey>, B: Into<IndexKey>, C: Into<IndexKey>> From<(A, B, C)> for IndexKey {
    fn from((a, b, c): (A, B, C)) -> Self {
        IndexKey::List(vec![a.into(), b.into(), c.into()])
    }
}
