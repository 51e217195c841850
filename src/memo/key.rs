//! Cache Key Derivation
//!
//! Turns call arguments into hashable, structurally comparable cache keys.
//!
//! Typed arguments implement [`CacheKey`] directly: integers, strings, tuples,
//! options and vectors of those. Floats are keyed by bit pattern and reject
//! NaN, which has no equality. [`CallArgs`] covers dynamic calls made of
//! positional values followed by named keyword values.

use std::hash::Hash;

use crate::error::{CacheError, Result};

// == Cache Key Trait ==
/// Arguments that can be reduced to a cache key.
pub trait CacheKey {
    /// Owned key stored in the cache
    type Key: Hash + Eq + Clone + Send + 'static;

    /// Derives the key; fails when a component has no usable equality.
    fn cache_key(&self) -> Result<Self::Key>;
}

macro_rules! identity_cache_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CacheKey for $ty {
                type Key = $ty;

                fn cache_key(&self) -> Result<Self::Key> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

identity_cache_key!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    &'static str,
);

/// Bit pattern of a float, with both zeros folded together.
fn float_bits(value: f64) -> Result<u64> {
    if value.is_nan() {
        return Err(CacheError::KeyDerivation(
            "NaN is not comparable and cannot be part of a cache key".to_string(),
        ));
    }
    if value == 0.0 {
        return Ok(0.0f64.to_bits());
    }
    Ok(value.to_bits())
}

impl CacheKey for f64 {
    type Key = u64;

    fn cache_key(&self) -> Result<Self::Key> {
        float_bits(*self)
    }
}

impl CacheKey for f32 {
    type Key = u64;

    fn cache_key(&self) -> Result<Self::Key> {
        float_bits(f64::from(*self))
    }
}

impl<T: CacheKey> CacheKey for Option<T> {
    type Key = Option<T::Key>;

    fn cache_key(&self) -> Result<Self::Key> {
        self.as_ref().map(CacheKey::cache_key).transpose()
    }
}

impl<T: CacheKey> CacheKey for Vec<T> {
    type Key = Vec<T::Key>;

    fn cache_key(&self) -> Result<Self::Key> {
        self.iter().map(CacheKey::cache_key).collect()
    }
}

macro_rules! tuple_cache_key {
    ($($name:ident),+) => {
        impl<$($name: CacheKey),+> CacheKey for ($($name,)+) {
            type Key = ($($name::Key,)+);

            #[allow(non_snake_case)]
            fn cache_key(&self) -> Result<Self::Key> {
                let ($($name,)+) = self;
                Ok(($($name.cache_key()?,)+))
            }
        }
    };
}

tuple_cache_key!(A);
tuple_cache_key!(A, B);
tuple_cache_key!(A, B, C);
tuple_cache_key!(A, B, C, D);
tuple_cache_key!(A, B, C, D, E);
tuple_cache_key!(A, B, C, D, E, F);

// == Dynamic Arguments ==
/// A dynamically typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<ArgValue>),
}

/// Hashable form of an [`ArgValue`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAtom {
    None,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<KeyAtom>),
}

impl CacheKey for ArgValue {
    type Key = KeyAtom;

    fn cache_key(&self) -> Result<Self::Key> {
        Ok(match self {
            ArgValue::None => KeyAtom::None,
            ArgValue::Bool(b) => KeyAtom::Bool(*b),
            ArgValue::Int(i) => KeyAtom::Int(*i),
            ArgValue::Float(f) => KeyAtom::Float(float_bits(*f)?),
            ArgValue::Str(s) => KeyAtom::Str(s.clone()),
            ArgValue::Bytes(b) => KeyAtom::Bytes(b.clone()),
            ArgValue::Tuple(items) => KeyAtom::Tuple(items.cache_key()?),
        })
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<Vec<u8>> for ArgValue {
    fn from(value: Vec<u8>) -> Self {
        ArgValue::Bytes(value)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgValue::None, Into::into)
    }
}

/// Positional arguments followed by keyword arguments, both in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<ArgValue>,
    keyword: Vec<(String, ArgValue)>,
}

/// Key derived from [`CallArgs`]; keyword order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallKey {
    positional: Vec<KeyAtom>,
    keyword: Vec<(String, KeyAtom)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Appends a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.keyword.push((name.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[ArgValue] {
        &self.positional
    }

    /// First keyword argument with this name.
    pub fn keyword(&self, name: &str) -> Option<&ArgValue> {
        self.keyword
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

impl CacheKey for CallArgs {
    type Key = CallKey;

    fn cache_key(&self) -> Result<Self::Key> {
        let positional = self.positional.cache_key()?;
        let keyword = self
            .keyword
            .iter()
            .map(|(name, value)| Ok((name.clone(), value.cache_key()?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(CallKey {
            positional,
            keyword,
        })
    }
}
