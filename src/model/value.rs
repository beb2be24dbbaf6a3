use std::fmt;
use std::fmt::Debug;

use serde::Deserialize;
use serde::Serialize;

/// Value kinds a process variable can carry
///
/// The set is closed: every kind maps to exactly one Rust type implementing
/// [`UserType`]. Variables without data (void) can not be buffered and have
/// no kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Boolean,
    String,
}

impl ValueKind {
    pub const ALL: [ValueKind; 12] = [
        ValueKind::Int8,
        ValueKind::UInt8,
        ValueKind::Int16,
        ValueKind::UInt16,
        ValueKind::Int32,
        ValueKind::UInt32,
        ValueKind::Int64,
        ValueKind::UInt64,
        ValueKind::Float32,
        ValueKind::Float64,
        ValueKind::Boolean,
        ValueKind::String,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Int8 => "int8",
            ValueKind::UInt8 => "uint8",
            ValueKind::Int16 => "int16",
            ValueKind::UInt16 => "uint16",
            ValueKind::Int32 => "int32",
            ValueKind::UInt32 => "uint32",
            ValueKind::Int64 => "int64",
            ValueKind::UInt64 => "uint64",
            ValueKind::Float32 => "float32",
            ValueKind::Float64 => "float64",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validity attached to every observation and every published array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataValidity {
    #[default]
    Ok,
    Faulty,
}

/// Homogeneous array payload, one arm per [`ValueKind`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueArray {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Boolean(Vec<bool>),
    String(Vec<String>),
}

impl ValueArray {
    /// Array of `len` default values (zero, `false` or empty string)
    pub fn defaults(
        kind: ValueKind,
        len: usize,
    ) -> Self {
        crate::with_user_type!(kind, T => T::into_array(vec![T::default(); len]))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            ValueArray::Int8(_) => ValueKind::Int8,
            ValueArray::UInt8(_) => ValueKind::UInt8,
            ValueArray::Int16(_) => ValueKind::Int16,
            ValueArray::UInt16(_) => ValueKind::UInt16,
            ValueArray::Int32(_) => ValueKind::Int32,
            ValueArray::UInt32(_) => ValueKind::UInt32,
            ValueArray::Int64(_) => ValueKind::Int64,
            ValueArray::UInt64(_) => ValueKind::UInt64,
            ValueArray::Float32(_) => ValueKind::Float32,
            ValueArray::Float64(_) => ValueKind::Float64,
            ValueArray::Boolean(_) => ValueKind::Boolean,
            ValueArray::String(_) => ValueKind::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ValueArray::Int8(v) => v.len(),
            ValueArray::UInt8(v) => v.len(),
            ValueArray::Int16(v) => v.len(),
            ValueArray::UInt16(v) => v.len(),
            ValueArray::Int32(v) => v.len(),
            ValueArray::UInt32(v) => v.len(),
            ValueArray::Int64(v) => v.len(),
            ValueArray::UInt64(v) => v.len(),
            ValueArray::Float32(v) => v.len(),
            ValueArray::Float64(v) => v.len(),
            ValueArray::Boolean(v) => v.len(),
            ValueArray::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the payload as `&[T]` if `T` matches the array kind
    pub fn as_slice<T: UserType>(&self) -> Option<&[T]> {
        T::as_slice(self)
    }
}

/// Binds a Rust type to its [`ValueKind`] and to its [`ValueArray`] arm
pub trait UserType: Clone + Default + PartialEq + Debug + Send + Sync + 'static {
    const KIND: ValueKind;

    fn as_slice(array: &ValueArray) -> Option<&[Self]>;

    fn into_array(values: Vec<Self>) -> ValueArray;
}

macro_rules! impl_user_type {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl UserType for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn as_slice(array: &ValueArray) -> Option<&[Self]> {
                    match array {
                        ValueArray::$variant(values) => Some(values.as_slice()),
                        _ => None,
                    }
                }

                fn into_array(values: Vec<Self>) -> ValueArray {
                    ValueArray::$variant(values)
                }
            }
        )+
    };
}

impl_user_type!(
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    bool => Boolean,
    String => String,
);

/// Calls a generic expression with the [`UserType`] matching a runtime [`ValueKind`].
///
/// ```ignore
/// let len = with_user_type!(kind, T => std::mem::size_of::<T>());
/// ```
#[macro_export]
macro_rules! with_user_type {
    ($kind:expr, $T:ident => $body:expr) => {
        match $kind {
            $crate::ValueKind::Int8 => {
                type $T = i8;
                $body
            }
            $crate::ValueKind::UInt8 => {
                type $T = u8;
                $body
            }
            $crate::ValueKind::Int16 => {
                type $T = i16;
                $body
            }
            $crate::ValueKind::UInt16 => {
                type $T = u16;
                $body
            }
            $crate::ValueKind::Int32 => {
                type $T = i32;
                $body
            }
            $crate::ValueKind::UInt32 => {
                type $T = u32;
                $body
            }
            $crate::ValueKind::Int64 => {
                type $T = i64;
                $body
            }
            $crate::ValueKind::UInt64 => {
                type $T = u64;
                $body
            }
            $crate::ValueKind::Float32 => {
                type $T = f32;
                $body
            }
            $crate::ValueKind::Float64 => {
                type $T = f64;
                $body
            }
            $crate::ValueKind::Boolean => {
                type $T = bool;
                $body
            }
            $crate::ValueKind::String => {
                type $T = String;
                $body
            }
        }
    };
}
