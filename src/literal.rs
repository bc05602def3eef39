//! Literal types and literal values of every supported width.

use std::fmt;

use num_bigint::BigInt;
use ordered_float::OrderedFloat;
use serde::Serialize;

/// Compact description of the literal types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralType {
    Binary,
    Boolean,
    Float(FloatType),
    Integer(IntegerType),
    String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FloatType {
    Bigfloat,
    Float32,
    Float64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegerType {
    Bigint,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
}

impl FloatType {
    pub fn as_atom(self) -> &'static str {
        match self {
            FloatType::Bigfloat => "bigfloat",
            FloatType::Float32 => "float32",
            FloatType::Float64 => "float64",
        }
    }

    pub fn from_atom(atom: &str) -> Option<FloatType> {
        match atom {
            "bigfloat" => Some(FloatType::Bigfloat),
            "float32" => Some(FloatType::Float32),
            "float64" => Some(FloatType::Float64),
            _ => None,
        }
    }
}

impl IntegerType {
    pub fn as_atom(self) -> &'static str {
        match self {
            IntegerType::Bigint => "bigint",
            IntegerType::Int8 => "int8",
            IntegerType::Int16 => "int16",
            IntegerType::Int32 => "int32",
            IntegerType::Int64 => "int64",
            IntegerType::Uint8 => "uint8",
            IntegerType::Uint16 => "uint16",
            IntegerType::Uint32 => "uint32",
            IntegerType::Uint64 => "uint64",
        }
    }

    pub fn from_atom(atom: &str) -> Option<IntegerType> {
        match atom {
            "bigint" => Some(IntegerType::Bigint),
            "int8" => Some(IntegerType::Int8),
            "int16" => Some(IntegerType::Int16),
            "int32" => Some(IntegerType::Int32),
            "int64" => Some(IntegerType::Int64),
            "uint8" => Some(IntegerType::Uint8),
            "uint16" => Some(IntegerType::Uint16),
            "uint32" => Some(IntegerType::Uint32),
            "uint64" => Some(IntegerType::Uint64),
            _ => None,
        }
    }
}

impl LiteralType {
    /// Return the canonical atom for this literal type.
    pub fn as_atom(self) -> &'static str {
        match self {
            LiteralType::Binary => "binary",
            LiteralType::Boolean => "boolean",
            LiteralType::Float(ft) => ft.as_atom(),
            LiteralType::Integer(it) => it.as_atom(),
            LiteralType::String => "string",
        }
    }

    /// Parse a canonical atom into a `LiteralType`.
    pub fn from_atom(atom: &str) -> Option<LiteralType> {
        match atom {
            "binary" => Some(LiteralType::Binary),
            "boolean" => Some(LiteralType::Boolean),
            "string" => Some(LiteralType::String),
            other => FloatType::from_atom(other)
                .map(LiteralType::Float)
                .or_else(|| IntegerType::from_atom(other).map(LiteralType::Integer)),
        }
    }
}

/// A literal value. Floats are totally ordered, so `NaN == NaN`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Literal {
    Binary(Vec<u8>),
    Boolean(bool),
    Float(FloatValue),
    Integer(IntegerValue),
    String(String),
}

/// Bigfloat is carried as a 64-bit float under its own tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FloatValue {
    Bigfloat(OrderedFloat<f64>),
    Float32(OrderedFloat<f32>),
    Float64(OrderedFloat<f64>),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegerValue {
    Bigint(BigInt),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
}

impl FloatValue {
    pub fn float_type(&self) -> FloatType {
        match self {
            FloatValue::Bigfloat(_) => FloatType::Bigfloat,
            FloatValue::Float32(_) => FloatType::Float32,
            FloatValue::Float64(_) => FloatType::Float64,
        }
    }
}

impl IntegerValue {
    pub fn integer_type(&self) -> IntegerType {
        match self {
            IntegerValue::Bigint(_) => IntegerType::Bigint,
            IntegerValue::Int8(_) => IntegerType::Int8,
            IntegerValue::Int16(_) => IntegerType::Int16,
            IntegerValue::Int32(_) => IntegerType::Int32,
            IntegerValue::Int64(_) => IntegerType::Int64,
            IntegerValue::Uint8(_) => IntegerType::Uint8,
            IntegerValue::Uint16(_) => IntegerType::Uint16,
            IntegerValue::Uint32(_) => IntegerType::Uint32,
            IntegerValue::Uint64(_) => IntegerType::Uint64,
        }
    }
}

impl Literal {
    pub fn literal_type(&self) -> LiteralType {
        match self {
            Literal::Binary(_) => LiteralType::Binary,
            Literal::Boolean(_) => LiteralType::Boolean,
            Literal::Float(value) => LiteralType::Float(value.float_type()),
            Literal::Integer(value) => LiteralType::Integer(value.integer_type()),
            Literal::String(_) => LiteralType::String,
        }
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_atom())
    }
}

impl fmt::Display for FloatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_atom())
    }
}

impl fmt::Display for IntegerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_atom())
    }
}

// int32 and float64 are the unsuffixed defaults of the term syntax.
impl fmt::Display for IntegerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerValue::Int32(n) => write!(f, "{n}"),
            IntegerValue::Bigint(n) => write!(f, "{n}:bigint"),
            IntegerValue::Int8(n) => write!(f, "{n}:int8"),
            IntegerValue::Int16(n) => write!(f, "{n}:int16"),
            IntegerValue::Int64(n) => write!(f, "{n}:int64"),
            IntegerValue::Uint8(n) => write!(f, "{n}:uint8"),
            IntegerValue::Uint16(n) => write!(f, "{n}:uint16"),
            IntegerValue::Uint32(n) => write!(f, "{n}:uint32"),
            IntegerValue::Uint64(n) => write!(f, "{n}:uint64"),
        }
    }
}

impl fmt::Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloatValue::Float64(x) => write!(f, "{:?}", x.0),
            FloatValue::Float32(x) => write!(f, "{:?}:float32", x.0),
            FloatValue::Bigfloat(x) => write!(f, "{:?}:bigfloat", x.0),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Binary(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Float(value) => write!(f, "{value}"),
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::String(s) => write_quoted(f, s),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("\"")
}
