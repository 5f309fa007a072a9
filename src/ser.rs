//! Serialization support via serde.
//!
//! Any `T: Serialize` can be turned into a [`Value`] with [`to_value`]. Shapes that XML-RPC has no
//! representation for (integers outside the `i32` range, non-finite floats, maps with non-string
//! keys) are rejected at runtime with a [`SerializeError`].

#![allow(missing_debug_implementations)] // mostly useless for all the serializers in here

use crate::error::{EncodeError, SerializeError};
use crate::utils::format_datetime;
use crate::Value;

use iso8601::datetime;
use serde::ser::{self, Error as _, Impossible, Serialize};

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt::Display;
use std::iter;

/// Newtype struct name used to carry a `dateTime.iso8601` through serde.
///
/// Other serializers just see the formatted date as a string.
const DATETIME_TOKEN: &str = "$xmlrpc_client::DateTime";

/// Newtype struct name wrapped around every serialized [`Value`].
///
/// Lets the argument list serializer tell a bare `Value` (one parameter) from a sequence.
const VALUE_TOKEN: &str = "$xmlrpc_client::Value";

pub type Result<T> = ::std::result::Result<T, SerializeError>;

impl ser::Error for SerializeError {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        SerializeError::new(msg.to_string())
    }
}

impl ser::Error for EncodeError {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        EncodeError::UnsupportedType {
            position: 0,
            source: SerializeError::custom(msg),
        }
    }
}

impl SerializeError {
    fn key_must_be_string() -> Self {
        Self::custom("map keys must be strings")
    }

    fn int_out_of_range<T: Display>(v: T) -> Self {
        Self::custom(format_args!("integer {} does not fit in a 32-bit <int>", v))
    }
}

impl ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_newtype_struct(VALUE_TOKEN, &ValueContent(self))
    }
}

struct ValueContent<'a>(&'a Value);

impl<'a> ser::Serialize for ValueContent<'a> {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match *self.0 {
            Value::Int(i) => serializer.serialize_i32(i),
            Value::Bool(b) => serializer.serialize_bool(b),
            Value::String(ref s) => serializer.serialize_str(s),
            Value::Double(f) => serializer.serialize_f64(f),
            Value::DateTime(ref date_time) => {
                serializer.serialize_newtype_struct(DATETIME_TOKEN, &format_datetime(date_time))
            }
            Value::Base64(ref bytes) => serializer.serialize_bytes(bytes),
            Value::Struct(ref map) => map.serialize(serializer),
            Value::Array(ref values) => values.serialize(serializer),
            Value::Nil => serializer.serialize_unit(),
        }
    }
}

/// Converts any serializable value into an XML-RPC [`Value`].
///
/// `None` and unit values become `<nil/>`, byte buffers (`serde_bytes`) become `<base64>`,
/// sequences and tuples become `<array>`, and maps and structs become `<struct>`.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(Serializer)
}

/// Converts a call's arguments into its parameter list.
///
/// Tuples, arrays and sequences contribute one parameter per element, `()` and `None` mean "no
/// parameters", and everything else is passed as a single parameter. A [`Value`] is always a
/// single parameter, even a `Value::Array` or `Value::Nil`.
pub(crate) fn to_params<T: Serialize + ?Sized>(args: &T) -> ::std::result::Result<Vec<Value>, EncodeError> {
    args.serialize(ParamsSerializer)
}

/// A serializer that produces an XML-RPC `<value>` tag.
pub(crate) struct Serializer;

impl ser::Serializer for Serializer {
    type Ok = Value;
    type Error = SerializeError;
    type SerializeSeq = SerializeArray;
    type SerializeTuple = Self::SerializeSeq;
    type SerializeTupleStruct = Self::SerializeSeq;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = Self::SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_i32(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_i32(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        Ok(Value::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        i32::try_from(v)
            .map(Value::Int)
            .map_err(|_| SerializeError::int_out_of_range(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_i32(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_i32(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        // only the lower half of all u32s fit in `<int>`
        i32::try_from(v)
            .map(Value::Int)
            .map_err(|_| SerializeError::int_out_of_range(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        i32::try_from(v)
            .map(Value::Int)
            .map_err(|_| SerializeError::int_out_of_range(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.serialize_f64(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        if v.is_finite() {
            Ok(Value::Double(v))
        } else {
            Err(SerializeError::custom(format_args!("{} cannot be sent as a <double>", v)))
        }
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        Ok(Value::Base64(v.into()))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        // do the same thing serde_json does
        self.serialize_unit()
    }

    fn serialize_some<T: ?Sized>(self, value: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str) -> Result<Self::Ok> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized>(self, name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        if name != DATETIME_TOKEN {
            return value.serialize(self);
        }

        match value.serialize(Serializer)? {
            Value::String(ref text) => datetime(text)
                .map(Value::DateTime)
                .map_err(|_| SerializeError::custom(format_args!("invalid dateTime.iso8601 '{}'", text))),
            other => Err(SerializeError::custom(format_args!(
                "expected a string for dateTime.iso8601, got <{}>",
                other.type_name()
            ))),
        }
    }

    fn serialize_newtype_variant<T: ?Sized>(self, _name: &'static str, _variant_index: u32, variant: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        // enum variant that contains a single, unnamed type
        // need to encode the variant name, and the contained value in some way
        // we mimic serde_json/serde-yaml here and create a struct with a single KV pair
        let value = value.serialize(Serializer)?;

        Ok(Value::Struct(iter::once((variant.to_string(), value)).collect()))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeArray::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, len: usize) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeTupleVariant::with_name_and_capacity(variant, len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, _len: usize) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant::new(variant.to_string()))
    }
}

pub struct SerializeArray {
    array: Vec<Value>,
}

impl SerializeArray {
    fn with_capacity(cap: usize) -> Self {
        Self {
            array: Vec::with_capacity(cap),
        }
    }

    fn push<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.array.push(value.serialize(Serializer)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Array(self.array))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Array(self.array))
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Array(self.array))
    }
}

pub struct SerializeTupleVariant {
    name: &'static str,
    values: Vec<Value>,
}

impl SerializeTupleVariant {
    pub fn with_name_and_capacity(name: &'static str, cap: usize) -> Self {
        Self {
            name,
            values: Vec::with_capacity(cap),
        }
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.values.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Struct(iter::once((self.name.to_string(), Value::Array(self.values))).collect()))
    }
}

pub struct SerializeMap {
    next_key: Option<String>,
    map: BTreeMap<String, Value>,
}

impl SerializeMap {
    fn new() -> Self {
        Self {
            next_key: None,
            map: BTreeMap::new(),
        }
    }

    fn insert(&mut self, key: String, value: Value) -> Result<()> {
        if self.map.contains_key(&key) {
            return Err(SerializeError::custom(format_args!("duplicate struct member '{}'", key)));
        }
        self.map.insert(key, value);
        Ok(())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> Result<()>
    where
        T: Serialize,
    {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| SerializeError::custom("serialize_value called before serialize_key"))?;
        let value = value.serialize(Serializer)?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Struct(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let value = value.serialize(Serializer)?;
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Struct(self.map))
    }
}

pub struct SerializeStructVariant {
    variant: String,
    fields: SerializeMap,
}

impl SerializeStructVariant {
    fn new(variant: String) -> Self {
        Self {
            variant,
            fields: SerializeMap::new(),
        }
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.fields, key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Struct(iter::once((self.variant, Value::Struct(self.fields.map))).collect()))
    }
}

/// `Serializer` for map/struct keys. Only supports serializing strings.
struct KeySerializer;

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = SerializeError;
    type SerializeSeq = Impossible<Self::Ok, Self::Error>;
    type SerializeTuple = Impossible<Self::Ok, Self::Error>;
    type SerializeTupleStruct = Impossible<Self::Ok, Self::Error>;
    type SerializeTupleVariant = Impossible<Self::Ok, Self::Error>;
    type SerializeMap = Impossible<Self::Ok, Self::Error>;
    type SerializeStruct = Impossible<Self::Ok, Self::Error>;
    type SerializeStructVariant = Impossible<Self::Ok, Self::Error>;

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_u8(self, _v: u8) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_u16(self, _v: u16) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_u32(self, _v: u32) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_some<T: ?Sized>(self, _value: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        // even if the `some` *would* be a string, reject it
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_unit_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str) -> Result<Self::Ok> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T: ?Sized>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized>(self, _name: &'static str, _variant_index: u32, _variant: &'static str, _value: &T) -> Result<Self::Ok>
    where
        T: Serialize,
    {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_tuple_variant(self, _name: &'static str, _variant_index: u32, _variant: &'static str, _len: usize) -> Result<Self::SerializeTupleVariant> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(SerializeError::key_must_be_string())
    }

    fn serialize_struct_variant(self, _name: &'static str, _variant_index: u32, _variant: &'static str, _len: usize) -> Result<Self::SerializeStructVariant> {
        Err(SerializeError::key_must_be_string())
    }
}

type ParamsResult<T> = ::std::result::Result<T, EncodeError>;

/// Wraps a value conversion error with the position of the argument it happened in.
fn at(position: usize) -> impl FnOnce(SerializeError) -> EncodeError {
    move |source| EncodeError::UnsupportedType { position, source }
}

/// `Serializer` for a call's argument list, see [`to_params`].
struct ParamsSerializer;

impl ParamsSerializer {
    fn single(value: Result<Value>) -> ParamsResult<Vec<Value>> {
        value.map(|value| vec![value]).map_err(at(0))
    }
}

impl ser::Serializer for ParamsSerializer {
    type Ok = Vec<Value>;
    type Error = EncodeError;
    type SerializeSeq = SerializeParams;
    type SerializeTuple = SerializeParams;
    type SerializeTupleStruct = SerializeParams;
    type SerializeTupleVariant = SingleParam<SerializeTupleVariant>;
    type SerializeMap = SingleParam<SerializeMap>;
    type SerializeStruct = SingleParam<SerializeMap>;
    type SerializeStructVariant = SingleParam<SerializeStructVariant>;

    fn serialize_bool(self, v: bool) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_bool(Serializer, v))
    }

    fn serialize_i8(self, v: i8) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_i8(Serializer, v))
    }

    fn serialize_i16(self, v: i16) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_i16(Serializer, v))
    }

    fn serialize_i32(self, v: i32) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_i32(Serializer, v))
    }

    fn serialize_i64(self, v: i64) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_i64(Serializer, v))
    }

    fn serialize_u8(self, v: u8) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_u8(Serializer, v))
    }

    fn serialize_u16(self, v: u16) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_u16(Serializer, v))
    }

    fn serialize_u32(self, v: u32) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_u32(Serializer, v))
    }

    fn serialize_u64(self, v: u64) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_u64(Serializer, v))
    }

    fn serialize_f32(self, v: f32) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_f32(Serializer, v))
    }

    fn serialize_f64(self, v: f64) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_f64(Serializer, v))
    }

    fn serialize_char(self, v: char) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_char(Serializer, v))
    }

    fn serialize_str(self, v: &str) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_str(Serializer, v))
    }

    fn serialize_bytes(self, v: &[u8]) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_bytes(Serializer, v))
    }

    fn serialize_none(self) -> ParamsResult<Self::Ok> {
        Ok(Vec::new())
    }

    fn serialize_some<T: ?Sized>(self, value: &T) -> ParamsResult<Self::Ok>
    where
        T: Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ParamsResult<Self::Ok> {
        Ok(Vec::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> ParamsResult<Self::Ok> {
        Ok(Vec::new())
    }

    fn serialize_unit_variant(self, name: &'static str, variant_index: u32, variant: &'static str) -> ParamsResult<Self::Ok> {
        Self::single(ser::Serializer::serialize_unit_variant(Serializer, name, variant_index, variant))
    }

    fn serialize_newtype_struct<T: ?Sized>(self, name: &'static str, value: &T) -> ParamsResult<Self::Ok>
    where
        T: Serialize,
    {
        if name == DATETIME_TOKEN || name == VALUE_TOKEN {
            Self::single(ser::Serializer::serialize_newtype_struct(Serializer, name, value))
        } else {
            value.serialize(self)
        }
    }

    fn serialize_newtype_variant<T: ?Sized>(self, name: &'static str, variant_index: u32, variant: &'static str, value: &T) -> ParamsResult<Self::Ok>
    where
        T: Serialize,
    {
        Self::single(ser::Serializer::serialize_newtype_variant(Serializer, name, variant_index, variant, value))
    }

    fn serialize_seq(self, len: Option<usize>) -> ParamsResult<Self::SerializeSeq> {
        Ok(SerializeParams {
            params: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> ParamsResult<Self::SerializeTuple> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> ParamsResult<Self::SerializeTupleStruct> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_variant(self, name: &'static str, variant_index: u32, variant: &'static str, len: usize) -> ParamsResult<Self::SerializeTupleVariant> {
        ser::Serializer::serialize_tuple_variant(Serializer, name, variant_index, variant, len)
            .map(SingleParam)
            .map_err(at(0))
    }

    fn serialize_map(self, len: Option<usize>) -> ParamsResult<Self::SerializeMap> {
        ser::Serializer::serialize_map(Serializer, len).map(SingleParam).map_err(at(0))
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> ParamsResult<Self::SerializeStruct> {
        ser::Serializer::serialize_struct(Serializer, name, len).map(SingleParam).map_err(at(0))
    }

    fn serialize_struct_variant(self, name: &'static str, variant_index: u32, variant: &'static str, len: usize) -> ParamsResult<Self::SerializeStructVariant> {
        ser::Serializer::serialize_struct_variant(Serializer, name, variant_index, variant, len)
            .map(SingleParam)
            .map_err(at(0))
    }
}

/// Collects one parameter per element of the argument sequence.
pub struct SerializeParams {
    params: Vec<Value>,
}

impl SerializeParams {
    fn push<T: ?Sized>(&mut self, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        let position = self.params.len();
        self.params.push(value.serialize(Serializer).map_err(at(position))?);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeParams {
    type Ok = Vec<Value>;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        self.push(value)
    }

    fn end(self) -> ParamsResult<Self::Ok> {
        Ok(self.params)
    }
}

impl ser::SerializeTuple for SerializeParams {
    type Ok = Vec<Value>;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        self.push(value)
    }

    fn end(self) -> ParamsResult<Self::Ok> {
        Ok(self.params)
    }
}

impl ser::SerializeTupleStruct for SerializeParams {
    type Ok = Vec<Value>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        self.push(value)
    }

    fn end(self) -> ParamsResult<Self::Ok> {
        Ok(self.params)
    }
}

/// Adapts a `Value`-producing compound serializer to produce a one-element parameter list.
pub struct SingleParam<S>(S);

impl ser::SerializeTupleVariant for SingleParam<SerializeTupleVariant> {
    type Ok = Vec<Value>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized>(&mut self, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        ser::SerializeTupleVariant::serialize_field(&mut self.0, value).map_err(at(0))
    }

    fn end(self) -> ParamsResult<Self::Ok> {
        ParamsSerializer::single(ser::SerializeTupleVariant::end(self.0))
    }
}

impl ser::SerializeMap for SingleParam<SerializeMap> {
    type Ok = Vec<Value>;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized>(&mut self, key: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        ser::SerializeMap::serialize_key(&mut self.0, key).map_err(at(0))
    }

    fn serialize_value<T: ?Sized>(&mut self, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        ser::SerializeMap::serialize_value(&mut self.0, value).map_err(at(0))
    }

    fn end(self) -> ParamsResult<Self::Ok> {
        ParamsSerializer::single(ser::SerializeMap::end(self.0))
    }
}

impl ser::SerializeStruct for SingleParam<SerializeMap> {
    type Ok = Vec<Value>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.0, key, value).map_err(at(0))
    }

    fn end(self) -> ParamsResult<Self::Ok> {
        ParamsSerializer::single(ser::SerializeStruct::end(self.0))
    }
}

impl ser::SerializeStructVariant for SingleParam<SerializeStructVariant> {
    type Ok = Vec<Value>;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized>(&mut self, key: &'static str, value: &T) -> ParamsResult<()>
    where
        T: Serialize,
    {
        ser::SerializeStructVariant::serialize_field(&mut self.0, key, value).map_err(at(0))
    }

    fn end(self) -> ParamsResult<Self::Ok> {
        ParamsSerializer::single(ser::SerializeStructVariant::end(self.0))
    }
}
