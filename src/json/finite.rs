//! Non-finite float detection
//!
//! `serde_json` writes NaN and infinities as `null`, which would not survive
//! a round trip. [`ensure_finite`] walks a value through a serializer that
//! produces no output and fails on the first non-finite float.

use serde::Serialize;
use serde::ser::{self, Serializer};
use std::fmt;

/// Reason a value was rejected before encoding
#[derive(Debug)]
pub struct NonFiniteError(String);

impl fmt::Display for NonFiniteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NonFiniteError {}

impl ser::Error for NonFiniteError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        NonFiniteError(msg.to_string())
    }
}

/// Fails if `value` contains a NaN or infinite float anywhere.
pub fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> Result<(), NonFiniteError> {
    value.serialize(&mut FiniteCheck)
}

struct FiniteCheck;

fn check(value: f64) -> Result<(), NonFiniteError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NonFiniteError("Inf and NaN cannot be JSON encoded".to_string()))
    }
}

impl Serializer for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<(), NonFiniteError> {
        check(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), NonFiniteError> {
        check(v)
    }

    fn serialize_char(self, _v: char) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), NonFiniteError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), NonFiniteError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, NonFiniteError> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, NonFiniteError> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteError> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, NonFiniteError> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, NonFiniteError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteError> {
        Ok(())
    }
}

impl ser::SerializeTuple for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteError> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteError> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteError> {
        Ok(())
    }
}

impl ser::SerializeMap for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), NonFiniteError> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteError> {
        Ok(())
    }
}

impl ser::SerializeStruct for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteError> {
        Ok(())
    }
}
