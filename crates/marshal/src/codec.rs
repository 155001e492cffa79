// Copyright (c) matlink 2025
// This file is licensed under the MIT, see license.md file

//! Binary encoding for the transient store. It is designed for simplicity,
//! not efficiency (no varints or compression), and it is not
//! self-describing across versions: a store file is consumed and deleted
//! within the same process lifetime, so no forward compatibility is
//! attempted and an unknown tag is a hard error.
//!
//! Layout, all integers big-endian:
//!
//! * `u32` entry count, then per entry:
//! * `u32` name length, name bytes (UTF-8),
//! * `u8` type tag,
//! * the payload. Scalars encode their value directly; arrays encode a
//!   `u32` length followed by the elements; optional slots carry a `u8`
//!   presence flag; strings are a `u32` length plus UTF-8 bytes.
//!
//! `decode(encode(m)) == m` holds for the full [`WorkspaceValue`] variant
//! space, empty arrays and all-missing arrays included.

use matlink_type::{Error, Result, Value};

use crate::{WorkspaceMap, WorkspaceValue};

const TAG_UNDEFINED: u8 = 0x00;
const TAG_BOOLEAN: u8 = 0x01;
const TAG_INT4: u8 = 0x02;
const TAG_FLOAT8: u8 = 0x03;
const TAG_UTF8: u8 = 0x04;
const TAG_BOOLEAN_ARRAY: u8 = 0x11;
const TAG_INT4_ARRAY: u8 = 0x12;
const TAG_FLOAT8_ARRAY: u8 = 0x13;
const TAG_UTF8_ARRAY: u8 = 0x14;
const TAG_UTF8_LIST: u8 = 0x15;
const TAG_DYNAMIC: u8 = 0x1f;

/// Serializes a workspace map to its store representation.
pub fn encode(map: &WorkspaceMap) -> Vec<u8> {
	let mut output = Vec::new();
	put_u32(&mut output, map.len() as u32);
	for (name, value) in map.iter() {
		put_str(&mut output, name);
		encode_value(&mut output, value);
	}
	output
}

/// Deserializes a workspace map from its store representation.
///
/// Fails with [`Error::CorruptStore`] on truncation, garbage, or trailing
/// bytes, and with [`Error::UnknownTypeTag`] on a tag this build does not
/// know; neither is ever skipped over.
pub fn decode(input: &[u8]) -> Result<WorkspaceMap> {
	let mut reader = Reader::new(input);
	let count = reader.len()?;
	let mut map = WorkspaceMap::with_capacity(count);
	for _ in 0..count {
		let name = reader.str()?;
		let value = decode_value(&mut reader)?;
		map.insert(name, value);
	}
	if !reader.is_empty() {
		return Err(Error::corrupt(format!(
			"{} trailing bytes after last entry",
			reader.remaining()
		)));
	}
	Ok(map)
}

fn encode_value(output: &mut Vec<u8>, value: &WorkspaceValue) {
	match value {
		WorkspaceValue::Undefined => output.push(TAG_UNDEFINED),
		WorkspaceValue::Boolean(v) => {
			output.push(TAG_BOOLEAN);
			output.push(*v as u8);
		}
		WorkspaceValue::Int4(v) => {
			output.push(TAG_INT4);
			output.extend_from_slice(&v.to_be_bytes());
		}
		WorkspaceValue::Float8(v) => {
			output.push(TAG_FLOAT8);
			output.extend_from_slice(&v.to_be_bytes());
		}
		WorkspaceValue::Utf8(v) => {
			output.push(TAG_UTF8);
			put_str(output, v);
		}
		WorkspaceValue::BooleanArray(values) => {
			output.push(TAG_BOOLEAN_ARRAY);
			put_u32(output, values.len() as u32);
			for v in values {
				output.push(*v as u8);
			}
		}
		WorkspaceValue::Int4Array(values) => {
			output.push(TAG_INT4_ARRAY);
			put_u32(output, values.len() as u32);
			for v in values {
				put_slot(output, v.is_some());
				if let Some(v) = v {
					output.extend_from_slice(&v.to_be_bytes());
				}
			}
		}
		WorkspaceValue::Float8Array(values) => {
			output.push(TAG_FLOAT8_ARRAY);
			put_u32(output, values.len() as u32);
			for v in values {
				put_slot(output, v.is_some());
				if let Some(v) = v {
					output.extend_from_slice(&v.to_be_bytes());
				}
			}
		}
		WorkspaceValue::Utf8Array(values) => {
			output.push(TAG_UTF8_ARRAY);
			put_u32(output, values.len() as u32);
			for v in values {
				put_slot(output, v.is_some());
				if let Some(v) = v {
					put_str(output, v);
				}
			}
		}
		WorkspaceValue::Utf8List(values) => {
			output.push(TAG_UTF8_LIST);
			put_u32(output, values.len() as u32);
			for v in values {
				put_str(output, v);
			}
		}
		WorkspaceValue::Dynamic(values) => {
			output.push(TAG_DYNAMIC);
			put_u32(output, values.len() as u32);
			for v in values {
				encode_cell(output, v);
			}
		}
	}
}

fn decode_value(reader: &mut Reader) -> Result<WorkspaceValue> {
	let tag = reader.u8()?;
	let value = match tag {
		TAG_UNDEFINED => WorkspaceValue::Undefined,
		TAG_BOOLEAN => WorkspaceValue::Boolean(reader.bool()?),
		TAG_INT4 => WorkspaceValue::Int4(reader.i32()?),
		TAG_FLOAT8 => WorkspaceValue::Float8(reader.f64()?),
		TAG_UTF8 => WorkspaceValue::Utf8(reader.str()?),
		TAG_BOOLEAN_ARRAY => {
			let len = reader.len()?;
			let mut values = Vec::with_capacity(len);
			for _ in 0..len {
				values.push(reader.bool()?);
			}
			WorkspaceValue::BooleanArray(values)
		}
		TAG_INT4_ARRAY => {
			let len = reader.len()?;
			let mut values = Vec::with_capacity(len);
			for _ in 0..len {
				values.push(if reader.slot()? {
					Some(reader.i32()?)
				} else {
					None
				});
			}
			WorkspaceValue::Int4Array(values)
		}
		TAG_FLOAT8_ARRAY => {
			let len = reader.len()?;
			let mut values = Vec::with_capacity(len);
			for _ in 0..len {
				values.push(if reader.slot()? {
					Some(reader.f64()?)
				} else {
					None
				});
			}
			WorkspaceValue::Float8Array(values)
		}
		TAG_UTF8_ARRAY => {
			let len = reader.len()?;
			let mut values = Vec::with_capacity(len);
			for _ in 0..len {
				values.push(if reader.slot()? {
					Some(reader.str()?)
				} else {
					None
				});
			}
			WorkspaceValue::Utf8Array(values)
		}
		TAG_UTF8_LIST => {
			let len = reader.len()?;
			let mut values = Vec::with_capacity(len);
			for _ in 0..len {
				values.push(reader.str()?);
			}
			WorkspaceValue::Utf8List(values)
		}
		TAG_DYNAMIC => {
			let len = reader.len()?;
			let mut values = Vec::with_capacity(len);
			for _ in 0..len {
				values.push(decode_cell(reader)?);
			}
			WorkspaceValue::Dynamic(values)
		}
		tag => {
			return Err(Error::UnknownTypeTag {
				tag,
			});
		}
	};
	Ok(value)
}

fn encode_cell(output: &mut Vec<u8>, value: &Value) {
	match value {
		Value::Undefined => output.push(TAG_UNDEFINED),
		Value::Boolean(v) => {
			output.push(TAG_BOOLEAN);
			output.push(*v as u8);
		}
		Value::Int4(v) => {
			output.push(TAG_INT4);
			output.extend_from_slice(&v.to_be_bytes());
		}
		Value::Float8(v) => {
			output.push(TAG_FLOAT8);
			output.extend_from_slice(&v.to_be_bytes());
		}
		Value::Utf8(v) => {
			output.push(TAG_UTF8);
			put_str(output, v);
		}
	}
}

fn decode_cell(reader: &mut Reader) -> Result<Value> {
	let tag = reader.u8()?;
	let value = match tag {
		TAG_UNDEFINED => Value::Undefined,
		TAG_BOOLEAN => Value::Boolean(reader.bool()?),
		TAG_INT4 => Value::Int4(reader.i32()?),
		TAG_FLOAT8 => Value::Float8(reader.f64()?),
		TAG_UTF8 => Value::Utf8(reader.str()?),
		tag => {
			return Err(Error::UnknownTypeTag {
				tag,
			});
		}
	};
	Ok(value)
}

fn put_u32(output: &mut Vec<u8>, v: u32) {
	output.extend_from_slice(&v.to_be_bytes());
}

fn put_str(output: &mut Vec<u8>, v: &str) {
	put_u32(output, v.len() as u32);
	output.extend_from_slice(v.as_bytes());
}

fn put_slot(output: &mut Vec<u8>, present: bool) {
	output.push(present as u8);
}

struct Reader<'a> {
	input: &'a [u8],
}

impl<'a> Reader<'a> {
	fn new(input: &'a [u8]) -> Self {
		Self {
			input,
		}
	}

	fn is_empty(&self) -> bool {
		self.input.is_empty()
	}

	fn remaining(&self) -> usize {
		self.input.len()
	}

	fn take(&mut self, len: usize) -> Result<&'a [u8]> {
		if self.input.len() < len {
			return Err(Error::corrupt(format!(
				"expected {} bytes, {} left",
				len,
				self.input.len()
			)));
		}
		let (bytes, rest) = self.input.split_at(len);
		self.input = rest;
		Ok(bytes)
	}

	fn u8(&mut self) -> Result<u8> {
		Ok(self.take(1)?[0])
	}

	fn bool(&mut self) -> Result<bool> {
		match self.u8()? {
			0x00 => Ok(false),
			0x01 => Ok(true),
			byte => Err(Error::corrupt(format!("invalid boolean byte {:#04x}", byte))),
		}
	}

	fn slot(&mut self) -> Result<bool> {
		match self.u8()? {
			0x00 => Ok(false),
			0x01 => Ok(true),
			byte => Err(Error::corrupt(format!("invalid presence byte {:#04x}", byte))),
		}
	}

	fn u32(&mut self) -> Result<u32> {
		let bytes = self.take(4)?;
		Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
	}

	/// Reads an element-count prefix. Every counted element occupies at
	/// least one encoded byte, so a prefix beyond the remaining input is
	/// already corrupt and is rejected before any buffer is sized from it.
	fn len(&mut self) -> Result<usize> {
		let len = self.u32()? as usize;
		if len > self.input.len() {
			return Err(Error::corrupt(format!(
				"length prefix {} exceeds {} remaining bytes",
				len,
				self.input.len()
			)));
		}
		Ok(len)
	}

	fn i32(&mut self) -> Result<i32> {
		let bytes = self.take(4)?;
		Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
	}

	fn f64(&mut self) -> Result<f64> {
		let bytes = self.take(8)?;
		Ok(f64::from_be_bytes([
			bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
		]))
	}

	fn str(&mut self) -> Result<String> {
		let len = self.u32()? as usize;
		let bytes = self.take(len)?;
		String::from_utf8(bytes.to_vec())
			.map_err(|_| Error::corrupt("string payload is not valid UTF-8"))
	}
}

#[cfg(test)]
mod tests {
	use matlink_type::{Error, Value};

	use super::*;

	fn full_variant_map() -> WorkspaceMap {
		let mut map = WorkspaceMap::new();
		map.insert("undefined", WorkspaceValue::Undefined);
		map.insert("boolean", WorkspaceValue::Boolean(true));
		map.insert("int4", WorkspaceValue::Int4(-42));
		map.insert("float8", WorkspaceValue::Float8(f64::MIN_POSITIVE));
		map.insert("utf8", WorkspaceValue::Utf8("snippet".to_string()));
		map.insert("boolean_array", WorkspaceValue::BooleanArray(vec![true, false]));
		map.insert("int4_array", WorkspaceValue::Int4Array(vec![Some(1), None, Some(-3)]));
		map.insert(
			"float8_array",
			WorkspaceValue::Float8Array(vec![Some(0.0), Some(-0.5), None]),
		);
		map.insert(
			"utf8_array",
			WorkspaceValue::Utf8Array(vec![Some("a".to_string()), None, Some("".to_string())]),
		);
		map.insert(
			"utf8_list",
			WorkspaceValue::Utf8List(vec!["x".to_string(), "y".to_string()]),
		);
		map.insert(
			"dynamic",
			WorkspaceValue::Dynamic(vec![
				Value::Undefined,
				Value::bool(false),
				Value::int4(7),
				Value::float8(2.5),
				Value::utf8("mixed"),
			]),
		);
		map
	}

	#[test]
	fn test_round_trip_full_variant_space() {
		let map = full_variant_map();
		let decoded = decode(&encode(&map)).unwrap();
		assert_eq!(decoded, map);
	}

	#[test]
	fn test_round_trip_empty_arrays() {
		let mut map = WorkspaceMap::new();
		map.insert("a", WorkspaceValue::Float8Array(vec![]));
		map.insert("b", WorkspaceValue::Utf8Array(vec![]));
		map.insert("c", WorkspaceValue::Dynamic(vec![]));
		assert_eq!(decode(&encode(&map)).unwrap(), map);
	}

	#[test]
	fn test_round_trip_all_missing_utf8_column() {
		let mut map = WorkspaceMap::new();
		map.insert("a", WorkspaceValue::Utf8Array(vec![None, None, None]));
		assert_eq!(decode(&encode(&map)).unwrap(), map);
	}

	#[test]
	fn test_round_trip_empty_map() {
		let map = WorkspaceMap::new();
		assert_eq!(decode(&encode(&map)).unwrap(), map);
	}

	#[test]
	fn test_truncated_payload() {
		let mut bytes = encode(&full_variant_map());
		bytes.truncate(bytes.len() - 3);
		let err = decode(&bytes).unwrap_err();
		assert!(matches!(err, Error::CorruptStore { .. }));
	}

	#[test]
	fn test_trailing_bytes() {
		let mut bytes = encode(&full_variant_map());
		bytes.push(0x00);
		let err = decode(&bytes).unwrap_err();
		assert!(matches!(err, Error::CorruptStore { .. }));
	}

	#[test]
	fn test_unknown_tag() {
		let mut map = WorkspaceMap::new();
		map.insert("a", WorkspaceValue::Undefined);
		let mut bytes = encode(&map);
		// Entry tag is the last byte of this encoding.
		*bytes.last_mut().unwrap() = 0x7f;
		let err = decode(&bytes).unwrap_err();
		assert!(matches!(err, Error::UnknownTypeTag {
			tag: 0x7f
		}));
	}

	#[test]
	fn test_invalid_presence_byte() {
		let mut map = WorkspaceMap::new();
		map.insert("a", WorkspaceValue::Int4Array(vec![None]));
		let mut bytes = encode(&map);
		// Presence flag is the last byte of this encoding.
		*bytes.last_mut().unwrap() = 0x02;
		let err = decode(&bytes).unwrap_err();
		assert!(matches!(err, Error::CorruptStore { .. }));
	}

	#[test]
	fn test_garbage_input() {
		assert!(decode(&[0xde, 0xad]).is_err());
	}

	#[test]
	fn test_oversized_entry_count() {
		// A count of u32::MAX with no entries behind it must fail as
		// corrupt, not size a map from the prefix.
		let err = decode(&[0xff, 0xff, 0xff, 0xff]).unwrap_err();
		assert!(matches!(err, Error::CorruptStore { .. }));
	}

	#[test]
	fn test_oversized_array_length() {
		// One entry "a" claiming a float8 array of u32::MAX elements
		// with an empty payload.
		let mut bytes = Vec::new();
		put_u32(&mut bytes, 1);
		put_str(&mut bytes, "a");
		bytes.push(TAG_FLOAT8_ARRAY);
		put_u32(&mut bytes, u32::MAX);
		let err = decode(&bytes).unwrap_err();
		assert!(matches!(err, Error::CorruptStore { .. }));
	}
}
