//! Binary NBT codec
//!
//! Uncompressed, big-endian tag trees with a named root compound. Strings
//! are written as standard UTF-8.

use bytes::{Buf, BufMut};

use crate::error::{RegionError, Result};

use super::{tag, Compound, Value};

/// Maximum nesting of lists and compounds accepted by the decoder
pub const MAX_DEPTH: usize = 512;

// =============================================================================
// Decoding
// =============================================================================

/// Decode a root compound, returning its name and contents
pub fn decode(data: &[u8]) -> Result<(String, Compound)> {
    let mut buf = data;
    let root = read_u8(&mut buf)?;
    if root != tag::COMPOUND {
        return Err(RegionError::Nbt(format!(
            "root tag must be a compound, got tag {}",
            root
        )));
    }
    let name = read_string(&mut buf)?;
    let compound = read_compound(&mut buf, 0)?;
    if buf.has_remaining() {
        tracing::debug!(trailing = buf.remaining(), "trailing bytes after root compound");
    }
    Ok((name, compound))
}

fn ensure(buf: &&[u8], n: usize) -> Result<()> {
    if buf.remaining() < n {
        return Err(RegionError::Nbt(format!(
            "unexpected end of data: need {} bytes, {} left",
            n,
            buf.remaining()
        )));
    }
    Ok(())
}

fn read_u8(buf: &mut &[u8]) -> Result<u8> {
    ensure(buf, 1)?;
    Ok(buf.get_u8())
}

fn read_len(buf: &mut &[u8], elem_size: usize) -> Result<usize> {
    ensure(buf, 4)?;
    let len = buf.get_i32();
    if len <= 0 {
        return Ok(0);
    }
    let len = len as usize;
    // Reject counts the remaining input cannot possibly satisfy before allocating
    ensure(buf, len.saturating_mul(elem_size))?;
    Ok(len)
}

fn read_string(buf: &mut &[u8]) -> Result<String> {
    ensure(buf, 2)?;
    let len = buf.get_u16() as usize;
    ensure(buf, len)?;
    let raw = &buf[..len];
    let s = match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => {
            tracing::warn!("string is not valid UTF-8, replacing invalid sequences");
            String::from_utf8_lossy(raw).into_owned()
        }
    };
    buf.advance(len);
    Ok(s)
}

fn read_compound(buf: &mut &[u8], depth: usize) -> Result<Compound> {
    if depth > MAX_DEPTH {
        return Err(RegionError::Nbt("maximum nesting depth exceeded".to_string()));
    }
    let mut compound = Compound::new();
    loop {
        let id = read_u8(buf)?;
        if id == tag::END {
            return Ok(compound);
        }
        let name = read_string(buf)?;
        let value = read_payload(buf, id, depth + 1)?;
        compound.insert(name, value);
    }
}

fn read_payload(buf: &mut &[u8], id: u8, depth: usize) -> Result<Value> {
    let value = match id {
        tag::BYTE => Value::Byte(read_u8(buf)? as i8),
        tag::SHORT => {
            ensure(buf, 2)?;
            Value::Short(buf.get_i16())
        }
        tag::INT => {
            ensure(buf, 4)?;
            Value::Int(buf.get_i32())
        }
        tag::LONG => {
            ensure(buf, 8)?;
            Value::Long(buf.get_i64())
        }
        tag::FLOAT => {
            ensure(buf, 4)?;
            Value::Float(buf.get_f32())
        }
        tag::DOUBLE => {
            ensure(buf, 8)?;
            Value::Double(buf.get_f64())
        }
        tag::BYTE_ARRAY => {
            let len = read_len(buf, 1)?;
            Value::ByteArray((0..len).map(|_| buf.get_i8()).collect())
        }
        tag::STRING => Value::String(read_string(buf)?),
        tag::LIST => read_list(buf, depth)?,
        tag::COMPOUND => Value::Compound(read_compound(buf, depth)?),
        tag::INT_ARRAY => {
            let len = read_len(buf, 4)?;
            Value::IntArray((0..len).map(|_| buf.get_i32()).collect())
        }
        tag::LONG_ARRAY => {
            let len = read_len(buf, 8)?;
            Value::LongArray((0..len).map(|_| buf.get_i64()).collect())
        }
        other => return Err(RegionError::Nbt(format!("unknown tag id {}", other))),
    };
    Ok(value)
}

fn read_list(buf: &mut &[u8], depth: usize) -> Result<Value> {
    if depth > MAX_DEPTH {
        return Err(RegionError::Nbt("maximum nesting depth exceeded".to_string()));
    }
    let elem = read_u8(buf)?;
    let len = read_len(buf, 1)?;
    if elem == tag::END && len > 0 {
        return Err(RegionError::Nbt(
            "non-empty list with End element type".to_string(),
        ));
    }
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        items.push(read_payload(buf, elem, depth + 1)?);
    }
    Ok(Value::List(items))
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a root compound with the given name
pub fn encode(name: &str, compound: &Compound) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.put_u8(tag::COMPOUND);
    write_string(&mut out, name)?;
    write_compound(&mut out, compound)?;
    Ok(out)
}

fn write_string(out: &mut Vec<u8>, s: &str) -> Result<()> {
    let len = u16::try_from(s.len())
        .map_err(|_| RegionError::Nbt(format!("string of {} bytes is too long", s.len())))?;
    out.put_u16(len);
    out.put_slice(s.as_bytes());
    Ok(())
}

fn write_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = i32::try_from(len)
        .map_err(|_| RegionError::Nbt(format!("sequence of {} elements is too long", len)))?;
    out.put_i32(len);
    Ok(())
}

fn write_compound(out: &mut Vec<u8>, compound: &Compound) -> Result<()> {
    for (name, value) in compound {
        out.put_u8(value.tag_id());
        write_string(out, name)?;
        write_payload(out, value)?;
    }
    out.put_u8(tag::END);
    Ok(())
}

fn write_payload(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Byte(v) => out.put_i8(*v),
        Value::Short(v) => out.put_i16(*v),
        Value::Int(v) => out.put_i32(*v),
        Value::Long(v) => out.put_i64(*v),
        Value::Float(v) => out.put_f32(*v),
        Value::Double(v) => out.put_f64(*v),
        Value::ByteArray(items) => {
            write_len(out, items.len())?;
            items.iter().for_each(|b| out.put_i8(*b));
        }
        Value::String(s) => write_string(out, s)?,
        Value::List(items) => {
            let elem = items.first().map(Value::tag_id).unwrap_or(tag::END);
            if let Some(bad) = items.iter().find(|v| v.tag_id() != elem) {
                return Err(RegionError::Nbt(format!(
                    "list mixes tag {} with tag {}",
                    elem,
                    bad.tag_id()
                )));
            }
            out.put_u8(elem);
            write_len(out, items.len())?;
            for item in items {
                write_payload(out, item)?;
            }
        }
        Value::Compound(c) => write_compound(out, c)?,
        Value::IntArray(items) => {
            write_len(out, items.len())?;
            items.iter().for_each(|v| out.put_i32(*v));
        }
        Value::LongArray(items) => {
            write_len(out, items.len())?;
            items.iter().for_each(|v| out.put_i64(*v));
        }
    }
    Ok(())
}
