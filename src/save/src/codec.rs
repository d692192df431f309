//! Little-endian wire primitives for the plugin's binary save formats.
//!
//! Both on-disk layouts predate this code and are fixed byte sequences:
//! unsigned little-endian integers and length-prefixed UTF-8 strings.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use error::PluginError;
use std::io::{Read, Write};

/// Longest accepted string payload in bytes. A length prefix beyond this
/// is a corrupt file, not a real mod or achievement id.
pub const MAX_STRING_LEN: u32 = 1024 * 1024;

pub fn write_u32<W: Write>(w: &mut W, value: u32) -> Result<(), PluginError> {
    w.write_u32::<LittleEndian>(value)?;
    Ok(())
}

pub fn read_u32<R: Read>(r: &mut R) -> Result<u32, PluginError> {
    Ok(r.read_u32::<LittleEndian>()?)
}

pub fn write_u64<W: Write>(w: &mut W, value: u64) -> Result<(), PluginError> {
    w.write_u64::<LittleEndian>(value)?;
    Ok(())
}

pub fn read_u64<R: Read>(r: &mut R) -> Result<u64, PluginError> {
    Ok(r.read_u64::<LittleEndian>()?)
}

/// Writes a string as a u32 byte length followed by UTF-8 bytes.
pub fn write_string<W: Write>(w: &mut W, s: &str) -> Result<(), PluginError> {
    write_u32(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Reads a length-prefixed UTF-8 string. The length is validated against
/// [`MAX_STRING_LEN`] before any allocation happens.
pub fn read_string<R: Read>(r: &mut R) -> Result<String, PluginError> {
    let len = read_u32(r)?;
    if len > MAX_STRING_LEN {
        return Err(PluginError::CorruptedSave(format!(
            "string length {len} exceeds cap {MAX_STRING_LEN}"
        )));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}
