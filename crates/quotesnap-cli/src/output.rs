use std::io::{self, Write};

use quotesnap_core::QuoteBatch;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::error::CliError;

/// Serializes `{"quotes": [...]}` followed by a newline, as a single line.
pub fn write_batch<W: Write>(mut writer: W, batch: &QuoteBatch) -> Result<(), CliError> {
    {
        let mut serializer = Serializer::with_formatter(&mut writer, PyCompatFormatter);
        batch.serialize(&mut serializer)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

/// Compact JSON laid out like Python's `json.dumps` defaults: `", "` and
/// `": "` separators, non-ASCII escaped as lowercase `\uXXXX` (UTF-16 units).
#[derive(Debug, Clone, Copy, Default)]
struct PyCompatFormatter;

impl Formatter for PyCompatFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
