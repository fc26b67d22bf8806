//! CSV hand-off file to pretty-printed JSON.

use crate::utils::error::Result;
use csv::ReaderBuilder;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};
use std::io::{self, Write};

pub type Row = Map<String, Value>;

/// Reads every row as a header-keyed map, keys kept in header order.
///
/// Values stay strings. Short rows get `null` for the missing columns;
/// columns beyond the header are dropped.
pub fn read_rows(csv_data: &[u8]) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(csv_data);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            tracing::warn!(
                "Dropping {} surplus field(s) on line {}",
                record.len() - headers.len(),
                record.position().map_or(0, |p| p.line())
            );
        }

        let row = headers
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let value = record
                    .get(i)
                    .map_or(Value::Null, |v| Value::String(v.to_string()));
                (key.to_string(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Pretty layout with every non-ASCII character written as `\uXXXX` UTF-16 units,
/// so the output is pure ASCII.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    fn with_indent(indent: &'a [u8]) -> Self {
        Self {
            inner: PrettyFormatter::with_indent(indent),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// JSON array with 4-space indentation, ASCII-only output and no trailing newline.
pub fn to_pretty_json(rows: &[Row]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::with_indent(b"    "));
    rows.serialize(&mut serializer)?;
    Ok(buf)
}

/// Converts CSV bytes to JSON bytes, returning the row count alongside.
pub fn csv_to_json(csv_data: &[u8]) -> Result<(Vec<u8>, usize)> {
    let rows = read_rows(csv_data)?;
    let json = to_pretty_json(&rows)?;
    Ok((json, rows.len()))
}
