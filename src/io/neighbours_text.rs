//! Line-oriented neighbour table format.
//!
//! # Format
//! - One line per triangle, in triangle order; line `t + 1` describes triangle `t`.
//! - Three integers per line: the neighbour slots, separated by one space.
//! - An empty slot is written as `-1`.
//! - Lines end with `\n`.
//!
//! ```text
//! 1 -1 -1
//! 0 2 -1
//! 1 -1 -1
//! ```
//!
//! # Reading
//! The reader accepts any whitespace between fields, `\r\n` line endings and
//! trailing blank lines. Anything else (missing or extra fields, values below
//! `-1`, neighbours that do not name a triangle of the table) is rejected with
//! the offending 1-based line number.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::algs::neighbours::{AdjacencyTable, SLOTS_PER_TRIANGLE};
use crate::mesh_error::MeshFloodError;
use crate::topology::index::MeshIndex;

/// Token written for an empty slot.
pub const NO_NEIGHBOUR_TOKEN: &str = "-1";

/// Writer for the text neighbour table.
#[derive(Debug, Default, Clone)]
pub struct NeighbourTableWriter;

impl NeighbourTableWriter {
    pub fn write<W: Write, I: MeshIndex>(
        &self,
        table: &AdjacencyTable<I>,
        mut writer: W,
    ) -> Result<(), MeshFloodError> {
        for entry in table.entries() {
            writer.write_all(format_line(entry).as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path<I: MeshIndex>(
        &self,
        table: &AdjacencyTable<I>,
        path: impl AsRef<Path>,
    ) -> Result<(), MeshFloodError> {
        let file = File::create(path)?;
        self.write(table, BufWriter::new(file))
    }
}

fn format_slot(slot: Option<usize>) -> String {
    slot.map_or_else(|| NO_NEIGHBOUR_TOKEN.to_string(), |n| n.to_string())
}

fn format_line(entry: [Option<usize>; SLOTS_PER_TRIANGLE]) -> String {
    let [a, b, c] = entry.map(format_slot);
    format!("{a} {b} {c}\n")
}

/// Reader for the text neighbour table.
#[derive(Debug, Default, Clone)]
pub struct NeighbourTableReader {
    /// Reject the file unless it has exactly this many triangle lines.
    pub expected_triangles: Option<usize>,
}

impl NeighbourTableReader {
    /// Reader that checks the line count against a mesh's triangle count.
    pub fn for_triangles(triangle_count: usize) -> Self {
        Self {
            expected_triangles: Some(triangle_count),
        }
    }

    pub fn read<R: Read, I: MeshIndex>(
        &self,
        mut reader: R,
    ) -> Result<AdjacencyTable<I>, MeshFloodError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let contents = std::str::from_utf8(&bytes).map_err(|e| {
            let line = bytes[..e.valid_up_to()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
                + 1;
            parse_error(line, "line is not valid UTF-8")
        })?;

        let mut entries: Vec<[Option<usize>; SLOTS_PER_TRIANGLE]> = Vec::new();
        let mut first_blank: Option<usize> = None;
        for (idx, line) in contents.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                first_blank.get_or_insert(line_no);
                continue;
            }
            if let Some(blank) = first_blank {
                return Err(parse_error(blank, "blank line inside the table"));
            }
            entries.push(parse_line::<I>(line, line_no)?);
        }

        if let Some(expected) = self.expected_triangles
            && entries.len() != expected
        {
            return Err(MeshFloodError::AdjacencyMismatch {
                table: entries.len(),
                mesh: expected,
            });
        }

        let table = AdjacencyTable::<I>::from_entries(entries)?;
        table.check_against(table.len()).map_err(|e| match e {
            MeshFloodError::NeighbourOutOfRange {
                triangle,
                neighbour,
                triangle_count,
            } => parse_error(
                triangle + 1,
                format!("neighbour {neighbour} is not one of the {triangle_count} triangles"),
            ),
            other => other,
        })?;
        Ok(table)
    }

    pub fn read_from_path<I: MeshIndex>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<AdjacencyTable<I>, MeshFloodError> {
        self.read(File::open(path)?)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> MeshFloodError {
    MeshFloodError::TableParse {
        line,
        message: message.into(),
    }
}

fn parse_line<I: MeshIndex>(
    line: &str,
    line_no: usize,
) -> Result<[Option<usize>; SLOTS_PER_TRIANGLE], MeshFloodError> {
    let mut out = [None; SLOTS_PER_TRIANGLE];
    let mut fields = line.split_whitespace();
    for slot in out.iter_mut() {
        let raw = fields.next().ok_or_else(|| {
            parse_error(line_no, format!("expected {SLOTS_PER_TRIANGLE} fields"))
        })?;
        *slot = parse_slot::<I>(raw, line_no)?;
    }
    if fields.next().is_some() {
        return Err(parse_error(
            line_no,
            format!("more than {SLOTS_PER_TRIANGLE} fields"),
        ));
    }
    Ok(out)
}

fn parse_slot<I: MeshIndex>(raw: &str, line_no: usize) -> Result<Option<usize>, MeshFloodError> {
    let value = raw
        .parse::<i64>()
        .map_err(|_| parse_error(line_no, format!("invalid neighbour index: {raw}")))?;
    match value {
        -1 => Ok(None),
        v if v < -1 => Err(parse_error(line_no, format!("invalid neighbour index: {raw}"))),
        v => {
            let n = usize::try_from(v)
                .map_err(|_| parse_error(line_no, format!("neighbour index too large: {raw}")))?;
            if I::from_index(n).is_none() {
                return Err(parse_error(
                    line_no,
                    format!("neighbour {n} does not fit below the sentinel {}", I::NONE),
                ));
            }
            Ok(Some(n))
        }
    }
}

/// Serialize a table to a `String` in the text format.
pub fn table_to_string<I: MeshIndex>(table: &AdjacencyTable<I>) -> String {
    table.entries().map(format_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> AdjacencyTable<u32> {
        AdjacencyTable::from_entries([
            [Some(1), None, None],
            [Some(0), Some(2), None],
            [Some(1), None, None],
        ])
        .unwrap()
    }

    #[test]
    fn writes_one_line_per_triangle() {
        let text = table_to_string(&chain());
        assert_eq!(text, "1 -1 -1\n0 2 -1\n1 -1 -1\n");
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn reads_what_it_writes() {
        let table = chain();
        let back: AdjacencyTable<u32> = NeighbourTableReader::for_triangles(3)
            .read(table_to_string(&table).as_bytes())
            .unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn tolerates_crlf_and_trailing_blank_lines() {
        let text = "1 -1 -1\r\n0\t-1   -1\r\n\r\n\n";
        let table: AdjacencyTable<u16> = NeighbourTableReader::default()
            .read(text.as_bytes())
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entry(1), [Some(0), None, None]);
    }

    #[test]
    fn rejects_malformed_lines() {
        let reader = NeighbourTableReader::default();
        let cases = [
            ("1 -1\n", 1),
            ("1 -1 -1 -1\n", 1),
            ("-1 -1 -1\n0 x -1\n", 2),
            ("-1 -1 -1\n-2 -1 -1\n", 2),
            ("-1 -1 -1\n\n-1 -1 -1\n", 2),
        ];
        for (text, line) in cases {
            match reader.read::<_, u32>(text.as_bytes()) {
                Err(MeshFloodError::TableParse { line: got, .. }) => assert_eq!(got, line, "{text:?}"),
                other => panic!("expected parse error for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_dangling_neighbours_and_count_mismatch() {
        let err = NeighbourTableReader::default()
            .read::<_, u32>("1 -1 -1\n7 -1 -1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, MeshFloodError::TableParse { line: 2, .. }));

        let err = NeighbourTableReader::for_triangles(4)
            .read::<_, u32>("-1 -1 -1\n".as_bytes())
            .unwrap_err();
        assert_eq!(err, MeshFloodError::AdjacencyMismatch { table: 1, mesh: 4 });
    }

    #[test]
    fn invalid_utf8_reports_the_line() {
        let mut bytes = b"-1 -1 -1\n-1 -1 -1\n".to_vec();
        bytes.extend_from_slice(&[0x31, 0xff, b' ', b'-', b'1', b'\n']);
        let err = NeighbourTableReader::default()
            .read::<_, u32>(bytes.as_slice())
            .unwrap_err();
        assert!(matches!(err, MeshFloodError::TableParse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn writer_and_string_agree() {
        let table = chain();
        let mut buf = Vec::new();
        NeighbourTableWriter.write(&table, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), table_to_string(&table));
    }

    #[test]
    fn bake_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh_NeighbouringTriangles.txt");
        let table = chain();

        NeighbourTableWriter.write_to_path(&table, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "1 -1 -1\n0 2 -1\n1 -1 -1\n");

        let back: AdjacencyTable<u32> = NeighbourTableReader::for_triangles(3)
            .read_from_path(&path)
            .unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NeighbourTableReader::default()
            .read_from_path::<u32>(dir.path().join("absent.txt"))
            .unwrap_err();
        assert!(matches!(err, MeshFloodError::Io(_)));
    }

    #[test]
    fn compact_reader_rejects_wide_values() {
        let err = NeighbourTableReader::default()
            .read::<_, u16>("65535 -1 -1\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, MeshFloodError::TableParse { line: 1, .. }));
    }
}
