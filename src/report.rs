//! JSON rendering of witness results.
//!
//! The layout is fixed: two-space indentation, one member per line and no
//! space after the colon:
//!
//! ```text
//! {
//!   "input_file_name":"case01",
//!   "cases":[
//!     {
//!       "name":"D[0]",
//!       "solution":"Yes",
//!       "assignments":{
//!         "L0":1
//!       }
//!     },
//!     {
//!       "name":"D[1]",
//!       "solution":"No"
//!     }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::info;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::error::{Error, Result};
use crate::witness::WitnessResult;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum Solution {
    Yes,
    No,
}

/// Reported assignments; keeps insertion (variable index) order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Assignments(pub Vec<(String, u8)>);

impl Serialize for Assignments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Case {
    pub name: String,
    pub solution: Solution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Assignments>,
}

impl From<&WitnessResult> for Case {
    fn from(result: &WitnessResult) -> Self {
        Case {
            name: format!("D[{}]", result.output),
            solution: if result.found {
                Solution::Yes
            } else {
                Solution::No
            },
            assignments: result
                .found
                .then(|| Assignments(result.assignments.clone())),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Report {
    pub input_file_name: String,
    pub cases: Vec<Case>,
}

impl Report {
    pub fn new(input_file_name: impl Into<String>, results: &[WitnessResult]) -> Self {
        Self {
            input_file_name: input_file_name.into(),
            cases: results.iter().map(Case::from).collect(),
        }
    }

    /// Render the document, trailing newline included.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, ReportFormatter::new());
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

/// [`PrettyFormatter`] with two-space indent, minus the space after `:`.
struct ReportFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl ReportFormatter<'_> {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for ReportFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }
}

/// Write `document` to `file`, if given, and then to `out`, byte for byte.
///
/// The file is created before anything is written, and filled before `out`
/// sees a byte: if the file cannot be written, neither sink gets the document.
pub fn emit<W: Write>(document: &[u8], out: &mut W, file: Option<&Path>) -> Result<()> {
    if let Some(path) = file {
        let sink_error = |source| Error::Sink {
            path: path.to_path_buf(),
            source,
        };
        let mut sink = File::create(path).map_err(sink_error)?;
        sink.write_all(document).map_err(sink_error)?;
        sink.flush().map_err(sink_error)?;
        info!("Report written to {}", path.display());
    }

    out.write_all(document)?;
    out.flush()?;
    Ok(())
}
