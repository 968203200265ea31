//! Instruction traces.
//!
//! A text trace holds one instruction per line:
//!
//! ```text
//! # pc          kind   outcome  target
//! 0x401000      jcc    T        0x401040
//! 0x401004      op     N        0x0
//! ```
//!
//! Addresses follow the same radix rules as [parse_uint]. Blank lines and
//! anything after a `#` are ignored.

pub mod synth;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::branch::*;
use crate::config::parse_uint;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("couldn't read trace: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },
}

/// A sequence of [BranchRecord] loaded from a file or generated.
#[derive(Clone, Debug)]
pub struct Trace {
    pub data: Vec<BranchRecord>,
    pub name: String,
}
impl Trace {
    pub fn new(name: impl ToString, data: Vec<BranchRecord>) -> Self {
        Self { data, name: name.to_string() }
    }

    /// Read a text trace from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let f = File::open(path)?;
        let res = Self::from_reader(&name, f)?;
        info!("loaded {} records from {}", res.num_entries(), path.display());
        Ok(res)
    }

    /// Read a text trace from some reader.
    pub fn from_reader(name: &str, r: impl Read) -> Result<Self, TraceError> {
        let mut data = Vec::new();
        for (num, line) in BufReader::new(r).lines().enumerate() {
            let line = line?;
            if let Some(record) = parse_line(num + 1, &line)? {
                data.push(record);
            }
        }
        Ok(Self::new(name, data))
    }

    /// Write the trace in the text format accepted by [Trace::from_reader].
    pub fn write_to(&self, mut w: impl Write) -> io::Result<()> {
        for r in self.data.iter() {
            let outcome = if r.outcome == Outcome::T { 'T' } else { 'N' };
            writeln!(w, "{:#x} {} {} {:#x}", r.pc, r.kind, outcome, r.tgt)?;
        }
        Ok(())
    }

    /// Return the number of records
    pub fn num_entries(&self) -> usize { self.data.len() }

    pub fn name(&self) -> &str { &self.name }

    /// Return a slice of records.
    pub fn as_slice(&self) -> &[BranchRecord] { &self.data }

    /// Return a truncated slice of records
    pub fn as_slice_trunc(&self, limit: usize) -> &[BranchRecord] {
        &self.data[..limit.min(self.data.len())]
    }
}

fn parse_line(line: usize, text: &str) -> Result<Option<BranchRecord>, TraceError> {
    let err = |msg: String| TraceError::Parse { line, msg };

    let text = match text.split_once('#') {
        Some((head, _)) => head,
        None => text,
    };
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() != 4 {
        return Err(err(format!("expected 4 fields, got {}", fields.len())));
    }

    let pc = parse_uint(fields[0]).map_err(|e| err(e.to_string()))?;
    let kind = fields[1].parse::<OpKind>().map_err(err)?;
    let outcome = match fields[2] {
        "T" | "t" | "1" => Outcome::T,
        "N" | "n" | "0" => Outcome::N,
        s => return Err(err(format!("bad outcome '{}'", s))),
    };
    let tgt = parse_uint(fields[3]).map_err(|e| err(e.to_string()))?;
    Ok(Some(BranchRecord::new(pc, kind, outcome, tgt)))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "\
        # a small loop\n\
        0x1000 op N 0x0\n\
        \n\
        0x1004 jcc T 0x1000   # back edge\n\
        4104 call.ind T 0x2000\n";

    #[test]
    fn parse_text_trace() {
        let t = Trace::from_reader("loop", TEXT.as_bytes()).unwrap();
        assert_eq!(t.num_entries(), 3);
        assert_eq!(t.name(), "loop");
        assert_eq!(t.as_slice()[1],
            BranchRecord::new(0x1004, OpKind::JmpCond, Outcome::T, 0x1000));
        assert_eq!(t.as_slice()[2].pc, 4104);
        assert_eq!(t.as_slice()[2].kind, OpKind::CallIndirect);
        assert_eq!(t.as_slice_trunc(1).len(), 1);
        assert_eq!(t.as_slice_trunc(10).len(), 3);
    }

    #[test]
    fn written_trace_reads_back() {
        let t = Trace::from_reader("loop", TEXT.as_bytes()).unwrap();
        let mut buf = Vec::new();
        t.write_to(&mut buf).unwrap();
        let u = Trace::from_reader("loop", buf.as_slice()).unwrap();
        assert_eq!(t.data, u.data);
    }

    #[test]
    fn parse_errors_name_the_line() {
        let bad = "0x1000 jcc T 0x0\n0x1004 jcc maybe 0x0\n";
        match Trace::from_reader("bad", bad.as_bytes()) {
            Err(TraceError::Parse { line, msg }) => {
                assert_eq!(line, 2);
                assert!(msg.contains("maybe"));
            },
            other => panic!("unexpected {:?}", other),
        }

        let short = "0x1000 jcc T\n";
        assert!(matches!(
            Trace::from_reader("short", short.as_bytes()),
            Err(TraceError::Parse { line: 1, .. })
        ));

        let kind = "0x1000 jz T 0x0\n";
        assert!(matches!(
            Trace::from_reader("kind", kind.as_bytes()),
            Err(TraceError::Parse { line: 1, .. })
        ));
    }
}
