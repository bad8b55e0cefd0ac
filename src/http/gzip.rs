//! Streaming gzip envelope stripping and raw DEFLATE inflation.
//!
//! The decompressor is an incremental object fed arbitrary byte slices, so
//! it is decoupled from any I/O primitive and never needs the whole
//! compressed body in memory at once.

use crate::base::neterror::NetError;
use flate2::{Decompress, FlushDecompress, Status};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// FLG bits of the gzip fixed header (RFC 1952).
const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;

/// Header sections in wire order, used to pick the next state after one
/// section completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Fixed,
    Extra,
    FileName,
    Comment,
}

#[derive(Debug)]
enum State {
    /// Buffering the first two bytes to compare against the magic number.
    Magic,
    /// Bytes 2..10 of the fixed header (method, FLG, MTIME, XFL, OS).
    FixedHeader,
    /// Two-byte little-endian length of the extra field.
    ExtraLen,
    /// Skipping the extra field payload.
    ExtraData(usize),
    /// Skipping the null-terminated original filename.
    FileName,
    /// Skipping the null-terminated comment.
    Comment,
    /// Skipping the two-byte header CRC.
    HeaderCrc(usize),
    /// Feeding the raw DEFLATE inflater.
    Inflate,
    /// Magic mismatch: everything passes through literally.
    Passthrough,
}

/// Incremental gzip decoder: `feed` bytes in, get decompressed bytes out.
///
/// If the first two bytes are not the gzip magic number the encoding header
/// is presumed advisory and the whole stream (peeked bytes included) passes
/// through unchanged. Bytes after the DEFLATE stream end (the 8-byte gzip
/// trailer) are ignored.
pub struct GzipStream {
    state: State,
    pending: Vec<u8>,
    flags: u8,
    inflater: Decompress,
    finished: bool,
}

impl Default for GzipStream {
    fn default() -> Self {
        Self::new()
    }
}

impl GzipStream {
    pub fn new() -> Self {
        Self {
            state: State::Magic,
            pending: Vec::with_capacity(10),
            flags: 0,
            // Raw DEFLATE: the gzip envelope is stripped by hand.
            inflater: Decompress::new(false),
            finished: false,
        }
    }

    /// Feed a slice of the raw body, returning whatever output it produced.
    pub fn feed(&mut self, mut input: &[u8]) -> Result<Vec<u8>, NetError> {
        let mut out = Vec::new();
        while !input.is_empty() {
            match self.state {
                State::Magic => {
                    self.pending.push(input[0]);
                    input = &input[1..];
                    if self.pending.len() == 2 {
                        if self.pending == GZIP_MAGIC {
                            self.pending.clear();
                            self.state = State::FixedHeader;
                        } else {
                            out.append(&mut self.pending);
                            self.state = State::Passthrough;
                        }
                    }
                }
                State::FixedHeader => {
                    let need = 8 - self.pending.len();
                    let take = need.min(input.len());
                    self.pending.extend_from_slice(&input[..take]);
                    input = &input[take..];
                    if self.pending.len() == 8 {
                        self.flags = self.pending[1];
                        self.pending.clear();
                        self.state = self.section_after(Section::Fixed);
                    }
                }
                State::ExtraLen => {
                    self.pending.push(input[0]);
                    input = &input[1..];
                    if self.pending.len() == 2 {
                        let len = u16::from_le_bytes([self.pending[0], self.pending[1]]);
                        self.pending.clear();
                        self.state = if len > 0 {
                            State::ExtraData(len as usize)
                        } else {
                            self.section_after(Section::Extra)
                        };
                    }
                }
                State::ExtraData(remaining) => {
                    let take = remaining.min(input.len());
                    input = &input[take..];
                    if take == remaining {
                        self.state = self.section_after(Section::Extra);
                    } else {
                        self.state = State::ExtraData(remaining - take);
                    }
                }
                State::FileName => {
                    if let Some(pos) = input.iter().position(|&b| b == 0) {
                        input = &input[pos + 1..];
                        self.state = self.section_after(Section::FileName);
                    } else {
                        input = &[];
                    }
                }
                State::Comment => {
                    if let Some(pos) = input.iter().position(|&b| b == 0) {
                        input = &input[pos + 1..];
                        self.state = self.section_after(Section::Comment);
                    } else {
                        input = &[];
                    }
                }
                State::HeaderCrc(remaining) => {
                    let take = remaining.min(input.len());
                    input = &input[take..];
                    if take == remaining {
                        self.state = State::Inflate;
                    } else {
                        self.state = State::HeaderCrc(remaining - take);
                    }
                }
                State::Inflate => {
                    self.inflate(input, &mut out)?;
                    input = &[];
                }
                State::Passthrough => {
                    out.extend_from_slice(input);
                    input = &[];
                }
            }
        }
        Ok(out)
    }

    /// Flush whatever a truncated stream left behind.
    ///
    /// A body shorter than two bytes never resolved the magic comparison;
    /// its bytes are literal content.
    pub fn finish(mut self) -> Vec<u8> {
        match self.state {
            State::Magic => std::mem::take(&mut self.pending),
            _ => Vec::new(),
        }
    }

    fn section_after(&self, completed: Section) -> State {
        if completed < Section::Extra && self.flags & FEXTRA != 0 {
            return State::ExtraLen;
        }
        if completed < Section::FileName && self.flags & FNAME != 0 {
            return State::FileName;
        }
        if completed < Section::Comment && self.flags & FCOMMENT != 0 {
            return State::Comment;
        }
        if self.flags & FHCRC != 0 {
            return State::HeaderCrc(2);
        }
        State::Inflate
    }

    fn inflate(&mut self, mut input: &[u8], out: &mut Vec<u8>) -> Result<(), NetError> {
        let mut buf = [0u8; 4096];
        while !input.is_empty() && !self.finished {
            let before_in = self.inflater.total_in();
            let before_out = self.inflater.total_out();
            let status = self
                .inflater
                .decompress(input, &mut buf, FlushDecompress::None)
                .map_err(|e| NetError::network(format!("gzip inflate failed: {e}")))?;
            let consumed = (self.inflater.total_in() - before_in) as usize;
            let produced = (self.inflater.total_out() - before_out) as usize;
            out.extend_from_slice(&buf[..produced]);
            input = &input[consumed..];
            match status {
                Status::StreamEnd => self.finished = true,
                _ if consumed == 0 && produced == 0 => break,
                _ => {}
            }
        }
        Ok(())
    }
}
