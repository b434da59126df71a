//! Forward-only walkers over the length-prefixed river and mountain records.
//!
//! Each record is `i32 slot, i32 length, length × segment`. Nothing indexes
//! the records, so reaching record N means stepping over the N before it.
//! The iterators here do that one record at a time and stop for good after
//! the first corrupt record.

use std::iter::FusedIterator;

use tessera_records::RecordReader;

use crate::error::MapError;
use crate::records::{Mountain, River, RiverSegment};

const PREFIX_SIZE: usize = 8;
const MOUNTAIN_SEGMENT_SIZE: usize = 4;

#[derive(Clone, Debug)]
struct PrefixedWalker<'a> {
    reader: RecordReader<'a>,
    kind: &'static str,
    offset: usize,
    index: usize,
    count: usize,
    segment_size: usize,
    failed: bool,
}

impl<'a> PrefixedWalker<'a> {
    fn new(
        bytes: &'a [u8],
        kind: &'static str,
        start: usize,
        count: usize,
        segment_size: usize,
    ) -> Self {
        Self {
            reader: RecordReader::new(bytes),
            kind,
            offset: start,
            index: 0,
            count,
            segment_size,
            failed: false,
        }
    }

    fn corrupt(&mut self) -> MapError {
        self.failed = true;
        MapError::CorruptSequence {
            kind: self.kind,
            index: self.index,
            offset: self.offset,
        }
    }

    /// Step over the next record. Yields the payload offset and segment count.
    fn step(&mut self) -> Option<Result<(usize, usize), MapError>> {
        if self.failed || self.index >= self.count {
            return None;
        }
        let len = match self.reader.i32_at(self.offset + 4).map(usize::try_from) {
            Ok(Ok(len)) => len,
            _ => return Some(Err(self.corrupt())),
        };
        let payload = self.offset + PREFIX_SIZE;
        let end = len
            .checked_mul(self.segment_size)
            .and_then(|size| size.checked_add(payload));
        match end {
            Some(end) if end <= self.reader.len() => {
                self.offset = end;
                self.index += 1;
                Some(Ok((payload, len)))
            }
            _ => Some(Err(self.corrupt())),
        }
    }

    /// Walk every remaining record and return the offset just past the last.
    fn skip_all(mut self) -> Result<usize, MapError> {
        while let Some(step) = self.step() {
            step?;
        }
        Ok(self.offset)
    }

    /// Step over `n` records without decoding their payloads.
    fn advance(&mut self, n: usize) -> Result<(), MapError> {
        for _ in 0..n {
            match self.step() {
                Some(step) => {
                    step?;
                }
                None => break,
            }
        }
        Ok(())
    }

    fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.count - self.index
        }
    }
}

/// Lazy sequence of rivers in file order.
#[derive(Clone, Debug)]
pub struct RiverIter<'a> {
    walker: PrefixedWalker<'a>,
    has_width: bool,
}

impl<'a> RiverIter<'a> {
    pub(crate) fn new(
        bytes: &'a [u8],
        start: usize,
        count: usize,
        segment_size: usize,
        has_width: bool,
    ) -> Self {
        Self {
            walker: PrefixedWalker::new(bytes, "river", start, count, segment_size),
            has_width,
        }
    }

    /// Skip `n` rivers without decoding them.
    pub(crate) fn advance(&mut self, n: usize) -> Result<(), MapError> {
        self.walker.advance(n)
    }

    /// Consume the iterator and return the offset where mountain records begin.
    pub(crate) fn end_offset(self) -> Result<usize, MapError> {
        self.walker.skip_all()
    }

    fn decode(&self, payload: usize, len: usize) -> Result<River, MapError> {
        let reader = self.walker.reader;
        let stride = self.walker.segment_size;
        let segments = (0..len)
            .map(|k| -> Result<RiverSegment, MapError> {
                let at = payload + k * stride;
                let tile = reader.i32_at(at)?;
                let width = if self.has_width {
                    Some(reader.u8_at(at + 4)?)
                } else {
                    None
                };
                Ok(RiverSegment { tile, width })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(River { segments })
    }
}

impl Iterator for RiverIter<'_> {
    type Item = Result<River, MapError>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.walker.step()?;
        Some(step.and_then(|(payload, len)| self.decode(payload, len)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.walker.remaining()))
    }
}

impl FusedIterator for RiverIter<'_> {}

/// Lazy sequence of mountain ranges in file order.
#[derive(Clone, Debug)]
pub struct MountainIter<'a> {
    walker: PrefixedWalker<'a>,
}

impl<'a> MountainIter<'a> {
    pub(crate) fn new(bytes: &'a [u8], start: usize, count: usize) -> Self {
        Self {
            walker: PrefixedWalker::new(bytes, "mountain", start, count, MOUNTAIN_SEGMENT_SIZE),
        }
    }

    /// Skip `n` mountain ranges without decoding them.
    pub(crate) fn advance(&mut self, n: usize) -> Result<(), MapError> {
        self.walker.advance(n)
    }
}

impl Iterator for MountainIter<'_> {
    type Item = Result<Mountain, MapError>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.walker.step()?;
        let reader = self.walker.reader;
        Some(step.and_then(|(payload, len)| {
            let tiles = (0..len)
                .map(|k| reader.i32_at(payload + k * MOUNTAIN_SEGMENT_SIZE))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Mountain { tiles })
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.walker.remaining()))
    }
}

impl FusedIterator for MountainIter<'_> {}
