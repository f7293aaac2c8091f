//! Fixed-size part splitting over a [`std::io::Read`] source.
//!
//! # Example
//!
//! ```
//! use partstore::PartReader;
//! use std::io::Cursor;
//!
//! let data = vec![7u8; 2500];
//! let mut reader = PartReader::new(Cursor::new(data), 1024);
//!
//! let batch = reader.next_batch(10)?;
//! let sizes: Vec<_> = batch.iter().map(|p| p.len()).collect();
//! assert_eq!(sizes, vec![1024, 1024, 452]);
//! assert!(reader.next_batch(10)?.is_empty());
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, ErrorKind, Read};

use bytes::Bytes;

/// Splits a byte stream into parts of exactly `part_size` bytes, except
/// possibly the last one.
///
/// Short reads from the underlying source are retried until the part is full
/// or the stream ends, so part boundaries depend only on the byte offset.
pub struct PartReader<R> {
    reader: R,
    part_size: usize,
    offset: u64,
    finished: bool,
}

impl<R: Read> PartReader<R> {
    /// Creates a part reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The source of data
    /// * `part_size` - Bytes per part (must be non-zero)
    pub fn new(reader: R, part_size: usize) -> Self {
        debug_assert!(part_size > 0, "part_size must be non-zero");
        Self {
            reader,
            part_size,
            offset: 0,
            finished: false,
        }
    }

    /// Reads the next part, or `None` at end of stream.
    pub fn next_part(&mut self) -> io::Result<Option<Bytes>> {
        if self.finished {
            return Ok(None);
        }

        let mut part = vec![0u8; self.part_size];
        let mut filled = 0;
        while filled < self.part_size {
            match self.reader.read(&mut part[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        if filled == 0 {
            return Ok(None);
        }

        part.truncate(filled);
        self.offset += filled as u64;
        Ok(Some(Bytes::from(part)))
    }

    /// Reads up to `max_parts` parts. An empty batch means end of stream.
    pub fn next_batch(&mut self, max_parts: usize) -> io::Result<Vec<Bytes>> {
        let mut batch = Vec::with_capacity(max_parts);
        while batch.len() < max_parts {
            match self.next_part()? {
                Some(part) => batch.push(part),
                None => break,
            }
        }
        Ok(batch)
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns true once the source reported end of stream.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<R: Read> Iterator for PartReader<R> {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_part().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Yields at most `step` bytes per read call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_empty_input() {
        let mut reader = PartReader::new(Cursor::new(Vec::new()), 16);
        assert!(reader.next_part().unwrap().is_none());
        assert!(reader.next_batch(4).unwrap().is_empty());
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_exact_multiple() {
        let reader = PartReader::new(Cursor::new(vec![1u8; 64]), 16);
        let parts: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.len() == 16));
    }

    #[test]
    fn test_short_last_part() {
        let data: Vec<u8> = (0..40u8).collect();
        let reader = PartReader::new(Cursor::new(data.clone()), 16);
        let parts: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 8);

        let joined: Vec<u8> = parts.iter().flat_map(|p| p.iter().copied()).collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn test_short_reads_fill_parts() {
        let data: Vec<u8> = (0..100u8).collect();
        let trickle = Trickle {
            data: data.clone(),
            pos: 0,
            step: 3,
        };
        let mut reader = PartReader::new(trickle, 32);
        let batch = reader.next_batch(10).unwrap();
        let sizes: Vec<_> = batch.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![32, 32, 32, 4]);
        assert_eq!(reader.offset(), 100);
        assert!(reader.is_finished());
    }

    #[test]
    fn test_batches_respect_max() {
        let mut reader = PartReader::new(Cursor::new(vec![0u8; 15 * 8]), 8);
        assert_eq!(reader.next_batch(10).unwrap().len(), 10);
        assert_eq!(reader.next_batch(10).unwrap().len(), 5);
        assert!(reader.next_batch(10).unwrap().is_empty());
    }
}
