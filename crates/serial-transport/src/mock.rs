use crate::{Result, SerialLink};
use std::collections::VecDeque;

/// A scripted in-process link for driver tests.
///
/// Writes and wake-line transitions are recorded; reads replay queued chunks
/// in order. Once the queue is empty a read behaves like a timed-out port
/// and returns no bytes.
#[derive(Debug, Default)]
pub struct MockLink {
    written: Vec<u8>,
    reads: VecDeque<Vec<u8>>,
    wake_transitions: Vec<bool>,
    flushes: usize,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one chunk of bytes to be returned by a future `read`.
    pub fn push_read(&mut self, chunk: &[u8]) {
        self.reads.push_back(chunk.to_vec());
    }

    /// Every byte written so far, in order.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Drop recorded writes, keeping queued reads.
    pub fn clear_written(&mut self) {
        self.written.clear();
    }

    /// Recorded wake-line transitions, in order.
    pub fn wake_transitions(&self) -> &[bool] {
        &self.wake_transitions
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl SerialLink for MockLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>> {
        match self.reads.pop_front() {
            Some(mut chunk) => {
                if chunk.len() > max {
                    // Keep the tail for the next read
                    let rest = chunk.split_off(max);
                    self.reads.push_front(rest);
                }
                Ok(chunk)
            }
            // Script exhausted: behave like a timed-out port
            None => Ok(Vec::new()),
        }
    }

    fn flush_input(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn set_wake_line(&mut self, asserted: bool) -> Result<()> {
        self.wake_transitions.push(asserted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_replay_in_order() {
        let mut link = MockLink::new();
        link.push_read(&[1, 2, 3]);
        link.push_read(&[4]);

        assert_eq!(link.read(8).unwrap(), vec![1, 2, 3]);
        assert_eq!(link.read(8).unwrap(), vec![4]);
        assert!(link.read(8).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_chunk_is_split() {
        let mut link = MockLink::new();
        link.push_read(&[1, 2, 3, 4, 5]);

        assert_eq!(link.read(2).unwrap(), vec![1, 2]);
        assert_eq!(link.read(16).unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn test_writes_and_wake_recorded() {
        let mut link = MockLink::new();
        link.write_all(&[0x80]).unwrap();
        link.write_all(&[0x89, 0x00]).unwrap();
        link.set_wake_line(true).unwrap();
        link.set_wake_line(false).unwrap();

        assert_eq!(link.written(), &[0x80, 0x89, 0x00]);
        assert_eq!(link.wake_transitions(), &[true, false]);
    }
}
