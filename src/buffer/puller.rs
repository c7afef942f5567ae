//! Fixed-size pulls from a [`Read`] source.

use std::io::{self, ErrorKind, Read};

use bytes::BytesMut;
use log::trace;

/// Pulls blocks of up to `capacity` bytes from a source and remembers when
/// the source ran dry.
///
/// A pull loops over [`Read::read`] until the scratch buffer is full or the
/// source returns 0, so a short pull is an authoritative end-of-source signal
/// even for pipes and sockets that hand out data piecemeal.
pub(crate) struct BufferedPuller<R> {
    source: R,
    scratch: Box<[u8]>,
    exhausted: bool,
    pulled: u64,
}

impl<R: Read> BufferedPuller<R> {
    /// Creates a puller with a scratch buffer of `capacity` bytes.
    pub(crate) fn new(source: R, capacity: usize) -> Self {
        Self {
            source,
            scratch: vec![0u8; capacity].into_boxed_slice(),
            exhausted: false,
            pulled: 0,
        }
    }

    /// Pulls up to one scratch buffer's worth of bytes and appends them to `dest`.
    ///
    /// Returns the number of bytes appended; 0 once the source is exhausted.
    /// On error, bytes read before the failure are still appended so that
    /// nothing taken from the source is lost.
    pub(crate) fn pull_into(&mut self, dest: &mut BytesMut) -> io::Result<usize> {
        if self.exhausted {
            return Ok(0);
        }

        let mut filled = 0;
        let result = loop {
            if filled == self.scratch.len() {
                break Ok(());
            }
            match self.source.read(&mut self.scratch[filled..]) {
                Ok(0) => break Ok(()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => break Err(e),
            }
        };

        dest.extend_from_slice(&self.scratch[..filled]);
        self.pulled += filled as u64;
        result?;

        if filled < self.scratch.len() {
            self.exhausted = true;
            trace!("source exhausted after {} bytes", self.pulled);
        }
        Ok(filled)
    }

    /// Returns true once a pull came back short.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<R> BufferedPuller<R> {
    /// Total bytes taken from the source so far.
    pub(crate) fn pulled(&self) -> u64 {
        self.pulled
    }

    pub(crate) fn get_ref(&self) -> &R {
        &self.source
    }

    pub(crate) fn into_inner(self) -> R {
        self.source
    }
}
