//! Source pulling.
//!
//! Each sequencer owns one [`BufferedPuller`] with its own scratch buffer;
//! there is no shared or thread-local buffer state. It is an implementation
//! detail and not part of the public API.

mod puller;

pub(crate) use puller::BufferedPuller;
