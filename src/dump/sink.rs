//! Output channel for exchange blocks.
//!
//! Each call to [`DumpSink::emit`] writes one whole block. Implementations
//! must not let two blocks interleave.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for rendered exchange blocks.
pub trait DumpSink: Send + Sync {
    fn emit(&self, block: &[u8]) -> io::Result<()>;
}

/// Writes blocks to the process's standard output.
///
/// The stdout lock is held across the write and flush of a block.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl DumpSink for StdoutSink {
    fn emit(&self, block: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(block)?;
        out.flush()
    }
}

/// Keeps blocks in memory, one entry per block.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    blocks: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn blocks(&self) -> Vec<Vec<u8>> {
        self.blocks
            .lock()
            .map(|blocks| blocks.clone())
            .unwrap_or_default()
    }

    /// All blocks concatenated, as stdout would show them.
    pub fn contents(&self) -> Vec<u8> {
        self.blocks().concat()
    }
}

impl DumpSink for MemorySink {
    fn emit(&self, block: &[u8]) -> io::Result<()> {
        self.blocks
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "dump sink poisoned"))?
            .push(block.to_vec());
        Ok(())
    }
}
