//! JSON-lines event sink: one serialised `BoardEvent` per line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::core::BoardObserver;
use crate::types::BoardEvent;

pub struct JsonLinesLog<W: Write> {
    out: W,
    written: u64,
    /// First write failure; later events are dropped until `flush` reports it.
    error: Option<io::Error>,
}

impl JsonLinesLog<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonLinesLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            written: 0,
            error: None,
        }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &BoardEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> BoardObserver for JsonLinesLog<W> {
    fn on_event(&mut self, event: BoardEvent) {
        if self.error.is_some() {
            return;
        }
        match self.write_event(&event) {
            Ok(()) => self.written += 1,
            Err(err) => self.error = Some(err),
        }
    }
}
