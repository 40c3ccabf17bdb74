//! Opening file arguments that may already be open
//!
//! A parameter defaulting to a standard stream receives a filename when one
//! is given on the command line. [`smart_open`] accepts either and hands back
//! something to read from or write to; only files it opened itself are closed
//! when the handle is dropped.

use crate::signature::{StdStream, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

/// A file opened by [`smart_open`], or a borrowed standard stream
#[derive(Debug)]
pub enum SmartFile {
    Opened(File),
    Stdin(io::Stdin),
    Stdout(io::Stdout),
    Stderr(io::Stderr),
}

impl SmartFile {
    /// Whether dropping this handle closes it
    pub fn owns_handle(&self) -> bool {
        matches!(self, SmartFile::Opened(_))
    }

    fn from_stream(stream: StdStream) -> Self {
        match stream {
            StdStream::Stdin => SmartFile::Stdin(io::stdin()),
            StdStream::Stdout => SmartFile::Stdout(io::stdout()),
            StdStream::Stderr => SmartFile::Stderr(io::stderr()),
        }
    }
}

fn unsupported(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, format!("cannot {}", what))
}

impl Read for SmartFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SmartFile::Opened(file) => file.read(buf),
            SmartFile::Stdin(stdin) => stdin.read(buf),
            SmartFile::Stdout(_) | SmartFile::Stderr(_) => Err(unsupported("read from an output stream")),
        }
    }
}

impl Write for SmartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SmartFile::Opened(file) => file.write(buf),
            SmartFile::Stdout(stdout) => stdout.write(buf),
            SmartFile::Stderr(stderr) => stderr.write(buf),
            SmartFile::Stdin(_) => Err(unsupported("write to stdin")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SmartFile::Opened(file) => file.flush(),
            SmartFile::Stdout(stdout) => stdout.flush(),
            SmartFile::Stderr(stderr) => stderr.flush(),
            SmartFile::Stdin(_) => Ok(()),
        }
    }
}

/// Open a path value with `options`, or pass a stream value through
pub fn smart_open(target: &Value, options: &OpenOptions) -> io::Result<SmartFile> {
    match target {
        Value::Str(path) => open_path(Path::new(path), options),
        Value::Stream(stream) => Ok(SmartFile::from_stream(*stream)),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot open {}: not a path or a stream", other),
        )),
    }
}

/// Open for reading
pub fn smart_open_read(target: &Value) -> io::Result<SmartFile> {
    smart_open(target, OpenOptions::new().read(true))
}

/// Open for writing, creating or truncating a file
pub fn smart_open_write(target: &Value) -> io::Result<SmartFile> {
    smart_open(target, OpenOptions::new().write(true).create(true).truncate(true))
}

fn open_path(path: &Path, options: &OpenOptions) -> io::Result<SmartFile> {
    tracing::debug!(path = %path.display(), "opening file argument");
    options.open(path).map(SmartFile::Opened)
}
