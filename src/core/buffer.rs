// Request byte buffer: amortized fallible growth, content kept null-terminated.
use std::fmt;

use crate::core::error::{Error, ErrorKind};

const MIN_CAPACITY: usize = 256;

/// Append-only byte buffer used to materialize request documents.
///
/// Storage always carries one trailing zero byte past the content so the span
/// can be handed to C-string consumers; `len()` and `as_bytes()` exclude it.
#[derive(Debug, Default)]
pub struct ByteBuf {
    data: Vec<u8>,
}

impl ByteBuf {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.data.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Grows the backing store to at least `min_capacity` bytes, stepping the
    /// target by 1.5x per round. Existing content is untouched on failure.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<(), Error> {
        if min_capacity <= self.data.capacity() {
            return Ok(());
        }
        let mut new_cap = self.data.capacity().max(MIN_CAPACITY);
        while new_cap < min_capacity {
            new_cap = new_cap.saturating_add(new_cap >> 1);
        }
        let additional = new_cap - self.data.len();
        self.data.try_reserve(additional).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("request buffer allocation failed")
                .with_source(err)
        })
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.reserve(self.len() + bytes.len() + 1)?;
        self.data.pop();
        self.data.extend_from_slice(bytes);
        self.data.push(0);
        Ok(())
    }

    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Error> {
        struct Adapter<'a> {
            buf: &'a mut ByteBuf,
            err: Option<Error>,
        }

        impl fmt::Write for Adapter<'_> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                match self.buf.append_bytes(s.as_bytes()) {
                    Ok(()) => Ok(()),
                    Err(err) => {
                        self.err = Some(err);
                        Err(fmt::Error)
                    }
                }
            }
        }

        let mut adapter = Adapter {
            buf: self,
            err: None,
        };
        match fmt::Write::write_fmt(&mut adapter, args) {
            Ok(()) => Ok(()),
            Err(_) => Err(adapter.err.take().unwrap_or_else(|| {
                Error::new(ErrorKind::Internal).with_message("formatted append failed")
            })),
        }
    }
}
