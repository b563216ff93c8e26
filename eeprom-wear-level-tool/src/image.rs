use std::fs;
use std::path::Path;

use embedded_storage::{ReadStorage, Storage};

use crate::error::Error;

/// Images are addressed with 32-bit offsets.
pub const MAX_IMAGE_SIZE: usize = u32::MAX as usize;

/// An EEPROM dump held in memory. Implements [`Storage`] so the allocator can run on it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EepromImage {
    buf: Vec<u8>,
}

/// Returned for accesses beyond the end of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds;

impl EepromImage {
    /// A blank image of `size` bytes, every byte zero.
    pub fn new(size: usize) -> Result<Self, Error> {
        Self::from_bytes(vec![0u8; size])
    }

    pub fn from_bytes(buf: Vec<u8>) -> Result<Self, Error> {
        if buf.is_empty() || buf.len() > MAX_IMAGE_SIZE {
            return Err(Error::InvalidImageSize(buf.len()));
        }
        Ok(Self { buf })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::from_bytes(fs::read(path)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        fs::write(path, &self.buf)?;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn range(&self, offset: u32, len: usize) -> Result<std::ops::Range<usize>, OutOfBounds> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(OutOfBounds)?;
        if end > self.buf.len() {
            return Err(OutOfBounds);
        }
        Ok(start..end)
    }
}

impl ReadStorage for EepromImage {
    type Error = OutOfBounds;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.buf[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl Storage for EepromImage {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        self.buf[range].copy_from_slice(bytes);
        Ok(())
    }
}

/// Borrowed image, lets the allocator work on an image owned by the caller.
pub(crate) struct ImageRef<'a>(pub(crate) &'a mut EepromImage);

impl ReadStorage for ImageRef<'_> {
    type Error = OutOfBounds;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(offset, bytes)
    }

    fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

impl Storage for ImageRef<'_> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.0.write(offset, bytes)
    }
}
