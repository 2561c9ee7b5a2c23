//! Depth buffer for the rasterizer
//!
//! Stores reciprocal depth: a larger value means nearer to the camera
//! (the per-vertex w after the perspective divide). Cleared to 0.0,
//! which reads as "infinitely far".

use std::fmt;

/// Errors at the depth-buffer boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthError {
    /// A resize was requested with a zero dimension
    InvalidDimensions { width: usize, height: usize },
    /// An index outside the buffer extent
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for DepthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthError::InvalidDimensions { width, height } => {
                write!(f, "depth buffer dimensions must be positive, got {}x{}", width, height)
            }
            DepthError::OutOfRange { index, len } => {
                write!(f, "depth buffer index {} out of range (len {})", index, len)
            }
        }
    }
}

impl std::error::Error for DepthError {}

/// Dense W x H reciprocal-depth buffer
///
/// Single-writer, single-frame use; no synchronization.
#[derive(Debug, Default)]
pub struct DepthBuffer {
    values: Vec<f32>,
    width: usize,
    height: usize,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, DepthError> {
        let mut buffer = Self::default();
        buffer.resize(width, height)?;
        Ok(buffer)
    }

    /// Reallocates to the new dimensions and clears to 0.0.
    /// No-ops when the dimensions are unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), DepthError> {
        if width == 0 || height == 0 {
            return Err(DepthError::InvalidDimensions { width, height });
        }
        if width == self.width && height == self.height {
            return Ok(());
        }
        self.values = vec![0.0; width * height];
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Fills the whole buffer; safe on an empty buffer
    pub fn clear(&mut self, value: f32) {
        self.values.fill(value);
    }

    pub fn get(&self, index: usize) -> Result<f32, DepthError> {
        self.check_index(index)?;
        Ok(self.values[index])
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<(), DepthError> {
        self.check_index(index)?;
        self.values[index] = value;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // The reference implementation accepted index == width*height, one
    // past the end; rejected here (see DESIGN.md).
    fn check_index(&self, index: usize) -> Result<(), DepthError> {
        if index >= self.values.len() {
            return Err(DepthError::OutOfRange { index, len: self.values.len() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clears_to_zero() {
        let buffer = DepthBuffer::new(4, 3).unwrap();
        assert_eq!(buffer.len(), 12);
        for i in 0..buffer.len() {
            assert_eq!(buffer.get(i).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_resize_rejects_zero_dimension() {
        let mut buffer = DepthBuffer::default();
        assert_eq!(
            buffer.resize(0, 10),
            Err(DepthError::InvalidDimensions { width: 0, height: 10 })
        );
        assert_eq!(
            buffer.resize(10, 0),
            Err(DepthError::InvalidDimensions { width: 10, height: 0 })
        );
    }

    #[test]
    fn test_resize_same_size_keeps_contents() {
        let mut buffer = DepthBuffer::new(2, 2).unwrap();
        buffer.set(3, 0.5).unwrap();
        buffer.resize(2, 2).unwrap();
        assert_eq!(buffer.get(3).unwrap(), 0.5);
    }

    #[test]
    fn test_resize_new_size_clears() {
        let mut buffer = DepthBuffer::new(2, 2).unwrap();
        buffer.set(0, 0.5).unwrap();
        buffer.resize(3, 3).unwrap();
        assert_eq!(buffer.len(), 9);
        assert_eq!(buffer.get(0).unwrap(), 0.0);
    }

    #[test]
    fn test_index_bounds() {
        let mut buffer = DepthBuffer::new(5, 5).unwrap();
        assert!(buffer.get(24).is_ok());
        assert_eq!(buffer.get(25), Err(DepthError::OutOfRange { index: 25, len: 25 }));
        assert!(buffer.set(24, 1.0).is_ok());
        assert!(buffer.set(25, 1.0).is_err());
    }

    #[test]
    fn test_clear_on_empty_buffer() {
        let mut buffer = DepthBuffer::default();
        buffer.clear(1.0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clear_fills_value() {
        let mut buffer = DepthBuffer::new(2, 2).unwrap();
        buffer.clear(0.25);
        for i in 0..4 {
            assert_eq!(buffer.get(i).unwrap(), 0.25);
        }
    }
}
