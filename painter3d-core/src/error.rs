/// Error types for scene mutation, frame expansion and STL import
use std::fmt;

/// Which collection an out-of-range index addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Model,
    Entity,
    /// A triangle corner; `model` is `None` for caller-supplied world buffers
    TriangleVertex {
        model: Option<usize>,
        triangle: usize,
    },
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Model => f.write_str("model"),
            Slot::Entity => f.write_str("entity"),
            Slot::TriangleVertex {
                model: Some(model),
                triangle,
            } => write!(f, "vertex of triangle {} in model {}", triangle, model),
            Slot::TriangleVertex {
                model: None,
                triangle,
            } => write!(f, "vertex of world triangle {}", triangle),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    IndexOutOfRange { slot: Slot, index: usize, len: usize },
}

impl SceneError {
    pub(crate) fn out_of_range(slot: Slot, index: usize, len: usize) -> Self {
        SceneError::IndexOutOfRange { slot, index, len }
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::IndexOutOfRange { slot, index, len } => {
                write!(f, "{} index {} out of range (len {})", slot, index, len)
            }
        }
    }
}

impl std::error::Error for SceneError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StlError {
    TooSmall(usize),
    Truncated { expected: usize, actual: usize },
    Ascii(String),
}

impl fmt::Display for StlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StlError::TooSmall(len) => {
                write!(f, "file too small to be a valid STL ({} bytes)", len)
            }
            StlError::Truncated { expected, actual } => write!(
                f,
                "unexpected end of file: expected {} bytes, found {}",
                expected, actual
            ),
            StlError::Ascii(reason) => write!(f, "failed to parse ASCII STL: {}", reason),
        }
    }
}

impl std::error::Error for StlError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_slot() {
        let err = SceneError::out_of_range(
            Slot::TriangleVertex {
                model: Some(2),
                triangle: 7,
            },
            9,
            8,
        );
        assert_eq!(
            err.to_string(),
            "vertex of triangle 7 in model 2 index 9 out of range (len 8)"
        );
    }
}
