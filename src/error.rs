use std::fmt;
use std::path::PathBuf;

/// Everything that can go wrong between reading the fruit tables and
/// rendering the decision plot.
#[derive(Debug)]
pub enum NnError {
    /// A data or config file could not be opened or read.
    Io { path: PathBuf, source: std::io::Error },
    /// A data file was readable but its contents were not a valid table.
    Parse { path: PathBuf, message: String },
    /// A requested column is not present in the file header.
    MissingColumn { path: PathBuf, column: String },
    /// An input vector does not match the dimension the receiver expects.
    DimensionMismatch { expected: usize, got: usize },
    /// Layer `index` takes `got` inputs but the previous layer produces `expected`.
    LayerMismatch { index: usize, expected: usize, got: usize },
    /// A 1-based class index outside `1..=classes`.
    InvalidClass { class: usize, classes: usize },
    EmptyDataset,
    Config(String),
    Image(String),
}

pub type Result<T> = std::result::Result<T, NnError>;

impl fmt::Display for NnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NnError::Io { path, source } => {
                write!(f, "cannot read '{}': {}", path.display(), source)
            }
            NnError::Parse { path, message } => {
                write!(f, "cannot parse '{}': {}", path.display(), message)
            }
            NnError::MissingColumn { path, column } => {
                write!(f, "'{}' has no column named '{}'", path.display(), column)
            }
            NnError::DimensionMismatch { expected, got } => {
                write!(f, "dimension mismatch: expected length {}, got {}", expected, got)
            }
            NnError::LayerMismatch { index, expected, got } => write!(
                f,
                "layer {} expects {} inputs but the previous layer produces {}",
                index, got, expected
            ),
            NnError::InvalidClass { class, classes } => {
                write!(f, "class index {} is outside 1..={}", class, classes)
            }
            NnError::EmptyDataset => write!(f, "dataset contains no samples"),
            NnError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            NnError::Image(msg) => write!(f, "cannot write image: {}", msg),
        }
    }
}

impl std::error::Error for NnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NnError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Shape check shared by layers, networks and the trainer.
pub(crate) fn check_dim(expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(NnError::DimensionMismatch { expected, got })
    }
}
