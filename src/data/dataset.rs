/// Outcome of loading a vacancy file.
///
/// The two "nothing to work with" cases are values, not errors, so callers
/// must handle each one explicitly; their user-facing messages differ.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset<T> {
    Ready(T),
    /// The file has zero bytes.
    EmptyFile,
    /// The file has content but no row survived the well-formedness filter.
    NoData,
}

impl<T> Dataset<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Dataset<U> {
        match self {
            Dataset::Ready(value) => Dataset::Ready(f(value)),
            Dataset::EmptyFile => Dataset::EmptyFile,
            Dataset::NoData => Dataset::NoData,
        }
    }

    /// Like [`Dataset::map`] for fallible steps.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Dataset<U>, E> {
        Ok(match self {
            Dataset::Ready(value) => Dataset::Ready(f(value)?),
            Dataset::EmptyFile => Dataset::EmptyFile,
            Dataset::NoData => Dataset::NoData,
        })
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Dataset::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Message shown to the user when there is nothing to process.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Dataset::Ready(_) => None,
            Dataset::EmptyFile => Some("Пустой файл"),
            Dataset::NoData => Some("Нет данных"),
        }
    }
}
