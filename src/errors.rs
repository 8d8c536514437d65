use serde::Serialize;

/// All application errors, categorized by domain.
///
/// An empty input file and a file without usable rows are not errors:
/// they are reported through [`crate::data::Dataset`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ── Files ──
    #[error("Файл не найден: {0}")]
    FileNotFound(String),

    #[error("Не удалось прочитать файл: {0}")]
    FileRead(String),

    #[error("Не удалось записать файл: {0}")]
    FileWrite(String),

    // ── CSV / Records ──
    #[error("Некорректный формат CSV: {0}")]
    InvalidCsvFormat(String),

    #[error("Отсутствует обязательный столбец: {0}")]
    MissingColumn(String),

    #[error("Неизвестный код валюты '{code}' в строке {row}")]
    UnknownCurrency { code: String, row: usize },

    #[error("Некорректная запись в строке {row}: {message}")]
    InvalidRow { row: usize, message: String },

    // ── Queries ──
    #[error("Неизвестное поле: {0}")]
    InvalidField(String),

    #[error("Некорректный фильтр: {0}")]
    InvalidFilter(String),

    #[error("Некорректный диапазон строк: {0}")]
    InvalidRange(String),

    // ── Configuration ──
    #[error("Некорректные настройки: {0}")]
    InvalidConfig(String),

    // ── Serialization ──
    #[error("Ошибка сериализации: {0}")]
    Serialization(String),
}

/// Serializable error response for JSON summaries.
#[derive(Debug, Serialize, Clone)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let code = match err {
            AppError::FileNotFound(_) => "FILE_NOT_FOUND",
            AppError::FileRead(_) => "FILE_READ",
            AppError::FileWrite(_) => "FILE_WRITE",
            AppError::InvalidCsvFormat(_) => "INVALID_CSV_FORMAT",
            AppError::MissingColumn(_) => "MISSING_COLUMN",
            AppError::UnknownCurrency { .. } => "UNKNOWN_CURRENCY",
            AppError::InvalidRow { .. } => "INVALID_ROW",
            AppError::InvalidField(_) => "INVALID_FIELD",
            AppError::InvalidFilter(_) => "INVALID_FILTER",
            AppError::InvalidRange(_) => "INVALID_RANGE",
            AppError::InvalidConfig(_) => "INVALID_CONFIG",
            AppError::Serialization(_) => "SERIALIZATION",
        };
        ErrorResponse {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let response = ErrorResponse::from(self);
        response.serialize(serializer)
    }
}

// ── Conversions from external errors ──

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound(err.to_string()),
            _ => AppError::FileRead(err.to_string()),
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::InvalidCsvFormat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_code() {
        let err = AppError::UnknownCurrency { code: "XYZ".to_string(), row: 3 };
        let resp = ErrorResponse::from(&err);
        assert_eq!(resp.code, "UNKNOWN_CURRENCY");
        assert_eq!(resp.message, "Неизвестный код валюты 'XYZ' в строке 3");
    }

    #[test]
    fn test_serializes_as_response() {
        let err = AppError::MissingColumn("area_name".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "MISSING_COLUMN");
        assert_eq!(json["message"], "Отсутствует обязательный столбец: area_name");
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(AppError::from(io), AppError::FileNotFound(_)));
    }
}
