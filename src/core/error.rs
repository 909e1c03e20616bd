use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    ModulePathInvalid,
    ModuleNotRelated,

    GoModMissing,
    GoModInvalid,

    TransformFailed,

    ToolchainCommandFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ModulePathInvalid => "modpath.invalid",
            ErrorCode::ModuleNotRelated => "modpath.not_related",

            ErrorCode::GoModMissing => "gomod.missing",
            ErrorCode::GoModInvalid => "gomod.invalid",

            ErrorCode::TransformFailed => "transform.failed",

            ErrorCode::ToolchainCommandFailed => "toolchain.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulePathInvalidDetails {
    pub path: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleNotRelatedDetails {
    pub path: String,
    pub main_module: String,
    pub candidates: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoModDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformFailedDetails {
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolchainCommandFailedDetails {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    /// The target module path cannot be used for rewriting.
    pub fn module_path_invalid(path: impl Into<String>, problem: impl Into<String>) -> Self {
        let path = path.into();
        let problem = problem.into();
        let message = format!("Module path '{}' is invalid: {}", path, problem);

        Self::new(
            ErrorCode::ModulePathInvalid,
            message,
            to_details(ModulePathInvalidDetails { path, problem }),
        )
    }

    pub fn module_not_related(
        path: impl Into<String>,
        main_module: impl Into<String>,
        candidates: Vec<String>,
    ) -> Self {
        let path = path.into();
        let main_module = main_module.into();
        let message = format!(
            "Module path '{}' does not match module '{}' or any of its direct dependencies",
            path, main_module
        );

        Self::new(
            ErrorCode::ModuleNotRelated,
            message,
            to_details(ModuleNotRelatedDetails {
                path,
                main_module,
                candidates,
            }),
        )
        .with_hint("Pass the new path of the main module or of a direct requirement in go.mod")
    }

    pub fn go_mod_missing(dir: impl Into<String>) -> Self {
        let dir = dir.into();
        Self::new(
            ErrorCode::GoModMissing,
            format!("Directory '{}' is not a valid Go module", dir),
            to_details(GoModDetails {
                path: dir,
                line: None,
                problem: "go.mod not found".to_string(),
            }),
        )
        .with_hint("Run modbump from the module root or pass --path")
    }

    pub fn go_mod_invalid(
        path: impl Into<String>,
        line: Option<usize>,
        problem: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::GoModInvalid,
            "Invalid go.mod file",
            to_details(GoModDetails {
                path: path.into(),
                line,
                problem: problem.into(),
            }),
        )
    }

    pub fn transform_failed(format: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::TransformFailed,
            "Failed to transform file",
            to_details(TransformFailedDetails {
                format: format.into(),
                file: None,
                problem: problem.into(),
            }),
        )
    }

    pub fn toolchain_command_failed(details: ToolchainCommandFailedDetails) -> Self {
        let message = format!("Error running '{}'", details.command);
        Self::new(
            ErrorCode::ToolchainCommandFailed,
            message,
            to_details(details),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    /// Attach the file being processed to the error details.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        if let Value::Object(map) = &mut self.details {
            map.insert("file".to_string(), Value::String(file.into()));
        }
        self
    }

    /// Name the file format being processed, unless the details already do.
    pub fn with_format(mut self, format: &str) -> Self {
        if let Value::Object(map) = &mut self.details {
            map.entry("format")
                .or_insert_with(|| Value::String(format.to_string()));
        }
        self
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_path_invalid_carries_path_and_problem() {
        let err = Error::module_path_invalid("example.org/foo/v1", "major version v1 is implicit");
        assert_eq!(err.code.as_str(), "modpath.invalid");
        assert_eq!(err.details["path"], "example.org/foo/v1");
        assert_eq!(err.details["problem"], "major version v1 is implicit");
        assert!(err.to_string().contains("example.org/foo/v1"));
    }

    #[test]
    fn with_file_adds_file_to_details() {
        let err = Error::transform_failed("go", "unterminated string").with_file("pkg/a.go");
        assert_eq!(err.details["file"], "pkg/a.go");
        assert_eq!(err.details["format"], "go");
    }

    #[test]
    fn module_not_related_has_hint() {
        let err = Error::module_not_related("example.org/x/v2", "example.org/y", vec![]);
        assert_eq!(err.hints.len(), 1);
        assert_eq!(err.code, ErrorCode::ModuleNotRelated);
    }
}
