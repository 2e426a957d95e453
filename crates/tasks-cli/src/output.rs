use serde::Serialize;
use tasks_core::TaskError;

/// Machine-readable failure category, so scripts need not parse messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    IllegalState,
    Storage,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn of(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<TaskError>() {
            Some(task_err) => Self::of_task_error(task_err),
            None => Self::Internal,
        }
    }

    fn of_task_error(err: &TaskError) -> Self {
        if err.is_validation() {
            Self::Validation
        } else if err.is_not_found() {
            Self::NotFound
        } else if err.is_illegal_state() {
            Self::IllegalState
        } else if matches!(err, TaskError::Config(_)) {
            Self::Config
        } else {
            Self::Storage
        }
    }
}

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T: Serialize> CliResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            api_version: env!("CARGO_PKG_VERSION"),
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }
}

impl CliResponse<()> {
    fn failed(message: String, kind: ErrorKind) -> Self {
        Self {
            success: false,
            api_version: env!("CARGO_PKG_VERSION"),
            data: None,
            error: Some(message),
            error_kind: Some(kind),
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
}

pub fn output_success<T: Serialize>(data: T) {
    match serde_json::to_string(&CliResponse::ok(data)) {
        Ok(json) => println!("{}", json),
        Err(e) => output_error(&format!("Failed to encode response: {}", e), ErrorKind::Internal),
    }
}

pub fn output_list<T: Serialize>(items: Vec<T>) {
    let count = items.len();
    output_success(ListResponse { items, count });
}

/// Report `err` on stderr and exit with code 1.
pub fn output_failure(err: &anyhow::Error) -> ! {
    output_error(&err.to_string(), ErrorKind::of(err))
}

pub fn output_error(message: &str, kind: ErrorKind) -> ! {
    match serde_json::to_string(&CliResponse::failed(message.to_string(), kind)) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", message),
    }
    std::process::exit(1);
}
