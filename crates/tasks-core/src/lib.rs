pub mod config;
pub mod error;
pub mod observable;
pub mod result;

pub use config::AppConfig;
pub use error::{TaskError, ValidationError};
pub use observable::{Listener, ListenerHandle, Observable};
pub use result::TaskResult;
