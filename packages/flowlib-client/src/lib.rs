pub mod controller;
pub mod debounce;
pub mod transport;
pub mod view;

mod error;

pub use controller::{ControllerOptions, LoadingMode, QueryController, ViewState};
pub use debounce::{DEFAULT_DEBOUNCE, QueryDebouncer};
pub use error::{Error, Result};
pub use transport::{BoxFuture, HttpTransport, SearchTransport};
