pub mod error;
pub mod reduce;
pub mod registry;
pub mod transport;

pub use error::{Error, Result};
pub use reduce::CollectiveReducer;
pub use registry::{BlockProxyRegistry, Mailbox};
pub use transport::BlockTransport;
