pub mod args;
pub mod client;
pub mod config;
pub mod controller {
    pub mod refresh;
}
pub mod error;
pub mod model;
pub mod server;
pub mod storage;

pub use error::CoreError;
pub use storage::Store;
