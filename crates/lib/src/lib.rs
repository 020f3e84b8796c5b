pub mod config;
pub mod error;
pub mod objects;
pub mod output;
pub(crate) mod serde;
pub mod time;


pub use self::error::Error;

/// A `Result` alias where the `Err` case is `ticketfmt::Error`.
pub type Result<T> = std::result::Result<T, Error>;
