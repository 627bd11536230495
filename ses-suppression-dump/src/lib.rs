//! Reads every address on an AWS SES account suppression list.
//!
//! Pages through `ListSuppressedDestinations`, filtered to bounces and
//! complaints, never faster than one call every three seconds by default.
//!
//! ## Example
//!
//! ```no_run
//! use ses_suppression_dump::{write_addresses, Client, SuppressionListReader};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::from_env(None, None).await?;
//!     let reader = SuppressionListReader::new(client);
//!
//!     write_addresses(reader.drain(), &mut std::io::stdout()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod rate_limit;
pub mod reader;

pub use client::{Client, SuppressionApi};
pub use error::{ConfigError, Error, FetchPageError};
pub use output::write_addresses;
pub use rate_limit::{FixedWindowLimiter, RateLimit, MAX_PERIOD};
pub use reader::SuppressionListReader;
