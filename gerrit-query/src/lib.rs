//! Blocking client for the Gerrit "query changes" REST endpoint.
//!
//! ```no_run
//! use gerrit_query::{ClientConfig, Credential, QueryClient, QueryOptions};
//!
//! # fn main() -> gerrit_query::Result<()> {
//! let config = ClientConfig::new(
//!     "https://review.example.com",
//!     Credential::new("jenkins", "http-password"),
//! );
//! let client = QueryClient::with_ureq(config)?;
//!
//! for change in client.query_as_objects("status:open limit:10", QueryOptions::files())? {
//!     println!("{}", change["subject"]);
//! }
//! # Ok(())
//! # }
//! ```
#![allow(clippy::module_inception)]
mod client;
mod config;
pub mod error;
mod options;
mod response;

pub use client::{ChangeRecord, HttpClient, HttpResponse, QueryClient, UreqClient};
pub use config::{ClientConfig, Credential};
pub use error::{Error, ErrorKind, Result};
pub use options::{build_query_url, ListOption, QueryOptions, CHANGES_ENDPOINT};
pub use response::{parse_change_array, strip_xssi_prefix};
