mod client;
mod http_trait;
mod ureq_impl;

pub use client::{ChangeRecord, QueryClient};
pub use http_trait::{HttpClient, HttpResponse};

pub use ureq_impl::UreqClient;
