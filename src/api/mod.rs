//! HTTP access to the Tarasul backend

mod client;

pub use client::ApiClient;
