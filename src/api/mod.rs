//! REST client for the SwapRate API

pub mod client;

pub use client::ApiClient;
