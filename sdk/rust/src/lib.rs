//! Rust client for the posts/comments proxy.

pub mod client;

pub use client::{Comment, NewPost, Post, ProxyClient, SdkError};
