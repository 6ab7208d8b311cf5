//! # Content Router Core
//!
//! Foundation types for the content-router dispatch engine.
//!
//! This crate provides the low-level building blocks that the framework
//! layer is built on:
//!
//! - **Buffer**: A growable, reusable byte container ([`Buffer`])
//! - **Pooling**: A generic, concurrency-safe free-list ([`Pool`]) together
//!   with the [`Reset`] contract every poolable type must satisfy
//! - **Buffer Management**: A pool wrapper specialised for buffers
//!   ([`BufferManager`])
//!
//! The framework layer (the `content-router` crate) adds contexts, matchers,
//! pipelines, and the router itself on top of these types.
//!
//! ## Ownership Discipline
//!
//! Buffers are single-owner values: they are moved between the caller, the
//! router, and the pool, never shared between concurrent flows of control.
//! Pools, by contrast, are safe for unsynchronized concurrent use.

#![warn(missing_docs)]

pub mod buffer;
pub mod pool;

pub use buffer::Buffer;
pub use pool::{BufferManager, Pool, Reset};
