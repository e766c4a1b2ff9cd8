//! Core types and trait definitions for the caçamba (waste container) tracker.
//!
//! No HTTP or file-format code lives here. Storage backends and location
//! services implement the traits in [`store`] and [`locate`]; the workflow
//! controller drives them through those traits only.

// Implementations use `async fn`; the trait signatures spell out `Send`.
#![allow(async_fn_in_trait)]

pub mod container;
pub mod date;
pub mod error;
pub mod locate;
pub mod store;
pub mod workflow;

pub use error::{Error, Result};
