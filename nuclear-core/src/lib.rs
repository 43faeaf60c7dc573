//! NUClear Core
//!
//! This crate provides the dispatch core of the NUClear reactor system.
//! It implements:
//!
//! - A type-keyed data store holding the latest value of each data type
//! - Reactors that register callbacks on *trigger* types and pull in
//!   *with* types at call time
//! - Synchronous, ordered dispatch with per-subscriber outcome reports
//! - A controller that publishes data and notifies interested reactors
//!
//! # Architecture
//!
//! - `reactive`: data store, subscriptions, reactors and dispatch
//! - `config`: reactor configuration
//! - `error`: the crate error type
//!
//! # Example
//!
//! ```rust
//! use nuclear_core::reactive::ReactorController;
//! use nuclear_core::ReactorConfig;
//!
//! struct Camera(&'static str);
//! struct Motor(&'static str);
//!
//! let controller = ReactorController::new();
//! let vision = controller.add_reactor(ReactorConfig::with_name("vision"));
//!
//! vision
//!     .on::<(Camera,), (Motor,), _>(|camera: &Camera, motor: &Motor| {
//!         println!("camera {} with motor {}", camera.0, motor.0);
//!     })
//!     .unwrap();
//!
//! controller.store().publish(Motor("m1"));
//! let reports = controller.emit(Camera("frame1"));
//! assert!(reports[0].is_success());
//! ```

pub mod config;
pub mod error;
pub mod reactive;

pub use config::ReactorConfig;
pub use error::{Error, Result};
