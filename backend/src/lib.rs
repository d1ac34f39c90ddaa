//! # Cardio Risk Backend
//!
//! Cardiovascular disease risk prediction behind a small REST API.
//!
//! A caller submits eleven raw patient attributes. The service validates them,
//! encodes them into the fixed 14-feature layout the classifier was trained on,
//! scores them with a gradient-boosted tree ensemble, and applies a fixed decision
//! threshold to return a `0`/`1` risk category.
//!
//! ## Architecture
//!
//! - [`models`]: patient payloads and the fixed-schema feature vector
//! - [`services`]: validation, feature encoding, and the prediction pipeline
//! - [`model`]: loading the XGBoost JSON artifact and scoring with it
//! - [`config`]: TOML file and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`client`]: terminal form client for a running server
//!
//! The model is loaded once at startup and shared read-only between requests;
//! nothing else outlives a request.

pub mod config;
pub mod model;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(feature = "client")]
pub mod client;
