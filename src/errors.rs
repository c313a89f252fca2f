//! Error Types
//!
//! This module defines the error types used throughout the showcase.
//!
//! # Overview
//!
//! The main error type [`Error`] covers:
//! - GPU initialization and surface failures
//! - Asset loading and decoding errors (the only failure kind the scene
//!   recovers from: it is logged and the asset simply never appears)
//! - Configuration errors
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.

use thiserror::Error;

/// Failures raised while fetching or decoding an asset.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The bytes could not be decoded in the expected format.
    #[error("Asset format error: {0}")]
    Format(String),

    /// The asset decoded but its contents are unusable.
    #[error("Invalid asset data: {0}")]
    InvalidData(String),

    /// Remote fetch failed.
    #[error("Network error: {0}")]
    Network(String),
}

/// The main error type for the showcase.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// The window surface could not be created or configured.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// Asset fetch or decode failure.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error (glTF data URIs).
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    // ========================================================================
    // Async & Configuration Errors
    // ========================================================================
    /// A background task failed to complete.
    #[error("Task join error: {0}")]
    TaskJoin(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Asset(AssetError::Format(err.to_string()))
    }
}

impl From<gltf::Error> for Error {
    fn from(err: gltf::Error) -> Self {
        Error::Gltf(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
