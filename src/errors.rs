//! Error Types
//!
//! One error enum serves the whole crate: GPU bring-up, window plumbing,
//! mesh fetching over HTTP or from disk, and PLY decoding all funnel into
//! [`ViewerError`].
//!
//! # Overview
//!
//! Fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, ViewerError>`. Source errors from wgpu, winit,
//! reqwest and std convert with `?` through the `#[from]` impls below.
//!
//! # Usage
//!
//! ```rust,ignore
//! use plyview::errors::Result;
//!
//! fn fetch_mesh() -> Result<()> {
//!     // fallible work, then
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Anything that can go wrong while the viewer runs.
///
/// Variants either wrap a source error via `#[from]` or carry a message
/// built at the failure site.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // GPU & Window
    // ========================================================================
    /// No usable GPU adapter, or the surface rejected the one found.
    #[error("GPU adapter request failed: {0}")]
    AdapterRequestFailed(String),

    /// The adapter refused the device request.
    #[error("GPU device request failed: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// The window could not be wrapped in a presentation surface.
    #[error("Surface creation failed: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// Raw window or display handle was unavailable.
    #[error("Window handle error: {0}")]
    WindowError(#[from] raw_window_handle::HandleError),

    /// The winit event loop failed to build or run.
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Mesh Loading
    // ========================================================================
    /// Reading a mesh file from disk failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The HTTP transfer itself failed (connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The source string is not a valid URL.
    #[error("Invalid URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// The server answered with a non-success status.
    #[error("Server returned status {status}")]
    HttpResponseError {
        /// HTTP status code
        status: u16,
    },

    // ========================================================================
    // Decoding
    // ========================================================================
    /// Malformed PLY header, truncated body, or an unsupported construct.
    #[error("PLY parse error: {0}")]
    ParseError(String),

    // ========================================================================
    // Runtime
    // ========================================================================
    /// A background load task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskJoinError(String),
}

impl From<tokio::task::JoinError> for ViewerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ViewerError::TaskJoinError(err.to_string())
    }
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
