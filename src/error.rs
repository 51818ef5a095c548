// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the experiment lifecycle.
//!
//! All variants are terminal for the current invocation: the controller
//! never retries internally. The one recoverable class, a malformed status
//! update, is modeled separately as [`StatusParseError`] and handled
//! inside the watch loop.
//!
//! [`StatusParseError`]: crate::status::StatusParseError

use thiserror::Error;

/// Errors surfaced by the lifecycle controller.
#[derive(Debug, Error)]
pub enum ChaosError {
    /// The experiment template text could not be parsed.
    #[error("failed to parse experiment template: {0}")]
    Template(String),

    /// The template is missing a structurally required section.
    #[error("experiment template is missing required section `{0}`")]
    MissingSection(&'static str),

    /// The template declares a kind with no known resource coordinates.
    #[error("unsupported chaos kind: {0}")]
    UnsupportedKind(String),

    /// The host-supplied configuration failed validation.
    #[error("invalid experiment config: {0}")]
    Config(String),

    /// The cluster API rejected the create call.
    #[error("failed to create experiment: {0}")]
    Creation(#[source] ApiError),

    /// The watch subscription could not be opened.
    #[error("failed to start experiment watch: {0}")]
    Watch(#[source] ApiError),

    /// The watch stream delivered an error event.
    #[error("watch stream reported an error: {0}")]
    WatchFailed(String),

    /// The watch stream ended before a terminal phase was observed.
    #[error("watch channel closed before the experiment reached a terminal phase")]
    WatchChannelClosed,

    /// The caller-supplied deadline elapsed first.
    #[error("timed out waiting for the experiment to finish")]
    WatchTimeout,

    /// The parent invocation was canceled while watching.
    #[error("watch canceled before the experiment finished")]
    Canceled,

    /// The cluster API rejected the delete call for a reason other than
    /// the resource already being absent.
    #[error("failed to delete experiment: {0}")]
    Deletion(#[source] ApiError),
}

/// Transport-level result of a single cluster API call.
///
/// `NotFound` is kept distinguishable so delete can treat an already
/// absent resource as success.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The named resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The API server rejected the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The request never reached the API server.
    #[error("transport failure: {0}")]
    Transport(String),
}
