//! # template-sync
//!
//! A command-line tool for keeping HTML email templates consistent between a
//! version-controlled file tree and a marketing platform's remote template
//! store.
//!
//! ## Overview
//!
//! Templates live as formatted HTML files in a flat directory, named
//! `template_{id}_{slug}.html` so each file carries its remote identifier.
//! `template-sync` pulls a template's content down from the remote store
//! (formatting it for readable diffs) and pushes local edits back up, either
//! for the whole directory or just the files changed between two git
//! revisions. Push runs record a per-template report that a CI step can turn
//! into a human summary.
//!
//! ## Key Features
//!
//! - **Bidirectional sync**: Pull a template into the file tree, or push many
//!   local templates to the remote store
//! - **Change detection**: Push only the templates changed in a revision
//!   range, falling back to a full sync when no range is available
//! - **Stable formatting**: Remote HTML is normalized into an indented form
//!   so version-control diffs reflect only meaningful changes
//! - **Batch reporting**: A failing template never aborts the batch; every
//!   outcome lands in a JSON run report and the run fails in aggregate
//! - **Webhook setup**: Subscribe a delivery URL to remote template-update
//!   events so edits on either side trigger a sync

/// Change set resolution for push operations.
///
/// Determines which local templates need to be pushed: either every template
/// in the store, or only those that differ between two git revisions, with a
/// silent fallback to the full inventory when detection is unavailable.
pub mod changeset;

/// Remote template API client.
///
/// Defines the transport-independent capability the sync flows consume
/// (fetch, update, webhook creation) and its HTTP/JSON implementation,
/// including the two-endpoint fetch fallback and structured failures.
pub mod client;

/// API and platform configuration.
///
/// The explicit [`config::ApiConfig`] struct injected into the remote client,
/// plus platform-aware paths for logs following OS conventions.
pub mod config;

/// Cosmetic HTML normalization for storage and diffing.
pub mod format;

/// Logging configuration and utilities.
///
/// Sets up dual logging to both console (configurable via `RUST_LOG`) and a
/// persistent log file in the config directory, with size-based rotation.
pub mod logger;

/// Filename codec for the `template_{id}_{slug}.html` convention.
pub mod naming;

/// Run report generation and formatting.
///
/// The persisted JSON record of one push run's per-template outcomes, with
/// Markdown and console renderings for humans.
pub mod report;

/// Local template store: a flat directory of convention-named HTML files.
pub mod store;

/// Core synchronization logic for pulling and pushing templates.
///
/// - **Pull**: fetch one template, extract its content, save it formatted
/// - **Push**: resolve the change set, update each template sequentially,
///   and persist the aggregated run report
pub mod sync;

/// Webhook subscription setup for remote template-update events.
pub mod webhook;
