//! # Ginfo Architecture
//!
//! Ginfo queries a grid information system (a BDII publishing the GLUE2 schema) for
//! services, endpoints, shares and policies. It is a **UI-agnostic query library**
//! with a thin command-line client on top.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints messages and results            │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Plans the query, fetches once, runs the pipeline         │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (engine/*.rs) over the Catalog (catalog/)           │
//! │  - normalize → filter → project → clean → render            │
//! │  - Pure functions over Rust types, no I/O                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Directory Layer (directory/)                               │
//! │  - Abstract Directory trait                                 │
//! │  - LdifDirectory (production), InMemoryDirectory (testing)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Attribute Names
//!
//! One attribute has up to three names: canonical (`EndpointCapability`), long alias
//! (`cap`, also the `--cap` flag) and short alias (`-t` for `ServiceType`). All of
//! them resolve through a single [`catalog::Catalog`] lookup. See `catalog/mod.rs`.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, engine, catalog), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<QueryResult>`)
//! - **Never** writes to stdout/stderr
//! - **Never** calls `std::process::exit`
//!
//! Diagnostics go through the `log` facade; the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Engine** (`engine/*.rs`): thorough unit tests of each stage. This is where
//!    most testing lives, driven by the fixture in `directory::memory::fixtures`.
//! 2. **API** (`api.rs`): checks that planning happens before fetching and that
//!    results and messages come back intact.
//! 3. **CLI** (`tests/`): runs the binary against an LDIF snapshot.
//!
//! ## Module Overview
//!
//! - [`api`]: facade over the engine
//! - [`catalog`]: attribute descriptors and name resolution
//! - [`engine`]: the query pipeline
//! - [`directory`]: directory trait and backends
//! - [`model`]: object types, raw entries, records
//! - [`config`]: persisted defaults
//! - [`error`]: error types

pub mod api;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod model;
