//! handoff: export AI chat history and hand conversations off between
//! providers.
//!
//! The library centers on [`export::export`]: a pure function turning a
//! project and its ordered conversations into a JSON document, a markdown
//! document, or a provider-targeted context prompt. Around it sit the
//! [`bundle`] loader (reads project bundles in the exporter's own JSON
//! shape), the [`history`] store (SQLite record of produced artifacts),
//! and the CLI plumbing ([`config`], [`logging`], [`clipboard`]).

pub mod bundle;
pub mod clipboard;
pub mod config;
pub mod export;
pub mod history;
pub mod logging;
pub mod model;
