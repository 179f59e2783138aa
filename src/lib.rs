//! # Sluice
//!
//! Rule-based translation of analytics questions into read-only SQL, with a
//! safety gate every statement must clear before execution.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Question / manual SQL                    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [intent]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Normalize → Extract (metric, grain, dimension,         │
//! │   top-N, filters) → Assemble                             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [translation]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Shape (time series > margin > top-N > breakdown >      │
//! │   preview) → sql::Query → Databricks SQL                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [guard]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Safety gate (single read-only query)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`provider`] lets a remote conversational service stand in for the rule
//! translator; [`assistant`] wires either one to the gate.

pub mod assistant;
pub mod bounds;
pub mod config;
pub mod guard;
pub mod intent;
pub mod provider;
pub mod sql;
pub mod translation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::assistant::{Answer, AskError, Assistant, Origin};
    pub use crate::bounds::{BoundsCache, BoundsSource, DateBounds, StaticBounds};
    pub use crate::config::{Settings, TableIdent};
    pub use crate::guard::{expand_table_placeholder, inspect, is_safe_select, Rejection};
    pub use crate::intent::{Dimension, Filter, Grain, Intent, Metric, Region, Segment};
    pub use crate::provider::{RulesProvider, SqlProvider};
    pub use crate::translation::{translate, Shape, TranslationError};
}
