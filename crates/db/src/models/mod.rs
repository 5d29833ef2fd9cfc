//! Row structs and request DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` row struct matching the table
//! - Conversion into the shared domain type from `taskboard_core::board`
//! - `Deserialize` create/update DTOs accepted by the HTTP handlers

pub mod activity;
pub mod board;
pub mod list;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial update DTOs.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
