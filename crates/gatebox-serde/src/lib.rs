//! JSON persistence for gatebox composite gates.
//!
//! This crate is an optional extension. The engine in `gatebox-core`
//! defines no storage format and works without it; its `serde` feature
//! is off by default and only enabled here.
//!
//! Blueprints are written inside a small versioned envelope. Loading
//! checks the format version and validates the decoded blueprint, so a
//! value returned from this crate can always be instantiated (subject to
//! the network's [`Limits`](gatebox_core::Limits)).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use gatebox_core::{Blueprint, BuildError, CompositeType};

pub use gatebox_core;

/// Envelope format written by this version.
pub const FORMAT_VERSION: u32 = 1;

/// Errors from encoding or decoding.
#[derive(Debug, Error)]
pub enum SerdeError {
    /// Not JSON, or not shaped like an envelope.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by an incompatible version.
    #[error("unsupported format version {found} (expected {FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },

    /// Decoded, but cannot be instantiated.
    #[error("invalid blueprint: {0}")]
    Invalid(#[from] BuildError),
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    format: u32,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize, Deserialize)]
struct BlueprintBody {
    blueprint: Blueprint,
}

#[derive(Serialize, Deserialize)]
struct CompositeBody {
    composite: CompositeType,
}

fn encode<T: Serialize>(body: T) -> Result<String, SerdeError> {
    let envelope = Envelope {
        format: FORMAT_VERSION,
        body,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

fn decode<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, SerdeError> {
    let envelope: Envelope<T> = serde_json::from_str(json)?;
    if envelope.format != FORMAT_VERSION {
        return Err(SerdeError::UnsupportedVersion {
            found: envelope.format,
        });
    }
    Ok(envelope.body)
}

/// Encode a blueprint as pretty-printed JSON.
pub fn blueprint_to_json(blueprint: &Blueprint) -> Result<String, SerdeError> {
    encode(BlueprintBody {
        blueprint: blueprint.clone(),
    })
}

/// Decode and validate a blueprint.
pub fn blueprint_from_json(json: &str) -> Result<Blueprint, SerdeError> {
    let BlueprintBody { blueprint } = decode(json)?;
    blueprint.validate()?;
    debug!(gates = blueprint.gates().len(), "loaded blueprint");
    Ok(blueprint)
}

/// Encode a composite gate type, including every nested type, as
/// pretty-printed JSON.
pub fn composite_to_json(composite: &CompositeType) -> Result<String, SerdeError> {
    encode(CompositeBody {
        composite: composite.clone(),
    })
}

/// Decode and validate a composite gate type.
pub fn composite_from_json(json: &str) -> Result<CompositeType, SerdeError> {
    let CompositeBody { composite } = decode(json)?;
    composite.blueprint().validate()?;
    debug!(name = composite.name(), "loaded composite gate type");
    Ok(composite)
}
