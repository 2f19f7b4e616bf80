//! # Wrapper Errors

use thiserror::Error;

use sde_core::{CoercionError, DotPath, StructureError};

/// Error from a [`DataObj`](crate::DataObj) or one of its views.
#[derive(Error, Debug)]
pub enum DataObjError {
    /// The data does not have the structure an operation needs.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// The model binds no accessor under this name.
    #[error("no accessor named '{0}'")]
    UnknownAccessor(String),

    /// A coerced setter rejected its value.
    #[error("cannot set '{path}': {source}")]
    Coercion {
        /// Path that was being set.
        path: DotPath,
        /// What the coercion reported.
        #[source]
        source: CoercionError,
    },

    /// JSON rendering failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
