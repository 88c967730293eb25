use crate::catalog::ModelRequest;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine-side handle for one constructed model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef(pub String);

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Pytorch,
    Tensorflow,
}

#[derive(Debug, Clone)]
pub struct BuiltModel {
    pub model: ModelRef,
    pub framework: Framework,
}

/// Constructs models for the catalogue, including weight download and
/// checkpoint loading. Every call must build in a fresh graph context:
/// implementations may not leak graph state from one build into the next.
pub trait ModelHub {
    fn build(&self, request: &ModelRequest) -> Result<BuiltModel>;
}
