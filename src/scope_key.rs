use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Locates a pipeline breakpoint: the pipeline name plus the step name.
///
/// Renders as `pipeline:step`. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeKey {
    #[serde(rename = "pipeline_name")]
    pipeline: Arc<str>,
    #[serde(rename = "step_name")]
    step: Arc<str>,
}

impl ScopeKey {
    pub fn new(pipeline: impl Into<Arc<str>>, step: impl Into<Arc<str>>) -> Self {
        Self {
            pipeline: pipeline.into(),
            step: step.into(),
        }
    }

    #[inline]
    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    #[inline]
    pub fn step(&self) -> &str {
        &self.step
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pipeline, self.step)
    }
}
