use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Kind of internal unit a workflow run steps through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Module,
    Workflow,
    Trigger,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Module => write!(f, "module"),
            UnitKind::Workflow => write!(f, "workflow"),
            UnitKind::Trigger => write!(f, "trigger"),
        }
    }
}

impl FromStr for UnitKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "module" => Ok(UnitKind::Module),
            "workflow" => Ok(UnitKind::Workflow),
            "trigger" => Ok(UnitKind::Trigger),
            other => Err(Error::validation(format!("unknown unit kind '{other}'"))),
        }
    }
}
