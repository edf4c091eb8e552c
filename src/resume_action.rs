use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ContextMap, Error};

/// How a paused execution should carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Run the paused step and keep going.
    Continue,
    /// Do not run the paused step; move on to the next one.
    Skip,
    /// Unwind the whole execution.
    Abort,
    /// Run the paused step and continue. The manager treats it like
    /// `Continue`; an executor may use it to re-arm a pause at the next step.
    StepOver,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Continue => "continue",
            Action::Skip => "skip",
            Action::Abort => "abort",
            Action::StepOver => "step_over",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continue" => Ok(Action::Continue),
            "skip" => Ok(Action::Skip),
            "abort" => Ok(Action::Abort),
            "step_over" => Ok(Action::StepOver),
            "" => Err(Error::validation("action is required")),
            other => Err(Error::validation(format!(
                "unknown action '{other}' (expected continue, skip, abort or step_over)"
            ))),
        }
    }
}

/// Decision delivered to a paused execution, consumed exactly once.
///
/// `data` optionally carries values to merge into the resumed execution's
/// context; see [`ResumeAction::apply_to`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAction {
    pub action: Action,
    #[serde(default, skip_serializing_if = "ContextMap::is_empty")]
    pub data: ContextMap,
}

impl ResumeAction {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            data: ContextMap::new(),
        }
    }

    pub fn continue_() -> Self {
        Self::new(Action::Continue)
    }

    pub fn skip() -> Self {
        Self::new(Action::Skip)
    }

    pub fn abort() -> Self {
        Self::new(Action::Abort)
    }

    pub fn step_over() -> Self {
        Self::new(Action::StepOver)
    }

    pub fn with_data(mut self, data: ContextMap) -> Self {
        self.data = data;
        self
    }

    /// Merges the injected data into a live context. Injected keys win.
    pub fn apply_to(&self, ctx: &mut ContextMap) {
        for (k, v) in &self.data {
            ctx.insert(k.clone(), v.clone());
        }
    }

    #[inline]
    pub fn is_abort(&self) -> bool {
        self.action == Action::Abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_parsing() {
        assert_eq!("step_over".parse::<Action>(), Ok(Action::StepOver));
        assert_eq!("skip".parse::<Action>(), Ok(Action::Skip));
        assert!(matches!("".parse::<Action>(), Err(Error::Validation(_))));
        assert!(matches!("invalid".parse::<Action>(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_wire_format() {
        let action: ResumeAction =
            serde_json::from_value(json!({"action": "step_over", "data": {"y": 2}})).unwrap();
        assert_eq!(action.action, Action::StepOver);
        assert_eq!(action.data["y"], json!(2));

        let bare: ResumeAction = serde_json::from_value(json!({"action": "abort"})).unwrap();
        assert!(bare.is_abort());
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"action": "abort"}));
    }

    #[test]
    fn test_apply_overrides_context() {
        let mut ctx = json!({"amt": 5, "currency": "EUR"})
            .as_object()
            .cloned()
            .unwrap();
        let data = json!({"amt": 99, "injected": true}).as_object().cloned().unwrap();

        ResumeAction::continue_().with_data(data).apply_to(&mut ctx);

        assert_eq!(ctx["amt"], json!(99));
        assert_eq!(ctx["currency"], json!("EUR"));
        assert_eq!(ctx["injected"], json!(true));
    }
}
