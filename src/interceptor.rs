use std::future::Future;

use crate::{BreakpointManager, ContextMap, ResumeAction, Result};

/// Hook the pipeline executor calls at every step boundary.
///
/// The executor asks [`should_pause`](Self::should_pause) before running a
/// step. If it answers `true`, the executor awaits
/// [`wait_for_resume`](Self::wait_for_resume) and acts on the decision:
/// run the step, skip it, unwind the run, or run it and pause at the next
/// step. Injected data is merged with [`ResumeAction::apply_to`].
///
/// Methods return futures so you can implement them as `async fn`;
/// no `#[async_trait]` is required.
///
/// ```rust,ignore
/// for (index, step) in pipeline.steps.iter().enumerate() {
///     if interceptor.should_pause(&pipeline.name, &step.name, &ctx) {
///         let decision = interceptor
///             .wait_for_resume(&run_id, &pipeline.name, &step.name, index, &ctx)
///             .await?;
///         decision.apply_to(&mut ctx);
///         match decision.action {
///             Action::Abort => return Ok(Outcome::Aborted),
///             Action::Skip => continue,
///             Action::Continue | Action::StepOver => {}
///         }
///     }
///     step.run(&mut ctx).await?;
/// }
/// ```
pub trait BreakpointInterceptor: Send + Sync {
    fn should_pause(&self, pipeline: &str, step: &str, ctx: &ContextMap) -> bool;

    fn wait_for_resume(
        &self,
        execution_id: &str,
        pipeline: &str,
        step: &str,
        step_index: usize,
        ctx: &ContextMap,
    ) -> impl Future<Output = Result<ResumeAction>> + Send;
}

impl BreakpointInterceptor for BreakpointManager {
    fn should_pause(&self, pipeline: &str, step: &str, ctx: &ContextMap) -> bool {
        self.check_breakpoint(pipeline, step, Some(ctx)).is_some()
    }

    fn wait_for_resume(
        &self,
        execution_id: &str,
        pipeline: &str,
        step: &str,
        step_index: usize,
        ctx: &ContextMap,
    ) -> impl Future<Output = Result<ResumeAction>> + Send {
        BreakpointManager::wait_for_resume(self, execution_id, pipeline, step, step_index, Some(ctx))
    }
}
