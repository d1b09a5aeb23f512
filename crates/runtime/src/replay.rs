//! Interaction replay.
//!
//! A [`ReplayPlan`] is derived from one interaction and never persisted.
//! [`run_replay_plan`] walks its steps in order with a delay between them;
//! cancellation is checked before every step and raced against every wait.

use std::time::Duration;

use protospec_interchange::{ActionKind, PageSpec};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("Replay aborted")]
    Aborted,
    #[error("interaction {interaction_id} has no actions to replay")]
    NoSteps { interaction_id: String },
    #[error("step {index} of interaction {interaction_id} is invalid: {reason}")]
    InvalidAction {
        interaction_id: String,
        index: usize,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayStep {
    pub index: usize,
    pub action: ActionKind,
    pub payload: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayPlan {
    pub page_id: String,
    pub interaction_id: String,
    pub interaction_name: String,
    pub event: String,
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Pause between consecutive steps. Zero replays without waiting.
    pub step_delay: Duration,
    pub cancel: CancellationToken,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        ReplayOptions {
            step_delay: DEFAULT_STEP_DELAY,
            cancel: CancellationToken::new(),
        }
    }
}

fn payload_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or("")
}

fn describe(action: &ActionKind, payload: &Value) -> String {
    match action {
        ActionKind::Navigate => format!("Navigate to {}", payload_str(payload, "to")),
        ActionKind::SetState => format!(
            "Set {} = {}",
            payload_str(payload, "key"),
            payload.get("value").map(Value::to_string).unwrap_or_default()
        ),
        ActionKind::CallApi => format!(
            "Call {} {}",
            payload_str(payload, "method"),
            payload_str(payload, "url")
        ),
        ActionKind::OpenModal => format!("Open modal {}", payload_str(payload, "modal")),
        ActionKind::CloseModal => format!("Close modal {}", payload_str(payload, "modal")),
        ActionKind::ShowToast => format!("Show toast \"{}\"", payload_str(payload, "message")),
        ActionKind::SubmitForm => format!("Submit form {}", payload_str(payload, "form")),
        ActionKind::Custom(name) => format!("Run {}", name),
    }
    .trim_end()
    .to_string()
}

/// Plan the replay of `interaction_id` on `page`; `None` if the page has no
/// such interaction.
pub fn build_replay_plan(page: &PageSpec, interaction_id: &str) -> Option<ReplayPlan> {
    let ix = page.interaction(interaction_id)?;
    let steps = ix
        .actions
        .iter()
        .enumerate()
        .map(|(index, action)| ReplayStep {
            index,
            action: action.kind.clone(),
            payload: action.payload.clone(),
            target_node_id: ix.target_node_id.clone(),
            description: describe(&action.kind, &action.payload),
        })
        .collect();
    Some(ReplayPlan {
        page_id: page.id.clone(),
        interaction_id: ix.id.clone(),
        interaction_name: ix.name.clone(),
        event: ix.event.clone(),
        steps,
    })
}

fn check_plan(plan: &ReplayPlan) -> Result<(), ReplayError> {
    if plan.steps.is_empty() {
        return Err(ReplayError::NoSteps {
            interaction_id: plan.interaction_id.clone(),
        });
    }
    for step in &plan.steps {
        if step.action.as_str().trim().is_empty() {
            return Err(ReplayError::InvalidAction {
                interaction_id: plan.interaction_id.clone(),
                index: step.index,
                reason: "action type is empty".to_string(),
            });
        }
    }
    Ok(())
}

async fn wait_with_cancel(cancel: &CancellationToken, duration: Duration) -> Result<(), ReplayError> {
    if duration.is_zero() {
        return Ok(());
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => Ok(()),
        _ = cancel.cancelled() => Err(ReplayError::Aborted),
    }
}

/// Play `plan`, calling `on_step` for each step in order.
///
/// The plan is checked up front, so a structurally broken plan never
/// emits a partial sequence.
pub async fn run_replay_plan<F>(
    plan: &ReplayPlan,
    options: &ReplayOptions,
    mut on_step: F,
) -> Result<(), ReplayError>
where
    F: FnMut(&ReplayStep),
{
    check_plan(plan)?;
    for (i, step) in plan.steps.iter().enumerate() {
        if options.cancel.is_cancelled() {
            return Err(ReplayError::Aborted);
        }
        on_step(step);
        if i + 1 < plan.steps.len() {
            wait_with_cancel(&options.cancel, options.step_delay).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use protospec_interchange::{
        ComponentBody, ComponentNode, InteractionAction, InteractionSpec,
    };
    use serde_json::json;

    fn page(actions: Vec<InteractionAction>) -> PageSpec {
        PageSpec {
            id: "page-a".into(),
            slug: "a".into(),
            title: "A".into(),
            summary: String::new(),
            root: ComponentNode::new("page-a", "A", ComponentBody::Page),
            interactions: vec![InteractionSpec {
                id: "page-a:ix:go".into(),
                name: "go".into(),
                event: "click".into(),
                actions,
                target_node_id: Some("page-a".into()),
            }],
            acceptance_criteria: Vec::new(),
        }
    }

    fn nav(to: &str) -> InteractionAction {
        InteractionAction {
            kind: ActionKind::Navigate,
            payload: json!({ "to": to }),
        }
    }

    fn instant() -> ReplayOptions {
        ReplayOptions {
            step_delay: Duration::ZERO,
            ..ReplayOptions::default()
        }
    }

    #[test]
    fn plan_mirrors_actions() {
        let p = page(vec![
            nav("/a"),
            InteractionAction {
                kind: ActionKind::CallApi,
                payload: json!({"method": "GET", "url": "/api"}),
            },
        ]);
        let plan = build_replay_plan(&p, "page-a:ix:go").unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].description, "Navigate to /a");
        assert_eq!(plan.steps[1].description, "Call GET /api");
        assert_eq!(plan.steps[1].target_node_id.as_deref(), Some("page-a"));
    }

    #[test]
    fn unknown_interaction_has_no_plan() {
        assert!(build_replay_plan(&page(vec![nav("/a")]), "nope").is_none());
    }

    #[tokio::test]
    async fn steps_run_in_order() {
        let p = page(vec![nav("/1"), nav("/2"), nav("/3")]);
        let plan = build_replay_plan(&p, "page-a:ix:go").unwrap();
        let mut seen = Vec::new();
        run_replay_plan(&plan, &instant(), |s| seen.push(s.index))
            .await
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn empty_plan_is_no_steps() {
        let plan = build_replay_plan(&page(vec![]), "page-a:ix:go").unwrap();
        let err = run_replay_plan(&plan, &instant(), |_| {}).await.unwrap_err();
        assert!(matches!(err, ReplayError::NoSteps { .. }));
    }

    #[tokio::test]
    async fn empty_action_type_is_invalid() {
        let p = page(vec![
            nav("/1"),
            InteractionAction {
                kind: ActionKind::Custom(String::new()),
                payload: json!({}),
            },
        ]);
        let plan = build_replay_plan(&p, "page-a:ix:go").unwrap();
        let mut calls = 0;
        let err = run_replay_plan(&plan, &instant(), |_| calls += 1)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ReplayError::InvalidAction {
                interaction_id: "page-a:ix:go".into(),
                index: 1,
                reason: "action type is empty".into(),
            }
        );
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn cancelled_before_start_runs_nothing() {
        let plan = build_replay_plan(&page(vec![nav("/1")]), "page-a:ix:go").unwrap();
        let opts = instant();
        opts.cancel.cancel();
        let mut calls = 0;
        let err = run_replay_plan(&plan, &opts, |_| calls += 1).await.unwrap_err();
        assert_eq!(err, ReplayError::Aborted);
        assert_eq!(err.to_string(), "Replay aborted");
        assert_eq!(calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_wait_aborts() {
        let plan =
            build_replay_plan(&page(vec![nav("/1"), nav("/2")]), "page-a:ix:go").unwrap();
        let opts = ReplayOptions::default();
        let cancel = opts.cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });
        let mut seen = Vec::new();
        let err = run_replay_plan(&plan, &opts, |s| seen.push(s.index))
            .await
            .unwrap_err();
        assert_eq!(err, ReplayError::Aborted);
        assert_eq!(seen, vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn default_delay_is_between_steps() {
        let plan = build_replay_plan(&page(vec![nav("/1"), nav("/2"), nav("/3")]), "page-a:ix:go")
            .unwrap();
        let start = tokio::time::Instant::now();
        run_replay_plan(&plan, &ReplayOptions::default(), |_| {})
            .await
            .unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= DEFAULT_STEP_DELAY * 2, "{:?}", elapsed);
        assert!(elapsed < DEFAULT_STEP_DELAY * 3, "{:?}", elapsed);
    }
}
