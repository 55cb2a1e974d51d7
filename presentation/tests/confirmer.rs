//! The confirmation loop answering a live scheduler.

use async_trait::async_trait;
use conductor_application::{
    ExecutionContext, Tool, ToolConfirmation, ToolRegistryPort, ToolScheduler, USER_DECLINED_REASON,
};
use conductor_domain::{
    CallOutcome, ConfirmationDetails, ToolArgs, ToolCallRequest, ToolError, ToolExecutionResult,
};
use conductor_presentation::InteractiveConfirmer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct DeleteTool;

#[async_trait]
impl Tool for DeleteTool {
    fn name(&self) -> &str {
        "delete_file"
    }

    async fn should_confirm_execute(
        &self,
        _args: &ToolArgs,
        _cancel: &CancellationToken,
    ) -> Result<Option<ToolConfirmation>, ToolError> {
        Ok(Some(ToolConfirmation::new(ConfirmationDetails::Info {
            title: "Confirm Delete".to_string(),
            prompt: "delete /tmp/x".to_string(),
        })))
    }

    async fn execute(
        &self,
        _args: &ToolArgs,
        _ctx: &ExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        Ok(ToolExecutionResult::new("deleted"))
    }
}

struct Registry;

impl ToolRegistryPort for Registry {
    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        (name == "delete_file").then(|| Arc::new(DeleteTool) as Arc<dyn Tool>)
    }

    fn tool_names(&self) -> Vec<String> {
        vec!["delete_file".to_string()]
    }
}

fn requests() -> Vec<ToolCallRequest> {
    vec![
        ToolCallRequest::new("1", "delete_file"),
        ToolCallRequest::new("2", "delete_file"),
    ]
}

#[tokio::test]
async fn test_answers_each_confirmation() {
    let scheduler = ToolScheduler::new(Arc::new(Registry));
    let (tx, rx) = mpsc::unbounded_channel();
    let stop = CancellationToken::new();
    let confirmer = tokio::spawn(InteractiveConfirmer::new(rx).run(scheduler.clone(), stop.clone()));

    let completion = scheduler.schedule(requests()).unwrap();
    tx.send("huh".to_string()).unwrap();
    tx.send("y".to_string()).unwrap();
    tx.send("n".to_string()).unwrap();

    let results = tokio::time::timeout(Duration::from_secs(5), completion.wait())
        .await
        .unwrap()
        .unwrap();
    stop.cancel();
    confirmer.await.unwrap();

    // Prompts follow the order calls reach AwaitingApproval
    let succeeded: Vec<_> = results.iter().filter(|r| r.is_success()).collect();
    let declined: Vec<_> = results
        .iter()
        .filter(|r| r.outcome == CallOutcome::Cancelled)
        .collect();
    assert_eq!(succeeded.len(), 1);
    assert_eq!(declined.len(), 1);
    assert!(declined[0].message().unwrap().contains(USER_DECLINED_REASON));
}

#[tokio::test]
async fn test_closed_input_declines() {
    let scheduler = ToolScheduler::new(Arc::new(Registry));
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    drop(tx);
    let stop = CancellationToken::new();
    let confirmer = tokio::spawn(InteractiveConfirmer::new(rx).run(scheduler.clone(), stop.clone()));

    let results = tokio::time::timeout(
        Duration::from_secs(5),
        scheduler.schedule(requests()).unwrap().wait(),
    )
    .await
    .unwrap()
    .unwrap();
    stop.cancel();
    confirmer.await.unwrap();

    assert!(results.iter().all(|r| r.outcome == CallOutcome::Cancelled));
}
