//! Tool invocation records and the router seam.
//!
//! Steps never perform side effects through tools themselves. They describe
//! them as [`ToolInvocation`]s on their result, and the coordinator hands
//! each one to a host-supplied [`ToolRouter`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

use crate::error::ToolDispatchError;

/// A side-effect request emitted by a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub payload: Value,
    pub invoked_at: DateTime<Utc>,
    /// Retry count of the step at the time the invocation was produced.
    pub retry_count: u32,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>, payload: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload,
            invoked_at: Utc::now(),
            retry_count: 0,
        }
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }
}

/// Dispatcher for tool invocations, supplied by the host application.
#[async_trait]
pub trait ToolRouter: Send + Sync {
    /// Fulfil one tool invocation on behalf of `agent`.
    async fn route(
        &self,
        agent: &str,
        tool: &str,
        payload: Value,
    ) -> Result<Value, ToolDispatchError>;
}

/// Router that accepts every invocation and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRouter;

#[async_trait]
impl ToolRouter for NoopRouter {
    async fn route(
        &self,
        _agent: &str,
        _tool: &str,
        _payload: Value,
    ) -> Result<Value, ToolDispatchError> {
        Ok(Value::Null)
    }
}

/// Adapter turning an async closure into a [`ToolRouter`].
pub struct FnRouter<F> {
    route: F,
}

/// Build a router from `|agent, tool, payload| async { ... }`.
pub fn router_fn<F, Fut>(route: F) -> FnRouter<F>
where
    F: Fn(String, String, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolDispatchError>> + Send + 'static,
{
    FnRouter { route }
}

#[async_trait]
impl<F, Fut> ToolRouter for FnRouter<F>
where
    F: Fn(String, String, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolDispatchError>> + Send + 'static,
{
    async fn route(
        &self,
        agent: &str,
        tool: &str,
        payload: Value,
    ) -> Result<Value, ToolDispatchError> {
        (self.route)(agent.to_string(), tool.to_string(), payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_router_fn() {
        let router = router_fn(|agent, tool, payload| async move {
            if tool == "broken" {
                return Err(ToolDispatchError::new(tool, "unavailable"));
            }
            Ok(json!({"agent": agent, "tool": tool, "echo": payload}))
        });

        let ok = router.route("research", "store", json!(1)).await.unwrap();
        assert_eq!(ok, json!({"agent": "research", "tool": "store", "echo": 1}));

        let err = router.route("research", "broken", json!(null)).await.unwrap_err();
        assert_eq!(err.tool, "broken");
    }

    #[tokio::test]
    async fn test_noop_router() {
        let result = NoopRouter.route("a", "b", json!({})).await;
        assert_eq!(result, Ok(Value::Null));
    }

    #[test]
    fn test_invocation_defaults() {
        let invocation = ToolInvocation::new("publish", json!({"id": 1})).with_retry_count(2);
        assert_eq!(invocation.tool_name, "publish");
        assert_eq!(invocation.retry_count, 2);
    }
}
