//! Task-local trace context for web requests.
//!
//! Gives error responses and log lines access to the current request's
//! trace id without threading it through every call. The scope is
//! established by `middleware::request_trace`; outside a request the id
//! reads as "unknown". Core/service code should not import this module.

use std::cell::RefCell;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Get the trace_id for the current task.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| {
            cell.borrow()
                .as_ref()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run a future within a trace context.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trace_id_inside_and_outside_scope() {
        assert_eq!(trace_id(), "unknown");
        let seen = with_trace_id("abc-123".to_string(), async { trace_id() }).await;
        assert_eq!(seen, "abc-123");
    }
}
