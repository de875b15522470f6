//! Status-event stream for multi-step route execution (§9 design note).
//!
//! Replaces callback/promise-nesting (the source's `updateRouteHook`
//! pattern) with a plain channel of typed events; cancellation is a variant
//! on the same stream rather than a separate code path.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::types::RouteStep;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    StepStarted { route_id: String, step_index: usize, step: RouteStep },
    StepConfirmed { route_id: String, step_index: usize, tx_hash: Option<String> },
    StepFailed { route_id: String, step_index: usize, reason: String },
    Cancelled { route_id: String },
}

impl StepEvent {
    pub fn route_id(&self) -> &str {
        match self {
            StepEvent::StepStarted { route_id, .. }
            | StepEvent::StepConfirmed { route_id, .. }
            | StepEvent::StepFailed { route_id, .. }
            | StepEvent::Cancelled { route_id } => route_id,
        }
    }
}

/// A sender half handed to an executor; the caller holds the matching
/// `mpsc::Receiver<StepEvent>` to observe progress without polling.
pub type StepEventSender = mpsc::Sender<StepEvent>;

pub fn channel(capacity: usize) -> (StepEventSender, mpsc::Receiver<StepEvent>) {
    mpsc::channel(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_preserve_route_id_and_order() {
        let (tx, mut rx) = channel(8);
        tx.send(StepEvent::StepStarted {
            route_id: "r1".into(),
            step_index: 0,
            step: RouteStep::Unwrap {
                chain: crate::types::CanonicalChainId(1),
                token: crate::types::TokenRef::native(crate::types::CanonicalChainId(1)),
            },
        })
        .await
        .unwrap();
        tx.send(StepEvent::StepConfirmed { route_id: "r1".into(), step_index: 0, tx_hash: Some("0xabc".into()) })
            .await
            .unwrap();
        drop(tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.route_id(), "r1");
        assert!(matches!(first, StepEvent::StepStarted { .. }));
        let second = rx.recv().await.unwrap();
        assert!(matches!(second, StepEvent::StepConfirmed { .. }));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn cancellation_is_a_first_class_event() {
        let (tx, mut rx) = channel(1);
        tx.send(StepEvent::Cancelled { route_id: "r2".into() }).await.unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event, StepEvent::Cancelled { route_id: "r2".into() });
    }
}
