use futures::StreamExt;

use super::*;

fn ann() -> Identity {
    Identity { uid: "u-ann".into(), email: Some("ann@studio.test".into()), display_name: Some("Ann".into()) }
}

// =============================================================================
// subscribe
// =============================================================================

#[tokio::test]
async fn subscribe_yields_current_identity_first() {
    let hub = AuthHub::new(Some(ann()));
    let (mut stream, _token) = hub.subscribe();
    assert_eq!(stream.next().await, Some(Some(ann())));
}

#[tokio::test]
async fn subscribe_yields_absent_when_nobody_signed_in() {
    let hub = AuthHub::new(None);
    let (mut stream, _token) = hub.subscribe();
    assert_eq!(stream.next().await, Some(None));
}

#[tokio::test]
async fn publish_reaches_subscriber_in_order() {
    let hub = AuthHub::new(None);
    let (mut stream, _token) = hub.subscribe();
    hub.publish(Some(ann()));
    hub.publish(None);

    assert_eq!(stream.next().await, Some(None));
    assert_eq!(stream.next().await, Some(Some(ann())));
    assert_eq!(stream.next().await, Some(None));
}

#[test]
fn publish_updates_current() {
    let hub = AuthHub::new(None);
    hub.publish(Some(ann()));
    assert_eq!(hub.current(), Some(ann()));
    hub.publish(None);
    assert!(hub.current().is_none());
}

// =============================================================================
// unsubscribe
// =============================================================================

#[tokio::test]
async fn cancel_stops_further_emissions() {
    let hub = AuthHub::new(None);
    let (mut stream, token) = hub.subscribe();
    assert_eq!(stream.next().await, Some(None));

    token.cancel();
    hub.publish(Some(ann()));

    assert_eq!(stream.next().await, None);
    assert_eq!(hub.subscriber_count(), 0);
}

#[tokio::test]
async fn cancel_discards_buffered_emissions() {
    let hub = AuthHub::new(None);
    let (mut stream, token) = hub.subscribe();
    hub.publish(Some(ann()));
    hub.publish(None);

    token.cancel();

    assert_eq!(stream.next().await, None);
}

#[tokio::test]
async fn subscriptions_cancel_independently() {
    let hub = AuthHub::new(None);
    let (mut first, first_token) = hub.subscribe();
    let (mut second, _second_token) = hub.subscribe();
    assert_eq!(hub.subscriber_count(), 2);

    first_token.cancel();
    hub.publish(Some(ann()));

    assert_eq!(first.next().await, None);
    assert_eq!(second.next().await, Some(None));
    assert_eq!(second.next().await, Some(Some(ann())));
    assert_eq!(hub.subscriber_count(), 1);
}

#[test]
fn dropping_token_keeps_subscription_alive() {
    let hub = AuthHub::new(None);
    let (_stream, token) = hub.subscribe();
    drop(token);
    assert_eq!(hub.subscriber_count(), 1);
}

#[test]
fn cancel_after_hub_dropped_is_harmless() {
    let hub = AuthHub::new(None);
    let (_stream, token) = hub.subscribe();
    drop(hub);
    token.cancel();
}

#[test]
fn dropped_stream_is_pruned_on_publish() {
    let hub = AuthHub::new(None);
    let (stream, _token) = hub.subscribe();
    drop(stream);
    hub.publish(Some(ann()));
    assert_eq!(hub.subscriber_count(), 0);
}

#[tokio::test]
async fn stream_ends_when_hub_dropped() {
    let hub = AuthHub::new(None);
    let (mut stream, token) = hub.subscribe();
    drop(hub);
    assert_eq!(stream.next().await, Some(None));
    assert_eq!(stream.next().await, None);
    assert!(!token.is_cancelled());
}
