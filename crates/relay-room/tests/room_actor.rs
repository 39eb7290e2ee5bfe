//! Integration tests for the room actor and its handle.

use relay_protocol::Message;
use relay_room::{spawn_room, OutboundQueue, Peer, RoomConfig, RoomError, RoomHandle};
use relay_transport::ConnectionId;

// =========================================================================
// Helpers
// =========================================================================

fn cid(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

async fn join(room: &RoomHandle, id: u64) -> OutboundQueue {
    let (peer, queue) = Peer::channel(cid(id));
    assert!(room.join(peer).await.expect("join should succeed"));
    queue
}

/// Collects everything currently queued. Call after a barrier (`info`)
/// so all earlier broadcasts have been applied.
fn drain(queue: &mut OutboundQueue) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(msg) = queue.try_recv() {
        out.push(msg.text().into_owned());
    }
    out
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_broadcast_reaches_everyone_but_sender() {
    let room = spawn_room(RoomConfig::default());
    let mut s = join(&room, 1).await;
    let mut a = join(&room, 2).await;
    let mut b = join(&room, 3).await;

    room.broadcast(cid(1), Message::new("hello")).await.unwrap();
    room.info().await.unwrap();

    assert_eq!(drain(&mut a), ["hello"]);
    assert_eq!(drain(&mut b), ["hello"]);
    assert!(drain(&mut s).is_empty());
}

#[tokio::test]
async fn test_join_and_leave_are_idempotent() {
    let room = spawn_room(RoomConfig::default());
    let (peer, _queue) = Peer::channel(cid(1));

    assert!(room.join(peer.clone()).await.unwrap());
    assert!(!room.join(peer).await.unwrap());
    assert_eq!(room.info().await.unwrap().member_count, 1);

    assert!(room.leave(cid(1)).await.unwrap());
    assert!(!room.leave(cid(1)).await.unwrap());
    assert_eq!(room.info().await.unwrap().member_count, 0);
}

#[tokio::test]
async fn test_order_preserved_per_receiver() {
    let room = spawn_room(RoomConfig::default());
    let _s1 = join(&room, 1).await;
    let _s2 = join(&room, 2).await;
    let mut a = join(&room, 3).await;

    for i in 0..50 {
        let sender = if i % 2 == 0 { 1 } else { 2 };
        room.broadcast(cid(sender), Message::new(format!("m{i}")))
            .await
            .unwrap();
    }
    room.info().await.unwrap();

    let expected: Vec<String> = (0..50).map(|i| format!("m{i}")).collect();
    assert_eq!(drain(&mut a), expected);
}

#[tokio::test]
async fn test_departed_member_isolated_from_broadcasts() {
    let room = spawn_room(RoomConfig::default());
    let _s = join(&room, 1).await;
    let a = join(&room, 2).await;
    let mut b = join(&room, 3).await;

    // A's writer failed: its queue is gone and it leaves.
    drop(a);
    room.leave(cid(2)).await.unwrap();

    room.broadcast(cid(1), Message::new("still here")).await.unwrap();
    let info = room.info().await.unwrap();

    assert_eq!(info.member_count, 2);
    assert_eq!(drain(&mut b), ["still here"]);
}

#[tokio::test]
async fn test_full_room_refuses_join() {
    let room = spawn_room(RoomConfig {
        max_participants: Some(1),
        ..RoomConfig::default()
    });
    let _a = join(&room, 1).await;

    let (late, _queue) = Peer::channel(cid(2));
    assert_eq!(room.join(late).await, Err(RoomError::RoomFull(1)));
}

#[tokio::test]
async fn test_shutdown_makes_room_unavailable() {
    let room: RoomHandle = spawn_room(RoomConfig::default());
    let mut a = join(&room, 1).await;

    room.shutdown().await.unwrap();

    // Dropping the actor drops every peer, which closes their queues.
    assert!(a.recv().await.is_none());
    assert_eq!(room.info().await, Err(RoomError::Unavailable));
    assert!(room.is_closed());
}
