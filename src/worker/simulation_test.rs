#![allow(clippy::float_cmp)]

use std::time::Duration;

use canvas::geom::Rect;
use canvas::input::Interaction;
use canvas::message::InitParams;
use canvas::pointer::PointerChannel;
use canvas::state::ProcessState;

use super::*;

const FPS: u32 = 200;

async fn next_message(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Option<Outbound> {
    tokio::time::timeout(Duration::from_millis(150), rx.recv()).await.ok().flatten()
}

/// Replay messages onto `mirror` until `done` holds.
async fn replay_until(
    rx: &mut mpsc::UnboundedReceiver<Outbound>,
    mirror: &mut ProcessState,
    done: impl Fn(&ProcessState) -> bool,
) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while !done(mirror) {
        let msg = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .expect("timed out waiting for patches")
            .expect("simulation closed");
        let Outbound::Patches { patches } = msg;
        assert!(!patches.is_empty());
        assert!(mirror.apply_patches(&patches).is_empty());
    }
}

fn started() -> (WorkerHandle, mpsc::UnboundedReceiver<Outbound>, PointerChannel) {
    let (handle, rx) = spawn(FPS).unwrap();
    let pointer = PointerChannel::new();
    handle.send(Command::Init(InitParams::simulation(pointer.clone()))).unwrap();
    (handle, rx, pointer)
}

#[tokio::test]
async fn pointerup_creates_shape_in_one_message() {
    let (handle, mut rx, _pointer) = started();
    handle.send(Command::PointerUp(Point::new(50.0, 50.0))).unwrap();

    let Some(Outbound::Patches { patches }) = next_message(&mut rx).await else {
        panic!("expected a patch message");
    };
    assert_eq!(patches.len(), 2);
    assert!(matches!(&patches[0], Patch::InsertShape { shape } if shape.id == 1));
    assert_eq!(patches[1], Patch::AppendOrder { id: 1 });

    // Idle with the pointer away from every shape: nothing further to send.
    assert!(next_message(&mut rx).await.is_none());

    handle.send(Command::Terminate).unwrap();
    handle.join().unwrap();
}

#[tokio::test]
async fn events_before_init_are_dropped() {
    let (handle, mut rx) = spawn(FPS).unwrap();
    handle.send(Command::PointerUp(Point::new(50.0, 50.0))).unwrap();
    handle.send(Command::Init(InitParams::simulation(PointerChannel::new()))).unwrap();
    assert!(next_message(&mut rx).await.is_none());

    handle.send(Command::Terminate).unwrap();
    handle.join().unwrap();
}

#[tokio::test]
async fn terminate_closes_the_patch_stream() {
    let (handle, mut rx, _pointer) = started();
    handle.send(Command::Terminate).unwrap();
    handle.join().unwrap();
    let end = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
    assert!(end.is_none());
}

#[tokio::test]
async fn dropping_the_handle_side_stops_the_loop() {
    let (handle, mut rx, _pointer) = started();
    // join drops the command sender first.
    handle.join().unwrap();
    assert!(tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn mirror_follows_create_hover_drag_release() {
    let (handle, mut rx, pointer) = started();
    let mut mirror = ProcessState::new();

    handle.send(Command::PointerUp(Point::new(50.0, 50.0))).unwrap();
    replay_until(&mut rx, &mut mirror, |s| s.scene.len() == 1).await;

    pointer.write(45, 45);
    replay_until(&mut rx, &mut mirror, |s| s.hovered == Some(1)).await;

    handle.send(Command::PointerDown(Point::new(45.0, 45.0))).unwrap();
    replay_until(&mut rx, &mut mirror, |s| !s.interaction.is_idle()).await;
    assert_eq!(mirror.interaction, Interaction::Dragging { id: 1, anchor: Point::new(45.0, 45.0) });

    pointer.write(55, 55);
    replay_until(&mut rx, &mut mirror, |s| s.scene.get(1).is_some_and(|sh| sh.x == 50.0 && sh.y == 50.0)).await;
    assert_eq!(mirror.scene.get(1).unwrap().bounds(), Rect::new(50.0, 50.0, 20.0, 20.0));

    handle.send(Command::PointerUp(Point::new(55.0, 55.0))).unwrap();
    replay_until(&mut rx, &mut mirror, |s| s.interaction.is_idle()).await;
    assert_eq!(mirror.scene.len(), 1);

    handle.send(Command::Terminate).unwrap();
    handle.join().unwrap();
}
