#![allow(clippy::float_cmp)]

use std::time::Duration;

use canvas::element::CanvasElement;
use canvas::geom::{Point, Rect, Viewport};
use canvas::pointer::PointerChannel;
use canvas::surface::Surface;

use super::*;

const FPS: u32 = 200;

struct Rig {
    element: CanvasElement,
    handle: WorkerHandle,
    reports: watch::Receiver<FrameReport>,
    pointer: PointerChannel,
}

fn rig(mode: Mode) -> Rig {
    let mut element = CanvasElement::new(7);
    let canvas = element.transfer_control_to_offscreen().unwrap();
    let (tx, reports) = watch::channel(FrameReport::default());
    let handle = spawn(RenderSettings { mode, fps: FPS }, tx).unwrap();
    let pointer = PointerChannel::new();
    handle
        .send(Command::Init(InitParams::render(pointer.clone(), canvas, Viewport::new(100.0, 80.0, 2.0))))
        .unwrap();
    Rig { element, handle, reports, pointer }
}

async fn until(reports: &mut watch::Receiver<FrameReport>, done: impl FnMut(&FrameReport) -> bool) -> FrameReport {
    tokio::time::timeout(Duration::from_secs(3), reports.wait_for(done))
        .await
        .expect("timed out waiting for a frame")
        .expect("render worker gone")
        .clone()
}

fn stop(rig: Rig) -> CanvasElement {
    rig.handle.send(Command::Terminate).unwrap();
    rig.handle.join().unwrap();
    rig.element
}

#[tokio::test]
async fn split_mode_mirrors_the_simulation() {
    let mut rig = rig(Mode::Split);
    rig.handle.send(Command::PointerUp(Point::new(30.0, 30.0))).unwrap();

    let report = until(&mut rig.reports, |r| r.state.scene.len() == 1).await;
    assert_eq!(report.mode, Mode::Split);
    assert_eq!(report.state.scene.get(1).map(canvas::doc::Shape::bounds), Some(Rect::new(20.0, 20.0, 20.0, 20.0)));

    rig.pointer.write(25, 25);
    until(&mut rig.reports, |r| r.state.hovered == Some(1)).await;

    let element = stop(rig);
    let frame = element.frame();
    assert_eq!(frame.size(), (200, 160));
    assert_eq!(frame.pixel(60, 60), Some(canvas::color::Color::RED));
}

#[tokio::test]
async fn fused_mode_simulates_locally() {
    let mut rig = rig(Mode::Fused);
    rig.handle.send(Command::PointerUp(Point::new(30.0, 30.0))).unwrap();
    rig.handle.send(Command::PointerUp(Point::new(70.0, 50.0))).unwrap();

    let report = until(&mut rig.reports, |r| r.state.scene.len() == 2).await;
    assert_eq!(report.mode, Mode::Fused);
    assert_eq!(report.state.scene.order(), &[1, 2]);

    stop(rig);
}

#[tokio::test]
async fn no_frames_before_init() {
    let (tx, mut reports) = watch::channel(FrameReport::default());
    let handle = spawn(RenderSettings { mode: Mode::Fused, fps: FPS }, tx).unwrap();
    handle.send(Command::PointerUp(Point::new(30.0, 30.0))).unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(100), reports.wait_for(|r| r.frames > 0)).await;
    assert!(waited.is_err());

    handle.send(Command::Terminate).unwrap();
    handle.join().unwrap();
}

#[tokio::test]
async fn events_before_init_are_dropped() {
    let mut element = CanvasElement::new(8);
    let canvas = element.transfer_control_to_offscreen().unwrap();
    let (tx, mut reports) = watch::channel(FrameReport::default());
    let handle = spawn(RenderSettings { mode: Mode::Split, fps: FPS }, tx).unwrap();

    handle.send(Command::PointerUp(Point::new(30.0, 30.0))).unwrap();
    handle
        .send(Command::Init(InitParams::render(PointerChannel::new(), canvas, Viewport::default())))
        .unwrap();

    let report = until(&mut reports, |r| r.frames >= 5).await;
    assert!(report.state.scene.is_empty());

    handle.send(Command::Terminate).unwrap();
    handle.join().unwrap();
}

#[tokio::test]
async fn closing_the_command_channel_stops_both_workers() {
    let mut rig = rig(Mode::Split);
    until(&mut rig.reports, |r| r.frames >= 1).await;
    // join drops the sender; the loop exits and joins the simulation.
    rig.handle.join().unwrap();
    assert!(rig.reports.has_changed().is_err());
}
