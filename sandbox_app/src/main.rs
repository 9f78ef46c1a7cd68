//! Sandbox demo application
//!
//! Runs the engine headless: a draggable card plus a stack of falling
//! boxes, a simulated drag gesture, and a short self-paced frame loop.

use scene2d_engine::prelude::*;
use scene2d_engine::scene::Style;
use std::thread;
use std::time::Duration;

const FRAMES: u32 = 240;

fn build_scene(runtime: &mut SceneRuntime) -> Result<ObjectId, RuntimeError> {
    let scene = runtime.scene_mut();

    // A draggable card pinned above everything else.
    let card = scene.create(ObjectSpec {
        layer: 10,
        position: Vec2::new(100.0, 80.0),
        width: Extent::Px(120.0),
        height: Extent::Px(80.0),
        draggable: true,
        style: Style {
            background: String::from("#2d6cdf"),
            border_radius: 8.0,
            ..Style::default()
        },
        ..ObjectSpec::default()
    })?;
    log::info!("created draggable card {card}");

    // A loose stack of boxes that gravity will pull to the floor.
    for column in 0..4 {
        let x = 300.0 + f64::from(column) * 45.0;
        let id = scene.create(ObjectSpec {
            layer: 1,
            position: Vec2::new(x, 40.0 + f64::from(column) * 25.0),
            velocity: Vec2::new(0.0, 0.0),
            width: Extent::Px(40.0),
            height: Extent::Px(40.0),
            physics: true,
            ..ObjectSpec::default()
        })?;
        log::info!("created falling box {id} at x={x}");
    }

    Ok(card)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting scene2d sandbox");

    let config = RuntimeConfig { logs: true, ..RuntimeConfig::default() };
    let mut runtime = SceneRuntime::new(config)?;
    let card = build_scene(&mut runtime)?;

    runtime.on(EventKind::Click, |ev| {
        log::info!("click on {} at ({}, {})", ev.target, ev.x, ev.y);
    });
    runtime.on(EventKind::DragStart, |ev| {
        log::info!("drag started on {}", ev.target);
    });
    runtime.on(EventKind::DragEnd, |ev| {
        log::info!("drag ended on {} at ({}, {})", ev.target, ev.x, ev.y);
    });

    runtime.start()?;
    let mut backend = NullBackend;

    for frame in 0..FRAMES {
        runtime.update(&mut backend)?;

        // Simulate a short drag of the card partway through the run.
        match frame {
            30 => runtime.pointer(PointerInput::Down { x: 110.0, y: 90.0 })?,
            40 => runtime.pointer(PointerInput::Move { x: 160.0, y: 140.0 })?,
            50 => runtime.pointer(PointerInput::Up { x: 160.0, y: 140.0 })?,
            _ => {}
        }

        thread::sleep(Duration::from_millis(4));
    }

    let stats = runtime.stats();
    log::info!(
        "sandbox finished: {} fps, {} objects, {} ticks",
        stats.fps,
        stats.objects,
        stats.frames
    );
    if let Some(object) = runtime.scene().lookup(&card) {
        log::info!("card settled at ({}, {})", object.position().x, object.position().y);
    }

    runtime.stop();
    Ok(())
}
