//! Frame trace tool
//!
//! Builds a small sample scene, renders one frame with a world viewpoint and
//! a UI overlay, and prints every frame-context call the pipeline made.
//!
//! Usage: `frame_trace [config.toml|config.ron]`

use std::sync::Arc;

use forward_pipeline::config::ConfigError;
use forward_pipeline::prelude::*;

#[derive(Debug, thiserror::Error)]
enum TraceError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn load_config() -> Result<ApplicationConfig, TraceError> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ApplicationConfig::default());
    };

    let config = ApplicationConfig::load_from_file(&path)?;
    config.validate()?;
    Ok(config)
}

fn build_scene() -> Scene {
    let unlit = Arc::new(
        Material::new(MaterialId(1), "Unlit Crate")
            .with_queue(queue::GEOMETRY)
            .with_pass(ShaderTagId::SRP_DEFAULT_UNLIT),
    );
    let glass = Arc::new(
        Material::new(MaterialId(2), "Glass")
            .with_queue(queue::TRANSPARENT)
            .with_pass(ShaderTagId::SRP_DEFAULT_UNLIT),
    );
    // Only implements a legacy pass; drawn with the error material in development builds
    let legacy = Arc::new(Material::new(MaterialId(3), "Legacy Diffuse").with_pass("ForwardBase"));

    let mut scene = Scene::new();
    scene.add_drawable(Drawable::new(MeshHandle(1), Arc::clone(&unlit)).at(Vec3::new(-1.5, 0.0, 0.0)));
    scene.add_drawable(Drawable::new(MeshHandle(1), unlit).at(Vec3::new(1.5, 0.0, -2.0)));
    scene.add_drawable(Drawable::new(MeshHandle(2), glass).at(Vec3::new(0.0, 0.0, 1.5)));
    scene.add_drawable(Drawable::new(MeshHandle(3), legacy).at(Vec3::new(0.0, 1.5, -1.0)));
    // Behind the camera
    scene.add_drawable(
        Drawable::new(MeshHandle(1), Arc::new(Material::new(MaterialId(4), "Hidden"))).at(Vec3::new(0.0, 0.0, 20.0)),
    );

    scene.add_light(Light::Directional {
        direction: Vec3::new(-0.3, -1.0, -0.2),
        color: Vec3::new(1.0, 0.95, 0.9),
        intensity: 1.0,
    });
    scene
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_logging(&config.logging);

    log::info!("Using pipeline asset '{}'", config.pipeline.name);
    let mut pipeline = config.pipeline.create_pipeline()?;

    let scene = build_scene();
    let world = Viewpoint::perspective("World", Vec3::new(0.0, 2.0, 8.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
    let ui = Viewpoint::perspective("UI", Vec3::new(0.0, 0.0, 10.0), 30.0, 16.0 / 9.0, 0.1, 20.0)
        .with_kind(ViewpointKind::Preview)
        .with_clear_flags(ClearFlags::DEPTH);

    let mut ctx = TraceContext::new(&scene);
    let stats = pipeline.render_frame(&mut ctx, &[world, ui]);

    println!(
        "frame {} ({:?}): {} viewpoints, {} draws",
        stats.frame_index,
        pipeline.settings().build_mode,
        stats.viewpoints,
        ctx.draw_count()
    );
    for event in ctx.events() {
        println!("  {event}");
    }

    Ok(())
}
