//! Frame-level tests driving the pipeline through [`TraceContext`]

use std::sync::Arc;

use crate::core::{BuildMode, PipelineSettings};
use crate::foundation::math::Vec3;
use crate::render::{
    queue, ClearFlags, Color, CommandBuffer, DrawingSettings, FilteringSettings, ForwardPipeline, FrameContext,
    FrameEvent, Material, MaterialId, PipelineAsset, PipelineError, ShaderTagId, TraceContext, Viewpoint,
    ViewpointKind, ERROR_SHADER_NAME,
};
use crate::scene::{Drawable, DrawableId, MeshHandle, Scene, VisibilityResult};

struct TestScene {
    scene: Scene,
    opaque_near: DrawableId,
    opaque_far: DrawableId,
    transparent_near: DrawableId,
    transparent_far: DrawableId,
    legacy: DrawableId,
}

fn unlit(id: u32, name: &str, render_queue: i32) -> Arc<Material> {
    Arc::new(
        Material::new(MaterialId(id), name)
            .with_queue(render_queue)
            .with_pass(ShaderTagId::SRP_DEFAULT_UNLIT),
    )
}

/// Camera at z=5 looking down -Z; depths are 3, 8, 4, 7 and 5
fn test_scene() -> TestScene {
    let opaque = unlit(1, "Opaque", queue::GEOMETRY);
    let glass = unlit(2, "Glass", queue::TRANSPARENT);
    let legacy = Arc::new(Material::new(MaterialId(3), "Legacy").with_pass("ForwardBase"));

    let mut scene = Scene::new();
    let mut add = |mesh: u64, material: &Arc<Material>, position: Vec3| {
        scene.add_drawable(Drawable::new(MeshHandle(mesh), Arc::clone(material)).at(position))
    };
    let opaque_far = add(1, &opaque, Vec3::new(0.0, 0.0, -3.0));
    let opaque_near = add(1, &opaque, Vec3::new(0.0, 0.0, 2.0));
    let transparent_near = add(2, &glass, Vec3::new(1.0, 0.0, 1.0));
    let transparent_far = add(2, &glass, Vec3::new(-1.0, 0.0, -2.0));
    let legacy = add(3, &legacy, Vec3::new(0.0, 1.0, 0.0));

    TestScene {
        scene,
        opaque_near,
        opaque_far,
        transparent_near,
        transparent_far,
        legacy,
    }
}

fn main_viewpoint() -> Viewpoint {
    Viewpoint::perspective("Main", Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 0.1, 100.0)
}

fn pipeline(build_mode: BuildMode) -> ForwardPipeline {
    ForwardPipeline::new(PipelineSettings::default().with_build_mode(build_mode)).unwrap()
}

fn drawn(ctx: &TraceContext<'_>) -> Vec<DrawableId> {
    ctx.draws().map(|record| record.drawable).collect()
}

#[test]
fn test_frame_draws_passes_in_order() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    let mut pipeline = pipeline(BuildMode::Production);

    pipeline.render_frame(&mut ctx, &[main_viewpoint()]);

    assert_eq!(
        drawn(&ctx),
        vec![
            fixture.opaque_near,
            fixture.opaque_far,
            fixture.transparent_far,
            fixture.transparent_near,
        ]
    );

    let events = ctx.events();
    assert_eq!(
        events[0],
        FrameEvent::Clear {
            depth: true,
            color: true,
            value: Color::SKY,
        }
    );
    assert_eq!(events[1], FrameEvent::BeginSample("Render Camera".to_string()));
    assert_eq!(events[2], FrameEvent::SetupViewpoint("Main".to_string()));
    assert!(matches!(events[3], FrameEvent::Cull { drawables: 5, .. }));
    assert!(matches!(events[4], FrameEvent::Draw(_)));
    assert!(matches!(events[5], FrameEvent::Draw(_)));
    assert_eq!(events[6], FrameEvent::Background("Main".to_string()));
    assert!(matches!(events[7], FrameEvent::Draw(_)));
    assert!(matches!(events[8], FrameEvent::Draw(_)));
    assert_eq!(events[9], FrameEvent::EndSample("Render Camera".to_string()));
    assert_eq!(events[10], FrameEvent::Submit);
    assert_eq!(events.len(), 11);
}

#[test]
fn test_opaque_draws_never_follow_transparent_draws() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    pipeline(BuildMode::Production).render_frame(&mut ctx, &[main_viewpoint()]);

    let queues: Vec<i32> = ctx.draws().map(|record| record.render_queue).collect();
    let split = queues.partition_point(|&q| q <= queue::GEOMETRY_LAST);
    assert_eq!(split, 2);
    assert!(queues[split..].iter().all(|&q| q > queue::GEOMETRY_LAST));
}

#[test]
fn test_empty_scene_still_clears_and_draws_background() {
    let scene = Scene::new();
    let mut ctx = TraceContext::new(&scene);
    pipeline(BuildMode::Development).render_frame(&mut ctx, &[main_viewpoint()]);

    assert_eq!(ctx.draw_count(), 0);
    assert!(matches!(ctx.events()[0], FrameEvent::Clear { .. }));
    assert!(ctx.events().contains(&FrameEvent::Background("Main".to_string())));
    assert_eq!(ctx.events().last(), Some(&FrameEvent::Submit));
}

#[test]
fn test_degenerate_frustum_draws_nothing() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    let broken = Viewpoint::perspective("Broken", Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 1.0, 1.0);

    pipeline(BuildMode::Development).render_frame(&mut ctx, &[broken]);

    assert_eq!(ctx.draw_count(), 0);
    assert!(!ctx.events().iter().any(|event| matches!(event, FrameEvent::Cull { .. })));
    assert_eq!(
        ctx.events(),
        &[
            FrameEvent::Clear {
                depth: true,
                color: true,
                value: Color::SKY,
            },
            FrameEvent::BeginSample("Render Camera".to_string()),
            FrameEvent::SetupViewpoint("Broken".to_string()),
            FrameEvent::Background("Broken".to_string()),
            FrameEvent::EndSample("Render Camera".to_string()),
            FrameEvent::Submit,
        ]
    );
}

#[test]
fn test_unsupported_material_uses_error_material_in_development() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    pipeline(BuildMode::Development).render_frame(&mut ctx, &[main_viewpoint()]);

    let last = ctx.draws().last().unwrap();
    assert_eq!(last.drawable, fixture.legacy);
    assert_eq!(last.material, ERROR_SHADER_NAME);
    assert_eq!(last.pass, None);
    assert_eq!(ctx.draw_count(), 5);

    let fallback_position = ctx
        .events()
        .iter()
        .position(|event| matches!(event, FrameEvent::Draw(record) if record.drawable == fixture.legacy))
        .unwrap();
    let end_position = ctx
        .events()
        .iter()
        .position(|event| matches!(event, FrameEvent::EndSample(_)))
        .unwrap();
    assert!(fallback_position < end_position);
}

#[test]
fn test_unsupported_material_is_skipped_in_production() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    pipeline(BuildMode::Production).render_frame(&mut ctx, &[main_viewpoint()]);

    assert!(ctx.draws().all(|record| record.drawable != fixture.legacy));
    assert!(ctx.draws().all(|record| record.material != ERROR_SHADER_NAME));
}

#[test]
fn test_supported_materials_never_reach_fallback() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    pipeline(BuildMode::Development).render_frame(&mut ctx, &[main_viewpoint()]);

    let error_draws: Vec<DrawableId> = ctx
        .draws()
        .filter(|record| record.material == ERROR_SHADER_NAME)
        .map(|record| record.drawable)
        .collect();
    assert_eq!(error_draws, vec![fixture.legacy]);
}

#[test]
fn test_viewpoints_render_in_order_with_single_submit() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    let ui = Viewpoint::perspective("UI", Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 0.1, 100.0)
        .with_clear_flags(ClearFlags::DEPTH);

    let stats = pipeline(BuildMode::Production).render_frame(&mut ctx, &[main_viewpoint(), ui]);

    assert_eq!(stats.viewpoints, 2);
    let setups: Vec<&FrameEvent> = ctx
        .events()
        .iter()
        .filter(|event| matches!(event, FrameEvent::SetupViewpoint(_)))
        .collect();
    assert_eq!(
        setups,
        vec![
            &FrameEvent::SetupViewpoint("Main".to_string()),
            &FrameEvent::SetupViewpoint("UI".to_string()),
        ]
    );

    let submits = ctx.events().iter().filter(|event| **event == FrameEvent::Submit).count();
    assert_eq!(submits, 1);
    assert_eq!(ctx.events().last(), Some(&FrameEvent::Submit));

    let clears: Vec<(bool, bool)> = ctx
        .events()
        .iter()
        .filter_map(|event| match event {
            FrameEvent::Clear { depth, color, .. } => Some((*depth, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(clears, vec![(true, true), (true, false)]);
}

#[test]
fn test_profiling_samples_are_balanced() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    let broken = Viewpoint::perspective("Broken", Vec3::zeros(), 60.0, 0.0, 0.1, 100.0);
    let viewpoints = [main_viewpoint(), broken, main_viewpoint()];

    pipeline(BuildMode::Development).render_frame(&mut ctx, &viewpoints);

    let mut depth = 0i32;
    for event in ctx.events() {
        match event {
            FrameEvent::BeginSample(_) => depth += 1,
            FrameEvent::EndSample(_) => depth -= 1,
            FrameEvent::Draw(_) | FrameEvent::Background(_) => assert_eq!(depth, 1),
            _ => {}
        }
        assert!((0..=1).contains(&depth));
    }
    assert_eq!(depth, 0);
}

#[test]
fn test_scene_view_emits_editor_geometry() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    let scene_view = main_viewpoint().with_kind(ViewpointKind::SceneView);

    pipeline(BuildMode::Production).render_frame(&mut ctx, &[main_viewpoint(), scene_view]);

    let emitted = ctx
        .events()
        .iter()
        .filter(|event| matches!(event, FrameEvent::SceneViewGeometry(_)))
        .count();
    assert_eq!(emitted, 1);
}

#[test]
fn test_frame_counter_advances() {
    let scene = Scene::new();
    let mut ctx = TraceContext::new(&scene);
    let mut pipeline = pipeline(BuildMode::Production);

    assert_eq!(pipeline.render_frame(&mut ctx, &[]).frame_index, 0);
    assert_eq!(pipeline.render_frame(&mut ctx, &[main_viewpoint()]).frame_index, 1);
    assert_eq!(pipeline.frame_count(), 2);
    assert_eq!(ctx.take_events().iter().filter(|e| **e == FrameEvent::Submit).count(), 2);
    assert!(ctx.events().is_empty());
}

#[test]
fn test_render_view_does_not_submit() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    pipeline(BuildMode::Production).render_view(&mut ctx, &main_viewpoint());

    assert!(!ctx.events().contains(&FrameEvent::Submit));
    assert_eq!(ctx.draw_count(), 4);
}

#[test]
fn test_custom_tags_select_legacy_pass() {
    let fixture = test_scene();
    let mut ctx = TraceContext::new(&fixture.scene);
    let settings = PipelineSettings::default()
        .with_build_mode(BuildMode::Development)
        .with_shader_tags(vec![ShaderTagId::SRP_DEFAULT_UNLIT, ShaderTagId::new("ForwardBase")]);

    ForwardPipeline::new(settings).unwrap().render_frame(&mut ctx, &[main_viewpoint()]);

    let legacy = ctx.draws().find(|record| record.drawable == fixture.legacy).unwrap();
    assert_eq!(legacy.material, "Legacy");
    assert_eq!(legacy.pass, Some(ShaderTagId::new("ForwardBase")));
    assert!(ctx.draws().all(|record| record.material != ERROR_SHADER_NAME));
}

#[test]
fn test_asset_creates_pipeline_from_file() {
    let path = std::env::temp_dir().join(format!("forward_pipeline_asset_{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
        name = "Trace"

        [settings]
        build_mode = "production"
        profiling_label = "Frame"
        "#,
    )
    .unwrap();

    let asset = PipelineAsset::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(asset.name, "Trace");
    let pipeline = asset.create_pipeline().unwrap();
    assert_eq!(pipeline.settings().build_mode, BuildMode::Production);
    assert_eq!(pipeline.settings().profiling_label, "Frame");
    assert_eq!(pipeline.frame_count(), 0);
}

#[test]
fn test_asset_rejects_invalid_settings() {
    let asset = PipelineAsset::new("Empty").with_settings(PipelineSettings::default().with_shader_tags(Vec::new()));
    assert!(matches!(asset.create_pipeline(), Err(PipelineError::InvalidSettings(_))));
}

#[test]
fn test_missing_asset_file_is_config_error() {
    let result = PipelineAsset::load("/nonexistent/forward_pipeline/asset.toml");
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn test_out_of_range_queue_is_still_drawn() {
    let overlay = unlit(7, "Far Overlay", queue::MAX + 1);
    let mut scene = Scene::new();
    let id = scene.add_drawable(Drawable::new(MeshHandle(7), overlay));
    let mut ctx = TraceContext::new(&scene);

    pipeline(BuildMode::Development).render_frame(&mut ctx, &[main_viewpoint()]);

    assert_eq!(drawn(&ctx), vec![id]);
    assert_eq!(ctx.draws().next().unwrap().render_queue, queue::MAX);
}

/// Host that records clears and samples itself instead of through command buffers
#[derive(Default)]
struct NativeMarkers {
    clears: Vec<(bool, bool)>,
    begins: Vec<String>,
    ends: Vec<String>,
    executed_buffers: usize,
    submits: usize,
}

impl FrameContext for NativeMarkers {
    fn execute_command_buffer(&mut self, _buffer: &CommandBuffer) {
        self.executed_buffers += 1;
    }
    fn setup_viewpoint_state(&mut self, _viewpoint: &Viewpoint) {}
    fn query_visibility(&mut self, _viewpoint: &Viewpoint) -> VisibilityResult {
        VisibilityResult::empty()
    }
    fn draw_filtered(&mut self, _: &VisibilityResult, _: &DrawingSettings, _: &FilteringSettings) {}
    fn draw_background(&mut self, _viewpoint: &Viewpoint) {}
    fn submit(&mut self) {
        self.submits += 1;
    }

    fn clear(&mut self, buffer: &mut CommandBuffer, clear_depth: bool, clear_color: bool, _color: Color) {
        assert_eq!(buffer.name(), "Render Commands");
        self.clears.push((clear_depth, clear_color));
    }
    fn begin_sample(&mut self, _buffer: &mut CommandBuffer, name: &str) {
        self.begins.push(name.to_string());
    }
    fn end_sample(&mut self, _buffer: &mut CommandBuffer, name: &str) {
        self.ends.push(name.to_string());
    }
}

#[test]
fn test_host_overrides_of_clear_and_samples_are_used() {
    let mut host = NativeMarkers::default();
    let ui = main_viewpoint().with_clear_flags(ClearFlags::DEPTH);

    pipeline(BuildMode::Production).render_frame(&mut host, &[main_viewpoint(), ui]);

    assert_eq!(host.clears, vec![(true, true), (true, false)]);
    assert_eq!(host.begins, vec!["Render Camera".to_string(); 2]);
    assert_eq!(host.ends, host.begins);
    assert_eq!(host.executed_buffers, 0);
    assert_eq!(host.submits, 1);
}

/// Trace host whose draws fail
struct FailingDraws<'s> {
    trace: TraceContext<'s>,
}

impl FrameContext for FailingDraws<'_> {
    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.trace.execute_command_buffer(buffer);
    }
    fn setup_viewpoint_state(&mut self, viewpoint: &Viewpoint) {
        self.trace.setup_viewpoint_state(viewpoint);
    }
    fn query_visibility(&mut self, viewpoint: &Viewpoint) -> VisibilityResult {
        self.trace.query_visibility(viewpoint)
    }
    fn draw_filtered(&mut self, _: &VisibilityResult, _: &DrawingSettings, _: &FilteringSettings) {
        panic!("device lost while drawing");
    }
    fn draw_background(&mut self, viewpoint: &Viewpoint) {
        self.trace.draw_background(viewpoint);
    }
    fn submit(&mut self) {
        self.trace.submit();
    }
}

#[test]
fn test_sample_closes_when_a_draw_panics() {
    let fixture = test_scene();
    let mut host = FailingDraws {
        trace: TraceContext::new(&fixture.scene),
    };
    let mut pipeline = pipeline(BuildMode::Production);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pipeline.render_frame(&mut host, &[main_viewpoint()]);
    }));

    assert!(result.is_err());
    let events = host.trace.events();
    assert_eq!(events[1], FrameEvent::BeginSample("Render Camera".to_string()));
    assert_eq!(events.last(), Some(&FrameEvent::EndSample("Render Camera".to_string())));
    assert!(!events.contains(&FrameEvent::Submit));
}
