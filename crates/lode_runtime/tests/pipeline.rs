//! End-to-end tests: viewport → layout → positioned components with async textures

use std::rc::Rc;

use lode_runtime::core::{Anchor, LogLevel, RecordingSink};
use lode_runtime::image::{DeferredSource, MemorySource, TextureError, TextureFactory, TextureKey};
use lode_runtime::layout::{LayoutConfig, RegionName};
use lode_runtime::platform::{SafeInsets, SharedInsets, StaticInsets, ViewportChange, ViewportEvent};
use lode_runtime::scene::{RendererComponent, RendererConfig, VectorImageResolver, VectorSprite};
use lode_runtime::Engine;

const ORE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><circle cx="12" cy="12" r="10" fill="#b87333"/></svg>"##;
const GEM_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M12 2 L22 12 L12 22 L2 12 Z" fill="#3ad0ff"/></svg>"##;

fn memory_engine(insets: SafeInsets) -> (Engine, Rc<RecordingSink>) {
    let source = MemorySource::new();
    source.insert("ore.svg", ORE_SVG);
    source.insert("gem.svg", GEM_SVG);
    let log = Rc::new(RecordingSink::new());
    let engine = Engine::new(
        LayoutConfig::default(),
        TextureFactory::new(source),
        StaticInsets(insets),
        log.clone(),
    );
    (engine, log)
}

#[test]
fn test_components_follow_layout_regions() {
    let (mut engine, log) = memory_engine(SafeInsets::new(40.0, 0.0, 20.0, 0.0));
    let store = engine.layout_store();

    let state = engine.handle_viewport(ViewportEvent::new(375.0, 812.0, ViewportChange::Initial));
    assert!(state.is_mobile);

    let hud = engine.create_node("hud").unwrap();
    let layout = store.snapshot().current_layout.unwrap();
    let region = layout.region(RegionName::TopHud).unwrap();
    engine
        .scene()
        .borrow_mut()
        .set_position(hud, region.anchor_point())
        .unwrap();

    let icon = VectorSprite::new(
        engine.context(),
        hud,
        RendererConfig::new().anchor(Anchor::TopCenter),
        "ore.svg",
        48,
    );
    icon.on_added();
    engine.run_until_stalled();

    assert!(icon.is_texture_loaded());
    let position = engine.scene().borrow().node(hud).unwrap().position;
    assert_eq!(position.y, layout.safe_area.y() + 8.0);
    assert!(layout.safe_area.contains(position));
    assert!(log.records().is_empty());
}

#[test]
fn test_many_components_share_one_load() {
    let (mut engine, _log) = memory_engine(SafeInsets::ZERO);
    let node = engine.create_node("ore-field").unwrap();

    let sprites: Vec<_> = (0..8)
        .map(|_| {
            VectorSprite::new(
                engine.context(),
                node,
                RendererConfig::default(),
                "ore.svg",
                64,
            )
        })
        .collect();
    engine.run_until_stalled();

    let stats = engine.textures().stats();
    assert_eq!(stats.loads_started, 1);
    assert_eq!(stats.decoded, 1);
    assert_eq!(stats.cached, 1);

    let textures: Vec<_> = sprites
        .iter()
        .map(|s| s.with_primitive(|p| Rc::clone(p.texture().unwrap())).unwrap())
        .collect();
    assert!(textures.iter().all(|t| Rc::ptr_eq(t, &textures[0])));
    assert_eq!(engine.scene().borrow().primitive_count(), 8);
}

#[test]
fn test_dispose_races_with_deferred_load() {
    let source = DeferredSource::new();
    let log = Rc::new(RecordingSink::new());
    let mut engine = Engine::new(
        LayoutConfig::default(),
        TextureFactory::new(source.clone()),
        StaticInsets::default(),
        log.clone(),
    );
    let node = engine.create_node("drill").unwrap();

    let keep = RendererComponent::new(
        engine.context(),
        node,
        RendererConfig::default(),
        VectorImageResolver,
        Some(TextureKey::new("gem.svg", 32)),
    );
    let doomed = RendererComponent::new(
        engine.context(),
        node,
        RendererConfig::default(),
        VectorImageResolver,
        Some(TextureKey::new("gem.svg", 32)),
    );
    engine.run_until_stalled();
    assert_eq!(source.fetch_count("gem.svg"), 1);

    drop(doomed);
    assert_eq!(engine.scene().borrow().primitive_count(), 1);

    source.complete("gem.svg", Ok(GEM_SVG.as_bytes().to_vec()));
    engine.run_until_stalled();

    assert!(keep.is_texture_loaded());
    assert_eq!(engine.scene().borrow().primitive_count(), 1);
    assert!(log.records().is_empty());
}

#[test]
fn test_failures_stay_isolated() {
    let (mut engine, log) = memory_engine(SafeInsets::ZERO);
    let node = engine.create_node("icons").unwrap();

    let good = VectorSprite::new(engine.context(), node, RendererConfig::default(), "ore.svg", 32);
    let bad = VectorSprite::new(
        engine.context(),
        node,
        RendererConfig::new().alpha(0.5),
        "missing.svg",
        32,
    );
    engine.run_until_stalled();

    assert!(good.is_texture_loaded());
    assert!(!bad.is_resource_loaded());
    assert_eq!(bad.with_primitive(|p| p.alpha), Some(0.5));

    let errors = log.at_level(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].context.get("path"), Some("missing.svg"));
    assert!(errors[0]
        .error
        .as_deref()
        .is_some_and(|e| e.contains(&TextureError::NotFound("missing.svg".into()).to_string())));

    // A later successful request recovers the component
    bad.set_source("gem.svg", None);
    engine.run_until_stalled();
    assert!(bad.is_texture_loaded());
}

#[test]
fn test_insets_settling_late() {
    let host = SharedInsets::new(SafeInsets::ZERO);
    let mut engine = Engine::with_source(LayoutConfig::default(), MemorySource::new(), host.clone());
    let store = engine.layout_store();

    engine.handle_viewport(ViewportEvent::resized(390.0, 844.0));
    let early = store.snapshot().current_layout.unwrap();
    assert_eq!(early.safe_area.height(), 844.0);

    host.set(SafeInsets::new(47.0, 0.0, 34.0, 0.0));
    engine.handle_viewport(ViewportEvent::new(390.0, 844.0, ViewportChange::InsetsChanged));
    let settled = store.snapshot().current_layout.unwrap();
    assert_eq!(settled.safe_area.height(), 844.0 - 81.0);

    for (_, region) in settled.iter() {
        assert!(settled.safe_area.contains_rect(&region.rect()));
    }
}

#[test]
fn test_layout_debug_overlay_through_engine() {
    let (mut engine, _log) = memory_engine(SafeInsets::ZERO);
    engine.handle_viewport(ViewportEvent::resized(1280.0, 720.0));
    let before = engine.layout_store().snapshot();

    assert!(engine.enable_layout_debug());
    assert!(!engine.enable_layout_debug());
    engine.handle_viewport(ViewportEvent::resized(1280.0, 720.0));

    assert_eq!(engine.layout_store().snapshot().current_layout, before.current_layout);
    assert_eq!(engine.scene().borrow().primitive_count(), 8);

    assert!(engine.disable_layout_debug());
    assert_eq!(engine.scene().borrow().primitive_count(), 0);
}
