//! Solar Scale entry point
//!
//! Handles platform-specific initialization and runs the frame loop. The
//! `Progression` struct here is a stand-in data holder for the real game
//! logic; it owns nothing scene-related and talks to the view purely
//! through the `ProgressionSource`/`SlotSource` traits.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Demo progression: ore from body strikes, tier advances at fixed
/// thresholds, one build-slot ring per unlocked body.
mod progression {
    use std::collections::HashMap;

    use solar_scale::scene::{BodyId, ProgressionSource, SlotKind, SlotSource};

    /// Total-earned thresholds that advance the tier
    const TIER_THRESHOLDS: [u64; 4] = [500, 5_000, 60_000, 800_000];

    /// Tier at which each body becomes strikeable
    fn unlock_tier(body: BodyId) -> u8 {
        match body {
            BodyId::Earth | BodyId::Moon => 0,
            BodyId::Mercury | BodyId::Venus => 1,
            BodyId::Mars | BodyId::Jupiter | BodyId::Saturn => 2,
            _ => 3,
        }
    }

    pub struct Progression {
        tier: u8,
        pub ore: u64,
        total_earned: u64,
        click_power: u64,
        multipliers: HashMap<BodyId, f32>,
        slots: HashMap<BodyId, Vec<Option<SlotKind>>>,
    }

    impl Progression {
        pub fn new() -> Self {
            let mut slots = HashMap::new();
            slots.insert(BodyId::Earth, vec![None; 6]);
            for body in [
                BodyId::Moon,
                BodyId::Mercury,
                BodyId::Venus,
                BodyId::Mars,
                BodyId::Jupiter,
                BodyId::Saturn,
            ] {
                slots.insert(body, vec![None]);
            }
            Self {
                tier: 0,
                ore: 0,
                total_earned: 0,
                click_power: 1,
                multipliers: HashMap::new(),
                slots,
            }
        }

        /// Strike a body: returns the ore gained
        pub fn mine(&mut self, body: BodyId) -> u64 {
            let mult = self.multipliers.get(&body).copied().unwrap_or(1.0);
            let gain = ((self.click_power as f32) * mult).floor().max(1.0) as u64;
            self.ore += gain;
            self.total_earned += gain;
            while (self.tier as usize) < TIER_THRESHOLDS.len()
                && self.total_earned >= TIER_THRESHOLDS[self.tier as usize]
            {
                self.tier += 1;
                // Each tier speeds up mining
                self.click_power = self.click_power.saturating_mul(4);
                log::info!("progression reached tier {}", self.tier);
            }
            gain
        }

        /// Cycle a slot's content (demo build menu)
        pub fn cycle_slot(&mut self, body: BodyId, index: usize) {
            if let Some(list) = self.slots.get_mut(&body) {
                if let Some(entry) = list.get_mut(index) {
                    *entry = match entry {
                        None => Some(SlotKind::AutoFactory),
                        Some(SlotKind::AutoFactory) => Some(SlotKind::RobotLegion),
                        Some(SlotKind::RobotLegion) => Some(SlotKind::EnergyStation),
                        Some(SlotKind::EnergyStation) => Some(SlotKind::ResearchCenter),
                        Some(SlotKind::ResearchCenter) => None,
                    };
                }
            }
        }
    }

    impl ProgressionSource for Progression {
        fn committed_tier(&self) -> u8 {
            self.tier
        }

        fn is_unlocked(&self, body: BodyId) -> bool {
            self.tier >= unlock_tier(body)
        }

        fn click_multiplier(&self, body: BodyId) -> f32 {
            self.multipliers.get(&body).copied().unwrap_or(1.0)
        }
    }

    impl SlotSource for Progression {
        fn assignments(&self, body: BodyId) -> Vec<Option<SlotKind>> {
            self.slots.get(&body).cloned().unwrap_or_default()
        }

        fn is_host_unlocked(&self, body: BodyId) -> bool {
            self.is_unlocked(body)
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

    use solar_scale::consts::ROLLBACK_STEP;
    use solar_scale::renderer::{RenderState, SceneDrawer};
    use solar_scale::scene::{
        RegionPayload, ScaleView, TierTable, Viewport,
    };
    use solar_scale::Settings;

    use crate::progression::Progression;

    struct App {
        view: ScaleView,
        drawer: SceneDrawer,
        render_state: Option<RenderState>,
        settings: Settings,
        progression: Progression,
        viewport: Viewport,
        dpr: f32,
        pinch_dist: Option<f32>,
    }

    impl App {
        fn new(seed: u64, coarse_pointer: bool) -> Self {
            let settings = Settings::load();
            Self {
                view: ScaleView::new(TierTable::standard(), 0, coarse_pointer, seed),
                drawer: SceneDrawer::new(seed, &settings),
                render_state: None,
                settings,
                progression: Progression::new(),
                viewport: Viewport::new(1280.0, 800.0),
                dpr: 1.0,
                pinch_dist: None,
            }
        }

        fn set_viewport(&mut self, width: f32, height: f32, dpr: f32) {
            self.dpr = dpr;
            self.viewport = Viewport::with_margins(
                width,
                height,
                solar_scale::consts::UI_TOP * dpr,
                solar_scale::consts::UI_BOTTOM * dpr,
            );
        }

        /// One animation frame: advance the view, tessellate, upload
        fn frame(&mut self, time: f64) {
            let viewport = self.viewport;
            self.view
                .frame(time, &viewport, &self.progression, Some(&self.progression));

            let shake = if self.settings.effective_screen_shake() {
                self.view.shake_offset()
            } else {
                Vec2::ZERO
            };
            let vertices = self.drawer.draw(
                self.view.placements(),
                self.view.effects(),
                self.view.hit_index(),
                time,
                &self.settings,
            );
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(vertices, shake) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Pointer-down dispatch against the index built this frame
        fn pointer_down(&mut self, pos: Vec2, now: f64) {
            let Some(hit) = self.view.pointer_down(pos) else {
                return;
            };
            match hit.payload {
                RegionPayload::Slot(_) => {
                    self.progression.cycle_slot(hit.owner, hit.index);
                    log::debug!("slot tap on {:?}[{}]", hit.owner, hit.index);
                }
                RegionPayload::Body => {
                    let gain = self.progression.mine(hit.owner);
                    let target = ore_counter_position(&self.viewport);
                    self.view.spawn_particles(pos, target);
                    self.view.spawn_marker(hit.owner, pos, gain, now);
                    self.view
                        .trigger_shake((3.0 + gain as f32 / 120.0).min(9.0), 90.0, now);
                }
            }
        }
    }

    /// Where resource particles fly to: the ore counter if the host page
    /// has one, else the top center
    fn ore_counter_position(viewport: &Viewport) -> Vec2 {
        let fallback = Vec2::new(viewport.width * 0.5, 44.0);
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return fallback;
        };
        match document.get_element_by_id("ore-counter") {
            Some(el) => {
                let rect = el.get_bounding_client_rect();
                Vec2::new(
                    (rect.left() + rect.width() * 0.5) as f32,
                    (rect.top() + rect.height() * 0.5) as f32,
                )
            }
            None => fallback,
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// Map a client-space event position to canvas pixels
    fn canvas_pos(canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = canvas.width() as f32 / (rect.width() as f32).max(1.0);
        let scale_y = canvas.height() as f32 / (rect.height() as f32).max(1.0);
        Vec2::new(
            ((client_x - rect.left() as f32) * scale_x).clamp(0.0, canvas.width() as f32),
            ((client_y - rect.top() as f32) * scale_y).clamp(0.0, canvas.height() as f32),
        )
    }

    fn touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent, index: u32) -> Option<Vec2> {
        let touch = event.touches().item(index)?;
        Some(canvas_pos(
            canvas,
            touch.client_x() as f32,
            touch.client_y() as f32,
        ))
    }

    /// Sync the DOM overlay: ore counter, rollback hint, body labels
    fn update_overlay(app: &App) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(el) = document.get_element_by_id("ore-counter") {
            el.set_text_content(Some(&app.progression.ore.to_string()));
        }

        if let Some(el) = document.get_element_by_id("rollback-hint") {
            match &app.view.placements().rollback_hint {
                Some(hint) => {
                    el.set_text_content(Some(&format!(
                        "\u{1F50D} {} view \u{00B7} double-click to return",
                        hint.label()
                    )));
                    let _ = el.set_attribute("class", "hint");
                }
                None => {
                    let _ = el.set_attribute("class", "hint hidden");
                }
            }
        }

        if app.settings.labels {
            if let Some(el) = document.get_element_by_id("label-centauri") {
                if let Ok(el) = el.dyn_into::<web_sys::HtmlElement>() {
                    let style = el.style();
                    let ct = app.view.placements().centauri;
                    if ct.alpha > 0.02 && ct.radius > 0.8 {
                        let x = (ct.center.x + ct.radius * 1.02) / app.dpr;
                        let y = (ct.center.y + ct.radius * 0.18) / app.dpr;
                        let _ = style.set_property("left", &format!("{x:.0}px"));
                        let _ = style.set_property("top", &format!("{y:.0}px"));
                        let _ = style.set_property("opacity", &format!("{:.2}", ct.alpha * 0.75));
                    } else {
                        let _ = style.set_property("opacity", "0");
                    }
                }
            }
            for placement in &app.view.placements().bodies {
                let id = format!("label-{}", placement.id.label().to_lowercase());
                let Some(el) = document.get_element_by_id(&id) else {
                    continue;
                };
                let Ok(el) = el.dyn_into::<web_sys::HtmlElement>() else {
                    continue;
                };
                let style = el.style();
                if placement.label_alpha > 0.05 {
                    let x = (placement.center.x + placement.radius + 5.0) / app.dpr;
                    let y = (placement.center.y + 4.0) / app.dpr;
                    let _ = style.set_property("left", &format!("{x:.0}px"));
                    let _ = style.set_property("top", &format!("{y:.0}px"));
                    let _ =
                        style.set_property("opacity", &format!("{:.2}", placement.label_alpha));
                } else {
                    let _ = style.set_property("opacity", "0");
                }
            }
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame(time);
            update_overlay(&a);
        }
        request_animation_frame(app);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Click: mine bodies, tap slots
        {
            let app = app.clone();
            let canvas2 = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_pos(&canvas2, event.client_x() as f32, event.client_y() as f32);
                app.borrow_mut().pointer_down(pos, now_ms());
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel: scroll up pulls the view back a quarter tier, down returns
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                let delta = if event.delta_y() > 0.0 {
                    -ROLLBACK_STEP
                } else {
                    ROLLBACK_STEP
                };
                app.borrow_mut().view.nudge_rollback(delta, now_ms());
            });
            let _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Double click: snap back to the committed tier
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().view.reset_rollback();
            });
            let _ = canvas
                .add_event_listener_with_callback("dblclick", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Single touch taps mine; two-finger pinch drives rollback
        {
            let app = app.clone();
            let canvas2 = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut a = app.borrow_mut();
                match event.touches().length() {
                    1 => {
                        event.prevent_default();
                        if let Some(pos) = touch_pos(&canvas2, &event, 0) {
                            a.pointer_down(pos, now_ms());
                        }
                    }
                    2 => a.pinch_dist = None,
                    _ => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let canvas2 = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() != 2 {
                    return;
                }
                event.prevent_default();
                let mut a = app.borrow_mut();
                let (Some(p0), Some(p1)) = (
                    touch_pos(&canvas2, &event, 0),
                    touch_pos(&canvas2, &event, 1),
                ) else {
                    return;
                };
                let dist = (p0 - p1).length();
                if let Some(prev) = a.pinch_dist {
                    // Spreading the fingers pulls the view back
                    let delta = (dist - prev) / 120.0 * ROLLBACK_STEP;
                    a.view.nudge_rollback(delta, now_ms());
                }
                a.pinch_dist = Some(dist);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().pinch_dist = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width().max(320) as f64 * dpr) as u32;
            let height = (canvas.client_height().max(480) as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.set_viewport(width as f32, height as f32, dpr as f32);
            if let Some(ref mut render_state) = a.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Solar Scale starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width().max(320) as f64 * dpr) as u32;
        let height = (canvas.client_height().max(480) as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let coarse_pointer = window
            .match_media("(pointer: coarse)")
            .ok()
            .flatten()
            .map(|m| m.matches())
            .unwrap_or(false);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, coarse_pointer)));
        app.borrow_mut()
            .set_viewport(width as f32, height as f32, dpr as f32);

        log::info!("View initialized (seed {seed}, coarse pointer {coarse_pointer})");

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, app.clone());
        setup_resize_handler(&canvas, app.clone());

        request_animation_frame(app);

        log::info!("Solar Scale running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Solar Scale (native) starting...");
    log::info!("Native mode has no surface - run with `trunk serve` for the web version");

    // Headless sanity pass over the frame pipeline
    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use glam::Vec2;
    use solar_scale::scene::{BodyId, ScaleView, TierTable, Viewport};

    use crate::progression::Progression;

    let mut view = ScaleView::new(TierTable::standard(), 0, false, 4242);
    let mut progression = Progression::new();
    let viewport = Viewport::new(1280.0, 800.0);

    let mut now = 0.0;
    for frame in 0u32..600 {
        now += 1000.0 / 60.0;
        view.frame(now, &viewport, &progression, Some(&progression));

        // Hammer the home body until the first tier advance kicks in
        if let Some(earth) = view.body_placement(BodyId::Earth) {
            if let Some(hit) = view.pointer_down(earth.center) {
                let gain = progression.mine(hit.owner);
                view.spawn_marker(hit.owner, earth.center, gain, now);
                view.spawn_particles(earth.center, Vec2::new(640.0, 44.0));
            }
        }

        if frame % 60 == 0 {
            let radius = view
                .body_placement(BodyId::Earth)
                .map(|p| p.radius)
                .unwrap_or(0.0);
            log::info!(
                "frame {frame}: tier {} level {:.2} earth radius {:.1}px",
                view.committed_tier(),
                view.placements().rendered_level,
                radius
            );
        }
    }

    println!(
        "headless demo done: tier {}, {} ore mined",
        view.committed_tier(),
        progression.ore
    );
}
