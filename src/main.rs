//! Runaway Valentine entry point
//!
//! Wires browser events into the scene and mirrors scene state into the DOM.
//! Native builds run a short scripted session and log what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, MouseEvent, TouchEvent};

    use runaway_valentine::Tuning;
    use runaway_valentine::platform::DomLayout;
    use runaway_valentine::sim::{RevealStage, Scene, SceneEvent, SceneInput, tick};

    /// App instance holding all state
    struct App {
        scene: Scene,
        probe: DomLayout,
        input: SceneInput,
    }

    impl App {
        fn new(tuning: Tuning, seed: u64) -> Self {
            Self {
                scene: Scene::new(tuning, seed),
                probe: DomLayout::new("no-container"),
                input: SceneInput::default(),
            }
        }

        /// Run one frame
        fn update(&mut self, time: f64) {
            let input = std::mem::take(&mut self.input);
            for event in tick(&mut self.scene, &input, &self.probe, time) {
                match event {
                    SceneEvent::Escaped(e) => log::debug!("Escaped {}x: {}", e.count, e.message),
                    SceneEvent::Captured(pair) => log::info!(
                        "Caught! yes {:.2} / no {:.2}",
                        pair.yes_scale,
                        pair.no_scale
                    ),
                    SceneEvent::StageChanged(stage) => log::info!("Stage: {}", stage.as_str()),
                    SceneEvent::Replayed => log::info!("Replaying"),
                    SceneEvent::ReturnedToRest | SceneEvent::MessageCleared => {}
                }
            }
        }

        /// Mirror scene state into the DOM
        fn render(&self, document: &Document) {
            let scene = &self.scene;
            let evasive = scene.evasive();
            let stage = scene.stage();

            set_hidden(document, "question", !scene.question_visible());
            set_hidden(document, "reveal", scene.question_visible());

            set_transform(document, "no-btn", &scene.no_pose().css_transform());
            set_transform(document, "yes-btn", &scene.yes_pose().css_transform());
            set_text(document, "no-face", evasive.expression().glyph());
            set_class(document, "no-btn", "running", evasive.shows_trail());

            match scene.message() {
                Some(message) => {
                    set_text(document, "no-message", message);
                    set_hidden(document, "no-message", false);
                }
                None => set_hidden(document, "no-message", true),
            }

            set_text(
                document,
                "no-counter",
                &format!("Escaped {}x 🏃", scene.escape_count()),
            );
            set_hidden(document, "no-counter", !evasive.shows_counter());

            set_hidden(document, "reveal-primary", stage < RevealStage::PrimaryShown);
            set_hidden(document, "reveal-secondary", stage < RevealStage::SecondaryShown);
            set_hidden(document, "reveal-actions", stage < RevealStage::ActionsShown);
            set_hidden(document, "letter", !stage.is_letter());
            set_class(document, "letter", "open", stage >= RevealStage::LetterOpen);
            set_hidden(document, "letter-content", stage < RevealStage::LetterContentShown);
        }
    }

    fn element(document: &Document, id: &str) -> Option<web_sys::Element> {
        document.get_element_by_id(id)
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        set_class(document, id, "hidden", hidden);
    }

    fn set_class(document: &Document, id: &str, class: &str, on: bool) {
        if let Some(el) = element(document, id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = element(document, id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_transform(document: &Document, id: &str, transform: &str) {
        if let Some(el) = element(document, id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
            let _ = el.style().set_property("transform", transform);
        }
    }

    /// Optional `<script type="application/json" id="tuning">` overrides
    fn load_tuning(document: &Document) -> Tuning {
        match element(document, "tuning").and_then(|el| el.text_content()) {
            Some(json) if !json.trim().is_empty() => Tuning::from_json_or_default(&json),
            _ => Tuning::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger unavailable: {e}").into());
        }

        log::info!("Runaway Valentine starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, nothing to do");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(load_tuning(&document), seed)));
        log::info!("Scene mounted with seed: {}", seed);

        setup_pointer_handlers(&document, app.clone());
        setup_buttons(&document, app.clone());

        request_animation_frame(app);
    }

    fn setup_pointer_handlers(document: &Document, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Mouse move anywhere on the page
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().input.pointer =
                    Some(Vec2::new(event.client_x() as f32, event.client_y() as f32));
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize / rotation
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().input.resized = true;
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(no_btn) = element(document, "no-btn") else {
            log::warn!("No button missing from page");
            return;
        };

        // Touch on the No button: always runs
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut().input.touch =
                        Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = no_btn
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Actually clicking the No button
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                app.borrow_mut().input.evasive_click =
                    Some(Vec2::new(event.client_x() as f32, event.client_y() as f32));
            });
            let _ = no_btn
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        let buttons: [(&str, fn(&mut SceneInput)); 4] = [
            ("yes-btn", |input| input.accept = true),
            ("forever-btn", |input| input.open_letter = true),
            ("letter-close", |input| input.dismiss_letter = true),
            ("replay-btn", |input| input.replay = true),
        ];

        for (id, apply) in buttons {
            let Some(btn) = element(document, id) else {
                log::warn!("Button #{} missing from page", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                apply(&mut app.borrow_mut().input);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            app_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn app_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.render(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Runaway Valentine (native) starting...");
    log::info!("The interactive page needs a browser - run with `trunk serve` for the web version");

    demo_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: chase the No button, catch it twice, say yes, read the letter
#[cfg(not(target_arch = "wasm32"))]
fn demo_session() {
    use glam::Vec2;
    use runaway_valentine::consts::{MIN_VIEWPORT_HEIGHT, MIN_VIEWPORT_WIDTH};
    use runaway_valentine::sim::{Rect, SceneEvent, tick};
    use runaway_valentine::{FixedLayout, Layout, Scene, SceneInput, Tuning};

    let viewport = Vec2::new(MIN_VIEWPORT_WIDTH, MIN_VIEWPORT_HEIGHT);
    let probe = FixedLayout::new(Layout::new(
        viewport,
        Rect::from_center(viewport * Vec2::new(0.5, 0.7), Vec2::new(120.0, 50.0)),
    ));
    let mut scene = Scene::new(Tuning::default(), 2026);

    let button_center = |scene: &Scene| {
        let pose = scene.no_pose();
        probe
            .layout
            .map(|l| l.element_rect(pose.offset, pose.scale).center())
            .unwrap_or(Vec2::ZERO)
    };

    let mut script: Vec<(f64, SceneInput)> = Vec::new();
    let mut t = 0.0;
    for _ in 0..4 {
        t += 400.0;
        script.push((t, SceneInput::default()));
    }
    script.push((5000.0, SceneInput::default()));
    script.push((
        9000.0,
        SceneInput {
            accept: true,
            ..Default::default()
        },
    ));
    script.push((17_000.0, SceneInput::default()));
    script.push((
        17_500.0,
        SceneInput {
            open_letter: true,
            ..Default::default()
        },
    ));
    script.push((20_000.0, SceneInput::default()));

    for (i, (now, mut input)) in script.into_iter().enumerate() {
        // The first frames chase the button; two of them land a click
        if i < 4 {
            let target = button_center(&scene) + Vec2::new(10.0, 4.0);
            if i % 2 == 1 {
                input.evasive_click = Some(target);
            } else {
                input.pointer = Some(target);
            }
        }

        for event in tick(&mut scene, &input, &probe, now) {
            match event {
                SceneEvent::Escaped(e) => log::info!(
                    "[{:>6.0}ms] escape #{} \"{}\" -> ({:.0}, {:.0})",
                    now,
                    e.count,
                    e.message,
                    e.pose.offset.x,
                    e.pose.offset.y
                ),
                SceneEvent::Captured(pair) => log::info!(
                    "[{:>6.0}ms] caught: yes x{:.2}, no x{:.2}",
                    now,
                    pair.yes_scale,
                    pair.no_scale
                ),
                SceneEvent::ReturnedToRest => log::info!("[{:>6.0}ms] No button back home", now),
                SceneEvent::MessageCleared => {}
                SceneEvent::StageChanged(stage) => {
                    log::info!("[{:>6.0}ms] stage -> {}", now, stage.as_str())
                }
                SceneEvent::Replayed => log::info!("[{:>6.0}ms] replay", now),
            }
        }
    }

    println!(
        "\nFinal stage: {} after {} escapes",
        scene.stage().as_str(),
        scene.escape_count()
    );
}
