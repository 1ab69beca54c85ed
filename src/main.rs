//! Cone Hop entry point
//!
//! Web: wires keyboard, start button and animation frames to a `GameSession`.
//! Native: runs a headless session with a simple auto-jumping driver.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent};

    use cone_hop::Settings;
    use cone_hop::platform::{FrameClock, KeyBindings, KeyPhase};
    use cone_hop::renderer::{Notifier, Renderer, present};
    use cone_hop::sim::{GameEvent, GameSession, Snapshot};

    const GAME_OVER_MESSAGE: &str = "The Game is Over :( Try Again!";

    /// Positions the car and cone elements inside `#gameContainer`
    struct DomRenderer {
        document: Document,
    }

    impl DomRenderer {
        fn set_style(el: &Element, name: &str, value: &str) {
            if let Some(el) = el.dyn_ref::<HtmlElement>() {
                if let Err(e) = el.style().set_property(name, value) {
                    log::warn!("Could not set {}: {:?}", name, e);
                }
            }
        }

        /// Existing element for a cone, or a freshly created one
        fn cone_element(&self, id: u32) -> Option<Element> {
            let dom_id = format!("cone-{}", id);
            if let Some(el) = self.document.get_element_by_id(&dom_id) {
                return Some(el);
            }
            let container = self.document.get_element_by_id("gameContainer")?;
            let el = self.document.create_element("div").ok()?;
            el.set_id(&dom_id);
            el.set_class_name("cone");
            container.append_child(&el).ok()?;
            Some(el)
        }
    }

    impl Renderer for DomRenderer {
        fn draw(&mut self, snapshot: &Snapshot) {
            if let Some(car) = self.document.get_element_by_id("car") {
                Self::set_style(&car, "left", &format!("{}px", snapshot.player_pos.x));
                Self::set_style(&car, "bottom", &format!("{}px", snapshot.player_pos.y));
            }

            let mut live = HashSet::new();
            for cone in &snapshot.obstacles {
                if let Some(el) = self.cone_element(cone.id) {
                    Self::set_style(&el, "right", &format!("{}px", cone.right_offset));
                    live.insert(el.id());
                }
            }

            // Drop elements for retired cones
            if let Ok(nodes) = self.document.query_selector_all(".cone") {
                for i in 0..nodes.length() {
                    let Some(node) = nodes.get(i) else { continue };
                    if let Some(el) = node.dyn_ref::<Element>() {
                        if !live.contains(&el.id()) {
                            el.remove();
                        }
                    }
                }
            }

            if let Some(el) = self.document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("Score: {}", snapshot.score)));
            }
        }
    }

    /// Alerts the player and reloads the page for a fresh session
    struct AlertNotifier;

    impl Notifier for AlertNotifier {
        fn game_over(&mut self, final_score: u64) {
            log::info!("Game over with score {}", final_score);
            let Some(window) = web_sys::window() else { return };
            let _ = window.alert_with_message(&format!("{}\nScore: {}", GAME_OVER_MESSAGE, final_score));
            if let Err(e) = window.location().reload() {
                log::warn!("Reload failed: {:?}", e);
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        frame_clock: FrameClock,
        bindings: KeyBindings,
        renderer: DomRenderer,
        notifier: AlertNotifier,
    }

    impl Game {
        fn new(settings: Settings, document: Document) -> Self {
            Self {
                bindings: settings.bindings.clone(),
                session: GameSession::new(settings),
                frame_clock: FrameClock::new(),
                renderer: DomRenderer { document },
                notifier: AlertNotifier,
            }
        }

        fn on_key(&mut self, key: &str, phase: KeyPhase) -> bool {
            match self.bindings.intent_for(key, phase) {
                Some(intent) => {
                    self.session.apply(intent);
                    true
                }
                None => false,
            }
        }

        /// Advance and draw one animation frame. Returns false once the run is over.
        fn frame(&mut self, time: f64) -> bool {
            let dt = self.frame_clock.step(time);
            self.session.advance(dt);
            let events = present(&mut self.session, &mut self.renderer, &mut self.notifier);
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Cone Hop starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach to");
            return;
        };

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings, document.clone())));

        setup_input_handlers(&document, game.clone());
        setup_start_button(&document, game.clone());

        // Draw the idle frame; the clock runs from here but nothing is
        // scheduled until the start button is pressed
        request_animation_frame(game);

        log::info!("Cone Hop ready");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        for (event_name, phase) in [("keydown", KeyPhase::Down), ("keyup", KeyPhase::Up)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                if game.borrow_mut().on_key(&event.key(), phase) {
                    event.prevent_default();
                }
            });
            let _ = document
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("startBtn") else {
            log::warn!("No #startBtn element, starting immediately");
            game.borrow_mut().session.start();
            return;
        };

        let btn_clone = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().session.start();
            DomRenderer::set_style(&btn_clone, "display", "none");
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = game.borrow_mut().frame(time);
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cone_hop::Settings;
    use cone_hop::renderer::{LogNotifier, Renderer, TextRenderer, present};
    use cone_hop::sim::{GameSession, GameStatus, Intent, Snapshot};

    /// Frame length in clock units
    const FRAME: u64 = 50;
    /// Give up after ten minutes of game time
    const TIME_LIMIT: u64 = 10 * 60 * 1000;

    /// Jump when the nearest cone ahead is this close to the car's front
    const JUMP_LEAD: f32 = 60.0;

    /// Gap from the car's front to the nearest cone still ahead of it
    fn nearest_gap(snapshot: &Snapshot) -> Option<f32> {
        let front = snapshot.player_bounds.right;
        snapshot
            .obstacles
            .iter()
            .map(|o| o.bounds.left - front)
            .filter(|gap| *gap > 0.0)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Play one session, returning the final score
    pub fn run(settings: Settings) -> u64 {
        let mut session = GameSession::new(settings);
        let mut renderer = TextRenderer::default();
        let mut notifier = LogNotifier::default();

        session.start();
        while session.status() == GameStatus::Running && session.now() < TIME_LIMIT {
            let snapshot = session.snapshot();
            if !snapshot.jumping {
                if let Some(gap) = nearest_gap(&snapshot) {
                    if gap <= JUMP_LEAD {
                        session.apply(Intent::Jump);
                    }
                }
            }

            session.advance(FRAME);
            present(&mut session, &mut renderer, &mut notifier);
            if session.now() % 1000 == 0 {
                log::debug!("\n{}", renderer.frame());
            }
        }

        renderer.draw(&session.snapshot());
        println!("{}", renderer.frame());
        session.score()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cone Hop (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match cone_hop::Settings::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::error!("Could not load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => cone_hop::Settings::default(),
    };

    let score = headless::run(settings);
    println!("Final score: {}", score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
