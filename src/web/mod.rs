//! Browser front end: builds the single-screen page, runs the animation-frame
//! loop and forwards clicks into the [`GameSession`].
//!
//! Page layout, top to bottom: header with the music toggle, a panel with the
//! letter counts, a panel with the delays, the canvas viewport over the panda
//! background, and a footer with the start / end button.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement, window,
};

use crate::config::GameConfig;
use crate::game::{GameEvent, GameSession};

mod audio;
pub mod render;

use audio::AudioBank;
use render::Viewport;

pub const BACKGROUND_IMAGE: &str = "/images/panda.png";
const ROOT_ID: &str = "pp-root";
const CANVAS_ID: &str = "pp-viewport";
const MUSIC_BUTTON_ID: &str = "pp-music";
const START_BUTTON_ID: &str = "pp-start";
const VIEWPORT_WIDTH: u32 = 375;
const VIEWPORT_HEIGHT: u32 = 360;

struct App {
    session: GameSession,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: HtmlImageElement,
    audio: AudioBank,
    music_button: Element,
    start_button: Element,
    events: Vec<GameEvent>,
}

impl App {
    fn viewport(&self) -> Viewport {
        Viewport { width: self.canvas.width() as f64, height: self.canvas.height() as f64 }
    }

    /// Plays queued sounds and refreshes the button labels.
    fn flush(&mut self) {
        self.audio.play_events(&self.events);
        self.events.clear();
        self.music_button
            .set_text_content(Some(music_glyph(self.session.is_music_playing())));
        self.start_button
            .set_text_content(Some(start_label(self.session.is_running())));
    }
}

thread_local! {
    static APP: std::cell::RefCell<Option<App>> = const { std::cell::RefCell::new(None) };
}

pub fn music_glyph(playing: bool) -> &'static str {
    if playing { "🔇" } else { "🔊" }
}

pub fn start_label(running: bool) -> &'static str {
    if running { "End Game" } else { "Start Game" }
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

/// Mounts the page into `<body>` and starts the frame loop. Mounting twice
/// is a no-op.
pub fn mount(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if doc.get_element_by_id(ROOT_ID).is_some() {
        log::warn!("panda pop already mounted");
        return Ok(());
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let root = div(&doc, "width:100%; max-width:375px; margin:0 auto; background:#fff; color:#000; height:100vh; display:flex; flex-direction:column; font-family:sans-serif;")?;
    root.set_id(ROOT_ID);

    let header = div(&doc, "flex:1; background:#22c55e; color:#fff; font-weight:700; font-size:36px; display:flex; align-items:center; justify-content:center;")?;
    let music_button = doc.create_element("button")?;
    music_button.set_id(MUSIC_BUTTON_ID);
    music_button.set_attribute("style", "background:none; border:none; font-size:36px; cursor:pointer;")?;
    music_button.set_text_content(Some(music_glyph(false)));
    header.append_child(&music_button)?;

    let counts = div(&doc, "flex:1.5; background:#2563eb; color:#fff; font-weight:700; display:flex; flex-direction:column; align-items:center; justify-content:center;")?;
    for line in count_lines(&config) {
        paragraph(&doc, &counts, &line)?;
    }

    let delays = div(&doc, "flex:1.5; background:#ea580c; color:#fff; font-weight:700; display:flex; flex-direction:column; align-items:center; justify-content:center;")?;
    for line in delay_lines(&config) {
        paragraph(&doc, &delays, &line)?;
    }

    let game_area = div(&doc, "flex:4.5; background:#4b5563; position:relative; overflow:hidden;")?;
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_id(CANVAS_ID);
    canvas.set_width(VIEWPORT_WIDTH);
    canvas.set_height(VIEWPORT_HEIGHT);
    canvas.set_attribute("style", "width:100%; height:100%; display:block; cursor:pointer;")?;
    game_area.append_child(&canvas)?;

    let footer = div(&doc, "flex:1.5; background:#ca8a04; color:#fff; display:flex; align-items:center; justify-content:center;")?;
    let start_button = doc.create_element("button")?;
    start_button.set_id(START_BUTTON_ID);
    start_button.set_attribute("style", "border:2px solid #dc2626; background:none; color:#fff; font-weight:700; padding:8px 24px; border-radius:12px; cursor:pointer;")?;
    start_button.set_text_content(Some(start_label(false)));
    footer.append_child(&start_button)?;

    for section in [&header, &counts, &delays, &game_area, &footer] {
        root.append_child(section)?;
    }
    body.append_child(&root)?;

    // Match the drawing buffer to the laid-out size once it is known.
    if canvas.client_width() > 0 && canvas.client_height() > 0 {
        canvas.set_width(canvas.client_width() as u32);
        canvas.set_height(canvas.client_height() as u32);
    }

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    let background = HtmlImageElement::new()?;
    background.set_src(BACKGROUND_IMAGE);

    let session =
        GameSession::new(config, now_ms()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let app = App {
        session,
        canvas: canvas.clone(),
        ctx,
        background,
        audio: AudioBank::load()?,
        music_button: music_button.clone(),
        start_button: start_button.clone(),
        events: Vec::new(),
    };
    APP.with(|cell| cell.replace(Some(app)));

    on_click(&music_button, |app, _| {
        app.session.toggle_music(&mut app.events);
        app.flush();
    })?;
    on_click(&start_button, |app, _| {
        app.session.toggle_running(now_ms(), &mut app.events);
        app.flush();
    })?;
    on_click(&canvas, |app, evt| {
        let now = now_ms();
        let vp = app.viewport();
        let (x, y) = canvas_point(&app.canvas, &evt);
        // Catch up first so letters that expired since the last frame are gone.
        app.session.advance(now, &mut app.events);
        if let Some(id) = render::hit_test(app.session.letters(), x, y, now, vp) {
            app.session.tap(id, now, &mut app.events);
        }
        app.flush();
    })?;

    log::info!("panda pop mounted");
    start_frame_loop();
    Ok(())
}

pub fn count_lines(config: &GameConfig) -> [String; 3] {
    [
        format!("Total W : {}", config.total_w),
        format!("Total Z : {}", config.total_z),
        format!("Total Letters : {}", config.total_letters()),
    ]
}

pub fn delay_lines(config: &GameConfig) -> [String; 2] {
    [
        format!("delay between each letter : {}'s", config.spawn_interval_ms / 1_000.0),
        format!("delay between rounds : {}'s", config.repeat_delay_ms / 1_000.0),
    ]
}

fn div(doc: &Document, style: &str) -> Result<Element, JsValue> {
    let el = doc.create_element("div")?;
    el.set_attribute("style", style)?;
    Ok(el)
}

fn paragraph(doc: &Document, parent: &Element, text: &str) -> Result<(), JsValue> {
    let p = doc.create_element("p")?;
    p.set_attribute("style", "margin:2px 0;")?;
    p.set_text_content(Some(text));
    parent.append_child(&p)?;
    Ok(())
}

/// Converts a click to drawing-buffer coordinates (the canvas is CSS-scaled).
fn canvas_point(canvas: &HtmlCanvasElement, evt: &web_sys::MouseEvent) -> (f64, f64) {
    let sx = canvas.width() as f64 / canvas.client_width().max(1) as f64;
    let sy = canvas.height() as f64 / canvas.client_height().max(1) as f64;
    (evt.offset_x() as f64 * sx, evt.offset_y() as f64 * sy)
}

fn on_click(
    target: &web_sys::EventTarget,
    handler: impl Fn(&mut App, web_sys::MouseEvent) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
        with_app(|app| handler(app, evt));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| frame(app, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(app: &mut App, ts: f64) {
    app.session.advance(ts, &mut app.events);
    app.flush();
    // A click may have pushed the session clock past this frame's timestamp.
    let now = app.session.now();
    let vp = app.viewport();
    render::draw_frame(&app.ctx, &app.background, app.session.letters(), now, vp);
}
