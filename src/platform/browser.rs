// src/platform/browser.rs
//! Browser host built on web-sys.
//!
//! Listener closures are leaked on purpose: they live as long as the page.

use crate::config::AssetConfig;
use crate::display::drivers::canvaskit::{canvas_kit_init, CanvasKitBackend};
use crate::display::LoadedAssets;
use crate::geometry::Size;
use crate::keys::Modifiers;
use anyhow::{anyhow, Context, Result};
use js_sys::{Array, Object, Promise, Reflect, Uint8Array};
use log::{debug, info};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{
    Document, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, Response,
    WheelEvent, Window,
};

use super::events::{Channel, HostEvent, KeyInput, ListenerTarget, PointerInput, WheelInput};
use super::platform_trait::{
    AssetCallback, ClipboardReadCallback, ClipboardWriteCallback, Listener, PageStructure,
    Platform,
};

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

pub struct BrowserPlatform {
    window: Window,
    document: Document,
    canvas: RefCell<Option<HtmlCanvasElement>>,
}

impl BrowserPlatform {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().context("No global `window` (not running in a browser?)")?;
        let document = window.document().context("Window has no document")?;
        Ok(Self {
            window,
            document,
            canvas: RefCell::new(None),
        })
    }

    fn event_target(&self, target: ListenerTarget) -> Result<EventTarget> {
        match target {
            ListenerTarget::Window => Ok(self.window.clone().into()),
            ListenerTarget::Body => Ok(self
                .document
                .body()
                .context("Document has no body")?
                .into()),
        }
    }

    fn canvas(&self) -> Result<HtmlCanvasElement> {
        self.canvas
            .borrow()
            .clone()
            .context("Page canvas has not been installed")
    }
}

/// Reads the payload the frame cares about out of a DOM event.
fn host_event(channel: Channel, event: &Event) -> Option<HostEvent> {
    match channel {
        Channel::PointerDown | Channel::PointerUp | Channel::PointerMove => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(HostEvent::Pointer(PointerInput {
                x: f64::from(mouse.x()),
                y: f64::from(mouse.y()),
                button: mouse.button(),
                modifiers: mouse_modifiers(mouse),
            }))
        }
        Channel::Wheel => {
            let wheel = event.dyn_ref::<WheelEvent>()?;
            Some(HostEvent::Wheel(WheelInput {
                x: f64::from(wheel.x()),
                y: f64::from(wheel.y()),
                delta_x: wheel.delta_x(),
                delta_y: wheel.delta_y(),
                modifiers: mouse_modifiers(wheel),
            }))
        }
        Channel::KeyPress | Channel::KeyDown => {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            Some(HostEvent::Key(KeyInput {
                key: key.key(),
                key_code: key.key_code(),
                modifiers: Modifiers::from_flags(
                    key.shift_key(),
                    key.ctrl_key(),
                    key.alt_key(),
                    key.meta_key(),
                ),
            }))
        }
        Channel::Resize => Some(HostEvent::Resize),
        Channel::Load => Some(HostEvent::Load),
    }
}

fn mouse_modifiers(mouse: &MouseEvent) -> Modifiers {
    Modifiers::from_flags(
        mouse.shift_key(),
        mouse.ctrl_key(),
        mouse.alt_key(),
        mouse.meta_key(),
    )
}

fn backend_options(assets: &AssetConfig) -> Result<JsValue> {
    let Some(dir) = assets.backend_wasm_dir.clone() else {
        return Ok(JsValue::UNDEFINED);
    };
    let options = Object::new();
    let locate = Closure::<dyn Fn(String) -> String>::new(move |file: String| {
        format!("{}/{}", dir.trim_end_matches('/'), file)
    });
    Reflect::set(&options, &JsValue::from_str("locateFile"), locate.as_ref())
        .map_err(js_error)?;
    locate.forget();
    Ok(options.into())
}

impl Platform for BrowserPlatform {
    type Backend = CanvasKitBackend;

    fn set_title(&self, title: &str) -> Result<()> {
        self.document.set_title(title);
        Ok(())
    }

    fn resize_window(&self, size: Size) -> Result<()> {
        if size.width <= 0.0 || size.height <= 0.0 {
            return Ok(());
        }
        self.window
            .resize_to(size.width as i32, size.height as i32)
            .map_err(js_error)
            .context("window.resizeTo failed")
    }

    fn viewport_size(&self) -> Result<Size> {
        let width = self.window.inner_width().map_err(js_error)?;
        let height = self.window.inner_height().map_err(js_error)?;
        Ok(Size::new(
            width.as_f64().context("window.innerWidth is not a number")?,
            height.as_f64().context("window.innerHeight is not a number")?,
        ))
    }

    fn canvas_size(&self) -> Result<Size> {
        let canvas = self.canvas()?;
        Ok(Size::new(f64::from(canvas.width()), f64::from(canvas.height())))
    }

    fn set_canvas_size(&self, size: Size) -> Result<()> {
        let canvas = self.canvas()?;
        canvas.set_width(size.width as u32);
        canvas.set_height(size.height as u32);
        Ok(())
    }

    fn install_page(&self, page: &PageStructure) -> Result<()> {
        let body = self.document.body().context("Document has no body")?;

        let style = self.document.create_element("style").map_err(js_error)?;
        style.set_inner_html(&page.stylesheet);
        body.append_child(&style).map_err(js_error)?;

        let canvas = self
            .document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| anyhow!("<canvas> is not an HtmlCanvasElement"))?;
        canvas.set_id(&page.canvas_id);
        body.append_child(&canvas).map_err(js_error)?;

        info!("BrowserPlatform: page installed with canvas #{}", page.canvas_id);
        *self.canvas.borrow_mut() = Some(canvas);
        Ok(())
    }

    fn listen(&self, channel: Channel, mut listener: Listener) -> Result<()> {
        let target = self.event_target(channel.target())?;
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(host_event) = host_event(channel, &event) else {
                return;
            };
            if let Err(e) = listener(host_event) {
                wasm_bindgen::throw_str(&format!("{e:#}"));
            }
        });
        target
            .add_event_listener_with_callback(
                channel.event_name(),
                closure.as_ref().unchecked_ref(),
            )
            .map_err(js_error)
            .with_context(|| format!("Failed to listen for {}", channel.event_name()))?;
        closure.forget();
        debug!("BrowserPlatform: listening for {}", channel.event_name());
        Ok(())
    }

    fn dispatch_resize(&self) -> Result<()> {
        let event = Event::new("resize").map_err(js_error)?;
        self.window.dispatch_event(&event).map_err(js_error)?;
        Ok(())
    }

    fn load_assets(&self, assets: &AssetConfig, on_loaded: AssetCallback<CanvasKitBackend>) {
        let backend = match backend_options(assets) {
            Ok(options) => canvas_kit_init(&options),
            Err(e) => {
                on_loaded(Err(e));
                return;
            }
        };

        let fetch = self.window.fetch_with_str(&assets.font_url);
        let font_url = assets.font_url.clone();
        let font = future_to_promise(async move {
            let response: Response = JsFuture::from(fetch).await?.dyn_into()?;
            if !response.ok() {
                return Err(JsValue::from_str(&format!(
                    "GET {} returned HTTP {}",
                    font_url,
                    response.status()
                )));
            }
            JsFuture::from(response.array_buffer()?).await
        });

        let both = Promise::all(&Array::of2(&backend, &font));
        spawn_local(async move {
            let result = JsFuture::from(both).await.map_err(js_error).map(|values| {
                let values: Array = values.unchecked_into();
                LoadedAssets {
                    backend: CanvasKitBackend::from_module(values.get(0)),
                    font_data: Uint8Array::new(&values.get(1)).to_vec(),
                }
            });
            on_loaded(result);
        });
    }

    fn read_clipboard(&self, on_done: ClipboardReadCallback) {
        let promise = self.window.navigator().clipboard().read_text();
        spawn_local(async move {
            let result = JsFuture::from(promise)
                .await
                .map(|text| text.as_string().unwrap_or_default())
                .map_err(js_error);
            on_done(result);
        });
    }

    fn write_clipboard(&self, text: &str, on_done: ClipboardWriteCallback) {
        let promise = self.window.navigator().clipboard().write_text(text);
        spawn_local(async move {
            let result = JsFuture::from(promise).await.map(|_| ()).map_err(js_error);
            on_done(result);
        });
    }
}
