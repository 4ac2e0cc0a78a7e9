// src/display/drivers/canvaskit.rs
//! CanvasKit (Skia compiled to WebAssembly) drawing backend.
//!
//! Only the slice of the CanvasKit API the frame needs is bound here:
//! surface creation, font loading, and the canvas state stack.

use crate::config::{ColorSpace, SurfaceOptions};
use crate::display::driver::DrawingBackend;
use crate::geometry::{Point, Rect, Size};
use crate::painter::Painter;
use anyhow::{anyhow, Context, Result};
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// Global loader installed by `canvaskit.js`.
    #[wasm_bindgen(js_name = CanvasKitInit)]
    pub fn canvas_kit_init(options: &JsValue) -> js_sys::Promise;

    #[derive(Debug, Clone)]
    pub type CanvasKit;

    #[wasm_bindgen(method, js_name = MakeWebGLCanvasSurface)]
    fn make_webgl_canvas_surface(
        this: &CanvasKit,
        canvas_id: &str,
        color_space: &JsValue,
        options: &JsValue,
    ) -> Option<CkSurface>;

    #[wasm_bindgen(method, js_name = XYWHRect)]
    fn xywh_rect(this: &CanvasKit, x: f32, y: f32, width: f32, height: f32) -> JsValue;

    #[derive(Debug, Clone)]
    pub type CkFontMgr;

    #[derive(Debug, Clone)]
    pub type CkTypeface;

    #[derive(Debug, Clone)]
    pub type CkSurface;

    #[wasm_bindgen(method, js_name = getCanvas)]
    fn get_canvas(this: &CkSurface) -> CkCanvas;

    #[wasm_bindgen(method)]
    fn flush(this: &CkSurface);

    #[wasm_bindgen(method)]
    fn delete(this: &CkSurface);

    #[derive(Debug, Clone)]
    type CkCanvas;

    #[wasm_bindgen(method)]
    fn save(this: &CkCanvas) -> i32;

    #[wasm_bindgen(method)]
    fn restore(this: &CkCanvas);

    #[wasm_bindgen(method)]
    fn translate(this: &CkCanvas, dx: f32, dy: f32);

    #[wasm_bindgen(method, js_name = clipRect)]
    fn clip_rect(this: &CkCanvas, rect: &JsValue, op: &JsValue, anti_alias: bool);

    #[wasm_bindgen(method, js_name = getSaveCount)]
    fn get_save_count(this: &CkCanvas) -> i32;
}

/// Reads `CanvasKit.<namespace>.<name>`.
fn constant(ck: &CanvasKit, namespace: &str, name: &str) -> Result<JsValue> {
    let ns = Reflect::get(ck, &JsValue::from_str(namespace))
        .map_err(|e| anyhow!("CanvasKit.{namespace} missing: {e:?}"))?;
    Reflect::get(&ns, &JsValue::from_str(name))
        .map_err(|e| anyhow!("CanvasKit.{namespace}.{name} missing: {e:?}"))
}

/// Calls `CanvasKit.<namespace>.<factory>(arg)`.
fn call_factory(ck: &CanvasKit, namespace: &str, factory: &str, arg: &JsValue) -> Result<JsValue> {
    let ns = Reflect::get(ck, &JsValue::from_str(namespace))
        .map_err(|e| anyhow!("CanvasKit.{namespace} missing: {e:?}"))?;
    let function = Reflect::get(&ns, &JsValue::from_str(factory))
        .map_err(|e| anyhow!("CanvasKit.{namespace}.{factory} missing: {e:?}"))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| anyhow!("CanvasKit.{namespace}.{factory} is not a function"))?;
    let value = function
        .call1(&ns, arg)
        .map_err(|e| anyhow!("CanvasKit.{namespace}.{factory} threw: {e:?}"))?;
    if value.is_null() || value.is_undefined() {
        return Err(anyhow!("CanvasKit.{namespace}.{factory} returned null"));
    }
    Ok(value)
}

fn font_buffer(data: &[u8]) -> JsValue {
    Uint8Array::from(data).buffer().into()
}

/// The loaded CanvasKit module.
#[derive(Debug, Clone)]
pub struct CanvasKitBackend {
    ck: CanvasKit,
}

impl CanvasKitBackend {
    pub fn from_module(module: JsValue) -> Self {
        Self {
            ck: module.unchecked_into(),
        }
    }
}

impl DrawingBackend for CanvasKitBackend {
    type Surface = CkSurface;
    type FontManager = CkFontMgr;
    type Typeface = CkTypeface;

    fn font_manager_from_data(&self, data: &[u8]) -> Result<CkFontMgr> {
        let buffers = Array::of1(&font_buffer(data));
        call_factory(&self.ck, "FontMgr", "FromData", &buffers)
            .map(|value| value.unchecked_into::<CkFontMgr>())
            .context("Failed to create CanvasKit font manager")
    }

    fn typeface_from_data(&self, data: &[u8]) -> Result<CkTypeface> {
        call_factory(&self.ck, "Typeface", "MakeFreeTypeFaceFromData", &font_buffer(data))
            .map(|value| value.unchecked_into::<CkTypeface>())
            .context("Failed to create CanvasKit typeface")
    }

    fn make_surface(
        &self,
        canvas_id: &str,
        color_space: ColorSpace,
        options: &SurfaceOptions,
    ) -> Result<CkSurface> {
        let color_space = constant(&self.ck, "ColorSpace", color_space.backend_name())?;
        let js_options = Object::new();
        for (name, value) in options.to_js_options() {
            let value = value.as_f64().unwrap_or(1.0);
            Reflect::set(&js_options, &JsValue::from_str(&name), &JsValue::from_f64(value))
                .map_err(|e| anyhow!("Failed to set surface option {name}: {e:?}"))?;
        }
        self.ck
            .make_webgl_canvas_surface(canvas_id, &color_space, &js_options)
            .ok_or_else(|| anyhow!("MakeWebGLCanvasSurface returned null for #{canvas_id}"))
    }

    fn make_painter(
        &self,
        surface: CkSurface,
        font_manager: &CkFontMgr,
        typeface: &CkTypeface,
        size: Size,
    ) -> Result<Box<dyn Painter>> {
        let intersect = match constant(&self.ck, "ClipOp", "Intersect") {
            Ok(op) => op,
            Err(e) => {
                surface.delete();
                return Err(e);
            }
        };
        let canvas = surface.get_canvas();
        Ok(Box::new(CanvasKitPainter {
            ck: self.ck.clone(),
            surface,
            canvas,
            intersect,
            font_manager: font_manager.clone(),
            typeface: typeface.clone(),
            size,
        }))
    }
}

/// Painter over a CanvasKit surface's canvas.
pub struct CanvasKitPainter {
    ck: CanvasKit,
    surface: CkSurface,
    canvas: CkCanvas,
    /// `CanvasKit.ClipOp.Intersect`, resolved when the painter is built.
    intersect: JsValue,
    font_manager: CkFontMgr,
    typeface: CkTypeface,
    size: Size,
}

impl CanvasKitPainter {
    pub fn font_manager(&self) -> &CkFontMgr {
        &self.font_manager
    }

    pub fn typeface(&self) -> &CkTypeface {
        &self.typeface
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

impl Painter for CanvasKitPainter {
    fn save(&mut self) {
        self.canvas.save();
    }

    fn restore(&mut self) {
        self.canvas.restore();
    }

    fn translate(&mut self, offset: Point) {
        self.canvas.translate(offset.x as f32, offset.y as f32);
    }

    fn clip(&mut self, rect: Rect) {
        let bounds = self.ck.xywh_rect(
            rect.origin.x as f32,
            rect.origin.y as f32,
            rect.size.width as f32,
            rect.size.height as f32,
        );
        self.canvas.clip_rect(&bounds, &self.intersect, true);
    }

    fn flush(&mut self) -> Result<()> {
        self.surface.flush();
        Ok(())
    }

    fn save_count(&self) -> usize {
        // CanvasKit starts at 1 for the implicit base layer.
        self.canvas.get_save_count().saturating_sub(1) as usize
    }
}

impl Drop for CanvasKitPainter {
    fn drop(&mut self) {
        self.surface.delete();
    }
}
