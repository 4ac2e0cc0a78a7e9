// src/frame/tests.rs

use super::{Frame, Lifecycle};
use crate::display::drivers::recording::PaintOp;
use crate::error::FrameError;
use crate::events::{InputCharEvent, InputKeyEvent, MouseButton, MouseEvent};
use crate::geometry::{Point, Rect, Size};
use crate::keys::{KeyCode, Modifiers};
use crate::painter::Painter;
use crate::platform::{Channel, HeadlessPlatform, HostEvent, KeyInput, PointerInput};
use crate::widget::{App, UpdateRequest, Widget};
use anyhow::{bail, Result};
use std::cell::RefCell;
use std::rc::Rc;

const VIEWPORT: Size = Size {
    width: 800.0,
    height: 600.0,
};

fn new_frame() -> Result<(Frame<HeadlessPlatform>, HeadlessPlatform)> {
    let platform = HeadlessPlatform::new(VIEWPORT);
    let frame = Frame::new(platform.clone(), "Castella Test", 640.0, 480.0)?;
    Ok((frame, platform))
}

/// A frame that has run, loaded its assets and painted once. Redraw passes
/// are recorded in the returned vector; the paint log starts empty.
fn ready_frame() -> Result<(Frame<HeadlessPlatform>, HeadlessPlatform, Rc<RefCell<Vec<bool>>>)> {
    let (frame, platform) = new_frame()?;
    let redraws = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&redraws);
    frame.on_redraw(move |_painter, completely| {
        sink.borrow_mut().push(completely);
        Ok(())
    });
    frame.run()?;
    assert!(platform.complete_asset_load(vec![7; 32]));
    platform.backend().log().clear();
    Ok((frame, platform, redraws))
}

fn key(code: u32, text: &str) -> HostEvent {
    HostEvent::Key(KeyInput {
        key: text.to_string(),
        key_code: code,
        modifiers: Modifiers::empty(),
    })
}

struct Label {
    position: Point,
    size: Size,
    fail: bool,
    passes: Vec<(bool, usize)>,
}

impl Label {
    fn at(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
            fail: false,
            passes: Vec::new(),
        }
    }
}

impl Widget for Label {
    fn position(&self) -> Point {
        self.position
    }

    fn size(&self) -> Size {
        self.size
    }

    fn redraw(&mut self, painter: &mut dyn Painter, completely: bool) -> Result<()> {
        self.passes.push((completely, painter.save_count()));
        if self.fail {
            bail!("label exploded");
        }
        Ok(())
    }
}

#[derive(Default)]
struct RootApp {
    passes: Vec<bool>,
}

impl App for RootApp {
    fn redraw(&mut self, _painter: &mut dyn Painter, completely: bool) -> Result<()> {
        self.passes.push(completely);
        Ok(())
    }
}

// --- Construction and bootstrap ---

#[test_log::test]
fn it_should_set_title_and_request_window_size_on_construction() -> Result<()> {
    let (frame, platform) = new_frame()?;
    assert_eq!(platform.title(), "Castella Test");
    assert_eq!(platform.window_size(), Some(Size::new(640.0, 480.0)));
    assert_eq!(frame.status(), Lifecycle::Created);
    assert!(platform.page().is_none());
    Ok(())
}

#[test_log::test]
fn it_should_install_a_full_viewport_canvas_on_run() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.run()?;

    let page = platform.page().expect("page installed");
    assert_eq!(page.canvas_id, "castella-app");
    assert!(page.stylesheet.contains("#castella-app {"));
    assert!(page.stylesheet.contains("margin: 0"));
    assert!(page.stylesheet.contains("overflow: hidden"));
    assert_eq!(platform.asset_request(), Some(frame.config().assets.clone()));
    assert_eq!(frame.status(), Lifecycle::Loading);
    Ok(())
}

#[test_log::test]
fn it_should_refuse_to_run_twice() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.run()?;
    let attached = platform.attached_channels().len();

    let err = frame.run().unwrap_err();
    assert_eq!(err.downcast_ref::<FrameError>(), Some(&FrameError::AlreadyRunning));
    assert_eq!(platform.attached_channels().len(), attached);
    Ok(())
}

#[test_log::test]
fn it_should_fit_the_canvas_to_the_viewport_on_load_and_resize() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.run()?;
    assert_eq!(frame.get_size()?, Size::default());

    platform.finish_page_load();
    assert_eq!(frame.get_size()?, VIEWPORT);

    platform.resize_viewport(Size::new(300.0, 200.0));
    assert_eq!(frame.get_size()?, Size::new(300.0, 200.0));
    Ok(())
}

// --- Wiring ---

#[test_log::test]
fn it_should_attach_listeners_in_fixed_order() -> Result<()> {
    let (frame, platform) = new_frame()?;
    // Registration order must not matter.
    frame.on_redraw(|_, _| Ok(()));
    frame.on_input_key(|_| {});
    frame.on_input_char(|_| {});
    frame.on_cursor_pos(|_| {});
    frame.on_mouse_wheel(|_| {});
    frame.on_mouse_up(|_| {});
    frame.on_mouse_down(|_| {});
    frame.run()?;

    assert_eq!(
        platform.attached_channels(),
        vec![
            Channel::Resize,
            Channel::Load,
            Channel::PointerDown,
            Channel::PointerUp,
            Channel::Wheel,
            Channel::PointerMove,
            Channel::KeyPress,
            Channel::KeyDown,
            Channel::Resize,
        ]
    );
    Ok(())
}

#[test_log::test]
fn it_should_skip_input_channels_without_a_handler() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.on_input_key(|_| {});
    frame.on_mouse_down(|_| {});
    frame.run()?;

    // The surface-rebuilding resize listener attaches even without on_redraw.
    assert_eq!(
        platform.attached_channels(),
        vec![
            Channel::Resize,
            Channel::Load,
            Channel::PointerDown,
            Channel::KeyDown,
            Channel::Resize,
        ]
    );
    Ok(())
}

#[test_log::test]
fn it_should_not_attach_before_run() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.on_mouse_down(|_| {});
    assert!(platform.attached_channels().is_empty());
    Ok(())
}

#[test_log::test]
fn it_should_keep_only_the_latest_registration() -> Result<()> {
    let (frame, platform) = new_frame()?;
    let calls = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&calls);
    frame.on_mouse_down(move |_| first.borrow_mut().push("first"));
    let second = Rc::clone(&calls);
    frame.on_mouse_down(move |_| second.borrow_mut().push("second"));
    frame.run()?;

    let press = HostEvent::Pointer(PointerInput {
        x: 1.0,
        y: 1.0,
        button: 0,
        modifiers: Modifiers::empty(),
    });
    assert_eq!(platform.fire(Channel::PointerDown, press), 1);
    assert_eq!(*calls.borrow(), vec!["second"]);
    Ok(())
}

#[test_log::test]
fn it_should_forward_normalized_input_to_handlers() -> Result<()> {
    let (frame, platform) = new_frame()?;
    let moves: Rc<RefCell<Vec<MouseEvent>>> = Rc::default();
    let chars: Rc<RefCell<Vec<InputCharEvent>>> = Rc::default();
    let keys: Rc<RefCell<Vec<InputKeyEvent>>> = Rc::default();

    let sink = Rc::clone(&moves);
    frame.on_cursor_pos(move |event| sink.borrow_mut().push(event));
    let sink = Rc::clone(&chars);
    frame.on_input_char(move |event| sink.borrow_mut().push(event));
    let sink = Rc::clone(&keys);
    frame.on_input_key(move |event| sink.borrow_mut().push(event));
    frame.run()?;

    platform.fire(
        Channel::PointerMove,
        HostEvent::Pointer(PointerInput {
            x: 42.0,
            y: 17.5,
            button: 0,
            modifiers: Modifiers::ALT,
        }),
    );
    platform.fire(Channel::KeyPress, key(120, "x"));
    platform.fire(Channel::KeyDown, key(46, "Delete"));
    platform.fire(Channel::KeyDown, key(13, "Enter"));

    assert_eq!(
        *moves.borrow(),
        vec![MouseEvent {
            pos: Point::new(42.0, 17.5),
            button: MouseButton::Primary,
            modifiers: Modifiers::ALT,
        }]
    );
    assert_eq!(chars.borrow()[0].text, "x");
    let keys = keys.borrow();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].key, KeyCode::Delete);
    assert_eq!(keys[1].key, KeyCode::Unknown);
    assert!(platform.errors().is_empty());
    Ok(())
}

// --- Resize and first paint ---

#[test_log::test]
fn it_should_not_render_before_assets_load() -> Result<()> {
    let (frame, platform) = new_frame()?;
    let redraws = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&redraws);
    frame.on_redraw(move |_, _| {
        *sink.borrow_mut() += 1;
        Ok(())
    });
    frame.run()?;

    platform.finish_page_load();
    platform.resize_viewport(Size::new(1000.0, 700.0));
    assert_eq!(*redraws.borrow(), 0);
    assert!(platform.backend().surfaces().is_empty());
    assert!(frame.get_painter().is_none());

    assert!(platform.complete_asset_load(vec![1; 8]));
    assert_eq!(*redraws.borrow(), 1);
    assert_eq!(platform.backend().surfaces().len(), 1);
    assert_eq!(frame.status(), Lifecycle::Ready);
    assert!(frame.get_painter().is_some());
    Ok(())
}

#[test_log::test]
fn it_should_build_one_surface_per_resize_and_redraw_completely() -> Result<()> {
    let (frame, platform, redraws) = ready_frame()?;
    assert_eq!(*redraws.borrow(), vec![true]);
    assert_eq!(platform.backend().surfaces().len(), 1);

    platform.resize_viewport(Size::new(1024.0, 768.0));

    assert_eq!(platform.backend().surfaces().len(), 2);
    assert_eq!(*redraws.borrow(), vec![true, true]);
    assert_eq!(frame.get_size()?, Size::new(1024.0, 768.0));
    Ok(())
}

#[test_log::test]
fn it_should_build_surfaces_without_a_redraw_handler() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.on_mouse_down(|_| {});
    frame.run()?;

    assert!(platform.complete_asset_load(vec![1; 8]));
    assert_eq!(frame.status(), Lifecycle::Ready);
    assert_eq!(platform.backend().surfaces().len(), 1);
    assert!(frame.get_painter().is_some());

    let mut app = RootApp::default();
    frame.post_update(UpdateRequest::app(&mut app, true))?;
    assert_eq!(app.passes, vec![true]);
    assert!(platform
        .backend()
        .log()
        .ops()
        .contains(&PaintOp::Flush { surface: 1 }));

    platform.resize_viewport(Size::new(500.0, 400.0));
    assert_eq!(platform.backend().surfaces().len(), 2);

    frame.post_update(UpdateRequest::app(&mut app, false))?;
    assert_eq!(app.passes, vec![true, false]);
    assert!(platform
        .backend()
        .log()
        .ops()
        .contains(&PaintOp::Flush { surface: 2 }));
    assert!(platform.errors().is_empty());
    Ok(())
}

#[test_log::test]
fn it_should_propagate_redraw_handler_errors_out_of_the_listener() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.on_redraw(|_, _| bail!("core exploded"));
    frame.run()?;
    platform.complete_asset_load(vec![1; 8]);

    assert_eq!(platform.errors(), vec!["core exploded".to_string()]);
    // A redraw failure is a core bug, not a surface failure.
    assert_eq!(frame.status(), Lifecycle::Ready);
    Ok(())
}

// --- Failures ---

#[test_log::test]
fn it_should_fail_when_the_asset_load_fails() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.on_redraw(|_, _| Ok(()));
    frame.run()?;

    assert!(platform.fail_asset_load("font 404"));

    match frame.status() {
        Lifecycle::Failed(reason) => assert!(reason.contains("font 404"), "{reason}"),
        other => panic!("expected Failed, got {other:?}"),
    }
    platform.resize_viewport(Size::new(500.0, 500.0));
    assert!(platform.backend().surfaces().is_empty());
    assert!(frame.get_painter().is_none());
    Ok(())
}

#[test_log::test]
fn it_should_fail_when_the_font_cannot_be_installed() -> Result<()> {
    let (frame, platform) = new_frame()?;
    frame.run()?;
    platform.complete_asset_load(Vec::new());
    assert!(frame.status().is_failed());
    Ok(())
}

#[test_log::test]
fn it_should_fail_fatally_when_a_surface_cannot_be_created() -> Result<()> {
    let (frame, platform, redraws) = ready_frame()?;

    platform.backend().fail_next_surface();
    platform.resize_viewport(Size::new(900.0, 900.0));

    assert!(frame.status().is_failed());
    assert!(frame.get_painter().is_none());
    assert_eq!(platform.errors().len(), 1);
    assert!(platform.errors()[0].contains("failed to create drawing surface"));

    // Terminal: later resizes and updates do nothing.
    platform.resize_viewport(Size::new(400.0, 400.0));
    assert_eq!(platform.backend().surfaces().len(), 1);
    assert_eq!(*redraws.borrow(), vec![true]);

    let mut app = RootApp::default();
    frame.post_update(UpdateRequest::app(&mut app, true))?;
    assert!(app.passes.is_empty());
    assert!(platform.backend().log().is_empty());
    Ok(())
}

// --- Render dispatch ---

#[test_log::test]
fn it_should_ignore_updates_without_a_target() -> Result<()> {
    let (frame, platform, _) = ready_frame()?;
    frame.post_update(UpdateRequest::empty())?;
    assert!(platform.backend().log().is_empty());
    Ok(())
}

#[test_log::test]
fn it_should_ignore_updates_before_the_first_surface() -> Result<()> {
    let (frame, platform) = new_frame()?;
    let mut label = Label::at(0.0, 0.0, 10.0, 10.0);

    frame.post_update(UpdateRequest::widget(&mut label, true))?;

    assert!(label.passes.is_empty());
    assert!(platform.backend().log().is_empty());
    Ok(())
}

#[test_log::test]
fn it_should_paint_the_app_from_the_origin_without_a_clip() -> Result<()> {
    let (frame, platform, _) = ready_frame()?;
    let mut app = RootApp::default();

    frame.post_update(UpdateRequest::app(&mut app, false))?;

    assert_eq!(app.passes, vec![false]);
    assert_eq!(
        platform.backend().log().ops(),
        vec![
            PaintOp::Save,
            PaintOp::Translate(Point::ORIGIN),
            PaintOp::Flush { surface: 1 },
            PaintOp::Restore,
        ]
    );
    Ok(())
}

#[test_log::test]
fn it_should_translate_and_clip_to_the_widget() -> Result<()> {
    let (frame, platform, _) = ready_frame()?;
    let mut label = Label::at(10.0, 20.0, 100.0, 50.0);

    frame.post_update(UpdateRequest::widget(&mut label, true))?;

    assert_eq!(label.passes, vec![(true, 1)]);
    assert_eq!(
        platform.backend().log().ops(),
        vec![
            PaintOp::Save,
            PaintOp::Translate(Point::new(10.0, 20.0)),
            PaintOp::Clip(Rect::from_size(Size::new(100.0, 50.0))),
            PaintOp::Flush { surface: 1 },
            PaintOp::Restore,
        ]
    );
    Ok(())
}

#[test_log::test]
fn it_should_restore_and_propagate_when_a_widget_fails() -> Result<()> {
    let (frame, platform, _) = ready_frame()?;
    let mut label = Label::at(5.0, 5.0, 20.0, 20.0);
    label.fail = true;

    let err = frame
        .post_update(UpdateRequest::widget(&mut label, true))
        .unwrap_err();

    assert_eq!(err.to_string(), "label exploded");
    let ops = platform.backend().log().ops();
    assert_eq!(ops.first(), Some(&PaintOp::Save));
    assert_eq!(ops.last(), Some(&PaintOp::Restore));
    assert!(!ops.iter().any(|op| matches!(op, PaintOp::Flush { .. })));

    let painter = frame.get_painter().expect("painter survives a failed pass");
    assert_eq!(painter.save_count(), 0);
    Ok(())
}

#[test_log::test]
fn it_should_paint_through_the_newest_surface_after_a_resize() -> Result<()> {
    let (frame, platform, _) = ready_frame()?;
    platform.resize_viewport(Size::new(1280.0, 720.0));
    platform.backend().log().clear();

    let mut app = RootApp::default();
    frame.post_update(UpdateRequest::app(&mut app, true))?;

    assert!(platform
        .backend()
        .log()
        .ops()
        .contains(&PaintOp::Flush { surface: 2 }));
    Ok(())
}

struct NestingApp {
    frame: Frame<HeadlessPlatform>,
    nested: Option<anyhow::Error>,
}

impl App for NestingApp {
    fn redraw(&mut self, _painter: &mut dyn Painter, _completely: bool) -> Result<()> {
        let mut inner = Label::at(0.0, 0.0, 1.0, 1.0);
        self.nested = self
            .frame
            .post_update(UpdateRequest::widget(&mut inner, false))
            .err();
        Ok(())
    }
}

#[test_log::test]
fn it_should_reject_updates_posted_during_a_paint_pass() -> Result<()> {
    let (frame, _platform, _) = ready_frame()?;
    let mut app = NestingApp {
        frame: frame.clone(),
        nested: None,
    };

    frame.post_update(UpdateRequest::app(&mut app, true))?;

    let nested = app.nested.expect("nested update was rejected");
    assert_eq!(
        nested.downcast_ref::<FrameError>(),
        Some(&FrameError::ReentrantUpdate)
    );
    Ok(())
}

#[test_log::test]
fn it_should_hide_the_painter_during_a_resize_redraw() -> Result<()> {
    let (frame, platform) = new_frame()?;
    let observed = Rc::new(RefCell::new(Vec::new()));
    let inner = frame.clone();
    let sink = Rc::clone(&observed);
    frame.on_redraw(move |_, _| {
        let mut label = Label::at(0.0, 0.0, 1.0, 1.0);
        let nested = inner.post_update(UpdateRequest::widget(&mut label, true));
        sink.borrow_mut().push((
            inner.get_painter().is_none(),
            nested
                .err()
                .and_then(|e| e.downcast_ref::<FrameError>().cloned()),
        ));
        Ok(())
    });
    frame.run()?;
    platform.complete_asset_load(vec![1; 8]);

    assert_eq!(
        *observed.borrow(),
        vec![(true, Some(FrameError::ReentrantUpdate))]
    );
    Ok(())
}

#[test_log::test]
fn it_should_treat_flush_and_clear_as_no_ops() -> Result<()> {
    let (frame, platform, _) = ready_frame()?;
    frame.flush();
    frame.clear();
    assert!(platform.backend().log().is_empty());
    Ok(())
}
