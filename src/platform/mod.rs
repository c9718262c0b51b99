//=========================================================================
// Platform Subsystem
//
// Hosts a `GridController` in a winit window.
//
// Architecture:
// ```text
//  Main Thread (UI):                                Decode Thread:
//  ┌────────────────────────────────────────┐      ┌───────────────┐
//  │  Winit Event Loop                      │      │               │
//  │   ↓                                    │      │               │
//  │  PointerTracker                        │      │               │
//  │   ├─ cursor → logical position         │      │               │
//  │   ├─ press/release → DropSession       │      │               │
//  │   └─ DroppedFile × n → pending paths   │      │               │
//  │   ↓                                    │      │               │
//  │  about_to_wait (frame boundary):       │      │               │
//  │   ├─ pending paths → one session ──────┼─────>│ DecodeWorker  │
//  │   └─ process_decoded() <───────────────┼──────┤  decode+slice │
//  │   ↓                                    │      └───────────────┘
//  │  WindowGridView (Weak from controller) │
//  │   └─ dirty → title + redraw            │
//  │   ↓                                    │
//  │  RedrawRequested → renderer → surface  │
//  └────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **about_to_wait = frame boundary**: file drops collected during the
//   event batch become one drop session there, and finished decodes are
//   applied there, on the UI thread, never from the worker
// - **View owned by the platform**: the controller holds only a `Weak`;
//   suspending or closing the window drops the view and later updates
//   become no-ops
// - **Software presentation**: cells are painted into a softbuffer
//   surface only when the view reports a change or the window resizes
// - **Main thread requirement**: winit mandates the main thread on
//   macOS/iOS, so this runs on the thread that called `Puzzle::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod pointer;
mod renderer;
mod window_view;

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::*;
use softbuffer::{Context, SoftBufferError, Surface};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    error::EventLoopError,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::decode::ExternalPayload;
use crate::core::grid::drag::DropSession;
use crate::core::grid::layout::ViewSize;
use crate::core::grid::view::GridView;
use crate::core::grid::{DropOutcome, GridController};
use pointer::{ButtonAction, PointerTracker};
use renderer::FrameTarget;
use window_view::WindowGridView;

//=== Constants ===========================================================

/// How often finished decodes are polled while the window is idle.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

//=== PlatformError =======================================================

/// Window and event loop failures.
///
/// These are fatal: without an event loop there is nothing to host the
/// grid in.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create the event loop (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    /// Event loop terminated with an error.
    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),
}

//=== WindowSettings ======================================================

/// Window title and initial logical size.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub size: LogicalSize<u32>,
}

//=== Graphics ============================================================

/// Softbuffer context and surface bound to one window.
struct Graphics {
    _context: Context<Rc<Window>>,
    surface: Surface<Rc<Window>, Rc<Window>>,
}

impl Graphics {
    fn new(window: &Rc<Window>) -> Result<Self, SoftBufferError> {
        let context = Context::new(window.clone())?;
        let surface = Surface::new(&context, window.clone())?;
        Ok(Self {
            _context: context,
            surface,
        })
    }
}

//=== Platform ============================================================

/// Window host and gesture source for one grid controller.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(controller, settings)`
/// 2. **Execution**: `platform.run()` starts the event loop
/// 3. **Resume**: window, surface and view are created, view attached
/// 4. **Shutdown**: close request drops the view and exits the loop
///
/// # Thread Safety
///
/// Not Send: the controller's view handle is an `Rc`/`Weak` pair and the
/// whole type stays on the UI thread.
pub(crate) struct Platform {
    /// OS window (None until `resumed()`).
    window: Option<Rc<Window>>,

    /// Presentation surface; None if softbuffer could not bind the window.
    graphics: Option<Graphics>,

    /// Strong owner of the grid view; the controller only holds a `Weak`.
    view: Option<Rc<RefCell<WindowGridView>>>,

    controller: GridController,
    pointer: PointerTracker,
    settings: WindowSettings,

    /// Current drawable size in logical units.
    view_size: ViewSize,
    scale_factor: f64,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(controller: GridController, settings: WindowSettings) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        let view_size = ViewSize::new(settings.size.width as f64, settings.size.height as f64);

        Self {
            window: None,
            graphics: None,
            view: None,
            controller,
            pointer: PointerTracker::new(),
            settings,
            view_size,
            scale_factor: 1.0,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// ends with an error.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS winit requirement).
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- View Lifecycle ---------------------------------------------------

    fn attach_view(&mut self) {
        let view = Rc::new(RefCell::new(WindowGridView::new()));
        let handle: Rc<RefCell<dyn GridView>> = view.clone();
        self.controller.attach_view(&handle);
        self.view = Some(view);
    }

    fn detach_view(&mut self) {
        if self.view.take().is_some() {
            debug!(target: "platform", "Grid view released");
        }
        self.pointer.cancel();
    }

    fn set_view_size(&mut self, size: PhysicalSize<u32>) {
        let logical = size.to_logical::<f64>(self.scale_factor);
        self.view_size = ViewSize::new(logical.width, logical.height);
        trace!(
            target: "platform",
            "View size {}x{} (cell side {})",
            logical.width,
            logical.height,
            self.controller.cell_size(self.view_size)
        );
    }

    //--- Gesture Handling -------------------------------------------------

    /// Cell under the cursor, if any.
    fn destination(&self) -> Option<usize> {
        let (x, y) = self.pointer.position()?;
        self.controller.index_at(x, y, self.view_size)
    }

    /// Destination for OS file drops.
    ///
    /// Most platforms send no cursor moves during an OS drag, so the cursor
    /// cell is often unknown; a replacement does not depend on the cell, so
    /// the first one stands in.
    fn file_destination(&self) -> Option<usize> {
        self.destination()
            .or_else(|| (self.controller.cell_count() > 0).then_some(0))
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        self.pointer.moved(position, self.scale_factor);

        if let Some(session) = self.pointer.session() {
            let proposal = self.controller.drop_proposal(session, self.destination());
            trace!(target: "platform::pointer", "Hover: {:?}", proposal);
        }
    }

    fn handle_button(&mut self, action: ButtonAction) -> Option<DropOutcome> {
        match action {
            ButtonAction::Press => {
                let index = self.destination()?;
                let items = self.controller.items_for_drag(index);
                if !items.is_empty() {
                    self.pointer.begin(DropSession::local(items));
                }
                None
            }
            ButtonAction::Release => {
                let session = self.pointer.take_session()?;
                let outcome = self.controller.perform_drop(&session, self.destination());
                debug!(target: "platform", "Drop: {:?}", outcome);
                Some(outcome)
            }
        }
    }

    fn handle_file_hover(&mut self, path: PathBuf) {
        trace!(target: "platform::pointer", "File hover {}", path.display());
        self.pointer.hover_file(path);

        let payloads = self
            .pointer
            .hovered_files()
            .iter()
            .cloned()
            .map(ExternalPayload::File)
            .collect();
        let session = DropSession::external_many(payloads);
        let proposal = self.controller.drop_proposal(&session, self.file_destination());
        trace!(target: "platform::pointer", "File hover: {:?}", proposal);
    }

    /// Records one dropped file; the drop is performed at the frame boundary.
    fn handle_file_drop(&mut self, path: PathBuf) {
        info!(target: "platform", "File dropped: {}", path.display());
        self.pointer.drop_file(path);
    }

    /// Turns every file dropped during this event batch into one session.
    fn flush_file_drops(&mut self) -> Option<DropOutcome> {
        if !self.pointer.has_dropped_files() {
            return None;
        }

        let payloads: Vec<ExternalPayload> = self
            .pointer
            .take_dropped_files()
            .into_iter()
            .map(ExternalPayload::File)
            .collect();

        let session = DropSession::external_many(payloads);
        let outcome = self.controller.perform_drop(&session, self.file_destination());
        debug!(target: "platform", "File drop: {:?}", outcome);
        Some(outcome)
    }

    //--- Frame ------------------------------------------------------------

    /// Applies finished decodes. A drag lifted from the old tile set is
    /// cancelled.
    fn frame(&mut self) -> Option<u64> {
        let generation = self.controller.process_decoded()?;
        info!(target: "platform", "Puzzle image replaced (decode #{})", generation);

        if self.pointer.is_dragging() {
            debug!(target: "platform::pointer", "Drag cancelled by image replacement");
            self.pointer.cancel();
        }

        Some(generation)
    }

    /// Pushes view changes to the window (title and redraw).
    fn refresh_window(&mut self) {
        let Some(view) = &self.view else {
            return;
        };

        let mut view = view.borrow_mut();
        if !view.take_dirty() {
            return;
        }

        trace!(
            target: "platform",
            "View refresh ({} moves, {} reloads)",
            view.moves(),
            view.reloads()
        );

        if let Some(window) = &self.window {
            window.set_title(&format!("{} ({} moves)", self.settings.title, view.moves()));
            window.request_redraw();
        }
    }

    /// Paints the grid into the window surface.
    fn redraw(&mut self) {
        let (Some(window), Some(graphics)) = (&self.window, self.graphics.as_mut()) else {
            return;
        };

        let size = window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };

        if let Err(e) = graphics.surface.resize(width, height) {
            warn!(target: "platform", "Surface resize failed: {}", e);
            return;
        }

        let mut buffer = match graphics.surface.buffer_mut() {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!(target: "platform", "Surface buffer unavailable: {}", e);
                return;
            }
        };

        let mut target = FrameTarget {
            pixels: &mut *buffer,
            width: width.get(),
            height: height.get(),
        };
        renderer::paint(&self.controller, self.view_size, self.scale_factor, &mut target);

        if let Err(e) = buffer.present() {
            warn!(target: "platform", "Present failed: {}", e);
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window, surface and view on startup or mobile resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(self.settings.size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                let window = Rc::new(window);

                self.graphics = match Graphics::new(&window) {
                    Ok(graphics) => Some(graphics),
                    Err(e) => {
                        error!(target: "platform", "Surface creation failed, grid not drawn: {}", e);
                        None
                    }
                };

                self.scale_factor = window.scale_factor();
                self.set_view_size(window.inner_size());
                window.request_redraw();
                self.window = Some(window);
                self.attach_view();
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Drops the window, surface and view; the controller keeps its tiles.
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        info!(target: "platform", "Suspended, releasing window");
        self.detach_view();
        self.graphics = None;
        self.window = None;
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.detach_view();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.set_view_size(size);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.set_view_size(size);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(position);
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer.left();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(action) = ButtonAction::from_winit(button, state) {
                    self.handle_button(action);
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state == ElementState::Pressed
                    && key_event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.pointer.cancel();
                }
            }

            WindowEvent::HoveredFile(path) => {
                self.handle_file_hover(path);
            }

            WindowEvent::HoveredFileCancelled => {
                self.pointer.cancel_hover();
            }

            WindowEvent::DroppedFile(path) => {
                self.handle_file_drop(path);
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            _ => {}
        }
    }

    /// Frame boundary: flush file drops, apply decodes, refresh the window.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.flush_file_drops();
        self.frame();
        self.refresh_window();

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
