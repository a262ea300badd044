//! Recording window backend shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use switcher::{
    FocusProbe, Navigator, Position, ScreenRect, Signal, Size, SwitcherConfig, WindowBackend,
    WindowConfig, WindowControl, WindowModality, WindowStyle,
};

/// One call the navigator made on a window.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Size(f64, f64),
    Position(f64, f64),
    Maximized(bool),
    Title(String),
    Style(WindowStyle),
    Modality(WindowModality),
    Content(String),
    Show,
    Hide,
    ToFront,
    RequestFocus,
}

/// Which focus capability a mock window offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSupport {
    Signal,
    Probe,
    Nothing,
}

/// Shared view into a mock window, kept by the test after the window moves
/// into the navigator.
#[derive(Clone)]
pub struct WindowSpy {
    calls: Arc<Mutex<Vec<Call>>>,
    visible: Arc<AtomicBool>,
    focused: Arc<AtomicBool>,
    focus_signal: Arc<Signal<bool>>,
    created_with: Option<WindowConfig>,
}

impl WindowSpy {
    fn new(created_with: Option<WindowConfig>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            visible: Arc::new(AtomicBool::new(false)),
            focused: Arc::new(AtomicBool::new(false)),
            focus_signal: Arc::new(Signal::new()),
            created_with,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn last_position(&self) -> Option<(f64, f64)> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            Call::Position(x, y) => Some((*x, *y)),
            _ => None,
        })
    }

    pub fn last_size(&self) -> Option<(f64, f64)> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            Call::Size(w, h) => Some((*w, *h)),
            _ => None,
        })
    }

    pub fn last_content(&self) -> Option<String> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            Call::Content(c) => Some(c.clone()),
            _ => None,
        })
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.lock().iter().filter(|call| *call == wanted).count()
    }

    pub fn created_with(&self) -> Option<&WindowConfig> {
        self.created_with.as_ref()
    }

    pub fn focus_listeners(&self) -> usize {
        self.focus_signal.connection_count()
    }

    /// True if both spies observe the same window.
    pub fn same_window(&self, other: &WindowSpy) -> bool {
        Arc::ptr_eq(&self.calls, &other.calls)
    }

    /// Simulate the user clicking elsewhere.
    pub fn lose_focus(&self) {
        self.focused.store(false, Ordering::SeqCst);
        self.focus_signal.emit(false);
    }
}

pub struct MockWindow {
    spy: WindowSpy,
    size: Size,
    support: FocusSupport,
}

impl MockWindow {
    /// A caller-owned window and the spy observing it.
    pub fn new(support: FocusSupport) -> (Self, WindowSpy) {
        Self::build(support, None)
    }

    fn build(support: FocusSupport, config: Option<WindowConfig>) -> (Self, WindowSpy) {
        let spy = WindowSpy::new(config);
        let window = Self {
            spy: spy.clone(),
            size: Size::new(640.0, 480.0),
            support,
        };
        (window, spy)
    }

    pub fn spy(&self) -> &WindowSpy {
        &self.spy
    }

    fn record(&self, call: Call) {
        self.spy.calls.lock().push(call);
    }
}

impl WindowControl for MockWindow {
    type Content = String;

    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.record(Call::Size(size.width, size.height));
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_position(&mut self, position: Position) {
        self.record(Call::Position(position.x, position.y));
    }

    fn set_maximized(&mut self, maximized: bool) {
        self.record(Call::Maximized(maximized));
    }

    fn set_title(&mut self, title: &str) {
        self.record(Call::Title(title.to_string()));
    }

    fn set_style(&mut self, style: WindowStyle) {
        self.record(Call::Style(style));
    }

    fn set_modality(&mut self, modality: WindowModality) {
        self.record(Call::Modality(modality));
    }

    fn set_content(&mut self, content: &String) {
        self.record(Call::Content(content.clone()));
    }

    fn show(&mut self) {
        self.spy.visible.store(true, Ordering::SeqCst);
        self.record(Call::Show);
    }

    fn hide(&mut self) {
        self.spy.visible.store(false, Ordering::SeqCst);
        self.record(Call::Hide);
    }

    fn to_front(&mut self) {
        self.record(Call::ToFront);
    }

    fn request_focus(&mut self) {
        self.spy.focused.store(true, Ordering::SeqCst);
        self.record(Call::RequestFocus);
    }

    fn is_focused(&self) -> bool {
        self.spy.focused.load(Ordering::SeqCst)
    }

    fn focus_signal(&self) -> Option<&Signal<bool>> {
        match self.support {
            FocusSupport::Signal => Some(&self.spy.focus_signal),
            _ => None,
        }
    }

    fn focus_probe(&self) -> Option<FocusProbe> {
        match self.support {
            FocusSupport::Probe => {
                let focused = Arc::clone(&self.spy.focused);
                Some(Arc::new(move || focused.load(Ordering::SeqCst)))
            }
            _ => None,
        }
    }
}

pub struct MockBackend {
    screen: ScreenRect,
    support: FocusSupport,
    pub created: Vec<WindowSpy>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_support(FocusSupport::Signal)
    }

    pub fn with_support(support: FocusSupport) -> Self {
        Self {
            screen: ScreenRect::new(0.0, 0.0, 1920.0, 1080.0),
            support,
            created: Vec::new(),
        }
    }
}

impl WindowBackend for MockBackend {
    type Window = MockWindow;

    fn create_window(&mut self, config: &WindowConfig) -> MockWindow {
        let (window, spy) = MockWindow::build(self.support, Some(config.clone()));
        self.created.push(spy);
        window
    }

    fn primary_screen(&self) -> ScreenRect {
        self.screen
    }
}

pub fn config() -> SwitcherConfig {
    SwitcherConfig::new().with_id_seed(0x5eed)
}

pub fn navigator() -> Navigator<MockBackend> {
    Navigator::new(MockBackend::new(), config())
}

/// Spy on the default window, which the navigator created first.
pub fn default_spy(nav: &Navigator<MockBackend>) -> WindowSpy {
    nav.backend().created[0].clone()
}

/// Drain posted requests until `done` holds or two seconds pass.
pub fn pump_until(nav: &mut Navigator<MockBackend>, mut done: impl FnMut(&Navigator<MockBackend>) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        nav.process_pending();
        if done(nav) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
