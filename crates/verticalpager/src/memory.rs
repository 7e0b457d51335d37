//! In-memory host bindings
//!
//! Headless implementations of the host capabilities. Each one records what
//! the pager asked of it in a log shared through `Arc<Mutex<_>>`, so the
//! caller can keep a handle after moving the binding into the controller.

use std::sync::Arc;

use ahash::AHashSet;
use parking_lot::Mutex;
use pagerstore::{PageProxy, ProxyId};

use crate::host::{PageIndicator, RenderSurface, ViewHost};
use crate::indicator::{IndicatorState, IndicatorStyle};

/// Page descriptor for the in-memory host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryProxy {
    id: ProxyId,
    title: String,
}

impl MemoryProxy {
    /// Create a proxy
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: ProxyId(id),
            title: title.into(),
        }
    }

    /// Page title
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl PageProxy for MemoryProxy {
    fn id(&self) -> ProxyId {
        self.id
    }
}

/// View produced by [`MemoryHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryView {
    /// Proxy the view was materialized from
    pub proxy: ProxyId,
    /// Unique per materialization
    pub serial: u64,
}

/// Record of host calls
#[derive(Debug, Default)]
pub struct HostLog {
    /// Views handed out, in order
    pub materialized: Vec<MemoryView>,
    /// Views handed back, in order
    pub destroyed: Vec<MemoryView>,
    /// Proxies parented to the pager
    pub adopted: Vec<ProxyId>,
    /// Proxies unparented from the pager
    pub released: Vec<ProxyId>,
    /// Proxies whose materialization yields no view
    pub failing: AHashSet<ProxyId>,
}

impl HostLog {
    /// Views materialized and not yet destroyed
    pub fn live_views(&self) -> usize {
        self.materialized.len() - self.destroyed.len()
    }
}

/// Headless [`ViewHost`]
#[derive(Debug, Default)]
pub struct MemoryHost {
    log: Arc<Mutex<HostLog>>,
    next_serial: u64,
}

impl MemoryHost {
    /// Create a host with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the call log
    pub fn log(&self) -> Arc<Mutex<HostLog>> {
        Arc::clone(&self.log)
    }
}

impl ViewHost for MemoryHost {
    type Proxy = MemoryProxy;
    type View = MemoryView;

    fn materialize(&mut self, proxy: &MemoryProxy) -> Option<MemoryView> {
        let mut log = self.log.lock();
        if log.failing.contains(&proxy.id()) {
            return None;
        }

        self.next_serial += 1;
        let view = MemoryView {
            proxy: proxy.id(),
            serial: self.next_serial,
        };
        log.materialized.push(view.clone());
        Some(view)
    }

    fn destroy(&mut self, view: MemoryView) {
        self.log.lock().destroyed.push(view);
    }

    fn adopt(&mut self, proxy: &MemoryProxy) {
        self.log.lock().adopted.push(proxy.id());
    }

    fn release(&mut self, proxy: &MemoryProxy) {
        self.log.lock().released.push(proxy.id());
    }
}

/// Record of surface calls
#[derive(Debug, Default)]
pub struct SurfaceLog {
    /// Cell count last laid out
    pub item_count: usize,
    /// Cells shown, in order
    pub displayed: Vec<(usize, MemoryView)>,
    /// Programmatic scrolls as (index, animated)
    pub scrolls: Vec<(usize, bool)>,
    /// Index the surface rests on; tests move it to simulate gestures
    pub visible: Option<usize>,
}

impl SurfaceLog {
    /// Most recent view shown at `index`
    pub fn last_displayed(&self, index: usize) -> Option<&MemoryView> {
        self.displayed
            .iter()
            .rev()
            .find(|(shown, _)| *shown == index)
            .map(|(_, view)| view)
    }
}

/// Headless [`RenderSurface`]
#[derive(Debug, Default)]
pub struct MemorySurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl MemorySurface {
    /// Create a surface with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the call log
    pub fn log(&self) -> Arc<Mutex<SurfaceLog>> {
        Arc::clone(&self.log)
    }
}

impl RenderSurface<MemoryView> for MemorySurface {
    fn set_item_count(&mut self, count: usize) {
        let mut log = self.log.lock();
        log.item_count = count;
        log.visible = match count {
            0 => None,
            _ => Some(log.visible.unwrap_or(0).min(count - 1)),
        };
    }

    fn display_cell(&mut self, index: usize, view: &MemoryView) {
        self.log.lock().displayed.push((index, view.clone()));
    }

    fn current_visible_index(&self) -> Option<usize> {
        self.log.lock().visible
    }

    fn scroll_to(&mut self, index: usize, animated: bool) {
        let mut log = self.log.lock();
        log.scrolls.push((index, animated));
        log.visible = Some(index);
    }
}

/// Record of indicator updates
#[derive(Debug, Default)]
pub struct IndicatorLog {
    /// Last state pushed
    pub state: IndicatorState,
    /// Last style applied
    pub style: Option<IndicatorStyle>,
    /// Number of state pushes
    pub updates: usize,
}

/// Headless [`PageIndicator`]
#[derive(Debug, Default)]
pub struct MemoryIndicator {
    log: Arc<Mutex<IndicatorLog>>,
}

impl MemoryIndicator {
    /// Create an indicator with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the update log
    pub fn log(&self) -> Arc<Mutex<IndicatorLog>> {
        Arc::clone(&self.log)
    }
}

impl PageIndicator for MemoryIndicator {
    fn apply_style(&mut self, style: &IndicatorStyle) {
        self.log.lock().style = Some(*style);
    }

    fn update(&mut self, state: IndicatorState) {
        let mut log = self.log.lock();
        log.state = state;
        log.updates += 1;
    }
}
