//! PagerController: keeps the page store, cell cache, render surface and
//! indicator in step
//!
//! States:
//! ```text
//! Empty --set_views/add_view--> Ready --scroll_to_page(animated)--> Transitioning
//!   ^                             |  ^                                   |
//!   +------remove last page-------+  +---animation finished / settle-----+
//! ```
//! While a transition is in flight `scroll_to_page`, `add_view` and
//! `remove_view` are rejected with `Error::Busy`. `set_views`,
//! `reload_data` and a settled gesture discard the pending completion.

use pagercache::{CacheStats, PageCellCache};
use pagerstore::{Error, PageProxy, PageProxyStore, PageRef, Result};
use tracing::{debug, warn};

use crate::config::PagerConfig;
use crate::events::{PagerEvent, ScrollDirection};
use crate::host::{PageIndicator, RenderSurface, ViewHost};
use crate::indicator::{IndicatorState, IndicatorStyle};

/// Ticket for an animated page transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionId(u64);

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// No pages
    Empty,
    /// Pages present, surface in sync
    Ready,
    /// Animated scroll waiting for the surface to finish
    Transitioning {
        /// Page current before the scroll
        from: usize,
        /// Page being scrolled to
        to: usize,
        /// Ticket the completion must present
        id: TransitionId,
    },
}

/// Result of a scroll request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Already on that page; nothing moved
    Unchanged,
    /// Page changed and everything is in sync
    Settled,
    /// Animation running; finish with `on_scroll_animation_finished`
    Pending(TransitionId),
}

type Listener = Box<dyn FnMut(&PagerEvent)>;

#[derive(Debug, Default)]
struct DragTracker {
    dragging: bool,
    last_position: Option<f32>,
    direction: ScrollDirection,
}

/// Vertically paging container
pub struct PagerController<H: ViewHost> {
    /// Host view-proxy system
    host: H,

    /// Platform paging surface
    surface: Box<dyn RenderSurface<H::View>>,

    /// Optional indicator view
    indicator: Option<Box<dyn PageIndicator>>,

    /// Authoritative page list and current page
    store: PageProxyStore<H::Proxy>,

    /// Materialized page views
    cache: PageCellCache<H::View>,

    /// Style pushed to the indicator
    style: IndicatorStyle,

    state: PagerState,
    next_transition: u64,
    drag: DragTracker,
    listeners: Vec<Listener>,
}

impl<H: ViewHost> PagerController<H> {
    /// Create an empty pager
    ///
    /// # Arguments
    /// * `host` - View-proxy capability used to materialize pages
    /// * `surface` - Rendering surface that shows the pages
    /// * `config` - Validated options; `cacheSize` must be at least 1
    pub fn new<S>(host: H, surface: S, config: &PagerConfig) -> Result<Self>
    where
        S: RenderSurface<H::View> + 'static,
    {
        config.validate()?;

        Ok(Self {
            host,
            surface: Box::new(surface),
            indicator: None,
            store: PageProxyStore::new(),
            cache: PageCellCache::new(config.cache_size)?,
            style: config.indicator_style(),
            state: PagerState::Empty,
            next_transition: 0,
            drag: DragTracker::default(),
            listeners: Vec::new(),
        })
    }

    /// Attach an indicator, builder style
    pub fn with_indicator<I>(mut self, indicator: I) -> Self
    where
        I: PageIndicator + 'static,
    {
        self.set_indicator(indicator);
        self
    }

    /// Attach or replace the indicator and bring it up to date
    pub fn set_indicator<I>(&mut self, indicator: I)
    where
        I: PageIndicator + 'static,
    {
        let mut indicator: Box<dyn PageIndicator> = Box::new(indicator);
        indicator.apply_style(&self.style);
        indicator.update(self.indicator_state());
        self.indicator = Some(indicator);
    }

    /// Change the indicator style
    pub fn set_indicator_style(&mut self, style: IndicatorStyle) {
        self.style = style;
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.apply_style(&style);
        }
    }

    /// Register an event listener
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: FnMut(&PagerEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Replace every page
    ///
    /// An empty list is the way back to `Empty`. Any pending animated
    /// transition is dropped.
    pub fn set_views(&mut self, views: Vec<H::Proxy>) -> Result<()> {
        let previous = self.store.set_pages(views, None)?;
        self.discard_transition();

        for proxy in &previous {
            self.host.release(proxy);
        }
        for proxy in self.store.pages() {
            self.host.adopt(proxy);
        }

        let dropped = self.cache.invalidate_all();
        self.destroy_views(dropped);
        self.resync();

        debug!(pages = self.store.len(), "views replaced");
        Ok(())
    }

    /// Insert a page, appending when `at` is `None`
    ///
    /// # Returns
    /// * `Result<usize>` - Position the page landed at
    pub fn add_view(&mut self, proxy: H::Proxy, at: Option<usize>) -> Result<usize> {
        self.ensure_idle()?;
        let index = self.store.add_page(proxy, at)?;

        if let Some(proxy) = self.store.get(index) {
            self.host.adopt(proxy);
        }

        // Every page from the insertion point on has a new index
        let dropped = self.cache.invalidate_from(index);
        self.destroy_views(dropped);
        self.sync_after_shift(index);

        debug!(index, pages = self.store.len(), "view added");
        Ok(index)
    }

    /// Remove a page by position or identity
    ///
    /// # Returns
    /// * `Result<H::Proxy>` - The removed proxy, already released
    pub fn remove_view(&mut self, target: PageRef) -> Result<H::Proxy> {
        self.ensure_idle()?;
        let removed = self.store.remove_page(target)?;
        self.host.release(&removed.proxy);

        let dropped = self.cache.invalidate_from(removed.index);
        self.destroy_views(dropped);
        self.sync_after_shift(removed.index);

        debug!(index = removed.index, pages = self.store.len(), "view removed");
        Ok(removed.proxy)
    }

    /// Move to a page
    ///
    /// Scrolling to the current page only re-pushes the indicator.
    pub fn scroll_to_page(&mut self, index: usize, animated: bool) -> Result<ScrollOutcome> {
        self.ensure_idle()?;

        if self.store.current_page() == Some(index) {
            self.push_indicator();
            return Ok(ScrollOutcome::Unchanged);
        }

        let previous = self.store.set_current_page(index)?;
        if animated {
            // The page being left stays on screen until the animation ends
            let dropped = self.cache.pin(Some(previous));
            self.destroy_views(dropped);
        }
        self.refocus();
        self.surface.scroll_to(index, animated);

        if !animated {
            self.complete_page_change(previous, index);
            return Ok(ScrollOutcome::Settled);
        }

        self.next_transition += 1;
        let id = TransitionId(self.next_transition);
        self.state = PagerState::Transitioning {
            from: previous,
            to: index,
            id,
        };
        debug!(from = previous, to = index, "animated transition started");
        Ok(ScrollOutcome::Pending(id))
    }

    /// Surface finished an animated scroll
    ///
    /// # Returns
    /// * `bool` - False when the ticket no longer matches a pending transition
    pub fn on_scroll_animation_finished(&mut self, id: TransitionId) -> bool {
        match self.state {
            PagerState::Transitioning {
                from,
                to,
                id: pending,
            } if pending == id => {
                self.complete_page_change(from, to);
                true
            }
            _ => {
                debug!(?id, "ignoring stale transition completion");
                false
            }
        }
    }

    /// User started dragging the surface
    pub fn on_drag_started(&mut self) {
        if self.drag.dragging {
            return;
        }
        self.drag.dragging = true;
        self.drag.last_position = None;

        let event = PagerEvent::ScrollStart {
            current_page: self.store.current_page(),
            direction: self.drag.direction,
        };
        self.emit(event);
    }

    /// Surface moved during a drag
    ///
    /// `position` is the page at the top edge, `offset` the fraction of it
    /// scrolled past.
    pub fn on_scrolled(&mut self, position: usize, offset: f32) {
        let at = position as f32 + offset;
        if let Some(last) = self.drag.last_position {
            if at > last {
                self.drag.direction = ScrollDirection::Down;
            } else if at < last {
                self.drag.direction = ScrollDirection::Up;
            }
        }
        self.drag.last_position = Some(at);

        if self.drag.dragging {
            let event = PagerEvent::Scroll {
                current_page: position,
                offset,
                direction: self.drag.direction,
            };
            self.emit(event);
        }
    }

    /// Surface came to rest after a gesture
    ///
    /// Reads the settled page from the surface and reconciles the store and
    /// indicator with it. Always treated as non-animated.
    pub fn on_scroll_settled(&mut self) -> Result<()> {
        let len = self.store.len();
        let observed = self.surface.current_visible_index();
        let Some(observed) = observed.filter(|&index| index < len) else {
            warn!(?observed, len, "surface settled outside the page range");
            return Err(Error::IndexOutOfRange {
                index: observed.map_or(-1, |index| index as i64),
                len,
            });
        };

        self.drag.dragging = false;
        self.drag.last_position = None;

        let origin = match self.state {
            PagerState::Transitioning { from, to, .. } => {
                debug!(to, observed, "gesture settled over a pending transition");
                Some(from)
            }
            _ => None,
        };

        let previous = self.store.set_current_page(observed)?;
        if previous != observed {
            self.refocus();
        }
        self.complete_page_change(origin.unwrap_or(previous), observed);

        self.emit(PagerEvent::ScrollEnd {
            current_page: Some(observed),
        });
        Ok(())
    }

    /// Rebuild the surface from the current pages
    ///
    /// Every cached view is released and the visible window materialized
    /// again. Pages and the current page are left alone.
    pub fn reload_data(&mut self) {
        self.discard_transition();
        let dropped = self.cache.invalidate_all();
        self.destroy_views(dropped);
        self.resync();
    }

    /// Release every cached view outside the protected window
    ///
    /// # Returns
    /// * `usize` - Number of views released
    pub fn release_offscreen(&mut self) -> usize {
        let dropped = self.cache.trim_to_window();
        let released = dropped.len();
        self.destroy_views(dropped);
        debug!(released, "released offscreen pages");
        released
    }

    /// Change how many materialized pages are kept
    pub fn set_cache_size(&mut self, cache_size: usize) -> Result<()> {
        let dropped = self.cache.set_capacity(cache_size)?;
        self.destroy_views(dropped);
        self.render_window();
        Ok(())
    }

    /// Current page, `None` when empty
    pub fn current_page(&self) -> Option<usize> {
        self.store.current_page()
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.store.len()
    }

    /// Pages in display order
    pub fn views(&self) -> &[H::Proxy] {
        self.store.pages()
    }

    /// Configured cache size
    pub fn cache_size(&self) -> usize {
        self.cache.capacity()
    }

    /// Cached page indices, most recently used first
    pub fn cached_pages(&self) -> Vec<usize> {
        self.cache.indices()
    }

    /// Cached view for a page, without touching recency
    pub fn cached_view(&self, index: usize) -> Option<&H::View> {
        self.cache.peek(index)
    }

    /// Check whether a page is exempt from cache eviction
    pub fn is_protected(&self, index: usize) -> bool {
        self.cache.is_protected(index)
    }

    /// Cache statistics
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Controller state
    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Position and count the indicator shows
    pub fn indicator_state(&self) -> IndicatorState {
        IndicatorState::new(self.store.current_page(), self.store.len())
    }

    /// Style pushed to the indicator
    pub fn indicator_style(&self) -> &IndicatorStyle {
        &self.style
    }

    /// Host capability
    pub fn host(&self) -> &H {
        &self.host
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.state {
            PagerState::Transitioning { to, .. } => Err(Error::Busy { target: to }),
            _ => Ok(()),
        }
    }

    fn discard_transition(&mut self) {
        if let PagerState::Transitioning { to, .. } = self.state {
            debug!(to, "discarding pending transition");
        }
        self.state = self.settled_state();
        self.unpin();
    }

    /// Stop protecting the page an animated scroll started from
    fn unpin(&mut self) {
        if self.cache.pinned().is_some() {
            let dropped = self.cache.pin(None);
            self.destroy_views(dropped);
        }
    }

    fn settled_state(&self) -> PagerState {
        if self.store.is_empty() {
            PagerState::Empty
        } else {
            PagerState::Ready
        }
    }

    /// Neighbours materialized on each side of the current page
    fn prefetch_reach(&self) -> usize {
        self.cache.window().min((self.cache.capacity() - 1) / 2)
    }

    /// Full resync of surface, window, state and indicator
    fn resync(&mut self) {
        self.surface.set_item_count(self.store.len());
        self.align_surface();
        self.refocus();
        self.state = self.settled_state();
        self.push_indicator();
    }

    /// Resync after the pages from `index` on changed position
    fn sync_after_shift(&mut self, index: usize) {
        self.surface.set_item_count(self.store.len());
        self.align_surface();

        let dropped = self.cache.focus(self.store.current_page());
        self.destroy_views(dropped);

        let reach = self.prefetch_reach();
        if let Some(current) = self.store.current_page() {
            if index <= current + reach {
                self.render_window();
            }
        }

        self.state = self.settled_state();
        self.push_indicator();
    }

    /// Keep the surface resting on the current page after its index moved
    fn align_surface(&mut self) {
        let Some(current) = self.store.current_page() else {
            return;
        };
        if self.surface.current_visible_index() != Some(current) {
            self.surface.scroll_to(current, false);
        }
    }

    /// Move the protected window to the current page and render around it
    fn refocus(&mut self) {
        let dropped = self.cache.focus(self.store.current_page());
        self.destroy_views(dropped);
        self.render_window();
    }

    fn render_window(&mut self) {
        let Some(current) = self.store.current_page() else {
            return;
        };

        let reach = self.prefetch_reach();
        let first = current.saturating_sub(reach);
        let last = (current + reach).min(self.store.len() - 1);

        // Neighbours first so the current page ends up most recent
        for index in (first..=last).filter(|&index| index != current) {
            self.ensure_cell(index);
        }
        self.ensure_cell(current);
    }

    fn ensure_cell(&mut self, index: usize) {
        if let Some(view) = self.cache.get(index) {
            self.surface.display_cell(index, view);
            return;
        }

        let Some(proxy) = self.store.get(index) else {
            return;
        };
        let Some(view) = self.host.materialize(proxy) else {
            warn!(index, proxy = %proxy.id(), "host produced no view for page");
            return;
        };

        self.surface.display_cell(index, &view);
        let dropped = self.cache.put(index, view);
        self.destroy_views(dropped);
    }

    fn complete_page_change(&mut self, previous: usize, current: usize) {
        self.state = self.settled_state();
        self.unpin();
        self.push_indicator();

        if previous == current {
            return;
        }
        let Some(current_view) = self.store.get(current).map(|proxy| proxy.id()) else {
            return;
        };
        let previous_view = self.store.get(previous).map(|proxy| proxy.id());

        self.emit(PagerEvent::Change {
            current_page: current,
            previous_page: previous,
            current_view,
            previous_view,
        });
    }

    fn push_indicator(&mut self) {
        let state = self.indicator_state();
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.update(state);
        }
    }

    fn destroy_views(&mut self, dropped: Vec<(usize, H::View)>) {
        for (index, view) in dropped {
            debug!(index, "releasing cached page view");
            self.host.destroy(view);
        }
    }

    fn emit(&mut self, event: PagerEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl<H: ViewHost> Drop for PagerController<H> {
    fn drop(&mut self) {
        for (_, view) in self.cache.invalidate_all() {
            self.host.destroy(view);
        }
        for proxy in self.store.pages() {
            self.host.release(proxy);
        }
    }
}
