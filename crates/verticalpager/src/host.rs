//! Capabilities the pager needs from its host framework

use pagerstore::PageProxy;

use crate::indicator::{IndicatorState, IndicatorStyle};

/// Host view-proxy system
///
/// Turns proxies into concrete views and takes them back. The pager never
/// drops a view it got from `materialize` without passing it to `destroy`.
pub trait ViewHost {
    /// Page descriptor handed to the pager
    type Proxy: PageProxy;

    /// Concrete rendered view
    type View: Clone;

    /// Create a renderable view for a proxy
    ///
    /// `None` leaves the page blank.
    fn materialize(&mut self, proxy: &Self::Proxy) -> Option<Self::View>;

    /// Release a view the pager no longer holds
    fn destroy(&mut self, view: Self::View);

    /// Proxy became a child of the pager
    fn adopt(&mut self, _proxy: &Self::Proxy) {}

    /// Proxy is no longer a child of the pager
    fn release(&mut self, _proxy: &Self::Proxy) {}
}

/// Platform scroll/collection primitive that shows one page at a time
pub trait RenderSurface<V> {
    /// Number of cells the surface lays out
    fn set_item_count(&mut self, count: usize);

    /// Show `view` in the cell at `index`
    fn display_cell(&mut self, index: usize, view: &V);

    /// Index the surface is resting on
    fn current_visible_index(&self) -> Option<usize>;

    /// Programmatic scroll; animated scrolls report completion through
    /// `PagerController::on_scroll_animation_finished`
    fn scroll_to(&mut self, index: usize, animated: bool);
}

/// Host indicator view
pub trait PageIndicator {
    /// Visual configuration changed
    fn apply_style(&mut self, style: &IndicatorStyle);

    /// Position or count changed
    fn update(&mut self, state: IndicatorState);
}
