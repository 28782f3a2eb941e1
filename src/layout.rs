//! Sticky header stack of the leads page.
//!
//! The page header, the filter bar and the tab bar are stacked on top of the
//! table. Each region sticks at the cumulative height of the regions above it,
//! so the offsets have to follow the measured heights whenever the terminal
//! is resized.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    PageHeader,
    FilterBar,
    TabBar,
}

impl Region {
    pub const STACK: [Region; 3] = [Region::PageHeader, Region::FilterBar, Region::TabBar];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionHeights {
    pub page_header: u16,
    pub filter_bar: u16,
    pub tab_bar: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickyOffsets {
    pub filter_bar: u16,
    pub tab_bar: u16,
    pub stack: u16,
}

impl StickyOffsets {
    pub fn from_heights(h: &RegionHeights) -> Self {
        let filter_bar = h.page_header;
        let tab_bar = filter_bar.saturating_add(h.filter_bar);
        StickyOffsets {
            filter_bar,
            tab_bar,
            stack: tab_bar.saturating_add(h.tab_bar),
        }
    }
}

#[derive(Debug, Default)]
struct StackState {
    observed: Vec<Region>,
    heights: RegionHeights,
    offsets: StickyOffsets,
}

impl StackState {
    // Unobserved or unmeasured regions count as zero.
    fn remeasure(&mut self, measure: &dyn Fn(Region) -> Option<u16>) {
        let mut heights = RegionHeights::default();
        for &region in &self.observed {
            let h = measure(region).unwrap_or(0);
            match region {
                Region::PageHeader => heights.page_header = h,
                Region::FilterBar => heights.filter_bar = h,
                Region::TabBar => heights.tab_bar = h,
            }
        }
        self.heights = heights;
        self.offsets = StickyOffsets::from_heights(&heights);
    }
}

/// Delivers size notifications to every live subscription.
///
/// Subscriptions are held weakly: dropping a [`StickySubscription`] is all it
/// takes to stop observing.
#[derive(Debug, Default)]
pub struct ResizeObserver {
    subscribers: Vec<Weak<RefCell<StackState>>>,
}

impl ResizeObserver {
    /// Starts observing `regions` and delivers a first measurement right away.
    pub fn observe(
        &mut self,
        regions: &[Region],
        measure: &dyn Fn(Region) -> Option<u16>,
    ) -> StickySubscription {
        let state = Rc::new(RefCell::new(StackState {
            observed: regions.to_vec(),
            ..StackState::default()
        }));
        state.borrow_mut().remeasure(measure);
        self.subscribers.push(Rc::downgrade(&state));
        trace!("Observing {:?}, {} subscriber(s)", regions, self.active());
        StickySubscription { state }
    }

    /// Re-reads all observed regions of every live subscription.
    pub fn notify(&mut self, measure: &dyn Fn(Region) -> Option<u16>) {
        self.subscribers.retain(|weak| match weak.upgrade() {
            Some(state) => {
                state.borrow_mut().remeasure(measure);
                true
            }
            None => false,
        });
    }

    pub fn active(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// Live observation of a sticky stack. Released on drop.
#[derive(Debug)]
pub struct StickySubscription {
    state: Rc<RefCell<StackState>>,
}

impl StickySubscription {
    pub fn heights(&self) -> RegionHeights {
        self.state.borrow().heights
    }

    pub fn offsets(&self) -> StickyOffsets {
        self.state.borrow().offsets
    }
}

impl Drop for StickySubscription {
    fn drop(&mut self) {
        trace!("Releasing sticky stack observation");
    }
}
