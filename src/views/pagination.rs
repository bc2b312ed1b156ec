//! Page arithmetic shared by every list view

use std::fmt;
use std::ops::RangeInclusive;

use crate::api::models::Paginated;

/// Most page buttons shown at once
pub const MAX_PAGE_BUTTONS: u32 = 7;

/// `ceil(total_items / page_size)`
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size as u64) as u32
}

/// Sliding window of page numbers to render
///
/// All pages when there are at most seven; otherwise seven pages centred on `current`,
/// clamped to the first or last seven near either end.
pub fn page_window(current: u32, total: u32) -> RangeInclusive<u32> {
    if total <= MAX_PAGE_BUTTONS {
        return 1..=total;
    }

    let half = MAX_PAGE_BUTTONS / 2;
    let start = if current <= half + 1 {
        1
    } else if current >= total - half {
        total - MAX_PAGE_BUTTONS + 1
    } else {
        current - half
    };

    start..=start + MAX_PAGE_BUTTONS - 1
}

/// The "Showing X to Y of Z" label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowingRange {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl ShowingRange {
    /// `from` is 0 when the page is empty
    pub fn new(page: u32, page_size: u32, items_on_page: usize, total: u64) -> Self {
        let from = if items_on_page > 0 {
            (page.max(1) as u64 - 1) * page_size as u64 + 1
        } else {
            0
        };
        let to = (page as u64 * page_size as u64).min(total);
        Self { from, to, total }
    }
}

impl fmt::Display for ShowingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} to {} of {}", self.from, self.to, self.total)
    }
}

/// Locally tracked page position plus the totals of the last applied response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    page_size: u32,
    total_items: u64,
    total_pages: u32,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_items: 0,
            total_pages: 1,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Highest page navigation may reach
    fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    /// Move to `page`, clamped to the known range. Returns whether the page changed.
    pub fn go_to(&mut self, page: u32) -> bool {
        let target = page.clamp(1, self.last_page());
        let changed = target != self.page;
        self.page = target;
        changed
    }

    /// Jump to `page` without checking it against the totals, for a first load
    /// that starts beyond page 1.
    pub fn seek(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Whether the applied totals put the current page beyond the last one
    pub fn is_past_end(&self) -> bool {
        self.total_pages > 0 && self.page > self.total_pages
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.page.saturating_sub(1))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Change the page size; the result set changes so the position goes back to page 1
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Take the totals of a response; its `current_page` is ignored
    pub fn update_totals<T>(&mut self, page: &Paginated<T>) {
        self.total_items = page.total_items;
        self.total_pages = page.total_pages;
    }

    /// Whether pagination controls are worth rendering
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    pub fn window(&self) -> RangeInclusive<u32> {
        page_window(self.page, self.total_pages)
    }

    pub fn showing(&self, items_on_page: usize) -> ShowingRange {
        ShowingRange::new(self.page, self.page_size, items_on_page, self.total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(101, 20), 6);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_total_pages_matches_ceiling_for_all_sizes() {
        for size in [10u32, 20, 50, 100] {
            for total in 0u64..=250 {
                let expected = (total as f64 / size as f64).ceil() as u32;
                assert_eq!(total_pages(total, size), expected, "total={} size={}", total, size);
            }
        }
    }

    #[test]
    fn test_window_shows_all_pages_when_few() {
        assert_eq!(page_window(1, 1), 1..=1);
        assert_eq!(page_window(3, 5), 1..=5);
        assert_eq!(page_window(7, 7), 1..=7);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_window_for_twenty_pages() {
        assert_eq!(page_window(1, 20), 1..=7);
        assert_eq!(page_window(4, 20), 1..=7);
        assert_eq!(page_window(5, 20), 2..=8);
        assert_eq!(page_window(10, 20), 7..=13);
        assert_eq!(page_window(16, 20), 13..=19);
        assert_eq!(page_window(17, 20), 14..=20);
        assert_eq!(page_window(20, 20), 14..=20);
    }

    #[test]
    fn test_window_always_contains_current_page() {
        for total in 1..=30u32 {
            for current in 1..=total {
                let window = page_window(current, total);
                assert!(window.contains(&current));
                assert!(*window.end() <= total);
                assert_eq!(window.count() as u32, total.min(MAX_PAGE_BUTTONS));
            }
        }
    }

    #[test]
    fn test_showing_range() {
        assert_eq!(ShowingRange::new(1, 10, 10, 95).to_string(), "Showing 1 to 10 of 95");
        assert_eq!(ShowingRange::new(10, 10, 5, 95).to_string(), "Showing 91 to 95 of 95");
        assert_eq!(ShowingRange::new(3, 20, 20, 100), ShowingRange { from: 41, to: 60, total: 100 });
        assert_eq!(ShowingRange::new(1, 10, 0, 0).to_string(), "Showing 0 to 0 of 0");
    }

    #[test]
    fn test_pager_navigation_clamps() {
        let mut pager = Pager::new(10);
        pager.update_totals(&Paginated::<()> {
            items: Vec::new(),
            total_items: 35,
            total_pages: 4,
            current_page: 99,
        });

        assert!(!pager.previous());
        assert!(pager.next());
        assert_eq!(pager.page(), 2);
        assert!(pager.go_to(40));
        assert_eq!(pager.page(), 4);
        assert!(!pager.has_next());
        assert!(!pager.next());

        pager.set_page_size(20);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.page_size(), 20);
    }

    #[test]
    fn test_pager_before_first_response() {
        let mut pager = Pager::new(10);
        assert!(!pager.is_paginated());
        assert!(!pager.go_to(3));
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_seek_ahead_of_totals() {
        let mut pager = Pager::new(10);
        pager.seek(3);
        assert_eq!(pager.page(), 3);
        assert!(!pager.is_past_end());

        pager.update_totals(&Paginated::<()> {
            items: Vec::new(),
            total_items: 15,
            total_pages: 2,
            current_page: 3,
        });
        assert!(pager.is_past_end());
        assert!(pager.go_to(pager.total_pages()));
        assert_eq!(pager.page(), 2);
        assert!(!pager.is_past_end());

        pager.seek(0);
        assert_eq!(pager.page(), 1);
    }
}
