//! Page selection for rasterization

use crate::format::count_noun;
use std::collections::BTreeSet;

/// Set of 1-based page numbers picked for conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    total_pages: u32,
    pages: BTreeSet<u32>,
}

impl PageSelection {
    /// Empty selection for a document of `total_pages` pages.
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            pages: BTreeSet::new(),
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Checkbox change. Pages outside `1..=N` are ignored.
    pub fn set(&mut self, page: u32, checked: bool) {
        if page == 0 || page > self.total_pages {
            return;
        }
        if checked {
            self.pages.insert(page);
        } else {
            self.pages.remove(&page);
        }
    }

    pub fn toggle(&mut self, page: u32) {
        let checked = !self.contains(page);
        self.set(page, checked);
    }

    pub fn select_all(&mut self) {
        self.pages = (1..=self.total_pages).collect();
    }

    pub fn deselect_all(&mut self) {
        self.pages.clear();
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Conversion is only offered with at least one page picked.
    pub fn can_convert(&self) -> bool {
        !self.is_empty()
    }

    /// Selected pages in ascending order.
    pub fn pages(&self) -> Vec<u32> {
        self.pages.iter().copied().collect()
    }

    pub fn count_label(&self) -> String {
        match self.len() {
            0 => "No pages selected".to_string(),
            n => format!("{} selected", count_noun(n, "page")),
        }
    }

    pub fn action_label(&self) -> String {
        let n = self.len();
        let s = if n == 1 { "" } else { "s" };
        format!("Convert {} Page{} to Image{}", n, s, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selection_is_empty() {
        let sel = PageSelection::new(5);
        assert!(sel.is_empty());
        assert!(!sel.can_convert());
        assert_eq!(sel.count_label(), "No pages selected");
    }

    #[test]
    fn test_select_all_fills_range() {
        let mut sel = PageSelection::new(4);
        sel.set(2, true);
        sel.select_all();
        assert_eq!(sel.pages(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut sel = PageSelection::new(3);
        sel.set(0, true);
        sel.set(4, true);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_and_labels() {
        let mut sel = PageSelection::new(10);
        sel.toggle(3);
        assert_eq!(sel.count_label(), "1 page selected");
        assert_eq!(sel.action_label(), "Convert 1 Page to Image");
        sel.toggle(7);
        assert_eq!(sel.count_label(), "2 pages selected");
        assert_eq!(sel.action_label(), "Convert 2 Pages to Images");
        sel.toggle(3);
        assert_eq!(sel.pages(), vec![7]);
    }

    #[test]
    fn test_pages_sorted() {
        let mut sel = PageSelection::new(10);
        for p in [9, 2, 5] {
            sel.set(p, true);
        }
        assert_eq!(sel.pages(), vec![2, 5, 9]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn deselect_all_always_empty(
            total in 0u32..200,
            toggles in prop::collection::vec((0u32..250, any::<bool>()), 0..50)
        ) {
            let mut sel = PageSelection::new(total);
            for (page, checked) in toggles {
                sel.set(page, checked);
            }
            sel.deselect_all();
            prop_assert!(sel.is_empty());
            prop_assert!(!sel.can_convert());
        }

        #[test]
        fn select_all_is_full_range(
            total in 0u32..200,
            toggles in prop::collection::vec((0u32..250, any::<bool>()), 0..50)
        ) {
            let mut sel = PageSelection::new(total);
            for (page, checked) in toggles {
                sel.set(page, checked);
            }
            sel.select_all();
            prop_assert_eq!(sel.pages(), (1..=total).collect::<Vec<_>>());
        }

        #[test]
        fn members_stay_in_bounds(
            total in 1u32..100,
            toggles in prop::collection::vec(0u32..200, 0..80)
        ) {
            let mut sel = PageSelection::new(total);
            for page in toggles {
                sel.toggle(page);
            }
            for page in sel.pages() {
                prop_assert!(page >= 1 && page <= total);
            }
        }
    }
}
