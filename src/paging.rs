//! 1-indexed pagination shared by every listing.

use serde::Serialize;
use std::num::NonZeroUsize;

/// One page of a larger ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Requested page number, echoed back.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// Total pages for `count` items: `ceil(count / page_size)`.
pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get())
}

/// Slice out page `page` (1-indexed). Out-of-range pages, including 0, are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: NonZeroUsize) -> Page<T> {
    let total_pages = total_pages(items.len(), page_size);
    let slice = if page == 0 || page > total_pages {
        &[][..]
    } else {
        let start = (page - 1) * page_size.get();
        let end = (start + page_size.get()).min(items.len());
        &items[start..end]
    };

    Page {
        items: slice.to_vec(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, size(50)), 0);
        assert_eq!(total_pages(1, size(50)), 1);
        assert_eq!(total_pages(50, size(50)), 1);
        assert_eq!(total_pages(51, size(50)), 2);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate::<u32>(&[], 1, size(10));
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_items, 0);
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let items: Vec<u32> = (0..23).collect();
        for n in 1..=25 {
            let first = paginate(&items, 1, size(n));
            let mut rebuilt = Vec::new();
            for p in 1..=first.total_pages {
                let page = paginate(&items, p, size(n));
                assert!(page.items.len() <= n);
                rebuilt.extend(page.items);
            }
            assert_eq!(rebuilt, items, "page size {n}");
        }
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let items = vec!['a', 'b', 'c'];
        assert!(paginate(&items, 0, size(2)).is_empty());
        assert!(paginate(&items, 3, size(2)).is_empty());
        let last = paginate(&items, 2, size(2));
        assert_eq!(last.items, vec!['c']);
        assert_eq!(last.total_pages, 2);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = paginate(&[1, 2, 3], 1, size(2)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 3);
    }
}
