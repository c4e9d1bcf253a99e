/// Fixed-size pagination over a fully fetched list.
///
/// Changing the requested page just re-slices; nothing is refetched. Pages
/// are 1-indexed to match the page-selector controls, which are generated
/// from `1..=total_pages()`.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    items: Vec<T>,
    page_size: usize,
}

impl<T> Pager<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            // A zero page size would make every page empty and the page
            // count undefined; treat it as 1.
            page_size: page_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// ceil(len / page_size)
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// The 1-indexed page's slice. Out-of-range pages (including 0) yield an
    /// empty slice rather than panicking.
    pub fn page(&self, page: usize) -> &[T] {
        if page == 0 {
            return &[];
        }
        let start = (page - 1) * self.page_size;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Replace the backing list (e.g. after a refetch), keeping the page size.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_items_page_size_six() {
        let pager = Pager::new((1..=13).collect::<Vec<i32>>(), 6);

        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.page(1).len(), 6);
        assert_eq!(pager.page(2).len(), 6);
        assert_eq!(pager.page(3).len(), 1);
        assert_eq!(pager.page(2), &[7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn concatenated_pages_reproduce_the_list() {
        let items: Vec<u32> = (0..23).collect();
        let pager = Pager::new(items.clone(), 5);

        let mut rebuilt = Vec::new();
        for page in 1..=pager.total_pages() {
            rebuilt.extend_from_slice(pager.page(page));
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let pager = Pager::new(vec![1, 2, 3], 2);
        assert_eq!(pager.total_pages(), 2);
        assert!(pager.page(0).is_empty());
        assert!(pager.page(3).is_empty());
        assert!(pager.page(100).is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let pager = Pager::new((0..12).collect::<Vec<i32>>(), 6);
        assert_eq!(pager.total_pages(), 2);
        assert_eq!(pager.page(2).len(), 6);
        assert!(pager.page(3).is_empty());
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let pager: Pager<i32> = Pager::new(vec![], 5);
        assert_eq!(pager.total_pages(), 0);
        assert!(pager.page(1).is_empty());
    }

    #[test]
    fn refetch_reslices_without_losing_page_size() {
        let mut pager = Pager::new(vec![1, 2, 3], 2);
        pager.set_items((0..7).collect());
        assert_eq!(pager.total_pages(), 4);
        assert_eq!(pager.page(4), &[6]);
    }
}
