/// Current page, page size and total count. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationStore {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl PaginationStore {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        let size = self.page_size.max(1) as u64;
        self.total.div_ceil(size).max(1) as u32
    }

    /// 1-based inclusive range of items shown on this page, `(0, 0)` when empty
    pub fn visible_range(&self) -> (u64, u64) {
        if self.total == 0 {
            return (0, 0);
        }
        let size = self.page_size as u64;
        let start = (self.page as u64 - 1) * size + 1;
        let end = (self.page as u64 * size).min(self.total);
        (start.min(end), end)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn decrement_total(&mut self) {
        self.total = self.total.saturating_sub(1);
    }

    /// Status line text, e.g. "1-50 of 120"
    pub fn summary(&self) -> String {
        let (start, end) = self.visible_range();
        format!("{}-{} of {}", start, end, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_pages_and_range() {
        let mut p = PaginationStore::new(50);
        p.set_total(120);
        assert_eq!(p.total_pages(), 3);
        p.set_page(3);
        assert_eq!(p.visible_range(), (101, 120));
        assert!(!p.has_next());
        assert!(p.has_previous());
        assert_eq!(p.summary(), "101-120 of 120");
    }

    #[test]
    fn empty_result_is_one_page() {
        let p = PaginationStore::new(50);
        assert_eq!(p.total_pages(), 1);
        assert_eq!(p.visible_range(), (0, 0));
        assert!(!p.has_next());
    }

    #[test]
    fn decrement_floors_at_zero() {
        let mut p = PaginationStore::new(10);
        p.decrement_total();
        assert_eq!(p.total, 0);
    }
}
