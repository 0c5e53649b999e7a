use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: usize = 100;

/// One page of a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Slices `items` into the requested page.
///
/// `size` is clamped into [1, MAX_PAGE_SIZE]; `page` is clamped into
/// [1, pages], so asking past the end returns the last page.
pub fn paginate<T: Clone>(items: &[T], page: usize, size: usize) -> Page<T> {
    let size = size.clamp(1, MAX_PAGE_SIZE);
    let total = items.len();
    let pages = total.div_ceil(size);
    let page = page.clamp(1, pages.max(1));

    let start = ((page - 1) * size).min(total);
    let end = (start + size).min(total);

    Page {
        items: items[start..end].to_vec(),
        total,
        page,
        size,
        pages,
        has_next: page < pages,
        has_prev: page > 1 && pages > 0,
    }
}
