use serde::Serialize;

use crate::catalog::Product;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Exactly `"all"` selects the full catalog; any other value is taken
    /// verbatim as a category name.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Named(name) => name.as_str(),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => product.category == *name,
        }
    }
}

pub fn filter_by_category(catalog: &[Product], filter: &CategoryFilter) -> Vec<Product> {
    catalog
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

/// Contiguous slice of `items` for a 1-based `page`. Page 0, a zero page
/// size, or a page past the end all yield an empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageIndicator {
    pub current: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// Navigation is only shown when there is more than one page.
    pub visible: bool,
}

impl PageIndicator {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current, self.total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    current_page: usize,
    page_size: usize,
    category: CategoryFilter,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            category: CategoryFilter::All,
        }
    }
}

impl ViewState {
    /// Returns `None` for a zero page size.
    pub fn new(page_size: usize) -> Option<Self> {
        if page_size == 0 {
            return None;
        }
        Some(Self {
            page_size,
            ..Self::default()
        })
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.current_page = 1;
    }

    /// Rejects zero and leaves the state untouched in that case.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            return false;
        }
        self.page_size = page_size;
        self.current_page = 1;
        true
    }

    pub fn next_page(&mut self, total_items: usize) -> bool {
        if self.current_page < total_pages(total_items, self.page_size) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to_page(&mut self, page: usize, total_items: usize) -> bool {
        if page == 0 || page > total_pages(total_items, self.page_size) {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page_size, self.current_page)
    }

    pub fn indicator(&self, total_items: usize) -> PageIndicator {
        let total = total_pages(total_items, self.page_size);
        PageIndicator {
            current: self.current_page,
            total,
            has_prev: self.current_page > 1,
            has_next: self.current_page < total,
            visible: total > 1,
        }
    }
}
