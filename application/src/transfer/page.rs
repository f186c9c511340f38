use kernel::prelude::entity::Pagination;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total_items: i64,
    pub page: i64,
    pub items_per_page: i64,
    pub last_page: i64,
}

impl<T> PageDto<T> {
    pub fn new(items: Vec<T>, total_items: i64, pagination: &Pagination) -> Self {
        Self {
            items,
            total_items,
            page: *pagination.page().as_ref(),
            items_per_page: *pagination.items_per_page().as_ref(),
            last_page: pagination.last_page(total_items),
        }
    }
}
