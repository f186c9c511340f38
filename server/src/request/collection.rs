use error_stack::Report;
use kernel::interface::query::{ReviewOrder, ReviewOrderKey};
use kernel::prelude::entity::{ItemsPerPage, OrderDirection, Page, Pagination};
use kernel::KernelError;
use serde::Deserialize;

use crate::config::PaginationConfig;

const PAGE: &str = "page";
const ITEMS_PER_PAGE: &str = "itemsPerPage";

/// Query-string pairs of a collection request, in the order the client sent them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CollectionQuery(Vec<(String, String)>);

impl CollectionQuery {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn integer(&self, key: &str) -> error_stack::Result<Option<i64>, KernelError> {
        self.get(key)
            .map(|value| {
                value.trim().parse::<i64>().map_err(|_| {
                    Report::new(KernelError::InvalidRequest)
                        .attach_printable(format!("{key} must be an integer, got \"{value}\""))
                })
            })
            .transpose()
    }

    pub fn pagination(
        &self,
        config: PaginationConfig,
    ) -> error_stack::Result<Pagination, KernelError> {
        let page = self.integer(PAGE)?.unwrap_or(1);
        if page < 1 {
            return Err(Report::new(KernelError::InvalidRequest)
                .attach_printable("Page should not be less than 1".to_string()));
        }
        let items_per_page = self
            .integer(ITEMS_PER_PAGE)?
            .unwrap_or(config.items_per_page);
        if items_per_page < 1 {
            return Err(Report::new(KernelError::InvalidRequest)
                .attach_printable("itemsPerPage should not be less than 1".to_string()));
        }
        let items_per_page = items_per_page.min(config.maximum_items_per_page);
        if (page - 1).checked_mul(items_per_page).is_none() {
            return Err(Report::new(KernelError::InvalidRequest)
                .attach_printable(format!("Page {page} is out of range")));
        }
        Ok(Pagination::new(
            Page::new(page),
            ItemsPerPage::new(items_per_page),
        ))
    }

    /// `order[property]=direction` pairs; unknown properties and directions are skipped.
    pub fn review_orders(&self) -> Vec<ReviewOrder> {
        let mut orders: Vec<ReviewOrder> = Vec::new();
        for (name, value) in &self.0 {
            let Some(property) = name
                .strip_prefix("order[")
                .and_then(|rest| rest.strip_suffix(']'))
            else {
                continue;
            };
            let (Some(key), Some(direction)) = (
                ReviewOrderKey::from_property(property),
                OrderDirection::parse(value.trim()),
            ) else {
                continue;
            };
            if orders.iter().all(|order| order.key() != key) {
                orders.push(ReviewOrder::new(key, direction));
            }
        }
        orders
    }

    /// Every pair except `page`, used to build page links.
    pub fn without_page(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter(|(name, _)| name != PAGE)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::query::{ReviewOrder, ReviewOrderKey};
    use kernel::prelude::entity::OrderDirection;
    use kernel::KernelError;

    use super::CollectionQuery;
    use crate::config::PaginationConfig;

    fn query(pairs: &[(&str, &str)]) -> CollectionQuery {
        CollectionQuery::new(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn pagination_defaults_and_cap() -> error_stack::Result<(), KernelError> {
        let config = PaginationConfig::default();
        let pagination = query(&[]).pagination(config)?;
        assert_eq!(*pagination.page().as_ref(), 1);
        assert_eq!(*pagination.items_per_page().as_ref(), 30);

        let pagination = query(&[("page", "2"), ("itemsPerPage", "5")]).pagination(config)?;
        assert_eq!(pagination.offset(), 5);
        assert_eq!(pagination.limit(), 5);

        let pagination = query(&[("itemsPerPage", "1000")]).pagination(config)?;
        assert_eq!(pagination.limit(), 100);

        let last = (i64::MAX / 100 + 1).to_string();
        let pagination =
            query(&[("page", last.as_str()), ("itemsPerPage", "100")]).pagination(config)?;
        assert_eq!(pagination.offset(), i64::MAX / 100 * 100);
        Ok(())
    }

    #[test]
    fn invalid_pagination_is_bad_request() {
        let config = PaginationConfig::default();
        for pairs in [
            [("page", "0")],
            [("page", "-3")],
            [("page", "two")],
            [("itemsPerPage", "0")],
            [("itemsPerPage", "x")],
            [("page", "9223372036854775807")],
        ] {
            let report = query(&pairs).pagination(config).unwrap_err();
            assert!(matches!(report.current_context(), KernelError::InvalidRequest));
        }
    }

    #[test]
    fn orders_follow_query_string() {
        let orders = query(&[
            ("order[publicationDate]", "DESC"),
            ("order[unknown]", "asc"),
            ("order[id]", "sideways"),
            ("order[id]", "asc"),
            ("order[publicationDate]", "asc"),
        ])
        .review_orders();
        assert_eq!(
            orders,
            vec![
                ReviewOrder::new(ReviewOrderKey::PublicationDate, OrderDirection::Desc),
                ReviewOrder::new(ReviewOrderKey::Id, OrderDirection::Asc),
            ]
        );
    }
}
