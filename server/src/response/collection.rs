use application::transfer::PageDto;
use serde::Serialize;

/// Where a collection lives and which query parameters its page links keep.
#[derive(Debug, Clone)]
pub struct CollectionLinks {
    path: String,
    query: Vec<(String, String)>,
}

impl CollectionLinks {
    pub fn new(path: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn page(&self, page: i64) -> String {
        let query = self
            .query
            .iter()
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .chain(std::iter::once(format!("page={page}")))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

#[derive(Debug, Serialize)]
pub struct HydraView {
    #[serde(rename = "@id")]
    iri: String,
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "hydra:first", skip_serializing_if = "Option::is_none")]
    first: Option<String>,
    #[serde(rename = "hydra:last", skip_serializing_if = "Option::is_none")]
    last: Option<String>,
    #[serde(rename = "hydra:previous", skip_serializing_if = "Option::is_none")]
    previous: Option<String>,
    #[serde(rename = "hydra:next", skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

impl HydraView {
    pub fn new<T>(links: &CollectionLinks, page: &PageDto<T>) -> Self {
        let paged = page.last_page > 1;
        Self {
            iri: links.page(page.page),
            kind: "hydra:PartialCollectionView",
            first: paged.then(|| links.page(1)),
            last: paged.then(|| links.page(page.last_page)),
            previous: (page.page > 1).then(|| links.page(page.page - 1)),
            next: (page.page < page.last_page).then(|| links.page(page.page + 1)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HydraCollection<T> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@id")]
    iri: String,
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "hydra:member")]
    member: Vec<T>,
    #[serde(rename = "hydra:totalItems")]
    total_items: i64,
    #[serde(rename = "hydra:view")]
    view: HydraView,
}

impl<T> HydraCollection<T> {
    pub fn new<S>(
        context: &'static str,
        links: &CollectionLinks,
        page: PageDto<S>,
        member: impl Fn(S) -> T,
    ) -> Self {
        let view = HydraView::new(links, &page);
        Self {
            context,
            iri: links.path().to_string(),
            kind: "hydra:Collection",
            total_items: page.total_items,
            member: page.items.into_iter().map(member).collect(),
            view,
        }
    }
}

#[cfg(test)]
mod test {
    use application::transfer::PageDto;
    use kernel::prelude::entity::{ItemsPerPage, Page, Pagination};

    use super::{CollectionLinks, HydraView};

    #[test]
    fn view_links_keep_query() {
        let links = CollectionLinks::new(
            "/reviews",
            vec![
                ("order[id]".to_string(), "desc".to_string()),
                ("itemsPerPage".to_string(), "5".to_string()),
            ],
        );
        let pagination = Pagination::new(Page::new(2), ItemsPerPage::new(5));
        let page = PageDto::new(vec![(); 5], 12, &pagination);
        let view = serde_json::to_value(HydraView::new(&links, &page)).unwrap();
        assert_eq!(view["@id"], "/reviews?order%5Bid%5D=desc&itemsPerPage=5&page=2");
        assert_eq!(view["hydra:first"], "/reviews?order%5Bid%5D=desc&itemsPerPage=5&page=1");
        assert_eq!(view["hydra:last"], "/reviews?order%5Bid%5D=desc&itemsPerPage=5&page=3");
        assert_eq!(view["hydra:previous"], "/reviews?order%5Bid%5D=desc&itemsPerPage=5&page=1");
        assert_eq!(view["hydra:next"], "/reviews?order%5Bid%5D=desc&itemsPerPage=5&page=3");
    }

    #[test]
    fn single_page_has_no_navigation() {
        let links = CollectionLinks::new("/reviews", Vec::new());
        let page = PageDto::new(vec![(); 2], 2, &Pagination::default());
        let view = serde_json::to_value(HydraView::new(&links, &page)).unwrap();
        assert_eq!(view["@id"], "/reviews?page=1");
        assert!(view.get("hydra:first").is_none());
        assert!(view.get("hydra:next").is_none());
        assert!(view.get("hydra:previous").is_none());
    }
}
