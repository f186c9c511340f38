/// Field-to-column mapping of one table. The key column must come first.
pub(in crate::database) struct TableMapping {
    table: &'static str,
    columns: &'static [(&'static str, &'static str)],
}

impl TableMapping {
    pub const fn new(table: &'static str, columns: &'static [(&'static str, &'static str)]) -> Self {
        Self { table, columns }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn column(&self, field: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    pub fn select(&self) -> String {
        format!("SELECT {} FROM {}", self.column_list(), self.table)
    }

    /// Placeholders are numbered in column order.
    pub fn insert(&self) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|index| format!("${index}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.column_list(),
            placeholders
        )
    }

    /// The key column binds to `$1`, the rest follow in column order.
    pub fn update(&self) -> String {
        let Some(((_, key), rest)) = self.columns.split_first() else {
            return String::new();
        };
        let assignments = rest
            .iter()
            .enumerate()
            .map(|(index, (_, column))| format!("{column} = ${}", index + 2))
            .collect::<Vec<_>>()
            .join(", ");
        format!("UPDATE {} SET {} WHERE {key} = $1", self.table, assignments)
    }

    fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|(_, column)| *column)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(in crate::database) static BOOK_MAPPING: TableMapping =
    TableMapping::new("books", &[("id", "id"), ("title", "title")]);

pub(in crate::database) static REVIEW_MAPPING: TableMapping = TableMapping::new(
    "reviews",
    &[
        ("id", "id"),
        ("body", "body"),
        ("rating", "rating"),
        ("letter", "letter"),
        ("book", "book_id"),
        ("author", "author"),
        ("publicationDate", "publication_date"),
    ],
);

#[cfg(test)]
mod test {
    use super::{BOOK_MAPPING, REVIEW_MAPPING};

    #[test]
    fn statements_follow_column_order() {
        assert_eq!(
            REVIEW_MAPPING.select(),
            "SELECT id, body, rating, letter, book_id, author, publication_date FROM reviews"
        );
        assert_eq!(
            REVIEW_MAPPING.insert(),
            "INSERT INTO reviews (id, body, rating, letter, book_id, author, publication_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        );
        assert_eq!(
            REVIEW_MAPPING.update(),
            "UPDATE reviews SET body = $2, rating = $3, letter = $4, book_id = $5, \
             author = $6, publication_date = $7 WHERE id = $1"
        );
        assert_eq!(BOOK_MAPPING.insert(), "INSERT INTO books (id, title) VALUES ($1, $2)");
    }

    #[test]
    fn api_fields_resolve_to_columns() {
        assert_eq!(REVIEW_MAPPING.column("publicationDate"), Some("publication_date"));
        assert_eq!(REVIEW_MAPPING.column("book"), Some("book_id"));
        assert_eq!(REVIEW_MAPPING.column("rating_letter"), None);
    }
}
