/// A read against one PostgREST table.
///
/// Only the operators the app needs are modelled: column projection (with
/// embedded resources written inline, e.g. `restaurants(id,name)`), equality
/// filters and a single ordering column.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<Order>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Set the projection. Whitespace is stripped so multi-line column lists
    /// can be written readably at the call site.
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.split_whitespace().collect();
        self
    }

    /// Add an `column=eq.value` filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.filters
            .push((column.into(), format!("eq.{}", value.as_ref())));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Query-string pairs in PostgREST syntax. Values are left unencoded;
    /// reqwest percent-encodes them when the request is built.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }
        pairs
    }
}
