//! Data table component types.
//!
//! These types define the configuration for the reusable data tables in the
//! admin panel: which columns exist, how their cells render, which fields the
//! search box looks at, and which facet filters are offered.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use marketplace_core::types::money::format_grouped;
use marketplace_core::{
    CustomerStatus, DeliveryType, KycStatus, LoyaltyTier, Merchant, MerchantStatus,
    OrderStatus, PaymentStatus, Record, Value,
};

/// Visual variant for badge cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Success,
    Warning,
    Error,
    Info,
    Neutral,
}

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Display text.
    pub text: String,
    /// Badge styling, if the cell renders as a badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<BadgeVariant>,
}

impl Cell {
    /// A plain text cell.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            badge: None,
        }
    }

    /// A badge cell.
    #[must_use]
    pub fn badge(text: impl Into<String>, variant: BadgeVariant) -> Self {
        Self {
            text: text.into(),
            badge: Some(variant),
        }
    }
}

/// Strategy for turning a field value into a display cell.
///
/// Closures of the form `Fn(&Value, &dyn Record) -> Cell` implement this
/// trait, so one-off renderers can be written inline.
pub trait CellRenderer: Send + Sync {
    /// Render `value`, the column's field read from `record`.
    fn render(&self, value: &Value, record: &dyn Record) -> Cell;
}

impl<F> CellRenderer for F
where
    F: Fn(&Value, &dyn Record) -> Cell + Send + Sync,
{
    fn render(&self, value: &Value, record: &dyn Record) -> Cell {
        self(value, record)
    }
}

/// Renders numbers as dollar amounts (`$125,000`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyRenderer;

impl CellRenderer for CurrencyRenderer {
    fn render(&self, value: &Value, _record: &dyn Record) -> Cell {
        match value.as_number() {
            Some(n) => Cell::plain(format_grouped(n, "$")),
            None => Cell::plain(value.to_string()),
        }
    }
}

/// Renders numbers with thousands separators (`1,250`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupedNumberRenderer;

impl CellRenderer for GroupedNumberRenderer {
    fn render(&self, value: &Value, _record: &dyn Record) -> Cell {
        match value.as_number() {
            Some(n) => Cell::plain(format_grouped(n, "")),
            None => Cell::plain(value.to_string()),
        }
    }
}

/// Renders a star rating (`★ 4.5`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingRenderer;

impl CellRenderer for RatingRenderer {
    fn render(&self, value: &Value, _record: &dyn Record) -> Cell {
        if value.is_null() {
            return Cell::plain("");
        }
        Cell::plain(format!("\u{2605} {value}"))
    }
}

/// Renders a value as a badge, picking the variant from a lookup table.
#[derive(Debug, Clone)]
pub struct BadgeRenderer {
    variants: Vec<(String, BadgeVariant)>,
    fallback: BadgeVariant,
}

impl BadgeRenderer {
    /// Create a badge renderer with a fallback variant for unlisted values.
    #[must_use]
    pub const fn new(fallback: BadgeVariant) -> Self {
        Self {
            variants: Vec::new(),
            fallback,
        }
    }

    /// Map `value` to `variant`.
    #[must_use]
    pub fn with(mut self, value: impl fmt::Display, variant: BadgeVariant) -> Self {
        self.variants.push((value.to_string(), variant));
        self
    }

    /// Variant used for `value`.
    #[must_use]
    pub fn variant_for(&self, value: &str) -> BadgeVariant {
        self.variants
            .iter()
            .find(|(v, _)| v == value)
            .map_or(self.fallback, |(_, variant)| *variant)
    }
}

impl CellRenderer for BadgeRenderer {
    fn render(&self, value: &Value, _record: &dyn Record) -> Cell {
        let text = value.to_string();
        let variant = self.variant_for(&text);
        Cell::badge(text, variant)
    }
}

/// Column definition for a data table.
#[derive(Clone, Serialize)]
pub struct TableColumn {
    /// Field key the column reads.
    pub key: String,
    /// Display label for the column header (also the CSV header).
    pub label: String,
    /// Whether the column is sortable.
    pub sortable: bool,
    /// Style hint for the presentation layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip)]
    renderer: Option<Arc<dyn CellRenderer>>,
}

impl fmt::Debug for TableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableColumn")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("class_name", &self.class_name)
            .field("renderer", &self.renderer.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: true,
            class_name: None,
            renderer: None,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            sortable: false,
            ..Self::sortable(key, label)
        }
    }

    /// Set the style hint.
    #[must_use]
    pub fn class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    /// Render cells with a custom strategy.
    #[must_use]
    pub fn render_with(mut self, renderer: impl CellRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Whether a custom renderer is attached.
    #[must_use]
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Render this column's cell for `record`.
    ///
    /// Without a custom renderer the raw value's display form is used.
    pub fn render<R: Record>(&self, record: &R) -> Cell {
        let value = record.field(&self.key);
        match &self.renderer {
            Some(renderer) => renderer.render(&value, record),
            None => Cell::plain(value.to_string()),
        }
    }
}

/// Option for a facet filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Option value (matched exactly against the field).
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Facet filter definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Field key the filter constrains (also the query parameter name).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Allowed values.
    pub options: Vec<FilterOption>,
}

impl TableFilter {
    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            options,
        }
    }

    /// Whether `value` is one of the declared options.
    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Title (also the export filename prefix).
    pub title: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Fields the search box matches against.
    pub search_keys: Vec<String>,
    /// Facet filter definitions.
    pub filters: Vec<TableFilter>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str, title: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            title: title.to_string(),
            columns: vec![],
            search_keys: vec![],
            filters: vec![],
            search_placeholder: "Search...".to_string(),
            empty_title: "No data available".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a searchable field.
    #[must_use]
    pub fn search_key(mut self, key: &str) -> Self {
        self.search_keys.push(key.to_string());
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Look up a column by key.
    #[must_use]
    pub fn column_by_key(&self, key: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Look up a filter by key.
    #[must_use]
    pub fn filter_by_key(&self, key: &str) -> Option<&TableFilter> {
        self.filters.iter().find(|f| f.key == key)
    }
}

fn status_options<T: Copy>(
    all: &[T],
    wire: impl Fn(T) -> &'static str,
    label: impl Fn(T) -> &'static str,
) -> Vec<FilterOption> {
    all.iter()
        .map(|s| FilterOption::new(wire(*s), label(*s)))
        .collect()
}

/// Build the merchants table configuration.
///
/// Category options are the distinct categories present in `merchants`, in
/// first-seen order.
#[must_use]
pub fn merchants_table_config(merchants: &[Merchant]) -> DataTableConfig {
    let mut categories: Vec<&str> = Vec::new();
    for merchant in merchants {
        if !categories.contains(&merchant.category.as_str()) {
            categories.push(&merchant.category);
        }
    }

    DataTableConfig::new("merchants", "Merchants")
        .column(TableColumn::sortable("id", "ID"))
        .column(
            TableColumn::sortable("business_name", "Business Name").render_with(
                |value: &Value, record: &dyn Record| {
                    Cell::plain(format!("{value} <{}>", record.field("email")))
                },
            ),
        )
        .column(TableColumn::sortable("name", "Owner"))
        .column(TableColumn::sortable("category", "Category"))
        .column(TableColumn::sortable("location", "Location"))
        .column(
            TableColumn::sortable("status", "Status").render_with(
                BadgeRenderer::new(BadgeVariant::Neutral)
                    .with(MerchantStatus::Active, BadgeVariant::Success)
                    .with(MerchantStatus::Pending, BadgeVariant::Warning)
                    .with(MerchantStatus::Suspended, BadgeVariant::Error),
            ),
        )
        .column(
            TableColumn::sortable("kyc_status", "KYC").render_with(
                BadgeRenderer::new(BadgeVariant::Warning)
                    .with(KycStatus::Approved, BadgeVariant::Success)
                    .with(KycStatus::Rejected, BadgeVariant::Error),
            ),
        )
        .column(
            TableColumn::sortable("revenue", "Revenue")
                .class("text-right")
                .render_with(CurrencyRenderer),
        )
        .column(
            TableColumn::sortable("rating", "Rating")
                .class("text-center")
                .render_with(RatingRenderer),
        )
        .search_key("business_name")
        .search_key("name")
        .search_key("email")
        .filter(TableFilter::select(
            "status",
            "Status",
            status_options(MerchantStatus::ALL, |s| s.as_str(), |s| s.label()),
        ))
        .filter(TableFilter::select(
            "category",
            "Category",
            categories
                .into_iter()
                .map(|c| FilterOption::new(c, c))
                .collect(),
        ))
        .filter(TableFilter::select(
            "kyc_status",
            "KYC Status",
            status_options(KycStatus::ALL, |s| s.as_str(), |s| s.label()),
        ))
        .search_placeholder("Search by name, business, or email...")
        .empty_state(
            "No merchants found",
            Some("Try adjusting your search or filters"),
        )
}

/// Build the customers table configuration.
#[must_use]
pub fn customers_table_config() -> DataTableConfig {
    DataTableConfig::new("customers", "Customers")
        .column(TableColumn::sortable("id", "ID"))
        .column(TableColumn::sortable("name", "Customer"))
        .column(TableColumn::sortable("email", "Email"))
        .column(TableColumn::new("phone", "Phone"))
        .column(TableColumn::sortable("location", "Location"))
        .column(
            TableColumn::sortable("total_orders", "Orders")
                .class("text-right")
                .render_with(GroupedNumberRenderer),
        )
        .column(
            TableColumn::sortable("total_spent", "Spent")
                .class("text-right")
                .render_with(CurrencyRenderer),
        )
        .column(
            TableColumn::sortable("loyalty_tier", "Tier").render_with(
                BadgeRenderer::new(BadgeVariant::Neutral)
                    .with(LoyaltyTier::Platinum, BadgeVariant::Info)
                    .with(LoyaltyTier::Gold, BadgeVariant::Warning),
            ),
        )
        .column(
            TableColumn::sortable("status", "Status").render_with(
                BadgeRenderer::new(BadgeVariant::Neutral)
                    .with(CustomerStatus::Active, BadgeVariant::Success)
                    .with(CustomerStatus::Blocked, BadgeVariant::Error),
            ),
        )
        .column(TableColumn::sortable("join_date", "Joined"))
        .search_key("name")
        .search_key("email")
        .search_key("phone")
        .filter(TableFilter::select(
            "status",
            "Status",
            status_options(CustomerStatus::ALL, |s| s.as_str(), |s| s.label()),
        ))
        .filter(TableFilter::select(
            "loyalty_tier",
            "Loyalty Tier",
            status_options(LoyaltyTier::ALL, |s| s.as_str(), |s| s.label()),
        ))
        .search_placeholder("Search customers by name, email, or phone...")
        .empty_state(
            "No customers found",
            Some("Try adjusting your search or filters"),
        )
}

/// Build the orders table configuration.
#[must_use]
pub fn orders_table_config() -> DataTableConfig {
    DataTableConfig::new("orders", "Orders")
        .column(TableColumn::sortable("id", "Order ID"))
        .column(TableColumn::sortable("customer_name", "Customer"))
        .column(TableColumn::sortable("merchant_name", "Merchant"))
        .column(TableColumn::sortable("items", "Items").class("text-center"))
        .column(
            TableColumn::sortable("total", "Total")
                .class("text-right")
                .render_with(CurrencyRenderer),
        )
        .column(TableColumn::sortable("delivery_type", "Type"))
        .column(
            TableColumn::sortable("payment_status", "Payment").render_with(
                BadgeRenderer::new(BadgeVariant::Neutral)
                    .with(PaymentStatus::Paid, BadgeVariant::Success)
                    .with(PaymentStatus::Pending, BadgeVariant::Warning),
            ),
        )
        .column(
            TableColumn::sortable("status", "Status").render_with(
                BadgeRenderer::new(BadgeVariant::Info)
                    .with(OrderStatus::Delivered, BadgeVariant::Success)
                    .with(OrderStatus::Pending, BadgeVariant::Warning)
                    .with(OrderStatus::Cancelled, BadgeVariant::Error),
            ),
        )
        .column(TableColumn::sortable("order_date", "Date"))
        .search_key("id")
        .search_key("customer_name")
        .search_key("merchant_name")
        .filter(TableFilter::select(
            "status",
            "Status",
            status_options(OrderStatus::ALL, |s| s.as_str(), |s| s.label()),
        ))
        .filter(TableFilter::select(
            "payment_status",
            "Payment",
            status_options(PaymentStatus::ALL, |s| s.as_str(), |s| s.label()),
        ))
        .filter(TableFilter::select(
            "delivery_type",
            "Delivery Type",
            status_options(DeliveryType::ALL, |s| s.as_str(), |s| s.label()),
        ))
        .search_placeholder("Search by order ID, customer, or merchant...")
        .empty_state("No orders found", Some("Try adjusting your search or filters"))
}

/// Build a configuration for schemaless rows.
///
/// Every key becomes a sortable, searchable column labelled with the key.
#[must_use]
pub fn generic_table_config<'a>(
    table_id: &str,
    title: &str,
    keys: impl IntoIterator<Item = &'a str>,
) -> DataTableConfig {
    keys.into_iter().fold(
        DataTableConfig::new(table_id, title),
        |config, key| config.column(TableColumn::sortable(key, key)).search_key(key),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::Row;

    use super::*;
    use crate::mock;

    #[test]
    fn test_badge_renderer_variants() {
        let renderer = BadgeRenderer::new(BadgeVariant::Neutral)
            .with("active", BadgeVariant::Success);
        let row = Row::new("1");
        assert_eq!(
            renderer.render(&Value::from("active"), &row),
            Cell::badge("active", BadgeVariant::Success)
        );
        assert_eq!(
            renderer.render(&Value::from("inactive"), &row),
            Cell::badge("inactive", BadgeVariant::Neutral)
        );
    }

    #[test]
    fn test_currency_and_rating_renderers() {
        let row = Row::new("1");
        assert_eq!(
            CurrencyRenderer.render(&Value::from(125_000_i64), &row).text,
            "$125,000"
        );
        assert_eq!(CurrencyRenderer.render(&Value::Null, &row).text, "");
        assert_eq!(
            GroupedNumberRenderer.render(&Value::from(1250_i64), &row).text,
            "1,250"
        );
        assert_eq!(
            RatingRenderer.render(&Value::from(4.5), &row).text,
            "\u{2605} 4.5"
        );
    }

    #[test]
    fn test_column_render_defaults_to_display() {
        let row = Row::new("1").with("amt", 5_i64);
        let column = TableColumn::sortable("amt", "Amount");
        assert_eq!(column.render(&row), Cell::plain("5"));
        assert!(!column.has_renderer());
    }

    #[test]
    fn test_closure_renderer_sees_whole_record() {
        let row = Row::new("1").with("first", "Ann").with("last", "Lee");
        let column = TableColumn::new("first", "Name").render_with(
            |value: &Value, record: &dyn Record| {
                Cell::plain(format!("{value} {}", record.field("last")))
            },
        );
        assert_eq!(column.render(&row).text, "Ann Lee");
    }

    #[test]
    fn test_merchant_categories_come_from_data() {
        let merchants = mock::merchants().unwrap();
        let config = merchants_table_config(&merchants);
        let categories = config.filter_by_key("category").unwrap();

        assert!(!categories.options.is_empty());
        for merchant in &merchants {
            assert!(categories.has_option(&merchant.category));
        }
        let mut values: Vec<_> = categories.options.iter().map(|o| &o.value).collect();
        values.dedup();
        assert_eq!(values.len(), categories.options.len());
    }

    #[test]
    fn test_search_keys_reference_known_fields() {
        let merchants = mock::merchants().unwrap();
        for (config, fields) in [
            (merchants_table_config(&merchants), Merchant::FIELDS),
            (customers_table_config(), marketplace_core::Customer::FIELDS),
            (orders_table_config(), marketplace_core::Order::FIELDS),
        ] {
            for key in &config.search_keys {
                assert!(fields.contains(&key.as_str()), "{key} not a field");
            }
            for column in &config.columns {
                assert!(fields.contains(&column.key.as_str()), "{} not a field", column.key);
            }
        }
    }

    #[test]
    fn test_generic_config() {
        let config = generic_table_config("rows", "Rows", ["id", "name"]);
        assert_eq!(config.columns.len(), 2);
        assert!(config.columns.iter().all(|c| c.sortable));
        assert_eq!(config.search_keys, vec!["id", "name"]);
    }

    #[test]
    fn test_column_serializes_without_renderer() {
        let column = TableColumn::sortable("revenue", "Revenue")
            .class("text-right")
            .render_with(CurrencyRenderer);
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "key": "revenue",
                "label": "Revenue",
                "sortable": true,
                "class_name": "text-right"
            })
        );
    }
}
