use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{common::QueryCommon, Query};

/// Filter parameters for the listings browse page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub common: QueryCommon,
    /// Case-insensitive substring matched against listing titles.
    pub search: Option<String>,
    /// Case-insensitive exact category label.
    pub category: Option<String>,
    pub sort_by: ListingSortBy,
}

impl Query for ListingQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("q", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if !matches!(self.sort_by, ListingSortBy::EndingSoon | ListingSortBy::Unsorted) {
            pairs.push(("sort", self.sort_by.to_string()));
        }
        pairs.extend(self.common.to_pairs());
        pairs
    }

    fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        let mut query = ListingQuery::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "q" => query.search = non_empty(&value),
                "category" => query.category = non_empty(&value),
                "sort" => query.sort_by = parse_sort(&value),
                other => {
                    if !query.common.apply_pair(other, &value) {
                        tracing::debug!("Ignoring unknown address key '{}'", other);
                    }
                }
            }
        }
        query
    }
}

impl ListingQuery {
    /// Sets the title search text. Empty text clears the filter.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = non_empty(search);
        self
    }

    /// Sets the category label. Empty text clears the filter.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = non_empty(category);
        self
    }

    pub fn with_sort_by(mut self, sort_by: ListingSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// The same filters pointed at a different page.
    pub fn for_page(&self, page: u32) -> Self {
        let mut query = self.clone();
        query.common.page = page;
        query
    }
}

// Unrecognized keys keep the filtered order; an empty value means the default.
fn parse_sort(value: &str) -> ListingSortBy {
    if value.is_empty() {
        return ListingSortBy::default();
    }
    value.parse().unwrap_or_else(|_| {
        tracing::debug!("Unknown sort key '{}', keeping input order", value);
        ListingSortBy::Unsorted
    })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Sort order for listing results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSortBy {
    /// Cheapest effective price first.
    PriceAsc,
    /// Most expensive effective price first.
    PriceDesc,
    /// Soonest-ending first. This is the default.
    #[default]
    EndingSoon,
    /// Most recent bidding activity first.
    Hot,
    /// Input order. Selected by an unrecognized sort key; never offered and
    /// never written to an address.
    Unsorted,
}

impl ListingSortBy {
    /// All sort orders, in the order they are offered to users.
    pub const ALL: [ListingSortBy; 4] = [
        ListingSortBy::EndingSoon,
        ListingSortBy::Hot,
        ListingSortBy::PriceAsc,
        ListingSortBy::PriceDesc,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ListingSortBy::PriceAsc => "Price: Low to High",
            ListingSortBy::PriceDesc => "Price: High to Low",
            ListingSortBy::EndingSoon => "Ending Soon",
            ListingSortBy::Hot => "Hot",
            ListingSortBy::Unsorted => "Unsorted",
        }
    }
}

impl std::fmt::Display for ListingSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ListingSortBy::PriceAsc => "price_asc",
                ListingSortBy::PriceDesc => "price_desc",
                ListingSortBy::EndingSoon => "ending_soon",
                ListingSortBy::Hot => "hot",
                ListingSortBy::Unsorted => "unsorted",
            }
        )?;
        Ok(())
    }
}

impl FromStr for ListingSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price_asc" => Ok(ListingSortBy::PriceAsc),
            "price_desc" => Ok(ListingSortBy::PriceDesc),
            "ending_soon" => Ok(ListingSortBy::EndingSoon),
            "hot" => Ok(ListingSortBy::Hot),
            _ => Err(()),
        }
    }
}
