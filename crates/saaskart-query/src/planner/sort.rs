// SPDX-License-Identifier: Apache-2.0

use saaskart_model::{NullsOrder, SortDirection, SortKey, SortSpec};

/// Maps a sort name to an ordering. Metrics sort high to low with missing
/// values last; `categories` sorts by a company's smallest category id with
/// uncategorised companies last. Anything else sorts by name.
#[must_use]
pub fn resolve_sort(key: Option<&str>) -> SortSpec {
    match key.and_then(SortKey::parse) {
        Some(SortKey::Metric(metric)) => SortSpec {
            key: SortKey::Metric(metric),
            direction: SortDirection::Desc,
            nulls: NullsOrder::Last,
        },
        Some(SortKey::Category) => SortSpec {
            key: SortKey::Category,
            direction: SortDirection::Asc,
            nulls: NullsOrder::Last,
        },
        Some(SortKey::Name) | None => SortSpec::BY_NAME,
    }
}
