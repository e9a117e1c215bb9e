use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

/// Inclusive calendar-date range used by registration-date filters.
/// A missing bound leaves that side unbounded.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq, Clone, Copy)]
pub struct DateRangeParameter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeParameter {
    /// Both bounds are inclusive. An inverted range (`from > to`) matches
    /// nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| from <= date) && self.to.map_or(true, |to| date <= to)
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResultResponse<P, D>
where
    P: Serialize,
    D: Serialize,
{
    pub stats: SearchResultStats<P>,
    pub items: Vec<D>,
    pub message: Option<String>,
}

impl<P, D> SearchResultResponse<P, D>
where
    P: Serialize,
    D: Serialize,
{
    pub fn error(params: P, message: impl ToString) -> Self {
        Self {
            stats: SearchResultStats {
                time: 0,
                total: 0,
                index: 0,
                pages: 0,
                count: 0,
                first: 0,
                last: 0,
                params,
            },
            items: Vec::new(),
            message: Some(message.to_string()),
        }
    }
}

/// `first` and `last` are the 1-based indices of the displayed rows within
/// the filtered set, both 0 when the page is empty.
#[derive(Debug, Serialize)]
pub struct SearchResultStats<P> {
    pub time: u32,
    pub total: u32,
    pub index: u32,
    pub pages: u32,
    pub count: u32,
    pub first: u32,
    pub last: u32,
    pub params: P,
}
