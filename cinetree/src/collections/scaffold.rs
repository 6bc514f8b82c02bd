//! Static browsing scaffold: root, categories, rolling years and months
//!
//! Everything here is computed once from the clock at construction, never
//! touches the network or the cache, and is identical across repeated calls
//! within one process run.

use crate::data::{ProviderData, ResourceKind};
use chrono::{Datelike, NaiveDate, Utc};

/// The three fixed top-level categories
pub const CATEGORIES: &[&str] = &["movies", "persons", "genres"];

/// Precomputed, network-free browsing scaffolding
#[derive(Debug, Clone)]
pub struct Scaffold {
    current_year: i32,
    current_month: u32,
    root: ProviderData,
    categories: Vec<ProviderData>,
    years: Vec<ProviderData>,
}

impl Scaffold {
    /// Builds the scaffold from today's date
    pub fn new(years_back: usize) -> Self {
        Self::with_today(Utc::now().date_naive(), years_back)
    }

    /// Builds the scaffold from an explicit date
    pub fn with_today(today: NaiveDate, years_back: usize) -> Self {
        let current_year = today.year();
        let current_month = today.month();

        let root = ProviderData::new("root", ResourceKind::Root, "");

        let categories = CATEGORIES
            .iter()
            .map(|name| ProviderData::new(format!("cid-{}", name), ResourceKind::Category, *name))
            .collect();

        let first_year = current_year - years_back.max(1) as i32 + 1;
        let years = (first_year..=current_year).map(Self::year_record).collect();

        Self {
            current_year,
            current_month,
            root,
            categories,
            years,
        }
    }

    fn year_record(year: i32) -> ProviderData {
        ProviderData::new(
            format!("year-{:04}", year),
            ResourceKind::Year,
            format!("{:04}", year),
        )
    }

    fn month_record(year: i32, month: u32) -> ProviderData {
        let name = format!("{:04}-{:02}", year, month);
        ProviderData::new(format!("month-{}", name), ResourceKind::Month, name)
    }

    /// The root record
    pub fn root(&self) -> &ProviderData {
        &self.root
    }

    /// The fixed category records, in registration order
    pub fn categories(&self) -> &[ProviderData] {
        &self.categories
    }

    /// Looks up a category by name
    pub fn category(&self, name: &str) -> Option<&ProviderData> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// The rolling year window, oldest first, ending at the current year
    pub fn years(&self) -> &[ProviderData] {
        &self.years
    }

    /// Synthesizes the record for any year
    ///
    /// Years outside the rolling window still resolve (they are ancestors of
    /// movies released before the window); only the window is *listed*.
    pub fn year(&self, year: i32) -> ProviderData {
        Self::year_record(year)
    }

    /// The months of a year, capped at the current month for the current year
    pub fn months(&self, year: i32) -> Vec<ProviderData> {
        let last = if year == self.current_year {
            self.current_month
        } else {
            12
        };
        (1..=last).map(|m| Self::month_record(year, m)).collect()
    }

    /// Synthesizes the record for a valid month
    ///
    /// Months 1..=12 resolve for any year; `0000-00` is the permanent
    /// fallback branch for movies without a known release date. Anything
    /// else yields `None`.
    pub fn month(&self, year: i32, month: u32) -> Option<ProviderData> {
        if (1..=12).contains(&month) || (year == 0 && month == 0) {
            Some(Self::month_record(year, month))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaffold() -> Scaffold {
        Scaffold::with_today(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(), 10)
    }

    #[test]
    fn test_categories_are_fixed() {
        let s = scaffold();
        let names: Vec<_> = s.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["movies", "persons", "genres"]);
        assert_eq!(s.category("movies").unwrap().id, "cid-movies");
        assert!(s.category("series").is_none());
    }

    #[test]
    fn test_rolling_year_window() {
        let s = scaffold();
        let years: Vec<_> = s.years().iter().map(|y| y.name.as_str()).collect();
        assert_eq!(years.first(), Some(&"2015"));
        assert_eq!(years.last(), Some(&"2024"));
        assert_eq!(years.len(), 10);
    }

    #[test]
    fn test_months_capped_for_current_year() {
        let s = scaffold();
        assert_eq!(s.months(2024).len(), 4);
        assert_eq!(s.months(2023).len(), 12);
        assert_eq!(s.months(2024).last().unwrap().name, "2024-04");
    }

    #[test]
    fn test_month_validity() {
        let s = scaffold();
        assert_eq!(s.month(2024, 1).unwrap().id, "month-2024-01");
        assert_eq!(s.month(0, 0).unwrap().id, "month-0000-00");
        assert!(s.month(2024, 13).is_none());
        assert!(s.month(2024, 0).is_none());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let s = scaffold();
        assert_eq!(s.years(), s.years());
        assert_eq!(s.months(2024), s.months(2024));
        assert_eq!(s.categories(), s.categories());
    }

    #[test]
    fn test_off_window_year_still_resolves() {
        let s = scaffold();
        assert_eq!(s.year(1999).id, "year-1999");
        assert_eq!(s.year(1999).name, "1999");
    }
}
