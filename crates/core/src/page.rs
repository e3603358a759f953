//! Pagination contract for list operations.
//!
//! Page numbers are 1-based (`pn`) with a bounded page size (`ps`), matching
//! the query arguments the admin console sends.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page request arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageArgs {
    /// Page number, starting at 1.
    #[serde(default = "default_pn")]
    pub pn: u32,
    /// Page size.
    #[serde(default = "default_ps")]
    pub ps: u32,
}

fn default_pn() -> u32 {
    1
}

fn default_ps() -> u32 {
    10
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            pn: default_pn(),
            ps: default_ps(),
        }
    }
}

impl PageArgs {
    pub fn new(pn: u32, ps: u32) -> Self {
        Self { pn, ps }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.pn == 0 {
            return Err(DomainError::validation("pn must be >= 1"));
        }
        if self.ps == 0 || self.ps > MAX_PAGE_SIZE {
            return Err(DomainError::validation(format!(
                "ps must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    fn offset(&self) -> usize {
        (self.pn as usize - 1) * self.ps as usize
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of records across all pages.
    pub total: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.page_number < self.total_pages
    }
}

/// Slice an already ordered result set into the requested page.
///
/// Requesting a page past the end yields an empty `items` list, not an error.
pub fn paginate<T>(ordered: Vec<T>, args: PageArgs) -> DomainResult<Page<T>> {
    args.validate()?;

    let total = ordered.len() as u64;
    let total_pages = total.div_ceil(u64::from(args.ps)) as u32;
    let items = ordered
        .into_iter()
        .skip(args.offset())
        .take(args.ps as usize)
        .collect();

    Ok(Page {
        items,
        total,
        page_number: args.pn,
        page_size: args.ps,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn second_page_holds_the_remainder() {
        let page = paginate((1..=12).collect::<Vec<_>>(), PageArgs::new(2, 10)).unwrap();
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_more());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = paginate(vec![1, 2, 3], PageArgs::new(5, 10)).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn zero_page_number_is_rejected() {
        let err = paginate(vec![1], PageArgs::new(0, 10)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn oversized_page_is_rejected() {
        let err = paginate(vec![1], PageArgs::new(1, MAX_PAGE_SIZE + 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn missing_arguments_take_defaults() {
        let args: PageArgs = serde_json::from_str("{}").unwrap();
        assert_eq!(args, PageArgs::default());

        let args: PageArgs = serde_json::from_str(r#"{"pn": 3}"#).unwrap();
        assert_eq!(args, PageArgs::new(3, 10));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: walking every page visits each record exactly once, in order.
        #[test]
        fn pages_partition_the_input(len in 0usize..250, ps in 1u32..=MAX_PAGE_SIZE) {
            let input: Vec<usize> = (0..len).collect();
            let first = paginate(input.clone(), PageArgs::new(1, ps)).unwrap();

            let mut seen = Vec::new();
            for pn in 1..=first.total_pages.max(1) {
                let page = paginate(input.clone(), PageArgs::new(pn, ps)).unwrap();
                seen.extend(page.items);
            }

            prop_assert_eq!(seen, input);
        }
    }
}
