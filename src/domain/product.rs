use bigdecimal::BigDecimal;

pub const DEFAULT_TAKE: u64 = 100;
pub const MAX_TAKE: u64 = 100;

/// A catalog entry. `price` is only authoritative at the moment it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: BigDecimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}

/// Skip/take window used by catalog searches and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub take: u64,
}

impl Pagination {
    /// `take` defaults to 100 and is clamped to `1..=100`.
    pub fn new(skip: Option<u64>, take: Option<u64>) -> Self {
        Self {
            skip: skip.unwrap_or(0),
            take: take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_first_hundred() {
        let page = Pagination::default();
        assert_eq!(page.skip, 0);
        assert_eq!(page.take, 100);
    }

    #[test]
    fn pagination_clamps_take() {
        assert_eq!(Pagination::new(None, Some(0)).take, 1);
        assert_eq!(Pagination::new(Some(5), Some(1_000)).take, 100);
        assert_eq!(Pagination::new(Some(5), Some(20)), Pagination { skip: 5, take: 20 });
    }
}
