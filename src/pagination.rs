use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("That page number is not an integer")]
    NotAnInteger,
    #[error("That page number is less than 1")]
    LessThanOne,
    #[error("That page contains no results")]
    NoResults,
}

/// Splits an ordered sequence into fixed-size pages.
///
/// An empty sequence still has one (empty) page, so page 1 always exists.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    per_page: usize,
}

impl<T> Paginator<T> {
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        Self {
            items,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn num_pages(&self) -> usize {
        self.count().div_ceil(self.per_page).max(1)
    }

    /// Parses a raw page parameter. `last` names the final page.
    pub fn validate_number(&self, raw: &str) -> Result<usize, PaginationError> {
        let raw = raw.trim();
        if raw == "last" {
            return Ok(self.num_pages());
        }
        let number: i64 = match raw.parse() {
            Ok(number) => number,
            Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(PaginationError::NoResults);
            }
            Err(_) => return Err(PaginationError::NotAnInteger),
        };
        if number < 1 {
            return Err(PaginationError::LessThanOne);
        }
        match usize::try_from(number) {
            Ok(number) if number <= self.num_pages() => Ok(number),
            _ => Err(PaginationError::NoResults),
        }
    }

    pub fn page(self, number: usize) -> Result<Page<T>, PaginationError> {
        if number < 1 {
            return Err(PaginationError::LessThanOne);
        }
        if number > self.num_pages() {
            return Err(PaginationError::NoResults);
        }
        Ok(self.slice(number))
    }

    /// Bounds-safe lookup: a missing or malformed number gives page 1, a number
    /// past the end gives the last page. Never fails.
    pub fn get_page(self, raw: Option<&str>) -> Page<T> {
        let number = match raw.map(|raw| self.validate_number(raw)) {
            None => 1,
            Some(Ok(number)) => number,
            Some(Err(PaginationError::NoResults)) => self.num_pages(),
            Some(Err(_)) => 1,
        };
        self.slice(number)
    }

    fn slice(self, number: usize) -> Page<T> {
        let number = number.clamp(1, self.num_pages());
        let num_pages = self.num_pages();
        let count = self.count();
        let items = self
            .items
            .into_iter()
            .skip((number - 1) * self.per_page)
            .take(self.per_page)
            .collect();
        Page {
            items,
            number,
            num_pages,
            count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
        }
    }
}
