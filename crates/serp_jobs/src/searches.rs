//! Domain-specific search intents and the target URLs they scrape.

use chrono::NaiveDate;
use url::form_urlencoded::byte_serialize;

/// A page to scrape plus the query parameters appended to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl SearchTarget {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct FlightQuery {
    /// Encoded Google Flights search (`tfs` parameter)
    pub tfs: String,
    pub language: String,
    pub currency: String,
}

impl FlightQuery {
    const SEARCH_URL: &str = "https://www.google.com/travel/flights/search";

    pub fn new(tfs: impl Into<String>) -> Self {
        Self {
            tfs: tfs.into(),
            language: "en".into(),
            currency: "USD".into(),
        }
    }

    pub fn target(&self) -> SearchTarget {
        SearchTarget::new(Self::SEARCH_URL)
            .param("tfs", &self.tfs)
            .param("hl", &self.language)
            .param("curr", &self.currency)
    }
}

#[derive(Debug, Clone)]
pub struct HotelQuery {
    pub location: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub occupancy: Option<String>,
    pub currency: String,
    pub free_cancellation: bool,
    pub accommodation_type: String,
}

impl HotelQuery {
    const SEARCH_URL: &str = "https://www.google.com/travel/search";

    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            check_in: None,
            check_out: None,
            occupancy: None,
            currency: "USD".into(),
            free_cancellation: false,
            accommodation_type: "hotels".into(),
        }
    }

    pub fn with_dates(mut self, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        self.check_in = Some(check_in);
        self.check_out = Some(check_out);
        self
    }

    pub fn with_occupancy(mut self, occupancy: impl Into<String>) -> Self {
        self.occupancy = Some(occupancy.into());
        self
    }

    pub fn target(&self) -> SearchTarget {
        let location = byte_serialize(self.location.as_bytes()).collect::<String>();
        let mut target = SearchTarget::new(format!("{}?q={location}", Self::SEARCH_URL))
            .param("brd_currency", &self.currency);

        // dates are only meaningful as a pair
        if let (Some(check_in), Some(check_out)) = (self.check_in, self.check_out) {
            target = target.param(
                "brd_dates",
                format!(
                    "{},{}",
                    check_in.format("%Y-%m-%d"),
                    check_out.format("%Y-%m-%d")
                ),
            );
        }
        if let Some(occupancy) = self.occupancy.as_deref().filter(|o| !o.is_empty()) {
            target = target.param("brd_occupancy", occupancy);
        }
        if self.free_cancellation {
            target = target.param("brd_free_cancellation", "true");
        }
        if !self.accommodation_type.is_empty() {
            target = target.param("brd_accommodation_type", &self.accommodation_type);
        }
        target
    }
}

#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub keyword: String,
    pub country: String,
    pub language: String,
}

impl NewsQuery {
    const SEARCH_URL: &str = "https://www.google.com/search";

    pub fn new(keyword: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            country: country.into(),
            language: "en".into(),
        }
    }

    pub fn target(&self) -> SearchTarget {
        let keyword = byte_serialize(self.keyword.as_bytes()).collect::<String>();
        SearchTarget::new(format!("{}?q={keyword}", Self::SEARCH_URL))
            .param("tbm", "nws")
            .param("gl", &self.country)
            .param("hl", &self.language)
    }
}
