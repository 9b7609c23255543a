use serde::{Deserialize, Serialize};

/// One scraped vehicle listing
///
/// Every field is plain text as read from the detail page. Fields the
/// classifier never matched stay empty and serialize as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Primary heading of the detail page
    pub name: String,

    /// First text containing a currency symbol
    pub price: String,

    pub mileage: String,
    pub interior: String,
    pub engine: String,
    pub transmission: String,

    /// Fuel economy, usually "City / Highway"
    pub mpg: String,

    pub drive_train: String,
    pub exterior: String,
    pub bed_length: String,

    /// Absolute URL of the detail page
    pub link: String,
}

impl Listing {
    /// Create a listing with its fixed-position fields filled in
    pub fn new(name: String, price: String, link: String) -> Self {
        Self {
            name,
            price,
            link,
            ..Self::default()
        }
    }
}
