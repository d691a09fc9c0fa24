use serde::Serialize;

/// How to find matching nodes in a rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Locator {
    /// Match elements carrying a CSS class
    ClassName(&'static str),
    /// Match elements by XPath expression
    XPath(&'static str),
}

/// Named transform applied to a located node instead of reading its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueReader {
    /// Read a DOM property, e.g. `src` or `href`
    Property(&'static str),
    /// Whitespace-split the node text and keep the last token
    LastToken,
}

/// Configuration for one logical field: how to locate it, how to read it,
/// how to fold multiple matches, and where it is stored.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub locator: Locator,
    /// When absent, the node's visible text is the raw value
    pub reader: Option<ValueReader>,
    /// Concatenates multiple distinct values into one scalar; when absent,
    /// a multi-match field stays a collection
    pub joiner: Option<&'static str>,
    pub table: &'static str,
    pub column: &'static str,
}

pub const SELLERS: &str = "sellers";
pub const LISTINGS: &str = "listings";
pub const PICTURES: &str = "listing_pictures";

/// Field the picture URLs are extracted under; the planner fans its values
/// out into one picture row each
pub const PICTURE_FIELD: &str = "image_url";

/// The whole extraction configuration. Adding, removing, or redirecting a
/// field means editing this table only; extraction and persistence read it.
/// Order here is the extraction and grouping order.
pub const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: PICTURE_FIELD,
        locator: Locator::ClassName("css-1bmvjcs"),
        reader: Some(ValueReader::Property("src")),
        joiner: None,
        table: PICTURES,
        column: "picture_url",
    },
    FieldDescriptor {
        name: "publication_date",
        locator: Locator::XPath("//span[@data-cy='ad-posted-at']"),
        reader: None,
        joiner: None,
        table: LISTINGS,
        column: "publication_date",
    },
    FieldDescriptor {
        name: "title",
        locator: Locator::XPath("//div[@data-cy='ad_title']/h4"),
        reader: None,
        joiner: Some("\n"),
        table: LISTINGS,
        column: "title",
    },
    FieldDescriptor {
        name: "price",
        locator: Locator::XPath("//div[@data-testid='ad-price-container']/h3"),
        reader: None,
        joiner: None,
        table: LISTINGS,
        column: "price",
    },
    FieldDescriptor {
        name: "options",
        locator: Locator::ClassName("css-rn93um"),
        reader: None,
        joiner: Some("\n"),
        table: LISTINGS,
        column: "options",
    },
    FieldDescriptor {
        name: "description",
        locator: Locator::XPath("//div[@data-cy='ad_description']/div"),
        reader: None,
        joiner: Some("\n"),
        table: LISTINGS,
        column: "description",
    },
    FieldDescriptor {
        name: "id",
        locator: Locator::ClassName("css-1i121pa"),
        reader: Some(ValueReader::LastToken),
        joiner: None,
        table: LISTINGS,
        column: "olx_id",
    },
    FieldDescriptor {
        name: "views",
        locator: Locator::XPath("//span[@data-testid='page-view-counter']"),
        reader: Some(ValueReader::LastToken),
        joiner: None,
        table: LISTINGS,
        column: "views",
    },
    FieldDescriptor {
        name: "seller_phone_number",
        locator: Locator::ClassName("css-v1ndtc"),
        reader: None,
        joiner: None,
        table: SELLERS,
        column: "phone_number",
    },
    FieldDescriptor {
        name: "seller_name",
        locator: Locator::ClassName("css-lyp0yk"),
        reader: None,
        joiner: None,
        table: SELLERS,
        column: "name",
    },
    FieldDescriptor {
        name: "seller_rating",
        locator: Locator::ClassName("css-450u1d"),
        reader: None,
        joiner: None,
        table: SELLERS,
        column: "rating",
    },
    FieldDescriptor {
        name: "seller_registration_date",
        locator: Locator::ClassName("css-1h2xv7i"),
        reader: None,
        joiner: None,
        table: SELLERS,
        column: "registration_date",
    },
    FieldDescriptor {
        name: "seller_last_online",
        locator: Locator::XPath("//p[@data-testid='lastSeenBox']/span"),
        reader: None,
        joiner: None,
        table: SELLERS,
        column: "last_online",
    },
    FieldDescriptor {
        name: "seller_location",
        locator: Locator::ClassName("css-13l8eec"),
        reader: None,
        joiner: None,
        table: SELLERS,
        column: "location",
    },
];

/// Look up a descriptor by field name
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|d| d.name == name)
}
