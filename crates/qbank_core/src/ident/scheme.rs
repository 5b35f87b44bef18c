//! Category to identifier-strategy lookup table.

use crate::model::category::Category;
use once_cell::sync::Lazy;
use regex::Regex;

static WFD_CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9]+ WFD$").expect("valid wfd identifier regex"));
static RS_CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9]+ RS$").expect("valid rs identifier regex"));
static RA_CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RA[0-9]{3,}$").expect("valid ra identifier regex"));

/// Formatting strategy for a category's identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierStyle {
    /// `#<digits> <TAG>`, digits kept verbatim.
    HashTagged,
    /// `<TAG><digits>`, digits left-padded with zeros to `width`.
    ZeroPadded { width: usize },
}

struct CategoryScheme {
    category: Category,
    style: IdentifierStyle,
    pattern: &'static Lazy<Regex>,
}

static SCHEMES: [CategoryScheme; 3] = [
    CategoryScheme {
        category: Category::Wfd,
        style: IdentifierStyle::HashTagged,
        pattern: &WFD_CANONICAL_RE,
    },
    CategoryScheme {
        category: Category::Rs,
        style: IdentifierStyle::HashTagged,
        pattern: &RS_CANONICAL_RE,
    },
    CategoryScheme {
        category: Category::Ra,
        style: IdentifierStyle::ZeroPadded { width: 3 },
        pattern: &RA_CANONICAL_RE,
    },
];

fn scheme_for(category: Category) -> &'static CategoryScheme {
    let index = match category {
        Category::Wfd => 0,
        Category::Rs => 1,
        Category::Ra => 2,
    };
    &SCHEMES[index]
}

impl IdentifierStyle {
    /// Returns the identifier style registered for `category`.
    pub fn for_category(category: Category) -> Self {
        scheme_for(category).style
    }
}

/// Formats a run of decimal digits as the canonical identifier of `category`.
///
/// Zero-padded styles never truncate: digits longer than the width are kept.
pub fn format_identifier(category: Category, digits: &str) -> String {
    match IdentifierStyle::for_category(category) {
        IdentifierStyle::HashTagged => format!("#{digits} {}", category.tag()),
        IdentifierStyle::ZeroPadded { width } => {
            format!("{}{digits:0>width$}", category.tag())
        }
    }
}

/// Returns whether `value` is exactly the canonical form for `category`.
pub fn is_canonical_for(category: Category, value: &str) -> bool {
    scheme_for(category).pattern.is_match(value)
}

/// Returns the category whose canonical pattern `value` matches, if any.
pub fn canonical_category(value: &str) -> Option<Category> {
    SCHEMES
        .iter()
        .find(|scheme| scheme.pattern.is_match(value))
        .map(|scheme| scheme.category)
}
