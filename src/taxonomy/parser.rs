//! HTML extraction for the taxonomy pages.
//!
//! Every function here is pure: it takes page markup and the URL it came
//! from and returns typed nodes. Missing regions are reported as
//! `AcquisitionError::MissingMarkup` so callers can decide whether the
//! failure is fatal.

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use super::models::{CategoryNode, PaintingLink, RootListing};
use crate::acquisition::AcquisitionError;

const MOVEMENT_ITEM: &str = "li.dottedItem";
const ERA_HEADER: &str = "li.header";
const ERA_LABEL: &str = "span";
const ANCHOR: &str = "a";
const LINKED_ANCHOR: &str = "a[href]";
const ARTIST_REGION: &str = "div.masonry-text-view";
const PAINTING_REGION: &str = "ul.painting-list-text";
const IMAGE: &str = "img";

const MOVEMENT_SUFFIX: &str = "/text-list";
const ARTIST_SUFFIX: &str = "/all-works/text-list";

fn selector(css: &'static str) -> Result<Selector, AcquisitionError> {
    Selector::parse(css).map_err(|e| AcquisitionError::InvalidSelector {
        selector: css,
        reason: e.to_string(),
    })
}

fn join(base: &Url, href: &str) -> Result<Url, AcquisitionError> {
    base.join(href).map_err(|e| AcquisitionError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })
}

fn with_suffix(base: &Url, href: &str, suffix: &str) -> Result<Url, AcquisitionError> {
    join(base, &format!("{}{}", href.trim_end_matches('/'), suffix))
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Movement name from a listing label such as `"Abstract Expressionism 312"`.
///
/// The label is lower-cased, its trailing artist count is dropped and the
/// remaining words are joined with `_`.
pub fn movement_name_from_label(label: &str) -> String {
    let lowered = label.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    match words.split_last() {
        Some((_, rest)) => rest.join("_"),
        None => String::new(),
    }
}

/// Parse the root listing: the flat movement list and the era headers.
///
/// The first movement item on the page is a summary entry and is skipped.
pub fn parse_root_listing(html: &str, base: &Url) -> Result<RootListing, AcquisitionError> {
    let document = Html::parse_document(html);
    let movement_item = selector(MOVEMENT_ITEM)?;
    let anchor = selector(ANCHOR)?;
    let era_header = selector(ERA_HEADER)?;
    let era_label = selector(ERA_LABEL)?;

    let mut movements = Vec::new();
    for item in document.select(&movement_item).skip(1) {
        let Some(a) = item.select(&anchor).next() else {
            continue;
        };
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let name = movement_name_from_label(&element_text(&a));
        if name.is_empty() {
            continue;
        }
        movements.push(CategoryNode::movement(
            name,
            with_suffix(base, href, MOVEMENT_SUFFIX)?,
        ));
    }

    if movements.is_empty() {
        return Err(AcquisitionError::MissingMarkup {
            url: base.to_string(),
            what: "movement list",
        });
    }

    let eras = document
        .select(&era_header)
        .filter_map(|header| header.select(&era_label).next())
        .map(|span| element_text(&span))
        .filter(|label| !label.is_empty())
        .collect();

    Ok(RootListing { movements, eras })
}

/// Parse a movement's artist listing into artist nodes, in page order.
pub fn parse_artist_listing(
    html: &str,
    base: &Url,
    page_url: &Url,
) -> Result<Vec<CategoryNode>, AcquisitionError> {
    let document = Html::parse_document(html);
    let region = selector(ARTIST_REGION)?;
    let anchor = selector(LINKED_ANCHOR)?;

    let container = document
        .select(&region)
        .next()
        .ok_or_else(|| AcquisitionError::MissingMarkup {
            url: page_url.to_string(),
            what: "artist list",
        })?;

    let mut artists = Vec::new();
    for a in container.select(&anchor) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        artists.push(CategoryNode::artist(
            element_text(&a),
            with_suffix(base, href, ARTIST_SUFFIX)?,
        ));
    }
    Ok(artists)
}

/// Parse an artist's works listing into painting detail links, in page order.
pub fn parse_painting_listing(
    html: &str,
    base: &Url,
    page_url: &Url,
) -> Result<Vec<PaintingLink>, AcquisitionError> {
    let document = Html::parse_document(html);
    let region = selector(PAINTING_REGION)?;
    let anchor = selector(LINKED_ANCHOR)?;

    let container = document
        .select(&region)
        .next()
        .ok_or_else(|| AcquisitionError::MissingMarkup {
            url: page_url.to_string(),
            what: "painting list",
        })?;

    let mut paintings = Vec::new();
    for a in container.select(&anchor) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        paintings.push(PaintingLink {
            title: element_text(&a),
            link: join(base, href)?,
        });
    }
    Ok(paintings)
}

/// URL of the primary image on a painting detail page: the first `img`.
pub fn parse_primary_image(html: &str, page_url: &Url) -> Result<Url, AcquisitionError> {
    let document = Html::parse_document(html);
    let image = selector(IMAGE)?;

    let src = document
        .select(&image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| AcquisitionError::MissingMarkup {
            url: page_url.to_string(),
            what: "primary image",
        })?;
    join(page_url, src)
}
