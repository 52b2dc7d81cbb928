use scraper::{ElementRef, Html};

/// A parsed dashboard page.
///
/// Only lookups by element id are needed: data slots are found by id and so
/// are the drawing surfaces.
pub struct Page {
    html: Html,
}

impl Page {
    /// Parse an HTML document. Parsing is lenient and never fails.
    pub fn parse(source: &str) -> Self {
        Page {
            html: Html::parse_document(source),
        }
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        // first match in document order, like getElementById
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id))
    }

    /// Text content of the element with the given id, if there is one
    pub fn text_of(&self, id: &str) -> Option<String> {
        self.element_by_id(id).map(|el| el.text().collect::<String>())
    }

    /// Check whether an element with the given id exists
    pub fn has_element(&self, id: &str) -> bool {
        self.element_by_id(id).is_some()
    }
}
