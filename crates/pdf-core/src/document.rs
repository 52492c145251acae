//! PDF Document wrapper

use crate::font::BuiltinFont;
use crate::overlay::Overlay;
use crate::{PdfError, Result};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use std::path::Path;

/// Depth limit when following `/Parent` links of the page tree
const MAX_INHERITANCE_DEPTH: usize = 10;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF Document wrapper providing high-level operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
}

impl PdfDocument {
    /// Open a PDF document from a file path
    ///
    /// A missing file is reported as [`PdfError::TemplateNotFound`].
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("template.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PdfError::TemplateNotFound(path.display().to_string()));
        }

        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Create a document with a single empty page of the given size
    pub fn blank(width: f64, height: f64) -> Result<Self> {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.new_object_id();
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width as _),
                Object::Real(height as _),
            ]),
        );
        page_dict.set("Resources", Object::Dictionary(Dictionary::new()));
        let page_id = inner.add_object(Object::Dictionary(page_dict));

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages_dict.set("Count", Object::Integer(1));
        inner
            .objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = inner.add_object(Object::Dictionary(catalog));
        inner.trailer.set("Root", Object::Reference(catalog_id));

        Ok(Self { inner })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Composite an overlay on top of a page
    ///
    /// The page's existing content is wrapped in `q`/`Q` so graphics state
    /// left behind by the template cannot leak into the overlay.
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `overlay` - Overlay to draw over the page
    pub fn stamp_overlay(&mut self, page: usize, overlay: &Overlay) -> Result<()> {
        let page_id = self.page_id(page)?;

        if overlay.is_empty() {
            return Ok(());
        }

        let fonts: Vec<BuiltinFont> = overlay.fonts().collect();
        if !fonts.is_empty() {
            self.add_fonts_to_page_resources(page_id, &fonts)?;
        }

        self.append_to_content_stream(page_id, overlay.content())
    }

    /// Drop every page after the first one
    pub fn retain_first_page(&mut self) -> Result<()> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::InvalidPage(1, 0));
        }

        if page_count > 1 {
            let extra: Vec<u32> = (2..=page_count as u32).collect();
            self.inner.delete_pages(&extra);
            self.inner.prune_objects();
        }

        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Object id of a 1-indexed page
    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        if page == 0 || page > pages.len() {
            return Err(PdfError::InvalidPage(page, pages.len()));
        }

        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    /// Follow a reference to the object it points at
    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.inner.get_object(*id)?),
            other => Ok(other),
        }
    }

    /// Look up a page attribute, following the `/Parent` chain for
    /// inheritable keys (MediaBox, Resources)
    fn inherited_attribute(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
        let mut current_id = page_id;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(value) = dict.get(key) {
                return Ok(Some(self.resolve(value)?.clone()));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(None)
    }

    /// Register built-in fonts in a page's Resources dictionary
    ///
    /// Inherited or referenced resources are copied onto the page itself so
    /// the template's own fonts and images stay reachable.
    fn add_fonts_to_page_resources(
        &mut self,
        page_id: ObjectId,
        fonts: &[BuiltinFont],
    ) -> Result<()> {
        let mut resources_dict = match self.inherited_attribute(page_id, b"Resources")? {
            Some(Object::Dictionary(dict)) => dict,
            _ => Dictionary::new(),
        };

        let mut font_dict = match resources_dict.get(b"Font") {
            Ok(font) => match self.resolve(font)?.as_dict() {
                Ok(dict) => dict.clone(),
                Err(_) => Dictionary::new(),
            },
            Err(_) => Dictionary::new(),
        };

        for font in fonts {
            if font_dict.has(font.resource_name().as_bytes()) {
                continue;
            }
            let font_id = self.inner.add_object(Object::Dictionary(font.to_pdf_dict()));
            font_dict.set(font.resource_name(), Object::Reference(font_id));
        }

        resources_dict.set("Font", Object::Dictionary(font_dict));

        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?
            .clone();
        page_dict.set("Resources", Object::Dictionary(resources_dict));
        self.inner.objects.insert(page_id, Object::Dictionary(page_dict));

        Ok(())
    }

    /// Decoded bytes of a page's content, concatenating arrays of streams
    fn page_content(&self, page_dict: &Dictionary) -> Result<Vec<u8>> {
        match page_dict.get(b"Contents") {
            Ok(Object::Stream(stream)) => decoded_content(stream),
            Ok(Object::Reference(ref_id)) => match self.inner.get_object(*ref_id) {
                Ok(Object::Stream(stream)) => decoded_content(stream),
                Ok(Object::Array(arr)) => self.concat_streams(arr),
                _ => Ok(Vec::new()),
            },
            Ok(Object::Array(arr)) => self.concat_streams(arr),
            _ => Ok(Vec::new()),
        }
    }

    fn concat_streams(&self, arr: &[Object]) -> Result<Vec<u8>> {
        let mut combined = Vec::new();
        for obj in arr {
            let stream = match obj {
                Object::Reference(ref_id) => match self.inner.get_object(*ref_id) {
                    Ok(Object::Stream(stream)) => stream,
                    _ => continue,
                },
                Object::Stream(stream) => stream,
                _ => continue,
            };
            combined.extend_from_slice(&decoded_content(stream)?);
            combined.push(b'\n');
        }
        Ok(combined)
    }

    /// Append content to a page's content stream
    ///
    /// Writes a single new compressed stream object holding the isolated
    /// original content followed by `content`.
    fn append_to_content_stream(&mut self, page_id: ObjectId, content: &[u8]) -> Result<()> {
        let mut page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?
            .clone();

        let existing_content = self.page_content(&page_dict)?;

        let mut new_content = Vec::with_capacity(existing_content.len() + content.len() + 8);
        if !existing_content.is_empty() {
            new_content.extend_from_slice(b"q\n");
            new_content.extend_from_slice(&existing_content);
            new_content.extend_from_slice(b"\nQ\n");
        }
        new_content.extend_from_slice(content);

        let stream_id = self.inner.add_object(compressed_stream(&new_content)?);
        page_dict.set("Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, Object::Dictionary(page_dict));

        Ok(())
    }
}

/// Content of a stream with its filters undone
///
/// Unfiltered streams are returned as stored. A filter that cannot be decoded
/// is an error, since re-encoding the raw bytes would corrupt the page.
fn decoded_content(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| PdfError::ParseError(format!("Cannot decode page content: {e}")))
}

/// Build a FlateDecode stream from raw content
fn compressed_stream(content: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content)?;
    let compressed = encoder.finish()?;

    let mut dict = Dictionary::new();
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    Ok(Stream::new(dict, compressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Align;

    #[test]
    fn test_blank_document() {
        let doc = PdfDocument::blank(612.0, 792.0).unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_invalid_page() {
        let mut doc = PdfDocument::blank(612.0, 792.0).unwrap();
        let overlay = Overlay::letter();
        assert!(matches!(
            doc.stamp_overlay(2, &overlay),
            Err(PdfError::InvalidPage(2, 1))
        ));
    }

    #[test]
    fn test_undecodable_content_is_an_error() {
        let mut doc = PdfDocument::blank(612.0, 792.0).unwrap();
        let page_id = doc.page_id(1).unwrap();

        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        let stream_id = doc
            .inner
            .add_object(Stream::new(dict, b"\xff\xd8not content".to_vec()));
        let mut page = doc.inner.get_object(page_id).unwrap().as_dict().unwrap().clone();
        page.set("Contents", Object::Reference(stream_id));
        doc.inner.objects.insert(page_id, Object::Dictionary(page));

        let mut overlay = Overlay::letter();
        overlay.draw_text("Acme", 73.0, 656.0, Align::Left);
        assert!(matches!(
            doc.stamp_overlay(1, &overlay),
            Err(PdfError::ParseError(_))
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = PdfDocument::open("/definitely/not/here/template.pdf");
        assert!(matches!(result, Err(PdfError::TemplateNotFound(_))));
    }

    #[test]
    fn test_stamp_adds_font_resources() {
        let mut doc = PdfDocument::blank(612.0, 792.0).unwrap();
        let mut overlay = Overlay::letter();
        overlay.set_font(BuiltinFont::TimesRoman, 11.0);
        overlay.draw_text("07-03-2024", 467.0, 715.0, Align::Left);
        doc.stamp_overlay(1, &overlay).unwrap();

        let page_id = doc.page_id(1).unwrap();
        let resources = doc.inherited_attribute(page_id, b"Resources").unwrap().unwrap();
        let fonts = resources.as_dict().unwrap().get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(b"BpTimesRoman"));
        assert!(!fonts.has(b"BpTimesBold"));
    }
}
