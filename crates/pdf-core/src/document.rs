//! PDF document writer

use crate::graphics::{
    generate_fill_rect_operators, generate_line_operators, generate_stroke_rect_operators,
    StrokeStyle,
};
use crate::image::{
    calculate_scaled_dimensions, generate_image_operators, ImageScaleMode, ImageXObject,
};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, FontData, FontFamily, FontFamilyBuilder, FontObjects, PdfError, Result};
use crate::{FontStyle, FontWeight};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Name of the built-in base-14 family registered by [`PdfDocument::new`]
pub const DEFAULT_FAMILY: &str = "helvetica";

/// A4 portrait in points
pub const A4_WIDTH_PT: f64 = 595.28;
pub const A4_HEIGHT_PT: f64 = 841.89;

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

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Neutral gray of the given level (0.0 black - 1.0 white)
    pub fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// One page of the document being written
struct PageEntry {
    id: ObjectId,
    width: f64,
    height: f64,
}

/// PDF document writer
///
/// Coordinates passed to drawing methods are in points with the origin at
/// the top-left corner of the page; they are converted to PDF's
/// bottom-left origin internally. Content is buffered per page and
/// written, together with fonts, by [`PdfDocument::to_bytes`].
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Page tree root
    pages_id: ObjectId,
    /// Pages in order
    pages: Vec<PageEntry>,
    /// Registered font families
    font_families: HashMap<String, FontFamily>,
    /// Current font family name
    current_family: String,
    /// Current font weight
    current_weight: FontWeight,
    /// Current font style
    current_style: FontStyle,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Embedded fonts (font name -> PDF object ID)
    embedded_fonts: HashMap<String, ObjectId>,
    /// Page font resources (page number -> font name -> resource name)
    page_font_resources: HashMap<usize, HashMap<String, String>>,
    /// Next font resource number
    next_font_resource: u32,
    /// Embedded images (data hash -> PDF object ID)
    embedded_images: HashMap<u64, ObjectId>,
    /// Page image resources (page number -> resource name -> object ID)
    page_image_resources: HashMap<usize, BTreeMap<String, ObjectId>>,
    /// Next image resource number
    next_image_resource: u32,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an empty document with no pages
    ///
    /// The base-14 Helvetica family is registered as `"helvetica"` and
    /// selected at 12pt.
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::new();
    /// let page = doc.add_page(A4_WIDTH_PT, A4_HEIGHT_PT)?;
    /// doc.insert_text("Hello", page, 72.0, 72.0, Align::Left)?;
    /// let bytes = doc.to_bytes()?;
    /// ```
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.7");

        let pages_id = inner.add_object(dictionary! {
            "Type" => "Pages",
            "Count" => 0,
            "Kids" => Vec::<Object>::new(),
        });
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        let mut font_families = HashMap::new();
        font_families.insert(
            DEFAULT_FAMILY.to_string(),
            FontFamily::helvetica(DEFAULT_FAMILY),
        );

        Self {
            inner,
            pages_id,
            pages: Vec::new(),
            font_families,
            current_family: DEFAULT_FAMILY.to_string(),
            current_weight: FontWeight::default(),
            current_style: FontStyle::default(),
            current_font_size: 12.0,
            current_text_color: Color::default(),
            embedded_fonts: HashMap::new(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            embedded_images: HashMap::new(),
            page_image_resources: HashMap::new(),
            next_image_resource: 1,
            page_content_buffer: HashMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get the size of a page in points as (width, height)
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let entry = self.page(page)?;
        Ok((entry.width, entry.height))
    }

    /// Append a blank page
    ///
    /// # Arguments
    /// * `width` - Page width in points
    /// * `height` - Page height in points
    ///
    /// # Returns
    /// New page number (1-indexed)
    pub fn add_page(&mut self, width: f64, height: f64) -> Result<usize> {
        if !(width > 0.0 && height > 0.0) {
            return Err(PdfError::InvalidPageSize(width, height));
        }

        let contents_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), Vec::new()));

        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => Dictionary::new(),
            "Contents" => contents_id,
        });

        self.pages.push(PageEntry {
            id: page_id,
            width,
            height,
        });
        self.update_page_tree()?;

        Ok(self.pages.len())
    }

    /// Rewrite the Kids/Count entries of the page tree root
    fn update_page_tree(&mut self) -> Result<()> {
        let kids: Vec<Object> = self
            .pages
            .iter()
            .map(|p| Object::Reference(p.id))
            .collect();

        let pages_dict = self
            .inner
            .get_object_mut(self.pages_id)?
            .as_dict_mut()
            .map_err(|_| PdfError::ParseError("Pages object is not a dictionary".to_string()))?;
        pages_dict.set("Count", Object::Integer(kids.len() as i64));
        pages_dict.set("Kids", Object::Array(kids));

        Ok(())
    }

    fn page(&self, page: usize) -> Result<&PageEntry> {
        if page == 0 || page > self.pages.len() {
            return Err(PdfError::InvalidPage(page, self.pages.len()));
        }
        Ok(&self.pages[page - 1])
    }

    /// Convert a top-origin Y coordinate to PDF bottom-origin
    fn pdf_y(&self, page: usize, y: f64) -> Result<f64> {
        Ok(self.page(page)?.height - y)
    }

    /// Register a TrueType font family with its variants
    ///
    /// # Arguments
    /// * `name` - Font family name
    /// * `builder` - FontFamilyBuilder with variant data
    ///
    /// # Example
    /// ```ignore
    /// doc.register_font_family("brand",
    ///     FontFamilyBuilder::new()
    ///         .regular(std::fs::read("Brand-Regular.ttf")?)
    ///         .bold(std::fs::read("Brand-Bold.ttf")?)
    /// )?;
    /// ```
    pub fn register_font_family(&mut self, name: &str, builder: FontFamilyBuilder) -> Result<()> {
        if self.font_families.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }

        let family = builder.build(name)?;
        self.font_families.insert(name.to_string(), family);

        Ok(())
    }

    /// Set the current font family and size
    ///
    /// # Arguments
    /// * `family` - Font family name
    /// * `size` - Font size in points
    pub fn set_font(&mut self, family: &str, size: f32) -> Result<()> {
        if !self.font_families.contains_key(family) {
            return Err(PdfError::FontNotFound(family.to_string()));
        }

        self.current_family = family.to_string();
        self.current_font_size = size;

        Ok(())
    }

    /// Set only the font size (keeps current family/weight/style)
    pub fn set_font_size(&mut self, size: f32) {
        self.current_font_size = size;
    }

    /// Set the font weight (keeps current family/size/style)
    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.current_weight = weight;
    }

    /// Set the font style (keeps current family/size/weight)
    pub fn set_font_style(&mut self, style: FontStyle) {
        self.current_style = style;
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Get the current font size in points
    pub fn font_size(&self) -> f32 {
        self.current_font_size
    }

    /// Resolve the font variant for the current family, weight and style
    fn current_font(&self) -> Result<&FontData> {
        self.font_families
            .get(&self.current_family)
            .and_then(|family| family.get_variant(self.current_weight, self.current_style))
            .ok_or_else(|| PdfError::FontNotFound(self.current_family.clone()))
    }

    /// Find font data by variant name
    fn font_data_mut(&mut self, name: &str) -> Result<&mut FontData> {
        self.font_families
            .values_mut()
            .flat_map(|family| family.variants_mut())
            .find(|variant| variant.name == name)
            .ok_or_else(|| PdfError::FontNotFound(name.to_string()))
    }

    /// Get current font's text width for a string, in points
    ///
    /// # Example
    /// ```ignore
    /// doc.set_font("helvetica", 12.0)?;
    /// let width = doc.get_text_width("Hello")?;
    /// ```
    pub fn get_text_width(&self, text: &str) -> Result<f64> {
        let font = self.current_font()?;
        Ok(font.text_width_points(text, self.current_font_size) as f64)
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X anchor in points; meaning depends on `align`
    /// * `y` - Baseline Y coordinate in points (from top)
    /// * `align` - Text alignment relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let pdf_y = self.pdf_y(page, y)?;

        if text.is_empty() {
            return Ok(());
        }

        let (font_name, text_hex, text_width) = {
            let font = self.current_font()?;
            (
                font.name.clone(),
                font.encode_text_hex(text),
                font.text_width_points(text, self.current_font_size) as f64,
            )
        };

        // Track characters for the widths array and ToUnicode map
        self.font_data_mut(&font_name)?.add_chars(text);

        let ctx = TextRenderContext {
            font_name: self.get_or_create_font_ref(&font_name, page),
            font_size: self.current_font_size,
            text_width,
            color: self.current_text_color,
        };

        let operators = generate_text_operators(&text_hex, x, pdf_y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw a straight line between two points (top-origin)
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        style: &StrokeStyle,
    ) -> Result<()> {
        let y1 = self.pdf_y(page, y1)?;
        let y2 = self.pdf_y(page, y2)?;
        let operators = generate_line_operators(x1, y1, x2, y2, style);
        self.buffer_content(page, &operators);
        Ok(())
    }

    /// Fill a rectangle whose top-left corner is at (x, y)
    pub fn fill_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    ) -> Result<()> {
        let bottom = self.pdf_y(page, y + height)?;
        let operators = generate_fill_rect_operators(x, bottom, width, height, color);
        self.buffer_content(page, &operators);
        Ok(())
    }

    /// Stroke the outline of a rectangle whose top-left corner is at (x, y)
    pub fn stroke_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: &StrokeStyle,
    ) -> Result<()> {
        let bottom = self.pdf_y(page, y + height)?;
        let operators = generate_stroke_rect_operators(x, bottom, width, height, style);
        self.buffer_content(page, &operators);
        Ok(())
    }

    /// Insert an image with its top-left corner at (x, y)
    ///
    /// # Arguments
    /// * `image` - Decoded image
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `width` - Target width in points
    /// * `height` - Target height in points
    /// * `mode` - Scaling mode
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image(
        &mut self,
        image: &ImageXObject,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        let (actual_width, actual_height) =
            calculate_scaled_dimensions(image.width, image.height, width, height, mode);
        let pdf_y = self.pdf_y(page, y + actual_height)?;

        let image_resource_name = self.get_or_create_image_ref(image, page)?;

        let operators =
            generate_image_operators(&image_resource_name, x, pdf_y, actual_width, actual_height);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;
        self.embed_fonts()?;
        self.finalize_page_resources()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Embed every font variant that has been used
    fn embed_fonts(&mut self) -> Result<()> {
        let mut used: Vec<(String, FontObjects)> = Vec::new();
        for font in self.font_families.values().flat_map(|f| f.variants()) {
            if !font.used_chars.is_empty() && !self.embedded_fonts.contains_key(&font.name) {
                used.push((font.name.clone(), font.to_pdf_objects()?));
            }
        }

        for (font_name, objects) in used {
            let font_id = self.embed_font_objects(objects);
            self.embedded_fonts.insert(font_name, font_id);
        }

        Ok(())
    }

    /// Add font objects to the document, wiring up internal references
    fn embed_font_objects(&mut self, objects: FontObjects) -> ObjectId {
        match objects {
            FontObjects::Simple(dict) => self.inner.add_object(dict),
            FontObjects::Composite {
                type0_font,
                mut cid_font,
                mut font_descriptor,
                font_file_stream,
                tounicode_stream,
            } => {
                let font_file_id = self.inner.add_object(font_file_stream);
                font_descriptor.set("FontFile2", Object::Reference(font_file_id));
                let font_descriptor_id = self.inner.add_object(font_descriptor);

                cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
                let cid_font_id = self.inner.add_object(cid_font);

                let tounicode_id = self.inner.add_object(tounicode_stream);

                let mut type0_font = type0_font;
                type0_font.set(
                    "DescendantFonts",
                    Object::Array(vec![Object::Reference(cid_font_id)]),
                );
                type0_font.set("ToUnicode", Object::Reference(tounicode_id));
                self.inner.add_object(type0_font)
            }
        }
    }

    /// Get or create a font resource name for a specific page
    ///
    /// Returns the resource name (e.g., "F1", "F2") for use in content streams.
    /// The font itself is embedded at save time.
    fn get_or_create_font_ref(&mut self, font_name: &str, page: usize) -> String {
        let page_resources = self.page_font_resources.entry(page).or_default();

        if let Some(resource_name) = page_resources.get(font_name) {
            return resource_name.clone();
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        page_resources.insert(font_name.to_string(), resource_name.clone());

        resource_name
    }

    /// Get or create an image resource name for a specific page
    ///
    /// Images are embedded once per distinct content and shared by all pages.
    fn get_or_create_image_ref(&mut self, image: &ImageXObject, page: usize) -> Result<String> {
        self.page(page)?;

        let data_hash = image.content_hash();
        let object_id = match self.embedded_images.get(&data_hash) {
            Some(id) => *id,
            None => {
                let id = self.inner.add_object(image.to_pdf_stream());
                self.embedded_images.insert(data_hash, id);
                id
            }
        };

        let page_resources = self.page_image_resources.entry(page).or_default();
        if let Some((name, _)) = page_resources.iter().find(|(_, id)| **id == object_id) {
            return Ok(name.clone());
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        Ok(resource_name)
    }

    /// Write Font and XObject dictionaries into each page's Resources
    fn finalize_page_resources(&mut self) -> Result<()> {
        for page in 1..=self.pages.len() {
            let mut fonts = Dictionary::new();
            if let Some(resources) = self.page_font_resources.get(&page) {
                for (font_name, resource_name) in resources {
                    let font_id = self
                        .embedded_fonts
                        .get(font_name)
                        .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
                    fonts.set(resource_name.as_bytes(), Object::Reference(*font_id));
                }
            }

            let mut xobjects = Dictionary::new();
            if let Some(resources) = self.page_image_resources.get(&page) {
                for (resource_name, object_id) in resources {
                    xobjects.set(resource_name.as_bytes(), Object::Reference(*object_id));
                }
            }

            let mut resources = Dictionary::new();
            if !fonts.is_empty() {
                resources.set("Font", fonts);
            }
            if !xobjects.is_empty() {
                resources.set("XObject", xobjects);
            }

            let page_id = self.pages[page - 1].id;
            self.inner
                .get_object_mut(page_id)?
                .as_dict_mut()
                .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?
                .set("Resources", resources);
        }

        Ok(())
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Append all buffered operators to their pages' content streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page(page)?.id;

        let contents_id = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?
            .get(b"Contents")?
            .as_reference()
            .map_err(|_| PdfError::ParseError("Page Contents is not a reference".to_string()))?;

        let stream = self
            .inner
            .get_object_mut(contents_id)?
            .as_stream_mut()
            .map_err(|_| PdfError::ParseError("Page Contents is not a stream".to_string()))?;

        let mut new_content = stream.content.clone();
        new_content.extend_from_slice(content);
        stream.set_content(new_content);

        Ok(())
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}
