//! Font handling for PDF documents
//!
//! Two kinds of fonts are supported:
//! - the PDF base-14 standard fonts (no embedding, WinAnsi encoded text)
//! - TrueType fonts, embedded whole as CIDFontType2 with Identity-H encoding

use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::HashSet;

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Font style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// PDF base-14 fonts used by the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

/// Helvetica advance widths for WinAnsi codes 32..=126 (1/1000 em)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold advance widths for WinAnsi codes 32..=126 (1/1000 em)
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

impl StandardFont {
    /// PostScript name used as /BaseFont
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    /// Advance width of a character in 1/1000 em
    pub fn char_width(&self, c: char) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };

        match c {
            ' '..='~' => table[c as usize - 32],
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' => 1000,
            '\u{2018}' | '\u{2019}' => {
                if self.is_bold() {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' => {
                if self.is_bold() {
                    500
                } else {
                    333
                }
            }
            '\u{20AC}' => 556,
            '\u{00A0}' => 278,
            _ => 556,
        }
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 / 1000.0 * font_size
    }

    /// Simple font dictionary for this standard font
    pub fn to_pdf_dictionary(&self) -> Dictionary {
        Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type1".into()),
            ("BaseFont", self.base_font().into()),
            ("Encoding", "WinAnsiEncoding".into()),
        ])
    }
}

/// Map a character to its WinAnsiEncoding byte
///
/// Characters outside the encoding are replaced by `?`.
pub fn winansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        _ => b'?',
    }
}

#[derive(Debug, Clone)]
enum FontKind {
    Standard(StandardFont),
    TrueType {
        ttf_data: Vec<u8>,
        face: Option<ttf_parser::Face<'static>>,
    },
}

/// Font data for a single font variant
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Characters used (for the widths array and ToUnicode map)
    pub used_chars: HashSet<char>,
    kind: FontKind,
}

/// PDF objects generated for font embedding
pub enum FontObjects {
    /// Base-14 font, a single dictionary
    Simple(Dictionary),
    /// Embedded TrueType font
    Composite {
        /// Type0 font dictionary
        type0_font: Dictionary,
        /// CIDFont Type2 dictionary
        cid_font: Dictionary,
        /// Font descriptor dictionary
        font_descriptor: Dictionary,
        /// Font file stream (TTF data)
        font_file_stream: Stream,
        /// ToUnicode CMap stream
        tounicode_stream: Stream,
    },
}

/// Font family with variants
#[derive(Debug, Clone, Default)]
pub struct FontFamily {
    /// Regular variant (required)
    pub regular: Option<FontData>,
    /// Bold variant
    pub bold: Option<FontData>,
    /// Italic variant
    pub italic: Option<FontData>,
    /// Bold italic variant
    pub bold_italic: Option<FontData>,
}

impl FontFamily {
    /// The base-14 Helvetica family with all four variants
    pub fn helvetica(family_name: &str) -> Self {
        let variant = |weight, style, font| {
            Some(FontData::standard(
                &variant_name(family_name, weight, style),
                font,
            ))
        };
        Self {
            regular: variant(
                FontWeight::Regular,
                FontStyle::Normal,
                StandardFont::Helvetica,
            ),
            bold: variant(
                FontWeight::Bold,
                FontStyle::Normal,
                StandardFont::HelveticaBold,
            ),
            italic: variant(
                FontWeight::Regular,
                FontStyle::Italic,
                StandardFont::HelveticaOblique,
            ),
            bold_italic: variant(
                FontWeight::Bold,
                FontStyle::Italic,
                StandardFont::HelveticaBoldOblique,
            ),
        }
    }

    /// Get the font data for the specified weight and style
    /// Falls back to regular if requested variant is not available
    pub fn get_variant(&self, weight: FontWeight, style: FontStyle) -> Option<&FontData> {
        match (weight, style) {
            (FontWeight::Bold, FontStyle::Italic) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref())
                .or(self.regular.as_ref()),
            (FontWeight::Bold, FontStyle::Normal) => self.bold.as_ref().or(self.regular.as_ref()),
            (FontWeight::Regular, FontStyle::Italic) => {
                self.italic.as_ref().or(self.regular.as_ref())
            }
            (FontWeight::Regular, FontStyle::Normal) => self.regular.as_ref(),
        }
    }

    /// Iterate over all present variants
    pub fn variants(&self) -> impl Iterator<Item = &FontData> {
        [&self.regular, &self.bold, &self.italic, &self.bold_italic]
            .into_iter()
            .flatten()
    }

    /// Iterate mutably over all present variants
    pub fn variants_mut(&mut self) -> impl Iterator<Item = &mut FontData> {
        [
            &mut self.regular,
            &mut self.bold,
            &mut self.italic,
            &mut self.bold_italic,
        ]
        .into_iter()
        .flatten()
    }
}

/// Internal font name for a variant (for PDF resource naming)
pub fn variant_name(family_name: &str, weight: FontWeight, style: FontStyle) -> String {
    match (weight, style) {
        (FontWeight::Bold, FontStyle::Italic) => format!("{family_name}-bold-italic"),
        (FontWeight::Bold, FontStyle::Normal) => format!("{family_name}-bold"),
        (FontWeight::Regular, FontStyle::Italic) => format!("{family_name}-italic"),
        (FontWeight::Regular, FontStyle::Normal) => family_name.to_string(),
    }
}

/// Builder for registering TrueType font families
#[derive(Default)]
pub struct FontFamilyBuilder {
    regular: Option<Vec<u8>>,
    bold: Option<Vec<u8>>,
    italic: Option<Vec<u8>>,
    bold_italic: Option<Vec<u8>>,
}

impl FontFamilyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regular(mut self, ttf_data: Vec<u8>) -> Self {
        self.regular = Some(ttf_data);
        self
    }

    pub fn bold(mut self, ttf_data: Vec<u8>) -> Self {
        self.bold = Some(ttf_data);
        self
    }

    pub fn italic(mut self, ttf_data: Vec<u8>) -> Self {
        self.italic = Some(ttf_data);
        self
    }

    pub fn bold_italic(mut self, ttf_data: Vec<u8>) -> Self {
        self.bold_italic = Some(ttf_data);
        self
    }

    /// Build the FontFamily from the provided TTF data
    pub fn build(self, family_name: &str) -> Result<FontFamily> {
        let Some(regular) = self.regular else {
            return Err(PdfError::FontParseError(
                "FontFamily must have at least a regular variant".to_string(),
            ));
        };

        let load = |data: Vec<u8>, weight, style| {
            FontData::from_ttf(&variant_name(family_name, weight, style), &data)
        };

        Ok(FontFamily {
            regular: Some(load(regular, FontWeight::Regular, FontStyle::Normal)?),
            bold: self
                .bold
                .map(|data| load(data, FontWeight::Bold, FontStyle::Normal))
                .transpose()?,
            italic: self
                .italic
                .map(|data| load(data, FontWeight::Regular, FontStyle::Italic))
                .transpose()?,
            bold_italic: self
                .bold_italic
                .map(|data| load(data, FontWeight::Bold, FontStyle::Italic))
                .transpose()?,
        })
    }
}

impl FontData {
    /// Create font data for a base-14 font
    pub fn standard(name: &str, font: StandardFont) -> Self {
        Self {
            name: name.to_string(),
            used_chars: HashSet::new(),
            kind: FontKind::Standard(font),
        }
    }

    /// Create font data from TTF bytes
    ///
    /// # Arguments
    /// * `name` - Font identifier
    /// * `ttf_data` - TrueType font file bytes
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let data = ttf_data.to_vec();

        // The face borrows for 'static; fonts live as long as the document
        let static_data: &'static [u8] = Box::leak(data.clone().into_boxed_slice());

        let face = ttf_parser::Face::parse(static_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            used_chars: HashSet::new(),
            kind: FontKind::TrueType {
                ttf_data: data,
                face: Some(face),
            },
        })
    }

    /// Whether this is a base-14 font
    pub fn is_standard(&self) -> bool {
        matches!(self.kind, FontKind::Standard(_))
    }

    fn face(&self) -> Option<&ttf_parser::Face<'static>> {
        match &self.kind {
            FontKind::TrueType { face, .. } => face.as_ref(),
            FontKind::Standard(_) => None,
        }
    }

    /// Add characters to the used set
    pub fn add_chars(&mut self, text: &str) {
        for c in text.chars() {
            self.used_chars.insert(c);
        }
    }

    /// Get glyph ID for a character
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face()
            .and_then(|face| face.glyph_index(c).map(|id| id.0))
    }

    /// Get font units per em
    pub fn units_per_em(&self) -> u16 {
        self.face().map(|face| face.units_per_em()).unwrap_or(1000)
    }

    /// Get font ascender
    pub fn ascender(&self) -> i16 {
        match &self.kind {
            FontKind::Standard(_) => 718,
            FontKind::TrueType { face, .. } => {
                face.as_ref().map(|face| face.ascender()).unwrap_or(800)
            }
        }
    }

    /// Get font descender
    pub fn descender(&self) -> i16 {
        match &self.kind {
            FontKind::Standard(_) => -207,
            FontKind::TrueType { face, .. } => {
                face.as_ref().map(|face| face.descender()).unwrap_or(-200)
            }
        }
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        match &self.kind {
            FontKind::Standard(font) => text.chars().map(|c| font.char_width(c) as u32).sum(),
            FontKind::TrueType { face, .. } => {
                let Some(face) = face else {
                    return 0;
                };
                text.chars()
                    .filter_map(|c| {
                        let glyph_id = face.glyph_index(c)?;
                        face.glyph_hor_advance(glyph_id)
                    })
                    .map(|w| w as u32)
                    .sum()
            }
        }
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let width = self.text_width(text);
        let units_per_em = self.units_per_em() as f32;
        (width as f32 / units_per_em) * font_size
    }

    /// Encode text as hex string for PDF Tj operator
    ///
    /// Standard fonts use single-byte WinAnsi codes, embedded fonts use
    /// two-byte glyph IDs.
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut result = String::new();
        match &self.kind {
            FontKind::Standard(_) => {
                for c in text.chars() {
                    result.push_str(&format!("{:02X}", winansi_byte(c)));
                }
            }
            FontKind::TrueType { .. } => {
                for c in text.chars() {
                    let gid = self.glyph_id(c).unwrap_or(0);
                    result.push_str(&format!("{gid:04X}"));
                }
            }
        }
        format!("<{result}>")
    }

    /// Generate all PDF objects needed to embed this font
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let ttf_data = match &self.kind {
            FontKind::Standard(font) => return Ok(FontObjects::Simple(font.to_pdf_dictionary())),
            FontKind::TrueType { ttf_data, .. } => ttf_data,
        };

        let font_name = Object::Name(self.name.clone().into());

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(
            Dictionary::from_iter(vec![("Type", "CMap".into())]),
            tounicode_content.into_bytes(),
        );

        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![("Length1", (ttf_data.len() as i64).into())]),
            ttf_data.clone(),
        );

        let units_per_em = self.units_per_em() as i64;
        let ascender = self.ascender() as i64;
        let descender = self.descender() as i64;

        let font_bbox = vec![
            0.into(),
            descender.into(),
            units_per_em.into(),
            ascender.into(),
        ];

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()), // Symbolic font
            ("FontBBox", font_bbox.into()),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascender.into()),
            ("Descent", descender.into()),
            ("CapHeight", ascender.into()),
            ("StemV", 80.into()),
            ("FontFile2", Object::Reference((0, 0))), // set when embedding
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("FontDescriptor", Object::Reference((0, 0))), // set when embedding
            ("W", self.generate_widths_array().into()),
            ("DW", 1000.into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
            ("DescendantFonts", vec![Object::Reference((0, 0))].into()), // set when embedding
            ("ToUnicode", Object::Reference((0, 0))), // set when embedding
        ]);

        Ok(FontObjects::Composite {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate /W array for glyph widths, scaled to 1/1000 em
    fn generate_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::new();
        let Some(face) = self.face() else {
            return widths;
        };
        let scale = 1000.0 / face.units_per_em() as f32;

        let mut gids: Vec<u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| self.glyph_id(c))
            .collect();
        gids.sort();
        gids.dedup();

        // Individual mapping format: [gid1 [width1] gid2 [width2] ...]
        for gid in gids {
            let advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(gid))
                .map(|a| (a as f32 * scale).round() as i64)
                .unwrap_or(1000);
            widths.push((gid as i64).into());
            widths.push(vec![advance.into()].into());
        }

        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let mut char_list: Vec<char> = self.used_chars.iter().copied().collect();
        char_list.sort_by_key(|c| *c as u32);

        // bfchar sections are limited to 100 entries
        for chunk in char_list.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for c in chunk {
                let gid = self.glyph_id(*c).unwrap_or(0);
                let unicode = *c as u32;
                cmap.push_str(&format!("<{gid:04X}> <{unicode:04X}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}
