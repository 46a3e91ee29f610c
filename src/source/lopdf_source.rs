//! [`DocumentSource`] backed by lopdf.
//!
//! Text spans come from walking each page's content stream and tracking the
//! text matrix; the outline comes from `/Outlines`; images come from the
//! page's `/XObject` resources.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use super::{decode_text_simple, DocumentSource};
use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::{ImageRef, Metadata, OutlineEntry, RawImage, Span};

/// Guard against cyclic or absurdly deep object graphs.
const MAX_DEPTH: usize = 64;
/// Safety limit on outline siblings at one level.
const MAX_SIBLINGS: usize = 10_000;
/// TJ adjustment (thousandths of an em) treated as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A PDF opened with lopdf.
pub struct LopdfSource {
    doc: LopdfDocument,
    /// Page object ids by 0-based index
    pages: Vec<ObjectId>,
    /// 1-based page numbers by page object id
    page_numbers: HashMap<ObjectId, u32>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let page_map: BTreeMap<u32, ObjectId> = doc.get_pages();
        let pages: Vec<ObjectId> = page_map.values().copied().collect();
        let page_numbers = page_map.iter().map(|(num, id)| (*id, *num)).collect();
        log::debug!("opened PDF {} with {} pages", doc.version, pages.len());
        Self {
            doc,
            pages,
            page_numbers,
        }
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page_index: u32) -> Result<ObjectId> {
        self.pages
            .get(page_index as usize)
            .copied()
            .ok_or(Error::PageOutOfRange {
                page: i64::from(page_index) + 1,
                total: self.pages.len() as u32,
            })
    }

    /// Follow a single indirect reference.
    fn deref<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn dict_get<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        dict.get(key).ok().and_then(|obj| self.deref(obj))
    }

    fn dict_string(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        match self.dict_get(dict, key)? {
            Object::String(bytes, _) => Some(decode_text_simple(bytes)),
            Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Content streams
    // -----------------------------------------------------------------------

    /// Decompressed content stream bytes for a page; empty for pages
    /// without `/Contents`.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => s
                    .decompressed_content()
                    .or_else(|_| Ok(s.content.clone())),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Some(Object::Stream(s)) = self.deref(obj) {
                if let Ok(data) = s.decompressed_content() {
                    content.extend_from_slice(&data);
                    content.push(b' ');
                }
            }
        }
        content
    }

    /// Walk a page's content stream, emitting one span per text-showing
    /// operator.
    fn parse_spans(&self, page_id: ObjectId, page_index: u32) -> Result<Vec<Span>> {
        let data = self.page_content(page_id)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let base_fonts: HashMap<&[u8], String> = fonts
            .iter()
            .map(|(name, dict)| {
                let base = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                (name.as_slice(), base)
            })
            .collect();

        let content = Content::decode(&data).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut font_name = String::new();
        let mut encoding = None;
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in &content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix = TextMatrix::default();
                }
                "ET" => in_text_block = false,
                "Tf" if op.operands.len() >= 2 => {
                    if let Object::Name(name) = &op.operands[0] {
                        font_name = base_fonts
                            .get(name.as_slice())
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        encoding = fonts
                            .get(name)
                            .and_then(|f| f.get_font_encoding(&self.doc).ok());
                    }
                    font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" if op.operands.len() >= 2 => {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        matrix.leading = -ty;
                    }
                    matrix.translate(tx, ty);
                }
                "Tm" if op.operands.len() >= 6 => {
                    let n = |i: usize, default: f32| get_number(&op.operands[i]).unwrap_or(default);
                    matrix.set(n(0, 1.0), n(1, 0.0), n(2, 0.0), n(3, 1.0), n(4, 0.0), n(5, 0.0));
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        matrix.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }
                    let text = shown_text(op, |bytes| match encoding.as_ref() {
                        Some(enc) => LopdfDocument::decode_text(enc, bytes)
                            .unwrap_or_else(|_| decode_text_simple(bytes)),
                        None => decode_text_simple(bytes),
                    });
                    if text.trim().is_empty() {
                        continue;
                    }
                    let (x, y) = matrix.position();
                    let size = font_size * matrix.scale();
                    let span = Span::with_font_name(text, size, &font_name, page_index).at(x, y);
                    // Advance past the shown text so a following show on the
                    // same line starts after it.
                    matrix.advance(span.effective_width() / matrix.scale().max(f32::EPSILON));
                    spans.push(span);
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    // -----------------------------------------------------------------------
    // Outline
    // -----------------------------------------------------------------------

    fn extract_outline(&self) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| self.dict_get(catalog, b"Outlines"))
            .and_then(|outlines| outlines.as_dict().ok())
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok());

        if let Some(first) = first {
            let mut visited = HashSet::new();
            self.walk_outline(first, 1, &mut visited, &mut entries);
        }

        entries
    }

    /// Walk one sibling chain, recursing into children.
    fn walk_outline(
        &self,
        first: ObjectId,
        level: u32,
        visited: &mut HashSet<ObjectId>,
        entries: &mut Vec<OutlineEntry>,
    ) {
        if level as usize > MAX_DEPTH {
            return;
        }

        let mut current = Some(first);
        let mut siblings = 0;

        while let Some(item_id) = current {
            if !visited.insert(item_id) || siblings >= MAX_SIBLINGS {
                break;
            }
            siblings += 1;

            let item = match self.doc.get_dictionary(item_id) {
                Ok(item) => item,
                Err(_) => break,
            };

            let title = self.dict_string(item, b"Title").unwrap_or_default();
            match self.outline_destination(item) {
                Some(page) => entries.push(OutlineEntry::new(level, title, page)),
                None => log::debug!("dropping outline entry {:?}: unresolved destination", title),
            }

            if let Ok(child) = item.get(b"First").and_then(|o| o.as_reference()) {
                self.walk_outline(child, level + 1, visited, entries);
            }

            current = item.get(b"Next").and_then(|o| o.as_reference()).ok();
        }
    }

    /// Resolve an outline item's target page from `/Dest` or a GoTo `/A`.
    fn outline_destination(&self, item: &Dictionary) -> Option<u32> {
        if let Some(dest) = self.dict_get(item, b"Dest") {
            return self.resolve_destination(dest, 0);
        }

        let action = self.dict_get(item, b"A")?.as_dict().ok()?;
        let is_goto = action
            .get(b"S")
            .and_then(|s| s.as_name())
            .map(|s| s == b"GoTo")
            .unwrap_or(false);
        if !is_goto {
            return None;
        }
        let dest = self.dict_get(action, b"D")?;
        self.resolve_destination(dest, 0)
    }

    /// Resolve an explicit or named destination to a 1-based page number.
    fn resolve_destination(&self, dest: &Object, depth: usize) -> Option<u32> {
        if depth > 4 {
            return None;
        }
        match self.deref(dest)? {
            Object::Array(arr) => match arr.first()? {
                Object::Reference(page_ref) => self.page_numbers.get(page_ref).copied(),
                // Some producers store a 0-based page index instead
                Object::Integer(i) if *i >= 0 && (*i as usize) < self.pages.len() => {
                    Some(*i as u32 + 1)
                }
                _ => None,
            },
            Object::Dictionary(dict) => {
                let inner = self.dict_get(dict, b"D")?;
                self.resolve_destination(inner, depth + 1)
            }
            Object::String(name, _) | Object::Name(name) => {
                let target = self.named_destination(name)?;
                self.resolve_destination(target, depth + 1)
            }
            _ => None,
        }
    }

    /// Look a name up in the catalog's `/Dests` dictionary or `/Names` tree.
    fn named_destination(&self, name: &[u8]) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;

        if let Some(Object::Dictionary(dests)) = self.dict_get(catalog, b"Dests") {
            if let Some(found) = self.dict_get(dests, name) {
                return Some(found);
            }
        }

        let names = self.dict_get(catalog, b"Names")?.as_dict().ok()?;
        let tree = self.dict_get(names, b"Dests")?.as_dict().ok()?;
        self.search_name_tree(tree, name, 0)
    }

    fn search_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        key: &[u8],
        depth: usize,
    ) -> Option<&'a Object> {
        if depth > MAX_DEPTH {
            return None;
        }

        if let Some(Object::Array(pairs)) = self.dict_get(node, b"Names") {
            for pair in pairs.chunks(2) {
                if let [k, v] = pair {
                    if let Some(Object::String(k, _)) = self.deref(k) {
                        if k.as_slice() == key {
                            return self.deref(v);
                        }
                    }
                }
            }
        }

        if let Some(Object::Array(kids)) = self.dict_get(node, b"Kids") {
            for kid in kids {
                if let Some(Object::Dictionary(kid)) = self.deref(kid) {
                    if let Some(found) = self.search_name_tree(kid, key, depth + 1) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// The page's `/Resources`, inherited from ancestors when absent.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_DEPTH {
            if let Some(resources) = self.dict_get(node, b"Resources") {
                return resources.as_dict().ok();
            }
            let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn decode_image(&self, id: ObjectId) -> Result<RawImage> {
        let stream = match self.doc.get_object(id)? {
            Object::Stream(stream) => stream,
            _ => return Err(Error::ImageExtract("Invalid XObject".to_string())),
        };
        let dict = &stream.dict;

        let dimension = |key: &[u8]| -> Result<u32> {
            self.dict_get(dict, key)
                .and_then(|o| o.as_i64().ok())
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    Error::ImageExtract(format!("missing {}", String::from_utf8_lossy(key)))
                })
                .and_then(|v| {
                    u32::try_from(v).map_err(|_| {
                        Error::ImageExtract(format!(
                            "{} out of range: {}",
                            String::from_utf8_lossy(key),
                            v
                        ))
                    })
                })
        };
        let width = dimension(b"Width")?;
        let height = dimension(b"Height")?;

        let filters = self.filter_names(dict);
        let last = filters.last().map(String::as_str).unwrap_or("");

        let passthrough = |format: &str| -> Result<RawImage> {
            if filters.len() > 1 {
                return Err(Error::ImageExtract(format!(
                    "unsupported filter chain {:?}",
                    filters
                )));
            }
            Ok(RawImage::new(stream.content.clone(), width, height, format))
        };

        match last {
            "DCTDecode" => passthrough("jpeg"),
            "JPXDecode" => passthrough("jpx"),
            "JBIG2Decode" => passthrough("jb2"),
            "FlateDecode" | "LZWDecode" | "" => {
                let samples = if filters.is_empty() {
                    stream.content.clone()
                } else {
                    stream
                        .decompressed_content()
                        .map_err(|e| Error::ImageExtract(e.to_string()))?
                };
                let bits = self
                    .dict_get(dict, b"BitsPerComponent")
                    .and_then(|b| b.as_i64().ok())
                    .unwrap_or(8);
                if bits != 8 {
                    return Err(Error::ImageExtract(format!(
                        "unsupported bit depth {}",
                        bits
                    )));
                }
                let components = self.color_components(dict)?;
                let png = encode_png(samples, width, height, components)?;
                Ok(RawImage::new(png, width, height, "png"))
            }
            other => Err(Error::ImageExtract(format!("unsupported codec {}", other))),
        }
    }

    fn filter_names(&self, dict: &Dictionary) -> Vec<String> {
        match self.dict_get(dict, b"Filter") {
            Some(Object::Name(name)) => vec![String::from_utf8_lossy(name).to_string()],
            Some(Object::Array(arr)) => arr
                .iter()
                .filter_map(|o| self.deref(o))
                .filter_map(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Number of colour components for the colour spaces we can re-encode.
    fn color_components(&self, dict: &Dictionary) -> Result<u8> {
        let unsupported =
            |name: &str| Error::ImageExtract(format!("unsupported colour space {}", name));

        let cs = self
            .dict_get(dict, b"ColorSpace")
            .ok_or_else(|| unsupported("(none)"))?;
        let (family, params) = match cs {
            Object::Name(name) => (name.as_slice(), None),
            Object::Array(arr) => match arr.first().and_then(|o| o.as_name().ok()) {
                Some(name) => (name, arr.get(1)),
                None => return Err(unsupported("(malformed)")),
            },
            _ => return Err(unsupported("(malformed)")),
        };

        match family {
            b"DeviceGray" | b"CalGray" | b"G" => Ok(1),
            b"DeviceRGB" | b"CalRGB" | b"RGB" => Ok(3),
            b"DeviceCMYK" | b"CMYK" => Ok(4),
            b"ICCBased" => {
                let profile = params
                    .and_then(|p| self.deref(p))
                    .and_then(|p| p.as_stream().ok())
                    .ok_or_else(|| unsupported("ICCBased"))?;
                match self.dict_get(&profile.dict, b"N").and_then(|n| n.as_i64().ok()) {
                    Some(n @ (1 | 3 | 4)) => Ok(n as u8),
                    _ => Err(unsupported("ICCBased")),
                }
            }
            other => Err(unsupported(&String::from_utf8_lossy(other))),
        }
    }
}

impl DocumentSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn raw_text(&self, page_index: u32) -> Result<String> {
        self.page_id(page_index)?;
        self.doc
            .extract_text(&[page_index + 1])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_index + 1, e)))
    }

    fn text_spans(&self, page_index: u32) -> Result<Vec<Span>> {
        let page_id = self.page_id(page_index)?;
        self.parse_spans(page_id, page_index)
    }

    fn native_outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.extract_outline())
    }

    fn images(&self, page_index: u32) -> Result<Vec<ImageRef>> {
        let page_id = self.page_id(page_index)?;
        let mut refs = Vec::new();

        let xobjects = self
            .page_resources(page_id)
            .and_then(|res| self.dict_get(res, b"XObject"))
            .and_then(|x| x.as_dict().ok());

        let Some(xobjects) = xobjects else {
            return Ok(refs);
        };

        let mut seen = HashSet::new();
        for (name, obj) in xobjects.iter() {
            let Ok(id) = obj.as_reference() else {
                continue;
            };
            let is_image = match self.doc.get_object(id) {
                Ok(Object::Stream(s)) => s
                    .dict
                    .get(b"Subtype")
                    .and_then(|t| t.as_name())
                    .map(|t| t == b"Image")
                    .unwrap_or(false),
                // Unreadable objects are still listed so the extractor can
                // count them as skipped.
                _ => true,
            };
            if is_image && seen.insert(id) {
                refs.push(
                    ImageRef::new(page_index, String::from_utf8_lossy(name)).with_object_id(id),
                );
            }
        }

        Ok(refs)
    }

    fn extract_image(&self, image: &ImageRef) -> Result<RawImage> {
        let id = image
            .object_id
            .ok_or_else(|| Error::ImageExtract(format!("no object behind {}", image.name)))?;
        self.decode_image(id)
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| self.deref(info))
            .and_then(|info| info.as_dict().ok());

        if let Some(info) = info {
            let field = |key: &[u8]| {
                self.dict_string(info, key)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            };
            metadata.title = field(b"Title");
            metadata.author = field(b"Author");
            metadata.subject = field(b"Subject");
            metadata.creation_date = field(b"CreationDate");
        }

        metadata
    }
}

/// Text shown by a Tj, TJ, ' or " operation.
///
/// Large negative TJ adjustments become word spaces, except after
/// spaceless-script characters.
fn shown_text(op: &Operation, decode: impl Fn(&[u8]) -> String) -> String {
    match op.operator.as_str() {
        "TJ" => {
            let Some(Object::Array(items)) = op.operands.first() else {
                return String::new();
            };
            let mut combined = String::new();
            for item in items {
                match item {
                    Object::String(bytes, _) => combined.push_str(&decode(bytes)),
                    Object::Integer(_) | Object::Real(_) => {
                        let adjustment = -get_number(item).unwrap_or(0.0);
                        let wants_space = adjustment > TJ_SPACE_THRESHOLD
                            && combined
                                .chars()
                                .last()
                                .map(|c| {
                                    !c.is_whitespace()
                                        && !crate::toc::is_spaceless_script_char(c)
                                })
                                .unwrap_or(false);
                        if wants_space {
                            combined.push(' ');
                        }
                    }
                    _ => {}
                }
            }
            combined
        }
        _ => {
            let index = if op.operator == "\"" { 2 } else { 0 };
            match op.operands.get(index) {
                Some(Object::String(bytes, _)) => decode(bytes),
                _ => String::new(),
            }
        }
    }
}

/// Re-encode 8-bit samples as PNG.
fn encode_png(mut samples: Vec<u8>, width: u32, height: u32, components: u8) -> Result<Vec<u8>> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(components as usize))
        .ok_or_else(|| {
            Error::ImageExtract(format!("image too large: {}x{}", width, height))
        })?;
    if samples.len() < expected {
        return Err(Error::ImageExtract(format!(
            "sample data too short: {} < {} bytes",
            samples.len(),
            expected
        )));
    }
    samples.truncate(expected);

    let image = match components {
        1 => image::GrayImage::from_raw(width, height, samples)
            .map(image::DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, samples)
            .map(image::DynamicImage::ImageRgb8),
        4 => image::RgbImage::from_raw(width, height, cmyk_to_rgb(&samples))
            .map(image::DynamicImage::ImageRgb8),
        _ => None,
    }
    .ok_or_else(|| Error::ImageExtract("failed to create image buffer".to_string()))?;

    let mut output = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| Error::ImageExtract(e.to_string()))?;
    Ok(output)
}

fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks_exact(4)
        .flat_map(|px| {
            let k = 255 - px[3] as u16;
            [px[0], px[1], px[2]].map(|c| ((255 - c as u16) * k / 255) as u8)
        })
        .collect()
}

/// Text-space state for span positioning.
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    /// Line start, restored by T* and friends
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
            leading: self.leading,
        };
    }

    /// Td: move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Move along the baseline after showing text (text-space units).
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matrix_lines() {
        let mut m = TextMatrix::default();
        m.translate(72.0, 700.0);
        assert_eq!(m.position(), (72.0, 700.0));
        m.advance(50.0);
        assert_eq!(m.position(), (122.0, 700.0));
        m.next_line();
        assert_eq!(m.position(), (72.0, 688.0));
    }

    #[test]
    fn test_text_matrix_scale() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 10.0, 20.0);
        assert_eq!(m.scale(), 2.0);
        assert_eq!(m.position(), (10.0, 20.0));
    }

    #[test]
    fn test_shown_text_tj_spacing() {
        let op = Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("Hello"),
                Object::Integer(-300),
                Object::string_literal("World"),
                Object::Integer(-20),
                Object::string_literal("!"),
            ])],
        );
        assert_eq!(shown_text(&op, decode_text_simple), "Hello World!");
    }

    #[test]
    fn test_shown_text_quote_operator() {
        let op = Operation::new(
            "\"",
            vec![Object::Integer(0), Object::Integer(0), Object::string_literal("Line")],
        );
        assert_eq!(shown_text(&op, decode_text_simple), "Line");
    }

    #[test]
    fn test_encode_png_gray() {
        let png = encode_png(vec![128; 4], 2, 2, 1).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_encode_png_short_buffer() {
        assert!(matches!(
            encode_png(vec![0; 3], 2, 2, 3),
            Err(Error::ImageExtract(_))
        ));
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0]), vec![255, 255, 255]);
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 255]), vec![0, 0, 0]);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(LopdfSource::from_bytes(b"definitely not a pdf").is_err());
    }
}
