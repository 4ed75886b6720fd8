//! The document hierarchy: catalog, page tree, pages, fonts, and the
//! incremental-update bookkeeping that ties them to file sections.
//! Grounded on the original's `DocumentCatalog`/`PageTreeNode`/`PageObject`/
//! `Font` (`pdf.py`) for the hierarchy shape and `get_inherited_entry` for
//! inherited-attribute resolution, and on the teacher's `PdfDocument`
//! generic-over-`Write` builder for the surface API a caller sees
//! (`Document::new`, `add_page`, `write`).

use std::collections::HashMap;
use std::io::Write as IoWrite;

use crate::content::{self, Operator};
use crate::error::{PdfError, Result};
use crate::file::{self, Section, Version};
use crate::filters::{self, Filter};
use crate::fonts::BuiltinFont;
use crate::image::ImageXObject;
use crate::object::{ObjId, Value};
use crate::store::ObjectStore;

/// `/PageLayout` on the catalog — restored from the original's
/// `OPTIONS['page_layout']` table (see SPEC_FULL.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    SinglePage,
    OneColumn,
    TwoColumnLeft,
    TwoColumnRight,
    TwoPageLeft,
    TwoPageRight,
}

impl PageLayout {
    fn name(self) -> &'static str {
        match self {
            PageLayout::SinglePage => "SinglePage",
            PageLayout::OneColumn => "OneColumn",
            PageLayout::TwoColumnLeft => "TwoColumnLeft",
            PageLayout::TwoColumnRight => "TwoColumnRight",
            PageLayout::TwoPageLeft => "TwoPageLeft",
            PageLayout::TwoPageRight => "TwoPageRight",
        }
    }
}

/// US Letter, the default page size a freshly created page-tree root carries
/// as its inherited `/MediaBox`.
pub const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// A lightweight handle to a page object; carries no borrow of `Document`,
/// so callers can hold several while mutating the document between uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHandle(pub ObjId);

/// A lightweight handle returned by `add_update`; subsequent mutation
/// methods on `Document` attach to whichever section is currently open, so
/// this handle exists only to match the shape spec.md §6 names.
pub struct UpdateHandle;

pub struct Document {
    pub version: Version,
    store: ObjectStore,
    sections: Vec<Section>,
    current_section: usize,
    catalog_id: ObjId,
    pages_root_id: ObjId,
    info_id: Option<ObjId>,
    font_cache: HashMap<BuiltinFont, ObjId>,
}

impl Document {
    pub fn new(version: Version, page_layout: PageLayout) -> Self {
        let mut store = ObjectStore::new();
        let catalog_id = store.attach(Value::Null);
        let pages_root_id = store.attach(Value::dict(vec![
            ("Type", Value::name("Pages")),
            ("Kids", Value::array(vec![])),
            ("Count", Value::Integer(0)),
            ("MediaBox", Value::array(DEFAULT_MEDIA_BOX.iter().map(|&n| Value::Real(n)).collect())),
        ]));
        store
            .set(
                catalog_id,
                Value::dict(vec![
                    ("Type", Value::name("Catalog")),
                    ("Pages", Value::reference(pages_root_id)),
                    ("PageLayout", Value::name(page_layout.name())),
                ]),
            )
            .expect("catalog was just attached");

        let mut section = Section::new();
        section.touched.push((catalog_id, store.get(catalog_id).unwrap().clone()));
        section.touched.push((pages_root_id, store.get(pages_root_id).unwrap().clone()));

        Document {
            version,
            store,
            sections: vec![section],
            current_section: 0,
            catalog_id,
            pages_root_id,
            info_id: None,
            font_cache: HashMap::new(),
        }
    }

    fn touch(&mut self, value: Value) -> ObjId {
        let id = self.store.attach(value);
        let stored = self.store.get(id).unwrap().clone();
        self.sections[self.current_section].touched.push((id, stored));
        id
    }

    fn rewrite(&mut self, id: ObjId, value: Value) -> Result<()> {
        self.store.set(id, value)?;
        let stored = self.store.get(id).unwrap().clone();
        let section = &mut self.sections[self.current_section];
        if let Some(slot) = section.touched.iter_mut().find(|(existing, _)| *existing == id) {
            slot.1 = stored;
        } else {
            section.touched.push((id, stored));
        }
        Ok(())
    }

    /// Begin a new incremental-update section; subsequent mutation methods
    /// attach their objects to it instead of whichever section was open
    /// before.
    pub fn add_update(&mut self) -> UpdateHandle {
        self.sections.push(Section::new());
        self.current_section = self.sections.len() - 1;
        UpdateHandle
    }

    pub fn set_info(&mut self, entries: Vec<(&str, Value)>) {
        let dict = Value::dict(entries);
        match self.info_id {
            Some(id) => {
                let _ = self.rewrite(id, dict);
            }
            None => {
                self.info_id = Some(self.touch(dict));
            }
        }
    }

    /// Resolve an inheritable attribute by walking from `page_id` up through
    /// `/Parent` links until some ancestor carries it.
    fn get_inherited(&self, page_id: ObjId, key: &str) -> Option<Value> {
        let mut current = page_id;
        loop {
            let node = self.store.get(current)?;
            if let Some(v) = node.get(key) {
                return Some(v.clone());
            }
            let parent = node.get("Parent")?.as_reference()?;
            current = parent;
        }
    }

    pub fn add_page(&mut self) -> Result<PageHandle> {
        let page_id = self.touch(Value::dict(vec![
            ("Type", Value::name("Page")),
            ("Parent", Value::reference(self.pages_root_id)),
            ("Resources", Value::dict(vec![("ProcSet", Value::array(vec![Value::name("PDF")]))])),
        ]));

        let pages_root = self
            .store
            .get(self.pages_root_id)
            .ok_or_else(|| PdfError::build("page tree root is missing"))?
            .clone();
        let mut kids = pages_root.get("Kids").and_then(Value::as_array).unwrap_or(&[]).to_vec();
        kids.push(Value::reference(page_id));
        let count = kids.len() as i64;
        let mut entries = pages_root.as_dict_entries().unwrap().to_vec();
        for (k, v) in entries.iter_mut() {
            if k == "Kids" {
                *v = Value::Array(kids.clone());
            } else if k == "Count" {
                *v = Value::Integer(count);
            }
        }
        self.rewrite(self.pages_root_id, Value::Dictionary(entries))?;

        Ok(PageHandle(page_id))
    }

    fn font_id(&mut self, font: BuiltinFont) -> ObjId {
        if let Some(&id) = self.font_cache.get(&font) {
            return id;
        }
        let id = self.touch(Value::dict(vec![
            ("Type", Value::name("Font")),
            ("Subtype", Value::name("Type1")),
            ("BaseFont", Value::name(font.base_font_name())),
        ]));
        self.font_cache.insert(font, id);
        id
    }

    pub fn page(&mut self, handle: PageHandle) -> Page<'_> {
        Page { doc: self, id: handle.0 }
    }

    /// Serialize the document to bytes. Each section is rewritten from
    /// scratch every call, so byte offsets always reflect the document's
    /// current state (spec.md §4.4's serialization algorithm).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let catalog_id = self.catalog_id;
        let info_id = self.info_id;
        file::write_document(self.version, &self.store, &self.sections, move |_section| {
            let mut extra = vec![("Root".to_string(), Value::reference(catalog_id))];
            if let Some(id) = info_id {
                extra.push(("Info".to_string(), Value::reference(id)));
            }
            extra
        })
    }

    pub fn write<W: IoWrite>(&self, out: &mut W) -> Result<()> {
        out.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Parse a complete PDF byte stream, per spec.md §4.4's parse algorithm.
    pub fn read(data: &[u8]) -> Result<Document> {
        let result = file::read_document(data)?;
        let root_id = result
            .trailer
            .iter()
            .find(|(k, _)| k == "Root")
            .and_then(|(_, v)| v.as_reference())
            .ok_or_else(|| PdfError::parse("trailer is missing /Root", 0))?;
        let catalog = result
            .store
            .get(root_id)
            .ok_or_else(|| PdfError::parse("trailer /Root does not resolve to an object", 0))?;
        let pages_root_id = catalog
            .get("Pages")
            .and_then(Value::as_reference)
            .ok_or_else(|| PdfError::parse("catalog is missing /Pages", 0))?;
        let info_id = result.trailer.iter().find(|(k, _)| k == "Info").and_then(|(_, v)| v.as_reference());

        // Seed the first section with every object the parsed store holds,
        // so a subsequent `to_bytes()` re-emits the whole document instead of
        // writing an empty body under a trailer that still references it.
        let mut section = Section::new();
        for id in result.store.live_ids() {
            let value = result.store.get(id).unwrap().clone();
            section.touched.push((id, value));
        }

        Ok(Document {
            version: result.version,
            store: result.store,
            sections: vec![section],
            current_section: 0,
            catalog_id: root_id,
            pages_root_id,
            info_id,
            font_cache: HashMap::new(),
        })
    }

    pub fn catalog(&self) -> &Value {
        self.store.get(self.catalog_id).expect("catalog is always attached")
    }

    pub fn object(&self, id: ObjId) -> Option<&Value> {
        self.store.get(id)
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }
}

/// A short-lived view over one page, borrowed from its owning `Document`.
pub struct Page<'a> {
    doc: &'a mut Document,
    id: ObjId,
}

impl<'a> Page<'a> {
    fn dict_entries(&self) -> Vec<(String, Value)> {
        self.doc.store.get(self.id).unwrap().as_dict_entries().unwrap().to_vec()
    }

    fn resources(&self) -> Vec<(String, Value)> {
        self.dict_entries()
            .iter()
            .find(|(k, _)| k == "Resources")
            .and_then(|(_, v)| v.as_dict_entries().map(|e| e.to_vec()))
            .unwrap_or_default()
    }

    fn set_resources(&mut self, resources: Vec<(String, Value)>) -> Result<()> {
        let mut entries = self.dict_entries();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == "Resources") {
            slot.1 = Value::Dictionary(resources);
        } else {
            entries.push(("Resources".to_string(), Value::Dictionary(resources)));
        }
        self.doc.rewrite(self.id, Value::Dictionary(entries))
    }

    fn ensure_procset(&mut self, tag: &str) -> Result<()> {
        let mut resources = self.resources();
        let entry = resources.iter_mut().find(|(k, _)| k == "ProcSet");
        match entry {
            Some((_, Value::Array(items))) => {
                if !items.iter().any(|v| v.as_name() == Some(tag)) {
                    items.push(Value::name(tag));
                }
            }
            _ => resources.push(("ProcSet".to_string(), Value::array(vec![Value::name("PDF"), Value::name(tag)]))),
        }
        self.set_resources(resources)
    }

    /// Allocate (or reuse) a `/F<n>` alias for `font` on this page's
    /// resource dictionary, in insertion order.
    pub fn add_font(&mut self, font: BuiltinFont) -> Result<String> {
        let font_id = self.doc.font_id(font);
        let mut resources = self.resources();
        let font_dict_idx = resources.iter().position(|(k, _)| k == "Font");
        let mut font_entries: Vec<(String, Value)> = match font_dict_idx {
            Some(i) => resources[i].1.as_dict_entries().unwrap_or(&[]).to_vec(),
            None => Vec::new(),
        };
        for (alias, value) in &font_entries {
            if value.as_reference() == Some(font_id) {
                return Ok(alias.clone());
            }
        }
        let alias = format!("F{}", font_entries.len() + 1);
        font_entries.push((alias.clone(), Value::reference(font_id)));
        match font_dict_idx {
            Some(i) => resources[i].1 = Value::Dictionary(font_entries),
            None => resources.push(("Font".to_string(), Value::Dictionary(font_entries))),
        }
        self.set_resources(resources)?;
        self.ensure_procset("Text")?;
        Ok(alias)
    }

    /// Add an image XObject to this page's resources, returning its
    /// `/Im<n>` alias.
    pub fn add_image_xobject(&mut self, image: ImageXObject) -> Result<String> {
        let is_color = image.color_space != crate::image::ColorSpace::DeviceGray;
        let xobject_id = self.doc.touch(image.to_stream_value());
        let mut resources = self.resources();
        let xobj_idx = resources.iter().position(|(k, _)| k == "XObject");
        let mut xobj_entries: Vec<(String, Value)> = match xobj_idx {
            Some(i) => resources[i].1.as_dict_entries().unwrap_or(&[]).to_vec(),
            None => Vec::new(),
        };
        let alias = format!("Im{}", xobj_entries.len() + 1);
        xobj_entries.push((alias.clone(), Value::reference(xobject_id)));
        match xobj_idx {
            Some(i) => resources[i].1 = Value::Dictionary(xobj_entries),
            None => resources.push(("XObject".to_string(), Value::Dictionary(xobj_entries))),
        }
        self.set_resources(resources)?;
        self.ensure_procset(if is_color { "ImageC" } else { "ImageB" })?;
        Ok(alias)
    }

    /// Append a content stream to this page's `/Contents`. Spec.md §4.6:
    /// `/Contents` may be one reference or an array of them, concatenated
    /// at render time; appending (rather than replacing) is the restored
    /// multiple-content-stream behavior from SPEC_FULL.md.
    pub fn add_content_stream(&mut self, ops: Vec<Operator>) -> Result<()> {
        let payload = content::format_content(&ops)?;
        let pipeline = filters::default_pipeline();
        let encoded = filters::encode_pipeline(&pipeline, &payload)?;
        let filter_names: Vec<Value> = pipeline.iter().map(|f| Value::name(f.name())).collect();
        let stream = Value::stream(vec![("Filter", Value::array(filter_names))], encoded);
        let stream_id = self.doc.touch(stream);

        let mut entries = self.dict_entries();
        let contents_idx = entries.iter().position(|(k, _)| k == "Contents");
        match contents_idx {
            Some(idx) => match entries[idx].1.clone() {
                Value::Reference(existing) => {
                    entries[idx].1 = Value::array(vec![Value::reference(existing), Value::reference(stream_id)]);
                }
                Value::Array(mut items) => {
                    items.push(Value::reference(stream_id));
                    entries[idx].1 = Value::Array(items);
                }
                _ => entries[idx].1 = Value::reference(stream_id),
            },
            None => entries.push(("Contents".to_string(), Value::reference(stream_id))),
        }
        self.doc.rewrite(self.id, Value::Dictionary(entries))
    }

    /// Decode and concatenate this page's content streams, applying each
    /// one's own `/Filter` pipeline (used by tests and by `/Prev`-chasing
    /// callers that want the rendered operator sequence back).
    pub fn decoded_content(&self) -> Result<Vec<Operator>> {
        let contents = self
            .doc
            .store
            .get(self.id)
            .and_then(|v| v.get("Contents"))
            .cloned()
            .unwrap_or(Value::Array(vec![]));
        let refs: Vec<ObjId> = match &contents {
            Value::Reference(id) => vec![*id],
            Value::Array(items) => items.iter().filter_map(Value::as_reference).collect(),
            _ => vec![],
        };
        let mut ops = Vec::new();
        for id in refs {
            let stream = self.doc.store.get(id).ok_or_else(|| PdfError::build("dangling content stream reference"))?;
            let (dict, data) = stream.as_stream().ok_or_else(|| PdfError::build("/Contents entry is not a stream"))?;
            let filter_names: Vec<String> = match dict.iter().find(|(k, _)| k == "Filter").map(|(_, v)| v) {
                Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_name().map(str::to_string)).collect(),
                Some(Value::Name(n)) => vec![n.clone()],
                _ => vec![],
            };
            let pipeline: Vec<Filter> = filter_names.iter().map(|n| Filter::from_name(n)).collect::<Result<_>>()?;
            let decoded = filters::decode_pipeline(&pipeline, data)?;
            ops.extend(content::parse_content(&decoded)?);
        }
        Ok(ops)
    }

    /// Thin builder over the core operator types: emits the operator
    /// sequence `q cm BT Tm Tf TL Tj T* ET Q` in one call. Out of the
    /// core's scope per spec.md §1, included here only because it composes
    /// directly from already-core primitives.
    pub fn add_text(&mut self, text: &str, font: BuiltinFont, size: f64, translate_x: f64, translate_y: f64) -> Result<()> {
        let alias = self.add_font(font)?;
        let matrix = content::Matrix::identity().translate(translate_x, translate_y);
        let ops = vec![
            Operator::Save,
            Operator::ConcatMatrix(matrix),
            Operator::TextObject(vec![
                Operator::TextMatrix(content::Matrix::identity()),
                Operator::TextFont { name: alias, size },
                Operator::TextLeading(size * 1.2),
                Operator::TextShow(text.to_string()),
                Operator::TextNextLine,
            ]),
            Operator::Restore,
        ];
        self.add_content_stream(ops)
    }

    pub fn id(&self) -> ObjId {
        self.id
    }
}

impl Document {
    pub fn page_media_box(&self, handle: PageHandle) -> Option<[f64; 4]> {
        let value = self.get_inherited(handle.0, "MediaBox")?;
        let items = value.as_array()?;
        if items.len() != 4 {
            return None;
        }
        let mut out = [0.0; 4];
        for (i, item) in items.iter().enumerate() {
            out[i] = match item {
                Value::Integer(n) => *n as f64,
                Value::Real(f) => *f,
                _ => return None,
            };
        }
        Some(out)
    }
}
