//! Merge engine
//!
//! Sources are appended to a single [`OutputDocument`] in manifest order. Each
//! source's objects are renumbered into the output's id space, its pages are
//! re-parented under one flat page tree, and its own catalog and page-tree
//! nodes are dropped. Attributes a page only inherited from those nodes are
//! copied onto the page first so rendering does not change.

use lopdf::{dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::providers::ObjectStore;

use super::fetcher::fetch_source;

/// Page attributes a page may inherit from its ancestors
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Object types dropped when a source is appended. `ObjStm` and `XRef` are
/// containers already expanded by the parser.
const DROPPED_TYPES: [&[u8]; 4] = [b"Catalog", b"Pages", b"ObjStm", b"XRef"];

/// Guards against cyclic `Parent` chains in damaged files
const MAX_TREE_DEPTH: usize = 64;

/// Serialization options
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Compress streams, drop unreachable objects and clean up structure
    pub optimize: bool,
    /// PDF header version of the output
    pub pdf_version: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            optimize: false,
            pdf_version: "1.5".to_string(),
        }
    }
}

/// Result of a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Pages in the output
    pub pages: usize,
    /// Sources fetched with no content
    pub skipped: usize,
}

/// Accumulator for merged pages
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Create an empty output with the given header version
    pub fn new(version: &str) -> Self {
        let mut doc = Document::with_version(version);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append every page of `source`, keeping the source's page order
    ///
    /// Returns the number of pages appended.
    pub fn append(&mut self, mut source: Document) -> usize {
        source.renumber_objects_with(self.doc.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let mut inherited: HashMap<ObjectId, Vec<(Vec<u8>, Object)>> = page_ids
            .iter()
            .map(|page_id| (*page_id, inherited_attributes(&source, *page_id)))
            .collect();

        for (id, mut object) in std::mem::take(&mut source.objects) {
            if let Some(attributes) = inherited.remove(&id) {
                if let Object::Dictionary(ref mut dict) = object {
                    dict.set("Parent", self.pages_id);
                    for (key, value) in attributes {
                        dict.set(key, value);
                    }
                }
            } else if object_type(&object).is_some_and(|t| DROPPED_TYPES.iter().any(|d| *d == t)) {
                continue;
            }
            self.doc.objects.insert(id, object);
        }

        self.doc.max_id = self.doc.max_id.max(source.max_id);
        self.kids.extend(page_ids.iter().copied());
        page_ids.len()
    }

    /// Build the page tree and catalog, then apply optimizations
    pub fn finish(mut self, optimize: bool) -> Document {
        let kids: Vec<Object> = self.kids.iter().copied().map(Object::Reference).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => Object::Integer(kids.len() as i64),
            "Kids" => kids,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        if optimize {
            let pruned = self.doc.prune_objects();
            let emptied = self.doc.delete_zero_length_streams();
            self.doc.renumber_objects();
            self.doc.compress();
            tracing::debug!(
                "Optimized output: {} unreachable objects pruned, {} empty streams removed",
                pruned.len(),
                emptied.len()
            );
        }

        self.doc
    }

    /// Serialize to `path`, returning the number of bytes written
    pub fn save(self, path: &Path, optimize: bool) -> Result<u64> {
        let mut doc = self.finish(optimize);

        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        doc.save_to(&mut writer)?;
        writer.flush()?;
        drop(writer);

        Ok(std::fs::metadata(path)?.len())
    }
}

fn object_type(object: &Object) -> Option<&[u8]> {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return None,
    };
    dict.get(b"Type").and_then(|t| t.as_name()).ok()
}

/// Attributes `page_id` inherits from its page-tree ancestors
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for key in INHERITABLE_ATTRIBUTES {
        if page.has(key) {
            continue;
        }

        let mut parent = page.get(b"Parent").and_then(|p| p.as_reference()).ok();
        let mut depth = 0;
        while let Some(parent_id) = parent {
            if depth >= MAX_TREE_DEPTH {
                break;
            }
            let Ok(node) = doc.get_dictionary(parent_id) else {
                break;
            };
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
                break;
            }
            parent = node.get(b"Parent").and_then(|p| p.as_reference()).ok();
            depth += 1;
        }
    }
    found
}

/// Fetch `keys` from `bucket` in order, merge them and serialize to `output_path`
///
/// Empty sources are skipped. Any other failure aborts the merge and is
/// returned as `Error::Merge` wrapping the cause.
pub async fn merge_documents(
    store: &dyn ObjectStore,
    bucket: &str,
    keys: &[String],
    output_path: &Path,
    options: &MergeOptions,
) -> Result<MergeOutcome> {
    merge_sources(store, bucket, keys, output_path, options)
        .await
        .map_err(|e| {
            tracing::error!("Error merging PDFs: {}", e);
            Error::merge(e)
        })
}

async fn merge_sources(
    store: &dyn ObjectStore,
    bucket: &str,
    keys: &[String],
    output_path: &Path,
    options: &MergeOptions,
) -> Result<MergeOutcome> {
    let mut output = OutputDocument::new(&options.pdf_version);
    let mut skipped = 0;

    for key in keys {
        let data = fetch_source(store, bucket, key).await?;
        if data.is_empty() {
            tracing::warn!("Skipping empty source {}/{}", bucket, key);
            skipped += 1;
            continue;
        }

        let source = Document::load_mem(&data).map_err(|e| {
            tracing::error!("Failed to parse PDF {}/{}: {}", bucket, key, e);
            Error::Pdf(e)
        })?;
        let appended = output.append(source);
        tracing::debug!("Appended {} pages from {}/{}", appended, bucket, key);
    }

    let pages = output.page_count();
    if options.optimize {
        tracing::info!("Saving {} pages with PDF optimization", pages);
    } else {
        tracing::info!("Saving {} pages, no optimization", pages);
    }

    let path: PathBuf = output_path.to_path_buf();
    let optimize = options.optimize;
    let bytes_written = tokio::task::spawn_blocking(move || output.save(&path, optimize))
        .await
        .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

    tracing::info!("Merged PDF saved to {} ({} bytes)", output_path.display(), bytes_written);

    Ok(MergeOutcome { pages, skipped })
}
