use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::DocumentError;

// @module: In-memory presentation model and PPTX container I/O

/// The smallest formatted text unit within a paragraph.
///
/// Formatting lives in the slide XML around the run's text element and is
/// never touched; the model carries only the mutable text, keyed back to
/// its text element by document order.
#[derive(Debug, Clone, Default)]
pub struct Run {
    /// Text content of the run
    pub text: String,
}

/// Ordered group of runs forming one block of text
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Runs of the paragraph, in document order
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Full paragraph text: concatenation of all run texts, no separator
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Container of paragraphs attached to a text-carrying shape
#[derive(Debug, Clone, Default)]
pub struct TextFrame {
    /// Paragraphs of the frame, in document order
    pub paragraphs: Vec<Paragraph>,
}

/// A slide element, which may or may not carry a text frame.
///
/// The capability check is the `text_frame` accessors: pictures, charts and
/// connectors have no frame and never participate in translation.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Shape with editable text
    TextBox(TextFrame),
    /// Picture, chart, connector or other textless element
    Graphic,
}

impl Shape {
    /// Text-frame capability check
    pub fn text_frame(&self) -> Option<&TextFrame> {
        match self {
            Shape::TextBox(frame) => Some(frame),
            Shape::Graphic => None,
        }
    }

    /// Mutable text-frame access
    pub fn text_frame_mut(&mut self) -> Option<&mut TextFrame> {
        match self {
            Shape::TextBox(frame) => Some(frame),
            Shape::Graphic => None,
        }
    }

    /// Whether this shape carries a text frame
    pub fn has_text_frame(&self) -> bool {
        matches!(self, Shape::TextBox(_))
    }
}

/// One slide: the shapes of a single slide part
#[derive(Debug, Clone)]
pub struct Slide {
    /// Path of the slide part inside the archive (e.g. "ppt/slides/slide1.xml")
    pub archive_path: String,
    /// Shapes of the slide, in document order
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Run texts of the slide flattened in document order.
    ///
    /// This order is the write-back key: it matches the order run text
    /// elements appear in the slide XML, one entry per modeled run.
    fn run_texts(&self) -> Vec<String> {
        self.shapes
            .iter()
            .filter_map(Shape::text_frame)
            .flat_map(|frame| frame.paragraphs.iter())
            .flat_map(|paragraph| paragraph.runs.iter())
            .map(|run| run.text.clone())
            .collect()
    }
}

/// An open presentation: the original archive bytes plus the mutable model.
///
/// The model is mutated paragraph-by-paragraph during a translation pass and
/// re-rendered into the archive on save; every part that is not a slide is
/// copied through untouched.
#[derive(Debug)]
pub struct Presentation {
    /// Path the presentation was opened from
    pub source_path: PathBuf,
    /// Original archive bytes, kept for re-rendering on save
    raw: Vec<u8>,
    /// Slides in presentation order
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Open a presentation container from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let raw = fs::read(path)
            .map_err(|e| DocumentError::Container(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_bytes(raw, path.to_path_buf())
    }

    /// Build the model from raw container bytes
    pub fn from_bytes(raw: Vec<u8>, source_path: PathBuf) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(raw.as_slice()))
            .map_err(|e| DocumentError::Container(format!("Failed to open archive: {}", e)))?;

        // Slide parts, in slide-number order
        let mut slide_paths = Vec::new();
        for i in 0..archive.len() {
            let name = archive
                .by_index(i)
                .map_err(|e| DocumentError::Container(format!("Failed to read archive entry: {}", e)))?
                .name()
                .to_string();
            if is_slide_path(&name) {
                slide_paths.push(name);
            }
        }
        slide_paths.sort_by_key(|path| slide_index_from_path(path).unwrap_or(usize::MAX));

        let mut slides = Vec::with_capacity(slide_paths.len());
        for path in slide_paths {
            let xml = read_archive_file(&mut archive, &path)?;
            let shapes = parse_slide_xml(&xml)?;
            slides.push(Slide {
                archive_path: path,
                shapes,
            });
        }

        Ok(Self {
            source_path,
            raw,
            slides,
        })
    }

    /// Number of shapes carrying a text frame, the progress-bar total
    pub fn text_shape_count(&self) -> usize {
        self.slides
            .iter()
            .flat_map(|slide| slide.shapes.iter())
            .filter(|shape| shape.has_text_frame())
            .count()
    }

    /// Re-render the container with the model's current run texts
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(self.raw.as_slice()))
            .map_err(|e| DocumentError::Container(format!("Failed to open archive: {}", e)))?;

        // Re-render each slide part against the model before repacking
        let mut rewritten: HashMap<String, String> = HashMap::new();
        for slide in &self.slides {
            let xml = read_archive_file(&mut archive, &slide.archive_path)?;
            let updated = rewrite_slide_xml(&xml, &slide.run_texts())?;
            rewritten.insert(slide.archive_path.clone(), updated);
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for i in 0..archive.len() {
            let name = archive
                .by_index(i)
                .map_err(|e| DocumentError::Container(format!("Failed to read archive entry: {}", e)))?
                .name()
                .to_string();

            if let Some(xml) = rewritten.get(&name) {
                let options =
                    FileOptions::default().compression_method(CompressionMethod::Deflated);
                writer
                    .start_file(name, options)
                    .map_err(|e| DocumentError::Save(format!("Failed to start entry: {}", e)))?;
                writer
                    .write_all(xml.as_bytes())
                    .map_err(|e| DocumentError::Save(format!("Failed to write entry: {}", e)))?;
            } else {
                let file = archive.by_index(i).map_err(|e| {
                    DocumentError::Container(format!("Failed to read archive entry: {}", e))
                })?;
                writer
                    .raw_copy_file(file)
                    .map_err(|e| DocumentError::Save(format!("Failed to copy entry: {}", e)))?;
            }
        }

        let cursor = writer
            .finish()
            .map_err(|e| DocumentError::Save(format!("Failed to finish archive: {}", e)))?;
        Ok(cursor.into_inner())
    }

    /// Persist the mutated presentation to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DocumentError::Save(format!("Failed to create {:?}: {}", parent, e)))?;
        }
        fs::write(path, bytes)
            .map_err(|e| DocumentError::Save(format!("Failed to write {:?}: {}", path, e)))
    }
}

/// Whether an archive entry is a slide part (not a layout, master or rels)
fn is_slide_path(path: &str) -> bool {
    path.starts_with("ppt/slides/slide") && path.ends_with(".xml") && !path.contains("_rels")
}

/// Extract a slide number from a path like "ppt/slides/slide3.xml"
fn slide_index_from_path(path: &str) -> Option<usize> {
    let stem = path.trim_end_matches(".xml");
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

/// Extract the local name from a potentially namespaced XML element name
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Read a file from the ZIP archive
fn read_archive_file<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String, DocumentError> {
    let mut file = archive.by_name(path).map_err(|e| {
        DocumentError::Container(format!("File not found in archive '{}': {}", path, e))
    })?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| DocumentError::Container(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Per-shape accumulator used while walking slide XML
#[derive(Default)]
struct ShapeBuilder {
    frame: Option<TextFrame>,
    in_txbody: bool,
    current_paragraph: Option<Paragraph>,
}

/// Parse one slide part into shapes.
///
/// A run is modeled for every text element (`a:t`) inside a run element
/// (`a:r`) inside a shape's text body; anything else (field codes, table
/// cells inside graphic frames) is left to the raw XML. The rewrite pass
/// uses the same predicate, which keeps the model and the XML in a strict
/// one-to-one correspondence.
fn parse_slide_xml(xml: &str) -> Result<Vec<Shape>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut shape_stack: Vec<ShapeBuilder> = Vec::new();
    let mut in_run = false;
    let mut in_text = false;
    let mut pending_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => shape_stack.push(ShapeBuilder::default()),
                b"txBody" => {
                    if let Some(builder) = shape_stack.last_mut() {
                        builder.in_txbody = true;
                        builder.frame.get_or_insert_with(TextFrame::default);
                    }
                }
                b"p" => {
                    if let Some(builder) = shape_stack.last_mut() {
                        if builder.in_txbody {
                            builder.current_paragraph = Some(Paragraph::default());
                        }
                    }
                }
                b"r" => {
                    if let Some(builder) = shape_stack.last_mut() {
                        if builder.current_paragraph.is_some() {
                            in_run = true;
                        }
                    }
                }
                b"t" => {
                    if in_run {
                        in_text = true;
                        pending_text.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    if let Some(builder) = shape_stack.last_mut() {
                        if builder.in_txbody {
                            if let Some(frame) = builder.frame.as_mut() {
                                frame.paragraphs.push(Paragraph::default());
                            }
                        }
                    }
                }
                b"t" => {
                    if in_run {
                        if let Some(builder) = shape_stack.last_mut() {
                            if let Some(paragraph) = builder.current_paragraph.as_mut() {
                                paragraph.runs.push(Run::default());
                            }
                        }
                    }
                }
                b"pic" | b"graphicFrame" | b"cxnSp" => shapes.push(Shape::Graphic),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    pending_text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::CData(ref e)) => {
                if in_text {
                    pending_text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => {
                    if in_text {
                        if let Some(builder) = shape_stack.last_mut() {
                            if let Some(paragraph) = builder.current_paragraph.as_mut() {
                                paragraph.runs.push(Run {
                                    text: std::mem::take(&mut pending_text),
                                });
                            }
                        }
                        in_text = false;
                    }
                }
                b"r" => in_run = false,
                b"p" => {
                    if let Some(builder) = shape_stack.last_mut() {
                        if let Some(paragraph) = builder.current_paragraph.take() {
                            if let Some(frame) = builder.frame.as_mut() {
                                frame.paragraphs.push(paragraph);
                            }
                        }
                    }
                }
                b"txBody" => {
                    if let Some(builder) = shape_stack.last_mut() {
                        builder.in_txbody = false;
                    }
                }
                b"sp" => {
                    if let Some(builder) = shape_stack.pop() {
                        shapes.push(match builder.frame {
                            Some(frame) => Shape::TextBox(frame),
                            None => Shape::Graphic,
                        });
                    }
                }
                b"pic" | b"graphicFrame" | b"cxnSp" => shapes.push(Shape::Graphic),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Xml(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Re-render one slide part, substituting run texts in document order.
///
/// Everything except the text inside run text elements passes through
/// unchanged, so run count and formatting markup survive byte-for-byte.
/// A self-closed text element gains a text child when its replacement is
/// non-empty; an emptied run keeps its element but loses the content.
fn rewrite_slide_xml(xml: &str, run_texts: &[String]) -> Result<String, DocumentError> {
    fn xml_err<E: std::fmt::Display>(e: E) -> DocumentError {
        DocumentError::Xml(format!("Error rewriting slide: {}", e))
    }

    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut sp_depth = 0usize;
    let mut in_txbody = false;
    let mut in_run = false;
    let mut next_run = 0usize;
    // Replacement for the currently open text element, if any
    let mut replacement: Option<&str> = None;
    let mut replaced = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                match local_name(e.name().as_ref()) {
                    b"sp" => sp_depth += 1,
                    b"txBody" if sp_depth > 0 => in_txbody = true,
                    b"r" if in_txbody => in_run = true,
                    b"t" if in_run => {
                        replacement = run_texts.get(next_run).map(String::as_str);
                        next_run += 1;
                        replaced = false;
                    }
                    _ => {}
                }
                writer.write_event(Event::Start(e)).map_err(xml_err)?;
            }
            Ok(Event::Empty(e)) => {
                if local_name(e.name().as_ref()) == b"t" && in_run {
                    let text = run_texts.get(next_run).map(String::as_str);
                    next_run += 1;
                    match text {
                        Some(text) if !text.is_empty() => {
                            let end = e.to_end().into_owned();
                            writer.write_event(Event::Start(e)).map_err(xml_err)?;
                            writer
                                .write_event(Event::Text(BytesText::new(text)))
                                .map_err(xml_err)?;
                            writer.write_event(Event::End(end)).map_err(xml_err)?;
                        }
                        _ => writer.write_event(Event::Empty(e)).map_err(xml_err)?,
                    }
                } else {
                    writer.write_event(Event::Empty(e)).map_err(xml_err)?;
                }
            }
            Ok(Event::Text(e)) => match replacement {
                Some(text) => {
                    if !replaced {
                        writer
                            .write_event(Event::Text(BytesText::new(text)))
                            .map_err(xml_err)?;
                        replaced = true;
                    }
                }
                None => writer.write_event(Event::Text(e)).map_err(xml_err)?,
            },
            Ok(Event::CData(e)) => match replacement {
                Some(text) => {
                    if !replaced {
                        writer
                            .write_event(Event::Text(BytesText::new(text)))
                            .map_err(xml_err)?;
                        replaced = true;
                    }
                }
                None => writer.write_event(Event::CData(e)).map_err(xml_err)?,
            },
            Ok(Event::End(e)) => {
                match local_name(e.name().as_ref()) {
                    b"t" => {
                        // Originally-empty <a:t></a:t> may still need content
                        if let Some(text) = replacement.take() {
                            if !replaced && !text.is_empty() {
                                writer
                                    .write_event(Event::Text(BytesText::new(text)))
                                    .map_err(xml_err)?;
                            }
                        }
                        replaced = false;
                    }
                    b"r" => in_run = false,
                    b"txBody" => in_txbody = false,
                    b"sp" => sp_depth = sp_depth.saturating_sub(1),
                    _ => {}
                }
                writer.write_event(Event::End(e)).map_err(xml_err)?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event).map_err(xml_err)?,
            Err(e) => {
                return Err(DocumentError::Xml(format!("Error rewriting slide: {}", e)));
            }
        }
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| DocumentError::Xml(format!("Rewritten slide is not UTF-8: {}", e)))
}
