//! Inspector session
//!
//! [`InspectorSession`] is the application-facing entry point. It owns the source text, a
//! [`SourceParser`] and the [`TreeTableView`], and turns "open", "reload" and "change mode"
//! into tree installs.
//!
//! # Architecture Notes
//!
//! Every load follows the same path:
//!
//! 1. The source is split into lines and a [`LineOffsetTable`] is built from them.
//! 2. The parser turns the lines into a [`ParseTree`] for the current [`ParseMode`].
//! 3. The tree and the offsets are installed together, which clears the selection.
//!
//! A failed load leaves the session showing nothing (the sentinel root only) and returns the
//! error. The source is kept so that [`reload`](InspectorSession::reload) can retry after the
//! mode changes.

use crate::adapter::DocCommentParser;
use crate::error::{InspectorError, Result};
use crate::line_offsets::LineOffsetTable;
use crate::model::ParseTreeModel;
use crate::node::{ParseMode, ParseTree};
use crate::span::Span;
use crate::text::split_lines;
use crate::view::{SearchOutcome, TreeTableConfig, TreeTableView};
use ropey::Rope;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Name used for text opened without a file.
pub const MEMORY_SOURCE: &str = "<memory>";

/// Turns source lines into a parse tree.
pub trait SourceParser {
    /// The error type returned by [`SourceParser::parse`].
    type Error: std::error::Error;

    /// Parse `lines` for `mode`. Comment nodes are only produced when the mode keeps them.
    fn parse(
        &mut self,
        lines: &[String],
        mode: ParseMode,
    ) -> std::result::Result<ParseTree, Self::Error>;

    /// Doc comment parser to graft doc trees with, if the language has one.
    fn doc_parser(&self) -> Option<Rc<dyn DocCommentParser>> {
        None
    }
}

/// Session change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChangeType {
    /// A document was parsed and installed.
    DocumentLoaded,
    /// Opening or reloading a document failed.
    LoadFailed,
    /// The parse mode changed.
    ParseModeChanged,
}

/// Session change record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChange {
    /// Change type
    pub change_type: SessionChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
}

/// Session change callback function type
pub type SessionCallback = Box<dyn FnMut(&SessionChange)>;

/// The loaded source.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    name: String,
    path: Option<PathBuf>,
    lines: Vec<String>,
    text: Rope,
}

impl SourceDocument {
    fn new(name: impl Into<String>, path: Option<PathBuf>, text: &str) -> Self {
        Self {
            name: name.into(),
            path,
            lines: split_lines(text),
            text: Rope::from_str(text),
        }
    }

    /// Display name: the file name, or `<memory>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the text was read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Lines without terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The full text.
    pub fn text(&self) -> &Rope {
        &self.text
    }

    /// Characters `span` covers.
    ///
    /// Offsets count one `\n` per line whatever the file used, so the slice is taken from the
    /// lines rather than the raw text.
    pub fn slice(&self, span: Span) -> String {
        self.lines
            .join("\n")
            .chars()
            .skip(span.start)
            .take(span.len())
            .collect()
    }
}

/// A parse-tree inspector over one source document at a time.
///
/// # Example
///
/// ```rust
/// use inspector_core::{InspectorSession, NodeData, ParseMode, ParseTree, ParseTreeBuilder,
///     SearchOutcome, SourceParser, TreeTableConfig};
/// use inspector_lang::Vocabulary;
/// use std::sync::Arc;
///
/// struct OneNode;
///
/// impl SourceParser for OneNode {
///     type Error = std::convert::Infallible;
///
///     fn parse(&mut self, lines: &[String], _mode: ParseMode) -> Result<ParseTree, Self::Error> {
///         let vocabulary = Arc::new(Vocabulary::from_names(["EOF", "FILE"]));
///         let text = lines.first().cloned().unwrap_or_default();
///         Ok(ParseTreeBuilder::new(vocabulary, NodeData::new(1, 1, 0, text)).finish())
///     }
/// }
///
/// let mut session = InspectorSession::new(OneNode, TreeTableConfig::default());
/// session.open_document("hello").unwrap();
/// session.view_mut().process_idle();
/// assert_eq!(session.view().row_count(), 1);
/// assert_eq!(session.search_by_locator("/FILE[@text='hello']"), SearchOutcome::Found);
/// ```
pub struct InspectorSession<P: SourceParser> {
    parser: P,
    view: TreeTableView,
    document: Option<SourceDocument>,
    loaded: bool,
    version: u64,
    callbacks: Vec<SessionCallback>,
}

impl<P: SourceParser> InspectorSession<P> {
    /// Create a session with nothing loaded.
    pub fn new(parser: P, config: TreeTableConfig) -> Self {
        let mut model = ParseTreeModel::new();
        if let Some(doc_parser) = parser.doc_parser() {
            model = model.with_doc_parser(doc_parser);
        }
        Self {
            parser,
            view: TreeTableView::new(model, config),
            document: None,
            loaded: false,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Parse `text` and show its tree.
    pub fn open_document(&mut self, text: &str) -> Result<()> {
        self.document = Some(SourceDocument::new(MEMORY_SOURCE, None, text));
        self.load()
    }

    /// Parse `text` under a display name and show its tree.
    pub fn open_named(&mut self, name: &str, text: &str) -> Result<()> {
        self.document = Some(SourceDocument::new(name, None, text));
        self.load()
    }

    /// Read `path` as UTF-8, parse it and show its tree.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                self.clear();
                return Err(self.fail(err.into()));
            }
        };
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        self.document = Some(SourceDocument::new(name, Some(path.to_path_buf()), &text));
        self.load()
    }

    /// Re-parse the current source with the current mode. Files are read again from disk.
    ///
    /// Does nothing if no source was ever opened.
    pub fn reload(&mut self) -> Result<()> {
        let Some(document) = self.document.as_ref() else {
            return Ok(());
        };
        if let Some(path) = document.path.clone() {
            return self.open_file(path);
        }
        self.load()
    }

    /// Change the parse mode. The shown tree is unchanged until the next [`reload`](Self::reload).
    pub fn set_parse_mode(&mut self, mode: ParseMode) {
        if self.parse_mode() == mode {
            return;
        }
        self.view.set_parse_mode(mode);
        self.mark(SessionChangeType::ParseModeChanged);
    }

    /// Current parse mode.
    pub fn parse_mode(&self) -> ParseMode {
        self.view.model().parse_mode()
    }

    /// Source span of the selected node, `(start, end)` in character offsets.
    pub fn current_selection_span(&self) -> Option<Span> {
        self.view.current_selection_span()
    }

    /// Find a node by locator, expand to it and select it.
    pub fn search_by_locator(&mut self, query: &str) -> SearchOutcome {
        let outcome = self.view.search_by_locator(query);
        tracing::debug!(query, ?outcome, "locator search");
        outcome
    }

    /// The view.
    pub fn view(&self) -> &TreeTableView {
        &self.view
    }

    /// The view, mutably.
    pub fn view_mut(&mut self) -> &mut TreeTableView {
        &mut self.view
    }

    /// The current source, kept after a failed parse.
    pub fn document(&self) -> Option<&SourceDocument> {
        self.document.as_ref()
    }

    /// Returns `true` if a tree is installed.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The parser.
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Window title for the current state.
    pub fn title(&self) -> String {
        match (&self.document, self.loaded) {
            (Some(document), true) => {
                format!("{} - {}", document.name(), self.parse_mode().label())
            }
            _ => "No file opened".to_string(),
        }
    }

    /// Subscribe to session change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionChange) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Current version. Every change notification increments it.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn load(&mut self) -> Result<()> {
        let Some(document) = self.document.as_ref() else {
            return Ok(());
        };
        let mode = self.parse_mode();
        match self.parser.parse(document.lines(), mode) {
            Ok(tree) => {
                let offsets = LineOffsetTable::build(document.lines());
                tracing::debug!(
                    source = document.name(),
                    lines = document.lines().len(),
                    mode = mode.label(),
                    "document parsed"
                );
                self.view.set_root(Some(tree), offsets);
                self.loaded = true;
                self.mark(SessionChangeType::DocumentLoaded);
                Ok(())
            }
            Err(err) => {
                let error = InspectorError::Parse {
                    source_name: document.name().to_string(),
                    message: err.to_string(),
                };
                self.clear();
                Err(self.fail(error))
            }
        }
    }

    fn clear(&mut self) {
        self.view.set_root(None, LineOffsetTable::empty());
        self.loaded = false;
    }

    fn fail(&mut self, error: InspectorError) -> InspectorError {
        tracing::warn!(%error, "load failed");
        self.mark(SessionChangeType::LoadFailed);
        error
    }

    fn mark(&mut self, change_type: SessionChangeType) {
        let old_version = self.version;
        self.version += 1;
        let change = SessionChange {
            change_type,
            old_version,
            new_version: self.version,
        };
        for callback in self.callbacks.iter_mut() {
            callback(&change);
        }
    }
}
