// SPDX-License-Identifier: MIT
//
// Browser — the screen state machine behind the event loop.
//
// One value holds everything the screens share: the store, the current
// database and collection, the loaded page of documents, the one-shot
// message and at most one open dialog. Each key goes to the dialog if
// one is open, otherwise to the current screen's handler. Handlers call
// the store synchronously and move between screens:
//
//   Connection ──ENTER──▶ DatabaseList ──ENTER──▶ CollectionList
//        ▲                     │  ▲                   │  ▲
//        └────────Q────────────┘  └────────B──────────┘  │
//                                                        B
//   DocumentDetail ◀──ENTER── DocumentViewer ◀──ENTER────┘
//
// F1 opens Help from any list screen; any key returns. Ctrl+C quits from
// anywhere.
//
// Layout of the full-screen lists and the viewer:
//
//   ┌─────────[ title ]─────────┐   row 0
//   │ header line               │   row 1
//   ├───────────────────────────┤   row 2
//   │ items / documents         │   rows 3 .. h-4
//   │ message bar               │   row h-3
//   └───────────────────────────┘
//    status bar                     row h-1

use d_editor::view::{repaint_json, Viewport};
use d_editor::{EditSession, SessionStatus};
use d_json::pretty;
use d_term::ansi::CursorShape;
use d_term::buffer::FrameBuffer;
use d_term::event_loop::{Action, App};
use d_term::input::{Event, KeyCode, KeyEvent};
use d_term::terminal::{Size, FALLBACK_SIZE};
use d_theme::Theme;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::dialog::{Dialog, Intent, Reply, EDITOR_CAPACITY};
use crate::store::{document_to_json, json_to_document, Document, DocumentStore, StoreError};
use crate::ui::{self, ListState, Message, MessageKind};

/// Bytes the connection URI field holds, terminator slot included.
pub const URI_CAPACITY: usize = 512;

const CONNECT_SIZE: (u16, u16) = (12, 70);

/// Screen rows given to each document in the viewer.
const DOC_ROWS: u16 = 8;

const CONNECT_HINT: &str = "Type URI | ENTER: Connect | ESC: Quit | DELETE: Clear";
const DATABASE_HINT: &str = "UP/DOWN: Navigate | ENTER: Select | Q: Disconnect | F1: Help";
const COLLECTION_HINT: &str = concat!(
    "UP/DOWN: Navigate | ENTER: Select | C: Create | D: Delete | B: Back | ",
    "Q: Disconnect | F1: Help",
);
const VIEWER_HINT: &str = concat!(
    "UP/DOWN: Select | PgUp/PgDn: Page | ENTER: View | I: Insert | E: Edit | D: Delete | ",
    "F: Filter | B: Back | R: Refresh | F1: Help",
);
const DETAIL_HINT: &str = "Press any key to return";

const INSERT_TEMPLATE: &str = "{\n  \n}";

const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation:",
        &[
            ("UP/DOWN", "Navigate lists"),
            ("ENTER", "Select item / view document"),
            ("B", "Go back"),
            ("Q", "Disconnect"),
        ],
    ),
    (
        "Collections:",
        &[("C", "Create collection"), ("D", "Delete collection")],
    ),
    (
        "Document Viewer:",
        &[
            ("PgUp/PgDn", "Navigate pages"),
            ("I", "Insert document"),
            ("E", "Edit selected document"),
            ("D", "Delete selected document"),
            ("F", "Filter (JSON, empty clears)"),
            ("R", "Refresh"),
        ],
    ),
    (
        "Insert / Edit Document:",
        &[("Arrows", "Move cursor"), ("F2", "Save document"), ("ESC", "Cancel")],
    ),
    (
        "General:",
        &[
            ("F1", "Show this help"),
            ("ESC", "Quit (connection screen)"),
            ("Ctrl+C", "Quit"),
        ],
    ),
];

// ─── Screen ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Connection,
    DatabaseList,
    CollectionList,
    DocumentViewer,
    DocumentDetail,
    Help,
}

// ─── Browser ────────────────────────────────────────────────────────────────

/// Application state for every screen.
pub struct Browser<S> {
    store: S,
    theme: Theme,
    page_size: usize,
    size: Size,

    screen: Screen,
    help_return: Screen,
    uri: EditSession,

    databases: Vec<String>,
    db_list: ListState,
    collections: Vec<String>,
    coll_list: ListState,
    database: String,
    collection: String,

    documents: Vec<Document>,
    total: u64,
    page: usize,
    doc_selected: usize,
    filter: Document,
    filter_text: String,

    message: Option<Message>,
    dialog: Option<Dialog>,
    cursor_screen: Option<(u16, u16)>,
}

impl<S: DocumentStore> Browser<S> {
    /// Start on the connection screen with `uri` pre-filled.
    pub fn new(store: S, theme: Theme, page_size: usize, uri: Option<&str>) -> Self {
        let field_width = usize::from(CONNECT_SIZE.1 - 4);
        Self {
            store,
            theme,
            page_size: page_size.max(1),
            size: FALLBACK_SIZE,
            screen: Screen::Connection,
            help_return: Screen::Connection,
            uri: EditSession::single_line(uri.unwrap_or_default(), URI_CAPACITY, field_width),
            databases: Vec::new(),
            db_list: ListState::default(),
            collections: Vec::new(),
            coll_list: ListState::default(),
            database: String::new(),
            collection: String::new(),
            documents: Vec::new(),
            total: 0,
            page: 0,
            doc_selected: 0,
            filter: Document::new(),
            filter_text: String::new(),
            message: None,
            dialog: None,
            cursor_screen: None,
        }
    }

    fn total_pages(&self) -> usize {
        usize::try_from(self.total)
            .unwrap_or(usize::MAX)
            .div_ceil(self.page_size)
            .max(1)
    }

    fn go(&mut self, screen: Screen) {
        debug!(from = ?self.screen, to = ?screen, "screen");
        self.screen = screen;
    }

    fn notify(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(Message::new(kind, text));
    }

    // ── Loading ─────────────────────────────────────────────────────

    fn load_databases(&mut self) -> bool {
        match self.store.list_databases() {
            Ok(names) => {
                self.databases = names;
                self.db_list.clamp(self.databases.len());
                if self.databases.is_empty() {
                    self.notify(MessageKind::Warning, "No databases found");
                }
                true
            }
            Err(e) => {
                warn!("list databases: {e}");
                self.notify(MessageKind::Error, format!("Failed to list databases: {e}"));
                self.disconnect();
                false
            }
        }
    }

    fn load_collections(&mut self) -> bool {
        match self.store.list_collections(&self.database) {
            Ok(names) => {
                self.collections = names;
                self.coll_list.clamp(self.collections.len());
                if self.collections.is_empty() {
                    self.notify(MessageKind::Warning, "No collections found in this database");
                }
                true
            }
            Err(e) => {
                warn!(db = %self.database, "list collections: {e}");
                self.notify(MessageKind::Error, format!("Failed to list collections: {e}"));
                self.go(Screen::DatabaseList);
                false
            }
        }
    }

    fn fetch_page(&mut self) -> Result<(), StoreError> {
        self.total = self.store.count(&self.database, &self.collection, &self.filter)?;
        self.page = self.page.min(self.total_pages() - 1);
        self.documents = self.store.find(
            &self.database,
            &self.collection,
            &self.filter,
            self.page * self.page_size,
            self.page_size,
        )?;
        self.doc_selected = self.doc_selected.min(self.documents.len().saturating_sub(1));
        Ok(())
    }

    fn load_documents(&mut self) -> bool {
        match self.fetch_page() {
            Ok(()) => {
                if self.documents.is_empty() {
                    let text = if self.filter.is_empty() {
                        "No documents in this collection"
                    } else {
                        "No documents match the filter"
                    };
                    self.notify(MessageKind::Warning, text);
                }
                true
            }
            Err(e) => {
                warn!(db = %self.database, collection = %self.collection, "load documents: {e}");
                self.notify(MessageKind::Error, format!("Failed to load documents: {e}"));
                self.go(Screen::CollectionList);
                false
            }
        }
    }

    // ── Connection ──────────────────────────────────────────────────

    fn connect(&mut self) {
        let uri = self.uri.text();
        let uri = uri.trim();
        self.uri.resume();
        if uri.is_empty() {
            self.notify(MessageKind::Error, "Error: URI cannot be empty");
            return;
        }
        match self.store.connect(uri) {
            Ok(()) => {
                self.db_list = ListState::default();
                if self.load_databases() {
                    self.go(Screen::DatabaseList);
                    if self.message.is_none() {
                        self.notify(MessageKind::Success, "Connected successfully!");
                    }
                }
            }
            Err(e) => {
                warn!("connect: {e}");
                self.notify(MessageKind::Error, format!("Connection failed: {e}"));
            }
        }
    }

    fn disconnect(&mut self) {
        if self.store.is_connected() {
            info!("disconnected");
        }
        self.store.disconnect();
        self.uri.resume();
        self.go(Screen::Connection);
    }

    fn on_connection_key(&mut self, key: &KeyEvent) -> Action {
        match self.uri.handle_key(key) {
            SessionStatus::Editing => {}
            SessionStatus::Cancelled => return Action::Quit,
            SessionStatus::Committed => self.connect(),
        }
        Action::Continue
    }

    // ── Lists ───────────────────────────────────────────────────────

    fn show_help(&mut self) {
        self.help_return = self.screen;
        self.go(Screen::Help);
    }

    fn on_database_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Up => self.db_list.up(),
            KeyCode::Down => self.db_list.down(self.databases.len()),
            KeyCode::Enter if !self.databases.is_empty() => {
                self.database = self.databases[self.db_list.selected].clone();
                self.coll_list = ListState::default();
                if self.load_collections() {
                    self.go(Screen::CollectionList);
                }
            }
            KeyCode::Char('q' | 'Q') => {
                self.disconnect();
                self.notify(MessageKind::Info, "Disconnected");
            }
            KeyCode::F(1) => self.show_help(),
            _ => {}
        }
    }

    fn on_collection_key(&mut self, key: &KeyEvent) {
        let has_items = !self.collections.is_empty();
        match key.code {
            KeyCode::Up => self.coll_list.up(),
            KeyCode::Down => self.coll_list.down(self.collections.len()),
            KeyCode::Enter if has_items => {
                self.collection = self.collections[self.coll_list.selected].clone();
                self.page = 0;
                self.doc_selected = 0;
                self.filter.clear();
                self.filter_text.clear();
                if self.load_documents() {
                    self.go(Screen::DocumentViewer);
                }
            }
            KeyCode::Char('c' | 'C') => {
                self.dialog = Some(Dialog::prompt(
                    Intent::CreateCollection,
                    "Create Collection",
                    "Collection name:",
                    "Enter the name for the new collection",
                    "",
                ));
            }
            KeyCode::Char('d' | 'D') if has_items => {
                let name = self.collections[self.coll_list.selected].clone();
                let question = format!("Are you sure you want to delete collection '{name}'?");
                self.dialog = Some(Dialog::confirm(
                    Intent::DropCollection(name),
                    "Delete Collection",
                    &question,
                ));
            }
            KeyCode::Char('b' | 'B') => {
                if self.load_databases() {
                    self.go(Screen::DatabaseList);
                }
            }
            KeyCode::Char('q' | 'Q') => {
                self.disconnect();
                self.notify(MessageKind::Info, "Disconnected");
            }
            KeyCode::F(1) => self.show_help(),
            _ => {}
        }
    }

    fn create_collection(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        match self.store.create_collection(&self.database, name) {
            Ok(()) => {
                self.load_collections();
                if let Some(i) = self.collections.iter().position(|c| c == name) {
                    self.coll_list.selected = i;
                }
                self.notify(MessageKind::Success, "Collection created successfully!");
            }
            Err(e) => {
                warn!(db = %self.database, collection = name, "create collection: {e}");
                self.notify(MessageKind::Error, format!("Failed to create collection: {e}"));
            }
        }
    }

    fn drop_collection(&mut self, name: &str) {
        match self.store.drop_collection(&self.database, name) {
            Ok(()) => {
                self.load_collections();
                self.notify(MessageKind::Success, "Collection deleted successfully!");
            }
            Err(e) => {
                warn!(db = %self.database, collection = name, "drop collection: {e}");
                self.notify(MessageKind::Error, format!("Failed to delete collection: {e}"));
            }
        }
    }

    // ── Documents ───────────────────────────────────────────────────

    fn on_viewer_key(&mut self, key: &KeyEvent) {
        let has_docs = !self.documents.is_empty();
        match key.code {
            KeyCode::Up => self.doc_selected = self.doc_selected.saturating_sub(1),
            KeyCode::Down => {
                if self.doc_selected + 1 < self.documents.len() {
                    self.doc_selected += 1;
                }
            }
            KeyCode::PageDown if self.page + 1 < self.total_pages() => {
                self.page += 1;
                self.doc_selected = 0;
                self.load_documents();
            }
            KeyCode::PageUp if self.page > 0 => {
                self.page -= 1;
                self.doc_selected = 0;
                self.load_documents();
            }
            KeyCode::Enter if has_docs => self.go(Screen::DocumentDetail),
            KeyCode::Char('i' | 'I') => {
                self.dialog = Some(Dialog::editor(
                    Intent::InsertDocument,
                    "Insert Document",
                    "Enter JSON document. Press F2 to save, ESC to cancel.",
                    INSERT_TEMPLATE,
                    self.size.cols,
                ));
            }
            KeyCode::Char('e' | 'E') if has_docs => self.open_edit(),
            KeyCode::Char('d' | 'D') if has_docs => {
                let doc = self.documents[self.doc_selected].clone();
                self.dialog = Some(Dialog::confirm(
                    Intent::DeleteDocument(doc),
                    "Delete Document",
                    "Are you sure you want to delete this document?",
                ));
            }
            KeyCode::Char('f' | 'F') => {
                self.dialog = Some(Dialog::prompt(
                    Intent::SetFilter,
                    "Filter Documents",
                    "Filter (JSON):",
                    "Match top-level fields, e.g. {\"status\":\"active\"}. Empty clears.",
                    &self.filter_text,
                ));
            }
            KeyCode::Char('r' | 'R') => {
                self.load_documents();
            }
            KeyCode::Char('b' | 'B') => {
                if self.load_collections() {
                    self.go(Screen::CollectionList);
                }
            }
            KeyCode::Char('q' | 'Q') => {
                self.disconnect();
                self.notify(MessageKind::Info, "Disconnected");
            }
            KeyCode::F(1) => self.show_help(),
            _ => {}
        }
    }

    fn open_edit(&mut self) {
        let doc = self.documents[self.doc_selected].clone();
        let text = pretty(&document_to_json(&doc));
        if text.len() >= EDITOR_CAPACITY {
            self.notify(
                MessageKind::Error,
                format!("Document too large to edit ({} bytes)", text.len()),
            );
            return;
        }
        self.dialog = Some(Dialog::editor(
            Intent::EditDocument(doc),
            "Edit Document",
            "Edit the JSON. Press F2 to save, ESC to cancel.",
            &text,
            self.size.cols,
        ));
    }

    fn insert_document(&mut self, doc: Document) {
        match self.store.insert(&self.database, &self.collection, doc) {
            Ok(id) => {
                info!(db = %self.database, collection = %self.collection, %id, "document inserted");
                if self.load_documents() {
                    self.notify(MessageKind::Success, "Document inserted successfully!");
                }
            }
            Err(e) => {
                warn!("insert: {e}");
                self.notify(MessageKind::Error, format!("Insert failed: {e}"));
            }
        }
    }

    fn update_document(&mut self, original: &Document, edited: Document) {
        let filter = id_filter(original);
        let update = update_from_edit(original, edited);
        match self
            .store
            .update(&self.database, &self.collection, &filter, &update, false)
        {
            Ok(0) => self.notify(MessageKind::Warning, "Document unchanged"),
            Ok(_) => {
                if self.load_documents() {
                    self.notify(MessageKind::Success, "Document updated successfully!");
                }
            }
            Err(e) => {
                warn!("update: {e}");
                self.notify(MessageKind::Error, format!("Failed to update document: {e}"));
            }
        }
    }

    fn delete_document(&mut self, doc: &Document) {
        let filter = id_filter(doc);
        match self
            .store
            .delete(&self.database, &self.collection, &filter, false)
        {
            Ok(0) => self.notify(MessageKind::Error, "Delete failed: document not found"),
            Ok(_) => {
                if self.doc_selected + 1 >= self.documents.len() {
                    self.doc_selected = self.documents.len().saturating_sub(2);
                }
                if self.load_documents() {
                    self.notify(MessageKind::Success, "Document deleted successfully!");
                }
            }
            Err(e) => {
                warn!("delete: {e}");
                self.notify(MessageKind::Error, format!("Delete failed: {e}"));
            }
        }
    }

    fn set_filter(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.filter.clear();
            self.filter_text.clear();
        } else {
            match json_to_document(text) {
                Ok(filter) => {
                    self.filter = filter;
                    self.filter_text = text.to_string();
                }
                Err(e) => {
                    self.notify(MessageKind::Error, format!("Invalid filter: {e}"));
                    return;
                }
            }
        }
        self.page = 0;
        self.doc_selected = 0;
        if self.load_documents() && self.message.is_none() {
            let text = if self.filter.is_empty() {
                "Filter cleared".to_string()
            } else {
                format!("Filter applied: {} matching", self.total)
            };
            self.notify(MessageKind::Info, text);
        }
    }

    // ── Dialogs ─────────────────────────────────────────────────────

    fn on_dialog_key(&mut self, mut dialog: Dialog, key: &KeyEvent) {
        match dialog.handle_key(key) {
            Reply::Pending => self.dialog = Some(dialog),
            Reply::Cancelled => debug!(title = %dialog.title, "dialog cancelled"),
            Reply::Yes => match dialog.intent {
                Intent::DropCollection(name) => self.drop_collection(&name),
                Intent::DeleteDocument(doc) => self.delete_document(&doc),
                _ => {}
            },
            Reply::Text(text) => self.submit(dialog, &text),
        }
    }

    fn submit(&mut self, mut dialog: Dialog, text: &str) {
        match dialog.intent {
            Intent::CreateCollection => self.create_collection(text.trim()),
            Intent::SetFilter => self.set_filter(text),
            Intent::InsertDocument | Intent::EditDocument(_) => {
                if text.trim().is_empty() {
                    return;
                }
                match json_to_document(text) {
                    Err(e) => {
                        dialog.reject(format!("Invalid JSON: {e}"));
                        self.dialog = Some(dialog);
                    }
                    Ok(doc) => match dialog.intent {
                        Intent::EditDocument(original) => self.update_document(&original, doc),
                        _ => self.insert_document(doc),
                    },
                }
            }
            Intent::DropCollection(_) | Intent::DeleteDocument(_) => {}
        }
    }

    // ── Painting ────────────────────────────────────────────────────

    fn paint_connection(&mut self, frame: &mut FrameBuffer) {
        let theme = &self.theme;
        let rect = ui::centered(frame.width(), frame.height(), CONNECT_SIZE.0, CONNECT_SIZE.1);
        ui::draw_box(frame, rect, "Database Connection", theme);
        let x = rect.x + 2;
        ui::text(frame, x, rect.y + 2, "Connection URI:", theme.normal, Some(&rect));
        ui::text(frame, x, rect.y + 7, "Examples:", theme.hint, Some(&rect));
        ui::text(frame, x + 2, rect.y + 8, "mem://test", theme.hint, Some(&rect));
        ui::text(frame, x + 2, rect.y + 9, "file:///path/to/store.json", theme.hint, Some(&rect));
        if let Some(msg) = &self.message {
            ui::message_bar(frame, rect, rect.y + 5, msg, theme);
        }
        ui::status_bar(frame, rect, CONNECT_HINT, theme);
        self.cursor_screen = ui::field(
            frame,
            x,
            rect.y + 3,
            rect.width.saturating_sub(4),
            &self.uri,
            theme.normal,
        );
    }

    fn paint_viewer(&self, frame: &mut FrameBuffer) {
        let theme = &self.theme;
        let rect = ui::full(frame);
        let w = rect.width;
        let h = rect.height;
        let inner = ui::inner(rect);

        ui::draw_box(
            frame,
            rect,
            &format!("{}.{} - Documents", self.database, self.collection),
            theme,
        );
        let shown = if self.documents.is_empty() { 0 } else { self.doc_selected + 1 };
        let mut info = format!(
            "Total: {} | Page {}/{} | Selected: {}/{}",
            self.total,
            self.page + 1,
            self.total_pages(),
            shown,
            self.documents.len()
        );
        if !self.filter_text.is_empty() {
            info.push_str(&format!(" | Filter: {}", self.filter_text));
        }
        ui::text(frame, 2, 1, &info, theme.normal, Some(&inner));
        ui::hline(frame, 1, 2, w.saturating_sub(2), theme);

        let bottom = h.saturating_sub(4);
        let json_width = w.saturating_sub(6);
        let mut y = 3;
        for (i, doc) in self.documents.iter().enumerate() {
            if y >= bottom {
                break;
            }
            let number = self.page * self.page_size + i + 1;
            if i == self.doc_selected {
                let header = format!(" > Document {number}: [SELECTED]");
                let width = usize::from(w.saturating_sub(4));
                ui::text(frame, 2, y, &format!("{header:<width$}"), theme.selected, Some(&inner));
            } else {
                let header = format!("   Document {number}:");
                ui::text(frame, 2, y, &header, theme.normal, Some(&inner));
            }
            y += 1;

            let rows = DOC_ROWS.min(bottom.saturating_sub(y));
            let json = document_to_json(doc);
            repaint_json(
                frame,
                Viewport::new(y, 4, rows, json_width),
                json.as_bytes(),
                None,
                usize::from(json_width).max(1),
                &theme.json,
            );
            y += DOC_ROWS;

            if i + 1 < self.documents.len() && y < bottom {
                ui::hline(frame, 1, y, w.saturating_sub(2), theme);
                y += 1;
            }
        }

        if let Some(msg) = &self.message {
            ui::message_bar(frame, rect, h.saturating_sub(3), msg, theme);
        }
        ui::status_bar(frame, rect, VIEWER_HINT, theme);
    }

    fn paint_detail(&self, frame: &mut FrameBuffer) {
        let theme = &self.theme;
        let rect = ui::full(frame);
        let number = self.page * self.page_size + self.doc_selected + 1;
        ui::draw_box(
            frame,
            rect,
            &format!("{}.{} - Document {number}", self.database, self.collection),
            theme,
        );
        if let Some(doc) = self.documents.get(self.doc_selected) {
            let text = pretty(&document_to_json(doc));
            let width = rect.width.saturating_sub(4);
            repaint_json(
                frame,
                Viewport::new(1, 2, rect.height.saturating_sub(3), width),
                text.as_bytes(),
                None,
                usize::from(width).max(1),
                &theme.json,
            );
        }
        ui::status_bar(frame, rect, DETAIL_HINT, theme);
    }

    fn paint_help(&self, frame: &mut FrameBuffer) {
        let theme = &self.theme;
        let rect = ui::full(frame);
        let inner = ui::inner(rect);
        ui::draw_box(frame, rect, "Help - d-tui", theme);

        let mut y = 2;
        for (section, keys) in HELP {
            ui::text(frame, 2, y, section, theme.header, Some(&inner));
            y += 1;
            for (key, what) in *keys {
                ui::text(frame, 4, y, &format!("{key:<14}- {what}"), theme.normal, Some(&inner));
                y += 1;
            }
            y += 1;
        }
        let version = format!("d-tui v{}", env!("CARGO_PKG_VERSION"));
        ui::text(frame, 2, y, &version, theme.hint, Some(&inner));
        ui::status_bar(frame, rect, DETAIL_HINT, theme);
    }
}

// ─── Edit helpers ───────────────────────────────────────────────────────────

/// Filter selecting `doc`: its `_id`, or the whole document without one.
fn id_filter(doc: &Document) -> Document {
    match doc.get("_id") {
        Some(id) => {
            let mut filter = Document::new();
            filter.insert("_id".to_string(), id.clone());
            filter
        }
        None => doc.clone(),
    }
}

/// Update turning `original` into `edited`: `$set` every edited field,
/// `$unset` the fields that were removed. `_id` is never touched.
fn update_from_edit(original: &Document, edited: Document) -> Document {
    let set: Document = edited.into_iter().filter(|(k, _)| k != "_id").collect();
    let unset: Document = original
        .keys()
        .filter(|k| *k != "_id" && !set.contains_key(*k))
        .map(|k| (k.clone(), Value::from("")))
        .collect();

    let mut update = Document::new();
    update.insert("$set".to_string(), Value::Object(set));
    if !unset.is_empty() {
        update.insert("$unset".to_string(), Value::Object(unset));
    }
    update
}

// ─── App implementation ─────────────────────────────────────────────────────

impl<S: DocumentStore> App for Browser<S> {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event else {
            return Action::Continue;
        };
        if key.is_ctrl('c') {
            return Action::Quit;
        }

        // Messages live until the next key.
        self.message = None;

        if let Some(dialog) = self.dialog.take() {
            self.on_dialog_key(dialog, key);
            return Action::Continue;
        }

        match self.screen {
            Screen::Connection => return self.on_connection_key(key),
            Screen::DatabaseList => self.on_database_key(key),
            Screen::CollectionList => self.on_collection_key(key),
            Screen::DocumentViewer => self.on_viewer_key(key),
            Screen::DocumentDetail => self.go(Screen::DocumentViewer),
            Screen::Help => self.go(self.help_return),
        }
        Action::Continue
    }

    fn on_resize(&mut self, size: Size) {
        self.size = size;
        if let Some(dialog) = &mut self.dialog {
            dialog.resize(size.cols);
        }
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        self.cursor_screen = None;
        let theme = &self.theme;
        let rect = ui::full(frame);
        let message_y = rect.height.saturating_sub(3);

        match self.screen {
            Screen::Connection => self.paint_connection(frame),
            Screen::DatabaseList => {
                ui::draw_box(frame, rect, "Select Database", theme);
                paint_list(
                    frame,
                    theme,
                    &format!("Databases ({}):", self.databases.len()),
                    &self.databases,
                    &mut self.db_list,
                );
                if let Some(msg) = &self.message {
                    ui::message_bar(frame, rect, message_y, msg, theme);
                }
                ui::status_bar(frame, rect, DATABASE_HINT, theme);
            }
            Screen::CollectionList => {
                let title = format!("Database: {} - Select Collection", self.database);
                ui::draw_box(frame, rect, &title, theme);
                paint_list(
                    frame,
                    theme,
                    &format!("Collections ({}):", self.collections.len()),
                    &self.collections,
                    &mut self.coll_list,
                );
                if let Some(msg) = &self.message {
                    ui::message_bar(frame, rect, message_y, msg, theme);
                }
                ui::status_bar(frame, rect, COLLECTION_HINT, theme);
            }
            Screen::DocumentViewer => self.paint_viewer(frame),
            Screen::DocumentDetail => self.paint_detail(frame),
            Screen::Help => self.paint_help(frame),
        }

        if let Some(dialog) = &self.dialog {
            self.cursor_screen = dialog.paint(frame, &self.theme);
        }
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        let (x, y) = self.cursor_screen?;
        Some((x, y, CursorShape::SteadyBlock))
    }
}

/// Header, separator and the visible rows of a full-screen list.
fn paint_list(
    frame: &mut FrameBuffer,
    theme: &Theme,
    header: &str,
    items: &[String],
    state: &mut ListState,
) {
    let rect = ui::full(frame);
    let inner = ui::inner(rect);
    ui::text(frame, 2, 1, header, theme.normal, Some(&inner));
    ui::hline(frame, 1, 2, rect.width.saturating_sub(2), theme);
    let visible = usize::from(rect.height.saturating_sub(7));
    ui::list(frame, rect, 3, items, state, visible, theme);
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::Body;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn hints_join_into_one_line() {
        assert!(COLLECTION_HINT.contains("| B: Back | Q: Disconnect |"));
        assert!(VIEWER_HINT.contains("| D: Delete | F: Filter |"));
        assert!(!VIEWER_HINT.contains("  "));
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn press(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch)))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code))
    }

    fn enter() -> Event {
        key(KeyCode::Enter)
    }

    fn esc() -> Event {
        key(KeyCode::Escape)
    }

    fn ctrl(ch: char) -> Event {
        Event::Key(KeyEvent::ctrl(ch))
    }

    fn type_str(app: &mut Browser<MemoryStore>, s: &str) {
        for ch in s.chars() {
            app.on_event(&press(ch));
        }
    }

    fn feed(app: &mut Browser<MemoryStore>, events: &[Event]) {
        for event in events {
            app.on_event(event);
        }
    }

    fn doc(v: Value) -> Document {
        match v {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    /// A store with `shop.orders` holding `n` documents `{_id: i, n: i}`.
    fn seeded(n: i64) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.connect("mem://shop").unwrap();
        store.create_collection("shop", "orders").unwrap();
        for i in 0..n {
            store
                .insert("shop", "orders", doc(json!({"_id": i, "n": i, "even": i % 2 == 0})))
                .unwrap();
        }
        store.disconnect();
        store
    }

    fn browser(store: MemoryStore, page_size: usize) -> Browser<MemoryStore> {
        let mut app = Browser::new(store, Theme::ansi(), page_size, Some("mem://shop"));
        app.on_resize(Size { cols: 80, rows: 24 });
        app
    }

    /// Connected and looking at `shop.orders`.
    fn viewer(n: i64, page_size: usize) -> Browser<MemoryStore> {
        let mut app = browser(seeded(n), page_size);
        feed(&mut app, &[enter(), enter(), enter()]);
        assert_eq!(app.screen, Screen::DocumentViewer);
        app
    }

    fn message_text(app: &Browser<MemoryStore>) -> &str {
        app.message.as_ref().map_or("", |m| m.text.as_str())
    }

    fn dialog_text(app: &Browser<MemoryStore>) -> String {
        match &app.dialog.as_ref().expect("dialog open").body {
            Body::Prompt { session, .. } | Body::Editor { session, .. } => session.text(),
            Body::Confirm { .. } => panic!("confirm has no text"),
        }
    }

    fn clear_dialog_text(app: &mut Browser<MemoryStore>) {
        for _ in 0..dialog_text(app).len() {
            app.on_event(&key(KeyCode::Backspace));
        }
    }

    fn ids(app: &Browser<MemoryStore>) -> Vec<Value> {
        app.documents.iter().map(|d| d["_id"].clone()).collect()
    }

    fn painted(app: &mut Browser<MemoryStore>) -> FrameBuffer {
        let mut frame = FrameBuffer::new(80, 24);
        app.paint(&mut frame);
        frame
    }

    // ── Connection ────────────────────────────────────────────────────────

    #[test]
    fn empty_uri_is_rejected() {
        let mut app = Browser::new(MemoryStore::new(), Theme::ansi(), 10, None);
        app.on_event(&enter());
        assert_eq!(app.screen, Screen::Connection);
        assert_eq!(message_text(&app), "Error: URI cannot be empty");
        assert_eq!(app.message.as_ref().unwrap().kind, MessageKind::Error);
    }

    #[test]
    fn failed_connection_allows_retry() {
        let mut app = browser(MemoryStore::new(), 10);
        app.on_event(&key(KeyCode::Delete));
        type_str(&mut app, "mongodb://localhost");
        app.on_event(&enter());
        assert_eq!(app.screen, Screen::Connection);
        let message = message_text(&app);
        assert!(message.starts_with("Connection failed: unsupported URI"), "{message}");

        app.on_event(&key(KeyCode::Delete));
        type_str(&mut app, "mem://");
        app.on_event(&enter());
        assert_eq!(app.screen, Screen::DatabaseList);
        assert_eq!(app.databases, vec!["test".to_string()]);
    }

    #[test]
    fn connect_lists_databases() {
        let mut app = browser(seeded(0), 10);
        app.on_event(&enter());
        assert_eq!(app.screen, Screen::DatabaseList);
        assert_eq!(app.databases, vec!["shop".to_string()]);
        assert_eq!(message_text(&app), "Connected successfully!");

        app.on_event(&key(KeyCode::Down));
        assert!(app.message.as_ref().is_none());
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = browser(MemoryStore::new(), 10);
        assert_eq!(app.on_event(&esc()), Action::Quit);

        let mut app = viewer(1, 10);
        assert_eq!(app.on_event(&ctrl('c')), Action::Quit);
    }

    #[test]
    fn resize_events_are_ignored() {
        let mut app = browser(MemoryStore::new(), 10);
        assert_eq!(app.on_event(&Event::Resize(100, 40)), Action::Continue);
        assert_eq!(app.screen, Screen::Connection);
    }

    // ── Navigation ────────────────────────────────────────────────────────

    #[test]
    fn back_and_disconnect() {
        let mut app = viewer(2, 10);
        app.on_event(&press('b'));
        assert_eq!(app.screen, Screen::CollectionList);
        app.on_event(&press('B'));
        assert_eq!(app.screen, Screen::DatabaseList);
        app.on_event(&press('q'));
        assert_eq!(app.screen, Screen::Connection);
        assert!(!app.store.is_connected());
        assert_eq!(message_text(&app), "Disconnected");

        // The URI is still there for a reconnect.
        app.on_event(&enter());
        assert_eq!(app.screen, Screen::DatabaseList);
    }

    #[test]
    fn help_returns_to_previous_screen() {
        let mut app = browser(seeded(0), 10);
        feed(&mut app, &[enter(), enter()]);
        assert_eq!(app.screen, Screen::CollectionList);
        app.on_event(&key(KeyCode::F(1)));
        assert_eq!(app.screen, Screen::Help);
        assert!(painted(&mut app).row_text(0).contains("[ Help - d-tui ]"));
        app.on_event(&press('x'));
        assert_eq!(app.screen, Screen::CollectionList);
    }

    // ── Collections ───────────────────────────────────────────────────────

    #[test]
    fn create_collection_through_prompt() {
        let mut app = browser(seeded(0), 10);
        feed(&mut app, &[enter(), enter()]);
        app.on_event(&press('c'));
        assert!(app.dialog.is_some());
        type_str(&mut app, "carts");
        app.on_event(&enter());

        assert!(app.dialog.is_none());
        assert_eq!(message_text(&app), "Collection created successfully!");
        assert_eq!(app.collections, vec!["carts".to_string(), "orders".to_string()]);
        assert_eq!(app.coll_list.selected, 0);

        app.on_event(&press('c'));
        type_str(&mut app, "orders");
        app.on_event(&enter());
        assert_eq!(
            message_text(&app),
            "Failed to create collection: collection 'orders' already exists"
        );
    }

    #[test]
    fn drop_collection_needs_confirmation() {
        let mut app = browser(seeded(0), 10);
        feed(&mut app, &[enter(), enter()]);

        feed(&mut app, &[press('d'), press('n')]);
        assert_eq!(app.collections, vec!["orders".to_string()]);

        app.on_event(&press('d'));
        let frame = painted(&mut app);
        assert!((0..24).any(|y| frame.row_text(y).contains("delete collection 'orders'?")));
        app.on_event(&press('y'));
        assert!(app.collections.is_empty());
        assert_eq!(message_text(&app), "Collection deleted successfully!");

        // Nothing to open or drop now.
        feed(&mut app, &[enter(), press('d')]);
        assert_eq!(app.screen, Screen::CollectionList);
        assert!(app.dialog.is_none());
    }

    #[test]
    fn empty_database_warns() {
        let mut store = MemoryStore::new();
        store.connect("mem://empty").unwrap();
        store.disconnect();
        let mut app = Browser::new(store, Theme::ansi(), 10, Some("mem://empty"));
        feed(&mut app, &[enter(), enter()]);
        assert_eq!(app.screen, Screen::CollectionList);
        assert_eq!(message_text(&app), "No collections found in this database");
        assert_eq!(app.message.as_ref().unwrap().kind, MessageKind::Warning);
    }

    // ── Viewer ────────────────────────────────────────────────────────────

    #[test]
    fn pages_through_documents() {
        let mut app = viewer(7, 3);
        assert_eq!(app.total, 7);
        assert_eq!(ids(&app), vec![json!(0), json!(1), json!(2)]);

        feed(&mut app, &[key(KeyCode::Down), key(KeyCode::PageDown)]);
        assert_eq!(app.page, 1);
        assert_eq!(app.doc_selected, 0);
        assert_eq!(ids(&app), vec![json!(3), json!(4), json!(5)]);

        feed(&mut app, &[key(KeyCode::PageDown), key(KeyCode::PageDown)]);
        assert_eq!(app.page, 2);
        assert_eq!(ids(&app), vec![json!(6)]);

        app.on_event(&key(KeyCode::PageUp));
        assert_eq!(app.page, 1);
    }

    #[test]
    fn selection_stays_in_page() {
        let mut app = viewer(2, 10);
        let keys = [key(KeyCode::Up), key(KeyCode::Down), key(KeyCode::Down), key(KeyCode::Down)];
        feed(&mut app, &keys);
        assert_eq!(app.doc_selected, 1);
    }

    #[test]
    fn viewer_paints_header_and_documents() {
        let mut app = viewer(5, 3);
        app.on_event(&key(KeyCode::Down));
        let frame = painted(&mut app);
        assert!(frame.row_text(0).contains("[ shop.orders - Documents ]"));
        assert!(frame.row_text(1).contains("Total: 5 | Page 1/2 | Selected: 2/3"));
        assert!(frame.row_text(3).starts_with("│    Document 1:"));
        assert!(frame.row_text(4).starts_with(r#"│   {"_id":0,"n":0,"even":true}"#));
        assert!(frame.row_text(12).starts_with("│──"));
        assert!(frame.row_text(13).starts_with("│  > Document 2: [SELECTED]"));
        assert!(frame.row_text(23).starts_with(" UP/DOWN: Select"));
        assert_eq!(app.cursor(), None);
    }

    #[test]
    fn empty_collection_warns() {
        let mut app = viewer(0, 10);
        assert_eq!(message_text(&app), "No documents in this collection");
        let frame = painted(&mut app);
        assert!(frame.row_text(1).contains("Selected: 0/0"));
        // Nothing to edit, delete or view.
        feed(&mut app, &[press('e'), press('d'), enter()]);
        assert!(app.dialog.is_none());
        assert_eq!(app.screen, Screen::DocumentViewer);
    }

    #[test]
    fn detail_view_shows_pretty_json() {
        let mut app = viewer(2, 10);
        feed(&mut app, &[key(KeyCode::Down), enter()]);
        assert_eq!(app.screen, Screen::DocumentDetail);
        let frame = painted(&mut app);
        assert!(frame.row_text(0).contains("Document 2"));
        assert!(frame.row_text(1).starts_with("│ {"));
        assert!(frame.row_text(2).starts_with(r#"│   "_id":1,"#));
        app.on_event(&press('z'));
        assert_eq!(app.screen, Screen::DocumentViewer);
    }

    // ── Insert ────────────────────────────────────────────────────────────

    #[test]
    fn insert_into_template() {
        let mut app = viewer(0, 10);
        app.on_event(&press('i'));
        assert_eq!(dialog_text(&app), "{\n  \n}");
        assert!(app.cursor().is_none(), "cursor is set on paint");
        painted(&mut app);
        assert!(app.cursor().is_some());

        // Up lands inside the blank line.
        app.on_event(&key(KeyCode::Up));
        type_str(&mut app, "\"sku\":\"A-1\"");
        assert_eq!(dialog_text(&app), "{\n \"sku\":\"A-1\" \n}");
        app.on_event(&key(KeyCode::F(2)));

        assert!(app.dialog.is_none());
        assert_eq!(message_text(&app), "Document inserted successfully!");
        assert_eq!(app.total, 1);
        assert_eq!(app.documents[0]["sku"], json!("A-1"));
        assert!(app.documents[0]["_id"]["$oid"].is_string());
    }

    #[test]
    fn invalid_json_keeps_editor_open() {
        let mut app = viewer(0, 10);
        feed(&mut app, &[press('i'), press('x'), key(KeyCode::F(2))]);
        let dialog = app.dialog.as_ref().expect("editor stays open");
        assert!(dialog.error().unwrap().starts_with("Invalid JSON:"), "{:?}", dialog.error());
        assert_eq!(dialog_text(&app), "{\n  \n}x");

        let frame = painted(&mut app);
        assert!((0..24).any(|y| frame.row_text(y).contains("Invalid JSON:")));

        app.on_event(&esc());
        assert!(app.dialog.is_none());
        assert_eq!(app.total, 0);
    }

    #[test]
    fn non_object_is_invalid() {
        let mut app = viewer(0, 10);
        app.on_event(&press('i'));
        clear_dialog_text(&mut app);
        type_str(&mut app, "[1]");
        app.on_event(&key(KeyCode::F(2)));
        assert_eq!(
            app.dialog.as_ref().and_then(Dialog::error),
            Some("Invalid JSON: expected a JSON object")
        );
    }

    #[test]
    fn empty_editor_is_a_cancel() {
        let mut app = viewer(0, 10);
        app.on_event(&press('i'));
        clear_dialog_text(&mut app);
        app.on_event(&key(KeyCode::F(2)));
        assert!(app.dialog.is_none());
        assert_eq!(app.total, 0);
        assert!(app.message.as_ref().is_none());
    }

    // ── Edit ──────────────────────────────────────────────────────────────

    #[test]
    fn edit_opens_pretty_document() {
        let mut app = viewer(1, 10);
        app.on_event(&press('e'));
        assert_eq!(dialog_text(&app), "{\n  \"_id\":0,\n  \"n\":0,\n  \"even\":true\n}");
    }

    #[test]
    fn edit_sets_and_unsets_fields() {
        let mut app = viewer(1, 10);
        app.on_event(&press('e'));
        clear_dialog_text(&mut app);
        type_str(&mut app, r#"{"_id":0,"n":5,"note":"x"}"#);
        app.on_event(&key(KeyCode::F(2)));

        assert_eq!(message_text(&app), "Document updated successfully!");
        assert_eq!(
            Value::Object(app.documents[0].clone()),
            json!({"_id": 0, "n": 5, "note": "x"})
        );
    }

    #[test]
    fn edit_never_changes_id() {
        let mut app = viewer(1, 10);
        app.on_event(&press('e'));
        clear_dialog_text(&mut app);
        type_str(&mut app, r#"{"_id":99,"n":1,"even":true}"#);
        app.on_event(&key(KeyCode::F(2)));
        assert_eq!(app.documents[0]["_id"], json!(0));
        assert_eq!(app.documents[0]["n"], json!(1));
    }

    #[test]
    fn unchanged_edit_warns() {
        let mut app = viewer(1, 10);
        feed(&mut app, &[press('e'), key(KeyCode::F(2))]);
        assert_eq!(message_text(&app), "Document unchanged");
        assert_eq!(app.message.as_ref().unwrap().kind, MessageKind::Warning);
    }

    #[test]
    fn update_from_edit_operators() {
        let original = doc(json!({"_id": 1, "a": 1, "b": 2}));
        let update = update_from_edit(&original, doc(json!({"_id": 7, "a": 3, "c": 4})));
        assert_eq!(
            Value::Object(update),
            json!({"$set": {"a": 3, "c": 4}, "$unset": {"b": ""}})
        );
    }

    #[test]
    fn id_filter_falls_back_to_whole_document() {
        let with_id = doc(json!({"_id": 1, "a": 2}));
        assert_eq!(Value::Object(id_filter(&with_id)), json!({"_id": 1}));
        let without = doc(json!({"a": 2}));
        assert_eq!(id_filter(&without), without);
    }

    // ── Delete ────────────────────────────────────────────────────────────

    #[test]
    fn delete_last_selects_previous() {
        let mut app = viewer(3, 10);
        feed(&mut app, &[key(KeyCode::Down), key(KeyCode::Down), press('d')]);
        assert!(app.dialog.is_some());
        app.on_event(&press('y'));
        assert_eq!(message_text(&app), "Document deleted successfully!");
        assert_eq!(ids(&app), vec![json!(0), json!(1)]);
        assert_eq!(app.doc_selected, 1);
    }

    #[test]
    fn delete_cancelled_keeps_document() {
        let mut app = viewer(2, 10);
        feed(&mut app, &[press('d'), esc()]);
        assert_eq!(app.total, 2);
    }

    #[test]
    fn deleting_only_document_on_last_page_moves_back() {
        let mut app = viewer(4, 3);
        app.on_event(&key(KeyCode::PageDown));
        assert_eq!(ids(&app), vec![json!(3)]);
        feed(&mut app, &[press('d'), press('Y')]);
        assert_eq!(app.page, 0);
        assert_eq!(app.total, 3);
        assert_eq!(ids(&app), vec![json!(0), json!(1), json!(2)]);
    }

    // ── Filter ────────────────────────────────────────────────────────────

    #[test]
    fn filter_and_clear() {
        let mut app = viewer(6, 10);
        app.on_event(&press('f'));
        type_str(&mut app, r#"{"even":true}"#);
        app.on_event(&enter());
        assert_eq!(app.total, 3);
        assert_eq!(message_text(&app), "Filter applied: 3 matching");
        assert!(painted(&mut app).row_text(1).contains(r#"Filter: {"even":true}"#));

        app.on_event(&press('f'));
        assert_eq!(dialog_text(&app), r#"{"even":true}"#);
        feed(&mut app, &[key(KeyCode::Delete), enter()]);
        assert_eq!(app.total, 6);
        assert_eq!(message_text(&app), "Filter cleared");
    }

    #[test]
    fn bad_filter_is_reported() {
        let mut app = viewer(2, 10);
        app.on_event(&press('f'));
        type_str(&mut app, "{oops");
        app.on_event(&enter());
        assert!(message_text(&app).starts_with("Invalid filter:"));
        assert_eq!(app.total, 2);
    }

    #[test]
    fn filter_matching_nothing() {
        let mut app = viewer(2, 10);
        app.on_event(&press('f'));
        type_str(&mut app, r#"{"n":42}"#);
        app.on_event(&enter());
        assert_eq!(app.total, 0);
        assert_eq!(message_text(&app), "No documents match the filter");
    }

    // ── Painting ──────────────────────────────────────────────────────────

    #[test]
    fn connection_screen_layout() {
        let mut app = browser(MemoryStore::new(), 10);
        let frame = painted(&mut app);
        // 12 × 70 box centered on 80 × 24.
        assert!(frame.row_text(6).contains("[ Database Connection ]"));
        assert!(frame.row_text(9).contains("mem://shop"));
        assert!(frame.row_text(17).contains(CONNECT_HINT));
        assert_eq!(app.cursor(), Some((17, 9, CursorShape::SteadyBlock)));
    }

    #[test]
    fn list_screen_layout() {
        let mut app = browser(seeded(0), 10);
        app.on_event(&enter());
        let frame = painted(&mut app);
        assert!(frame.row_text(0).contains("[ Select Database ]"));
        assert!(frame.row_text(1).contains("Databases (1):"));
        assert!(frame.row_text(3).starts_with("│  > shop"));
        assert!(frame.row_text(21).contains("Connected successfully!"));
        assert!(frame.row_text(23).starts_with(" UP/DOWN: Navigate"));
    }

    #[test]
    fn editor_follows_resize() {
        let mut app = viewer(0, 10);
        app.on_event(&press('i'));
        app.on_resize(Size { cols: 50, rows: 30 });
        let Some(Dialog { body: Body::Editor { session, .. }, .. }) = &app.dialog else {
            panic!("editor open");
        };
        assert_eq!(session.wrap_width(), 46);
    }
}
