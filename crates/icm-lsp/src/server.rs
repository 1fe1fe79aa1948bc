//! LSP backend
//!
//! Holds the open documents, the current schema and the domain engine,
//! and wires them to the `tower-lsp` request handlers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CodeActionKind, CodeActionOptions, CodeActionOrCommand, CodeActionParams,
    CodeActionProviderCapability, CompletionOptions, CompletionParams, CompletionResponse,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DidSaveTextDocumentParams, DocumentFormattingParams, ExecuteCommandOptions,
    ExecuteCommandParams, Hover, HoverParams, HoverProviderCapability, InitializeParams,
    InitializeResult, InitializedParams, MessageType, OneOf, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextEdit, Url, WorkDoneProgressOptions,
};
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info, warn};

use icm_core::schema::{Schema, SchemaRef};

use crate::config::{load_schema, load_workspace_settings, Settings};
use crate::domain::DomainEngine;

/// Command that reloads settings and schema from disk
pub const RELOAD_SCHEMA_COMMAND: &str = "icm.reloadSchema";

/// Characters that open a completion list
pub const TRIGGER_CHARACTERS: [&str; 7] = ["[", ":", ";", " ", "=", "(", "\""];

/// LSP Backend state
pub struct Backend {
    /// LSP client for sending notifications
    client: Client,
    /// Document store for open documents
    documents: Arc<RwLock<HashMap<Url, String>>>,
    /// Current schema; swapped as a whole on reload
    schema: Arc<SchemaRef>,
    /// Domain engine built from the current settings
    engine: Arc<RwLock<DomainEngine>>,
    /// Editor-supplied settings (`initializationOptions`)
    init_options: Arc<RwLock<Option<Value>>>,
    /// Workspace root used to resolve relative paths
    root: Arc<RwLock<Option<PathBuf>>>,
}

impl Backend {
    /// Create a new backend instance with an empty schema
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            schema: Arc::new(SchemaRef::new(Schema::default())),
            engine: Arc::new(RwLock::new(DomainEngine::new())),
            init_options: Arc::new(RwLock::new(None)),
            root: Arc::new(RwLock::new(None)),
        }
    }

    /// Get document text by URI
    async fn get_document(&self, uri: &Url) -> Option<String> {
        let docs = self.documents.read().await;
        docs.get(uri).cloned()
    }

    /// Store document text
    async fn store_document(&self, uri: Url, text: String) {
        let mut docs = self.documents.write().await;
        docs.insert(uri, text);
    }

    /// Remove document from store
    async fn remove_document(&self, uri: &Url) {
        let mut docs = self.documents.write().await;
        docs.remove(uri);
    }

    /// Resolve settings: editor options win over `icm.toml`
    async fn resolve_settings(&self) -> Settings {
        let root = self.root.read().await.clone();
        if let Some(options) = self.init_options.read().await.clone() {
            match Settings::from_json_value(options) {
                Ok(settings) => return settings,
                Err(e) => warn!("Ignoring invalid initializationOptions: {}", e),
            }
        }
        load_workspace_settings(root.as_deref())
    }

    /// Load settings and schema, then swap them in
    async fn reload(&self) -> Arc<Schema> {
        let settings = self.resolve_settings().await;
        let root = self.root.read().await.clone();
        let schema = load_schema(&settings, root.as_deref());

        *self.engine.write().await = DomainEngine::with_settings(settings);
        self.schema.replace(schema);
        self.schema.current()
    }

    /// Validate a document and publish diagnostics
    async fn validate(&self, uri: Url, text: &str) {
        debug!("Validating document: {}", uri);

        let schema = self.schema.current();
        let diagnostics = self.engine.read().await.validate_document(text, &schema);

        debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    /// Re-validate every open document
    async fn validate_all(&self) {
        let documents: Vec<(Url, String)> = self
            .documents
            .read()
            .await
            .iter()
            .map(|(uri, text)| (uri.clone(), text.clone()))
            .collect();

        for (uri, text) in documents {
            self.validate(uri, &text).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    #[allow(deprecated)]
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("ICM LSP server initializing");

        let root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| folder.uri.clone())
            .or(params.root_uri)
            .and_then(|uri| uri.to_file_path().ok());
        debug!("Workspace root: {:?}", root);

        *self.root.write().await = root;
        *self.init_options.write().await = params.initialization_options;
        self.reload().await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(
                        TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect(),
                    ),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                        ..Default::default()
                    },
                )),
                document_formatting_provider: Some(OneOf::Left(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![RELOAD_SCHEMA_COMMAND.to_string()],
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "icm-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("ICM LSP server initialized");
        self.client
            .log_message(MessageType::INFO, "ICM language server ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("ICM LSP server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        self.validate(uri.clone(), &text).await;
        self.store_document(uri, text).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        debug!("Document changed: {}", params.text_document.uri);
        // FULL sync: the entire content is in the first change
        if let Some(change) = params.content_changes.into_iter().next() {
            let uri = params.text_document.uri;
            self.validate(uri.clone(), &change.text).await;
            self.store_document(uri, change.text).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);
        let uri = params.text_document.uri;
        if let Some(text) = params.text {
            self.store_document(uri.clone(), text).await;
        }
        if let Some(text) = self.get_document(&uri).await {
            self.validate(uri, &text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);
        let uri = params.text_document.uri;
        self.remove_document(&uri).await;
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        debug!("Completion request for: {}", uri);

        let text = match self.get_document(&uri).await {
            Some(doc) => doc,
            None => {
                warn!("Document not found for completion: {}", uri);
                return Ok(None);
            }
        };

        let schema = self.schema.current();
        let position = params.text_document_position.position;
        let items = self
            .engine
            .read()
            .await
            .get_completions(&text, position, &schema);

        if items.is_empty() {
            Ok(None)
        } else {
            debug!("Generated {} completions for {}", items.len(), uri);
            Ok(Some(CompletionResponse::Array(items)))
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let Some(text) = self.get_document(&uri).await else {
            return Ok(None);
        };

        let schema = self.schema.current();
        let position = params.text_document_position_params.position;
        Ok(self.engine.read().await.get_hover(&text, position, &schema))
    }

    async fn code_action(
        &self,
        params: CodeActionParams,
    ) -> Result<Option<Vec<CodeActionOrCommand>>> {
        let uri = params.text_document.uri;
        debug!("Code action request for: {}", uri);

        let text = match self.get_document(&uri).await {
            Some(doc) => doc,
            None => {
                warn!("Document not found for code action: {}", uri);
                return Ok(None);
            }
        };

        let schema = self.schema.current();
        let actions = self.engine.read().await.get_code_actions(
            &uri,
            &text,
            &params.context.diagnostics,
            &schema,
        );

        if actions.is_empty() {
            Ok(None)
        } else {
            debug!("Generated {} code actions for {}", actions.len(), uri);
            Ok(Some(
                actions
                    .into_iter()
                    .map(CodeActionOrCommand::CodeAction)
                    .collect(),
            ))
        }
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let uri = params.text_document.uri;
        let Some(text) = self.get_document(&uri).await else {
            return Ok(None);
        };

        let edits = self.engine.read().await.get_formatting(&text);
        debug!("Generated {} formatting edits for {}", edits.len(), uri);
        Ok(Some(edits))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != RELOAD_SCHEMA_COMMAND {
            warn!("Unknown command: {}", params.command);
            return Ok(None);
        }

        let schema = self.reload().await;
        info!("Schema reloaded ({} keywords)", schema.keywords.len());
        self.validate_all().await;
        self.client
            .show_message(MessageType::INFO, "ICM: schema reloaded.")
            .await;
        Ok(None)
    }
}

/// Run the language server on stdin/stdout
pub async fn run_server() {
    // stdout carries the JSON-RPC stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting ICM Language Server v{}", env!("CARGO_PKG_VERSION"));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
