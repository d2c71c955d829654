use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use spice_core::analysis::{mixture, ComprehensiveAnalyzer};
use spice_core::storage::{self, FileStore, Settings};
use spice_core::{AppState, Catalog, Category, ItemId, TagState};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::EnvFilter;

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CategoryRequest {
    /// "products", "methods" or "spices" (singular forms are accepted too)
    category: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct TagRequest {
    /// "products", "methods" or "spices"
    category: String,
    /// Catalog id of the item within its category
    id: ItemId,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SetLanguageRequest {
    /// UI language code, e.g. "ru" or "en"
    language: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct AnalyzeMixtureRequest {
    /// Spice ids to analyze. Defaults to the currently selected spices.
    spice_ids: Option<Vec<ItemId>>,
}

// --- Response types ---

#[derive(Debug, Serialize)]
struct TagStateEntry<'a> {
    id: ItemId,
    name: &'a str,
    state: TagState,
}

// --- Server ---

const NOTHING_TO_EXPLAIN: &str = "Nothing to explain yet. Select at least one spice.";

#[derive(Clone)]
pub struct SpiceServer {
    state: Arc<Mutex<AppState>>,
    analyzer: Arc<ComprehensiveAnalyzer>,
    tool_router: ToolRouter<Self>,
}

fn parse_category(raw: &str) -> Result<Category, CallToolResult> {
    raw.parse::<Category>()
        .map_err(|e| CallToolResult::error(vec![Content::text(e.to_string())]))
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("Serialization error: {}", e));
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_router]
impl SpiceServer {
    pub fn new(state: AppState, analyzer: ComprehensiveAnalyzer) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            analyzer: Arc::new(analyzer),
            tool_router: Self::tool_router(),
        }
    }

    fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Flush the selection to disk.
    pub fn save(&self) -> spice_core::Result<()> {
        self.state().save()
    }

    #[tool(description = "List the catalog entries of a category as [{id, name}]")]
    fn list_items(
        &self,
        Parameters(req): Parameters<CategoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let category = match parse_category(&req.category) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };
        json_result(&self.state().catalog().entries(category))
    }

    #[tool(
        description = "Get the current selection: {selectedProducts, selectedMethods, selectedSpices, incompatibleTags, mutuallyExcludedTags, language}. The tag sets are keyed by category."
    )]
    fn get_state(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.state().snapshot())
    }

    #[tool(
        description = "Select an item. Items that are incompatible with or mutually excluded by the current selection can still be selected explicitly; use toggle_tag for click semantics. Returns the new state."
    )]
    fn select_tag(
        &self,
        Parameters(req): Parameters<TagRequest>,
    ) -> Result<CallToolResult, McpError> {
        let category = match parse_category(&req.category) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };
        let mut state = self.state();
        match state.select_tag(category, req.id) {
            Ok(true) => json_result(&state.snapshot()),
            Ok(false) => Ok(CallToolResult::success(vec![Content::text(format!(
                "{} {} is already selected",
                category, req.id
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "Remove an item from the selection. Returns the new state.")]
    fn remove_tag(
        &self,
        Parameters(req): Parameters<TagRequest>,
    ) -> Result<CallToolResult, McpError> {
        let category = match parse_category(&req.category) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };
        let mut state = self.state();
        if state.remove_tag(category, req.id) {
            json_result(&state.snapshot())
        } else {
            Ok(CallToolResult::success(vec![Content::text(format!(
                "{} {} is not selected",
                category, req.id
            ))]))
        }
    }

    #[tool(
        description = "Click a tag: blocked (incompatible or mutually excluded) tags are left alone, selected tags are removed, anything else is selected. Returns {outcome} plus the blocking tag state when blocked."
    )]
    fn toggle_tag(
        &self,
        Parameters(req): Parameters<TagRequest>,
    ) -> Result<CallToolResult, McpError> {
        let category = match parse_category(&req.category) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };
        match self.state().toggle_tag(category, req.id) {
            Ok(outcome) => json_result(&outcome),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "Clear the whole selection")]
    fn reset_selection(&self) -> Result<CallToolResult, McpError> {
        let mut state = self.state();
        state.reset();
        json_result(&state.snapshot())
    }

    #[tool(description = "Change the stored UI language")]
    fn set_language(
        &self,
        Parameters(req): Parameters<SetLanguageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut state = self.state();
        state.set_language(req.language);
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Language set to {}",
            state.language()
        ))]))
    }

    #[tool(
        description = "Every item of a category with its tag state: \"selected\", \"mutually-excluded\", \"incompatible\" or \"default\""
    )]
    fn tag_states(
        &self,
        Parameters(req): Parameters<CategoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let category = match parse_category(&req.category) {
            Ok(c) => c,
            Err(result) => return Ok(result),
        };
        let state = self.state();
        let entries: Vec<TagStateEntry> = state
            .tag_states(category)
            .into_iter()
            .map(|(id, tag)| TagStateEntry {
                id,
                name: state.catalog().name(category, id).unwrap_or_default(),
                state: tag,
            })
            .collect();
        json_result(&entries)
    }

    #[tool(
        description = "Explain the current selection: product/spice compatibility notes, cooking processes per method and spice, pairwise spice chemistry, recommendations and the scientific basis of the selected spices"
    )]
    fn analyze_selection(&self) -> Result<CallToolResult, McpError> {
        let selection = {
            let state = self.state();
            if !state.should_show_explanations() {
                return Ok(CallToolResult::success(vec![Content::text(NOTHING_TO_EXPLAIN)]));
            }
            state.selection().clone()
        };
        match self.analyzer.explain(&selection) {
            Some(explanation) => json_result(&explanation),
            None => Ok(CallToolResult::success(vec![Content::text(NOTHING_TO_EXPLAIN)])),
        }
    }

    #[tool(
        description = "Full report on the current selection: overview (complexity, flavor profile, cuisine, time, difficulty), compatibility, spice mixture score, cooking processes, chemical reactions, recommendations and scientific basis"
    )]
    fn complete_analysis(&self) -> Result<CallToolResult, McpError> {
        let selection = self.state().selection().clone();
        json_result(&self.analyzer.complete_analysis(&selection))
    }

    #[tool(
        description = "Recognize and score the spice blend formed by the given spice ids (or the selected spices). Returns {mixture, description, score (1-10), interactions}."
    )]
    fn analyze_mixture(
        &self,
        Parameters(req): Parameters<AnalyzeMixtureRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state();
        let ids = req
            .spice_ids
            .unwrap_or_else(|| state.selection().selected_spices.clone());
        match mixture::analyze(&ids, state.catalog()) {
            Some(analysis) => json_result(&analysis),
            None => Ok(CallToolResult::success(vec![Content::text(
                "These spices do not form a recognizable mixture. A known blend or at least three spices are needed.",
            )])),
        }
    }
}

const INSTRUCTIONS: &str = r#"spice-mcp explains how foods, cooking methods and spices go together.

## Catalog
Three categories with separate id spaces: products, methods, spices. Use list_items to see names and ids.

## Selection
- toggle_tag is the normal way to pick items. It refuses tags that are blocked by the current selection.
- An item is "incompatible" when something selected in another category rules it out, and "mutually-excluded" when something selected in its own category does.
- The selection persists across restarts.

## Analysis
- analyze_selection: pairwise explanations and the scientific basis; needs at least one selected spice.
- complete_analysis: the full report, including overview and scientific basis.
- analyze_mixture: blend recognition and a 1-10 compatibility score."#;

#[tool_handler]
impl ServerHandler for SpiceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn load_catalog(settings: &Settings) -> spice_core::Result<Catalog> {
    match &settings.catalog_dir {
        Some(dir) => Catalog::load_dir(dir),
        None => Catalog::builtin(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = storage::read_settings();
    let catalog = Arc::new(load_catalog(&settings)?);
    tracing::info!(
        products = catalog.products.len(),
        methods = catalog.methods.len(),
        spices = catalog.spices.len(),
        "catalog ready"
    );

    let store = FileStore::default();
    let first_run = !store.path().exists();
    let mut state = AppState::new(Arc::clone(&catalog), Box::new(store));
    if first_run {
        state.set_language(settings.language.clone());
    }

    let server = SpiceServer::new(
        state,
        ComprehensiveAnalyzer::new(catalog, settings.text_style),
    );
    let service = server
        .clone()
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {}", e))?;
    service.waiting().await?;

    if let Err(e) = server.save() {
        tracing::warn!("failed to save selection on shutdown: {}", e);
    }
    Ok(())
}
