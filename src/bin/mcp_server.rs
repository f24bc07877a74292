//! Rise of Elites MCP Server
//!
//! A Model Context Protocol server over stdio (rmcp) that exposes one game
//! session as tools. Every tool is a thin wrapper around a text command, so
//! the replies match the terminal client.

use std::path::Path;
use std::sync::Arc;

use rise_of_elites::persistence::default_store;
use rise_of_elites::text_interface::{Console, SharedConsole};
use rise_of_elites::{GameConfig, GameSession};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

/// Path of an optional RON config file.
const CONFIG_ENV: &str = "RISE_OF_ELITES_CONFIG";

#[derive(Debug, Clone)]
pub struct RiseOfElitesService {
    tool_router: ToolRouter<RiseOfElitesService>,
    console: Arc<SharedConsole>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CommandRequest {
    #[schemars(description = "A text command, e.g. 'zone forest' or 'attack special'. 'help' lists them all")]
    pub command: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ZoneRequest {
    #[schemars(description = "Zone to travel to, by short name ('cave') or title ('Crystal Caves')")]
    pub zone: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookRequest {
    #[schemars(description = "X coordinate to move to")]
    pub x: f32,
    #[schemars(description = "Z coordinate to move to")]
    pub z: f32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AttackRequest {
    #[schemars(description = "Use the special attack instead of tackle")]
    pub special: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CaptureRequest {
    #[schemars(description = "Ball to throw; defaults to an Elite Ball")]
    pub ball: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UseItemRequest {
    #[schemars(description = "Item to use, by id or name")]
    pub item: String,
    #[schemars(description = "Roster number of the Elite to use it on (1-based)")]
    pub elite_number: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BuyRequest {
    #[schemars(description = "Item to buy, by id or name")]
    pub item: String,
    #[schemars(description = "How many to buy; defaults to 1")]
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct QuestRequest {
    #[schemars(description = "Id of the quest to start")]
    pub quest_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EliteRequest {
    #[schemars(description = "Roster number of the Elite (1-based)")]
    pub elite_number: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FuseRequest {
    #[schemars(description = "Roster number of the first Elite")]
    pub first: usize,
    #[schemars(description = "Roster number of the second Elite")]
    pub second: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupRequest {
    #[schemars(description = "Name of an Elite species or an item")]
    pub name: String,
}

#[tool_router]
impl RiseOfElitesService {
    pub fn new(console: Console) -> Self {
        Self {
            tool_router: Self::tool_router(),
            console: Arc::new(SharedConsole::new(console)),
        }
    }

    /// Runs one command, then lets any queued battle steps play out before replying.
    async fn run(&self, line: String) -> Result<CallToolResult, McpError> {
        let mut text = self.console.run(&line).await;
        if text.is_empty() {
            text = "Done.".to_string();
        }
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Run any text command. Use 'help' to list them")]
    async fn command(
        &self,
        Parameters(request): Parameters<CommandRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(request.command).await
    }

    #[tool(description = "Show the trainer, current zone and any battle in progress")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        self.run("status".to_string()).await
    }

    #[tool(description = "List captured Elites with their roster numbers")]
    async fn elites(&self) -> Result<CallToolResult, McpError> {
        self.run("elites".to_string()).await
    }

    #[tool(description = "Show money and items")]
    async fn inventory(&self) -> Result<CallToolResult, McpError> {
        self.run("inventory".to_string()).await
    }

    #[tool(description = "Travel to a zone")]
    async fn change_zone(
        &self,
        Parameters(request): Parameters<ZoneRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(format!("zone {}", request.zone)).await
    }

    #[tool(description = "Move to a spot in the current zone; nearby wild Elites may start a battle")]
    async fn look(
        &self,
        Parameters(request): Parameters<LookRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(format!("look {} {}", request.x, request.z)).await
    }

    #[tool(description = "List wild Elites in the current zone")]
    async fn wild(&self) -> Result<CallToolResult, McpError> {
        self.run("wild".to_string()).await
    }

    #[tool(description = "Attack the wild Elite in the current battle")]
    async fn attack(
        &self,
        Parameters(request): Parameters<AttackRequest>,
    ) -> Result<CallToolResult, McpError> {
        let line = if request.special.unwrap_or(false) {
            "attack special"
        } else {
            "attack"
        };
        self.run(line.to_string()).await
    }

    #[tool(description = "Throw a ball at the wild Elite in the current battle")]
    async fn capture(
        &self,
        Parameters(request): Parameters<CaptureRequest>,
    ) -> Result<CallToolResult, McpError> {
        let line = match request.ball {
            Some(ball) => format!("capture {}", ball),
            None => "capture".to_string(),
        };
        self.run(line).await
    }

    #[tool(description = "Run from the current battle")]
    async fn flee(&self) -> Result<CallToolResult, McpError> {
        self.run("flee".to_string()).await
    }

    #[tool(description = "Close a finished battle")]
    async fn end_battle(&self) -> Result<CallToolResult, McpError> {
        self.run("end".to_string()).await
    }

    #[tool(description = "Use an item, optionally on a specific Elite")]
    async fn use_item(
        &self,
        Parameters(request): Parameters<UseItemRequest>,
    ) -> Result<CallToolResult, McpError> {
        let line = match request.elite_number {
            Some(n) => format!("use {} {}", request.item, n),
            None => format!("use {}", request.item),
        };
        self.run(line).await
    }

    #[tool(description = "Buy items from the shop")]
    async fn buy(
        &self,
        Parameters(request): Parameters<BuyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let quantity = request.quantity.unwrap_or(1);
        self.run(format!("buy {} {}", request.item, quantity)).await
    }

    #[tool(description = "Show active, completed and available quests")]
    async fn quests(&self) -> Result<CallToolResult, McpError> {
        self.run("quests".to_string()).await
    }

    #[tool(description = "Start a quest")]
    async fn start_quest(
        &self,
        Parameters(request): Parameters<QuestRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(format!("start {}", request.quest_id)).await
    }

    #[tool(description = "Choose which Elite fights in battles")]
    async fn set_active(
        &self,
        Parameters(request): Parameters<EliteRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(format!("active {}", request.elite_number)).await
    }

    #[tool(description = "Evolve an Elite that has reached its evolution level")]
    async fn evolve(
        &self,
        Parameters(request): Parameters<EliteRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(format!("evolve {}", request.elite_number)).await
    }

    #[tool(description = "Fuse two Elites into one, consuming a Fusion Crystal")]
    async fn fuse(
        &self,
        Parameters(request): Parameters<FuseRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(format!("fuse {} {}", request.first, request.second))
            .await
    }

    #[tool(description = "Look up an Elite species or an item")]
    async fn lookup(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run(format!("lookup {}", request.name)).await
    }

    #[tool(description = "Save the game")]
    async fn save(&self) -> Result<CallToolResult, McpError> {
        self.run("save".to_string()).await
    }

    #[tool(description = "Load the saved game")]
    async fn load(&self) -> Result<CallToolResult, McpError> {
        self.run("load".to_string()).await
    }
}

#[tool_handler]
impl ServerHandler for RiseOfElitesService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => GameConfig::load(Path::new(&path)),
        None => GameConfig::default(),
    };
    let mut console = Console::new(GameSession::new(config), default_store());
    let loaded = console.execute("load");
    tracing::info!(%loaded, "Rise of Elites MCP server starting");

    let service = RiseOfElitesService::new(console);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    tracing::info!("server running, waiting for shutdown");
    let quit_reason = server.waiting().await?;

    tracing::info!(?quit_reason, "Rise of Elites MCP server exiting");
    Ok(())
}
