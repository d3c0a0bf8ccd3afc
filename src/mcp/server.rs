

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::core::config::CatphishConfig;
use crate::llm::factory::LlmProviderFactory;
use crate::llm::insight::{FrequencyInsightGenerator, InsightError};
use crate::llm::resonance::LlmResonanceRanker;
use crate::matching::{CandidatePair, DailyPromptSelector, MatchComposer, MatchError, User};


#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct UserParams {
    #[schemars(description = "Stable user identifier")]
    pub id: String,
    #[schemars(description = "Display name shown with the cat avatar")]
    pub display_name: Option<String>,
    #[schemars(description = "Self-declared core truth, compared for an exact-match bonus")]
    pub core_truth: Option<String>,
    #[schemars(description = "Free-text location label")]
    pub location: Option<String>,
    #[schemars(description = "Interest tags")]
    pub interests: Option<Vec<String>>,
}

impl From<UserParams> for User {
    fn from(params: UserParams) -> Self {
        User {
            id: params.id,
            display_name: params.display_name.unwrap_or_default(),
            core_truth: params.core_truth,
            location: params.location,
            interests: params.interests.unwrap_or_default(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct CandidateParams {
    #[schemars(description = "Candidate profile")]
    pub user: UserParams,
    #[schemars(description = "Candidate's answer to the same prompt")]
    pub answer: String,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct ComposeMatchesParams {
    #[schemars(description = "The user asking for matches")]
    pub acting_user: UserParams,
    #[schemars(description = "Acting user's answer to today's prompt")]
    pub answer: String,
    #[schemars(description = "Candidates with their answers; the acting user is skipped if present")]
    pub pool: Vec<CandidateParams>,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct DailyPromptParams {
    #[schemars(description = "Calendar date as YYYY-MM-DD (default: today, UTC)")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, rmcp::schemars::JsonSchema)]
pub struct FrequencyInsightParams {
    #[schemars(description = "Protocol day number")]
    pub day: u32,
    #[schemars(description = "Answers to the protocol questions so far")]
    pub answers: Vec<String>,
    #[schemars(description = "The user's core truth")]
    pub core_truth: String,
}


#[derive(Clone)]
pub struct CatphishMcpServer {
    composer: Arc<MatchComposer>,
    insights: Arc<FrequencyInsightGenerator>,
    prompts: DailyPromptSelector,
    config: Arc<CatphishConfig>,
    tool_router: ToolRouter<Self>,
}

impl CatphishMcpServer {

    pub fn new(
        composer: MatchComposer,
        insights: FrequencyInsightGenerator,
        prompts: DailyPromptSelector,
        config: CatphishConfig,
    ) -> Self {
        Self {
            composer: Arc::new(composer),
            insights: Arc::new(insights),
            prompts,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }


    fn match_error(err: MatchError) -> McpError {
        match err {
            MatchError::Validation(msg) => McpError::invalid_params(msg, None),
            MatchError::Unavailable(_) => McpError::internal_error(err.to_string(), None),
        }
    }


    fn insight_error(err: InsightError) -> McpError {
        McpError::internal_error(err.to_string(), None)
    }


    fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>, McpError> {
        date.map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|e| {
                McpError::invalid_params(format!("date must be YYYY-MM-DD ({d}): {e}"), None)
            })
        })
        .transpose()
    }


    fn result_to_json<T: Serialize>(result: T) -> Result<String, McpError> {
        serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }
}

#[tool_router]
impl CatphishMcpServer {

    #[tool(description = "Rank a candidate pool for a user by answer resonance plus trait bonuses. Returns matches sorted by compatibilityScore descending: [{id, users, compatibilityScore, sharedTraits, status, createdAt, targetUser}]")]
    async fn compose_matches(
        &self,
        Parameters(params): Parameters<ComposeMatchesParams>,
    ) -> Result<CallToolResult, McpError> {
        let acting_user: User = params.acting_user.into();
        let pool: Vec<CandidatePair> = params
            .pool
            .into_iter()
            .map(|c| CandidatePair::new(c.user.into(), c.answer))
            .collect();

        info!("Composing matches for user={} over {} candidates", acting_user.id, pool.len());

        let matches = self
            .composer
            .compose_matches(&acting_user, &params.answer, &pool)
            .await
            .map_err(Self::match_error)?;

        let json = Self::result_to_json(&matches)?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }


    #[tool(description = "Today's rotating prompt (or the prompt for a given date). Returns: {date, questionId, questionText}")]
    async fn daily_prompt(
        &self,
        Parameters(params): Parameters<DailyPromptParams>,
    ) -> Result<CallToolResult, McpError> {
        let prompt = match Self::parse_date(params.date.as_deref())? {
            Some(date) => self.prompts.select(date),
            None => self.prompts.today(),
        };

        let json = Self::result_to_json(&prompt)?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }


    #[tool(description = "Profile what kind of partner a user is subconsciously seeking. Returns: {day, archetype, summary, seeking, shadow}")]
    async fn frequency_insight(
        &self,
        Parameters(params): Parameters<FrequencyInsightParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Generating frequency insight for day {}", params.day);

        let insight = self
            .insights
            .generate(params.day, &params.answers, &params.core_truth)
            .await
            .map_err(|e| {
                warn!("Frequency insight failed: {}", e);
                Self::insight_error(e)
            })?;

        let json = Self::result_to_json(&insight)?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}


#[tool_handler]
impl ServerHandler for CatphishMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "catphish".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Catphish matching core. Use daily_prompt to get the question of the day, \
                 compose_matches to rank a pool of answers for a user, and frequency_insight \
                 to profile what a user is looking for."
                    .to_string(),
            ),
        }
    }


    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![
                RawResource::new("config://catphish", "catphish-config".to_string()).no_annotation(),
            ],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match uri.as_str() {
            "config://catphish" => {
                let content = Self::result_to_json(json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "llm": {
                        "provider": self.config.llm_provider,
                        "model": self.config.llm_model,
                        "fallback_enabled": self.config.llm_fallback_enabled,
                        "fallback_model": self.config.llm_fallback_model,
                    },
                    "prompt_rotation_length": self.prompts.rotation().len(),
                    "tools": ["compose_matches", "daily_prompt", "frequency_insight"],
                }))?;

                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(content, uri)],
                })
            }
            _ => Err(McpError::resource_not_found(
                format!("Unknown resource: {}", uri),
                Some(json!({ "uri": uri })),
            )),
        }
    }
}


/// Config file path comes from `CATPHISH_CONFIG`, if set.
pub async fn run_server() -> anyhow::Result<()> {
    info!("Initializing Catphish MCP Server...");

    let config_path = std::env::var("CATPHISH_CONFIG").ok().map(PathBuf::from);
    let config = CatphishConfig::load(config_path.as_deref())?;

    let llm = LlmProviderFactory::from_config(&config)?;
    let composer = MatchComposer::new(Arc::new(LlmResonanceRanker::new(llm.clone())));
    let insights = FrequencyInsightGenerator::new(llm);
    let prompts = DailyPromptSelector::from_config(&config)?;

    info!("Catphish MCP Server ready");
    info!("   LLM: {}/{}", config.llm_provider, config.llm_model);
    info!("   Fallback: {}", if config.llm_fallback_enabled { config.llm_fallback_model.as_str() } else { "disabled" });

    let server = CatphishMcpServer::new(composer, insights, prompts, config);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::{LlmProvider, LlmProviderError};
    use crate::llm::resonance::RankerError;

    #[test]
    fn test_user_params_into_user() {
        let user: User = UserParams {
            id: "u1".to_string(),
            display_name: None,
            core_truth: Some("loyalty".to_string()),
            location: Some("NYC".to_string()),
            interests: None,
        }
        .into();
        assert_eq!(user.id, "u1");
        assert_eq!(user.display_name, "");
        assert_eq!(user.core_truth.as_deref(), Some("loyalty"));
        assert!(user.interests.is_empty());
    }

    #[test]
    fn test_compose_params_deserialize() {
        let params: ComposeMatchesParams = serde_json::from_value(json!({
            "acting_user": {"id": "u1", "interests": ["hiking"]},
            "answer": "I value trust",
            "pool": [{"user": {"id": "u2", "location": "NYC"}, "answer": "Loyalty"}]
        }))
        .unwrap();
        assert_eq!(params.pool.len(), 1);
        assert_eq!(params.pool[0].user.location.as_deref(), Some("NYC"));
    }

    #[test]
    fn test_unavailable_maps_to_generic_message() {
        let err = CatphishMcpServer::match_error(MatchError::Unavailable(RankerError::Provider(
            LlmProviderError::Provider("401 from upstream".to_string()),
        )));
        assert_eq!(err.message, "matching temporarily unavailable");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(CatphishMcpServer::parse_date(None).unwrap(), None);
        assert_eq!(
            CatphishMcpServer::parse_date(Some("2026-10-10")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 10)
        );
        assert!(CatphishMcpServer::parse_date(Some("10/10/2026")).is_err());
    }

    #[test]
    fn test_server_info_lists_tools_capability() {
        let llm: Arc<dyn LlmProvider> =
            Arc::new(crate::llm::providers::mock::ScriptedProvider::new("scripted").reply("[]"));
        let server = CatphishMcpServer::new(
            MatchComposer::new(Arc::new(LlmResonanceRanker::new(llm.clone()))),
            FrequencyInsightGenerator::new(llm),
            DailyPromptSelector::default(),
            CatphishConfig::default(),
        );
        let info = server.get_info();
        assert_eq!(info.server_info.name, "catphish");
        assert!(info.capabilities.tools.is_some());
    }
}
