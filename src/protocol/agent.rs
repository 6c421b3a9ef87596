//! Agent discovery and capability types

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::A2AError;

/// Well-known path under an agent's base URL where its card is published
pub const AGENT_CARD_PATH: &str = "/.well-known/agent-card.json";

/// Path used by older agents for the same card
pub const LEGACY_AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Protocol version advertised by cards built with this crate
pub const PROTOCOL_VERSION: &str = "0.3.0";

/// Agent Card for agent discovery
///
/// The Agent Card is published at `/.well-known/agent-card.json` and describes
/// the agent's identity, the transports it can be reached over, and its skills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Optional stable identifier of the agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Agent version
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Human-readable description of the agent
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// URL to agent documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,

    /// A2A protocol version spoken by the agent
    pub protocol_version: String,

    /// Base RPC endpoint
    pub url: String,

    /// Transports in the agent's order of preference
    #[serde(default)]
    pub transports: Vec<AgentTransport>,

    /// Agent capabilities
    #[serde(default)]
    pub capabilities: AgentCapabilities,

    /// Invokable skills; empty means default messaging only
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    /// Create a new agent card
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: None,
            version: "1.0.0".to_string(),
            author: None,
            description: description.into(),
            license: None,
            homepage: None,
            documentation: None,
            source_code: None,
            protocol_version: PROTOCOL_VERSION.to_string(),
            url: url.into(),
            transports: Vec::new(),
            capabilities: AgentCapabilities::default(),
            skills: Vec::new(),
        }
    }

    /// Set the agent version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the agent id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Add a transport entry
    pub fn with_transport(mut self, transport: AgentTransport) -> Self {
        self.transports.push(transport);
        self
    }

    /// Add a skill
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Set the capabilities
    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Check the invariants serde cannot express
    ///
    /// Required string fields must be non-empty and `url` must be an absolute URL.
    pub fn validate(&self) -> Result<(), A2AError> {
        let required = [
            ("name", &self.name),
            ("description", &self.description),
            ("protocolVersion", &self.protocol_version),
            ("url", &self.url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(A2AError::Protocol(format!(
                    "Agent card field '{}' cannot be empty",
                    field
                )));
            }
        }

        Url::parse(&self.url).map_err(|e| {
            A2AError::Protocol(format!("Agent card url '{}' is invalid: {}", self.url, e))
        })?;

        for transport in &self.transports {
            Url::parse(&transport.url).map_err(|e| {
                A2AError::Protocol(format!(
                    "Transport url '{}' is invalid: {}",
                    transport.url, e
                ))
            })?;
        }

        Ok(())
    }

    /// Render the card as the multi-line report printed by the card tool
    pub fn render(&self) -> String {
        let rule = "*".repeat(60);
        let mut lines = vec![rule.clone(), format!("** Agent: {}", self.name)];

        if let Some(id) = &self.id {
            lines.push(format!("** ID: {}", id));
        }
        lines.push(format!("** Version: {}", self.version));
        if let Some(author) = &self.author {
            lines.push(format!("** Author: {}", author));
        }
        lines.push(format!("** Description: {}", self.description));

        let optional = [
            ("License", &self.license),
            ("Homepage", &self.homepage),
            ("Documentation", &self.documentation),
            ("Source Code", &self.source_code),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                lines.push(format!("** {}: {}", label, value));
            }
        }

        lines.push(format!("** A2A Protocol Version: {}", self.protocol_version));
        lines.push(format!("** URL: {}", self.url));

        lines.push("** Transports:".to_string());
        if self.transports.is_empty() {
            lines.push("    No transports defined.".to_string());
        }
        for transport in &self.transports {
            lines.push(format!("    - Type: {}", transport.transport_type));
            lines.push(format!("      URL: {}", transport.url));
        }

        lines.push("** Skills:".to_string());
        if self.skills.is_empty() {
            lines.push("    No skills defined.".to_string());
        }
        for skill in &self.skills {
            skill.render_into(&mut lines);
        }

        lines.push(rule);
        lines.join("\n")
    }
}

/// Agent capabilities
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Supports streaming responses
    #[serde(default)]
    pub streaming: bool,

    /// Supports push notifications via webhooks
    #[serde(default)]
    pub push_notifications: bool,

    /// Keeps the full message history on each task
    #[serde(default)]
    pub state_transition_history: bool,
}

impl AgentCapabilities {
    /// Create capabilities with default values (all false)
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable state transition history
    pub fn with_state_transition_history(mut self) -> Self {
        self.state_transition_history = true;
        self
    }
}

/// Protocol binding named in a card's transport entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// JSON-RPC 2.0 over HTTP
    JsonRpc,
    /// HTTP+JSON (REST) binding
    HttpJson,
    /// gRPC binding
    Grpc,
    /// Anything else an agent advertises
    Other(String),
}

impl TransportKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransportKind::JsonRpc => "JSONRPC",
            TransportKind::HttpJson => "HTTP+JSON",
            TransportKind::Grpc => "GRPC",
            TransportKind::Other(other) => other,
        }
    }
}

impl FromStr for TransportKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_uppercase().replace(['-', '_'], "").as_str() {
            "JSONRPC" => TransportKind::JsonRpc,
            "HTTP+JSON" | "HTTPJSON" | "REST" => TransportKind::HttpJson,
            "GRPC" => TransportKind::Grpc,
            _ => TransportKind::Other(s.to_string()),
        };
        Ok(kind)
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{type, url}` transport entry of an agent card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentTransport {
    /// Protocol binding type (e.g. "JSONRPC")
    #[serde(rename = "type")]
    pub transport_type: String,

    /// Endpoint for this binding
    pub url: String,
}

impl AgentTransport {
    /// Create a new transport entry
    pub fn new(kind: TransportKind, url: impl Into<String>) -> Self {
        Self {
            transport_type: kind.to_string(),
            url: url.into(),
        }
    }

    /// Parsed binding type
    pub fn kind(&self) -> TransportKind {
        match self.transport_type.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

/// A capability advertised by an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSkill {
    pub name: String,
    pub id: String,
    pub description: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<SkillParameter>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<SkillReturns>,
}

impl AgentSkill {
    /// Create a new skill without parameters
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            description: description.into(),
            tags: BTreeSet::new(),
            parameters: None,
            returns: None,
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add a parameter
    pub fn with_parameter(mut self, parameter: SkillParameter) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    /// Describe the return value
    pub fn with_returns(mut self, returns: SkillReturns) -> Self {
        self.returns = Some(returns);
        self
    }

    fn render_into(&self, lines: &mut Vec<String>) {
        lines.push(format!("    - Name: {}", self.name));
        lines.push(format!("      ID: {}", self.id));
        lines.push(format!("      Description: {}", self.description));
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        lines.push(format!("      Tags: {}", tags.join(", ")));

        if let Some(parameters) = self.parameters.as_ref().filter(|p| !p.is_empty()) {
            lines.push("      Parameters:".to_string());
            for param in parameters {
                lines.push(format!("        - Name: {}", param.name));
                lines.push(format!("          Type: {}", param.param_type));
                lines.push(format!("          Description: {}", param.description));
                lines.push(format!("          Required: {}", param.required));
            }
        }

        if let Some(returns) = &self.returns {
            lines.push("      Returns:".to_string());
            lines.push(format!("        - Type: {}", returns.return_type));
            lines.push(format!("          Description: {}", returns.description));
        }
    }
}

/// Parameter accepted by a skill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

impl SkillParameter {
    pub fn new(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required,
        }
    }
}

/// Value returned by a skill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillReturns {
    #[serde(rename = "type")]
    pub return_type: String,
    pub description: String,
}
