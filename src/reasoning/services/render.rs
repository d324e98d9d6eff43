//! Rendering transcripts and tool catalogs into provider wire formats.

use crate::orchestration::domain::{
    EngineDecision, Event, ToolCallRequest, ToolInvocation, Transcript, TranscriptEntryKind,
};
use crate::orchestration::ports::EngineRequest;
use crate::reasoning::domain::Provider;
use crate::tool_registry::domain::ToolDescriptor;
use serde_json::{Map, Value, json};

/// Default completion limit sent to providers that require one.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Stop sequence for the ReAct text protocol, so the engine yields control
/// before inventing an observation.
pub const REACT_STOP_SEQUENCE: &str = "\nObservation:";

const REACT_FORMAT: &str = "\
Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action, as a JSON object
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!
";

/// Request-level settings that are not part of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Model identifier, omitted from the body when `None`.
    pub model: Option<String>,
    /// Completion limit for providers that require one.
    pub max_tokens: u32,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// One conversational step derived from a transcript entry.
enum Turn<'a> {
    UserText(String),
    AssistantText(&'a str),
    ToolCalls(&'a [ToolCallRequest]),
    ToolResult(&'a ToolInvocation),
}

fn event_text(event: &Event) -> String {
    let payload = serde_json::to_string_pretty(event.payload())
        .unwrap_or_else(|_| event.payload().to_string());
    format!(
        "Event `{}` received for {}.\n\nPayload:\n{payload}",
        event.kind().as_str(),
        event.subject()
    )
}

fn turns(transcript: &Transcript) -> impl Iterator<Item = Turn<'_>> {
    transcript
        .entries()
        .iter()
        .filter_map(|entry| match entry.kind() {
            TranscriptEntryKind::EventSeed(event) => Some(Turn::UserText(event_text(event))),
            TranscriptEntryKind::ToolCatalog(_) => None,
            TranscriptEntryKind::Goal(goal) => Some(Turn::UserText(goal.clone())),
            TranscriptEntryKind::Reasoning(EngineDecision::FinalAnswer(text)) => {
                Some(Turn::AssistantText(text))
            }
            TranscriptEntryKind::Reasoning(EngineDecision::ToolCalls(calls)) => {
                Some(Turn::ToolCalls(calls))
            }
            TranscriptEntryKind::ToolInvocation(invocation) => Some(Turn::ToolResult(invocation)),
        })
}

fn tool_catalog(transcript: &Transcript) -> &[ToolDescriptor] {
    transcript
        .entries()
        .iter()
        .find_map(|entry| match entry.kind() {
            TranscriptEntryKind::ToolCatalog(tools) => Some(tools.as_slice()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Renders the tool list in the shape `provider` expects.
///
/// ReAct has no structured tool declarations; each tool becomes one line of
/// prompt text.
#[must_use]
pub fn render_tool_declarations(provider: Provider, tools: &[ToolDescriptor]) -> Value {
    let declarations = tools.iter().map(|tool| match provider {
        Provider::OpenAi => json!({
            "type": "function",
            "function": {
                "name": tool.name().as_str(),
                "description": tool.description(),
                "parameters": tool.argument_schema(),
            }
        }),
        Provider::Anthropic => json!({
            "name": tool.name().as_str(),
            "description": tool.description(),
            "input_schema": tool.argument_schema(),
        }),
        Provider::Gemini => json!({
            "name": tool.name().as_str(),
            "description": tool.description(),
            "parameters": tool.argument_schema(),
        }),
        Provider::ReAct => Value::String(format!(
            "{}: {} Arguments: {}",
            tool.name(),
            tool.description(),
            tool.argument_schema()
        )),
    });
    Value::Array(declarations.collect())
}

/// Renders the transcript as the provider's message list.
///
/// The event and goal become user text, decisions become assistant turns,
/// and each invocation becomes a tool result keyed by its call identifier.
#[must_use]
pub fn render_messages(provider: Provider, transcript: &Transcript) -> Value {
    match provider {
        Provider::OpenAi => Value::Array(openai_messages(transcript)),
        Provider::Anthropic => block_messages(transcript, BlockDialect::Anthropic),
        Provider::Gemini => block_messages(transcript, BlockDialect::Gemini),
        Provider::ReAct => json!([{
            "role": "user",
            "content": react_prompt(transcript),
        }]),
    }
}

/// Renders the complete request body for one reasoning round.
#[must_use]
pub fn render_request(provider: Provider, request: &EngineRequest, options: &RequestOptions) -> Value {
    let mut body = Map::new();
    if provider != Provider::Gemini
        && let Some(model) = &options.model
    {
        body.insert("model".to_owned(), Value::String(model.clone()));
    }

    let messages = render_messages(provider, request.transcript());
    let tools = render_tool_declarations(provider, request.tools());
    let has_tools = !request.tools().is_empty();
    match provider {
        Provider::OpenAi => {
            body.insert("messages".to_owned(), messages);
            if has_tools {
                body.insert("tools".to_owned(), tools);
            }
        }
        Provider::Anthropic => {
            body.insert("max_tokens".to_owned(), json!(options.max_tokens));
            body.insert("messages".to_owned(), messages);
            if has_tools {
                body.insert("tools".to_owned(), tools);
            }
        }
        Provider::Gemini => {
            body.insert("contents".to_owned(), messages);
            if has_tools {
                body.insert(
                    "tools".to_owned(),
                    json!([{ "functionDeclarations": tools }]),
                );
            }
        }
        Provider::ReAct => {
            body.insert("messages".to_owned(), messages);
            body.insert("stop".to_owned(), json!([REACT_STOP_SEQUENCE]));
        }
    }
    Value::Object(body)
}

fn openai_messages(transcript: &Transcript) -> Vec<Value> {
    let mut messages = Vec::new();
    for turn in turns(transcript) {
        match turn {
            Turn::UserText(text) => messages.push(json!({"role": "user", "content": text})),
            Turn::AssistantText(text) => {
                messages.push(json!({"role": "assistant", "content": text}));
            }
            Turn::ToolCalls(calls) => {
                let tool_calls: Vec<Value> = calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.call_id(),
                            "type": "function",
                            "function": {
                                "name": call.tool_name(),
                                "arguments": call.arguments().to_string(),
                            }
                        })
                    })
                    .collect();
                messages.push(json!({
                    "role": "assistant",
                    "content": Value::Null,
                    "tool_calls": tool_calls,
                }));
            }
            Turn::ToolResult(invocation) => messages.push(json!({
                "role": "tool",
                "tool_call_id": invocation.call_id(),
                "content": invocation.result_content().to_string(),
            })),
        }
    }
    messages
}

#[derive(Clone, Copy)]
enum BlockDialect {
    Anthropic,
    Gemini,
}

impl BlockDialect {
    const fn role(self, assistant: bool) -> &'static str {
        match (self, assistant) {
            (_, false) => "user",
            (Self::Anthropic, true) => "assistant",
            (Self::Gemini, true) => "model",
        }
    }

    const fn content_key(self) -> &'static str {
        match self {
            Self::Anthropic => "content",
            Self::Gemini => "parts",
        }
    }

    fn text_block(self, text: &str) -> Value {
        match self {
            Self::Anthropic => json!({"type": "text", "text": text}),
            Self::Gemini => json!({"text": text}),
        }
    }

    fn call_block(self, call: &ToolCallRequest) -> Value {
        match self {
            Self::Anthropic => json!({
                "type": "tool_use",
                "id": call.call_id(),
                "name": call.tool_name(),
                "input": call.arguments(),
            }),
            Self::Gemini => json!({
                "functionCall": {
                    "name": call.tool_name(),
                    "args": call.arguments(),
                }
            }),
        }
    }

    fn result_block(self, invocation: &ToolInvocation) -> Value {
        match self {
            Self::Anthropic => json!({
                "type": "tool_result",
                "tool_use_id": invocation.call_id(),
                "content": invocation.result_content().to_string(),
                "is_error": !invocation.is_success(),
            }),
            Self::Gemini => json!({
                "functionResponse": {
                    "name": invocation.tool_name(),
                    "response": invocation.result_content(),
                }
            }),
        }
    }
}

/// Appends `block` to the last message when it has the same role; both
/// dialects expect consecutive same-role content in a single message.
fn push_block(messages: &mut Vec<(&'static str, Vec<Value>)>, role: &'static str, block: Value) {
    if let Some((last_role, blocks)) = messages.last_mut()
        && *last_role == role
    {
        blocks.push(block);
    } else {
        messages.push((role, vec![block]));
    }
}

fn block_messages(transcript: &Transcript, dialect: BlockDialect) -> Value {
    let mut messages: Vec<(&'static str, Vec<Value>)> = Vec::new();
    for turn in turns(transcript) {
        match turn {
            Turn::UserText(text) => {
                push_block(&mut messages, dialect.role(false), dialect.text_block(&text));
            }
            Turn::AssistantText(text) => {
                push_block(&mut messages, dialect.role(true), dialect.text_block(text));
            }
            Turn::ToolCalls(calls) => {
                for call in calls {
                    push_block(&mut messages, dialect.role(true), dialect.call_block(call));
                }
            }
            Turn::ToolResult(invocation) => {
                push_block(
                    &mut messages,
                    dialect.role(false),
                    dialect.result_block(invocation),
                );
            }
        }
    }

    let key = dialect.content_key();
    Value::Array(
        messages
            .into_iter()
            .map(|(role, blocks)| {
                let mut message = Map::new();
                message.insert("role".to_owned(), Value::String(role.to_owned()));
                message.insert(key.to_owned(), Value::Array(blocks));
                Value::Object(message)
            })
            .collect(),
    )
}

fn react_prompt(transcript: &Transcript) -> String {
    let tools = tool_catalog(transcript);
    let tool_lines: Vec<String> = render_tool_declarations(Provider::ReAct, tools)
        .as_array()
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    let tool_names: Vec<&str> = tools.iter().map(|tool| tool.name().as_str()).collect();

    let mut question = Vec::new();
    let mut scratchpad = String::new();
    for turn in turns(transcript) {
        match turn {
            Turn::UserText(text) => question.push(text),
            Turn::AssistantText(text) => {
                scratchpad.push_str(&format!(" I now know the final answer\nFinal Answer: {text}\n"));
            }
            Turn::ToolCalls(_) => {}
            Turn::ToolResult(invocation) => scratchpad.push_str(&format!(
                " I should use {tool}.\nAction: {tool}\nAction Input: {input}\nObservation: {observation}\nThought:",
                tool = invocation.tool_name(),
                input = invocation.arguments(),
                observation = invocation.result_content(),
            )),
        }
    }

    let mut prompt = String::from(
        "Answer the following request as best you can. You have access to the following tools:\n\n",
    );
    prompt.push_str(&tool_lines.join("\n"));
    prompt.push_str("\n\n");
    prompt.push_str(&REACT_FORMAT.replace("{tool_names}", &tool_names.join(", ")));
    prompt.push_str("\nQuestion: ");
    prompt.push_str(&question.join("\n\n"));
    prompt.push_str("\nThought:");
    prompt.push_str(&scratchpad);
    prompt
}
