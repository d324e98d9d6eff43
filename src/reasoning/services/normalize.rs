//! Normalizing provider responses into engine decisions.

use crate::orchestration::domain::{EngineDecision, EngineError, ToolCallRequest};
use crate::reasoning::domain::Provider;
use serde_json::{Value, json};

/// Call identifier assigned to the single action of a ReAct response.
pub const REACT_CALL_ID: &str = "react_action";

fn format_error(message: impl Into<String>) -> EngineError {
    EngineError::Format(message.into())
}

fn fallback_call_id(index: usize) -> String {
    format!("call_{index}")
}

/// Converts a raw provider response into an [`EngineDecision`].
///
/// A response that requests tools yields [`EngineDecision::ToolCalls`] in
/// the order the provider listed them; otherwise its text becomes the final
/// answer. An explicit provider error object is reported as
/// [`EngineError::Rejected`].
///
/// # Errors
///
/// Returns [`EngineError::Format`] when the response is malformed, carries
/// unparsable tool arguments, or contains neither tool calls nor text.
pub fn normalize_response(provider: Provider, response: &Value) -> Result<EngineDecision, EngineError> {
    if let Some(message) = provider_error(response) {
        return Err(EngineError::Rejected(message));
    }
    match provider {
        Provider::OpenAi => normalize_openai(response),
        Provider::Anthropic => normalize_anthropic(response),
        Provider::Gemini => normalize_gemini(response),
        Provider::ReAct => normalize_react(response),
    }
}

fn provider_error(response: &Value) -> Option<String> {
    let error = response.get("error")?;
    if error.is_null() {
        return None;
    }
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), str::to_owned),
    )
}

fn final_text(text: &str) -> Result<EngineDecision, EngineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(format_error("response carried neither tool calls nor text"));
    }
    Ok(EngineDecision::FinalAnswer(trimmed.to_owned()))
}

fn tool_name(value: Option<&Value>) -> Result<&str, EngineError> {
    value
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| format_error("tool call is missing a function name"))
}

/// Accepts object arguments as-is and parses stringified JSON; an absent or
/// empty payload means no arguments.
fn tool_arguments(name: &str, value: Option<&Value>) -> Result<Value, EngineError> {
    match value {
        None | Some(Value::Null) => Ok(json!({})),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(json!({})),
        Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|err| {
            format_error(format!("tool call {name} carried invalid JSON arguments: {err}"))
        }),
        Some(other) => Ok(other.clone()),
    }
}

fn normalize_openai(response: &Value) -> Result<EngineDecision, EngineError> {
    let message = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| format_error("response has no choices[0].message"))?;

    let calls = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .map(|calls| {
            calls
                .iter()
                .enumerate()
                .map(|(index, call)| -> Result<ToolCallRequest, EngineError> {
                    let function = call.get("function");
                    let name = tool_name(function.and_then(|f| f.get("name")))?;
                    let arguments = tool_arguments(name, function.and_then(|f| f.get("arguments")))?;
                    let call_id = call
                        .get("id")
                        .and_then(Value::as_str)
                        .map_or_else(|| fallback_call_id(index), str::to_owned);
                    Ok(ToolCallRequest::new(call_id, name, arguments))
                })
                .collect::<Result<Vec<_>, EngineError>>()
        })
        .transpose()?
        .unwrap_or_default();

    if !calls.is_empty() {
        return Ok(EngineDecision::ToolCalls(calls));
    }
    final_text(message.get("content").and_then(Value::as_str).unwrap_or_default())
}

fn normalize_anthropic(response: &Value) -> Result<EngineDecision, EngineError> {
    let blocks = response
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| format_error("response has no content blocks"))?;

    let mut calls = Vec::new();
    let mut text = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        match block.get("type").and_then(Value::as_str) {
            Some("tool_use") => {
                let name = tool_name(block.get("name"))?;
                let arguments = tool_arguments(name, block.get("input"))?;
                let call_id = block
                    .get("id")
                    .and_then(Value::as_str)
                    .map_or_else(|| fallback_call_id(index), str::to_owned);
                calls.push(ToolCallRequest::new(call_id, name, arguments));
            }
            Some("text") => {
                if let Some(fragment) = block.get("text").and_then(Value::as_str) {
                    text.push(fragment);
                }
            }
            _ => {}
        }
    }

    if calls.is_empty() {
        final_text(&text.join("\n"))
    } else {
        Ok(EngineDecision::ToolCalls(calls))
    }
}

fn normalize_gemini(response: &Value) -> Result<EngineDecision, EngineError> {
    let parts = response
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.pointer("/content/parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| format_error("response has no candidates[0].content.parts"))?;

    let mut calls = Vec::new();
    let mut text = Vec::new();
    for part in parts {
        if let Some(call) = part.get("functionCall") {
            let name = tool_name(call.get("name"))?;
            let arguments = tool_arguments(name, call.get("args"))?;
            // Gemini has no call identifiers; results are matched by position.
            calls.push(ToolCallRequest::new(fallback_call_id(calls.len()), name, arguments));
        } else if let Some(fragment) = part.get("text").and_then(Value::as_str) {
            text.push(fragment);
        }
    }

    if calls.is_empty() {
        final_text(&text.join(""))
    } else {
        Ok(EngineDecision::ToolCalls(calls))
    }
}

fn react_text(response: &Value) -> Option<&str> {
    response
        .as_str()
        .or_else(|| response.get("text").and_then(Value::as_str))
        .or_else(|| response.get("content").and_then(Value::as_str))
        .or_else(|| {
            response
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str)
        })
        .or_else(|| response.pointer("/choices/0/text").and_then(Value::as_str))
}

/// Parses `Action:` and `Action Input:` from ReAct text.
///
/// The input runs until the next `Observation:` marker. Text that is not a
/// JSON object is passed as `{"input": ...}`.
fn react_action(text: &str) -> Option<ToolCallRequest> {
    let (_, after_action) = text.split_once("Action:")?;
    let (name_part, input_part) = after_action.split_once("Action Input:")?;
    let name = name_part
        .lines()
        .next()
        .map(|line| line.trim().trim_matches('`'))
        .filter(|line| !line.is_empty())?;

    let raw_input = input_part
        .split_once("Observation:")
        .map_or(input_part, |(input, _)| input)
        .trim()
        .trim_start_matches("```json")
        .trim_matches('`')
        .trim();
    let arguments = if raw_input.is_empty() {
        json!({})
    } else {
        match serde_json::from_str::<Value>(raw_input) {
            Ok(object @ Value::Object(_)) => object,
            Ok(Value::String(input)) => json!({ "input": input }),
            _ => json!({ "input": raw_input }),
        }
    };
    Some(ToolCallRequest::new(REACT_CALL_ID, name, arguments))
}

fn normalize_react(response: &Value) -> Result<EngineDecision, EngineError> {
    let text = react_text(response).ok_or_else(|| format_error("response carried no ReAct text"))?;
    let answer = text.split_once("Final Answer:").map(|(_, answer)| answer);

    match (answer, react_action(text)) {
        (Some(_), Some(_)) => Err(format_error(
            "ReAct output contained both an action and a final answer",
        )),
        (Some(answer_text), None) => final_text(answer_text),
        (None, Some(call)) => Ok(EngineDecision::ToolCalls(vec![call])),
        (None, None) => Err(format_error(
            "ReAct output contained neither an action nor a final answer",
        )),
    }
}
