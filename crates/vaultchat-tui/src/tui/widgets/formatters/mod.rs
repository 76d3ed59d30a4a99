//! Header text for tool calls: display name, input summary and status glyph.
//!
//! Both the name and the summary are ordered rule tables; the first rule
//! whose predicate matches produces the text.

use vaultchat_core::{RenderConfig, ToolCall, ToolStatus};

pub mod helpers;

use self::helpers::{basename, field_text, truncate_end};

const SKILL_TOOL_NAME: &str = "Skill";
const TASK_TOOL_NAME: &str = "Task";
const SKILL_ARGS_MAX_CHARS: usize = 40;
const COMMAND_MAX_CHARS: usize = 30;
const QUERY_MAX_CHARS: usize = 30;

type Formatter = fn(&ToolCall, &RenderConfig) -> Option<String>;

/// One entry in a formatting chain. `format` returning `None` passes to the next rule.
struct Rule {
    name: &'static str,
    format: Formatter,
}

static NAME_RULES: &[Rule] = &[
    Rule {
        name: "skill",
        format: |call, _| {
            (call.name == SKILL_TOOL_NAME)
                .then(|| field_text(&call.input, "skill"))
                .flatten()
                .map(|skill| format!("Skill: {skill}"))
        },
    },
    Rule {
        name: "task",
        format: |call, _| {
            (call.name == TASK_TOOL_NAME)
                .then(|| field_text(&call.input, "subagent_type"))
                .flatten()
                .map(|agent| format!("Task: {agent}"))
        },
    },
    Rule {
        name: "integration",
        format: |call, config| {
            if config.integration_prefix.is_empty() {
                return None;
            }
            call.name
                .strip_prefix(config.integration_prefix.as_str())
                .map(|rest| rest.replace('_', " "))
        },
    },
];

static SUMMARY_RULES: &[Rule] = &[
    Rule {
        name: "skill_args",
        format: |call, _| {
            (call.name == SKILL_TOOL_NAME)
                .then(|| field_text(&call.input, "args"))
                .flatten()
                .map(|args| truncate_end(&args, SKILL_ARGS_MAX_CHARS))
        },
    },
    Rule {
        name: "task_description",
        format: |call, _| {
            (call.name == TASK_TOOL_NAME)
                .then(|| field_text(&call.input, "description"))
                .flatten()
        },
    },
    Rule {
        name: "path",
        format: |call, _| {
            field_text(&call.input, "file_path")
                .or_else(|| field_text(&call.input, "path"))
                .map(|path| basename(&path).to_string())
        },
    },
    Rule {
        name: "pattern",
        format: |call, _| field_text(&call.input, "pattern"),
    },
    Rule {
        name: "command",
        format: |call, _| {
            field_text(&call.input, "command").map(|cmd| truncate_end(&cmd, COMMAND_MAX_CHARS))
        },
    },
    Rule {
        name: "query",
        format: |call, _| {
            field_text(&call.input, "query").map(|q| truncate_end(&q, QUERY_MAX_CHARS))
        },
    },
];

fn first_match(rules: &[Rule], call: &ToolCall, config: &RenderConfig) -> Option<String> {
    rules.iter().find_map(|rule| {
        let text = (rule.format)(call, config)?;
        tracing::trace!(target: "tui.tool", "Tool {} formatted by rule {}", call.id, rule.name);
        Some(text)
    })
}

/// Human-readable name for the header.
pub fn display_name(call: &ToolCall, config: &RenderConfig) -> String {
    first_match(NAME_RULES, call, config).unwrap_or_else(|| call.name.clone())
}

/// Short digest of the call input, empty when the input has no keys.
pub fn input_summary(call: &ToolCall, config: &RenderConfig) -> String {
    first_match(SUMMARY_RULES, call, config).unwrap_or_else(|| match call.input.len() {
        0 => String::new(),
        n => format!("{n} params"),
    })
}

pub fn status_glyph(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::Pending => "pending",
        ToolStatus::Running => "running...",
        ToolStatus::Success => "✓",
        ToolStatus::Error => "✗",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, input: serde_json::Value) -> ToolCall {
        ToolCall::from_json("t1", name, input)
    }

    #[test]
    fn test_display_names() {
        let config = RenderConfig::default();
        assert_eq!(
            display_name(&call("Skill", json!({"skill": "summarize"})), &config),
            "Skill: summarize"
        );
        assert_eq!(display_name(&call("Skill", json!({})), &config), "Skill");
        assert_eq!(
            display_name(&call("Task", json!({"subagent_type": "explorer"})), &config),
            "Task: explorer"
        );
        assert_eq!(
            display_name(&call("mcp__obsidian__search_notes", json!({})), &config),
            "search notes"
        );
        assert_eq!(display_name(&call("Read", json!({})), &config), "Read");
    }

    #[test]
    fn test_integration_prefix_is_configurable() {
        let config = RenderConfig {
            integration_prefix: "ext__".to_string(),
            ..RenderConfig::default()
        };
        assert_eq!(
            display_name(&call("ext__list_files", json!({})), &config),
            "list files"
        );
        assert_eq!(
            display_name(&call("mcp__obsidian__read", json!({})), &config),
            "mcp__obsidian__read"
        );
    }

    #[test]
    fn test_summary_priority() {
        let config = RenderConfig::default();
        let args = "a".repeat(55);
        assert_eq!(
            input_summary(&call("Skill", json!({"skill": "s", "args": args})), &config),
            format!("{}...", "a".repeat(40))
        );

        let long = "describe ".repeat(10);
        assert_eq!(
            input_summary(&call("Task", json!({"description": long})), &config),
            long
        );

        assert_eq!(
            input_summary(
                &call("Read", json!({"file_path": "/vault/pages/ark.md", "pattern": "x"})),
                &config
            ),
            "ark.md"
        );
        assert_eq!(
            input_summary(&call("Glob", json!({"path": "pages/sub"})), &config),
            "sub"
        );
        assert_eq!(
            input_summary(&call("Grep", json!({"pattern": "TODO.*"})), &config),
            "TODO.*"
        );
        assert_eq!(
            input_summary(
                &call("Bash", json!({"command": "cargo test --workspace --all-features"})),
                &config
            ),
            "cargo test --workspace --all-f..."
        );
        assert_eq!(
            input_summary(&call("Search", json!({"query": "short"})), &config),
            "short"
        );
        assert_eq!(
            input_summary(&call("Other", json!({"a": 1, "b": 2})), &config),
            "2 params"
        );
        assert_eq!(input_summary(&call("Other", json!({})), &config), "");
    }

    #[test]
    fn test_empty_values_fall_through() {
        let config = RenderConfig::default();
        assert_eq!(
            input_summary(&call("Read", json!({"file_path": "", "query": "q"})), &config),
            "q"
        );
    }

    #[test]
    fn test_status_glyphs() {
        assert_eq!(status_glyph(ToolStatus::Pending), "pending");
        assert_eq!(status_glyph(ToolStatus::Running), "running...");
        assert_eq!(status_glyph(ToolStatus::Success), "✓");
        assert_eq!(status_glyph(ToolStatus::Error), "✗");
    }
}
