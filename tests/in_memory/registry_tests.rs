//! Registry construction across several backends.

use review_orchestrator::tool_registry::{
    catalog::{REVIEW_TAG, standard_registry},
    domain::{BackendId, ToolDefinition, ToolName, ToolRegistryError, ToolSet, ToolTag},
    services::{Namespacing, ToolRegistryBuilder},
};
use rstest::{fixture, rstest};
use serde_json::json;

fn status_tool_set(backend: &str) -> eyre::Result<ToolSet> {
    Ok(ToolSet::new(BackendId::new(backend)?).with_tool(ToolDefinition::new(
        "get_status",
        "Returns the backend status.",
        json!({"type": "object"}),
    )?))
}

#[fixture]
fn tool_sets() -> eyre::Result<(ToolSet, ToolSet)> {
    Ok((status_tool_set("github")?, status_tool_set("asana")?))
}

#[rstest]
fn bare_collision_leaves_the_builder_unchanged(
    tool_sets: eyre::Result<(ToolSet, ToolSet)>,
) -> eyre::Result<()> {
    let (github, asana) = tool_sets?;
    let mut builder = ToolRegistryBuilder::new();
    builder.import(&github, Namespacing::Bare)?;

    let result = builder.import(&asana, Namespacing::Bare);

    assert_eq!(
        result,
        Err(ToolRegistryError::DuplicateTool(ToolName::new("get_status")?))
    );
    let registry = builder.build();
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.resolve("get_status")?.backend().as_str(),
        "github"
    );
    Ok(())
}

#[rstest]
fn prefixed_import_keeps_both_backends(
    tool_sets: eyre::Result<(ToolSet, ToolSet)>,
) -> eyre::Result<()> {
    let (github, asana) = tool_sets?;
    let mut builder = ToolRegistryBuilder::new();
    builder.import(&github, Namespacing::Prefixed)?;
    builder.import(&asana, Namespacing::Prefixed)?;

    let registry = builder.build();

    assert_eq!(registry.len(), 2);
    let asana_status = registry.resolve("asana_get_status")?;
    assert_eq!(asana_status.local_name().as_str(), "get_status");
    assert_eq!(asana_status.backend().as_str(), "asana");
    assert_eq!(
        registry
            .backends()
            .iter()
            .map(|backend| backend.as_str())
            .collect::<Vec<_>>(),
        vec!["github", "asana"]
    );
    Ok(())
}

#[rstest]
fn standard_registry_lists_review_tools_for_every_backend() -> eyre::Result<()> {
    let registry = standard_registry()?;
    let review_tag = vec![ToolTag::new(REVIEW_TAG)?];

    let listing = registry.list(&review_tag);
    let first_pass: Vec<String> = listing
        .iter()
        .map(|tool| tool.name().as_str().to_owned())
        .collect();
    let second_pass = listing.iter().count();

    assert!(!first_pass.is_empty());
    assert_eq!(first_pass.len(), second_pass, "listing restarts from the start");
    for prefix in ["github_", "asana_", "slack_"] {
        assert!(
            first_pass.iter().any(|name| name.starts_with(prefix)),
            "expected a {prefix} tool in {first_pass:?}"
        );
    }
    assert!(matches!(
        registry.resolve("jira_get_issue"),
        Err(ToolRegistryError::UnknownTool(name)) if name == "jira_get_issue"
    ));
    Ok(())
}
