use log::info;

use crate::clockify::{ClockifyRepository, NamedResource};
use crate::config::TargetNames;
use crate::error::SyncError;
use crate::time_entry::DestinationIds;

/// 名前が一致する最初の要素のIDを返す。
fn find_id(
    resources: Vec<NamedResource>,
    kind: &'static str,
    name: &str,
) -> Result<String, SyncError> {
    resources
        .into_iter()
        .find(|resource| resource.name == name)
        .map(|resource| resource.id)
        .ok_or_else(|| SyncError::NotFound {
            kind,
            name: name.to_string(),
        })
}

pub async fn resolve_workspace<C: ClockifyRepository>(
    client: &C,
    name: &str,
) -> Result<String, SyncError> {
    find_id(client.read_workspaces().await?, "workspace", name)
}

pub async fn resolve_project<C: ClockifyRepository>(
    client: &C,
    workspace_id: &str,
    name: &str,
) -> Result<String, SyncError> {
    find_id(client.read_projects(workspace_id).await?, "project", name)
}

pub async fn resolve_task<C: ClockifyRepository>(
    client: &C,
    workspace_id: &str,
    project_id: &str,
    name: &str,
) -> Result<String, SyncError> {
    find_id(client.read_tasks(workspace_id, project_id).await?, "task", name)
}

/// workspace, project, taskの順に名前からIDを解決する。
///
/// いずれかが見つからない場合は、その時点で`SyncError::NotFound`を返す。
pub async fn resolve_ids<C: ClockifyRepository>(
    client: &C,
    target: &TargetNames,
) -> Result<DestinationIds, SyncError> {
    let workspace_id = resolve_workspace(client, &target.workspace).await?;
    let project_id = resolve_project(client, &workspace_id, &target.project).await?;
    let task_id = resolve_task(client, &workspace_id, &project_id, &target.task).await?;
    info!(
        "Resolved workspace: {}, project: {}, task: {}",
        workspace_id, project_id, task_id
    );

    Ok(DestinationIds {
        workspace_id,
        project_id,
        task_id,
    })
}
