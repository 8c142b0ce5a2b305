//! # Tool Parameter Structs
//!
//! JSON argument objects of the eight tools, with the schemas advertised to
//! MCP clients. Validation happens in the gateway, after credential
//! extraction.

use qarnot_core::{Constant, TaskSubmission};
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListTasksParams {
    /// Only return tasks carrying these tags.
    #[schemars(description = "Filter tasks by tags")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TaskRefParams {
    /// UUID of the task.
    #[schemars(description = "UUID of the task")]
    pub task_uuid: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TaskLogsParams {
    /// UUID of the task.
    #[schemars(description = "UUID of the task")]
    pub task_uuid: String,
    /// Log stream: "stdout" (default) or "stderr".
    #[schemars(description = "Type of log: 'stdout' or 'stderr' (default: stdout)")]
    pub log_type: Option<String>,
    /// Instance index; omit for the whole task.
    #[schemars(description = "Specific instance ID (optional)")]
    pub instance_id: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConstantParam {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubmitTaskParams {
    #[schemars(description = "Name of the task (required)")]
    pub name: String,
    #[schemars(description = "Computation profile (e.g. 'docker-batch')")]
    pub profile: Option<String>,
    #[schemars(description = "Number of parallel instances (at least 1)")]
    pub instance_count: Option<u32>,
    #[schemars(description = "Short identifier for the task")]
    pub shortname: Option<String>,
    #[schemars(description = "Input bucket names")]
    pub resource_buckets: Option<Vec<String>>,
    #[schemars(description = "Output bucket name")]
    pub result_bucket: Option<String>,
    #[schemars(description = "List of {key, value} constants")]
    pub constants: Option<Vec<ConstantParam>>,
    #[schemars(description = "Tags for organization")]
    pub tags: Option<Vec<String>>,
}

impl From<SubmitTaskParams> for TaskSubmission {
    fn from(p: SubmitTaskParams) -> Self {
        Self {
            name: p.name,
            shortname: p.shortname,
            profile: p.profile,
            instance_count: p.instance_count,
            resource_buckets: p.resource_buckets,
            result_bucket: p.result_bucket,
            constants: p.constants.map(|cs| {
                cs.into_iter()
                    .map(|c| Constant {
                        key: c.key,
                        value: c.value,
                    })
                    .collect()
            }),
            tags: p.tags,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileRefParams {
    #[schemars(description = "Name of the profile to retrieve")]
    pub profile_name: String,
}
