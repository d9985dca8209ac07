//! Per-version log entries for history rendering.

use std::collections::BTreeSet;

use crate::{
    Result,
    diff::Diff,
    hash::ContentId,
    model::CityModel,
    version::Version,
};

use super::History;

/// Everything a renderer needs to print one version.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub id: ContentId,
    pub author: String,
    pub date: String,
    pub message: String,
    pub parents: Vec<ContentId>,
    /// Branch names pointing at this version.
    pub branches: Vec<String>,
    /// Tag names pointing at this version.
    pub tags: Vec<String>,
    /// Changes against the single parent. A root version reports its whole
    /// object set as added; merge versions carry no diff.
    pub diff: Option<Diff>,
}

/// Build log entries for every version reachable from the given refs,
/// newest first.
pub fn log_entries(model: &CityModel, refs: &[String]) -> Result<Vec<LogEntry>> {
    let history = History::new(&model.versioning)?;

    let mut reachable: BTreeSet<ContentId> = BTreeSet::new();
    for reference in refs {
        let id = model.versioning.resolve_ref(reference)?;
        reachable.extend(history.ancestors(&id)?);
    }

    let mut entries = Vec::with_capacity(reachable.len());
    for id in history.topological_order().into_iter().rev() {
        if !reachable.contains(&id) {
            continue;
        }
        let (_, version) = model.versioning.get_version(id.as_str())?;
        entries.push(build_entry(model, &id, version)?);
    }
    Ok(entries)
}

fn build_entry(model: &CityModel, id: &ContentId, version: &Version) -> Result<LogEntry> {
    let diff = match version.parents.as_slice() {
        [] => Some(Diff {
            added: version.versioned_objects(model),
            ..Diff::default()
        }),
        [parent] => Some(Diff::between(model, parent.as_str(), id.as_str())?),
        _ => None,
    };

    Ok(LogEntry {
        id: id.clone(),
        author: version.author.clone(),
        date: version.date.clone(),
        message: version.message.clone(),
        parents: version.parents.clone(),
        branches: model
            .versioning
            .branches_of(id)
            .into_iter()
            .map(str::to_string)
            .collect(),
        tags: model
            .versioning
            .tags_of(id)
            .into_iter()
            .map(str::to_string)
            .collect(),
        diff,
    })
}
