//! Load revisions from a live Porch API server.

#![forbid(unsafe_code)]

use std::time::Instant;

use futures::future::try_join_all;
use kube::{
    api::{Api, ListParams},
    core::{ApiResource, DynamicObject, GroupVersionKind},
    Client,
};
use metrics::histogram;
use revdeck_core::{ResourcesMap, RevisionSummary};
use tracing::{debug, info, warn};

use crate::{
    resource_files_from_json, resources_from_files, revision_meta_from_json, sort_newest_first, PorchResult, PORCH_GROUP,
    PORCH_VERSION,
};

fn porch_resource(kind: &str, plural: &str) -> ApiResource {
    ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(PORCH_GROUP, PORCH_VERSION, kind), plural)
}

/// List the revisions of `package` (optionally within `repository`) and fetch their
/// resources concurrently. Result is newest-first.
pub async fn load_revisions_from_cluster(
    namespace: &str,
    repository: Option<&str>,
    package: &str,
) -> PorchResult<Vec<RevisionSummary>> {
    let started = Instant::now();
    let client = Client::try_default().await?;
    let revisions: Api<DynamicObject> =
        Api::namespaced_with(client.clone(), namespace, &porch_resource("PackageRevision", "packagerevisions"));
    let resources: Api<DynamicObject> = Api::namespaced_with(
        client,
        namespace,
        &porch_resource("PackageRevisionResources", "packagerevisionresources"),
    );

    let list = revisions.list(&ListParams::default()).await?;
    debug!(count = list.items.len(), ns = %namespace, "package revisions listed");
    let mut metas = Vec::new();
    for obj in list.items.iter() {
        let meta = revision_meta_from_json(&serde_json::to_value(obj)?)?;
        if meta.package_name != package { continue; }
        if repository.is_some_and(|r| r != meta.repository) { continue; }
        metas.push(meta);
    }

    let fetches = metas.into_iter().map(|meta| {
        let api = resources.clone();
        async move {
            let resources = match api.get_opt(&meta.name).await? {
                Some(obj) => resources_from_files(&resource_files_from_json(&serde_json::to_value(&obj)?))?,
                None => {
                    warn!(revision = %meta.name, "PackageRevisionResources not found; treating as empty");
                    ResourcesMap::new()
                }
            };
            PorchResult::Ok(RevisionSummary { revision: meta, resources })
        }
    });
    let mut out = try_join_all(fetches).await?;
    sort_newest_first(&mut out);
    histogram!("revdeck_cluster_load_ms", started.elapsed().as_secs_f64() * 1000.0);
    info!(revisions = out.len(), package = %package, ns = %namespace, "revisions loaded from cluster");
    Ok(out)
}
