// MibRouter endpoints
//
// MIB organizer tree, MIB properties, and OID mappings.

use tracing::debug;

use crate::client::{RawResponse, ZenossClient};
use crate::error::Error;
use crate::params::{MibInfoQuery, OidMappingQuery, OidMappingRequest, TreeQuery};
use crate::router::Router;

impl ZenossClient {
    /// Organizer tree rooted at `id` (usually [`MIB_ROOT`](crate::params::MIB_ROOT)).
    ///
    /// `MibRouter.getTree` with `data = [{id}]`, sent below `id` itself.
    pub async fn get_mib_tree(&self, id: &str) -> Result<RawResponse, Error> {
        debug!(id, "fetching MIB tree");
        self.call(Router::MibRouter, "getTree", [TreeQuery { id }], id)
            .await
    }

    /// Properties of a MIB. Pass
    /// [`DEFAULT_USE_FIELD_SETS`](crate::params::DEFAULT_USE_FIELD_SETS) for
    /// the platform's usual form.
    ///
    /// `MibRouter.getInfo` with `data = [{uid, useFieldSets}]`
    pub async fn get_mib_info(
        &self,
        mib_uri: &str,
        use_field_sets: bool,
    ) -> Result<RawResponse, Error> {
        debug!(mib_uri, use_field_sets, "fetching MIB info");
        let query = MibInfoQuery {
            uid: mib_uri,
            use_field_sets,
        };
        self.call(Router::MibRouter, "getInfo", [query], mib_uri)
            .await
    }

    /// OID mappings defined by a MIB.
    ///
    /// `MibRouter.getOidMappings` with `data = [{uid, dir, sort, start, page, limit}]`
    pub async fn get_mib_oid_mappings(
        &self,
        mib_uri: &str,
        query: &OidMappingQuery,
    ) -> Result<RawResponse, Error> {
        debug!(mib_uri, start = query.start, limit = query.limit, "fetching OID mappings");
        let request = OidMappingRequest {
            uid: mib_uri,
            query,
        };
        self.call(Router::MibRouter, "getOidMappings", [request], mib_uri)
            .await
    }
}
