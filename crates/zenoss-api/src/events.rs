// EventsRouter endpoints

use tracing::debug;

use crate::client::{RawResponse, ZenossClient};
use crate::error::Error;
use crate::params::EventQuery;
use crate::router::Router;

impl ZenossClient {
    /// Events for a device. [`EventQuery::default`] asks for the first 100,
    /// most severe first, unfiltered by severity or state.
    ///
    /// `EventsRouter.query` with
    /// `data = [{start, limit, dir, sort, params: {severity: [], eventState: []}}]`
    pub async fn get_device_events(
        &self,
        device_uri: &str,
        query: &EventQuery,
    ) -> Result<RawResponse, Error> {
        debug!(
            device_uri,
            start = query.start,
            limit = query.limit,
            sort = %query.sort,
            dir = %query.dir,
            "querying events"
        );
        self.call(Router::EventsRouter, "query", [query], device_uri)
            .await
    }
}
