// DeviceRouter endpoints
//
// Device listing, details, components, and graph definitions. Each
// method only shapes `data`; the dispatcher does the rest.

use tracing::debug;

use crate::client::{RawResponse, ZenossClient};
use crate::error::Error;
use crate::params::{
    ComponentPage, ComponentQuery, DEVICE_INFO_KEYS, DEVICE_LIST_PATH, DeviceListQuery,
    GraphQuery, InfoQuery, NoParams, UidQuery,
};
use crate::router::Router;

impl ZenossClient {
    /// Collectors available to the device.
    ///
    /// `DeviceRouter.getCollectors` with `data = {}`
    pub async fn get_device_collectors(&self, device_uri: &str) -> Result<RawResponse, Error> {
        debug!(device_uri, "listing collectors");
        self.call(Router::DeviceRouter, "getCollectors", NoParams {}, device_uri)
            .await
    }

    /// IP interface components of a device, paged (50 per page by default).
    ///
    /// `DeviceRouter.getComponents` with `data = [{start, limit, uid, meta_type, keys}]`
    pub async fn get_device_components(
        &self,
        device_uri: &str,
        page: ComponentPage,
    ) -> Result<RawResponse, Error> {
        debug!(
            device_uri,
            start = page.start,
            limit = page.limit,
            "listing device components"
        );
        let query = ComponentQuery::interfaces(device_uri, page);
        self.call(Router::DeviceRouter, "getComponents", [query], device_uri)
            .await
    }

    /// Device details. Always requests the same fixed set of 28 fields.
    ///
    /// `DeviceRouter.getInfo` with `data = [{keys, uid}]`
    pub async fn get_device_info(&self, device_uri: &str) -> Result<RawResponse, Error> {
        debug!(device_uri, "fetching device info");
        let query = InfoQuery {
            keys: &DEVICE_INFO_KEYS,
            uid: device_uri,
        };
        self.call(Router::DeviceRouter, "getInfo", [query], device_uri)
            .await
    }

    /// List devices across the whole device tree.
    ///
    /// `DeviceRouter.getDevices` with `data = {dir, limit, sort, start, params}`,
    /// always sent to `/zport/dmd/Devices/getSubDevices`.
    pub async fn get_devices(&self, query: &DeviceListQuery) -> Result<RawResponse, Error> {
        debug!(
            start = query.start,
            limit = query.limit,
            sort = %query.sort,
            dir = %query.dir,
            "listing devices"
        );
        self.call(Router::DeviceRouter, "getDevices", query, DEVICE_LIST_PATH)
            .await
    }

    /// Graph definitions (RRD URLs) for a device or interface.
    ///
    /// `DeviceRouter.getGraphDefs` with `data = [{uid, drange}]`.
    /// See [`DEFAULT_DRANGE`](crate::params::DEFAULT_DRANGE).
    pub async fn get_device_interface_rrd(
        &self,
        device_uri: &str,
        drange: u64,
    ) -> Result<RawResponse, Error> {
        debug!(device_uri, drange, "fetching graph definitions");
        let query = GraphQuery {
            uid: device_uri,
            drange,
        };
        self.call(Router::DeviceRouter, "getGraphDefs", [query], device_uri)
            .await
    }

    /// Form details for a device interface.
    ///
    /// `DeviceRouter.getForm` with `data = [{uid}]`
    pub async fn get_device_interface_details(
        &self,
        device_uri: &str,
    ) -> Result<RawResponse, Error> {
        debug!(device_uri, "fetching interface details");
        let query = UidQuery { uid: device_uri };
        self.call(Router::DeviceRouter, "getForm", [query], device_uri)
            .await
    }
}
