// Request parameter shapes
//
// One struct per remote method. Field order matches the order the
// platform's own clients emit, so serialized bodies compare byte-for-byte.

use serde::Serialize;
use strum::{AsRefStr, Display};

/// Field keys requested by `DeviceRouter.getInfo`.
pub const DEVICE_INFO_KEYS: [&str; 28] = [
    "uptime",
    "firstSeen",
    "lastChanged",
    "lastCollected",
    "locking",
    "memory",
    "name",
    "productionState",
    "priority",
    "tagNumber",
    "serialNumber",
    "rackSlot",
    "collector",
    "hwManufacturer",
    "hwModel",
    "osManufacturer",
    "osModel",
    "systems",
    "groups",
    "location",
    "links",
    "comments",
    "snmpSysName",
    "snmpLocation",
    "snmpContact",
    "snmpDescr",
    "snmpCommunity",
    "snmpVersion",
];

/// Organizer path that `DeviceRouter.getDevices` is always sent to.
pub const DEVICE_LIST_PATH: &str = "/zport/dmd/Devices/getSubDevices";

/// Default root for `MibRouter.getTree`.
pub const MIB_ROOT: &str = "/zport/dmd/Mibs";

/// Default graph range for `DeviceRouter.getGraphDefs`, in seconds (36h).
pub const DEFAULT_DRANGE: u64 = 129_600;

/// Default page size for `DeviceRouter.getComponents`.
pub const DEFAULT_COMPONENT_LIMIT: u32 = 50;

/// Default `useFieldSets` flag for `MibRouter.getInfo`.
pub const DEFAULT_USE_FIELD_SETS: bool = true;

/// Sort direction for paged queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, AsRefStr, Display)]
pub enum SortDir {
    #[default]
    #[serde(rename = "ASC")]
    #[strum(serialize = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    #[strum(serialize = "DESC")]
    Desc,
}

/// Empty filter object (`{}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoParams {}

// ── EventsRouter ────────────────────────────────────────────────────

/// Severity and state filters for `EventsRouter.query`. Empty means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    pub severity: Vec<u8>,
    pub event_state: Vec<u8>,
}

/// `EventsRouter.query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventQuery {
    pub start: u32,
    pub limit: u32,
    pub dir: SortDir,
    pub sort: String,
    pub params: EventFilter,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            start: 0,
            limit: 100,
            dir: SortDir::Desc,
            sort: "severity".into(),
            params: EventFilter::default(),
        }
    }
}

// ── DeviceRouter ────────────────────────────────────────────────────

/// Paging window for `DeviceRouter.getComponents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentPage {
    pub start: u32,
    pub limit: u32,
}

impl Default for ComponentPage {
    fn default() -> Self {
        Self {
            start: 0,
            limit: DEFAULT_COMPONENT_LIMIT,
        }
    }
}

/// `DeviceRouter.getComponents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentQuery<'a> {
    pub start: u32,
    pub limit: u32,
    pub uid: &'a str,
    pub meta_type: &'a str,
    pub keys: Vec<&'a str>,
}

impl<'a> ComponentQuery<'a> {
    /// IP interface components of `uid`.
    pub fn interfaces(uid: &'a str, page: ComponentPage) -> Self {
        Self {
            start: page.start,
            limit: page.limit,
            uid,
            meta_type: "IpInterface",
            keys: Vec::new(),
        }
    }
}

/// `DeviceRouter.getInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoQuery<'a> {
    pub keys: &'a [&'a str],
    pub uid: &'a str,
}

/// `DeviceRouter.getDevices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceListQuery {
    pub dir: SortDir,
    pub limit: u32,
    pub sort: String,
    pub start: u32,
    pub params: NoParams,
}

impl Default for DeviceListQuery {
    fn default() -> Self {
        Self {
            dir: SortDir::Asc,
            limit: 100,
            sort: "name".into(),
            start: 0,
            params: NoParams {},
        }
    }
}

/// `DeviceRouter.getGraphDefs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphQuery<'a> {
    pub uid: &'a str,
    pub drange: u64,
}

/// Any method taking only `{uid}` (e.g. `DeviceRouter.getForm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UidQuery<'a> {
    pub uid: &'a str,
}

// ── MibRouter ───────────────────────────────────────────────────────

/// `MibRouter.getTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeQuery<'a> {
    pub id: &'a str,
}

/// `MibRouter.getInfo`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MibInfoQuery<'a> {
    pub uid: &'a str,
    pub use_field_sets: bool,
}

/// `MibRouter.getOidMappings`
///
/// `page` is sent as a string; the platform's default is the literal `"None"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OidMappingQuery {
    pub dir: SortDir,
    pub sort: String,
    pub start: u32,
    pub page: String,
    pub limit: u32,
}

impl Default for OidMappingQuery {
    fn default() -> Self {
        Self {
            dir: SortDir::Asc,
            sort: "name".into(),
            start: 0,
            page: "None".into(),
            limit: 256,
        }
    }
}

/// [`OidMappingQuery`] bound to a MIB uid, as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OidMappingRequest<'a> {
    pub uid: &'a str,
    #[serde(flatten)]
    pub query: &'a OidMappingQuery,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn sort_dir_is_upper_case() {
        assert_eq!(serde_json::to_value(SortDir::Asc).unwrap(), json!("ASC"));
        assert_eq!(serde_json::to_value(SortDir::Desc).unwrap(), json!("DESC"));
        assert_eq!(SortDir::Desc.to_string(), "DESC");
    }

    #[test]
    fn event_query_field_order() {
        let q = EventQuery {
            limit: 25,
            ..EventQuery::default()
        };
        assert_eq!(
            serde_json::to_string(&q).unwrap(),
            r#"{"start":0,"limit":25,"dir":"DESC","sort":"severity","params":{"severity":[],"eventState":[]}}"#
        );
    }

    #[test]
    fn event_query_defaults() {
        assert_eq!(
            serde_json::to_string(&EventQuery::default()).unwrap(),
            r#"{"start":0,"limit":100,"dir":"DESC","sort":"severity","params":{"severity":[],"eventState":[]}}"#
        );
    }

    #[test]
    fn device_list_defaults() {
        assert_eq!(
            serde_json::to_string(&DeviceListQuery::default()).unwrap(),
            r#"{"dir":"ASC","limit":100,"sort":"name","start":0,"params":{}}"#
        );
    }

    #[test]
    fn component_query_targets_ip_interfaces() {
        let q = ComponentQuery::interfaces("/zport/dmd/Devices/x", ComponentPage::default());
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            json!({
                "start": 0,
                "limit": 50,
                "uid": "/zport/dmd/Devices/x",
                "meta_type": "IpInterface",
                "keys": [],
            })
        );
    }

    #[test]
    fn mib_info_defaults_to_field_sets() {
        let q = MibInfoQuery {
            uid: "/zport/dmd/Mibs/mibs/IF-MIB",
            use_field_sets: DEFAULT_USE_FIELD_SETS,
        };
        assert_eq!(
            serde_json::to_string(&q).unwrap(),
            r#"{"uid":"/zport/dmd/Mibs/mibs/IF-MIB","useFieldSets":true}"#
        );
    }

    #[test]
    fn oid_mapping_request_flattens_query() {
        let query = OidMappingQuery::default();
        let req = OidMappingRequest {
            uid: "/zport/dmd/Mibs/mibs/IF-MIB",
            query: &query,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"uid":"/zport/dmd/Mibs/mibs/IF-MIB","dir":"ASC","sort":"name","start":0,"page":"None","limit":256}"#
        );
    }

    #[test]
    fn device_info_key_list_is_complete() {
        assert_eq!(DEVICE_INFO_KEYS.len(), 28);
        assert_eq!(DEVICE_INFO_KEYS[0], "uptime");
        assert_eq!(DEVICE_INFO_KEYS[27], "snmpVersion");
    }
}
