// Router registry
//
// Closed set of server-side router facades and the URI segment each one
// is mounted under. A router's endpoint is `{target}/{segment}_router`.

use std::str::FromStr;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::Error;

/// Suffix appended to a router's URI segment to form its endpoint.
pub const ROUTER_SUFFIX: &str = "_router";

/// A logical router exposed by the Zenoss JSON API.
///
/// Names are case-sensitive and serialize verbatim into the envelope's
/// `action` field.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum Router {
    MessagingRouter,
    DetailNavRouter,
    EventsRouter,
    ProcessRouter,
    ServiceRouter,
    SettingsRouter,
    DeviceRouter,
    NetworkRouter,
    TemplateRouter,
    ReportRouter,
    MibRouter,
    ZenPackRouter,
}

impl Router {
    /// Parse a router identifier, failing with [`Error::UnknownRouter`]
    /// for anything outside the table.
    pub fn resolve(name: &str) -> Result<Self, Error> {
        Self::from_str(name).map_err(|_| Error::UnknownRouter {
            router: name.to_owned(),
        })
    }

    /// The URI segment implementing this router on the server.
    pub fn segment(self) -> &'static str {
        match self {
            Self::MessagingRouter | Self::NetworkRouter => "messaging",
            Self::DetailNavRouter => "detailnav",
            Self::EventsRouter => "evconsole",
            Self::ProcessRouter => "process",
            Self::ServiceRouter => "service",
            Self::SettingsRouter => "settings",
            Self::DeviceRouter => "device",
            Self::TemplateRouter => "template",
            Self::ReportRouter => "report",
            Self::MibRouter => "mib",
            Self::ZenPackRouter => "zenpack",
        }
    }

    /// Request path for this router below `target`, e.g.
    /// `/zport/dmd/Devices` → `/zport/dmd/Devices/device_router`.
    ///
    /// `target` is passed through untouched.
    pub fn endpoint(self, target: &str) -> String {
        format!("{target}/{}{ROUTER_SUFFIX}", self.segment())
    }
}
