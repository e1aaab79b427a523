//! Plugin types and the sides (web / server) they are made of.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One half of a plugin: the web (TypeScript) or server (Python) part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginSide {
    Web,
    Server,
}

impl fmt::Display for PluginSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Type tag stored in a project's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PluginType {
    App,
    Bundle,
    Lib,
    Slib,
    Service,
    LibSlib,
    LibService,
    AppSlib,
}

impl PluginType {
    pub const ALL: [PluginType; 8] = [
        Self::App,
        Self::Bundle,
        Self::Lib,
        Self::Slib,
        Self::Service,
        Self::LibSlib,
        Self::LibService,
        Self::AppSlib,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Bundle => "bundle",
            Self::Lib => "lib",
            Self::Slib => "slib",
            Self::Service => "service",
            Self::LibSlib => "lib-slib",
            Self::LibService => "lib-service",
            Self::AppSlib => "app-slib",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::App => "web application",
            Self::Bundle => "library bundle",
            Self::Lib => "web library",
            Self::Slib => "server library",
            Self::Service => "server application service",
            Self::LibSlib => "web library with server counterpart",
            Self::LibService => "web library with server application service",
            Self::AppSlib => "web application with server counterpart",
        }
    }

    pub fn has_web(&self) -> bool {
        !matches!(self, Self::Slib | Self::Service)
    }

    pub fn has_server(&self) -> bool {
        !matches!(self, Self::App | Self::Bundle | Self::Lib)
    }

    pub fn is_hybrid(&self) -> bool {
        self.has_web() && self.has_server()
    }

    /// Sides in a fixed order (web first).
    pub fn sides(&self) -> Vec<PluginSide> {
        let mut sides = Vec::with_capacity(2);
        if self.has_web() {
            sides.push(PluginSide::Web);
        }
        if self.has_server() {
            sides.push(PluginSide::Server);
        }
        sides
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "app" => Ok(Self::App),
            "bundle" => Ok(Self::Bundle),
            "lib" => Ok(Self::Lib),
            "slib" => Ok(Self::Slib),
            "service" | "server" => Ok(Self::Service),
            "lib-slib" => Ok(Self::LibSlib),
            "lib-service" => Ok(Self::LibService),
            "app-slib" => Ok(Self::AppSlib),
            other => Err(DomainError::UnknownPluginType(other.to_string())),
        }
    }
}

impl TryFrom<String> for PluginType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PluginType> for String {
    fn from(value: PluginType) -> Self {
        value.as_str().to_string()
    }
}
