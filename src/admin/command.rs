//! Administrative commands sent to the reserved admin path.
//!
//! Wire format:
//! ```json
//! { "command": "vary",
//!   "endpoint": { "URL": "endpoint1", "Method": "GET", "Variant": "alt", "Uses": 1 } }
//! ```
//! `Uses` is optional and defaults to one.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::{HttpVerb, RouteKey, RouteTable};
use crate::variation::{ScheduledRoute, VariationScheduler};

pub const COMMAND_VARY: &str = "vary";

/// Why a command was rejected. Rejected commands never touch the schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("malformed command: {0}")]
    Malformed(String),

    #[error("unsupported HTTP verb '{0}'")]
    UnknownVerb(String),

    #[error("Uses must be at least 1")]
    ZeroUses,

    #[error("no route for {0}")]
    UnknownRoute(RouteKey),

    #[error("no variant '{variant}' for {route}")]
    UnknownVariant { route: RouteKey, variant: String },
}

/// The JSON body of an admin request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCommand {
    pub command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<CommandEndpoint>,
}

/// The route and variant a command refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEndpoint {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Method")]
    pub method: String,

    #[serde(rename = "Variant")]
    pub variant: String,

    #[serde(rename = "Uses", default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<u32>,
}

/// A validated command ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Vary {
        route: RouteKey,
        variant: String,
        uses: NonZeroU32,
    },
}

impl ServerCommand {
    /// A one-use `vary` command.
    pub fn vary(url: impl Into<String>, method: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            command: COMMAND_VARY.to_string(),
            endpoint: Some(CommandEndpoint {
                url: url.into(),
                method: method.into(),
                variant: variant.into(),
                uses: None,
            }),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CommandError> {
        serde_json::from_slice(bytes).map_err(|e| CommandError::Malformed(e.to_string()))
    }

    /// Check the command name and arguments.
    pub fn parse(self) -> Result<Command, CommandError> {
        match self.command.as_str() {
            COMMAND_VARY => {
                let endpoint = self
                    .endpoint
                    .ok_or_else(|| CommandError::Malformed("missing field `endpoint`".into()))?;
                let verb: HttpVerb = endpoint
                    .method
                    .parse()
                    .map_err(|_| CommandError::UnknownVerb(endpoint.method.clone()))?;
                let uses = NonZeroU32::new(endpoint.uses.unwrap_or(1)).ok_or(CommandError::ZeroUses)?;

                Ok(Command::Vary {
                    route: RouteKey::new(&endpoint.url, verb),
                    variant: endpoint.variant,
                    uses,
                })
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

impl Command {
    /// Apply the command, validating it against the discovered routes.
    pub fn execute(
        self,
        routes: &RouteTable,
        scheduler: &VariationScheduler,
    ) -> Result<ScheduledRoute, CommandError> {
        match self {
            Command::Vary { route, variant, uses } => {
                if !routes.contains(&route) {
                    return Err(CommandError::UnknownRoute(route));
                }
                if !routes.has_variant(&route, &variant) {
                    return Err(CommandError::UnknownVariant { route, variant });
                }

                scheduler.schedule(route.clone(), variant.clone(), uses);
                Ok(ScheduledRoute {
                    route,
                    entry: crate::variation::ScheduleEntry {
                        variant,
                        remaining_uses: uses,
                    },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> RouteTable {
        let mut table = RouteTable::default();
        table.insert_variant("endpoint1", HttpVerb::Get, "default");
        table.insert_variant("endpoint1", HttpVerb::Get, "alt");
        table
    }

    #[test]
    fn test_parse_vary() {
        let command = ServerCommand::from_slice(
            br#"{"command":"vary","endpoint":{"URL":"/endpoint1","Method":"GET","Variant":"alt"}}"#,
        )
        .unwrap()
        .parse()
        .unwrap();

        assert_eq!(
            command,
            Command::Vary {
                route: RouteKey::new("endpoint1", HttpVerb::Get),
                variant: "alt".into(),
                uses: NonZeroU32::MIN,
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = ServerCommand::from_slice(br#"{"command":"reset"}"#)
            .unwrap()
            .parse()
            .unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("reset".into()));
        assert_eq!(err.to_string(), "Unknown command 'reset'");
    }

    #[test]
    fn test_malformed_commands() {
        assert!(matches!(
            ServerCommand::from_slice(b"{not json"),
            Err(CommandError::Malformed(_))
        ));
        assert!(matches!(
            ServerCommand::from_slice(br#"{"command":"vary"}"#).unwrap().parse(),
            Err(CommandError::Malformed(_))
        ));

        let mut lowercase = ServerCommand::vary("endpoint1", "get", "alt");
        assert_eq!(
            lowercase.clone().parse().unwrap_err(),
            CommandError::UnknownVerb("get".into())
        );

        lowercase.endpoint.as_mut().unwrap().method = "GET".into();
        lowercase.endpoint.as_mut().unwrap().uses = Some(0);
        assert_eq!(lowercase.parse().unwrap_err(), CommandError::ZeroUses);
    }

    #[test]
    fn test_execute_schedules_known_variant() {
        let scheduler = VariationScheduler::new();
        let scheduled = ServerCommand::vary("endpoint1", "GET", "alt")
            .parse()
            .unwrap()
            .execute(&routes(), &scheduler)
            .unwrap();

        assert_eq!(scheduled.entry.variant, "alt");
        assert_eq!(scheduler.resolve(&RouteKey::new("endpoint1", HttpVerb::Get)), "alt");
    }

    #[test]
    fn test_execute_rejects_unknown_route_and_variant() {
        let scheduler = VariationScheduler::new();

        let err = ServerCommand::vary("endpoint2", "GET", "alt")
            .parse()
            .unwrap()
            .execute(&routes(), &scheduler)
            .unwrap_err();
        assert!(matches!(err, CommandError::UnknownRoute(_)));

        let err = ServerCommand::vary("endpoint1", "GET", "missing")
            .parse()
            .unwrap()
            .execute(&routes(), &scheduler)
            .unwrap_err();
        assert_eq!(err.to_string(), "no variant 'missing' for GET /endpoint1");
        assert!(scheduler.is_empty());
    }
}
