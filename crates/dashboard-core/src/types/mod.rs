//! Record types shown on the dashboard pages

use serde::{Deserialize, Serialize};

/// Declares a closed set of snake_case labels with `as_str`, `Display` and `FromStr`
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $label)] $variant),+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable snake_case label
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err($crate::Error::validation(
                        stringify!($name),
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

mod access_log;
mod client;
mod feedback;

pub use access_log::{
    AccessLog, AccessLogDraft, AccessType, DeviceInfo, DeviceType, GeoLocation, LogLevel,
    LogStatus, ThreatLevel, UserSummary,
};
pub use client::{
    Address, Client, ClientDraft, ClientPatch, ClientStatus, Contact, Deal, DealDraft, DealStage,
    HealthBand, Tier,
};
pub use feedback::{
    AdminResponse, FeedbackUser, Idea, IdeaCategory, IdeaDraft, IdeaPatch, IdeaStatus, NpsCategory,
    NpsResponse, Plan, Priority,
};

/// Where a displayed record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Bundled static record, never persisted
    Seed,
    /// Returned by the data-access collaborator
    Live,
}

impl Origin {
    /// Only collaborator-backed records accept edits and deletes
    #[must_use]
    pub const fn is_mutable(self) -> bool {
        matches!(self, Self::Live)
    }
}

/// A record paired with the source it was merged from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tagged<R> {
    /// Source of the record
    pub origin: Origin,
    /// The record itself
    #[serde(flatten)]
    pub record: R,
}

impl<R> Tagged<R> {
    /// Tag a bundled record
    pub const fn seed(record: R) -> Self {
        Self {
            origin: Origin::Seed,
            record,
        }
    }

    /// Tag a collaborator record
    pub const fn live(record: R) -> Self {
        Self {
            origin: Origin::Live,
            record,
        }
    }
}

impl<R> AsRef<R> for Tagged<R> {
    fn as_ref(&self) -> &R {
        &self.record
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_origin_mutability() {
        assert!(Origin::Live.is_mutable());
        assert!(!Origin::Seed.is_mutable());
    }

    #[test]
    fn test_labelled_enum_roundtrip() {
        for status in IdeaStatus::ALL {
            let parsed: IdeaStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);

            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_labelled_enum_rejects_unknown() {
        let result = "archived".parse::<ClientStatus>();
        assert!(matches!(result, Err(crate::Error::Validation { .. })));
    }

    #[test]
    fn test_tagged_flattens_record() {
        let response = crate::seed::nps_responses().remove(0);
        let tagged = Tagged::seed(response);
        let value = serde_json::to_value(&tagged).unwrap();

        assert_eq!(value["origin"], "seed");
        assert_eq!(value["score"], 10);
    }
}
