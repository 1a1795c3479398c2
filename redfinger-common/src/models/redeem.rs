// File: redfinger-common/src/models/redeem.rs

use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Declares one of the closed provisioning choices. Each variant carries the
/// exact label used on the wire and in the database.
macro_rules! labelled_choice {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Name of the submission field this choice is read from.
            pub const FIELD: &'static str = $field;

            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($label => Ok($name::$variant),)+
                    other => Err(format!("Unknown {}: {}", $field, other)),
                }
            }
        }
    };
}

labelled_choice! {
    /// Data-center region the cloud device is provisioned in.
    Server, field = "server" {
        Thailand => "Thailand",
        Hongkong => "Hongkong",
        HongKong2 => "Hong Kong 2",
        Singapore => "Singapore",
        Taiwan => "Taiwan",
        UnitedStates => "United States",
    }
}

labelled_choice! {
    /// Android image installed on the cloud device.
    SystemVersion, field = "systemVersion" {
        Android10 => "Android 10",
        Android81 => "Android 8.1",
        Android12 => "Android 12.0",
    }
}

labelled_choice! {
    /// Service tier.
    CloudType, field = "cloudType" {
        Vip => "VIP",
        Svip => "SVIP",
        Kvip => "KVIP",
        Xvip => "XVIP",
    }
}

labelled_choice! {
    CodeDuration, field = "duration" {
        ThirtyDays => "30 Hari",
        SevenDays => "7 Hari",
    }
}

/// Lifecycle of a submission. Only `Processing` is written here; the other
/// states belong to the fulfillment side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Processing,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Processing => "processing",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processing" => Ok(SubmissionStatus::Processing),
            "completed" => Ok(SubmissionStatus::Completed),
            "failed" => Ok(SubmissionStatus::Failed),
            _ => Err(format!("Unknown submission status: {}", s)),
        }
    }
}

/// Raw `POST /redeem` body. Fields are kept as untyped JSON so that a
/// missing or wrongly typed field becomes a validation error naming that
/// field instead of a generic JSON rejection.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub email: Option<Value>,
    pub password: Option<Value>,
    pub redeem_code: Option<Value>,
    pub server: Option<Value>,
    pub system_version: Option<Value>,
    pub cloud_type: Option<Value>,
    pub duration: Option<Value>,
}

impl fmt::Debug for SubmissionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("redeem_code", &self.redeem_code)
            .field("server", &self.server)
            .field("system_version", &self.system_version)
            .field("cloud_type", &self.cloud_type)
            .field("duration", &self.duration)
            .finish()
    }
}

/// A submission that passed validation; `redeem_code` is in canonical form.
#[derive(Clone, PartialEq, Eq)]
pub struct NewRedeemSubmission {
    pub email: String,
    pub password: String,
    pub redeem_code: String,
    pub server: Server,
    pub system_version: SystemVersion,
    pub cloud_type: CloudType,
    pub duration: CodeDuration,
}

impl fmt::Debug for NewRedeemSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewRedeemSubmission")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("redeem_code", &self.redeem_code)
            .field("server", &self.server)
            .field("system_version", &self.system_version)
            .field("cloud_type", &self.cloud_type)
            .field("duration", &self.duration)
            .finish()
    }
}

/// A stored submission as it is handed back to callers. The password is
/// write-only and has no place in this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRecord {
    pub id: Uuid,
    pub email: String,
    pub redeem_code: String,
    pub server: Server,
    pub system_version: SystemVersion,
    pub cloud_type: CloudType,
    pub duration: CodeDuration,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl RedeemRecord {
    /// Builds the record for a fresh insert: new id, `processing`, stamped now.
    pub fn from_new(submission: &NewRedeemSubmission) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: submission.email.clone(),
            redeem_code: submission.redeem_code.clone(),
            server: submission.server,
            system_version: submission.system_version,
            cloud_type: submission.cloud_type,
            duration: submission.duration,
            status: SubmissionStatus::Processing,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_parse_their_wire_labels() {
        assert_eq!("Hong Kong 2".parse::<Server>(), Ok(Server::HongKong2));
        assert_eq!("Android 8.1".parse::<SystemVersion>(), Ok(SystemVersion::Android81));
        assert_eq!("XVIP".parse::<CloudType>(), Ok(CloudType::Xvip));
        assert_eq!("7 Hari".parse::<CodeDuration>(), Ok(CodeDuration::SevenDays));
        assert!("Japan".parse::<Server>().is_err());
        assert!("vip".parse::<CloudType>().is_err());
    }

    #[test]
    fn every_choice_round_trips_through_display() {
        for s in Server::ALL {
            assert_eq!(s.to_string().parse::<Server>(), Ok(*s));
        }
        for v in SystemVersion::ALL {
            assert_eq!(v.to_string().parse::<SystemVersion>(), Ok(*v));
        }
    }

    #[test]
    fn record_serializes_camel_case_without_password() {
        let submission = NewRedeemSubmission {
            email: "a@b.com".to_string(),
            password: "hunter2".to_string(),
            redeem_code: "APY3-GP9Z-KVC4".to_string(),
            server: Server::UnitedStates,
            system_version: SystemVersion::Android10,
            cloud_type: CloudType::Vip,
            duration: CodeDuration::ThirtyDays,
        };
        let record = RedeemRecord::from_new(&submission);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["redeemCode"], "APY3-GP9Z-KVC4");
        assert_eq!(json["server"], "United States");
        assert_eq!(json["duration"], "30 Hari");
        assert_eq!(json["status"], "processing");
        assert!(json.get("password").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn debug_output_redacts_password() {
        let request = SubmissionRequest {
            password: Some("hunter2".into()),
            ..Default::default()
        };
        assert!(!format!("{:?}", request).contains("hunter2"));
    }

    #[test]
    fn request_accepts_any_json_type_per_field() {
        let request: SubmissionRequest =
            serde_json::from_str(r#"{"email":"a@b.com","server":5,"duration":null}"#).unwrap();
        assert_eq!(request.email, Some(Value::from("a@b.com")));
        assert_eq!(request.server, Some(Value::from(5)));
        assert_eq!(request.duration, None);
        assert_eq!(request.password, None);
    }
}
