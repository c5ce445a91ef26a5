//! The response envelope shared by every command.
//!
//! # Design
//! Success is decided only by the `Errors` collection in the body; the HTTP
//! status and the `Status` attribute are informational. The first error entry
//! becomes the reported `ApiFault`, and later entries ride along in
//! `ApiFault::additional` rather than being thrown away.

use serde::Deserialize;

use crate::error::{ApiFault, Error};

/// Value of the root `Status` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ResponseStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// `<ApiResponse>` with a command-specific `CommandResponse` payload `P`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<P> {
    #[serde(rename = "@Status")]
    pub status: ResponseStatus,
    #[serde(rename = "Errors", default)]
    pub errors: ErrorList,
    #[serde(rename = "Warnings", default)]
    pub warnings: WarningList,
    #[serde(rename = "RequestedCommand", default)]
    pub requested_command: Option<String>,
    #[serde(rename = "CommandResponse", default = "Option::default")]
    pub command_response: Option<P>,
    #[serde(rename = "Server", default)]
    pub server: Option<String>,
    #[serde(rename = "GMTTimeDifference", default)]
    pub gmt_time_difference: Option<String>,
    #[serde(rename = "ExecutionTime", default)]
    pub execution_time: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorList {
    #[serde(rename = "Error", default)]
    pub entries: Vec<ErrorEntry>,
}

/// `<Error Number="...">message</Error>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "@Number", default)]
    pub number: String,
    #[serde(rename = "$text", default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WarningList {
    #[serde(rename = "Warning", default)]
    pub entries: Vec<ErrorEntry>,
}

impl From<ErrorEntry> for ApiFault {
    fn from(entry: ErrorEntry) -> Self {
        ApiFault::new(entry.number, entry.message.trim())
    }
}

impl<P> ApiResponse<P> {
    /// Returns the payload, or the first reported error.
    ///
    /// An envelope with no errors and no `CommandResponse` does not satisfy
    /// the command schema and is reported as `Error::Decode`.
    pub fn evaluate(self) -> Result<P, Error> {
        let mut entries = self.errors.entries.into_iter();
        if let Some(first) = entries.next() {
            let mut fault = ApiFault::from(first);
            fault.additional = entries.map(ApiFault::from).collect();
            return Err(Error::Api(fault));
        }

        self.command_response
            .ok_or_else(|| Error::Decode("response has no CommandResponse element".to_string()))
    }
}
