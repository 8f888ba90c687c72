//! Response hooks.
//!
//! A handler sees every `get`/`set` outcome after the manager has produced
//! it. Handlers observe only: the value returned to the caller is fixed by
//! then.

use crate::status::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Get,
    Set,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Set => "set",
        }
    }
}

/// Which request produced a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSummary<'a> {
    pub action: Action,
    pub key: &'a str,
    pub class_name: &'static str,
}

pub trait ResponseHandler {
    fn on_response(&self, request: &RequestSummary<'_>, status: Status);
}

impl<F> ResponseHandler for F
where
    F: Fn(&RequestSummary<'_>, Status),
{
    fn on_response(&self, request: &RequestSummary<'_>, status: Status) {
        self(request, status)
    }
}

/// Default handler: degraded outcomes at `warn`, the rest at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHandler;

impl ResponseHandler for LogHandler {
    fn on_response(&self, request: &RequestSummary<'_>, status: Status) {
        match status {
            Status::Ok => {
                log::debug!("{} {} '{}': {}", request.action.as_str(), request.class_name, request.key, status)
            }
            // A rejected write is the caller's business, not a fault.
            Status::InvalidValue if request.action == Action::Set => {
                log::debug!("{} {} '{}': {}", request.action.as_str(), request.class_name, request.key, status)
            }
            _ => log::warn!("{} {} '{}': {}", request.action.as_str(), request.class_name, request.key, status),
        }
    }
}
