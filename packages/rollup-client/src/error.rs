//! Structured error envelope
//!
//! Every fallible operation in the engine fails with a [`BridgeError`]:
//! a kind from the fixed taxonomy, the operation name, structured context
//! (addresses and amounts as strings), and, when a contract reverted, the
//! decoded revert. Wrapping happens exactly once at the boundary nearest the
//! failure; an error that is already a `BridgeError` propagates with `?`
//! untouched.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::chain::ClientError;
use crate::revert::DecodedRevert;

/// Failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input violates a route precondition.
    Validation,
    /// Transport or node failure.
    Rpc,
    /// A read-only call reverted or returned unusable data.
    Contract,
    /// A state-changing call reverted or the execution engine aborted
    /// mid-plan.
    Execution,
    /// Internally inconsistent state, e.g. waiting on a handle with no
    /// usable identifier.
    State,
    /// Destination-side confirmation could not be established.
    Verification,
    /// Unclassified.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Rpc => "rpc",
            ErrorKind::Contract => "contract",
            ErrorKind::Execution => "execution",
            ErrorKind::State => "state",
            ErrorKind::Verification => "verification",
            ErrorKind::Internal => "internal",
        }
    }
}

/// The structured error envelope.
#[derive(Debug, Clone, Error)]
#[error("{operation} failed ({}): {message}", .kind.as_str())]
pub struct BridgeError {
    pub kind: ErrorKind,
    /// Contract address or chain resource the failure relates to.
    pub resource: Option<String>,
    /// Stable operation name, e.g. "quote-l2-base-cost".
    pub operation: String,
    /// Free-form structured context: addresses, amounts as decimal strings.
    pub context: BTreeMap<String, String>,
    pub message: String,
    /// Decoded revert data when the failure came from a contract.
    pub revert: Option<DecodedRevert>,
    /// The underlying client error, if any.
    #[source]
    pub source: Option<ClientError>,
}

impl BridgeError {
    pub fn new(kind: ErrorKind, operation: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeError {
            kind,
            resource: None,
            operation: operation.into(),
            context: BTreeMap::new(),
            message: message.into(),
            revert: None,
            source: None,
        }
    }

    pub fn validation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, operation, message)
    }

    pub fn rpc(operation: impl Into<String>, err: ClientError) -> Self {
        Self::new(ErrorKind::Rpc, operation, err.full_message()).with_source(err)
    }

    pub fn contract(operation: impl Into<String>, err: ClientError) -> Self {
        Self::new(ErrorKind::Contract, operation, err.full_message()).with_source(err)
    }

    pub fn execution(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execution, operation, message)
    }

    pub fn state(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::State, operation, message)
    }

    pub fn verification(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Verification, operation, message)
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    pub fn with_revert(mut self, revert: Option<DecodedRevert>) -> Self {
        self.revert = revert;
        self
    }

    pub fn with_source(mut self, source: ClientError) -> Self {
        self.source = Some(source);
        self
    }
}

/// Result alias used across the engine.
pub type BridgeResult<T> = Result<T, BridgeError>;
