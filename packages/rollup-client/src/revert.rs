//! Revert extraction, decoding, and finalization-readiness classification
//!
//! RPC libraries nest revert payloads at different depths of their error
//! objects; [`extract_revert_data`] probes the known locations in order.
//! Decoding tries the standard `Error(string)` and `Panic(uint256)`
//! selectors first, then every ABI in the registry in registration order,
//! and falls back to the bare selector.

use std::sync::RwLock;

use alloy::primitives::{keccak256, Address, Bytes, U256};

use crate::chain::ClientError;
use crate::types::FinalizeReadiness;

/// Selector of the standard string revert, `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of the standard panic revert, `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// A decoded contract revert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRevert {
    pub selector: [u8; 4],
    /// Error name when a registered ABI (or a standard selector) matched.
    pub name: Option<String>,
    /// Decoded arguments, stringified. `None` when the arguments could not
    /// be decoded.
    pub args: Option<Vec<String>>,
    /// Label of the contract whose ABI matched.
    pub contract: Option<String>,
}

impl DecodedRevert {
    /// The name if decoded, the hex selector otherwise.
    pub fn name_or_selector(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("0x{}", hex::encode(self.selector)),
        }
    }
}

// ============================================================================
// ABI registry
// ============================================================================

/// Static argument kinds the registry can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgKind {
    Uint,
    Address,
    Bytes32,
    /// Dynamically-encoded argument; matched but not decoded.
    Dynamic,
}

#[derive(Debug, Clone)]
struct AbiEntry {
    contract: String,
    name: String,
    selector: [u8; 4],
    args: Vec<ArgKind>,
}

/// Registry of contract error ABIs, tried in registration order.
///
/// Constructed with the bridge's built-in error set; additional ABIs can be
/// registered at runtime by contract name. Registration is guarded so
/// concurrent use is safe.
#[derive(Debug, Default)]
pub struct AbiRegistry {
    entries: RwLock<Vec<AbiEntry>>,
}

impl AbiRegistry {
    pub fn new() -> Self {
        AbiRegistry::default()
    }

    /// Register error signatures (e.g. `"BatchNotExecuted(uint256)"`) under
    /// a contract label. Unparseable signatures are skipped.
    pub fn register(&self, contract: &str, signatures: &[&str]) {
        let mut parsed = Vec::new();
        for sig in signatures {
            if let Some(entry) = parse_signature(contract, sig) {
                parsed.push(entry);
            }
        }
        self.entries
            .write()
            .expect("abi registry lock poisoned")
            .extend(parsed);
    }

    fn lookup(&self, selector: [u8; 4]) -> Option<AbiEntry> {
        self.entries
            .read()
            .expect("abi registry lock poisoned")
            .iter()
            .find(|e| e.selector == selector)
            .cloned()
    }
}

/// Parse `Name(type1,type2)` into a registry entry.
fn parse_signature(contract: &str, signature: &str) -> Option<AbiEntry> {
    let open = signature.find('(')?;
    let close = signature.rfind(')')?;
    if close < open {
        return None;
    }
    let name = signature[..open].trim();
    if name.is_empty() {
        return None;
    }

    let inner = &signature[open + 1..close];
    let mut args = Vec::new();
    if !inner.trim().is_empty() {
        for ty in inner.split(',') {
            let ty = ty.trim();
            let kind = if ty.starts_with("uint") || ty.starts_with("int") {
                ArgKind::Uint
            } else if ty == "address" {
                ArgKind::Address
            } else if ty == "bytes32" || ty == "bytes4" || ty == "bool" {
                ArgKind::Bytes32
            } else {
                ArgKind::Dynamic
            };
            args.push(kind);
        }
    }

    // Selector is computed over the canonical signature as given.
    let canonical = format!("{}({})", name, inner.split(',').map(str::trim).collect::<Vec<_>>().join(","));
    let hash = keccak256(canonical.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);

    Some(AbiEntry {
        contract: contract.to_string(),
        name: name.to_string(),
        selector,
        args,
    })
}

// ============================================================================
// Revert decoder
// ============================================================================

/// Decodes raw revert payloads against the registry.
#[derive(Debug)]
pub struct RevertDecoder {
    registry: AbiRegistry,
}

impl Default for RevertDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RevertDecoder {
    /// A decoder preloaded with the bridge error set.
    pub fn new() -> Self {
        let registry = AbiRegistry::new();
        registry.register(
            "L1AssetRouter",
            &[
                "WithdrawalAlreadyFinalized()",
                "BatchNotExecuted(uint256)",
                "LocalRootIsZero()",
                "InvalidProof()",
                "InvalidSelector(bytes4)",
                "WrongL2Sender(address)",
                "WrongMsgLength(uint256)",
            ],
        );
        registry.register("Bridgehub", &["Unauthorized(address)", "SlotOccupied()"]);
        RevertDecoder { registry }
    }

    /// Access the registry, e.g. to register additional contract ABIs.
    pub fn registry(&self) -> &AbiRegistry {
        &self.registry
    }

    /// Decode the revert carried by a client error, if any.
    pub fn decode(&self, err: &ClientError) -> Option<DecodedRevert> {
        let data = extract_revert_data(err)?;
        Some(self.decode_data(&data))
    }

    /// Decode a raw revert payload (at least 4 bytes).
    pub fn decode_data(&self, data: &[u8]) -> DecodedRevert {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        let tail = &data[4..];

        if selector == ERROR_STRING_SELECTOR {
            return DecodedRevert {
                selector,
                name: Some("Error".to_string()),
                args: decode_abi_string(tail).map(|s| vec![s]),
                contract: None,
            };
        }

        if selector == PANIC_SELECTOR {
            return DecodedRevert {
                selector,
                name: Some("Panic".to_string()),
                args: decode_word(tail, 0).map(|code| vec![code.to_string()]),
                contract: None,
            };
        }

        if let Some(entry) = self.registry.lookup(selector) {
            return DecodedRevert {
                selector,
                name: Some(entry.name.clone()),
                args: decode_static_args(tail, &entry.args),
                contract: Some(entry.contract),
            };
        }

        DecodedRevert {
            selector,
            name: None,
            args: None,
            contract: None,
        }
    }

    /// Classify withdrawal-finalization readiness from a revert error.
    ///
    /// Pure over the decoded revert / message: identical input shapes yield
    /// identical classifications.
    pub fn classify_readiness(&self, err: &ClientError) -> FinalizeReadiness {
        let decoded = self.decode(err);

        if let Some(d) = &decoded {
            if let Some(name) = d.name.as_deref() {
                match name {
                    "WithdrawalAlreadyFinalized" => return FinalizeReadiness::Finalized,
                    "BatchNotExecuted" => {
                        return FinalizeReadiness::NotReady {
                            reason: "batch-not-executed".to_string(),
                            detail: None,
                        }
                    }
                    "LocalRootIsZero" => {
                        return FinalizeReadiness::NotReady {
                            reason: "proof-root-missing".to_string(),
                            detail: None,
                        }
                    }
                    "InvalidProof" | "InvalidSelector" | "WrongL2Sender" | "WrongMsgLength" => {
                        return FinalizeReadiness::Unfinalizable {
                            reason: "message-invalid".to_string(),
                            detail: Some(name.to_string()),
                        }
                    }
                    _ => {}
                }
            }
        }

        let message = err.full_message();
        if message.to_lowercase().contains("paused") {
            return FinalizeReadiness::NotReady {
                reason: "paused".to_string(),
                detail: None,
            };
        }

        if let Some(d) = decoded {
            return FinalizeReadiness::Unfinalizable {
                reason: "unsupported".to_string(),
                detail: Some(d.name_or_selector()),
            };
        }

        FinalizeReadiness::NotReady {
            reason: "unknown".to_string(),
            detail: if message.is_empty() {
                None
            } else {
                Some(message.to_lowercase())
            },
        }
    }
}

/// Probe the known nesting locations for a well-formed revert payload:
/// the top-level data field, then one and two levels of cause nesting.
pub fn extract_revert_data(err: &ClientError) -> Option<Bytes> {
    let mut candidates = Vec::with_capacity(3);
    candidates.push(err.data.as_ref());
    if let Some(cause) = err.cause.as_deref() {
        candidates.push(cause.data.as_ref());
        if let Some(inner) = cause.cause.as_deref() {
            candidates.push(inner.data.as_ref());
        }
    }

    candidates
        .into_iter()
        .flatten()
        .find(|data| data.len() >= 4)
        .cloned()
}

/// Decode one 32-byte big-endian word at `offset` words into the tail.
fn decode_word(tail: &[u8], index: usize) -> Option<U256> {
    let start = index * 32;
    let end = start + 32;
    if tail.len() < end {
        return None;
    }
    Some(U256::from_be_slice(&tail[start..end]))
}

/// Decode a single ABI-encoded `string` argument.
fn decode_abi_string(tail: &[u8]) -> Option<String> {
    let offset: usize = decode_word(tail, 0)?.try_into().ok()?;
    if tail.len() < offset + 32 {
        return None;
    }
    let len: usize = U256::from_be_slice(&tail[offset..offset + 32])
        .try_into()
        .ok()?;
    let start = offset + 32;
    if tail.len() < start + len {
        return None;
    }
    String::from_utf8(tail[start..start + len].to_vec()).ok()
}

/// Decode static arguments per the registered kinds. Returns `None` when the
/// payload is too short or a dynamic argument blocks positional decoding.
fn decode_static_args(tail: &[u8], kinds: &[ArgKind]) -> Option<Vec<String>> {
    let mut out = Vec::with_capacity(kinds.len());
    for (i, kind) in kinds.iter().enumerate() {
        let word = decode_word(tail, i)?;
        match kind {
            ArgKind::Uint => out.push(word.to_string()),
            ArgKind::Address => {
                let bytes: [u8; 32] = word.to_be_bytes();
                out.push(format!("{:?}", Address::from_slice(&bytes[12..])));
            }
            ArgKind::Bytes32 => {
                let bytes: [u8; 32] = word.to_be_bytes();
                out.push(format!("0x{}", hex::encode(bytes)));
            }
            ArgKind::Dynamic => return None,
        }
    }
    Some(out)
}
