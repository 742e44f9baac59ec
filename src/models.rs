//! Lookup data models
//!
//! Upstream records arrive in one of two incompatible shapes. They are wrapped
//! in [`RawTransaction`] and converted eagerly into [`NormalizedTransaction`] at
//! the adapter boundary, so nothing past the adapters sees a per-chain shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::ChainProfile;
use crate::{Error, Result};

/// Chain-agnostic transaction summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    /// Unique transaction hash or signature
    pub identifier: String,
    /// Sender (Ethereum) or fee payer / signer (Solana)
    pub counterparty_from: String,
    /// Receiver (Ethereum) or invoked program (Solana).
    /// Absent when a Solana record carries no parsed instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_to: Option<String>,
}

/// Display-ready result of one lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Address as submitted
    pub address: String,
    /// Chain profile selected by the classifier
    pub chain: ChainProfile,
    /// Balance in display units (ETH or SOL)
    pub balance: f64,
    /// Most recent transactions in upstream order
    pub transactions: Vec<NormalizedTransaction>,
}

/// Raw `txlist` record from an Etherscan-compatible API.
#[derive(Debug, Clone, Deserialize)]
pub struct EtherscanTransaction {
    /// Transaction hash
    pub hash: String,
    /// Sender
    pub from: String,
    /// Receiver (empty for contract creation)
    pub to: String,
}

/// Raw transaction record from a Solscan-compatible API.
///
/// `signer` may be missing upstream. Such a record fails normalization with a
/// [`Error::Parse`] naming the transaction, since `counterparty_from` is
/// required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolscanTransaction {
    /// Transaction signature
    pub tx_hash: String,
    /// Signer(s); the public API returns either one string or a list
    #[serde(default)]
    pub signer: Option<OneOrMany<String>>,
    /// Parsed instruction(s), if the explorer decoded any
    #[serde(default)]
    pub parsed_instruction: Option<OneOrMany<ParsedInstruction>>,
}

/// Decoded instruction on a Solana transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInstruction {
    /// Invoked program
    pub program_id: String,
}

/// A field the upstream returns either as a single value or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Single value
    One(T),
    /// List of values
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// First value, if any
    pub fn into_first(self) -> Option<T> {
        match self {
            Self::One(v) => Some(v),
            Self::Many(v) => v.into_iter().next(),
        }
    }
}

/// Upstream transaction record tagged by chain profile.
#[derive(Debug, Clone)]
pub enum RawTransaction {
    /// Etherscan `txlist` entry
    Ethereum(EtherscanTransaction),
    /// Solscan transaction entry
    Solana(SolscanTransaction),
}

impl RawTransaction {
    /// Convert into the canonical shape.
    pub fn normalize(self) -> Result<NormalizedTransaction> {
        match self {
            Self::Ethereum(tx) => Ok(NormalizedTransaction {
                identifier: tx.hash,
                counterparty_from: tx.from,
                counterparty_to: Some(tx.to),
            }),
            Self::Solana(tx) => {
                let counterparty_from = tx
                    .signer
                    .and_then(OneOrMany::into_first)
                    .ok_or_else(|| {
                        Error::Parse(format!("transaction {} has no signer", tx.tx_hash))
                    })?;
                let counterparty_to = tx
                    .parsed_instruction
                    .and_then(OneOrMany::into_first)
                    .map(|ix| ix.program_id);
                Ok(NormalizedTransaction {
                    identifier: tx.tx_hash,
                    counterparty_from,
                    counterparty_to,
                })
            }
        }
    }
}

/// Scale an amount in the chain's smallest unit to display units.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_display_units(raw: u128, profile: ChainProfile) -> f64 {
    raw as f64 / 10_f64.powi(profile.decimals())
}

impl fmt::Display for NormalizedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.identifier)?;
        writeln!(f, "   From: {}", self.counterparty_from)?;
        write!(f, "   To:   {}", self.counterparty_to.as_deref().unwrap_or("-"))
    }
}

impl fmt::Display for LookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Address: {} ({})", self.address, self.chain)?;
        writeln!(f, "Balance: {} {}", self.balance, self.chain.symbol())?;
        if self.transactions.is_empty() {
            return write!(f, "No transactions");
        }
        write!(f, "Last {} transactions:", self.transactions.len())?;
        for (i, tx) in self.transactions.iter().enumerate() {
            write!(f, "\n{}. {tx}", i + 1)?;
        }
        Ok(())
    }
}
