//! Value objects describing one on-chain function call, plus constructors
//! for the fixed protocol sequence so argument order is written in exactly
//! one place.

use crate::config::{ChainAddresses, Network};
use alloy::primitives::{Address, U256};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenStandard {
    Erc20,
}

impl TokenStandard {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenStandard::Erc20 => "ERC20",
        }
    }
}

/// One fully described contract invocation. Arguments are string-serialized
/// the way the host bridge expects them; the direct-signer backend coerces
/// them back into ABI values. The chain id is mandatory: the host bridge
/// stalls past its own internal timeout when it is missing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractCallSpec {
    pub target: Address,
    pub function: String,
    pub args: Vec<String>,
    pub value: U256,
    pub standard: Option<TokenStandard>,
    pub chain_id: u64,
}

impl ContractCallSpec {
    /// Short form of the target for log and error messages, e.g. `0xba50Cd2A`.
    pub fn target_prefix(&self) -> String {
        let rendered = self.target.to_string();
        rendered.chars().take(10).collect()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallStatus {
    Success,
    Failed,
    Cancelled,
}

/// Outcome of one gateway call. A resolved call is not proof of success;
/// the status must be inspected (the gateway does this and converts
/// anything but `Success` into an error).
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    pub status: CallStatus,
    pub detail: Option<String>,
    pub tx_hash: Option<String>,
}

impl ExecutionResult {
    pub fn success(tx_hash: Option<String>) -> Self {
        Self {
            status: CallStatus::Success,
            detail: None,
            tx_hash,
        }
    }
}

/// Builders for every call the client submits. Holding the address book and
/// chain id here means orchestration code cannot construct a spec with the
/// wrong target or a missing chain id.
#[derive(Clone, Copy, Debug)]
pub struct ProtocolCalls {
    addresses: ChainAddresses,
    chain_id: u64,
}

impl ProtocolCalls {
    pub fn new(network: Network) -> Self {
        Self {
            addresses: network.addresses(),
            chain_id: network.chain_id(),
        }
    }

    pub fn addresses(&self) -> &ChainAddresses {
        &self.addresses
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn spec(
        &self,
        target: Address,
        function: &str,
        args: Vec<String>,
        standard: Option<TokenStandard>,
    ) -> ContractCallSpec {
        ContractCallSpec {
            target,
            function: function.to_string(),
            args,
            value: U256::ZERO,
            standard,
            chain_id: self.chain_id,
        }
    }

    /// Let the yield pool pull `amount` of the stable token.
    pub fn approve_stable_for_pool(&self, amount: U256) -> ContractCallSpec {
        self.spec(
            self.addresses.stable_token,
            "approve",
            vec![self.addresses.yield_pool.to_string(), amount.to_string()],
            Some(TokenStandard::Erc20),
        )
    }

    /// Supply `amount` of the stable token to the pool on behalf of
    /// `depositor` (trailing `0` is the referral code).
    pub fn supply_stable(&self, amount: U256, depositor: Address) -> ContractCallSpec {
        self.spec(
            self.addresses.yield_pool,
            "supply",
            vec![
                self.addresses.stable_token.to_string(),
                amount.to_string(),
                depositor.to_string(),
                "0".to_string(),
            ],
            None,
        )
    }

    /// Let the registry pull `amount` of the yield token.
    pub fn approve_yield_for_registry(&self, amount: U256) -> ContractCallSpec {
        self.spec(
            self.addresses.yield_token,
            "approve",
            vec![self.addresses.registry.to_string(), amount.to_string()],
            Some(TokenStandard::Erc20),
        )
    }

    pub fn register(&self, amount: U256) -> ContractCallSpec {
        self.spec(
            self.addresses.registry,
            "register",
            vec![amount.to_string()],
            None,
        )
    }

    pub fn add_to_position(&self, amount: U256) -> ContractCallSpec {
        self.spec(
            self.addresses.registry,
            "addToPosition",
            vec![amount.to_string()],
            None,
        )
    }

    pub fn unregister(&self) -> ContractCallSpec {
        self.spec(self.addresses.registry, "unregister", Vec::new(), None)
    }

    pub fn claim_prize(&self) -> ContractCallSpec {
        self.spec(self.addresses.registry, "claimPrize", Vec::new(), None)
    }

    pub fn start_draw(&self) -> ContractCallSpec {
        self.spec(self.addresses.registry, "startDraw", Vec::new(), None)
    }

    pub fn complete_draw(&self) -> ContractCallSpec {
        self.spec(self.addresses.registry, "completeDraw", Vec::new(), None)
    }

    /// Manual fulfillment against the mock oracle; production oracles answer
    /// their requests autonomously.
    pub fn fulfill_randomness(&self, request_id: U256, word: U256) -> ContractCallSpec {
        self.spec(
            self.addresses.randomness_oracle,
            "completeRequest",
            vec![request_id.to_string(), word.to_string()],
            None,
        )
    }
}
