use alloy::primitives::{Address, U256, address};
use std::fmt;

/// Decimal places of the stable token (USDC-style).
pub const STABLE_DECIMALS: u32 = 6;

/// Price of one ticket in stable-token base units (10 USDC).
pub const TICKET_PRICE: u64 = 10_000_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Testnet => 84532,
            Network::Mainnet => 8453,
        }
    }

    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Testnet => "https://sepolia.base.org",
            Network::Mainnet => "https://mainnet.base.org",
        }
    }

    pub fn addresses(self) -> ChainAddresses {
        match self {
            Network::Testnet => TESTNET_ADDRESSES,
            Network::Mainnet => MAINNET_ADDRESSES,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Testnet => "Base Sepolia",
            Network::Mainnet => "Base",
        };
        write!(f, "{name}")
    }
}

/// The five on-chain collaborators, resolved once per process and never
/// mutated afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChainAddresses {
    /// Deposit currency (ERC20).
    pub stable_token: Address,
    /// Lending pool the stable token is supplied to.
    pub yield_pool: Address,
    /// Interest-bearing receipt token credited by the pool.
    pub yield_token: Address,
    /// Lottery registry tracking positions, tickets and the weekly draw.
    pub registry: Address,
    /// Randomness oracle consumed by the draw (mock on testnet).
    pub randomness_oracle: Address,
}

const TESTNET_ADDRESSES: ChainAddresses = ChainAddresses {
    stable_token: address!("ba50Cd2A20f6DA35D788639E581bca8d0B5d4D5f"),
    yield_pool: address!("8bAB6d1b75f19e9eD9fCe8b9BD338844fF79aE27"),
    yield_token: address!("10F1A9D11CDf50041f3f8cB7191CBE2f31750ACC"),
    registry: address!("0796E141e8137b712DbA72eA1aC13d0Db39e9656"),
    randomness_oracle: address!("6f669059c93E01f080883a628bBeEcDdE4AFfe5B"),
};

// Registry and oracle are not deployed to mainnet yet; the pool-side
// addresses are the canonical ones.
const MAINNET_ADDRESSES: ChainAddresses = ChainAddresses {
    stable_token: address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
    yield_pool: address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5"),
    yield_token: address!("4e65fE4DbA92790696d040ac24Aa414708F5c0AB"),
    registry: Address::ZERO,
    randomness_oracle: Address::ZERO,
};

/// Render a stable-token amount with two decimal places, e.g. `12.50`.
pub fn format_stable(amount: U256) -> String {
    let unit = U256::from(10u64.pow(STABLE_DECIMALS));
    let whole = amount / unit;
    let frac: u64 = ((amount % unit) / U256::from(10u64.pow(STABLE_DECIMALS - 2))).to();
    format!("{whole}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id__testnet__is_base_sepolia() {
        assert_eq!(Network::Testnet.chain_id(), 84532);
    }

    #[test]
    fn format_stable__fractional_amount__two_decimals() {
        assert_eq!(format_stable(U256::from(10_000_000u64)), "10.00");
        assert_eq!(format_stable(U256::from(12_345_678u64)), "12.34");
        assert_eq!(format_stable(U256::from(90_000u64)), "0.09");
    }
}
