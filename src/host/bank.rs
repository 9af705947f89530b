//! Bank collaborator
//!
//! Moves deposits between payer accounts and the module's escrow account.

use crate::crypto::AccAddress;
use crate::errors::HostError;
use crate::types::Coin;
use std::collections::{HashMap, HashSet};

pub trait BankKeeper {
    fn send_coins_from_account_to_module(
        &mut self,
        from: &AccAddress,
        module: &str,
        amount: &Coin,
    ) -> Result<(), HostError>;

    fn send_coins_from_module_to_account(
        &mut self,
        module: &str,
        to: &AccAddress,
        amount: &Coin,
    ) -> Result<(), HostError>;

    fn balance(&self, addr: &AccAddress, denom: &str) -> u128;

    fn module_balance(&self, module: &str, denom: &str) -> u128;
}

/// Balances kept in memory, used by the node simulator and tests
#[derive(Debug, Default, Clone)]
pub struct InMemoryBank {
    accounts: HashMap<(AccAddress, String), u128>,
    modules: HashMap<(String, String), u128>,
    module_accounts: HashSet<String>,
}

impl InMemoryBank {
    /// Bank with the given module accounts registered
    pub fn new(modules: &[&str]) -> Self {
        Self {
            module_accounts: modules.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Credit an account out of thin air (genesis balances)
    pub fn mint(&mut self, to: &AccAddress, amount: &Coin) {
        *self
            .accounts
            .entry((*to, amount.denom.clone()))
            .or_insert(0) += amount.amount;
    }

    fn check_module(&self, module: &str) -> Result<(), HostError> {
        if self.module_accounts.contains(module) {
            Ok(())
        } else {
            Err(HostError::UnknownModule(module.to_string()))
        }
    }
}

impl BankKeeper for InMemoryBank {
    fn send_coins_from_account_to_module(
        &mut self,
        from: &AccAddress,
        module: &str,
        amount: &Coin,
    ) -> Result<(), HostError> {
        self.check_module(module)?;
        let have = self.balance(from, &amount.denom);
        if have < amount.amount {
            return Err(HostError::InsufficientFunds { have, need: amount.amount });
        }
        self.accounts.insert((*from, amount.denom.clone()), have - amount.amount);
        *self
            .modules
            .entry((module.to_string(), amount.denom.clone()))
            .or_insert(0) += amount.amount;
        Ok(())
    }

    fn send_coins_from_module_to_account(
        &mut self,
        module: &str,
        to: &AccAddress,
        amount: &Coin,
    ) -> Result<(), HostError> {
        self.check_module(module)?;
        let have = self.module_balance(module, &amount.denom);
        if have < amount.amount {
            return Err(HostError::InsufficientFunds { have, need: amount.amount });
        }
        self.modules.insert((module.to_string(), amount.denom.clone()), have - amount.amount);
        self.mint(to, amount);
        Ok(())
    }

    fn balance(&self, addr: &AccAddress, denom: &str) -> u128 {
        self.accounts
            .get(&(*addr, denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn module_balance(&self, module: &str, denom: &str) -> u128 {
        self.modules
            .get(&(module.to_string(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }
}
