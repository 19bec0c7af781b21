use soroban_sdk::Address;

use crate::errors::SaleError;

/// Who is allowed to invoke an entry point.
pub enum Access<'a> {
    /// The deployer-configured owner of the service.
    Owner,
    /// The configured peer contract (crowdsale for vesting, and vice versa).
    Peer,
    /// The account the operation is about, e.g. a beneficiary reading its own schedule.
    Subject(&'a Address),
    OwnerOrSubject(&'a Address),
}

/// Single authorization gate for a service. Built from storage on every call.
pub struct Gate {
    owner: Address,
    peer: Option<Address>,
}

impl Gate {
    pub fn new(owner: Address, peer: Option<Address>) -> Self {
        Self { owner, peer }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Requires the caller's signature, then matches it against `access`.
    /// Fails closed when the peer is not configured.
    pub fn check(&self, caller: &Address, access: Access) -> Result<(), SaleError> {
        caller.require_auth();

        let allowed = match access {
            Access::Owner => *caller == self.owner,
            Access::Peer => self.peer.as_ref().map_or(false, |peer| caller == peer),
            Access::Subject(subject) => caller == subject,
            Access::OwnerOrSubject(subject) => *caller == self.owner || caller == subject,
        };

        if allowed {
            Ok(())
        } else {
            Err(SaleError::Unauthorized)
        }
    }
}
