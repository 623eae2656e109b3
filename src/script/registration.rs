//! Registration protocol shared by build and verify modes.
//!
//! Every variant resolves its identity hash(es) through a `Resolver`. Build
//! mode wraps a mutable `AddressRegistry`; verify mode wraps a read-only
//! `AddressLookup` and turns a missing entry into a mismatch error, so the
//! hash-derivation logic in each variant is written once.

use crate::errors::{AppError, AppResult};
use crate::script::{Address, AddressType};
use crate::state::{AddressLookup, AddressRegistry};
use bitcoin::hashes::{hash160, Hash};
use tracing::trace;

/// Outcome of resolving one identity hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub address: Address,
    /// True only when build mode created the address during this call
    pub first_seen: bool,
}

/// Resolves identity hashes against an address state
pub trait Resolver {
    fn resolve(&mut self, hash: &hash160::Hash, address_type: AddressType)
        -> AppResult<Resolution>;
}

/// Build mode: resolve or create
pub struct CreatingResolver<'a, S: ?Sized> {
    state: &'a mut S,
}

impl<'a, S: AddressRegistry + ?Sized> CreatingResolver<'a, S> {
    pub fn new(state: &'a mut S) -> Self {
        Self { state }
    }
}

impl<S: AddressRegistry + ?Sized> Resolver for CreatingResolver<'_, S> {
    fn resolve(
        &mut self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<Resolution> {
        let (address, first_seen) = self.state.resolve_or_create(hash, address_type)?;
        trace!(
            "Resolved {} {} -> {} (new: {})",
            address_type,
            hex::encode(hash.as_byte_array()),
            address,
            first_seen
        );
        Ok(Resolution {
            address,
            first_seen,
        })
    }
}

/// Verify mode: resolve only, a missing entry is a mismatch
pub struct VerifyingResolver<'a, S: ?Sized> {
    state: &'a S,
}

impl<'a, S: AddressLookup + ?Sized> VerifyingResolver<'a, S> {
    pub fn new(state: &'a S) -> Self {
        Self { state }
    }
}

impl<S: AddressLookup + ?Sized> Resolver for VerifyingResolver<'_, S> {
    fn resolve(
        &mut self,
        hash: &hash160::Hash,
        address_type: AddressType,
    ) -> AppResult<Resolution> {
        match self.state.resolve_or_verify(hash, address_type)? {
            Some(address) => Ok(Resolution {
                address,
                first_seen: false,
            }),
            None => Err(AppError::VerificationMismatch {
                address_type,
                hash: hex::encode(hash.as_byte_array()),
            }),
        }
    }
}
