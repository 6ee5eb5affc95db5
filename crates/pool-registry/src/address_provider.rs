//! Versioned directory of contract addresses keyed by small integer IDs.
//!
//! Slots are created by their first write and never deleted. Unsetting a
//! slot only deactivates it: the address and description stay available
//! through [`AddressProvider::get_id_info`] and the version keeps counting
//! every write.

use {
    crate::{
        error::{Error, Result},
        eth::Address,
    },
    chrono::{DateTime, Utc},
    std::collections::BTreeMap,
};

/// Slot conventionally holding the main pool registry.
pub const MAIN_REGISTRY_ID: u64 = 0;

#[derive(Clone, Debug, Default)]
pub struct AddressProvider {
    slots: BTreeMap<u64, IdInfo>,
}

/// State of a single slot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IdInfo {
    pub addr: Address,
    pub is_active: bool,
    /// Number of writes to this slot, including unsets.
    pub version: u64,
    pub last_modified: DateTime<Utc>,
    pub description: String,
}

impl AddressProvider {
    /// Address of the main registry, see [`MAIN_REGISTRY_ID`].
    pub fn get_registry(&self) -> Address {
        self.get_address(MAIN_REGISTRY_ID)
    }

    /// The slot's address, or zero if it was never written or is inactive.
    pub fn get_address(&self, id: u64) -> Address {
        self.slots
            .get(&id)
            .filter(|slot| slot.is_active)
            .map(|slot| slot.addr)
            .unwrap_or_default()
    }

    /// Full slot state. Never written IDs report a zeroed [`IdInfo`].
    pub fn get_id_info(&self, id: u64) -> IdInfo {
        self.slots.get(&id).cloned().unwrap_or_default()
    }

    /// Highest ID ever written, 0 for an empty provider.
    pub fn max_id(&self) -> u64 {
        self.slots.keys().next_back().copied().unwrap_or_default()
    }

    /// Number of slots ever written.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Activates `id` with `addr`. Returns the new version of the slot.
    pub fn set_address(
        &mut self,
        id: u64,
        addr: Address,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        if addr.is_zero() {
            return Err(Error::ZeroAddress);
        }
        let slot = self.slots.entry(id).or_default();
        slot.addr = addr;
        slot.is_active = true;
        slot.description = description.into();
        Ok(slot.touch(now))
    }

    /// Deactivates `id`, keeping its address and description. Returns the new
    /// version of the slot.
    pub fn unset_address(&mut self, id: u64, now: DateTime<Utc>) -> Result<u64> {
        let slot = self
            .slots
            .get_mut(&id)
            .filter(|slot| slot.is_active)
            .ok_or(Error::InactiveId(id))?;
        slot.is_active = false;
        Ok(slot.touch(now))
    }

    /// Writes `addr` to the ID after [`Self::max_id`], or to
    /// [`MAIN_REGISTRY_ID`] on an empty provider. Returns the new ID.
    pub fn add_new_id(
        &mut self,
        addr: Address,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let id = match self.slots.keys().next_back() {
            Some(&max) => max.checked_add(1).ok_or(Error::IdSpaceExhausted(max))?,
            None => MAIN_REGISTRY_ID,
        };
        self.set_address(id, addr, description, now)?;
        Ok(id)
    }
}

impl IdInfo {
    fn touch(&mut self, now: DateTime<Utc>) -> u64 {
        self.version += 1;
        self.last_modified = now;
        self.version
    }
}

#[cfg(test)]
mod tests {
    use {super::*, chrono::TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn unset_keeps_history() {
        let mut provider = AddressProvider::default();
        let addr = Address::repeat_byte(0x55);

        assert_eq!(provider.set_address(5, addr, "desc", at(10)), Ok(1));
        assert_eq!(provider.unset_address(5, at(20)), Ok(2));

        assert_eq!(provider.get_address(5), Address::ZERO);
        assert_eq!(
            provider.get_id_info(5),
            IdInfo {
                addr,
                is_active: false,
                version: 2,
                last_modified: at(20),
                description: "desc".to_string(),
            }
        );
    }

    #[test]
    fn version_keeps_counting_across_reactivation() {
        let mut provider = AddressProvider::default();
        let first = Address::repeat_byte(1);
        let second = Address::repeat_byte(2);

        provider.set_address(3, first, "v1", at(1)).unwrap();
        provider.set_address(3, second, "v2", at(2)).unwrap();
        provider.unset_address(3, at(3)).unwrap();
        assert_eq!(provider.set_address(3, first, "v3", at(4)), Ok(4));

        assert_eq!(provider.get_address(3), first);
        assert_eq!(provider.get_id_info(3).description, "v3");
    }

    #[test]
    fn unset_requires_active_slot() {
        let mut provider = AddressProvider::default();
        assert_eq!(provider.unset_address(1, at(1)), Err(Error::InactiveId(1)));

        provider
            .set_address(1, Address::repeat_byte(1), "", at(1))
            .unwrap();
        provider.unset_address(1, at(2)).unwrap();
        assert_eq!(provider.unset_address(1, at(3)), Err(Error::InactiveId(1)));
        assert_eq!(provider.get_id_info(1).version, 2);
    }

    #[test]
    fn zero_address_is_rejected() {
        let mut provider = AddressProvider::default();
        assert_eq!(
            provider.set_address(0, Address::ZERO, "", at(1)),
            Err(Error::ZeroAddress)
        );
        assert!(provider.is_empty());
    }

    #[test]
    fn registry_lives_in_slot_zero() {
        let mut provider = AddressProvider::default();
        assert_eq!(provider.get_registry(), Address::ZERO);

        let registry = Address::repeat_byte(0xaa);
        assert_eq!(provider.add_new_id(registry, "Main Registry", at(1)), Ok(0));
        assert_eq!(provider.get_registry(), registry);

        let swaps = Address::repeat_byte(0xbb);
        assert_eq!(provider.add_new_id(swaps, "Exchanges", at(2)), Ok(1));

        provider
            .set_address(42, Address::repeat_byte(0xcc), "Sparse", at(3))
            .unwrap();
        assert_eq!(provider.max_id(), 42);
        assert_eq!(provider.add_new_id(swaps, "Next", at(4)), Ok(43));
        assert_eq!(provider.get_id_info(7), IdInfo::default());
        assert_eq!(provider.len(), 4);
    }

    #[test]
    fn add_new_id_stops_at_last_id() {
        let mut provider = AddressProvider::default();
        let registry = Address::repeat_byte(0xaa);
        provider.set_address(0, registry, "Main Registry", at(1)).unwrap();
        provider
            .set_address(u64::MAX, Address::repeat_byte(0xbb), "Last", at(2))
            .unwrap();

        assert_eq!(
            provider.add_new_id(Address::repeat_byte(0xcc), "Overflow", at(3)),
            Err(Error::IdSpaceExhausted(u64::MAX))
        );
        assert_eq!(provider.get_registry(), registry);
        assert_eq!(provider.get_id_info(0).version, 1);
        assert_eq!(provider.len(), 2);
    }
}
